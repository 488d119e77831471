#![allow(missing_docs)]
//! Host-level tests for the `META:`/`FRAME:` text export.

use led_panel_games::Error;
use led_panel_games::frame::{BLACK, Frame1d, RGB8};
use led_panel_games::panel::export::{
    ColorOrder, FrameCsv, PanelMeta, parse_frame_csv, parse_meta, rgb_from_hex, write_frame_csv,
    write_meta,
};
use led_panel_games::panel::{PanelConfig, Rotation, Wiring};
use led_panel_games::particles::ParticleSimulator;
use rand::SeedableRng;
use rand::rngs::SmallRng;

const RED: RGB8 = RGB8::new(0xFF, 0, 0);
const GREEN: RGB8 = RGB8::new(0, 0xFF, 0);
const BLUE: RGB8 = RGB8::new(0, 0, 0xFF);
const DIM: RGB8 = RGB8::new(1, 2, 3);

#[test]
fn meta_line_lists_every_field() {
    let panel = PanelConfig::new(16, 8)
        .with_rotation(Rotation::Deg90)
        .with_flip_x(true);
    let line = PanelMeta::new(panel, ColorOrder::Grb).to_string();
    assert_eq!(
        line,
        "META:W=16,H=8,ORDER=xy,WIRING=progressive,ROT=90,FLIPX=1,FLIPY=0,COLOR=GRB"
    );
}

#[test]
fn write_meta_ends_the_line() {
    let mut out = String::new();
    write_meta(&mut out, &PanelConfig::serpentine(8, 8), ColorOrder::Rgb)
        .expect("writing to a String cannot fail");
    assert_eq!(
        out,
        "META:W=8,H=8,ORDER=xy,WIRING=serpentine,ROT=0,FLIPX=0,FLIPY=0,COLOR=RGB\n"
    );
}

#[test]
fn meta_round_trips_for_every_option() {
    for rotation in [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ] {
        for color_order in [ColorOrder::Rgb, ColorOrder::Bgr] {
            let panel = PanelConfig::serpentine(12, 6)
                .with_rotation(rotation)
                .with_flip_y(true);
            let meta = PanelMeta::new(panel, color_order);
            assert_eq!(parse_meta(&meta.to_string()), Ok(meta));
        }
    }
}

#[test]
fn parse_meta_accepts_any_key_order_and_case() {
    let meta = parse_meta(" META: h=4, w=3 ,color=grb,Wiring=SERPENTINE,extra=1 ").expect("meta must parse");
    assert_eq!(meta.panel, PanelConfig::serpentine(3, 4));
    assert_eq!(meta.color_order, ColorOrder::Grb);
}

#[test]
fn parse_meta_defaults_optional_fields() {
    let meta = parse_meta("META:W=5,H=2").expect("meta must parse");
    assert_eq!(meta.panel, PanelConfig::new(5, 2));
    assert_eq!(meta.panel.wiring(), Wiring::Progressive);
    assert_eq!(meta.color_order, ColorOrder::Rgb);
}

#[test]
fn parse_meta_reports_bad_lines() {
    assert_eq!(parse_meta("FRAME:000000,"), Err(Error::MissingMetaPrefix));
    assert_eq!(
        parse_meta("META:H=8"),
        Err(Error::MalformedMeta { key: "W" })
    );
    assert_eq!(
        parse_meta("META:W=8,H=eight"),
        Err(Error::MalformedMeta { key: "H" })
    );
    assert_eq!(
        parse_meta("META:W=8,H=8,ROT=45"),
        Err(Error::MalformedMeta { key: "ROT" })
    );
    assert_eq!(
        parse_meta("META:W=8,H=8,FLIPX=yes"),
        Err(Error::MalformedMeta { key: "FLIPX" })
    );
    assert_eq!(
        parse_meta("META:W=8,H=8,ORDER=led"),
        Err(Error::MalformedMeta { key: "ORDER" })
    );
    assert_eq!(
        parse_meta(&format!("META:W={},H=2", usize::MAX)),
        Err(Error::PanelTooLarge {
            width: usize::MAX,
            height: 2
        })
    );
    assert_eq!(
        parse_meta("META:W=0,H=4"),
        Err(Error::EmptyPanel {
            width: 0,
            height: 4
        })
    );
}

#[test]
fn frame_line_scans_rows_through_the_mapping() {
    let pixels = [RED, GREEN, BLUE, DIM];

    let progressive = PanelConfig::new(2, 2);
    assert_eq!(
        FrameCsv::new(&progressive, &pixels).to_string(),
        "FRAME:FF0000,00FF00,0000FF,010203,"
    );

    // Strip index 3 is at (0, 1) on a serpentine panel.
    let serpentine = PanelConfig::serpentine(2, 2);
    assert_eq!(
        FrameCsv::new(&serpentine, &pixels).to_string(),
        "FRAME:FF0000,00FF00,010203,0000FF,"
    );
}

#[test]
fn write_frame_csv_ends_the_line() {
    let mut out = String::new();
    write_frame_csv(&mut out, &PanelConfig::new(1, 1), &[GREEN])
        .expect("writing to a String cannot fail");
    assert_eq!(out, "FRAME:00FF00,\n");
}

#[test]
#[should_panic(expected = "frame length must equal panel width * height")]
fn frame_line_panics_on_wrong_length() {
    let _ = FrameCsv::new(&PanelConfig::new(2, 2), &[RED]);
}

#[test]
fn frame_line_round_trips_a_rendered_frame() {
    let panel = PanelConfig::serpentine(8, 8)
        .with_rotation(Rotation::Deg270)
        .with_flip_x(true);
    let mut stars: ParticleSimulator<SmallRng, 8, 8> =
        ParticleSimulator::new(panel, SmallRng::seed_from_u64(11)).with_spawn_probability(1.0);
    for _ in 0..40 {
        stars.tick();
    }
    let mut frame = Frame1d::<64>::new();
    stars.render(&mut frame);
    assert!(frame.iter().any(|&color| color != BLACK));

    let line = FrameCsv::new(&panel, frame.as_slice()).to_string();
    let mut decoded = Frame1d::<64>::new();
    parse_frame_csv(&panel, &line, decoded.as_mut_slice()).expect("frame must parse");
    assert_eq!(decoded, frame);
}

#[test]
fn parse_frame_skips_noise() {
    let panel = PanelConfig::new(2, 2);
    let mut pixels = [BLACK; 4];
    parse_frame_csv(
        &panel,
        "ff0000, ,zz,00ff00,0000FF,#010203,STATE:0A0B0C,",
        &mut pixels,
    )
    .expect("frame must parse");
    assert_eq!(pixels, [RED, GREEN, BLUE, DIM]);
}

#[test]
fn parse_frame_requires_one_token_per_cell() {
    let panel = PanelConfig::new(2, 2);
    let mut pixels = [DIM; 4];
    assert_eq!(
        parse_frame_csv(&panel, "FRAME:FF0000,00FF00,0000FF,", &mut pixels),
        Err(Error::PixelCountMismatch {
            expected: 4,
            actual: 3
        })
    );
    assert_eq!(pixels, [DIM; 4]);

    assert_eq!(
        parse_frame_csv(
            &panel,
            "FRAME:FF0000,00FF00,0000FF,000000,000000,",
            &mut pixels
        ),
        Err(Error::PixelCountMismatch {
            expected: 4,
            actual: 5
        })
    );
}

#[test]
fn parse_frame_rejects_wrong_buffer() {
    let mut pixels = [BLACK; 3];
    assert_eq!(
        parse_frame_csv(&PanelConfig::new(2, 2), "FRAME:", &mut pixels),
        Err(Error::BufferLengthMismatch {
            expected: 4,
            actual: 3
        })
    );
}

#[test]
fn hex_tokens_parse_strictly() {
    assert_eq!(rgb_from_hex("A0b1C2"), Some(RGB8::new(0xA0, 0xB1, 0xC2)));
    assert_eq!(rgb_from_hex(" #000001 "), Some(RGB8::new(0, 0, 1)));
    assert_eq!(rgb_from_hex("FFF"), None);
    assert_eq!(rgb_from_hex("GG0000"), None);
    assert_eq!(rgb_from_hex("FF00001"), None);
    assert_eq!(rgb_from_hex(""), None);
}

#[test]
fn color_order_names_are_case_insensitive() {
    assert_eq!(ColorOrder::from_name("bgr"), Some(ColorOrder::Bgr));
    assert_eq!(ColorOrder::from_name("Grb"), Some(ColorOrder::Grb));
    assert_eq!(ColorOrder::from_name("RGBW"), None);
    assert_eq!(ColorOrder::Brg.to_string(), "BRG");
    assert_eq!(ColorOrder::default(), ColorOrder::Rgb);
}
