#![allow(missing_docs)]
//! Host-level tests for the panel coordinate mapping.

use led_panel_games::Error;
use led_panel_games::frame::{BLACK, Frame1d};
use led_panel_games::panel::{
    CALIBRATION_BOTTOM_LEFT, CALIBRATION_BOTTOM_RIGHT, CALIBRATION_TOP_LEFT,
    CALIBRATION_TOP_RIGHT, PanelConfig, Rotation, Wiring,
};
use serde::Serialize;

const ROTATIONS: [Rotation; 4] = [
    Rotation::Deg0,
    Rotation::Deg90,
    Rotation::Deg180,
    Rotation::Deg270,
];
const WIRINGS: [Wiring; 2] = [Wiring::Progressive, Wiring::Serpentine];

fn scan(panel: &PanelConfig) -> Vec<usize> {
    panel
        .xy_iter()
        .map(|(x_index, y_index)| panel.xy_to_index(x_index, y_index))
        .collect()
}

fn all_variants(width: usize, height: usize, rotations: &[Rotation]) -> Vec<PanelConfig> {
    let mut panels = Vec::new();
    for &rotation in rotations {
        for flip_x in [false, true] {
            for flip_y in [false, true] {
                for wiring in WIRINGS {
                    panels.push(
                        PanelConfig::new(width, height)
                            .with_rotation(rotation)
                            .with_flip_x(flip_x)
                            .with_flip_y(flip_y)
                            .with_wiring(wiring),
                    );
                }
            }
        }
    }
    panels
}

#[test]
fn progressive_is_row_major() {
    const PANEL: PanelConfig = PanelConfig::new(4, 3);
    assert_eq!(scan(&PANEL), (0..12).collect::<Vec<_>>());
}

#[test]
fn serpentine_reverses_odd_rows() {
    const PANEL: PanelConfig = PanelConfig::serpentine(4, 3);
    assert_eq!(scan(&PANEL), [0, 1, 2, 3, 7, 6, 5, 4, 8, 9, 10, 11]);
}

#[test]
fn serpentine_8x8_second_row_starts_at_the_right() {
    const PANEL: PanelConfig = PanelConfig::serpentine(8, 8);
    assert_eq!(PANEL.xy_to_index(0, 0), 0);
    assert_eq!(PANEL.xy_to_index(0, 1), 15);
    assert_eq!(PANEL.xy_to_index(7, 1), 8);
}

#[test]
fn rotate_180_swaps_opposite_corners() {
    const PANEL: PanelConfig = PanelConfig::new(8, 8).with_rotation(Rotation::Deg180);
    assert_eq!(PANEL.xy_to_index(0, 0), 63);
    assert_eq!(PANEL.xy_to_index(7, 7), 0);
    assert_eq!(PANEL.xy_to_index(7, 0), 56);
}

#[test]
fn quarter_turns_match_expected() {
    const CW: PanelConfig = PanelConfig::new(3, 3).with_rotation(Rotation::Deg90);
    assert_eq!(scan(&CW), [2, 5, 8, 1, 4, 7, 0, 3, 6]);

    const CCW: PanelConfig = PanelConfig::new(3, 3).with_rotation(Rotation::Deg270);
    assert_eq!(scan(&CCW), [6, 3, 0, 7, 4, 1, 8, 5, 2]);
}

#[test]
fn flips_mirror_each_axis() {
    const FLIP_X: PanelConfig = PanelConfig::new(4, 2).with_flip_x(true);
    assert_eq!(scan(&FLIP_X), [3, 2, 1, 0, 7, 6, 5, 4]);

    const FLIP_Y: PanelConfig = PanelConfig::new(4, 2).with_flip_y(true);
    assert_eq!(scan(&FLIP_Y), [4, 5, 6, 7, 0, 1, 2, 3]);
}

#[test]
fn flip_applies_after_rotation() {
    // A quarter turn followed by a horizontal mirror is a transpose.
    const PANEL: PanelConfig = PanelConfig::new(3, 3)
        .with_rotation(Rotation::Deg90)
        .with_flip_x(true);
    assert_eq!(scan(&PANEL), [0, 3, 6, 1, 4, 7, 2, 5, 8]);
}

#[test]
fn serpentine_uses_the_transformed_row() {
    const PANEL: PanelConfig = PanelConfig::serpentine(4, 2).with_flip_y(true);
    assert_eq!(scan(&PANEL), [7, 6, 5, 4, 0, 1, 2, 3]);
}

#[test]
fn out_of_range_coordinates_are_clamped() {
    const PANEL: PanelConfig = PanelConfig::new(8, 8);
    assert_eq!(PANEL.xy_to_index(100, 3), PANEL.xy_to_index(7, 3));
    assert_eq!(PANEL.xy_to_index(2, 100), PANEL.xy_to_index(2, 7));
    assert_eq!(PANEL.xy_to_index(usize::MAX, usize::MAX), 63);
}

#[test]
fn square_panels_map_one_to_one() {
    for panel in all_variants(8, 8, &ROTATIONS) {
        let mut indices = scan(&panel);
        indices.sort_unstable();
        assert_eq!(indices, (0..64).collect::<Vec<_>>(), "{panel:?}");
    }
}

#[test]
fn non_square_half_turns_map_one_to_one() {
    for panel in all_variants(5, 3, &[Rotation::Deg0, Rotation::Deg180]) {
        let mut indices = scan(&panel);
        indices.sort_unstable();
        assert_eq!(indices, (0..15).collect::<Vec<_>>(), "{panel:?}");
    }
}

#[test]
fn non_square_quarter_turns_stay_in_range() {
    for panel in all_variants(4, 2, &[Rotation::Deg90, Rotation::Deg270]) {
        assert!(scan(&panel).iter().all(|&index| index < 8), "{panel:?}");
    }
    for panel in all_variants(2, 5, &[Rotation::Deg90, Rotation::Deg270]) {
        assert!(scan(&panel).iter().all(|&index| index < 10), "{panel:?}");
    }
}

#[test]
fn mapping_is_repeatable() {
    let panel = PanelConfig::serpentine(6, 4)
        .with_rotation(Rotation::Deg180)
        .with_flip_x(true);
    assert_eq!(scan(&panel), scan(&panel));
}

#[test]
fn single_cell_panel_maps_everything_to_zero() {
    for panel in all_variants(1, 1, &ROTATIONS) {
        assert_eq!(panel.xy_to_index(0, 0), 0);
        assert_eq!(panel.xy_to_index(5, 9), 0);
    }
}

#[test]
#[should_panic(expected = "width and height must be positive")]
fn new_panics_on_zero_width() {
    let _ = PanelConfig::new(0, 8);
}

#[test]
#[should_panic(expected = "width and height must be positive")]
fn new_panics_on_zero_height() {
    let _ = PanelConfig::serpentine(8, 0);
}

#[test]
fn rotation_converts_from_degrees() {
    for rotation in ROTATIONS {
        assert_eq!(Rotation::try_from(rotation.degrees()), Ok(rotation));
    }
    assert_eq!(
        Rotation::try_from(45_u16),
        Err(Error::InvalidRotation { degrees: 45 })
    );
    assert_eq!(
        Rotation::try_from(360_u16),
        Err(Error::InvalidRotation { degrees: 360 })
    );
}

#[test]
fn accessors_report_the_configuration() {
    const PANEL: PanelConfig = PanelConfig::serpentine(16, 8)
        .with_rotation(Rotation::Deg270)
        .with_flip_y(true);
    assert_eq!(PANEL.width(), 16);
    assert_eq!(PANEL.height(), 8);
    assert_eq!(PANEL.len(), 128);
    assert!(!PANEL.is_empty());
    assert_eq!(PANEL.rotation(), Rotation::Deg270);
    assert!(!PANEL.flip_x());
    assert!(PANEL.flip_y());
    assert_eq!(PANEL.wiring(), Wiring::Serpentine);
}

#[test]
fn config_round_trips_through_postcard() {
    let panel = PanelConfig::serpentine(16, 16)
        .with_rotation(Rotation::Deg90)
        .with_flip_x(true);
    let mut buffer = [0_u8; 32];
    let bytes = postcard::to_slice(&panel, &mut buffer).expect("config must serialize");
    let decoded: PanelConfig = postcard::from_bytes(bytes).expect("config must deserialize");
    assert_eq!(decoded, panel);
}

#[derive(Serialize)]
struct Stored {
    width: usize,
    height: usize,
    rotation: Rotation,
    flip_x: bool,
    flip_y: bool,
    wiring: Wiring,
}

fn decode_stored(width: usize, height: usize) -> Result<PanelConfig, postcard::Error> {
    let stored = Stored {
        width,
        height,
        rotation: Rotation::Deg0,
        flip_x: false,
        flip_y: false,
        wiring: Wiring::Progressive,
    };
    let mut buffer = [0_u8; 32];
    let bytes = postcard::to_slice(&stored, &mut buffer).expect("stored config must serialize");
    postcard::from_bytes::<PanelConfig>(bytes)
}

#[test]
fn deserialize_rejects_empty_panel() {
    assert!(decode_stored(0, 8).is_err());
}

#[test]
fn deserialize_rejects_unaddressable_panel() {
    assert!(decode_stored(usize::MAX, 2).is_err());
    let panel = decode_stored(3, 2).expect("small panel must deserialize");
    assert_eq!(panel, PanelConfig::new(3, 2));
}

#[test]
#[should_panic(expected = "width * height must fit in usize")]
fn new_panics_when_led_count_overflows() {
    let _ = PanelConfig::new(usize::MAX, 2);
}

#[test]
fn calibration_lights_the_four_corners() {
    const PANEL: PanelConfig = PanelConfig::serpentine(8, 8);
    let mut frame = Frame1d::<64>::filled(CALIBRATION_TOP_RIGHT);
    PANEL.draw_calibration(&mut frame);

    assert_eq!(frame[0], CALIBRATION_TOP_LEFT);
    assert_eq!(frame[7], CALIBRATION_TOP_RIGHT);
    // Row 7 runs right-to-left.
    assert_eq!(frame[63], CALIBRATION_BOTTOM_LEFT);
    assert_eq!(frame[56], CALIBRATION_BOTTOM_RIGHT);
    assert_eq!(frame.iter().filter(|&&color| color != BLACK).count(), 4);
}

#[test]
#[should_panic(expected = "frame length must equal panel width * height")]
fn calibration_panics_on_wrong_frame_length() {
    let mut frame = Frame1d::<16>::new();
    PanelConfig::new(8, 8).draw_calibration(&mut frame);
}
