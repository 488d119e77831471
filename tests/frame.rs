#![allow(missing_docs)]
//! Host-level tests for frame buffers and their embedded-graphics support.

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use led_panel_games::frame::{BLACK, Frame1d, Frame2d, RGB8, colors, rgb8_to_rgb888, rgb888_to_rgb8};
use led_panel_games::panel::{PanelConfig, Rotation};

type Frame = Frame2d<6, 4>;

const PANEL: PanelConfig = PanelConfig::serpentine(6, 4).with_rotation(Rotation::Deg180);

#[test]
fn rgb888_to_rgb8_matches_rgb8() {
    assert_eq!(rgb888_to_rgb8(Rgb888::new(16, 32, 48)), RGB8::new(16, 32, 48));
}

#[test]
fn rgb8_to_rgb888_matches_rgb888() {
    assert_eq!(rgb8_to_rgb888(RGB8::new(16, 32, 48)), Rgb888::new(16, 32, 48));
}

#[test]
fn rectangle_outline_lights_the_border() {
    let mut frame = Frame::new();
    Rectangle::new(Point::zero(), frame.size())
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::RED, 1))
        .draw(&mut frame)
        .expect("rectangle draw must succeed");

    for y_index in 0..Frame::HEIGHT {
        for x_index in 0..Frame::WIDTH {
            let on_border = x_index == 0
                || y_index == 0
                || x_index == Frame::WIDTH - 1
                || y_index == Frame::HEIGHT - 1;
            let expected = if on_border { colors::RED } else { BLACK };
            assert_eq!(frame[(x_index, y_index)], expected, "({x_index}, {y_index})");
        }
    }
}

#[test]
fn off_panel_pixels_are_clipped() {
    let mut frame = Frame::new();
    let pixels = [
        Pixel(Point::new(-1, 0), Rgb888::GREEN),
        Pixel(Point::new(6, 0), Rgb888::GREEN),
        Pixel(Point::new(0, 4), Rgb888::GREEN),
        Pixel(Point::new(5, 3), Rgb888::GREEN),
    ];
    frame.draw_iter(pixels).expect("drawing cannot fail");

    assert_eq!(frame[(5, 3)], rgb888_to_rgb8(Rgb888::GREEN));
    let lit = frame.0.iter().flatten().filter(|&&color| color != BLACK).count();
    assert_eq!(lit, 1);
}

#[test]
fn logical_frame_round_trips_through_strip_order() {
    let mut frame_2d = Frame::new();
    frame_2d[(0, 0)] = colors::CYAN;
    frame_2d[(5, 0)] = colors::RED;
    frame_2d[(2, 3)] = colors::BLUE;

    let mut strip = Frame1d::<24>::new();
    PANEL.write_frame2d(&frame_2d, &mut strip);

    // Rotated to (5, 3); row 3 runs right-to-left.
    assert_eq!(strip[18], colors::CYAN);
    assert_eq!(strip[PANEL.xy_to_index(5, 0)], colors::RED);
    assert_eq!(strip[PANEL.xy_to_index(2, 3)], colors::BLUE);

    let read_back: Frame = PANEL.read_frame2d(&strip);
    assert_eq!(read_back, frame_2d);
}

#[test]
fn frame1d_helpers_fill_and_clear() {
    let mut frame = Frame1d::<4>::filled(colors::WHITE);
    assert_eq!(Frame1d::<4>::LEN, 4);
    assert!(frame.iter().all(|&color| color == colors::WHITE));

    frame.fill(colors::RED);
    assert_eq!(frame.as_slice(), &[colors::RED; 4]);

    frame.clear();
    assert_eq!(frame, Frame1d::default());

    let array: [RGB8; 4] = Frame1d::from([colors::BLUE; 4]).into();
    assert_eq!(array, [colors::BLUE; 4]);
}

#[test]
#[should_panic(expected = "x_index must be within width")]
fn index_panics_off_panel() {
    let frame = Frame::new();
    let _ = frame[(6, 0)];
}

#[test]
#[should_panic(expected = "width must match the panel")]
fn write_frame2d_panics_on_size_mismatch() {
    let frame_2d = Frame2d::<4, 4>::new();
    let mut strip = Frame1d::<16>::new();
    PANEL.write_frame2d(&frame_2d, &mut strip);
}
