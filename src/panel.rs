//! Panel geometry, LED mapping, and the text export used by host tooling.
//!
//! - [`layout`] holds [`PanelConfig`]: size, rotation, flips, and wiring, and the
//!   `(x, y)` → LED index mapping every renderer goes through.
//! - [`export`] writes and parses the `META:`/`FRAME:` lines a host visualizer
//!   reads from the serial console.

pub mod export;
pub mod layout;

#[doc(inline)]
pub use layout::{
    CALIBRATION_BOTTOM_LEFT, CALIBRATION_BOTTOM_RIGHT, CALIBRATION_TOP_LEFT,
    CALIBRATION_TOP_RIGHT, PanelConfig, Rotation, Wiring,
};
