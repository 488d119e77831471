//! Coordinate mapping and grid simulations for small NeoPixel-style (WS2812) LED panels.
//!
//! The crate turns logical `(x, y)` cells into indices of a physical LED buffer
//! (see [`panel::PanelConfig`]) and provides two simulations that render through
//! that mapping:
//!
//! - [`particles::ParticleSimulator`]: colored "falling stars" that fall under
//!   gravity and stack up at the bottom of the panel.
//! - [`snake::SnakeGame`]: the classic snake game on a wrapping board.
//!
//! Driving the LEDs, reading buttons or an IMU, and timing the frame loop are left
//! to the caller. A firmware loop typically looks like:
//!
//! ```rust
//! use led_panel_games::frame::Frame1d;
//! use led_panel_games::panel::PanelConfig;
//! use led_panel_games::particles::ParticleSimulator;
//! use rand::{SeedableRng, rngs::SmallRng};
//!
//! const PANEL: PanelConfig = PanelConfig::serpentine(8, 8);
//!
//! let mut stars: ParticleSimulator<SmallRng, 8, 8> =
//!     ParticleSimulator::new(PANEL, SmallRng::seed_from_u64(7));
//! let mut frame = Frame1d::<64>::new();
//! for _ in 0..100 {
//!     stars.tick();
//!     stars.render(&mut frame);
//!     // hand `frame` to the LED strip driver here
//! }
//! ```
//!
//! # Glossary
//!
//! - **Panel configuration:** immutable geometric/wiring description of a physical grid display.
//! - **Serpentine wiring:** alternate rows of the display are addressed in reverse horizontal order.
//! - **Settlement:** the tick at which a falling particle stops and becomes a static colored cell.
//! - **Toroidal wrap:** leaving one edge of the board re-enters from the opposite edge.
//! - **Slot:** fixed index of a particle within the fixed-capacity pool; settled cells record it.
#![cfg_attr(not(feature = "host"), no_std)]

// Must come first so the logging macros are visible to the modules below.
#[macro_use]
mod fmt;

mod error;
pub mod frame;
pub mod panel;
pub mod particles;
pub mod snake;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
