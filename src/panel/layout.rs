//! Runtime description of panel geometry and wiring.
//!
//! See [`PanelConfig`] for the mapping rules and examples.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::frame::{BLACK, Frame1d, Frame2d, RGB8};
use crate::{Error, Result};

/// Clockwise rotation applied to logical coordinates before flipping and wiring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// Quarter turn clockwise.
    Deg90,
    /// Half turn.
    Deg180,
    /// Three quarter turns clockwise.
    Deg270,
}

impl Rotation {
    /// Rotation in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = Error;

    fn try_from(degrees: u16) -> Result<Self> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            _ => Err(Error::InvalidRotation { degrees }),
        }
    }
}

/// Order in which the LED strip visits the cells of each row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wiring {
    /// Every row runs left-to-right.
    #[default]
    Progressive,
    /// Even rows run left-to-right, odd rows right-to-left.
    Serpentine,
}

impl Wiring {
    /// Lower-case name used in diagnostic metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Progressive => "progressive",
            Self::Serpentine => "serpentine",
        }
    }
}

impl fmt::Display for Wiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Corner marker colors drawn by [`PanelConfig::draw_calibration`].
pub const CALIBRATION_TOP_LEFT: RGB8 = RGB8::new(0, 100, 0);
/// Top-right corner marker.
pub const CALIBRATION_TOP_RIGHT: RGB8 = RGB8::new(100, 0, 0);
/// Bottom-left corner marker.
pub const CALIBRATION_BOTTOM_LEFT: RGB8 = RGB8::new(0, 0, 100);
/// Bottom-right corner marker.
pub const CALIBRATION_BOTTOM_RIGHT: RGB8 = RGB8::new(100, 100, 100);

/// Panel geometry and wiring: width, height, rotation, flips, and row wiring.
///
/// `PanelConfig` maps a logical `(x, y)` cell to the index of the LED that shows it
/// (see [`xy_to_index`](Self::xy_to_index)). Coordinates use a screen-style
/// convention: `(0, 0)` is the top-left corner, `x` increases to the right, and `y`
/// increases downward.
///
/// The configuration is built once (usually as a `const`) and never changes.
///
/// # Example
///
/// ```rust
/// use led_panel_games::panel::{PanelConfig, Rotation};
///
/// const PANEL: PanelConfig = PanelConfig::serpentine(8, 8);
/// // Row 1 is wired right-to-left.
/// assert_eq!(PANEL.xy_to_index(0, 1), 15);
///
/// const UPSIDE_DOWN: PanelConfig = PanelConfig::new(8, 8).with_rotation(Rotation::Deg180);
/// assert_eq!(UPSIDE_DOWN.xy_to_index(0, 0), 63);
/// ```
///
/// ```text
/// Serpentine 4×3:
///   LED0  LED1  LED2  LED3
///   LED7  LED6  LED5  LED4
///   LED8  LED9  LED10 LED11
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPanelConfig")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    width: usize,
    height: usize,
    rotation: Rotation,
    flip_x: bool,
    flip_y: bool,
    wiring: Wiring,
}

/// Unvalidated form used by `serde`; converted with [`PanelConfig::try_from`].
#[derive(Clone, Copy, Debug, Deserialize)]
struct RawPanelConfig {
    width: usize,
    height: usize,
    #[serde(default)]
    rotation: Rotation,
    #[serde(default)]
    flip_x: bool,
    #[serde(default)]
    flip_y: bool,
    #[serde(default)]
    wiring: Wiring,
}

impl TryFrom<RawPanelConfig> for PanelConfig {
    type Error = Error;

    fn try_from(raw: RawPanelConfig) -> Result<Self> {
        check_size(raw.width, raw.height)?;
        Ok(Self {
            width: raw.width,
            height: raw.height,
            rotation: raw.rotation,
            flip_x: raw.flip_x,
            flip_y: raw.flip_y,
            wiring: raw.wiring,
        })
    }
}

/// Checks that a `width` × `height` panel is non-empty and its LED count fits in `usize`.
pub(crate) const fn check_size(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::EmptyPanel { width, height });
    }
    if width.checked_mul(height).is_none() {
        return Err(Error::PanelTooLarge { width, height });
    }
    Ok(())
}

impl PanelConfig {
    /// Progressive, unrotated, unflipped panel of `width` columns and `height` rows.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero, or if `width * height` overflows.
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "width and height must be positive");
        assert!(
            width.checked_mul(height).is_some(),
            "width * height must fit in usize"
        );
        Self {
            width,
            height,
            rotation: Rotation::Deg0,
            flip_x: false,
            flip_y: false,
            wiring: Wiring::Progressive,
        }
    }

    /// Serpentine-wired panel (odd rows reversed), otherwise like [`new`](Self::new).
    #[must_use]
    pub const fn serpentine(width: usize, height: usize) -> Self {
        Self::new(width, height).with_wiring(Wiring::Serpentine)
    }

    /// Same panel with a different rotation.
    #[must_use]
    pub const fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    /// Same panel with horizontal mirroring on or off.
    #[must_use]
    pub const fn with_flip_x(self, flip_x: bool) -> Self {
        Self { flip_x, ..self }
    }

    /// Same panel with vertical mirroring on or off.
    #[must_use]
    pub const fn with_flip_y(self, flip_y: bool) -> Self {
        Self { flip_y, ..self }
    }

    /// Same panel with different row wiring.
    #[must_use]
    pub const fn with_wiring(self, wiring: Wiring) -> Self {
        Self { wiring, ..self }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of LEDs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always `false`: a panel has at least one LED.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Clockwise rotation.
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Whether columns are mirrored.
    #[must_use]
    pub const fn flip_x(&self) -> bool {
        self.flip_x
    }

    /// Whether rows are mirrored.
    #[must_use]
    pub const fn flip_y(&self) -> bool {
        self.flip_y
    }

    /// Row wiring.
    #[must_use]
    pub const fn wiring(&self) -> Wiring {
        self.wiring
    }

    /// Map logical `(x, y)` to the LED index that shows it.
    ///
    /// 1. `x` and `y` are clamped onto the panel.
    /// 2. The rotation is applied clockwise, using the unrotated width and height.
    /// 3. `flip_x` and `flip_y` mirror the rotated coordinates.
    /// 4. Serpentine wiring reverses odd rows.
    ///
    /// The result is always `< self.len()`. On square panels (and for 0°/180° on any
    /// panel) every cell gets a distinct index. Quarter turns of a non-square panel
    /// push some cells off the panel; those are pulled back onto the nearest edge.
    #[must_use]
    pub const fn xy_to_index(&self, x: usize, y: usize) -> usize {
        let max_x = self.width - 1;
        let max_y = self.height - 1;
        let x = if x > max_x { max_x } else { x };
        let y = if y > max_y { max_y } else { y };

        let (x, y) = match self.rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (max_x.saturating_sub(y), x),
            Rotation::Deg180 => (max_x - x, max_y - y),
            Rotation::Deg270 => (y, max_y.saturating_sub(x)),
        };
        let x = if x > max_x { max_x } else { x };
        let y = if y > max_y { max_y } else { y };

        let x = if self.flip_x { max_x - x } else { x };
        let y = if self.flip_y { max_y - y } else { y };

        let x = match self.wiring {
            Wiring::Serpentine if y % 2 == 1 => max_x - x,
            Wiring::Serpentine | Wiring::Progressive => x,
        };
        y * self.width + x
    }

    /// Every `(x, y)` on the panel in scan order: rows top to bottom, each row left
    /// to right.
    pub fn xy_iter(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// Panics unless `frame_len` matches this panel.
    pub(crate) const fn assert_frame_len(&self, frame_len: usize) {
        assert!(
            frame_len == self.len(),
            "frame length must equal panel width * height"
        );
    }

    /// Clear `frame` and light the four corners with the calibration colors.
    ///
    /// Top-left is green, top-right red, bottom-left blue, and bottom-right white.
    /// If the panel is mounted or wired differently than configured, the markers
    /// show up in the wrong corners.
    ///
    /// # Panics
    ///
    /// Panics if `N` is not `width * height`.
    pub fn draw_calibration<const N: usize>(&self, frame: &mut Frame1d<N>) {
        self.assert_frame_len(N);
        frame.clear();
        let max_x = self.width - 1;
        let max_y = self.height - 1;
        for (x, y, color) in [
            (0, 0, CALIBRATION_TOP_LEFT),
            (max_x, 0, CALIBRATION_TOP_RIGHT),
            (0, max_y, CALIBRATION_BOTTOM_LEFT),
            (max_x, max_y, CALIBRATION_BOTTOM_RIGHT),
        ] {
            frame[self.xy_to_index(x, y)] = color;
        }
    }

    /// Copy a logical frame into strip order.
    ///
    /// # Panics
    ///
    /// Panics if `W`/`H` differ from this panel or `N` is not `W * H`.
    pub fn write_frame2d<const W: usize, const H: usize, const N: usize>(
        &self,
        frame_2d: &Frame2d<W, H>,
        frame: &mut Frame1d<N>,
    ) {
        self.assert_dimensions(W, H);
        self.assert_frame_len(N);
        for y_index in 0..H {
            for x_index in 0..W {
                frame[self.xy_to_index(x_index, y_index)] = frame_2d[(x_index, y_index)];
            }
        }
    }

    /// Read a strip-order frame back into its logical view.
    ///
    /// # Panics
    ///
    /// Panics if `W`/`H` differ from this panel or `N` is not `W * H`.
    #[must_use]
    pub fn read_frame2d<const W: usize, const H: usize, const N: usize>(
        &self,
        frame: &Frame1d<N>,
    ) -> Frame2d<W, H> {
        self.assert_dimensions(W, H);
        self.assert_frame_len(N);
        let mut frame_2d = Frame2d::filled(BLACK);
        for y_index in 0..H {
            for x_index in 0..W {
                frame_2d[(x_index, y_index)] = frame[self.xy_to_index(x_index, y_index)];
            }
        }
        frame_2d
    }

    /// Panics unless the panel is `width` × `height`.
    pub(crate) const fn assert_dimensions(&self, width: usize, height: usize) {
        assert!(width == self.width, "width must match the panel");
        assert!(height == self.height, "height must match the panel");
    }
}
