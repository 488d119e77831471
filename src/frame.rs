//! Pixel buffers shared by the simulations and the display driver.
//!
//! - [`Frame1d`] is the frame buffer proper: one color per LED, in the order the
//!   LEDs are wired. The simulations write into it through
//!   [`PanelConfig::xy_to_index`](crate::panel::PanelConfig::xy_to_index).
//! - [`Frame2d`] is a logical `(x, y)` view of the same panel. It implements the
//!   [`embedded-graphics`](https://docs.rs/embedded-graphics) `DrawTarget`, so a
//!   driver can draw overlays and then copy them into strip order with
//!   [`PanelConfig::write_frame2d`](crate::panel::PanelConfig::write_frame2d).

use core::{
    convert::Infallible,
    ops::{Deref, DerefMut, Index, IndexMut},
};

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

/// Predefined RGB color constants from the `smart_leds` crate.
#[doc(inline)]
pub use smart_leds::colors;

/// RGB color type stored in frames.
pub use smart_leds::RGB8;

/// Black, the color of a cleared pixel.
pub const BLACK: RGB8 = RGB8::new(0, 0, 0);

/// Convert an embedded-graphics color into the frame color type.
#[must_use]
pub fn rgb888_to_rgb8(color: Rgb888) -> RGB8 {
    RGB8::new(color.r(), color.g(), color.b())
}

/// Convert a frame color into an embedded-graphics color.
#[must_use]
pub const fn rgb8_to_rgb888(color: RGB8) -> Rgb888 {
    Rgb888::new(color.r, color.g, color.b)
}

/// Linear frame buffer: LED `i` of the strip shows `frame[i]`.
///
/// `N` must equal `width * height` of the panel it is rendered for; renderers
/// check this with an `assert!`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame1d<const N: usize>(pub [RGB8; N]);

impl<const N: usize> Frame1d<N> {
    /// Number of LEDs in this frame.
    pub const LEN: usize = N;

    /// Create a new blank (all black) frame.
    #[must_use]
    pub const fn new() -> Self {
        Self([BLACK; N])
    }

    /// Create a frame filled with a single color.
    #[must_use]
    pub const fn filled(color: RGB8) -> Self {
        Self([color; N])
    }

    /// Set every LED to black.
    pub fn clear(&mut self) {
        self.0.fill(BLACK);
    }

    /// Set every LED to `color`.
    pub fn fill(&mut self, color: RGB8) {
        self.0.fill(color);
    }

    /// The LEDs as a slice, in wiring order.
    #[must_use]
    pub const fn as_slice(&self) -> &[RGB8] {
        &self.0
    }

    /// The LEDs as a mutable slice, in wiring order.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [RGB8] {
        &mut self.0
    }
}

impl<const N: usize> Deref for Frame1d<N> {
    type Target = [RGB8; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> DerefMut for Frame1d<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<const N: usize> From<[RGB8; N]> for Frame1d<N> {
    fn from(array: [RGB8; N]) -> Self {
        Self(array)
    }
}

impl<const N: usize> From<Frame1d<N>> for [RGB8; N] {
    fn from(frame: Frame1d<N>) -> Self {
        frame.0
    }
}

impl<const N: usize> Default for Frame1d<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Logical view of a panel: `frame[(x, y)]` is the pixel in column `x`, row `y`,
/// with `(0, 0)` at the top-left.
///
/// ```rust
/// use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::{PrimitiveStyle, Rectangle}};
/// use led_panel_games::frame::{Frame2d, colors};
///
/// let mut frame = Frame2d::<8, 8>::new();
/// Rectangle::new(Point::new(0, 0), Size::new(8, 8))
///     .into_styled(PrimitiveStyle::with_stroke(Rgb888::RED, 1))
///     .draw(&mut frame)
///     .expect("drawing into a frame cannot fail");
/// frame[(3, 4)] = colors::CYAN;
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame2d<const W: usize, const H: usize>(pub [[RGB8; W]; H]);

impl<const W: usize, const H: usize> Frame2d<W, H> {
    /// Frame width in pixels (columns).
    pub const WIDTH: usize = W;
    /// Frame height in pixels (rows).
    pub const HEIGHT: usize = H;

    /// Create a new blank (all black) frame.
    #[must_use]
    pub const fn new() -> Self {
        Self([[BLACK; W]; H])
    }

    /// Create a frame filled with a single color.
    #[must_use]
    pub const fn filled(color: RGB8) -> Self {
        Self([[color; W]; H])
    }
}

impl<const W: usize, const H: usize> Index<(usize, usize)> for Frame2d<W, H> {
    type Output = RGB8;

    fn index(&self, (x_index, y_index): (usize, usize)) -> &Self::Output {
        assert!(x_index < W, "x_index must be within width");
        assert!(y_index < H, "y_index must be within height");
        &self.0[y_index][x_index]
    }
}

impl<const W: usize, const H: usize> IndexMut<(usize, usize)> for Frame2d<W, H> {
    fn index_mut(&mut self, (x_index, y_index): (usize, usize)) -> &mut Self::Output {
        assert!(x_index < W, "x_index must be within width");
        assert!(y_index < H, "y_index must be within height");
        &mut self.0[y_index][x_index]
    }
}

impl<const W: usize, const H: usize> Default for Frame2d<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> OriginDimensions for Frame2d<W, H> {
    fn size(&self) -> Size {
        Size::new(W as u32, H as u32)
    }
}

impl<const W: usize, const H: usize> DrawTarget for Frame2d<W, H> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            // Off-panel pixels are clipped.
            let (Ok(x_index), Ok(y_index)) = (usize::try_from(coord.x), usize::try_from(coord.y))
            else {
                continue;
            };
            if let Some(pixel) = self
                .0
                .get_mut(y_index)
                .and_then(|row| row.get_mut(x_index))
            {
                *pixel = rgb888_to_rgb8(color);
            }
        }
        Ok(())
    }
}
