//! Text records that let a host tool follow what the panel shows.
//!
//! A session starts with one metadata line and continues with one line per frame:
//!
//! ```text
//! META:W=8,H=8,ORDER=xy,WIRING=serpentine,ROT=0,FLIPX=0,FLIPY=0,COLOR=RGB
//! FRAME:000000,FF0000,...,
//! ```
//!
//! Frame tokens are `RRGGBB` in upper-case hex, each followed by a comma, listed in
//! logical scan order (rows top to bottom, each row left to right). Each pixel is
//! read from the frame buffer at [`PanelConfig::xy_to_index`], so the stream is
//! independent of how the panel is wired.

use core::fmt;

use crate::frame::RGB8;
use crate::panel::layout::check_size;
use crate::panel::{PanelConfig, Rotation, Wiring};
use crate::{Error, Result};

/// Prefix of the metadata line.
pub const META_PREFIX: &str = "META:";
/// Prefix of each frame line.
pub const FRAME_PREFIX: &str = "FRAME:";

/// Byte order the LED chips expect. Reported in the metadata only; frames always
/// carry `RRGGBB`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorOrder {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Green, red, blue (most WS2812 parts).
    Grb,
    /// Blue, red, green.
    Brg,
    /// Green, blue, red.
    Gbr,
    /// Red, blue, green.
    Rbg,
    /// Blue, green, red.
    Bgr,
}

impl ColorOrder {
    const ALL: [Self; 6] = [
        Self::Rgb,
        Self::Grb,
        Self::Brg,
        Self::Gbr,
        Self::Rbg,
        Self::Bgr,
    ];

    /// Upper-case name, e.g. `"GRB"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => "RGB",
            Self::Grb => "GRB",
            Self::Brg => "BRG",
            Self::Gbr => "GBR",
            Self::Rbg => "RBG",
            Self::Bgr => "BGR",
        }
    }

    /// Look up a color order by name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ColorOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The metadata record: panel configuration plus the strip's color order.
///
/// `Display` writes the `META:` line without a line terminator.
///
/// ```rust
/// use led_panel_games::panel::{PanelConfig, export::{ColorOrder, PanelMeta}};
///
/// let meta = PanelMeta::new(PanelConfig::serpentine(8, 8), ColorOrder::Rgb);
/// let line = format!("{meta}");
/// assert_eq!(
///     line,
///     "META:W=8,H=8,ORDER=xy,WIRING=serpentine,ROT=0,FLIPX=0,FLIPY=0,COLOR=RGB"
/// );
/// assert_eq!(PanelMeta::parse(&line).unwrap(), meta);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelMeta {
    /// Geometry and wiring.
    pub panel: PanelConfig,
    /// Color order of the physical strip.
    pub color_order: ColorOrder,
}

impl PanelMeta {
    /// Bundle a panel with its color order.
    #[must_use]
    pub const fn new(panel: PanelConfig, color_order: ColorOrder) -> Self {
        Self { panel, color_order }
    }

    /// Parse a `META:` line.
    ///
    /// Keys may appear in any order and any case; unknown keys are ignored. `W` and
    /// `H` are required. Missing optional keys take their defaults: progressive
    /// wiring, no rotation, no flips, RGB.
    ///
    /// # Errors
    ///
    /// [`Error::MissingMetaPrefix`] if the line is not a metadata line,
    /// [`Error::MalformedMeta`] for a missing size or an unreadable value, and
    /// [`Error::EmptyPanel`] for a zero width or height, and [`Error::PanelTooLarge`]
    /// when `W * H` overflows.
    pub fn parse(line: &str) -> Result<Self> {
        let body = line
            .trim()
            .strip_prefix(META_PREFIX)
            .ok_or(Error::MissingMetaPrefix)?;

        let mut width = None;
        let mut height = None;
        let mut rotation = Rotation::Deg0;
        let mut flip_x = false;
        let mut flip_y = false;
        let mut wiring = Wiring::Progressive;
        let mut color_order = ColorOrder::Rgb;

        for part in body.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            if key.eq_ignore_ascii_case("W") {
                width = Some(value.parse::<usize>().map_err(|_| malformed("W"))?);
            } else if key.eq_ignore_ascii_case("H") {
                height = Some(value.parse::<usize>().map_err(|_| malformed("H"))?);
            } else if key.eq_ignore_ascii_case("ORDER") {
                // Only logical scan order is produced by this crate.
                if !value.eq_ignore_ascii_case("xy") {
                    return Err(malformed("ORDER"));
                }
            } else if key.eq_ignore_ascii_case("WIRING") {
                wiring = if value.eq_ignore_ascii_case(Wiring::Serpentine.as_str()) {
                    Wiring::Serpentine
                } else if value.eq_ignore_ascii_case(Wiring::Progressive.as_str()) {
                    Wiring::Progressive
                } else {
                    return Err(malformed("WIRING"));
                };
            } else if key.eq_ignore_ascii_case("ROT") {
                rotation = value
                    .parse::<u16>()
                    .ok()
                    .and_then(|degrees| Rotation::try_from(degrees).ok())
                    .ok_or_else(|| malformed("ROT"))?;
            } else if key.eq_ignore_ascii_case("FLIPX") {
                flip_x = parse_flag(value).ok_or_else(|| malformed("FLIPX"))?;
            } else if key.eq_ignore_ascii_case("FLIPY") {
                flip_y = parse_flag(value).ok_or_else(|| malformed("FLIPY"))?;
            } else if key.eq_ignore_ascii_case("COLOR") {
                color_order = ColorOrder::from_name(value).ok_or_else(|| malformed("COLOR"))?;
            }
        }

        let width = width.ok_or_else(|| malformed("W"))?;
        let height = height.ok_or_else(|| malformed("H"))?;
        check_size(width, height)?;

        let panel = PanelConfig::new(width, height)
            .with_rotation(rotation)
            .with_flip_x(flip_x)
            .with_flip_y(flip_y)
            .with_wiring(wiring);
        Ok(Self::new(panel, color_order))
    }
}

impl fmt::Display for PanelMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let panel = &self.panel;
        write!(
            f,
            "{META_PREFIX}W={},H={},ORDER=xy,WIRING={},ROT={},FLIPX={},FLIPY={},COLOR={}",
            panel.width(),
            panel.height(),
            panel.wiring(),
            panel.rotation().degrees(),
            u8::from(panel.flip_x()),
            u8::from(panel.flip_y()),
            self.color_order,
        )
    }
}

const fn malformed(key: &'static str) -> Error {
    Error::MalformedMeta { key }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

/// One frame record. `Display` writes the `FRAME:` line without a line terminator.
///
/// Build it with [`FrameCsv::new`] from the panel and the frame buffer pixels.
#[derive(Clone, Copy, Debug)]
pub struct FrameCsv<'a> {
    panel: &'a PanelConfig,
    pixels: &'a [RGB8],
}

impl<'a> FrameCsv<'a> {
    /// Describe `pixels` (in strip order) as shown on `panel`.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len()` is not `width * height`.
    #[must_use]
    pub fn new(panel: &'a PanelConfig, pixels: &'a [RGB8]) -> Self {
        panel.assert_frame_len(pixels.len());
        Self { panel, pixels }
    }
}

impl fmt::Display for FrameCsv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(FRAME_PREFIX)?;
        for (x, y) in self.panel.xy_iter() {
            let color = self
                .pixels
                .get(self.panel.xy_to_index(x, y))
                .copied()
                .unwrap_or_default();
            write!(f, "{:02X}{:02X}{:02X},", color.r, color.g, color.b)?;
        }
        Ok(())
    }
}

/// Parse a frame line and store its pixels into `pixels` (strip order) through
/// the panel mapping, so parsing a line written by [`FrameCsv`] restores the frame.
///
/// The `FRAME:` prefix is optional, blank or invalid tokens are skipped, and
/// anything from `STATE:` on is ignored.
///
/// # Errors
///
/// [`Error::BufferLengthMismatch`] if `pixels` does not fit the panel, and
/// [`Error::PixelCountMismatch`] unless the line holds exactly one valid token per
/// cell. `pixels` is left untouched on error.
pub fn parse_frame_csv(panel: &PanelConfig, line: &str, pixels: &mut [RGB8]) -> Result<()> {
    if pixels.len() != panel.len() {
        return Err(Error::BufferLengthMismatch {
            expected: panel.len(),
            actual: pixels.len(),
        });
    }

    let line = line.trim();
    let line = line.strip_prefix(FRAME_PREFIX).unwrap_or(line);
    let line = line.split_once("STATE:").map_or(line, |(frame, _)| frame);
    let tokens = || line.split(',').filter_map(rgb_from_hex);

    let actual = tokens().count();
    if actual != panel.len() {
        return Err(Error::PixelCountMismatch {
            expected: panel.len(),
            actual,
        });
    }

    for ((x, y), color) in panel.xy_iter().zip(tokens()) {
        if let Some(pixel) = pixels.get_mut(panel.xy_to_index(x, y)) {
            *pixel = color;
        }
    }
    Ok(())
}

/// Parse one `RRGGBB` token (an optional leading `#` is allowed).
#[must_use]
pub fn rgb_from_hex(token: &str) -> Option<RGB8> {
    let token = token.trim();
    let token = token.strip_prefix('#').unwrap_or(token);
    if token.len() != 6 || !token.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: core::ops::Range<usize>| {
        token
            .get(range)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
    };
    Some(RGB8::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Write the `META:` line, terminated by `'\n'`.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn write_meta<Out: fmt::Write>(
    out: &mut Out,
    panel: &PanelConfig,
    color_order: ColorOrder,
) -> fmt::Result {
    writeln!(out, "{}", PanelMeta::new(*panel, color_order))
}

/// Write one `FRAME:` line for `pixels` (strip order), terminated by `'\n'`.
///
/// # Errors
///
/// Propagates errors from `out`.
///
/// # Panics
///
/// Panics if `pixels.len()` is not `width * height`.
pub fn write_frame_csv<Out: fmt::Write>(
    out: &mut Out,
    panel: &PanelConfig,
    pixels: &[RGB8],
) -> fmt::Result {
    writeln!(out, "{}", FrameCsv::new(panel, pixels))
}

/// Parse a `META:` line. Same as [`PanelMeta::parse`].
///
/// # Errors
///
/// See [`PanelMeta::parse`].
pub fn parse_meta(line: &str) -> Result<PanelMeta> {
    PanelMeta::parse(line)
}
