use derive_more::{Display, Error};

/// Errors returned by the fallible edges of the crate: parsing diagnostic lines
/// and converting configuration values.
///
/// The simulations themselves never fail; out-of-range input is clamped or ignored.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Rotation must be 0, 90, 180 or 270 degrees.
    #[display("rotation must be 0, 90, 180 or 270 degrees, got {degrees}")]
    InvalidRotation {
        /// The rejected value.
        degrees: u16,
    },

    /// A panel must have at least one row and one column.
    #[display("panel width and height must be positive, got {width}x{height}")]
    EmptyPanel {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// The panel has more LEDs than can be addressed.
    #[display("panel of {width}x{height} LEDs is too large to address")]
    PanelTooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// The line does not start with `META:`.
    #[display("metadata line must start with `META:`")]
    MissingMetaPrefix,

    /// A metadata key was missing or its value could not be understood.
    #[display("metadata field `{key}` is missing or malformed")]
    MalformedMeta {
        /// The offending key, upper-case.
        key: &'static str,
    },

    /// A frame line did not hold exactly one pixel per panel cell.
    #[display("frame line has {actual} pixels, expected {expected}")]
    PixelCountMismatch {
        /// `width * height` of the panel.
        expected: usize,
        /// Valid `RRGGBB` tokens found.
        actual: usize,
    },

    /// The destination buffer length does not match the panel.
    #[display("buffer holds {actual} pixels but the panel has {expected}")]
    BufferLengthMismatch {
        /// `width * height` of the panel.
        expected: usize,
        /// Length of the buffer supplied.
        actual: usize,
    },
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
