//! The single failure type returned at every API boundary. Every operation
//! either fully succeeds or returns one of these; there are no partial
//! results.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("width and height must both be nonzero, got {width}x{height}"))]
    InvalidDimensions { width: u32, height: u32 },

    #[snafu(display("channels must be 3 or 4, got {channels}"))]
    InvalidChannels { channels: u8 },

    #[snafu(display("colorspace must be at most {max}, got {colorspace}"))]
    InvalidColorSpace { colorspace: u8, max: u8 },

    #[snafu(display("forced_channels must be 0, 3, or 4, got {channels}"))]
    InvalidForcedChannels { channels: u8 },

    #[snafu(display(
        "pixel buffer length does not match width * height * channels: expected {expected}, got {actual}"
    ))]
    InvalidPixelBufferLength { expected: usize, actual: usize },

    #[snafu(display("output buffer too small: need {required} bytes, got {size}"))]
    OutputBufferTooSmall { size: usize, required: usize },

    #[snafu(display("image dimensions overflow usize arithmetic"))]
    DimensionsOverflow,

    #[snafu(display("input is missing the qoif magic bytes"))]
    InvalidMagic,

    #[snafu(display("input is shorter than the header and padding require"))]
    UnexpectedEof,

    /// Only constructible with the `std` feature, where encoding can target
    /// an arbitrary [`std::io::Write`](std::io::Write).
    #[cfg(feature = "std")]
    #[snafu(display("I/O error while encoding"))]
    Io { source: std::io::Error },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
