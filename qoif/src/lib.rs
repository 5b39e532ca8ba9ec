//! qoif — a lossless raster image codec.
//!
//! # Format
//!
//! ## Header
//!
//! - 4-byte magic: `qoif`
//! - u32be width: > 0
//! - u32be height: > 0
//! - u8 channels: 3 (RGB) or 4 (RGBA)
//! - u8 colorspace: informational only, never consulted by the codec
//!
//! ## Stream format
//!
//! ```plain
//! .- QOI_OP_INDEX ----------.
//! |         Byte[0]         |
//! |  7  6  5  4  3  2  1  0 |
//! |-------+-----------------|
//! |  0  0 |      index      |
//! `-------------------------`
//! ```
//! - 2-bit tag `b00`
//! - 6-bit index into the 64-slot recency cache
//!
//!
//! ```plain
//! .- QOI_OP_DIFF -----------.
//! |         Byte[0]         |
//! |  7  6  5  4  3  2  1  0 |
//! |-------+-----+-----+-----|
//! |  0  1 |  dr |  dg |  db |
//! `-------------------------`
//! ```
//! - 2-bit tag `b01`
//! - 2-bit per-channel differences from the previous pixel, each biased by +2
//!   (actual range -2..1)
//!
//!
//! ```plain
//! .- QOI_OP_LUMA -------------------------------------.
//! |         Byte[0]         |         Byte[1]         |
//! |  7  6  5  4  3  2  1  0 |  7  6  5  4  3  2  1  0 |
//! |----+---------------------+-------------+-----------|
//! |  1  0 |   green diff    |   dr - dg   |  db - dg  |
//! `---------------------------------------------------`
//! ```
//! - 2-bit tag `b10`
//! - 6-bit green diff, biased by +32 (actual range -32..31)
//! - 4-bit red-minus-green and blue-minus-green diffs, each biased by +8
//!   (actual range -8..7)
//!
//!
//! ```plain
//! .- QOI_OP_RUN ------------.
//! |         Byte[0]         |
//! |  7  6  5  4  3  2  1  0 |
//! |-------+-----------------|
//! |  1  1 |       run       |
//! `-------------------------`
//! ```
//! - 2-bit tag `b11`
//! - 6-bit run length, biased by -1 (actual range 1..62); 62 and 63 are
//!   reserved for `QOI_OP_RGB`/`QOI_OP_RGBA`.
//!
//!
//! ```plain
//! .- QOI_OP_RGB --------------------------------.
//! | Byte[0]  | Byte[1] | Byte[2] | Byte[3] |
//! | 11111110 |    r    |    g    |    b    |
//! `-----------------------------------------------`
//! ```
//!
//! ```plain
//! .- QOI_OP_RGBA -------------------------------------------.
//! | Byte[0]  | Byte[1] | Byte[2] | Byte[3] | Byte[4] |
//! | 11111111 |    r    |    g    |    b    |    a    |
//! `------------------------------------------------------------`
//! ```
//!
//! A stream ends with 8 trailing zero bytes.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod consts;
pub mod decode;
pub mod encode;
pub mod error;
pub mod header;
pub mod pixel;
pub mod types;
pub(crate) mod utils;

pub use crate::decode::DecodeContext;
pub use crate::encode::EncodeContext;
pub use crate::error::Error;
pub use crate::header::Header;
pub use crate::pixel::Pixel;
pub use crate::types::{Channels, ColorSpace, ImageDesc};

/// Encodes `pixels` (a `width*height*channels`-byte buffer matching `desc`)
/// into a freshly allocated byte vector.
#[cfg(feature = "alloc")]
pub fn encode(pixels: &[u8], desc: ImageDesc) -> Result<alloc::vec::Vec<u8>, Error> {
    encode::encode_to_vec(pixels, desc)
}

/// Decodes `data` into a freshly allocated pixel buffer and its descriptor.
/// `forced_channels` must be `0` (use the header's channel count), `3`, or
/// `4`.
#[cfg(feature = "alloc")]
pub fn decode(data: &[u8], forced_channels: u8) -> Result<(alloc::vec::Vec<u8>, ImageDesc), Error> {
    let forced = types::parse_forced_channels(forced_channels)?;
    decode::decode_to_vec(data, forced)
}
