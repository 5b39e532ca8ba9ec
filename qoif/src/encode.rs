//! The encoder state machine: for every pixel, pick the smallest-size chunk
//! among run/index/diff/luma/rgb/rgba, in that precedence order.

use crate::consts::{HEADER_SIZE, MAX_RUN, PADDING, PADDING_SIZE, QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN};
use crate::error::{Error, InvalidPixelBufferLengthSnafu, OutputBufferTooSmallSnafu};
use crate::header::Header;
use crate::pixel::Pixel;
use crate::types::ImageDesc;
use crate::utils::wrapping_diff;
use snafu::ensure;

#[cfg(feature = "alloc")]
mod alloc_api;
#[cfg(feature = "alloc")]
pub use alloc_api::*;

#[cfg(feature = "std")]
mod std_api;
#[cfg(feature = "std")]
pub use std_api::*;

/// The maximum number of bytes encoding an image of this shape can take:
/// `w*h*(c+1) + 14 + 8`, i.e. every pixel as a literal RGB(A) chunk plus
/// header and padding.
pub fn encode_max_len(desc: &ImageDesc) -> Result<usize, Error> {
    let n_pixels = desc.n_pixels()?;
    let per_pixel_worst_case = n_pixels
        .checked_mul(desc.channels.count() + 1)
        .ok_or(Error::DimensionsOverflow)?;
    per_pixel_worst_case
        .checked_add(HEADER_SIZE + PADDING_SIZE)
        .ok_or(Error::DimensionsOverflow)
}

/// Holds the recency cache, previous pixel, and run counter across a single
/// encode call. Reusable across calls via [`EncodeContext::encode_to_slice`],
/// which resets all three at the start of every call.
#[derive(Debug, Clone)]
pub struct EncodeContext {
    index: [Pixel; 64],
    prev: Pixel,
    run: u8,
}

impl Default for EncodeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeContext {
    #[inline]
    pub const fn new() -> Self {
        Self { index: [Pixel::ZERO; 64], prev: Pixel::ZERO, run: 0 }
    }

    /// Encodes `pixels` (a `width*height*channels`-byte buffer) into `out`,
    /// returning the number of bytes written.
    ///
    /// `out` must be at least [`encode_max_len`] bytes long; the required
    /// length is re-validated here regardless, since the caller owns sizing.
    pub fn encode_to_slice(&mut self, pixels: &[u8], desc: ImageDesc, out: &mut [u8]) -> Result<usize, Error> {
        desc.validate_for_encode()?;

        let n_pixels = desc.n_pixels()?;
        let channels = desc.channels.count();
        let expected_len = n_pixels.checked_mul(channels).ok_or(Error::DimensionsOverflow)?;
        ensure!(
            pixels.len() == expected_len,
            InvalidPixelBufferLengthSnafu { expected: expected_len, actual: pixels.len() }
        );

        let required = encode_max_len(&desc)?;
        ensure!(out.len() >= required, OutputBufferTooSmallSnafu { size: out.len(), required });

        let header = Header::from_desc(&desc).encode();
        out[..HEADER_SIZE].copy_from_slice(&header);

        *self = Self::new();
        let mut cursor = HEADER_SIZE;
        for (i, chunk) in pixels.chunks_exact(channels).enumerate() {
            let px = if channels == 4 {
                Pixel::new(chunk[0], chunk[1], chunk[2], chunk[3])
            } else {
                Pixel::new(chunk[0], chunk[1], chunk[2], 0)
            };
            self.encode_pixel(px, i == n_pixels - 1, out, &mut cursor);
        }

        out[cursor..cursor + PADDING_SIZE].copy_from_slice(&PADDING);
        cursor += PADDING_SIZE;

        Ok(cursor)
    }

    /// Chunk selection for a single pixel, in precedence order: run
    /// extension/termination, index hit, diff, luma, rgb(a).
    fn encode_pixel(&mut self, px: Pixel, is_last: bool, out: &mut [u8], cursor: &mut usize) {
        if px == self.prev {
            self.run += 1;
            if self.run == MAX_RUN || is_last {
                out[*cursor] = QOI_OP_RUN | (self.run - 1);
                *cursor += 1;
                self.run = 0;
            }
            return;
        }

        if self.run != 0 {
            out[*cursor] = QOI_OP_RUN | (self.run - 1);
            *cursor += 1;
            self.run = 0;
        }

        let hash = px.hash_index();
        if self.index[hash as usize] == px {
            out[*cursor] = QOI_OP_INDEX | hash;
            *cursor += 1;
            self.prev = px;
            return;
        }
        self.index[hash as usize] = px;

        if px.a == self.prev.a {
            let vr = wrapping_diff(px.r, self.prev.r);
            let vg = wrapping_diff(px.g, self.prev.g);
            let vb = wrapping_diff(px.b, self.prev.b);

            if (-2..=1).contains(&vr) && (-2..=1).contains(&vg) && (-2..=1).contains(&vb) {
                out[*cursor] = QOI_OP_DIFF
                    | (((vr + 2) as u8) << 4)
                    | (((vg + 2) as u8) << 2)
                    | ((vb + 2) as u8);
                *cursor += 1;
            } else {
                let vg_r = vr as i32 - vg as i32;
                let vg_b = vb as i32 - vg as i32;
                if (-32..=31).contains(&vg) && (-8..=7).contains(&vg_r) && (-8..=7).contains(&vg_b) {
                    out[*cursor] = QOI_OP_LUMA | ((vg as i32 + 32) as u8);
                    out[*cursor + 1] = (((vg_r + 8) as u8) << 4) | ((vg_b + 8) as u8);
                    *cursor += 2;
                } else {
                    out[*cursor] = QOI_OP_RGB;
                    out[*cursor + 1] = px.r;
                    out[*cursor + 2] = px.g;
                    out[*cursor + 3] = px.b;
                    *cursor += 4;
                }
            }
        } else {
            out[*cursor] = QOI_OP_RGBA;
            out[*cursor + 1] = px.r;
            out[*cursor + 2] = px.g;
            out[*cursor + 3] = px.b;
            out[*cursor + 4] = px.a;
            *cursor += 5;
        }

        self.prev = px;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Channels, ColorSpace};

    fn encode(pixels: &[u8], desc: ImageDesc) -> Vec<u8> {
        let mut out = vec![0u8; encode_max_len(&desc).unwrap()];
        let n = EncodeContext::new().encode_to_slice(pixels, desc, &mut out).unwrap();
        out.truncate(n);
        out
    }

    #[test]
    fn single_black_rgba_pixel() {
        let desc = ImageDesc::new(1, 1, Channels::Rgba, ColorSpace::Srgb);
        let bytes = encode(&[0, 0, 0, 0xFF], desc);
        assert_eq!(
            bytes,
            [
                b'q', b'o', b'i', b'f', 0, 0, 0, 1, 0, 0, 0, 1, 4, 0, // header
                0xFF, 0x00, 0x00, 0x00, 0xFF, // QOI_OP_RGBA
                0, 0, 0, 0, 0, 0, 0, 0, // padding
            ]
        );
        assert_eq!(bytes.len(), 28);
    }

    #[test]
    fn run_of_three_identical_rgba_pixels() {
        let desc = ImageDesc::new(3, 1, Channels::Rgba, ColorSpace::Srgb);
        let pixels = [0u8; 12];
        let bytes = encode(&pixels, desc);
        assert_eq!(&bytes[14..15], &[0b1100_0000 | 2]);
        assert_eq!(bytes.len(), 23);
        assert_eq!(&bytes[bytes.len() - 8..], &[0u8; 8]);
    }

    #[test]
    fn second_identical_to_initial_previous_hits_index_zero() {
        let desc = ImageDesc::new(2, 1, Channels::Rgba, ColorSpace::Srgb);
        let mut pixels = Vec::new();
        pixels.extend_from_slice(&[10, 20, 30, 255]);
        pixels.extend_from_slice(&[0, 0, 0, 0]);
        let bytes = encode(&pixels, desc);
        assert_eq!(bytes[14], QOI_OP_RGBA);
        assert_eq!(bytes[19], QOI_OP_INDEX | 0);
    }

    #[test]
    fn diff_chunk_byte_matches_worked_example() {
        let desc = ImageDesc::new(2, 1, Channels::Rgba, ColorSpace::Srgb);
        let mut pixels = Vec::new();
        pixels.extend_from_slice(&[100, 100, 100, 255]);
        pixels.extend_from_slice(&[101, 99, 100, 255]);
        let bytes = encode(&pixels, desc);
        assert_eq!(bytes[19], 0x76);
    }

    #[test]
    fn luma_chunk_matches_worked_example() {
        let mut ctx = EncodeContext::new();
        ctx.prev = Pixel::new(100, 100, 100, 255);
        let mut out = [0u8; 8];
        let mut cursor = 0;
        ctx.encode_pixel(Pixel::new(117, 120, 123, 255), true, &mut out, &mut cursor);
        assert_eq!(cursor, 2);
        assert_eq!(out[0], 0xB4);
        assert_eq!(out[1], 0x5B);
    }

    #[test]
    fn run_of_62_then_63rd_pixel_splits_correctly() {
        let desc = ImageDesc::new(63, 1, Channels::Rgba, ColorSpace::Srgb);
        let pixels = [0u8; 63 * 4];
        let bytes = encode(&pixels, desc);
        // one QOI_OP_RUN for 62, then a final pixel still equal to previous
        // flushed as a second run chunk of length 1 (the encoder never looks
        // ahead, so the 63rd identical pixel cannot retroactively join the
        // first run once it has been flushed at the cap).
        assert_eq!(bytes[14], 0b1100_0000 | (62 - 1));
        assert_eq!(bytes[15], 0b1100_0000 | (1 - 1));
    }

    #[test]
    fn three_channel_input_keeps_alpha_at_zero_forever() {
        let desc = ImageDesc::new(1, 1, Channels::Rgb, ColorSpace::Srgb);
        let bytes = encode(&[10, 20, 30], desc);
        // alpha unchanged (still 0) relative to initial previous -> no RGBA chunk
        assert_ne!(bytes[14], QOI_OP_RGBA);
    }

    #[test]
    fn output_starts_with_magic() {
        let desc = ImageDesc::new(4, 4, Channels::Rgb, ColorSpace::Srgb);
        let pixels = [7u8; 4 * 4 * 3];
        let bytes = encode(&pixels, desc);
        assert_eq!(&bytes[0..4], b"qoif");
    }

    #[test]
    fn final_8_bytes_are_always_zero() {
        let desc = ImageDesc::new(5, 3, Channels::Rgba, ColorSpace::Srgb);
        let mut pixels = vec![0u8; 5 * 3 * 4];
        for (i, b) in pixels.iter_mut().enumerate() {
            *b = (i * 31) as u8;
        }
        let bytes = encode(&pixels, desc);
        assert_eq!(&bytes[bytes.len() - 8..], &[0u8; 8]);
    }

    #[test]
    fn rejects_invalid_dimensions_and_channels() {
        let mut out = [0u8; 64];
        let desc = ImageDesc::new(0, 1, Channels::Rgb, ColorSpace::Srgb);
        assert!(EncodeContext::new().encode_to_slice(&[], desc, &mut out).is_err());
    }

    #[test]
    fn rejects_mismatched_pixel_buffer_length() {
        let mut out = [0u8; 64];
        let desc = ImageDesc::new(2, 1, Channels::Rgb, ColorSpace::Srgb);
        let err = EncodeContext::new().encode_to_slice(&[0, 0, 0], desc, &mut out).unwrap_err();
        assert!(matches!(err, Error::InvalidPixelBufferLength { .. }));
    }
}
