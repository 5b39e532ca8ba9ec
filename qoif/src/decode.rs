//! The decoder state machine: dispatches on the 8-bit tag first
//! (`QOI_OP_RGB`/`QOI_OP_RGBA`), then on the 2-bit tag, and keeps the
//! recency cache synchronized with the encoder by updating it after every
//! reconstructed pixel.

use crate::consts::{HEADER_SIZE, PADDING_SIZE, QOI_2BIT_MASK, QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA};
use crate::error::{Error, OutputBufferTooSmallSnafu, UnexpectedEofSnafu};
use crate::header::Header;
use crate::pixel::Pixel;
use crate::types::{Channels, ImageDesc};
use crate::utils::wrapping_add;
use snafu::ensure;

#[cfg(feature = "alloc")]
mod alloc_api;
#[cfg(feature = "alloc")]
pub use alloc_api::*;

/// Holds the recency cache and previous pixel across a single decode call.
/// Reusable across calls via [`DecodeContext::decode_to_slice`], which
/// resets both at the start of every call.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    index: [Pixel; 64],
    prev: Pixel,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeContext {
    #[inline]
    pub const fn new() -> Self {
        Self { index: [Pixel::ZERO; 64], prev: Pixel::ZERO }
    }

    /// Decodes `data` into `out`, writing `output_channels` bytes per pixel
    /// (3 if `forced_channels` is `Some(Channels::Rgb)`, else the header's
    /// own channel count). Returns the header-derived descriptor, which
    /// always reflects the *source* header's fields, not `forced_channels`.
    pub fn decode_to_slice(
        &mut self, data: &[u8], forced_channels: Option<Channels>, out: &mut [u8],
    ) -> Result<ImageDesc, Error> {
        let header = Header::parse(data)?;
        ensure!(data.len() >= HEADER_SIZE + PADDING_SIZE, UnexpectedEofSnafu);

        let out_channels = forced_channels.unwrap_or(header.channels);
        let n_pixels = header.n_pixels()?;
        let required = n_pixels.checked_mul(out_channels.count()).ok_or(Error::DimensionsOverflow)?;
        ensure!(out.len() >= required, OutputBufferTooSmallSnafu { size: out.len(), required });

        *self = Self::new();
        let chunks_end = data.len() - PADDING_SIZE;
        let mut cursor = HEADER_SIZE;
        let mut run: u8 = 0;

        for i in 0..n_pixels {
            if run > 0 {
                run -= 1;
            } else if cursor < chunks_end {
                self.decode_chunk(data, &mut cursor, &mut run);
            }
            // Once the chunk region is exhausted, keep emitting `prev` for
            // any remaining pixels instead of failing.

            write_pixel(out, i, out_channels, self.prev);
        }

        Ok(header.to_desc())
    }

    /// Reads and applies exactly one chunk, updating `self.prev` and the
    /// recency cache, or (for `QOI_OP_RUN`) setting `*run` to the number of
    /// *additional* repetitions of `self.prev` still owed.
    fn decode_chunk(&mut self, data: &[u8], cursor: &mut usize, run: &mut u8) {
        let b1 = data[*cursor];
        *cursor += 1;

        match b1 {
            QOI_OP_RGB => {
                self.prev = Pixel::new(data[*cursor], data[*cursor + 1], data[*cursor + 2], self.prev.a);
                *cursor += 3;
            }
            QOI_OP_RGBA => {
                self.prev =
                    Pixel::new(data[*cursor], data[*cursor + 1], data[*cursor + 2], data[*cursor + 3]);
                *cursor += 4;
            }
            _ => match b1 & QOI_2BIT_MASK {
                QOI_OP_INDEX => {
                    self.prev = self.index[b1 as usize];
                }
                QOI_OP_DIFF => {
                    let dr = ((b1 >> 4) & 0x3) as i32 - 2;
                    let dg = ((b1 >> 2) & 0x3) as i32 - 2;
                    let db = (b1 & 0x3) as i32 - 2;
                    self.prev = Pixel::new(
                        wrapping_add(self.prev.r, dr),
                        wrapping_add(self.prev.g, dg),
                        wrapping_add(self.prev.b, db),
                        self.prev.a,
                    );
                }
                QOI_OP_LUMA => {
                    let b2 = data[*cursor];
                    *cursor += 1;
                    let vg = (b1 & 0x3F) as i32 - 32;
                    let vg_r = ((b2 >> 4) & 0xF) as i32 - 8;
                    let vg_b = (b2 & 0xF) as i32 - 8;
                    self.prev = Pixel::new(
                        wrapping_add(self.prev.r, vg + vg_r),
                        wrapping_add(self.prev.g, vg),
                        wrapping_add(self.prev.b, vg + vg_b),
                        self.prev.a,
                    );
                }
                _ => {
                    // QOI_OP_RUN: this pixel is the first of `payload + 1`
                    // repetitions; the current one is emitted by the caller
                    // right after this call, the rest are owed via `*run`.
                    *run = b1 & 0x3F;
                }
            },
        }

        self.index[self.prev.hash_index() as usize] = self.prev;
    }
}

fn write_pixel(out: &mut [u8], i: usize, channels: Channels, px: Pixel) {
    let base = i * channels.count();
    out[base] = px.r;
    out[base + 1] = px.g;
    out[base + 2] = px.b;
    if let Channels::Rgba = channels {
        out[base + 3] = px.a;
    }
}
