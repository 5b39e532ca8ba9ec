//! The 14-byte fixed header.

use core::convert::TryFrom;

use snafu::ensure;

use crate::consts::{HEADER_SIZE, MAGIC};
use crate::error::{Error, InvalidColorSpaceSnafu, InvalidDimensionsSnafu, InvalidMagicSnafu, UnexpectedEofSnafu};
use crate::types::{Channels, ImageDesc};
use crate::utils::{get_u32_be, get_u8, put_u32_be, put_u8};

/// Parsed form of the 14-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    pub colorspace: u8,
}

impl Header {
    pub(crate) fn from_desc(desc: &ImageDesc) -> Self {
        Self { width: desc.width, height: desc.height, channels: desc.channels, colorspace: desc.colorspace }
    }

    pub(crate) fn to_desc(self) -> ImageDesc {
        ImageDesc { width: self.width, height: self.height, channels: self.channels, colorspace: self.colorspace }
    }

    /// Number of pixels this header describes.
    pub(crate) fn n_pixels(&self) -> Result<usize, Error> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or(Error::DimensionsOverflow)
    }

    /// Serializes the header into its 14-byte wire form.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&MAGIC);
        let mut cursor = 4;
        put_u32_be(&mut buf, &mut cursor, self.width);
        put_u32_be(&mut buf, &mut cursor, self.height);
        put_u8(&mut buf, &mut cursor, self.channels.into());
        put_u8(&mut buf, &mut cursor, self.colorspace);
        buf
    }

    /// Parses and validates a header from the start of `data`.
    ///
    /// Accepts `colorspace <= 2` on the way in, one notch looser than the
    /// encoder's own `<= 1` validation.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        ensure!(data.len() >= HEADER_SIZE, UnexpectedEofSnafu);
        ensure!(data[0..4] == MAGIC, InvalidMagicSnafu);

        let mut cursor = 4;
        let width = get_u32_be(data, &mut cursor);
        let height = get_u32_be(data, &mut cursor);
        let channels = get_u8(data, &mut cursor);
        let colorspace = get_u8(data, &mut cursor);

        ensure!(width != 0 && height != 0, InvalidDimensionsSnafu { width, height });
        let channels = Channels::try_from(channels)?;
        ensure!(colorspace <= 2, InvalidColorSpaceSnafu { colorspace, max: 2u8 });

        Ok(Self { width, height, channels, colorspace })
    }
}
