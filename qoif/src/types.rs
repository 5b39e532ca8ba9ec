//! The image descriptor and the small enums it's built from.

use core::convert::TryFrom;

use snafu::ensure;

use crate::error::{
    Error, InvalidChannelsSnafu, InvalidColorSpaceSnafu, InvalidDimensionsSnafu,
    InvalidForcedChannelsSnafu,
};

/// Number of channels a pixel buffer carries. Grayscale, gray+alpha, and
/// anything above 4 channels are rejected by [`TryFrom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Channels {
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    /// Number of bytes one pixel occupies in a raw pixel buffer.
    #[inline]
    pub const fn count(self) -> usize {
        self as u8 as usize
    }
}

impl TryFrom<u8> for Channels {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            channels => InvalidChannelsSnafu { channels }.fail(),
        }
    }
}

impl From<Channels> for u8 {
    #[inline]
    fn from(c: Channels) -> u8 {
        c as u8
    }
}

/// Parses the `forced_channels` decode parameter: `0` means "use the
/// header's channel count", `3`/`4` force that count.
pub fn parse_forced_channels(value: u8) -> Result<Option<Channels>, Error> {
    match value {
        0 => Ok(None),
        3 => Ok(Some(Channels::Rgb)),
        4 => Ok(Some(Channels::Rgba)),
        channels => InvalidForcedChannelsSnafu { channels }.fail(),
    }
}

/// Informational colorspace tag. The codec never branches on this value; it
/// is carried through encode/decode purely as metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorSpace {
    /// sRGB chroma with linear alpha.
    Srgb = 0,
    /// All channels linear.
    Linear = 1,
}

impl Default for ColorSpace {
    fn default() -> Self {
        ColorSpace::Srgb
    }
}

impl From<ColorSpace> for u8 {
    #[inline]
    fn from(c: ColorSpace) -> u8 {
        c as u8
    }
}

/// `{ width, height, channels, colorspace }`.
///
/// `colorspace` is kept as a raw byte rather than the [`ColorSpace`] enum:
/// the decoder tolerates (and round-trips) the out-of-range value `2`, which
/// [`ColorSpace`] itself cannot represent. Use [`ImageDesc::new`] with a
/// [`ColorSpace`] for the common case of constructing a descriptor to
/// encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    pub colorspace: u8,
}

impl ImageDesc {
    #[inline]
    pub const fn new(width: u32, height: u32, channels: Channels, colorspace: ColorSpace) -> Self {
        Self { width, height, channels, colorspace: colorspace as u8 }
    }

    /// Width * height, the number of pixels in this image.
    pub(crate) fn n_pixels(&self) -> Result<usize, Error> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or(Error::DimensionsOverflow)
    }

    /// Encode-side validation: nonzero dimensions, and a strict
    /// `colorspace <= 1` check (see DESIGN.md for why this is tighter than
    /// what the decoder accepts).
    pub(crate) fn validate_for_encode(&self) -> Result<(), Error> {
        ensure!(
            self.width != 0 && self.height != 0,
            InvalidDimensionsSnafu { width: self.width, height: self.height }
        );
        ensure!(self.colorspace <= 1, InvalidColorSpaceSnafu { colorspace: self.colorspace, max: 1u8 });
        let _ = self.n_pixels()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_try_from_rejects_other_values() {
        assert!(Channels::try_from(3).is_ok());
        assert!(Channels::try_from(4).is_ok());
        assert!(Channels::try_from(0).is_err());
        assert!(Channels::try_from(2).is_err());
        assert!(Channels::try_from(5).is_err());
    }

    #[test]
    fn forced_channels_accepts_0_3_4_only() {
        assert_eq!(parse_forced_channels(0).unwrap(), None);
        assert_eq!(parse_forced_channels(3).unwrap(), Some(Channels::Rgb));
        assert_eq!(parse_forced_channels(4).unwrap(), Some(Channels::Rgba));
        assert!(parse_forced_channels(1).is_err());
        assert!(parse_forced_channels(5).is_err());
    }

    #[test]
    fn encode_validation_rejects_zero_dimensions_and_colorspace_2() {
        let desc = ImageDesc::new(0, 1, Channels::Rgb, ColorSpace::Srgb);
        assert!(desc.validate_for_encode().is_err());

        let desc = ImageDesc::new(1, 1, Channels::Rgb, ColorSpace::Srgb);
        assert!(desc.validate_for_encode().is_ok());

        let mut desc = ImageDesc::new(1, 1, Channels::Rgb, ColorSpace::Srgb);
        desc.colorspace = 2;
        assert!(desc.validate_for_encode().is_err());
    }
}
