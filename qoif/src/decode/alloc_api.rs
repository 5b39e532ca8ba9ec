use alloc::vec;
use alloc::vec::Vec;

use crate::error::Error;
use crate::types::{Channels, ImageDesc};

use super::DecodeContext;

impl DecodeContext {
    /// Decodes `data` into a freshly allocated vector sized exactly to
    /// `width * height * output_channels`.
    pub fn decode_to_vec(
        &mut self, data: &[u8], forced_channels: Option<Channels>,
    ) -> Result<(Vec<u8>, ImageDesc), Error> {
        let header = crate::header::Header::parse(data)?;
        let out_channels = forced_channels.unwrap_or(header.channels);
        let n_pixels = header.n_pixels()?;
        let len = n_pixels.checked_mul(out_channels.count()).ok_or(Error::DimensionsOverflow)?;

        let mut out = vec![0u8; len];
        let desc = self.decode_to_slice(data, forced_channels, &mut out)?;
        Ok((out, desc))
    }
}

/// Decodes `data` into a freshly allocated vector.
///
/// Equivalent to `DecodeContext::new().decode_to_vec(data, forced_channels)`.
pub fn decode_to_vec(data: &[u8], forced_channels: Option<Channels>) -> Result<(Vec<u8>, ImageDesc), Error> {
    DecodeContext::new().decode_to_vec(data, forced_channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_to_vec;
    use crate::types::ColorSpace;

    #[test]
    fn free_function_matches_context_method() {
        let desc = ImageDesc::new(2, 2, Channels::Rgba, ColorSpace::Srgb);
        let pixels = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        let encoded = encode_to_vec(&pixels, desc).unwrap();

        let (a, desc_a) = decode_to_vec(&encoded, None).unwrap();
        let (b, desc_b) = DecodeContext::new().decode_to_vec(&encoded, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(desc_a, desc_b);
        assert_eq!(a, pixels);
    }
}
