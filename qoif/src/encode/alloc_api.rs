use alloc::vec::Vec;

use crate::error::Error;
use crate::types::ImageDesc;

use super::{encode_max_len, EncodeContext};

impl EncodeContext {
    /// Encodes `pixels` into a freshly allocated vector, sized up-front to
    /// [`encode_max_len`] and truncated to the actual length written; never
    /// reallocates mid-encode.
    pub fn encode_to_vec(&mut self, pixels: &[u8], desc: ImageDesc) -> Result<Vec<u8>, Error> {
        let mut out = alloc::vec![0u8; encode_max_len(&desc)?];
        let n = self.encode_to_slice(pixels, desc, &mut out)?;
        out.truncate(n);
        Ok(out)
    }
}

/// Encodes `pixels` into a freshly allocated vector.
///
/// Equivalent to `EncodeContext::new().encode_to_vec(pixels, desc)`.
pub fn encode_to_vec(pixels: &[u8], desc: ImageDesc) -> Result<Vec<u8>, Error> {
    EncodeContext::new().encode_to_vec(pixels, desc)
}
