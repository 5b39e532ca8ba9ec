use std::io::Write;

use snafu::ResultExt;

use crate::error::{Error, IoSnafu};
use crate::types::ImageDesc;

use super::EncodeContext;

impl EncodeContext {
    /// Encodes `pixels` and writes the result to `w`.
    ///
    /// Builds the encoded image in memory first (via [`EncodeContext::encode_to_vec`])
    /// and writes it out in one call, rather than streaming chunk-by-chunk:
    /// the encoder's worst-case buffer is already bounded and cheap to
    /// allocate once, so there is no streaming benefit to writing a second,
    /// duplicated chunk-emission loop against `W`.
    pub fn encode_to_writer<W: Write>(&mut self, pixels: &[u8], desc: ImageDesc, mut w: W) -> Result<usize, Error> {
        let bytes = self.encode_to_vec(pixels, desc)?;
        w.write_all(&bytes).context(IoSnafu)?;
        Ok(bytes.len())
    }
}

/// Encodes `pixels` and writes the result to `w`.
pub fn encode_to_writer<W: Write>(pixels: &[u8], desc: ImageDesc, w: W) -> Result<usize, Error> {
    EncodeContext::new().encode_to_writer(pixels, desc, w)
}
