use std::io::prelude::*;

use lzma::LzmaWriter;

use super::{fit_length, Codec, CodecError};
use crate::profile;

const LEVEL: u32 = 6;

/// LZMA via rust-lzma.
pub struct LzmaCodec;

impl Codec for LzmaCodec {
    fn id(&self) -> u8 {
        super::LZMA
    }

    fn name(&self) -> &'static str {
        "LZMA"
    }

    fn should_use(&self, data: &[u8]) -> bool {
        // High container overhead, so only worthwhile on larger chunks.
        data.len() >= 1000 && profile::entropy(data) <= 7.8
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(data.len());
        {
            let mut f = LzmaWriter::new_compressor(&mut result, LEVEL)?;
            f.write_all(data)?;
            f.finish()?;
        }
        Ok(result)
    }

    fn decompress(&self, data: &[u8], original_length: usize) -> Result<Vec<u8>, CodecError> {
        let mut output = Vec::with_capacity(original_length);
        {
            let mut f = LzmaWriter::new_decompressor(&mut output)?;
            f.write_all(data)?;
            f.finish()?;
        }
        Ok(fit_length(output, original_length))
    }
}
