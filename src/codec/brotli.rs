use std::io::Write;

use brotli::enc::backward_references::BrotliEncoderParams;

use super::{fit_length, Codec, CodecError};
use crate::profile;

const QUALITY: i32 = 6;
const BUFFER_SIZE: usize = 1024 * 1024;

/// Brotli via the pure rust brotli crate. Plain stream, no wrapping
/// sub-header, hence `compatible`.
pub struct BrotliCodec;

impl Codec for BrotliCodec {
    fn id(&self) -> u8 {
        super::BROTLI
    }

    fn name(&self) -> &'static str {
        "Brotli"
    }

    fn should_use(&self, data: &[u8]) -> bool {
        if data.len() < 100 {
            return false;
        }
        let entropy = profile::entropy(data);
        if entropy > 7.5 {
            return false;
        }
        profile::text_score(data) > 0.7 || entropy < 6.0
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(data.len());
        let params = BrotliEncoderParams {
            quality: QUALITY,
            magic_number: false,
            ..Default::default()
        };
        {
            let mut writer = brotli::CompressorWriter::with_params(&mut result, BUFFER_SIZE, &params);
            writer.write_all(data)?;
        }
        Ok(result)
    }

    fn decompress(&self, data: &[u8], original_length: usize) -> Result<Vec<u8>, CodecError> {
        let mut output = Vec::with_capacity(original_length);
        {
            let mut decompressor = brotli::DecompressorWriter::new(&mut output, BUFFER_SIZE);
            decompressor.write_all(data)?;
            decompressor.flush()?;
        }
        Ok(fit_length(output, original_length))
    }

    fn compatible(&self) -> bool {
        true
    }
}
