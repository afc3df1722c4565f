use std::io::Write;

use flate2::write::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;

use super::{fit_length, Codec, CodecError};
use crate::profile;

/// DEFLATE (zlib framing) via flate2.
pub struct DeflateCodec;

impl Codec for DeflateCodec {
    fn id(&self) -> u8 {
        super::DEFLATE
    }

    fn name(&self) -> &'static str {
        "Deflate"
    }

    fn should_use(&self, data: &[u8]) -> bool {
        data.len() >= 50 && profile::entropy(data) <= 7.8
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len()), Compression::best());
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    fn decompress(&self, data: &[u8], original_length: usize) -> Result<Vec<u8>, CodecError> {
        let mut decoder = ZlibDecoder::new(Vec::with_capacity(original_length));
        decoder.write_all(data)?;
        Ok(fit_length(decoder.finish()?, original_length))
    }
}
