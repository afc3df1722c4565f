use std::io::Write;

use bzip2::write::{BzDecoder, BzEncoder};
use bzip2::Compression;

use super::{fit_length, Codec, CodecError};
use crate::profile;

/// BZIP2 via the bzip2 crate.
pub struct Bzip2Codec;

impl Codec for Bzip2Codec {
    fn id(&self) -> u8 {
        super::BZIP2
    }

    fn name(&self) -> &'static str {
        "BZip2"
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
        let mut encoder = BzEncoder::new(Vec::with_capacity(data.len()), Compression::best());
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    fn decompress(&self, data: &[u8], original_length: usize) -> Result<Vec<u8>, CodecError> {
        let mut decoder = BzDecoder::new(Vec::with_capacity(original_length));
        decoder.write_all(data)?;
        Ok(fit_length(decoder.finish()?, original_length))
    }
}
