use super::{fit_length, Codec, CodecError};
use crate::profile;

/// LZ4 block format (with length prefix) via lz4_flex.
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn id(&self) -> u8 {
        super::LZ4
    }

    fn name(&self) -> &'static str {
        "LZ4"
    }

    fn should_use(&self, data: &[u8]) -> bool {
        data.len() >= 32 && profile::entropy(data) <= 7.8
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(lz4_flex::compress_prepend_size(data))
    }

    fn decompress(&self, data: &[u8], original_length: usize) -> Result<Vec<u8>, CodecError> {
        let out = lz4_flex::decompress_size_prepended(data)
            .map_err(|_| CodecError::Corrupt("lz4 block"))?;
        Ok(fit_length(out, original_length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trips() {
        let data: Vec<u8> = b"The quick brown fox jumps over the lazy dog. "
            .iter()
            .cycle()
            .take(4600)
            .copied()
            .collect();
        let packed = Lz4Codec.compress(&data).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(Lz4Codec.decompress(&packed, data.len()).unwrap(), data);
    }

    #[test]
    fn garbage_payload_errors() {
        assert!(Lz4Codec.decompress(&[0xff, 0xff, 0xff, 0x7f, 0x00], 16).is_err());
    }
}
