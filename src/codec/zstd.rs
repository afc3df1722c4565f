use super::{fit_length, Codec, CodecError};
use crate::profile;

const LEVEL: i32 = 9;

/// Zstandard via the zstd crate. Plain frame, no wrapping sub-header,
/// hence `compatible`.
pub struct ZstdCodec;

impl Codec for ZstdCodec {
    fn id(&self) -> u8 {
        super::ZSTD
    }

    fn name(&self) -> &'static str {
        "ZStandard"
    }

    fn should_use(&self, data: &[u8]) -> bool {
        data.len() >= 64 && profile::entropy(data) <= 7.8
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(data.len());
        zstd::stream::copy_encode(data, &mut result, LEVEL)?;
        Ok(result)
    }

    fn decompress(&self, data: &[u8], original_length: usize) -> Result<Vec<u8>, CodecError> {
        let mut output = Vec::with_capacity(original_length);
        zstd::stream::copy_decode(data, &mut output)?;
        Ok(fit_length(output, original_length))
    }

    fn compatible(&self) -> bool {
        true
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
        let packed = ZstdCodec.compress(&data).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(ZstdCodec.decompress(&packed, data.len()).unwrap(), data);
    }

    #[test]
    fn garbage_payload_errors() {
        assert!(ZstdCodec.decompress(&[0xde, 0xad, 0xbe, 0xef], 64).is_err());
    }
}
