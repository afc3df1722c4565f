use super::{Codec, CodecError};

/// Identity codec. Used whenever compression does not pay or a codec
/// fails during encode.
pub struct StoreCodec;

impl Codec for StoreCodec {
    fn id(&self) -> u8 {
        super::STORE
    }

    fn name(&self) -> &'static str {
        "Store"
    }

    fn should_use(&self, _data: &[u8]) -> bool {
        true
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8], original_length: usize) -> Result<Vec<u8>, CodecError> {
        let mut out = data.to_vec();
        out.resize(original_length, 0);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_with_pad_and_truncate() {
        assert_eq!(StoreCodec.decompress(b"abc", 3).unwrap(), b"abc");
        assert_eq!(StoreCodec.decompress(b"abc", 5).unwrap(), b"abc\0\0");
        assert_eq!(StoreCodec.decompress(b"abc", 2).unwrap(), b"ab");
    }
}
