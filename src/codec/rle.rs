use super::{fit_length, Codec, CodecError};
use crate::profile;

/// Run-length coder. The payload is a sequence of `[count, byte]` pairs
/// with counts of 1 to 255.
pub struct RleCodec;

impl Codec for RleCodec {
    fn id(&self) -> u8 {
        super::RLE
    }

    fn name(&self) -> &'static str {
        "RLE"
    }

    fn should_use(&self, data: &[u8]) -> bool {
        data.len() >= 4 && profile::repetition_score(data) >= 0.10
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(data.len() / 2);
        let mut iter = data.iter();
        if let Some(&first) = iter.next() {
            let mut current = first;
            let mut count: u8 = 1;
            for &b in iter {
                if b == current && count < u8::MAX {
                    count += 1;
                } else {
                    out.push(count);
                    out.push(current);
                    current = b;
                    count = 1;
                }
            }
            out.push(count);
            out.push(current);
        }
        Ok(out)
    }

    fn decompress(&self, data: &[u8], original_length: usize) -> Result<Vec<u8>, CodecError> {
        if data.len() % 2 != 0 {
            return Err(CodecError::Corrupt("dangling run length"));
        }
        let mut out = Vec::with_capacity(original_length);
        for pair in data.chunks_exact(2) {
            let (count, byte) = (pair[0], pair[1]);
            if count == 0 {
                return Err(CodecError::Corrupt("zero run length"));
            }
            out.extend(std::iter::repeat(byte).take(count as usize));
        }
        Ok(fit_length(out, original_length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_run_collapses() {
        let data = vec![0x41u8; 4096];
        let packed = RleCodec.compress(&data).unwrap();
        assert!(packed.len() <= 34);
        assert_eq!(RleCodec.decompress(&packed, 4096).unwrap(), data);
    }

    #[test]
    fn alternating_bytes_round_trip() {
        let data: Vec<u8> = b"ababab".iter().cycle().take(300).copied().collect();
        let packed = RleCodec.compress(&data).unwrap();
        assert_eq!(RleCodec.decompress(&packed, data.len()).unwrap(), data);
    }

    #[test]
    fn gate_rejects_unrepetitive_input() {
        assert!(!RleCodec.should_use(b"abc"));
        assert!(!RleCodec.should_use(b"abcdefghij"));
        assert!(RleCodec.should_use(&[9u8; 64]));
    }

    #[test]
    fn odd_payload_is_corrupt() {
        assert!(RleCodec.decompress(&[3, 0x41, 9], 12).is_err());
    }
}
