use super::{fit_length, Codec, CodecError};
use crate::profile;

/// Delta coder. First byte literal, then the wrapping difference of each
/// byte to its predecessor. Output length equals input length, so this
/// codec only wins when a later stage shrinks the delta stream.
pub struct DeltaCodec;

impl Codec for DeltaCodec {
    fn id(&self) -> u8 {
        super::DELTA
    }

    fn name(&self) -> &'static str {
        "Delta"
    }

    fn should_use(&self, data: &[u8]) -> bool {
        profile::small_delta_score(data) > 0.25
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(data.len());
        let mut prev = 0u8;
        for (i, &b) in data.iter().enumerate() {
            if i == 0 {
                out.push(b);
            } else {
                out.push(b.wrapping_sub(prev));
            }
            prev = b;
        }
        Ok(out)
    }

    fn decompress(&self, data: &[u8], original_length: usize) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(original_length);
        let mut prev = 0u8;
        for (i, &d) in data.iter().enumerate() {
            let b = if i == 0 { d } else { prev.wrapping_add(d) };
            out.push(b);
            prev = b;
        }
        Ok(fit_length(out, original_length))
    }
}
