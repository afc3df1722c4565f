use std::collections::HashMap;

use super::{fit_length, Codec, CodecError};

/// Largest code value; the table stops growing once reached.
const MAX_CODES: usize = 1 << 16;

/// LZW style dictionary coder over `(prefix code, byte)` pairs. The payload
/// is the emitted code sequence as u16 LE words; the first 256 codes are
/// the single-byte strings and both sides grow their table in lockstep, so
/// no table is embedded in the payload.
pub struct DictionaryCodec;

impl Codec for DictionaryCodec {
    fn id(&self) -> u8 {
        super::DICTIONARY
    }

    fn name(&self) -> &'static str {
        "Dictionary"
    }

    fn should_use(&self, data: &[u8]) -> bool {
        data.len() >= 16
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(data.len() / 2);
        let mut iter = data.iter();
        let Some(&first) = iter.next() else {
            return Ok(out);
        };
        let mut table: HashMap<(u16, u8), u16> = HashMap::new();
        let mut next_code: usize = 256;
        let mut current: u16 = first as u16;
        for &b in iter {
            if let Some(&code) = table.get(&(current, b)) {
                current = code;
            } else {
                out.extend_from_slice(&current.to_le_bytes());
                if next_code < MAX_CODES {
                    table.insert((current, b), next_code as u16);
                    next_code += 1;
                }
                current = b as u16;
            }
        }
        out.extend_from_slice(&current.to_le_bytes());
        Ok(out)
    }

    fn decompress(&self, data: &[u8], original_length: usize) -> Result<Vec<u8>, CodecError> {
        if data.len() % 2 != 0 {
            return Err(CodecError::Corrupt("dangling dictionary code"));
        }
        let mut out = Vec::with_capacity(original_length);
        // The first 256 entries are implicit; the rest are rebuilt as
        // (previous string + first byte of the current one).
        let mut table: Vec<Vec<u8>> = (0..=255u8).map(|b| vec![b]).collect();
        let mut prev: Option<u16> = None;
        for pair in data.chunks_exact(2) {
            let code = u16::from_le_bytes([pair[0], pair[1]]);
            let entry = match prev {
                _ if (code as usize) < table.len() => table[code as usize].clone(),
                // The one-step-ahead case: the encoder used the entry it was
                // about to define.
                Some(prev_code) if code as usize == table.len() => {
                    let mut e = table[prev_code as usize].clone();
                    e.push(e[0]);
                    e
                }
                _ => return Err(CodecError::Corrupt("dictionary code out of range")),
            };
            if let Some(prev_code) = prev {
                if table.len() < MAX_CODES {
                    let mut grown = table[prev_code as usize].clone();
                    grown.push(entry[0]);
                    table.push(grown);
                }
            }
            out.extend_from_slice(&entry);
            prev = Some(code);
        }
        Ok(fit_length(out, original_length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trips_and_shrinks() {
        let data: Vec<u8> = b"The quick brown fox jumps over the lazy dog. "
            .iter()
            .cycle()
            .take(4600)
            .copied()
            .collect();
        let packed = DictionaryCodec.compress(&data).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(DictionaryCodec.decompress(&packed, data.len()).unwrap(), data);
    }

    #[test]
    fn repeated_single_byte_hits_the_lookahead_entry() {
        // "aaa..." exercises the code == table.len() branch immediately.
        let data = vec![b'a'; 1000];
        let packed = DictionaryCodec.compress(&data).unwrap();
        assert_eq!(DictionaryCodec.decompress(&packed, data.len()).unwrap(), data);
    }

    #[test]
    fn binary_round_trips() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i.wrapping_mul(97) >> 3) as u8).collect();
        let packed = DictionaryCodec.compress(&data).unwrap();
        assert_eq!(DictionaryCodec.decompress(&packed, data.len()).unwrap(), data);
    }

    #[test]
    fn out_of_range_code_is_corrupt() {
        // Code 300 cannot exist before any table growth.
        let payload = 300u16.to_le_bytes().to_vec();
        assert!(DictionaryCodec.decompress(&payload, 4).is_err());
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(DictionaryCodec.compress(b"").unwrap().is_empty());
        assert!(DictionaryCodec.decompress(b"", 0).unwrap().is_empty());
    }
}
