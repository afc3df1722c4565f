//! Byte-level data metrics used to pick codec candidates for a chunk.

/// Upper bound on the number of bytes sampled for the pairwise metrics.
const METRIC_SAMPLE_SIZE: usize = 1000;

/// Measured characteristics of a byte slice.
///
/// Entropy is computed over the full slice; the pairwise metrics operate on
/// a stride-sampled subset once the slice grows beyond 1000 bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DataProfile {
    /// Shannon entropy in bits per byte, 0.0 to 8.0.
    pub entropy: f64,
    /// Fraction of adjacent positions holding equal bytes, 0.0 to 1.0.
    pub repetition: f64,
    /// Fraction of adjacent positions whose byte delta is below 32, 0.0 to 1.0.
    pub small_delta: f64,
    /// Fraction of printable-ASCII (or tab/newline/return) bytes, 0.0 to 1.0.
    pub text: f64,
}

impl DataProfile {
    pub fn of(data: &[u8]) -> DataProfile {
        DataProfile {
            entropy: entropy(data),
            repetition: repetition_score(data),
            small_delta: small_delta_score(data),
            text: text_score(data),
        }
    }
}

/// Shannon entropy over the 256-symbol byte alphabet.
pub fn entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut counts = [0u64; 256];
    for &b in data {
        counts[b as usize] += 1;
    }
    let len = data.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum()
}

pub fn repetition_score(data: &[u8]) -> f64 {
    if data.len() < 4 {
        return 0.0;
    }
    let sample = stride_sample(data);
    let repeats = sample.windows(2).filter(|w| w[0] == w[1]).count();
    repeats as f64 / (sample.len() - 1) as f64
}

pub fn small_delta_score(data: &[u8]) -> f64 {
    if data.len() < 4 {
        return 0.0;
    }
    let sample = stride_sample(data);
    let small = sample
        .windows(2)
        .filter(|w| (w[0] as i16 - w[1] as i16).abs() < 32)
        .count();
    small as f64 / (sample.len() - 1) as f64
}

pub fn text_score(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sample = stride_sample(data);
    let text = sample
        .iter()
        .filter(|&&b| (32..=127).contains(&b) || b == 9 || b == 10 || b == 13)
        .count();
    text as f64 / sample.len() as f64
}

/// Every n:th byte of the input, at most [`METRIC_SAMPLE_SIZE`] of them.
fn stride_sample(data: &[u8]) -> Vec<u8> {
    if data.len() <= METRIC_SAMPLE_SIZE {
        return data.to_vec();
    }
    let step = data.len() / METRIC_SAMPLE_SIZE;
    data.iter()
        .step_by(step)
        .take(METRIC_SAMPLE_SIZE)
        .copied()
        .collect()
}
