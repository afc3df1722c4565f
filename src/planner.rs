//! Decides chunk boundaries and the codec to try for each chunk.
//!
//! Planning walks the input sequentially. At each position the profiler
//! ranks the registered codecs, the best candidates are trial-compressed on
//! a base-sized slice, and the winning codec is then probed on growing
//! slices until its ratio degrades.

use log::{debug, trace};

use crate::codec::{self, Registry};
use crate::profile::DataProfile;

/// Hard cap on the input bytes a single chunk may cover.
pub(crate) const MAX_CHUNK_SIZE: usize = 65536;
/// Extension probes grow by at least this many bytes.
const MIN_EXTEND_STEP: usize = 1024;
/// Trial ratio that must be beaten for compression to be worth extending.
const WORTHWHILE_RATIO: f64 = 0.95;
/// An extension survives while its ratio stays within 3% of the best seen.
const EXTEND_TOLERANCE: f64 = 1.03;
/// Above this entropy the data is treated as incompressible outright.
const INCOMPRESSIBLE_ENTROPY: f64 = 7.8;

/// One planned unit of work for the encoder.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlannedChunk {
    pub offset: usize,
    pub size: usize,
    pub codec_id: u8,
}

/// Split the whole input into chunks, each with its chosen codec.
pub(crate) fn plan_chunks(
    data: &[u8],
    registry: &Registry,
    initial_chunk_size: usize,
) -> Vec<PlannedChunk> {
    let mut plans = Vec::new();
    let mut position = 0;
    while position < data.len() {
        let (size, codec_id) = optimal_chunk(data, position, registry, initial_chunk_size);
        trace!(
            "chunk at {}: {} bytes with {}",
            position,
            size,
            codec::name_of(codec_id)
        );
        plans.push(PlannedChunk {
            offset: position,
            size,
            codec_id,
        });
        position += size;
    }
    debug!("planned {} chunks over {} bytes", plans.len(), data.len());
    plans
}

/// Chunk size and codec for the data starting at `position`.
fn optimal_chunk(
    data: &[u8],
    position: usize,
    registry: &Registry,
    base_size: usize,
) -> (usize, u8) {
    let remaining = data.len() - position;
    let max_size = MAX_CHUNK_SIZE.min(remaining);

    if max_size <= base_size {
        // Tail of the input; no size search, best of two candidates wins.
        let slice = &data[position..position + max_size];
        let (_, codec_id) = best_trial(slice, &predict_codecs(slice, registry, 2), registry);
        return (max_size, codec_id.unwrap_or(codec::STORE));
    }

    let slice = &data[position..position + base_size];
    let (best_ratio, best_codec) =
        best_trial(slice, &predict_codecs(slice, registry, 3), registry);
    let winner = match best_codec {
        Some(id) if best_ratio < WORTHWHILE_RATIO => id,
        _ => return (base_size, codec::STORE),
    };

    // Grow the chunk while the winner keeps its ratio.
    let step = MIN_EXTEND_STEP.max(base_size / 4);
    let mut best_size = base_size;
    let mut extended_ratio = best_ratio;
    let mut size = base_size + step;
    while size <= max_size {
        let slice = &data[position..position + size];
        let chosen = match registry.get(winner) {
            Some(chosen) if chosen.should_use(slice) => chosen,
            _ => break,
        };
        let Ok(compressed) = chosen.compress(slice) else {
            break;
        };
        let ratio = compressed.len() as f64 / size as f64;
        if ratio > extended_ratio * EXTEND_TOLERANCE {
            break;
        }
        extended_ratio = ratio;
        best_size = size;
        size += step;
    }
    (best_size, winner)
}

/// Trial-compress the candidates and keep the lowest ratio below 1.0.
fn best_trial(slice: &[u8], candidates: &[u8], registry: &Registry) -> (f64, Option<u8>) {
    let mut best_ratio = 1.0f64;
    let mut best_codec = None;
    for &id in candidates {
        if id == codec::STORE {
            continue;
        }
        let Some(chosen) = registry.get(id) else {
            continue;
        };
        if !chosen.should_use(slice) {
            continue;
        }
        let Ok(compressed) = chosen.compress(slice) else {
            continue;
        };
        let ratio = compressed.len() as f64 / slice.len() as f64;
        if ratio < best_ratio {
            best_ratio = ratio;
            best_codec = Some(id);
        }
    }
    (best_ratio, best_codec)
}

/// Rank the registered codecs for this slice and return the top candidates.
///
/// Scores are heuristic predictions from the profile alone; the planner
/// still trial-compresses before committing. Data above the entropy cutoff
/// short-circuits to store.
fn predict_codecs(slice: &[u8], registry: &Registry, max_candidates: usize) -> Vec<u8> {
    let p = DataProfile::of(slice);
    if p.entropy > INCOMPRESSIBLE_ENTROPY {
        return vec![codec::STORE];
    }

    let mut scores: Vec<(f64, u8)> = Vec::new();
    for id in registry.ids() {
        let base = match id {
            codec::RLE => 10.0 * p.repetition - p.entropy,
            codec::DICTIONARY => 8.0 * p.text + 4.0 * p.repetition - 0.8 * p.entropy,
            codec::HUFFMAN => 10.0 - 1.2 * p.entropy,
            codec::DELTA => 10.0 * p.small_delta - 0.7 * p.entropy,
            codec::DEFLATE => 7.0 - 0.8 * p.entropy + 3.0 * p.text,
            codec::BZIP2 => 7.5 * p.text - 0.6 * p.entropy,
            codec::LZMA => 6.0 - 0.6 * p.entropy + 2.0 * p.repetition,
            codec::ZSTD => 6.0 - 0.7 * p.entropy + 2.0 * p.text + 2.0 * p.repetition,
            codec::LZ4 => 5.0 - 0.6 * p.entropy + 1.5 * p.repetition,
            codec::BROTLI => 7.0 * p.text - 0.5 * p.entropy,
            codec::LZHAM => 5.0 - 0.6 * p.entropy + 3.0 * (1.0 - p.text),
            _ => continue,
        };
        let adjusted = base + adjustment(id, registry);
        scores.push((adjusted, id));
    }
    // Highest score first; equal scores resolve to the lowest id.
    scores.sort_unstable_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    scores.truncate(max_candidates);
    scores.into_iter().map(|(_, id)| id).collect()
}

/// Fixed score adjustments: the cheap built-ins (and bzip2) get a bonus,
/// non-compatible Zstandard/Brotli implementations a penalty.
fn adjustment(id: u8, registry: &Registry) -> f64 {
    match id {
        codec::RLE | codec::DICTIONARY | codec::HUFFMAN | codec::DELTA | codec::BZIP2 => 2.0,
        codec::ZSTD | codec::BROTLI => {
            let compatible = registry.get(id).map(|c| c.compatible()).unwrap_or(false);
            if compatible {
                0.0
            } else {
                -3.0
            }
        }
        _ => 0.0,
    }
}
