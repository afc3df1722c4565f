//! Counters gathered while compressing or decompressing one stream.

use std::collections::HashMap;
use std::time::Duration;

use crate::codec;

const MIB: f64 = 1024.0 * 1024.0;

/// How a single encoded chunk ended up on the wire.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ChunkOutcome {
    /// Codec the planner picked for the chunk.
    pub planned_codec: u8,
    /// Codec actually written; store when compression did not pay or failed.
    pub stored_codec: u8,
    pub original_len: usize,
    pub payload_len: usize,
    pub overhead: usize,
}

/// Per-chunk counters of one compress run.
#[derive(Clone, Debug, Default)]
pub struct ChunkStats {
    pub total_chunks: u64,
    /// Chunks written with a real codec.
    pub compressed_chunks: u64,
    /// Chunks written raw, planned or demoted.
    pub raw_chunks: u64,
    /// Chunks planned for a codec but demoted to raw by the
    /// does-not-pay check or a codec failure.
    pub fallback_raw_chunks: u64,
    /// Chunk count per codec id actually used as planned.
    pub method_usage: HashMap<u8, u64>,
    pub bytes_saved: i64,
    /// Sum of payload bytes, raw and compressed alike.
    pub compressed_size_without_overhead: u64,
    /// Sum of frame bytes (markers and chunk headers), terminator included.
    pub overhead_bytes: u64,
}

impl ChunkStats {
    pub(crate) fn record(&mut self, outcome: &ChunkOutcome) {
        self.total_chunks += 1;
        self.compressed_size_without_overhead += outcome.payload_len as u64;
        self.overhead_bytes += outcome.overhead as u64;
        if outcome.stored_codec == codec::STORE {
            self.raw_chunks += 1;
            if outcome.planned_codec != codec::STORE {
                self.fallback_raw_chunks += 1;
            } else {
                *self.method_usage.entry(codec::STORE).or_insert(0) += 1;
            }
        } else {
            self.compressed_chunks += 1;
            *self.method_usage.entry(outcome.stored_codec).or_insert(0) += 1;
            self.bytes_saved +=
                outcome.original_len as i64 - (outcome.payload_len + outcome.overhead) as i64;
        }
    }

    pub(crate) fn record_terminator(&mut self, overhead: usize) {
        self.overhead_bytes += overhead as u64;
    }
}

/// Result statistics of one compress call.
#[derive(Clone, Debug, Default)]
pub struct CompressionStats {
    pub original_size: u64,
    pub compressed_size: u64,
    pub header_size: u32,
    pub elapsed: Duration,
    pub chunks: ChunkStats,
}

impl CompressionStats {
    /// Compressed over original size; 1.0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.original_size as f64
        }
    }

    pub fn percent_reduction(&self) -> f64 {
        if self.original_size == 0 {
            0.0
        } else {
            (1.0 - self.ratio()) * 100.0
        }
    }

    pub fn throughput_mb_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.original_size as f64 / (MIB * secs)
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} bytes -> {} bytes (ratio {:.4}, {:.1}% reduction)",
            self.original_size,
            self.compressed_size,
            self.ratio(),
            self.percent_reduction()
        )?;
        writeln!(
            f,
            "chunks: {} total, {} compressed, {} raw",
            self.chunks.total_chunks, self.chunks.compressed_chunks, self.chunks.raw_chunks
        )?;
        let mut usage: Vec<(&u8, &u64)> = self.chunks.method_usage.iter().collect();
        usage.sort_unstable();
        for (id, count) in usage {
            writeln!(f, "  {}: {} chunks", codec::name_of(*id), count)?;
        }
        Ok(())
    }
}

/// Result statistics of one decompress call.
#[derive(Clone, Debug, Default)]
pub struct DecompressionStats {
    pub compressed_size: u64,
    pub decompressed_size: u64,
    pub elapsed: Duration,
    /// Chunks whose codec id was not registered; decoded as zero fill.
    pub unknown_codec_chunks: u64,
    /// Chunks whose codec failed to decode; decoded as zero fill.
    pub failed_chunks: u64,
    /// Decoded stream had to be padded or truncated to the header size.
    pub size_mismatch: bool,
}

impl DecompressionStats {
    /// True when some chunk did not decode cleanly. The digest check is the
    /// final arbiter, but a caller may want to report the cause.
    pub fn has_warnings(&self) -> bool {
        self.unknown_codec_chunks > 0 || self.failed_chunks > 0 || self.size_mismatch
    }

    pub fn throughput_mb_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.decompressed_size as f64 / (MIB * secs)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_plus_fallbacks_covers_all_chunks() {
        let mut stats = ChunkStats::default();
        stats.record(&ChunkOutcome {
            planned_codec: codec::RLE,
            stored_codec: codec::RLE,
            original_len: 4096,
            payload_len: 100,
            overhead: 13,
        });
        stats.record(&ChunkOutcome {
            planned_codec: codec::HUFFMAN,
            stored_codec: codec::STORE,
            original_len: 4096,
            payload_len: 4096,
            overhead: 13,
        });
        stats.record(&ChunkOutcome {
            planned_codec: codec::STORE,
            stored_codec: codec::STORE,
            original_len: 1000,
            payload_len: 1000,
            overhead: 13,
        });
        let usage: u64 = stats.method_usage.values().sum();
        assert_eq!(usage + stats.fallback_raw_chunks, stats.total_chunks);
        assert_eq!(stats.compressed_chunks, 1);
        assert_eq!(stats.raw_chunks, 2);
        assert_eq!(stats.bytes_saved, 4096 - 113);
    }

    #[test]
    fn ratio_of_empty_input_is_one() {
        let stats = CompressionStats::default();
        assert_eq!(stats.ratio(), 1.0);
        assert_eq!(stats.percent_reduction(), 0.0);
    }
}
