#![allow(dead_code)]

use rand::Rng;

use ambc::{CompressionOptions, CompressionStats};

pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    rand::rng().fill(&mut data[..]);
    data
}

/// Run, text and random sections, the classic mixed workload.
pub fn mixed_input() -> Vec<u8> {
    let mut data = vec![b'A'; 1000];
    data.extend(
        b"The quick brown fox jumps over the lazy dog. "
            .iter()
            .cycle()
            .take(4600),
    );
    data.extend(random_bytes(1000));
    data
}

pub fn sequential() -> CompressionOptions {
    CompressionOptions {
        num_workers: 1,
        ..Default::default()
    }
}

pub fn parallel(workers: usize) -> CompressionOptions {
    CompressionOptions {
        num_workers: workers,
        ..Default::default()
    }
}

/// The accounting laws every compress run must satisfy.
pub fn assert_stats_consistent(archive: &[u8], stats: &CompressionStats) {
    assert_eq!(stats.compressed_size, archive.len() as u64);
    assert_eq!(
        stats.chunks.compressed_size_without_overhead
            + stats.chunks.overhead_bytes
            + stats.header_size as u64,
        archive.len() as u64,
    );
    let usage: u64 = stats.chunks.method_usage.values().sum();
    assert_eq!(
        usage + stats.chunks.fallback_raw_chunks,
        stats.chunks.total_chunks
    );
    assert_eq!(
        stats.chunks.compressed_chunks + stats.chunks.raw_chunks,
        stats.chunks.total_chunks
    );
}
