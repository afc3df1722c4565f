use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use log::debug;
use md5::{Digest, Md5};

use crate::chunk;
use crate::codec::Registry;
use crate::error::Error;
use crate::header;
use crate::marker;
use crate::parallel;
use crate::planner;
use crate::stats::{ChunkStats, CompressionStats};

/// Options for the [`compress`] function.
#[derive(Clone, Debug)]
pub struct CompressionOptions {
    /// Chunk size the planner starts its search from.
    pub initial_chunk_size: usize,
    /// Bytes sampled while searching for a marker. Zero scans the whole
    /// input.
    pub marker_sample_size: usize,
    /// Worker threads encoding chunks. One keeps everything on the calling
    /// thread.
    pub num_workers: usize,
}

impl Default for CompressionOptions {
    fn default() -> CompressionOptions {
        let num_workers = match num_cpus::get() {
            0 | 1 => 1,
            n => n - 1,
        };
        CompressionOptions {
            initial_chunk_size: 4096,
            marker_sample_size: 10_000,
            num_workers,
        }
    }
}

/// Compress `input` into a self describing archive.
///
/// The archive embeds an MD5 digest of the input, a sync marker chosen to
/// be absent from it, and one independently coded chunk per planned slice.
pub fn compress(
    input: &[u8],
    options: &CompressionOptions,
) -> Result<(Vec<u8>, CompressionStats), Error> {
    let start = Instant::now();
    let registry = Arc::new(Registry::new());

    let checksum: [u8; 16] = Md5::digest(input).into();
    let marker = marker::find_marker(input, options.marker_sample_size);
    debug!("compressing {} bytes, marker {}", input.len(), marker);

    let mut archive = header::build(&marker, &checksum, input.len() as u64);
    let header_size = archive.len();

    let data = Bytes::copy_from_slice(input);
    let plans = planner::plan_chunks(&data, &registry, options.initial_chunk_size);
    let mut chunk_stats = ChunkStats::default();
    let frames = parallel::encode_chunks(
        &data,
        &plans,
        &marker,
        &registry,
        options.num_workers,
        &mut chunk_stats,
    );
    for frame in &frames {
        archive.extend_from_slice(frame);
    }

    let terminator = chunk::end_chunk(&marker);
    chunk_stats.record_terminator(terminator.len());
    archive.extend_from_slice(&terminator);

    let chunk_stream_size = (archive.len() - header_size) as u64;
    header::patch_compressed_size(&mut archive, header_size, chunk_stream_size);

    let stats = CompressionStats {
        original_size: input.len() as u64,
        compressed_size: archive.len() as u64,
        header_size: header_size as u32,
        elapsed: start.elapsed(),
        chunks: chunk_stats,
    };
    debug!("{}", stats);
    Ok((archive, stats))
}
