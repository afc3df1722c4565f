//! Runs planned chunk encodes across a worker pool.
//!
//! Jobs carry their index; finished frames land in an index-addressed
//! vector so the archive byte order never depends on completion order.
//! The statistics accumulator is the only mutable state the workers
//! share, behind a mutex held briefly per finished chunk.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use crossbeam_channel::unbounded;
use log::debug;
use threadpool::ThreadPool;

use crate::chunk;
use crate::codec::Registry;
use crate::marker::Marker;
use crate::planner::PlannedChunk;
use crate::stats::ChunkStats;

/// Encode every planned chunk, in parallel when more than one worker is
/// configured. Returned frames are in plan order.
pub(crate) fn encode_chunks(
    data: &Bytes,
    plans: &[PlannedChunk],
    marker: &Marker,
    registry: &Arc<Registry>,
    workers: usize,
    stats: &mut ChunkStats,
) -> Vec<Vec<u8>> {
    if workers <= 1 || plans.len() <= 1 {
        debug!("encoding {} chunks sequentially", plans.len());
        return plans
            .iter()
            .map(|plan| {
                let slice = &data[plan.offset..plan.offset + plan.size];
                let encoded = chunk::encode_chunk(slice, plan.codec_id, marker, registry);
                stats.record(&encoded.outcome);
                encoded.bytes
            })
            .collect();
    }

    debug!("encoding {} chunks on {} workers", plans.len(), workers);
    let shared_stats = Arc::new(Mutex::new(std::mem::take(stats)));
    let pool = ThreadPool::new(workers);
    let (tx, rx) = unbounded::<(usize, Vec<u8>)>();
    for (index, plan) in plans.iter().enumerate() {
        let slice = data.slice(plan.offset..plan.offset + plan.size);
        let codec_id = plan.codec_id;
        let marker = marker.clone();
        let registry = Arc::clone(registry);
        let worker_stats = Arc::clone(&shared_stats);
        let tx = tx.clone();
        pool.execute(move || {
            let encoded = chunk::encode_chunk(&slice, codec_id, &marker, &registry);
            worker_stats
                .lock()
                .expect("stats mutex")
                .record(&encoded.outcome);
            tx.send((index, encoded.bytes)).expect("result channel");
        });
    }
    drop(tx);

    let mut frames: Vec<Vec<u8>> = vec![Vec::new(); plans.len()];
    for (index, bytes) in rx.iter() {
        frames[index] = bytes;
    }
    pool.join();
    *stats = shared_stats.lock().expect("stats mutex").clone();
    frames
}
