//! Chunk frame layout, one encoded record of the archive body.
//!
//! Each frame is the marker bytes followed by a fixed header and the
//! payload:
//!
//! ```text
//! [marker] [codec id, 1] [k value, 1] [used bytes, u16 le]
//! [original length, u32 le] [compressed length, u32 le] [payload]
//! ```
//!
//! A frame with codec id 0 and zeroed length fields terminates the stream.

use log::{debug, warn};

use crate::codec::{self, Registry};
use crate::error::Error;
use crate::marker::Marker;
use crate::stats::ChunkOutcome;

/// Frame header bytes that follow the marker.
const FRAME_FIELDS: usize = 1 + 1 + 2 + 4 + 4;

/// Full framing overhead of one chunk under the given marker.
pub(crate) fn frame_overhead(marker: &Marker) -> usize {
    marker.byte_len() + FRAME_FIELDS
}

/// Slab bucket such that `2^(10 + k)` covers `size`, clamped to 16.
/// Informational on the wire; never read back during decode.
pub(crate) fn k_value_for(size: usize) -> u8 {
    if size <= 1024 {
        return 0;
    }
    let ceil_log2 = (usize::BITS - (size - 1).leading_zeros()) as i32;
    (ceil_log2 - 10).clamp(0, 16) as u8
}

/// One encoded frame plus the bookkeeping the stats accumulator wants.
pub(crate) struct EncodedChunk {
    pub bytes: Vec<u8>,
    pub outcome: ChunkOutcome,
}

/// Encode one chunk with the planned codec, falling back to a raw store
/// frame when compression fails or does not pay for its own overhead.
pub(crate) fn encode_chunk(
    data: &[u8],
    planned_codec: u8,
    marker: &Marker,
    registry: &Registry,
) -> EncodedChunk {
    let overhead = frame_overhead(marker);
    let (stored_codec, payload) = match registry.get(planned_codec) {
        Some(chosen) if planned_codec != codec::STORE => match chosen.compress(data) {
            Ok(compressed) if compressed.len() + overhead < data.len() => {
                (planned_codec, compressed)
            }
            Ok(_) => {
                debug!(
                    "{} does not pay on {} bytes, storing raw",
                    chosen.name(),
                    data.len()
                );
                (codec::STORE, data.to_vec())
            }
            Err(err) => {
                warn!("{} failed ({}), storing raw", chosen.name(), err);
                (codec::STORE, data.to_vec())
            }
        },
        _ => (codec::STORE, data.to_vec()),
    };

    let mut bytes = Vec::with_capacity(overhead + payload.len());
    bytes.extend_from_slice(marker.aligned_bytes());
    bytes.push(stored_codec);
    bytes.push(k_value_for(data.len()));
    bytes.extend_from_slice(&(data.len().min(u16::MAX as usize) as u16).to_le_bytes());
    bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&payload);

    EncodedChunk {
        outcome: ChunkOutcome {
            planned_codec,
            stored_codec,
            original_len: data.len(),
            payload_len: payload.len(),
            overhead,
        },
        bytes,
    }
}

/// The terminating frame: codec id 0, all length fields zero.
pub(crate) fn end_chunk(marker: &Marker) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(frame_overhead(marker));
    bytes.extend_from_slice(marker.aligned_bytes());
    bytes.extend_from_slice(&[codec::END_OF_STREAM, 0]);
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes
}

/// A frame as read back from an archive. Payload borrows the archive.
pub(crate) struct RawChunk<'a> {
    pub codec_id: u8,
    #[allow(dead_code)]
    pub k_value: u8,
    #[allow(dead_code)]
    pub used_bytes: u16,
    pub original_length: u32,
    pub payload: &'a [u8],
}

/// Sequential frame reader over the chunk stream of an archive.
pub(crate) struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    marker: Marker,
}

impl<'a> ChunkReader<'a> {
    pub fn new(data: &'a [u8], start: usize, marker: Marker) -> Self {
        ChunkReader {
            data,
            pos: start,
            marker,
        }
    }

    /// Read the next frame. `Ok(None)` signals the terminator.
    pub fn next(&mut self) -> Result<Option<RawChunk<'a>>, Error> {
        let marker_len = self.marker.byte_len();
        if self.pos + frame_overhead(&self.marker) > self.data.len() {
            return Err(Error::TruncatedPayload);
        }
        if &self.data[self.pos..self.pos + marker_len] != self.marker.aligned_bytes() {
            return Err(Error::MarkerMismatch);
        }
        let mut pos = self.pos + marker_len;

        let codec_id = self.data[pos];
        let k_value = self.data[pos + 1];
        pos += 2;
        let used_bytes = u16::from_le_bytes(self.data[pos..pos + 2].try_into().unwrap());
        pos += 2;
        let original_length = u32::from_le_bytes(self.data[pos..pos + 4].try_into().unwrap());
        pos += 4;
        let compressed_length = u32::from_le_bytes(self.data[pos..pos + 4].try_into().unwrap());
        pos += 4;

        if codec_id == codec::END_OF_STREAM {
            self.pos = pos;
            return Ok(None);
        }
        let payload_end = pos + compressed_length as usize;
        if payload_end > self.data.len() {
            return Err(Error::TruncatedPayload);
        }
        let payload = &self.data[pos..payload_end];
        self.pos = payload_end;
        Ok(Some(RawChunk {
            codec_id,
            k_value,
            used_bytes,
            original_length,
            payload,
        }))
    }

    /// Current byte offset into the archive.
    pub fn offset(&self) -> usize {
        self.pos
    }
}
