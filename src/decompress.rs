use std::time::Instant;

use log::{debug, warn};
use md5::{Digest, Md5};

use crate::chunk::ChunkReader;
use crate::codec::Registry;
use crate::error::Error;
use crate::header;
use crate::stats::DecompressionStats;

/// Reconstruct the original bytes from an archive produced by
/// [`compress`](crate::compress).
///
/// Chunks with an unknown codec id or a failing codec decode as zero fill
/// and are counted in the returned stats; the final digest comparison then
/// decides whether the stream as a whole is acceptable.
pub fn decompress(archive: &[u8]) -> Result<(Vec<u8>, DecompressionStats), Error> {
    let start = Instant::now();
    let registry = Registry::new();

    let parsed = header::parse(archive)?;
    debug!(
        "decompressing {} byte archive, {} bytes expected, marker {}",
        archive.len(),
        parsed.original_size,
        parsed.marker
    );

    let mut stats = DecompressionStats {
        compressed_size: archive.len() as u64,
        ..Default::default()
    };
    let mut output: Vec<u8> = Vec::new();
    let mut reader = ChunkReader::new(archive, parsed.header_size as usize, parsed.marker.clone());

    while let Some(raw) = reader.next()? {
        let expected = raw.original_length as usize;
        match registry.get(raw.codec_id) {
            None => {
                warn!(
                    "unknown codec id {} at offset {}, zero filling {} bytes",
                    raw.codec_id,
                    reader.offset(),
                    expected
                );
                stats.unknown_codec_chunks += 1;
                output.extend(std::iter::repeat(0u8).take(expected));
            }
            Some(chosen) => match chosen.decompress(raw.payload, expected) {
                Ok(decoded) => output.extend_from_slice(&decoded),
                Err(err) => {
                    warn!(
                        "{} failed at offset {} ({}), zero filling {} bytes",
                        chosen.name(),
                        reader.offset(),
                        err,
                        expected
                    );
                    stats.failed_chunks += 1;
                    output.extend(std::iter::repeat(0u8).take(expected));
                }
            },
        }
    }

    if output.len() as u64 != parsed.original_size {
        warn!(
            "decoded {} bytes where the header declares {}, fixing up",
            output.len(),
            parsed.original_size
        );
        stats.size_mismatch = true;
        output.resize(parsed.original_size as usize, 0);
    }

    let digest: [u8; 16] = Md5::digest(&output).into();
    if digest != parsed.checksum {
        return Err(Error::ChecksumMismatch);
    }

    stats.decompressed_size = output.len() as u64;
    stats.elapsed = start.elapsed();
    Ok((output, stats))
}
