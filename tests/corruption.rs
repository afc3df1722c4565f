mod common;

use ambc::{compress, decompress, header, Error};

use common::*;

/// Offset of the first chunk's payload in `archive`.
fn first_payload_offset(archive: &[u8]) -> usize {
    let parsed = header::parse(archive).unwrap();
    // Marker, codec id, k value, used bytes, original and compressed length.
    parsed.header_size as usize + parsed.marker.byte_len() + 1 + 1 + 2 + 4 + 4
}

// ============================================================================
// Corrupted archives must never decode silently
// ============================================================================

#[test]
fn flipped_payload_byte_fails_the_digest() {
    let input = mixed_input();
    let (mut archive, _) = compress(&input, &sequential()).unwrap();

    let at = first_payload_offset(&archive) + 5;
    archive[at] ^= 0xff;

    match decompress(&archive) {
        Err(Error::ChecksumMismatch) => {}
        other => panic!("corrupt payload must fail the digest, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn flipped_marker_byte_is_a_marker_mismatch() {
    let input = mixed_input();
    let (mut archive, stats) = compress(&input, &sequential()).unwrap();

    let at = stats.header_size as usize;
    archive[at] ^= 0xff;

    assert!(matches!(decompress(&archive), Err(Error::MarkerMismatch)));
}

#[test]
fn unknown_codec_id_zero_fills_and_fails_the_digest() {
    let input = vec![b'A'; 4096];
    let (mut archive, stats) = compress(&input, &sequential()).unwrap();

    let parsed = header::parse(&archive).unwrap();
    let codec_id_at = stats.header_size as usize + parsed.marker.byte_len();
    archive[codec_id_at] = 200;

    assert!(matches!(decompress(&archive), Err(Error::ChecksumMismatch)));
}

#[test]
fn truncated_archive_is_rejected() {
    let input = mixed_input();
    let (archive, _) = compress(&input, &sequential()).unwrap();

    let cut = &archive[..archive.len() - 4];
    match decompress(cut) {
        Err(Error::TruncatedPayload) | Err(Error::ChecksumMismatch) => {}
        other => panic!("truncated archive must fail, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn truncation_inside_a_payload_is_rejected() {
    let input = mixed_input();
    let (archive, _) = compress(&input, &sequential()).unwrap();

    let cut = &archive[..first_payload_offset(&archive) + 2];
    assert!(matches!(decompress(cut), Err(Error::TruncatedPayload)));
}

#[test]
fn flipped_stored_digest_is_a_checksum_mismatch() {
    let input = mixed_input();
    let (mut archive, _) = compress(&input, &sequential()).unwrap();

    let parsed = header::parse(&archive).unwrap();
    // The digest sits right after the checksum type byte.
    let digest_at = 10 + parsed.marker.byte_len() + 1;
    archive[digest_at] ^= 0x01;

    assert!(matches!(decompress(&archive), Err(Error::ChecksumMismatch)));
}

#[test]
fn arbitrary_bytes_are_not_an_archive() {
    assert!(matches!(
        decompress(b"definitely not an archive"),
        Err(Error::InvalidMagic)
    ));
    assert!(matches!(decompress(b""), Err(Error::InvalidMagic)));
}
