//! Archive file header.
//!
//! | Offset       | Size | Description                                   |
//! |--------------|------|-----------------------------------------------|
//! | 0            | 4    | Archive file magic (AMBC).                    |
//! | 4            | 1    | Format version.                               |
//! | 5            | 4    | Header size in bytes (u32 le).                |
//! | 9            | 1    | Marker bit length, 1 to 32.                   |
//! | 10           | n    | Marker aligned bytes, n = ceil(bits / 8).     |
//! | 10 + n       | 1    | Checksum type (1 = MD5).                      |
//! | 11 + n       | 16   | MD5 digest of the original input.             |
//! | 27 + n       | 8    | Original size (u64 le).                       |
//! | 35 + n       | 8    | Compressed size (u64 le, patched last).       |

use crate::error::Error;
use crate::marker::Marker;

/// Archive file magic.
pub const FILE_MAGIC: &[u8; 4] = b"AMBC";
/// Newest format version this crate reads and the one it always writes.
pub const FORMAT_VERSION: u8 = 2;
/// The only defined checksum type.
pub const CHECKSUM_TYPE_MD5: u8 = 1;

/// Fixed part of the header, everything except the marker bytes.
const FIXED_SIZE: usize = 4 + 1 + 4 + 1 + 1 + 16 + 8 + 8;

/// Parsed file header.
#[derive(Clone, Debug)]
pub struct Header {
    pub version: u8,
    pub header_size: u32,
    pub marker: Marker,
    pub checksum: [u8; 16],
    pub original_size: u64,
    pub compressed_size: u64,
}

/// Size of the header a given marker produces.
pub fn size_for(marker: &Marker) -> usize {
    FIXED_SIZE + marker.byte_len()
}

/// Build a file header. The compressed size field is left zero; it is
/// patched with [`patch_compressed_size`] once the chunk stream length is
/// known.
pub fn build(marker: &Marker, checksum: &[u8; 16], original_size: u64) -> Vec<u8> {
    let mut header: Vec<u8> = Vec::with_capacity(size_for(marker));
    header.extend_from_slice(FILE_MAGIC);
    header.push(FORMAT_VERSION);
    header.extend_from_slice(&[0u8; 4]);
    header.push(marker.bit_length());
    header.extend_from_slice(marker.aligned_bytes());
    header.push(CHECKSUM_TYPE_MD5);
    header.extend_from_slice(checksum);
    header.extend_from_slice(&original_size.to_le_bytes());
    header.extend_from_slice(&0u64.to_le_bytes());

    let header_size = header.len() as u32;
    header[5..9].copy_from_slice(&header_size.to_le_bytes());
    header
}

/// Write the final compressed size into an already emitted header.
pub fn patch_compressed_size(archive: &mut [u8], header_size: usize, compressed_size: u64) {
    archive[header_size - 8..header_size].copy_from_slice(&compressed_size.to_le_bytes());
}

/// Parse and validate the header at the start of `archive`.
pub fn parse(archive: &[u8]) -> Result<Header, Error> {
    if archive.len() < 4 {
        return Err(Error::InvalidMagic);
    }
    if &archive[0..4] != FILE_MAGIC {
        return Err(Error::InvalidMagic);
    }
    if archive.len() < 10 {
        return Err(Error::TruncatedHeader);
    }
    let version = archive[4];
    if version > FORMAT_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }
    let header_size = u32::from_le_bytes([archive[5], archive[6], archive[7], archive[8]]);

    let marker_bits = archive[9];
    if marker_bits == 0 || marker_bits > 32 {
        return Err(Error::InvalidMarkerLength(marker_bits));
    }
    let marker_bytes = (marker_bits as usize + 7) / 8;
    let expected_size = FIXED_SIZE + marker_bytes;
    if (header_size as usize) < expected_size || archive.len() < expected_size {
        return Err(Error::TruncatedHeader);
    }
    let marker = Marker::from_aligned(archive[10..10 + marker_bytes].to_vec(), marker_bits);

    let mut pos = 10 + marker_bytes;
    let checksum_type = archive[pos];
    if checksum_type != CHECKSUM_TYPE_MD5 {
        return Err(Error::UnknownChecksumType(checksum_type));
    }
    pos += 1;
    let mut checksum = [0u8; 16];
    checksum.copy_from_slice(&archive[pos..pos + 16]);
    pos += 16;
    let original_size = u64::from_le_bytes(archive[pos..pos + 8].try_into().unwrap());
    pos += 8;
    let compressed_size = u64::from_le_bytes(archive[pos..pos + 8].try_into().unwrap());

    Ok(Header {
        version,
        header_size,
        marker,
        checksum,
        original_size,
        compressed_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> Marker {
        Marker::new(0b101, 3)
    }

    #[test]
    fn build_parse_round_trip() {
        let checksum = [7u8; 16];
        let mut archive = build(&marker(), &checksum, 123_456);
        let header_size = archive.len();
        patch_compressed_size(&mut archive, header_size, 777);

        let parsed = parse(&archive).unwrap();
        assert_eq!(parsed.version, FORMAT_VERSION);
        assert_eq!(parsed.header_size as usize, header_size);
        assert_eq!(parsed.marker, marker());
        assert_eq!(parsed.checksum, checksum);
        assert_eq!(parsed.original_size, 123_456);
        assert_eq!(parsed.compressed_size, 777);
    }

    #[test]
    fn declared_size_matches_marker_width() {
        for bits in [1u8, 8, 9, 16, 32] {
            let m = Marker::new(0, bits);
            assert_eq!(build(&m, &[0u8; 16], 0).len(), size_for(&m));
        }
    }

    #[test]
    fn rejects_bad_magic() {
        let mut archive = build(&marker(), &[0u8; 16], 0);
        archive[0] = b'X';
        assert!(matches!(parse(&archive), Err(Error::InvalidMagic)));
    }

    #[test]
    fn rejects_newer_version() {
        let mut archive = build(&marker(), &[0u8; 16], 0);
        archive[4] = FORMAT_VERSION + 1;
        assert!(matches!(parse(&archive), Err(Error::UnsupportedVersion(_))));
    }

    #[test]
    fn rejects_truncation() {
        let archive = build(&marker(), &[0u8; 16], 0);
        assert!(matches!(
            parse(&archive[..archive.len() - 5]),
            Err(Error::TruncatedHeader)
        ));
    }

    #[test]
    fn rejects_unknown_checksum_type() {
        let mut archive = build(&marker(), &[0u8; 16], 0);
        let marker_bytes = marker().byte_len();
        archive[10 + marker_bytes] = 2;
        assert!(matches!(
            parse(&archive),
            Err(Error::UnknownChecksumType(2))
        ));
    }
}
