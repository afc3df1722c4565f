//! Codec contract and the registry mapping wire ids to implementations.

mod delta;
mod dictionary;
mod huffman;
mod rle;
mod store;

mod deflate;

mod brotli;
#[cfg(feature = "bzip2-compression")]
mod bzip2;
#[cfg(feature = "lz4-compression")]
mod lz4;
#[cfg(feature = "lzma-compression")]
mod lzma;
#[cfg(feature = "zstd-compression")]
mod zstd;

/// Wire id of the end-of-stream chunk. Never registered as a codec.
pub const END_OF_STREAM: u8 = 0;
pub const RLE: u8 = 1;
pub const DICTIONARY: u8 = 2;
pub const HUFFMAN: u8 = 3;
pub const DELTA: u8 = 4;
pub const DEFLATE: u8 = 5;
pub const BZIP2: u8 = 6;
pub const LZMA: u8 = 7;
pub const ZSTD: u8 = 8;
pub const LZ4: u8 = 9;
pub const BROTLI: u8 = 10;
/// Reserved for LZHAM. No implementation is registered for it.
pub const LZHAM: u8 = 11;
/// Identity codec used whenever compression does not pay or fails.
pub const STORE: u8 = 255;

#[cfg(feature = "lzma-compression")]
use ::lzma::LzmaError;

#[derive(Debug)]
pub enum CodecError {
    IO(std::io::Error),
    /// The payload does not decode under this codec.
    Corrupt(&'static str),
    #[cfg(feature = "lzma-compression")]
    LZMA(LzmaError),
}

impl std::error::Error for CodecError {}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(err) => write!(f, "i/o error: {}", err),
            Self::Corrupt(what) => write!(f, "corrupt payload: {}", what),
            #[cfg(feature = "lzma-compression")]
            Self::LZMA(err) => write!(f, "LZMA error: {}", err),
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        Self::IO(e)
    }
}

#[cfg(feature = "lzma-compression")]
impl From<LzmaError> for CodecError {
    fn from(e: LzmaError) -> Self {
        Self::LZMA(e)
    }
}

/// The capability set every codec exposes to the engine.
///
/// `decompress` must produce exactly `original_length` bytes on success;
/// implementations pad or truncate their raw output to that length. A
/// failed decompress is recovered by the engine (zero fill on decode,
/// store fall-back on encode), so returning an error is always safe.
pub trait Codec: Send + Sync {
    /// Stable wire id.
    fn id(&self) -> u8;
    /// Human readable name used in logs and stats display.
    fn name(&self) -> &'static str;
    /// Cheap gate evaluated before any trial compression.
    fn should_use(&self, data: &[u8]) -> bool;
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
    fn decompress(&self, data: &[u8], original_length: usize) -> Result<Vec<u8>, CodecError>;
    /// Whether the implementation emits the plain standard format. Read by
    /// the codec scoring pass for ids 8 and 10.
    fn compatible(&self) -> bool {
        true
    }
}

/// Display name for a wire id, including ids this build has no codec for.
pub fn name_of(id: u8) -> &'static str {
    match id {
        END_OF_STREAM => "End",
        RLE => "RLE",
        DICTIONARY => "Dictionary",
        HUFFMAN => "Huffman",
        DELTA => "Delta",
        DEFLATE => "Deflate",
        BZIP2 => "BZip2",
        LZMA => "LZMA",
        ZSTD => "ZStandard",
        LZ4 => "LZ4",
        BROTLI => "Brotli",
        LZHAM => "LZHAM",
        STORE => "Store",
        _ => "Unknown",
    }
}

/// Fit `out` to the length the chunk header promised.
pub(crate) fn fit_length(mut out: Vec<u8>, original_length: usize) -> Vec<u8> {
    if out.len() != original_length {
        log::warn!(
            "decoded {} bytes where {} were expected",
            out.len(),
            original_length
        );
        out.resize(original_length, 0);
    }
    out
}

/// All registered codecs, keyed by wire id.
///
/// Construction order is fixed: the four built-ins, then whichever external
/// codecs are compiled in (in id order), then store. Ids missing from the
/// table decode through the unknown-codec path.
pub struct Registry {
    codecs: Vec<Box<dyn Codec>>,
    by_id: [Option<u8>; 256],
}

impl Registry {
    pub fn new() -> Registry {
        let mut codecs: Vec<Box<dyn Codec>> = vec![
            Box::new(rle::RleCodec),
            Box::new(dictionary::DictionaryCodec),
            Box::new(huffman::HuffmanCodec),
            Box::new(delta::DeltaCodec),
        ];
        codecs.push(Box::new(deflate::DeflateCodec));
        #[cfg(feature = "bzip2-compression")]
        codecs.push(Box::new(bzip2::Bzip2Codec));
        #[cfg(feature = "lzma-compression")]
        codecs.push(Box::new(lzma::LzmaCodec));
        #[cfg(feature = "zstd-compression")]
        codecs.push(Box::new(zstd::ZstdCodec));
        #[cfg(feature = "lz4-compression")]
        codecs.push(Box::new(lz4::Lz4Codec));
        codecs.push(Box::new(brotli::BrotliCodec));
        codecs.push(Box::new(store::StoreCodec));

        let mut by_id = [None; 256];
        for (index, codec) in codecs.iter().enumerate() {
            by_id[codec.id() as usize] = Some(index as u8);
        }
        Registry { codecs, by_id }
    }

    pub fn get(&self, id: u8) -> Option<&dyn Codec> {
        self.by_id[id as usize].map(|index| &*self.codecs[index as usize])
    }

    pub fn contains(&self, id: u8) -> bool {
        self.by_id[id as usize].is_some()
    }

    /// Registered ids in construction order.
    pub fn ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.codecs.iter().map(|codec| codec.id())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_and_store_are_always_registered() {
        let registry = Registry::new();
        for id in [RLE, DICTIONARY, HUFFMAN, DELTA, DEFLATE, BROTLI, STORE] {
            assert!(registry.contains(id), "id {} missing", id);
            assert_eq!(registry.get(id).unwrap().id(), id);
        }
        assert!(!registry.contains(END_OF_STREAM));
        assert!(!registry.contains(LZHAM));
    }

    #[test]
    fn store_is_registered_last() {
        let registry = Registry::new();
        assert_eq!(registry.ids().last(), Some(STORE));
    }

    #[test]
    fn every_codec_round_trips_mixed_data() {
        let registry = Registry::new();
        let mut data = Vec::new();
        data.extend_from_slice(&[7u8; 500]);
        data.extend_from_slice(b"The quick brown fox jumps over the lazy dog. ");
        data.extend((0..500u32).map(|i| (i * 17 % 256) as u8));
        for id in registry.ids() {
            let codec = registry.get(id).unwrap();
            let packed = codec.compress(&data).unwrap();
            let unpacked = codec.decompress(&packed, data.len()).unwrap();
            assert_eq!(unpacked, data, "codec {} failed round trip", codec.name());
        }
    }
}
