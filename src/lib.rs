mod chunk;
pub mod codec;
mod compress;
mod decompress;
mod error;
pub mod header;
mod marker;
mod parallel;
mod planner;
mod profile;
mod stats;

pub use codec::{Codec, CodecError, Registry};
pub use compress::{compress, CompressionOptions};
pub use decompress::decompress;
pub use error::Error;
pub use marker::{find_marker, Marker};
pub use profile::DataProfile;
pub use stats::{ChunkStats, CompressionStats, DecompressionStats};
