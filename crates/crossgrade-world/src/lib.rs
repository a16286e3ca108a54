//! In-memory chunk columns and the network terrain encoding.

pub mod chunk;
pub mod network;
pub mod palette;
pub mod sub_chunk;

pub use chunk::*;
pub use network::*;
pub use palette::*;
pub use sub_chunk::*;

use crossgrade_protocol_core::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("Unsupported bits per block: {0}")]
    UnsupportedBitsPerBlock(u8),
    #[error("Storage uses disk persistence, expected runtime IDs")]
    DiskPersistence,
    #[error("Palette size {0} is out of range")]
    InvalidPaletteSize(i32),
    #[error("Palette index {index} out of range for palette of {len}")]
    PaletteIndexOutOfRange { index: u16, len: usize },
    #[error("Unknown sub chunk version {0}")]
    UnknownSubChunkVersion(u8),
    #[error("Sub chunk index {0} is outside the height range")]
    SubChunkIndexOutOfRange(i32),
    #[error("Sub chunk count {count} exceeds the {max} sub chunks of the height range")]
    TooManySubChunks { count: usize, max: usize },
    #[error("Block storage references the previous storage")]
    UnexpectedPreviousReference,
    #[error("First biome storage references a previous one")]
    FirstBiomeReferencesPrevious,
}
