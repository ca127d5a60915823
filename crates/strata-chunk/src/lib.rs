//! Resident chunks, per-block metadata, and the world query trait decorators write through.
#![forbid(unsafe_code)]

mod access;
mod chunk;
mod map;
mod nibble;

pub use access::BlockAccess;
pub use chunk::{Chunk, ChunkError};
pub use map::ChunkMap;
pub use nibble::NibbleArray;
