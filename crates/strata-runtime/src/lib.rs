//! Chunk lifecycle: provider chaining, the slot cache, persistence boundary,
//! world clock and parallel pregeneration.
#![forbid(unsafe_code)]

mod cache;
mod gen_pool;
mod generator;
mod loader;
mod memory;
pub mod pregen;
mod provider;
mod world;

pub use cache::{CacheStats, ChunkCache, SLOT_COUNT, SLOT_SPAN, slot_index};
pub use gen_pool::{GeneratorPool, PooledGenerator};
pub use generator::GeneratorProvider;
pub use loader::{ChunkLoader, PersistError};
pub use memory::{MemoryChunkStore, StoreCounters, StoreStats};
pub use pregen::{PregenOut, Pregenerator};
pub use provider::{ChunkProvider, LogProgress, ProgressSink, SaveOutcome};
pub use world::World;
