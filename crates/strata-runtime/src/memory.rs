use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use strata_chunk::Chunk;
use strata_world::ChunkPos;

use crate::loader::{ChunkLoader, PersistError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub loads: u64,
    pub saves: u64,
    pub extra_chunk_saves: u64,
    pub extra_saves: u64,
}

/// Shared counters so a store can be handed to a cache and still observed.
#[derive(Debug, Default)]
pub struct StoreCounters {
    loads: AtomicU64,
    saves: AtomicU64,
    extra_chunk_saves: AtomicU64,
    extra_saves: AtomicU64,
}

impl StoreCounters {
    pub fn snapshot(&self) -> StoreStats {
        StoreStats {
            loads: self.loads.load(Ordering::Relaxed),
            saves: self.saves.load(Ordering::Relaxed),
            extra_chunk_saves: self.extra_chunk_saves.load(Ordering::Relaxed),
            extra_saves: self.extra_saves.load(Ordering::Relaxed),
        }
    }
}

/// In-memory persistence. Saved chunks go through the same decode path a disk
/// store would use, so a reload comes back unmodified and unloaded.
#[derive(Default)]
pub struct MemoryChunkStore {
    chunks: HashMap<ChunkPos, Chunk>,
    last_save_times: HashMap<ChunkPos, i64>,
    counters: Arc<StoreCounters>,
}

impl MemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self) -> Arc<StoreCounters> {
        self.counters.clone()
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        self.chunks.contains_key(&ChunkPos::new(x, z))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// World time stamped on the chunk when it was last saved.
    pub fn last_save_time(&self, x: i32, z: i32) -> Option<i64> {
        self.last_save_times.get(&ChunkPos::new(x, z)).copied()
    }
}

impl ChunkLoader for MemoryChunkStore {
    fn load_chunk(&mut self, x: i32, z: i32) -> Result<Option<Chunk>, PersistError> {
        let found = self.chunks.get(&ChunkPos::new(x, z)).cloned();
        if found.is_some() {
            self.counters.loads.fetch_add(1, Ordering::Relaxed);
        }
        Ok(found)
    }

    fn save_chunk(&mut self, chunk: &Chunk) -> Result<(), PersistError> {
        let copy = Chunk::restored(
            chunk.pos(),
            chunk.blocks().as_slice().to_vec(),
            chunk.metadata_bytes().to_vec(),
            chunk.is_terrain_populated,
        )
        .map_err(|e| PersistError::Encode(e.to_string()))?;
        self.chunks.insert(chunk.pos(), copy);
        self.last_save_times.insert(chunk.pos(), chunk.last_save_time);
        self.counters.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn save_extra_chunk_data(&mut self, _chunk: &Chunk) -> Result<(), PersistError> {
        self.counters.extra_chunk_saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn save_extra_data(&mut self) -> Result<(), PersistError> {
        self.counters.extra_saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::ids;
    use strata_world::BlockColumn;

    #[test]
    fn save_then_load_round_trips_blocks() {
        let mut store = MemoryChunkStore::new();
        let mut col = BlockColumn::new();
        col.set(3, 10, 4, ids::STONE);
        let mut chunk = Chunk::generated(ChunkPos::new(2, -1), col);
        chunk.set_metadata(3, 10, 4, 7);
        chunk.is_terrain_populated = true;
        chunk.last_save_time = 99;
        store.save_chunk(&chunk).unwrap();

        let back = store.load_chunk(2, -1).unwrap().unwrap();
        assert_eq!(back.block(3, 10, 4), ids::STONE);
        assert_eq!(back.metadata(3, 10, 4), 7);
        assert!(back.is_terrain_populated);
        assert!(!back.is_modified);
        assert_eq!(store.last_save_time(2, -1), Some(99));
        assert!(store.load_chunk(0, 0).unwrap().is_none());

        let stats = store.counters().snapshot();
        assert_eq!((stats.loads, stats.saves), (1, 1));
    }
}
