use log::info;
use strata_blocks::BlockRegistry;
use strata_chunk::{BlockAccess, Chunk};
use strata_world::ChunkPos;

use crate::cache::ChunkCache;
use crate::provider::{ProgressSink, SaveOutcome};

/// Owns the chunk cache and the world clock. Every tick pushes the time into
/// the cache and spends the per-tick save budget if anything is dirty.
pub struct World {
    seed: i64,
    time: i64,
    cache: ChunkCache,
}

impl World {
    pub fn new(seed: i64, cache: ChunkCache) -> Self {
        Self {
            seed,
            time: 0,
            cache,
        }
    }

    #[inline]
    pub fn seed(&self) -> i64 {
        self.seed
    }

    #[inline]
    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn set_time(&mut self, time: i64) {
        self.time = time;
        self.cache.set_world_time(time);
    }

    pub fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ChunkCache {
        &mut self.cache
    }

    /// Moves the area the cache serves, in chunk coordinates.
    pub fn track(&mut self, cx: i32, cz: i32) {
        self.cache.set_tracked_center(cx, cz);
    }

    pub fn provide_chunk(&mut self, cx: i32, cz: i32) -> &mut Chunk {
        self.cache.provide_chunk(cx, cz)
    }

    /// Provides every chunk within `radius` of the tracked center.
    pub fn provide_around_center(&mut self, radius: i32) -> usize {
        let ChunkPos { x, z } = self.cache.tracked_center();
        let mut served = 0;
        for cx in x - radius..=x + radius {
            for cz in z - radius..=z + radius {
                if !self.cache.provide_chunk(cx, cz).is_placeholder() {
                    served += 1;
                }
            }
        }
        served
    }

    pub fn tick(&mut self) -> SaveOutcome {
        self.time += 1;
        self.cache.set_world_time(self.time);
        if self.cache.has_unsaved_work() {
            self.cache.save_chunks(false, None)
        } else {
            SaveOutcome::Complete
        }
    }

    /// Saves everything and empties the cache.
    pub fn shutdown(&mut self, progress: Option<&mut dyn ProgressSink>) -> SaveOutcome {
        let outcome = self.cache.unload_all(progress);
        info!(target: "world", "world {} shut down at time {}", self.seed, self.time);
        outcome
    }
}

impl BlockAccess for World {
    fn registry(&self) -> &BlockRegistry {
        self.cache.registry()
    }

    fn chunk_at(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.cache.chunk_at(pos)
    }

    fn chunk_at_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.cache.chunk_at_mut(pos)
    }
}
