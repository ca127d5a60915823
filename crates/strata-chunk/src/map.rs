use std::sync::Arc;

use hashbrown::HashMap;
use strata_blocks::BlockRegistry;
use strata_world::ChunkPos;

use crate::access::BlockAccess;
use crate::chunk::Chunk;

/// Unbounded set of chunks keyed by position.
pub struct ChunkMap {
    registry: Arc<BlockRegistry>,
    chunks: HashMap<ChunkPos, Chunk>,
}

impl ChunkMap {
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self {
            registry,
            chunks: HashMap::new(),
        }
    }

    /// Inserts a chunk at its own position, returning the one it replaced.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.pos(), chunk)
    }

    pub fn remove(&mut self, pos: ChunkPos) -> Option<Chunk> {
        self.chunks.remove(&pos)
    }

    #[inline]
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }
}

impl BlockAccess for ChunkMap {
    #[inline]
    fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    #[inline]
    fn chunk_at(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    #[inline]
    fn chunk_at_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }
}
