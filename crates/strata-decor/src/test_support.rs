use std::sync::Arc;

use strata_blocks::{BlockId, BlockRegistry, ids};
use strata_chunk::{Chunk, ChunkMap};
use strata_world::{BlockColumn, ChunkPos};

/// Chunks -1..=2 on both axes: stone below `top`, `surface` at `top`, air above.
pub fn flat_world(surface: BlockId, top: usize) -> ChunkMap {
    let mut map = ChunkMap::new(Arc::new(BlockRegistry::builtin()));
    for cx in -1..=2 {
        for cz in -1..=2 {
            let mut col = BlockColumn::new();
            for x in 0..16 {
                for z in 0..16 {
                    for y in 0..top {
                        col.set(x, y, z, ids::STONE);
                    }
                    col.set(x, top, z, surface);
                }
            }
            map.insert(Chunk::generated(ChunkPos::new(cx, cz), col));
        }
    }
    map
}

pub fn count(map: &ChunkMap, id: BlockId) -> usize {
    map.iter()
        .map(|c| c.blocks().as_slice().iter().filter(|&&b| b == id).count())
        .sum()
}
