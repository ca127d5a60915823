use strata_blocks::{BlockId, BlockRegistry, Material, ids};
use strata_world::{CHUNK_HEIGHT, ChunkPos};

use crate::chunk::Chunk;

/// Chunk and local coordinates of a world block, or `None` above or below the world.
#[inline]
pub(crate) fn locate(x: i32, y: i32, z: i32) -> Option<(ChunkPos, usize, usize, usize)> {
    if !(0..CHUNK_HEIGHT as i32).contains(&y) {
        return None;
    }
    Some((
        ChunkPos::containing(x, z),
        (x & 15) as usize,
        y as usize,
        (z & 15) as usize,
    ))
}

/// Block-level view of whatever chunks are resident.
///
/// Only the three chunk accessors are required. Reads outside the world or in
/// chunks that are not resident see air; writes there are dropped.
pub trait BlockAccess {
    fn registry(&self) -> &BlockRegistry;
    fn chunk_at(&self, pos: ChunkPos) -> Option<&Chunk>;
    fn chunk_at_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk>;

    fn block_id(&self, x: i32, y: i32, z: i32) -> BlockId {
        locate(x, y, z)
            .and_then(|(pos, lx, ly, lz)| self.chunk_at(pos).map(|c| c.block(lx, ly, lz)))
            .unwrap_or(ids::AIR)
    }

    fn metadata(&self, x: i32, y: i32, z: i32) -> u8 {
        locate(x, y, z)
            .and_then(|(pos, lx, ly, lz)| self.chunk_at(pos).map(|c| c.metadata(lx, ly, lz)))
            .unwrap_or(0)
    }

    fn set_block_with_metadata(&mut self, x: i32, y: i32, z: i32, id: BlockId, meta: u8) -> bool {
        let Some((pos, lx, ly, lz)) = locate(x, y, z) else {
            return false;
        };
        self.chunk_at_mut(pos)
            .is_some_and(|c| c.set_block_with_metadata(lx, ly, lz, id, meta))
    }

    fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        self.set_block_with_metadata(x, y, z, id, 0)
    }

    fn set_metadata(&mut self, x: i32, y: i32, z: i32, meta: u8) -> bool {
        let Some((pos, lx, ly, lz)) = locate(x, y, z) else {
            return false;
        };
        self.chunk_at_mut(pos)
            .is_some_and(|c| c.set_metadata(lx, ly, lz, meta))
    }

    fn material(&self, x: i32, y: i32, z: i32) -> Material {
        self.registry().material(self.block_id(x, y, z))
    }

    fn is_air(&self, x: i32, y: i32, z: i32) -> bool {
        self.block_id(x, y, z) == ids::AIR
    }

    fn is_opaque(&self, x: i32, y: i32, z: i32) -> bool {
        self.registry().is_opaque(self.block_id(x, y, z))
    }

    /// First air above the highest non-air block of the column, 0 if unloaded.
    fn height_value(&self, x: i32, z: i32) -> i32 {
        self.chunk_at(ChunkPos::containing(x, z))
            .map_or(0, |c| c.height((x & 15) as usize, (z & 15) as usize))
    }

    /// One above the highest block whose material is solid, or -1.
    fn top_solid_block(&self, x: i32, z: i32) -> i32 {
        let Some(chunk) = self.chunk_at(ChunkPos::containing(x, z)) else {
            return -1;
        };
        let (lx, lz) = ((x & 15) as usize, (z & 15) as usize);
        let reg = self.registry();
        (0..CHUNK_HEIGHT)
            .rev()
            .find(|&y| reg.material(chunk.block(lx, y, lz)).is_solid())
            .map_or(-1, |y| y as i32 + 1)
    }
}
