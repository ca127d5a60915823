use serde::{Deserialize, Serialize};

use crate::column::CHUNK_WIDTH;

/// Horizontal chunk coordinate. Chunks span the full world height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing block `(bx, bz)`.
    #[inline]
    pub const fn containing(bx: i32, bz: i32) -> Self {
        Self {
            x: bx >> 4,
            z: bz >> 4,
        }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Block coordinates of the chunk's minimum corner.
    #[inline]
    pub fn block_origin(self) -> (i32, i32) {
        (self.x * CHUNK_WIDTH as i32, self.z * CHUNK_WIDTH as i32)
    }

    /// Largest per-axis distance, used for square tracking radii.
    #[inline]
    pub fn chebyshev(self, other: ChunkPos) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

impl From<(i32, i32)> for ChunkPos {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkPos> for (i32, i32) {
    fn from(value: ChunkPos) -> Self {
        (value.x, value.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_floors_negative_blocks() {
        assert_eq!(ChunkPos::containing(-1, 15), ChunkPos::new(-1, 0));
        assert_eq!(ChunkPos::containing(16, -16), ChunkPos::new(1, -1));
        assert_eq!(ChunkPos::new(-2, 3).block_origin(), (-32, 48));
    }
}
