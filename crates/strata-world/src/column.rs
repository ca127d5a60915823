use strata_blocks::{BlockId, ids};

use crate::error::GenerationError;

pub const CHUNK_WIDTH: usize = 16;
pub const CHUNK_HEIGHT: usize = 128;
pub const COLUMN_VOLUME: usize = CHUNK_WIDTH * CHUNK_WIDTH * CHUNK_HEIGHT;

/// Index of a block inside a column, `(x * 16 + z) * 128 + y`.
#[inline]
pub const fn column_index(x: usize, y: usize, z: usize) -> usize {
    (x * CHUNK_WIDTH + z) * CHUNK_HEIGHT + y
}

/// The 16×16×128 block ids of one chunk. Vertical runs are contiguous.
#[derive(Clone, PartialEq, Eq)]
pub struct BlockColumn {
    blocks: Box<[BlockId]>,
}

impl BlockColumn {
    pub fn new() -> Self {
        Self {
            blocks: vec![ids::AIR; COLUMN_VOLUME].into_boxed_slice(),
        }
    }

    pub fn from_vec(blocks: Vec<BlockId>) -> Result<Self, GenerationError> {
        check_len(blocks.len())?;
        Ok(Self {
            blocks: blocks.into_boxed_slice(),
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[column_index(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        self.blocks[column_index(x, y, z)] = id;
    }

    #[inline]
    pub fn as_slice(&self) -> &[BlockId] {
        &self.blocks
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [BlockId] {
        &mut self.blocks
    }

    /// One vertical run of 128 ids, bottom first.
    #[inline]
    pub fn column(&self, x: usize, z: usize) -> &[BlockId] {
        let start = column_index(x, 0, z);
        &self.blocks[start..start + CHUNK_HEIGHT]
    }

    pub fn into_vec(self) -> Vec<BlockId> {
        self.blocks.into_vec()
    }
}

impl Default for BlockColumn {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BlockColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let solid = self.blocks.iter().filter(|&&b| b != ids::AIR).count();
        f.debug_struct("BlockColumn")
            .field("non_air", &solid)
            .finish()
    }
}

#[inline]
pub(crate) fn check_len(actual: usize) -> Result<(), GenerationError> {
    if actual == COLUMN_VOLUME {
        Ok(())
    } else {
        Err(GenerationError::BufferSize {
            expected: COLUMN_VOLUME,
            actual,
        })
    }
}
