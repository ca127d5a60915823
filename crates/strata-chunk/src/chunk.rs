use std::fmt;

use strata_blocks::{BlockId, ids};
use strata_world::{BlockColumn, CHUNK_HEIGHT, CHUNK_WIDTH, COLUMN_VOLUME, ChunkPos, column_index};

use crate::nibble::NibbleArray;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    BlockLength(usize),
    MetadataLength(usize),
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::BlockLength(n) => {
                write!(f, "chunk has {} block ids, expected {}", n, COLUMN_VOLUME)
            }
            ChunkError::MetadataLength(n) => write!(
                f,
                "chunk has {} metadata bytes, expected {}",
                n,
                COLUMN_VOLUME / 2
            ),
        }
    }
}

impl std::error::Error for ChunkError {}

/// One resident 16×128×16 column of the world.
///
/// Placeholders are shared stand-ins for chunks that are not available; they
/// read as air, ignore writes and are never persisted.
#[derive(Clone)]
pub struct Chunk {
    pos: ChunkPos,
    blocks: BlockColumn,
    metadata: NibbleArray,
    height_map: Box<[u8]>,
    pub is_terrain_populated: bool,
    pub is_modified: bool,
    pub last_save_time: i64,
    never_save: bool,
    is_loaded: bool,
}

impl Chunk {
    fn with_parts(pos: ChunkPos, blocks: BlockColumn, metadata: NibbleArray) -> Self {
        let mut chunk = Self {
            pos,
            blocks,
            metadata,
            height_map: vec![0; CHUNK_WIDTH * CHUNK_WIDTH].into_boxed_slice(),
            is_terrain_populated: false,
            is_modified: false,
            last_save_time: 0,
            never_save: false,
            is_loaded: false,
        };
        chunk.rebuild_height_map();
        chunk
    }

    /// Fresh terrain straight from the generator. Not yet decorated.
    pub fn generated(pos: ChunkPos, blocks: BlockColumn) -> Self {
        let mut chunk = Self::with_parts(pos, blocks, NibbleArray::new());
        chunk.is_modified = true;
        chunk
    }

    /// A chunk read back from persistence.
    pub fn restored(
        pos: ChunkPos,
        blocks: Vec<BlockId>,
        metadata: Vec<u8>,
        populated: bool,
    ) -> Result<Self, ChunkError> {
        let len = blocks.len();
        let meta_len = metadata.len();
        let blocks = BlockColumn::from_vec(blocks).map_err(|_| ChunkError::BlockLength(len))?;
        let metadata =
            NibbleArray::from_bytes(metadata).ok_or(ChunkError::MetadataLength(meta_len))?;
        let mut chunk = Self::with_parts(pos, blocks, metadata);
        chunk.is_terrain_populated = populated;
        Ok(chunk)
    }

    pub fn placeholder() -> Self {
        let mut chunk =
            Self::with_parts(ChunkPos::default(), BlockColumn::new(), NibbleArray::new());
        chunk.never_save = true;
        chunk.is_terrain_populated = true;
        chunk
    }

    #[inline]
    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    #[inline]
    pub fn is_at(&self, x: i32, z: i32) -> bool {
        self.pos.x == x && self.pos.z == z
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.never_save
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    #[inline]
    pub fn block(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks.get(x, y, z)
    }

    #[inline]
    pub fn metadata(&self, x: usize, y: usize, z: usize) -> u8 {
        self.metadata.get(column_index(x, y, z))
    }

    /// Writes a block and its metadata. Returns whether anything changed.
    pub fn set_block_with_metadata(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        id: BlockId,
        meta: u8,
    ) -> bool {
        if self.never_save {
            return false;
        }
        let idx = column_index(x, y, z);
        if self.blocks.as_slice()[idx] == id && self.metadata.get(idx) == meta & 0x0F {
            return false;
        }
        self.blocks.as_mut_slice()[idx] = id;
        self.metadata.set(idx, meta);
        self.update_height(x, y, z, id);
        self.is_modified = true;
        true
    }

    #[inline]
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, id: BlockId) -> bool {
        self.set_block_with_metadata(x, y, z, id, 0)
    }

    pub fn set_metadata(&mut self, x: usize, y: usize, z: usize, meta: u8) -> bool {
        if self.never_save {
            return false;
        }
        let idx = column_index(x, y, z);
        if self.metadata.get(idx) == meta & 0x0F {
            return false;
        }
        self.metadata.set(idx, meta);
        self.is_modified = true;
        true
    }

    /// Y of the first air block above the highest non-air block.
    #[inline]
    pub fn height(&self, x: usize, z: usize) -> i32 {
        self.height_map[z << 4 | x] as i32
    }

    pub fn rebuild_height_map(&mut self) {
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                self.height_map[z << 4 | x] = scan_height(self.blocks.column(x, z), CHUNK_HEIGHT);
            }
        }
    }

    fn update_height(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        let slot = z << 4 | x;
        let h = self.height_map[slot] as usize;
        if id != ids::AIR {
            if y >= h {
                self.height_map[slot] = (y + 1) as u8;
            }
        } else if y + 1 == h {
            self.height_map[slot] = scan_height(self.blocks.column(x, z), y);
        }
    }

    pub fn on_load(&mut self) {
        self.rebuild_height_map();
        self.is_loaded = true;
    }

    pub fn on_unload(&mut self) {
        self.is_loaded = false;
    }

    pub fn needs_saving(&self, _force: bool) -> bool {
        !self.never_save && self.is_modified
    }

    #[inline]
    pub fn blocks(&self) -> &BlockColumn {
        &self.blocks
    }

    #[inline]
    pub fn metadata_bytes(&self) -> &[u8] {
        self.metadata.as_bytes()
    }
}

// First air above the highest non-air block at or below `limit - 1`.
fn scan_height(run: &[BlockId], limit: usize) -> u8 {
    run[..limit]
        .iter()
        .rposition(|&b| b != ids::AIR)
        .map_or(0, |y| (y + 1) as u8)
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("pos", &self.pos)
            .field("populated", &self.is_terrain_populated)
            .field("modified", &self.is_modified)
            .field("placeholder", &self.never_save)
            .field("loaded", &self.is_loaded)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor(top: usize) -> BlockColumn {
        let mut col = BlockColumn::new();
        for x in 0..16 {
            for z in 0..16 {
                for y in 0..top {
                    col.set(x, y, z, ids::STONE);
                }
            }
        }
        col
    }

    #[test]
    fn height_tracks_edits() {
        let mut c = Chunk::generated(ChunkPos::new(1, 2), floor(60));
        assert_eq!(c.height(3, 4), 60);
        c.set_block(3, 70, 4, ids::LOG);
        assert_eq!(c.height(3, 4), 71);
        c.set_block(3, 70, 4, ids::AIR);
        assert_eq!(c.height(3, 4), 60);
        c.set_block(3, 59, 4, ids::AIR);
        assert_eq!(c.height(3, 4), 59);
        assert_eq!(c.height(4, 3), 60);
    }

    #[test]
    fn placeholder_ignores_writes_and_never_saves() {
        let mut p = Chunk::placeholder();
        assert!(!p.set_block(0, 10, 0, ids::STONE));
        assert_eq!(p.block(0, 10, 0), ids::AIR);
        p.is_modified = true;
        assert!(!p.needs_saving(true));
    }

    #[test]
    fn restored_checks_lengths() {
        let pos = ChunkPos::new(0, 0);
        assert_eq!(
            Chunk::restored(pos, vec![0; 10], vec![0; COLUMN_VOLUME / 2], false).unwrap_err(),
            ChunkError::BlockLength(10)
        );
        assert_eq!(
            Chunk::restored(pos, vec![0; COLUMN_VOLUME], vec![0; 4], false).unwrap_err(),
            ChunkError::MetadataLength(4)
        );
        let c = Chunk::restored(pos, vec![0; COLUMN_VOLUME], vec![0; COLUMN_VOLUME / 2], true).unwrap();
        assert!(c.is_terrain_populated);
        assert!(!c.is_modified);
    }

    #[test]
    fn metadata_writes_mark_modified() {
        let mut c = Chunk::restored(
            ChunkPos::new(0, 0),
            vec![0; COLUMN_VOLUME],
            vec![0; COLUMN_VOLUME / 2],
            false,
        )
        .unwrap();
        assert!(!c.set_metadata(1, 1, 1, 0));
        assert!(c.set_metadata(1, 1, 1, 7));
        assert_eq!(c.metadata(1, 1, 1), 7);
        assert!(c.needs_saving(false));
    }
}
