//! File-backed chunk persistence.
//!
//! Each chunk lives in its own `c.<x>.<z>.bin` file: a bincode record
//! compressed with zstd. World-level data goes to `level.bin` on forced saves.
#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use strata_chunk::Chunk;
use strata_runtime::{ChunkLoader, PersistError};
use strata_world::ChunkPos;

pub const FORMAT_VERSION: u32 = 1;
const ZSTD_LEVEL: i32 = 3;
const LEVEL_FILE: &str = "level.bin";

#[derive(Debug, Serialize, Deserialize)]
struct ChunkRecord {
    version: u32,
    x: i32,
    z: i32,
    populated: bool,
    last_save_time: i64,
    blocks: Vec<u8>,
    metadata: Vec<u8>,
}

/// Contents of `level.bin`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub seed: i64,
    pub world_time: i64,
    pub saved_chunks: u64,
}

pub struct DirChunkStore {
    root: PathBuf,
    level: LevelData,
}

impl DirChunkStore {
    /// Opens (creating if needed) a store rooted at `root`. An existing
    /// `level.bin` is picked up so the world time and counters carry over.
    pub fn open(root: impl AsRef<Path>, seed: i64) -> Result<Self, PersistError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        let level = match read_level(&root)? {
            Some(level) if level.seed == seed => level,
            Some(level) => {
                info!(
                    target: "store",
                    "store at {} was written with seed {}, now {}",
                    root.display(),
                    level.seed,
                    seed
                );
                LevelData { seed, ..level }
            }
            None => LevelData {
                seed,
                ..LevelData::default()
            },
        };
        Ok(Self { root, level })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn level(&self) -> LevelData {
        self.level
    }

    pub fn chunk_path(&self, x: i32, z: i32) -> PathBuf {
        self.root.join(format!("c.{}.{}.bin", x, z))
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        self.chunk_path(x, z).is_file()
    }
}

/// Reads `level.bin` from `root`, `Ok(None)` when it has never been written.
pub fn read_level(root: &Path) -> Result<Option<LevelData>, PersistError> {
    let bytes = match fs::read(root.join(LEVEL_FILE)) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let level = bincode::deserialize(&bytes).map_err(|e| PersistError::Decode(e.to_string()))?;
    Ok(Some(level))
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn encode(chunk: &Chunk) -> Result<Vec<u8>, PersistError> {
    let pos = chunk.pos();
    let record = ChunkRecord {
        version: FORMAT_VERSION,
        x: pos.x,
        z: pos.z,
        populated: chunk.is_terrain_populated,
        last_save_time: chunk.last_save_time,
        blocks: chunk.blocks().as_slice().to_vec(),
        metadata: chunk.metadata_bytes().to_vec(),
    };
    let raw = bincode::serialize(&record).map_err(|e| PersistError::Encode(e.to_string()))?;
    Ok(zstd::encode_all(&raw[..], ZSTD_LEVEL)?)
}

fn decode(bytes: &[u8]) -> Result<Chunk, PersistError> {
    let raw = zstd::decode_all(bytes).map_err(|e| PersistError::Decode(e.to_string()))?;
    let record: ChunkRecord =
        bincode::deserialize(&raw).map_err(|e| PersistError::Decode(e.to_string()))?;
    if record.version != FORMAT_VERSION {
        return Err(PersistError::Decode(format!(
            "unsupported chunk format {}",
            record.version
        )));
    }
    let mut chunk = Chunk::restored(
        ChunkPos::new(record.x, record.z),
        record.blocks,
        record.metadata,
        record.populated,
    )
    .map_err(|e| PersistError::Decode(e.to_string()))?;
    chunk.last_save_time = record.last_save_time;
    Ok(chunk)
}

impl ChunkLoader for DirChunkStore {
    fn load_chunk(&mut self, x: i32, z: i32) -> Result<Option<Chunk>, PersistError> {
        let bytes = match fs::read(self.chunk_path(x, z)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode(&bytes).map(Some)
    }

    fn save_chunk(&mut self, chunk: &Chunk) -> Result<(), PersistError> {
        let pos = chunk.pos();
        let bytes = encode(chunk)?;
        write_atomically(&self.chunk_path(pos.x, pos.z), &bytes)?;
        self.level.saved_chunks += 1;
        self.level.world_time = self.level.world_time.max(chunk.last_save_time);
        debug!(target: "store", "wrote chunk ({}, {}) {} bytes", pos.x, pos.z, bytes.len());
        Ok(())
    }

    // Nothing lives beside the block data yet.
    fn save_extra_chunk_data(&mut self, _chunk: &Chunk) -> Result<(), PersistError> {
        Ok(())
    }

    fn set_world_time(&mut self, time: i64) {
        self.level.world_time = self.level.world_time.max(time);
    }

    fn save_extra_data(&mut self) -> Result<(), PersistError> {
        let bytes =
            bincode::serialize(&self.level).map_err(|e| PersistError::Encode(e.to_string()))?;
        write_atomically(&self.root.join(LEVEL_FILE), &bytes)?;
        info!(
            target: "store",
            "level saved: seed {} time {} ({} chunk writes)",
            self.level.seed,
            self.level.world_time,
            self.level.saved_chunks
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::BlockColumn;

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirChunkStore::open(dir.path(), 1).unwrap();
        fs::write(store.chunk_path(0, 0), b"not zstd").unwrap();
        assert!(matches!(store.load_chunk(0, 0), Err(PersistError::Decode(_))));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let chunk = Chunk::generated(ChunkPos::new(0, 0), BlockColumn::new());
        let raw = zstd::decode_all(&encode(&chunk).unwrap()[..]).unwrap();
        let mut record: ChunkRecord = bincode::deserialize(&raw).unwrap();
        record.version = FORMAT_VERSION + 1;
        let bytes = zstd::encode_all(&bincode::serialize(&record).unwrap()[..], 1).unwrap();
        assert!(matches!(decode(&bytes), Err(PersistError::Decode(_))));
    }
}
