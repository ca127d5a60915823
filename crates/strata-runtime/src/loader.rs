use std::error::Error;
use std::fmt;
use std::io;

use strata_chunk::Chunk;

#[derive(Debug)]
pub enum PersistError {
    Io(io::Error),
    Decode(String),
    Encode(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "chunk store i/o: {}", e),
            PersistError::Decode(msg) => write!(f, "could not decode chunk: {}", msg),
            PersistError::Encode(msg) => write!(f, "could not encode chunk: {}", msg),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(e: io::Error) -> Self {
        PersistError::Io(e)
    }
}

/// Persistence backend seen by the chunk cache. Calls are synchronous; the
/// cache logs failures and carries on.
pub trait ChunkLoader {
    /// `Ok(None)` when nothing was ever saved at `(x, z)`.
    fn load_chunk(&mut self, x: i32, z: i32) -> Result<Option<Chunk>, PersistError>;

    fn save_chunk(&mut self, chunk: &Chunk) -> Result<(), PersistError>;

    /// Per-chunk side data, written on eviction and on forced saves.
    fn save_extra_chunk_data(&mut self, chunk: &Chunk) -> Result<(), PersistError>;

    /// World-level data, written once per forced save.
    fn save_extra_data(&mut self) -> Result<(), PersistError>;

    /// Current world time, pushed before `save_extra_data` on forced saves.
    fn set_world_time(&mut self, _time: i64) {}

    fn has_unsaved_work(&self) -> bool {
        false
    }
}
