use std::fmt;

use crate::biome::BiomeKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A block buffer handed to the generator has the wrong length.
    BufferSize { expected: usize, actual: usize },
    /// The biome registry has no descriptor for a classified biome.
    MissingBiome(BiomeKind),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::BufferSize { expected, actual } => write!(
                f,
                "block buffer holds {} entries, expected {}",
                actual, expected
            ),
            GenerationError::MissingBiome(kind) => {
                write!(f, "no descriptor registered for biome {:?}", kind)
            }
        }
    }
}

impl std::error::Error for GenerationError {}
