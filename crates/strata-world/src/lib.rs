//! Seeded terrain synthesis: noise, climate, biomes, column generation and carving.
#![forbid(unsafe_code)]

pub mod biome;
pub mod carver;
pub mod climate;
pub mod column;
pub mod error;
pub mod generation;
pub mod noise;
pub mod overview;
pub mod pos;
pub mod rng;
pub mod worldgen;

pub use biome::{Biome, BiomeKind, BiomeRegistry, DecorationProfile};
pub use carver::{Carver, NoCarver, NoiseCaveCarver, TunnelCarver};
pub use climate::ClimateSampler;
pub use column::{BlockColumn, CHUNK_HEIGHT, CHUNK_WIDTH, COLUMN_VOLUME, column_index};
pub use error::GenerationError;
pub use generation::{GeneratedColumn, TerrainGenerator};
pub use noise::NoiseField;
pub use pos::ChunkPos;
pub use rng::{JavaRandom, SeedMix};
pub use worldgen::{WorldGenConfig, WorldGenParams, load_params_from_path};
