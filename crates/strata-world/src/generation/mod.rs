//! Terrain generation: density lattice, block fill, surface pass, carving.

mod density;
mod fill;
mod surface;

use std::sync::Arc;

use log::debug;
use strata_blocks::BlockId;

use crate::biome::{BiomeKind, BiomeRegistry};
use crate::carver::{Carver, carver_from_params};
use crate::climate::ClimateSampler;
use crate::column::{BlockColumn, CHUNK_WIDTH, check_len};
use crate::error::GenerationError;
use crate::noise::NoiseField;
use crate::rng::{JavaRandom, SeedMix};
use crate::worldgen::WorldGenParams;

/// The eight noise fields of the terrain pipeline, drawn in a fixed order from
/// one stream seeded with the world seed.
pub struct TerrainNoises {
    pub lower: NoiseField,
    pub upper: NoiseField,
    pub selector: NoiseField,
    pub sand_gravel: NoiseField,
    pub stone_depth: NoiseField,
    pub scale: NoiseField,
    pub depth: NoiseField,
    pub tree_count: NoiseField,
}

impl TerrainNoises {
    pub fn draw(rand: &mut JavaRandom) -> Self {
        Self {
            lower: NoiseField::new(rand, 16),
            upper: NoiseField::new(rand, 16),
            selector: NoiseField::new(rand, 8),
            sand_gravel: NoiseField::new(rand, 4),
            stone_depth: NoiseField::new(rand, 4),
            scale: NoiseField::new(rand, 10),
            depth: NoiseField::new(rand, 16),
            tree_count: NoiseField::new(rand, 8),
        }
    }
}

// Scratch reused across columns; sized on first use.
#[derive(Default)]
pub(crate) struct NoiseBuffers {
    density: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    selector: Vec<f64>,
    scale: Vec<f64>,
    depth: Vec<f64>,
    sand: Vec<f64>,
    gravel: Vec<f64>,
    stone: Vec<f64>,
}

/// Output of one column generation. Biomes and temperatures are per block
/// column, indexed `x * 16 + z`.
#[derive(Clone, Debug)]
pub struct GeneratedColumn {
    pub blocks: BlockColumn,
    pub biomes: Vec<BiomeKind>,
    pub temperatures: Vec<f64>,
}

pub struct TerrainGenerator {
    seeds: SeedMix,
    rand: JavaRandom,
    noises: TerrainNoises,
    climate: ClimateSampler,
    biomes: Arc<BiomeRegistry>,
    params: Arc<WorldGenParams>,
    carver: Box<dyn Carver>,
    bufs: NoiseBuffers,
}

impl TerrainGenerator {
    pub fn new(seed: i64, params: Arc<WorldGenParams>, biomes: Arc<BiomeRegistry>) -> Self {
        let mut rand = JavaRandom::new(seed);
        let noises = TerrainNoises::draw(&mut rand);
        let carver = carver_from_params(&params.carver);
        Self {
            seeds: SeedMix::new(seed),
            rand,
            noises,
            climate: ClimateSampler::new(seed),
            biomes,
            params,
            carver,
            bufs: NoiseBuffers::default(),
        }
    }

    pub fn with_carver(mut self, carver: Box<dyn Carver>) -> Self {
        self.carver = carver;
        self
    }

    #[inline]
    pub fn seed(&self) -> i64 {
        self.seeds.world_seed()
    }

    #[inline]
    pub fn seeds(&self) -> &SeedMix {
        &self.seeds
    }

    #[inline]
    pub fn params(&self) -> &Arc<WorldGenParams> {
        &self.params
    }

    #[inline]
    pub fn biomes(&self) -> &Arc<BiomeRegistry> {
        &self.biomes
    }

    pub fn climate_mut(&mut self) -> &mut ClimateSampler {
        &mut self.climate
    }

    /// Seed of the block-level stream for chunk `(cx, cz)`.
    #[inline]
    pub fn local_seed(&self, cx: i32, cz: i32) -> i64 {
        self.seeds.terrain(cx, cz)
    }

    /// Raw tree-count noise at block `(bx, bz)`.
    pub fn tree_density(&self, bx: i32, bz: i32) -> f64 {
        self.noises
            .tree_count
            .sample_2d(bx as f64 * 0.5, bz as f64 * 0.5)
    }

    pub fn generate_column(&mut self, cx: i32, cz: i32) -> Result<GeneratedColumn, GenerationError> {
        let mut blocks = BlockColumn::new();
        self.fill_column(cx, cz, blocks.as_mut_slice())?;
        let region = self.climate.region();
        Ok(GeneratedColumn {
            blocks,
            biomes: region.biomes.to_vec(),
            temperatures: region.temperature.to_vec(),
        })
    }

    /// Generates chunk `(cx, cz)` into a caller-owned 32768-entry buffer.
    pub fn fill_column(
        &mut self,
        cx: i32,
        cz: i32,
        blocks: &mut [BlockId],
    ) -> Result<(), GenerationError> {
        check_len(blocks.len())?;
        let Self {
            seeds,
            rand,
            noises,
            climate,
            biomes,
            params,
            carver,
            bufs,
        } = self;

        let registry: &BiomeRegistry = biomes;
        let params: &WorldGenParams = params;

        rand.set_seed(seeds.terrain(cx, cz));
        let w = CHUNK_WIDTH;
        let region = climate.sample_region(cx * w as i32, cz * w as i32, w, w, registry);
        density::build(noises, bufs, params, region.temperature, region.humidity, cx, cz);
        fill::upsample(&bufs.density, region.temperature, params.sea_level, blocks);
        surface::replace(
            noises,
            bufs,
            rand,
            params,
            registry,
            region.biomes,
            cx,
            cz,
            blocks,
        )?;
        carver.carve(seeds.world_seed(), cx, cz, blocks);
        debug!(target: "worldgen", "generated column ({}, {})", cx, cz);
        Ok(())
    }
}
