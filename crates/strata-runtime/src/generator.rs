use std::sync::Arc;

use strata_blocks::BlockRegistry;
use strata_chunk::{BlockAccess, Chunk};
use strata_decor::{DecorError, DecorationPass};
use strata_world::{
    BiomeRegistry, ChunkPos, GenerationError, TerrainGenerator, WorldGenParams,
};

use crate::provider::{ChunkProvider, ProgressSink, SaveOutcome};

/// Bottom of a provider chain: fresh terrain and its decoration.
pub struct GeneratorProvider {
    terrain: TerrainGenerator,
    decor: DecorationPass,
}

impl GeneratorProvider {
    pub fn new(
        seed: i64,
        params: Arc<WorldGenParams>,
        biomes: Arc<BiomeRegistry>,
        blocks: &BlockRegistry,
    ) -> Result<Self, DecorError> {
        let decor = DecorationPass::new(&params, blocks)?;
        let terrain = TerrainGenerator::new(seed, params, biomes);
        Ok(Self { terrain, decor })
    }

    pub fn from_parts(terrain: TerrainGenerator, decor: DecorationPass) -> Self {
        Self { terrain, decor }
    }

    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut TerrainGenerator {
        &mut self.terrain
    }
}

impl ChunkProvider for GeneratorProvider {
    fn chunk_exists(&self, _x: i32, _z: i32) -> bool {
        true
    }

    fn provide_chunk(&mut self, x: i32, z: i32) -> Result<Chunk, GenerationError> {
        let column = self.terrain.generate_column(x, z)?;
        Ok(Chunk::generated(ChunkPos::new(x, z), column.blocks))
    }

    fn populate(&mut self, world: &mut dyn BlockAccess, x: i32, z: i32) {
        self.decor.populate(&mut self.terrain, world, x, z);
    }

    fn save_chunks(
        &mut self,
        _force: bool,
        _progress: Option<&mut dyn ProgressSink>,
    ) -> SaveOutcome {
        SaveOutcome::Complete
    }

    fn can_save(&self) -> bool {
        true
    }
}
