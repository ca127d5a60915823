use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use strata_world::{BiomeRegistry, TerrainGenerator, WorldGenParams};

/// Lock-free pool of terrain generators. Building one draws every noise
/// octave, so workers reuse them instead.
pub struct GeneratorPool {
    available_tx: Sender<TerrainGenerator>,
    available_rx: Receiver<TerrainGenerator>,
    allocated: AtomicUsize,
    max_generators: usize,
    seed: i64,
    params: Arc<WorldGenParams>,
    biomes: Arc<BiomeRegistry>,
}

impl GeneratorPool {
    pub fn new(
        max_generators: usize,
        seed: i64,
        params: Arc<WorldGenParams>,
        biomes: Arc<BiomeRegistry>,
    ) -> Self {
        let max_generators = max_generators.max(1);
        let (tx, rx) = bounded(max_generators);
        Self {
            available_tx: tx,
            available_rx: rx,
            allocated: AtomicUsize::new(0),
            max_generators,
            seed,
            params,
            biomes,
        }
    }

    pub fn with_capacity_from_workers(
        worker_count: usize,
        seed: i64,
        params: Arc<WorldGenParams>,
        biomes: Arc<BiomeRegistry>,
    ) -> Arc<Self> {
        Arc::new(Self::new(worker_count.max(1) * 2, seed, params, biomes))
    }

    /// Takes an idle generator, building a new one while under capacity and
    /// blocking otherwise.
    pub fn acquire(&self) -> PooledGenerator<'_> {
        if let Ok(generator) = self.available_rx.try_recv() {
            return self.wrap(generator);
        }

        loop {
            let current = self.allocated.load(Ordering::Acquire);
            if current < self.max_generators {
                let prev = self.allocated.fetch_add(1, Ordering::AcqRel);
                if prev < self.max_generators {
                    let generator =
                        TerrainGenerator::new(self.seed, self.params.clone(), self.biomes.clone());
                    return self.wrap(generator);
                }
                self.allocated.fetch_sub(1, Ordering::AcqRel);
            }

            if let Ok(generator) = self.available_rx.recv() {
                return self.wrap(generator);
            }
        }
    }

    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Acquire)
    }

    fn wrap(&self, generator: TerrainGenerator) -> PooledGenerator<'_> {
        PooledGenerator {
            generator: Some(generator),
            pool: self,
        }
    }

    fn release(&self, generator: TerrainGenerator) {
        let _ = self.available_tx.send(generator);
    }
}

pub struct PooledGenerator<'pool> {
    generator: Option<TerrainGenerator>,
    pool: &'pool GeneratorPool,
}

impl<'pool> Deref for PooledGenerator<'pool> {
    type Target = TerrainGenerator;

    fn deref(&self) -> &Self::Target {
        self.generator.as_ref().expect("generator already released")
    }
}

impl<'pool> DerefMut for PooledGenerator<'pool> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.generator.as_mut().expect("generator already released")
    }
}

impl<'pool> Drop for PooledGenerator<'pool> {
    fn drop(&mut self) {
        if let Some(generator) = self.generator.take() {
            self.pool.release(generator);
        }
    }
}
