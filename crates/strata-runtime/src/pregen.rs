//! Parallel terrain pregeneration.
//!
//! Columns are pure functions of the seed and their coordinates, so any number
//! of them can be generated at once on a worker pool. Results come back over a
//! channel in completion order; nothing here touches a chunk cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::debug;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use strata_world::{BiomeRegistry, ChunkPos, GeneratedColumn, GenerationError, WorldGenParams};

use crate::gen_pool::GeneratorPool;

pub struct PregenOut {
    pub pos: ChunkPos,
    pub column: Result<GeneratedColumn, GenerationError>,
    pub t_gen_ms: u32,
}

pub struct Pregenerator {
    job_tx: Sender<ChunkPos>,
    res_rx: Receiver<PregenOut>,
    _pool: ThreadPool,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    workers: usize,
}

impl Pregenerator {
    /// Spawns `workers` generator threads (at least one).
    pub fn new(
        seed: i64,
        params: Arc<WorldGenParams>,
        biomes: Arc<BiomeRegistry>,
        workers: usize,
    ) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<ChunkPos>();
        let (res_tx, res_rx) = unbounded::<PregenOut>();
        let generators = GeneratorPool::with_capacity_from_workers(workers, seed, params, biomes);
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("strata-pregen-{i}"))
            .build()?;
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let generators = generators.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(pos) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    let t0 = Instant::now();
                    let column = generators.acquire().generate_column(pos.x, pos.z);
                    let t_gen_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
                    inflight.fetch_sub(1, Ordering::Relaxed);
                    if tx
                        .send(PregenOut {
                            pos,
                            column,
                            t_gen_ms,
                        })
                        .is_err()
                    {
                        break;
                    }
                }
            });
        }
        debug!(target: "pregen", "started {} workers", workers);

        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            queued,
            inflight,
            workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn submit(&self, pos: ChunkPos) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(pos).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Jobs not yet finished, queued or running.
    pub fn pending(&self) -> usize {
        self.queued.load(Ordering::Relaxed) + self.inflight.load(Ordering::Relaxed)
    }

    /// Results that are ready, without blocking.
    pub fn drain(&self) -> Vec<PregenOut> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks for the next result.
    pub fn recv(&self) -> Option<PregenOut> {
        self.res_rx.recv().ok()
    }

    /// Generates every position in `positions` and returns the results in
    /// submission order.
    pub fn generate_all(&self, positions: &[ChunkPos]) -> Vec<PregenOut> {
        for &pos in positions {
            self.submit(pos);
        }
        let mut out: Vec<PregenOut> = Vec::with_capacity(positions.len());
        while out.len() < positions.len() {
            match self.recv() {
                Some(res) => out.push(res),
                None => break,
            }
        }
        out.sort_by_key(|r| {
            positions
                .iter()
                .position(|p| *p == r.pos)
                .unwrap_or(usize::MAX)
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::TerrainGenerator;

    #[test]
    fn parallel_columns_match_serial_generation() {
        let params = Arc::new(WorldGenParams::default());
        let biomes = Arc::new(BiomeRegistry::init());
        let pregen = Pregenerator::new(42, params.clone(), biomes.clone(), 3).unwrap();
        let positions: Vec<ChunkPos> = (0..6).map(|i| ChunkPos::new(i - 3, 2 * i)).collect();
        let results = pregen.generate_all(&positions);
        assert_eq!(results.len(), positions.len());
        assert_eq!(pregen.pending(), 0);

        let mut serial = TerrainGenerator::new(42, params, biomes);
        for (res, pos) in results.iter().zip(&positions) {
            assert_eq!(res.pos, *pos);
            let expected = serial.generate_column(pos.x, pos.z).unwrap();
            let got = res.column.as_ref().unwrap();
            assert!(got.blocks == expected.blocks);
        }
    }
}
