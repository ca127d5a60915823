use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};
use serde::Serialize;
use strata_blocks::BlockRegistry;
use strata_io::{DirChunkStore, read_level};
use strata_runtime::{
    ChunkCache, GeneratorProvider, LogProgress, MemoryChunkStore, Pregenerator, SaveOutcome, World,
};
use strata_world::overview::{self, OverviewMode, OverviewRegion};
use strata_world::{BiomeRegistry, ChunkPos, TerrainGenerator, WorldGenParams, load_params_from_path};

use crate::cli::{BenchArgs, GenerateArgs, OverviewArgs, OverviewKind};

type CmdResult = Result<(), Box<dyn Error>>;

fn load_params(path: Option<&Path>) -> Result<WorldGenParams, Box<dyn Error>> {
    match path {
        Some(p) => {
            let params = load_params_from_path(p)?;
            info!("worldgen config loaded from {}", p.display());
            Ok(params)
        }
        None => Ok(WorldGenParams::default()),
    }
}

/// Written next to the chunk files after a `generate` run.
#[derive(Serialize)]
struct RunSummary {
    seed: i64,
    steps: u32,
    radius: i32,
    final_time: i64,
    chunks_served: u64,
    generated: u64,
    loaded: u64,
    populated: u64,
    evicted: u64,
    partial_ticks: u32,
}

pub fn generate(args: GenerateArgs) -> CmdResult {
    let registry = Arc::new(match &args.blocks {
        Some(p) => BlockRegistry::from_path(p)?,
        None => BlockRegistry::builtin(),
    });
    let params = Arc::new(load_params(args.config.as_deref())?);
    let biomes = Arc::new(BiomeRegistry::init());

    let mut radius = args.radius.max(0);
    if radius > params.tracked_radius {
        warn!(
            "radius {} exceeds the tracked radius {}, clamping",
            radius, params.tracked_radius
        );
        radius = params.tracked_radius;
    }

    let upstream = GeneratorProvider::new(args.seed, params.clone(), biomes, &registry)?;
    let mut cache = ChunkCache::new(registry.clone())
        .with_params(&params)
        .with_upstream(Box::new(upstream));
    let mut start_time = 0;
    match &args.store {
        Some(dir) => {
            if let Some(level) = read_level(dir)? {
                start_time = level.world_time;
                info!("resuming {} at time {}", dir.display(), start_time);
            }
            cache = cache.with_loader(Box::new(DirChunkStore::open(dir, args.seed)?));
        }
        None => cache = cache.with_loader(Box::new(MemoryChunkStore::new())),
    }

    let mut world = World::new(args.seed, cache);
    world.set_time(start_time);

    let t0 = Instant::now();
    let mut served = 0u64;
    let mut partial_ticks = 0u32;
    for step in 0..args.steps {
        world.track(step as i32, 0);
        served += world.provide_around_center(radius) as u64;
        if world.tick() == SaveOutcome::Partial {
            partial_ticks += 1;
        }
        log::debug!(
            target: "generate",
            "step {} center ({}, 0) resident {}",
            step,
            step,
            world.cache().resident_count()
        );
    }
    let stats = world.cache().stats();
    let mut progress = LogProgress::new("final save");
    world.shutdown(Some(&mut progress));

    info!(
        "{} steps in {:.2?}: {} served, {} generated, {} loaded, {} populated, {} evicted",
        args.steps,
        t0.elapsed(),
        served,
        stats.generated,
        stats.loads,
        stats.populated,
        stats.evictions
    );

    if let Some(dir) = &args.store {
        let summary = RunSummary {
            seed: args.seed,
            steps: args.steps,
            radius,
            final_time: world.time(),
            chunks_served: served,
            generated: stats.generated,
            loaded: stats.loads,
            populated: stats.populated,
            evicted: stats.evictions,
            partial_ticks,
        };
        fs::write(dir.join("summary.toml"), toml::to_string(&summary)?)?;
    }
    Ok(())
}

pub fn overview(args: OverviewArgs) -> CmdResult {
    let params = Arc::new(load_params(args.config.as_deref())?);
    let mut generator = TerrainGenerator::new(args.seed, params, Arc::new(BiomeRegistry::init()));
    let region = OverviewRegion::centered(args.size)?;
    let mode = match args.mode {
        OverviewKind::Biome => OverviewMode::BiomeMap,
        OverviewKind::Height => OverviewMode::HeightMap,
    };
    let t0 = Instant::now();
    let image = overview::render(&mut generator, region, mode)?;
    image.write_ppm(BufWriter::new(File::create(&args.out)?))?;
    info!(
        "{}x{} {:?} written to {} in {:.2?}",
        image.width,
        image.height,
        mode,
        args.out.display(),
        t0.elapsed()
    );
    Ok(())
}

/// Square of chunk positions around the origin, at least `count` of them,
/// truncated to exactly `count`.
fn bench_positions(count: u32) -> Vec<ChunkPos> {
    let side = (count as f64).sqrt().ceil() as i32;
    let half = side / 2;
    (0..side)
        .flat_map(|z| (0..side).map(move |x| ChunkPos::new(x - half, z - half)))
        .take(count as usize)
        .collect()
}

pub fn bench(args: BenchArgs) -> CmdResult {
    let params = Arc::new(load_params(args.config.as_deref())?);
    let threads = args
        .threads
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()));
    let pregen = Pregenerator::new(args.seed, params, Arc::new(BiomeRegistry::init()), threads)?;
    let positions = bench_positions(args.count);

    let t0 = Instant::now();
    let results = pregen.generate_all(&positions);
    let wall = t0.elapsed();

    let failed = results.iter().filter(|r| r.column.is_err()).count();
    let gen_ms: u64 = results.iter().map(|r| u64::from(r.t_gen_ms)).sum();
    let per_sec = results.len() as f64 / wall.as_secs_f64().max(1e-9);
    info!(
        "{} columns on {} threads in {:.2?} ({:.1} columns/s, mean {:.2} ms per column)",
        results.len(),
        pregen.workers(),
        wall,
        per_sec,
        gen_ms as f64 / results.len().max(1) as f64
    );
    if failed > 0 {
        warn!("{} columns failed to generate", failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bench_positions_are_unique_and_exact() {
        let positions = bench_positions(10);
        assert_eq!(positions.len(), 10);
        let mut sorted = positions.clone();
        sorted.sort_by_key(|p| (p.x, p.z));
        sorted.dedup();
        assert_eq!(sorted.len(), 10);
        assert!(bench_positions(0).is_empty());
    }

    #[test]
    fn generate_writes_chunks_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("world");
        generate(GenerateArgs {
            seed: 11,
            radius: 1,
            steps: 2,
            store: Some(store.clone()),
            config: None,
            blocks: None,
        })
        .unwrap();
        assert!(store.join("c.0.0.bin").is_file());
        let level = read_level(&store).unwrap().unwrap();
        assert_eq!(level.seed, 11);
        assert_eq!(level.world_time, 2);
        let summary = fs::read_to_string(store.join("summary.toml")).unwrap();
        assert!(summary.contains("steps = 2"));
    }
}
