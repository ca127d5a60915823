use std::io;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use strata_blocks::{BlockRegistry, ids};
use strata_chunk::{BlockAccess, Chunk};
use strata_runtime::{
    ChunkCache, ChunkLoader, ChunkProvider, GeneratorProvider, MemoryChunkStore, PersistError,
    ProgressSink, SaveOutcome, World,
};
use strata_world::{
    BiomeRegistry, BlockColumn, ChunkPos, GenerationError, TerrainGenerator, WorldGenParams,
};

#[derive(Default)]
struct CallLog {
    provided: Vec<(i32, i32)>,
    populated: Vec<(i32, i32)>,
    square_missing: Vec<(i32, i32)>,
}

/// Ten layers of stone everywhere; population drops a marker block.
struct FlatProvider {
    log: Arc<Mutex<CallLog>>,
}

impl FlatProvider {
    fn new() -> (Self, Arc<Mutex<CallLog>>) {
        let log = Arc::new(Mutex::new(CallLog::default()));
        (Self { log: log.clone() }, log)
    }
}

impl ChunkProvider for FlatProvider {
    fn chunk_exists(&self, _x: i32, _z: i32) -> bool {
        true
    }

    fn provide_chunk(&mut self, x: i32, z: i32) -> Result<Chunk, GenerationError> {
        self.log.lock().unwrap().provided.push((x, z));
        let mut col = BlockColumn::new();
        for lx in 0..16 {
            for lz in 0..16 {
                for y in 0..10 {
                    col.set(lx, y, lz, ids::STONE);
                }
            }
        }
        Ok(Chunk::generated(ChunkPos::new(x, z), col))
    }

    fn populate(&mut self, world: &mut dyn BlockAccess, x: i32, z: i32) {
        let mut log = self.log.lock().unwrap();
        for (dx, dz) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            if world.chunk_at(ChunkPos::new(x + dx, z + dz)).is_none() {
                log.square_missing.push((x, z));
            }
        }
        log.populated.push((x, z));
        world.set_block(x * 16 + 8, 20, z * 16 + 8, ids::COBBLESTONE);
    }

    fn save_chunks(&mut self, _force: bool, _p: Option<&mut dyn ProgressSink>) -> SaveOutcome {
        SaveOutcome::Complete
    }

    fn can_save(&self) -> bool {
        true
    }
}

struct FailingProvider;

impl ChunkProvider for FailingProvider {
    fn chunk_exists(&self, _x: i32, _z: i32) -> bool {
        true
    }

    fn provide_chunk(&mut self, _x: i32, _z: i32) -> Result<Chunk, GenerationError> {
        Err(GenerationError::BufferSize {
            expected: 32768,
            actual: 0,
        })
    }

    fn populate(&mut self, _world: &mut dyn BlockAccess, _x: i32, _z: i32) {}

    fn save_chunks(&mut self, _force: bool, _p: Option<&mut dyn ProgressSink>) -> SaveOutcome {
        SaveOutcome::Complete
    }

    fn can_save(&self) -> bool {
        false
    }
}

/// Flat terrain with one chunk that always fails to generate.
struct HoleProvider {
    hole: (i32, i32),
    flat: FlatProvider,
}

impl ChunkProvider for HoleProvider {
    fn chunk_exists(&self, _x: i32, _z: i32) -> bool {
        true
    }

    fn provide_chunk(&mut self, x: i32, z: i32) -> Result<Chunk, GenerationError> {
        if (x, z) == self.hole {
            return Err(GenerationError::BufferSize {
                expected: 32768,
                actual: 0,
            });
        }
        self.flat.provide_chunk(x, z)
    }

    fn populate(&mut self, world: &mut dyn BlockAccess, x: i32, z: i32) {
        self.flat.populate(world, x, z)
    }

    fn save_chunks(&mut self, force: bool, p: Option<&mut dyn ProgressSink>) -> SaveOutcome {
        self.flat.save_chunks(force, p)
    }

    fn can_save(&self) -> bool {
        true
    }
}

struct BrokenStore;

impl ChunkLoader for BrokenStore {
    fn load_chunk(&mut self, _x: i32, _z: i32) -> Result<Option<Chunk>, PersistError> {
        Err(PersistError::Decode("truncated".into()))
    }

    fn save_chunk(&mut self, _chunk: &Chunk) -> Result<(), PersistError> {
        Err(PersistError::Io(io::Error::other("disk full")))
    }

    fn save_extra_chunk_data(&mut self, _chunk: &Chunk) -> Result<(), PersistError> {
        Err(PersistError::Io(io::Error::other("disk full")))
    }

    fn save_extra_data(&mut self) -> Result<(), PersistError> {
        Err(PersistError::Encode("no space".into()))
    }
}

fn registry() -> Arc<BlockRegistry> {
    Arc::new(BlockRegistry::builtin())
}

fn flat_cache() -> (ChunkCache, Arc<Mutex<CallLog>>) {
    let (provider, log) = FlatProvider::new();
    (ChunkCache::new(registry()).with_upstream(Box::new(provider)), log)
}

fn flat_cache_with_store() -> (ChunkCache, Arc<strata_runtime::StoreCounters>) {
    let (provider, _) = FlatProvider::new();
    let store = MemoryChunkStore::new();
    let counters = store.counters();
    let cache = ChunkCache::new(registry())
        .with_upstream(Box::new(provider))
        .with_loader(Box::new(store));
    (cache, counters)
}

fn grid(n: i32) -> Vec<(i32, i32)> {
    (0..n).flat_map(|x| (0..n).map(move |z| (x, z))).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Whatever the request order, each chunk with a complete square is
    // decorated exactly once and only once its square is resident.
    #[test]
    fn population_is_exactly_once(order in Just(grid(4)).prop_shuffle()) {
        let (mut cache, log) = flat_cache();
        for &(x, z) in &order {
            cache.provide_chunk(x, z);
        }
        let log = log.lock().unwrap();
        prop_assert!(log.square_missing.is_empty());
        let mut populated = log.populated.clone();
        populated.sort();
        let expected: Vec<(i32, i32)> = grid(3);
        prop_assert_eq!(populated, expected);
        prop_assert_eq!(cache.stats().populated, 9);
        for (x, z) in grid(4) {
            let chunk = cache.chunk(x, z).unwrap();
            prop_assert_eq!(chunk.is_terrain_populated, x < 3 && z < 3);
        }
    }
}

#[test]
fn repeated_requests_do_not_regenerate() {
    let (mut cache, log) = flat_cache();
    cache.provide_chunk(1, 1);
    cache.provide_chunk(1, 1);
    cache.provide_chunk(2, 1);
    cache.provide_chunk(1, 1);
    assert_eq!(log.lock().unwrap().provided, vec![(1, 1), (2, 1)]);
    assert_eq!(cache.stats().generated, 2);
    assert_eq!(cache.stats().hits, 2);
    assert!(cache.chunk_exists(2, 1));
    assert!(!cache.chunk_exists(3, 1));
}

#[test]
fn population_writes_land_in_the_cache() {
    let (mut cache, _) = flat_cache();
    for (x, z) in grid(2) {
        cache.provide_chunk(x, z);
    }
    assert_eq!(cache.block_id(8, 20, 8), ids::COBBLESTONE);
    assert!(cache.chunk(0, 0).unwrap().is_modified);
}

#[test]
fn seed_scenario_evicts_once_and_reloads() {
    let seed = 0x00C0_FFEE;
    let params = Arc::new(WorldGenParams {
        generate_everywhere: true,
        ..WorldGenParams::default()
    });
    let biomes = Arc::new(BiomeRegistry::init());
    let blocks = registry();
    let upstream = GeneratorProvider::new(seed, params.clone(), biomes.clone(), &blocks).unwrap();
    let store = MemoryChunkStore::new();
    let counters = store.counters();
    let mut cache = ChunkCache::new(blocks)
        .with_params(&params)
        .with_upstream(Box::new(upstream))
        .with_loader(Box::new(store));

    // Generating twice gives identical blocks.
    let first = cache.provide_chunk(0, 0).blocks().clone();
    let mut independent = TerrainGenerator::new(seed, params, biomes);
    assert!(independent.generate_column(0, 0).unwrap().blocks == first);

    // (32, 0) shares the slot: (0, 0) is saved exactly once on the way out.
    let far = cache.provide_chunk(32, 0);
    assert!(far.is_at(32, 0));
    let stats = counters.snapshot();
    assert_eq!((stats.saves, stats.extra_chunk_saves), (1, 1));
    assert!(cache.chunk(0, 0).is_none());
    assert_eq!(cache.stats().evictions, 1);

    // Back to (0, 0): reloaded from the store, not the (32, 0) instance.
    let back = cache.provide_chunk(0, 0);
    assert!(back.is_at(0, 0));
    assert!(*back.blocks() == first);
    let stats = counters.snapshot();
    assert_eq!(stats.loads, 1);
    assert_eq!(stats.saves, 2);
    assert!(cache.chunk(32, 0).is_none());
}

#[test]
fn unforced_saves_are_throttled() {
    let (mut cache, counters) = flat_cache_with_store();
    for (x, z) in grid(5) {
        cache.provide_chunk(x, z);
    }
    assert_eq!(cache.save_chunks(false, None), SaveOutcome::Partial);
    assert_eq!(counters.snapshot().saves, 2);

    let mut calls = 1;
    while cache.save_chunks(false, None) == SaveOutcome::Partial {
        calls += 1;
    }
    let stats = counters.snapshot();
    assert_eq!(calls + 1, 13);
    assert_eq!(stats.saves, 25);
    assert_eq!(stats.extra_chunk_saves, 0);
    assert_eq!(stats.extra_saves, 0);
    assert!(!cache.has_unsaved_work());
}

#[test]
fn forced_save_writes_everything_and_reports_progress() {
    let (mut cache, counters) = flat_cache_with_store();
    for (x, z) in grid(5) {
        cache.provide_chunk(x, z);
    }
    let mut reports = Vec::new();
    let mut sink = |p: u8| reports.push(p);
    assert_eq!(cache.save_chunks(true, Some(&mut sink)), SaveOutcome::Complete);
    let stats = counters.snapshot();
    assert_eq!(stats.saves, 25);
    assert_eq!(stats.extra_chunk_saves, 25);
    assert_eq!(stats.extra_saves, 1);
    assert_eq!(reports, vec![40, 80]);

    // Nothing dirty: a second forced save writes no chunks but still the world data.
    cache.save_chunks(true, None);
    let stats = counters.snapshot();
    assert_eq!(stats.saves, 25);
    assert_eq!(stats.extra_saves, 2);
}

#[test]
fn loads_are_stamped_with_world_time() {
    let mut store = MemoryChunkStore::new();
    let mut col = BlockColumn::new();
    col.set(0, 0, 0, ids::BEDROCK);
    store.save_chunk(&Chunk::generated(ChunkPos::new(3, 4), col)).unwrap();
    let counters = store.counters();

    let mut cache = ChunkCache::new(registry()).with_loader(Box::new(store));
    cache.set_world_time(77);
    let chunk = cache.provide_chunk(3, 4);
    assert!(!chunk.is_placeholder());
    assert!(chunk.is_loaded());
    assert_eq!(chunk.last_save_time, 77);
    assert_eq!(chunk.block(0, 0, 0), ids::BEDROCK);
    assert_eq!(counters.snapshot().loads, 1);
    assert_eq!(cache.stats().loads, 1);
}

#[test]
fn generation_failure_falls_back_to_placeholder() {
    let mut cache = ChunkCache::new(registry()).with_upstream(Box::new(FailingProvider));
    assert!(cache.provide_chunk(0, 0).is_placeholder());
    assert_eq!(cache.resident_count(), 0);
    assert_eq!(cache.save_chunks(true, None), SaveOutcome::Complete);
}

#[test]
fn store_failures_are_logged_not_fatal() {
    let (provider, _) = FlatProvider::new();
    let mut cache = ChunkCache::new(registry())
        .with_upstream(Box::new(provider))
        .with_loader(Box::new(BrokenStore));
    cache.set_generate_everywhere(true);
    assert!(cache.provide_chunk(0, 0).is_at(0, 0));
    // Evicts (0, 0) through a store that rejects every write.
    assert!(cache.provide_chunk(32, 0).is_at(32, 0));
    assert_eq!(cache.save_chunks(true, None), SaveOutcome::Complete);
    // Failed saves leave the chunk dirty.
    assert!(cache.has_unsaved_work());
}

#[test]
fn unload_all_saves_and_empties() {
    let (mut cache, counters) = flat_cache_with_store();
    for (x, z) in grid(3) {
        cache.provide_chunk(x, z);
    }
    assert_eq!(cache.resident_count(), 9);
    cache.unload_all(None);
    assert_eq!(cache.resident_count(), 0);
    assert!(!cache.chunk_exists(0, 0));
    assert_eq!(counters.snapshot().saves, 9);

    // Coming back reads the saved copy.
    cache.provide_chunk(0, 0);
    assert_eq!(counters.snapshot().loads, 1);
}

#[test]
fn caches_chain() {
    let (inner, log) = flat_cache();
    let mut outer = ChunkCache::new(registry()).with_upstream(Box::new(inner));
    let chunk = outer.provide_chunk(2, 2);
    assert!(chunk.is_at(2, 2));
    assert_eq!(log.lock().unwrap().provided, vec![(2, 2)]);
}

#[test]
fn chained_caches_decorate_the_outer_copy() {
    let (inner, log) = flat_cache();
    let mut outer = ChunkCache::new(registry()).with_upstream(Box::new(inner));
    for (x, z) in grid(2) {
        outer.provide_chunk(x, z);
    }
    {
        let log = log.lock().unwrap();
        assert_eq!(log.populated, vec![(0, 0)]);
        assert!(log.square_missing.is_empty());
    }
    assert!(outer.chunk(0, 0).unwrap().is_terrain_populated);
    assert_eq!(outer.block_id(8, 20, 8), ids::COBBLESTONE);
    assert_eq!(outer.stats().populated, 1);
}

#[test]
fn populate_twice_is_a_no_op() {
    let (mut cache, log) = flat_cache();
    for (x, z) in grid(2) {
        cache.provide_chunk(x, z);
    }
    cache.populate(0, 0);
    cache.populate(0, 0);
    assert_eq!(log.lock().unwrap().populated, vec![(0, 0)]);
    assert_eq!(cache.stats().populated, 1);
    let markers = cache
        .chunk(0, 0)
        .unwrap()
        .blocks()
        .as_slice()
        .iter()
        .filter(|&&b| b == ids::COBBLESTONE)
        .count();
    assert_eq!(markers, 1);
}

#[test]
fn failed_chunk_does_not_shadow_its_slot_mate() {
    let (flat, _) = FlatProvider::new();
    let params = WorldGenParams {
        tracked_radius: 16,
        ..WorldGenParams::default()
    };
    let mut cache = ChunkCache::new(registry())
        .with_params(&params)
        .with_upstream(Box::new(HoleProvider { hole: (0, 0), flat }));
    cache.set_tracked_center(16, 0);
    assert!(cache.provide_chunk(0, 0).is_placeholder());
    assert!(cache.chunk_exists(0, 0));
    assert!(!cache.chunk_exists(32, 0));

    let chunk = cache.provide_chunk(32, 0);
    assert!(!chunk.is_placeholder());
    assert!(chunk.is_at(32, 0));
    assert_eq!(cache.stats().generated, 1);
}

#[test]
fn world_tick_spends_the_save_budget() {
    let (cache, counters) = flat_cache_with_store();
    let mut world = World::new(5, cache);
    for x in 0..3 {
        world.provide_chunk(x, 10);
    }
    assert_eq!(world.tick(), SaveOutcome::Partial);
    assert_eq!(counters.snapshot().saves, 2);
    assert_eq!(world.tick(), SaveOutcome::Complete);
    assert_eq!(counters.snapshot().saves, 3);
    assert_eq!(world.tick(), SaveOutcome::Complete);
    assert_eq!(counters.snapshot().saves, 3);
    assert_eq!(world.time(), 3);

    world.shutdown(None);
    assert_eq!(counters.snapshot().extra_saves, 1);
    assert_eq!(world.cache().resident_count(), 0);
}
