use std::sync::Arc;

use log::{debug, error, warn};
use strata_blocks::BlockRegistry;
use strata_chunk::{BlockAccess, Chunk};
use strata_world::{ChunkPos, GenerationError, WorldGenParams};

use crate::loader::ChunkLoader;
use crate::provider::{ChunkProvider, ProgressSink, SaveOutcome};

pub const SLOT_SPAN: i32 = 32;
pub const SLOT_COUNT: usize = (SLOT_SPAN * SLOT_SPAN) as usize;
const DEFAULT_RADIUS: i32 = 15;
const DEFAULT_SAVES_PER_TICK: usize = 2;
const PROGRESS_STEP: usize = 10;

/// Slot of chunk `(x, z)` in the 32×32 table. Wraps for negative coordinates.
#[inline]
pub fn slot_index(x: i32, z: i32) -> usize {
    ((x & (SLOT_SPAN - 1)) + (z & (SLOT_SPAN - 1)) * SLOT_SPAN) as usize
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub loads: u64,
    pub generated: u64,
    pub evictions: u64,
    pub populated: u64,
}

enum Slot {
    Resident(Chunk),
    /// Nothing could supply the chunk at this position; reads go to the
    /// shared placeholder.
    Placeholder(ChunkPos),
}

/// The slot array on its own, so population can borrow it as the world
/// while the upstream provider is borrowed separately.
struct SlotTable {
    registry: Arc<BlockRegistry>,
    slots: Vec<Option<Slot>>,
    placeholder: Chunk,
}

impl SlotTable {
    fn new(registry: Arc<BlockRegistry>) -> Self {
        Self {
            registry,
            slots: (0..SLOT_COUNT).map(|_| None).collect(),
            placeholder: Chunk::placeholder(),
        }
    }

    fn holds(&self, x: i32, z: i32) -> bool {
        match &self.slots[slot_index(x, z)] {
            Some(Slot::Placeholder(pos)) => pos.x == x && pos.z == z,
            Some(Slot::Resident(chunk)) => chunk.is_at(x, z),
            None => false,
        }
    }

    fn resident(&self, pos: ChunkPos) -> Option<&Chunk> {
        match &self.slots[slot_index(pos.x, pos.z)] {
            Some(Slot::Resident(chunk)) if chunk.pos() == pos => Some(chunk),
            _ => None,
        }
    }

    fn resident_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        match &mut self.slots[slot_index(pos.x, pos.z)] {
            Some(Slot::Resident(chunk)) if chunk.pos() == pos => Some(chunk),
            _ => None,
        }
    }

    /// Whatever occupies the slot of `(x, z)`, falling back to the placeholder.
    fn occupant_mut(&mut self, x: i32, z: i32) -> &mut Chunk {
        match &mut self.slots[slot_index(x, z)] {
            Some(Slot::Resident(chunk)) => chunk,
            _ => &mut self.placeholder,
        }
    }

    fn residents(&self) -> impl Iterator<Item = &Chunk> {
        self.slots.iter().filter_map(|slot| match slot {
            Some(Slot::Resident(chunk)) => Some(chunk),
            _ => None,
        })
    }
}

impl BlockAccess for SlotTable {
    fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    fn chunk_at(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.resident(pos)
    }

    fn chunk_at_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.resident_mut(pos)
    }
}

/// Fixed-size chunk cache in front of a persistence backend and an upstream
/// provider.
///
/// Chunks live in a 32×32 slot table; a request for a chunk whose slot holds a
/// different one evicts and saves the occupant first. Only chunks within the
/// tracked radius of the center are served unless `generate_everywhere` is set.
/// A chunk is decorated once, as soon as it and its +x, +z and +x+z
/// neighbours are all resident.
pub struct ChunkCache {
    slots: SlotTable,
    loader: Option<Box<dyn ChunkLoader>>,
    upstream: Option<Box<dyn ChunkProvider>>,
    center: ChunkPos,
    radius: i32,
    generate_everywhere: bool,
    saves_per_tick: usize,
    last_queried: Option<ChunkPos>,
    world_time: i64,
    stats: CacheStats,
}

impl ChunkCache {
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self {
            slots: SlotTable::new(registry),
            loader: None,
            upstream: None,
            center: ChunkPos::default(),
            radius: DEFAULT_RADIUS,
            generate_everywhere: false,
            saves_per_tick: DEFAULT_SAVES_PER_TICK,
            last_queried: None,
            world_time: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn with_upstream(mut self, upstream: Box<dyn ChunkProvider>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    pub fn with_loader(mut self, loader: Box<dyn ChunkLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Takes the tracked radius, generate-everywhere flag and save budget from `params`.
    pub fn with_params(mut self, params: &WorldGenParams) -> Self {
        self.radius = params.tracked_radius.max(0);
        self.generate_everywhere = params.generate_everywhere;
        self.saves_per_tick = params.saves_per_tick.max(1);
        self
    }

    pub fn set_generate_everywhere(&mut self, on: bool) {
        self.generate_everywhere = on;
    }

    pub fn set_tracked_center(&mut self, x: i32, z: i32) {
        self.center = ChunkPos::new(x, z);
    }

    pub fn tracked_center(&self) -> ChunkPos {
        self.center
    }

    pub fn set_world_time(&mut self, time: i64) {
        self.world_time = time;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn resident_count(&self) -> usize {
        self.slots.residents().count()
    }

    /// The resident chunk at `(x, z)`, if any. Never loads or generates.
    pub fn chunk(&self, x: i32, z: i32) -> Option<&Chunk> {
        self.slots.resident(ChunkPos::new(x, z))
    }

    #[inline]
    pub fn in_range(&self, x: i32, z: i32) -> bool {
        self.center.chebyshev(ChunkPos::new(x, z)) <= self.radius
    }

    pub fn chunk_exists(&self, x: i32, z: i32) -> bool {
        if !self.in_range(x, z) {
            return false;
        }
        self.last_queried == Some(ChunkPos::new(x, z)) || self.slots.holds(x, z)
    }

    /// Returns chunk `(x, z)`, loading or generating it if needed. Never fails:
    /// anything that cannot be supplied comes back as the placeholder.
    pub fn provide_chunk(&mut self, x: i32, z: i32) -> &mut Chunk {
        self.provide(x, z, true)
    }

    /// `decorate` is off when another cache asked for the chunk: that cache
    /// owns the copy that gets decorated.
    fn provide(&mut self, x: i32, z: i32, decorate: bool) -> &mut Chunk {
        let pos = ChunkPos::new(x, z);
        if self.last_queried == Some(pos) {
            self.stats.hits += 1;
            return self.slots.occupant_mut(x, z);
        }
        if !self.in_range(x, z) && !self.generate_everywhere {
            return &mut self.slots.placeholder;
        }
        if self.chunk_exists(x, z) {
            self.stats.hits += 1;
        } else {
            self.install(pos);
            if decorate {
                for (px, pz) in [(x, z), (x - 1, z), (x, z - 1), (x - 1, z - 1)] {
                    self.try_populate(px, pz);
                }
            }
        }
        self.last_queried = Some(pos);
        self.slots.occupant_mut(x, z)
    }

    /// Decorates `(x, z)` unless that already happened. The chunk is marked
    /// populated before the upstream runs, so re-entry is a no-op.
    pub fn populate(&mut self, x: i32, z: i32) {
        let pos = ChunkPos::new(x, z);
        let Some(chunk) = self.slots.resident_mut(pos) else {
            return;
        };
        if chunk.is_terrain_populated {
            return;
        }
        chunk.is_terrain_populated = true;
        if let Some(upstream) = self.upstream.as_mut() {
            upstream.populate(&mut self.slots, x, z);
        }
        if let Some(chunk) = self.slots.resident_mut(pos) {
            chunk.is_modified = true;
        }
        self.stats.populated += 1;
        debug!(target: "cache", "populated ({}, {})", x, z);
    }

    /// Saves modified chunks. Without `force` at most `saves_per_tick` chunks are
    /// written and `Partial` is returned when the budget is hit. With `force`
    /// every chunk is written along with its extra data, then the world-level
    /// extra data once.
    pub fn save_chunks(
        &mut self,
        force: bool,
        mut progress: Option<&mut dyn ProgressSink>,
    ) -> SaveOutcome {
        let total = self
            .slots
            .residents()
            .filter(|c| c.needs_saving(force))
            .count()
            .max(1);
        let Self {
            slots,
            loader,
            saves_per_tick,
            world_time,
            ..
        } = self;

        let mut saved = 0;
        for slot in slots.slots.iter_mut() {
            let Some(Slot::Resident(chunk)) = slot else {
                continue;
            };
            if force {
                save_extra_chunk_data(loader, chunk);
            }
            if !chunk.needs_saving(force) {
                continue;
            }
            if save_chunk(loader, chunk, *world_time) {
                chunk.is_modified = false;
            }
            saved += 1;
            if !force && saved == *saves_per_tick {
                return SaveOutcome::Partial;
            }
            if saved % PROGRESS_STEP == 0 {
                if let Some(sink) = progress.as_deref_mut() {
                    sink.set_progress((saved * 100 / total).min(100) as u8);
                }
            }
        }

        if force {
            if let Some(loader) = loader.as_mut() {
                loader.set_world_time(*world_time);
                if let Err(e) = loader.save_extra_data() {
                    warn!(target: "cache", "saving world data failed: {}", e);
                }
            }
        }
        SaveOutcome::Complete
    }

    pub fn can_save(&self) -> bool {
        true
    }

    /// Whether a save would write anything.
    pub fn has_unsaved_work(&self) -> bool {
        self.slots.residents().any(|c| c.needs_saving(false))
            || self.loader.as_ref().is_some_and(|l| l.has_unsaved_work())
    }

    /// Forced save followed by dropping every slot.
    pub fn unload_all(&mut self, progress: Option<&mut dyn ProgressSink>) -> SaveOutcome {
        let outcome = self.save_chunks(true, progress);
        for slot in self.slots.slots.iter_mut() {
            if let Some(Slot::Resident(chunk)) = slot {
                chunk.on_unload();
            }
            *slot = None;
        }
        self.last_queried = None;
        outcome
    }

    fn try_populate(&mut self, x: i32, z: i32) {
        let pending = self
            .slots
            .resident(ChunkPos::new(x, z))
            .is_some_and(|c| !c.is_terrain_populated);
        if pending
            && self.chunk_exists(x, z)
            && self.chunk_exists(x + 1, z)
            && self.chunk_exists(x, z + 1)
            && self.chunk_exists(x + 1, z + 1)
        {
            self.populate(x, z);
        }
    }

    fn install(&mut self, pos: ChunkPos) {
        let idx = slot_index(pos.x, pos.z);
        if let Some(old) = self.slots.slots[idx].take() {
            self.evict(old);
        }
        let slot = match self.load(pos).or_else(|| self.generate(pos)) {
            Some(mut chunk) => {
                chunk.on_load();
                Slot::Resident(chunk)
            }
            None => Slot::Placeholder(pos),
        };
        self.slots.slots[idx] = Some(slot);
    }

    fn evict(&mut self, slot: Slot) {
        let Slot::Resident(mut chunk) = slot else {
            return;
        };
        chunk.on_unload();
        save_chunk(&mut self.loader, &mut chunk, self.world_time);
        save_extra_chunk_data(&mut self.loader, &chunk);
        self.stats.evictions += 1;
        debug!(target: "cache", "evicted ({}, {})", chunk.pos().x, chunk.pos().z);
    }

    fn load(&mut self, pos: ChunkPos) -> Option<Chunk> {
        let loader = self.loader.as_mut()?;
        match loader.load_chunk(pos.x, pos.z) {
            Ok(Some(mut chunk)) if chunk.pos() == pos => {
                chunk.last_save_time = self.world_time;
                self.stats.loads += 1;
                Some(chunk)
            }
            Ok(Some(chunk)) => {
                warn!(
                    target: "cache",
                    "store returned ({}, {}) for ({}, {}); regenerating",
                    chunk.pos().x, chunk.pos().z, pos.x, pos.z
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(target: "cache", "loading ({}, {}) failed: {}", pos.x, pos.z, e);
                None
            }
        }
    }

    fn generate(&mut self, pos: ChunkPos) -> Option<Chunk> {
        let upstream = self.upstream.as_mut()?;
        match upstream.provide_chunk(pos.x, pos.z) {
            Ok(chunk) => {
                self.stats.generated += 1;
                Some(chunk)
            }
            Err(e) => {
                error!(target: "cache", "generating ({}, {}) failed: {}", pos.x, pos.z, e);
                None
            }
        }
    }
}

fn save_chunk(
    loader: &mut Option<Box<dyn ChunkLoader>>,
    chunk: &mut Chunk,
    world_time: i64,
) -> bool {
    let Some(loader) = loader.as_mut() else {
        return false;
    };
    chunk.last_save_time = world_time;
    match loader.save_chunk(chunk) {
        Ok(()) => true,
        Err(e) => {
            let pos = chunk.pos();
            warn!(target: "cache", "saving ({}, {}) failed: {}", pos.x, pos.z, e);
            false
        }
    }
}

fn save_extra_chunk_data(loader: &mut Option<Box<dyn ChunkLoader>>, chunk: &Chunk) {
    if let Some(loader) = loader.as_mut() {
        if let Err(e) = loader.save_extra_chunk_data(chunk) {
            let pos = chunk.pos();
            warn!(target: "cache", "saving extra data of ({}, {}) failed: {}", pos.x, pos.z, e);
        }
    }
}

impl BlockAccess for ChunkCache {
    fn registry(&self) -> &BlockRegistry {
        &self.slots.registry
    }

    fn chunk_at(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.slots.resident(pos)
    }

    fn chunk_at_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.slots.resident_mut(pos)
    }
}

impl ChunkProvider for ChunkCache {
    fn chunk_exists(&self, x: i32, z: i32) -> bool {
        ChunkCache::chunk_exists(self, x, z)
    }

    fn provide_chunk(&mut self, x: i32, z: i32) -> Result<Chunk, GenerationError> {
        Ok(self.provide(x, z, false).clone())
    }

    /// Decoration happens in the caller's world, which holds the copies
    /// handed out by `provide_chunk`.
    fn populate(&mut self, world: &mut dyn BlockAccess, x: i32, z: i32) {
        if let Some(upstream) = self.upstream.as_mut() {
            upstream.populate(world, x, z);
        }
    }

    fn save_chunks(
        &mut self,
        force: bool,
        progress: Option<&mut dyn ProgressSink>,
    ) -> SaveOutcome {
        ChunkCache::save_chunks(self, force, progress)
    }

    fn can_save(&self) -> bool {
        ChunkCache::can_save(self)
    }
}
