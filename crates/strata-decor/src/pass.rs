use std::error::Error;
use std::fmt;

use log::debug;
use strata_blocks::{BlockId, BlockRegistry, ids};
use strata_chunk::BlockAccess;
use strata_world::worldgen::Spread;
use strata_world::{CHUNK_WIDTH, DecorationProfile, JavaRandom, TerrainGenerator, WorldGenParams};

use crate::features::{
    BigTree, Cacti, ClayPatch, Dungeon, Feature, Flowers, Lake, Pumpkins, Reeds, Spring, Tree,
    Vein,
};
use crate::snow::snow_pass;

const WORLD_TOP: i32 = 128;
const DUNGEON_ATTEMPTS: usize = 8;
const CLAY_PATCHES: usize = 10;
const CLAY_SIZE: u32 = 32;
const REED_ATTEMPTS: usize = 10;
const WATER_SPRINGS: usize = 50;
const LAVA_SPRINGS: usize = 20;

#[derive(Debug)]
pub enum DecorError {
    UnknownBlock(String),
}

impl fmt::Display for DecorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecorError::UnknownBlock(name) => write!(f, "vein block '{}' is not registered", name),
        }
    }
}

impl Error for DecorError {}

#[derive(Clone, Debug)]
struct VeinPlan {
    block: BlockId,
    count: u32,
    size: u32,
    max_y: i32,
    spread: Spread,
}

/// Scatters features over the 16×16 area offset by +8 from chunk `(cx, cz)`,
/// which straddles it and its three positive neighbours.
pub struct DecorationPass {
    enabled: bool,
    veins: Vec<VeinPlan>,
    rand: JavaRandom,
}

impl DecorationPass {
    /// Resolves the vein table against `registry`. Unknown block names fail here
    /// rather than during population.
    pub fn new(params: &WorldGenParams, registry: &BlockRegistry) -> Result<Self, DecorError> {
        let veins = params
            .veins
            .iter()
            .map(|def| {
                let block = registry
                    .id_by_name(&def.block)
                    .ok_or_else(|| DecorError::UnknownBlock(def.block.clone()))?;
                Ok(VeinPlan {
                    block,
                    count: def.count,
                    size: def.size,
                    max_y: def.max_y.clamp(1, WORLD_TOP),
                    spread: def.spread,
                })
            })
            .collect::<Result<Vec<_>, DecorError>>()?;
        Ok(Self {
            enabled: params.decoration_enable,
            veins,
            rand: JavaRandom::new(0),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Decorates chunk `(cx, cz)`. The caller guarantees that the chunk and its
    /// +x, +z and +x+z neighbours are resident and that this runs once per chunk.
    pub fn populate(
        &mut self,
        terrain: &mut TerrainGenerator,
        world: &mut dyn BlockAccess,
        cx: i32,
        cz: i32,
    ) {
        if !self.enabled {
            return;
        }
        let bx = cx * CHUNK_WIDTH as i32;
        let bz = cz * CHUNK_WIDTH as i32;
        let registry = terrain.biomes().clone();
        let kind = terrain.climate_mut().biome_at(bx + 16, bz + 16, &registry);
        let profile: DecorationProfile = registry
            .get(kind)
            .map(|b| b.decoration)
            .unwrap_or_default();

        let rand = &mut self.rand;
        rand.set_seed(terrain.seeds().decoration(cx, cz));

        if rand.next_int_bounded(4) == 0 {
            let (x, y, z) = (
                bx + rand.next_int_bounded(16) + 8,
                rand.next_int_bounded(WORLD_TOP),
                bz + rand.next_int_bounded(16) + 8,
            );
            Lake::new(ids::WATER).place(world, rand, x, y, z);
        }
        if rand.next_int_bounded(8) == 0 {
            let x = bx + rand.next_int_bounded(16) + 8;
            let bound = rand.next_int_bounded(120) + 8;
            let y = rand.next_int_bounded(bound);
            let z = bz + rand.next_int_bounded(16) + 8;
            if y < 64 || rand.next_int_bounded(10) == 0 {
                Lake::new(ids::LAVA).place(world, rand, x, y, z);
            }
        }

        let mut dungeons = 0;
        for _ in 0..DUNGEON_ATTEMPTS {
            let (x, y, z) = offset_site(rand, bx, bz, WORLD_TOP);
            if Dungeon.place(world, rand, x, y, z) {
                dungeons += 1;
            }
        }

        let mut clay = ClayPatch::new(CLAY_SIZE);
        for _ in 0..CLAY_PATCHES {
            let (x, y, z) = chunk_site(rand, bx, bz, WORLD_TOP);
            clay.place(world, rand, x, y, z);
        }

        for plan in &self.veins {
            let mut vein = Vein::new(plan.block, plan.size);
            for _ in 0..plan.count {
                let x = bx + rand.next_int_bounded(16);
                let y = match plan.spread {
                    Spread::Uniform => rand.next_int_bounded(plan.max_y),
                    Spread::Triangular => {
                        let half = (plan.max_y / 2).max(1);
                        rand.next_int_bounded(half) + rand.next_int_bounded(half)
                    }
                };
                let z = bz + rand.next_int_bounded(16);
                vein.place(world, rand, x, y, z);
            }
        }

        let density = terrain.tree_density(bx, bz);
        let from_noise = ((density / 8.0 + rand.next_double() * 4.0 + 4.0) / 3.0) as i32;
        let mut trees = i32::from(rand.next_int_bounded(10) == 0);
        if let Some(bonus) = profile.forest_bonus {
            trees += from_noise + bonus;
        }
        trees -= profile.tree_penalty;
        let mut grown = 0;
        for _ in 0..trees.max(0) {
            let x = bx + rand.next_int_bounded(16) + 8;
            let z = bz + rand.next_int_bounded(16) + 8;
            let big = rand.next_int_bounded(profile.big_tree_chance.max(1)) == 0;
            let y = world.height_value(x, z);
            let ok = if big {
                BigTree.place(world, rand, x, y, z)
            } else {
                Tree.place(world, rand, x, y, z)
            };
            grown += i32::from(ok);
        }

        for _ in 0..2 {
            let (x, y, z) = offset_site(rand, bx, bz, WORLD_TOP);
            Flowers::new(ids::DANDELION).place(world, rand, x, y, z);
        }
        for (block, chance) in [
            (ids::ROSE, 2),
            (ids::BROWN_MUSHROOM, 4),
            (ids::RED_MUSHROOM, 8),
        ] {
            if rand.next_int_bounded(chance) == 0 {
                let (x, y, z) = offset_site(rand, bx, bz, WORLD_TOP);
                Flowers::new(block).place(world, rand, x, y, z);
            }
        }
        for _ in 0..REED_ATTEMPTS {
            let (x, y, z) = offset_site(rand, bx, bz, WORLD_TOP);
            Reeds.place(world, rand, x, y, z);
        }
        if rand.next_int_bounded(32) == 0 {
            let (x, y, z) = offset_site(rand, bx, bz, WORLD_TOP);
            Pumpkins.place(world, rand, x, y, z);
        }
        for _ in 0..profile.cactus_per_chunk {
            let (x, y, z) = offset_site(rand, bx, bz, WORLD_TOP);
            Cacti.place(world, rand, x, y, z);
        }

        let mut water = Spring::new(ids::FLOWING_WATER);
        for _ in 0..WATER_SPRINGS {
            let x = bx + rand.next_int_bounded(16) + 8;
            let bound = rand.next_int_bounded(120) + 8;
            let y = rand.next_int_bounded(bound);
            let z = bz + rand.next_int_bounded(16) + 8;
            water.place(world, rand, x, y, z);
        }
        let mut lava = Spring::new(ids::FLOWING_LAVA);
        for _ in 0..LAVA_SPRINGS {
            let x = bx + rand.next_int_bounded(16) + 8;
            let inner = rand.next_int_bounded(112) + 8;
            let bound = rand.next_int_bounded(inner) + 8;
            let y = rand.next_int_bounded(bound);
            let z = bz + rand.next_int_bounded(16) + 8;
            lava.place(world, rand, x, y, z);
        }

        let temperatures = terrain.climate_mut().temperatures(bx + 8, bz + 8, 16, 16);
        let snow = snow_pass(world, temperatures, bx + 8, bz + 8);

        debug!(
            target: "decor",
            "populated ({}, {}) biome={:?} dungeons={} trees={}/{} snow={}",
            cx, cz, kind, dungeons, grown, trees.max(0), snow
        );
    }
}

/// Random site inside the chunk itself.
fn chunk_site(rand: &mut JavaRandom, bx: i32, bz: i32, max_y: i32) -> (i32, i32, i32) {
    let x = bx + rand.next_int_bounded(16);
    let y = rand.next_int_bounded(max_y);
    let z = bz + rand.next_int_bounded(16);
    (x, y, z)
}

/// Random site in the +8 offset area.
fn offset_site(rand: &mut JavaRandom, bx: i32, bz: i32, max_y: i32) -> (i32, i32, i32) {
    let x = bx + rand.next_int_bounded(16) + 8;
    let y = rand.next_int_bounded(max_y);
    let z = bz + rand.next_int_bounded(16) + 8;
    (x, y, z)
}
