use strata_blocks::{BlockId, Material, ids};
use strata_chunk::BlockAccess;
use strata_world::JavaRandom;

use super::Feature;
use crate::placement::{can_place, can_stay};

/// Offset in `-(spread - 1)..spread`, peaked at zero.
#[inline]
fn jitter(rand: &mut JavaRandom, spread: i32) -> i32 {
    rand.next_int_bounded(spread) - rand.next_int_bounded(spread)
}

/// A scatter of one small plant: flowers and mushrooms.
pub struct Flowers {
    block: BlockId,
}

impl Flowers {
    pub fn new(block: BlockId) -> Self {
        Self { block }
    }
}

impl Feature for Flowers {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        for _ in 0..64 {
            let px = x + jitter(rand, 8);
            let py = y + jitter(rand, 4);
            let pz = z + jitter(rand, 8);
            if world.is_air(px, py, pz) && can_stay(world, self.block, px, py, pz) {
                world.set_block(px, py, pz, self.block);
            }
        }
        true
    }
}

/// Sugar cane stacks along water.
#[derive(Default)]
pub struct Reeds;

impl Feature for Reeds {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        for _ in 0..20 {
            let px = x + jitter(rand, 4);
            let pz = z + jitter(rand, 4);
            if !world.is_air(px, y, pz) {
                continue;
            }
            let wet = [(-1, 0), (1, 0), (0, -1), (0, 1)]
                .iter()
                .any(|&(dx, dz)| world.material(px + dx, y - 1, pz + dz) == Material::Water);
            if !wet {
                continue;
            }
            let bound = rand.next_int_bounded(3) + 1;
            let height = 2 + rand.next_int_bounded(bound);
            for dy in 0..height {
                if can_stay(world, ids::REED, px, y + dy, pz) {
                    world.set_block(px, y + dy, pz, ids::REED);
                }
            }
        }
        true
    }
}

/// Pumpkins on grass, facing a random direction.
#[derive(Default)]
pub struct Pumpkins;

impl Feature for Pumpkins {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        for _ in 0..64 {
            let px = x + jitter(rand, 8);
            let py = y + jitter(rand, 4);
            let pz = z + jitter(rand, 8);
            if world.is_air(px, py, pz)
                && world.block_id(px, py - 1, pz) == ids::GRASS
                && can_place(world, ids::PUMPKIN, px, py, pz)
            {
                let facing = rand.next_int_bounded(4) as u8;
                world.set_block_with_metadata(px, py, pz, ids::PUMPKIN, facing);
            }
        }
        true
    }
}

/// Short cactus columns on sand.
#[derive(Default)]
pub struct Cacti;

impl Feature for Cacti {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        for _ in 0..10 {
            let px = x + jitter(rand, 8);
            let py = y + jitter(rand, 4);
            let pz = z + jitter(rand, 8);
            if !world.is_air(px, py, pz) {
                continue;
            }
            let bound = rand.next_int_bounded(3) + 1;
            let height = 1 + rand.next_int_bounded(bound);
            for dy in 0..height {
                if can_stay(world, ids::CACTUS, px, py + dy, pz) {
                    world.set_block(px, py + dy, pz, ids::CACTUS);
                }
            }
        }
        true
    }
}
