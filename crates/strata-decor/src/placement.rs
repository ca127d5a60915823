//! Whether a block may sit at a position, decided by its behaviour tag.

use strata_blocks::{Behavior, BlockId, Material, Soil, ids};
use strata_chunk::BlockAccess;

pub fn can_stay(world: &dyn BlockAccess, id: BlockId, x: i32, y: i32, z: i32) -> bool {
    match world.registry().behavior(id) {
        Behavior::Plant { soil } => plant_can_stay(world, soil, x, y, z),
        Behavior::Reed => reed_can_stay(world, x, y, z),
        Behavior::Cactus => cactus_can_stay(world, x, y, z),
        Behavior::SnowLayer => {
            world.is_opaque(x, y - 1, z) && world.material(x, y - 1, z).is_solid()
        }
        Behavior::Inert | Behavior::Falling | Behavior::Liquid { .. } => true,
    }
}

/// Target cell is open and the block may stay there.
pub fn can_place(world: &dyn BlockAccess, id: BlockId, x: i32, y: i32, z: i32) -> bool {
    world.material(x, y, z).is_replaceable() && can_stay(world, id, x, y, z)
}

fn plant_can_stay(world: &dyn BlockAccess, soil: Soil, x: i32, y: i32, z: i32) -> bool {
    let below = world.block_id(x, y - 1, z);
    // A column is lit if nothing non-air sits at or above `y`.
    let sky = y >= world.height_value(x, z);
    match soil {
        Soil::Fertile => sky && matches!(below, ids::GRASS | ids::DIRT),
        Soil::Opaque => !sky && world.is_opaque(x, y - 1, z),
        Soil::Sand => below == ids::SAND,
    }
}

fn reed_can_stay(world: &dyn BlockAccess, x: i32, y: i32, z: i32) -> bool {
    let below = world.block_id(x, y - 1, z);
    if below == ids::REED {
        return true;
    }
    if !matches!(below, ids::GRASS | ids::DIRT | ids::SAND) {
        return false;
    }
    [(-1, 0), (1, 0), (0, -1), (0, 1)]
        .iter()
        .any(|&(dx, dz)| world.material(x + dx, y - 1, z + dz) == Material::Water)
}

fn cactus_can_stay(world: &dyn BlockAccess, x: i32, y: i32, z: i32) -> bool {
    let crowded = [(-1, 0), (1, 0), (0, -1), (0, 1)]
        .iter()
        .any(|&(dx, dz)| world.material(x + dx, y, z + dz).is_solid());
    if crowded {
        return false;
    }
    matches!(world.block_id(x, y - 1, z), ids::CACTUS | ids::SAND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::flat_world;

    #[test]
    fn flowers_need_fertile_ground_and_sky() {
        let mut w = flat_world(ids::GRASS, 60);
        assert!(can_place(&w, ids::DANDELION, 4, 61, 4));
        assert!(!can_place(&w, ids::DANDELION, 4, 62, 4));
        w.set_block(4, 70, 4, ids::STONE);
        assert!(!can_place(&w, ids::DANDELION, 4, 61, 4));
    }

    #[test]
    fn mushrooms_need_shade() {
        let mut w = flat_world(ids::STONE, 60);
        assert!(!can_place(&w, ids::RED_MUSHROOM, 4, 61, 4));
        w.set_block(4, 64, 4, ids::STONE);
        assert!(can_place(&w, ids::RED_MUSHROOM, 4, 61, 4));
    }

    #[test]
    fn reeds_need_adjacent_water() {
        let mut w = flat_world(ids::SAND, 60);
        assert!(!can_stay(&w, ids::REED, 4, 61, 4));
        w.set_block(5, 60, 4, ids::WATER);
        assert!(can_stay(&w, ids::REED, 4, 61, 4));
        w.set_block(4, 61, 4, ids::REED);
        assert!(can_stay(&w, ids::REED, 4, 62, 4));
    }

    #[test]
    fn cactus_needs_sand_and_space() {
        let mut w = flat_world(ids::SAND, 60);
        assert!(can_stay(&w, ids::CACTUS, 4, 61, 4));
        w.set_block(4, 61, 5, ids::STONE);
        assert!(!can_stay(&w, ids::CACTUS, 4, 61, 4));
        w.set_block(4, 61, 5, ids::DANDELION);
        assert!(can_stay(&w, ids::CACTUS, 4, 61, 4));
    }
}
