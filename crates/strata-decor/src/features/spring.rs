use strata_blocks::{BlockId, ids};
use strata_chunk::BlockAccess;
use strata_world::JavaRandom;

use super::Feature;

/// A single liquid source set into a cave wall: stone above and below, three
/// stone sides and one open side.
pub struct Spring {
    liquid: BlockId,
}

impl Spring {
    pub fn new(liquid: BlockId) -> Self {
        Self { liquid }
    }
}

impl Feature for Spring {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        _rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        if world.block_id(x, y + 1, z) != ids::STONE || world.block_id(x, y - 1, z) != ids::STONE {
            return false;
        }
        let here = world.block_id(x, y, z);
        if here != ids::AIR && here != ids::STONE {
            return false;
        }
        let sides = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        let stone = sides
            .iter()
            .filter(|&&(dx, dz)| world.block_id(x + dx, y, z + dz) == ids::STONE)
            .count();
        let open = sides
            .iter()
            .filter(|&&(dx, dz)| world.is_air(x + dx, y, z + dz))
            .count();
        if stone != 3 || open != 1 {
            return false;
        }
        world.set_block(x, y, z, self.liquid);
        true
    }
}
