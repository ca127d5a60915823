use strata_blocks::{Material, ids};
use strata_chunk::BlockAccess;
use strata_world::{CHUNK_HEIGHT, JavaRandom};

use super::Feature;

const WORLD_TOP: i32 = CHUNK_HEIGHT as i32;

/// Small oak: a 4 to 6 block trunk under a rounded leaf cap.
#[derive(Default)]
pub struct Tree;

pub(crate) fn can_grow_on(world: &dyn BlockAccess, x: i32, y: i32, z: i32) -> bool {
    matches!(world.block_id(x, y, z), ids::GRASS | ids::DIRT)
}

fn is_clear(world: &dyn BlockAccess, x: i32, y: i32, z: i32) -> bool {
    matches!(world.block_id(x, y, z), ids::AIR | ids::LEAVES)
}

impl Feature for Tree {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        let height = rand.next_int_bounded(3) + 4;
        if y < 1 || y + height + 1 > WORLD_TOP {
            return false;
        }

        for yy in y..=y + 1 + height {
            let r = if yy == y {
                0
            } else if yy >= y + 1 + height - 2 {
                2
            } else {
                1
            };
            for xx in x - r..=x + r {
                for zz in z - r..=z + r {
                    if !(0..WORLD_TOP).contains(&yy) || !is_clear(world, xx, yy, zz) {
                        return false;
                    }
                }
            }
        }

        if !can_grow_on(world, x, y - 1, z) || y >= WORLD_TOP - height - 1 {
            return false;
        }
        world.set_block(x, y - 1, z, ids::DIRT);

        for yy in y - 3 + height..=y + height {
            let dy = yy - (y + height);
            // Integer division truncates toward zero.
            let r = 1 - dy / 2;
            for xx in x - r..=x + r {
                let ax = (xx - x).abs();
                for zz in z - r..=z + r {
                    let az = (zz - z).abs();
                    let corner = ax == r && az == r;
                    if corner && (rand.next_int_bounded(2) == 0 || dy == 0) {
                        continue;
                    }
                    if !world.is_opaque(xx, yy, zz) {
                        world.set_block(xx, yy, zz, ids::LEAVES);
                    }
                }
            }
        }

        for dy in 0..height {
            let yy = y + dy;
            if matches!(world.material(x, yy, z), Material::Air | Material::Leaves) {
                world.set_block(x, yy, z, ids::LOG);
            }
        }
        true
    }
}
