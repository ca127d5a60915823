use strata_blocks::ids;
use strata_chunk::BlockAccess;
use strata_world::JavaRandom;

use super::Feature;

const ROOM_HEIGHT: i32 = 3;
const CHEST_ATTEMPTS: usize = 3;

/// Mob spawner kinds, stored in the spawner's metadata.
pub const SPAWNER_MOBS: [&str; 4] = ["skeleton", "zombie", "zombie", "spider"];

/// A cobblestone room with a spawner and up to two chests, only where the
/// floor and ceiling are solid and the walls have one to five openings.
#[derive(Default)]
pub struct Dungeon;

impl Feature for Dungeon {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        let rx = rand.next_int_bounded(2) + 2;
        let rz = rand.next_int_bounded(2) + 2;
        let (x0, x1) = (x - rx - 1, x + rx + 1);
        let (z0, z1) = (z - rz - 1, z + rz + 1);

        let mut openings = 0;
        for bx in x0..=x1 {
            for by in y - 1..=y + ROOM_HEIGHT + 1 {
                for bz in z0..=z1 {
                    let solid = world.material(bx, by, bz).is_solid();
                    if (by == y - 1 || by == y + ROOM_HEIGHT + 1) && !solid {
                        return false;
                    }
                    let wall = bx == x0 || bx == x1 || bz == z0 || bz == z1;
                    if wall && by == y && world.is_air(bx, by, bz) && world.is_air(bx, by + 1, bz) {
                        openings += 1;
                    }
                }
            }
        }
        if !(1..=5).contains(&openings) {
            return false;
        }

        for bx in x0..=x1 {
            for by in (y - 1..=y + ROOM_HEIGHT).rev() {
                for bz in z0..=z1 {
                    let shell = bx == x0 || bx == x1 || bz == z0 || bz == z1 || by == y - 1;
                    if !shell {
                        world.set_block(bx, by, bz, ids::AIR);
                    } else if by >= 0 && !world.material(bx, by - 1, bz).is_solid() {
                        world.set_block(bx, by, bz, ids::AIR);
                    } else if world.material(bx, by, bz).is_solid() {
                        let id = if by == y - 1 && rand.next_int_bounded(4) != 0 {
                            ids::MOSSY_COBBLESTONE
                        } else {
                            ids::COBBLESTONE
                        };
                        world.set_block(bx, by, bz, id);
                    }
                }
            }
        }

        for _ in 0..2 {
            for _ in 0..CHEST_ATTEMPTS {
                let cx = x + rand.next_int_bounded(rx * 2 + 1) - rx;
                let cz = z + rand.next_int_bounded(rz * 2 + 1) - rz;
                if !world.is_air(cx, y, cz) {
                    continue;
                }
                let walls = [(-1, 0), (1, 0), (0, -1), (0, 1)]
                    .iter()
                    .filter(|&&(dx, dz)| world.material(cx + dx, y, cz + dz).is_solid())
                    .count();
                if walls == 1 {
                    world.set_block(cx, y, cz, ids::CHEST);
                    break;
                }
            }
        }

        let mob = rand.next_int_bounded(SPAWNER_MOBS.len() as i32) as u8;
        world.set_block_with_metadata(x, y, z, ids::SPAWNER, mob);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{count, flat_world};

    fn hollow(w: &mut dyn BlockAccess, x0: i32, x1: i32, y0: i32, y1: i32, z0: i32, z1: i32) {
        for x in x0..=x1 {
            for y in y0..=y1 {
                for z in z0..=z1 {
                    w.set_block(x, y, z, ids::AIR);
                }
            }
        }
    }

    #[test]
    fn sealed_rock_has_no_openings() {
        let mut w = flat_world(ids::STONE, 90);
        let mut rand = JavaRandom::new(4);
        assert!(!Dungeon.place(&mut w, &mut rand, 16, 40, 16));
        assert_eq!(count(&w, ids::SPAWNER), 0);
    }

    #[test]
    fn builds_room_next_to_a_tunnel() {
        let mut w = flat_world(ids::STONE, 90);
        // A 2-high corridor along x that crosses every possible wall position.
        hollow(&mut w, 0, 31, 40, 41, 16, 16);
        let mut rand = JavaRandom::new(4);
        assert!(Dungeon.place(&mut w, &mut rand, 16, 40, 16));
        assert_eq!(w.block_id(16, 40, 16), ids::SPAWNER);
        assert!((w.metadata(16, 40, 16) as usize) < SPAWNER_MOBS.len());
        assert!(count(&w, ids::COBBLESTONE) + count(&w, ids::MOSSY_COBBLESTONE) > 0);
        assert!(w.is_air(16, 43, 16));
    }
}
