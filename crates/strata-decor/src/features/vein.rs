use std::f64::consts::PI;

use strata_blocks::{BlockId, ids};
use strata_chunk::BlockAccess;
use strata_world::JavaRandom;

use super::Feature;

/// Sweeps a chain of spheres between two random endpoints and calls `put` for
/// every block inside. Shared by ore veins and clay patches.
fn sweep(
    rand: &mut JavaRandom,
    size: i32,
    x: i32,
    y: i32,
    z: i32,
    mut put: impl FnMut(i32, i32, i32),
) {
    let n = size as f64;
    let angle = rand.next_float() as f64 * PI;
    let x0 = (x + 8) as f64 + angle.sin() * n / 8.0;
    let x1 = (x + 8) as f64 - angle.sin() * n / 8.0;
    let z0 = (z + 8) as f64 + angle.cos() * n / 8.0;
    let z1 = (z + 8) as f64 - angle.cos() * n / 8.0;
    let y0 = (y + rand.next_int_bounded(3) + 2) as f64;
    let y1 = (y + rand.next_int_bounded(3) + 2) as f64;

    for step in 0..=size {
        let t = step as f64 / n;
        let cx = x0 + (x1 - x0) * t;
        let cy = y0 + (y1 - y0) * t;
        let cz = z0 + (z1 - z0) * t;
        let spread = rand.next_double() * n / 16.0;
        let radius = ((step as f64 * PI / n).sin() + 1.0) * spread + 1.0;
        let half = radius / 2.0;

        let lo = |c: f64| (c - half).floor() as i32;
        let hi = |c: f64| (c + half).floor() as i32;
        for bx in lo(cx)..=hi(cx) {
            let dx = (bx as f64 + 0.5 - cx) / half;
            if dx * dx >= 1.0 {
                continue;
            }
            for by in lo(cy)..=hi(cy) {
                let dy = (by as f64 + 0.5 - cy) / half;
                if dx * dx + dy * dy >= 1.0 {
                    continue;
                }
                for bz in lo(cz)..=hi(cz) {
                    let dz = (bz as f64 + 0.5 - cz) / half;
                    if dx * dx + dy * dy + dz * dz < 1.0 {
                        put(bx, by, bz);
                    }
                }
            }
        }
    }
}

/// Ore blob that only replaces stone.
pub struct Vein {
    block: BlockId,
    size: i32,
}

impl Vein {
    pub fn new(block: BlockId, size: u32) -> Self {
        Self {
            block,
            size: size.max(1) as i32,
        }
    }
}

impl Feature for Vein {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        let block = self.block;
        sweep(rand, self.size, x, y, z, |bx, by, bz| {
            if world.block_id(bx, by, bz) == ids::STONE {
                world.set_block(bx, by, bz, block);
            }
        });
        true
    }
}

/// Clay under shallow water: the anchor must be water, and only sand is replaced.
pub struct ClayPatch {
    size: i32,
}

impl ClayPatch {
    pub fn new(size: u32) -> Self {
        Self {
            size: size.max(1) as i32,
        }
    }
}

impl Feature for ClayPatch {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        if !ids::is_water(world.block_id(x, y, z)) {
            return false;
        }
        sweep(rand, self.size, x, y, z, |bx, by, bz| {
            if world.block_id(bx, by, bz) == ids::SAND {
                world.set_block(bx, by, bz, ids::CLAY);
            }
        });
        true
    }
}
