use strata_blocks::{BlockId, Material, ids};
use strata_chunk::BlockAccess;
use strata_world::JavaRandom;

use super::Feature;

const W: usize = 16;
const H: usize = 8;
// Cells below this layer hold liquid, the rest is cleared to air.
const SURFACE: usize = 4;

/// A pool of liquid carved from overlapping ellipsoids inside a 16×8×16 box.
pub struct Lake {
    liquid: BlockId,
}

impl Lake {
    pub fn new(liquid: BlockId) -> Self {
        Self { liquid }
    }
}

#[inline]
fn cell(x: usize, y: usize, z: usize) -> usize {
    (x * W + z) * H + y
}

impl Feature for Lake {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        let x = x - 8;
        let z = z - 8;
        let mut y = y;
        while y > 0 && world.is_air(x, y, z) {
            y -= 1;
        }
        y -= 4;

        let mut shape = [false; W * W * H];
        let blobs = rand.next_int_bounded(4) + 4;
        for _ in 0..blobs {
            let sx = rand.next_double() * 6.0 + 3.0;
            let sy = rand.next_double() * 4.0 + 2.0;
            let sz = rand.next_double() * 6.0 + 3.0;
            let cx = rand.next_double() * (16.0 - sx - 2.0) + 1.0 + sx / 2.0;
            let cy = rand.next_double() * (8.0 - sy - 4.0) + 2.0 + sy / 2.0;
            let cz = rand.next_double() * (16.0 - sz - 2.0) + 1.0 + sz / 2.0;
            for lx in 1..W - 1 {
                for lz in 1..W - 1 {
                    for ly in 1..H - 1 {
                        let dx = (lx as f64 - cx) / (sx / 2.0);
                        let dy = (ly as f64 - cy) / (sy / 2.0);
                        let dz = (lz as f64 - cz) / (sz / 2.0);
                        if dx * dx + dy * dy + dz * dz < 1.0 {
                            shape[cell(lx, ly, lz)] = true;
                        }
                    }
                }
            }
        }

        let is_edge = |lx: usize, ly: usize, lz: usize| {
            !shape[cell(lx, ly, lz)]
                && ((lx < W - 1 && shape[cell(lx + 1, ly, lz)])
                    || (lx > 0 && shape[cell(lx - 1, ly, lz)])
                    || (lz < W - 1 && shape[cell(lx, ly, lz + 1)])
                    || (lz > 0 && shape[cell(lx, ly, lz - 1)])
                    || (ly < H - 1 && shape[cell(lx, ly + 1, lz)])
                    || (ly > 0 && shape[cell(lx, ly - 1, lz)]))
        };

        // The shell must hold the liquid and stay dry above the waterline.
        for lx in 0..W {
            for lz in 0..W {
                for ly in 0..H {
                    if !is_edge(lx, ly, lz) {
                        continue;
                    }
                    let (wx, wy, wz) = (x + lx as i32, y + ly as i32, z + lz as i32);
                    let m = world.material(wx, wy, wz);
                    if ly >= SURFACE && m.is_liquid() {
                        return false;
                    }
                    if ly < SURFACE && !m.is_solid() && world.block_id(wx, wy, wz) != self.liquid {
                        return false;
                    }
                }
            }
        }

        for lx in 0..W {
            for lz in 0..W {
                for ly in 0..H {
                    if shape[cell(lx, ly, lz)] {
                        let id = if ly >= SURFACE { ids::AIR } else { self.liquid };
                        world.set_block(x + lx as i32, y + ly as i32, z + lz as i32, id);
                    }
                }
            }
        }

        // Exposed dirt on the banks regrows grass.
        for lx in 0..W {
            for lz in 0..W {
                for ly in SURFACE..H {
                    if !shape[cell(lx, ly, lz)] {
                        continue;
                    }
                    let (wx, wy, wz) = (x + lx as i32, y + ly as i32, z + lz as i32);
                    if world.block_id(wx, wy - 1, wz) == ids::DIRT && wy >= world.height_value(wx, wz) {
                        world.set_block(wx, wy - 1, wz, ids::GRASS);
                    }
                }
            }
        }

        if world.registry().material(self.liquid) == Material::Lava {
            for lx in 0..W {
                for lz in 0..W {
                    for ly in 0..H {
                        if !is_edge(lx, ly, lz) {
                            continue;
                        }
                        let (wx, wy, wz) = (x + lx as i32, y + ly as i32, z + lz as i32);
                        if (ly < SURFACE || rand.next_int_bounded(2) != 0)
                            && world.material(wx, wy, wz).is_solid()
                        {
                            world.set_block(wx, wy, wz, ids::STONE);
                        }
                    }
                }
            }
        }
        true
    }
}
