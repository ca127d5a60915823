use std::f32::consts::{FRAC_PI_2, PI};

use strata_blocks::{BlockId, ids};

use crate::column::{CHUNK_HEIGHT, CHUNK_WIDTH, column_index};
use crate::rng::JavaRandom;

use super::Carver;

const MAX_CARVE_Y: i32 = 120;

/// Random-walk tunnels and rooms.
///
/// Every chunk within `range` of the carved chunk seeds its own set of
/// tunnels; only the segments that pass through the carved chunk are applied,
/// so neighbours agree on tunnels that cross chunk borders.
#[derive(Clone, Debug)]
pub struct TunnelCarver {
    range: i32,
    lava_level: i32,
    rand: JavaRandom,
}

/// State of one tunnel walker.
#[derive(Clone, Copy)]
struct Walk {
    x: f64,
    y: f64,
    z: f64,
    width: f32,
    yaw: f32,
    pitch: f32,
    // -1 starts a single-step room in the middle of the walk.
    step: i32,
    // 0 picks a random length.
    length: i32,
    vertical_scale: f64,
}

// The chunk being carved and its block buffer.
struct Target<'a> {
    cx: i32,
    cz: i32,
    blocks: &'a mut [BlockId],
}

impl TunnelCarver {
    pub fn new(range: i32, lava_level: i32) -> Self {
        Self {
            range: range.max(2),
            lava_level,
            rand: JavaRandom::new(0),
        }
    }

    fn source_chunk(&mut self, sx: i32, sz: i32, target: &mut Target<'_>) {
        let r = &mut self.rand;
        let a = r.next_int_bounded(40) + 1;
        let b = r.next_int_bounded(a) + 1;
        let mut count = r.next_int_bounded(b);
        if r.next_int_bounded(15) != 0 {
            count = 0;
        }

        for _ in 0..count {
            let r = &mut self.rand;
            let x = (sx * 16 + r.next_int_bounded(16)) as f64;
            let spread = r.next_int_bounded(120) + 8;
            let y = r.next_int_bounded(spread) as f64;
            let z = (sz * 16 + r.next_int_bounded(16)) as f64;
            let mut branches = 1;

            if r.next_int_bounded(4) == 0 {
                let width = 1.0 + r.next_float() * 6.0;
                let room = Walk {
                    x,
                    y,
                    z,
                    width,
                    yaw: 0.0,
                    pitch: 0.0,
                    step: -1,
                    length: -1,
                    vertical_scale: 0.5,
                };
                self.walk(room, target);
                branches += self.rand.next_int_bounded(4);
            }

            for _ in 0..branches {
                let r = &mut self.rand;
                let yaw = r.next_float() * PI * 2.0;
                let pitch = (r.next_float() - 0.5) * 2.0 / 8.0;
                let width = r.next_float() * 2.0 + r.next_float();
                let tunnel = Walk {
                    x,
                    y,
                    z,
                    width,
                    yaw,
                    pitch,
                    step: 0,
                    length: 0,
                    vertical_scale: 1.0,
                };
                self.walk(tunnel, target);
            }
        }
    }

    fn walk(&mut self, mut w: Walk, target: &mut Target<'_>) {
        let center_x = (target.cx * 16 + 8) as f64;
        let center_z = (target.cz * 16 + 8) as f64;
        let mut yaw_delta = 0.0f32;
        let mut pitch_delta = 0.0f32;
        let mut r = JavaRandom::new(self.rand.next_long());

        if w.length <= 0 {
            let max = self.range * 16 - 16;
            w.length = max - r.next_int_bounded(max / 4);
        }
        let mut room = false;
        if w.step == -1 {
            w.step = w.length / 2;
            room = true;
        }
        let split_at = r.next_int_bounded(w.length / 2) + w.length / 4;
        let steep = r.next_int_bounded(6) == 0;

        for step in w.step..w.length {
            let radius = 1.5 + ((step as f32 * PI / w.length as f32).sin() * w.width) as f64;
            let vradius = radius * w.vertical_scale;
            let cos_pitch = w.pitch.cos();
            w.x += (w.yaw.cos() * cos_pitch) as f64;
            w.y += w.pitch.sin() as f64;
            w.z += (w.yaw.sin() * cos_pitch) as f64;
            w.pitch *= if steep { 0.92 } else { 0.7 };
            w.pitch += pitch_delta * 0.1;
            w.yaw += yaw_delta * 0.1;
            pitch_delta *= 0.9;
            yaw_delta *= 0.75;
            pitch_delta += (r.next_float() - r.next_float()) * r.next_float() * 2.0;
            yaw_delta += (r.next_float() - r.next_float()) * r.next_float() * 4.0;

            if !room && step == split_at && w.width > 1.0 {
                for side in [-FRAC_PI_2, FRAC_PI_2] {
                    let branch = Walk {
                        width: r.next_float() * 0.5 + 0.5,
                        yaw: w.yaw + side,
                        pitch: w.pitch / 3.0,
                        step,
                        vertical_scale: 1.0,
                        ..w
                    };
                    self.walk(branch, target);
                }
                return;
            }
            if !room && r.next_int_bounded(4) == 0 {
                continue;
            }

            let dx = w.x - center_x;
            let dz = w.z - center_z;
            let remaining = (w.length - step) as f64;
            let reach = w.width as f64 + 2.0 + 16.0;
            if dx * dx + dz * dz - remaining * remaining > reach * reach {
                return;
            }
            let margin = 16.0 + radius * 2.0;
            if w.x < center_x - margin
                || w.z < center_z - margin
                || w.x > center_x + margin
                || w.z > center_z + margin
            {
                continue;
            }
            self.hollow(target, w.x, w.y, w.z, radius, vradius);
            if room {
                break;
            }
        }
    }

    /// Clears the ellipsoid at `(x, y, z)` inside the target chunk unless the
    /// enclosing box touches water.
    fn hollow(&self, target: &mut Target<'_>, x: f64, y: f64, z: f64, radius: f64, vradius: f64) {
        let ox = target.cx * 16;
        let oz = target.cz * 16;
        let w = CHUNK_WIDTH as i32;
        let x0 = ((x - radius).floor() as i32 - ox - 1).max(0);
        let x1 = ((x + radius).floor() as i32 - ox + 1).min(w);
        let y0 = ((y - vradius).floor() as i32 - 1).max(1);
        let y1 = ((y + vradius).floor() as i32 + 1).min(MAX_CARVE_Y);
        let z0 = ((z - radius).floor() as i32 - oz - 1).max(0);
        let z1 = ((z + radius).floor() as i32 - oz + 1).min(w);
        if x0 >= x1 || z0 >= z1 || y0 >= y1 {
            return;
        }

        let blocks = &mut *target.blocks;
        for bx in x0..x1 {
            for bz in z0..z1 {
                for by in (y0 - 1).max(0)..(y1 + 1).min(CHUNK_HEIGHT as i32) {
                    if ids::is_water(blocks[column_index(bx as usize, by as usize, bz as usize)]) {
                        return;
                    }
                }
            }
        }

        for bx in x0..x1 {
            let nx = ((bx + ox) as f64 + 0.5 - x) / radius;
            for bz in z0..z1 {
                let nz = ((bz + oz) as f64 + 0.5 - z) / radius;
                if nx * nx + nz * nz >= 1.0 {
                    continue;
                }
                let mut under_grass = false;
                for by in (y0..y1).rev() {
                    let ny = (by as f64 + 0.5 - y) / vradius;
                    if ny <= -0.7 || nx * nx + ny * ny + nz * nz >= 1.0 {
                        continue;
                    }
                    let idx = column_index(bx as usize, by as usize, bz as usize);
                    let block = blocks[idx];
                    if block == ids::GRASS {
                        under_grass = true;
                    }
                    if !matches!(block, ids::STONE | ids::DIRT | ids::GRASS) {
                        continue;
                    }
                    if by < self.lava_level {
                        blocks[idx] = ids::FLOWING_LAVA;
                    } else {
                        blocks[idx] = ids::AIR;
                        // Regrow the exposed floor.
                        if under_grass && blocks[idx - 1] == ids::DIRT {
                            blocks[idx - 1] = ids::GRASS;
                        }
                    }
                }
            }
        }
    }
}

impl Carver for TunnelCarver {
    fn carve(&mut self, seed: i64, cx: i32, cz: i32, blocks: &mut [BlockId]) {
        self.rand.set_seed(seed);
        let mx = self.rand.next_odd_long();
        let mz = self.rand.next_odd_long();
        let mut target = Target { cx, cz, blocks };
        for sx in cx - self.range..=cx + self.range {
            for sz in cz - self.range..=cz + self.range {
                let source_seed = (sx as i64)
                    .wrapping_mul(mx)
                    .wrapping_add((sz as i64).wrapping_mul(mz))
                    ^ seed;
                self.rand.set_seed(source_seed);
                self.source_chunk(sx, sz, &mut target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::COLUMN_VOLUME;

    fn stone_column() -> Vec<BlockId> {
        let mut blocks = vec![ids::STONE; COLUMN_VOLUME];
        for x in 0..16 {
            for z in 0..16 {
                for y in 100..128 {
                    blocks[column_index(x, y, z)] = ids::AIR;
                }
            }
        }
        blocks
    }

    #[test]
    fn carving_is_deterministic() {
        let mut a = stone_column();
        let mut b = stone_column();
        TunnelCarver::new(8, 10).carve(1234, 2, -3, &mut a);
        TunnelCarver::new(8, 10).carve(1234, 2, -3, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn carves_something_over_many_chunks() {
        let mut carver = TunnelCarver::new(8, 10);
        let carved = (0..16).any(|cx| {
            let mut blocks = stone_column();
            carver.carve(77, cx, 0, &mut blocks);
            blocks != stone_column()
        });
        assert!(carved);
    }

    #[test]
    fn never_touches_bedrock_layer_or_water() {
        let mut carver = TunnelCarver::new(8, 10);
        for cx in 0..8 {
            let mut blocks = stone_column();
            for x in 0..16 {
                for z in 0..16 {
                    blocks[column_index(x, 0, z)] = ids::BEDROCK;
                    blocks[column_index(x, 99, z)] = ids::WATER;
                }
            }
            carver.carve(5, cx, cx, &mut blocks);
            for x in 0..16 {
                for z in 0..16 {
                    assert_eq!(blocks[column_index(x, 0, z)], ids::BEDROCK);
                    assert_eq!(blocks[column_index(x, 99, z)], ids::WATER);
                }
            }
        }
    }
}
