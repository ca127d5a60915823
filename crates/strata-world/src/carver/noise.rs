use fastnoise_lite::{FastNoiseLite, NoiseType};
use strata_blocks::{BlockId, ids};

use crate::column::{CHUNK_HEIGHT, CHUNK_WIDTH, column_index};
use crate::worldgen::{Fractal, NoiseCaveParams};

use super::Carver;

const WARP_OFFSETS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [133.7, 71.3, -19.1], [-54.2, 29.7, 88.8]];

/// Warped ridged tunnels plus cellular rooms, evaluated per block.
///
/// Stateless apart from the noise objects, which are rebuilt whenever the
/// world seed changes.
pub struct NoiseCaveCarver {
    params: NoiseCaveParams,
    noises: Option<SeededNoises>,
}

struct SeededNoises {
    seed: i64,
    warp: FastNoiseLite,
    tunnel: FastNoiseLite,
}

impl SeededNoises {
    fn new(seed: i64) -> Self {
        let folded = (seed ^ (seed >> 32)) as i32;
        let mut warp = FastNoiseLite::with_seed(folded ^ 99_173);
        warp.set_noise_type(Some(NoiseType::OpenSimplex2));
        let mut tunnel = FastNoiseLite::with_seed(folded ^ 41_337);
        tunnel.set_noise_type(Some(NoiseType::OpenSimplex2));
        Self { seed, warp, tunnel }
    }
}

impl NoiseCaveCarver {
    pub fn new(params: NoiseCaveParams) -> Self {
        Self {
            params,
            noises: None,
        }
    }

    fn noises(&mut self, seed: i64) -> &SeededNoises {
        if self.noises.as_ref().is_none_or(|n| n.seed != seed) {
            self.noises = None;
        }
        self.noises.get_or_insert_with(|| SeededNoises::new(seed))
    }
}

impl Carver for NoiseCaveCarver {
    fn carve(&mut self, seed: i64, cx: i32, cz: i32, blocks: &mut [BlockId]) {
        let p = self.params.clone();
        let noises = self.noises(seed);
        let cell_seed = (seed ^ (seed >> 32)) as u32;
        let height_f = CHUNK_HEIGHT as f32;

        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                let Some(top) = surface_height(blocks, x, z) else {
                    continue;
                };
                let wx = (cx * CHUNK_WIDTH as i32 + x as i32) as f32;
                let wz = (cz * CHUNK_WIDTH as i32 + z as i32) as f32;
                for y in (1..top).rev() {
                    let idx = column_index(x, y, z);
                    if !matches!(
                        blocks[idx],
                        ids::STONE | ids::DIRT | ids::GRASS | ids::SANDSTONE
                    ) {
                        continue;
                    }
                    let wy = y as f32;
                    let soil = top as f32 - wy;
                    if soil <= p.soil_min || wy <= p.min_y {
                        continue;
                    }
                    let above = blocks[idx + 1];
                    if ids::is_water(above) || ids::is_lava(above) {
                        continue;
                    }

                    let mut warped = [0.0f32; 3];
                    for (axis, off) in WARP_OFFSETS.iter().enumerate() {
                        warped[axis] =
                            fractal(&noises.warp, wx + off[0], wy + off[1], wz + off[2], &p.warp);
                    }
                    let xp = wx + warped[0] * p.warp_xy;
                    let yp = wy + warped[1] * p.warp_y;
                    let zp = wz + warped[2] * p.warp_xy;

                    let depth = (soil / height_f).clamp(0.0, 1.0);
                    let ridge = fractal(&noises.tunnel, xp, yp * p.y_scale, zp, &p.tunnel);
                    let in_tunnel = ridge.abs() < p.eps_base + p.eps_add * depth;
                    let in_room = || {
                        cell_distance(cell_seed, xp, yp, zp, p.room_cell)
                            < p.room_thr_base + p.room_thr_add * depth
                    };
                    if in_tunnel || in_room() {
                        blocks[idx] = ids::AIR;
                    }
                }
            }
        }
    }
}

// Y of the first air block above the highest solid block.
fn surface_height(blocks: &[BlockId], x: usize, z: usize) -> Option<usize> {
    (0..CHUNK_HEIGHT)
        .rev()
        .find(|&y| {
            let b = blocks[column_index(x, y, z)];
            b != ids::AIR && !ids::is_water(b)
        })
        .map(|y| y + 1)
}

fn fractal(noise: &FastNoiseLite, x: f32, y: f32, z: f32, f: &Fractal) -> f32 {
    let mut freq = 1.0 / f.scale.max(1e-4);
    let mut amp = 1.0f32;
    let mut total = 0.0f32;
    let mut norm = 0.0f32;
    for _ in 0..f.octaves.max(1) {
        total += noise.get_noise_3d(x * freq, y * freq, z * freq) * amp;
        norm += amp;
        amp *= f.persistence;
        freq *= f.lacunarity;
    }
    if norm > 0.0 { total / norm } else { total }
}

/// Distance to the nearest jittered feature point, in cell units, capped at 1.
fn cell_distance(seed: u32, x: f32, y: f32, z: f32, cell: f32) -> f32 {
    let cell = if cell > 1e-4 { cell } else { 1.0 };
    let (px, py, pz) = (x / cell, y / cell, z / cell);
    let base = [px.floor() as i32, py.floor() as i32, pz.floor() as i32];
    let frac = [px - base[0] as f32, py - base[1] as f32, pz - base[2] as f32];
    let mut best = f32::INFINITY;
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                let c = [base[0] + dx, base[1] + dy, base[2] + dz];
                let h = cell_hash(seed, c);
                let jitter = [
                    unit(h),
                    unit(h.rotate_left(11) ^ 0x5bd1_e995),
                    unit(h.rotate_left(22) ^ 0x1b87_3593),
                ];
                let ox = dx as f32 + jitter[0] - frac[0];
                let oy = dy as f32 + jitter[1] - frac[1];
                let oz = dz as f32 + jitter[2] - frac[2];
                best = best.min(ox * ox + oy * oy + oz * oz);
            }
        }
    }
    best.sqrt().min(1.0)
}

fn cell_hash(seed: u32, c: [i32; 3]) -> u32 {
    let mut h = seed.wrapping_mul(0x27d4_eb2d);
    for (v, k) in c.iter().zip([0x85eb_ca6bu32, 0xc2b2_ae35, 0x1656_67b1]) {
        h ^= (*v as u32).wrapping_mul(k);
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h
}

#[inline]
fn unit(h: u32) -> f32 {
    (h >> 8) as f32 / 16_777_216.0
}
