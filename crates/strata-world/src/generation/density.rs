//! The sparse 5×17×5 density lattice that the block fill interpolates.

use crate::worldgen::WorldGenParams;

use super::{NoiseBuffers, TerrainNoises};

pub const LATTICE_XZ: usize = 5;
pub const LATTICE_Y: usize = 17;
pub const LATTICE_LEN: usize = LATTICE_XZ * LATTICE_Y * LATTICE_XZ;

/// Block offset of the climate sample used for lattice column `i`.
const CLIMATE_STRIDE: usize = 16 / LATTICE_XZ;

#[inline]
pub fn lattice_index(i: usize, j: usize, k: usize) -> usize {
    (i * LATTICE_XZ + k) * LATTICE_Y + j
}

/// Writes the density lattice for chunk `(cx, cz)` into `bufs.density`.
///
/// `temperature` and `humidity` are the 16×16 per-block climate of the chunk,
/// indexed `x * 16 + z`.
pub fn build(
    noises: &TerrainNoises,
    bufs: &mut NoiseBuffers,
    params: &WorldGenParams,
    temperature: &[f64],
    humidity: &[f64],
    cx: i32,
    cz: i32,
) {
    let ox = (cx * (LATTICE_XZ as i32 - 1)) as f64;
    let oz = (cz * (LATTICE_XZ as i32 - 1)) as f64;
    let xz = params.coordinate_scale;
    let y = params.height_scale;

    let scale = noises.scale.generate_2d(
        &mut bufs.scale,
        ox,
        oz,
        LATTICE_XZ,
        LATTICE_XZ,
        params.scale_noise,
        params.scale_noise,
    );
    let depth = noises.depth.generate_2d(
        &mut bufs.depth,
        ox,
        oz,
        LATTICE_XZ,
        LATTICE_XZ,
        params.depth_noise,
        params.depth_noise,
    );
    let selector = noises.selector.generate_octaves(
        &mut bufs.selector,
        ox,
        0.0,
        oz,
        LATTICE_XZ,
        LATTICE_Y,
        LATTICE_XZ,
        xz / params.selector_xz_divisor,
        y / params.selector_y_divisor,
        xz / params.selector_xz_divisor,
    );
    let lower = noises.lower.generate_octaves(
        &mut bufs.lower,
        ox,
        0.0,
        oz,
        LATTICE_XZ,
        LATTICE_Y,
        LATTICE_XZ,
        xz,
        y,
        xz,
    );
    let upper = noises.upper.generate_octaves(
        &mut bufs.upper,
        ox,
        0.0,
        oz,
        LATTICE_XZ,
        LATTICE_Y,
        LATTICE_XZ,
        xz,
        y,
        xz,
    );

    bufs.density.clear();
    bufs.density.resize(LATTICE_LEN, 0.0);
    let height = LATTICE_Y as f64;

    for i in 0..LATTICE_XZ {
        let bx = i * CLIMATE_STRIDE + CLIMATE_STRIDE / 2;
        for k in 0..LATTICE_XZ {
            let bz = k * CLIMATE_STRIDE + CLIMATE_STRIDE / 2;
            let t = temperature[bx * 16 + bz];
            let h = humidity[bx * 16 + bz] * t;
            let inv = 1.0 - h;
            let bias = 1.0 - inv * inv * inv * inv;

            let col = i * LATTICE_XZ + k;
            let mut spread = ((scale[col] + 256.0) / 512.0 * bias).min(1.0);
            let mut offset = depth[col] / 8000.0;
            if offset < 0.0 {
                offset = -offset * 0.3;
            }
            offset = offset * 3.0 - 2.0;
            if offset < 0.0 {
                offset = (offset / 2.0).max(-1.0) / 1.4 / 2.0;
                spread = 0.0;
            } else {
                offset = offset.min(1.0) / 8.0;
            }
            spread = spread.max(0.0) + 0.5;
            offset = offset * height / 16.0;
            let center = height / 2.0 + offset * 4.0;

            for j in 0..LATTICE_Y {
                let idx = lattice_index(i, j, k);
                let mut falloff = (j as f64 - center) * 12.0 / spread;
                if falloff < 0.0 {
                    falloff *= 4.0;
                }
                let lo = lower[idx] / 512.0;
                let hi = upper[idx] / 512.0;
                let sel = (selector[idx] / 10.0 + 1.0) / 2.0;
                let blended = if sel < 0.0 {
                    lo
                } else if sel > 1.0 {
                    hi
                } else {
                    lo + (hi - lo) * sel
                };
                let mut value = blended - falloff;
                // Top three layers taper toward solid air.
                if j > LATTICE_Y - 4 {
                    let t = (j - (LATTICE_Y - 4)) as f64 / 3.0;
                    value = value * (1.0 - t) + -10.0 * t;
                }
                bufs.density[idx] = value;
            }
        }
    }
}
