use strata_blocks::{BlockId, ids};

use crate::column::{CHUNK_WIDTH, column_index};

use super::density::{LATTICE_XZ, LATTICE_Y, lattice_index};

const CELL_XZ: usize = CHUNK_WIDTH / (LATTICE_XZ - 1);
const CELL_Y: usize = 8;

/// Trilinearly upsamples the density lattice into block ids.
///
/// Positive density is stone. Everything else below `sea_level` is still
/// water, with ice on the top water layer where the column is cold.
pub fn upsample(density: &[f64], temperature: &[f64], sea_level: i32, blocks: &mut [BlockId]) {
    let dy = 1.0 / CELL_Y as f64;
    let dxz = 1.0 / CELL_XZ as f64;
    for ci in 0..LATTICE_XZ - 1 {
        for ck in 0..LATTICE_XZ - 1 {
            for cj in 0..LATTICE_Y - 1 {
                let mut c00 = density[lattice_index(ci, cj, ck)];
                let mut c01 = density[lattice_index(ci, cj, ck + 1)];
                let mut c10 = density[lattice_index(ci + 1, cj, ck)];
                let mut c11 = density[lattice_index(ci + 1, cj, ck + 1)];
                let s00 = (density[lattice_index(ci, cj + 1, ck)] - c00) * dy;
                let s01 = (density[lattice_index(ci, cj + 1, ck + 1)] - c01) * dy;
                let s10 = (density[lattice_index(ci + 1, cj + 1, ck)] - c10) * dy;
                let s11 = (density[lattice_index(ci + 1, cj + 1, ck + 1)] - c11) * dy;

                for sy in 0..CELL_Y {
                    let y = cj * CELL_Y + sy;
                    let mut row0 = c00;
                    let mut row1 = c01;
                    let step0 = (c10 - c00) * dxz;
                    let step1 = (c11 - c01) * dxz;

                    for sx in 0..CELL_XZ {
                        let x = ci * CELL_XZ + sx;
                        let mut d = row0;
                        let dz = (row1 - row0) * dxz;

                        for sz in 0..CELL_XZ {
                            let z = ck * CELL_XZ + sz;
                            blocks[column_index(x, y, z)] =
                                block_for(d, temperature[x * CHUNK_WIDTH + z], y as i32, sea_level);
                            d += dz;
                        }
                        row0 += step0;
                        row1 += step1;
                    }
                    c00 += s00;
                    c01 += s01;
                    c10 += s10;
                    c11 += s11;
                }
            }
        }
    }
}

#[inline]
fn block_for(density: f64, temperature: f64, y: i32, sea_level: i32) -> BlockId {
    if density > 0.0 {
        ids::STONE
    } else if y < sea_level {
        if temperature < 0.5 && y == sea_level - 1 {
            ids::ICE
        } else {
            ids::WATER
        }
    } else {
        ids::AIR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::COLUMN_VOLUME;
    use crate::generation::density::LATTICE_LEN;

    fn layered(solid_below: usize) -> Vec<f64> {
        let mut d = vec![0.0; LATTICE_LEN];
        for i in 0..LATTICE_XZ {
            for k in 0..LATTICE_XZ {
                for j in 0..LATTICE_Y {
                    d[lattice_index(i, j, k)] = if j < solid_below { 1.0 } else { -1.0 };
                }
            }
        }
        d
    }

    #[test]
    fn solid_lattice_below_fills_stone_then_water() {
        let density = layered(4);
        let temps = vec![0.9; 256];
        let mut blocks = vec![0; COLUMN_VOLUME];
        upsample(&density, &temps, 64, &mut blocks);
        assert_eq!(blocks[column_index(3, 10, 7)], ids::STONE);
        assert_eq!(blocks[column_index(3, 50, 7)], ids::WATER);
        assert_eq!(blocks[column_index(3, 63, 7)], ids::WATER);
        assert_eq!(blocks[column_index(3, 64, 7)], ids::AIR);
    }

    #[test]
    fn cold_columns_freeze_the_top_water_layer() {
        let density = layered(2);
        let temps = vec![0.2; 256];
        let mut blocks = vec![0; COLUMN_VOLUME];
        upsample(&density, &temps, 64, &mut blocks);
        assert_eq!(blocks[column_index(0, 63, 0)], ids::ICE);
        assert_eq!(blocks[column_index(0, 62, 0)], ids::WATER);
    }
}
