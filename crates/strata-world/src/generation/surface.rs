use strata_blocks::{BlockId, ids};

use crate::biome::{BiomeKind, BiomeRegistry};
use crate::column::{CHUNK_HEIGHT, CHUNK_WIDTH, column_index};
use crate::error::GenerationError;
use crate::rng::JavaRandom;
use crate::worldgen::WorldGenParams;

use super::{NoiseBuffers, TerrainNoises};

/// Replaces the top stone of every column with its biome's surface blocks,
/// lays sand and gravel near sea level, and adds the bedrock floor.
///
/// Consumes exactly three doubles per column plus one bounded int per block,
/// in x-major order, so the stream stays aligned regardless of terrain.
#[allow(clippy::too_many_arguments)]
pub fn replace(
    noises: &TerrainNoises,
    bufs: &mut NoiseBuffers,
    rand: &mut JavaRandom,
    params: &WorldGenParams,
    registry: &BiomeRegistry,
    biomes: &[BiomeKind],
    cx: i32,
    cz: i32,
    blocks: &mut [BlockId],
) -> Result<(), GenerationError> {
    let bx = (cx * CHUNK_WIDTH as i32) as f64;
    let bz = (cz * CHUNK_WIDTH as i32) as f64;
    let s = params.surface_noise_scale;
    let w = CHUNK_WIDTH;

    let sand = noises
        .sand_gravel
        .generate_octaves(&mut bufs.sand, bx, bz, 0.0, w, w, 1, s, s, 1.0);
    // Gravel samples the same field on a transposed, offset plane.
    let gravel = noises
        .sand_gravel
        .generate_octaves(&mut bufs.gravel, bz, 109.0134, bx, w, 1, w, s, 1.0, s);
    let stone = noises
        .stone_depth
        .generate_octaves(&mut bufs.stone, bx, bz, 0.0, w, w, 1, s * 2.0, s * 2.0, s * 2.0);

    let sea_level = params.sea_level;
    for x in 0..w {
        for z in 0..w {
            let kind = biomes[x * w + z];
            let biome = registry
                .get(kind)
                .ok_or(GenerationError::MissingBiome(kind))?;
            let has_sand = sand[x * w + z] + rand.next_double() * 0.2 > 0.0;
            let has_gravel = gravel[z * w + x] + rand.next_double() * 0.2 > 3.0;
            let thickness = (stone[x * w + z] / 3.0 + 3.0 + rand.next_double() * 0.25) as i32;

            let mut top = biome.top_block;
            let mut filler = biome.filler_block;
            let mut remaining = -1;

            for y in (0..CHUNK_HEIGHT).rev() {
                let idx = column_index(x, y, z);
                let yi = y as i32;
                if yi <= rand.next_int_bounded(params.bedrock_depth) {
                    blocks[idx] = ids::BEDROCK;
                    continue;
                }
                let current = blocks[idx];
                if current == ids::AIR {
                    remaining = -1;
                } else if current == ids::STONE {
                    if remaining == -1 {
                        if thickness <= 0 {
                            top = ids::AIR;
                            filler = ids::STONE;
                        } else if (params.band_low..=params.band_high).contains(&yi) {
                            top = biome.top_block;
                            filler = biome.filler_block;
                            if has_gravel {
                                top = ids::AIR;
                                filler = ids::GRAVEL;
                            }
                            if has_sand {
                                top = ids::SAND;
                                filler = ids::SAND;
                            }
                        }
                        if yi < sea_level && top == ids::AIR {
                            top = ids::WATER;
                        }
                        remaining = thickness;
                        blocks[idx] = if yi >= sea_level - 1 { top } else { filler };
                    } else if remaining > 0 {
                        remaining -= 1;
                        blocks[idx] = filler;
                        if remaining == 0 && filler == ids::SAND && params.sandstone {
                            remaining = rand.next_int_bounded(4);
                            filler = ids::SANDSTONE;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
