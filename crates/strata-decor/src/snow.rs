use strata_blocks::{Material, ids};
use strata_chunk::BlockAccess;
use strata_world::{CHUNK_HEIGHT, CHUNK_WIDTH};

/// Lays snow over the 16×16 area starting at block `(x0, z0)`. `temperatures`
/// holds one value per column in `x * 16 + z` order.
///
/// Colder columns and higher ground both favour snow; it only lands on air
/// directly above a solid block that is not ice.
pub fn snow_pass(world: &mut dyn BlockAccess, temperatures: &[f64], x0: i32, z0: i32) -> usize {
    let mut placed = 0;
    for i in 0..CHUNK_WIDTH {
        for j in 0..CHUNK_WIDTH {
            let Some(&t) = temperatures.get(i * CHUNK_WIDTH + j) else {
                continue;
            };
            let (x, z) = (x0 + i as i32, z0 + j as i32);
            let top = world.top_solid_block(x, z);
            let chill = t - (top - 64) as f64 / 64.0 * 0.3;
            if chill >= 0.5 || top <= 0 || top >= CHUNK_HEIGHT as i32 {
                continue;
            }
            let below = world.material(x, top - 1, z);
            if world.is_air(x, top, z) && below.is_solid() && below != Material::Ice {
                world.set_block(x, top, z, ids::SNOW_LAYER);
                placed += 1;
            }
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{count, flat_world};

    #[test]
    fn cold_columns_get_snow_warm_ones_do_not() {
        let mut w = flat_world(ids::GRASS, 63);
        let mut temps = vec![0.9; 256];
        for t in temps.iter_mut().take(16) {
            *t = 0.1;
        }
        let placed = snow_pass(&mut w, &temps, 0, 0);
        assert_eq!(placed, 16);
        assert_eq!(count(&w, ids::SNOW_LAYER), 16);
        for z in 0..16 {
            assert_eq!(w.block_id(0, 64, z), ids::SNOW_LAYER);
            assert!(w.is_air(1, 64, z));
        }
    }

    #[test]
    fn high_ground_is_colder() {
        let mut w = flat_world(ids::GRASS, 110);
        let temps = vec![0.6; 256];
        // 0.6 - (111 - 64) / 64 * 0.3 < 0.5
        assert_eq!(snow_pass(&mut w, &temps, 0, 0), 256);
    }

    #[test]
    fn ice_stays_bare() {
        let mut w = flat_world(ids::ICE, 63);
        let temps = vec![0.0; 256];
        assert_eq!(snow_pass(&mut w, &temps, 0, 0), 0);
    }
}
