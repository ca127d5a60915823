use std::sync::Arc;

use proptest::prelude::*;
use strata_blocks::{BlockRegistry, ids};
use strata_chunk::{BlockAccess, Chunk, ChunkMap};
use strata_decor::DecorationPass;
use strata_world::{BiomeRegistry, ChunkPos, TerrainGenerator, WorldGenParams};

const SEED: i64 = 8_675_309;

fn square(seed: i64, params: WorldGenParams) -> (TerrainGenerator, DecorationPass, ChunkMap) {
    let registry = Arc::new(BlockRegistry::builtin());
    let pass = DecorationPass::new(&params, &registry).unwrap();
    let mut terrain = TerrainGenerator::new(seed, Arc::new(params), Arc::new(BiomeRegistry::init()));
    let mut map = ChunkMap::new(registry);
    for cx in 0..=1 {
        for cz in 0..=1 {
            let col = terrain.generate_column(cx, cz).unwrap();
            map.insert(Chunk::generated(ChunkPos::new(cx, cz), col.blocks));
        }
    }
    (terrain, pass, map)
}

fn snapshot(map: &ChunkMap) -> Vec<((i32, i32), Vec<u8>, Vec<u8>)> {
    let mut out: Vec<_> = map
        .iter()
        .map(|c| {
            (
                (c.pos().x, c.pos().z),
                c.blocks().as_slice().to_vec(),
                c.metadata_bytes().to_vec(),
            )
        })
        .collect();
    out.sort_by_key(|(pos, _, _)| *pos);
    out
}

fn count(map: &ChunkMap, id: u8) -> usize {
    map.iter()
        .map(|c| c.blocks().as_slice().iter().filter(|&&b| b == id).count())
        .sum()
}

#[test]
fn same_seed_same_decorations() {
    let (mut ta, mut pa, mut a) = square(SEED, WorldGenParams::default());
    let (mut tb, mut pb, mut b) = square(SEED, WorldGenParams::default());
    // History on one side must not leak into the result.
    tb.generate_column(40, -3).unwrap();
    pa.populate(&mut ta, &mut a, 0, 0);
    pb.populate(&mut tb, &mut b, 0, 0);
    assert!(snapshot(&a) == snapshot(&b));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    // Decorations depend only on the seed and the chunk, whatever was
    // decorated before on the same pass.
    #[test]
    fn decorations_are_a_function_of_seed(seed in any::<i64>(), warmup in -50i32..50) {
        let (mut ta, mut pa, mut a) = square(seed, WorldGenParams::default());
        let (mut tb, mut pb, mut b) = square(seed, WorldGenParams::default());
        let mut scratch = ChunkMap::new(Arc::new(BlockRegistry::builtin()));
        pb.populate(&mut tb, &mut scratch, warmup, -warmup);
        pa.populate(&mut ta, &mut a, 0, 0);
        pb.populate(&mut tb, &mut b, 0, 0);
        prop_assert!(snapshot(&a) == snapshot(&b));
    }
}

#[test]
fn population_places_ores_and_changes_terrain() {
    let (mut terrain, mut pass, mut map) = square(SEED, WorldGenParams::default());
    let before = snapshot(&map);
    let coal_before = count(&map, ids::COAL_ORE);
    pass.populate(&mut terrain, &mut map, 0, 0);
    assert!(snapshot(&map) != before);
    assert!(count(&map, ids::COAL_ORE) > coal_before);
    assert!(count(&map, ids::IRON_ORE) > 0);
}

#[test]
fn ores_respect_their_depth_limits() {
    let (mut terrain, mut pass, mut map) = square(SEED, WorldGenParams::default());
    pass.populate(&mut terrain, &mut map, 0, 0);
    for x in 0..32 {
        for z in 0..32 {
            for y in 0..128 {
                match map.block_id(x, y, z) {
                    // Anchor below 16, sweep lifts it by at most 4 plus the radius.
                    ids::DIAMOND_ORE | ids::REDSTONE_ORE => assert!(y < 24, "y {y}"),
                    ids::GOLD_ORE => assert!(y < 40, "y {y}"),
                    _ => {}
                }
            }
        }
    }
}

#[test]
fn disabled_pass_leaves_terrain_alone() {
    let params = WorldGenParams {
        decoration_enable: false,
        ..WorldGenParams::default()
    };
    let (mut terrain, mut pass, mut map) = square(SEED, params);
    let before = snapshot(&map);
    pass.populate(&mut terrain, &mut map, 0, 0);
    assert!(snapshot(&map) == before);
}
