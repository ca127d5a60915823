use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use strata_world::column::COLUMN_VOLUME;
use strata_world::worldgen::{CarverKind, WorldGenConfig};
use strata_world::{BiomeRegistry, TerrainGenerator, WorldGenParams};

fn generator(kind: CarverKind) -> TerrainGenerator {
    let mut cfg = WorldGenConfig::default();
    cfg.carver.kind = kind;
    TerrainGenerator::new(
        0xC0FFEE,
        Arc::new(WorldGenParams::from_config(&cfg)),
        Arc::new(BiomeRegistry::init()),
    )
}

fn bench_fill_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_column");
    for (name, kind) in [
        ("no_caves", CarverKind::None),
        ("tunnels", CarverKind::Tunnels),
        ("noise_caves", CarverKind::Noise),
    ] {
        let mut g = generator(kind);
        let mut blocks = vec![0u8; COLUMN_VOLUME];
        let mut cx = 0;
        group.bench_function(name, |b| {
            b.iter(|| {
                cx += 1;
                g.fill_column(cx, -cx, &mut blocks).unwrap();
                black_box(&blocks);
            })
        });
    }
    group.finish();
}

fn bench_climate(c: &mut Criterion) {
    let mut g = generator(CarverKind::None);
    let registry = Arc::clone(g.biomes());
    c.bench_function("climate_region_16x16", |b| {
        let mut x = 0;
        b.iter(|| {
            x += 16;
            let region = g.climate_mut().sample_region(x, 0, 16, 16, &registry);
            black_box(region.biomes[0]);
        })
    });
}

criterion_group!(benches, bench_fill_column, bench_climate);
criterion_main!(benches);
