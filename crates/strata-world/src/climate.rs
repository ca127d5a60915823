use crate::biome::{BiomeKind, BiomeRegistry};
use crate::noise::NoiseField;
use crate::rng::JavaRandom;

const TEMPERATURE_SCALE: f64 = 0.025;
const HUMIDITY_SCALE: f64 = 0.05;
const BLEND_SCALE: f64 = 0.25;
// Normalized octave sums rarely exceed ±0.5; spread them toward ±1.
const GAIN: f64 = 2.0;

/// Borrowed view of the last sampled region, row-major `x * depth + z`.
pub struct ClimateRegion<'a> {
    pub temperature: &'a [f64],
    pub humidity: &'a [f64],
    pub biomes: &'a [BiomeKind],
}

/// Per-block temperature, humidity and biome for rectangular regions.
pub struct ClimateSampler {
    temperature_noise: NoiseField,
    humidity_noise: NoiseField,
    blend_noise: NoiseField,
    temperature: Vec<f64>,
    humidity: Vec<f64>,
    blend: Vec<f64>,
    biomes: Vec<BiomeKind>,
}

impl ClimateSampler {
    pub fn new(seed: i64) -> Self {
        Self {
            temperature_noise: NoiseField::new(&mut JavaRandom::new(seed.wrapping_mul(9871)), 4),
            humidity_noise: NoiseField::new(&mut JavaRandom::new(seed.wrapping_mul(39811)), 4),
            blend_noise: NoiseField::new(&mut JavaRandom::new(seed.wrapping_mul(543321)), 2),
            temperature: Vec::new(),
            humidity: Vec::new(),
            blend: Vec::new(),
            biomes: Vec::new(),
        }
    }

    /// Samples `width × depth` block columns starting at block `(x, z)`.
    pub fn sample_region(
        &mut self,
        x: i32,
        z: i32,
        width: usize,
        depth: usize,
        registry: &BiomeRegistry,
    ) -> ClimateRegion<'_> {
        self.fill_temperature(x, z, width, depth);
        normalized(
            &self.humidity_noise,
            &mut self.humidity,
            x,
            z,
            width,
            depth,
            HUMIDITY_SCALE,
        );
        self.biomes.clear();
        for i in 0..width * depth {
            let a = blend_term(self.blend[i]);
            let h = (self.humidity[i] * 0.15 + 0.5) * 0.998 + a * 0.002;
            self.humidity[i] = h.clamp(0.0, 1.0);
            self.biomes
                .push(registry.lookup_climate(self.temperature[i], self.humidity[i]));
        }
        ClimateRegion {
            temperature: &self.temperature,
            humidity: &self.humidity,
            biomes: &self.biomes,
        }
    }

    /// The most recent `sample_region` result.
    pub fn region(&self) -> ClimateRegion<'_> {
        ClimateRegion {
            temperature: &self.temperature,
            humidity: &self.humidity,
            biomes: &self.biomes,
        }
    }

    /// Temperature only, same layout and values as `sample_region`.
    pub fn temperatures(&mut self, x: i32, z: i32, width: usize, depth: usize) -> &[f64] {
        self.fill_temperature(x, z, width, depth);
        &self.temperature
    }

    pub fn biome_at(&mut self, x: i32, z: i32, registry: &BiomeRegistry) -> BiomeKind {
        self.sample_region(x, z, 1, 1, registry).biomes[0]
    }

    fn fill_temperature(&mut self, x: i32, z: i32, width: usize, depth: usize) {
        normalized(
            &self.temperature_noise,
            &mut self.temperature,
            x,
            z,
            width,
            depth,
            TEMPERATURE_SCALE,
        );
        normalized(&self.blend_noise, &mut self.blend, x, z, width, depth, BLEND_SCALE);
        for (t, b) in self.temperature.iter_mut().zip(&self.blend) {
            let a = blend_term(*b);
            let v = (*t * 0.15 + 0.7) * 0.99 + a * 0.01;
            let v = 1.0 - (1.0 - v) * (1.0 - v);
            *t = v.clamp(0.0, 1.0);
        }
    }
}

#[inline]
fn blend_term(b: f64) -> f64 {
    b * 1.1 + 0.5
}

fn normalized(
    field: &NoiseField,
    buf: &mut Vec<f64>,
    x: i32,
    z: i32,
    width: usize,
    depth: usize,
    scale: f64,
) {
    let norm = GAIN / field.amplitude_sum();
    let out = field.generate_octaves(
        buf, x as f64, 0.0, z as f64, width, 1, depth, scale, 1.0, scale,
    );
    for v in out.iter_mut() {
        *v *= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn climate_is_clamped() {
        let reg = BiomeRegistry::init();
        let mut sampler = ClimateSampler::new(1234);
        let region = sampler.sample_region(-40, 96, 16, 16, &reg);
        assert_eq!(region.temperature.len(), 256);
        assert_eq!(region.biomes.len(), 256);
        for (&t, &h) in region.temperature.iter().zip(region.humidity) {
            assert!((0.0..=1.0).contains(&t));
            assert!((0.0..=1.0).contains(&h));
        }
    }

    #[test]
    fn temperatures_agree_with_full_sample() {
        let reg = BiomeRegistry::init();
        let mut sampler = ClimateSampler::new(-5);
        let full = sampler.sample_region(160, -32, 16, 16, &reg).temperature.to_vec();
        let only = sampler.temperatures(160, -32, 16, 16).to_vec();
        assert_eq!(full, only);
    }

    #[test]
    fn single_point_matches_region_cell() {
        let reg = BiomeRegistry::init();
        let mut sampler = ClimateSampler::new(8);
        let region_biome = sampler.sample_region(32, 48, 16, 16, &reg).biomes[3 * 16 + 5];
        assert_eq!(sampler.biome_at(35, 53, &reg), region_biome);
    }
}
