use crate::rng::JavaRandom;

use super::perlin::PerlinLattice;

/// A fixed stack of Perlin lattices summed at halving frequencies.
///
/// Octave `i` samples at `scale / 2^i` and contributes with amplitude `2^i`.
/// The lattices are drawn from the caller's stream at construction, so two
/// fields built back to back from one stream are independent.
#[derive(Clone)]
pub struct NoiseField {
    octaves: Vec<PerlinLattice>,
}

impl NoiseField {
    pub fn new(rand: &mut JavaRandom, octaves: usize) -> Self {
        Self {
            octaves: (0..octaves).map(|_| PerlinLattice::new(rand)).collect(),
        }
    }

    #[inline]
    pub fn octave_count(&self) -> usize {
        self.octaves.len()
    }

    /// Largest magnitude the summed amplitudes can reach, `2^n - 1`.
    pub fn amplitude_sum(&self) -> f64 {
        (0..self.octaves.len()).map(|i| (1u64 << i) as f64).sum()
    }

    /// Fills `buf` with `size_x * size_y * size_z` samples laid out
    /// `(x * size_z + z) * size_y + y`.
    ///
    /// `buf` keeps its allocation when it already has the capacity, so a
    /// generator that passes the same buffer every chunk never reallocates.
    #[allow(clippy::too_many_arguments)]
    pub fn generate_octaves<'a>(
        &self,
        buf: &'a mut Vec<f64>,
        origin_x: f64,
        origin_y: f64,
        origin_z: f64,
        size_x: usize,
        size_y: usize,
        size_z: usize,
        scale_x: f64,
        scale_y: f64,
        scale_z: f64,
    ) -> &'a mut [f64] {
        let len = size_x * size_y * size_z;
        buf.clear();
        buf.resize(len, 0.0);
        let mut freq = 1.0;
        for lattice in &self.octaves {
            lattice.accumulate(
                buf,
                [origin_x, origin_y, origin_z],
                [size_x, size_y, size_z],
                [scale_x * freq, scale_y * freq, scale_z * freq],
                freq,
            );
            freq /= 2.0;
        }
        buf.as_mut_slice()
    }

    /// Region on the horizontal plane. Output is `size_x * size_z`, indexed `x * size_z + z`.
    #[allow(clippy::too_many_arguments)]
    pub fn generate_2d<'a>(
        &self,
        buf: &'a mut Vec<f64>,
        origin_x: f64,
        origin_z: f64,
        size_x: usize,
        size_z: usize,
        scale_x: f64,
        scale_z: f64,
    ) -> &'a mut [f64] {
        self.generate_octaves(
            buf, origin_x, 10.0, origin_z, size_x, 1, size_z, scale_x, 1.0, scale_z,
        )
    }

    /// Single point on the z = 0 plane.
    pub fn sample_2d(&self, x: f64, y: f64) -> f64 {
        let mut freq = 1.0;
        let mut sum = 0.0;
        for lattice in &self.octaves {
            sum += lattice.sample(x * freq, y * freq, 0.0) / freq;
            freq /= 2.0;
        }
        sum
    }
}
