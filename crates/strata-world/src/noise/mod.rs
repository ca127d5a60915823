//! Coherent noise: single improved-Perlin lattices and their octave stacks.

mod octaves;
mod perlin;

pub use octaves::NoiseField;
pub use perlin::PerlinLattice;
