//! Cave carvers run after the surface pass.

mod noise;
mod tunnels;

use strata_blocks::BlockId;

use crate::worldgen::CarverParams;

pub use noise::NoiseCaveCarver;
pub use tunnels::TunnelCarver;

/// Removes blocks from a freshly generated column. Must be a pure function of
/// `(seed, cx, cz)` and the column contents.
pub trait Carver: Send {
    fn carve(&mut self, seed: i64, cx: i32, cz: i32, blocks: &mut [BlockId]);
}

/// Leaves the column untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCarver;

impl Carver for NoCarver {
    fn carve(&mut self, _seed: i64, _cx: i32, _cz: i32, _blocks: &mut [BlockId]) {}
}

pub fn carver_from_params(params: &CarverParams) -> Box<dyn Carver> {
    match params {
        CarverParams::Tunnels { range, lava_level } => {
            Box::new(TunnelCarver::new(*range, *lava_level))
        }
        CarverParams::Noise(p) => Box::new(NoiseCaveCarver::new(p.clone())),
        CarverParams::Disabled => Box::new(NoCarver),
    }
}
