//! Population of generated terrain: lakes, dungeons, ore veins, trees, plants,
//! springs and snow cover.
//!
//! [`DecorationPass::populate`] writes through [`strata_chunk::BlockAccess`], so
//! the same code decorates a plain [`strata_chunk::ChunkMap`] in tests and the
//! runtime's chunk cache in a live world.
#![forbid(unsafe_code)]

pub mod features;
mod pass;
pub mod placement;
mod snow;
#[cfg(test)]
mod test_support;

pub use features::Feature;
pub use pass::{DecorError, DecorationPass};
pub use snow::snow_pass;
