//! Scatter features placed by the decoration pass.
//!
//! Every feature takes the shared stream and an anchor position and writes
//! through [`BlockAccess`]. A rejected site is not an error: `place` returns
//! `false` and leaves the world as it was.

mod big_tree;
mod dungeon;
mod lake;
mod plants;
mod spring;
mod tree;
mod vein;

use strata_chunk::BlockAccess;
use strata_world::JavaRandom;

pub use big_tree::BigTree;
pub use dungeon::Dungeon;
pub use lake::Lake;
pub use plants::{Cacti, Flowers, Pumpkins, Reeds};
pub use spring::Spring;
pub use tree::Tree;
pub use vein::{ClayPatch, Vein};

pub trait Feature {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool;
}
