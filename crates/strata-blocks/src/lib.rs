//! Block descriptors, materials, and the block registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod ids;
pub mod material;
pub mod registry;
pub mod types;

pub use material::Material;
pub use registry::BlockRegistry;
pub use types::{Behavior, BlockDesc, BlockId, Soil};
