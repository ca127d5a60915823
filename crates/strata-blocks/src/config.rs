use serde::Deserialize;

use crate::material::Material;
use crate::types::{Behavior, BlockId};

// Top-level blocks config file
#[derive(Deserialize, Debug)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    pub id: BlockId,
    #[serde(default)]
    pub material: Material,
    #[serde(default = "default_hardness")]
    pub hardness: f32,
    // Defaults to the material's solidity when absent.
    #[serde(default)]
    pub opaque: Option<bool>,
    #[serde(default)]
    pub behavior: Behavior,
}

fn default_hardness() -> f32 {
    1.0
}
