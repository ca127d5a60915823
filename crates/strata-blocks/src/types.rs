use serde::{Deserialize, Serialize};

use crate::material::Material;

pub type BlockId = u8;

/// What a block needs underneath it to stay in place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Soil {
    /// Grass, dirt or farmland.
    Fertile,
    /// Any opaque block (mushrooms only check light in the dark).
    Opaque,
    Sand,
}

// Closed set of behaviours. Anything that is not plain terrain is listed here so
// placement code can match on it instead of going through per-block trait objects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Behavior {
    #[default]
    Inert,
    Plant {
        soil: Soil,
    },
    Reed,
    Cactus,
    SnowLayer,
    Falling,
    Liquid {
        flowing: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockDesc {
    pub id: BlockId,
    pub name: String,
    pub material: Material,
    pub hardness: f32,
    pub opaque: bool,
    pub behavior: Behavior,
}

impl BlockDesc {
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.material.is_solid()
    }
}
