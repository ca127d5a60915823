use serde::{Deserialize, Serialize};

/// Physical class of a block. Placement rules and the snow pass only look at this,
/// never at individual block ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Air,
    Rock,
    Ground,
    Grass,
    Sand,
    Wood,
    Leaves,
    Plant,
    Water,
    Lava,
    Ice,
    SnowLayer,
    Cactus,
    Clay,
    Gourd,
    Iron,
}

impl Material {
    /// Solid materials support plants and snow and stop liquids.
    #[inline]
    pub fn is_solid(self) -> bool {
        !matches!(
            self,
            Material::Air | Material::Plant | Material::Water | Material::Lava | Material::SnowLayer
        )
    }

    #[inline]
    pub fn is_liquid(self) -> bool {
        matches!(self, Material::Water | Material::Lava)
    }

    /// Whether the material may be overwritten by features that need open space.
    #[inline]
    pub fn is_replaceable(self) -> bool {
        matches!(self, Material::Air | Material::SnowLayer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liquids_are_not_solid() {
        assert!(Material::Water.is_liquid());
        assert!(!Material::Water.is_solid());
        assert!(!Material::Lava.is_solid());
        assert!(Material::Rock.is_solid());
        assert!(Material::Ice.is_solid());
    }

    #[test]
    fn snow_layer_is_replaceable_but_not_solid() {
        assert!(Material::SnowLayer.is_replaceable());
        assert!(!Material::SnowLayer.is_solid());
    }
}
