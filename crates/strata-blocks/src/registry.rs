use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::BlocksConfig;
use crate::ids;
use crate::material::Material;
use crate::types::{Behavior, BlockDesc, BlockId, Soil};

#[derive(Debug)]
pub enum RegistryError {
    DuplicateId(BlockId),
    DuplicateName(String),
    MissingAir,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateId(id) => write!(f, "block id {} defined twice", id),
            RegistryError::DuplicateName(name) => write!(f, "block name '{}' defined twice", name),
            RegistryError::MissingAir => write!(f, "block id 0 must be air"),
        }
    }
}

impl Error for RegistryError {}

/// Immutable id → descriptor table. Built once at startup and shared by `Arc`.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    blocks: Vec<Option<BlockDesc>>,
    by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    fn empty() -> Self {
        Self {
            blocks: vec![None; 256],
            by_name: HashMap::new(),
        }
    }

    /// The block set the terrain generator and decorators are written against.
    pub fn builtin() -> Self {
        use Behavior::*;
        use Material as M;
        let table: &[(BlockId, &str, Material, f32, Behavior)] = &[
            (ids::AIR, "air", M::Air, 0.0, Inert),
            (ids::STONE, "stone", M::Rock, 1.5, Inert),
            (ids::GRASS, "grass", M::Grass, 0.6, Inert),
            (ids::DIRT, "dirt", M::Ground, 0.5, Inert),
            (ids::COBBLESTONE, "cobblestone", M::Rock, 2.0, Inert),
            (ids::PLANKS, "planks", M::Wood, 2.0, Inert),
            (ids::BEDROCK, "bedrock", M::Rock, -1.0, Inert),
            (ids::FLOWING_WATER, "flowing_water", M::Water, 100.0, Liquid { flowing: true }),
            (ids::WATER, "water", M::Water, 100.0, Liquid { flowing: false }),
            (ids::FLOWING_LAVA, "flowing_lava", M::Lava, 0.0, Liquid { flowing: true }),
            (ids::LAVA, "lava", M::Lava, 100.0, Liquid { flowing: false }),
            (ids::SAND, "sand", M::Sand, 0.5, Falling),
            (ids::GRAVEL, "gravel", M::Sand, 0.6, Falling),
            (ids::GOLD_ORE, "gold_ore", M::Rock, 3.0, Inert),
            (ids::IRON_ORE, "iron_ore", M::Rock, 3.0, Inert),
            (ids::COAL_ORE, "coal_ore", M::Rock, 3.0, Inert),
            (ids::LOG, "log", M::Wood, 2.0, Inert),
            (ids::LEAVES, "leaves", M::Leaves, 0.2, Inert),
            (ids::LAPIS_ORE, "lapis_ore", M::Rock, 3.0, Inert),
            (ids::SANDSTONE, "sandstone", M::Rock, 0.8, Inert),
            (ids::DANDELION, "dandelion", M::Plant, 0.0, Plant { soil: Soil::Fertile }),
            (ids::ROSE, "rose", M::Plant, 0.0, Plant { soil: Soil::Fertile }),
            (ids::BROWN_MUSHROOM, "brown_mushroom", M::Plant, 0.0, Plant { soil: Soil::Opaque }),
            (ids::RED_MUSHROOM, "red_mushroom", M::Plant, 0.0, Plant { soil: Soil::Opaque }),
            (ids::MOSSY_COBBLESTONE, "mossy_cobblestone", M::Rock, 2.0, Inert),
            (ids::SPAWNER, "spawner", M::Iron, 5.0, Inert),
            (ids::CHEST, "chest", M::Wood, 2.5, Inert),
            (ids::DIAMOND_ORE, "diamond_ore", M::Rock, 3.0, Inert),
            (ids::REDSTONE_ORE, "redstone_ore", M::Rock, 3.0, Inert),
            (ids::SNOW_LAYER, "snow_layer", M::SnowLayer, 0.1, SnowLayer),
            (ids::ICE, "ice", M::Ice, 0.5, Inert),
            (ids::CACTUS, "cactus", M::Cactus, 0.4, Cactus),
            (ids::CLAY, "clay", M::Clay, 0.6, Inert),
            (ids::REED, "reed", M::Plant, 0.0, Reed),
            (ids::PUMPKIN, "pumpkin", M::Gourd, 1.0, Plant { soil: Soil::Fertile }),
        ];
        let mut reg = Self::empty();
        for &(id, name, material, hardness, behavior) in table {
            // Plants, snow, liquids, leaves, ice and cactus are not full opaque cubes.
            let opaque = material.is_solid()
                && !matches!(material, M::Leaves | M::Ice | M::Cactus)
                && id != ids::SPAWNER
                && id != ids::CHEST;
            reg.insert(BlockDesc {
                id,
                name: name.to_string(),
                material,
                hardness,
                opaque,
                behavior,
            });
        }
        reg
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Ok(Self::from_config(cfg)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, RegistryError> {
        let mut reg = Self::empty();
        for def in cfg.blocks {
            if reg.blocks[def.id as usize].is_some() {
                return Err(RegistryError::DuplicateId(def.id));
            }
            if reg.by_name.contains_key(&def.name) {
                return Err(RegistryError::DuplicateName(def.name));
            }
            let opaque = def.opaque.unwrap_or(def.material.is_solid());
            reg.insert(BlockDesc {
                id: def.id,
                name: def.name,
                material: def.material,
                hardness: def.hardness,
                opaque,
                behavior: def.behavior,
            });
        }
        match reg.get(ids::AIR) {
            Some(air) if air.material == Material::Air => Ok(reg),
            _ => Err(RegistryError::MissingAir),
        }
    }

    fn insert(&mut self, desc: BlockDesc) {
        self.by_name.insert(desc.name.clone(), desc.id);
        let slot = desc.id as usize;
        self.blocks[slot] = Some(desc);
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockDesc> {
        self.blocks[id as usize].as_ref()
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Unknown ids read as air.
    #[inline]
    pub fn material(&self, id: BlockId) -> Material {
        self.get(id).map(|d| d.material).unwrap_or(Material::Air)
    }

    #[inline]
    pub fn is_opaque(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|d| d.opaque)
    }

    #[inline]
    pub fn behavior(&self, id: BlockId) -> Behavior {
        self.get(id).map(|d| d.behavior).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockDesc> {
        self.blocks.iter().flatten()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
