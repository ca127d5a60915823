//! Biome descriptors and the climate → biome lookup table.

use serde::{Deserialize, Serialize};
use strata_blocks::{BlockId, ids};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeKind {
    Rainforest,
    Swampland,
    SeasonalForest,
    Forest,
    Savanna,
    Shrubland,
    Taiga,
    Desert,
    Plains,
    IceDesert,
    Tundra,
}

impl BiomeKind {
    pub const ALL: [BiomeKind; 11] = [
        BiomeKind::Rainforest,
        BiomeKind::Swampland,
        BiomeKind::SeasonalForest,
        BiomeKind::Forest,
        BiomeKind::Savanna,
        BiomeKind::Shrubland,
        BiomeKind::Taiga,
        BiomeKind::Desert,
        BiomeKind::Plains,
        BiomeKind::IceDesert,
        BiomeKind::Tundra,
    ];

    /// Decision tree over temperature and humidity, both in `[0, 1]`.
    /// Humidity is weighted by temperature first.
    pub fn classify(temperature: f32, humidity: f32) -> BiomeKind {
        let t = temperature;
        let h = humidity * t;
        if t < 0.1 {
            BiomeKind::Tundra
        } else if h < 0.2 {
            if t < 0.5 {
                BiomeKind::Tundra
            } else if t < 0.95 {
                BiomeKind::Savanna
            } else {
                BiomeKind::Desert
            }
        } else if h > 0.5 && t < 0.7 {
            BiomeKind::Swampland
        } else if t < 0.5 {
            BiomeKind::Taiga
        } else if t < 0.97 {
            if h < 0.35 {
                BiomeKind::Shrubland
            } else {
                BiomeKind::Forest
            }
        } else if h < 0.45 {
            BiomeKind::Plains
        } else if h < 0.9 {
            BiomeKind::SeasonalForest
        } else {
            BiomeKind::Rainforest
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// Per-biome knobs read by the decoration pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecorationProfile {
    /// Extra trees on top of the noise-driven count. `None` means the biome
    /// never uses the tree noise.
    pub forest_bonus: Option<i32>,
    /// Subtracted from the tree count; large values suppress trees entirely.
    pub tree_penalty: i32,
    /// One in `big_tree_chance` trees uses the big-tree shape.
    pub big_tree_chance: i32,
    pub cactus_per_chunk: u32,
}

impl DecorationProfile {
    const OPEN: DecorationProfile = DecorationProfile {
        forest_bonus: None,
        tree_penalty: 0,
        big_tree_chance: 10,
        cactus_per_chunk: 0,
    };
}

impl Default for DecorationProfile {
    fn default() -> Self {
        Self::OPEN
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Biome {
    pub kind: BiomeKind,
    pub name: &'static str,
    /// Map color used by overview renders, `0xRRGGBB`.
    pub color: u32,
    pub top_block: BlockId,
    pub filler_block: BlockId,
    pub decoration: DecorationProfile,
}

impl Biome {
    fn new(kind: BiomeKind, name: &'static str, color: u32) -> Self {
        Self {
            kind,
            name,
            color,
            top_block: ids::GRASS,
            filler_block: ids::DIRT,
            decoration: DecorationProfile::OPEN,
        }
    }

    fn forest(mut self, bonus: i32) -> Self {
        self.decoration.forest_bonus = Some(bonus);
        self
    }

    fn barren(mut self) -> Self {
        self.decoration.tree_penalty = 20;
        self
    }
}

const TABLE_SIZE: usize = 64;

/// Immutable biome descriptors plus a 64×64 climate lookup table.
#[derive(Clone, Debug)]
pub struct BiomeRegistry {
    biomes: Vec<Option<Biome>>,
    table: Box<[BiomeKind]>,
}

impl BiomeRegistry {
    /// Builds the standard biome set and its lookup table.
    pub fn init() -> Self {
        let biomes = vec![
            Biome::new(BiomeKind::Rainforest, "Rainforest", 0x08FA36).forest(5),
            Biome::new(BiomeKind::Swampland, "Swampland", 0x07F9B2),
            Biome::new(BiomeKind::SeasonalForest, "Seasonal Forest", 0x9BE023).forest(2),
            Biome::new(BiomeKind::Forest, "Forest", 0x056621).forest(5),
            Biome::new(BiomeKind::Savanna, "Savanna", 0xD9E023),
            Biome::new(BiomeKind::Shrubland, "Shrubland", 0xA1AD20),
            Biome::new(BiomeKind::Taiga, "Taiga", 0x2EB153).forest(5),
            Biome::new(BiomeKind::Desert, "Desert", 0xFA9418).barren(),
            Biome::new(BiomeKind::Plains, "Plains", 0xFFD910).barren(),
            Biome::new(BiomeKind::IceDesert, "Ice Desert", 0xFFED93),
            Biome::new(BiomeKind::Tundra, "Tundra", 0x57EBF9).barren(),
        ];
        let mut reg = Self::from_biomes(biomes);
        reg.patch_sand_biomes();
        reg
    }

    /// Registry over an arbitrary descriptor set. Kinds without a descriptor
    /// still classify, but `get` returns `None` for them.
    pub fn from_biomes(list: Vec<Biome>) -> Self {
        let mut biomes: Vec<Option<Biome>> = vec![None; BiomeKind::ALL.len()];
        for biome in list {
            let slot = biome.kind.slot();
            biomes[slot] = Some(biome);
        }
        let mut table = vec![BiomeKind::Plains; TABLE_SIZE * TABLE_SIZE].into_boxed_slice();
        for t in 0..TABLE_SIZE {
            for h in 0..TABLE_SIZE {
                table[t + h * TABLE_SIZE] =
                    BiomeKind::classify(t as f32 / 63.0, h as f32 / 63.0);
            }
        }
        Self { biomes, table }
    }

    // Deserts surface with sand all the way down.
    fn patch_sand_biomes(&mut self) {
        for kind in [BiomeKind::Desert, BiomeKind::IceDesert] {
            if let Some(b) = self.biomes[kind.slot()].as_mut() {
                b.top_block = ids::SAND;
                b.filler_block = ids::SAND;
                b.decoration.cactus_per_chunk = if kind == BiomeKind::Desert { 10 } else { 0 };
            }
        }
    }

    #[inline]
    pub fn get(&self, kind: BiomeKind) -> Option<&Biome> {
        self.biomes[kind.slot()].as_ref()
    }

    /// Table lookup by quantized temperature and humidity indices (0..64).
    /// Out-of-range indices saturate.
    #[inline]
    pub fn lookup(&self, t_idx: usize, h_idx: usize) -> BiomeKind {
        let t = t_idx.min(TABLE_SIZE - 1);
        let h = h_idx.min(TABLE_SIZE - 1);
        self.table[t + h * TABLE_SIZE]
    }

    /// Table lookup by continuous climate values, clamped to `[0, 1]`.
    #[inline]
    pub fn lookup_climate(&self, temperature: f64, humidity: f64) -> BiomeKind {
        let t = temperature.clamp(0.0, 1.0);
        let h = humidity.clamp(0.0, 1.0);
        self.lookup((t * 63.0) as usize, (h * 63.0) as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Biome> {
        self.biomes.iter().flatten()
    }
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        Self::init()
    }
}
