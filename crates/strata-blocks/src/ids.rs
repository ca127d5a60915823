//! Numeric ids of the blocks the generator and decorators place directly.

use crate::types::BlockId;

pub const AIR: BlockId = 0;
pub const STONE: BlockId = 1;
pub const GRASS: BlockId = 2;
pub const DIRT: BlockId = 3;
pub const COBBLESTONE: BlockId = 4;
pub const PLANKS: BlockId = 5;
pub const BEDROCK: BlockId = 7;
pub const FLOWING_WATER: BlockId = 8;
pub const WATER: BlockId = 9;
pub const FLOWING_LAVA: BlockId = 10;
pub const LAVA: BlockId = 11;
pub const SAND: BlockId = 12;
pub const GRAVEL: BlockId = 13;
pub const GOLD_ORE: BlockId = 14;
pub const IRON_ORE: BlockId = 15;
pub const COAL_ORE: BlockId = 16;
pub const LOG: BlockId = 17;
pub const LEAVES: BlockId = 18;
pub const LAPIS_ORE: BlockId = 21;
pub const SANDSTONE: BlockId = 24;
pub const DANDELION: BlockId = 37;
pub const ROSE: BlockId = 38;
pub const BROWN_MUSHROOM: BlockId = 39;
pub const RED_MUSHROOM: BlockId = 40;
pub const MOSSY_COBBLESTONE: BlockId = 48;
pub const SPAWNER: BlockId = 52;
pub const CHEST: BlockId = 54;
pub const DIAMOND_ORE: BlockId = 56;
pub const REDSTONE_ORE: BlockId = 73;
pub const SNOW_LAYER: BlockId = 78;
pub const ICE: BlockId = 79;
pub const CACTUS: BlockId = 81;
pub const CLAY: BlockId = 82;
pub const REED: BlockId = 83;
pub const PUMPKIN: BlockId = 86;

#[inline]
pub fn is_water(id: BlockId) -> bool {
    id == WATER || id == FLOWING_WATER
}

#[inline]
pub fn is_lava(id: BlockId) -> bool {
    id == LAVA || id == FLOWING_LAVA
}
