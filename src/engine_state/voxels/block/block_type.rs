//! # Block Type Module
//!
//! The kinds of blocks the world is made of, and how each one looks on screen.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The `FromPrimitive` derive allows conversion back from the compact integer stored in
/// a [`super::Block`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Non-solid, transparent.
    AIR,
    /// Subsurface filler.
    DIRT,
    /// The topmost land block.
    GRASS,
    /// Deep filler below the dirt layer.
    STONE,
    /// Tree trunks.
    WOOD,
    /// Shorelines and low ground.
    SAND,
    /// Fills terrain below sea level.
    WATER,
}

impl BlockType {
    /// Number of block types, including `AIR`.
    pub const COUNT: usize = 7;

    /// Converts a `BlockTypeSize` back into a `BlockType`.
    ///
    /// Unknown values map to `AIR`.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Self {
        BlockType::from_u8(btype).unwrap_or(BlockType::AIR)
    }

    /// Whether blocks of this type occlude what lies behind them.
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }

    /// Display color (RGB) used when the block dominates a drawn sub-chunk.
    pub fn color(self) -> [u8; 3] {
        match self {
            BlockType::AIR => [0, 0, 0],
            BlockType::DIRT => [121, 85, 58],
            BlockType::GRASS => [94, 157, 52],
            BlockType::STONE => [125, 125, 125],
            BlockType::WOOD => [102, 76, 40],
            BlockType::SAND => [219, 207, 163],
            BlockType::WATER => [54, 94, 196],
        }
    }
}
