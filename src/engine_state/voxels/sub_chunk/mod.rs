//! # Sub-chunk Module
//!
//! A sub-chunk is a 16x16x16 cube of blocks and the unit of visibility decisions and
//! draw submission.
//!
//! ## Memory Optimization
//!
//! Sub-chunks store their blocks in two halves:
//! - `solid_array`: one bit per block indicating whether it is solid
//! - `blocks`: only the non-air blocks, in storage order
//!
//! Air costs a single bit, and a sub-chunk's occupancy is known from the length of
//! `blocks` alone.
//!
//! ### Performance Characteristics
//! - **Solidity Check**: O(1)
//! - **Block Lookup**: O(n) in the number of blocks in the same z plane
//! - **Occupancy**: O(1)

use bitvec::prelude::BitVec;
use cgmath::Point3;
use sub_chunk_creation::SubChunkCreationIterator;

use super::block::{block_type::BlockType, Block};

pub mod sub_chunk_creation;

/// The dimension (width, height, depth) of a sub-chunk in blocks.
pub const SUB_CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a sub-chunk.
pub const SUB_CHUNK_PLANE_SIZE: usize = (SUB_CHUNK_DIMENSION * SUB_CHUNK_DIMENSION) as usize;
/// The total number of blocks in a sub-chunk.
pub const SUB_CHUNK_SIZE: usize = SUB_CHUNK_PLANE_SIZE * SUB_CHUNK_DIMENSION as usize;

/// Sub-chunk coordinates of the sub-chunk containing a point in world block space.
///
/// The y coordinate is not clamped to the column.
pub fn containing_sub_chunk(point: Point3<f64>) -> Point3<i32> {
    let dimension = SUB_CHUNK_DIMENSION as f64;
    Point3::new(
        (point.x / dimension).floor() as i32,
        (point.y / dimension).floor() as i32,
        (point.z / dimension).floor() as i32,
    )
}

/// How much of a sub-chunk is filled with solid blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Occupancy {
    /// Only air: nothing to draw, nothing occluded.
    Empty,
    /// A mix of air and solid blocks.
    Partial,
    /// Only solid blocks: fully opaque.
    Full,
}

/// A 16x16x16 collection of voxel blocks.
#[derive(Debug, Clone)]
pub struct SubChunk {
    /// Sub-chunk coordinates: chunk x/z and the sub-chunk index within the column as y.
    pub position: Point3<i32>,
    /// One bit per block, set where the block is solid. Index `x + 16y + 256z`.
    pub solid_array: BitVec,
    /// Index into `blocks` of the first solid block of each z plane.
    pub offsets_at_plane: Vec<u32>,
    /// Non-air blocks, in storage order.
    pub blocks: Vec<Block>,
    /// Most common non-air block type, `AIR` when empty.
    dominant: BlockType,
}

impl SubChunk {
    /// Creates a sub-chunk containing only air.
    pub fn empty(position: Point3<i32>) -> Self {
        SubChunkCreationIterator::new(position).return_sub_chunk()
    }

    /// Creates a sub-chunk completely filled with `block_type`.
    pub fn solid(position: Point3<i32>, block_type: BlockType) -> Self {
        let mut cci = SubChunkCreationIterator::new(position);

        for _ in 0..SUB_CHUNK_SIZE {
            cci.push_block_type(block_type);
        }

        cci.return_sub_chunk()
    }

    /// Creates a sub-chunk with a 3D checkerboard of dirt and air (for testing).
    pub fn checkerboard(position: Point3<i32>) -> Self {
        Self::from_fn(position, |x, y, z| {
            if (x + y + z) % 2 == 0 {
                BlockType::DIRT
            } else {
                BlockType::AIR
            }
        })
    }

    /// Creates a sub-chunk by asking `block_at` for the type of every local position.
    ///
    /// # Arguments
    /// * `position` - Sub-chunk coordinates of the new sub-chunk
    /// * `block_at` - Called with local `(x, y, z)` in `0..16`
    pub fn from_fn<F>(position: Point3<i32>, mut block_at: F) -> Self
    where
        F: FnMut(i32, i32, i32) -> BlockType,
    {
        let mut cci = SubChunkCreationIterator::new(position);

        for z in 0..SUB_CHUNK_DIMENSION {
            for y in 0..SUB_CHUNK_DIMENSION {
                for x in 0..SUB_CHUNK_DIMENSION {
                    cci.push_block_type(block_at(x, y, z));
                }
            }
        }

        cci.return_sub_chunk()
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        x + SUB_CHUNK_DIMENSION as usize * y + SUB_CHUNK_PLANE_SIZE * z
    }

    fn in_bounds(x: usize, y: usize, z: usize) -> bool {
        let dimension = SUB_CHUNK_DIMENSION as usize;
        x < dimension && y < dimension && z < dimension
    }

    /// Checks if the block at the given local coordinates is solid.
    ///
    /// # Returns
    /// `true` if the block is solid, `false` if it is air or out of bounds.
    pub fn is_block_solid(&self, x: usize, y: usize, z: usize) -> bool {
        Self::in_bounds(x, y, z) && self.solid_array[Self::index(x, y, z)]
    }

    /// Gets the block at the given local coordinates.
    ///
    /// # Returns
    /// `None` for air and out-of-bounds coordinates.
    pub fn block_at(&self, x: usize, y: usize, z: usize) -> Option<Block> {
        if !self.is_block_solid(x, y, z) {
            return None;
        }

        let plane_start = SUB_CHUNK_PLANE_SIZE * z;
        let index = Self::index(x, y, z);
        let offset = self.offsets_at_plane[z] as usize
            + self.solid_array[plane_start..index].count_ones();
        self.blocks.get(offset).copied()
    }

    /// Number of solid blocks in this sub-chunk.
    pub fn solid_count(&self) -> usize {
        self.blocks.len()
    }

    /// Classifies this sub-chunk as empty, partially filled or fully opaque.
    pub fn occupancy(&self) -> Occupancy {
        match self.blocks.len() {
            0 => Occupancy::Empty,
            SUB_CHUNK_SIZE => Occupancy::Full,
            _ => Occupancy::Partial,
        }
    }

    /// The most common non-air block type, `AIR` for an empty sub-chunk.
    pub fn dominant_block(&self) -> BlockType {
        self.dominant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_solid_occupancy() {
        let origin = Point3::new(0, 0, 0);

        assert_eq!(SubChunk::empty(origin).occupancy(), Occupancy::Empty);
        assert_eq!(
            SubChunk::solid(origin, BlockType::STONE).occupancy(),
            Occupancy::Full
        );
        assert_eq!(SubChunk::checkerboard(origin).occupancy(), Occupancy::Partial);
    }

    #[test]
    fn block_lookup_follows_packed_storage() {
        let sub_chunk = SubChunk::from_fn(Point3::new(0, 0, 0), |x, y, z| match (x, y, z) {
            (3, 4, 5) => BlockType::WOOD,
            (15, 15, 15) => BlockType::SAND,
            (_, 0, _) => BlockType::STONE,
            _ => BlockType::AIR,
        });

        assert_eq!(sub_chunk.block_at(3, 4, 5).map(|b| b.get_type()), Some(BlockType::WOOD));
        assert_eq!(
            sub_chunk.block_at(15, 15, 15).map(|b| b.get_type()),
            Some(BlockType::SAND)
        );
        assert_eq!(sub_chunk.block_at(7, 0, 9).map(|b| b.get_type()), Some(BlockType::STONE));
        assert_eq!(sub_chunk.block_at(7, 1, 9), None);
        assert!(!sub_chunk.is_block_solid(16, 0, 0));
        assert_eq!(sub_chunk.solid_count(), 256 + 2);
        assert_eq!(sub_chunk.dominant_block(), BlockType::STONE);
    }

    #[test]
    fn checkerboard_is_half_full() {
        let sub_chunk = SubChunk::checkerboard(Point3::new(1, 2, 3));

        assert_eq!(sub_chunk.solid_count(), SUB_CHUNK_SIZE / 2);
        assert!(sub_chunk.is_block_solid(0, 0, 0));
        assert!(!sub_chunk.is_block_solid(1, 0, 0));
        assert_eq!(sub_chunk.dominant_block(), BlockType::DIRT);
    }
}
