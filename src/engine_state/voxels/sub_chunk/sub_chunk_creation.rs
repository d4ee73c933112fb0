//! # Sub-chunk Creation Module
//!
//! Builder that fills a sub-chunk block by block while keeping its two storage halves
//! consistent:
//! 1. the solidity bit vector, one bit per block
//! 2. the packed vector of non-air blocks, in storage order
//!
//! Blocks must be pushed in storage order: x fastest, then y, then z.

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

use super::{SubChunk, SUB_CHUNK_DIMENSION, SUB_CHUNK_PLANE_SIZE, SUB_CHUNK_SIZE};

/// A builder for creating sub-chunks one block at a time.
pub struct SubChunkCreationIterator {
    /// Sub-chunk coordinates of the sub-chunk being built
    position: Point3<i32>,
    /// One bit per pushed block, set for solid blocks
    solid_array: BitVec,
    /// Index into `blocks` of the first solid block of each z plane
    offsets_at_plane: Vec<u32>,
    /// Non-air blocks pushed so far
    blocks: Vec<Block>,
    /// Per-type block counts, for the dominant block
    histogram: [u32; BlockType::COUNT],
    /// Number of blocks pushed so far
    pushed: usize,
}

impl SubChunkCreationIterator {
    /// Creates a new builder for the sub-chunk at `position`.
    pub fn new(position: Point3<i32>) -> Self {
        SubChunkCreationIterator {
            position,
            solid_array: BitVec::with_capacity(SUB_CHUNK_SIZE),
            offsets_at_plane: Vec::with_capacity(SUB_CHUNK_DIMENSION as usize),
            blocks: Vec::new(),
            histogram: [0; BlockType::COUNT],
            pushed: 0,
        }
    }

    /// Appends the next block in storage order.
    ///
    /// Blocks pushed past the end of the sub-chunk are ignored.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        if self.pushed >= SUB_CHUNK_SIZE {
            return;
        }

        if self.pushed % SUB_CHUNK_PLANE_SIZE == 0 {
            self.offsets_at_plane.push(self.blocks.len() as u32);
        }

        let solid = block_type.is_solid();
        self.solid_array.push(solid);
        if solid {
            self.blocks.push(Block::new(block_type));
            self.histogram[block_type as usize] += 1;
        }
        self.pushed += 1;
    }

    /// Finishes the sub-chunk, padding any blocks that were never pushed with air.
    pub fn return_sub_chunk(mut self) -> SubChunk {
        while self.pushed < SUB_CHUNK_SIZE {
            self.push_block_type(BlockType::AIR);
        }

        let dominant = self
            .histogram
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, count)| **count > 0)
            .max_by_key(|(_, count)| **count)
            .map(|(index, _)| BlockType::get_block_type_from_int(index as u8))
            .unwrap_or(BlockType::AIR);

        SubChunk {
            position: self.position,
            solid_array: self.solid_array,
            offsets_at_plane: self.offsets_at_plane,
            blocks: self.blocks,
            dominant,
        }
    }
}
