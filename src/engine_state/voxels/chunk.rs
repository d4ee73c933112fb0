//! # Chunk Module
//!
//! A chunk is a vertical column of [`SUB_CHUNKS_PER_CHUNK`] sub-chunks. Sub-chunks that
//! contain only air are not stored.

use cgmath::{Point2, Point3};

use super::sub_chunk::{SubChunk, SUB_CHUNK_DIMENSION};

/// Number of sub-chunks stacked in one chunk column.
pub const SUB_CHUNKS_PER_CHUNK: i32 = 16;
/// Height of a chunk column in blocks.
pub const CHUNK_HEIGHT: i32 = SUB_CHUNKS_PER_CHUNK * SUB_CHUNK_DIMENSION;

/// Horizontal chunk coordinates (x, z).
pub type ChunkPos = Point2<i32>;

/// A vertical column of sub-chunks.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: ChunkPos,
    /// Sub-chunks from the bottom of the world up; `None` is all air.
    sub_chunks: [Option<SubChunk>; SUB_CHUNKS_PER_CHUNK as usize],
}

impl Chunk {
    /// Creates a column that contains only air.
    pub fn empty(position: ChunkPos) -> Self {
        Self {
            position,
            sub_chunks: std::array::from_fn(|_| None),
        }
    }

    /// Returns `true` if `index` is a valid sub-chunk index within a column.
    pub fn contains_index(index: i32) -> bool {
        (0..SUB_CHUNKS_PER_CHUNK).contains(&index)
    }

    /// Sub-chunk coordinates of the sub-chunk at `index` in this column.
    pub fn sub_chunk_position(&self, index: i32) -> Point3<i32> {
        Point3::new(self.position.x, index, self.position.y)
    }

    /// Gets the sub-chunk at `index`.
    ///
    /// # Returns
    /// `None` for air-only sub-chunks and indices outside the column.
    pub fn sub_chunk(&self, index: i32) -> Option<&SubChunk> {
        if !Self::contains_index(index) {
            return None;
        }
        self.sub_chunks[index as usize].as_ref()
    }

    /// Stores `sub_chunk` at `index`. Empty sub-chunks are dropped.
    ///
    /// Indices outside the column are ignored.
    pub fn set_sub_chunk(&mut self, index: i32, sub_chunk: SubChunk) {
        if !Self::contains_index(index) {
            log::warn!(
                "Ignoring sub-chunk {} outside of chunk column {:?}",
                index,
                self.position
            );
            return;
        }

        self.sub_chunks[index as usize] = if sub_chunk.solid_count() == 0 {
            None
        } else {
            Some(sub_chunk)
        };
    }

    /// Checks solidity of a block in column-local coordinates.
    pub fn is_block_solid(&self, x: usize, y: i32, z: usize) -> bool {
        if !(0..CHUNK_HEIGHT).contains(&y) {
            return false;
        }
        let index = y / SUB_CHUNK_DIMENSION;
        self.sub_chunk(index).is_some_and(|sub_chunk| {
            sub_chunk.is_block_solid(x, (y % SUB_CHUNK_DIMENSION) as usize, z)
        })
    }

    /// Number of stored (non-air) sub-chunks.
    pub fn stored_sub_chunks(&self) -> usize {
        self.sub_chunks.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn empty_sub_chunks_are_not_stored() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));

        chunk.set_sub_chunk(2, SubChunk::empty(chunk.sub_chunk_position(2)));
        chunk.set_sub_chunk(3, SubChunk::solid(chunk.sub_chunk_position(3), BlockType::STONE));

        assert!(chunk.sub_chunk(2).is_none());
        assert!(chunk.sub_chunk(3).is_some());
        assert_eq!(chunk.stored_sub_chunks(), 1);
    }

    #[test]
    fn out_of_column_indices_are_absent() {
        let mut chunk = Chunk::empty(Point2::new(4, -2));

        chunk.set_sub_chunk(16, SubChunk::solid(Point3::new(4, 16, -2), BlockType::STONE));

        assert!(chunk.sub_chunk(-1).is_none());
        assert!(chunk.sub_chunk(SUB_CHUNKS_PER_CHUNK).is_none());
        assert_eq!(chunk.stored_sub_chunks(), 0);
        assert!(!chunk.is_block_solid(0, CHUNK_HEIGHT, 0));
    }

    #[test]
    fn column_block_solidity_maps_to_sub_chunks() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        chunk.set_sub_chunk(1, SubChunk::solid(chunk.sub_chunk_position(1), BlockType::DIRT));

        assert!(chunk.is_block_solid(5, 16, 5));
        assert!(chunk.is_block_solid(5, 31, 5));
        assert!(!chunk.is_block_solid(5, 32, 5));
        assert!(!chunk.is_block_solid(5, 15, 5));
    }
}
