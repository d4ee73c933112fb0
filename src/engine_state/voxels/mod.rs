//! # Voxels
//!
//! The block world the in-world screen draws from.
//!
//! ## Architecture
//!
//! * **Block**: individual voxel types and their compact storage
//! * **SubChunk**: 16x16x16 cubes of blocks, the unit of visibility and drawing
//! * **Chunk**: vertical columns of sub-chunks keyed by horizontal chunk coordinates
//! * **World**: the sparse set of loaded columns, terrain generation, and the
//!   [`world::VoxelWorldView`] trait the renderer reads through
//!
//! ## Coordinate Spaces
//!
//! * block coordinates: one unit per block, `y` in `0..256`
//! * sub-chunk coordinates: block coordinates divided by 16 (floored), `y` in `0..16`
//! * chunk coordinates: the `(x, z)` of sub-chunk coordinates

pub mod block;
pub mod chunk;
pub mod sub_chunk;
pub mod world;
