//! # World Module
//!
//! This module provides the `World` struct which manages the loaded chunk columns, and
//! the [`VoxelWorldView`] trait through which the renderer reads them.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only generated or inserted columns are
//! kept in memory. Lookups of unloaded coordinates return `None`.
//!
//! ## Chunk Generation
//!
//! Terrain is deterministic for a given seed:
//! - a two-octave Perlin heightmap decides the surface
//! - 3D Perlin noise carves caves below it
//! - terrain below sea level is flooded with water
//! - a seeded random generator plants tree trunks on grass

use std::collections::HashMap;

use cgmath::{Point2, Point3};
use noise::{NoiseFn, Perlin};

use super::{
    block::block_type::BlockType,
    chunk::{Chunk, ChunkPos, CHUNK_HEIGHT, SUB_CHUNKS_PER_CHUNK},
    sub_chunk::{SubChunk, SUB_CHUNK_DIMENSION},
};

/// Read-only access to loaded voxel data, keyed by integer chunk coordinates.
pub trait VoxelWorldView {
    /// Gets the loaded column at `position`, or `None` if it is not loaded.
    fn chunk_at(&self, position: ChunkPos) -> Option<&Chunk>;

    /// Gets the sub-chunk at sub-chunk coordinates `position`.
    ///
    /// # Returns
    /// `None` if the column is not loaded, or the sub-chunk is air or outside the column.
    fn sub_chunk_at(&self, position: Point3<i32>) -> Option<&SubChunk> {
        self.chunk_at(Point2::new(position.x, position.z))?
            .sub_chunk(position.y)
    }

    /// Checks solidity of the block at world block coordinates. Unloaded blocks are air.
    fn is_block_solid(&self, position: Point3<i32>) -> bool {
        let chunk_position = Point2::new(
            position.x.div_euclid(SUB_CHUNK_DIMENSION),
            position.z.div_euclid(SUB_CHUNK_DIMENSION),
        );
        self.chunk_at(chunk_position).is_some_and(|chunk| {
            chunk.is_block_solid(
                position.x.rem_euclid(SUB_CHUNK_DIMENSION) as usize,
                position.y,
                position.z.rem_euclid(SUB_CHUNK_DIMENSION) as usize,
            )
        })
    }
}

/// Water fills everything at or below this height that is not terrain.
pub const SEA_LEVEL: i32 = 60;
/// Average terrain height.
pub const BASE_HEIGHT: i32 = 72;
/// Height of a tree trunk in blocks.
const TRUNK_HEIGHT: i32 = 4;
/// One in this many grass columns grows a trunk.
const TREE_RARITY: u32 = 90;

const HILL_SCALE: f64 = 0.008;
const HILL_AMPLITUDE: f64 = 26.0;
const DETAIL_SCALE: f64 = 0.045;
const DETAIL_AMPLITUDE: f64 = 5.0;
const CAVE_SCALE: f64 = 0.06;
const CAVE_THRESHOLD: f64 = 0.55;

/// Deterministic terrain generator for chunk columns.
pub struct TerrainGenerator {
    seed: u32,
    surface_noise: Perlin,
    cave_noise: Perlin,
}

/// Per-column surface data of one chunk.
struct ColumnPlan {
    heights: [[i32; 16]; 16],
    trees: [[bool; 16]; 16],
}

impl TerrainGenerator {
    /// Creates a generator for `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            surface_noise: Perlin::new(seed),
            cave_noise: Perlin::new(seed.wrapping_add(1)),
        }
    }

    /// Terrain height (the y of the topmost terrain block) at world column `(wx, wz)`.
    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        let hills = self
            .surface_noise
            .get([wx as f64 * HILL_SCALE, wz as f64 * HILL_SCALE]);
        let detail = self
            .surface_noise
            .get([wx as f64 * DETAIL_SCALE + 100.0, wz as f64 * DETAIL_SCALE + 100.0]);
        let height = BASE_HEIGHT as f64 + hills * HILL_AMPLITUDE + detail * DETAIL_AMPLITUDE;
        (height.round() as i32).clamp(1, CHUNK_HEIGHT - TRUNK_HEIGHT - 2)
    }

    fn has_tree(&self, wx: i32, wz: i32) -> bool {
        let column_seed = (self.seed as u64) << 32
            ^ (wx as u32 as u64).wrapping_mul(0x9E37_79B9)
            ^ (wz as u32 as u64).wrapping_mul(0x85EB_CA6B);
        fastrand::Rng::with_seed(column_seed).u32(0..TREE_RARITY) == 0
    }

    fn plan(&self, position: ChunkPos) -> ColumnPlan {
        let mut heights = [[0; 16]; 16];
        let mut trees = [[false; 16]; 16];
        for z in 0..SUB_CHUNK_DIMENSION {
            for x in 0..SUB_CHUNK_DIMENSION {
                let wx = position.x * SUB_CHUNK_DIMENSION + x;
                let wz = position.y * SUB_CHUNK_DIMENSION + z;
                let height = self.height_at(wx, wz);
                heights[z as usize][x as usize] = height;
                trees[z as usize][x as usize] = height > SEA_LEVEL + 1 && self.has_tree(wx, wz);
            }
        }
        ColumnPlan { heights, trees }
    }

    fn block_at(&self, plan: &ColumnPlan, wx: i32, wy: i32, wz: i32, x: i32, z: i32) -> BlockType {
        let height = plan.heights[z as usize][x as usize];

        if wy > height {
            if plan.trees[z as usize][x as usize] && wy <= height + TRUNK_HEIGHT {
                return BlockType::WOOD;
            }
            return if wy <= SEA_LEVEL {
                BlockType::WATER
            } else {
                BlockType::AIR
            };
        }

        if wy > 4 && wy < height - 3 {
            let cave = self.cave_noise.get([
                wx as f64 * CAVE_SCALE,
                wy as f64 * CAVE_SCALE,
                wz as f64 * CAVE_SCALE,
            ]);
            if cave > CAVE_THRESHOLD {
                return BlockType::AIR;
            }
        }

        let near_water = height <= SEA_LEVEL + 1;
        if wy == height {
            if near_water {
                BlockType::SAND
            } else {
                BlockType::GRASS
            }
        } else if wy > height - 4 {
            if near_water {
                BlockType::SAND
            } else {
                BlockType::DIRT
            }
        } else {
            BlockType::STONE
        }
    }

    /// Generates the column at `position`.
    pub fn generate(&self, position: ChunkPos) -> Chunk {
        let plan = self.plan(position);
        let top = plan
            .heights
            .iter()
            .flatten()
            .copied()
            .max()
            .unwrap_or(0)
            .max(SEA_LEVEL)
            + TRUNK_HEIGHT;

        let mut chunk = Chunk::empty(position);
        for index in 0..SUB_CHUNKS_PER_CHUNK {
            let base_y = index * SUB_CHUNK_DIMENSION;
            if base_y > top {
                break;
            }

            let sub_chunk = SubChunk::from_fn(chunk.sub_chunk_position(index), |x, y, z| {
                self.block_at(
                    &plan,
                    position.x * SUB_CHUNK_DIMENSION + x,
                    base_y + y,
                    position.y * SUB_CHUNK_DIMENSION + z,
                    x,
                    z,
                )
            });
            chunk.set_sub_chunk(index, sub_chunk);
        }

        chunk
    }
}

/// Represents the loaded part of the voxel world.
///
/// # Examples
///
/// ```
/// use cgmath::Point2;
/// use cosmicland_client::engine_state::voxels::world::{VoxelWorldView, World};
///
/// let mut world = World::new(0);
/// world.add_chunk_at(Point2::new(0, 0));
///
/// assert!(world.chunk_at(Point2::new(0, 0)).is_some());
/// assert!(world.chunk_at(Point2::new(1, 0)).is_none());
/// ```
pub struct World {
    /// A mapping from chunk coordinates to loaded columns.
    chunks: HashMap<ChunkPos, Chunk>,
    generator: TerrainGenerator,
}

impl World {
    /// Creates a new world with no chunks loaded.
    pub fn new(seed: u32) -> Self {
        World {
            chunks: HashMap::new(),
            generator: TerrainGenerator::new(seed),
        }
    }

    /// Generates the column at `position` unless it is already loaded.
    ///
    /// # Returns
    /// `true` if a new column was generated
    pub fn add_chunk_at(&mut self, position: ChunkPos) -> bool {
        if self.chunks.contains_key(&position) {
            return false;
        }

        let chunk = self.generator.generate(position);
        self.chunks.insert(position, chunk);
        true
    }

    /// Generates every missing column in the square of `radius` chunks around `center`.
    ///
    /// # Returns
    /// The number of columns generated
    pub fn load_around(&mut self, center: ChunkPos, radius: i32) -> usize {
        let mut generated = 0;
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if self.add_chunk_at(Point2::new(center.x + dx, center.y + dz)) {
                    generated += 1;
                }
            }
        }
        log::info!(
            "Generated {} chunk columns around {:?} ({} loaded)",
            generated,
            center,
            self.chunks.len()
        );
        generated
    }

    /// Inserts a prebuilt column, replacing any column at the same position.
    pub fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.position, chunk);
    }

    /// Unloads the column at `position`.
    pub fn remove_chunk(&mut self, position: ChunkPos) -> Option<Chunk> {
        self.chunks.remove(&position)
    }

    /// Number of loaded columns.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The y just above the highest solid block of world column `(wx, wz)`.
    ///
    /// # Returns
    /// `None` if the column is not loaded
    pub fn surface_height(&self, wx: i32, wz: i32) -> Option<i32> {
        let chunk = self.chunk_at(Point2::new(
            wx.div_euclid(SUB_CHUNK_DIMENSION),
            wz.div_euclid(SUB_CHUNK_DIMENSION),
        ))?;
        let x = wx.rem_euclid(SUB_CHUNK_DIMENSION) as usize;
        let z = wz.rem_euclid(SUB_CHUNK_DIMENSION) as usize;
        let top = (0..CHUNK_HEIGHT)
            .rev()
            .find(|y| chunk.is_block_solid(x, *y, z))
            .map_or(0, |y| y + 1);
        Some(top)
    }
}

impl VoxelWorldView for World {
    fn chunk_at(&self, position: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = TerrainGenerator::new(7).generate(Point2::new(3, -2));
        let b = TerrainGenerator::new(7).generate(Point2::new(3, -2));

        for index in 0..SUB_CHUNKS_PER_CHUNK {
            let solid_a = a.sub_chunk(index).map(|s| s.solid_array.clone());
            let solid_b = b.sub_chunk(index).map(|s| s.solid_array.clone());
            assert_eq!(solid_a, solid_b);
        }
    }

    #[test]
    fn generated_columns_have_ground_and_sky() {
        let mut world = World::new(0);
        world.add_chunk_at(Point2::new(0, 0));

        let chunk = world.chunk_at(Point2::new(0, 0)).unwrap();
        assert!(chunk.sub_chunk(0).is_some());
        assert!(chunk.sub_chunk(SUB_CHUNKS_PER_CHUNK - 1).is_none());

        let surface = world.surface_height(5, 5).unwrap();
        assert!(surface > 0 && surface < CHUNK_HEIGHT);
        assert!(world.is_block_solid(Point3::new(5, 0, 5)));
        assert!(!world.is_block_solid(Point3::new(5, CHUNK_HEIGHT - 1, 5)));
    }

    #[test]
    fn load_around_only_generates_missing_columns() {
        let mut world = World::new(1);

        assert_eq!(world.load_around(Point2::new(0, 0), 1), 9);
        assert_eq!(world.load_around(Point2::new(1, 0), 1), 3);
        assert_eq!(world.chunk_count(), 12);
        assert!(world.surface_height(1000, 1000).is_none());
    }

    #[test]
    fn negative_block_coordinates_map_to_the_right_column() {
        let mut world = World::new(0);
        let mut chunk = Chunk::empty(Point2::new(-1, -1));
        chunk.set_sub_chunk(0, SubChunk::solid(chunk.sub_chunk_position(0), BlockType::STONE));
        world.insert_chunk(chunk);

        assert!(world.is_block_solid(Point3::new(-1, 3, -16)));
        assert!(!world.is_block_solid(Point3::new(0, 3, 0)));
        assert_eq!(world.surface_height(-5, -5), Some(16));
    }
}
