//! # Sub-chunk Visibility Walk
//!
//! Picks the sub-chunks worth drawing from the player's position by flooding outward
//! through sub-chunk space, instead of scanning every loaded sub-chunk.
//!
//! ## Policy
//!
//! Starting from the sub-chunk containing the eye (with its height clamped into the
//! column), the walk visits neighbors breadth-first. A neighbor is entered when:
//! - it lies in a loaded column and within the column's height
//! - it is no further than `render_distance` sub-chunks from the start (Euclidean)
//! - the step moves away from the start along the axis being stepped
//! - its bounding sphere touches the view cone, when a view direction is given
//!
//! Every entered sub-chunk holding solid blocks is submitted. The walk continues through
//! empty and partially filled sub-chunks but not through fully solid ones, which hide
//! whatever lies behind them. The start sub-chunk is always expanded.
//!
//! Submission order is breadth-first, so nearer sub-chunks come first. Each sub-chunk is
//! visited at most once per walk.

use std::collections::{HashSet, VecDeque};

use cgmath::{Deg, InnerSpace, Point2, Point3, Rad, Vector3};

use crate::engine_state::{
    player::Player,
    voxels::{
        block::block_type::BlockType,
        chunk::SUB_CHUNKS_PER_CHUNK,
        sub_chunk::{containing_sub_chunk, Occupancy, SUB_CHUNK_DIMENSION},
        world::VoxelWorldView,
    },
};

/// Unit steps to the six face neighbors of a sub-chunk.
const NEIGHBOR_STEPS: [(usize, i32); 6] = [(0, 1), (0, -1), (1, 1), (1, -1), (2, 1), (2, -1)];

/// Everything the walk needs to know about the viewer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisibilityQuery {
    /// Eye position in world block coordinates
    pub eye: Point3<f64>,
    /// Normalized view direction; `None` disables view cone culling
    pub view_direction: Option<Vector3<f64>>,
    /// Maximum distance from the start, in sub-chunks
    pub render_distance: u32,
    /// Full opening angle of the view cone
    pub view_cone: Rad<f64>,
}

impl VisibilityQuery {
    /// Builds a query from the player's current position and orientation.
    ///
    /// # Arguments
    /// * `player` - The viewer
    /// * `render_distance` - Maximum distance, in sub-chunks
    /// * `view_cone` - Full opening angle of the view cone, or `None` to disable culling
    pub fn from_player(player: &Player, render_distance: u32, view_cone: Option<Deg<f64>>) -> Self {
        Self {
            eye: player.position,
            view_direction: view_cone.map(|_| player.view_vec()),
            render_distance,
            view_cone: view_cone.map_or(Rad(std::f64::consts::TAU), Rad::from),
        }
    }

    /// Sub-chunk containing the eye. The y coordinate may lie outside the column.
    pub fn eye_sub_chunk(&self) -> Point3<i32> {
        containing_sub_chunk(self.eye)
    }

    fn is_within_distance(&self, start: Point3<i32>, position: Point3<i32>) -> bool {
        let range = i64::from(self.render_distance);
        distance_squared(start, position) <= range.saturating_mul(range)
    }

    /// Bounding sphere of the sub-chunk against the view cone.
    fn is_in_view_cone(&self, position: Point3<i32>) -> bool {
        let Some(direction) = self.view_direction else {
            return true;
        };

        let radius = SUB_CHUNK_DIMENSION as f64 / 2.0 * 3f64.sqrt();
        let to_center = sub_chunk_center(position) - self.eye;
        let distance = to_center.magnitude();
        if distance <= radius {
            return true;
        }

        let allowed = self.view_cone.0 / 2.0 + (radius / distance).asin();
        if allowed >= std::f64::consts::PI {
            return true;
        }
        let cos_angle = (to_center.dot(direction) / distance).clamp(-1.0, 1.0);
        cos_angle.acos() <= allowed
    }
}

/// A sub-chunk selected for drawing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VisibleSubChunk {
    /// Sub-chunk coordinates
    pub position: Point3<i32>,
    /// `Partial` or `Full`
    pub occupancy: Occupancy,
    /// Most common block type, used for coloring
    pub dominant: BlockType,
    /// Number of solid blocks
    pub solid_count: usize,
    /// Squared distance from the start of the walk, in sub-chunks
    pub distance_squared: i64,
}

/// The result of one visibility walk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleSet {
    origin: Option<Point3<i32>>,
    sub_chunks: Vec<VisibleSubChunk>,
    visited: usize,
}

impl VisibleSet {
    /// Sub-chunk the walk started from; `None` if the start column was not loaded.
    pub fn origin(&self) -> Option<Point3<i32>> {
        self.origin
    }

    /// Submitted sub-chunks, nearest first.
    pub fn sub_chunks(&self) -> &[VisibleSubChunk] {
        &self.sub_chunks
    }

    /// Number of submitted sub-chunks.
    pub fn count(&self) -> usize {
        self.sub_chunks.len()
    }

    /// Number of sub-chunks the walk entered, submitted or not.
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Returns `true` if the sub-chunk at `position` was submitted.
    pub fn contains(&self, position: Point3<i32>) -> bool {
        self.sub_chunks.iter().any(|visible| visible.position == position)
    }
}

/// Walks outward from the eye and collects the sub-chunks worth drawing.
///
/// # Arguments
/// * `world` - Loaded voxel data
/// * `query` - Viewer position, direction and limits
///
/// # Returns
/// The submitted sub-chunks; empty if the eye is above or below an unloaded column
pub fn collect_visible_sub_chunks<W: VoxelWorldView + ?Sized>(
    world: &W,
    query: &VisibilityQuery,
) -> VisibleSet {
    let eye = query.eye_sub_chunk();
    let start = Point3::new(eye.x, eye.y.clamp(0, SUB_CHUNKS_PER_CHUNK - 1), eye.z);
    if world.chunk_at(Point2::new(start.x, start.z)).is_none() {
        log::debug!("Eye sub-chunk {:?} is not loaded, nothing to draw", eye);
        return VisibleSet::default();
    }

    let mut visible = VisibleSet {
        origin: Some(start),
        ..VisibleSet::default()
    };
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(position) = queue.pop_front() {
        let sub_chunk = world.sub_chunk_at(position);
        let occupancy = sub_chunk.map_or(Occupancy::Empty, |sub_chunk| sub_chunk.occupancy());

        if let Some(sub_chunk) = sub_chunk.filter(|_| occupancy != Occupancy::Empty) {
            if query.is_in_view_cone(position) {
                visible.sub_chunks.push(VisibleSubChunk {
                    position,
                    occupancy,
                    dominant: sub_chunk.dominant_block(),
                    solid_count: sub_chunk.solid_count(),
                    distance_squared: distance_squared(start, position),
                });
            }
        }

        if occupancy == Occupancy::Full && position != start {
            continue;
        }

        let away = position - start;
        for (axis, step) in NEIGHBOR_STEPS {
            if away[axis] * step < 0 {
                continue;
            }
            let mut neighbor = position;
            neighbor[axis] += step;

            if !(0..SUB_CHUNKS_PER_CHUNK).contains(&neighbor.y)
                || visited.contains(&neighbor)
                || !query.is_within_distance(start, neighbor)
                || world.chunk_at(Point2::new(neighbor.x, neighbor.z)).is_none()
                || !query.is_in_view_cone(neighbor)
            {
                continue;
            }

            visited.insert(neighbor);
            queue.push_back(neighbor);
        }
    }

    visible.visited = visited.len();
    log::trace!(
        "Visibility walk from {:?}: {} visited, {} submitted",
        start,
        visible.visited,
        visible.count()
    );
    visible
}

/// Squared Euclidean distance between two sub-chunk positions.
fn distance_squared(a: Point3<i32>, b: Point3<i32>) -> i64 {
    let offset = b - a;
    [offset.x, offset.y, offset.z]
        .iter()
        .map(|component| (*component as i64).pow(2))
        .sum()
}

/// Center of the sub-chunk at `position` in world block coordinates.
fn sub_chunk_center(position: Point3<i32>) -> Point3<f64> {
    let dimension = SUB_CHUNK_DIMENSION as f64;
    let corner = Point3::new(position.x as f64, position.y as f64, position.z as f64) * dimension;
    corner + Vector3::new(dimension, dimension, dimension) / 2.0
}

#[cfg(test)]
mod tests {
    use cgmath::Deg;

    use super::*;
    use crate::engine_state::voxels::{
        chunk::Chunk,
        sub_chunk::SubChunk,
        world::World,
    };

    #[derive(Copy, Clone)]
    enum Layer {
        Stone,
        Checkerboard,
    }

    /// A world of `radius` columns around the origin with the given sub-chunk layers.
    fn layered_world(radius: i32, layers: &[(i32, Layer)]) -> World {
        let mut world = World::new(0);
        for x in -radius..=radius {
            for z in -radius..=radius {
                let mut chunk = Chunk::empty(Point2::new(x, z));
                for (index, layer) in layers {
                    let position = Point3::new(x, *index, z);
                    let sub_chunk = match layer {
                        Layer::Stone => SubChunk::solid(position, BlockType::STONE),
                        Layer::Checkerboard => SubChunk::checkerboard(position),
                    };
                    chunk.set_sub_chunk(*index, sub_chunk);
                }
                world.insert_chunk(chunk);
            }
        }
        world
    }

    fn query(eye: Point3<f64>, render_distance: u32) -> VisibilityQuery {
        VisibilityQuery {
            eye,
            view_direction: None,
            render_distance,
            view_cone: Rad(std::f64::consts::TAU),
        }
    }

    #[test]
    fn unloaded_start_column_draws_nothing() {
        let world = layered_world(1, &[(3, Layer::Stone)]);

        let visible = collect_visible_sub_chunks(&world, &query(Point3::new(500.0, 72.0, 8.0), 4));

        assert_eq!(visible.count(), 0);
        assert_eq!(visible.visited(), 0);
        assert_eq!(visible.origin(), None);
    }

    #[test]
    fn floor_within_render_distance_is_submitted() {
        let world = layered_world(3, &[(3, Layer::Stone)]);

        let visible = collect_visible_sub_chunks(&world, &query(Point3::new(8.0, 72.0, 8.0), 2));

        assert_eq!(visible.origin(), Some(Point3::new(0, 4, 0)));
        assert_eq!(visible.count(), 9);
        for dx in -1..=1 {
            for dz in -1..=1 {
                assert!(visible.contains(Point3::new(dx, 3, dz)));
            }
        }
    }

    #[test]
    fn full_sub_chunks_hide_what_lies_behind_them() {
        let world = layered_world(3, &[(1, Layer::Stone), (3, Layer::Stone)]);

        let visible = collect_visible_sub_chunks(&world, &query(Point3::new(8.0, 72.0, 8.0), 3));

        assert_eq!(visible.count(), 25);
        assert!(visible.contains(Point3::new(2, 3, 2)));
        assert!(!visible.contains(Point3::new(0, 1, 0)));
    }

    #[test]
    fn enclosed_eye_sees_the_surrounding_walls() {
        let world = layered_world(2, &[(4, Layer::Stone)]);

        let visible = collect_visible_sub_chunks(&world, &query(Point3::new(8.0, 72.0, 8.0), 1));

        assert_eq!(visible.count(), 5);
        assert_eq!(visible.sub_chunks()[0].position, Point3::new(0, 4, 0));
        assert_eq!(visible.sub_chunks()[0].occupancy, Occupancy::Full);
        assert!(!visible.contains(Point3::new(0, 3, 0)));
    }

    #[test]
    fn eye_above_the_column_starts_at_the_top() {
        let world = layered_world(1, &[(15, Layer::Stone)]);

        let visible = collect_visible_sub_chunks(&world, &query(Point3::new(8.0, 400.0, 8.0), 0));

        assert_eq!(visible.origin(), Some(Point3::new(0, 15, 0)));
        assert_eq!(visible.count(), 1);
    }

    #[test]
    fn view_cone_drops_sub_chunks_behind_the_eye() {
        let world = layered_world(3, &[(4, Layer::Checkerboard)]);
        let eye = Point3::new(8.0, 72.0, 8.0);

        let everything = collect_visible_sub_chunks(&world, &query(eye, 3));
        let ahead = collect_visible_sub_chunks(
            &world,
            &VisibilityQuery {
                view_direction: Some(Vector3::unit_x()),
                view_cone: Rad::from(Deg(60.0)),
                ..query(eye, 3)
            },
        );

        assert!(everything.contains(Point3::new(-3, 4, 0)));
        assert!(ahead.contains(Point3::new(0, 4, 0)));
        assert!(ahead.contains(Point3::new(3, 4, 0)));
        assert!(!ahead.contains(Point3::new(-1, 4, 0)));
        assert!(!ahead.contains(Point3::new(-3, 4, 0)));
        assert!(ahead.count() < everything.count());
    }

    #[test]
    fn submission_is_nearest_first() {
        let world = layered_world(3, &[(3, Layer::Stone)]);

        let visible = collect_visible_sub_chunks(&world, &query(Point3::new(8.0, 72.0, 8.0), 3));
        let distances: Vec<i64> = visible
            .sub_chunks()
            .iter()
            .map(|sub_chunk| sub_chunk.distance_squared)
            .collect();

        assert_eq!(distances.first(), Some(&1));
        assert_eq!(distances.iter().max(), Some(&9));
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1] + 4));
    }

    #[test]
    fn player_query_uses_view_direction_only_with_culling() {
        let player = Player::new(Point3::new(-20.0, 40.0, 3.0), Deg(90.0), Deg(0.0));

        let culled = VisibilityQuery::from_player(&player, 4, Some(Deg(90.0)));
        let unculled = VisibilityQuery::from_player(&player, 4, None);

        assert!(culled.view_direction.is_some_and(|direction| direction.z > 0.99));
        assert_eq!(unculled.view_direction, None);
        assert_eq!(culled.eye_sub_chunk(), Point3::new(-2, 2, 0));
        assert_eq!(culled.eye_sub_chunk(), player.sub_chunk_position());
    }

    #[test]
    fn largest_render_distance_is_bounded_by_the_loaded_world() {
        let world = layered_world(1, &[(3, Layer::Stone)]);
        let eye = Point3::new(8.0, 72.0, 8.0);

        let bounded = collect_visible_sub_chunks(&world, &query(eye, 64));
        let unbounded = collect_visible_sub_chunks(&world, &query(eye, u32::MAX));

        assert_eq!(unbounded.count(), bounded.count());
        assert_eq!(unbounded.visited(), bounded.visited());
    }
}
