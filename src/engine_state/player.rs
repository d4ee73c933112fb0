//! # Player Context
//!
//! The player's position and view orientation, as read by the in-world screen when it
//! decides which sub-chunks to draw.
//!
//! Screens receive a [`PlayerHandle`] when they are constructed; the game-state side of the
//! client keeps the other clone and moves the player around.

use std::f64::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Point2, Point3, Rad, Vector3};

use crate::core::StResource;

use super::voxels::{chunk::ChunkPos, sub_chunk::containing_sub_chunk};

/// Safe limit for pitch to prevent the view vector from flipping
const SAFE_FRAC_PI_2: f64 = FRAC_PI_2 - 0.0001;

/// Shared handle to the player context.
pub type PlayerHandle = StResource<Player>;

/// A player in the world.
///
/// # Fields
/// - `position`: eye position in world (block) space
/// - `yaw`: horizontal rotation around the Y axis
/// - `pitch`: vertical rotation, kept strictly between -90° and 90°
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Eye position in world space
    pub position: Point3<f64>,
    yaw: Rad<f64>,
    pitch: Rad<f64>,
}

impl Player {
    /// Creates a new player at `position` with the given orientation.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Deg, Point3};
    /// use cosmicland_client::engine_state::player::Player;
    ///
    /// let player = Player::new(Point3::new(0.0, 80.0, 0.0), Deg(0.0), Deg(0.0));
    /// assert!((player.view_vec().x - 1.0).abs() < 1e-9);
    /// ```
    pub fn new<Y: Into<Rad<f64>>, P: Into<Rad<f64>>>(
        position: Point3<f64>,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut player = Self {
            position,
            yaw: yaw.into(),
            pitch: Rad(0.0),
        };
        player.set_pitch(pitch);
        player
    }

    /// Horizontal rotation around the Y axis.
    pub fn yaw(&self) -> Rad<f64> {
        self.yaw
    }

    /// Vertical rotation.
    pub fn pitch(&self) -> Rad<f64> {
        self.pitch
    }

    /// Sets the yaw.
    pub fn set_yaw<Y: Into<Rad<f64>>>(&mut self, yaw: Y) {
        self.yaw = yaw.into();
    }

    /// Sets the pitch, clamped just short of straight up or down.
    pub fn set_pitch<P: Into<Rad<f64>>>(&mut self, pitch: P) {
        let Rad(pitch) = pitch.into();
        self.pitch = Rad(pitch.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));
    }

    /// Moves the player to `position` without changing orientation.
    pub fn teleport(&mut self, position: Point3<f64>) {
        self.position = position;
    }

    /// The normalized direction the player is looking in.
    pub fn view_vec(&self) -> Vector3<f64> {
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize()
    }

    /// The horizontal coordinates of the chunk column containing the player.
    pub fn chunk_position(&self) -> ChunkPos {
        let sub_chunk = self.sub_chunk_position();
        Point2::new(sub_chunk.x, sub_chunk.z)
    }

    /// The sub-chunk coordinates containing the player.
    ///
    /// The y coordinate is not clamped and may lie outside the column when the player is
    /// above or below the world.
    pub fn sub_chunk_position(&self) -> Point3<i32> {
        containing_sub_chunk(self.position)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Deg;

    use super::*;

    #[test]
    fn negative_positions_floor_into_the_right_sub_chunk() {
        let player = Player::new(Point3::new(-0.5, 17.0, -16.0), Deg(0.0), Deg(0.0));

        assert_eq!(player.chunk_position(), Point2::new(-1, -1));
        assert_eq!(player.sub_chunk_position(), Point3::new(-1, 1, -1));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut player = Player::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(120.0));
        assert!(player.pitch().0 < FRAC_PI_2);

        player.set_pitch(Deg(-120.0));
        assert!(player.pitch().0 > -FRAC_PI_2);
        assert!(player.view_vec().y < -0.99);
    }

    #[test]
    fn teleporting_moves_the_containing_sub_chunk() {
        let mut player = Player::new(Point3::new(0.0, 300.0, 0.0), Deg(0.0), Deg(0.0));
        assert_eq!(player.sub_chunk_position(), Point3::new(0, 18, 0));

        player.teleport(Point3::new(40.0, 100.0, -3.0));
        assert_eq!(player.sub_chunk_position(), Point3::new(2, 6, -1));
        assert_eq!(player.chunk_position(), Point2::new(2, -1));
    }
}
