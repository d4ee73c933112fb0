//! # World Screen
//!
//! The in-world screen. Every frame it walks the loaded sub-chunks around the player, draws
//! the ones it selected, and, when overlays are shown, a label with the sampled frame rate
//! and the number of sub-chunks drawn.
//!
//! ## Key Components
//!
//! * [`WorldScreen`] - The screen itself; the registered instance is a prototype with no
//!   player bound to it
//! * [`WorldScreenConfig`] - Render distance, culling and HUD refresh parameters
//! * [`visibility`] - The sub-chunk visibility walk
//! * [`fps`] - Frame-rate sampling
//!
//! ## Drawing
//!
//! The scene is a top-down map centered on the player's sub-chunk: one tile per drawn
//! sub-chunk column, higher sub-chunks painted over lower ones, colored by their dominant
//! block and shaded by height.

use std::{any::Any, cell::Cell};

use cgmath::Deg;
use web_time::{Duration, Instant};

use crate::{
    core::StResource,
    engine_state::{
        player::PlayerHandle,
        surface::{PixelSurface, Rect, Rgba, TextSprite},
        voxels::{chunk::SUB_CHUNKS_PER_CHUNK, sub_chunk::Occupancy, world::World},
    },
    settings::Settings,
};

use super::{Screen, Viewport};

pub mod fps;
pub mod visibility;

use fps::FpsCounter;
use visibility::{collect_visible_sub_chunks, VisibilityQuery, VisibleSet, VisibleSubChunk};

const SKY: Rgba = Rgba::rgb(96, 148, 214);
const PLAYER_MARKER: Rgba = Rgba::WHITE;
const HUD_COLOR: Rgba = Rgba::WHITE;
const HUD_SCALE: u32 = 2;
const HUD_MARGIN: i32 = 4;

/// Parameters of the in-world screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldScreenConfig {
    /// Render distance of the visibility walk, in sub-chunks
    pub render_distance: u32,
    /// Whether sub-chunks outside the view cone are skipped
    pub frustum_culling: bool,
    /// Full opening angle of the view cone
    pub view_cone: Deg<f64>,
    /// Minimum time between two HUD refreshes
    pub fps_refresh_interval: Duration,
}

impl WorldScreenConfig {
    /// Takes the in-world parameters out of the client settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            render_distance: settings.render_distance,
            frustum_culling: settings.frustum_culling,
            view_cone: Deg(settings.view_cone_degrees),
            fps_refresh_interval: settings.fps_refresh_interval(),
        }
    }
}

impl Default for WorldScreenConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// The in-world screen.
pub struct WorldScreen {
    viewport: Viewport,
    surface: StResource<PixelSurface>,
    world: StResource<World>,
    config: WorldScreenConfig,
    player: Option<PlayerHandle>,
    session: u64,
    /// Sessions handed out by this prototype so far.
    sessions: Cell<u64>,
    fps: FpsCounter,
    hud: Option<TextSprite>,
    last_visible: VisibleSet,
}

impl WorldScreen {
    /// Creates the prototype registered for the in-world screen.
    ///
    /// # Arguments
    /// * `viewport` - Area of the surface to draw into
    /// * `surface` - The surface shared by all screens
    /// * `world` - The loaded world
    /// * `config` - Render and HUD parameters
    pub fn prototype(
        viewport: Viewport,
        surface: StResource<PixelSurface>,
        world: StResource<World>,
        config: WorldScreenConfig,
    ) -> Self {
        Self {
            viewport,
            surface,
            world,
            config,
            player: None,
            session: 0,
            sessions: Cell::new(0),
            fps: FpsCounter::new(config.fps_refresh_interval, Instant::now()),
            hud: None,
            last_visible: VisibleSet::default(),
        }
    }

    /// Session number of this instance; `0` for the prototype.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// The player this instance is bound to; `None` for the prototype.
    pub fn player(&self) -> Option<&PlayerHandle> {
        self.player.as_ref()
    }

    /// Render and HUD parameters.
    pub fn config(&self) -> &WorldScreenConfig {
        &self.config
    }

    /// Frame counter and last sampled frame rate.
    pub fn fps(&self) -> &FpsCounter {
        &self.fps
    }

    /// The sub-chunks drawn in the most recent frame.
    pub fn last_visible(&self) -> &VisibleSet {
        &self.last_visible
    }

    /// Text of the HUD label, once it has been rendered.
    pub fn hud_text(&self) -> Option<&str> {
        self.hud.as_ref().map(TextSprite::text)
    }

    /// Draws one frame at time `now`.
    ///
    /// Counts the frame and draws the scene. When `show` is set, the HUD label is
    /// re-rendered once the refresh interval has passed and drawn over the scene.
    pub fn update_at(&mut self, show: bool, now: Instant) {
        self.fps.count_frame();

        let visible = match &self.player {
            Some(player) => {
                let query = VisibilityQuery::from_player(
                    &player.get(),
                    self.config.render_distance,
                    self.config.frustum_culling.then_some(self.config.view_cone),
                );
                collect_visible_sub_chunks(&*self.world.get(), &query)
            }
            None => VisibleSet::default(),
        };
        self.draw_scene(&visible);
        self.last_visible = visible;

        if !show {
            return;
        }
        if let Some(fps) = self.fps.refresh(now) {
            let label = format!("{:.0} FPS {} SC", fps, self.last_visible.count());
            self.hud = Some(TextSprite::rasterize(&label, HUD_SCALE, HUD_COLOR));
        }
        if let Some(hud) = &self.hud {
            self.surface.get_mut().blit(
                hud,
                self.viewport.x + HUD_MARGIN,
                self.viewport.y + HUD_MARGIN,
            );
        }
    }

    /// Side length in pixels of one sub-chunk tile.
    fn tile_size(&self) -> u32 {
        let tiles = self.config.render_distance.saturating_mul(2).saturating_add(1);
        (self.viewport.width.min(self.viewport.height) / tiles).max(1)
    }

    fn draw_scene(&self, visible: &VisibleSet) {
        let mut surface = self.surface.get_mut();
        let viewport = self.viewport;
        surface.fill_rect(
            Rect::new(viewport.x, viewport.y, viewport.width, viewport.height),
            SKY,
        );

        let Some(origin) = visible.origin() else {
            return;
        };

        let tile = self.tile_size();
        let (cx, cy) = viewport.center();
        let half = (tile / 2) as i32;

        let mut ordered: Vec<&VisibleSubChunk> = visible.sub_chunks().iter().collect();
        ordered.sort_by_key(|sub_chunk| sub_chunk.position.y);
        for sub_chunk in ordered {
            let dx = sub_chunk.position.x - origin.x;
            let dz = sub_chunk.position.z - origin.z;
            let inset = match sub_chunk.occupancy {
                Occupancy::Full => 0,
                _ => (tile / 8) as i32,
            };
            let size = tile.saturating_sub(2 * inset as u32).max(1);
            let [r, g, b] = sub_chunk.dominant.color();
            let height = sub_chunk.position.y as f32 / (SUB_CHUNKS_PER_CHUNK - 1) as f32;

            surface.fill_rect(
                Rect::new(
                    cx - half + dx * tile as i32 + inset,
                    cy - half + dz * tile as i32 + inset,
                    size,
                    size,
                ),
                Rgba::rgb(r, g, b).shaded(0.4 + 0.6 * height),
            );
        }

        let marker = (tile / 3).max(2);
        surface.fill_rect(
            Rect::new(
                cx - (marker / 2) as i32,
                cy - (marker / 2) as i32,
                marker,
                marker,
            ),
            PLAYER_MARKER,
        );
    }
}

impl Screen for WorldScreen {
    fn kind(&self) -> &'static str {
        "world"
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn update(&mut self, show: bool) {
        self.update_at(show, Instant::now());
    }

    fn make(&self, player: &PlayerHandle) -> Box<dyn Screen> {
        let session = self.sessions.get() + 1;
        self.sessions.set(session);
        log::info!("Starting world session {}", session);

        Box::new(Self {
            viewport: self.viewport,
            surface: self.surface.clone(),
            world: self.world.clone(),
            config: self.config,
            player: Some(player.clone()),
            session,
            sessions: Cell::new(0),
            fps: FpsCounter::new(self.config.fps_refresh_interval, Instant::now()),
            hud: None,
            last_visible: VisibleSet::default(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Point2, Point3};

    use super::*;
    use crate::engine_state::{
        player::Player,
        voxels::{block::block_type::BlockType, chunk::Chunk, sub_chunk::SubChunk},
    };

    const WIDTH: u32 = 64;
    const HEIGHT: u32 = 48;

    /// One loaded column with a stone floor in sub-chunk 3.
    fn single_column_world() -> World {
        let mut world = World::new(0);
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        chunk.set_sub_chunk(3, SubChunk::solid(Point3::new(0, 3, 0), BlockType::STONE));
        world.insert_chunk(chunk);
        world
    }

    fn config() -> WorldScreenConfig {
        WorldScreenConfig {
            render_distance: 2,
            frustum_culling: false,
            view_cone: Deg(90.0),
            fps_refresh_interval: Duration::from_secs(1),
        }
    }

    fn session(player_at: Point3<f64>) -> (Box<WorldScreen>, StResource<PixelSurface>) {
        session_with(player_at, config())
    }

    fn session_with(
        player_at: Point3<f64>,
        config: WorldScreenConfig,
    ) -> (Box<WorldScreen>, StResource<PixelSurface>) {
        let surface = StResource::new(PixelSurface::new(WIDTH, HEIGHT));
        let prototype = WorldScreen::prototype(
            Viewport::new(0, 0, WIDTH, HEIGHT),
            surface.clone(),
            StResource::new(single_column_world()),
            config,
        );
        let player = StResource::new(Player::new(player_at, Deg(0.0), Deg(0.0)));
        let screen = prototype
            .make(&player)
            .into_any()
            .downcast::<WorldScreen>()
            .unwrap();
        (screen, surface)
    }

    #[test]
    fn sessions_are_numbered_per_prototype() {
        let prototype = WorldScreen::prototype(
            Viewport::new(0, 0, WIDTH, HEIGHT),
            StResource::new(PixelSurface::new(WIDTH, HEIGHT)),
            StResource::new(World::new(0)),
            config(),
        );
        let player = StResource::new(Player::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0)));

        let first = prototype.make(&player).into_any().downcast::<WorldScreen>().unwrap();
        let second = prototype.make(&player).into_any().downcast::<WorldScreen>().unwrap();

        assert_eq!(prototype.session(), 0);
        assert!(prototype.player().is_none());
        assert_eq!((first.session(), second.session()), (1, 2));
        assert!(second.player().is_some_and(|bound| bound.ptr_eq(&player)));
    }

    #[test]
    fn draws_the_floor_under_the_player() {
        let (mut screen, surface) = session(Point3::new(8.0, 72.0, 8.0));

        screen.update(false);

        assert_eq!(screen.last_visible().count(), 1);
        let surface = surface.get();
        let (cx, cy) = (WIDTH / 2, HEIGHT / 2);
        assert_eq!(surface.pixel(cx, cy), Some(PLAYER_MARKER));
        let [r, g, b] = BlockType::STONE.color();
        let floor = Rgba::rgb(r, g, b).shaded(0.4 + 0.6 * (3.0 / 15.0));
        assert_eq!(surface.pixel(cx - 4, cy - 4), Some(floor));
        assert_eq!(surface.pixel(0, 0), Some(SKY));
    }

    #[test]
    fn unloaded_position_counts_the_frame_but_draws_nothing() {
        let (mut screen, surface) = session(Point3::new(1000.0, 72.0, 8.0));

        screen.update(false);

        assert_eq!(screen.last_visible().count(), 0);
        assert_eq!(screen.fps().frames_since_refresh(), 1);
        let surface = surface.get();
        assert!((0..HEIGHT).all(|y| surface.row(y).iter().all(|pixel| *pixel == SKY)));
    }

    #[test]
    fn hud_refreshes_only_after_the_interval() {
        let (mut screen, surface) = session(Point3::new(8.0, 72.0, 8.0));
        let start = screen.fps().last_refresh();

        screen.update_at(true, start + Duration::from_millis(500));
        assert_eq!(screen.hud_text(), None);

        screen.update_at(true, start + Duration::from_millis(1000));
        assert_eq!(screen.hud_text(), Some("2 FPS 1 SC"));
        assert_eq!(surface.get().pixel(4, 4), Some(HUD_COLOR));

        screen.update_at(true, start + Duration::from_millis(1200));
        assert_eq!(screen.hud_text(), Some("2 FPS 1 SC"));
        assert_eq!(screen.fps().frames_since_refresh(), 1);
    }

    #[test]
    fn hidden_hud_is_not_drawn_or_refreshed() {
        let (mut screen, surface) = session(Point3::new(8.0, 72.0, 8.0));
        let start = screen.fps().last_refresh();

        screen.update_at(false, start + Duration::from_secs(5));

        assert_eq!(screen.hud_text(), None);
        assert_eq!(screen.fps().frames_since_refresh(), 1);
        assert_eq!(surface.get().pixel(4, 4), Some(SKY));
    }

    #[test]
    fn config_follows_settings() {
        let settings = Settings {
            render_distance: 9,
            frustum_culling: false,
            fps_refresh_interval_ms: 250,
            ..Settings::default()
        };

        let config = WorldScreenConfig::from_settings(&settings);

        assert_eq!(config.render_distance, 9);
        assert!(!config.frustum_culling);
        assert_eq!(config.fps_refresh_interval, Duration::from_millis(250));
    }

    #[test]
    fn huge_render_distance_still_draws_the_player() {
        let settings = Settings {
            render_distance: u32::MAX / 2 + 1,
            ..Settings::default()
        };
        let config = WorldScreenConfig {
            frustum_culling: false,
            ..WorldScreenConfig::from_settings(&settings)
        };
        let (mut screen, surface) = session_with(Point3::new(8.0, 72.0, 8.0), config);
        let start = screen.fps().last_refresh();

        screen.update_at(true, start + Duration::from_secs(1));

        assert_eq!(screen.last_visible().count(), 1);
        assert_eq!(screen.hud_text(), Some("1 FPS 1 SC"));
        assert_eq!(surface.get().pixel(WIDTH / 2, HEIGHT / 2), Some(PLAYER_MARKER));
    }
}
