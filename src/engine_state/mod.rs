//! # Engine State Module
//!
//! The platform-independent half of the client: everything that decides what ends up on
//! the pixel surface, with no knowledge of windows or GPUs.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the screen registry, the shared resources and the active screen
//! * `screens` - The screen contract, the registry and the built-in screens
//! * `voxels` - Blocks, sub-chunks, chunk columns and the generated world
//! * `player` - The player context screens are bound to
//! * `surface` - The RGBA buffer screens draw into
//! * `resource_location` - Namespaced screen names
//!
//! ## Architecture
//!
//! `EngineState` is built once at startup. It generates the world around spawn, places
//! the player on the terrain, registers the built-in screen prototypes and activates the
//! start screen. From then on the application shell calls [`EngineState::update`] once
//! per frame and presents [`EngineState::surface`].

use cgmath::{Deg, Point2, Point3};

use crate::{core::StResource, settings::Settings};

pub mod player;
pub mod resource_location;
pub mod screens;
pub mod surface;
pub mod voxels;

use player::{Player, PlayerHandle};
use screens::{
    init_screens, make_new_screen, Screen, ScreenContext, ScreenError, ScreenId, ScreenRegistry,
    Screens, Viewport, WorldScreen, WorldScreenConfig,
};
use surface::PixelSurface;
use voxels::{
    sub_chunk::SUB_CHUNK_DIMENSION,
    world::{World, BASE_HEIGHT},
};

/// Height of the player's eye above the block they stand on.
const EYE_HEIGHT: f64 = 1.62;
/// Column the player spawns in, in world block coordinates.
const SPAWN_X: i32 = 8;
const SPAWN_Z: i32 = 8;

/// The main state container of the client.
///
/// # Examples
///
/// ```
/// use cosmicland_client::{engine_state::EngineState, settings::Settings};
///
/// let settings = Settings {
///     world_radius: 0,
///     window_width: 64,
///     window_height: 48,
///     ..Settings::default()
/// };
/// let mut engine_state = EngineState::new(settings).unwrap();
///
/// engine_state.enter_world().unwrap();
/// engine_state.update();
/// assert_eq!(engine_state.active_screen().kind(), "world");
/// ```
pub struct EngineState {
    settings: Settings,
    registry: ScreenRegistry,
    screens: Screens,
    viewport: Viewport,
    surface: StResource<PixelSurface>,
    world: StResource<World>,
    player: PlayerHandle,
    active: Box<dyn Screen>,
    active_id: ScreenId,
}

impl EngineState {
    /// Creates the engine state and activates the start screen.
    ///
    /// # Arguments
    /// * `settings` - Client configuration
    ///
    /// # Errors
    /// Any registration error raised while registering the built-in screens, such as
    /// `RegistryFull` when `max_screens` is too small
    pub fn new(settings: Settings) -> Result<Self, ScreenError> {
        let mut world = World::new(settings.world_seed);
        let spawn_chunk = Point2::new(
            SPAWN_X.div_euclid(SUB_CHUNK_DIMENSION),
            SPAWN_Z.div_euclid(SUB_CHUNK_DIMENSION),
        );
        world.load_around(spawn_chunk, settings.world_radius.max(0));

        let ground = world.surface_height(SPAWN_X, SPAWN_Z).unwrap_or(BASE_HEIGHT);
        let player = StResource::new(Player::new(
            Point3::new(
                SPAWN_X as f64 + 0.5,
                ground as f64 + EYE_HEIGHT,
                SPAWN_Z as f64 + 0.5,
            ),
            Deg(0.0),
            Deg(-20.0),
        ));
        log::info!(
            "Player spawned at {:?} in sub-chunk {:?}",
            player.get().position,
            player.get().sub_chunk_position()
        );

        let viewport = Viewport::new(0, 0, settings.window_width, settings.window_height);
        let surface = StResource::new(PixelSurface::new(
            settings.window_width,
            settings.window_height,
        ));
        let world = StResource::new(world);

        let mut registry = ScreenRegistry::new(settings.max_screens);
        let screens = init_screens(
            &mut registry,
            ScreenContext {
                viewport,
                surface: surface.clone(),
                world: world.clone(),
                world_config: WorldScreenConfig::from_settings(&settings),
            },
        )?;
        let active = registry.get(screens.start)?.make(&player);

        Ok(Self {
            settings,
            registry,
            screens,
            viewport,
            surface,
            world,
            player,
            active,
            active_id: screens.start,
        })
    }

    /// Draws one frame of the active screen.
    pub fn update(&mut self) {
        self.active.update(self.settings.show_fps);
    }

    /// Starts a new world session and makes it the active screen.
    pub fn enter_world(&mut self) -> Result<(), ScreenError> {
        let mut screen =
            make_new_screen::<WorldScreen>(&self.registry, self.screens.world, &self.player)?;
        screen.set_viewport(self.viewport);
        log::info!("Entering world session {}", screen.session());
        self.active = screen;
        self.active_id = self.screens.world;
        Ok(())
    }

    /// Replaces the active screen with a new instance of the screen registered under `id`.
    ///
    /// The active screen is left untouched if `id` is unknown.
    pub fn switch_to(&mut self, id: ScreenId) -> Result<(), ScreenError> {
        let mut screen = self.registry.get(id)?.make(&self.player);
        screen.set_viewport(self.viewport);
        log::info!("Switching from {} to {} screen", self.active.kind(), screen.kind());
        self.active = screen;
        self.active_id = id;
        Ok(())
    }

    /// Resizes the pixel surface and the active screen's viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Viewport::new(0, 0, width, height);
        self.surface.get_mut().resize(width, height);
        self.active.set_viewport(self.viewport);
    }

    /// The client configuration.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The screen registry.
    pub fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    /// Ids of the built-in screens.
    pub fn screens(&self) -> Screens {
        self.screens
    }

    /// The screen drawn by [`EngineState::update`].
    pub fn active_screen(&self) -> &dyn Screen {
        self.active.as_ref()
    }

    /// Registry id of the active screen.
    pub fn active_id(&self) -> ScreenId {
        self.active_id
    }

    /// The surface screens draw into.
    pub fn surface(&self) -> &StResource<PixelSurface> {
        &self.surface
    }

    /// The loaded world.
    pub fn world(&self) -> &StResource<World> {
        &self.world
    }

    /// The player context.
    pub fn player(&self) -> &PlayerHandle {
        &self.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            world_radius: 1,
            window_width: 64,
            window_height: 48,
            ..Settings::default()
        }
    }

    #[test]
    fn starts_on_the_start_screen_with_the_player_above_ground() {
        let state = EngineState::new(settings()).unwrap();

        assert_eq!(state.active_id(), state.screens().start);
        assert_eq!(state.active_screen().kind(), "start");
        assert_eq!(state.registry().len(), 2);
        assert_eq!(state.world().get().chunk_count(), 9);

        let position = state.player().get().position;
        let ground = state.world().get().surface_height(SPAWN_X, SPAWN_Z).unwrap();
        assert!(position.y > ground as f64);
    }

    #[test]
    fn switches_between_screens() {
        let mut state = EngineState::new(settings()).unwrap();

        state.enter_world().unwrap();
        state.update();
        assert_eq!(state.active_id(), state.screens().world);
        assert_eq!(state.active_screen().kind(), "world");

        state.switch_to(state.screens().start).unwrap();
        assert_eq!(state.active_screen().kind(), "start");
    }

    #[test]
    fn unknown_screen_keeps_the_active_one() {
        let mut state = EngineState::new(settings()).unwrap();

        assert_eq!(
            state.switch_to(ScreenId::new(5)).err(),
            Some(ScreenError::UnknownScreenId(ScreenId::new(5)))
        );
        assert_eq!(state.active_id(), state.screens().start);
    }

    #[test]
    fn resize_reaches_the_active_screen() {
        let mut state = EngineState::new(settings()).unwrap();
        state.enter_world().unwrap();

        state.resize(100, 80);
        state.update();

        assert_eq!(state.active_screen().viewport(), Viewport::new(0, 0, 100, 80));
        assert_eq!(state.surface().get().width(), 100);

        state.resize(0, 80);
        assert_eq!(state.surface().get().width(), 100);
    }

    #[test]
    fn too_small_registry_fails_startup() {
        let settings = Settings {
            max_screens: 1,
            ..settings()
        };

        assert!(matches!(
            EngineState::new(settings),
            Err(ScreenError::RegistryFull { capacity: 1 })
        ));
    }
}
