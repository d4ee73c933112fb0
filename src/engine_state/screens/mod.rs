//! # Screens
//!
//! Full-viewport UI and game modes, and the registry that owns their prototypes.
//!
//! ## Key Components
//!
//! * [`Screen`] - The contract every screen satisfies: draw one frame, and construct a
//!   fresh per-session instance bound to a player
//! * [`ScreenRegistry`] - Fixed-capacity table of screen prototypes by id and by name
//! * [`make_new_screen`] - Constructs a screen from its id, checked against the caller's
//!   expected concrete type
//! * [`StartScreen`] / [`WorldScreen`] - The two built-in screens
//!
//! ## Lifecycle
//!
//! [`init_screens`] registers one prototype per built-in screen during startup. Prototypes
//! are never drawn; the engine asks the registry for a prototype and calls
//! [`Screen::make`] on it whenever a screen becomes active.

use std::any::{type_name, Any};

use crate::{
    core::StResource,
    engine_state::{
        player::PlayerHandle,
        resource_location::{ResourceLocation, DEFAULT_NAMESPACE},
        surface::PixelSurface,
        voxels::world::World,
    },
};

pub mod error;
pub mod registry;
pub mod start_screen;
pub mod world_screen;

pub use error::ScreenError;
pub use registry::{ScreenId, ScreenRegistry};
pub use start_screen::StartScreen;
pub use world_screen::{WorldScreen, WorldScreenConfig};

/// Registered name of the start menu.
pub const START_SCREEN_PATH: &str = "start";
/// Registered name of the in-world screen.
pub const WORLD_SCREEN_PATH: &str = "world";

/// The area of the surface a screen draws into, in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Viewport {
    /// Creates a new viewport.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal and vertical center of the viewport.
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }
}

/// A renderable UI or game mode.
///
/// Implementors borrow the drawing surface through an [`StResource`] handle; they never own
/// or resize it.
pub trait Screen: Any {
    /// Short human-readable name of the concrete screen type, for logs and errors.
    fn kind(&self) -> &'static str;

    /// The area this screen draws into.
    fn viewport(&self) -> Viewport;

    /// Moves or resizes the area this screen draws into.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Draws one frame.
    ///
    /// # Arguments
    /// * `show` - Whether overlays such as the FPS label should be displayed
    fn update(&mut self, show: bool);

    /// Constructs a fresh instance of this screen bound to `player`.
    ///
    /// Called on registered prototypes only. The new instance shares the prototype's
    /// surface and viewport but none of its per-session state.
    fn make(&self, player: &PlayerHandle) -> Box<dyn Screen>;

    /// Upcast used for type checks.
    fn as_any(&self) -> &dyn Any;

    /// Upcast used to recover the concrete type of a boxed screen.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Constructs a new screen from the prototype registered under `id`.
///
/// # Arguments
/// * `registry` - Registry holding the prototype
/// * `id` - Id of the prototype
/// * `player` - Player the new screen is bound to
///
/// # Returns
/// The freshly constructed screen, as the concrete type `T`
///
/// # Errors
/// - `UnknownScreenId` if nothing is registered under `id`
/// - `BadScreenType` if the prototype is not a `T`
///
/// # Example
/// ```rust,ignore
/// let world: Box<WorldScreen> = make_new_screen(&registry, screens.world, &player)?;
/// ```
pub fn make_new_screen<T: Screen>(
    registry: &ScreenRegistry,
    id: ScreenId,
    player: &PlayerHandle,
) -> Result<Box<T>, ScreenError> {
    let prototype = registry.get(id)?;
    let bad_type = || ScreenError::BadScreenType {
        id,
        expected: type_name::<T>(),
        found: prototype.kind(),
    };
    if !prototype.as_any().is::<T>() {
        return Err(bad_type());
    }

    log::debug!("Constructing {} screen {}", prototype.kind(), id);
    prototype
        .make(player)
        .into_any()
        .downcast::<T>()
        .map_err(|_| bad_type())
}

/// Ids of the built-in screens, assigned by [`init_screens`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Screens {
    /// The start menu
    pub start: ScreenId,
    /// The in-world screen
    pub world: ScreenId,
}

/// Everything the built-in screen prototypes are created with.
#[derive(Clone)]
pub struct ScreenContext {
    /// Area of the surface the screens draw into
    pub viewport: Viewport,
    /// The surface the screens draw into
    pub surface: StResource<PixelSurface>,
    /// The world the in-world screen draws
    pub world: StResource<World>,
    /// In-world screen parameters
    pub world_config: WorldScreenConfig,
}

/// Registers the built-in screen prototypes.
///
/// Must run exactly once per registry, before any screen is requested from it.
///
/// # Returns
/// The ids the built-in screens were registered under
pub fn init_screens(
    registry: &mut ScreenRegistry,
    context: ScreenContext,
) -> Result<Screens, ScreenError> {
    let start = registry.register(
        ResourceLocation::new(DEFAULT_NAMESPACE, START_SCREEN_PATH)?,
        Box::new(StartScreen::new(context.viewport, context.surface.clone())),
    )?;
    let world = registry.register(
        ResourceLocation::new(DEFAULT_NAMESPACE, WORLD_SCREEN_PATH)?,
        Box::new(WorldScreen::prototype(
            context.viewport,
            context.surface,
            context.world,
            context.world_config,
        )),
    )?;

    Ok(Screens { start, world })
}
