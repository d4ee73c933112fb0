//! The start menu: a title panel and a prompt to enter the world.

use std::any::Any;

use crate::{
    core::StResource,
    engine_state::{
        player::PlayerHandle,
        surface::{PixelSurface, Rect, Rgba, TextSprite},
    },
};

use super::{Screen, Viewport};

const BACKGROUND: Rgba = Rgba::rgb(18, 22, 38);
const PANEL: Rgba = Rgba::rgb(34, 42, 70);
const BORDER: Rgba = Rgba::rgb(120, 140, 200);
const TITLE_COLOR: Rgba = Rgba::rgb(240, 210, 120);

/// Game title drawn on the panel.
pub const TITLE: &str = "COSMICLAND";
/// Prompt drawn below the title.
pub const PROMPT: &str = "PRESS ENTER TO PLAY";

/// The menu shown before entering the world.
pub struct StartScreen {
    viewport: Viewport,
    surface: StResource<PixelSurface>,
    title: TextSprite,
    prompt: TextSprite,
}

impl StartScreen {
    /// Creates a start screen drawing into `viewport` of `surface`.
    pub fn new(viewport: Viewport, surface: StResource<PixelSurface>) -> Self {
        let scale = (viewport.width / 160).max(1);
        Self {
            viewport,
            surface,
            title: TextSprite::rasterize(TITLE, scale * 3, TITLE_COLOR),
            prompt: TextSprite::rasterize(PROMPT, scale, Rgba::WHITE),
        }
    }

    fn panel(&self) -> Rect {
        let width = (self.title.width().max(self.prompt.width()) + 32).min(self.viewport.width);
        let height = (self.title.height() + self.prompt.height() + 48).min(self.viewport.height);
        let (cx, cy) = self.viewport.center();
        Rect::new(cx - (width / 2) as i32, cy - (height / 2) as i32, width, height)
    }
}

impl Screen for StartScreen {
    fn kind(&self) -> &'static str {
        "start"
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        *self = StartScreen::new(viewport, self.surface.clone());
    }

    fn update(&mut self, _show: bool) {
        let panel = self.panel();
        let (cx, _) = self.viewport.center();
        let mut surface = self.surface.get_mut();

        surface.fill_rect(
            Rect::new(
                self.viewport.x,
                self.viewport.y,
                self.viewport.width,
                self.viewport.height,
            ),
            BACKGROUND,
        );
        surface.fill_rect(panel, PANEL);
        surface.stroke_rect(panel, BORDER);

        let title_y = panel.y + 16;
        surface.blit(&self.title, cx - (self.title.width() / 2) as i32, title_y);
        surface.blit(
            &self.prompt,
            cx - (self.prompt.width() / 2) as i32,
            title_y + self.title.height() as i32 + 16,
        );
    }

    fn make(&self, _player: &PlayerHandle) -> Box<dyn Screen> {
        Box::new(StartScreen::new(self.viewport, self.surface.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
