//! # Application State Management
//!
//! This module connects the engine state to the window, including:
//! - Window and graphics initialization
//! - Switching screens on key presses
//! - Drawing and presenting a frame on every redraw
//! - Application lifecycle events

pub mod graphics_resources_builder;
pub mod presenter;

use graphics_resources_builder::create_graphics;
use presenter::Presenter;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

use crate::engine_state::EngineState;

/// Title of the application window.
pub const WINDOW_TITLE: &str = "Cosmicland";

/// The main application state container that manages the application's lifecycle.
///
/// Holds the engine state from startup on; the presenter exists once the window and
/// graphics have been created in `resumed`.
pub struct ApplicationState {
    /// The screens, world and player
    pub engine_state: EngineState,

    /// Window and GPU resources, once created
    presenter: Option<Presenter>,
}

impl ApplicationState {
    /// Creates the application around an initialized engine state.
    pub fn new(engine_state: EngineState) -> Self {
        Self {
            engine_state,
            presenter: None,
        }
    }

    /// Handles a key press that was not a repeat.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `code` - The pressed key
    fn key_pressed(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        let result = match code {
            KeyCode::Escape => {
                event_loop.exit();
                Ok(())
            }
            KeyCode::Enter => self.engine_state.enter_world(),
            KeyCode::Backspace => {
                let start = self.engine_state.screens().start;
                self.engine_state.switch_to(start)
            }
            _ => Ok(()),
        };

        if let Err(err) = result {
            log::error!("Could not switch screens: {}", err);
        }
    }
}

impl ApplicationHandler for ApplicationState {
    /// Creates the window and graphics resources the first time the application resumes.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.presenter.is_some() {
            return;
        }

        let settings = self.engine_state.settings();
        let size = PhysicalSize::new(settings.window_width, settings.window_height);
        match create_graphics(event_loop, WINDOW_TITLE, size) {
            Ok(graphics) => {
                let size = graphics.window.inner_size();
                self.engine_state.resize(size.width, size.height);
                self.presenter = Some(Presenter::new(graphics));
            }
            Err(err) => {
                log::error!("Could not initialize graphics: {}", err);
                event_loop.exit();
            }
        }
    }

    /// Handles window-related events such as resize, redraw and key presses.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(size) => {
                self.engine_state.resize(size.width, size.height);
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.engine_state.update();
                if let Some(presenter) = &mut self.presenter {
                    presenter.present(&self.engine_state.surface().get());
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => self.key_pressed(event_loop, code),
            _ => (),
        }
    }

    /// Requests the next frame before the event loop goes to sleep.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(presenter) = &self.presenter {
            presenter.window().request_redraw();
        }
    }
}
