#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Cosmicland Client
//!
//! Screen management and sub-chunk visibility for a block-world game client.
//!
//! ## Key Modules
//!
//! * `application_state` - Window, GPU presentation and the event loop handler
//! * `core` - Shared-ownership handles used throughout the client
//! * `engine_state` - Screens, the screen registry, the voxel world and the player
//! * `settings` - Client configuration loaded at startup
//!
//! ## Architecture
//!
//! The client keeps a clear separation between:
//! * Platform code (window, surface, GPU upload) in `application_state`
//! * Everything that decides what is drawn, in `engine_state`, which runs headless
//!
//! Screens draw into a CPU pixel surface; the application shell uploads that surface to
//! the window once per frame.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     cosmicland_client::run();
//! }
//! ```

use application_state::ApplicationState;
use engine_state::EngineState;
use log::{error, info};
use settings::Settings;
use winit::event_loop::{ControlFlow, EventLoop};

pub mod application_state;
pub mod core;
pub mod engine_state;
pub mod settings;

/// Starts the client and blocks until the window is closed.
///
/// Logging is configured from `RUST_LOG`, settings from `$COSMICLAND_SETTINGS` or
/// `settings.json`. Startup failures are logged.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let settings = Settings::load_or_default();
    let engine_state = match EngineState::new(settings) {
        Ok(engine_state) => engine_state,
        Err(err) => {
            error!("Could not initialize screens: {}", err);
            return;
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!("Could not create event loop: {}", err);
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut state = ApplicationState::new(engine_state);
    if let Err(err) = event_loop.run_app(&mut state) {
        error!("Event loop exited with an error: {}", err);
    }
}
