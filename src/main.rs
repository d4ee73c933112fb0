//! # Cosmicland Client Entry Point
//!
//! Calls into the library's `run()` function to start the client.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    cosmicland_client::run();
}
