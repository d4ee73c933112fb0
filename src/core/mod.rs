//! # Core Module
//!
//! Shared-ownership primitives used throughout the client.
//!
//! Everything in the client runs on the game-loop thread, so the only handle type is the
//! single-threaded [`StResource`]. Screens receive clones of these handles at construction
//! and keep them for their whole lifetime; the values themselves belong to the
//! application shell.
//!
//! ## Usage
//! ```rust
//! use cosmicland_client::core::StResource;
//!
//! let surface_width = StResource::new(854u32);
//! let borrowed = surface_width.clone();
//! assert_eq!(*borrowed.get(), 854);
//! ```

pub mod st_resource;

pub use st_resource::StResource;
