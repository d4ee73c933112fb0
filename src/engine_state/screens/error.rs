//! # Screen Error Types
//!
//! Everything that can go wrong while registering, looking up or constructing screens.
//! None of these are expected once startup has succeeded; they all indicate a
//! misconfigured registration table or a caller asking for the wrong screen type.

use thiserror::Error;

use crate::engine_state::resource_location::ResourceLocationError;

use super::registry::ScreenId;

/// Errors raised by the screen registry and the screen factory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// A screen is already registered under this name or id.
    #[error("screen registry is ambiguous: `{name}` is already registered")]
    AmbiguousRegistration {
        /// The name that was registered twice
        name: String,
    },

    /// The registry has no free slot left.
    #[error("screen registry is full: capacity {capacity}")]
    RegistryFull {
        /// Configured capacity of the registry
        capacity: usize,
    },

    /// No screen is registered under this id.
    #[error("unknown screen id {0}")]
    UnknownScreenId(ScreenId),

    /// No screen is registered under this name.
    #[error("unknown screen name `{0}`")]
    UnknownScreenName(String),

    /// The screen registered under `id` is not of the requested type.
    #[error("bad screen type: screen {id} is a {found}, not a {expected}")]
    BadScreenType {
        /// The id that was looked up
        id: ScreenId,
        /// The type the caller asked for
        expected: &'static str,
        /// The type actually registered
        found: &'static str,
    },

    /// A screen name is not a valid resource location.
    #[error(transparent)]
    InvalidName(#[from] ResourceLocationError),
}
