//! Namespaced identifiers of the form `namespace:path`.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Namespace assumed when an identifier has no `namespace:` prefix.
pub const DEFAULT_NAMESPACE: &str = "cosmicland";

/// Errors raised while parsing a [`ResourceLocation`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocationError {
    /// The namespace part is empty, as in `:start`.
    #[error("resource location `{0}` has an empty namespace")]
    EmptyNamespace(String),

    /// The path part is empty, as in `cosmicland:`.
    #[error("resource location `{0}` has an empty path")]
    EmptyPath(String),

    /// More than one `:` separator.
    #[error("resource location `{0}` has more than one `:`")]
    TooManySeparators(String),

    /// A character outside `[a-z0-9_.-]` (plus `/` in paths).
    #[error("resource location `{location}` contains invalid character {character:?}")]
    InvalidCharacter {
        /// The full identifier
        location: String,
        /// The offending character
        character: char,
    },
}

/// A namespaced identifier such as `cosmicland:world`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    namespace: String,
    path: String,
}

fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl ResourceLocation {
    /// Creates an identifier from its two parts, validating both.
    pub fn new(namespace: &str, path: &str) -> Result<Self, ResourceLocationError> {
        let location = format!("{}:{}", namespace, path);
        if namespace.is_empty() {
            return Err(ResourceLocationError::EmptyNamespace(location));
        }
        if path.is_empty() {
            return Err(ResourceLocationError::EmptyPath(location));
        }
        let invalid = namespace
            .chars()
            .find(|c| !is_namespace_char(*c))
            .or_else(|| path.chars().find(|c| !is_path_char(*c)));
        if let Some(character) = invalid {
            return Err(ResourceLocationError::InvalidCharacter {
                location,
                character,
            });
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// The namespace part.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The path part.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl FromStr for ResourceLocation {
    type Err = ResourceLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(path), None, _) => Self::new(DEFAULT_NAMESPACE, path),
            (Some(namespace), Some(path), None) => Self::new(namespace, path),
            _ => Err(ResourceLocationError::TooManySeparators(s.to_string())),
        }
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}
