//! # Screen Registry
//!
//! A fixed-capacity table of screen prototypes, addressable both by a dense integer
//! [`ScreenId`] and by a namespaced [`ResourceLocation`] name.
//!
//! The registry is filled once during startup and only read afterwards. Entries are never
//! removed, so an id stays valid for the lifetime of the registry.
//!
//! ## Invariants
//! - every occupied slot has exactly one name pointing at it, and every name points at an
//!   occupied slot
//! - ids are handed out densely from zero in registration order
//! - a failed registration leaves the registry unchanged

use std::{collections::HashMap, fmt};

use crate::engine_state::resource_location::ResourceLocation;

use super::{error::ScreenError, Screen};

/// Dense identifier of a registered screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(usize);

impl ScreenId {
    /// Wraps a raw slot index.
    pub const fn new(index: usize) -> Self {
        ScreenId(index)
    }

    /// The slot index of this id.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Maps screen ids and names to registered screen prototypes.
pub struct ScreenRegistry {
    /// One slot per possible id; `None` for ids not yet handed out.
    screens: Box<[Option<Box<dyn Screen>>]>,
    /// Name to id mapping, kept in step with `screens`.
    names: HashMap<ResourceLocation, ScreenId>,
    /// Number of occupied slots, which is also the next id to hand out.
    present: usize,
}

impl ScreenRegistry {
    /// Creates an empty registry with room for `capacity` screens.
    pub fn new(capacity: usize) -> Self {
        Self {
            screens: (0..capacity).map(|_| None).collect(),
            names: HashMap::with_capacity(capacity),
            present: 0,
        }
    }

    /// Registers `screen` as the prototype for `name`.
    ///
    /// # Arguments
    /// * `name` - Unique name of the screen
    /// * `screen` - The prototype; it is only ever used to construct new instances
    ///
    /// # Returns
    /// The id assigned to the screen
    ///
    /// # Errors
    /// - `AmbiguousRegistration` if `name` is already registered
    /// - `RegistryFull` if every slot is taken
    pub fn register(
        &mut self,
        name: ResourceLocation,
        screen: Box<dyn Screen>,
    ) -> Result<ScreenId, ScreenError> {
        if self.names.contains_key(&name) {
            return Err(ScreenError::AmbiguousRegistration {
                name: name.to_string(),
            });
        }
        if self.present >= self.screens.len() {
            return Err(ScreenError::RegistryFull {
                capacity: self.screens.len(),
            });
        }

        let id = ScreenId(self.present);
        let slot = &mut self.screens[id.index()];
        debug_assert!(slot.is_none(), "slots past `present` are never filled");

        log::info!("Registered {} screen `{}` as {}", screen.kind(), name, id);
        *slot = Some(screen);
        self.names.insert(name, id);
        self.present += 1;

        Ok(id)
    }

    /// Gets the prototype registered under `id`.
    ///
    /// # Errors
    /// `UnknownScreenId` if no screen has been registered under `id`
    pub fn get(&self, id: ScreenId) -> Result<&dyn Screen, ScreenError> {
        self.screens
            .get(id.index())
            .and_then(|slot| slot.as_deref())
            .ok_or(ScreenError::UnknownScreenId(id))
    }

    /// Gets the prototype registered under `name`.
    ///
    /// # Errors
    /// `UnknownScreenName` if no screen has been registered under `name`
    pub fn get_by_name(&self, name: &ResourceLocation) -> Result<&dyn Screen, ScreenError> {
        self.get(self.id_of(name)?)
    }

    /// Resolves `name` to its id.
    ///
    /// # Errors
    /// `UnknownScreenName` if no screen has been registered under `name`
    pub fn id_of(&self, name: &ResourceLocation) -> Result<ScreenId, ScreenError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| ScreenError::UnknownScreenName(name.to_string()))
    }

    /// Number of registered screens.
    pub fn len(&self) -> usize {
        self.present
    }

    /// Returns `true` if nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.present == 0
    }

    /// Maximum number of screens this registry can hold.
    pub fn capacity(&self) -> usize {
        self.screens.len()
    }

    /// Iterates over `(name, id)` pairs in no particular order.
    pub fn names(&self) -> impl Iterator<Item = (&ResourceLocation, ScreenId)> + '_ {
        self.names.iter().map(|(name, id)| (name, *id))
    }
}
