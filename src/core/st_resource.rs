use std::{
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::Rc,
};

/// A single-threaded, reference-counted handle to a value owned outside of its borrowers.
///
/// `StResource` is how screens hold on to things they draw with or read from without
/// owning them: the pixel surface, the voxel world and the player context. Cloning the
/// handle shares the same underlying value.
///
/// # Examples
///
/// ```
/// use cosmicland_client::core::StResource;
///
/// let counter = StResource::new(0);
/// let shared = counter.clone();
///
/// *shared.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// assert!(counter.ptr_eq(&shared));
/// ```
///
/// # Panics
/// - `get` panics if the value is currently mutably borrowed
/// - `get_mut` panics if the value is currently borrowed
pub struct StResource<T> {
    resource: Rc<RefCell<T>>,
}

impl<T> StResource<T> {
    /// Creates a new `StResource` containing the given value.
    ///
    /// # Arguments
    /// * `resource` - The value to be shared
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RefCell::new(resource)),
        }
    }

    /// Returns a guard that allows reading the contained value.
    pub fn get(&self) -> Ref<'_, T> {
        self.resource.borrow()
    }

    /// Returns a guard that allows modifying the contained value.
    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.resource.borrow_mut()
    }

    /// Returns `true` if both handles point at the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resource.try_borrow() {
            Ok(value) => f.debug_tuple("StResource").field(&*value).finish(),
            Err(_) => f.write_str("StResource(<borrowed>)"),
        }
    }
}
