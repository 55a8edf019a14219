use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded, reference-counted resource with interior mutability.
///
/// `StResource` is how engine-wide state (the scene graph, the reverse index)
/// is shared between the world registry and every detached group. It wraps an
/// `Rc<RefCell<T>>`, so it is neither `Send` nor `Sync`: a resource, and
/// anything holding one, stays on the thread that created it.
///
/// # Examples
///
/// ```
/// use voxel_mesh_engine::core::StResource;
///
/// let counter = StResource::new(0);
/// let clone = counter.clone();
///
/// *clone.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// # Panics
/// - `get` panics if the value is currently mutably borrowed
/// - `get_mut` panics if the value is currently borrowed
pub struct StResource<T> {
    pub resource: Rc<RefCell<T>>,
}

impl<T> StResource<T> {
    /// Creates a new `StResource` containing the given value.
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

    /// Returns `true` if both handles point at the same resource.
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
