use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded container for a boxed, possibly unsized system.
///
/// `StSystem` holds the engine's pluggable capabilities (texture applier,
/// renderable factory) behind trait objects. The container uses
/// `Rc<RefCell<Box<T>>>` internally, so clones share one system and the
/// system can be swapped at runtime through `get_mut`.
///
/// # Examples
///
/// ```rust
/// use voxel_mesh_engine::core::StSystem;
///
/// trait Greeter {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// let system: StSystem<dyn Greeter> = StSystem::new(Box::new(English));
/// assert_eq!(system.get().greet(), "hello");
/// ```
///
/// # Panics
/// - Panics if a borrow is held while trying to mutably borrow
/// - Panics if a mutable borrow is held while trying to borrow
pub struct StSystem<T: ?Sized> {
    pub system: Rc<RefCell<Box<T>>>,
}

impl<T: ?Sized> StSystem<T> {
    /// Creates a new `StSystem` containing the given boxed system.
    pub fn new(system: Box<T>) -> Self {
        Self {
            system: Rc::new(RefCell::new(system)),
        }
    }

    /// Returns an immutable reference to the contained system.
    pub fn get(&self) -> Ref<'_, Box<T>> {
        self.system.borrow()
    }

    /// Returns a mutable reference to the contained system.
    pub fn get_mut(&self) -> RefMut<'_, Box<T>> {
        self.system.borrow_mut()
    }
}

impl<T: ?Sized> Clone for StSystem<T> {
    fn clone(&self) -> Self {
        Self {
            system: self.system.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Counter {
        fn count(&self) -> u32;
    }

    struct Fixed(u32);

    impl Counter for Fixed {
        fn count(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn swapping_the_system_is_seen_by_clones() {
        let system: StSystem<dyn Counter> = StSystem::new(Box::new(Fixed(1)));
        let clone = system.clone();

        *system.get_mut() = Box::new(Fixed(7));

        assert_eq!(clone.get().count(), 7);
    }
}
