//! # Core Module
//!
//! Single-threaded shared handles used to wire the engine together.
//!
//! ## Key Components
//! - `StResource`: reference-counted value with interior mutability
//! - `StSystem`: reference-counted boxed system, usable with trait objects
//!
//! Both are built on `Rc<RefCell<_>>`. The engine runs on one logical thread
//! driven by the host's frame loop, and these handles make that a compile-time
//! property: nothing holding one can be sent to another thread.
//!
//! ## Usage
//! ```rust
//! use voxel_mesh_engine::core::{StResource, StSystem};
//!
//! let counter = StResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! let system = StSystem::new(Box::new(42u32));
//! assert_eq!(**system.get(), 42);
//! ```

pub mod st_resource;
pub mod st_system;

pub use st_resource::StResource;
pub use st_system::StSystem;
