//! Rendering side of the voxel engine.
//!
//! This module contains everything between voxel data and what a renderer
//! draws: the chunk mesh lifecycle, the in-memory scene graph meshes are
//! attached to, texture assignment and the vertex layout.
//!
//! No GPU work happens here. A renderer walks the [`scene::SceneGraph`] and
//! uploads the renderables it finds.

pub mod meshing;
pub mod scene;
pub mod texture;
mod vertex;

// Re-export commonly used types
pub use meshing::MeshManager;
pub use scene::{NodeId, SceneGraph, Transform};
pub use vertex::Vertex;
