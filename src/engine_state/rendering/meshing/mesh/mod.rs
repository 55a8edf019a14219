//! Mesh generation for voxel chunks.
//!
//! This module converts chunk voxel data into triangle geometry. It implements
//! greedy meshing to reduce the number of faces by combining coplanar faces
//! that show the same voxel value.
//!
//! # Architecture
//! - [`Mesh`]: geometry of one chunk version plus the scale it was built at
//! - [`Geometry`]: vertex and index buffers with per-face metadata
//! - [`Face`]: one merged quad produced by the greedy pass
//!
//! # Usage
//! ```
//! use voxel_mesh_engine::engine_state::rendering::meshing::Mesh;
//! use voxel_mesh_engine::engine_state::voxels::chunk::VoxelChunk;
//!
//! let mut chunk = VoxelChunk::empty(32);
//! chunk.set(0, 1);
//! let mesh = Mesh::greedy(&chunk, 25.0);
//! assert_eq!(mesh.geometry.face_count(), 6);
//! ```

mod face;
mod greedy;
mod mesh;

pub use face::Face;
pub use greedy::greedy;
pub use mesh::*;
