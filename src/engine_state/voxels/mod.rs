//! # Voxel Data
//!
//! This module contains the voxel side of the engine: individual voxel values,
//! fixed-size chunks of them, and the world-anchored registry that keeps every
//! world chunk meshed.
//!
//! ## Architecture
//!
//! * **Block**: voxel values and the six sides of a cube
//! * **Chunk**: fixed-size 3D arrays of voxels, their coordinates and generators
//! * **World**: the world grid of chunks and their meshes
//!
//! ## Data Flow
//!
//! 1. The world receives a request to read or write a voxel at a world position
//! 2. The position is resolved to a chunk coordinate and a voxel index
//! 3. Writes create the chunk if needed and rebuild its mesh immediately

pub mod block;
pub mod chunk;
pub mod world;
