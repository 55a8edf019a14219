//! # Block Module
//!
//! Voxel values and the faces a voxel can expose.
//!
//! A voxel is stored as a single small integer: `0` is air, anything else is a
//! material id. The material id travels through meshing as a vertex color and
//! is turned into a material index by the texture applier.

pub mod block_side;

/// The underlying integer type used to represent a voxel in memory.
pub type VoxelValue = u8;

/// The empty voxel.
pub const AIR: VoxelValue = 0;

/// Returns `true` for every non-air voxel.
#[inline]
pub fn is_solid(value: VoxelValue) -> bool {
    value != AIR
}
