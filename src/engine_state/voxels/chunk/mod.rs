//! # Chunk Module
//!
//! This module provides the `VoxelChunk` struct: a cubic grid of voxel values
//! that is the unit of mesh regeneration.
//!
//! ## Storage
//!
//! Voxels are kept in a flat array indexed `x + y * size + z * size * size`,
//! which is the flat voxel index callers pass to `get`/`set`. Alongside it a
//! bit vector records which cells are solid. The mask is kept in sync on every
//! write, so the mesher can skip empty chunks and count solid voxels without
//! scanning the value array.
//!
//! ### Performance Characteristics
//! - **Read/Write**: O(1)
//! - **Emptiness check**: one pass over the bit mask, 1 bit per voxel
//! - **Memory Usage**: 1 byte + 1 bit per voxel

use bitvec::prelude::BitVec;
use cgmath::Point3;

use super::block::{is_solid, VoxelValue, AIR};

pub mod coord;
pub mod generation;

pub use coord::ChunkCoord;

/// A cubic grid of voxels, `size` voxels along each edge.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelChunk {
    /// Voxels per edge.
    size: usize,

    /// Voxel values in `x`, then `y`, then `z` order.
    voxels: Vec<VoxelValue>,

    /// One bit per voxel, set where the voxel is solid.
    solid_array: BitVec,
}

impl VoxelChunk {
    /// Creates a chunk with every voxel set to air.
    ///
    /// # Arguments
    /// * `size` - Voxels along each edge
    pub fn empty(size: usize) -> Self {
        let volume = size * size * size;
        VoxelChunk {
            size,
            voxels: vec![AIR; volume],
            solid_array: BitVec::repeat(false, volume),
        }
    }

    /// Creates a chunk from a flat voxel array.
    ///
    /// # Panics
    /// Panics if `voxels.len()` is not `size³`.
    pub fn from_voxels(size: usize, voxels: Vec<VoxelValue>) -> Self {
        assert_eq!(
            voxels.len(),
            size * size * size,
            "a chunk of size {size} needs {} voxels",
            size * size * size
        );
        let solid_array = voxels.iter().map(|v| is_solid(*v)).collect();
        VoxelChunk {
            size,
            voxels,
            solid_array,
        }
    }

    /// Voxels along each edge.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of voxels in the chunk.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// `true` when no voxel in the chunk is solid.
    pub fn is_empty(&self) -> bool {
        self.solid_array.not_any()
    }

    /// Number of solid voxels.
    pub fn solid_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// The flat voxel array.
    pub fn voxels(&self) -> &[VoxelValue] {
        &self.voxels
    }

    /// Flat index of a chunk-local position.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.size * y + self.size * self.size * z
    }

    /// Chunk-local position of a flat index.
    pub fn position(&self, index: usize) -> Point3<usize> {
        let plane = self.size * self.size;
        Point3::new(index % self.size, (index / self.size) % self.size, index / plane)
    }

    /// Reads the voxel at a flat index.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    #[inline]
    pub fn get(&self, index: usize) -> VoxelValue {
        self.voxels[index]
    }

    /// Reads the voxel at chunk-local coordinates.
    #[inline]
    pub fn get_at(&self, x: usize, y: usize, z: usize) -> VoxelValue {
        self.voxels[self.index(x, y, z)]
    }

    /// Writes the voxel at a flat index and returns the previous value.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set(&mut self, index: usize, value: VoxelValue) -> VoxelValue {
        let previous = std::mem::replace(&mut self.voxels[index], value);
        self.solid_array.set(index, is_solid(value));
        previous
    }

    /// Writes the voxel at chunk-local coordinates and returns the previous value.
    pub fn set_at(&mut self, x: usize, y: usize, z: usize, value: VoxelValue) -> VoxelValue {
        let index = self.index(x, y, z);
        self.set(index, value)
    }

    /// Checks if the voxel at chunk-local coordinates is solid.
    #[inline]
    pub fn is_block_solid(&self, x: usize, y: usize, z: usize) -> bool {
        self.solid_array[self.index(x, y, z)]
    }
}
