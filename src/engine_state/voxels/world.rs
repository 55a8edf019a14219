//! # World Module
//!
//! This module provides the `ChunkMeshRegistry`, which owns every chunk of the
//! world grid together with its mesh. It is the world-anchored counterpart of
//! a detached group: the same mesh lifecycle, with meshes attached directly to
//! the scene root at `coord * chunk_world_size`.
//!
//! ## Coordinates
//!
//! A world position resolves to a chunk by floor division with the chunk's
//! world-space edge length, and to a voxel inside that chunk by floor division
//! with the cube size, wrapped into `0..chunk_size`.
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map
//! - Chunks are only generated within `chunk_distance` of a requested origin
//! - A voxel write rebuilds exactly one chunk mesh

use std::collections::HashMap;

use cgmath::Point3;
use log::{debug, info};
use web_time::Instant;

use crate::engine_state::{
    error::{EngineError, Result},
    rendering::{
        meshing::{ChunkMesh, MeshManager, MeshOwner, MeshPlacement},
        scene::NodeId,
    },
    voxels::{
        block::VoxelValue,
        chunk::{ChunkCoord, VoxelChunk},
    },
    EngineContext,
};

/// Represents the voxel world: a sparse grid of chunks and their meshes.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_mesh_engine::engine_state::{config::EngineConfig, EngineContext};
/// use voxel_mesh_engine::engine_state::voxels::world::ChunkMeshRegistry;
///
/// let ctx = EngineContext::new(EngineConfig::default()).unwrap();
/// let mut world = ChunkMeshRegistry::new(ctx);
///
/// world.set_voxel_at_position(Point3::new(30.0, 0.0, 0.0), 1).unwrap();
/// assert_eq!(world.voxel_at_position(Point3::new(30.0, 0.0, 0.0)), Some(1));
/// ```
pub struct ChunkMeshRegistry {
    ctx: EngineContext,
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<ChunkCoord, VoxelChunk>,
    mesh_manager: MeshManager,
}

impl ChunkMeshRegistry {
    /// Creates a new, empty world.
    pub fn new(ctx: EngineContext) -> Self {
        ChunkMeshRegistry {
            ctx,
            chunks: HashMap::new(),
            mesh_manager: MeshManager::new(),
        }
    }

    /// Generates and meshes every missing chunk within `chunk_distance`
    /// chunks of `origin` on all three axes.
    ///
    /// # Arguments
    ///
    /// * `origin` - World-space position at the center of the generated cube
    /// * `chunk_distance` - Radius in chunks
    ///
    /// # Returns
    ///
    /// The coordinates of the chunks that were created, in ascending order.
    pub fn generate_missing_chunks(
        &mut self,
        origin: Point3<f32>,
        chunk_distance: u32,
    ) -> Result<Vec<ChunkCoord>> {
        let start = Instant::now();
        let center = self.chunk_at_position(origin);
        let distance = i32::try_from(chunk_distance).unwrap_or(i32::MAX);
        let span = |c: i32| c.saturating_sub(distance)..=c.saturating_add(distance);
        let size = self.ctx.config.chunk_size;

        let mut created = Vec::new();
        for x in span(center.x) {
            for y in span(center.y) {
                for z in span(center.z) {
                    let coord = ChunkCoord::new(x, y, z);
                    if self.chunks.contains_key(&coord) {
                        continue;
                    }
                    let chunk = self.ctx.config.generate.generate(coord, size);
                    self.add_chunk(coord, chunk)?;
                    created.push(coord);
                }
            }
        }

        info!(
            "Generated {} chunks around {} in {:?}",
            created.len(),
            center,
            start.elapsed()
        );
        Ok(created)
    }

    /// Inserts or replaces the chunk at `coord` and meshes it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ChunkSizeMismatch`] and leaves the world
    /// unchanged if the chunk's edge length differs from the configured chunk
    /// size.
    pub fn add_chunk(&mut self, coord: ChunkCoord, chunk: VoxelChunk) -> Result<NodeId> {
        let expected = self.ctx.config.chunk_size;
        if chunk.size() != expected {
            return Err(EngineError::ChunkSizeMismatch {
                coord,
                expected,
                actual: chunk.size(),
            });
        }
        let placement = self.placement(coord);
        let object = self.mesh_manager.rebuild(&self.ctx, &chunk, placement)?;
        self.chunks.insert(coord, chunk);
        Ok(object)
    }

    /// Rebuilds the mesh of the chunk at `coord`.
    ///
    /// Returns `None` without touching the scene when the chunk does not exist.
    pub fn show_chunk(&mut self, coord: impl Into<ChunkCoord>) -> Result<Option<NodeId>> {
        let coord = coord.into();
        let placement = self.placement(coord);
        let Some(chunk) = self.chunks.get(&coord) else {
            return Ok(None);
        };
        let object = self.mesh_manager.rebuild(&self.ctx, chunk, placement)?;
        Ok(Some(object))
    }

    /// The chunk containing `position`.
    pub fn chunk_at_position(&self, position: Point3<f32>) -> ChunkCoord {
        let width = self.ctx.config.chunk_world_size();
        ChunkCoord::new(
            (position.x / width).floor() as i32,
            (position.y / width).floor() as i32,
            (position.z / width).floor() as i32,
        )
    }

    /// Voxel coordinates of `position` inside its chunk.
    pub fn voxel_vector(&self, position: Point3<f32>) -> Point3<usize> {
        let cube_size = self.ctx.config.cube_size;
        let size = self.ctx.config.chunk_size as i64;
        let local = |p: f32| ((p / cube_size).floor() as i64).rem_euclid(size) as usize;
        Point3::new(local(position.x), local(position.y), local(position.z))
    }

    /// Flat index of a chunk-local voxel vector.
    pub fn voxel_index(&self, local: Point3<usize>) -> usize {
        let size = self.ctx.config.chunk_size;
        local.x + local.y * size + local.z * size * size
    }

    /// The voxel at `position`, or `None` if its chunk does not exist.
    pub fn voxel_at_position(&self, position: Point3<f32>) -> Option<VoxelValue> {
        let chunk = self.chunks.get(&self.chunk_at_position(position))?;
        Some(chunk.get(self.voxel_index(self.voxel_vector(position))))
    }

    /// Writes the voxel at `position` and rebuilds its chunk's mesh.
    ///
    /// The chunk is created empty if it does not exist yet.
    pub fn set_voxel_at_position(&mut self, position: Point3<f32>, value: VoxelValue) -> Result<()> {
        let coord = self.chunk_at_position(position);
        let index = self.voxel_index(self.voxel_vector(position));
        let size = self.ctx.config.chunk_size;

        let chunk = self.chunks.entry(coord).or_insert_with(|| {
            debug!("Creating world chunk {} on write", coord);
            VoxelChunk::empty(size)
        });
        chunk.set(index, value);

        let placement = self.placement(coord);
        let chunk = &self.chunks[&coord];
        self.mesh_manager.rebuild(&self.ctx, chunk, placement)?;
        Ok(())
    }

    /// The mesh of the chunk containing `position`, typically the player's.
    pub fn mesh_at_position(&self, position: Point3<f32>) -> Option<&ChunkMesh> {
        self.mesh_manager.get(self.chunk_at_position(position))
    }

    fn placement(&self, coord: ChunkCoord) -> MeshPlacement {
        MeshPlacement {
            parent: None,
            position: coord.lattice_offset(self.ctx.config.chunk_world_size()),
            owner: MeshOwner::World(coord),
        }
    }

    pub fn chunk(&self, coord: impl Into<ChunkCoord>) -> Option<&VoxelChunk> {
        self.chunks.get(&coord.into())
    }

    pub fn chunks(&self) -> &HashMap<ChunkCoord, VoxelChunk> {
        &self.chunks
    }

    pub fn meshes(&self) -> &HashMap<ChunkCoord, ChunkMesh> {
        self.mesh_manager.meshes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::EngineConfig;
    use crate::engine_state::voxels::chunk::generation::GenerationMethod;

    fn world(generate: GenerationMethod) -> ChunkMeshRegistry {
        let config = EngineConfig {
            cube_size: 10.0,
            chunk_size: 4,
            generate,
            ..EngineConfig::default()
        };
        ChunkMeshRegistry::new(EngineContext::new(config).unwrap())
    }

    #[test]
    fn positions_resolve_with_floor_division() {
        let world = world(GenerationMethod::Empty);

        assert_eq!(world.chunk_at_position(Point3::new(0.0, 39.9, 40.0)), ChunkCoord::new(0, 0, 1));
        assert_eq!(world.chunk_at_position(Point3::new(-0.1, 0.0, 0.0)), ChunkCoord::new(-1, 0, 0));
        assert_eq!(world.voxel_vector(Point3::new(-5.0, 15.0, 41.0)), Point3::new(3, 1, 0));
        assert_eq!(world.voxel_index(Point3::new(3, 1, 2)), 3 + 4 + 32);
    }

    #[test]
    fn generates_a_cube_of_chunks_once() {
        let mut world = world(GenerationMethod::Solid { value: 1 });

        let created = world
            .generate_missing_chunks(Point3::new(0.0, 0.0, 0.0), 1)
            .unwrap();
        assert_eq!(created.len(), 27);
        assert_eq!(world.meshes().len(), 27);

        let again = world
            .generate_missing_chunks(Point3::new(0.0, 0.0, 0.0), 1)
            .unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn set_voxel_creates_chunk_and_rebuilds() {
        let mut world = world(GenerationMethod::Empty);
        let position = Point3::new(45.0, 5.0, 5.0);

        assert_eq!(world.voxel_at_position(position), None);
        world.set_voxel_at_position(position, 2).unwrap();

        assert_eq!(world.voxel_at_position(position), Some(2));
        let mesh = world.mesh_at_position(position).unwrap();
        assert_eq!(mesh.face_count, 6);

        let scene = world.ctx.scene.get();
        let placed = scene.world_position(mesh.object).unwrap();
        assert_eq!(placed, Point3::new(40.0, 0.0, 0.0));
    }

    #[test]
    fn add_chunk_rejects_wrong_edge_length() {
        let mut world = world(GenerationMethod::Empty);

        let err = world.add_chunk(ChunkCoord::ORIGIN, VoxelChunk::empty(2)).unwrap_err();

        assert!(matches!(
            err,
            EngineError::ChunkSizeMismatch { expected: 4, actual: 2, .. }
        ));
        assert!(world.chunk(ChunkCoord::ORIGIN).is_none());
        assert!(world.meshes().is_empty());
        assert!(world.ctx.scene.get().is_empty());
    }

    #[test]
    fn generation_near_the_lattice_edge_does_not_overflow() {
        let mut world = world(GenerationMethod::Empty);
        let edge = world.ctx.config.chunk_world_size() * i32::MAX as f32;

        let created = world
            .generate_missing_chunks(Point3::new(edge, 0.0, 0.0), 1)
            .unwrap();

        assert_eq!(created.len(), 18);
        assert!(created.iter().all(|coord| coord.x >= i32::MAX - 1));
    }

    #[test]
    fn show_chunk_ignores_missing_chunks() {
        let mut world = world(GenerationMethod::Empty);
        assert_eq!(world.show_chunk((3, 3, 3)).unwrap(), None);
        assert!(world.meshes().is_empty());
    }
}
