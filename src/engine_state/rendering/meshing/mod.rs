//! Mesh generation and management for voxel chunks.
//!
//! This module owns the lifecycle of chunk meshes: a chunk's voxels are
//! greedy meshed, textured, turned into a renderable and attached to the
//! scene, replacing whatever mesh the chunk had before.
//!
//! # Architecture
//! - `MeshManager`: per-owner map from chunk coordinate to its live mesh
//! - `mesh/`: the greedy mesher and the geometry it produces
//! - `renderable`: surface and wire renderables and their factories
//! - `reverse_index`: rendered object id back to the owning chunk
//!
//! The world registry and every detached group each hold one `MeshManager`.
//! They differ only in where meshes are attached and how they are placed.

use std::collections::HashMap;

use cgmath::Vector3;
use log::{debug, trace};
use web_time::Instant;

pub mod mesh;
pub mod renderable;
pub mod reverse_index;

pub use mesh::*;
pub use renderable::{factory_for, Renderable, RenderableFactory, SurfaceMeshFactory, WireMeshFactory};
pub use reverse_index::{GroupId, MeshOwner, ReverseIndex};

use crate::engine_state::{
    error::{EngineError, Result},
    rendering::scene::{NodeId, Transform},
    voxels::chunk::{ChunkCoord, VoxelChunk},
    EngineContext,
};

/// Where a rebuilt chunk mesh goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshPlacement {
    /// Node the mesh is attached under, or `None` for the scene root
    pub parent: Option<NodeId>,
    /// Mesh position relative to `parent`
    pub position: Vector3<f32>,
    /// Reverse index entry recorded for the mesh
    pub owner: MeshOwner,
}

/// The live, scene-attached mesh of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkMesh {
    /// Scene node carrying the renderable
    pub object: NodeId,
    pub face_count: usize,
    pub vertex_count: usize,
}

/// Central manager for the meshes of one set of chunks.
///
/// Meshes are keyed by chunk coordinate, so replacing or removing one chunk's
/// mesh cannot touch the mesh of any other chunk.
#[derive(Debug, Default)]
pub struct MeshManager {
    meshes: HashMap<ChunkCoord, ChunkMesh>,
}

impl MeshManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh mesh for `chunk` and swaps it into the scene.
    ///
    /// # Arguments
    /// * `ctx` - Engine context providing the scene, reverse index and capabilities
    /// * `chunk` - Current voxel data of the chunk
    /// * `placement` - Parent, position and owner of the new mesh
    ///
    /// # Returns
    /// The scene node of the new mesh.
    ///
    /// # Errors
    /// Texture failures and a missing parent node are reported before the
    /// scene is touched, so the previous mesh stays in place.
    pub fn rebuild(
        &mut self,
        ctx: &EngineContext,
        chunk: &VoxelChunk,
        placement: MeshPlacement,
    ) -> Result<NodeId> {
        let start = Instant::now();
        let coord = placement.owner.coord();

        let mut mesh = Mesh::greedy(chunk, ctx.config.cube_size);
        ctx.texture_applier.get().apply_textures(&mut mesh.geometry)?;
        let (face_count, vertex_count) = mesh.get_lens();
        let renderable = ctx.renderable_factory.get().create_renderable(mesh);

        let mut scene = ctx.scene.get_mut();
        if let Some(parent) = placement.parent {
            if !scene.contains(parent) {
                return Err(EngineError::MissingNode(parent));
            }
        }

        let mut reverse_index = ctx.reverse_index.get_mut();
        if let Some(stale) = self.meshes.remove(&coord) {
            reverse_index.remove(stale.object);
            scene.dispose(stale.object);
            trace!("Removed stale mesh {:?} of chunk {}", stale.object, coord);
        }

        let object = scene.create_renderable(
            format!("chunk {coord}"),
            Transform::from_position(placement.position),
            renderable,
        );
        match placement.parent {
            Some(parent) => scene.attach(parent, object)?,
            None => scene.add(object)?,
        }

        self.meshes.insert(
            coord,
            ChunkMesh {
                object,
                face_count,
                vertex_count,
            },
        );
        reverse_index.insert(object, placement.owner);

        debug!(
            "Rebuilt chunk {} ({} faces, {} vertices) in {:?}",
            coord,
            face_count,
            vertex_count,
            start.elapsed()
        );
        Ok(object)
    }

    /// Removes the mesh of `coord` from the scene and the reverse index.
    ///
    /// Returns whether the chunk had a mesh.
    pub fn remove(&mut self, ctx: &EngineContext, coord: ChunkCoord) -> bool {
        match self.meshes.remove(&coord) {
            Some(stale) => {
                ctx.reverse_index.get_mut().remove(stale.object);
                ctx.scene.get_mut().dispose(stale.object);
                true
            }
            None => false,
        }
    }

    /// Removes every mesh this manager owns.
    pub fn clear(&mut self, ctx: &EngineContext) {
        let mut scene = ctx.scene.get_mut();
        let mut reverse_index = ctx.reverse_index.get_mut();
        for (_, stale) in self.meshes.drain() {
            reverse_index.remove(stale.object);
            scene.dispose(stale.object);
        }
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.meshes.get(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.meshes.contains_key(&coord)
    }

    pub fn meshes(&self) -> &HashMap<ChunkCoord, ChunkMesh> {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::EngineConfig;

    fn context() -> EngineContext {
        let config = EngineConfig {
            chunk_size: 4,
            ..EngineConfig::default()
        };
        EngineContext::new(config).unwrap()
    }

    fn world_placement(coord: ChunkCoord) -> MeshPlacement {
        MeshPlacement {
            parent: None,
            position: Vector3::new(0.0, 0.0, 0.0),
            owner: MeshOwner::World(coord),
        }
    }

    #[test]
    fn rebuild_replaces_the_stale_mesh() {
        let ctx = context();
        let mut manager = MeshManager::new();
        let mut chunk = VoxelChunk::empty(4);
        chunk.set(0, 1);

        let first = manager.rebuild(&ctx, &chunk, world_placement(ChunkCoord::ORIGIN)).unwrap();
        let second = manager.rebuild(&ctx, &chunk, world_placement(ChunkCoord::ORIGIN)).unwrap();

        assert_ne!(first, second);
        assert_eq!(manager.len(), 1);
        assert!(!ctx.scene.get().contains(first));
        assert!(ctx.scene.get().is_in_scene(second));
        assert_eq!(ctx.reverse_index.get().len(), 1);
        assert_eq!(
            ctx.reverse_index.get().resolve(second),
            Some(MeshOwner::World(ChunkCoord::ORIGIN))
        );
    }

    #[test]
    fn rebuild_keeps_other_chunks() {
        let ctx = context();
        let mut manager = MeshManager::new();
        let chunk = VoxelChunk::empty(4);
        let a = ChunkCoord::new(0, 0, 0);
        let b = ChunkCoord::new(1, 0, 0);

        manager.rebuild(&ctx, &chunk, world_placement(a)).unwrap();
        let b_object = manager.rebuild(&ctx, &chunk, world_placement(b)).unwrap();
        manager.rebuild(&ctx, &chunk, world_placement(a)).unwrap();

        assert_eq!(manager.get(b).unwrap().object, b_object);
        assert!(ctx.reverse_index.get().contains(b_object));
        assert_eq!(ctx.reverse_index.get().len(), 2);
    }

    #[test]
    fn missing_parent_is_reported_before_mutation() {
        let ctx = context();
        let mut manager = MeshManager::new();
        let chunk = VoxelChunk::empty(4);
        let object = manager.rebuild(&ctx, &chunk, world_placement(ChunkCoord::ORIGIN)).unwrap();

        let parent = ctx.scene.get_mut().create_node("gone", Transform::default());
        ctx.scene.get_mut().dispose(parent);
        let placement = MeshPlacement {
            parent: Some(parent),
            ..world_placement(ChunkCoord::ORIGIN)
        };

        assert!(matches!(
            manager.rebuild(&ctx, &chunk, placement),
            Err(EngineError::MissingNode(_))
        ));
        assert_eq!(manager.get(ChunkCoord::ORIGIN).unwrap().object, object);
        assert!(ctx.scene.get().is_in_scene(object));
    }

    #[test]
    fn remove_and_clear_drop_index_entries() {
        let ctx = context();
        let mut manager = MeshManager::new();
        let chunk = VoxelChunk::empty(4);
        for x in 0..3 {
            manager
                .rebuild(&ctx, &chunk, world_placement(ChunkCoord::new(x, 0, 0)))
                .unwrap();
        }

        assert!(manager.remove(&ctx, ChunkCoord::new(1, 0, 0)));
        assert!(!manager.remove(&ctx, ChunkCoord::new(1, 0, 0)));
        assert_eq!(ctx.reverse_index.get().len(), 2);

        manager.clear(&ctx);
        assert!(manager.is_empty());
        assert!(ctx.reverse_index.get().is_empty());
        assert!(ctx.scene.get().renderables_in_scene().is_empty());
    }
}
