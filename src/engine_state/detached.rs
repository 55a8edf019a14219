//! # Detached Voxel Groups
//!
//! A detached group is a set of chunks that is not part of the world grid and
//! moves as one rigid body, for vehicles, floating islands and similar
//! objects. Every chunk gets its own mesh, and all meshes hang under one node
//! hierarchy:
//!
//! ```text
//! translation ── offset (h, 0, h) ── rotation ── chunk meshes
//! ```
//!
//! Callers move the group through the translation node and turn it through the
//! rotation node. The offset node shifts the pivot to the horizontal center of
//! chunk `0|0|0` and is never exposed. Each chunk mesh sits at
//! `(-h + x*W, y*W, -h + z*W)` inside the rotation node, where `W` is the world
//! size of a chunk and `h = W / 2`, so relative to the translation node chunk
//! `x|y|z` starts at `(x*W, y*W, z*W)`.

use std::collections::HashMap;

use cgmath::{Euler, Rad, Vector3};
use log::{debug, info, warn};

use crate::engine_state::{
    error::{EngineError, Result},
    rendering::{
        meshing::{ChunkMesh, GroupId, MeshManager, MeshOwner, MeshPlacement},
        scene::{NodeId, Transform},
    },
    voxels::{
        block::VoxelValue,
        chunk::{ChunkCoord, VoxelChunk},
    },
    EngineContext,
};

/// Creates detached groups that share one engine context.
#[derive(Clone)]
pub struct Detached {
    ctx: EngineContext,
}

impl Detached {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Creates a group from `initial_chunks`, or from a single empty chunk at
    /// `0|0|0` when `None` is given.
    ///
    /// Every chunk is meshed before the group's translation node is added to
    /// the scene. If any mesh fails to build, the partially built group is torn
    /// down and the error returned.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ChunkSizeMismatch`] before anything is created
    /// when an initial chunk's edge length differs from the configured chunk
    /// size.
    pub fn create(
        &self,
        initial_chunks: Option<HashMap<ChunkCoord, VoxelChunk>>,
    ) -> Result<DetachedGroup> {
        let ctx = self.ctx.clone();
        let id = ctx.allocate_group_id();
        let half = ctx.config.chunk_world_size() / 2.0;

        let chunks = initial_chunks.unwrap_or_else(|| {
            HashMap::from([(ChunkCoord::ORIGIN, VoxelChunk::empty(ctx.config.chunk_size))])
        });
        if let Some((&coord, chunk)) = chunks
            .iter()
            .find(|(_, chunk)| chunk.size() != ctx.config.chunk_size)
        {
            return Err(EngineError::ChunkSizeMismatch {
                coord,
                expected: ctx.config.chunk_size,
                actual: chunk.size(),
            });
        }

        let (translation_node, offset_node, rotation_node) = {
            let mut scene = ctx.scene.get_mut();
            let translation = scene.create_node(format!("group {} translation", id.0), Transform::default());
            let offset = scene.create_node(
                format!("group {} offset", id.0),
                Transform::from_position(Vector3::new(half, 0.0, half)),
            );
            let rotation = scene.create_node(format!("group {} rotation", id.0), Transform::default());
            scene.attach(translation, offset)?;
            scene.attach(offset, rotation)?;
            (translation, offset, rotation)
        };

        let mut group = DetachedGroup {
            id,
            ctx,
            chunks,
            mesh_manager: MeshManager::new(),
            translation_node,
            offset_node,
            rotation_node,
            torn_down: false,
        };

        let mut keys: Vec<ChunkCoord> = group.chunks.keys().copied().collect();
        keys.sort();
        for key in keys {
            if let Err(err) = group.update(key) {
                warn!("Failed to mesh chunk {} of group {:?}: {}", key, id, err);
                group.teardown();
                return Err(err);
            }
        }

        group.ctx.scene.get_mut().add(translation_node)?;
        info!(
            "Created detached group {:?} with {} chunks",
            id,
            group.chunks.len()
        );
        Ok(group)
    }
}

/// Handle to a live detached group.
///
/// Chunks and meshes are keyed by [`ChunkCoord`]; every key argument accepts
/// anything convertible into one, e.g. `(1, 0, 0)` or a coordinate parsed from
/// `"1|0|0"`.
pub struct DetachedGroup {
    id: GroupId,
    ctx: EngineContext,
    chunks: HashMap<ChunkCoord, VoxelChunk>,
    mesh_manager: MeshManager,
    translation_node: NodeId,
    offset_node: NodeId,
    rotation_node: NodeId,
    torn_down: bool,
}

impl DetachedGroup {
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Node to rotate the group through.
    pub fn rotation_node(&self) -> NodeId {
        self.rotation_node
    }

    /// Node to move the group through.
    pub fn translation_node(&self) -> NodeId {
        self.translation_node
    }

    pub fn rotation(&self) -> Result<Euler<Rad<f32>>> {
        Ok(self.ctx.scene.get().transform(self.rotation_node)?.rotation)
    }

    pub fn set_rotation(&self, rotation: Euler<Rad<f32>>) -> Result<()> {
        self.ctx.scene.get_mut().set_rotation(self.rotation_node, rotation)
    }

    pub fn position(&self) -> Result<Vector3<f32>> {
        Ok(self.ctx.scene.get().transform(self.translation_node)?.position)
    }

    pub fn set_position(&self, position: Vector3<f32>) -> Result<()> {
        self.ctx.scene.get_mut().set_position(self.translation_node, position)
    }

    pub fn chunks(&self) -> &HashMap<ChunkCoord, VoxelChunk> {
        &self.chunks
    }

    /// Mutable access to a chunk's voxels. Changes become visible after
    /// [`DetachedGroup::update`].
    pub fn chunk_mut(&mut self, key: impl Into<ChunkCoord>) -> Option<&mut VoxelChunk> {
        self.chunks.get_mut(&key.into())
    }

    pub fn meshes(&self) -> &HashMap<ChunkCoord, ChunkMesh> {
        self.mesh_manager.meshes()
    }

    /// Rebuilds the mesh of the chunk at `key` from its current voxels.
    ///
    /// The previous mesh is removed from the scene and the reverse index
    /// before the new one is attached. Returns the new mesh's node, or `None`
    /// without any side effect when the group has no such chunk.
    pub fn update(&mut self, key: impl Into<ChunkCoord>) -> Result<Option<NodeId>> {
        let key = key.into();
        let placement = self.placement(key);
        let Some(chunk) = self.chunks.get(&key) else {
            debug!("Group {:?} has no chunk {}, nothing to update", self.id, key);
            return Ok(None);
        };
        let object = self.mesh_manager.rebuild(&self.ctx, chunk, placement)?;
        Ok(Some(object))
    }

    /// Writes one voxel and rebuilds the chunk's mesh before returning.
    ///
    /// A missing chunk is created empty first.
    ///
    /// # Panics
    /// Panics if `index` is outside the chunk.
    pub fn set(&mut self, key: impl Into<ChunkCoord>, index: usize, value: VoxelValue) -> Result<()> {
        let key = key.into();
        let id = self.id;
        let size = self.ctx.config.chunk_size;
        self.chunks
            .entry(key)
            .or_insert_with(|| {
                debug!("Creating chunk {} in group {:?} on write", key, id);
                VoxelChunk::empty(size)
            })
            .set(index, value);
        self.update(key)?;
        Ok(())
    }

    /// Reads one voxel, or `None` if the group has no chunk at `key`.
    ///
    /// # Panics
    /// Panics if `index` is outside an existing chunk.
    pub fn get(&self, key: impl Into<ChunkCoord>, index: usize) -> Option<VoxelValue> {
        self.chunks.get(&key.into()).map(|chunk| chunk.get(index))
    }

    /// Removes the group from the scene and drops all of its meshes and
    /// reverse index entries.
    ///
    /// Dropping the handle does the same; this only makes the intent explicit.
    pub fn destroy(mut self) {
        self.teardown();
        info!("Destroyed detached group {:?}", self.id);
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.mesh_manager.clear(&self.ctx);
        self.ctx.reverse_index.get_mut().remove_group(self.id);
        self.ctx.scene.get_mut().dispose(self.translation_node);
    }

    fn placement(&self, coord: ChunkCoord) -> MeshPlacement {
        let width = self.ctx.config.chunk_world_size();
        let half = width / 2.0;
        MeshPlacement {
            parent: Some(self.rotation_node),
            position: coord.lattice_offset(width) - Vector3::new(half, 0.0, half),
            owner: MeshOwner::Detached {
                group: self.id,
                coord,
            },
        }
    }
}

impl Drop for DetachedGroup {
    fn drop(&mut self) {
        // A panic may have left the shared scene borrowed.
        if std::thread::panicking() {
            return;
        }
        if !self.torn_down {
            debug!("Detached group {:?} dropped without destroy", self.id);
            self.teardown();
        }
    }
}
