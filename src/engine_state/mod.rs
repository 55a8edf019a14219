//! # Engine State Module
//!
//! The core engine module that manages the state and functionality of the voxel engine.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container: world registry plus detached groups
//! * `EngineContext` - Shared scene, reverse index, configuration and capabilities
//! * `detached` - Voxel groups that move and rotate as rigid bodies
//! * `rendering` - Meshing, the scene graph and texture assignment
//! * `voxels` - Voxel data, chunks, and the world registry
//!
//! ## Architecture
//!
//! There is no global state. Everything a mesh rebuild needs travels in an
//! [`EngineContext`], which is cheap to clone: all clones share the same scene
//! graph, reverse index and capabilities. The shared handles are
//! `Rc<RefCell<_>>` based and therefore not `Send`, so an engine and everything
//! created from it stay on the thread that built them.

use std::cell::{Cell, Ref};
use std::collections::HashMap;
use std::rc::Rc;

use log::info;

use crate::core::{StResource, StSystem};

pub mod config;
pub mod detached;
pub mod error;
pub mod rendering;
pub mod voxels;

use config::EngineConfig;
use detached::{Detached, DetachedGroup};
use error::Result;
use rendering::{
    meshing::{factory_for, GroupId, MeshOwner, RenderableFactory, ReverseIndex},
    scene::{NodeId, SceneGraph},
    texture::{FaceColorTextureApplier, MaterialSet, TextureApplier},
};
use voxels::{
    chunk::{ChunkCoord, VoxelChunk},
    world::ChunkMeshRegistry,
};

/// Everything shared by the world registry and the detached groups.
#[derive(Clone)]
pub struct EngineContext {
    /// Validated configuration, fixed for the lifetime of the engine
    pub config: Rc<EngineConfig>,
    /// The scene graph meshes are attached to
    pub scene: StResource<SceneGraph>,
    /// Rendered object id to owning chunk
    pub reverse_index: StResource<ReverseIndex>,
    /// Surface or wire, chosen from the configuration
    pub renderable_factory: StSystem<dyn RenderableFactory>,
    pub texture_applier: StSystem<dyn TextureApplier>,
    next_group_id: Rc<Cell<u32>>,
}

impl EngineContext {
    /// Validates `config` and builds the default capabilities for it.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let material = MaterialSet::new(config.texture_path.clone(), config.materials.clone());
        let factory = factory_for(config.mesh_type, material);
        let applier: Box<dyn TextureApplier> =
            Box::new(FaceColorTextureApplier::new(config.materials.len()));
        Ok(Self::with_capabilities(config, factory, applier))
    }

    /// Builds a context around caller-provided capabilities.
    pub fn with_capabilities(
        config: EngineConfig,
        renderable_factory: Box<dyn RenderableFactory>,
        texture_applier: Box<dyn TextureApplier>,
    ) -> Self {
        Self {
            config: Rc::new(config),
            scene: StResource::new(SceneGraph::new()),
            reverse_index: StResource::new(ReverseIndex::new()),
            renderable_factory: StSystem::new(renderable_factory),
            texture_applier: StSystem::new(texture_applier),
            next_group_id: Rc::new(Cell::new(0)),
        }
    }

    /// Hands out a group id no other group of this engine has.
    pub fn allocate_group_id(&self) -> GroupId {
        let id = self.next_group_id.get();
        self.next_group_id.set(id + 1);
        GroupId(id)
    }
}

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```
/// use voxel_mesh_engine::engine_state::{config::EngineConfig, EngineState};
///
/// let config = EngineConfig { chunk_distance: 0, ..EngineConfig::default() };
/// let engine = EngineState::new(config).unwrap();
///
/// let mut group = engine.create_detached(None).unwrap();
/// group.set("1|0|0".parse::<voxel_mesh_engine::engine_state::voxels::chunk::ChunkCoord>().unwrap(), 0, 3).unwrap();
/// assert_eq!(group.meshes().len(), 2);
/// ```
pub struct EngineState {
    ctx: EngineContext,
    /// The world grid of chunks and their meshes
    pub world: ChunkMeshRegistry,
    detached: Detached,
}

impl EngineState {
    /// Creates the engine and meshes the world around the configured origin.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine configuration, validated before anything is built
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration or when a world chunk
    /// cannot be meshed.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let ctx = EngineContext::new(config)?;
        let mut world = ChunkMeshRegistry::new(ctx.clone());
        world.generate_missing_chunks(ctx.config.world_origin(), ctx.config.chunk_distance)?;
        info!(
            "Engine initialized with {} world chunks ({:?}, cube size {}, chunk size {})",
            world.chunks().len(),
            ctx.config.mesh_type,
            ctx.config.cube_size,
            ctx.config.chunk_size
        );

        Ok(Self {
            detached: Detached::new(ctx.clone()),
            ctx,
            world,
        })
    }

    /// Creates a detached group; see [`Detached::create`].
    pub fn create_detached(
        &self,
        initial_chunks: Option<HashMap<ChunkCoord, VoxelChunk>>,
    ) -> Result<DetachedGroup> {
        self.detached.create(initial_chunks)
    }

    /// Which chunk a rendered object belongs to, e.g. after a hit-test.
    pub fn owner_of(&self, object: NodeId) -> Option<MeshOwner> {
        self.ctx.reverse_index.get().resolve(object)
    }

    pub fn scene(&self) -> Ref<'_, SceneGraph> {
        self.ctx.scene.get()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.ctx.config
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }
}
