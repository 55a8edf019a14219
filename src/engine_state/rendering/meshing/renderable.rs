//! Renderable representations of chunk meshes.
//!
//! A chunk mesh is drawn either as textured surfaces or as a wire frame. The
//! choice is made once, when the engine context is built, by picking the
//! factory every rebuild goes through.

use log::info;

use super::mesh::{Geometry, Mesh};
use crate::engine_state::config::MeshType;
use crate::engine_state::rendering::texture::MaterialSet;

/// What a scene node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    /// Solid, textured faces
    Surface {
        geometry: Geometry,
        material: MaterialSet,
    },
    /// Face outlines only
    Wire {
        geometry: Geometry,
        edges: Vec<[u32; 2]>,
    },
}

impl Renderable {
    pub fn geometry(&self) -> &Geometry {
        match self {
            Renderable::Surface { geometry, .. } | Renderable::Wire { geometry, .. } => geometry,
        }
    }

    pub fn mesh_type(&self) -> MeshType {
        match self {
            Renderable::Surface { .. } => MeshType::SurfaceMesh,
            Renderable::Wire { .. } => MeshType::WireMesh,
        }
    }
}

/// Turns a freshly built mesh into the engine's chosen renderable.
pub trait RenderableFactory {
    fn create_renderable(&self, mesh: Mesh) -> Renderable;

    fn mesh_type(&self) -> MeshType;
}

/// Builds textured surface renderables.
#[derive(Debug, Clone)]
pub struct SurfaceMeshFactory {
    pub material: MaterialSet,
}

impl RenderableFactory for SurfaceMeshFactory {
    fn create_renderable(&self, mesh: Mesh) -> Renderable {
        Renderable::Surface {
            geometry: mesh.geometry,
            material: self.material.clone(),
        }
    }

    fn mesh_type(&self) -> MeshType {
        MeshType::SurfaceMesh
    }
}

/// Builds wire-frame renderables.
#[derive(Debug, Clone, Default)]
pub struct WireMeshFactory;

impl RenderableFactory for WireMeshFactory {
    fn create_renderable(&self, mesh: Mesh) -> Renderable {
        let edges = mesh.geometry.edges();
        Renderable::Wire {
            geometry: mesh.geometry,
            edges,
        }
    }

    fn mesh_type(&self) -> MeshType {
        MeshType::WireMesh
    }
}

/// The factory for a configured mesh type.
pub fn factory_for(mesh_type: MeshType, material: MaterialSet) -> Box<dyn RenderableFactory> {
    info!("Chunk meshes will be rendered as {:?}", mesh_type);
    match mesh_type {
        MeshType::SurfaceMesh => Box::new(SurfaceMeshFactory { material }),
        MeshType::WireMesh => Box::new(WireMeshFactory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::VoxelChunk;

    fn one_voxel_mesh() -> Mesh {
        let mut chunk = VoxelChunk::empty(2);
        chunk.set(0, 1);
        Mesh::greedy(&chunk, 1.0)
    }

    #[test]
    fn factory_follows_mesh_type() {
        let material = MaterialSet::new("/t/", vec!["grass".into()]);

        let surface = factory_for(MeshType::SurfaceMesh, material.clone());
        let renderable = surface.create_renderable(one_voxel_mesh());
        assert_eq!(renderable.mesh_type(), MeshType::SurfaceMesh);
        assert!(matches!(renderable, Renderable::Surface { material: ref m, .. } if *m == material));

        let wire = factory_for(MeshType::WireMesh, material);
        let renderable = wire.create_renderable(one_voxel_mesh());
        assert_eq!(wire.mesh_type(), MeshType::WireMesh);
        match renderable {
            Renderable::Wire { geometry, edges } => {
                assert_eq!(edges.len(), geometry.face_count() * 4);
            }
            other => panic!("expected a wire renderable, got {other:?}"),
        }
    }
}
