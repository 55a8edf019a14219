//! Mesh data structures for chunk geometry.
//!
//! A [`Mesh`] is the disposable output of meshing one chunk version: flat
//! vertex and index buffers plus per-face metadata the texture applier and
//! the wire renderable need.

use cgmath::Point3;

use crate::engine_state::rendering::texture::material_color;
use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::{block::block_side::BlockSide, chunk::VoxelChunk};

use super::{face::Face, greedy};

/// Per-face metadata. Each face owns four consecutive vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryFace {
    pub side: BlockSide,
    /// Index of the face's first vertex
    pub first_vertex: u32,
    /// Color-encoded voxel value
    pub color: [f32; 3],
    /// Material index, assigned by the texture applier
    pub material_index: u32,
}

/// Triangle geometry of a chunk mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    /// Two triangles per face
    pub indices: Vec<u32>,
    pub faces: Vec<GeometryFace>,
}

impl Geometry {
    /// Appends a quad scaled from voxel units to world units.
    pub fn push_face(&mut self, face: &Face, scale: f32) {
        let first_vertex = self.vertices.len() as u32;
        let color = material_color(face.value as u32);
        self.vertices
            .extend(Self::generate_face_vertices(face, scale, color));
        self.indices
            .extend(Self::generate_face_indices(self.faces.len() as u32));
        self.faces.push(GeometryFace {
            side: face.block_side,
            first_vertex,
            color,
            material_index: 0,
        });
    }

    /// Generates the four corners of a face, ordered lower-left, lower-right,
    /// upper-left, upper-right to match [`Geometry::generate_face_indices`].
    pub fn generate_face_vertices(face: &Face, scale: f32, color: [f32; 3]) -> [Vertex; 4] {
        let scaled = |p: Point3<usize>| {
            Point3::new(p.x as f32 * scale, p.y as f32 * scale, p.z as f32 * scale)
        };
        let normal = face.block_side.normal();
        let (u, v) = (face.width() as u16, face.height() as u16);

        [
            Vertex::new(scaled(face.ll), normal, color, 0, v),
            Vertex::new(scaled(face.lr), normal, color, u, v),
            Vertex::new(scaled(face.ul), normal, color, 0, 0),
            Vertex::new(scaled(face.ur), normal, color, u, 0),
        ]
    }

    /// Generates index data for a face, adjusted by the number of previously generated faces.
    ///
    /// # Returns
    /// Six indices forming the triangles (ll, lr, ur) and (ll, ur, ul).
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        [
            (num_faces_generated * 4),
            1 + num_faces_generated * 4,
            3 + num_faces_generated * 4,
            (num_faces_generated * 4),
            3 + num_faces_generated * 4,
            2 + num_faces_generated * 4,
        ]
    }

    /// Sets the material index of a face and of its four vertices.
    ///
    /// # Panics
    /// Panics if `face_index` is out of range.
    pub fn set_material_index(&mut self, face_index: usize, material_index: u32) {
        let face = &mut self.faces[face_index];
        face.material_index = material_index;
        let first = face.first_vertex as usize;
        for vertex in &mut self.vertices[first..first + 4] {
            vertex.material_index = material_index;
        }
    }

    /// Outline edges of every face as vertex index pairs.
    pub fn edges(&self) -> Vec<[u32; 2]> {
        self.faces
            .iter()
            .flat_map(|face| {
                let [ll, lr, ul, ur] = [0, 1, 2, 3].map(|i| face.first_vertex + i);
                [[ll, lr], [lr, ur], [ur, ul], [ul, ll]]
            })
            .collect()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// The mesh of one chunk version at one scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    /// World units per voxel the geometry was built with
    pub scale: f32,
}

impl Mesh {
    pub fn new(scale: f32) -> Self {
        Mesh {
            geometry: Geometry::default(),
            scale,
        }
    }

    /// Meshes `chunk` with the greedy mesher.
    ///
    /// # Arguments
    /// * `chunk` - The chunk to generate the mesh for
    /// * `scale` - World units per voxel edge
    pub fn greedy(chunk: &VoxelChunk, scale: f32) -> Self {
        greedy::greedy(chunk, scale)
    }

    /// Counts of faces and vertices.
    pub fn get_lens(&self) -> (usize, usize) {
        (self.geometry.face_count(), self.geometry.vertex_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_face_appends_four_vertices_and_six_indices() {
        let mut geometry = Geometry::default();
        let face = Face::from_extents(Point3::new(0, 0, 0), [1, 0, 0], [0, 1, 0], 1, BlockSide::FRONT);

        geometry.push_face(&face, 2.0);
        geometry.push_face(&face, 2.0);

        assert_eq!(geometry.vertex_count(), 8);
        assert_eq!(&geometry.indices[6..], &[4, 5, 7, 4, 7, 6]);
        assert_eq!(geometry.faces[1].first_vertex, 4);
        assert_eq!(geometry.vertices[3].position, [2.0, 2.0, 0.0]);
    }

    #[test]
    fn edges_outline_each_face() {
        let mut geometry = Geometry::default();
        let face = Face::from_extents(Point3::new(0, 0, 0), [1, 0, 0], [0, 1, 0], 1, BlockSide::FRONT);
        geometry.push_face(&face, 1.0);

        assert_eq!(geometry.edges(), vec![[0, 1], [1, 3], [3, 2], [2, 0]]);
    }
}
