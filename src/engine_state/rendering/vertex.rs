//! Vertex data structures for chunk geometry.
//!
//! Chunk meshes are handed to the host renderer as flat vertex and index
//! buffers. The vertex layout is plain old data so it can be uploaded as bytes
//! without conversion.

use cgmath::{Point3, Vector3};

/// A vertex of chunk geometry.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Color: [f32; 3] (12 bytes)
/// - Material Index: u32 (4 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 48 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in mesh-local world units
    pub position: [f32; 3],
    /// Face normal
    pub normal: [f32; 3],
    /// Color-encoded voxel value
    pub color: [f32; 3],
    /// Index into the material list, assigned by the texture applier
    pub material_index: u32,
    /// Texture coordinates in voxel units, so textures tile once per voxel
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex with material index 0.
    ///
    /// # Arguments
    /// * `position` - Position in mesh-local world units
    /// * `normal` - Normal of the face the vertex belongs to
    /// * `color` - Color-encoded voxel value
    /// * `u` - U texture coordinate in voxels
    /// * `v` - V texture coordinate in voxels
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, color: [f32; 3], u: u16, v: u16) -> Self {
        Vertex {
            position: position.into(),
            normal: normal.into(),
            color,
            material_index: 0,
            tex_coords: [u as f32, v as f32],
        }
    }

    /// Size of one vertex in a vertex buffer.
    pub const fn stride() -> usize {
        std::mem::size_of::<Vertex>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_has_no_padding() {
        assert_eq!(Vertex::stride(), 48);
    }

    #[test]
    fn casts_to_bytes() {
        let vertices = [Vertex::new(
            Point3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 1.0, 0.0),
            [0.0, 0.0, 1.0],
            1,
            0,
        )];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 48);
    }
}
