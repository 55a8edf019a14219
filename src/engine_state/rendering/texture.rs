//! Texture assignment for chunk geometry.
//!
//! The mesher does not know about materials. It stores each face's voxel value
//! as a vertex color, packed the way a 24-bit hex color is split into red,
//! green and blue channels. After every rebuild the texture applier reads that
//! color back and assigns the face a material index, which selects one of the
//! configured materials (and therefore one texture) when the surface is drawn.

use log::trace;

use super::meshing::Geometry;
use crate::engine_state::error::{EngineError, Result};

/// Assigns a material index to every face of a freshly built geometry.
pub trait TextureApplier {
    fn apply_textures(&self, geometry: &mut Geometry) -> Result<()>;
}

/// Packs a voxel value into an RGB color, one byte per channel.
pub fn material_color(value: u32) -> [f32; 3] {
    [
        ((value >> 16) & 0xff) as f32 / 255.0,
        ((value >> 8) & 0xff) as f32 / 255.0,
        (value & 0xff) as f32 / 255.0,
    ]
}

/// Reads back the value packed by [`material_color`].
///
/// The channels are weighted by powers of 255, which is exact for the
/// single-byte values voxels use.
pub fn decode_material(color: [f32; 3]) -> u32 {
    let [r, g, b] = color;
    (b * 255.0 + g * 255.0 * 255.0 + r * 255.0 * 255.0 * 255.0).round() as u32
}

/// The default applier: `material_index = max(0, value - 1) % material_count`.
///
/// Voxel value 1 maps to the first material, 2 to the second, and values past
/// the end of the material list wrap around.
#[derive(Debug, Clone)]
pub struct FaceColorTextureApplier {
    material_count: usize,
}

impl FaceColorTextureApplier {
    pub fn new(material_count: usize) -> Self {
        Self { material_count }
    }

    pub fn material_index(&self, value: u32) -> u32 {
        (value.saturating_sub(1) as usize % self.material_count) as u32
    }
}

impl TextureApplier for FaceColorTextureApplier {
    fn apply_textures(&self, geometry: &mut Geometry) -> Result<()> {
        if self.material_count == 0 {
            return Err(EngineError::Texture(
                "no materials to assign faces to".to_string(),
            ));
        }

        for face_index in 0..geometry.faces.len() {
            let value = decode_material(geometry.faces[face_index].color);
            geometry.set_material_index(face_index, self.material_index(value));
        }

        trace!("Applied textures to {} faces", geometry.faces.len());
        Ok(())
    }
}

/// The configured materials and where the host loads their textures from.
///
/// Loading the images is the host's job; the engine only passes this along
/// opaquely with every surface mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSet {
    pub texture_path: String,
    pub names: Vec<String>,
}

impl MaterialSet {
    pub fn new(texture_path: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            texture_path: texture_path.into(),
            names,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Texture URL of each material, in material-index order.
    pub fn texture_urls(&self) -> Vec<String> {
        self.names
            .iter()
            .map(|name| format!("{}{}.png", self.texture_path, name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::meshing::Mesh;
    use crate::engine_state::voxels::chunk::VoxelChunk;

    #[test]
    fn color_encoding_round_trips_voxel_values() {
        for value in 0..=255u32 {
            assert_eq!(decode_material(material_color(value)), value);
        }
    }

    #[test]
    fn material_index_wraps_and_clamps() {
        let applier = FaceColorTextureApplier::new(2);
        assert_eq!(applier.material_index(0), 0);
        assert_eq!(applier.material_index(1), 0);
        assert_eq!(applier.material_index(2), 1);
        assert_eq!(applier.material_index(3), 0);
    }

    #[test]
    fn applies_indices_to_faces_and_vertices() {
        let mut chunk = VoxelChunk::empty(2);
        chunk.set_at(0, 0, 0, 2);
        let mut mesh = Mesh::greedy(&chunk, 1.0);

        FaceColorTextureApplier::new(3)
            .apply_textures(&mut mesh.geometry)
            .unwrap();

        assert!(mesh.geometry.faces.iter().all(|f| f.material_index == 1));
        assert!(mesh.geometry.vertices.iter().all(|v| v.material_index == 1));
    }

    #[test]
    fn zero_materials_is_an_error() {
        let mut chunk = VoxelChunk::empty(2);
        chunk.set_at(0, 0, 0, 1);
        let mut mesh = Mesh::greedy(&chunk, 1.0);

        let err = FaceColorTextureApplier::new(0)
            .apply_textures(&mut mesh.geometry)
            .unwrap_err();
        assert!(matches!(err, EngineError::Texture(_)));
    }

    #[test]
    fn texture_urls_use_path_prefix() {
        let set = MaterialSet::new("/textures/", vec!["grass".into(), "dirt".into()]);
        assert_eq!(set.texture_urls(), vec!["/textures/grass.png", "/textures/dirt.png"]);
    }
}
