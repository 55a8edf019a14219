//! # Engine Configuration
//!
//! Runtime configuration for the engine, read once at startup. Keys use the
//! camelCase names a browser host passes in, and every key is optional:
//!
//! ```json
//! {
//!     "cubeSize": 25,
//!     "chunkSize": 32,
//!     "chunkDistance": 2,
//!     "meshType": "surfaceMesh",
//!     "materials": ["grass", "dirt"],
//!     "texturePath": "/textures/",
//!     "worldOrigin": [0, 0, 0],
//!     "generate": { "method": "perlin", "seed": 7 }
//! }
//! ```
//!
//! `worldOrigin` may also be written as an object, `{ "x": 0, "y": 0, "z": 0 }`.

use std::path::Path;

use cgmath::Point3;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::{EngineError, Result};
use super::voxels::chunk::generation::GenerationMethod;

/// Default world units per voxel edge.
pub const DEFAULT_CUBE_SIZE: f32 = 25.0;
/// Default number of voxels along one chunk edge.
pub const DEFAULT_CHUNK_SIZE: usize = 32;
/// Default radius, in chunks, generated around the world origin.
pub const DEFAULT_CHUNK_DISTANCE: u32 = 2;
/// Largest accepted `chunkDistance`; the initial world is a cube of
/// `(2 * chunkDistance + 1)^3` chunks.
pub const MAX_CHUNK_DISTANCE: u32 = 64;

/// Which renderable each chunk mesh is materialised as.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshType {
    /// Solid, textured faces
    #[default]
    #[serde(rename = "surfaceMesh")]
    SurfaceMesh,
    /// Edges only
    #[serde(rename = "wireMesh")]
    WireMesh,
}

/// Configuration consumed by the world registry and every detached group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// World units per voxel edge
    pub cube_size: f32,
    /// Voxels per chunk edge
    pub chunk_size: usize,
    /// Radius in chunks of the world generated around `world_origin`
    pub chunk_distance: u32,
    /// Surface or wire rendering, fixed for the lifetime of the engine
    pub mesh_type: MeshType,
    /// Material names; a face's material index selects into this list
    pub materials: Vec<String>,
    /// Directory prefix the host loads `<material>.png` textures from
    pub texture_path: String,
    /// World-space position the initial chunks are generated around
    #[serde(deserialize_with = "deserialize_vector")]
    pub world_origin: [f32; 3],
    /// How missing world chunks are filled
    pub generate: GenerationMethod,
}

/// A vector given either as `[x, y, z]` or as `{ "x": .., "y": .., "z": .. }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum VectorOption {
    Array([f32; 3]),
    Object { x: f32, y: f32, z: f32 },
}

fn deserialize_vector<'de, D>(deserializer: D) -> std::result::Result<[f32; 3], D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match VectorOption::deserialize(deserializer)? {
        VectorOption::Array(v) => v,
        VectorOption::Object { x, y, z } => [x, y, z],
    })
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cube_size: DEFAULT_CUBE_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_distance: DEFAULT_CHUNK_DISTANCE,
            mesh_type: MeshType::default(),
            materials: vec!["grass".to_string()],
            texture_path: "/textures/".to_string(),
            world_origin: [0.0, 0.0, 0.0],
            generate: GenerationMethod::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading engine configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.cube_size.is_finite() && self.cube_size > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "cubeSize must be a positive number, got {}",
                self.cube_size
            )));
        }
        if self.chunk_size == 0 {
            return Err(EngineError::InvalidConfig(
                "chunkSize must be at least 1".to_string(),
            ));
        }
        if self.chunk_distance > MAX_CHUNK_DISTANCE {
            return Err(EngineError::InvalidConfig(format!(
                "chunkDistance must be at most {MAX_CHUNK_DISTANCE}, got {}",
                self.chunk_distance
            )));
        }
        if self.materials.is_empty() {
            return Err(EngineError::InvalidConfig(
                "at least one material is required".to_string(),
            ));
        }
        Ok(())
    }

    /// World-space edge length of one chunk.
    pub fn chunk_world_size(&self) -> f32 {
        self.cube_size * self.chunk_size as f32
    }

    pub fn world_origin(&self) -> Point3<f32> {
        Point3::from(self.world_origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.cube_size, 25.0);
        assert_eq!(config.chunk_size, 32);
        assert_eq!(config.mesh_type, MeshType::SurfaceMesh);
    }

    #[test]
    fn parses_camel_case_keys() {
        let config = EngineConfig::from_json_str(
            r#"{ "cubeSize": 10, "chunkSize": 16, "meshType": "wireMesh", "materials": ["a", "b"] }"#,
        )
        .unwrap();

        assert_eq!(config.cube_size, 10.0);
        assert_eq!(config.chunk_size, 16);
        assert_eq!(config.mesh_type, MeshType::WireMesh);
        assert_eq!(config.materials, vec!["a", "b"]);
        assert_eq!(config.chunk_world_size(), 160.0);
    }

    #[test]
    fn rejects_unknown_mesh_type() {
        let err = EngineConfig::from_json_str(r#"{ "meshType": "pointCloud" }"#).unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let err = EngineConfig::from_json_str(r#"{ "chunkSize": 0 }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_non_positive_cube_size() {
        let err = EngineConfig::from_json_str(r#"{ "cubeSize": -1 }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn world_origin_accepts_array_or_object() {
        let array = EngineConfig::from_json_str(r#"{ "worldOrigin": [1, 2, 3] }"#).unwrap();
        let object =
            EngineConfig::from_json_str(r#"{ "worldOrigin": { "x": 1, "y": 2, "z": 3 } }"#).unwrap();

        assert_eq!(array.world_origin(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(object.world_origin, array.world_origin);

        let err = EngineConfig::from_json_str(r#"{ "worldOrigin": { "x": 1 } }"#).unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn rejects_oversized_chunk_distance() {
        let limit = format!(r#"{{ "chunkDistance": {MAX_CHUNK_DISTANCE} }}"#);
        assert!(EngineConfig::from_json_str(&limit).is_ok());

        let err = EngineConfig::from_json_str(r#"{ "chunkDistance": 4294967295 }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_empty_materials() {
        let err = EngineConfig::from_json_str(r#"{ "materials": [] }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EngineConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, EngineError::ConfigIo(_)));
    }
}
