//! Error types for the engine.

use thiserror::Error;

use super::rendering::scene::NodeId;
use super::voxels::chunk::ChunkCoord;

/// Engine-wide error type.
///
/// Reading or updating a chunk that does not exist is not an error, and
/// writing to one creates it. What remains are configuration problems,
/// malformed chunk keys at the string boundary, and failures reported by the
/// capabilities a mesh rebuild calls into.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The configuration file could not be read
    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration could not be parsed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration parsed but holds unusable values
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A chunk key string is not of the form `x|y|z`
    #[error("invalid chunk key {0:?}, expected \"x|y|z\"")]
    InvalidChunkKey(String),

    /// A scene node was referenced after it was disposed
    #[error("scene node {0:?} does not exist")]
    MissingNode(NodeId),

    /// Attaching the node would make it its own ancestor
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    SceneCycle { parent: NodeId, child: NodeId },

    /// A chunk's edge length differs from the configured chunk size
    #[error("chunk {coord} has edge length {actual}, expected {expected}")]
    ChunkSizeMismatch {
        coord: ChunkCoord,
        expected: usize,
        actual: usize,
    },

    /// Texture application failed for a rebuilt mesh
    #[error("texture application failed: {0}")]
    Texture(String),
}

/// Result type alias using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;
