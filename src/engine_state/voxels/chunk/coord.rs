//! # Chunk Coordinates
//!
//! Integer chunk positions used as map keys by the world registry and by
//! detached groups. The `x|y|z` string form only exists at the boundary: it
//! is what `Display` prints and what `FromStr` accepts.

use std::fmt;
use std::str::FromStr;

use cgmath::{Point3, Vector3};

use crate::engine_state::error::EngineError;

/// Position of a chunk in chunk units (not voxels, not world units).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// The chunk at the origin, `0|0|0`.
    pub const ORIGIN: ChunkCoord = ChunkCoord { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset of this chunk's lattice cell, scaled by the world-space
    /// edge length of one chunk.
    pub fn lattice_offset(&self, chunk_world_size: f32) -> Vector3<f32> {
        Vector3::new(
            self.x as f32 * chunk_world_size,
            self.y as f32 * chunk_world_size,
            self.z as f32 * chunk_world_size,
        )
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.x, self.y, self.z)
    }
}

impl FromStr for ChunkCoord {
    type Err = EngineError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidChunkKey(key.to_string());

        let mut parts = key.split('|');
        let mut next = || -> Result<i32, EngineError> {
            parts
                .next()
                .ok_or_else(invalid)?
                .trim()
                .parse::<i32>()
                .map_err(|_| invalid())
        };
        let coord = ChunkCoord::new(next()?, next()?, next()?);

        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(coord)
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        ChunkCoord::new(x, y, z)
    }
}

impl From<[i32; 3]> for ChunkCoord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        ChunkCoord::new(x, y, z)
    }
}

impl From<Point3<i32>> for ChunkCoord {
    fn from(p: Point3<i32>) -> Self {
        ChunkCoord::new(p.x, p.y, p.z)
    }
}

impl From<ChunkCoord> for Point3<i32> {
    fn from(c: ChunkCoord) -> Self {
        Point3::new(c.x, c.y, c.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_pipe_separated_components() {
        assert_eq!(ChunkCoord::new(1, -2, 3).to_string(), "1|-2|3");
        assert_eq!(ChunkCoord::ORIGIN.to_string(), "0|0|0");
    }

    #[test]
    fn parses_keys() {
        assert_eq!("5|0|0".parse::<ChunkCoord>().unwrap(), ChunkCoord::new(5, 0, 0));
        assert_eq!("-1|7|-9".parse::<ChunkCoord>().unwrap(), ChunkCoord::new(-1, 7, -9));
    }

    #[test]
    fn rejects_malformed_keys() {
        for key in ["", "1|2", "1|2|3|4", "a|b|c", "1,2,3", "1||3"] {
            let err = key.parse::<ChunkCoord>().unwrap_err();
            assert!(matches!(err, EngineError::InvalidChunkKey(ref k) if k == key), "{key}");
        }
    }

    #[test]
    fn lattice_offset_scales_every_axis() {
        let offset = ChunkCoord::new(1, -1, 2).lattice_offset(800.0);
        assert_eq!(offset, Vector3::new(800.0, -800.0, 1600.0));
    }
}
