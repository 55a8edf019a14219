//! # Chunk Generation
//!
//! Fill strategies for world chunks that do not exist yet. The method is
//! chosen in the engine configuration under the `generate` key.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::{ChunkCoord, VoxelChunk};
use crate::engine_state::voxels::block::{VoxelValue, AIR};

/// Threshold above which Perlin noise is considered solid.
pub const PERLIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Threshold below which Perlin noise is considered solid.
pub const PERLIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scaling factor applied to voxel coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;

/// How a missing world chunk is filled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum GenerationMethod {
    /// Every voxel is air
    #[default]
    Empty,
    /// Every voxel is `value`
    Solid { value: VoxelValue },
    /// Alternating `value` and air in all three axes
    Checkerboard { value: VoxelValue },
    /// 3D Perlin noise in world voxel space; solid voxels cycle through
    /// material ids `1..=materials`
    Perlin { seed: u32, materials: VoxelValue },
    /// Each voxel is `value` with probability `density`
    Random { density: f64, value: VoxelValue },
}

impl GenerationMethod {
    /// Produces the chunk at `coord` with `size` voxels per edge.
    pub fn generate(&self, coord: ChunkCoord, size: usize) -> VoxelChunk {
        match self {
            GenerationMethod::Empty => VoxelChunk::empty(size),
            GenerationMethod::Solid { value } => solid(size, *value),
            GenerationMethod::Checkerboard { value } => checkerboard(size, *value),
            GenerationMethod::Perlin { seed, materials } => {
                perlin(coord, size, *seed, (*materials).max(1))
            }
            GenerationMethod::Random { density, value } => random(size, *density, *value),
        }
    }
}

fn solid(size: usize, value: VoxelValue) -> VoxelChunk {
    VoxelChunk::from_voxels(size, vec![value; size * size * size])
}

fn checkerboard(size: usize, value: VoxelValue) -> VoxelChunk {
    let mut chunk = VoxelChunk::empty(size);
    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                if (x + y + z) % 2 == 0 {
                    chunk.set_at(x, y, z, value);
                }
            }
        }
    }
    chunk
}

fn perlin(coord: ChunkCoord, size: usize, seed: u32, materials: VoxelValue) -> VoxelChunk {
    let noise = Perlin::new(seed);
    let mut chunk = VoxelChunk::empty(size);
    let base = [
        coord.x as i64 * size as i64,
        coord.y as i64 * size as i64,
        coord.z as i64 * size as i64,
    ];

    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let sample = noise.get([
                    (base[0] + x as i64) as f64 * PERLIN_SCALE_FACTOR,
                    (base[1] + y as i64) as f64 * PERLIN_SCALE_FACTOR,
                    (base[2] + z as i64) as f64 * PERLIN_SCALE_FACTOR,
                ]);
                if !(PERLIN_NEGATIVE_THRESHOLD..=PERLIN_POSITIVE_THRESHOLD).contains(&sample) {
                    let material = 1 + ((x + y + z) % materials as usize) as VoxelValue;
                    chunk.set_at(x, y, z, material);
                }
            }
        }
    }
    chunk
}

fn random(size: usize, density: f64, value: VoxelValue) -> VoxelChunk {
    let voxels = (0..size * size * size)
        .map(|_| if fastrand::f64() < density { value } else { AIR })
        .collect();
    VoxelChunk::from_voxels(size, voxels)
}
