//! Greedy meshing implementation for voxel rendering.
//!
//! For each axis the chunk is swept one plane at a time. A 2D mask records, for
//! every cell of the plane, whether a face is visible there, which voxel value
//! it shows and which way it points. Runs of equal mask cells are then grown
//! into the widest, then tallest, rectangle possible and emitted as one quad.
//! Faces on the chunk border are always emitted: neighbours outside the chunk
//! count as air.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, is_solid, VoxelValue},
    chunk::VoxelChunk,
};

use super::{face::Face, mesh::Mesh};

/// A visible face in the plane mask: the voxel value it shows, negated when
/// the face points along the negative axis. Zero means no face.
type MaskCell = i32;

fn mask_cell(behind: VoxelValue, ahead: VoxelValue) -> MaskCell {
    match (is_solid(behind), is_solid(ahead)) {
        (true, false) => behind as MaskCell,
        (false, true) => -(ahead as MaskCell),
        _ => 0,
    }
}

/// Generates a mesh for the whole chunk using greedy meshing.
///
/// # Arguments
/// * `chunk` - The chunk to generate the mesh for
/// * `scale` - World units per voxel edge
///
/// # Returns
/// A new `Mesh` with merged quads, positioned in `[0, size * scale]` on every axis.
///
/// # Performance
/// Runs in O(n) in the number of voxels; empty chunks return immediately.
pub fn greedy(chunk: &VoxelChunk, scale: f32) -> Mesh {
    let mut mesh = Mesh::new(scale);
    if chunk.is_empty() {
        return mesh;
    }

    let start = Instant::now();
    let size = chunk.size();
    let mut mask: Vec<MaskCell> = vec![0; size * size];

    for d in 0..3 {
        let u = (d + 1) % 3;
        let v = (d + 2) % 3;

        let mut x = [0usize; 3];
        // Plane `layer` sits between voxel layer-1 (behind) and voxel layer (ahead).
        for layer in 0..=size {
            let mut n = 0;
            for j in 0..size {
                x[v] = j;
                for i in 0..size {
                    x[u] = i;
                    let behind = if layer > 0 {
                        x[d] = layer - 1;
                        chunk.get_at(x[0], x[1], x[2])
                    } else {
                        0
                    };
                    let ahead = if layer < size {
                        x[d] = layer;
                        chunk.get_at(x[0], x[1], x[2])
                    } else {
                        0
                    };
                    mask[n] = mask_cell(behind, ahead);
                    n += 1;
                }
            }

            let mut n = 0;
            for j in 0..size {
                let mut i = 0;
                while i < size {
                    let cell = mask[n];
                    if cell == 0 {
                        i += 1;
                        n += 1;
                        continue;
                    }

                    let mut width = 1;
                    while i + width < size && mask[n + width] == cell {
                        width += 1;
                    }

                    let mut height = 1;
                    'grow: while j + height < size {
                        for k in 0..width {
                            if mask[n + k + height * size] != cell {
                                break 'grow;
                            }
                        }
                        height += 1;
                    }

                    let mut origin = [0usize; 3];
                    origin[d] = layer;
                    origin[u] = i;
                    origin[v] = j;
                    let mut du = [0usize; 3];
                    du[u] = width;
                    let mut dv = [0usize; 3];
                    dv[v] = height;

                    let face = Face::from_extents(
                        Point3::from(origin),
                        du,
                        dv,
                        cell.unsigned_abs() as VoxelValue,
                        BlockSide::from_axis(d, cell > 0),
                    );
                    mesh.geometry.push_face(&face, scale);

                    for l in 0..height {
                        for k in 0..width {
                            mask[n + k + l * size] = 0;
                        }
                    }

                    i += width;
                    n += width;
                }
            }
        }
    }

    debug!(
        "Greedy meshed {} solid voxels into {} faces in {:?}",
        chunk.solid_count(),
        mesh.geometry.face_count(),
        start.elapsed()
    );

    mesh
}
