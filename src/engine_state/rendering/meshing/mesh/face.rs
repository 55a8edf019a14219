use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, VoxelValue};

/// A single axis-aligned quad produced by the greedy mesher.
///
/// The four corners are in chunk voxel units and wind counter-clockwise when
/// seen from the side the face points to: lower-left, lower-right,
/// upper-right, upper-left. A greedy quad may span many voxels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner of the face in chunk coordinates
    pub ll: Point3<usize>,
    /// Lower-right corner of the face in chunk coordinates
    pub lr: Point3<usize>,
    /// Upper-right corner of the face in chunk coordinates
    pub ur: Point3<usize>,
    /// Upper-left corner of the face in chunk coordinates
    pub ul: Point3<usize>,
    /// Voxel value shared by every voxel this quad covers
    pub value: VoxelValue,
    /// Which side of the voxels this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Builds the quad at `origin` spanning `du` then `dv`.
    ///
    /// `du` and `dv` are the extents along the two in-plane axes, ordered so
    /// that `du × dv` points along the plane's positive axis. For faces on the
    /// negative side the corner order is mirrored to keep the winding
    /// counter-clockwise from outside.
    pub fn from_extents(
        origin: Point3<usize>,
        du: [usize; 3],
        dv: [usize; 3],
        value: VoxelValue,
        block_side: BlockSide,
    ) -> Self {
        let offset = |p: Point3<usize>, d: [usize; 3]| Point3::new(p.x + d[0], p.y + d[1], p.z + d[2]);
        let far = offset(offset(origin, du), dv);

        let positive = matches!(block_side, BlockSide::RIGHT | BlockSide::TOP | BlockSide::FRONT);
        let (lr, ul) = if positive {
            (offset(origin, du), offset(origin, dv))
        } else {
            (offset(origin, dv), offset(origin, du))
        };

        Face {
            ll: origin,
            lr,
            ur: far,
            ul,
            value,
            block_side,
        }
    }

    /// Length of the bottom edge, in voxels.
    pub fn width(&self) -> usize {
        manhattan(self.ll, self.lr)
    }

    /// Length of the left edge, in voxels.
    pub fn height(&self) -> usize {
        manhattan(self.ll, self.ul)
    }

    /// Number of voxel faces this quad covers.
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }
}

fn manhattan(a: Point3<usize>, b: Point3<usize>) -> usize {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y) + a.z.abs_diff(b.z)
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};

    use super::*;

    fn winding_normal(face: &Face) -> Vector3<f32> {
        let p = |p: Point3<usize>| Vector3::new(p.x as f32, p.y as f32, p.z as f32);
        (p(face.lr) - p(face.ll)).cross(p(face.ul) - p(face.ll)).normalize()
    }

    #[test]
    fn winding_matches_side_normal() {
        let cases = [
            (0, [0, 1, 0], [0, 0, 1]),
            (1, [0, 0, 1], [1, 0, 0]),
            (2, [1, 0, 0], [0, 1, 0]),
        ];
        for (axis, du, dv) in cases {
            for positive in [true, false] {
                let side = BlockSide::from_axis(axis, positive);
                let face = Face::from_extents(Point3::new(1, 1, 1), du, dv, 1, side);
                assert_eq!(winding_normal(&face), side.normal(), "{side:?}");
            }
        }
    }

    #[test]
    fn extents_give_width_and_height() {
        let face = Face::from_extents(Point3::new(0, 0, 2), [3, 0, 0], [0, 2, 0], 4, BlockSide::FRONT);
        assert_eq!(face.width(), 3);
        assert_eq!(face.height(), 2);
        assert_eq!(face.area(), 6);
        assert_eq!(face.ur, Point3::new(3, 2, 2));
    }
}
