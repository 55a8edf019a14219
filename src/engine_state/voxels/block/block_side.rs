//! # Block Side Module
//!
//! The six axis-aligned faces of a voxel.

use cgmath::Vector3;

/// One of the six faces of a voxel, named by the direction its normal points.
///
/// The discriminants are stable and used to index per-side arrays.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// Facing positive Z
    FRONT = 0,

    /// Facing negative Z
    BACK = 1,

    /// Facing negative Y
    BOTTOM = 2,

    /// Facing positive Y
    TOP = 3,

    /// Facing negative X
    LEFT = 4,

    /// Facing positive X
    RIGHT = 5,
}

impl BlockSide {
    /// Returns all six faces in discriminant order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The face whose normal points along `axis` (0 = X, 1 = Y, 2 = Z),
    /// in the positive direction when `positive` is set.
    ///
    /// # Panics
    /// Panics if `axis` is not 0, 1 or 2.
    pub fn from_axis(axis: usize, positive: bool) -> Self {
        match (axis, positive) {
            (0, true) => BlockSide::RIGHT,
            (0, false) => BlockSide::LEFT,
            (1, true) => BlockSide::TOP,
            (1, false) => BlockSide::BOTTOM,
            (2, true) => BlockSide::FRONT,
            (2, false) => BlockSide::BACK,
            _ => panic!("axis {axis} out of range"),
        }
    }

    /// Unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        match self {
            BlockSide::FRONT => Vector3::new(0.0, 0.0, 1.0),
            BlockSide::BACK => Vector3::new(0.0, 0.0, -1.0),
            BlockSide::BOTTOM => Vector3::new(0.0, -1.0, 0.0),
            BlockSide::TOP => Vector3::new(0.0, 1.0, 0.0),
            BlockSide::LEFT => Vector3::new(-1.0, 0.0, 0.0),
            BlockSide::RIGHT => Vector3::new(1.0, 0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_axis_matches_normal() {
        for axis in 0..3 {
            for positive in [true, false] {
                let side = BlockSide::from_axis(axis, positive);
                let expected = if positive { 1.0 } else { -1.0 };
                assert_eq!(side.normal()[axis], expected);
            }
        }
    }

    #[test]
    fn discriminants_follow_all() {
        for (i, side) in BlockSide::all().iter().enumerate() {
            assert_eq!(*side as usize, i);
        }
    }
}
