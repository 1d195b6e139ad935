//! Axis-aligned boxes in a container frame.

use nalgebra::{Point3, RealField, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in 3D.
///
/// `x` runs along container length, `y` along breadth and `z` is vertical.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AABB3D<S> {
    /// Minimum x coordinate.
    pub min_x: S,
    /// Minimum y coordinate.
    pub min_y: S,
    /// Minimum z coordinate.
    pub min_z: S,
    /// Maximum x coordinate.
    pub max_x: S,
    /// Maximum y coordinate.
    pub max_y: S,
    /// Maximum z coordinate.
    pub max_z: S,
}

impl<S: RealField + Copy> AABB3D<S> {
    /// Creates a new AABB from min/max coordinates.
    pub fn new(min_x: S, min_y: S, min_z: S, max_x: S, max_y: S, max_z: S) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Creates an AABB from its minimum corner and extents.
    pub fn from_origin(origin: &Point3<S>, extents: &Vector3<S>) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.z,
            origin.x + extents.x,
            origin.y + extents.y,
            origin.z + extents.z,
        )
    }

    /// Creates an AABB centred on `center` with the given full extents.
    pub fn from_center(center: &Point3<S>, extents: &Vector3<S>) -> Self {
        let two = S::one() + S::one();
        let half = extents / two;
        Self::new(
            center.x - half.x,
            center.y - half.y,
            center.z - half.z,
            center.x + half.x,
            center.y + half.y,
            center.z + half.z,
        )
    }

    /// Returns the width (x dimension) of the AABB.
    pub fn width(&self) -> S {
        self.max_x - self.min_x
    }

    /// Returns the depth (y dimension) of the AABB.
    pub fn depth(&self) -> S {
        self.max_y - self.min_y
    }

    /// Returns the height (z dimension) of the AABB.
    pub fn height(&self) -> S {
        self.max_z - self.min_z
    }

    /// Returns the volume of the AABB.
    pub fn volume(&self) -> S {
        self.width() * self.depth() * self.height()
    }

    /// Returns the eight corners, minimum corner first.
    pub fn corners(&self) -> [Point3<S>; 8] {
        [
            Point3::new(self.min_x, self.min_y, self.min_z),
            Point3::new(self.min_x, self.min_y, self.max_z),
            Point3::new(self.min_x, self.max_y, self.min_z),
            Point3::new(self.min_x, self.max_y, self.max_z),
            Point3::new(self.max_x, self.min_y, self.min_z),
            Point3::new(self.max_x, self.min_y, self.max_z),
            Point3::new(self.max_x, self.max_y, self.min_z),
            Point3::new(self.max_x, self.max_y, self.max_z),
        ]
    }

    /// Checks if `other` lies inside this AABB, allowing `epsilon` of slack.
    pub fn contains(&self, other: &Self, epsilon: S) -> bool {
        other.min_x >= self.min_x - epsilon
            && other.min_y >= self.min_y - epsilon
            && other.min_z >= self.min_z - epsilon
            && other.max_x <= self.max_x + epsilon
            && other.max_y <= self.max_y + epsilon
            && other.max_z <= self.max_z + epsilon
    }

    /// Checks if the interiors overlap by more than `epsilon` on every axis.
    ///
    /// Boxes that only share a face do not overlap.
    pub fn overlaps(&self, other: &Self, epsilon: S) -> bool {
        self.min_x + epsilon < other.max_x
            && other.min_x + epsilon < self.max_x
            && self.min_y + epsilon < other.max_y
            && other.min_y + epsilon < self.max_y
            && self.min_z + epsilon < other.max_z
            && other.min_z + epsilon < self.max_z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_center_round_trip() {
        let aabb = AABB3D::from_center(&Point3::new(0.0, 0.0, 0.0), &Vector3::new(10.0, 20.0, 30.0));
        assert_relative_eq!(aabb.min_x, -5.0);
        assert_relative_eq!(aabb.max_z, 15.0);
        assert_relative_eq!(aabb.volume(), 6000.0);
    }

    #[test]
    fn test_touching_boxes_do_not_overlap() {
        let a = AABB3D::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        let b = AABB3D::new(10.0, 0.0, 0.0, 20.0, 10.0, 10.0);
        assert!(!a.overlaps(&b, 1e-9));

        let c = AABB3D::new(5.0, 5.0, 5.0, 15.0, 15.0, 15.0);
        assert!(a.overlaps(&c, 1e-9));
    }

    #[test]
    fn test_contains_with_slack() {
        let outer = AABB3D::new(-50.0, -50.0, -50.0, 50.0, 50.0, 50.0);
        let inner = AABB3D::new(0.0, 0.0, 0.0, 50.0 + 1e-12, 50.0, 50.0);
        assert!(outer.contains(&inner, 1e-9));
        assert!(!outer.contains(&inner, 0.0));
        assert_eq!(outer.corners().len(), 8);
    }
}
