//! Convex container contours.
//!
//! A contour is a convex polyhedron given as a set of planar faces whose
//! normals point outward. Coordinates are in the container frame: origin at
//! the container centre, `x` along length, `y` along breadth, `z` vertical.

use crate::transform::AABB3D;
use crate::{Error, Result};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in a container frame.
pub type Point = Point3<f64>;

/// Dot products below this (after normalisation) put a point outside a face.
pub const CONTAINMENT_EPSILON: f64 = 1e-15;

/// One planar boundary of a contour.
///
/// Point order fixes the winding: the normal is the cross product of the
/// edges leaving the first vertex towards the second and third.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Point>", into = "Vec<Point>"))]
pub struct Face {
    points: Vec<Point>,
}

impl Face {
    /// Creates a face, rejecting fewer than 3 points or a degenerate normal.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::InvalidContour(format!(
                "a face needs at least 3 points, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
            return Err(Error::InvalidContour(
                "face points must be finite".into(),
            ));
        }

        let face = Self { points };
        if face.raw_normal().norm() == 0.0 {
            return Err(Error::InvalidContour(
                "the first three points of a face are collinear".into(),
            ));
        }
        Ok(face)
    }

    /// Returns the points of the face.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    fn raw_normal(&self) -> Vector3<f64> {
        let dir1 = self.points[1] - self.points[0];
        let dir2 = self.points[2] - self.points[0];
        dir1.cross(&dir2)
    }

    /// Unit vector orthogonal to the face plane.
    pub fn normal(&self) -> Vector3<f64> {
        let normal = self.raw_normal();
        normal / normal.norm()
    }
}

impl TryFrom<Vec<Point>> for Face {
    type Error = Error;

    fn try_from(points: Vec<Point>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Face> for Vec<Point> {
    fn from(face: Face) -> Self {
        face.points
    }
}

/// A convex polyhedron used as a container contour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Face>", into = "Vec<Face>"))]
pub struct Polyhedron {
    faces: Vec<Face>,
}

impl Polyhedron {
    /// Creates a polyhedron from faces. At least one face is required.
    pub fn new(faces: Vec<Face>) -> Result<Self> {
        if faces.is_empty() {
            return Err(Error::InvalidContour("a contour needs at least one face".into()));
        }
        Ok(Self { faces })
    }

    /// Builds the closed box contour of an `l × b × h` container.
    ///
    /// Each face is a closed 5-point loop whose winding gives an outward normal.
    pub fn cuboid(l: f64, b: f64, h: f64) -> Self {
        let (x, y, z) = (l / 2.0, b / 2.0, h / 2.0);
        let loop5 = |pts: [(f64, f64, f64); 4]| Face {
            points: pts
                .iter()
                .chain(std::iter::once(&pts[0]))
                .map(|&(px, py, pz)| Point::new(px, py, pz))
                .collect(),
        };

        Self {
            faces: vec![
                // floor
                loop5([(-x, -y, -z), (-x, y, -z), (x, y, -z), (x, -y, -z)]),
                // front (+x)
                loop5([(x, -y, -z), (x, y, -z), (x, y, z), (x, -y, z)]),
                // roof
                loop5([(x, -y, z), (x, y, z), (-x, y, z), (-x, -y, z)]),
                // back (-x)
                loop5([(-x, -y, z), (-x, y, z), (-x, y, -z), (-x, -y, -z)]),
                // right (+y)
                loop5([(-x, y, z), (x, y, z), (x, y, -z), (-x, y, -z)]),
                // left (-y)
                loop5([(-x, -y, z), (-x, -y, -z), (x, -y, -z), (x, -y, z)]),
            ],
        }
    }

    /// Returns the faces.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Checks whether `p` lies on the interior side of every face.
    ///
    /// A point sitting exactly on a face's first vertex satisfies that face.
    pub fn contains_point(&self, p: &Point) -> bool {
        self.faces.iter().all(|face| {
            let to_face = face.points[0] - p;
            let magnitude = to_face.norm();
            if magnitude == 0.0 {
                return true;
            }
            to_face.dot(&face.normal()) / magnitude >= -CONTAINMENT_EPSILON
        })
    }

    /// Checks whether all eight corners of `aabb` lie inside the contour.
    pub fn contains_box(&self, aabb: &AABB3D<f64>) -> bool {
        aabb.corners().iter().all(|corner| self.contains_point(corner))
    }
}

impl TryFrom<Vec<Face>> for Polyhedron {
    type Error = Error;

    fn try_from(faces: Vec<Face>) -> Result<Self> {
        Self::new(faces)
    }
}

impl From<Polyhedron> for Vec<Face> {
    fn from(polyhedron: Polyhedron) -> Self {
        polyhedron.faces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_is_unit_and_outward() {
        let contour = Polyhedron::cuboid(10.0, 20.0, 30.0);
        let floor = &contour.faces()[0];
        assert_relative_eq!(floor.normal(), Vector3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(contour.faces()[1].normal(), Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(contour.faces()[4].normal(), Vector3::new(0.0, 1.0, 0.0));
        for face in contour.faces() {
            assert_relative_eq!(face.normal().norm(), 1.0);
            assert_eq!(face.points().len(), 5);
            assert_eq!(face.points()[0], face.points()[4]);
        }
    }

    #[test]
    fn test_cuboid_contains_points() {
        let contour = Polyhedron::cuboid(10.0, 10.0, 10.0);
        assert!(contour.contains_point(&Point::new(0.0, 0.0, 0.0)));
        assert!(contour.contains_point(&Point::new(5.0, 5.0, 5.0)));
        assert!(contour.contains_point(&Point::new(-5.0, 2.0, -5.0)));
        assert!(!contour.contains_point(&Point::new(5.1, 0.0, 0.0)));
        assert!(!contour.contains_point(&Point::new(0.0, 0.0, -6.0)));
    }

    #[test]
    fn test_contains_box() {
        let contour = Polyhedron::cuboid(10.0, 10.0, 10.0);
        let inside = AABB3D::new(-5.0, -5.0, -5.0, 0.0, 0.0, 0.0);
        let poking_out = AABB3D::new(-5.0, -5.0, -5.0, 6.0, 0.0, 0.0);
        assert!(contour.contains_box(&inside));
        assert!(!contour.contains_box(&poking_out));
    }

    #[test]
    fn test_sloped_roof() {
        // Cuboid 10×10×10 with the +x top edge cut by the plane x + z = 5.
        let mut faces = Polyhedron::cuboid(10.0, 10.0, 10.0).faces().to_vec();
        let slope = Face::new(vec![
            Point::new(5.0, -5.0, 0.0),
            Point::new(5.0, 5.0, 0.0),
            Point::new(0.0, 5.0, 5.0),
            Point::new(0.0, -5.0, 5.0),
        ])
        .unwrap();
        assert_relative_eq!(
            slope.normal(),
            Vector3::new(1.0, 0.0, 1.0) / 2.0_f64.sqrt(),
            epsilon = 1e-12
        );
        faces.push(slope);
        let contour = Polyhedron::new(faces).unwrap();

        assert!(contour.contains_point(&Point::new(-4.0, 0.0, 4.0)));
        assert!(!contour.contains_point(&Point::new(4.0, 0.0, 4.0)));
    }

    #[test]
    fn test_invalid_faces() {
        assert!(Face::new(vec![Point::origin(), Point::new(1.0, 0.0, 0.0)]).is_err());
        assert!(Face::new(vec![
            Point::origin(),
            Point::new(1.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
        ])
        .is_err());
        assert!(Polyhedron::new(Vec::new()).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_faces() {
        let face: Face = serde_json::from_str("[[0, 0, 0], [0, 1, 0], [1, 1, 0]]").unwrap();
        assert_relative_eq!(face.normal(), Vector3::new(0.0, 0.0, -1.0));

        assert!(serde_json::from_str::<Face>("[[0, 0, 0], [1, 0, 0]]").is_err());
        assert!(serde_json::from_str::<Face>("[[0, 0, 0], [1, 0, 0], [2, 0, 0]]").is_err());
        assert!(serde_json::from_str::<Polyhedron>("[]").is_err());

        let contour = Polyhedron::cuboid(2.0, 2.0, 2.0);
        let json = serde_json::to_string(&contour).unwrap();
        assert_eq!(serde_json::from_str::<Polyhedron>(&json).unwrap(), contour);
    }

    #[test]
    fn test_point_on_vertex_is_inside() {
        let contour = Polyhedron::cuboid(2.0, 2.0, 2.0);
        assert!(contour.contains_point(&Point::new(-1.0, -1.0, -1.0)));
    }
}
