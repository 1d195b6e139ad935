//! # Stowage Core
//!
//! Core types shared by the Stowage packing crates.
//!
//! ## Core Components
//!
//! - **Geometry**: [`Face`], [`Polyhedron`] - convex container contours and containment
//! - **Orientation**: [`Orientation`] - the six axis-aligned box permutations
//! - **Boxes**: [`AABB3D`] - axis-aligned boxes in a container frame
//! - **Results**: [`Placement`], [`PackSummary`]
//! - **Solver trait**: [`Solver`] with its [`Config`]
//!
//! ## Coordinate frame
//!
//! Each container has its own frame with the origin at the container centre,
//! `x` along length, `y` along breadth and `z` vertical.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod geometry;
pub mod orientation;
pub mod placement;
pub mod result;
pub mod solver;
pub mod transform;

// Re-exports
pub use error::{Error, Result};
pub use geometry::{Face, Point, Polyhedron};
pub use orientation::Orientation;
pub use placement::{Placement, PlacementStats};
pub use result::PackSummary;
pub use solver::{Config, Solver, DEFAULT_TOLERANCE};
pub use transform::AABB3D;
