//! Placement representation for packed items.

use crate::geometry::Point;
use crate::orientation::Orientation;
use crate::transform::AABB3D;
use nalgebra::Vector3;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where one item ended up inside a container.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// The ID of the placed item.
    pub item_id: String,

    /// The ID of the container holding the item.
    pub container_id: String,

    /// Centre of the item in the container frame.
    pub position: Point,

    /// Oriented dimensions `(x, y, z)` as placed.
    pub dimensions: Vector3<f64>,

    /// Orientation applied to the item's base dimensions.
    pub orientation: Orientation,

    /// Weight of the item.
    pub weight: f64,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(
        item_id: impl Into<String>,
        container_id: impl Into<String>,
        position: Point,
        dimensions: Vector3<f64>,
        orientation: Orientation,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            container_id: container_id.into(),
            position,
            dimensions,
            orientation,
            weight: 0.0,
        }
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Returns the bounding box occupied by the item.
    pub fn bounds(&self) -> AABB3D<f64> {
        AABB3D::from_center(&self.position, &self.dimensions)
    }

    /// Returns the occupied volume.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }
}

/// Placement statistics for a set of placements.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementStats {
    /// Total number of placements.
    pub count: usize,
    /// Total weight placed.
    pub total_weight: f64,
    /// Distribution of orientation indices used.
    pub orientation_distribution: HashMap<usize, usize>,
    /// Distribution of placements per container.
    pub container_distribution: HashMap<String, usize>,
}

impl PlacementStats {
    /// Computes statistics from a set of placements.
    pub fn from_placements(placements: &[Placement]) -> Self {
        let mut stats = Self {
            count: placements.len(),
            ..Default::default()
        };

        for p in placements {
            stats.total_weight += p.weight;
            *stats
                .orientation_distribution
                .entry(p.orientation.index())
                .or_insert(0) += 1;
            *stats
                .container_distribution
                .entry(p.container_id.clone())
                .or_insert(0) += 1;
        }

        stats
    }
}
