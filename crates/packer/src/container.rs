//! Containers items are loaded into.

use nalgebra::Vector3;
use stowage_core::geometry::Polyhedron;
use stowage_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A container (truck body, ULD, crate) to pack into.
///
/// Without a contour the container is treated as a plain box and the
/// containment test is skipped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Container {
    /// Unique identifier.
    id: String,

    /// Dimensions (length, breadth, height).
    dimensions: Vector3<f64>,

    /// Maximum total weight allowed.
    weight_limit: Option<f64>,

    /// Convex contour for non-rectangular containers.
    contour: Option<Polyhedron>,
}

impl Container {
    /// Creates a new box-shaped container with the given dimensions.
    pub fn new(id: impl Into<String>, length: f64, breadth: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            dimensions: Vector3::new(length, breadth, height),
            weight_limit: None,
            contour: None,
        }
    }

    /// Sets the maximum allowed weight.
    pub fn with_weight_limit(mut self, limit: f64) -> Self {
        self.weight_limit = Some(limit);
        self
    }

    /// Sets a convex contour in the container frame.
    pub fn with_contour(mut self, contour: Polyhedron) -> Self {
        self.contour = Some(contour);
        self
    }

    /// Uses the explicit box contour of the container's own dimensions.
    pub fn with_box_contour(self) -> Self {
        let contour = Polyhedron::cuboid(self.length(), self.breadth(), self.height());
        self.with_contour(contour)
    }

    /// Returns the identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the dimensions (length, breadth, height).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Returns the length.
    pub fn length(&self) -> f64 {
        self.dimensions.x
    }

    /// Returns the breadth.
    pub fn breadth(&self) -> f64 {
        self.dimensions.y
    }

    /// Returns the height.
    pub fn height(&self) -> f64 {
        self.dimensions.z
    }

    /// Returns the volume of the bounding box.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Returns the weight limit.
    pub fn weight_limit(&self) -> Option<f64> {
        self.weight_limit
    }

    /// Returns the contour, if any.
    pub fn contour(&self) -> Option<&Polyhedron> {
        self.contour.as_ref()
    }

    /// Checks that the container can be packed into.
    pub fn validate(&self) -> Result<()> {
        if self
            .dimensions
            .iter()
            .any(|d| !d.is_finite() || *d <= 0.0)
        {
            return Err(Error::InvalidContainer(format!(
                "All dimensions for '{}' must be positive",
                self.id
            )));
        }

        if let Some(limit) = self.weight_limit {
            if limit.is_nan() || limit < 0.0 {
                return Err(Error::InvalidContainer(format!(
                    "Weight limit for '{}' cannot be negative",
                    self.id
                )));
            }
        }

        Ok(())
    }
}
