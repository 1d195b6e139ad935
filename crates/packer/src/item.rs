//! Packable items.

use nalgebra::Vector3;
use stowage_core::geometry::Point;
use stowage_core::{Error, Orientation, Placement, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of an item.
pub type ItemId = String;

/// How a composite item was built from identical constituents.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fusion {
    /// Multiples along length, breadth and height of the base dimensions.
    pub factors: [usize; 3],
    /// Constituents in grid order (length-major, then breadth, then height).
    pub constituents: Vec<Item>,
}

/// A box to be packed.
///
/// Items are values: rotating or placing an item produces an updated copy
/// rather than mutating a shared record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Unique identifier.
    id: ItemId,

    /// Un-rotated dimensions (length, breadth, height).
    dimensions: Vector3<f64>,

    /// Weight counted against the container limit.
    weight: f64,

    /// Whether the item may be rotated.
    spinnable: bool,

    /// Whether other items may not be stacked on top of it.
    unstackable: bool,

    /// Optional type tag.
    item_type: Option<String>,

    /// Types that must not share a container with this item.
    incompatible_types: Vec<String>,

    /// Marker for heavy-first loading. Carried through packing untouched.
    heavy: bool,

    /// Centre in the container frame (meaningful once packed).
    position: Point,

    /// Current orientation.
    orientation: Orientation,

    /// Whether the item has been committed to a region.
    packed: bool,

    /// Present on composites built by fusion.
    fusion: Option<Fusion>,
}

impl Item {
    /// Creates a new spinnable, stackable item with zero weight.
    pub fn new(id: impl Into<ItemId>, length: f64, breadth: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            dimensions: Vector3::new(length, breadth, height),
            weight: 0.0,
            spinnable: true,
            unstackable: false,
            item_type: None,
            incompatible_types: Vec::new(),
            heavy: false,
            position: Point::origin(),
            orientation: Orientation::Identity,
            packed: false,
            fusion: None,
        }
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets whether the item may be rotated.
    pub fn with_spinnable(mut self, spinnable: bool) -> Self {
        self.spinnable = spinnable;
        self
    }

    /// Sets whether nothing may be stacked on the item.
    pub fn with_unstackable(mut self, unstackable: bool) -> Self {
        self.unstackable = unstackable;
        self
    }

    /// Sets the type tag.
    pub fn with_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Sets the types this item cannot share a container with.
    pub fn with_incompatible_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.incompatible_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the heavy marker.
    pub fn with_heavy(mut self, heavy: bool) -> Self {
        self.heavy = heavy;
        self
    }

    /// Returns the same item turned to `orientation`.
    ///
    /// Rotation always starts from the base dimensions, so the previous
    /// orientation is implicitly undone first.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Returns the same item back in its un-rotated orientation.
    pub fn restore_orientation(self) -> Self {
        self.with_orientation(Orientation::Identity)
    }

    /// Returns the identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the oriented dimensions (x, y, z) in the container frame.
    pub fn dimensions(&self) -> Vector3<f64> {
        self.orientation.apply(&self.dimensions)
    }

    /// Returns the un-rotated dimensions (length, breadth, height).
    pub fn base_dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Dimensions the item would have in `orientation`.
    pub fn dimensions_for(&self, orientation: Orientation) -> Vector3<f64> {
        orientation.apply(&self.dimensions)
    }

    /// Returns the volume.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Returns the weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns whether the item may be rotated.
    pub fn is_spinnable(&self) -> bool {
        self.spinnable
    }

    /// Returns whether nothing may be stacked on the item.
    pub fn is_unstackable(&self) -> bool {
        self.unstackable
    }

    /// Returns the type tag.
    pub fn item_type(&self) -> Option<&str> {
        self.item_type.as_deref()
    }

    /// Returns the incompatible types.
    pub fn incompatible_types(&self) -> &[String] {
        &self.incompatible_types
    }

    /// Returns the heavy marker.
    pub fn is_heavy(&self) -> bool {
        self.heavy
    }

    /// Returns the centre position in the container frame.
    pub fn position(&self) -> &Point {
        &self.position
    }

    /// Returns the current orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns whether the item has been packed.
    pub fn is_packed(&self) -> bool {
        self.packed
    }

    /// Returns whether this is a composite built by fusion.
    pub fn is_fused(&self) -> bool {
        self.fusion.is_some()
    }

    /// Returns the fusion record of a composite.
    pub fn fusion(&self) -> Option<&Fusion> {
        self.fusion.as_ref()
    }

    /// Orientations the packer may try for this item.
    pub fn allowed_orientations(&self) -> &'static [Orientation] {
        const SPUN: &[Orientation] = &Orientation::ALL;
        const FIXED: &[Orientation] = &[Orientation::Identity];

        if self.spinnable {
            SPUN
        } else {
            FIXED
        }
    }

    /// Converts a packed item into a placement record.
    pub fn to_placement(&self, container_id: &str) -> Placement {
        Placement::new(
            self.id.clone(),
            container_id,
            self.position,
            self.dimensions(),
            self.orientation,
        )
        .with_weight(self.weight)
    }

    /// Checks that the item can be handed to the packer.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidItem("item id must not be empty".into()));
        }

        if self
            .dimensions
            .iter()
            .any(|d| !d.is_finite() || *d <= 0.0)
        {
            return Err(Error::InvalidItem(format!(
                "All dimensions for '{}' must be positive",
                self.id
            )));
        }

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(Error::InvalidItem(format!(
                "Weight for '{}' cannot be negative",
                self.id
            )));
        }

        Ok(())
    }

    /// Commits the item at `position` in `orientation`.
    pub(crate) fn place(&mut self, position: Point, orientation: Orientation) {
        self.position = position;
        self.orientation = orientation;
        self.packed = true;
    }

    /// Returns the item unplaced, at the origin, in its base orientation.
    pub(crate) fn unplaced(mut self) -> Self {
        self.position = Point::origin();
        self.orientation = Orientation::Identity;
        self.packed = false;
        self
    }

    /// Builds a composite from `constituents` scaled by `factors`.
    pub(crate) fn composite(id: ItemId, factors: [usize; 3], constituents: Vec<Item>) -> Self {
        let unit = &constituents[0];
        let dimensions = Vector3::new(
            unit.dimensions.x * factors[0] as f64,
            unit.dimensions.y * factors[1] as f64,
            unit.dimensions.z * factors[2] as f64,
        );

        Self {
            id,
            dimensions,
            weight: constituents.iter().map(|c| c.weight).sum(),
            spinnable: constituents.iter().all(|c| c.spinnable),
            unstackable: constituents.iter().all(|c| c.unstackable),
            item_type: unit.item_type.clone(),
            incompatible_types: unit.incompatible_types.clone(),
            heavy: constituents.iter().any(|c| c.heavy),
            position: Point::origin(),
            orientation: Orientation::Identity,
            packed: false,
            fusion: Some(Fusion {
                factors,
                constituents,
            }),
        }
    }

    /// Splits a composite into its fusion record and the composite shell.
    pub(crate) fn take_fusion(&mut self) -> Option<Fusion> {
        self.fusion.take()
    }

    /// Marks a constituent with its composite's placement state.
    pub(crate) fn inherit_placement(
        &mut self,
        position: Point,
        orientation: Orientation,
        packed: bool,
    ) {
        self.position = position;
        self.orientation = orientation;
        self.packed = packed;
    }
}
