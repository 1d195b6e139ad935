//! Sort orders used by the packing passes.

use crate::item::Item;
use crate::region::{RegionId, SplitKind};
use nalgebra::Vector3;
use std::cmp::Ordering;
use stowage_core::Orientation;

/// An item, in one orientation, that fits one region.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Region the item would go into.
    pub region: RegionId,
    /// Index of the item in the list being packed.
    pub item: usize,
    /// Orientation tried.
    pub orientation: Orientation,
    /// Item dimensions in that orientation.
    pub dimensions: Vector3<f64>,
    /// Length of the region.
    pub region_length: f64,
}

impl Candidate {
    fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Volume left in the region's length slab beside the item.
    fn length_slack(&self) -> f64 {
        (self.region_length - self.dimensions.x) * self.dimensions.z * self.dimensions.y
    }
}

/// Packing order of items: largest volume first, lighter first on ties.
///
/// Used with a stable sort so equal items keep their input order.
pub fn compare_items(a: &Item, b: &Item) -> Ordering {
    b.volume()
        .total_cmp(&a.volume())
        .then_with(|| a.weight().total_cmp(&b.weight()))
}

/// Sorts items into packing order.
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(compare_items);
}

/// Ranks the (region, orientation) choices for a single item.
///
/// - length and root regions: lowest resulting height first
/// - height regions: longest resulting length first
/// - breadth regions: least length slack first
pub fn rank_for_item(kind: SplitKind, a: &Candidate, b: &Candidate) -> Ordering {
    match kind {
        SplitKind::Root | SplitKind::Length => a.dimensions.z.total_cmp(&b.dimensions.z),
        SplitKind::Height => b.dimensions.x.total_cmp(&a.dimensions.x),
        SplitKind::Breadth => a.length_slack().total_cmp(&b.length_slack()),
    }
}

/// Ranks the (item, orientation) choices for a single region.
///
/// Height regions prefer the longest item, every other region the
/// largest. Ties fall back to [`rank_for_item`].
pub fn rank_for_region(kind: SplitKind, a: &Candidate, b: &Candidate) -> Ordering {
    let primary = match kind {
        SplitKind::Height => b.dimensions.x.total_cmp(&a.dimensions.x),
        _ => b.volume().total_cmp(&a.volume()),
    };
    primary.then_with(|| rank_for_item(kind, a, b))
}
