//! Free regions of a container and the arena that owns them.
//!
//! A region is an empty axis-aligned box inside a container. Committing an
//! item at a region's minimum corner consumes the region and replaces it with
//! three guillotine residues (length, breadth and height). Regions are never
//! removed from the arena; consumed ones are tombstoned so that ids stay
//! stable for the whole packing call.

use crate::container::Container;
use crate::item::Item;
use nalgebra::Vector3;
use std::collections::BTreeSet;
use stowage_core::geometry::{Point, Polyhedron};
use stowage_core::{Orientation, AABB3D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable index of a region inside its [`RegionArena`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionId(usize);

impl RegionId {
    /// Position of the region in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which cut produced a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SplitKind {
    /// The whole container.
    Root,
    /// Space left beyond the item along the length axis.
    Length,
    /// Space left beside the item along the breadth axis.
    Breadth,
    /// Space left above the item.
    Height,
}

impl SplitKind {
    /// Number of candidate buckets used by the first pass.
    pub const BUCKETS: usize = 3;

    /// Bucket of the first pass; lower buckets are filled first.
    ///
    /// The root region shares the length bucket.
    pub fn precedence(self) -> usize {
        match self {
            SplitKind::Height => 0,
            SplitKind::Breadth => 1,
            SplitKind::Length | SplitKind::Root => 2,
        }
    }

    /// Kind whose ranking rules apply to a first-pass bucket.
    pub fn for_bucket(bucket: usize) -> Self {
        match bucket {
            0 => SplitKind::Height,
            1 => SplitKind::Breadth,
            _ => SplitKind::Length,
        }
    }

    /// Whether the region lies beside (rather than above) earlier items.
    pub fn is_lateral(self) -> bool {
        !matches!(self, SplitKind::Height)
    }
}

/// A free box inside a container.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    id: RegionId,

    /// Free space along (length, breadth, height).
    dimensions: Vector3<f64>,

    /// Minimum corner in the container frame.
    origin: Point,

    /// Height of the region floor above the container floor.
    elevation: f64,

    kind: SplitKind,

    /// Only unstackable items may go here (the space above an unstackable item).
    reserved_for_unstackable: bool,

    /// Visited by the second pass.
    checked: bool,

    /// Replaced by its residues.
    consumed: bool,
}

impl Region {
    /// The region covering a whole container.
    pub fn root(container: &Container) -> Self {
        let dimensions = *container.dimensions();
        Self {
            id: RegionId(0),
            dimensions,
            origin: Point::from(-dimensions / 2.0),
            elevation: 0.0,
            kind: SplitKind::Root,
            reserved_for_unstackable: false,
            checked: false,
            consumed: false,
        }
    }

    /// Returns the id.
    pub fn id(&self) -> RegionId {
        self.id
    }

    /// Returns the free dimensions (length, breadth, height).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Returns the minimum corner in the container frame.
    pub fn origin(&self) -> &Point {
        &self.origin
    }

    /// Returns the centre in the container frame.
    pub fn center(&self) -> Point {
        self.origin + self.dimensions / 2.0
    }

    /// Returns the height of the region floor above the container floor.
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Returns the split kind.
    pub fn kind(&self) -> SplitKind {
        self.kind
    }

    /// Returns whether the region is reserved for unstackable items.
    pub fn is_reserved_for_unstackable(&self) -> bool {
        self.reserved_for_unstackable
    }

    /// Returns whether the second pass has visited the region.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Returns whether the region has been replaced by its residues.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Returns the free volume.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// A region is root when it sits on the container floor.
    pub fn is_root(&self) -> bool {
        self.elevation == 0.0
    }

    /// Returns the box the region occupies.
    pub fn bounds(&self) -> AABB3D<f64> {
        AABB3D::from_origin(&self.origin, &self.dimensions)
    }

    /// Checks whether `item`, oriented to `dims`, may go into this region.
    ///
    /// Unstackable items stay on the floor (or on top of other unstackable
    /// items); stackable items never enter space reserved above an
    /// unstackable item.
    pub fn fits(
        &self,
        dims: &Vector3<f64>,
        item: &Item,
        committed_weight: f64,
        weight_limit: f64,
        tolerance: f64,
    ) -> bool {
        if self.kind.is_lateral() && item.is_unstackable() && !self.is_root() {
            return false;
        }
        if !item.is_unstackable() && self.reserved_for_unstackable {
            return false;
        }

        dims.x <= self.dimensions.x + tolerance
            && dims.y <= self.dimensions.y + tolerance
            && dims.z <= self.dimensions.z + tolerance
            && committed_weight + item.weight() <= weight_limit
    }

    /// Centre an item of `dims` takes when committed at the region's corner.
    pub fn placement_center(&self, dims: &Vector3<f64>) -> Point {
        self.origin + dims / 2.0
    }

    /// Guillotine residues left after an item of `dims` is committed.
    ///
    /// Returns the length, breadth and height residues in that order. They
    /// do not overlap, and together with the item they tile this region.
    /// Ids are assigned when an arena adopts the residues.
    pub fn split(&self, dims: &Vector3<f64>, unstackable: bool) -> [Region; 3] {
        let r = &self.dimensions;
        let residue = |offset: Vector3<f64>,
                       dimensions: Vector3<f64>,
                       kind: SplitKind,
                       reserved: bool,
                       elevation: f64| Region {
            id: self.id,
            dimensions: dimensions.map(|d| d.max(0.0)),
            origin: self.origin + offset,
            elevation,
            kind,
            reserved_for_unstackable: reserved,
            checked: false,
            consumed: false,
        };

        [
            residue(
                Vector3::new(dims.x, 0.0, 0.0),
                Vector3::new(r.x - dims.x, r.y, r.z),
                SplitKind::Length,
                self.reserved_for_unstackable,
                self.elevation,
            ),
            residue(
                Vector3::new(0.0, dims.y, 0.0),
                Vector3::new(dims.x, r.y - dims.y, r.z),
                SplitKind::Breadth,
                self.reserved_for_unstackable,
                self.elevation,
            ),
            residue(
                Vector3::new(0.0, 0.0, dims.z),
                Vector3::new(dims.x, dims.y, r.z - dims.z),
                SplitKind::Height,
                unstackable,
                self.elevation + dims.z,
            ),
        ]
    }
}

/// Item types committed to a container and the types they exclude.
///
/// Every region of a container descends from the same root, so one ledger
/// covers the whole lineage.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeLedger {
    types: BTreeSet<String>,
    incompatible: BTreeSet<String>,
}

impl TypeLedger {
    /// Returns the committed item types.
    pub fn types(&self) -> &BTreeSet<String> {
        &self.types
    }

    /// Returns the types excluded by committed items.
    pub fn incompatible_types(&self) -> &BTreeSet<String> {
        &self.incompatible
    }

    /// Checks that `item` clashes with nothing committed so far.
    pub fn admits(&self, item: &Item) -> bool {
        let excludes_committed = item
            .incompatible_types()
            .iter()
            .any(|t| self.types.contains(t));
        let is_excluded = item
            .item_type()
            .is_some_and(|t| self.incompatible.contains(t));

        !excludes_committed && !is_excluded
    }

    /// Records a committed item. Untyped items leave no trace.
    ///
    /// The item's exclusions are taken as a whole, and only when none of
    /// them is already recorded.
    pub fn record(&mut self, item: &Item) {
        if let Some(item_type) = item.item_type() {
            self.types.insert(item_type.to_string());
            let overlaps = item
                .incompatible_types()
                .iter()
                .any(|t| self.incompatible.contains(t));
            if !overlaps {
                self.incompatible
                    .extend(item.incompatible_types().iter().cloned());
            }
        }
    }
}

/// All regions of one container, plus the state shared along their lineage.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionArena {
    regions: Vec<Region>,
    contour: Option<Polyhedron>,
    weight_limit: f64,
    committed_weight: f64,
    ledger: TypeLedger,
    tolerance: f64,
}

impl RegionArena {
    /// Creates an arena holding the root region of `container`.
    pub fn new(container: &Container, tolerance: f64) -> Self {
        Self {
            regions: vec![Region::root(container)],
            contour: container.contour().cloned(),
            weight_limit: container.weight_limit().unwrap_or(f64::INFINITY),
            committed_weight: 0.0,
            ledger: TypeLedger::default(),
            tolerance,
        }
    }

    /// Returns a region by id.
    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    /// Returns every region ever created, consumed ones included.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Iterates over regions that are neither consumed nor empty.
    pub fn active(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| !r.consumed)
    }

    /// Ids of active regions the second pass has not visited.
    pub fn unchecked(&self) -> Vec<RegionId> {
        self.active().filter(|r| !r.checked).map(|r| r.id).collect()
    }

    /// Returns the total free volume of active regions.
    pub fn free_volume(&self) -> f64 {
        self.active().map(Region::volume).sum()
    }

    /// Returns the weight committed so far.
    pub fn committed_weight(&self) -> f64 {
        self.committed_weight
    }

    /// Returns the weight limit (infinite when unset).
    pub fn weight_limit(&self) -> f64 {
        self.weight_limit
    }

    /// Returns the type ledger.
    pub fn ledger(&self) -> &TypeLedger {
        &self.ledger
    }

    /// Returns the contour, if any.
    pub fn contour(&self) -> Option<&Polyhedron> {
        self.contour.as_ref()
    }

    /// Checks whether `item` in `orientation` fits region `id`.
    pub fn fits(&self, id: RegionId, item: &Item, orientation: Orientation) -> bool {
        let region = &self.regions[id.0];
        !region.consumed
            && region.fits(
                &item.dimensions_for(orientation),
                item,
                self.committed_weight,
                self.weight_limit,
                self.tolerance,
            )
    }

    /// Commits `item` in `orientation` at the corner of region `id`.
    ///
    /// Fails (leaving everything untouched) when the item does not fit,
    /// pokes out of the contour, or clashes with a committed type.
    pub fn try_commit(&mut self, id: RegionId, item: &mut Item, orientation: Orientation) -> bool {
        if !self.fits(id, item, orientation) {
            return false;
        }

        let region = &self.regions[id.0];
        let dims = item.dimensions_for(orientation);
        let center = region.placement_center(&dims);

        if let Some(contour) = &self.contour {
            if !contour.contains_box(&AABB3D::from_center(&center, &dims)) {
                log::trace!("'{}' leaves the contour at region {}", item.id(), id.0);
                return false;
            }
        }

        if !self.ledger.admits(item) {
            log::trace!("'{}' clashes with committed types", item.id());
            return false;
        }

        let residues = region.split(&dims, item.is_unstackable());
        self.ledger.record(item);
        self.committed_weight += item.weight();
        item.place(center, orientation);
        self.regions[id.0].consumed = true;

        for residue in residues {
            self.adopt(residue);
        }

        log::trace!(
            "committed '{}' at ({:.3}, {:.3}, {:.3}) orientation {} in region {}",
            item.id(),
            center.x,
            center.y,
            center.z,
            orientation,
            id.0
        );
        true
    }

    /// Clears the second-pass marks.
    pub(crate) fn reset_checks(&mut self) {
        for region in &mut self.regions {
            region.checked = false;
        }
    }

    /// Marks a region as visited by the second pass.
    pub(crate) fn mark_checked(&mut self, id: RegionId) {
        self.regions[id.0].checked = true;
    }

    /// Appends a residue unless it has no usable volume.
    fn adopt(&mut self, mut region: Region) {
        if region.dimensions.iter().any(|d| *d <= self.tolerance) {
            return;
        }
        region.id = RegionId(self.regions.len());
        self.regions.push(region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn arena(l: f64, b: f64, h: f64) -> RegionArena {
        RegionArena::new(&Container::new("C", l, b, h), 1e-9)
    }

    #[test]
    fn test_root_region() {
        let arena = arena(100.0, 80.0, 60.0);
        let root = arena.region(RegionId(0));

        assert_eq!(root.kind(), SplitKind::Root);
        assert!(root.is_root());
        assert_eq!(root.origin(), &Point::new(-50.0, -40.0, -30.0));
        assert_relative_eq!(root.center(), Point::origin());
    }

    #[test]
    fn test_split_tiles_parent() {
        let root = Region::root(&Container::new("C", 100.0, 80.0, 60.0));
        let dims = Vector3::new(30.0, 20.0, 10.0);
        let [length, breadth, height] = root.split(&dims, false);

        assert_eq!(length.dimensions(), &Vector3::new(70.0, 80.0, 60.0));
        assert_eq!(length.origin(), &Point::new(-20.0, -40.0, -30.0));
        assert_eq!(breadth.dimensions(), &Vector3::new(30.0, 60.0, 60.0));
        assert_eq!(breadth.origin(), &Point::new(-50.0, -20.0, -30.0));
        assert_eq!(height.dimensions(), &Vector3::new(30.0, 20.0, 50.0));
        assert_eq!(height.origin(), &Point::new(-50.0, -40.0, -20.0));
        assert_relative_eq!(height.elevation(), 10.0);

        let item_volume = dims.x * dims.y * dims.z;
        assert_relative_eq!(
            length.volume() + breadth.volume() + height.volume() + item_volume,
            root.volume()
        );

        let item_box = AABB3D::from_origin(root.origin(), &dims);
        let boxes = [item_box, length.bounds(), breadth.bounds(), height.bounds()];
        for (i, a) in boxes.iter().enumerate() {
            for b in &boxes[i + 1..] {
                assert!(!a.overlaps(b, 1e-9));
            }
        }
    }

    #[test]
    fn test_height_residue_reserved_above_unstackable() {
        let root = Region::root(&Container::new("C", 10.0, 10.0, 10.0));
        let [length, breadth, height] = root.split(&Vector3::new(5.0, 5.0, 5.0), true);

        assert!(height.is_reserved_for_unstackable());
        assert!(!length.is_reserved_for_unstackable());
        assert!(!breadth.is_reserved_for_unstackable());

        // Lateral residues of a reserved region stay reserved.
        let [l2, b2, h2] = height.split(&Vector3::new(2.0, 2.0, 2.0), false);
        assert!(l2.is_reserved_for_unstackable());
        assert!(b2.is_reserved_for_unstackable());
        assert!(!h2.is_reserved_for_unstackable());
    }

    #[test]
    fn test_fits_dimensions_and_weight() {
        let root = Region::root(&Container::new("C", 10.0, 10.0, 10.0));
        let item = Item::new("A", 10.0, 5.0, 5.0).with_weight(4.0);
        let dims = *item.base_dimensions();

        assert!(root.fits(&dims, &item, 0.0, f64::INFINITY, 1e-9));
        assert!(root.fits(&dims, &item, 6.0, 10.0, 1e-9));
        assert!(!root.fits(&dims, &item, 6.5, 10.0, 1e-9));

        let long = Item::new("B", 11.0, 5.0, 5.0);
        assert!(!root.fits(long.base_dimensions(), &long, 0.0, f64::INFINITY, 1e-9));
    }

    #[test]
    fn test_fits_stacking_rules() {
        let root = Region::root(&Container::new("C", 10.0, 10.0, 10.0));
        let stackable = Item::new("S", 2.0, 2.0, 2.0);
        let unstackable = Item::new("U", 2.0, 2.0, 2.0).with_unstackable(true);
        let dims = Vector3::new(2.0, 2.0, 2.0);

        // Above an unstackable item only unstackable items are admitted.
        let [_, _, reserved] = root.split(&Vector3::new(5.0, 5.0, 5.0), true);
        assert!(!reserved.fits(&dims, &stackable, 0.0, f64::INFINITY, 1e-9));
        assert!(reserved.fits(&dims, &unstackable, 0.0, f64::INFINITY, 1e-9));

        // Beside a stacked item, off the floor, unstackable items are refused.
        let [_, _, above] = root.split(&Vector3::new(5.0, 5.0, 5.0), false);
        let [beside, _, _] = above.split(&Vector3::new(3.0, 3.0, 3.0), false);
        assert_eq!(beside.kind(), SplitKind::Length);
        assert!(!beside.is_root());
        assert!(!beside.fits(&dims, &unstackable, 0.0, f64::INFINITY, 1e-9));
        assert!(beside.fits(&dims, &stackable, 0.0, f64::INFINITY, 1e-9));

        // Floor-level lateral regions accept them.
        let [floor, _, _] = root.split(&Vector3::new(5.0, 5.0, 5.0), false);
        assert!(floor.is_root());
        assert!(floor.fits(&dims, &unstackable, 0.0, f64::INFINITY, 1e-9));
    }

    #[test]
    fn test_commit_replaces_region() {
        let mut arena = arena(10.0, 10.0, 10.0);
        let mut item = Item::new("A", 4.0, 10.0, 10.0).with_weight(3.0);

        assert!(arena.try_commit(RegionId(0), &mut item, Orientation::Identity));
        assert!(item.is_packed());
        assert_eq!(item.position(), &Point::new(-3.0, 0.0, 0.0));
        assert_relative_eq!(arena.committed_weight(), 3.0);
        assert!(arena.region(RegionId(0)).is_consumed());

        // Breadth and height residues are empty and never adopted.
        let active: Vec<&Region> = arena.active().collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind(), SplitKind::Length);
        assert_eq!(active[0].id(), RegionId(1));
        assert_relative_eq!(arena.free_volume(), 600.0);

        // A consumed region refuses further commits.
        let mut other = Item::new("B", 1.0, 1.0, 1.0);
        assert!(!arena.try_commit(RegionId(0), &mut other, Orientation::Identity));
        assert!(!other.is_packed());
    }

    #[test]
    fn test_ledger_blocks_incompatible_types() {
        let mut arena = arena(100.0, 100.0, 100.0);
        let mut a = Item::new("A", 10.0, 10.0, 10.0)
            .with_type("food")
            .with_incompatible_types(["chemicals"]);
        let mut b = Item::new("B", 10.0, 10.0, 10.0).with_type("chemicals");
        let mut c = Item::new("C", 10.0, 10.0, 10.0).with_incompatible_types(["food"]);

        assert!(arena.try_commit(RegionId(0), &mut a, Orientation::Identity));
        let next = arena.active().next().unwrap().id();
        assert!(!arena.try_commit(next, &mut b, Orientation::Identity));
        assert!(!arena.try_commit(next, &mut c, Orientation::Identity));
        assert!(arena.ledger().types().contains("food"));
        assert!(arena.ledger().incompatible_types().contains("chemicals"));
    }

    #[test]
    fn test_ledger_skips_overlapping_exclusions() {
        let mut ledger = TypeLedger::default();
        ledger.record(
            &Item::new("A", 1.0, 1.0, 1.0)
                .with_type("a")
                .with_incompatible_types(["x"]),
        );
        ledger.record(
            &Item::new("B", 1.0, 1.0, 1.0)
                .with_type("b")
                .with_incompatible_types(["x", "y"]),
        );

        assert_eq!(ledger.types().len(), 2);
        assert!(ledger.incompatible_types().contains("x"));
        assert!(!ledger.incompatible_types().contains("y"));
        assert!(ledger.admits(&Item::new("C", 1.0, 1.0, 1.0).with_type("y")));
        assert!(!ledger.admits(&Item::new("D", 1.0, 1.0, 1.0).with_type("x")));
    }

    #[test]
    fn test_contour_rejects_item() {
        // 10×10×10 box with the +y top edge cut off by a sloping wall.
        let mut faces = stowage_core::Polyhedron::cuboid(10.0, 10.0, 10.0)
            .faces()
            .to_vec();
        faces.push(
            stowage_core::Face::new(vec![
                Point::new(-5.0, 5.0, -3.0),
                Point::new(5.0, 1.0, 5.0),
                Point::new(5.0, 5.0, -3.0),
            ])
            .unwrap(),
        );
        let contour = stowage_core::Polyhedron::new(faces).unwrap();
        let container = Container::new("C", 10.0, 10.0, 10.0).with_contour(contour);
        let mut arena = RegionArena::new(&container, 1e-9);

        let mut tall = Item::new("T", 10.0, 10.0, 10.0);
        assert!(!arena.try_commit(RegionId(0), &mut tall, Orientation::Identity));
        assert!(!tall.is_packed());

        let mut flat = Item::new("F", 10.0, 10.0, 1.0);
        assert!(arena.try_commit(RegionId(0), &mut flat, Orientation::Identity));
    }
}
