//! Fusion of interchangeable items into composite blocks, and its inverse.
//!
//! Identical items are merged into `m × m × m` blocks (plus pairs and a
//! singleton for the remainder) so the packer has fewer, larger things to
//! place. Composites never leave a packing call: [`unfuse`] turns them back
//! into their constituents with positions on the composite's grid.

use crate::item::Item;
use nalgebra::Vector3;
use stowage_core::geometry::Point;
use stowage_core::Orientation;

/// Predicate marking items that must never be fused.
pub type FuseExclusion = dyn Fn(&Item) -> bool + Send + Sync;

/// Key under which items are considered interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Items sharing exact dimensions, type and flags.
    Fusable {
        dimensions: [u64; 3],
        item_type: Option<String>,
        unstackable: bool,
        spinnable: bool,
    },
    /// Items excluded from fusion.
    NeverFuse,
}

impl GroupKey {
    /// Returns the key of `item`.
    pub fn of(item: &Item, exclude: Option<&FuseExclusion>) -> Self {
        if exclude.is_some_and(|excluded| excluded(item)) {
            return GroupKey::NeverFuse;
        }

        let d = item.base_dimensions();
        GroupKey::Fusable {
            dimensions: [d.x.to_bits(), d.y.to_bits(), d.z.to_bits()],
            item_type: item.item_type().map(str::to_string),
            unstackable: item.is_unstackable(),
            spinnable: item.is_spinnable(),
        }
    }
}

/// Hands out composite ids unique within one packing call.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    next: usize,
}

impl IdGenerator {
    /// Creates a generator producing `{prefix}-0`, `{prefix}-1`, ...
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    /// Returns the next id.
    pub fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("fused")
    }
}

/// Groups items by [`GroupKey`], keeping groups in order of first appearance.
pub fn group_items(items: Vec<Item>, exclude: Option<&FuseExclusion>) -> Vec<(GroupKey, Vec<Item>)> {
    let mut groups: Vec<(GroupKey, Vec<Item>)> = Vec::new();

    for item in items {
        let key = GroupKey::of(&item, exclude);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(item),
            None => groups.push((key, vec![item])),
        }
    }

    groups
}

fn cube_root_floor(n: usize) -> usize {
    let mut root = (n as f64).cbrt().round() as usize;
    while root > 0 && root.pow(3) > n {
        root -= 1;
    }
    while (root + 1).pow(3) <= n {
        root += 1;
    }
    root
}

/// Splits a count into block shapes, largest cube first.
///
/// Each entry gives the multiples along length, breadth and height. Once
/// no cube above 1 fits, the rest goes in pairs along length with a
/// trailing singleton when odd. The products always sum to `n`.
///
/// ```
/// use stowage_packer::fusion::factorize;
///
/// assert_eq!(factorize(9), vec![[2, 2, 2], [1, 1, 1]]);
/// assert_eq!(factorize(5), vec![[2, 2, 1], [1, 1, 1]]);
/// ```
pub fn factorize(n: usize) -> Vec<[usize; 3]> {
    let mut factors = Vec::new();
    let mut remaining = n;

    while remaining > 0 {
        if remaining == 1 {
            factors.push([1, 1, 1]);
            break;
        }

        let root = cube_root_floor(remaining);
        if root == 1 {
            factors.push([2, remaining / 2, 1]);
            if remaining % 2 == 1 {
                factors.push([1, 1, 1]);
            }
            break;
        }

        factors.push([root, root, root]);
        remaining -= root.pow(3);
    }

    factors
}

/// Merges a group of interchangeable items into composites.
///
/// Constituents are consumed in input order; a `[1, 1, 1]` block stays a
/// plain item.
pub fn fuse_group(items: Vec<Item>, ids: &mut IdGenerator) -> Vec<Item> {
    if items.len() < 2 {
        return items;
    }

    let factors = factorize(items.len());
    let mut fused = Vec::with_capacity(factors.len());
    let mut rest = items.into_iter();

    for factor in factors {
        let count = factor.iter().product();
        let mut block: Vec<Item> = rest.by_ref().take(count).collect();
        if count == 1 {
            fused.append(&mut block);
        } else {
            fused.push(Item::composite(ids.next_id(), factor, block));
        }
    }

    fused
}

/// Groups and fuses a list of items. Excluded items pass through untouched.
pub fn fuse_items(items: Vec<Item>, exclude: Option<&FuseExclusion>, ids: &mut IdGenerator) -> Vec<Item> {
    let mut fused = Vec::with_capacity(items.len());

    for (key, group) in group_items(items, exclude) {
        match key {
            GroupKey::NeverFuse => fused.extend(group),
            GroupKey::Fusable { .. } => fused.extend(fuse_group(group, ids)),
        }
    }

    log::debug!("fusion produced {} packing units", fused.len());
    fused
}

/// Expands a composite into its constituents.
///
/// A packed composite hands its orientation to every constituent and
/// centres each one in its cell of the composite's grid. Unpacked
/// composites yield unpacked constituents at the origin. Plain items come
/// back unchanged.
pub fn unfuse(mut item: Item) -> Vec<Item> {
    let Some(fusion) = item.take_fusion() else {
        return vec![item];
    };

    let packed = item.is_packed();
    let orientation = if packed {
        item.orientation()
    } else {
        Orientation::Identity
    };

    let counts = orientation.apply_counts(fusion.factors);
    let extent = item.dimensions();
    let cell = Vector3::new(
        extent.x / counts[0] as f64,
        extent.y / counts[1] as f64,
        extent.z / counts[2] as f64,
    );
    let min = item.position() - extent / 2.0;

    let grid = (0..counts[0]).flat_map(|i| {
        (0..counts[1]).flat_map(move |j| (0..counts[2]).map(move |k| (i, j, k)))
    });

    fusion
        .constituents
        .into_iter()
        .zip(grid)
        .map(|(mut constituent, (i, j, k))| {
            let position = if packed {
                Point::new(
                    min.x + (i as f64 + 0.5) * cell.x,
                    min.y + (j as f64 + 0.5) * cell.y,
                    min.z + (k as f64 + 0.5) * cell.z,
                )
            } else {
                Point::origin()
            };
            constituent.inherit_placement(position, orientation, packed);
            constituent
        })
        .collect()
}

/// Expands every composite in `items`.
pub fn unfuse_all(items: impl IntoIterator<Item = Item>) -> Vec<Item> {
    items.into_iter().flat_map(unfuse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn boxes(n: usize, l: f64, b: f64, h: f64) -> Vec<Item> {
        (0..n)
            .map(|i| Item::new(format!("B{i}"), l, b, h).with_weight(1.0 + i as f64))
            .collect()
    }

    #[test]
    fn test_factorize_small_counts() {
        assert!(factorize(0).is_empty());
        assert_eq!(factorize(1), vec![[1, 1, 1]]);
        assert_eq!(factorize(2), vec![[2, 1, 1]]);
        assert_eq!(factorize(3), vec![[2, 1, 1], [1, 1, 1]]);
        assert_eq!(factorize(8), vec![[2, 2, 2]]);
        assert_eq!(factorize(16), vec![[2, 2, 2], [2, 2, 2]]);
        assert_eq!(factorize(27), vec![[3, 3, 3]]);
    }

    #[test]
    fn test_factorize_preserves_count() {
        for n in 0..200 {
            let total: usize = factorize(n).iter().map(|f| f.iter().product::<usize>()).sum();
            assert_eq!(total, n, "n = {n}");
        }
    }

    #[test]
    fn test_cube_root_floor() {
        assert_eq!(cube_root_floor(1), 1);
        assert_eq!(cube_root_floor(7), 1);
        assert_eq!(cube_root_floor(8), 2);
        assert_eq!(cube_root_floor(63), 3);
        assert_eq!(cube_root_floor(64), 4);
        assert_eq!(cube_root_floor(1_000_000), 100);
    }

    #[test]
    fn test_grouping() {
        let mut items = boxes(3, 1.0, 2.0, 3.0);
        items.insert(1, Item::new("odd", 1.0, 2.0, 4.0));
        items.push(Item::new("typed", 1.0, 2.0, 3.0).with_type("glass"));
        items.push(Item::new("fixed", 1.0, 2.0, 3.0).with_spinnable(false));

        let groups = group_items(items, None);
        let sizes: Vec<usize> = groups.iter().map(|(_, g)| g.len()).collect();
        assert_eq!(sizes, [3, 1, 1, 1]);
        assert_eq!(groups[1].1[0].id(), "odd");
    }

    #[test]
    fn test_exclusion_predicate() {
        let items = boxes(4, 1.0, 1.0, 1.0);
        let exclude: &FuseExclusion = &|item: &Item| item.weight() > 2.5;
        let groups = group_items(items, Some(exclude));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].0, GroupKey::NeverFuse);
        assert_eq!(groups[1].1.len(), 2);

        let fused = fuse_items(boxes(4, 1.0, 1.0, 1.0), Some(exclude), &mut IdGenerator::default());
        assert_eq!(fused.len(), 3);
        assert!(fused[0].is_fused());
        assert!(!fused[1].is_fused());
    }

    #[test]
    fn test_fuse_group_shapes() {
        let mut ids = IdGenerator::default();
        let fused = fuse_group(boxes(9, 1.0, 2.0, 3.0), &mut ids);

        assert_eq!(fused.len(), 2);
        assert!(fused[0].is_fused());
        assert_eq!(fused[0].id(), "fused-0");
        assert_eq!(fused[0].base_dimensions(), &Vector3::new(2.0, 4.0, 6.0));
        assert_relative_eq!(fused[0].weight(), (1..=8).sum::<usize>() as f64);
        assert!(!fused[1].is_fused());
        assert_eq!(fused[1].id(), "B8");
    }

    #[test]
    fn test_unfuse_unpacked_round_trip() {
        let items = boxes(13, 1.0, 2.0, 3.0);
        let total_weight: f64 = items.iter().map(Item::weight).sum();

        let fused = fuse_group(items.clone(), &mut IdGenerator::default());
        let restored = unfuse_all(fused);

        assert_eq!(restored.len(), 13);
        assert_relative_eq!(restored.iter().map(Item::weight).sum::<f64>(), total_weight);
        for item in &restored {
            assert_eq!(item.dimensions(), Vector3::new(1.0, 2.0, 3.0));
            assert!(!item.is_packed());
            assert_eq!(item.position(), &Point::origin());
        }
        let mut ids: Vec<&str> = restored.iter().map(Item::id).collect();
        ids.sort_unstable();
        let mut expected: Vec<&str> = items.iter().map(Item::id).collect();
        expected.sort_unstable();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_unfuse_packed_rotated_composite() {
        let parts = boxes(2, 1.0, 2.0, 3.0);
        let mut composite = Item::composite("F".into(), [2, 1, 1], parts);
        // Base (2, 2, 3); (h, l, b) puts the doubled length along y.
        composite.place(Point::new(10.0, 20.0, 30.0), Orientation::RotateForward);
        assert_eq!(composite.dimensions(), Vector3::new(3.0, 2.0, 2.0));

        let parts = unfuse(composite);
        assert_eq!(parts.len(), 2);
        for part in &parts {
            assert!(part.is_packed());
            assert_eq!(part.orientation(), Orientation::RotateForward);
            assert_eq!(part.dimensions(), Vector3::new(3.0, 1.0, 2.0));
        }
        assert_relative_eq!(*parts[0].position(), Point::new(10.0, 19.5, 30.0));
        assert_relative_eq!(*parts[1].position(), Point::new(10.0, 20.5, 30.0));
    }

    #[test]
    fn test_unfuse_plain_item() {
        let item = Item::new("A", 1.0, 1.0, 1.0);
        assert_eq!(unfuse(item.clone()), vec![item]);
    }
}
