//! The packing engine.

use crate::container::Container;
use crate::fusion::{fuse_items, unfuse_all, FuseExclusion, IdGenerator};
use crate::item::Item;
use crate::ordering::{rank_for_item, rank_for_region, sort_items, Candidate};
use crate::region::{RegionArena, SplitKind};
use rayon::prelude::*;
use stowage_core::solver::{Config, Solver};
use stowage_core::{PackSummary, Placement, Result};

use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Items after packing one container, with the regions left behind.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackOutcome {
    /// Every input item, packed or not, as individual records.
    pub items: Vec<Item>,

    /// Regions of the container, consumed ones included.
    pub regions: RegionArena,

    container_id: String,
    container_volume: f64,
    computation_time_ms: u64,
}

impl PackOutcome {
    /// Returns the container id.
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Iterates over packed items.
    pub fn packed(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.is_packed())
    }

    /// Iterates over items that did not fit.
    pub fn unpacked(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| !i.is_packed())
    }

    /// Returns placement records of the packed items.
    pub fn placements(&self) -> Vec<Placement> {
        self.packed()
            .map(|item| item.to_placement(&self.container_id))
            .collect()
    }

    /// Returns aggregate figures for this container.
    pub fn summary(&self) -> PackSummary {
        let packed_count = self.packed().count();
        PackSummary {
            packed_count,
            unpacked: self.unpacked().map(|i| i.id().to_string()).collect(),
            packed_volume: self.packed().map(Item::volume).sum(),
            packed_weight: self.packed().map(Item::weight).sum(),
            container_volume: if packed_count > 0 {
                self.container_volume
            } else {
                0.0
            },
            containers_used: usize::from(packed_count > 0),
            computation_time_ms: self.computation_time_ms,
        }
    }

    fn into_unpacked(self) -> (ContainerLoad, Vec<Item>) {
        let (packed, unpacked) = self.items.into_iter().partition(Item::is_packed);
        let load = ContainerLoad {
            container_id: self.container_id,
            items: packed,
        };
        (load, unpacked)
    }
}

/// Items packed into one container of a multi-container plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContainerLoad {
    pub container_id: String,
    pub items: Vec<Item>,
}

/// Result of packing across a sequence of containers.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContainerPlan {
    /// Loads in container order, one per container tried, even when it took
    /// nothing. Containers reached after every item was placed have no entry.
    pub loads: Vec<ContainerLoad>,

    /// Items no container could take, or `None` when everything was packed.
    pub unpacked: Option<Vec<Item>>,

    /// Figures merged over all loads.
    pub summary: PackSummary,
}

impl ContainerPlan {
    /// Returns the items packed into the container with the given id.
    pub fn packed_in(&self, container_id: &str) -> Option<&[Item]> {
        self.loads
            .iter()
            .find(|load| load.container_id == container_id)
            .map(|load| load.items.as_slice())
    }

    /// Returns placement records for every load.
    pub fn placements(&self) -> Vec<Placement> {
        self.loads
            .iter()
            .flat_map(|load| load.items.iter().map(|i| i.to_placement(&load.container_id)))
            .collect()
    }
}

/// An independent packing job for [`Packer::pack_batch`].
#[derive(Debug, Clone)]
pub struct PackJob {
    pub items: Vec<Item>,
    pub container: Container,
}

impl PackJob {
    /// Creates a job.
    pub fn new(items: Vec<Item>, container: Container) -> Self {
        Self { items, container }
    }
}

/// Packs `items` into the free regions of `arena`.
///
/// The first pass walks the items in packing order and puts each into its
/// best region. The second pass then walks regions that are still free and
/// fills each with its best remaining item, until no region is left
/// unvisited. Items are returned in packing order, packed or not.
pub fn do_pack(mut items: Vec<Item>, arena: &mut RegionArena) -> Vec<Item> {
    sort_items(&mut items);

    let mut first_pass = 0;
    for index in 0..items.len() {
        if items[index].is_packed() {
            continue;
        }

        let mut buckets: [Vec<Candidate>; SplitKind::BUCKETS] = Default::default();
        for region in arena.active() {
            for &orientation in items[index].allowed_orientations() {
                if arena.fits(region.id(), &items[index], orientation) {
                    buckets[region.kind().precedence()].push(Candidate {
                        region: region.id(),
                        item: index,
                        orientation,
                        dimensions: items[index].dimensions_for(orientation),
                        region_length: region.dimensions().x,
                    });
                }
            }
        }

        let Some((bucket, mut candidates)) = buckets
            .into_iter()
            .enumerate()
            .find(|(_, candidates)| !candidates.is_empty())
        else {
            continue;
        };

        let kind = SplitKind::for_bucket(bucket);
        candidates.sort_by(|a, b| rank_for_item(kind, a, b));
        if candidates
            .iter()
            .any(|c| arena.try_commit(c.region, &mut items[index], c.orientation))
        {
            first_pass += 1;
        }
    }

    let mut second_pass = 0;
    arena.reset_checks();
    loop {
        let unchecked = arena.unchecked();
        if unchecked.is_empty() {
            break;
        }

        for id in unchecked {
            arena.mark_checked(id);
            let region = arena.region(id);
            let (kind, region_length) = (region.kind(), region.dimensions().x);

            let mut candidates = Vec::new();
            for (index, item) in items.iter().enumerate().filter(|(_, i)| !i.is_packed()) {
                for &orientation in item.allowed_orientations() {
                    if arena.fits(id, item, orientation) {
                        candidates.push(Candidate {
                            region: id,
                            item: index,
                            orientation,
                            dimensions: item.dimensions_for(orientation),
                            region_length,
                        });
                    }
                }
            }

            candidates.sort_by(|a, b| rank_for_region(kind, a, b));
            if candidates
                .iter()
                .any(|c| arena.try_commit(id, &mut items[c.item], c.orientation))
            {
                second_pass += 1;
            }
        }
    }

    log::debug!(
        "packed {} of {} units ({} in the first pass, {} filling gaps)",
        first_pass + second_pass,
        items.len(),
        first_pass,
        second_pass
    );
    items
}

/// Guillotine packer for boxes into containers.
pub struct Packer {
    config: Config,
    fuse_exclusion: Option<Arc<FuseExclusion>>,
}

impl Packer {
    /// Creates a new packer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            fuse_exclusion: None,
        }
    }

    /// Creates a packer with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Keeps items matching `exclude` out of fusion.
    pub fn with_fuse_exclusion<F>(mut self, exclude: F) -> Self
    where
        F: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        let exclude: Arc<FuseExclusion> = Arc::new(exclude);
        self.fuse_exclusion = Some(exclude);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Packs `items` into a single container.
    ///
    /// Infeasible items are not an error; they come back unpacked in their
    /// base orientation.
    pub fn pack(&self, items: &[Item], container: &Container) -> Result<PackOutcome> {
        self.config.validate()?;
        container.validate()?;
        for item in items {
            item.validate()?;
        }

        let start = Instant::now();
        let mut arena = RegionArena::new(container, self.config.tolerance);
        let items: Vec<Item> = items.iter().cloned().map(Item::unplaced).collect();

        let items = if self.config.fuse_items {
            self.pack_fused(items, &mut arena)
        } else {
            do_pack(items, &mut arena)
        };
        let items = unfuse_all(items);

        let outcome = PackOutcome {
            items,
            regions: arena,
            container_id: container.id().to_string(),
            container_volume: container.volume(),
            computation_time_ms: start.elapsed().as_millis() as u64,
        };
        log::debug!(
            "container '{}': {} packed, {} unpacked, {:.3} weight committed",
            outcome.container_id,
            outcome.packed().count(),
            outcome.unpacked().count(),
            outcome.regions.committed_weight()
        );
        Ok(outcome)
    }

    /// Packs large stackable composites first, then everything else
    /// individually into what is left.
    fn pack_fused(&self, items: Vec<Item>, arena: &mut RegionArena) -> Vec<Item> {
        let mut ids = IdGenerator::default();
        let fused = fuse_items(items, self.fuse_exclusion.as_deref(), &mut ids);

        let (composites, rest): (Vec<Item>, Vec<Item>) = fused
            .into_iter()
            .partition(|i| i.is_fused() && !i.is_unstackable());
        let largest_rest = rest.iter().map(Item::volume).reduce(f64::max);
        let (large, small): (Vec<Item>, Vec<Item>) = composites
            .into_iter()
            .partition(|c| largest_rest.is_some_and(|v| c.volume() > v));

        log::debug!(
            "{} large composites first, then {} units individually",
            large.len(),
            small.len() + rest.len()
        );

        let (packed, failed): (Vec<Item>, Vec<Item>) = do_pack(large, arena)
            .into_iter()
            .partition(Item::is_packed);

        let retry = unfuse_all(failed.into_iter().chain(rest).chain(small));
        let mut items = packed;
        items.extend(do_pack(retry, arena));
        items
    }

    /// Packs `items` into `containers` in order, feeding leftovers forward.
    pub fn pack_into_containers(&self, items: &[Item], containers: &[Container]) -> Result<ContainerPlan> {
        let mut plan = ContainerPlan::default();
        let mut remaining = items.to_vec();

        for container in containers {
            if remaining.is_empty() {
                break;
            }
            let outcome = self.pack(&remaining, container)?;
            plan.summary.merge(outcome.summary());

            let (load, unpacked) = outcome.into_unpacked();
            plan.loads.push(load);
            remaining = unpacked;
        }

        plan.summary.unpacked = remaining.iter().map(|i| i.id().to_string()).collect();
        if !remaining.is_empty() {
            log::debug!("{} items left after {} containers", remaining.len(), containers.len());
            plan.unpacked = Some(remaining);
        }
        Ok(plan)
    }

    /// Runs independent jobs in parallel; results are in job order.
    pub fn pack_batch(&self, jobs: &[PackJob]) -> Vec<Result<PackOutcome>> {
        jobs.par_iter()
            .map(|job| self.pack(&job.items, &job.container))
            .collect()
    }
}

impl Default for Packer {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Solver for Packer {
    type Item = Item;
    type Container = Container;
    type Outcome = PackOutcome;

    fn solve(&self, items: &[Self::Item], container: &Self::Container) -> Result<PackOutcome> {
        self.pack(items, container)
    }

    fn config(&self) -> &Config {
        &self.config
    }
}
