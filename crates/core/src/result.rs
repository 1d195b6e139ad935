//! Summary of a packing call.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aggregate figures for one or more packed containers.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackSummary {
    /// Number of items packed.
    pub packed_count: usize,

    /// IDs of items that could not be packed.
    pub unpacked: Vec<String>,

    /// Total volume of packed items.
    pub packed_volume: f64,

    /// Total weight of packed items.
    pub packed_weight: f64,

    /// Total volume of the containers that received items.
    pub container_volume: f64,

    /// Number of containers that received at least one item.
    pub containers_used: usize,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
}

impl PackSummary {
    /// Creates a new empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if every item was packed.
    pub fn all_packed(&self) -> bool {
        self.unpacked.is_empty()
    }

    /// Returns the number of unpacked items.
    pub fn unpacked_count(&self) -> usize {
        self.unpacked.len()
    }

    /// Volume utilisation ratio (0.0 - 1.0).
    /// Calculated as: packed_volume / container_volume
    pub fn utilization(&self) -> f64 {
        if self.container_volume > 0.0 {
            self.packed_volume / self.container_volume
        } else {
            0.0
        }
    }

    /// Returns utilisation as a percentage string.
    pub fn utilization_percent(&self) -> String {
        format!("{:.1}%", self.utilization() * 100.0)
    }

    /// Folds the summary of the next container into this one.
    ///
    /// The unpacked list is replaced, since leftovers of one container are
    /// the input of the next.
    pub fn merge(&mut self, other: PackSummary) {
        self.packed_count += other.packed_count;
        self.packed_volume += other.packed_volume;
        self.packed_weight += other.packed_weight;
        self.container_volume += other.container_volume;
        self.containers_used += other.containers_used;
        self.computation_time_ms += other.computation_time_ms;
        self.unpacked = other.unpacked;
    }
}
