//! Solver trait and configuration.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default slack used when comparing item and region dimensions.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Common configuration for packers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Merge interchangeable items into composites before packing.
    pub fuse_items: bool,

    /// Slack allowed when checking that an item fits a region.
    pub tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fuse_items: true,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables item fusion.
    pub fn with_fusion(mut self, enabled: bool) -> Self {
        self.fuse_items = enabled;
        self
    }

    /// Sets the dimension tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::ConfigError(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Trait for packers that load items into one container.
pub trait Solver {
    /// The item type this solver handles.
    type Item;
    /// The container type this solver handles.
    type Container;
    /// What a single solve produces.
    type Outcome;

    /// Packs `items` into `container`.
    fn solve(&self, items: &[Self::Item], container: &Self::Container) -> Result<Self::Outcome>;

    /// Returns the configuration in use.
    fn config(&self) -> &Config;
}
