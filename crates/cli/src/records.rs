//! JSON records for packing requests and reports.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use stowage::core::geometry::{Face, Point, Polyhedron};
use stowage::core::PlacementStats;
use stowage::{Config, Container, ContainerPlan, Item, PackSummary};
use thiserror::Error;

/// Errors that can occur when reading or writing records.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] stowage::Error),
}

fn default_quantity() -> usize {
    1
}

fn default_spinnable() -> bool {
    true
}

/// An item line; `quantity` copies share every other field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub length: f64,
    pub breadth: f64,
    pub height: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default = "default_quantity")]
    pub quantity: usize,
    #[serde(default = "default_spinnable")]
    pub spinnable: bool,
    #[serde(default)]
    pub unstackable: bool,
    #[serde(default)]
    pub heavy: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incompatible_types: Vec<String>,
}

impl ItemRecord {
    /// Expands the record into `quantity` items.
    ///
    /// A single copy keeps the record id; several copies are numbered
    /// `{id}-1`, `{id}-2`, ...
    pub fn expand(&self) -> Vec<Item> {
        if self.quantity == 0 {
            log::warn!("item '{}' has quantity 0 and is skipped", self.id);
        }

        (1..=self.quantity)
            .map(|copy| {
                let id = if self.quantity == 1 {
                    self.id.clone()
                } else {
                    format!("{}-{}", self.id, copy)
                };
                let item = Item::new(id, self.length, self.breadth, self.height)
                    .with_weight(self.weight)
                    .with_spinnable(self.spinnable)
                    .with_unstackable(self.unstackable)
                    .with_heavy(self.heavy)
                    .with_incompatible_types(self.incompatible_types.iter().cloned());
                match &self.item_type {
                    Some(item_type) => item.with_type(item_type.clone()),
                    None => item,
                }
            })
            .collect()
    }
}

/// A container line. `contour` lists faces as point loops in the
/// container frame (origin at the centre, `z` up).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub id: String,
    pub length: f64,
    pub breadth: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contour: Option<Vec<Vec<[f64; 3]>>>,
}

impl ContainerRecord {
    /// Builds the container, checking the contour faces.
    pub fn to_container(&self) -> Result<Container, RecordError> {
        let mut container = Container::new(self.id.clone(), self.length, self.breadth, self.height);
        if let Some(limit) = self.weight_limit {
            container = container.with_weight_limit(limit);
        }
        if let Some(faces) = &self.contour {
            let faces = faces
                .iter()
                .map(|loop_points| {
                    Face::new(
                        loop_points
                            .iter()
                            .map(|&[x, y, z]| Point::new(x, y, z))
                            .collect(),
                    )
                })
                .collect::<stowage::Result<Vec<Face>>>()?;
            container = container.with_contour(Polyhedron::new(faces)?);
        }
        Ok(container)
    }
}

/// A packing request: items, containers in loading order, and options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackRequest {
    pub items: Vec<ItemRecord>,
    pub containers: Vec<ContainerRecord>,
    #[serde(default)]
    pub config: Config,
}

impl PackRequest {
    /// Parses a request from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a request from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Expands every item record.
    pub fn items(&self) -> Vec<Item> {
        self.items.iter().flat_map(ItemRecord::expand).collect()
    }

    /// Builds the containers in loading order.
    pub fn containers(&self) -> Result<Vec<Container>, RecordError> {
        self.containers
            .iter()
            .map(ContainerRecord::to_container)
            .collect()
    }

    /// Checks every record and the options without packing.
    pub fn validate(&self) -> Result<(usize, usize), RecordError> {
        self.config.validate()?;
        let items = self.items();
        for item in &items {
            item.validate()?;
        }
        let containers = self.containers()?;
        for container in &containers {
            container.validate()?;
        }
        Ok((items.len(), containers.len()))
    }
}

/// Where one item went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub id: String,
    /// Centre in the container frame.
    pub position: [f64; 3],
    /// Dimensions as placed, along (x, y, z).
    pub dimensions: [f64; 3],
    /// Orientation index (0..6).
    pub orientation: usize,
    pub weight: f64,
}

impl From<&Item> for PlacementRecord {
    fn from(item: &Item) -> Self {
        let p = item.position();
        let d = item.dimensions();
        Self {
            id: item.id().to_string(),
            position: [p.x, p.y, p.z],
            dimensions: [d.x, d.y, d.z],
            orientation: item.orientation().index(),
            weight: item.weight(),
        }
    }
}

/// Items loaded into one container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRecord {
    pub container_id: String,
    pub placements: Vec<PlacementRecord>,
}

/// The outcome of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackReport {
    pub loads: Vec<LoadRecord>,
    pub unpacked: Vec<String>,
    pub summary: PackSummary,
    /// Orientation and per-container counts over every placement.
    pub stats: PlacementStats,
}

impl PackReport {
    /// Builds a report from a multi-container plan.
    pub fn from_plan(plan: &ContainerPlan) -> Self {
        let loads = plan
            .loads
            .iter()
            .map(|load| LoadRecord {
                container_id: load.container_id.clone(),
                placements: load.items.iter().map(PlacementRecord::from).collect(),
            })
            .collect();

        Self {
            loads,
            unpacked: plan.summary.unpacked.clone(),
            summary: plan.summary.clone(),
            stats: PlacementStats::from_placements(&plan.placements()),
        }
    }

    /// Serializes the report as pretty JSON.
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the report to a file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
