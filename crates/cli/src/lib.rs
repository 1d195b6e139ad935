//! Command-line front end for Stowage.
//!
//! This crate provides:
//! - JSON records for items, containers and packing options
//! - Quantity expansion of item records
//! - Report encoding of packing results

mod records;

pub use records::{
    ContainerRecord, ItemRecord, LoadRecord, PackReport, PackRequest, PlacementRecord, RecordError,
};
