//! # Stowage Packer
//!
//! Guillotine 3D bin packing of boxes into containers.
//!
//! Each committed item splits the free region it lands in into three
//! residues. Identical items are fused into larger blocks before packing
//! and expanded again afterwards, and every placement respects weight
//! limits, stacking rules, type incompatibilities and an optional convex
//! container contour.
//!
//! ```
//! use stowage_packer::{Container, Item, Packer};
//!
//! let items = vec![
//!     Item::new("A", 50.0, 50.0, 50.0).with_weight(10.0),
//!     Item::new("B", 50.0, 50.0, 50.0).with_weight(10.0),
//! ];
//! let container = Container::new("truck", 100.0, 100.0, 100.0).with_weight_limit(1000.0);
//!
//! let outcome = Packer::default_config().pack(&items, &container).unwrap();
//! assert_eq!(outcome.packed().count(), 2);
//! ```

pub mod container;
pub mod fusion;
pub mod item;
pub mod ordering;
pub mod packer;
pub mod region;

// Re-exports
pub use container::Container;
pub use fusion::{factorize, fuse_group, unfuse, FuseExclusion, IdGenerator};
pub use item::{Fusion, Item, ItemId};
pub use packer::{do_pack, ContainerLoad, ContainerPlan, PackJob, PackOutcome, Packer};
pub use region::{Region, RegionArena, RegionId, SplitKind, TypeLedger};
pub use stowage_core::{Config, Error, Orientation, PackSummary, Placement, Result};
