//! # Stowage
//!
//! Deterministic 3D container loading engine.
//!
//! Boxes are packed into containers by guillotine splitting of free
//! space, honouring:
//! - **Rotation**: six axis-aligned orientations, or none for fixed items
//! - **Weight**: a per-container weight limit
//! - **Stacking**: unstackable items stay on the floor with nothing on top
//! - **Types**: item types that may not share a container
//! - **Contours**: convex container shapes (e.g. sloped aircraft holds)
//!
//! ## Quick Start
//!
//! ```rust
//! use stowage::packer::{Container, Item, Packer};
//!
//! let items: Vec<Item> = (0..8)
//!     .map(|i| Item::new(format!("cube-{i}"), 50.0, 50.0, 50.0).with_weight(10.0))
//!     .collect();
//! let container = Container::new("hold", 100.0, 100.0, 100.0).with_weight_limit(1000.0);
//!
//! let outcome = Packer::default_config().pack(&items, &container)?;
//! assert_eq!(outcome.packed().count(), 8);
//! # Ok::<(), stowage::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support

/// Core geometry, orientation and result types.
pub use stowage_core as core;

/// The packing engine.
pub use stowage_packer as packer;

// Re-export commonly used types at root level
pub use stowage_core::{Config, Error, Orientation, PackSummary, Placement, Result, Solver};
pub use stowage_packer::{Container, ContainerPlan, Item, PackOutcome, Packer};
