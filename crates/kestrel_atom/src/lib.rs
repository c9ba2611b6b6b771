//! The atom netlist: an ID-keyed relational store of primitive blocks,
//! ports, pins, and nets.
//!
//! Entities are created once (by the gate-level ingestor, outside this crate)
//! and then mutated only through the safe surface here: [`AtomNetlist`]
//! guarantees pin/net cross-references stay consistent through additions and
//! removals, tombstones removed entities instead of reusing IDs, and can
//! [`verify`](AtomNetlist::verify) every structural invariant on demand.
//!
//! - Blocks hold a shared, immutable model handle ([`ModelId`]) interned in a
//!   [`ModelLibrary`].
//! - LUT and latch blocks carry a [`TruthTable`](kestrel_common::TruthTable)
//!   in source encoding.
//! - [`NetlistStats`] summarizes a netlist the way a pipeline log wants it.

#![warn(missing_docs)]

pub mod error;
pub mod ids;
pub mod model;
pub mod netlist;
pub mod stats;
pub mod types;
mod verify;

pub use error::NetlistError;
pub use ids::{AtomBlockId, AtomNetId, AtomPinId, AtomPortId, ModelId};
pub use model::{Model, ModelLibrary, ModelPort, MODEL_INPUT, MODEL_LATCH, MODEL_NAMES, MODEL_OUTPUT};
pub use netlist::AtomNetlist;
pub use stats::NetlistStats;
pub use types::AtomBlockType;
