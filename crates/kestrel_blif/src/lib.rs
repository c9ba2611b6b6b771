//! Gate-level netlist emission for the Kestrel netlist core.
//!
//! Writes an [`AtomNetlist`](kestrel_atom::AtomNetlist) back out in the
//! canonical textual form: `.model`, `.inputs`/`.outputs`, `.latch`,
//! `.names`, `.subckt`, and trailing black-box model declarations. A netlist
//! round-tripped through this writer and the external parser reconstructs a
//! structurally equivalent netlist (unconnected-pin placeholder names aside).

#![warn(missing_docs)]

pub mod writer;

pub use writer::{to_blif_string, write_blif, OUTPAD_NAME_PREFIX};
