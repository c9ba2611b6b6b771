//! Shared foundation types for the Kestrel netlist core.
//!
//! Provides the 4-state logic alphabet used by truth tables, the truth-table
//! representation itself (with on-set/off-set handling and LUT mask
//! expansion), the port/pin direction enums shared by the atom netlist and
//! the architecture model, and the internal-error result type.

#![warn(missing_docs)]

pub mod direction;
pub mod logic;
pub mod result;
pub mod truth_table;

pub use direction::{PinType, PortDirection};
pub use logic::LogicValue;
pub use result::{InternalError, KestrelResult};
pub use truth_table::{TruthTable, TruthTableError};
