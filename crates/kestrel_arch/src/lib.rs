//! FPGA device-architecture model for the Kestrel netlist core.
//!
//! This crate holds the architecture as the packed-netlist loader consumes
//! it: logical block types with their hierarchical pb-type descriptions, a
//! flattened per-cluster pin graph whose pin IDs double as the
//! pin-count-in-cluster indices of downstream routing tables, and the
//! resolver that matches textual `port[idx]->interconnect` expressions
//! against that graph.
//!
//! Parsing the architecture description itself happens upstream; the parser
//! targets [`PbGraphBuilder`] and the plain data types here.

#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod graph;
pub mod ids;
pub mod resolver;
pub mod types;

pub use builder::PbGraphBuilder;
pub use error::ArchError;
pub use graph::{PbGraph, PbGraphEdge, PbGraphNode, PbGraphPin, PortPins};
pub use ids::{PbNodeId, PbPinId};
pub use resolver::{resolve_pin_expr, ResolvedPin};
pub use types::{DeviceModel, LogicalBlockType, Mode, PbPort, PbType};
