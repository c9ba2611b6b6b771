//! The consumed device model: logical block types and their pb-type trees.
//!
//! Architecture-XML parsing happens upstream; this crate receives the result.
//! A [`DeviceModel`] lists the logical block types a packed netlist can
//! instantiate; each carries its hierarchical [`PbType`] description and the
//! flattened pin graph built from it.

use crate::graph::PbGraph;
use kestrel_common::PortDirection;
use serde::{Deserialize, Serialize};

/// A port on a pb type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbPort {
    /// Port name.
    pub name: String,
    /// Port direction.
    pub direction: PortDirection,
    /// Number of bits.
    pub width: usize,
    /// Whether pins of this port carry a global signal (e.g., a clock
    /// distribution network).
    pub is_global: bool,
}

impl PbPort {
    /// Creates a non-global port.
    pub fn new(name: impl Into<String>, direction: PortDirection, width: usize) -> Self {
        Self {
            name: name.into(),
            direction,
            width,
            is_global: false,
        }
    }

    /// Creates a global port.
    pub fn global(name: impl Into<String>, direction: PortDirection, width: usize) -> Self {
        Self {
            is_global: true,
            ..Self::new(name, direction, width)
        }
    }
}

/// A mutually exclusive child layout of a pb type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mode {
    /// Mode name, matched against the `mode` attribute of packed-netlist
    /// blocks.
    pub name: String,
    /// Child pb types instantiated under this mode.
    pub children: Vec<PbType>,
}

/// A node in the hierarchical physical-block type description.
///
/// A pb type with no modes is a primitive and names the atom model it
/// implements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PbType {
    /// Type name, matched against packed-netlist `instance` attributes.
    pub name: String,
    /// Number of instances of this type within its parent (per mode).
    pub num_instances: usize,
    /// For primitives, the atom model implemented.
    pub model: Option<String>,
    /// Ports of this type.
    pub ports: Vec<PbPort>,
    /// Modes; empty for primitives.
    pub modes: Vec<Mode>,
}

impl PbType {
    /// Returns `true` if this type has no modes (a primitive).
    pub fn is_primitive(&self) -> bool {
        self.modes.is_empty()
    }

    /// Returns the index of the mode with the given name.
    pub fn find_mode(&self, name: &str) -> Option<usize> {
        self.modes.iter().position(|m| m.name == name)
    }

    /// Returns the port with the given name.
    pub fn find_port(&self, name: &str) -> Option<&PbPort> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Searches this type and its descendants for a pb type by name.
    pub fn find_pb_type(&self, name: &str) -> Option<&PbType> {
        if self.name == name {
            return Some(self);
        }
        self.modes
            .iter()
            .flat_map(|m| m.children.iter())
            .find_map(|c| c.find_pb_type(name))
    }

    /// Total pin count of this type (sum of port widths).
    pub fn num_pins(&self) -> usize {
        self.ports.iter().map(|p| p.width).sum()
    }
}

/// A placeable logical block type (a cluster type).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogicalBlockType {
    /// Type name (e.g., "clb", "io").
    pub name: String,
    /// Index of this type within its [`DeviceModel`].
    pub index: usize,
    /// Number of cluster instances sharing one placement location.
    pub capacity: usize,
    /// Total external pin count over the full capacity.
    pub num_pins: usize,
    /// The root of the pb-type tree.
    pub pb_type: PbType,
    /// The flattened pin graph of one cluster instance.
    pub pb_graph: PbGraph,
}

impl LogicalBlockType {
    /// External pin count of a single cluster instance.
    pub fn pins_per_instance(&self) -> usize {
        self.num_pins / self.capacity
    }
}

/// The device model consumed by the packed-netlist loader.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeviceModel {
    /// Device or architecture name.
    pub name: String,
    /// All logical block types, indexed by `LogicalBlockType::index`.
    pub block_types: Vec<LogicalBlockType>,
}

impl DeviceModel {
    /// Creates a device model from its block types.
    pub fn new(name: impl Into<String>, block_types: Vec<LogicalBlockType>) -> Self {
        Self {
            name: name.into(),
            block_types,
        }
    }

    /// Returns the index of the block type with the given name.
    pub fn find_block_type(&self, name: &str) -> Option<usize> {
        self.block_types.iter().position(|t| t.name == name)
    }

    /// Returns the block type at the given index.
    pub fn block_type(&self, index: usize) -> &LogicalBlockType {
        &self.block_types[index]
    }
}
