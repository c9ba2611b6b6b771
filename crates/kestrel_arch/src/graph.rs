//! The flattened per-cluster pin graph.
//!
//! One [`PbGraph`] describes every pb instance and pin of a single cluster of
//! a logical block type. Nodes and pins live in arenas and refer to each
//! other by ID; a pin's raw ID is its `pin_count_in_cluster` flat index, the
//! same index the packed-netlist loader uses for `pb_route` tables.

use crate::ids::{PbNodeId, PbPinId};
use kestrel_common::PortDirection;
use serde::{Deserialize, Serialize};

/// A named port of a graph node with its pin IDs, one per bit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortPins {
    /// Port name.
    pub name: String,
    /// Pin IDs in bit order.
    pub pins: Vec<PbPinId>,
}

/// A directed interconnect edge leaving a pin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbGraphEdge {
    /// Name of the interconnect this edge belongs to. Distinct interconnects
    /// within one scope have distinct names.
    pub interconnect: String,
    /// The pin this edge drives.
    pub sink: PbPinId,
}

/// One pb instance in the pin graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbGraphNode {
    /// Name of the pb type this node instantiates.
    pub pb_type_name: String,
    /// Instance number of this node among siblings of the same type.
    pub placement_index: usize,
    /// Parent node; `None` for the cluster root.
    pub parent: Option<PbNodeId>,
    /// Input ports.
    pub in_ports: Vec<PortPins>,
    /// Output ports.
    pub out_ports: Vec<PortPins>,
    /// Clock ports.
    pub clock_ports: Vec<PortPins>,
    /// Child nodes as `children[mode][child_type][instance]`. Empty for
    /// primitives.
    pub children: Vec<Vec<Vec<PbNodeId>>>,
}

impl PbGraphNode {
    /// Returns `true` if the node instantiates a primitive pb type.
    pub fn is_primitive(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of modes of the underlying pb type.
    pub fn num_modes(&self) -> usize {
        self.children.len()
    }
}

/// One pin in the pin graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbGraphPin {
    /// The node owning the pin.
    pub node: PbNodeId,
    /// Name of the owning port.
    pub port_name: String,
    /// Direction of the owning port.
    pub direction: PortDirection,
    /// Bit position within the port.
    pub pin_number: usize,
    /// Whether the pin carries a global signal.
    pub is_global: bool,
    /// Outgoing interconnect edges.
    pub edges: Vec<PbGraphEdge>,
}

/// The pin graph of one cluster instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbGraph {
    pub(crate) nodes: Vec<PbGraphNode>,
    pub(crate) pins: Vec<PbGraphPin>,
}

impl PbGraph {
    /// The cluster root node.
    pub fn root(&self) -> PbNodeId {
        PbNodeId::from_raw(0)
    }

    /// Returns the node with the given ID.
    pub fn node(&self, id: PbNodeId) -> &PbGraphNode {
        &self.nodes[id.as_raw() as usize]
    }

    /// Returns the pin with the given ID.
    pub fn pin(&self, id: PbPinId) -> &PbGraphPin {
        &self.pins[id.as_raw() as usize]
    }

    /// Total number of pins in the cluster (the `pb_route` table length).
    pub fn num_pins(&self) -> usize {
        self.pins.len()
    }

    /// Total number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the port pin list of a node by direction section and name.
    pub fn find_port(
        &self,
        node: PbNodeId,
        direction: PortDirection,
        name: &str,
    ) -> Option<&PortPins> {
        let node = self.node(node);
        let section = match direction {
            PortDirection::Input => &node.in_ports,
            PortDirection::Output => &node.out_ports,
            PortDirection::Clock => &node.clock_ports,
        };
        section.iter().find(|p| p.name == name)
    }

    /// Iterates over a node's pins in canonical order: inputs, then outputs,
    /// then clocks, each section in port order.
    pub fn node_pins(&self, node: PbNodeId) -> impl Iterator<Item = PbPinId> + '_ {
        let n = self.node(node);
        n.in_ports
            .iter()
            .chain(n.out_ports.iter())
            .chain(n.clock_ports.iter())
            .flat_map(|p| p.pins.iter().copied())
    }

    /// Iterates over a node's pins of one direction, in port order.
    pub fn node_pins_with_direction(
        &self,
        node: PbNodeId,
        direction: PortDirection,
    ) -> impl Iterator<Item = PbPinId> + '_ {
        let n = self.node(node);
        let section = match direction {
            PortDirection::Input => &n.in_ports,
            PortDirection::Output => &n.out_ports,
            PortDirection::Clock => &n.clock_ports,
        };
        section.iter().flat_map(|p| p.pins.iter().copied())
    }
}
