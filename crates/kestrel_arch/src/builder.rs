//! Programmatic construction of [`PbGraph`]s.
//!
//! The upstream architecture reader builds one graph per logical block type
//! through this builder; tests use it to shape small clusters directly. Flat
//! pin indices are handed out in the order ports are added.

use crate::graph::{PbGraph, PbGraphEdge, PbGraphNode, PbGraphPin, PortPins};
use crate::ids::{PbNodeId, PbPinId};
use kestrel_common::PortDirection;

/// Builds a [`PbGraph`] node by node, port by port.
#[derive(Debug, Default)]
pub struct PbGraphBuilder {
    graph: PbGraph,
}

impl PbGraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the cluster root node. Must be the first node added.
    ///
    /// # Panics
    ///
    /// Panics if a node already exists.
    pub fn add_root(&mut self, pb_type_name: impl Into<String>) -> PbNodeId {
        assert!(
            self.graph.nodes.is_empty(),
            "the root must be the first node added"
        );
        self.push_node(pb_type_name.into(), 0, None)
    }

    /// Adds a child node under `parent` in the given mode.
    ///
    /// The child-type slot within the mode is keyed by `pb_type_name`: the
    /// first child of a new type opens a new slot, later instances of the
    /// same type must arrive in instance order.
    ///
    /// # Panics
    ///
    /// Panics if `instance` is not the next instance of that type.
    pub fn add_child(
        &mut self,
        parent: PbNodeId,
        mode: usize,
        instance: usize,
        pb_type_name: impl Into<String>,
    ) -> PbNodeId {
        let pb_type_name = pb_type_name.into();
        let id = self.push_node(pb_type_name.clone(), instance, Some(parent));
        let pidx = parent.as_raw() as usize;
        if self.graph.nodes[pidx].children.len() <= mode {
            self.graph.nodes[pidx].children.resize(mode + 1, Vec::new());
        }
        let slot = self.graph.nodes[pidx].children[mode]
            .iter()
            .position(|instances| {
                let first = instances[0].as_raw() as usize;
                self.graph.nodes[first].pb_type_name == pb_type_name
            });
        match slot {
            Some(ct) => {
                let list = &mut self.graph.nodes[pidx].children[mode][ct];
                assert_eq!(
                    list.len(),
                    instance,
                    "instances of '{pb_type_name}' must be added in order"
                );
                list.push(id);
            }
            None => {
                assert_eq!(instance, 0, "first instance of '{pb_type_name}' must be 0");
                self.graph.nodes[pidx].children[mode].push(vec![id]);
            }
        }
        id
    }

    /// Adds a port of `width` bits to a node, allocating flat pin indices in
    /// bit order. Returns the new pin IDs.
    pub fn add_port(
        &mut self,
        node: PbNodeId,
        name: impl Into<String>,
        direction: PortDirection,
        width: usize,
        is_global: bool,
    ) -> Vec<PbPinId> {
        let name = name.into();
        let mut pins = Vec::with_capacity(width);
        for bit in 0..width {
            let pin = PbPinId::from_raw(self.graph.pins.len() as u32);
            self.graph.pins.push(PbGraphPin {
                node,
                port_name: name.clone(),
                direction,
                pin_number: bit,
                is_global,
                edges: Vec::new(),
            });
            pins.push(pin);
        }
        let node_data = &mut self.graph.nodes[node.as_raw() as usize];
        let section = match direction {
            PortDirection::Input => &mut node_data.in_ports,
            PortDirection::Output => &mut node_data.out_ports,
            PortDirection::Clock => &mut node_data.clock_ports,
        };
        section.push(PortPins {
            name,
            pins: pins.clone(),
        });
        pins
    }

    /// Adds an interconnect edge from `src` to `sink`.
    pub fn add_edge(&mut self, src: PbPinId, sink: PbPinId, interconnect: impl Into<String>) {
        self.graph.pins[src.as_raw() as usize]
            .edges
            .push(PbGraphEdge {
                interconnect: interconnect.into(),
                sink,
            });
    }

    /// Finishes construction and returns the graph.
    pub fn finish(self) -> PbGraph {
        self.graph
    }

    fn push_node(
        &mut self,
        pb_type_name: String,
        placement_index: usize,
        parent: Option<PbNodeId>,
    ) -> PbNodeId {
        let id = PbNodeId::from_raw(self.graph.nodes.len() as u32);
        self.graph.nodes.push(PbGraphNode {
            pb_type_name,
            placement_index,
            parent,
            in_ports: Vec::new(),
            out_ports: Vec::new(),
            clock_ports: Vec::new(),
            children: Vec::new(),
        });
        id
    }
}
