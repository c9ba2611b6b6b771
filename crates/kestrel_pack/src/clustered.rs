//! The clustered netlist: placed clusters, their pb trees, and the
//! inter-cluster nets.

use crate::ids::{ClusterBlockId, ClusterNetId, PbId};
use kestrel_arch::{PbNodeId, PbPinId};
use kestrel_atom::{AtomBlockId, AtomNetId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of a cluster's routing table, indexed by the pin's
/// pin-count-in-cluster flat index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbRouteEntry {
    /// The atom net carried by this pin; invalid when the pin is unused.
    pub atom_net: AtomNetId,
    /// The upstream pin driving this one; `None` at routing boundaries.
    pub prev_pin: Option<PbPinId>,
}

impl PbRouteEntry {
    /// Returns `true` if the entry carries neither a net nor an upstream pin.
    pub fn is_unused(&self) -> bool {
        !self.atom_net.is_valid() && self.prev_pin.is_none()
    }
}

/// A pb instance inside a cluster, mirroring one node of the pin graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pb {
    /// Instance name; `None` for the `open` literal (routing-only slots).
    pub name: Option<String>,
    /// The pin-graph node this pb instantiates.
    pub node: PbNodeId,
    /// Selected mode index.
    pub mode: usize,
    /// Parent pb; `None` for the cluster root.
    pub parent: Option<PbId>,
    /// Occupied child slots of the selected mode, as
    /// `children[child_type][instance]`.
    pub children: Vec<Vec<Option<PbId>>>,
    /// For primitives, the atom block packed here.
    pub atom: AtomBlockId,
}

/// A placed cluster: a logical block instance with its routing table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteredBlock {
    /// Instance name from the packed netlist.
    pub name: String,
    /// Index of the logical block type in the device model.
    pub block_type: usize,
    /// All pb instances of this cluster; index 0 is the root.
    pub pbs: Vec<Pb>,
    /// Routing table indexed by pin-count-in-cluster.
    pub pb_route: Vec<PbRouteEntry>,
    /// External nets by flat external-pin position (inputs, then outputs,
    /// then clocks, in pb-port order). Invalid entries are unused pins.
    pub external_nets: Vec<ClusterNetId>,
}

impl ClusteredBlock {
    /// The root pb of the cluster.
    pub fn root_pb(&self) -> PbId {
        PbId::from_raw(0)
    }

    /// Returns the pb with the given ID.
    pub fn pb(&self, id: PbId) -> &Pb {
        &self.pbs[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the pb with the given ID.
    pub fn pb_mut(&mut self, id: PbId) -> &mut Pb {
        &mut self.pbs[id.as_raw() as usize]
    }

    /// Appends a pb and returns its ID.
    pub fn add_pb(&mut self, pb: Pb) -> PbId {
        let id = PbId::from_raw(self.pbs.len() as u32);
        self.pbs.push(pb);
        id
    }
}

/// A pin of a cluster, named by cluster and flat pin index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterPinRef {
    /// The cluster.
    pub block: ClusterBlockId,
    /// The pin's pin-count-in-cluster flat index.
    pub pin: usize,
}

/// An inter-cluster net, deduplicated by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterNet {
    /// Net name (the atom net's name).
    pub name: String,
    /// The atom net this external net carries.
    pub atom_net: AtomNetId,
    /// Whether the net is a global signal; all its pins must agree.
    pub is_global: bool,
    /// The single driving cluster pin.
    pub driver: Option<ClusterPinRef>,
    /// The sinking cluster pins.
    pub sinks: Vec<ClusterPinRef>,
}

/// The clustered netlist produced by the packed-netlist loader.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClusteredNetlist {
    /// All clusters in document order.
    pub blocks: Vec<ClusteredBlock>,
    /// All inter-cluster nets in interning order.
    pub nets: Vec<ClusterNet>,
    #[serde(skip)]
    net_by_name: HashMap<String, ClusterNetId>,
}

impl ClusteredNetlist {
    /// Creates an empty clustered netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cluster and returns its ID.
    pub fn add_block(&mut self, block: ClusteredBlock) -> ClusterBlockId {
        let id = ClusterBlockId::from_raw(self.blocks.len() as u32);
        self.blocks.push(block);
        id
    }

    /// Returns the cluster with the given ID.
    pub fn block(&self, id: ClusterBlockId) -> &ClusteredBlock {
        &self.blocks[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the cluster with the given ID.
    pub fn block_mut(&mut self, id: ClusterBlockId) -> &mut ClusteredBlock {
        &mut self.blocks[id.as_raw() as usize]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: ClusterNetId) -> &ClusterNet {
        &self.nets[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the net with the given ID.
    pub fn net_mut(&mut self, id: ClusterNetId) -> &mut ClusterNet {
        &mut self.nets[id.as_raw() as usize]
    }

    /// Returns the net with the given name, if interned.
    pub fn find_net(&self, name: &str) -> Option<ClusterNetId> {
        self.net_by_name.get(name).copied()
    }

    /// Interns a net by name. Returns the ID and whether it was newly
    /// created.
    pub fn intern_net(&mut self, name: &str, atom_net: AtomNetId) -> (ClusterNetId, bool) {
        if let Some(&id) = self.net_by_name.get(name) {
            return (id, false);
        }
        let id = ClusterNetId::from_raw(self.nets.len() as u32);
        self.net_by_name.insert(name.to_string(), id);
        self.nets.push(ClusterNet {
            name: name.to_string(),
            atom_net,
            is_global: false,
            driver: None,
            sinks: Vec::new(),
        });
        (id, true)
    }

    /// Returns the number of clusters.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the number of inter-cluster nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Rebuilds the net name index after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.net_by_name.clear();
        for (i, n) in self.nets.iter().enumerate() {
            self.net_by_name
                .insert(n.name.clone(), ClusterNetId::from_raw(i as u32));
        }
    }
}
