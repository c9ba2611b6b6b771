//! The atom-to-cluster binding surface.
//!
//! The loader records where each atom landed through this struct and nothing
//! else: which cluster and pb a block was packed into, and which external net
//! carries each atom net. Downstream stages query the same surface.

use crate::ids::{ClusterBlockId, ClusterNetId, PbId};
use kestrel_atom::{AtomBlockId, AtomNetId};
use std::collections::HashMap;

/// Lookaside maps binding atom entities to clustered-netlist entities.
#[derive(Clone, Debug, Default)]
pub struct AtomBindings {
    pb: HashMap<AtomBlockId, (ClusterBlockId, PbId)>,
    clb: HashMap<AtomBlockId, ClusterBlockId>,
    net: HashMap<AtomNetId, ClusterNetId>,
}

impl AtomBindings {
    /// Creates an empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pb an atom block was packed into.
    pub fn set_atom_pb(&mut self, block: AtomBlockId, cluster: ClusterBlockId, pb: PbId) {
        self.pb.insert(block, (cluster, pb));
    }

    /// Records the cluster an atom block was packed into.
    pub fn set_atom_clb(&mut self, block: AtomBlockId, cluster: ClusterBlockId) {
        self.clb.insert(block, cluster);
    }

    /// Records the external net carrying an atom net.
    pub fn set_atom_clb_net(&mut self, net: AtomNetId, external: ClusterNetId) {
        self.net.insert(net, external);
    }

    /// Returns the cluster and pb an atom block was packed into.
    pub fn atom_pb(&self, block: AtomBlockId) -> Option<(ClusterBlockId, PbId)> {
        self.pb.get(&block).copied()
    }

    /// Returns the cluster an atom block was packed into.
    pub fn atom_clb(&self, block: AtomBlockId) -> Option<ClusterBlockId> {
        self.clb.get(&block).copied()
    }

    /// Returns the external net carrying an atom net.
    pub fn atom_clb_net(&self, net: AtomNetId) -> Option<ClusterNetId> {
        self.net.get(&net).copied()
    }

    /// Number of atom blocks bound to a pb.
    pub fn bound_block_count(&self) -> usize {
        self.pb.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bindings() {
        let b = AtomBindings::new();
        assert_eq!(b.atom_pb(AtomBlockId::from_raw(0)), None);
        assert_eq!(b.atom_clb(AtomBlockId::from_raw(0)), None);
        assert_eq!(b.atom_clb_net(AtomNetId::from_raw(0)), None);
        assert_eq!(b.bound_block_count(), 0);
    }

    #[test]
    fn set_and_get() {
        let mut b = AtomBindings::new();
        let atom = AtomBlockId::from_raw(3);
        let cluster = ClusterBlockId::from_raw(1);
        let pb = PbId::from_raw(2);
        b.set_atom_pb(atom, cluster, pb);
        b.set_atom_clb(atom, cluster);
        b.set_atom_clb_net(AtomNetId::from_raw(5), ClusterNetId::from_raw(0));
        assert_eq!(b.atom_pb(atom), Some((cluster, pb)));
        assert_eq!(b.atom_clb(atom), Some(cluster));
        assert_eq!(
            b.atom_clb_net(AtomNetId::from_raw(5)),
            Some(ClusterNetId::from_raw(0))
        );
        assert_eq!(b.bound_block_count(), 1);
    }
}
