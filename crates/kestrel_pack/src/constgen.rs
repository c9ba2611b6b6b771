//! Identification of constant-generator primitives.
//!
//! A packed leaf pb is a constant generator when it is not a primary input
//! and none of its input or clock pins carry any routing. Whatever such a
//! primitive drives is a fixed logic level, so the atom netlist must already
//! flag the driving pins as constant; the check here asserts that agreement.

use crate::clustered::ClusteredNetlist;
use crate::error::PackError;
use crate::ids::{ClusterBlockId, PbId};
use kestrel_arch::DeviceModel;
use kestrel_atom::{AtomBlockType, AtomNetlist};
use kestrel_common::PortDirection;

/// A leaf pb identified as a constant generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantGenerator {
    /// The cluster holding the primitive.
    pub cluster: ClusterBlockId,
    /// The primitive pb.
    pub pb: PbId,
}

/// Recursively descends every cluster's pb tree and returns the constant
/// generators found.
///
/// Fails with a consistency error if a constant generator drives an atom net
/// whose driver pin is not flagged constant in the atom netlist.
pub fn mark_constant_generators(
    clusters: &ClusteredNetlist,
    device: &DeviceModel,
    atoms: &AtomNetlist,
    file: &str,
) -> Result<Vec<ConstantGenerator>, PackError> {
    let mut found = Vec::new();
    for block_index in 0..clusters.block_count() {
        let cluster = ClusterBlockId::from_raw(block_index as u32);
        walk_pb(
            clusters,
            device,
            atoms,
            file,
            cluster,
            clusters.blocks[block_index].root_pb(),
            &mut found,
        )?;
    }
    Ok(found)
}

fn walk_pb(
    clusters: &ClusteredNetlist,
    device: &DeviceModel,
    atoms: &AtomNetlist,
    file: &str,
    cluster: ClusterBlockId,
    pb_id: PbId,
    found: &mut Vec<ConstantGenerator>,
) -> Result<(), PackError> {
    let block = clusters.block(cluster);
    let graph = &device.block_type(block.block_type).pb_graph;
    let pb = block.pb(pb_id);

    if !graph.node(pb.node).is_primitive() {
        let children: Vec<PbId> = pb
            .children
            .iter()
            .flat_map(|instances| instances.iter().flatten().copied())
            .collect();
        for child in children {
            walk_pb(clusters, device, atoms, file, cluster, child, found)?;
        }
        return Ok(());
    }

    let atom = pb.atom;
    if !atom.is_valid() || atoms.block_type(atom) == AtomBlockType::Inpad {
        return Ok(());
    }
    let unconnected = graph
        .node_pins_with_direction(pb.node, PortDirection::Input)
        .chain(graph.node_pins_with_direction(pb.node, PortDirection::Clock))
        .all(|pin| block.pb_route[pin.index()].is_unused());
    if !unconnected {
        return Ok(());
    }

    for pin in graph.node_pins_with_direction(pb.node, PortDirection::Output) {
        let net = block.pb_route[pin.index()].atom_net;
        if !net.is_valid() {
            continue;
        }
        let driver = atoms.net_driver(net);
        if !driver.is_valid() || !atoms.pin_is_constant(driver) {
            return Err(PackError::consistency(
                file,
                format!(
                    "constant generator '{}' drives net '{}' whose driver is not marked constant",
                    atoms.block_name(atom),
                    atoms.net_name(net)
                ),
            ));
        }
    }
    found.push(ConstantGenerator { cluster, pb: pb_id });
    Ok(())
}
