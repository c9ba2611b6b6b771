//! Extraction of the inter-cluster nets from populated clusters.
//!
//! Walks every cluster's external pins in canonical order (inputs, outputs,
//! clocks, in pb-port order), interns each routed pin's atom net by name into
//! the deduplicated external-net table, and records the driver/sink relation.
//! While walking, the global flags of all pins of one net are checked to
//! agree, and every net named in the circuit clock list must come out global.

use crate::bindings::AtomBindings;
use crate::clustered::{ClusterPinRef, ClusteredNetlist};
use crate::error::PackError;
use crate::ids::ClusterBlockId;
use kestrel_arch::DeviceModel;
use kestrel_atom::AtomNetlist;
use kestrel_common::PortDirection;

/// Populates `clusters.nets`, the per-cluster `external_nets` arrays, and
/// the atom-net-to-external-net bindings.
pub fn extract_cluster_nets(
    clusters: &mut ClusteredNetlist,
    device: &DeviceModel,
    atoms: &AtomNetlist,
    bindings: &mut AtomBindings,
    circuit_clocks: &[String],
    file: &str,
) -> Result<(), PackError> {
    for block_index in 0..clusters.block_count() {
        let cluster = ClusterBlockId::from_raw(block_index as u32);
        let graph = &device
            .block_type(clusters.blocks[block_index].block_type)
            .pb_graph;
        let root_pins: Vec<_> = graph.node_pins(graph.root()).collect();
        for (flat_pos, &pin) in root_pins.iter().enumerate() {
            let entry = clusters.blocks[block_index].pb_route[pin.index()];
            if !entry.atom_net.is_valid() {
                continue;
            }
            let name = atoms.net_name(entry.atom_net).to_string();
            let (net_id, created) = clusters.intern_net(&name, entry.atom_net);
            clusters.blocks[block_index].external_nets[flat_pos] = net_id;
            bindings.set_atom_clb_net(entry.atom_net, net_id);

            let pin_is_global = graph.pin(pin).is_global;
            let pin_ref = ClusterPinRef {
                block: cluster,
                pin: pin.index(),
            };
            let net = clusters.net_mut(net_id);
            if created {
                net.is_global = pin_is_global;
            } else if net.is_global != pin_is_global {
                return Err(PackError::consistency(
                    file,
                    format!("net '{name}' mixes global and non-global pins"),
                ));
            }
            match graph.pin(pin).direction {
                PortDirection::Output => {
                    if net.driver.is_some() {
                        return Err(PackError::consistency(
                            file,
                            format!("net '{name}' has more than one driver"),
                        ));
                    }
                    net.driver = Some(pin_ref);
                }
                PortDirection::Input | PortDirection::Clock => net.sinks.push(pin_ref),
            }
        }
    }

    for net in &clusters.nets {
        if net.driver.is_none() {
            return Err(PackError::consistency(
                file,
                format!("net '{}' has no driver", net.name),
            ));
        }
    }

    for clock in circuit_clocks {
        match clusters.find_net(clock) {
            Some(id) if clusters.net(id).is_global => {}
            Some(_) => {
                return Err(PackError::consistency(
                    file,
                    format!("clock net '{clock}' is not marked global"),
                ))
            }
            None => {
                return Err(PackError::consistency(
                    file,
                    format!("clock net '{clock}' not found among inter-cluster nets"),
                ))
            }
        }
    }
    Ok(())
}
