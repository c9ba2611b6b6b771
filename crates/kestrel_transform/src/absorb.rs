//! Absorption of buffer LUTs.
//!
//! A buffer LUT passes its single input straight through (`1 1` or `0 0`
//! single-row table). Absorbing one merges its input and output nets into a
//! single net and drops the block. The merged net's name is chosen to keep
//! the names that matter downstream: a primary input's net name wins over an
//! internal name, and a buffer wedged directly between a primary input and a
//! primary output is left alone so both names survive.

use kestrel_atom::{AtomBlockId, AtomBlockType, AtomNetlist, MODEL_NAMES};
use kestrel_common::PortDirection;

/// Absorbs every buffer LUT in the netlist. Returns the number absorbed.
pub fn absorb_buffer_luts(netlist: &mut AtomNetlist) -> usize {
    let candidates: Vec<AtomBlockId> = netlist.blocks().collect();
    let mut absorbed = 0;
    for block in candidates {
        if netlist.block_is_live(block) && is_buffer_lut(netlist, block) && absorb(netlist, block)
        {
            absorbed += 1;
        }
    }
    absorbed
}

/// A buffer LUT is combinational, of the generic LUT model, with one input
/// and one output port, exactly one connected pin on each, and an identity
/// truth table.
fn is_buffer_lut(netlist: &AtomNetlist, block: AtomBlockId) -> bool {
    if netlist.block_type(block) != AtomBlockType::Combinational {
        return false;
    }
    if netlist.models().get(netlist.block_model(block)).name != MODEL_NAMES {
        return false;
    }
    let mut input_ports = 0;
    let mut output_ports = 0;
    for &port in netlist.block_ports(block) {
        match netlist.port_direction(port) {
            PortDirection::Input => input_ports += 1,
            PortDirection::Output => output_ports += 1,
            PortDirection::Clock => return false,
        }
    }
    if input_ports != 1 || output_ports != 1 {
        return false;
    }
    let connected_inputs = netlist
        .block_pins_with_direction(block, PortDirection::Input)
        .filter(|&p| netlist.pin_net(p).is_valid())
        .count();
    let connected_outputs = netlist
        .block_pins_with_direction(block, PortDirection::Output)
        .filter(|&p| netlist.pin_net(p).is_valid())
        .count();
    if connected_inputs != 1 || connected_outputs != 1 {
        return false;
    }
    netlist
        .block_truth_table(block)
        .is_some_and(|tt| tt.is_identity_buffer())
}

fn absorb(netlist: &mut AtomNetlist, block: AtomBlockId) -> bool {
    let input_pin = netlist
        .block_pins_with_direction(block, PortDirection::Input)
        .find(|&p| netlist.pin_net(p).is_valid())
        .expect("buffer LUT has a connected input pin");
    let output_pin = netlist
        .block_pins_with_direction(block, PortDirection::Output)
        .find(|&p| netlist.pin_net(p).is_valid())
        .expect("buffer LUT has a connected output pin");
    let input_net = netlist.pin_net(input_pin);
    let output_net = netlist.pin_net(output_pin);
    if input_net == output_net {
        return false;
    }

    let driver = netlist.net_driver(input_net);
    let driver_is_pi = driver.is_valid()
        && netlist.block_type(netlist.pin_block(driver)) == AtomBlockType::Inpad;
    let sink_is_po = netlist
        .net_sinks(output_net)
        .iter()
        .any(|&s| netlist.block_type(netlist.pin_block(s)) == AtomBlockType::Outpad);

    let name = match (driver_is_pi, sink_is_po) {
        // Both the primary-input and primary-output names are needed for
        // downstream equivalence checking; leave the buffer in place.
        (true, true) => return false,
        (true, false) => netlist.net_name(input_net).to_string(),
        _ => netlist.net_name(output_net).to_string(),
    };

    let mut sinks: Vec<_> = netlist
        .net_sinks(input_net)
        .iter()
        .copied()
        .filter(|&p| p != input_pin)
        .collect();
    sinks.extend(netlist.net_sinks(output_net).iter().copied());
    let is_constant = netlist.net_is_constant(input_net);
    let is_global = netlist.net_is_global(input_net);

    netlist.remove_block(block);
    netlist.remove_net(input_net);
    netlist.remove_net(output_net);
    let merged = netlist
        .add_net(name, driver, &sinks)
        .expect("merged net reuses a name that was just removed");
    netlist.set_net_is_constant(merged, is_constant);
    netlist.set_net_is_global(merged, is_global);
    true
}
