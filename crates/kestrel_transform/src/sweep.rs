//! Dead-element sweeps.
//!
//! Five passes remove elements the rest of the netlist no longer needs:
//! unused input pads, disconnected output pads, output pads fed only by
//! constants, dangling non-I/O blocks, and dangling nets. Removing one
//! element can expose another, so [`sweep_iterative`] loops all passes until
//! a full round removes nothing. The fixpoint does not depend on removal
//! order within a pass.

use kestrel_atom::{AtomBlockId, AtomBlockType, AtomNetId, AtomNetlist};
use kestrel_common::PortDirection;
use serde::{Deserialize, Serialize};

/// Removal counts of one [`sweep_iterative`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Input pads removed for lack of fanout.
    pub inputs_removed: usize,
    /// Output pads removed for being disconnected.
    pub outputs_removed: usize,
    /// Output pads removed for being fed only by constants.
    pub constant_outputs_removed: usize,
    /// Non-I/O blocks removed for lack of fanout.
    pub blocks_removed: usize,
    /// Nets removed for lacking a driver or sinks.
    pub nets_removed: usize,
    /// Number of rounds until the fixpoint (including the final empty one).
    pub iterations: usize,
}

impl SweepReport {
    /// Total number of elements removed.
    pub fn total(&self) -> usize {
        self.inputs_removed
            + self.outputs_removed
            + self.constant_outputs_removed
            + self.blocks_removed
            + self.nets_removed
    }
}

fn live_blocks(netlist: &AtomNetlist) -> Vec<AtomBlockId> {
    netlist.blocks().collect()
}

fn has_fanout(netlist: &AtomNetlist, block: AtomBlockId) -> bool {
    netlist
        .block_pins_with_direction(block, PortDirection::Output)
        .any(|pin| {
            let net = netlist.pin_net(pin);
            net.is_valid() && !netlist.net_sinks(net).is_empty()
        })
}

/// Removes input pads whose output drives nothing. Returns the count.
pub fn sweep_unused_inputs(netlist: &mut AtomNetlist) -> usize {
    let mut removed = 0;
    for block in live_blocks(netlist) {
        if netlist.block_type(block) == AtomBlockType::Inpad && !has_fanout(netlist, block) {
            netlist.remove_block(block);
            removed += 1;
        }
    }
    removed
}

/// Removes output pads whose input pin is unconnected. Returns the count.
pub fn sweep_unused_outputs(netlist: &mut AtomNetlist) -> usize {
    let mut removed = 0;
    for block in live_blocks(netlist) {
        if netlist.block_type(block) != AtomBlockType::Outpad {
            continue;
        }
        let disconnected = netlist
            .block_pins_with_direction(block, PortDirection::Input)
            .all(|pin| !netlist.pin_net(pin).is_valid());
        if disconnected {
            netlist.remove_block(block);
            removed += 1;
        }
    }
    removed
}

/// Removes output pads whose inputs are all unconnected or fed by constant
/// nets. Returns the count.
pub fn sweep_constant_primary_outputs(netlist: &mut AtomNetlist) -> usize {
    let mut removed = 0;
    for block in live_blocks(netlist) {
        if netlist.block_type(block) != AtomBlockType::Outpad {
            continue;
        }
        let all_constant = netlist
            .block_pins_with_direction(block, PortDirection::Input)
            .all(|pin| {
                let net = netlist.pin_net(pin);
                !net.is_valid() || netlist.net_is_constant(net)
            });
        if all_constant {
            netlist.remove_block(block);
            removed += 1;
        }
    }
    removed
}

/// Removes non-I/O blocks with no fanout. Returns the count.
pub fn sweep_dangling_blocks(netlist: &mut AtomNetlist) -> usize {
    let mut removed = 0;
    for block in live_blocks(netlist) {
        if !netlist.block_type(block).is_io() && !has_fanout(netlist, block) {
            netlist.remove_block(block);
            removed += 1;
        }
    }
    removed
}

/// Removes nets lacking a driver or lacking sinks. Returns the count.
pub fn sweep_dangling_nets(netlist: &mut AtomNetlist) -> usize {
    let dangling: Vec<AtomNetId> = netlist
        .nets()
        .filter(|&net| !netlist.net_driver(net).is_valid() || netlist.net_sinks(net).is_empty())
        .collect();
    let removed = dangling.len();
    for net in dangling {
        netlist.remove_net(net);
    }
    removed
}

/// Applies all five sweeps in rounds until a full round removes nothing.
///
/// Running the sweep a second time removes nothing (the fixpoint is stable).
pub fn sweep_iterative(netlist: &mut AtomNetlist) -> SweepReport {
    let mut report = SweepReport::default();
    loop {
        let constant_outputs = sweep_constant_primary_outputs(netlist);
        let outputs = sweep_unused_outputs(netlist);
        let inputs = sweep_unused_inputs(netlist);
        let blocks = sweep_dangling_blocks(netlist);
        let nets = sweep_dangling_nets(netlist);
        report.constant_outputs_removed += constant_outputs;
        report.outputs_removed += outputs;
        report.inputs_removed += inputs;
        report.blocks_removed += blocks;
        report.nets_removed += nets;
        report.iterations += 1;
        if constant_outputs + outputs + inputs + blocks + nets == 0 {
            return report;
        }
    }
}
