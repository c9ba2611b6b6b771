//! Summary statistics over a netlist.

use crate::netlist::AtomNetlist;
use crate::types::AtomBlockType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts and fanout figures for an atom netlist.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetlistStats {
    /// Number of live primary-input pads.
    pub inpads: usize,
    /// Number of live primary-output pads.
    pub outpads: usize,
    /// Number of live combinational blocks.
    pub combinational: usize,
    /// Number of live sequential blocks.
    pub sequential: usize,
    /// Number of live nets.
    pub nets: usize,
    /// Number of live pins.
    pub pins: usize,
    /// Largest sink count over all live nets.
    pub max_fanout: usize,
    /// Mean sink count over all live nets.
    pub avg_fanout: f64,
}

impl NetlistStats {
    /// Gathers statistics from the netlist.
    pub fn collect(netlist: &AtomNetlist) -> Self {
        let mut stats = NetlistStats::default();
        for block in netlist.blocks() {
            match netlist.block_type(block) {
                AtomBlockType::Inpad => stats.inpads += 1,
                AtomBlockType::Outpad => stats.outpads += 1,
                AtomBlockType::Combinational => stats.combinational += 1,
                AtomBlockType::Sequential => stats.sequential += 1,
            }
        }
        stats.pins = netlist.pin_count();
        let mut sink_total = 0usize;
        for net in netlist.nets() {
            stats.nets += 1;
            let fanout = netlist.net_sinks(net).len();
            sink_total += fanout;
            stats.max_fanout = stats.max_fanout.max(fanout);
        }
        if stats.nets > 0 {
            stats.avg_fanout = sink_total as f64 / stats.nets as f64;
        }
        stats
    }

    /// Total number of live blocks.
    pub fn total_blocks(&self) -> usize {
        self.inpads + self.outpads + self.combinational + self.sequential
    }
}

impl fmt::Display for NetlistStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "blocks: {} ({} inpads, {} outpads, {} comb, {} seq)",
            self.total_blocks(),
            self.inpads,
            self.outpads,
            self.combinational,
            self.sequential
        )?;
        write!(
            f,
            "nets: {} (max fanout {}, avg fanout {:.2}), pins: {}",
            self.nets, self.max_fanout, self.avg_fanout, self.pins
        )
    }
}
