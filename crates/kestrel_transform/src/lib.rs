//! Structural transformation passes over the atom netlist.
//!
//! Everything here mutates the netlist only through the safe surface of
//! [`kestrel_atom::AtomNetlist`], so pin/net cross-references stay consistent
//! through every removal and rewire.
//!
//! # Passes
//!
//! 1. **Buffer absorption** — identity LUTs disappear, their input and
//!    output nets merge (primary I/O names preserved)
//! 2. **Sweeps** — unused pads, dangling blocks, and dangling nets are
//!    removed iteratively until nothing changes
//!
//! # Usage
//!
//! ```ignore
//! use kestrel_transform::clean_netlist;
//!
//! let report = clean_netlist(&mut atoms);
//! assert_eq!(report.sweep.total() + report.buffers_absorbed, expected);
//! ```

#![warn(missing_docs)]

pub mod absorb;
pub mod sweep;

pub use absorb::absorb_buffer_luts;
pub use sweep::{
    sweep_constant_primary_outputs, sweep_dangling_blocks, sweep_dangling_nets, sweep_iterative,
    sweep_unused_inputs, sweep_unused_outputs, SweepReport,
};

use kestrel_atom::AtomNetlist;
use serde::{Deserialize, Serialize};

/// The combined result of a full cleaning run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    /// Buffer LUTs absorbed.
    pub buffers_absorbed: usize,
    /// Removal counts of the iterative sweep.
    pub sweep: SweepReport,
}

/// Absorbs buffer LUTs, then sweeps dead elements to the fixpoint.
pub fn clean_netlist(netlist: &mut AtomNetlist) -> CleanReport {
    let buffers_absorbed = absorb_buffer_luts(netlist);
    let sweep = sweep_iterative(netlist);
    CleanReport {
        buffers_absorbed,
        sweep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_atom::{AtomBlockType, MODEL_INPUT, MODEL_NAMES, MODEL_OUTPUT};
    use kestrel_common::LogicValue::{False, True};
    use kestrel_common::{PortDirection, TruthTable};

    /// a → buffer → g → out:y, plus an unused input pad. Cleaning absorbs
    /// the buffer and sweeps the pad; the live path is untouched.
    #[test]
    fn clean_combines_absorb_and_sweep() {
        let mut nl = AtomNetlist::new("t");
        let input = nl.models().find(MODEL_INPUT).unwrap();
        let output = nl.models().find(MODEL_OUTPUT).unwrap();
        let names = nl.models().find(MODEL_NAMES).unwrap();

        let a = nl.add_block("a", AtomBlockType::Inpad, input, None).unwrap();
        let a_out = nl.add_port(a, "inpad", PortDirection::Output, 1);
        let unused = nl
            .add_block("unused", AtomBlockType::Inpad, input, None)
            .unwrap();
        nl.add_port(unused, "inpad", PortDirection::Output, 1);

        let buf = nl
            .add_block(
                "buf",
                AtomBlockType::Combinational,
                names,
                Some(TruthTable::from_rows(vec![vec![True, True]])),
            )
            .unwrap();
        let buf_in = nl.add_port(buf, "in", PortDirection::Input, 1);
        let buf_out = nl.add_port(buf, "out", PortDirection::Output, 1);

        let g = nl
            .add_block(
                "g",
                AtomBlockType::Combinational,
                names,
                Some(TruthTable::from_rows(vec![vec![True, False]])),
            )
            .unwrap();
        let g_in = nl.add_port(g, "in", PortDirection::Input, 1);
        let g_out = nl.add_port(g, "out", PortDirection::Output, 1);

        let y = nl
            .add_block("out:y", AtomBlockType::Outpad, output, None)
            .unwrap();
        let y_in = nl.add_port(y, "outpad", PortDirection::Input, 1);

        nl.add_net("a", nl.port_pins(a_out)[0], &[nl.port_pins(buf_in)[0]])
            .unwrap();
        nl.add_net("mid", nl.port_pins(buf_out)[0], &[nl.port_pins(g_in)[0]])
            .unwrap();
        nl.add_net("y", nl.port_pins(g_out)[0], &[nl.port_pins(y_in)[0]])
            .unwrap();

        let report = clean_netlist(&mut nl);
        assert_eq!(report.buffers_absorbed, 1);
        assert_eq!(report.sweep.inputs_removed, 1);
        nl.verify().unwrap();

        // a → g → out:y survives, with the merged net named after the PI.
        assert_eq!(nl.block_count(), 3);
        let merged = nl.pin_net(nl.port_pins(g_in)[0]);
        assert_eq!(nl.net_name(merged), "a");
        assert!(nl.find_block("unused").is_none());
    }

    #[test]
    fn clean_on_empty_netlist() {
        let mut nl = AtomNetlist::new("t");
        let report = clean_netlist(&mut nl);
        assert_eq!(report.buffers_absorbed, 0);
        assert_eq!(report.sweep.total(), 0);
    }

    #[test]
    fn report_serde_roundtrip() {
        let report = CleanReport {
            buffers_absorbed: 2,
            ..CleanReport::default()
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: CleanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }
}
