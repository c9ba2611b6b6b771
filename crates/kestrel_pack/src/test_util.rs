//! Shared fixtures for the loader tests: a small device model (an `io` pad
//! type and a `clb` with one BLE of a LUT and an FF) and matching atom
//! netlists and packed-netlist documents.

use kestrel_arch::{DeviceModel, LogicalBlockType, Mode, PbGraphBuilder, PbPort, PbType};
use kestrel_atom::{
    AtomBlockType, AtomNetlist, MODEL_INPUT, MODEL_LATCH, MODEL_NAMES, MODEL_OUTPUT,
};
use kestrel_common::LogicValue::True;
use kestrel_common::{PortDirection, TruthTable};

/// Builds an `io` pad cluster type with `inpad` and `outpad` modes.
///
/// When `global_output` is set, the `inpad` output port is a global-signal
/// port (a clock entry pad).
fn io_type(name: &str, index: usize, global_output: bool) -> LogicalBlockType {
    let inpad = PbType {
        name: "inpad".to_string(),
        num_instances: 1,
        model: Some(".input".to_string()),
        ports: vec![PbPort::new("inpad", PortDirection::Output, 1)],
        modes: vec![],
    };
    let outpad = PbType {
        name: "outpad".to_string(),
        num_instances: 1,
        model: Some(".output".to_string()),
        ports: vec![PbPort::new("outpad", PortDirection::Input, 1)],
        modes: vec![],
    };
    let pb_type = PbType {
        name: name.to_string(),
        num_instances: 1,
        model: None,
        ports: vec![
            PbPort::new("outpad", PortDirection::Input, 1),
            if global_output {
                PbPort::global("inpad", PortDirection::Output, 1)
            } else {
                PbPort::new("inpad", PortDirection::Output, 1)
            },
        ],
        modes: vec![
            Mode {
                name: "inpad".to_string(),
                children: vec![inpad],
            },
            Mode {
                name: "outpad".to_string(),
                children: vec![outpad],
            },
        ],
    };

    let mut b = PbGraphBuilder::new();
    let root = b.add_root(name);
    let root_in = b.add_port(root, "outpad", PortDirection::Input, 1, false);
    let root_out = b.add_port(root, "inpad", PortDirection::Output, 1, global_output);
    let inpad_node = b.add_child(root, 0, 0, "inpad");
    let inpad_out = b.add_port(inpad_node, "inpad", PortDirection::Output, 1, global_output);
    b.add_edge(inpad_out[0], root_out[0], "inpad");
    let outpad_node = b.add_child(root, 1, 0, "outpad");
    let outpad_in = b.add_port(outpad_node, "outpad", PortDirection::Input, 1, false);
    b.add_edge(root_in[0], outpad_in[0], "outpad");

    LogicalBlockType {
        name: name.to_string(),
        index,
        capacity: 1,
        num_pins: 2,
        pb_type,
        pb_graph: b.finish(),
    }
}

/// Builds the `clb` cluster type: one BLE holding a 2-input LUT and an FF.
fn clb_type(index: usize) -> LogicalBlockType {
    let lut = PbType {
        name: "lut".to_string(),
        num_instances: 1,
        model: Some(".names".to_string()),
        ports: vec![
            PbPort::new("in", PortDirection::Input, 2),
            PbPort::new("out", PortDirection::Output, 1),
        ],
        modes: vec![],
    };
    let ff = PbType {
        name: "ff".to_string(),
        num_instances: 1,
        model: Some(".latch".to_string()),
        ports: vec![
            PbPort::new("D", PortDirection::Input, 1),
            PbPort::new("Q", PortDirection::Output, 1),
            PbPort::global("clk", PortDirection::Clock, 1),
        ],
        modes: vec![],
    };
    let ble = PbType {
        name: "ble".to_string(),
        num_instances: 1,
        model: None,
        ports: vec![
            PbPort::new("in", PortDirection::Input, 2),
            PbPort::new("out", PortDirection::Output, 1),
            PbPort::global("clk", PortDirection::Clock, 1),
        ],
        modes: vec![Mode {
            name: "ble".to_string(),
            children: vec![lut, ff],
        }],
    };
    let clb = PbType {
        name: "clb".to_string(),
        num_instances: 1,
        model: None,
        ports: vec![
            PbPort::new("I", PortDirection::Input, 2),
            PbPort::new("O", PortDirection::Output, 1),
            PbPort::global("clk", PortDirection::Clock, 1),
        ],
        modes: vec![Mode {
            name: "default".to_string(),
            children: vec![ble],
        }],
    };

    let mut b = PbGraphBuilder::new();
    let root = b.add_root("clb");
    let i = b.add_port(root, "I", PortDirection::Input, 2, false);
    let o = b.add_port(root, "O", PortDirection::Output, 1, false);
    let clk = b.add_port(root, "clk", PortDirection::Clock, 1, true);

    let ble_node = b.add_child(root, 0, 0, "ble");
    let ble_in = b.add_port(ble_node, "in", PortDirection::Input, 2, false);
    let ble_out = b.add_port(ble_node, "out", PortDirection::Output, 1, false);
    let ble_clk = b.add_port(ble_node, "clk", PortDirection::Clock, 1, true);

    let lut_node = b.add_child(ble_node, 0, 0, "lut");
    let lut_in = b.add_port(lut_node, "in", PortDirection::Input, 2, false);
    let lut_out = b.add_port(lut_node, "out", PortDirection::Output, 1, false);

    let ff_node = b.add_child(ble_node, 0, 0, "ff");
    let ff_d = b.add_port(ff_node, "D", PortDirection::Input, 1, false);
    let ff_q = b.add_port(ff_node, "Q", PortDirection::Output, 1, false);
    let ff_clk = b.add_port(ff_node, "clk", PortDirection::Clock, 1, true);

    b.add_edge(i[0], ble_in[0], "crossbar");
    b.add_edge(i[1], ble_in[1], "crossbar");
    b.add_edge(clk[0], ble_clk[0], "clk_ic");
    b.add_edge(ble_in[0], lut_in[0], "direct0");
    b.add_edge(ble_in[1], lut_in[1], "direct1");
    b.add_edge(ble_in[0], ff_d[0], "bypass_d");
    b.add_edge(ble_clk[0], ff_clk[0], "clk_dir");
    b.add_edge(lut_out[0], ff_d[0], "lut_to_ff");
    b.add_edge(lut_out[0], ble_out[0], "lut_bypass");
    b.add_edge(ff_q[0], ble_out[0], "ff_out");
    b.add_edge(ble_out[0], o[0], "clb_out");

    LogicalBlockType {
        name: "clb".to_string(),
        index,
        capacity: 1,
        num_pins: 4,
        pb_type: clb,
        pb_graph: b.finish(),
    }
}

/// A device with the `io` and `clb` types.
pub fn test_device() -> DeviceModel {
    DeviceModel::new("test_device", vec![io_type("io", 0, false), clb_type(1)])
}

/// [`test_device`] plus a `gio` pad type whose input pad drives a global
/// signal (a clock entry).
pub fn test_device_with_global_io() -> DeviceModel {
    DeviceModel::new(
        "test_device",
        vec![
            io_type("io", 0, false),
            clb_type(1),
            io_type("gio", 2, true),
        ],
    )
}

/// Atoms of the identity design: inpad `a` → buffer LUT `buf` → outpad
/// `out:y`, nets `a` and `y`.
pub fn identity_atoms() -> AtomNetlist {
    let mut nl = AtomNetlist::new("identity");
    let input = nl.models().find(MODEL_INPUT).unwrap();
    let output = nl.models().find(MODEL_OUTPUT).unwrap();
    let names = nl.models().find(MODEL_NAMES).unwrap();

    let a = nl.add_block("a", AtomBlockType::Inpad, input, None).unwrap();
    let a_out = nl.add_port(a, "inpad", PortDirection::Output, 1);
    let y = nl
        .add_block("out:y", AtomBlockType::Outpad, output, None)
        .unwrap();
    let y_in = nl.add_port(y, "outpad", PortDirection::Input, 1);
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

    let a_driver = nl.port_pins(a_out)[0];
    let buf_sink = nl.port_pins(buf_in)[0];
    let buf_driver = nl.port_pins(buf_out)[0];
    let y_sink = nl.port_pins(y_in)[0];
    nl.add_net("a", a_driver, &[buf_sink]).unwrap();
    nl.add_net("y", buf_driver, &[y_sink]).unwrap();
    nl
}

/// The packed netlist of the identity design: `io[0]` (inpad `a`), `io[1]`
/// (outpad `out:y`), and `clb[2]` holding the buffer LUT.
pub const IDENTITY_NET: &str = r#"<block name="identity" instance="FPGA_packed_netlist[0]">
<inputs>a</inputs>
<outputs>y</outputs>
<clocks></clocks>
<block name="a" instance="io[0]" mode="inpad">
<outputs><port name="inpad">inpad[0]-&gt;inpad</port></outputs>
<block name="a" instance="inpad[0]">
<outputs><port name="inpad">a</port></outputs>
</block>
</block>
<block name="out:y" instance="io[1]" mode="outpad">
<inputs><port name="outpad">y</port></inputs>
<block name="out:y" instance="outpad[0]">
<inputs><port name="outpad">outpad[0]-&gt;outpad</port></inputs>
</block>
</block>
<block name="clb0" instance="clb[2]" mode="default">
<inputs><port name="I">a open</port></inputs>
<outputs><port name="O">out[0]-&gt;clb_out</port></outputs>
<clocks><port name="clk">open</port></clocks>
<block name="ble0" instance="ble[0]" mode="ble">
<inputs><port name="in">I[0]-&gt;crossbar open</port></inputs>
<outputs><port name="out">out[0]-&gt;lut_bypass</port></outputs>
<clocks><port name="clk">open</port></clocks>
<block name="buf" instance="lut[0]">
<inputs><port name="in">in[0]-&gt;direct0 open</port></inputs>
<outputs><port name="out">y</port></outputs>
</block>
</block>
</block>
</block>"#;

/// Atoms of the mixed-global design: the net `clk` feeds both an FF clock
/// pin (global) and a LUT data input (non-global).
pub fn mixed_global_atoms() -> AtomNetlist {
    let mut nl = AtomNetlist::new("mixed");
    let input = nl.models().find(MODEL_INPUT).unwrap();
    let output = nl.models().find(MODEL_OUTPUT).unwrap();
    let names = nl.models().find(MODEL_NAMES).unwrap();
    let latch = nl.models().find(MODEL_LATCH).unwrap();

    let a = nl.add_block("a", AtomBlockType::Inpad, input, None).unwrap();
    let a_out = nl.add_port(a, "inpad", PortDirection::Output, 1);
    let clk = nl
        .add_block("clk", AtomBlockType::Inpad, input, None)
        .unwrap();
    let clk_out = nl.add_port(clk, "inpad", PortDirection::Output, 1);
    let y = nl
        .add_block("out:y", AtomBlockType::Outpad, output, None)
        .unwrap();
    let y_in = nl.add_port(y, "outpad", PortDirection::Input, 1);

    let lutb = nl
        .add_block(
            "lutb",
            AtomBlockType::Combinational,
            names,
            Some(TruthTable::from_rows(vec![vec![True, True, True]])),
        )
        .unwrap();
    let lut_in = nl.add_port(lutb, "in", PortDirection::Input, 2);
    let lut_out = nl.add_port(lutb, "out", PortDirection::Output, 1);

    let ffb = nl
        .add_block(
            "ffb",
            AtomBlockType::Sequential,
            latch,
            Some(TruthTable::latch_initial(kestrel_common::LogicValue::Unknown)),
        )
        .unwrap();
    let ff_d = nl.add_port(ffb, "D", PortDirection::Input, 1);
    let ff_clk = nl.add_port(ffb, "clk", PortDirection::Clock, 1);
    let ff_q = nl.add_port(ffb, "Q", PortDirection::Output, 1);

    nl.add_net("a", nl.port_pins(a_out)[0], &[nl.port_pins(lut_in)[0]])
        .unwrap();
    nl.add_net(
        "clk",
        nl.port_pins(clk_out)[0],
        &[nl.port_pins(lut_in)[1], nl.port_pins(ff_clk)[0]],
    )
    .unwrap();
    nl.add_net("t", nl.port_pins(lut_out)[0], &[nl.port_pins(ff_d)[0]])
        .unwrap();
    nl.add_net("y", nl.port_pins(ff_q)[0], &[nl.port_pins(y_in)[0]])
        .unwrap();
    nl
}

/// The packed netlist of the mixed-global design.
pub const MIXED_GLOBAL_NET: &str = r#"<block name="mixed" instance="FPGA_packed_netlist[0]">
<inputs>a clk</inputs>
<outputs>y</outputs>
<clocks>clk</clocks>
<block name="a" instance="io[0]" mode="inpad">
<outputs><port name="inpad">inpad[0]-&gt;inpad</port></outputs>
<block name="a" instance="inpad[0]">
<outputs><port name="inpad">a</port></outputs>
</block>
</block>
<block name="clk" instance="io[1]" mode="inpad">
<outputs><port name="inpad">inpad[0]-&gt;inpad</port></outputs>
<block name="clk" instance="inpad[0]">
<outputs><port name="inpad">clk</port></outputs>
</block>
</block>
<block name="clb0" instance="clb[2]" mode="default">
<inputs><port name="I">a clk</port></inputs>
<outputs><port name="O">out[0]-&gt;clb_out</port></outputs>
<clocks><port name="clk">clk</port></clocks>
<block name="ble0" instance="ble[0]" mode="ble">
<inputs><port name="in">I[0]-&gt;crossbar I[1]-&gt;crossbar</port></inputs>
<outputs><port name="out">Q[0]-&gt;ff_out</port></outputs>
<clocks><port name="clk">clk[0]-&gt;clk_ic</port></clocks>
<block name="lutb" instance="lut[0]">
<inputs><port name="in">in[0]-&gt;direct0 in[1]-&gt;direct1</port></inputs>
<outputs><port name="out">t</port></outputs>
</block>
<block name="ffb" instance="ff[0]">
<inputs><port name="D">out[0]-&gt;lut_to_ff</port></inputs>
<outputs><port name="Q">y</port></outputs>
<clocks><port name="clk">clk[0]-&gt;clk_dir</port></clocks>
</block>
</block>
</block>
<block name="out:y" instance="io[3]" mode="outpad">
<inputs><port name="outpad">y</port></inputs>
<block name="out:y" instance="outpad[0]">
<inputs><port name="outpad">outpad[0]-&gt;outpad</port></inputs>
</block>
</block>
</block>"#;

/// Atoms of the registered design: inpad `a` → FF `ffb` → outpad `out:y`,
/// clocked by the global entry pad `clk`.
pub fn seq_atoms() -> AtomNetlist {
    let mut nl = AtomNetlist::new("seq");
    let input = nl.models().find(MODEL_INPUT).unwrap();
    let output = nl.models().find(MODEL_OUTPUT).unwrap();
    let latch = nl.models().find(MODEL_LATCH).unwrap();

    let a = nl.add_block("a", AtomBlockType::Inpad, input, None).unwrap();
    let a_out = nl.add_port(a, "inpad", PortDirection::Output, 1);
    let clk = nl
        .add_block("clk", AtomBlockType::Inpad, input, None)
        .unwrap();
    let clk_out = nl.add_port(clk, "inpad", PortDirection::Output, 1);
    let y = nl
        .add_block("out:y", AtomBlockType::Outpad, output, None)
        .unwrap();
    let y_in = nl.add_port(y, "outpad", PortDirection::Input, 1);

    let ffb = nl
        .add_block(
            "ffb",
            AtomBlockType::Sequential,
            latch,
            Some(TruthTable::latch_initial(kestrel_common::LogicValue::False)),
        )
        .unwrap();
    let ff_d = nl.add_port(ffb, "D", PortDirection::Input, 1);
    let ff_clk = nl.add_port(ffb, "clk", PortDirection::Clock, 1);
    let ff_q = nl.add_port(ffb, "Q", PortDirection::Output, 1);

    nl.add_net("a", nl.port_pins(a_out)[0], &[nl.port_pins(ff_d)[0]])
        .unwrap();
    let clk_net = nl
        .add_net("clk", nl.port_pins(clk_out)[0], &[nl.port_pins(ff_clk)[0]])
        .unwrap();
    nl.set_net_is_global(clk_net, true);
    nl.add_net("y", nl.port_pins(ff_q)[0], &[nl.port_pins(y_in)[0]])
        .unwrap();
    nl
}

/// The packed netlist of the registered design, with `clk` entering through
/// the global pad type `gio`.
pub const SEQ_NET: &str = r#"<block name="seq" instance="FPGA_packed_netlist[0]">
<inputs>a</inputs>
<outputs>y</outputs>
<clocks>clk</clocks>
<block name="a" instance="io[0]" mode="inpad">
<outputs><port name="inpad">inpad[0]-&gt;inpad</port></outputs>
<block name="a" instance="inpad[0]">
<outputs><port name="inpad">a</port></outputs>
</block>
</block>
<block name="clk" instance="gio[1]" mode="inpad">
<outputs><port name="inpad">inpad[0]-&gt;inpad</port></outputs>
<block name="clk" instance="inpad[0]">
<outputs><port name="inpad">clk</port></outputs>
</block>
</block>
<block name="clb0" instance="clb[2]" mode="default">
<inputs><port name="I">a open</port></inputs>
<outputs><port name="O">out[0]-&gt;clb_out</port></outputs>
<clocks><port name="clk">clk</port></clocks>
<block name="ble0" instance="ble[0]" mode="ble">
<inputs><port name="in">I[0]-&gt;crossbar open</port></inputs>
<outputs><port name="out">Q[0]-&gt;ff_out</port></outputs>
<clocks><port name="clk">clk[0]-&gt;clk_ic</port></clocks>
<block name="ffb" instance="ff[0]">
<inputs><port name="D">in[0]-&gt;bypass_d</port></inputs>
<outputs><port name="Q">y</port></outputs>
<clocks><port name="clk">clk[0]-&gt;clk_dir</port></clocks>
</block>
</block>
</block>
<block name="out:y" instance="io[3]" mode="outpad">
<inputs><port name="outpad">y</port></inputs>
<block name="out:y" instance="outpad[0]">
<inputs><port name="outpad">outpad[0]-&gt;outpad</port></inputs>
</block>
</block>
</block>"#;

/// Atoms of the constant-generator design: a zero-input LUT `vcc_gen`
/// driving net `vcc` into outpad `out:v`.
pub fn constgen_atoms() -> AtomNetlist {
    let mut nl = AtomNetlist::new("constgen");
    let output = nl.models().find(MODEL_OUTPUT).unwrap();
    let names = nl.models().find(MODEL_NAMES).unwrap();

    let gen = nl
        .add_block(
            "vcc_gen",
            AtomBlockType::Combinational,
            names,
            Some(TruthTable::from_rows(vec![vec![True]])),
        )
        .unwrap();
    let gen_out = nl.add_port(gen, "out", PortDirection::Output, 1);
    let v = nl
        .add_block("out:v", AtomBlockType::Outpad, output, None)
        .unwrap();
    let v_in = nl.add_port(v, "outpad", PortDirection::Input, 1);

    nl.add_net("vcc", nl.port_pins(gen_out)[0], &[nl.port_pins(v_in)[0]])
        .unwrap();
    nl
}

/// The packed netlist of the constant-generator design.
pub const CONSTGEN_NET: &str = r#"<block name="constgen" instance="FPGA_packed_netlist[0]">
<inputs></inputs>
<outputs>v</outputs>
<clocks></clocks>
<block name="clb0" instance="clb[0]" mode="default">
<inputs><port name="I">open open</port></inputs>
<outputs><port name="O">out[0]-&gt;clb_out</port></outputs>
<clocks><port name="clk">open</port></clocks>
<block name="ble0" instance="ble[0]" mode="ble">
<inputs><port name="in">open open</port></inputs>
<outputs><port name="out">out[0]-&gt;lut_bypass</port></outputs>
<clocks><port name="clk">open</port></clocks>
<block name="vcc_gen" instance="lut[0]">
<inputs><port name="in">open open</port></inputs>
<outputs><port name="out">vcc</port></outputs>
</block>
</block>
</block>
<block name="out:v" instance="io[1]" mode="outpad">
<inputs><port name="outpad">vcc</port></inputs>
<block name="out:v" instance="outpad[0]">
<inputs><port name="outpad">outpad[0]-&gt;outpad</port></inputs>
</block>
</block>
</block>"#;
