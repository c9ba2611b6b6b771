//! The gate-level text writer.

use kestrel_atom::{
    AtomBlockId, AtomBlockType, AtomNetId, AtomNetlist, AtomPinId, ModelId, MODEL_LATCH,
    MODEL_NAMES,
};
use kestrel_common::{LogicValue, PortDirection};
use std::io::{self, Write};

/// The fixed prefix carried by output-pad block names; stripped on emission.
pub const OUTPAD_NAME_PREFIX: &str = "out:";

/// Writes the netlist in the canonical gate-level textual form.
///
/// Emits `.model`/`.inputs`/`.outputs`, identity-buffer `.names` entries for
/// primary outputs whose driving net carries a different name, `.latch` and
/// `.names` entries for the built-in sequential and LUT models, `.subckt`
/// entries for every other model (unconnected pins become fresh `unconnK`
/// names), and finally black-box `.model` declarations for the subckt models
/// in first-use order.
pub fn write_blif<W: Write>(netlist: &AtomNetlist, writer: &mut W) -> io::Result<()> {
    BlifWriter {
        netlist,
        writer,
        unconn_counter: 0,
    }
    .write()
}

/// Renders the netlist to a string.
pub fn to_blif_string(netlist: &AtomNetlist) -> String {
    let mut buffer = Vec::new();
    write_blif(netlist, &mut buffer).expect("writing to a Vec cannot fail");
    String::from_utf8(buffer).expect("the writer emits UTF-8")
}

/// Strips the output-pad prefix from a pad name.
fn strip_outpad_prefix(name: &str) -> &str {
    name.strip_prefix(OUTPAD_NAME_PREFIX).unwrap_or(name)
}

struct BlifWriter<'a, W: Write> {
    netlist: &'a AtomNetlist,
    writer: &'a mut W,
    unconn_counter: usize,
}

impl<W: Write> BlifWriter<'_, W> {
    fn write(&mut self) -> io::Result<()> {
        writeln!(self.writer, ".model {}", self.netlist.name())?;
        self.write_io_lists()?;
        self.write_po_buffers()?;

        let mut subckt_models: Vec<ModelId> = Vec::new();
        for block in self.netlist.blocks() {
            if self.netlist.block_type(block).is_io() {
                continue;
            }
            let model = self.netlist.block_model(block);
            match self.netlist.models().get(model).name.as_str() {
                MODEL_LATCH => self.write_latch(block)?,
                MODEL_NAMES => self.write_names(block)?,
                _ => {
                    self.write_subckt(block)?;
                    if !subckt_models.contains(&model) {
                        subckt_models.push(model);
                    }
                }
            }
        }
        writeln!(self.writer, ".end")?;

        for model in subckt_models {
            self.write_blackbox_model(model)?;
        }
        Ok(())
    }

    fn write_io_lists(&mut self) -> io::Result<()> {
        write!(self.writer, ".inputs")?;
        for block in self.netlist.blocks() {
            if self.netlist.block_type(block) == AtomBlockType::Inpad {
                write!(self.writer, " {}", self.netlist.block_name(block))?;
            }
        }
        writeln!(self.writer)?;

        write!(self.writer, ".outputs")?;
        for block in self.netlist.blocks() {
            if self.netlist.block_type(block) == AtomBlockType::Outpad {
                write!(
                    self.writer,
                    " {}",
                    strip_outpad_prefix(self.netlist.block_name(block))
                )?;
            }
        }
        writeln!(self.writer)
    }

    /// The textual format requires a primary output's net to carry the
    /// output's name; where it does not, an identity LUT bridges the two.
    fn write_po_buffers(&mut self) -> io::Result<()> {
        for block in self.netlist.blocks() {
            if self.netlist.block_type(block) != AtomBlockType::Outpad {
                continue;
            }
            let output_name = strip_outpad_prefix(self.netlist.block_name(block)).to_string();
            for pin in self
                .netlist
                .block_pins_with_direction(block, PortDirection::Input)
            {
                let net = self.netlist.pin_net(pin);
                if net.is_valid() && self.netlist.net_name(net) != output_name {
                    writeln!(
                        self.writer,
                        ".names {} {output_name}",
                        self.netlist.net_name(net)
                    )?;
                    writeln!(self.writer, "1 1")?;
                }
            }
        }
        Ok(())
    }

    fn write_latch(&mut self, block: AtomBlockId) -> io::Result<()> {
        let d = self.pin_net_name(
            self.netlist
                .block_pins_with_direction(block, PortDirection::Input)
                .next(),
        );
        let q = self.pin_net_name(
            self.netlist
                .block_pins_with_direction(block, PortDirection::Output)
                .next(),
        );
        let clk = self.pin_net_name(
            self.netlist
                .block_pins_with_direction(block, PortDirection::Clock)
                .next(),
        );
        let init = self
            .netlist
            .block_truth_table(block)
            .and_then(|tt| tt.latch_init())
            .map_or(LogicValue::Unknown.latch_init_code(), |v| {
                v.latch_init_code()
            });
        writeln!(self.writer, ".latch {d} {q} re {clk} {init}")
    }

    fn write_names(&mut self, block: AtomBlockId) -> io::Result<()> {
        let mut line = String::from(".names");
        let inputs: Vec<_> = self
            .netlist
            .block_pins_with_direction(block, PortDirection::Input)
            .collect();
        for &pin in &inputs {
            line.push(' ');
            line.push_str(&self.pin_net_name(Some(pin)));
        }
        let output = self.pin_net_name(
            self.netlist
                .block_pins_with_direction(block, PortDirection::Output)
                .next(),
        );
        line.push(' ');
        line.push_str(&output);
        writeln!(self.writer, "{line}")?;

        if let Some(table) = self.netlist.block_truth_table(block) {
            for row in table.rows() {
                let (cells, output_value) = row.split_at(row.len() - 1);
                let mut text = String::new();
                for cell in cells {
                    text.push_str(&cell.to_string());
                }
                if !cells.is_empty() {
                    text.push(' ');
                }
                text.push_str(&output_value[0].to_string());
                writeln!(self.writer, "{text}")?;
            }
        }
        Ok(())
    }

    fn write_subckt(&mut self, block: AtomBlockId) -> io::Result<()> {
        let model = self.netlist.models().get(self.netlist.block_model(block));
        write!(self.writer, ".subckt {}", model.name)?;
        for &port in self.netlist.block_ports(block) {
            let width = self.netlist.port_width(port);
            for &pin in self.netlist.port_pins(port) {
                let net_name = self.pin_net_name(Some(pin));
                if width > 1 {
                    write!(
                        self.writer,
                        " {}[{}]={net_name}",
                        self.netlist.port_name(port),
                        self.netlist.pin_bit(pin)
                    )?;
                } else {
                    write!(self.writer, " {}={net_name}", self.netlist.port_name(port))?;
                }
            }
        }
        writeln!(self.writer)
    }

    fn write_blackbox_model(&mut self, model: ModelId) -> io::Result<()> {
        let model = self.netlist.models().get(model);
        writeln!(self.writer)?;
        writeln!(self.writer, ".model {}", model.name)?;
        write!(self.writer, ".inputs")?;
        for port in model.input_ports() {
            self.write_model_port_bits(&port.name, port.width)?;
        }
        writeln!(self.writer)?;
        write!(self.writer, ".outputs")?;
        for port in model.output_ports() {
            self.write_model_port_bits(&port.name, port.width)?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, ".blackbox")?;
        writeln!(self.writer, ".end")
    }

    fn write_model_port_bits(&mut self, name: &str, width: u32) -> io::Result<()> {
        if width > 1 {
            for bit in 0..width {
                write!(self.writer, " {name}[{bit}]")?;
            }
            Ok(())
        } else {
            write!(self.writer, " {name}")
        }
    }

    /// The net name a pin contributes to its entry, or a fresh `unconnK`
    /// placeholder for an unconnected pin.
    fn pin_net_name(&mut self, pin: Option<AtomPinId>) -> String {
        let net = pin.map_or(AtomNetId::INVALID, |p| self.netlist.pin_net(p));
        if net.is_valid() {
            self.netlist.net_name(net).to_string()
        } else {
            let name = format!("unconn{}", self.unconn_counter);
            self.unconn_counter += 1;
            name
        }
    }
}
