//! Whole-netlist invariant checking.
//!
//! [`AtomNetlist::verify`] walks every live entity and checks the structural
//! invariants the mutation surface promises to maintain. A violation is a bug
//! in the netlist core (or in a caller bypassing the public surface), so the
//! error type is [`InternalError`].

use crate::ids::AtomPinId;
use crate::netlist::AtomNetlist;
use crate::types::AtomBlockType;
use kestrel_common::{InternalError, KestrelResult, PinType, PortDirection};
use std::collections::HashSet;

impl AtomNetlist {
    /// Checks every structural invariant of the store.
    ///
    /// Verifies pin/net bidirectional consistency, driver/sink typing, name
    /// uniqueness and index agreement, port/pin ownership, and block-kind
    /// shape rules. Intended for tests and post-transformation assertions.
    pub fn verify(&self) -> KestrelResult<()> {
        self.verify_pin_net_consistency()?;
        self.verify_names()?;
        self.verify_ports()?;
        self.verify_block_shapes()?;
        Ok(())
    }

    fn verify_pin_net_consistency(&self) -> KestrelResult<()> {
        for pin in self.pins() {
            let net = self.pin_net(pin);
            if !net.is_valid() {
                continue;
            }
            if !self.net_is_live(net) {
                return Err(InternalError::new(format!(
                    "pin {} references tombstoned net '{}'",
                    pin.as_raw(),
                    self.net_name(net)
                )));
            }
            let on_net = match self.pin_type(pin) {
                PinType::Driver => self.net_driver(net) == pin,
                PinType::Sink => self.net_sinks(net).contains(&pin),
            };
            if !on_net {
                return Err(InternalError::new(format!(
                    "pin {} claims net '{}' but the net does not list it",
                    pin.as_raw(),
                    self.net_name(net)
                )));
            }
        }
        for net in self.nets() {
            let driver = self.net_driver(net);
            if driver.is_valid() {
                self.check_net_member(net, driver, PinType::Driver)?;
            }
            let mut seen: HashSet<AtomPinId> = HashSet::new();
            for &sink in self.net_sinks(net) {
                self.check_net_member(net, sink, PinType::Sink)?;
                if !seen.insert(sink) {
                    return Err(InternalError::new(format!(
                        "net '{}' lists sink pin {} twice",
                        self.net_name(net),
                        sink.as_raw()
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_net_member(
        &self,
        net: crate::ids::AtomNetId,
        pin: AtomPinId,
        expected: PinType,
    ) -> KestrelResult<()> {
        if !self.pin_is_live(pin) {
            return Err(InternalError::new(format!(
                "net '{}' lists tombstoned pin {}",
                self.net_name(net),
                pin.as_raw()
            )));
        }
        if self.pin_type(pin) != expected {
            return Err(InternalError::new(format!(
                "net '{}' lists pin {} in the wrong role",
                self.net_name(net),
                pin.as_raw()
            )));
        }
        if self.pin_net(pin) != net {
            return Err(InternalError::new(format!(
                "net '{}' lists pin {} but the pin is on another net",
                self.net_name(net),
                pin.as_raw()
            )));
        }
        Ok(())
    }

    fn verify_names(&self) -> KestrelResult<()> {
        let mut block_names = HashSet::new();
        for block in self.blocks() {
            let name = self.block_name(block);
            if !block_names.insert(name.to_string()) {
                return Err(InternalError::new(format!(
                    "duplicate live block name '{name}'"
                )));
            }
            if self.find_block(name) != Some(block) {
                return Err(InternalError::new(format!(
                    "block name index out of date for '{name}'"
                )));
            }
        }
        let mut net_names = HashSet::new();
        for net in self.nets() {
            let name = self.net_name(net);
            if !net_names.insert(name.to_string()) {
                return Err(InternalError::new(format!(
                    "duplicate live net name '{name}'"
                )));
            }
            if self.find_net(name) != Some(net) {
                return Err(InternalError::new(format!(
                    "net name index out of date for '{name}'"
                )));
            }
        }
        Ok(())
    }

    fn verify_ports(&self) -> KestrelResult<()> {
        for port in self.ports() {
            let block = self.port_block(port);
            if !self.block_is_live(block) {
                return Err(InternalError::new(format!(
                    "live port '{}' on tombstoned block",
                    self.port_name(port)
                )));
            }
            for (i, &pin) in self.port_pins(port).iter().enumerate() {
                if !self.pin_is_live(pin) {
                    return Err(InternalError::new(format!(
                        "live port '{}' holds tombstoned pin {}",
                        self.port_name(port),
                        pin.as_raw()
                    )));
                }
                if self.pin_port(pin) != port || self.pin_bit(pin) != i as u32 {
                    return Err(InternalError::new(format!(
                        "pin {} disagrees with port '{}' about its position",
                        pin.as_raw(),
                        self.port_name(port)
                    )));
                }
            }
        }
        Ok(())
    }

    fn verify_block_shapes(&self) -> KestrelResult<()> {
        for block in self.blocks() {
            let name = self.block_name(block);
            match self.block_type(block) {
                AtomBlockType::Inpad => {
                    let sinks = self
                        .block_pins_with_direction(block, PortDirection::Input)
                        .count()
                        + self
                            .block_pins_with_direction(block, PortDirection::Clock)
                            .count();
                    if sinks != 0 {
                        return Err(InternalError::new(format!(
                            "inpad '{name}' has input or clock pins"
                        )));
                    }
                }
                AtomBlockType::Outpad => {
                    let inputs = self
                        .block_pins_with_direction(block, PortDirection::Input)
                        .count();
                    let outputs = self
                        .block_pins_with_direction(block, PortDirection::Output)
                        .count();
                    if inputs != 1 || outputs != 0 {
                        return Err(InternalError::new(format!(
                            "outpad '{name}' must have exactly one input pin and no outputs"
                        )));
                    }
                }
                AtomBlockType::Combinational => {
                    let clocks = self
                        .block_pins_with_direction(block, PortDirection::Clock)
                        .count();
                    if clocks != 0 {
                        return Err(InternalError::new(format!(
                            "combinational block '{name}' has clock pins"
                        )));
                    }
                }
                AtomBlockType::Sequential => {}
            }
        }
        Ok(())
    }
}
