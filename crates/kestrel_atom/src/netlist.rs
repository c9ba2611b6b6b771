//! The atom netlist store.
//!
//! An ID-keyed relational store of blocks, ports, pins, and nets backed by
//! parallel arrays, with name indices for blocks and nets. Cross-references
//! are ID-valued in both directions (pin → net and net → pins), and every
//! mutator keeps the two sides synchronized. Removal tombstones the entry in
//! place; IDs are never reused, so a stale reference held by a caller is
//! detectable rather than silently rebound.

use crate::error::NetlistError;
use crate::ids::{AtomBlockId, AtomNetId, AtomPinId, AtomPortId, ModelId};
use crate::model::ModelLibrary;
use crate::types::AtomBlockType;
use kestrel_common::{PinType, PortDirection, TruthTable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct BlockData {
    name: String,
    block_type: AtomBlockType,
    model: ModelId,
    truth_table: Option<TruthTable>,
    ports: Vec<AtomPortId>,
    valid: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PortData {
    name: String,
    block: AtomBlockId,
    direction: PortDirection,
    pins: Vec<AtomPinId>,
    valid: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PinData {
    port: AtomPortId,
    bit: u32,
    pin_type: PinType,
    net: AtomNetId,
    is_constant: bool,
    valid: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct NetData {
    name: String,
    driver: AtomPinId,
    sinks: Vec<AtomPinId>,
    is_constant: bool,
    is_global: bool,
    valid: bool,
}

/// The atom-level netlist: primitive blocks and their connectivity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AtomNetlist {
    name: String,
    blocks: Vec<BlockData>,
    ports: Vec<PortData>,
    pins: Vec<PinData>,
    nets: Vec<NetData>,
    models: ModelLibrary,
    #[serde(skip)]
    block_by_name: HashMap<String, AtomBlockId>,
    #[serde(skip)]
    net_by_name: HashMap<String, AtomNetId>,
}

impl AtomNetlist {
    /// Creates an empty netlist with the given top-level name and the
    /// built-in models interned.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
            ports: Vec::new(),
            pins: Vec::new(),
            nets: Vec::new(),
            models: ModelLibrary::with_builtins(),
            block_by_name: HashMap::new(),
            net_by_name: HashMap::new(),
        }
    }

    /// Returns the top-level netlist name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the model library.
    pub fn models(&self) -> &ModelLibrary {
        &self.models
    }

    /// Returns the model library for interning additional models.
    pub fn models_mut(&mut self) -> &mut ModelLibrary {
        &mut self.models
    }

    // --- construction ---

    /// Adds a block. Fails if a live block already carries the name.
    pub fn add_block(
        &mut self,
        name: impl Into<String>,
        block_type: AtomBlockType,
        model: ModelId,
        truth_table: Option<TruthTable>,
    ) -> Result<AtomBlockId, NetlistError> {
        let name = name.into();
        if self.block_by_name.contains_key(&name) {
            return Err(NetlistError::DuplicateBlockName(name));
        }
        let id = AtomBlockId::from_raw(self.blocks.len() as u32);
        self.block_by_name.insert(name.clone(), id);
        self.blocks.push(BlockData {
            name,
            block_type,
            model,
            truth_table,
            ports: Vec::new(),
            valid: true,
        });
        Ok(id)
    }

    /// Adds a port of the given width to a block, creating one pin per bit.
    ///
    /// Pins of input and clock ports are sinks; pins of output ports are
    /// drivers. All pins start unconnected.
    ///
    /// # Panics
    ///
    /// Panics if the block already has a port with this name (a caller bug).
    pub fn add_port(
        &mut self,
        block: AtomBlockId,
        name: impl Into<String>,
        direction: PortDirection,
        width: u32,
    ) -> AtomPortId {
        let name = name.into();
        assert!(
            self.find_port(block, &name).is_none(),
            "block '{}' already has a port named '{}'",
            self.blocks[block.as_raw() as usize].name,
            name
        );
        let id = AtomPortId::from_raw(self.ports.len() as u32);
        let pin_type = PinType::from_direction(direction);
        let mut pins = Vec::with_capacity(width as usize);
        for bit in 0..width {
            let pin = AtomPinId::from_raw(self.pins.len() as u32);
            self.pins.push(PinData {
                port: id,
                bit,
                pin_type,
                net: AtomNetId::INVALID,
                is_constant: false,
                valid: true,
            });
            pins.push(pin);
        }
        self.ports.push(PortData {
            name,
            block,
            direction,
            pins,
            valid: true,
        });
        self.blocks[block.as_raw() as usize].ports.push(id);
        id
    }

    /// Adds a net with the given driver and sinks. Fails if a live net
    /// already carries the name.
    ///
    /// Every supplied pin is detached from whatever net it was on and rebound
    /// to the new net, keeping pin/net cross-references consistent. The
    /// driver may be [`AtomPinId::INVALID`] while rewiring.
    ///
    /// # Panics
    ///
    /// Panics if the driver is not a driver-typed pin or a sink is not a
    /// sink-typed pin.
    pub fn add_net(
        &mut self,
        name: impl Into<String>,
        driver: AtomPinId,
        sinks: &[AtomPinId],
    ) -> Result<AtomNetId, NetlistError> {
        let name = name.into();
        if self.net_by_name.contains_key(&name) {
            return Err(NetlistError::DuplicateNetName(name));
        }
        let id = AtomNetId::from_raw(self.nets.len() as u32);
        if driver.is_valid() {
            assert_eq!(
                self.pins[driver.as_raw() as usize].pin_type,
                PinType::Driver,
                "net driver must be a driver pin"
            );
            self.detach_pin(driver);
            self.pins[driver.as_raw() as usize].net = id;
        }
        for &sink in sinks {
            assert_eq!(
                self.pins[sink.as_raw() as usize].pin_type,
                PinType::Sink,
                "net sink must be a sink pin"
            );
            self.detach_pin(sink);
            self.pins[sink.as_raw() as usize].net = id;
        }
        self.net_by_name.insert(name.clone(), id);
        self.nets.push(NetData {
            name,
            driver,
            sinks: sinks.to_vec(),
            is_constant: false,
            is_global: false,
            valid: true,
        });
        Ok(id)
    }

    // --- removal ---

    /// Removes a block, its ports, and its pins.
    ///
    /// Each pin is detached from its net (the sink list compacted, or the
    /// driver cleared to the invalid sentinel). Nets left dangling are NOT
    /// removed; the sweep passes handle those.
    pub fn remove_block(&mut self, id: AtomBlockId) {
        let idx = id.as_raw() as usize;
        if !self.blocks[idx].valid {
            return;
        }
        let ports = self.blocks[idx].ports.clone();
        for port in ports {
            let pins = self.ports[port.as_raw() as usize].pins.clone();
            for pin in pins {
                self.detach_pin(pin);
                self.pins[pin.as_raw() as usize].valid = false;
            }
            self.ports[port.as_raw() as usize].valid = false;
        }
        self.block_by_name.remove(&self.blocks[idx].name);
        self.blocks[idx].valid = false;
    }

    /// Removes a net, clearing the net reference of every pin that was on it.
    pub fn remove_net(&mut self, id: AtomNetId) {
        let idx = id.as_raw() as usize;
        if !self.nets[idx].valid {
            return;
        }
        let driver = self.nets[idx].driver;
        if driver.is_valid() {
            self.pins[driver.as_raw() as usize].net = AtomNetId::INVALID;
        }
        let sinks = std::mem::take(&mut self.nets[idx].sinks);
        for sink in &sinks {
            self.pins[sink.as_raw() as usize].net = AtomNetId::INVALID;
        }
        self.nets[idx].sinks = sinks;
        self.net_by_name.remove(&self.nets[idx].name);
        self.nets[idx].valid = false;
    }

    /// Detaches a pin from its current net, if any. The net side is
    /// compacted: a driver slot is cleared, a sink entry removed.
    fn detach_pin(&mut self, pin: AtomPinId) {
        let net = self.pins[pin.as_raw() as usize].net;
        if !net.is_valid() {
            return;
        }
        let net_data = &mut self.nets[net.as_raw() as usize];
        if net_data.driver == pin {
            net_data.driver = AtomPinId::INVALID;
        } else {
            net_data.sinks.retain(|&s| s != pin);
        }
        self.pins[pin.as_raw() as usize].net = AtomNetId::INVALID;
    }

    // --- liveness ---

    /// Returns `true` if the block ID refers to a live block.
    pub fn block_is_live(&self, id: AtomBlockId) -> bool {
        id.is_valid() && self.blocks[id.as_raw() as usize].valid
    }

    /// Returns `true` if the port ID refers to a live port.
    pub fn port_is_live(&self, id: AtomPortId) -> bool {
        id.is_valid() && self.ports[id.as_raw() as usize].valid
    }

    /// Returns `true` if the pin ID refers to a live pin.
    pub fn pin_is_live(&self, id: AtomPinId) -> bool {
        id.is_valid() && self.pins[id.as_raw() as usize].valid
    }

    /// Returns `true` if the net ID refers to a live net.
    pub fn net_is_live(&self, id: AtomNetId) -> bool {
        id.is_valid() && self.nets[id.as_raw() as usize].valid
    }

    // --- name lookups ---

    /// Returns the live block with the given name, if any.
    pub fn find_block(&self, name: &str) -> Option<AtomBlockId> {
        self.block_by_name.get(name).copied()
    }

    /// Returns the live net with the given name, if any.
    pub fn find_net(&self, name: &str) -> Option<AtomNetId> {
        self.net_by_name.get(name).copied()
    }

    /// Returns the port of the given block with the given name, if any.
    pub fn find_port(&self, block: AtomBlockId, name: &str) -> Option<AtomPortId> {
        self.blocks[block.as_raw() as usize]
            .ports
            .iter()
            .copied()
            .find(|&p| self.ports[p.as_raw() as usize].name == name)
    }

    // --- block queries ---

    /// Returns the block's name.
    pub fn block_name(&self, id: AtomBlockId) -> &str {
        &self.blocks[id.as_raw() as usize].name
    }

    /// Returns the block's kind.
    pub fn block_type(&self, id: AtomBlockId) -> AtomBlockType {
        self.blocks[id.as_raw() as usize].block_type
    }

    /// Returns the block's model handle.
    pub fn block_model(&self, id: AtomBlockId) -> ModelId {
        self.blocks[id.as_raw() as usize].model
    }

    /// Returns the block's truth table, if it carries one.
    pub fn block_truth_table(&self, id: AtomBlockId) -> Option<&TruthTable> {
        self.blocks[id.as_raw() as usize].truth_table.as_ref()
    }

    /// Returns the block's ports in declaration order.
    pub fn block_ports(&self, id: AtomBlockId) -> &[AtomPortId] {
        &self.blocks[id.as_raw() as usize].ports
    }

    /// Iterates over all pins of a block, port by port.
    pub fn block_pins(&self, id: AtomBlockId) -> impl Iterator<Item = AtomPinId> + '_ {
        self.block_ports(id)
            .iter()
            .flat_map(move |&p| self.ports[p.as_raw() as usize].pins.iter().copied())
    }

    /// Iterates over the pins of a block's ports with the given direction.
    pub fn block_pins_with_direction(
        &self,
        id: AtomBlockId,
        direction: PortDirection,
    ) -> impl Iterator<Item = AtomPinId> + '_ {
        self.block_ports(id)
            .iter()
            .filter(move |&&p| self.ports[p.as_raw() as usize].direction == direction)
            .flat_map(move |&p| self.ports[p.as_raw() as usize].pins.iter().copied())
    }

    // --- port queries ---

    /// Returns the port's name.
    pub fn port_name(&self, id: AtomPortId) -> &str {
        &self.ports[id.as_raw() as usize].name
    }

    /// Returns the block owning the port.
    pub fn port_block(&self, id: AtomPortId) -> AtomBlockId {
        self.ports[id.as_raw() as usize].block
    }

    /// Returns the port's direction.
    pub fn port_direction(&self, id: AtomPortId) -> PortDirection {
        self.ports[id.as_raw() as usize].direction
    }

    /// Returns the port's pins, one per bit.
    pub fn port_pins(&self, id: AtomPortId) -> &[AtomPinId] {
        &self.ports[id.as_raw() as usize].pins
    }

    /// Returns the port's width (its number of pins).
    pub fn port_width(&self, id: AtomPortId) -> u32 {
        self.ports[id.as_raw() as usize].pins.len() as u32
    }

    // --- pin queries ---

    /// Returns the port owning the pin.
    pub fn pin_port(&self, id: AtomPinId) -> AtomPortId {
        self.pins[id.as_raw() as usize].port
    }

    /// Returns the block owning the pin.
    pub fn pin_block(&self, id: AtomPinId) -> AtomBlockId {
        self.port_block(self.pin_port(id))
    }

    /// Returns the pin's bit position within its port.
    pub fn pin_bit(&self, id: AtomPinId) -> u32 {
        self.pins[id.as_raw() as usize].bit
    }

    /// Returns whether the pin drives or sinks its net.
    pub fn pin_type(&self, id: AtomPinId) -> PinType {
        self.pins[id.as_raw() as usize].pin_type
    }

    /// Returns the net the pin is on, or the invalid sentinel if the pin is
    /// unconnected or tombstoned.
    pub fn pin_net(&self, id: AtomPinId) -> AtomNetId {
        let data = &self.pins[id.as_raw() as usize];
        if data.valid {
            data.net
        } else {
            AtomNetId::INVALID
        }
    }

    /// Returns whether the pin is flagged as a constant source.
    pub fn pin_is_constant(&self, id: AtomPinId) -> bool {
        self.pins[id.as_raw() as usize].is_constant
    }

    /// Flags or unflags the pin as a constant source.
    pub fn set_pin_is_constant(&mut self, id: AtomPinId, value: bool) {
        self.pins[id.as_raw() as usize].is_constant = value;
    }

    // --- net queries ---

    /// Returns the net's name.
    pub fn net_name(&self, id: AtomNetId) -> &str {
        &self.nets[id.as_raw() as usize].name
    }

    /// Returns the net's driver pin, or the invalid sentinel if the net has
    /// none (transiently during rewiring) or is tombstoned.
    pub fn net_driver(&self, id: AtomNetId) -> AtomPinId {
        let data = &self.nets[id.as_raw() as usize];
        if data.valid {
            data.driver
        } else {
            AtomPinId::INVALID
        }
    }

    /// Returns the block driving the net, or the invalid sentinel.
    pub fn net_driver_block(&self, id: AtomNetId) -> AtomBlockId {
        let driver = self.net_driver(id);
        if driver.is_valid() {
            self.pin_block(driver)
        } else {
            AtomBlockId::INVALID
        }
    }

    /// Returns the net's sink pins.
    pub fn net_sinks(&self, id: AtomNetId) -> &[AtomPinId] {
        let data = &self.nets[id.as_raw() as usize];
        if data.valid {
            &data.sinks
        } else {
            &[]
        }
    }

    /// Iterates over all pins of the net: the driver (if set) then the sinks.
    pub fn net_pins(&self, id: AtomNetId) -> impl Iterator<Item = AtomPinId> + '_ {
        let driver = self.net_driver(id);
        driver
            .is_valid()
            .then_some(driver)
            .into_iter()
            .chain(self.net_sinks(id).iter().copied())
    }

    /// Returns whether the net carries a constant value.
    pub fn net_is_constant(&self, id: AtomNetId) -> bool {
        self.nets[id.as_raw() as usize].is_constant
    }

    /// Flags or unflags the net as constant.
    pub fn set_net_is_constant(&mut self, id: AtomNetId, value: bool) {
        self.nets[id.as_raw() as usize].is_constant = value;
    }

    /// Returns whether the net is a global signal (e.g., a clock).
    pub fn net_is_global(&self, id: AtomNetId) -> bool {
        self.nets[id.as_raw() as usize].is_global
    }

    /// Flags or unflags the net as global.
    pub fn set_net_is_global(&mut self, id: AtomNetId, value: bool) {
        self.nets[id.as_raw() as usize].is_global = value;
    }

    // --- iteration ---

    /// Iterates over the IDs of all live blocks.
    pub fn blocks(&self) -> impl Iterator<Item = AtomBlockId> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.valid)
            .map(|(i, _)| AtomBlockId::from_raw(i as u32))
    }

    /// Iterates over the IDs of all live ports.
    pub fn ports(&self) -> impl Iterator<Item = AtomPortId> + '_ {
        self.ports
            .iter()
            .enumerate()
            .filter(|(_, p)| p.valid)
            .map(|(i, _)| AtomPortId::from_raw(i as u32))
    }

    /// Iterates over the IDs of all live pins.
    pub fn pins(&self) -> impl Iterator<Item = AtomPinId> + '_ {
        self.pins
            .iter()
            .enumerate()
            .filter(|(_, p)| p.valid)
            .map(|(i, _)| AtomPinId::from_raw(i as u32))
    }

    /// Iterates over the IDs of all live nets.
    pub fn nets(&self) -> impl Iterator<Item = AtomNetId> + '_ {
        self.nets
            .iter()
            .enumerate()
            .filter(|(_, n)| n.valid)
            .map(|(i, _)| AtomNetId::from_raw(i as u32))
    }

    /// Returns the number of live blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.valid).count()
    }

    /// Returns the number of live nets.
    pub fn net_count(&self) -> usize {
        self.nets.iter().filter(|n| n.valid).count()
    }

    /// Returns the number of live pins.
    pub fn pin_count(&self) -> usize {
        self.pins.iter().filter(|p| p.valid).count()
    }

    /// Rebuilds the name indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.block_by_name.clear();
        for (i, b) in self.blocks.iter().enumerate() {
            if b.valid {
                self.block_by_name
                    .insert(b.name.clone(), AtomBlockId::from_raw(i as u32));
            }
        }
        self.net_by_name.clear();
        for (i, n) in self.nets.iter().enumerate() {
            if n.valid {
                self.net_by_name
                    .insert(n.name.clone(), AtomNetId::from_raw(i as u32));
            }
        }
        self.models.rebuild_index();
    }
}
