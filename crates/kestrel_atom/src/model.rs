//! Interned primitive models.
//!
//! A model describes the port interface of a class of primitives (the
//! `.names` LUT, the `.latch` element, the I/O pads, and any black-box
//! subcircuit). Models are immutable once interned and shared by every block
//! instantiating them; blocks hold a [`ModelId`] handle, never a back
//! reference.

use crate::ids::ModelId;
use kestrel_common::PortDirection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Model name of the generic LUT primitive.
pub const MODEL_NAMES: &str = ".names";
/// Model name of the latch primitive.
pub const MODEL_LATCH: &str = ".latch";
/// Model name of the primary-input pad.
pub const MODEL_INPUT: &str = ".input";
/// Model name of the primary-output pad.
pub const MODEL_OUTPUT: &str = ".output";

/// A port on a model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPort {
    /// Port name.
    pub name: String,
    /// Port direction.
    pub direction: PortDirection,
    /// Declared width. The `.names` model is instantiated with a per-block
    /// input width; its declared width is nominal.
    pub width: u32,
}

impl ModelPort {
    /// Creates a model port.
    pub fn new(name: impl Into<String>, direction: PortDirection, width: u32) -> Self {
        Self {
            name: name.into(),
            direction,
            width,
        }
    }
}

/// An immutable primitive model: a name and a port interface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Model name (e.g., `.names`, `.latch`, `adder`).
    pub name: String,
    /// Ports of the model, in declaration order.
    pub ports: Vec<ModelPort>,
}

impl Model {
    /// Creates a model from its name and ports.
    pub fn new(name: impl Into<String>, ports: Vec<ModelPort>) -> Self {
        Self {
            name: name.into(),
            ports,
        }
    }

    /// Returns the port with the given name, if any.
    pub fn find_port(&self, name: &str) -> Option<&ModelPort> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Iterates over the input and clock ports.
    pub fn input_ports(&self) -> impl Iterator<Item = &ModelPort> {
        self.ports.iter().filter(|p| p.direction.is_sink())
    }

    /// Iterates over the output ports.
    pub fn output_ports(&self) -> impl Iterator<Item = &ModelPort> {
        self.ports
            .iter()
            .filter(|p| p.direction == PortDirection::Output)
    }

    /// Returns `true` for the four built-in models (their names start with a
    /// dot).
    pub fn is_builtin(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// The interning store for models.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelLibrary {
    models: Vec<Model>,
    #[serde(skip)]
    by_name: HashMap<String, ModelId>,
}

impl ModelLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a library pre-populated with the four built-in models.
    pub fn with_builtins() -> Self {
        let mut lib = Self::new();
        lib.intern(Model::new(
            MODEL_INPUT,
            vec![ModelPort::new("inpad", PortDirection::Output, 1)],
        ));
        lib.intern(Model::new(
            MODEL_OUTPUT,
            vec![ModelPort::new("outpad", PortDirection::Input, 1)],
        ));
        lib.intern(Model::new(
            MODEL_NAMES,
            vec![
                ModelPort::new("in", PortDirection::Input, 1),
                ModelPort::new("out", PortDirection::Output, 1),
            ],
        ));
        lib.intern(Model::new(
            MODEL_LATCH,
            vec![
                ModelPort::new("D", PortDirection::Input, 1),
                ModelPort::new("clk", PortDirection::Clock, 1),
                ModelPort::new("Q", PortDirection::Output, 1),
            ],
        ));
        lib
    }

    /// Interns a model, returning the existing ID if a model of the same name
    /// is already present.
    pub fn intern(&mut self, model: Model) -> ModelId {
        if let Some(&id) = self.by_name.get(&model.name) {
            return id;
        }
        let id = ModelId::from_raw(self.models.len() as u32);
        self.by_name.insert(model.name.clone(), id);
        self.models.push(model);
        id
    }

    /// Returns the model with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get(&self, id: ModelId) -> &Model {
        &self.models[id.as_raw() as usize]
    }

    /// Returns the ID of the model with the given name, if interned.
    pub fn find(&self, name: &str) -> Option<ModelId> {
        self.by_name.get(name).copied()
    }

    /// Returns the number of interned models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if no models are interned.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Iterates over `(ID, &Model)` pairs in interning order.
    pub fn iter(&self) -> impl Iterator<Item = (ModelId, &Model)> {
        self.models
            .iter()
            .enumerate()
            .map(|(i, m)| (ModelId::from_raw(i as u32), m))
    }

    /// Rebuilds the name index after deserialization.
    pub fn rebuild_index(&mut self) {
        self.by_name.clear();
        for (i, m) in self.models.iter().enumerate() {
            self.by_name
                .insert(m.name.clone(), ModelId::from_raw(i as u32));
        }
    }
}
