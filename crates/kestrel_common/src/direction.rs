//! Port and pin direction enums shared across the netlist and architecture
//! crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The direction of a port on a block or pb type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PortDirection {
    /// Data input.
    Input,
    /// Data output.
    Output,
    /// Clock input.
    Clock,
}

impl PortDirection {
    /// Returns `true` for `Input` and `Clock` (directions whose pins sink a
    /// net).
    pub fn is_sink(self) -> bool {
        matches!(self, PortDirection::Input | PortDirection::Clock)
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
            PortDirection::Clock => write!(f, "clock"),
        }
    }
}

/// Whether a pin drives its net or sinks it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PinType {
    /// The pin sources the net (output pins).
    Driver,
    /// The pin consumes the net (input and clock pins).
    Sink,
}

impl PinType {
    /// Returns the pin type implied by a port direction.
    pub fn from_direction(dir: PortDirection) -> Self {
        if dir.is_sink() {
            PinType::Sink
        } else {
            PinType::Driver
        }
    }
}
