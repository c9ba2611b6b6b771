//! Four-state logic values as used by gate-level truth tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single logic value in a truth-table cell or latch initial state.
///
/// The four states represent:
/// - `False` — logic low (0)
/// - `True` — logic high (1)
/// - `DontCare` — either value (the `-` of the gate-level format)
/// - `Unknown` — uninitialized / unspecified
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum LogicValue {
    /// Logic low (0).
    False = 0,
    /// Logic high (1).
    True = 1,
    /// Either value (`-` in the textual format).
    DontCare = 2,
    /// Uninitialized or unspecified.
    Unknown = 3,
}

impl LogicValue {
    /// Converts a gate-level character to a [`LogicValue`].
    ///
    /// Accepts '0', '1', '-', and 'x'/'X'.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(LogicValue::False),
            '1' => Some(LogicValue::True),
            '-' => Some(LogicValue::DontCare),
            'x' | 'X' => Some(LogicValue::Unknown),
            _ => None,
        }
    }

    /// Returns the digit used for this value in a `.latch` initial state.
    ///
    /// The gate-level format encodes latch initial values as
    /// 0 (low), 1 (high), 2 (don't care), 3 (unknown).
    pub fn latch_init_code(self) -> u8 {
        match self {
            LogicValue::False => 0,
            LogicValue::True => 1,
            LogicValue::DontCare => 2,
            LogicValue::Unknown => 3,
        }
    }
}

impl fmt::Display for LogicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicValue::False => write!(f, "0"),
            LogicValue::True => write!(f, "1"),
            LogicValue::DontCare => write!(f, "-"),
            LogicValue::Unknown => write!(f, "x"),
        }
    }
}
