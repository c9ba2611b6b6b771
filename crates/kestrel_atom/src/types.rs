//! The atom block kind classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The functional kind of an atom block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AtomBlockType {
    /// A primary-input pad. Has no input or clock ports.
    Inpad,
    /// A primary-output pad. Has exactly one input pin and no outputs.
    Outpad,
    /// A combinational primitive (e.g., a LUT).
    Combinational,
    /// A sequential primitive (e.g., a latch or flip-flop).
    Sequential,
}

impl AtomBlockType {
    /// Returns `true` for the pad kinds.
    pub fn is_io(self) -> bool {
        matches!(self, AtomBlockType::Inpad | AtomBlockType::Outpad)
    }
}

impl fmt::Display for AtomBlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomBlockType::Inpad => write!(f, "inpad"),
            AtomBlockType::Outpad => write!(f, "outpad"),
            AtomBlockType::Combinational => write!(f, "combinational"),
            AtomBlockType::Sequential => write!(f, "sequential"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_kinds() {
        assert!(AtomBlockType::Inpad.is_io());
        assert!(AtomBlockType::Outpad.is_io());
        assert!(!AtomBlockType::Combinational.is_io());
        assert!(!AtomBlockType::Sequential.is_io());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", AtomBlockType::Inpad), "inpad");
        assert_eq!(format!("{}", AtomBlockType::Sequential), "sequential");
    }

    #[test]
    fn serde_roundtrip() {
        let t = AtomBlockType::Combinational;
        let json = serde_json::to_string(&t).unwrap();
        let back: AtomBlockType = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
