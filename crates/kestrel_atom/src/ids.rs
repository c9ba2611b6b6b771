//! Opaque ID newtypes for atom-netlist entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`. Every ID type carries a distinguished
//! [`INVALID`](AtomNetId::INVALID) sentinel; removed entities keep their IDs
//! (IDs are never reused), so a dangling reference is always detectable.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// The invalid sentinel, distinct from every allocated ID.
            pub const INVALID: $name = $name(u32::MAX);

            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns `true` unless this is the invalid sentinel.
            pub fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for an atom block (primitive cell).
    AtomBlockId
);

define_id!(
    /// Opaque, copyable ID for a port on an atom block.
    AtomPortId
);

define_id!(
    /// Opaque, copyable ID for a single pin (port bit) on an atom block.
    AtomPinId
);

define_id!(
    /// Opaque, copyable ID for an atom net.
    AtomNetId
);

define_id!(
    /// Opaque, copyable ID for an interned model in the [`ModelLibrary`](crate::model::ModelLibrary).
    ModelId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_roundtrip() {
        let id = AtomBlockId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
        assert!(id.is_valid());
    }

    #[test]
    fn invalid_sentinel() {
        assert!(!AtomNetId::INVALID.is_valid());
        assert!(!AtomPinId::INVALID.is_valid());
        assert_eq!(AtomNetId::default(), AtomNetId::INVALID);
    }

    #[test]
    fn id_equality() {
        let a = AtomNetId::from_raw(7);
        let b = AtomNetId::from_raw(7);
        let c = AtomNetId::from_raw(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(AtomPinId::from_raw(1));
        set.insert(AtomPinId::from_raw(2));
        set.insert(AtomPinId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = ModelId::from_raw(3);
        let json = serde_json::to_string(&id).unwrap();
        let back: ModelId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
