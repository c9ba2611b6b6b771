//! Opaque ID newtypes for the architectural pin graph.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a node in a cluster's pin graph.
    PbNodeId
);

define_id!(
    /// Opaque, copyable ID for a pin in a cluster's pin graph.
    ///
    /// The raw value is the pin's `pin_count_in_cluster` flat index, which
    /// also indexes the per-cluster `pb_route` table downstream.
    PbPinId
);

impl PbPinId {
    /// Returns the flat pin-count-in-cluster index.
    pub fn index(self) -> usize {
        self.as_raw() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let id = PbNodeId::from_raw(5);
        assert_eq!(id.as_raw(), 5);
    }

    #[test]
    fn pin_index_is_raw() {
        let pin = PbPinId::from_raw(17);
        assert_eq!(pin.index(), 17);
    }

    #[test]
    fn serde_roundtrip() {
        let id = PbPinId::from_raw(9);
        let json = serde_json::to_string(&id).unwrap();
        let back: PbPinId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
