//! Opaque ID newtypes for clustered-netlist entities.

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
    /// Opaque, copyable ID for a clustered block (one placed cluster).
    ClusterBlockId
);

define_id!(
    /// Opaque, copyable ID for an inter-cluster net.
    ClusterNetId
);

define_id!(
    /// Opaque, copyable ID for a pb instance within one cluster.
    PbId
);
