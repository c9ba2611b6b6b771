//! Error type for atom-netlist construction.

/// Errors raised by the atom-netlist mutation surface.
///
/// These indicate a caller bug (the gate-level ingestor feeding the store is
/// expected to have resolved duplicates already), so there is no recovery
/// path; the pipeline aborts.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NetlistError {
    /// A block with this name is already live.
    #[error("a block named '{0}' already exists")]
    DuplicateBlockName(String),

    /// A net with this name is already live.
    #[error("a net named '{0}' already exists")]
    DuplicateNetName(String),
}
