//! Error taxonomy of the packed-netlist loader.
//!
//! Every error is fatal and propagates to the top of the pipeline; there is
//! no local recovery. Errors that originate at a document position carry the
//! file name and 1-based line number.

/// Errors raised while loading and cross-checking a packed netlist.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// The document violates the packed-netlist schema (bad XML, missing
    /// attribute, wrong root element or instance literal).
    #[error("{file}:{line}: {message}")]
    Schema {
        /// Source file name.
        file: String,
        /// 1-based line number.
        line: u32,
        /// One-line explanation.
        message: String,
    },

    /// A name in the document does not resolve: an atom block, net, pb type,
    /// mode, port, pin, or interconnect.
    #[error("{file}:{line}: unknown {kind} '{name}'")]
    UnknownEntity {
        /// Source file name.
        file: String,
        /// 1-based line number.
        line: u32,
        /// What kind of entity failed to resolve.
        kind: &'static str,
        /// The unresolved name.
        name: String,
    },

    /// A count or index disagrees with the architecture: wrong number of
    /// pins for a port, an instance slot out of range, or a slot occupied
    /// twice.
    #[error("{file}:{line}: {message}")]
    ShapeMismatch {
        /// Source file name.
        file: String,
        /// 1-based line number.
        line: u32,
        /// One-line explanation.
        message: String,
    },

    /// A whole-netlist cross-check failed after ingest: global/non-global
    /// mixing, a missing or duplicated driver, an unbound atom, or a
    /// constant-generator output whose driver is not marked constant.
    #[error("{file}: {message}")]
    Consistency {
        /// Source file name.
        file: String,
        /// One-line explanation.
        message: String,
    },

    /// The document could not be read.
    #[error("failed to read packed netlist: {0}")]
    Io(#[from] std::io::Error),
}

impl PackError {
    /// Creates a schema error.
    pub fn schema(file: &str, line: u32, message: impl Into<String>) -> Self {
        Self::Schema {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }

    /// Creates an unknown-entity error.
    pub fn unknown(file: &str, line: u32, kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownEntity {
            file: file.to_string(),
            line,
            kind,
            name: name.into(),
        }
    }

    /// Creates a shape-mismatch error.
    pub fn shape(file: &str, line: u32, message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }

    /// Creates a consistency error.
    pub fn consistency(file: &str, message: impl Into<String>) -> Self {
        Self::Consistency {
            file: file.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_display() {
        let err = PackError::schema("design.net", 12, "root element must be <block>");
        assert_eq!(
            format!("{err}"),
            "design.net:12: root element must be <block>"
        );
    }

    #[test]
    fn unknown_display() {
        let err = PackError::unknown("design.net", 3, "atom block", "lut_9");
        assert_eq!(format!("{err}"), "design.net:3: unknown atom block 'lut_9'");
    }

    #[test]
    fn consistency_display() {
        let err = PackError::consistency("design.net", "net 'clk' mixes global and non-global pins");
        assert_eq!(
            format!("{err}"),
            "design.net: net 'clk' mixes global and non-global pins"
        );
    }
}
