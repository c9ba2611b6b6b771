//! Error type for pin-expression resolution.

/// Errors raised while resolving a `port[idx]` / `port[idx]->interconnect`
/// expression against a pin graph.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArchError {
    /// The token is not of the form `port[idx]` or `port[idx]->interconnect`.
    #[error("malformed pin expression '{0}'")]
    MalformedPinExpr(String),

    /// No port of that name is visible in the resolution scope.
    #[error("unknown pin '{0}'")]
    UnknownPin(String),

    /// The bit index exceeds the port's declared width.
    #[error("pin index out of range in '{token}' (port width {width})")]
    PinIndexOutOfRange {
        /// The offending expression.
        token: String,
        /// The width of the port that was found.
        width: usize,
    },

    /// No outgoing edge of the resolved pin carries the named interconnect.
    #[error("unknown interconnect in '{0}'")]
    UnknownInterconnect(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_pin() {
        let err = ArchError::UnknownPin("q[0]->mux1".to_string());
        assert_eq!(format!("{err}"), "unknown pin 'q[0]->mux1'");
    }

    #[test]
    fn display_index_range() {
        let err = ArchError::PinIndexOutOfRange {
            token: "in[9]".to_string(),
            width: 4,
        };
        assert_eq!(
            format!("{err}"),
            "pin index out of range in 'in[9]' (port width 4)"
        );
    }
}
