//! Internal-error result type for the Kestrel netlist core.

/// The result type for operations whose only failure mode is a Kestrel bug.
///
/// User-input problems (malformed documents, unknown names, shape mismatches)
/// are reported through the loader error enums in `kestrel_pack` and
/// `kestrel_arch`; an `Err` here means an invariant of the netlist core was
/// broken.
pub type KestrelResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in the netlist core, not a problem with
/// user input.
#[derive(Debug, thiserror::Error)]
#[error("internal netlist error: {message}")]
pub struct InternalError {
    /// Description of the broken invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("net n3 lost its driver");
        assert_eq!(
            format!("{err}"),
            "internal netlist error: net n3 lost its driver"
        );
    }

    #[test]
    fn ok_path() {
        let r: KestrelResult<u32> = Ok(7);
        assert_eq!(r.ok(), Some(7));
    }

    #[test]
    fn from_string() {
        let err: InternalError = "boom".to_string().into();
        assert_eq!(err.message, "boom");
    }
}
