//! Error types for the pqbin codecs.

use alloc::string::String;
use core::fmt;

/// Result type alias for pqbin operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for encoding, decoding and streaming operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input ended before a complete value could be read.
    Truncated {
        context: &'static str,
        needed: usize,
        available: usize,
    },
    /// Text input is not a valid literal of the type.
    InvalidSyntax {
        type_name: &'static str,
        input: String,
    },
    /// Wire bytes violate a format invariant.
    InvalidBinary {
        type_name: &'static str,
        message: String,
    },
    /// Value does not fit the target representation.
    OutOfRange {
        type_name: &'static str,
        message: String,
    },
    /// Growing a buffer failed.
    OutOfMemory {
        requested: usize,
    },
    /// Parameter buffer no longer accepts values.
    BufferFinalized,
    /// Copy stream trailer was already sent.
    StreamFinished,
    /// The bulk-load transport reported a failure.
    Transport {
        message: String,
    },
    /// Invalid operation.
    InvalidOperation {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Truncated {
                context,
                needed,
                available,
            } => {
                write!(
                    f,
                    "Truncated {}: need {} bytes, {} available",
                    context, needed, available
                )
            }
            Error::InvalidSyntax { type_name, input } => {
                write!(f, "Invalid input syntax for type {}: \"{}\"", type_name, input)
            }
            Error::InvalidBinary { type_name, message } => {
                write!(f, "Invalid external \"{}\" value: {}", type_name, message)
            }
            Error::OutOfRange { type_name, message } => {
                write!(f, "Value out of range for type {}: {}", type_name, message)
            }
            Error::OutOfMemory { requested } => {
                write!(f, "Out of memory: failed to reserve {} bytes", requested)
            }
            Error::BufferFinalized => {
                write!(f, "Parameter buffer is finalized")
            }
            Error::StreamFinished => {
                write!(f, "Copy stream already finished")
            }
            Error::Transport { message } => {
                write!(f, "Transport failure: {}", message)
            }
            Error::InvalidOperation { message } => {
                write!(f, "Invalid operation: {}", message)
            }
        }
    }
}

impl Error {
    /// Creates a truncated input error.
    pub fn truncated(context: &'static str, needed: usize, available: usize) -> Self {
        Error::Truncated {
            context,
            needed,
            available,
        }
    }

    /// Creates an invalid text syntax error.
    pub fn invalid_syntax(type_name: &'static str, input: impl Into<String>) -> Self {
        Error::InvalidSyntax {
            type_name,
            input: input.into(),
        }
    }

    /// Creates a malformed wire value error.
    pub fn invalid_binary(type_name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidBinary {
            type_name,
            message: message.into(),
        }
    }

    /// Creates a value out of range error.
    pub fn out_of_range(type_name: &'static str, message: impl Into<String>) -> Self {
        Error::OutOfRange {
            type_name,
            message: message.into(),
        }
    }

    /// Creates an out of memory error.
    pub fn out_of_memory(requested: usize) -> Self {
        Error::OutOfMemory { requested }
    }

    /// Creates a transport failure error.
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns true if the error was caused by malformed input bytes or text.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Error::Truncated { .. } | Error::InvalidSyntax { .. } | Error::InvalidBinary { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        let err = Error::truncated("numeric header", 8, 3);
        assert!(err.to_string().contains("numeric header"));
        assert!(err.to_string().contains("8"));

        let err = Error::invalid_syntax("numeric", "1.2.3");
        assert!(err.to_string().contains("\"1.2.3\""));

        let err = Error::StreamFinished;
        assert!(err.to_string().contains("finished"));
    }

    #[test]
    fn test_error_constructors() {
        let err = Error::invalid_binary("numeric", "invalid digit");
        match err {
            Error::InvalidBinary { type_name, message } => {
                assert_eq!(type_name, "numeric");
                assert_eq!(message, "invalid digit");
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_malformed_input_classification() {
        assert!(Error::truncated("int4", 4, 0).is_malformed_input());
        assert!(Error::invalid_binary("array", "bad ndim").is_malformed_input());
        assert!(!Error::out_of_memory(16).is_malformed_input());
        assert!(!Error::BufferFinalized.is_malformed_input());
    }
}
