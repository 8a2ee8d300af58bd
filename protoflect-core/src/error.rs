use core::fmt;
use std::io;

use crate::wire::WireType;

/// Boxed error type used where caller-supplied logic can fail with anything.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// An entry point was invoked and the underlying generated code failed.
///
/// The original failure, when there is one, is preserved as [`source`].
///
/// [`source`]: core::error::Error::source
#[derive(Debug)]
pub struct CallError {
    message: String,
    source: Option<BoxError>,
}

impl CallError {
    /// Creates a call error with a message and no underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a call error wrapping an underlying cause.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl core::error::Error for CallError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn core::error::Error + 'static))
    }
}

/// Errors that can occur while decoding wire bytes or merging JSON text.
#[derive(Debug)]
#[non_exhaustive]
pub enum DecodeError {
    /// Ran out of input before a value was complete.
    UnexpectedEof {
        /// How many more bytes were needed.
        expected: usize,
        /// How many bytes were left.
        remaining: usize,
    },

    /// A varint ran past ten bytes without terminating.
    VarintOverflow,

    /// A key carried a wire type this implementation does not know.
    UnknownWireType {
        /// The raw wire-type bits.
        value: u8,
    },

    /// A key carried field number zero, which the format reserves.
    InvalidFieldNumber {
        /// The raw field number.
        value: u64,
    },

    /// A known field arrived with the wrong wire type.
    WireTypeMismatch {
        /// The field number.
        field: u32,
        /// The wire type the schema declares.
        expected: WireType,
        /// The wire type that arrived.
        actual: WireType,
    },

    /// A string field held bytes that are not valid UTF-8.
    InvalidUtf8 {
        /// The field number.
        field: u32,
    },

    /// A length prefix does not fit in `usize`.
    LengthOverflow {
        /// The declared length.
        length: u64,
    },

    /// JSON text could not be merged into a builder.
    Json {
        /// What was wrong with the text.
        reason: String,
    },

    /// An underlying reader failed.
    Io {
        /// The I/O error.
        source: io::Error,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnexpectedEof {
                expected,
                remaining,
            } => {
                write!(
                    f,
                    "Unexpected end of input: needed {expected} more byte(s), {remaining} left"
                )
            }
            DecodeError::VarintOverflow => f.write_str("Varint exceeds ten bytes"),
            DecodeError::UnknownWireType { value } => {
                write!(f, "Unknown wire type {value}")
            }
            DecodeError::InvalidFieldNumber { value } => {
                write!(f, "Invalid field number {value}")
            }
            DecodeError::WireTypeMismatch {
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Field {field} expected wire type {expected:?}, got {actual:?}"
                )
            }
            DecodeError::InvalidUtf8 { field } => {
                write!(f, "Field {field} is not valid UTF-8")
            }
            DecodeError::LengthOverflow { length } => {
                write!(f, "Length prefix {length} does not fit in memory")
            }
            DecodeError::Json { reason } => write!(f, "JSON merge failed: {reason}"),
            DecodeError::Io { source } => write!(f, "I/O error: {source}"),
        }
    }
}

impl core::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            DecodeError::Io { source } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(source: io::Error) -> Self {
        DecodeError::Io { source }
    }
}
