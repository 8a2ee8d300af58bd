use owo_colors::OwoColorize;

use crate::{CallError, MessageDescriptor};

/// Errors that can occur when binding to a message type's entry points.
///
/// All variants are raised while a handle is being constructed, never on the
/// hot path — a type whose shape fails to bind once will keep failing, so
/// callers should treat these as fatal for that type rather than retry.
#[derive(Debug)]
#[non_exhaustive]
pub enum BindError {
    /// A required entry point could not be located on the given type: wrong
    /// name, wrong arity, not publicly accessible, or missing entirely.
    EntryPointNotFound {
        /// The descriptor the lookup ran against.
        descriptor: &'static MessageDescriptor,
        /// The entry-point name that was looked up.
        name: &'static str,
        /// The arity that was looked up.
        arity: usize,
    },

    /// The builder-construction entry point's declared return type is not
    /// builder-capable.
    NotABuilder {
        /// The message descriptor being bound.
        descriptor: &'static MessageDescriptor,
        /// The descriptor the entry point declares as its return type.
        returned: &'static MessageDescriptor,
    },

    /// The construction-time round trip produced a value that is not an
    /// instance of the expected type — a type-identity mismatch normal
    /// checking would not catch.
    IntegrityCheckFailed {
        /// The descriptor whose entry point produced the value.
        descriptor: &'static MessageDescriptor,
        /// The entry point that produced the value.
        entry_point: &'static str,
        /// Name of the type the value was expected to be.
        expected: &'static str,
    },

    /// A resolved entry point was invoked and the underlying generated code
    /// failed. The original failure is preserved as `source`.
    InvocationFailed {
        /// The descriptor the entry point belongs to.
        descriptor: &'static MessageDescriptor,
        /// The entry point that was invoked.
        entry_point: &'static str,
        /// The underlying failure.
        source: CallError,
    },
}

impl core::fmt::Display for BindError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BindError::EntryPointNotFound {
                descriptor,
                name,
                arity,
            } => {
                write!(
                    f,
                    "No public entry point '{}' with arity {} on {}",
                    name.yellow(),
                    arity,
                    descriptor.blue()
                )
            }
            BindError::NotABuilder {
                descriptor,
                returned,
            } => {
                write!(
                    f,
                    "'new_builder' on {} returns {}, which is not a builder",
                    descriptor.blue(),
                    returned.red()
                )
            }
            BindError::IntegrityCheckFailed {
                descriptor,
                entry_point,
                expected,
            } => {
                write!(
                    f,
                    "Integrity check failed: '{}' on {} did not produce a {}",
                    entry_point.yellow(),
                    descriptor.blue(),
                    expected.green()
                )
            }
            BindError::InvocationFailed {
                descriptor,
                entry_point,
                source,
            } => {
                write!(
                    f,
                    "Invoking '{}' on {} failed: {}",
                    entry_point.yellow(),
                    descriptor.blue(),
                    source.red()
                )
            }
        }
    }
}

impl core::error::Error for BindError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            BindError::InvocationFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
