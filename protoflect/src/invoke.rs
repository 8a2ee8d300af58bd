//! The two invocation shapes needed by the constructors, plus the one place
//! where erased entry-point results get adapted to a concrete static type.
//! Every downcast in the crate funnels through [`adapt`], so a single review
//! of this module answers whether the adaptation is sound.

use core::any::{Any, type_name};

use crate::{BindError, Call, CallError, EntryPoint, MessageDescriptor};

/// Invokes a zero-argument entry point, returning the erased result.
pub(crate) fn call_nullary(
    descriptor: &'static MessageDescriptor,
    entry: &'static EntryPoint,
) -> Result<Box<dyn Any>, BindError> {
    let Call::Nullary(call) = entry.call else {
        return Err(BindError::InvocationFailed {
            descriptor,
            entry_point: entry.name,
            source: CallError::new("entry point is not zero-argument"),
        });
    };
    call().map_err(|source| BindError::InvocationFailed {
        descriptor,
        entry_point: entry.name,
        source,
    })
}

/// Invokes a single-argument entry point, returning the erased result.
pub(crate) fn call_unary(
    descriptor: &'static MessageDescriptor,
    entry: &'static EntryPoint,
    argument: Box<dyn Any>,
) -> Result<Box<dyn Any>, BindError> {
    let Call::Unary(call) = entry.call else {
        return Err(BindError::InvocationFailed {
            descriptor,
            entry_point: entry.name,
            source: CallError::new("entry point is not single-argument"),
        });
    };
    call(argument).map_err(|source| BindError::InvocationFailed {
        descriptor,
        entry_point: entry.name,
        source,
    })
}

/// Invokes a zero-argument entry point and adapts the result to `R`.
pub(crate) fn invoke_nullary<R: Any>(
    descriptor: &'static MessageDescriptor,
    entry: &'static EntryPoint,
) -> Result<Box<R>, BindError> {
    let raw = call_nullary(descriptor, entry)?;
    adapt(descriptor, entry, raw)
}

/// Invokes a single-argument entry point and adapts the result to `R`.
pub(crate) fn invoke_unary<R: Any>(
    descriptor: &'static MessageDescriptor,
    entry: &'static EntryPoint,
    argument: Box<dyn Any>,
) -> Result<Box<R>, BindError> {
    let raw = call_unary(descriptor, entry, argument)?;
    adapt(descriptor, entry, raw)
}

fn adapt<R: Any>(
    descriptor: &'static MessageDescriptor,
    entry: &'static EntryPoint,
    raw: Box<dyn Any>,
) -> Result<Box<R>, BindError> {
    raw.downcast::<R>()
        .map_err(|_| BindError::IntegrityCheckFailed {
            descriptor,
            entry_point: entry.name,
            expected: type_name::<R>(),
        })
}
