use log::trace;

use crate::{BindError, Message, MessageDecoder, MessageDescriptor, Reflect, invoke};

/// Obtains the decoder bound to the type named by `descriptor`.
///
/// Locates the type's zero-argument `decoder` entry point, invokes it once
/// and adapts the result to [`MessageDecoder<T>`]. The decoder is stateless
/// and reusable; callers should retain it rather than re-run discovery.
///
/// Unlike [`builder_fn_of`], no self-test decode is attempted — there is no
/// universally safe "empty decode" to try.
///
/// [`builder_fn_of`]: crate::builder_fn_of
pub fn decoder_of<T: Message>(
    descriptor: &'static MessageDescriptor,
) -> Result<MessageDecoder<T>, BindError> {
    let entry = descriptor
        .entry_point("decoder", 0)
        .ok_or(BindError::EntryPointNotFound {
            descriptor,
            name: "decoder",
            arity: 0,
        })?;

    let decoder = invoke::invoke_nullary::<MessageDecoder<T>>(descriptor, entry)?;
    trace!("{descriptor}: bound decoder");
    Ok(*decoder)
}

/// [`decoder_of`] with the descriptor taken from the type parameter.
pub fn decoder<T: Reflect>() -> Result<MessageDecoder<T>, BindError> {
    decoder_of(T::DESCRIPTOR)
}
