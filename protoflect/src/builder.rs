use core::any::Any;
use core::marker::PhantomData;

use log::{debug, trace};

use crate::{
    BindError, BoxError, DescriptorKind, EntryPoint, Message, MessageBuilder, MessageDescriptor,
    Reflect, invoke,
};

/// A validated, reusable build closure for one message type.
///
/// Obtained from [`builder_fn_of`] or [`builder_fn`]. Each [`build`] call
/// creates a fresh builder, runs the captured mutation function over it with
/// the caller's input, finalizes, and returns the instance. No discovery or
/// shape checking happens after construction, so calls are cheap; the handle
/// is safe for concurrent use whenever the mutation function is.
///
/// [`build`]: BuilderFn::build
pub struct BuilderFn<T, I, F> {
    message: &'static MessageDescriptor,
    builder: &'static MessageDescriptor,
    new_builder: &'static EntryPoint,
    finalize: &'static EntryPoint,
    as_builder: fn(&mut dyn Any) -> Option<&mut dyn MessageBuilder>,
    mutation: F,
    _marker: PhantomData<fn(I) -> T>,
}

/// Constructs a [`BuilderFn`] for the type named by `descriptor`.
///
/// Discovery and validation happen here, once:
///
/// - the `new_builder` entry point is located by name and arity, and the
///   builder type is taken from its *declared return descriptor* rather than
///   assumed, so a builder defined elsewhere than the message still binds;
/// - the declared builder type must be builder-capable, else
///   [`BindError::NotABuilder`];
/// - the `build` entry point is located on the discovered builder type;
/// - one real round trip runs immediately — construct a builder, finalize it
///   with no mutation applied — and any type-identity mismatch in the
///   produced builder or instance is [`BindError::IntegrityCheckFailed`].
///
/// A returned handle has therefore already built one instance successfully.
///
/// The mutation function receives a private, fresh builder per call together
/// with the call's input; whatever error it returns propagates out of
/// [`BuilderFn::build`] unchanged.
pub fn builder_fn_of<T, I, F>(
    descriptor: &'static MessageDescriptor,
    mutation: F,
) -> Result<BuilderFn<T, I, F>, BindError>
where
    T: Message,
    F: Fn(&mut dyn MessageBuilder, I) -> Result<(), BoxError>,
{
    let new_builder =
        descriptor
            .entry_point("new_builder", 0)
            .ok_or(BindError::EntryPointNotFound {
                descriptor,
                name: "new_builder",
                arity: 0,
            })?;

    // The builder type is whatever `new_builder` declares, not a fixed type.
    let builder = (new_builder.returns)();
    trace!("{descriptor}: 'new_builder' declares builder type {builder}");

    let DescriptorKind::Builder { as_builder } = builder.kind else {
        return Err(BindError::NotABuilder {
            descriptor,
            returned: builder,
        });
    };

    let finalize = builder
        .entry_point("build", 1)
        .ok_or(BindError::EntryPointNotFound {
            descriptor: builder,
            name: "build",
            arity: 1,
        })?;

    // Round trip with an untouched builder, before the handle escapes.
    let mut staged = invoke::call_nullary(descriptor, new_builder)?;
    if !builder.is_value(staged.as_ref()) || as_builder(staged.as_mut()).is_none() {
        return Err(BindError::IntegrityCheckFailed {
            descriptor,
            entry_point: new_builder.name,
            expected: builder.type_identifier,
        });
    }
    let probe = invoke::invoke_unary::<T>(builder, finalize, staged)?;
    drop(probe);

    debug!("{descriptor}: bound builder fn via {builder}");
    Ok(BuilderFn {
        message: descriptor,
        builder,
        new_builder,
        finalize,
        as_builder,
        mutation,
        _marker: PhantomData,
    })
}

/// [`builder_fn_of`] with the descriptor taken from the type parameter.
pub fn builder_fn<T, I, F>(mutation: F) -> Result<BuilderFn<T, I, F>, BindError>
where
    T: Reflect,
    F: Fn(&mut dyn MessageBuilder, I) -> Result<(), BoxError>,
{
    builder_fn_of(T::DESCRIPTOR, mutation)
}

impl<T, I, F> core::fmt::Debug for BuilderFn<T, I, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BuilderFn")
            .field("message", &self.message)
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl<T, I, F> BuilderFn<T, I, F>
where
    T: Message,
    F: Fn(&mut dyn MessageBuilder, I) -> Result<(), BoxError>,
{
    /// Builds one instance from `input`.
    ///
    /// A fresh builder is created, the mutation function runs over it with
    /// `input`, and the builder is finalized. Mutation errors propagate
    /// unchanged; nothing is shared between calls.
    pub fn build(&self, input: I) -> Result<T, BoxError> {
        let mut staged = invoke::call_nullary(self.message, self.new_builder)?;
        // `None` here is ruled out by the construction-time round trip.
        let handle = match (self.as_builder)(staged.as_mut()) {
            Some(handle) => handle,
            None => {
                return Err(Box::new(BindError::IntegrityCheckFailed {
                    descriptor: self.message,
                    entry_point: self.new_builder.name,
                    expected: self.builder.type_identifier,
                }));
            }
        };

        (self.mutation)(handle, input)?;

        let instance = invoke::invoke_unary::<T>(self.builder, self.finalize, staged)?;
        Ok(*instance)
    }

    /// Descriptor of the message type this handle builds.
    pub fn message_descriptor(&self) -> &'static MessageDescriptor {
        self.message
    }

    /// Descriptor of the builder type discovered at construction.
    pub fn builder_descriptor(&self) -> &'static MessageDescriptor {
        self.builder
    }
}
