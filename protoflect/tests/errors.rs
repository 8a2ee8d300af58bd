//! Binding against types whose shape breaks the conventions, one way per
//! test: every failure must surface as the matching `BindError` kind and
//! never as a usable handle.

use core::any::{Any, TypeId};
use core::error::Error as _;
use std::io;

use protoflect::{
    BindError, BoxError, Call, CallError, DescriptorKind, EntryPoint, MessageBuilder,
    MessageDescriptor, builder_fn_of, decoder_of,
};
use protoflect_testhelpers::{eyre, setup};
use protoflect_testmodel::{FavoriteCar, FavoriteColor, FavoriteColorBuilder};

fn noop(_: &mut dyn MessageBuilder, _: ()) -> Result<(), BoxError> {
    Ok(())
}

fn new_color_builder() -> Result<Box<dyn Any>, CallError> {
    Ok(Box::new(FavoriteColor::new_builder()))
}

fn new_car_builder_instead() -> Result<Box<dyn Any>, CallError> {
    Ok(Box::new(FavoriteCar::new_builder()))
}

fn failing_factory() -> Result<Box<dyn Any>, CallError> {
    Err(CallError::with_source(
        "generated factory failed",
        io::Error::other("disk on fire"),
    ))
}

fn car_decoder_instead() -> Result<Box<dyn Any>, CallError> {
    Ok(Box::new(FavoriteCar::decoder()))
}

fn build_wrong_message(_: Box<dyn Any>) -> Result<Box<dyn Any>, CallError> {
    Ok(Box::new(FavoriteCar::default()))
}

fn color_builder_view(value: &mut dyn Any) -> Option<&mut dyn MessageBuilder> {
    value
        .downcast_mut::<FavoriteColorBuilder>()
        .map(|builder| builder as &mut dyn MessageBuilder)
}

/// No entry points at all.
const BARE: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.Bare")
        .type_identifier("FavoriteColor")
        .id(TypeId::of::<FavoriteColor>)
        .build()
};

/// `new_builder` exists but is not publicly accessible.
const PRIVATE_FACTORY: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.PrivateFactory")
        .type_identifier("FavoriteColor")
        .id(TypeId::of::<FavoriteColor>)
        .entry_points(&[EntryPoint {
            name: "new_builder",
            public: false,
            returns: FavoriteColorBuilder::descriptor,
            call: Call::Nullary(new_color_builder),
        }])
        .build()
};

/// `new_builder` declares a message type, not a builder type.
const FACTORY_RETURNS_MESSAGE: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.FactoryReturnsMessage")
        .type_identifier("FavoriteColor")
        .id(TypeId::of::<FavoriteColor>)
        .entry_points(&[EntryPoint {
            name: "new_builder",
            public: true,
            returns: FavoriteColor::descriptor,
            call: Call::Nullary(new_color_builder),
        }])
        .build()
};

/// A builder-capable type with no `build` entry point.
const BUILDER_WITHOUT_BUILD: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.BuilderWithoutBuild")
        .type_identifier("FavoriteColorBuilder")
        .id(TypeId::of::<FavoriteColorBuilder>)
        .kind(DescriptorKind::Builder {
            as_builder: color_builder_view,
        })
        .build()
};

fn builder_without_build() -> &'static MessageDescriptor {
    BUILDER_WITHOUT_BUILD
}

const FACTORY_TO_BUILD_LESS_BUILDER: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.FactoryToBuildLessBuilder")
        .type_identifier("FavoriteColor")
        .id(TypeId::of::<FavoriteColor>)
        .entry_points(&[EntryPoint {
            name: "new_builder",
            public: true,
            returns: builder_without_build,
            call: Call::Nullary(new_color_builder),
        }])
        .build()
};

/// `new_builder` declares one builder type but produces another.
const LYING_FACTORY: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.LyingFactory")
        .type_identifier("FavoriteColor")
        .id(TypeId::of::<FavoriteColor>)
        .entry_points(&[EntryPoint {
            name: "new_builder",
            public: true,
            returns: FavoriteColorBuilder::descriptor,
            call: Call::Nullary(new_car_builder_instead),
        }])
        .build()
};

/// `new_builder` raises from inside the generated code.
const EXPLODING_FACTORY: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.ExplodingFactory")
        .type_identifier("FavoriteColor")
        .id(TypeId::of::<FavoriteColor>)
        .entry_points(&[EntryPoint {
            name: "new_builder",
            public: true,
            returns: FavoriteColorBuilder::descriptor,
            call: Call::Nullary(failing_factory),
        }])
        .build()
};

/// The builder's `build` finalizes into the wrong message type.
const BUILDER_BUILDS_WRONG_TYPE: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.WrongBuild.Builder")
        .type_identifier("FavoriteColorBuilder")
        .id(TypeId::of::<FavoriteColorBuilder>)
        .kind(DescriptorKind::Builder {
            as_builder: color_builder_view,
        })
        .entry_points(&[EntryPoint {
            name: "build",
            public: true,
            returns: FavoriteCar::descriptor,
            call: Call::Unary(build_wrong_message),
        }])
        .build()
};

fn builder_builds_wrong_type() -> &'static MessageDescriptor {
    BUILDER_BUILDS_WRONG_TYPE
}

const FACTORY_TO_WRONG_BUILD: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.WrongBuild")
        .type_identifier("FavoriteColor")
        .id(TypeId::of::<FavoriteColor>)
        .entry_points(&[EntryPoint {
            name: "new_builder",
            public: true,
            returns: builder_builds_wrong_type,
            call: Call::Nullary(new_color_builder),
        }])
        .build()
};

/// `decoder` produces a decoder bound to a different type.
const WRONG_DECODER: &MessageDescriptor = &const {
    MessageDescriptor::builder()
        .full_name("protoflect.test.WrongDecoder")
        .type_identifier("FavoriteColor")
        .id(TypeId::of::<FavoriteColor>)
        .entry_points(&[EntryPoint {
            name: "decoder",
            public: true,
            returns: FavoriteColor::descriptor,
            call: Call::Nullary(car_decoder_instead),
        }])
        .build()
};

#[test]
fn missing_builder_factory_is_discovery_error() -> eyre::Result<()> {
    setup();

    let err = builder_fn_of::<FavoriteColor, (), _>(BARE, noop).unwrap_err();
    assert!(matches!(
        err,
        BindError::EntryPointNotFound {
            name: "new_builder",
            arity: 0,
            ..
        }
    ));
    Ok(())
}

#[test]
fn non_public_factory_is_invisible() -> eyre::Result<()> {
    setup();

    let err = builder_fn_of::<FavoriteColor, (), _>(PRIVATE_FACTORY, noop).unwrap_err();
    assert!(matches!(
        err,
        BindError::EntryPointNotFound {
            name: "new_builder",
            ..
        }
    ));
    Ok(())
}

#[test]
fn non_builder_return_type_is_shape_mismatch() -> eyre::Result<()> {
    setup();

    let err = builder_fn_of::<FavoriteColor, (), _>(FACTORY_RETURNS_MESSAGE, noop).unwrap_err();
    assert!(matches!(err, BindError::NotABuilder { .. }));
    Ok(())
}

#[test]
fn missing_finalize_is_discovery_error() -> eyre::Result<()> {
    setup();

    let err =
        builder_fn_of::<FavoriteColor, (), _>(FACTORY_TO_BUILD_LESS_BUILDER, noop).unwrap_err();
    assert!(matches!(
        err,
        BindError::EntryPointNotFound { name: "build", .. }
    ));
    Ok(())
}

#[test]
fn wrong_builder_instance_fails_integrity_check() -> eyre::Result<()> {
    setup();

    let err = builder_fn_of::<FavoriteColor, (), _>(LYING_FACTORY, noop).unwrap_err();
    assert!(matches!(err, BindError::IntegrityCheckFailed { .. }));
    Ok(())
}

#[test]
fn wrong_finalized_instance_fails_integrity_check() -> eyre::Result<()> {
    setup();

    let err = builder_fn_of::<FavoriteColor, (), _>(FACTORY_TO_WRONG_BUILD, noop).unwrap_err();
    assert!(matches!(
        err,
        BindError::IntegrityCheckFailed {
            entry_point: "build",
            ..
        }
    ));
    Ok(())
}

#[test]
fn factory_failure_preserves_the_cause() -> eyre::Result<()> {
    setup();

    let err = builder_fn_of::<FavoriteColor, (), _>(EXPLODING_FACTORY, noop).unwrap_err();
    let BindError::InvocationFailed { source, .. } = &err else {
        panic!("expected InvocationFailed, got {err}");
    };
    assert_eq!(source.message(), "generated factory failed");
    let cause = source.source().expect("cause should be preserved");
    assert_eq!(cause.to_string(), "disk on fire");
    Ok(())
}

#[test]
fn missing_decoder_factory_is_discovery_error() -> eyre::Result<()> {
    setup();

    let err = decoder_of::<FavoriteColor>(BARE).unwrap_err();
    assert!(matches!(
        err,
        BindError::EntryPointNotFound {
            name: "decoder",
            ..
        }
    ));
    Ok(())
}

#[test]
fn decoder_of_wrong_type_fails_integrity_check() -> eyre::Result<()> {
    setup();

    let err = decoder_of::<FavoriteColor>(WRONG_DECODER).unwrap_err();
    assert!(matches!(err, BindError::IntegrityCheckFailed { .. }));
    Ok(())
}
