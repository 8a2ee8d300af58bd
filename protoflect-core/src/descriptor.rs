use core::any::{Any, TypeId};
use core::fmt;

use crate::{CallError, MessageBuilder};

/// Runtime descriptor for a generated message or builder type.
///
/// Every type emitted by the code generator carries one of these as a
/// `&'static` — it is the only handle the reflective binding layer needs to
/// locate a type's construction and decoding entry points. A descriptor is
/// never mutated after it is defined; it is safe to share freely across
/// threads.
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct MessageDescriptor {
    /// Fully-qualified schema name, e.g. `protoflect.test.FavoriteColor`.
    pub full_name: &'static str,

    /// The Rust type's identifier, without any path prefix.
    pub type_identifier: &'static str,

    /// Unique type identifier, provided by the compiler. Stored as a function
    /// pointer because `TypeId::of` cannot be evaluated in a `static`
    /// initializer.
    pub id: fn() -> TypeId,

    /// Whether this descriptor names a message or a builder, and for
    /// builders, how to view an erased value as `dyn MessageBuilder`.
    pub kind: DescriptorKind,

    /// Named entry points exposed by the described type. Lookup is by
    /// name and arity, see [`MessageDescriptor::entry_point`].
    pub entry_points: &'static [EntryPoint],
}

impl MessageDescriptor {
    /// Returns a const builder for a descriptor.
    pub const fn builder() -> DescriptorBuilder {
        DescriptorBuilder {
            full_name: None,
            type_identifier: None,
            id: None,
            kind: DescriptorKind::Message,
            entry_points: &[],
        }
    }

    /// The `TypeId` of the described type.
    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }

    /// Check if this descriptor describes the given type.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }

    /// Check if the given erased value is an instance of the described type.
    pub fn is_value(&self, value: &dyn Any) -> bool {
        self.type_id() == value.type_id()
    }

    /// Looks up a publicly-accessible entry point by name and arity.
    ///
    /// Non-public entry points are invisible to lookup, the same way a
    /// non-`pub` item is invisible to downstream code.
    pub fn entry_point(&'static self, name: &str, arity: usize) -> Option<&'static EntryPoint> {
        self.entry_points
            .iter()
            .find(|ep| ep.public && ep.name == name && ep.call.arity() == arity)
    }
}

impl PartialEq for MessageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for MessageDescriptor {}

impl fmt::Display for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name)
    }
}

impl fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDescriptor")
            .field("full_name", &self.full_name)
            .field("type_identifier", &self.type_identifier)
            .field("kind", &self.kind)
            .field("entry_points", &self.entry_points)
            .finish_non_exhaustive()
    }
}

/// Const builder for [`MessageDescriptor`], usable in `static` initializers.
pub struct DescriptorBuilder {
    full_name: Option<&'static str>,
    type_identifier: Option<&'static str>,
    id: Option<fn() -> TypeId>,
    kind: DescriptorKind,
    entry_points: &'static [EntryPoint],
}

impl DescriptorBuilder {
    /// Sets the fully-qualified schema name.
    pub const fn full_name(mut self, full_name: &'static str) -> Self {
        self.full_name = Some(full_name);
        self
    }

    /// Sets the Rust type identifier.
    pub const fn type_identifier(mut self, type_identifier: &'static str) -> Self {
        self.type_identifier = Some(type_identifier);
        self
    }

    /// Sets the type identity function, typically `TypeId::of::<T>`.
    pub const fn id(mut self, id: fn() -> TypeId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the descriptor kind. Defaults to [`DescriptorKind::Message`].
    pub const fn kind(mut self, kind: DescriptorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the entry-point table. Defaults to empty.
    pub const fn entry_points(mut self, entry_points: &'static [EntryPoint]) -> Self {
        self.entry_points = entry_points;
        self
    }

    /// Finishes building the descriptor, panicking at compile time if a
    /// required field was not set.
    pub const fn build(self) -> MessageDescriptor {
        MessageDescriptor {
            full_name: match self.full_name {
                Some(v) => v,
                None => panic!("full_name is required"),
            },
            type_identifier: match self.type_identifier {
                Some(v) => v,
                None => panic!("type_identifier is required"),
            },
            id: match self.id {
                Some(v) => v,
                None => panic!("id is required"),
            },
            kind: self.kind,
            entry_points: self.entry_points,
        }
    }
}

/// What a [`MessageDescriptor`] describes.
#[derive(Clone, Copy)]
pub enum DescriptorKind {
    /// A finalized message type.
    Message,

    /// A mutable staging type for some message.
    Builder {
        /// Views an erased builder value as `dyn MessageBuilder`. Returns
        /// `None` if the value is not an instance of the described type.
        as_builder: fn(&mut dyn Any) -> Option<&mut dyn MessageBuilder>,
    },
}

impl DescriptorKind {
    /// Whether this kind is builder-capable.
    pub const fn is_builder(&self) -> bool {
        matches!(self, DescriptorKind::Builder { .. })
    }
}

impl fmt::Debug for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorKind::Message => f.write_str("Message"),
            DescriptorKind::Builder { .. } => f.write_str("Builder"),
        }
    }
}

/// A named, statically-resolved entry point on a described type.
///
/// Entry points are the reflective surface of generated code: a zero- or
/// one-argument callable with an erased signature, plus the descriptor of
/// the type its result is associated with. The binding layer looks these up
/// by name and arity and never calls generated code any other way.
#[derive(Clone, Copy)]
pub struct EntryPoint {
    /// Entry-point name, e.g. `new_builder`, `build` or `decoder`.
    pub name: &'static str,

    /// Whether the entry point is publicly accessible. Non-public entry
    /// points never resolve.
    pub public: bool,

    /// Descriptor of the type the result is associated with: the builder
    /// type for `new_builder`, the message type for `build`, and the decoded
    /// message type for `decoder`.
    pub returns: fn() -> &'static MessageDescriptor,

    /// The erased callable itself.
    pub call: Call,
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint")
            .field("name", &self.name)
            .field("public", &self.public)
            .field("arity", &self.call.arity())
            .finish_non_exhaustive()
    }
}

/// The two erased invocation shapes generated entry points come in.
#[derive(Clone, Copy)]
pub enum Call {
    /// A zero-argument call, e.g. a static factory.
    Nullary(fn() -> Result<Box<dyn Any>, CallError>),

    /// A single-argument call, e.g. a builder's finalize taking the builder.
    Unary(fn(Box<dyn Any>) -> Result<Box<dyn Any>, CallError>),
}

impl Call {
    /// Number of arguments the callable takes.
    pub const fn arity(&self) -> usize {
        match self {
            Call::Nullary(_) => 0,
            Call::Unary(_) => 1,
        }
    }
}
