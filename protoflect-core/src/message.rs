use core::any::Any;
use core::fmt;
use std::io;

use crate::{DecodeError, MessageDescriptor, wire};

/// A finalized, immutable message instance.
///
/// Implemented by every generated message type. The encode side of the wire
/// format lives here; the decode side is reached through the type's decoder
/// factory (see [`MessageDecoder`]).
///
/// [`MessageDecoder`]: crate::MessageDecoder
pub trait Message: Any + fmt::Debug + Send + Sync {
    /// The runtime descriptor for this message type.
    fn descriptor(&self) -> &'static MessageDescriptor;

    /// Size of the encoded representation, in bytes.
    fn encoded_len(&self) -> usize;

    /// Appends the encoded representation to `buf`.
    fn encode(&self, buf: &mut Vec<u8>);

    /// Encodes into a fresh buffer.
    fn to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf
    }

    /// Writes the plain encoded representation to `writer`.
    fn write_to(&self, writer: &mut dyn io::Write) -> io::Result<()> {
        writer.write_all(&self.to_vec())
    }

    /// Writes the encoded representation prefixed with its varint length.
    fn write_length_delimited_to(&self, writer: &mut dyn io::Write) -> io::Result<()> {
        let body = self.to_vec();
        let mut framed = Vec::with_capacity(wire::varint_len(body.len() as u64) + body.len());
        wire::encode_varint(body.len() as u64, &mut framed);
        framed.extend_from_slice(&body);
        writer.write_all(&framed)
    }
}

/// A mutable, single-use staging object for some message type.
///
/// Implemented by every generated builder type. Finalization is *not* part of
/// this trait — it is reached through the builder descriptor's `build` entry
/// point, so that binding code never shortcuts discovery.
pub trait MessageBuilder: Any + fmt::Debug {
    /// The runtime descriptor for this builder type.
    fn descriptor(&self) -> &'static MessageDescriptor;

    /// Merges a JSON object into the builder, field by field.
    fn merge_json(&mut self, json: &str) -> Result<(), DecodeError>;

    /// Borrows the builder as `Any`, for callers that know the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrows the builder as `Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Compile-time access to a message type's descriptor.
///
/// The statically-typed counterpart of [`Message::descriptor`], mirroring how
/// the descriptor is reached when the type is known at compile time rather
/// than carried as a value.
pub trait Reflect: Message + Sized {
    /// The runtime descriptor for `Self`.
    const DESCRIPTOR: &'static MessageDescriptor;
}
