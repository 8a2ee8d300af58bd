use core::fmt;
use core::marker::PhantomData;
use std::io;

use crate::{DecodeError, Message, MessageDescriptor, wire};

/// A decoder bound to one message type.
///
/// Produced once per type by the type's generated `decoder` entry point,
/// stateless and freely reusable across calls and threads. The struct itself
/// is a pair of function pointer and descriptor, so copying it is free.
pub struct MessageDecoder<T> {
    descriptor: &'static MessageDescriptor,
    decode: fn(&[u8]) -> Result<T, DecodeError>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for MessageDecoder<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MessageDecoder<T> {}

impl<T> fmt::Debug for MessageDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageDecoder<{}>", self.descriptor.type_identifier)
    }
}

impl<T: Message> MessageDecoder<T> {
    /// Creates a decoder from a descriptor and a decode function. Called by
    /// generated code only.
    pub const fn new(
        descriptor: &'static MessageDescriptor,
        decode: fn(&[u8]) -> Result<T, DecodeError>,
    ) -> Self {
        Self {
            descriptor,
            decode,
            _marker: PhantomData,
        }
    }

    /// The descriptor of the message type this decoder is bound to.
    pub fn descriptor(&self) -> &'static MessageDescriptor {
        self.descriptor
    }

    /// Decodes one message from a plain (non-delimited) buffer.
    pub fn decode(&self, buf: &[u8]) -> Result<T, DecodeError> {
        (self.decode)(buf)
    }

    /// Reads a stream to its end and decodes one message from it.
    pub fn decode_from(&self, mut reader: impl io::Read) -> Result<T, DecodeError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.decode(&buf)
    }

    /// Reads one varint-length-delimited message from a stream.
    ///
    /// The stream is left positioned after the message, so consecutive
    /// delimited messages can be read back to back.
    pub fn decode_length_delimited_from(&self, mut reader: impl io::Read) -> Result<T, DecodeError> {
        let length = wire::read_varint_from(&mut reader)?;
        let length = usize::try_from(length).map_err(|_| DecodeError::LengthOverflow { length })?;
        let mut buf = vec![0u8; length];
        reader.read_exact(&mut buf)?;
        self.decode(&buf)
    }
}
