#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![doc = include_str!("../README.md")]

pub use protoflect_core::*;

mod error;
pub use error::*;

mod invoke;

mod builder;
pub use builder::*;

mod decode;
pub use decode::*;
