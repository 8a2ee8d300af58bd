#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![doc = include_str!("../README.md")]

mod descriptor;
pub use descriptor::*;

mod message;
pub use message::*;

mod decoder;
pub use decoder::*;

mod error;
pub use error::*;

// Wire-level encoding primitives, used by generated message code
pub mod wire;
