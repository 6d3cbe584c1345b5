//! This library is the foundation for the `loggerkit-in` and `loggerkit-out` crates. It can be
//! built either with serialization support, or in a slightly more lightweight manner without it
//! (see features).
//!
//! It holds the geodesy primitives, the turn point and airspace domain model, the streaming
//! reader/writer traits, the shared error type and the packed record layouts of the binary
//! database formats.
#![allow(clippy::derive_partial_eq_without_eq)]
extern crate num;
#[macro_use]
extern crate num_derive;

#[cfg(any(feature = "to_json", feature = "serde"))]
extern crate serde;
#[cfg(feature = "to_json")]
extern crate serde_json;

pub mod airspace;
pub mod aviation;
pub mod bitconverter;
pub mod errors;
pub mod geodesy;
pub mod io;
pub mod record_structs;
#[cfg(test)]
mod tests;
pub mod turnpoint;

pub use errors::LkError;

pub use airspace::*;
pub use aviation::*;
pub use geodesy::*;
pub use io::*;
pub use record_structs::*;
pub use turnpoint::*;
