//! This is a library for reading glider logger file formats into rust. Every reader consumes a
//! forward-only byte stream and produces domain objects one at a time; none of them need to see
//! the whole file at once, with the one exception of the hex-wrapped database format, which has
//! to reassemble its banked address space before it can parse anything.
//!
//! The flight-log side lives in [`lxn`] (the tagged-record framing) and [`igc`] (the renderer
//! that turns a record stream into IGC text).
pub mod cenfis_airspace_text;
pub mod cenfis_db;
pub mod cenfis_hex;
pub mod cenfis_text;
pub mod filser_db;
pub mod filter;
pub mod hexfile;
pub mod igc;
mod line_reader;
pub mod lxn;
pub mod openair;
pub mod seeyou;
#[cfg(test)]
mod tests;
pub mod zander;

pub use loggerkit_core::errors::*;
pub use loggerkit_core::io::{BoxReader, ObjectReader};

pub(crate) use line_reader::LineReader;
