// Copyright (C) 2022 by GiGa infosystems
//! This is a library for writing glider logger file formats from rust. Every writer accepts
//! domain objects one at a time over a byte sink and must be flushed explicitly: `flush` writes
//! the format-level framing (trailer records, index tables, padding) and moves the writer into a
//! terminal state, so a second `flush` fails instead of emitting the framing twice.
//!
//! The text writers stream their records as they come; the database writers have to collect
//! everything first because their headers carry counts and offsets that are only known at the
//! end.
extern crate num;
extern crate tinyvec;
#[cfg(test)]
extern crate loggerkit_in;
#[cfg(test)]
extern crate tempfile;

pub mod cenfis_airspace;
pub mod cenfis_buffer;
pub mod cenfis_crypto;
pub mod cenfis_db;
pub mod cenfis_hex;
pub mod cenfis_text;
pub mod filser_db;
pub mod hexfile;
#[cfg(test)]
mod integration_tests;
pub mod openair;
pub mod seeyou;
pub mod zander;
pub mod zander_airspace;

pub use loggerkit_core::errors::*;
pub use loggerkit_core::io::{BoxWriter, ObjectWriter};
