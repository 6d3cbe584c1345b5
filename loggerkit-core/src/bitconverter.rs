// Copyright (C) 2020 by GiGa infosystems
//! This submodule deals with interpreting the raw bytes of the binary
//! formats. All of the multi-byte fields in the Cenfis family are
//! big-endian; the Filser database stores its coordinates and its
//! frequency as little-endian IEEE-754 floats, so both byte orders
//! live here.
use crate::errors::*;

use std::convert::TryInto;

/// Read a big-endian `u16` from the start of a slice.
/// ```
/// # use loggerkit_core::bitconverter::read_u16_be;
/// assert_eq!(read_u16_be(&[0x10, 0x46]).unwrap(), 0x1046);
/// ```
pub fn read_u16_be(input: &[u8]) -> Result<u16, LkError> {
    Ok(u16::from_be_bytes(input[..2].try_into()?))
}

/// Read a little-endian `u16` from the start of a slice.
pub fn read_u16_le(input: &[u8]) -> Result<u16, LkError> {
    Ok(u16::from_le_bytes(input[..2].try_into()?))
}

/// Read a big-endian `u32` from the start of a slice.
pub fn read_u32_be(input: &[u8]) -> Result<u32, LkError> {
    Ok(u32::from_be_bytes(input[..4].try_into()?))
}

/// Read a big-endian `i32` from the start of a slice.
pub fn read_i32_be(input: &[u8]) -> Result<i32, LkError> {
    Ok(i32::from_be_bytes(input[..4].try_into()?))
}

/// Read a big-endian `i16` from the start of a slice.
pub fn read_i16_be(input: &[u8]) -> Result<i16, LkError> {
    Ok(i16::from_be_bytes(input[..2].try_into()?))
}

/// Read a little-endian IEEE-754 `f32` from the start of a slice.
pub fn read_f32_le(input: &[u8]) -> Result<f32, LkError> {
    Ok(f32::from_le_bytes(input[..4].try_into()?))
}

/// Read a big-endian 24-bit unsigned integer from the start of a slice.
///
/// The Cenfis database stores radio frequencies this way: three bytes
/// of kilohertz.
/// ```
/// # use loggerkit_core::bitconverter::read_u24_be;
/// assert_eq!(read_u24_be(&[0x01, 0xe1, 0x7a]).unwrap(), 123_258);
/// ```
pub fn read_u24_be(input: &[u8]) -> Result<u32, LkError> {
    if input.len() < 3 {
        return Err(LkError::malformed("short read for 24-bit field"));
    }
    Ok(((input[0] as u32) << 16) | ((input[1] as u32) << 8) | input[2] as u32)
}

/// Emit a big-endian 24-bit unsigned integer. The topmost byte of the
/// input is discarded.
pub fn write_u24_be(value: u32) -> [u8; 3] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// Trim trailing spaces and control bytes from a fixed-width field and
/// return the result as an owned string. Bytes above 0x7f are kept
/// as-is (the formats are Latin-1-agnostic).
pub fn trim_fixed_field(input: &[u8]) -> String {
    let mut length = input.len();
    while length > 0 && input[length - 1] <= b' ' {
        length -= 1;
    }
    input[..length].iter().map(|&b| b as char).collect()
}

/// Copy a string into a fixed-width field, space-padding the remainder
/// and truncating overlong input.
pub fn fill_fixed_field(dest: &mut [u8], src: &str) {
    let bytes = src.as_bytes();
    let length = bytes.len().min(dest.len());
    dest[..length].copy_from_slice(&bytes[..length]);
    for b in dest[length..].iter_mut() {
        *b = b' ';
    }
}
