// Copyright (C) 2022 by GiGa infosystems
//! A growable byte buffer with the Cenfis framing helpers: big-endian
//! appends, Pascal strings, the altitude and vertex encodings, and the
//! bank rule (no append may straddle a `0x8000` boundary of the final
//! file; `0xff` padding is inserted instead).
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::{Altitude, AltitudeRef, AltitudeUnit, SurfacePosition};
use loggerkit_core::record_structs::BANK_SIZE;

pub struct CenfisBuffer {
    data: Vec<u8>,
    /// Offset of this buffer's first byte in the final file; the bank
    /// rule is evaluated against the file position, not the buffer
    /// position.
    base: usize,
}

impl CenfisBuffer {
    pub fn new() -> Self {
        Self::with_base(0)
    }

    pub fn with_base(base: usize) -> Self {
        CenfisBuffer {
            data: Vec::new(),
            base,
        }
    }

    pub fn tell(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn fill(&mut self, ch: u8, length: usize) {
        self.data.resize(self.data.len() + length, ch);
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn append_byte(&mut self, ch: u8) {
        self.data.push(ch);
    }

    pub fn append_short(&mut self, v: u16) {
        self.append(&v.to_be_bytes());
    }

    pub fn append_long(&mut self, v: u32) {
        self.append(&v.to_be_bytes());
    }

    /// A Pascal string: a length byte followed by at most 255 bytes.
    pub fn append_pascal(&mut self, s: &str) -> Result<(), LkError> {
        if s.len() >= 0x100 {
            return Err(LkError::container_full("Pascal string overflow"));
        }
        self.append_byte(s.len() as u8);
        self.append(s.as_bytes());
        Ok(())
    }

    /// The altitude tuple: tag 3, the value in tens of feet, and a
    /// reference character (`G` for ground-relative, `M` otherwise).
    pub fn append_altitude(&mut self, altitude: &Altitude) {
        let in_feet = altitude.to_unit(AltitudeUnit::Feet);
        self.append_byte(3);
        self.append_short((in_feet.value / 10) as u16);
        self.append_byte(
            match in_feet.reference {
                AltitudeRef::Gnd | AltitudeRef::Airfield => b'G',
                _ => b'M',
            },
        );
    }

    /// The first vertex of a polygon: tag 8 and two 32-bit arc-second
    /// coordinates.
    pub fn append_first_vertex(&mut self, pos: &SurfacePosition) {
        self.append_byte(8);
        self.append_long(pos.latitude.refactor(60) as u32);
        self.append_long(pos.longitude.refactor(60) as u32);
    }

    /// A subsequent vertex: 16-bit arc-second deltas from `rel`.
    pub fn append_delta_vertex(&mut self, pos: &SurfacePosition, rel: &SurfacePosition) {
        self.append_short((pos.latitude.refactor(60) - rel.latitude.refactor(60)) as u16);
        self.append_short((pos.longitude.refactor(60) - rel.longitude.refactor(60)) as u16);
    }

    /// Pad with `0xff` if appending `length` more bytes would straddle
    /// a bank boundary of the final file.
    pub fn auto_bank_switch(&mut self, length: usize) {
        let pos = self.base + self.tell();
        if pos / BANK_SIZE == (pos + length) / BANK_SIZE {
            return;
        }

        // Don't write across the bank limit, insert 0xff padding
        // instead.
        let padding = (pos + length) / BANK_SIZE * BANK_SIZE - pos;
        self.fill(0xff, padding);
    }

    /// Append a finished sub-buffer, honoring the bank rule.
    pub fn append_buffer(&mut self, src: &CenfisBuffer) {
        self.auto_bank_switch(src.tell());
        self.append(src.data());
    }

    /// Overwrite one earlier byte (the back-patched list size).
    pub fn patch_byte(&mut self, offset: usize, value: u8) {
        self.data[offset] = value;
    }
}

impl Default for CenfisBuffer {
    fn default() -> Self {
        Self::new()
    }
}
