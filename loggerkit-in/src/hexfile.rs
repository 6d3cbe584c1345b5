//! The Intel-HEX record decoder: a callback-driven state machine that
//! scans colon-delimited ASCII records out of a byte stream, verifies
//! their checksums and hands the payloads to a consumer. A consumer
//! that wants a flat address space across bank-select records can use
//! [`HexAssembler`].
use loggerkit_core::errors::*;
use loggerkit_core::record_structs::BANK_SIZE;

/// Data record.
pub const RECORD_DATA: u8 = 0x00;
/// End-of-file record.
pub const RECORD_EOF: u8 = 0x01;
/// Bank-select records are `0x10 + bank`.
pub const RECORD_BANK_BASE: u8 = 0x10;

enum State {
    /// Searching for the next colon.
    None,
    /// Expecting the high nibble of the next record byte.
    Record,
    /// Expecting the low nibble.
    Nibble(u8),
}

pub struct HexDecoder {
    state: State,
    record: [u8; 0x100],
    record_position: usize,
    record_length: usize,
}

impl Default for HexDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HexDecoder {
    pub fn new() -> Self {
        HexDecoder {
            state: State::None,
            record: [0; 0x100],
            record_position: 0,
            record_length: 0,
        }
    }

    /// Feed a chunk of input. The handler receives
    /// `(record_type, address, payload)` for every complete record.
    pub fn feed(
        &mut self,
        buffer: &[u8],
        handler: &mut impl FnMut(u8, u16, &[u8]) -> Result<(), LkError>,
    ) -> Result<(), LkError> {
        for &b in buffer {
            match self.state {
                State::None => {
                    if b == b':' {
                        self.state = State::Record;
                    }
                }
                State::Record => {
                    let digit = decode_hex_digit(b)
                        .ok_or_else(|| LkError::malformed("invalid hex digit"))?;
                    self.state = State::Nibble(digit);
                }
                State::Nibble(high) => {
                    let digit = decode_hex_digit(b)
                        .ok_or_else(|| LkError::malformed("invalid hex digit"))?;
                    if self.record_position >= self.record.len() {
                        return Err(LkError::malformed("hex record too long"));
                    }
                    self.record[self.record_position] = high * 0x10 + digit;
                    self.record_position += 1;
                    self.state = State::Record;

                    if self.record_position == 1 {
                        // count + address + type + data + checksum
                        self.record_length = 1 + 2 + 1 + self.record[0] as usize + 1;
                    }

                    if self.record_position == self.record_length {
                        self.finish_record(handler)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Verify that the stream did not end in the middle of a record.
    pub fn close(&self) -> Result<(), LkError> {
        match self.state {
            State::None => Ok(()),
            _ => Err(LkError::malformed("truncated hex record")),
        }
    }

    fn finish_record(
        &mut self,
        handler: &mut impl FnMut(u8, u16, &[u8]) -> Result<(), LkError>,
    ) -> Result<(), LkError> {
        let record = &self.record[..self.record_length];

        // The checksum byte is chosen so the whole record sums to zero.
        let sum = record
            .iter()
            .fold(0u8, |acc, &b| acc.wrapping_add(b));
        if sum != 0 {
            return Err(LkError::malformed("hex record checksum mismatch"));
        }

        let length = record[0] as usize;
        let address = ((record[1] as u16) << 8) | record[2] as u16;
        let record_type = record[3];
        let payload = &record[4..4 + length];

        self.state = State::None;
        self.record_position = 0;
        self.record_length = 0;

        handler(record_type, address, payload)
    }
}

fn decode_hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(10 + b - b'a'),
        b'A'..=b'F' => Some(10 + b - b'A'),
        _ => None,
    }
}

/// Reassembles hex records into a linear address space, following
/// bank-select records. Gaps are filled with `0xff` like unwritten
/// flash.
pub struct HexAssembler {
    /// Addresses below this are discarded.
    start: usize,
    base: usize,
    data: Vec<u8>,
    eof: bool,
}

// Refuse to assemble anything bigger than this.
const MAX_ASSEMBLED: usize = 16 * 1024 * 1024;

impl HexAssembler {
    pub fn new(start: usize) -> Self {
        HexAssembler {
            start,
            base: 0,
            data: Vec::new(),
            eof: false,
        }
    }

    pub fn handle(&mut self, record_type: u8, address: u16, payload: &[u8]) -> Result<(), LkError> {
        if self.eof {
            return Err(LkError::malformed("hex record after EOF record"));
        }

        if record_type == RECORD_DATA {
            self.write_data(self.base + address as usize, payload)
        } else if record_type == RECORD_EOF {
            self.eof = true;
            Ok(())
        } else if record_type >= RECORD_BANK_BASE {
            self.base = (record_type - RECORD_BANK_BASE) as usize * BANK_SIZE;
            Ok(())
        } else {
            Err(LkError::malformed("unsupported hex record type"))
        }
    }

    fn write_data(&mut self, offset: usize, payload: &[u8]) -> Result<(), LkError> {
        if offset + payload.len() <= self.start {
            return Ok(());
        }

        let (payload, offset) = if offset < self.start {
            (&payload[self.start - offset..], self.start)
        } else {
            (payload, offset)
        };
        let offset = offset - self.start;

        if offset + payload.len() > MAX_ASSEMBLED {
            return Err(LkError::malformed("hex image too large"));
        }
        if self.data.len() < offset + payload.len() {
            self.data.resize(offset + payload.len(), 0xff);
        }
        self.data[offset..offset + payload.len()].copy_from_slice(payload);
        Ok(())
    }

    /// The assembled image; fails unless an EOF record arrived.
    pub fn into_data(self) -> Result<Vec<u8>, LkError> {
        if !self.eof {
            return Err(LkError::malformed("hex stream without EOF record"));
        }
        Ok(self.data)
    }
}
