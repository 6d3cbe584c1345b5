// Copyright (C) 2022 by GiGa infosystems
//! The Intel-HEX output filter: an [`std::io::Write`] adapter that
//! groups whatever bytes pass through it into 16-byte hex records,
//! inserts a bank-select record at every `0x8000` boundary and emits
//! the end-of-file record when it is finished.
use loggerkit_core::errors::*;
use loggerkit_core::record_structs::BANK_SIZE;

use std::io::Write;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";
const MAX_RECORD_DATA: usize = 0x10;

fn push_hex_byte(out: &mut Vec<u8>, value: u8) {
    out.push(HEX_DIGITS[(value / 16) as usize]);
    out.push(HEX_DIGITS[(value % 16) as usize]);
}

pub struct HexWriter<W> {
    next: W,
    segment: u8,
    offset: usize,
    finished: bool,
}

impl<W: Write> HexWriter<W> {
    pub fn new(next: W) -> Self {
        Self::with_segment(next, 0)
    }

    /// Start in a specific bank. The airspace files are addressed from
    /// bank 0xc.
    pub fn with_segment(next: W, segment: u8) -> Self {
        HexWriter {
            next,
            segment,
            offset: 0,
            finished: false,
        }
    }

    fn write_record(&mut self, address: u16, record_type: u8, data: &[u8]) -> std::io::Result<()> {
        let mut line = Vec::with_capacity(1 + (4 + MAX_RECORD_DATA + 1) * 2 + 2);
        line.push(b':');
        push_hex_byte(&mut line, data.len() as u8);
        push_hex_byte(&mut line, (address >> 8) as u8);
        push_hex_byte(&mut line, address as u8);
        push_hex_byte(&mut line, record_type);

        // Two's complement of the sum of everything before it.
        let mut checksum = (data.len() as u8)
            .wrapping_add((address >> 8) as u8)
            .wrapping_add(address as u8)
            .wrapping_add(record_type);
        for &b in data {
            push_hex_byte(&mut line, b);
            checksum = checksum.wrapping_add(b);
        }
        push_hex_byte(&mut line, checksum.wrapping_neg());
        line.push(b'\r');
        line.push(b'\n');

        self.next.write_all(&line)
    }

    /// Emit the end-of-file record and flush the underlying sink.
    pub fn finish(&mut self) -> Result<(), LkError> {
        if self.finished {
            return Err(LkError::AlreadyFlushed);
        }
        self.write_record(0, 0x01, &[])?;
        self.next.flush()?;
        self.finished = true;
        Ok(())
    }
}

impl<W: Write> Write for HexWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut rest = buf;

        while !rest.is_empty() {
            if self.offset >= BANK_SIZE {
                self.segment = self.segment.wrapping_add(1);
                self.offset = 0;
                self.write_record(0, 0x10u8.wrapping_add(self.segment), &[])?;
            }

            let mut n = rest.len().min(MAX_RECORD_DATA);
            if self.offset + n > BANK_SIZE {
                n = BANK_SIZE - self.offset;
            }

            self.write_record(self.offset as u16, 0x00, &rest[..n])?;
            self.offset += n;
            rest = &rest[n..];
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.next.flush()
    }
}
