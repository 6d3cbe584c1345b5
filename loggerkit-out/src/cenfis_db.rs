// Copyright (C) 2022 by GiGa infosystems
//! Writer for the Cenfis turn point database. The header carries the
//! offsets and sizes of four per-class index tables that can only be
//! computed once every point is known, so the records are collected in
//! memory, sorted alphabetically by title, and written in one pass on
//! flush.
use loggerkit_core::bitconverter::{fill_fixed_field, write_u24_be};
use loggerkit_core::errors::*;
use loggerkit_core::io::ObjectWriter;
use loggerkit_core::record_structs::*;
use loggerkit_core::turnpoint::TurnPoint;

use num::ToPrimitive;
use tinyvec::TinyVec;

use std::io::Write;

type RecordBytes = TinyVec<[u8; 64]>;

fn record_to_bytes(record: &DabRecord) -> RecordBytes {
    let mut bytes = RecordBytes::default();
    bytes.extend_from_slice(&record.latitude.to_be_bytes());
    bytes.extend_from_slice(&record.longitude.to_be_bytes());
    bytes.extend_from_slice(&record.altitude.to_be_bytes());
    bytes.push(record.kind);
    bytes.push(0);
    bytes.extend_from_slice(&write_u24_be(record.frequency_khz));
    bytes.extend_from_slice(&record.title);
    bytes.extend_from_slice(&record.description);
    bytes.push(record.rwy1);
    bytes.push(record.rwy2);
    bytes.extend_from_slice(&[0, 0, 0]);
    bytes
}

/// Milli-arcminutes to the stored 1/600 arc minute unit, rounding to
/// nearest. The rounding is sign-symmetric; truncating the biased
/// quotient would push every negative coordinate off by one unit.
fn to_stored_angle(milliminutes: i32) -> i32 {
    let sign = if milliminutes < 0 { -1i64 } else { 1 };
    (sign * ((milliminutes as i64 * sign * 600 + 500) / 1000)) as i32
}

pub struct CenfisDatabaseWriter<W> {
    stream: W,
    flushed: bool,
    records: Vec<DabRecord>,
}

impl<W: Write> CenfisDatabaseWriter<W> {
    pub fn new(stream: W) -> Self {
        CenfisDatabaseWriter {
            stream,
            flushed: false,
            records: Vec::new(),
        }
    }

    pub fn stream_mut(&mut self) -> &mut W {
        &mut self.stream
    }

    fn build_header(&self, offsets: &[Vec<u32>; 4]) -> Vec<u8> {
        let mut header = vec![0xffu8; DAB_HEADER_LEN];
        header[0..2].copy_from_slice(&DAB_MAGIC_1.to_le_bytes());
        header[8..10].copy_from_slice(&DAB_MAGIC_2.to_le_bytes());

        let record_area_end =
            (DAB_HEADER_LEN + DAB_RECORD_LEN * self.records.len()) as u32;
        let mut table_offset = record_area_end + DAB_FILLER_LEN as u32;
        for (i, table) in offsets.iter().enumerate() {
            let at = DAB_TABLES_OFFSET + 8 * i;
            header[at..at + 4].copy_from_slice(&table_offset.to_be_bytes());
            header[at + 4..at + 6].copy_from_slice(&3u16.to_be_bytes());
            header[at + 6..at + 8].copy_from_slice(&(table.len() as u16).to_be_bytes());
            table_offset += (table.len() * DAB_TABLE_ENTRY_LEN) as u32;
        }

        let at = DAB_COUNTS_OFFSET;
        header[at..at + 4].copy_from_slice(&(DAB_HEADER_LEN as u32).to_be_bytes());
        header[at + 4..at + 6].copy_from_slice(&0x30u16.to_be_bytes());
        header[at + 6..at + 8].copy_from_slice(&(self.records.len() as u16).to_be_bytes());
        header[at + 8..at + 10].copy_from_slice(&7u16.to_be_bytes());
        header[at + 10..at + 12].copy_from_slice(&[0, 0]);
        header[at + 12..at + 16].copy_from_slice(&[0, 0, 0, 0]);
        header[at + 16..at + 20].copy_from_slice(&record_area_end.to_be_bytes());
        header[at + 20..at + 22].copy_from_slice(&0x21u16.to_be_bytes());
        header[at + 22..at + 24].copy_from_slice(&0x0au16.to_be_bytes());

        header
    }
}

impl<W: Write> ObjectWriter<TurnPoint> for CenfisDatabaseWriter<W> {
    fn write(&mut self, tp: &TurnPoint) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }
        if self.records.len() >= 0xffff {
            return Err(LkError::container_full("too many turn points"));
        }

        let mut record = DabRecord {
            title: [b' '; DAB_TITLE_LEN],
            description: [b' '; DAB_DESCRIPTION_LEN],
            ..DabRecord::default()
        };

        record.kind = DabPointKind::from_turn_point_type(tp.kind)
            .and_then(|k| k.to_u8())
            .unwrap_or(0);

        if let Some(position) = &tp.position {
            record.latitude = to_stored_angle(position.latitude().value());
            record.longitude = to_stored_angle(-position.longitude().value());
            if let Some(altitude) = &position.altitude {
                record.altitude = altitude.value as u16;
            }
        }

        if let Some(frequency) = &tp.frequency {
            record.frequency_khz = frequency.kilohertz();
        }

        fill_fixed_field(&mut record.title, &tp.full_name);
        fill_fixed_field(&mut record.description, &tp.description);

        if let Some(direction) = tp.runway.direction {
            record.rwy1 = direction;
        }

        self.records.push(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }
        self.flushed = true;

        // Sort alphabetically by title, then assign each record to its
        // class table.
        self.records.sort_by(|a, b| a.title.cmp(&b.title));

        let mut offsets: [Vec<u32>; 4] = Default::default();
        for (i, record) in self.records.iter().enumerate() {
            if let Some(table) = dab_table_index(record.kind) {
                offsets[table].push((DAB_HEADER_LEN + DAB_RECORD_LEN * i) as u32);
            }
        }

        let header = self.build_header(&offsets);
        self.stream.write_all(&header)?;

        for record in &self.records {
            self.stream.write_all(&record_to_bytes(record))?;
        }

        self.stream.write_all(&[0xffu8; DAB_FILLER_LEN])?;

        // The 23-bit offset split of the table entries is the
        // device's, odd as it looks; it must not be "fixed".
        for table in &offsets {
            for &offset in table {
                let entry = [
                    (offset >> 15) as u8,
                    ((offset >> 8) & 0x7f) as u8,
                    offset as u8,
                ];
                self.stream.write_all(&entry)?;
            }
        }

        self.stream.flush()?;
        Ok(())
    }
}
