// Copyright (C) 2022 by GiGa infosystems
//! Writer for the Cenfis airspace database. Airspace records are
//! collected into a primary buffer, a parallel index buffer records
//! each record's offset, and a constant config block follows; on flush
//! the three region descriptors are patched into the 512-byte file
//! header and everything is written out with the bank rule applied.
//!
//! The vertex state (first vertex, running coordinate sums) survives
//! across records on purpose: a record whose raw type string carries
//! the leading-underscore marker has no starting vertex of its own and
//! continues the polygon of its predecessor, exactly like the device
//! files it mirrors.
use crate::cenfis_buffer::CenfisBuffer;
use crate::cenfis_crypto::cenfis_encrypt;

use loggerkit_core::airspace::*;
use loggerkit_core::bitconverter::write_u24_be;
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::{AltitudeRef, Latitude, Longitude, SurfacePosition};
use loggerkit_core::io::ObjectWriter;
use loggerkit_core::record_structs::*;

use std::io::Write;

fn class_to_string(class: AirspaceClass) -> &'static str {
    match class {
        AirspaceClass::Unknown => "unknown",
        AirspaceClass::Alpha => "A",
        AirspaceClass::Bravo => "B",
        AirspaceClass::Charly => "C",
        AirspaceClass::Delta => "D",
        AirspaceClass::EchoLow | AirspaceClass::EchoHigh => "E",
        AirspaceClass::Fox => "F",
        AirspaceClass::Ctr => "CTR",
        AirspaceClass::Tmz => "TMZ",
        AirspaceClass::Restricted => "R",
        AirspaceClass::Danger => "D",
        AirspaceClass::Glider => "glider",
    }
}

/// Split off everything up to the first pipe; the remainder stays in
/// the second half.
fn pipe_split(input: &mut String) -> String {
    match input.find('|') {
        Some(pos) => {
            let tail = input[pos + 1..].to_string();
            input.truncate(pos);
            tail
        }
        None => String::new(),
    }
}

fn align_up(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) / alignment * alignment
}

pub struct CenfisAirspaceWriter<W> {
    stream: W,
    flushed: bool,
    first: bool,
    airspace_buffer: CenfisBuffer,
    index_buffer: Vec<u8>,
    first_vertex: Option<SurfacePosition>,
    last_vertex: Option<SurfacePosition>,
    latitude_sum: i64,
    longitude_sum: i64,
    num_vertices: i64,
}

impl<W: Write> CenfisAirspaceWriter<W> {
    pub fn new(stream: W) -> Self {
        CenfisAirspaceWriter {
            stream,
            flushed: false,
            first: true,
            airspace_buffer: CenfisBuffer::with_base(CENFIS_FILE_HEADER_LEN),
            index_buffer: Vec::new(),
            first_vertex: None,
            last_vertex: None,
            latitude_sum: 0,
            longitude_sum: 0,
            num_vertices: 0,
        }
    }

    pub fn stream_mut(&mut self) -> &mut W {
        &mut self.stream
    }

    fn append_vertices(
        &mut self,
        header: &mut CenfisRecordHeader,
        body: &mut CenfisBuffer,
        airspace: &Airspace,
        has_first: bool,
    ) -> Result<(), LkError> {
        if has_first {
            self.first_vertex = None;
            self.last_vertex = None;
        }

        let mut l_size_offset = None;

        for edge in &airspace.edges {
            let end = match edge {
                Edge::Vertex { end } => end,
                // Circles and arcs have no binary rendition in these
                // files; the device gets them pre-flattened.
                _ => continue,
            };

            match self.last_vertex {
                None => {
                    header.s = (CENFIS_RECORD_HEADER_LEN + body.tell()) as u16;
                    body.append_first_vertex(end);
                    self.first_vertex = Some(*end);
                    self.latitude_sum = end.latitude.value() as i64;
                    self.longitude_sum = end.longitude.value() as i64;
                    self.num_vertices = 1;

                    header.l = (CENFIS_RECORD_HEADER_LEN + body.tell()) as u16;
                    l_size_offset = Some(body.tell());
                    body.append_byte(0xff);
                }
                Some(rel) => {
                    body.append_delta_vertex(end, &rel);
                    self.latitude_sum += end.latitude.value() as i64;
                    self.longitude_sum += end.longitude.value() as i64;
                    self.num_vertices += 1;
                }
            }
            self.last_vertex = Some(*end);
        }

        if let Some(offset) = l_size_offset {
            let size = body.tell() - offset - 1;
            if size > 0xff {
                return Err(LkError::container_full("vertex list overflow"));
            }
            body.patch_byte(offset, size as u8);
        }

        // The anchor point: tag 4 and the vertex average, relative to
        // the first vertex.
        if let Some(first) = self.first_vertex {
            header.ap = (CENFIS_RECORD_HEADER_LEN + body.tell()) as u16;
            body.append_byte(4);
            let anchor = SurfacePosition::new(
                Latitude::from_milliminutes((self.latitude_sum / self.num_vertices) as i32),
                Longitude::from_milliminutes((self.longitude_sum / self.num_vertices) as i32),
            );
            body.append_delta_vertex(&anchor, &first);
        }

        Ok(())
    }
}

impl<W: Write> ObjectWriter<Airspace> for CenfisAirspaceWriter<W> {
    fn write(&mut self, airspace: &Airspace) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }

        let mut name = airspace.name.to_ascii_uppercase();
        let mut name2 = pipe_split(&mut name);
        let mut name3 = pipe_split(&mut name2);
        let mut name4 = pipe_split(&mut name3);
        let mut type_string = pipe_split(&mut name4);

        let mut header = CenfisRecordHeader::default();
        let mut body = CenfisBuffer::new();
        let index = |body: &CenfisBuffer| (CENFIS_RECORD_HEADER_LEN + body.tell()) as u16;

        // AC: the raw type string when the source carried one, else
        // our own class name. The underscore marker means "no explicit
        // starting vertex".
        let mut has_first = true;
        header.ac = index(&body);
        if !type_string.is_empty() {
            if let Some(stripped) = type_string.strip_prefix('_') {
                has_first = false;
                type_string = stripped.to_string();
            }
            body.append_pascal(&type_string)?;
        } else {
            body.append_pascal(class_to_string(airspace.class))?;
        }

        if self.first {
            header.file_info = index(&body);
            body.append_pascal("ASP_X304.BHF29-7-2007   ")?;
            self.first = false;
        }

        // AN block. The dash marker on the second component means the
        // device emitted AN4 before AN2, so AN2 goes last.
        header.an = index(&body);
        body.append_pascal(&name)?;

        let late_an2 = name2.strip_prefix('-').map(str::to_string);
        if !name2.is_empty() && late_an2.is_none() {
            header.an2 = index(&body);
            body.append_pascal(&name2)?;
        }
        if !name3.is_empty() {
            header.an3 = index(&body);
            body.append_pascal(&name3)?;
        }
        if !name4.is_empty() {
            header.an4 = index(&body);
            body.append_pascal(&name4)?;
        }
        if let Some(an2) = late_an2 {
            header.an2 = index(&body);
            body.append_pascal(&an2)?;
        }

        if let Some(bottom) = &airspace.bottom {
            if bottom.reference != AltitudeRef::Gnd || bottom.value != 0 {
                header.al = index(&body);
                body.append_altitude(bottom);
            }
        }
        if let Some(top) = &airspace.top {
            header.ah = index(&body);
            body.append_altitude(top);
        }

        if let Some(frequency) = &airspace.frequency {
            header.fis = index(&body);
            body.append(&write_u24_be(frequency.kilohertz()));
        }

        if airspace.voice != 0 {
            header.voice = index(&body);
            body.append_short(airspace.voice);
        }

        self.append_vertices(&mut header, &mut body, airspace, has_first)?;

        let rec_length = CENFIS_RECORD_HEADER_LEN + body.tell();
        if rec_length > u16::MAX as usize {
            return Err(LkError::container_full("airspace record too long"));
        }
        header.rec_length = rec_length as u16;

        let mut record = CenfisBuffer::new();
        for field in header.fields().iter() {
            record.append_short(*field);
        }
        record.append(body.data());

        self.index_buffer.extend_from_slice(
            &((CENFIS_FILE_HEADER_LEN + self.airspace_buffer.tell()) as u16).to_be_bytes(),
        );
        self.airspace_buffer.append_buffer(&record);

        Ok(())
    }

    fn flush(&mut self) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }
        self.flushed = true;

        let mut config = vec![0x00u8];
        config.resize(CENFIS_CONFIG_LEN, 0x01);
        cenfis_encrypt(&mut config);

        let record_count = (self.index_buffer.len() / 2) as u16;

        // The airspace region is padded up to the next bank so the
        // index starts on a bank boundary.
        let asp_len = self.airspace_buffer.tell();
        let index_offset = align_up(CENFIS_FILE_HEADER_LEN + asp_len, BANK_SIZE);
        self.airspace_buffer
            .fill(0xff, index_offset - CENFIS_FILE_HEADER_LEN - asp_len);

        let mut config_offset = index_offset + self.index_buffer.len();
        let config_padding = if config_offset / BANK_SIZE != (config_offset + config.len()) / BANK_SIZE
        {
            let padded = align_up(config_offset, BANK_SIZE);
            let padding = padded - config_offset;
            config_offset = padded;
            padding
        } else {
            0
        };

        let mut header = vec![0xffu8; CENFIS_FILE_HEADER_LEN];
        let mut patch_pointer = |at: usize, pointer: CenfisRegionPointer| {
            header[at..at + 4].copy_from_slice(&pointer.offset.to_be_bytes());
            header[at + 4..at + 6].copy_from_slice(&pointer.total_size.to_be_bytes());
            header[at + 6..at + 8].copy_from_slice(&pointer.num_elements.to_be_bytes());
        };
        patch_pointer(
            0x40,
            CenfisRegionPointer {
                offset: CENFIS_AIRSPACE_BASE + CENFIS_FILE_HEADER_LEN as u32,
                total_size: asp_len as u16,
                num_elements: record_count,
            },
        );
        patch_pointer(
            0x48,
            CenfisRegionPointer {
                offset: config_offset as u32,
                total_size: config.len() as u16,
                num_elements: (config.len() / 4) as u16,
            },
        );
        patch_pointer(
            0x140,
            CenfisRegionPointer {
                offset: index_offset as u32,
                total_size: self.index_buffer.len() as u16,
                num_elements: record_count,
            },
        );

        self.stream.write_all(&header)?;
        self.stream.write_all(self.airspace_buffer.data())?;
        self.stream.write_all(&self.index_buffer)?;
        if config_padding > 0 {
            self.stream.write_all(&vec![0xffu8; config_padding])?;
        }
        self.stream.write_all(&config)?;
        self.stream.flush()?;

        Ok(())
    }
}
