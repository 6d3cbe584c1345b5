//! Reader for the Cenfis turn point database. The 512-byte header is
//! parsed and validated up front; the records follow it back to back,
//! so the index tables at the end of the file never need to be
//! consulted for a sequential read.
use loggerkit_core::bitconverter::*;
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::*;
use loggerkit_core::io::ObjectReader;
use loggerkit_core::record_structs::*;
use loggerkit_core::turnpoint::*;
use loggerkit_core::Frequency;

use std::io::Read;

use crate::filser_db::read_record_bytes;

/// Parse and validate the file header.
fn read_header(stream: &mut impl Read) -> Result<DabHeader, LkError> {
    let mut buf = [0u8; DAB_HEADER_LEN];
    if !read_record_bytes(stream, &mut buf)? {
        return Err(LkError::malformed("failed to read header"));
    }

    // The two magic words are the one little-endian exception in this
    // format.
    if read_u16_le(&buf[0..2])? != DAB_MAGIC_1 || read_u16_le(&buf[8..10])? != DAB_MAGIC_2 {
        return Err(LkError::malformed("wrong magic"));
    }

    if read_u32_be(&buf[DAB_COUNTS_OFFSET..])? != DAB_HEADER_LEN as u32 {
        return Err(LkError::malformed("wrong header size"));
    }

    let mut header = DabHeader::default();
    for (i, table) in header.tables.iter_mut().enumerate() {
        let at = DAB_TABLES_OFFSET + 8 * i;
        table.offset = read_u32_be(&buf[at..])?;
        table.count = read_u16_be(&buf[at + 6..])?;
    }
    header.overall_count = read_u16_be(&buf[DAB_COUNTS_OFFSET + 6..])?;
    header.after_tp_offset = read_u32_be(&buf[DAB_COUNTS_OFFSET + 16..])?;

    let expected = DAB_HEADER_LEN as u32 + DAB_RECORD_LEN as u32 * header.overall_count as u32;
    if header.after_tp_offset != expected {
        return Err(LkError::malformed("wrong record area size"));
    }

    Ok(header)
}

fn parse_record(buf: &[u8]) -> Result<DabRecord, LkError> {
    let mut record = DabRecord::default();
    record.latitude = read_i32_be(&buf[0..4])?;
    record.longitude = read_i32_be(&buf[4..8])?;
    record.altitude = read_u16_be(&buf[8..10])?;
    record.kind = buf[10];
    record.frequency_khz = read_u24_be(&buf[12..15])?;
    record.title.copy_from_slice(&buf[15..15 + DAB_TITLE_LEN]);
    record
        .description
        .copy_from_slice(&buf[29..29 + DAB_DESCRIPTION_LEN]);
    record.rwy1 = buf[43];
    record.rwy2 = buf[44];
    Ok(record)
}

fn to_turn_point(record: &DabRecord) -> TurnPoint {
    let mut tp = TurnPoint::default();

    // Coordinates are in 1/600 of an arc minute, longitude
    // east-negative.
    let latitude = Latitude::from_value(record.latitude, 600);
    let longitude = Longitude::from_value(-record.longitude, 600);
    let altitude = Altitude::new(
        record.altitude as i32,
        AltitudeUnit::Meters,
        AltitudeRef::Msl,
    );
    tp.position = Some(Position::new(latitude, longitude, Some(altitude)));

    tp.kind = DabPointKind::new(record.kind)
        .map(DabPointKind::to_turn_point_type)
        .unwrap_or(TurnPointType::Unknown);

    tp.frequency = Frequency::from_hertz(record.frequency_khz * 1000);

    let title = trim_fixed_field(&record.title);
    if !title.is_empty() {
        tp.full_name = title;
    }
    let description = trim_fixed_field(&record.description);
    if !description.is_empty() {
        tp.description = description;
    }

    if (1..=36).contains(&record.rwy1) {
        tp.runway = Runway::new(None, Some(record.rwy1), None);
    }

    tp
}

pub struct CenfisDatabaseReader<R> {
    stream: R,
    header: DabHeader,
    current: u16,
}

impl<R: Read> CenfisDatabaseReader<R> {
    pub fn new(mut stream: R) -> Result<Self, LkError> {
        let header = read_header(&mut stream)?;
        Ok(CenfisDatabaseReader {
            stream,
            header,
            current: 0,
        })
    }

    /// The parsed file header, mostly interesting for its table
    /// pointers.
    pub fn header(&self) -> &DabHeader {
        &self.header
    }
}

impl<R: Read> ObjectReader<TurnPoint> for CenfisDatabaseReader<R> {
    fn next(&mut self) -> Option<Result<TurnPoint, LkError>> {
        if self.current >= self.header.overall_count {
            return None;
        }

        let mut buf = [0u8; DAB_RECORD_LEN];
        match read_record_bytes(&mut self.stream, &mut buf) {
            Ok(true) => {}
            Ok(false) => return Some(Err(LkError::malformed("failed to read data"))),
            Err(e) => return Some(Err(e)),
        }
        self.current += 1;

        Some(parse_record(&buf).map(|record| to_turn_point(&record)))
    }
}
