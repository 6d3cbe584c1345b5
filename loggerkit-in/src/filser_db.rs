//! Reader for the Filser DA4 turn point database: 600 fixed-size
//! records, zero-filled where unused, followed by the task area.
use loggerkit_core::bitconverter::*;
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::*;
use loggerkit_core::io::ObjectReader;
use loggerkit_core::record_structs::*;
use loggerkit_core::turnpoint::*;
use loggerkit_core::Frequency;

use std::io::Read;

/// Fill the whole buffer, distinguishing a clean end of stream (`Ok(false)`)
/// from a short read mid-record.
pub(crate) fn read_record_bytes(stream: &mut impl Read, buf: &mut [u8]) -> Result<bool, LkError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = stream.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(false);
            }
            return Err(LkError::malformed("truncated record at end of stream"));
        }
        filled += n;
    }
    Ok(true)
}

fn parse_record(buf: &[u8]) -> Result<Da4Record, LkError> {
    let mut record = Da4Record::default();
    record.valid = buf[0];
    record.code.copy_from_slice(&buf[1..1 + DA4_CODE_LEN]);
    record.latitude = read_f32_le(&buf[10..14])?;
    record.longitude = read_f32_le(&buf[14..18])?;
    record.altitude_ft = read_u16_be(&buf[18..20])?;
    record.frequency_mhz = read_f32_le(&buf[20..24])?;
    record.surface = buf[24];
    record.direction = buf[25];
    record.length_ft = read_u16_be(&buf[26..28])?;
    Ok(record)
}

fn angle_from_degrees(degrees: f32) -> i32 {
    (degrees as f64 * 60.0 * 1000.0) as i32
}

fn to_turn_point(record: &Da4Record) -> TurnPoint {
    let mut tp = TurnPoint::default();

    let code = trim_fixed_field(&record.code);
    if !code.is_empty() {
        tp.short_name = code;
    }

    let altitude = Altitude::new(
        record.altitude_ft as i32,
        AltitudeUnit::Feet,
        AltitudeRef::Msl,
    );
    tp.position = Some(Position::new(
        Latitude::from_milliminutes(angle_from_degrees(record.latitude)),
        Longitude::from_milliminutes(angle_from_degrees(record.longitude)),
        Some(altitude),
    ));

    tp.frequency = Frequency::from_hertz((record.frequency_mhz as f64 * 1000.0) as u32 * 1000);

    let surface = match record.surface {
        b'G' => Some(RunwaySurface::Grass),
        b'C' => Some(RunwaySurface::Asphalt),
        _ => None,
    };
    if record.surface == b'S' {
        tp.kind = TurnPointType::Outlanding;
    }
    let direction = if (1..=36).contains(&record.direction) {
        Some(record.direction)
    } else {
        None
    };
    let length = if record.length_ft > 0 {
        Some((record.length_ft as f64 / 3.28) as u32)
    } else {
        None
    };
    tp.runway = Runway::new(surface, direction, length);

    tp
}

pub struct FilserTurnPointReader<R> {
    stream: R,
    count: usize,
}

impl<R: Read> FilserTurnPointReader<R> {
    pub fn new(stream: R) -> Self {
        FilserTurnPointReader { stream, count: 0 }
    }
}

impl<R: Read> ObjectReader<TurnPoint> for FilserTurnPointReader<R> {
    fn next(&mut self) -> Option<Result<TurnPoint, LkError>> {
        let mut buf = [0u8; DA4_RECORD_LEN];

        loop {
            if self.count >= DA4_RECORD_COUNT {
                return None;
            }

            match read_record_bytes(&mut self.stream, &mut buf) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return Some(Err(e)),
            }
            self.count += 1;

            // Unused slots have a zero validity byte.
            match parse_record(&buf) {
                Ok(record) if record.valid != 0 => {
                    return Some(Ok(to_turn_point(&record)));
                }
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
