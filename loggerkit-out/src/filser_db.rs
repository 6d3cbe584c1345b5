// Copyright (C) 2022 by GiGa infosystems
//! Writer for the Filser DA4 turn point database: exactly 600 record
//! slots, padded with invalid records, then the zeroed task area.
use loggerkit_core::bitconverter::fill_fixed_field;
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::{AltitudeRef, AltitudeUnit};
use loggerkit_core::io::ObjectWriter;
use loggerkit_core::record_structs::*;
use loggerkit_core::turnpoint::{RunwaySurface, TurnPoint, TurnPointType};

use tinyvec::TinyVec;

use std::io::Write;

type RecordBytes = TinyVec<[u8; DA4_RECORD_LEN]>;

fn record_to_bytes(tp: &TurnPoint) -> RecordBytes {
    let mut code = [b' '; DA4_CODE_LEN];
    fill_fixed_field(&mut code, &tp.abbreviated_name(DA4_CODE_LEN));

    let mut bytes = RecordBytes::default();
    bytes.push(1); // validity
    bytes.extend_from_slice(&code);
    bytes.push(0);

    let (latitude, longitude) = match &tp.position {
        Some(position) => (
            position.latitude().value() as f32 / 60_000.0,
            position.longitude().value() as f32 / 60_000.0,
        ),
        None => (0.0, 0.0),
    };
    bytes.extend_from_slice(&latitude.to_le_bytes());
    bytes.extend_from_slice(&longitude.to_le_bytes());

    let altitude_ft = tp
        .position
        .as_ref()
        .and_then(|p| p.altitude)
        .filter(|a| a.reference == AltitudeRef::Msl)
        .map(|a| a.to_unit(AltitudeUnit::Feet).value as u16)
        .unwrap_or(0);
    bytes.extend_from_slice(&altitude_ft.to_be_bytes());

    let mhz = tp
        .frequency
        .map(|f| f.hertz() as f32 / 1e6)
        .unwrap_or(0.0);
    bytes.extend_from_slice(&mhz.to_le_bytes());

    let surface = if tp.kind == TurnPointType::Outlanding {
        b'S'
    } else {
        match tp.runway.surface {
            Some(RunwaySurface::Grass) => b'G',
            Some(RunwaySurface::Asphalt) => b'C',
            None => b'V',
        }
    };
    bytes.push(surface);
    bytes.push(tp.runway.direction.unwrap_or(0));

    let length_ft = tp
        .runway
        .length
        .map(|meters| (meters as f64 * 3.28) as u16)
        .unwrap_or(0);
    bytes.extend_from_slice(&length_ft.to_be_bytes());

    bytes
}

pub struct FilserTurnPointWriter<W> {
    stream: W,
    flushed: bool,
    count: usize,
}

impl<W: Write> FilserTurnPointWriter<W> {
    pub fn new(stream: W) -> Self {
        FilserTurnPointWriter {
            stream,
            flushed: false,
            count: 0,
        }
    }
}

impl<W: Write> ObjectWriter<TurnPoint> for FilserTurnPointWriter<W> {
    fn write(&mut self, tp: &TurnPoint) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }
        if self.count >= DA4_RECORD_COUNT {
            return Err(LkError::container_full(
                "Filser databases cannot hold more than 600 turn points",
            ));
        }

        self.stream.write_all(&record_to_bytes(tp))?;
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }
        self.flushed = true;

        let empty = [0u8; DA4_RECORD_LEN];
        while self.count < DA4_RECORD_COUNT {
            self.stream.write_all(&empty)?;
            self.count += 1;
        }

        self.stream.write_all(&[0u8; DA4_TRAILER_LEN])?;
        self.stream.flush()?;
        Ok(())
    }
}
