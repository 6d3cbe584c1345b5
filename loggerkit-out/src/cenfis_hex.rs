// Copyright (C) 2022 by GiGa infosystems
//! The hex-wrapped Cenfis writers: the turn point database and the
//! airspace file, each streamed through the Intel-HEX output filter.
//! The airspace image is addressed from bank 0xc, matching the flash
//! region the device loads it into.
use crate::cenfis_airspace::CenfisAirspaceWriter;
use crate::cenfis_db::CenfisDatabaseWriter;
use crate::hexfile::HexWriter;

use loggerkit_core::airspace::Airspace;
use loggerkit_core::errors::*;
use loggerkit_core::io::ObjectWriter;
use loggerkit_core::turnpoint::TurnPoint;

use std::io::Write;

pub struct CenfisHexTurnPointWriter<W: Write> {
    inner: CenfisDatabaseWriter<HexWriter<W>>,
}

impl<W: Write> CenfisHexTurnPointWriter<W> {
    pub fn new(stream: W) -> Self {
        CenfisHexTurnPointWriter {
            inner: CenfisDatabaseWriter::new(HexWriter::new(stream)),
        }
    }
}

impl<W: Write> ObjectWriter<TurnPoint> for CenfisHexTurnPointWriter<W> {
    fn write(&mut self, tp: &TurnPoint) -> Result<(), LkError> {
        self.inner.write(tp)
    }

    fn flush(&mut self) -> Result<(), LkError> {
        self.inner.flush()?;
        self.inner.stream_mut().finish()
    }
}

pub struct CenfisHexAirspaceWriter<W: Write> {
    inner: CenfisAirspaceWriter<HexWriter<W>>,
}

impl<W: Write> CenfisHexAirspaceWriter<W> {
    pub fn new(stream: W) -> Self {
        CenfisHexAirspaceWriter {
            inner: CenfisAirspaceWriter::new(HexWriter::with_segment(stream, 0xc)),
        }
    }
}

impl<W: Write> ObjectWriter<Airspace> for CenfisHexAirspaceWriter<W> {
    fn write(&mut self, airspace: &Airspace) -> Result<(), LkError> {
        self.inner.write(airspace)
    }

    fn flush(&mut self) -> Result<(), LkError> {
        self.inner.flush()?;
        self.inner.stream_mut().finish()
    }
}
