//! Reader for the hex-wrapped Cenfis turn point database: the whole
//! stream is an Intel-HEX image of a `dab` file, so it is reassembled
//! into memory first and then handed to the database reader.
use crate::cenfis_db::CenfisDatabaseReader;
use crate::hexfile::{HexAssembler, HexDecoder};

use loggerkit_core::errors::*;
use loggerkit_core::io::ObjectReader;
use loggerkit_core::turnpoint::TurnPoint;

use std::io::{Cursor, Read};

pub struct CenfisHexTurnPointReader {
    inner: CenfisDatabaseReader<Cursor<Vec<u8>>>,
}

impl CenfisHexTurnPointReader {
    pub fn new(mut stream: impl Read) -> Result<Self, LkError> {
        let mut decoder = HexDecoder::new();
        let mut assembler = HexAssembler::new(0);

        let mut buffer = [0u8; 4096];
        loop {
            let n = stream.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            decoder.feed(&buffer[..n], &mut |record_type, address, payload| {
                assembler.handle(record_type, address, payload)
            })?;
        }
        decoder.close()?;

        let data = assembler.into_data()?;
        let inner = CenfisDatabaseReader::new(Cursor::new(data))?;

        Ok(CenfisHexTurnPointReader { inner })
    }
}

impl ObjectReader<TurnPoint> for CenfisHexTurnPointReader {
    fn next(&mut self) -> Option<Result<TurnPoint, LkError>> {
        self.inner.next()
    }
}
