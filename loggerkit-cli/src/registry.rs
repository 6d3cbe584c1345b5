//! The format registries: one for turn points, one for airspaces,
//! both instances of the same token → reader/writer-factory map.
//! Tokens are lowercased filename extensions or explicit short names;
//! one format may answer to several tokens.
use fnv::FnvHashMap;

use loggerkit_core::airspace::Airspace;
use loggerkit_core::errors::*;
use loggerkit_core::io::{BoxReader, BoxWriter};
use loggerkit_core::turnpoint::TurnPoint;

use loggerkit_in as input;
use loggerkit_out as output;

use std::io::{BufRead, Write};

pub type ReaderFactory<T> = fn(Box<dyn BufRead>) -> Result<BoxReader<T>, LkError>;
pub type WriterFactory<T> = fn(Box<dyn Write>) -> Result<BoxWriter<T>, LkError>;

struct FormatEntry<T> {
    reader: Option<ReaderFactory<T>>,
    writer: Option<WriterFactory<T>>,
}

pub struct FormatRegistry<T> {
    formats: FnvHashMap<&'static str, FormatEntry<T>>,
}

impl<T> FormatRegistry<T> {
    fn new() -> Self {
        FormatRegistry {
            formats: FnvHashMap::default(),
        }
    }

    fn register(
        &mut self,
        tokens: &[&'static str],
        reader: Option<ReaderFactory<T>>,
        writer: Option<WriterFactory<T>>,
    ) {
        for token in tokens {
            self.formats.insert(*token, FormatEntry { reader, writer });
        }
    }

    pub fn knows(&self, token: &str) -> bool {
        self.formats.contains_key(token.to_lowercase().as_str())
    }

    /// Open a reader over `stream`, or fail with
    /// [`LkError::UnsupportedDirection`] when the format is write-only
    /// or unknown.
    pub fn create_reader(
        &self,
        token: &str,
        stream: Box<dyn BufRead>,
    ) -> Result<BoxReader<T>, LkError> {
        let unsupported = || LkError::UnsupportedDirection {
            token: token.to_string(),
            direction: "reading",
        };

        let entry = self
            .formats
            .get(token.to_lowercase().as_str())
            .ok_or_else(unsupported)?;
        let factory = entry.reader.ok_or_else(unsupported)?;
        factory(stream)
    }

    /// Open a writer over `stream`; the write-direction counterpart of
    /// [`FormatRegistry::create_reader`].
    pub fn create_writer(
        &self,
        token: &str,
        stream: Box<dyn Write>,
    ) -> Result<BoxWriter<T>, LkError> {
        let unsupported = || LkError::UnsupportedDirection {
            token: token.to_string(),
            direction: "writing",
        };

        let entry = self
            .formats
            .get(token.to_lowercase().as_str())
            .ok_or_else(unsupported)?;
        let factory = entry.writer.ok_or_else(unsupported)?;
        factory(stream)
    }
}

fn seeyou_reader(stream: Box<dyn BufRead>) -> Result<BoxReader<TurnPoint>, LkError> {
    Ok(Box::new(input::seeyou::SeeYouTurnPointReader::new(stream)?))
}

fn seeyou_writer(stream: Box<dyn Write>) -> Result<BoxWriter<TurnPoint>, LkError> {
    Ok(Box::new(output::seeyou::SeeYouTurnPointWriter::new(
        stream,
    )?))
}

fn cenfis_text_reader(stream: Box<dyn BufRead>) -> Result<BoxReader<TurnPoint>, LkError> {
    Ok(Box::new(input::cenfis_text::CenfisTurnPointReader::new(
        stream,
    )))
}

fn cenfis_text_writer(stream: Box<dyn Write>) -> Result<BoxWriter<TurnPoint>, LkError> {
    Ok(Box::new(output::cenfis_text::CenfisTurnPointWriter::new(
        stream,
    )?))
}

fn cenfis_db_reader(stream: Box<dyn BufRead>) -> Result<BoxReader<TurnPoint>, LkError> {
    Ok(Box::new(input::cenfis_db::CenfisDatabaseReader::new(
        stream,
    )?))
}

fn cenfis_db_writer(stream: Box<dyn Write>) -> Result<BoxWriter<TurnPoint>, LkError> {
    Ok(Box::new(output::cenfis_db::CenfisDatabaseWriter::new(
        stream,
    )))
}

fn cenfis_hex_reader(stream: Box<dyn BufRead>) -> Result<BoxReader<TurnPoint>, LkError> {
    Ok(Box::new(input::cenfis_hex::CenfisHexTurnPointReader::new(
        stream,
    )?))
}

fn cenfis_hex_writer(stream: Box<dyn Write>) -> Result<BoxWriter<TurnPoint>, LkError> {
    Ok(Box::new(output::cenfis_hex::CenfisHexTurnPointWriter::new(
        stream,
    )))
}

fn filser_reader(stream: Box<dyn BufRead>) -> Result<BoxReader<TurnPoint>, LkError> {
    Ok(Box::new(input::filser_db::FilserTurnPointReader::new(
        stream,
    )))
}

fn filser_writer(stream: Box<dyn Write>) -> Result<BoxWriter<TurnPoint>, LkError> {
    Ok(Box::new(output::filser_db::FilserTurnPointWriter::new(
        stream,
    )))
}

fn zander_reader(stream: Box<dyn BufRead>) -> Result<BoxReader<TurnPoint>, LkError> {
    Ok(Box::new(input::zander::ZanderTurnPointReader::new(stream)))
}

fn zander_writer(stream: Box<dyn Write>) -> Result<BoxWriter<TurnPoint>, LkError> {
    Ok(Box::new(output::zander::ZanderTurnPointWriter::new(stream)))
}

/// The turn point formats, keyed by extension.
pub fn turnpoint_registry() -> FormatRegistry<TurnPoint> {
    let mut registry = FormatRegistry::new();
    registry.register(&["cup"], Some(seeyou_reader), Some(seeyou_writer));
    registry.register(
        &["cdb", "idb"],
        Some(cenfis_text_reader),
        Some(cenfis_text_writer),
    );
    registry.register(&["dab"], Some(cenfis_db_reader), Some(cenfis_db_writer));
    registry.register(&["bhf"], Some(cenfis_hex_reader), Some(cenfis_hex_writer));
    registry.register(&["da4"], Some(filser_reader), Some(filser_writer));
    registry.register(&["wz"], Some(zander_reader), Some(zander_writer));
    registry
}

fn openair_reader(stream: Box<dyn BufRead>) -> Result<BoxReader<Airspace>, LkError> {
    Ok(Box::new(input::openair::OpenAirAirspaceReader::new(stream)))
}

fn openair_writer(stream: Box<dyn Write>) -> Result<BoxWriter<Airspace>, LkError> {
    Ok(Box::new(output::openair::OpenAirAirspaceWriter::new(
        stream,
    )?))
}

fn cenfis_airspace_text_reader(stream: Box<dyn BufRead>) -> Result<BoxReader<Airspace>, LkError> {
    Ok(Box::new(
        input::cenfis_airspace_text::CenfisTextAirspaceReader::new(stream),
    ))
}

fn cenfis_airspace_writer(stream: Box<dyn Write>) -> Result<BoxWriter<Airspace>, LkError> {
    Ok(Box::new(output::cenfis_airspace::CenfisAirspaceWriter::new(
        stream,
    )))
}

fn cenfis_airspace_hex_writer(stream: Box<dyn Write>) -> Result<BoxWriter<Airspace>, LkError> {
    Ok(Box::new(output::cenfis_hex::CenfisHexAirspaceWriter::new(
        stream,
    )))
}

fn zander_airspace_writer(stream: Box<dyn Write>) -> Result<BoxWriter<Airspace>, LkError> {
    Ok(Box::new(output::zander_airspace::ZanderAirspaceWriter::new(
        stream,
    )?))
}

/// The airspace formats, keyed by extension. Several of them exist in
/// one direction only.
pub fn airspace_registry() -> FormatRegistry<Airspace> {
    let mut registry = FormatRegistry::new();
    registry.register(
        &["txt", "openair"],
        Some(openair_reader),
        Some(openair_writer),
    );
    registry.register(
        &["asa", "asb"],
        Some(cenfis_airspace_text_reader),
        None,
    );
    registry.register(&["asc", "cenfis"], None, Some(cenfis_airspace_writer));
    registry.register(&["bhf"], None, Some(cenfis_airspace_hex_writer));
    registry.register(&["az"], None, Some(zander_airspace_writer));
    registry
}
