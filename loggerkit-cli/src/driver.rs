//! The one-shot conversion driver: pick the input format by extension,
//! thread the reader through the requested filters, pump everything
//! into the writer, flush. If anything goes wrong after an output file
//! has been created, the partial file is deleted before the error is
//! reported.
use crate::registry::FormatRegistry;

use loggerkit_core::errors::*;
use loggerkit_core::io::{BoxReader, BoxWriter};

use log::debug;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// A filter constructor: `(name, reader, args)` to a wrapped reader.
/// Object kinds without filters pass a constructor that always fails.
pub type FilterFactory<T> = fn(&str, BoxReader<T>, Option<&str>) -> Result<BoxReader<T>, LkError>;

pub struct ConvertOptions {
    /// `-o`: the output file; its extension names the format.
    pub output: Option<PathBuf>,
    /// `-f`: write to stdout in this format instead.
    pub format: Option<String>,
    /// `-F`: filter specs, `NAME` or `NAME:ARGS`, applied in order.
    pub filters: Vec<String>,
    pub inputs: Vec<PathBuf>,
}

/// The lowercased filename extension, which doubles as the format
/// token.
pub fn format_token(path: &Path) -> Result<String, LkError> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| {
            LkError::malformed(format!("no filename extension in {}", path.display()))
        })
}

fn apply_filters<T>(
    mut reader: BoxReader<T>,
    filters: &[String],
    factory: FilterFactory<T>,
) -> Result<BoxReader<T>, LkError> {
    for spec in filters {
        let (name, args) = match spec.find(':') {
            Some(colon) => (&spec[..colon], Some(&spec[colon + 1..])),
            None => (spec.as_str(), None),
        };
        debug!("applying filter '{}'", name);
        reader = factory(name, reader, args)?;
    }
    Ok(reader)
}

fn pump<T>(
    registry: &FormatRegistry<T>,
    options: &ConvertOptions,
    filter_factory: FilterFactory<T>,
    mut writer: BoxWriter<T>,
) -> Result<(), LkError> {
    for input in &options.inputs {
        let token = format_token(input)?;
        debug!("reading {} as '{}'", input.display(), token);

        let stream = BufReader::new(File::open(input)?);
        let reader = registry.create_reader(&token, Box::new(stream))?;
        let mut reader = apply_filters(reader, &options.filters, filter_factory)?;

        while let Some(object) = reader.next() {
            writer.write(&object?)?;
        }
    }

    writer.flush()
}

/// Run one conversion. Returns the error that ended it, with any
/// partially written output file already unlinked.
pub fn convert<T>(
    registry: &FormatRegistry<T>,
    options: &ConvertOptions,
    filter_factory: FilterFactory<T>,
) -> Result<(), LkError> {
    let result = match &options.output {
        Some(path) => {
            let token = format_token(path)?;
            let stream = BufWriter::new(File::create(path)?);
            let writer = registry.create_writer(&token, Box::new(stream));

            writer
                .and_then(|writer| pump(registry, options, filter_factory, writer))
                .map_err(|e| {
                    let _ = std::fs::remove_file(path);
                    e
                })
        }
        None => {
            let token = options
                .format
                .as_deref()
                .ok_or_else(|| LkError::malformed("no output format specified"))?;
            let writer = registry.create_writer(token, Box::new(std::io::stdout()))?;
            pump(registry, options, filter_factory, writer)
        }
    };

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{airspace_registry, turnpoint_registry};

    use loggerkit_core::airspace::Airspace;
    use loggerkit_in::filter::create_turnpoint_filter;

    fn no_filter<T>(
        name: &str,
        _reader: BoxReader<T>,
        _args: Option<&str>,
    ) -> Result<BoxReader<T>, LkError> {
        Err(LkError::malformed(format!("No such filter: {}", name)))
    }

    #[test]
    fn format_token_is_the_lowercased_extension() {
        assert_eq!(format_token(Path::new("dir/points.CUP")).unwrap(), "cup");
        assert_eq!(format_token(Path::new("a.da4")).unwrap(), "da4");
        assert!(format_token(Path::new("no_extension")).is_err());
    }

    #[test]
    fn converts_a_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.cup");
        std::fs::write(
            &input,
            "Title,Code,Latitude,Longitude\n\"Foo\",\"FOO\",5012.345N,00823.456E\r\n",
        )
        .unwrap();
        let output = dir.path().join("out.cup");

        let options = ConvertOptions {
            output: Some(output.clone()),
            format: None,
            filters: Vec::new(),
            inputs: vec![input],
        };
        convert(&turnpoint_registry(), &options, create_turnpoint_filter).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("\"Foo\",\"FOO\""));
        assert!(text.ends_with("-----Related Tasks-----\r\n"));
    }

    #[test]
    fn name_filter_reduces_the_stream() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.cup");
        std::fs::write(
            &input,
            "Title,Code\n\"Foo\",\"FOO\"\r\n\"Bar\",\"BAR\"\r\n",
        )
        .unwrap();
        let output = dir.path().join("out.cup");

        let options = ConvertOptions {
            output: Some(output.clone()),
            format: None,
            filters: vec!["name:BAR".to_string()],
            inputs: vec![input],
        };
        convert(&turnpoint_registry(), &options, create_turnpoint_filter).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(!text.contains("\"Foo\""));
        assert!(text.contains("\"Bar\""));
    }

    #[test]
    fn read_only_format_fails_and_unlinks_the_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.asa");

        let options = ConvertOptions {
            output: Some(output.clone()),
            format: None,
            filters: Vec::new(),
            inputs: vec![dir.path().join("in.txt")],
        };
        let result = convert(&airspace_registry(), &options, no_filter::<Airspace>);

        assert!(matches!(
            result,
            Err(LkError::UnsupportedDirection { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn malformed_input_unlinks_the_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.dab");
        std::fs::write(&input, b"not a cenfis database").unwrap();
        let output = dir.path().join("out.cup");

        let options = ConvertOptions {
            output: Some(output.clone()),
            format: None,
            filters: Vec::new(),
            inputs: vec![input],
        };
        let result = convert(&turnpoint_registry(), &options, create_turnpoint_filter);

        assert!(result.is_err());
        assert!(!output.exists());
    }
}
