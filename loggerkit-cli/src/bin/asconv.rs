//! Convert airspace files between file formats.
use clap::Parser;
use log::error;

use loggerkit_cli::driver::{convert, ConvertOptions};
use loggerkit_cli::registry::airspace_registry;

use loggerkit_core::airspace::Airspace;
use loggerkit_core::errors::LkError;
use loggerkit_core::io::BoxReader;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "asconv")]
#[command(about = "Convert airspace files between file formats", long_about = None)]
struct Cli {
    /// Write output to this file; the format is taken from its extension
    #[arg(short = 'o', value_name = "FILE", conflicts_with = "format")]
    output: Option<PathBuf>,

    /// Write to standard output with this format
    #[arg(short = 'f', value_name = "FORMAT")]
    format: Option<String>,

    /// Apply a filter, NAME or NAME:ARGS; may be repeated
    #[arg(short = 'F', value_name = "FILTER")]
    filter: Vec<String>,

    /// Input files
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,
}

fn no_airspace_filter(
    name: &str,
    _reader: BoxReader<Airspace>,
    _args: Option<&str>,
) -> Result<BoxReader<Airspace>, LkError> {
    Err(LkError::malformed(format!("No such filter: {}", name)))
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if cli.output.is_none() && cli.format.is_none() {
        eprintln!("asconv: no output file or format specified");
        std::process::exit(1);
    }

    let options = ConvertOptions {
        output: cli.output,
        format: cli.format,
        filters: cli.filter,
        inputs: cli.inputs,
    };

    let registry = airspace_registry();
    if let Err(e) = convert(&registry, &options, no_airspace_filter) {
        error!("conversion failed: {}", e);
        eprintln!("asconv: {}", e);
        std::process::exit(2);
    }
}
