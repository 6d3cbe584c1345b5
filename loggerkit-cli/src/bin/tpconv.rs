//! Convert turn point databases between file formats.
use clap::Parser;
use log::error;

use loggerkit_cli::driver::{convert, ConvertOptions};
use loggerkit_cli::registry::turnpoint_registry;
use loggerkit_in::filter::create_turnpoint_filter;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tpconv")]
#[command(about = "Convert turn point databases between file formats", long_about = None)]
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
        eprintln!("tpconv: no output file or format specified");
        std::process::exit(1);
    }

    let options = ConvertOptions {
        output: cli.output,
        format: cli.format,
        filters: cli.filter,
        inputs: cli.inputs,
    };

    let registry = turnpoint_registry();
    if let Err(e) = convert(&registry, &options, create_turnpoint_filter) {
        error!("conversion failed: {}", e);
        eprintln!("tpconv: {}", e);
        std::process::exit(2);
    }
}
