//! Convert an LXN flight log to IGC text.
use clap::Parser;
use log::error;

use loggerkit_core::errors::LkError;
use loggerkit_in::igc::LxnToIgc;

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lxn2igc")]
#[command(about = "Convert an LXN flight log to the IGC format", long_about = None)]
struct Cli {
    /// Write output to this file instead of standard output
    #[arg(short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// The LXN file to convert
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn run(input: &PathBuf, sink: Box<dyn Write>) -> Result<(), LkError> {
    let mut file = File::open(input)?;
    let mut converter = LxnToIgc::new(sink);

    // The decoder consumes what it can and tells us how much of a
    // partial record to carry over into the next chunk.
    let mut pending: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        pending.extend_from_slice(&chunk[..n]);

        match converter.feed(&pending) {
            Ok(consumed) => {
                pending.drain(..consumed);
            }
            Err(LkError::NeedMoreInput { consumed }) => {
                pending.drain(..consumed);
            }
            Err(e) => return Err(e),
        }
    }

    if !pending.is_empty() {
        return Err(LkError::malformed("trailing garbage at end of file"));
    }
    if !converter.is_end() {
        return Err(LkError::malformed("premature end of file"));
    }

    converter.into_inner().flush()?;
    Ok(())
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

    let result = match &cli.output {
        Some(path) => {
            let sink: Box<dyn Write> = match File::create(path) {
                Ok(file) => Box::new(BufWriter::new(file)),
                Err(e) => {
                    eprintln!("lxn2igc: failed to create {}: {}", path.display(), e);
                    std::process::exit(2);
                }
            };
            run(&cli.input, sink).map_err(|e| {
                let _ = std::fs::remove_file(path);
                e
            })
        }
        None => run(&cli.input, Box::new(std::io::stdout())),
    };

    if let Err(e) = result {
        error!("conversion failed: {}", e);
        eprintln!("lxn2igc: {}", e);
        std::process::exit(2);
    }
}
