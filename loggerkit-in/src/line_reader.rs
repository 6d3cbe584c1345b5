//! Line splitting for the text formats. CR, LF and CR-LF terminators
//! are all accepted, in any mixture.
use loggerkit_core::errors::LkError;

use std::io::BufRead;

pub struct LineReader<R> {
    inner: R,
    skip_lf: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        LineReader {
            inner,
            skip_lf: false,
        }
    }

    /// The next line without its terminator, or `None` at the end of
    /// the stream. Bytes are interpreted as Latin-1.
    pub fn read_line(&mut self) -> Result<Option<String>, LkError> {
        let mut line: Vec<u8> = Vec::new();
        let mut saw_terminator = false;

        while !saw_terminator {
            let mut used = 0;
            let mut at_eof = false;
            {
                let buf = self.inner.fill_buf()?;
                if buf.is_empty() {
                    at_eof = true;
                } else {
                    for &b in buf {
                        used += 1;
                        if self.skip_lf {
                            self.skip_lf = false;
                            if b == b'\n' {
                                continue;
                            }
                        }
                        if b == b'\n' {
                            saw_terminator = true;
                            break;
                        }
                        if b == b'\r' {
                            self.skip_lf = true;
                            saw_terminator = true;
                            break;
                        }
                        line.push(b);
                    }
                }
            }
            self.inner.consume(used);

            if at_eof {
                if line.is_empty() {
                    return Ok(None);
                }
                break;
            }
        }

        Ok(Some(line.iter().map(|&b| b as char).collect()))
    }
}
