//! Reader for the Cenfis airspace text format (`asa`/`asb`). This is
//! the text rendition the vendor tools emit; the names may spread over
//! up to four `AN*` lines, which are packed into the pipe-separated
//! name convention on the way in. Two quirks of real files are kept as
//! markers so that the binary writer can reproduce them: a leading `-`
//! on the second name component records that AN4 arrived before AN2,
//! and a leading `_` on the raw type string records that the polygon
//! had no explicit `S` starting vertex.
use crate::LineReader;

use loggerkit_core::airspace::*;
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::*;
use loggerkit_core::io::ObjectReader;
use loggerkit_core::Frequency;

use std::io::BufRead;

use crate::openair::parse_class;

fn is_delimiter(c: char) -> bool {
    c == ' ' || c == ',' || c == ':'
}

/// Split into words on spaces, commas and colons.
fn words(input: &str) -> impl Iterator<Item = &str> {
    input.split(is_delimiter).filter(|w| !w.is_empty())
}

/// `FL<n>` is n hundred feet here, unlike OpenAir; `STD` references
/// the 1013 surface explicitly.
fn parse_altitude(input: &str) -> Option<Altitude> {
    let input = input.trim();

    if let Some(fl) = input.strip_prefix("FL") {
        let value: i32 = fl.trim().parse().ok()?;
        return Some(Altitude::new(
            value * 100,
            AltitudeUnit::Feet,
            AltitudeRef::Standard1013,
        ));
    }

    let digits_end = input
        .find(|c: char| !c.is_ascii_digit() && c != '-' && c != '+')
        .unwrap_or(input.len());
    let value: i32 = input[..digits_end].parse().unwrap_or(0);
    let reference = match input[digits_end..].trim() {
        "GND" => AltitudeRef::Gnd,
        "MSL" => AltitudeRef::Msl,
        "STD" => AltitudeRef::Standard1013,
        _ => return None,
    };

    Some(Altitude::new(value, AltitudeUnit::Feet, reference))
}

fn parse_angle<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<i32, LkError> {
    let mut next_number = |what: &str| -> Result<i32, LkError> {
        words
            .next()
            .and_then(|w| w.parse().ok())
            .ok_or_else(|| LkError::malformed(format!("expected {}", what)))
    };

    let degrees = next_number("degrees")?;
    let minutes = next_number("minutes")?;
    let seconds = next_number("seconds")?;

    let (sign, degrees) = if degrees < 0 {
        (-1, -degrees)
    } else {
        (1, degrees)
    };

    Ok(Angle::from_dms(sign, degrees as u32, minutes as u32, seconds as u32).value())
}

fn parse_surface_position<'a>(
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<SurfacePosition, LkError> {
    let latitude = parse_angle(words)?;
    let longitude = parse_angle(words)?;
    Ok(SurfacePosition::new(
        Latitude::from_milliminutes(latitude),
        Longitude::from_milliminutes(longitude),
    ))
}

fn parse_circle<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Edge, LkError> {
    let center = parse_surface_position(words)?;
    let mut next_number = |what: &str| -> Result<i32, LkError> {
        words
            .next()
            .and_then(|w| w.parse().ok())
            .ok_or_else(|| LkError::malformed(format!("expected {}", what)))
    };
    let miles = next_number("radius miles")?;
    let deci_miles = next_number("radius tenths")?;

    Ok(Edge::Circle {
        center,
        radius: Distance::new(
            DistanceUnit::NauticalMiles,
            miles as f64 + deci_miles as f64 / 10.0,
        ),
    })
}

fn parse_arc<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Edge, LkError> {
    let sign = match words.next() {
        Some(w) if w.starts_with('+') => 1,
        Some(_) => -1,
        None => return Err(LkError::malformed("expected arc direction")),
    };
    let end = parse_surface_position(words)?;
    let center = parse_surface_position(words)?;

    Ok(Edge::Arc { sign, end, center })
}

pub struct CenfisTextAirspaceReader<R> {
    lines: LineReader<R>,
    at_eof: bool,
}

impl<R: BufRead> CenfisTextAirspaceReader<R> {
    pub fn new(stream: R) -> Self {
        CenfisTextAirspaceReader {
            lines: LineReader::new(stream),
            at_eof: false,
        }
    }

    fn read_airspace(&mut self) -> Result<Option<Airspace>, LkError> {
        let mut class = AirspaceClass::Unknown;
        let mut type_string = String::new();
        let mut name = String::new();
        let mut name2 = String::new();
        let mut name3 = String::new();
        let mut name4 = String::new();
        let mut bottom = Some(Altitude::new(0, AltitudeUnit::Meters, AltitudeRef::Gnd));
        let mut top = None;
        let mut top2 = None;
        let mut edges: Vec<Edge> = Vec::new();
        let mut frequency = None;
        let mut voice: u16 = 0;
        let mut has_start = false;

        loop {
            let line = match self.lines.read_line()? {
                Some(line) => line,
                None => {
                    self.at_eof = true;
                    break;
                }
            };

            if line.starts_with('*') {
                continue;
            }

            // The AC and AN* payloads keep their trailing spaces; the
            // device files rely on that.
            let line: &str = if line.starts_with("AC") || line.starts_with("AN") {
                &line
            } else {
                line.trim_end()
            };
            if line.is_empty() {
                if edges.is_empty() {
                    continue;
                }
                break;
            }

            let (cmd, rest) = match line.find(is_delimiter) {
                Some(i) => (&line[..i], &line[i + 1..]),
                None => (line, ""),
            };

            match cmd {
                "AC" => {
                    type_string = rest.to_string();
                    class = parse_class(rest.trim_end());
                }
                "AN" => name = rest.to_string(),
                "AN2" => {
                    name2 = rest.to_string();
                    if !name4.is_empty() {
                        // Reproduce the device quirk: AN4 arrived before
                        // AN2, memorized with the dash marker.
                        name2.insert(0, '-');
                    }
                }
                "AN3" => name3 = rest.to_string(),
                "AN4" => name4 = rest.to_string(),
                "AL" => bottom = parse_altitude(rest),
                "AH" => top = parse_altitude(rest),
                "AH2" => {
                    top2 = top;
                    top = parse_altitude(rest);
                }
                "S" => {
                    edges.push(Edge::Vertex {
                        end: parse_surface_position(&mut words(rest))?,
                    });
                    has_start = true;
                }
                "L" => {
                    edges.push(Edge::Vertex {
                        end: parse_surface_position(&mut words(rest))?,
                    });
                    if !has_start && !type_string.starts_with('_') {
                        // Reproduce the other quirk: no "S" line at all,
                        // memorized with the underscore marker.
                        type_string.insert(0, '_');
                    }
                }
                "C" => edges.push(parse_circle(&mut words(rest))?),
                "A" => edges.push(parse_arc(&mut words(rest))?),
                "V" => {
                    let mut w = words(rest);
                    voice = w.next().and_then(|v| v.parse().ok()).unwrap_or(0);
                    if let Some(kind) = w.next() {
                        if kind.starts_with('R') {
                            voice |= 0x8000;
                        }
                    }
                }
                "FIS" => {
                    let mut w = words(rest);
                    let mhz: u32 = w.next().and_then(|v| v.parse().ok()).unwrap_or(0);
                    let khz: u32 = w.next().and_then(|v| v.parse().ok()).unwrap_or(0);
                    frequency = Frequency::from_mhz_khz(mhz, khz);
                }
                "UPD" => {}
                _ => return Err(LkError::malformed(format!("invalid command: {}", cmd))),
            }
        }

        if edges.is_empty() {
            return Ok(None);
        }

        // Pack the secondary names and the raw type string into the
        // pipe-separated name.
        if !name2.is_empty() || !name3.is_empty() || !name4.is_empty() || !type_string.is_empty() {
            name.push('|');
            name.push_str(&name2);
        }
        if !name3.is_empty() || !name4.is_empty() || !type_string.is_empty() {
            name.push('|');
            name.push_str(&name3);
        }
        if !name4.is_empty() || !type_string.is_empty() {
            name.push('|');
            name.push_str(&name4);
        }
        if !type_string.is_empty() {
            name.push('|');
            name.push_str(&type_string);
        }

        let mut airspace = Airspace::new(name, class, bottom, top, edges);
        airspace.top2 = top2;
        airspace.frequency = frequency;
        airspace.voice = voice;
        Ok(Some(airspace))
    }
}

impl<R: BufRead> ObjectReader<Airspace> for CenfisTextAirspaceReader<R> {
    fn next(&mut self) -> Option<Result<Airspace, LkError>> {
        if self.at_eof {
            return None;
        }
        self.read_airspace().transpose()
    }
}
