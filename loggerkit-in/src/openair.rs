//! Reader for the OpenAir airspace format.
use crate::LineReader;

use loggerkit_core::airspace::*;
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::*;
use loggerkit_core::io::ObjectReader;

use std::io::BufRead;

pub(crate) fn parse_class(token: &str) -> AirspaceClass {
    match token {
        "A" => AirspaceClass::Alpha,
        "B" => AirspaceClass::Bravo,
        "C" => AirspaceClass::Charly,
        "D" => AirspaceClass::Delta,
        "E" => AirspaceClass::EchoLow,
        "W" => AirspaceClass::EchoHigh,
        "F" => AirspaceClass::Fox,
        "CTR" => AirspaceClass::Ctr,
        "TMZ" => AirspaceClass::Tmz,
        "R" | "TRA" | "GP" => AirspaceClass::Restricted,
        "Q" => AirspaceClass::Danger,
        "GSEC" => AirspaceClass::Glider,
        _ => AirspaceClass::Unknown,
    }
}

/// `FL<n>` (n thousand feet above the 1013 surface), `<n> GND|MSL`,
/// or anything unparseable, which counts as undefined.
fn parse_altitude(input: &str) -> Option<Altitude> {
    let input = input.trim();

    if let Some(fl) = input.strip_prefix("FL") {
        let value: i32 = fl.trim().parse().ok()?;
        return Some(Altitude::new(
            value * 1000,
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
        _ => return None,
    };

    Some(Altitude::new(value, AltitudeUnit::Feet, reference))
}

/// `dd:mm:ss N ddd:mm:ss E` — both halves of a surface position.
fn parse_position(input: &str) -> Result<SurfacePosition, LkError> {
    let mut words = input.split_whitespace();

    let latitude = parse_dms_word(words.next(), words.next(), 'S', 'N')?;
    let longitude = parse_dms_word(words.next(), words.next(), 'W', 'E')?;

    Ok(SurfacePosition::new(
        Latitude::from_milliminutes(latitude),
        Longitude::from_milliminutes(longitude),
    ))
}

fn parse_dms_word(
    dms: Option<&str>,
    hemisphere: Option<&str>,
    minus_letter: char,
    plus_letter: char,
) -> Result<i32, LkError> {
    let dms = dms.ok_or_else(|| LkError::malformed("expected coordinate"))?;
    let hemisphere = hemisphere.ok_or_else(|| LkError::malformed("expected hemisphere"))?;

    let mut parts = dms.split(':');
    let mut next_number = |what: &str| -> Result<u32, LkError> {
        parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .ok_or_else(|| LkError::malformed(format!("expected {}", what)))
    };
    let degrees = next_number("degrees")?;
    let minutes = next_number("minutes")?;
    let seconds = next_number("seconds")?;

    let sign = if hemisphere.starts_with(minus_letter) {
        -1
    } else if hemisphere.starts_with(plus_letter) {
        1
    } else {
        return Err(LkError::malformed(format!(
            "expected '{}' or '{}'",
            minus_letter, plus_letter
        )));
    };

    Ok(Angle::from_dms(sign, degrees, minutes, seconds).value())
}

pub struct OpenAirAirspaceReader<R> {
    lines: LineReader<R>,
    at_eof: bool,
}

impl<R: BufRead> OpenAirAirspaceReader<R> {
    pub fn new(stream: R) -> Self {
        OpenAirAirspaceReader {
            lines: LineReader::new(stream),
            at_eof: false,
        }
    }

    fn read_airspace(&mut self) -> Result<Option<Airspace>, LkError> {
        let mut class = AirspaceClass::Unknown;
        let mut name = String::new();
        let mut bottom = None;
        let mut top = None;
        let mut edges: Vec<Edge> = Vec::new();
        // Arc/circle state set up by `V` commands.
        let mut center: Option<SurfacePosition> = None;
        let mut sign: i8 = 1;

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

            let line = line.trim_end();
            if line.is_empty() {
                if edges.is_empty() {
                    continue;
                }
                break;
            }

            if let Some(rest) = line.strip_prefix("AC ") {
                class = parse_class(rest);
            } else if let Some(rest) = line.strip_prefix("AN ") {
                name = rest.to_string();
            } else if let Some(rest) = line.strip_prefix("AL ") {
                bottom = parse_altitude(rest);
            } else if let Some(rest) = line.strip_prefix("AH ") {
                top = parse_altitude(rest);
            } else if let Some(rest) = line.strip_prefix("DP ") {
                edges.push(Edge::Vertex {
                    end: parse_position(rest)?,
                });
            } else if let Some(rest) = line.strip_prefix("V ") {
                let rest = rest.trim();
                if let Some(value) = rest.strip_prefix("X=") {
                    center = Some(parse_position(value)?);
                } else if let Some(value) = rest.strip_prefix("D=") {
                    sign = if value.trim().starts_with('-') { -1 } else { 1 };
                } else {
                    return Err(LkError::malformed("invalid V command"));
                }
            } else if let Some(rest) = line.strip_prefix("DC ") {
                let center = center
                    .ok_or_else(|| LkError::malformed("DC without a previous V X= center"))?;
                let radius: f64 = rest
                    .trim()
                    .parse()
                    .map_err(|_| LkError::malformed("invalid DC radius"))?;
                edges.push(Edge::Circle {
                    center,
                    radius: Distance::new(DistanceUnit::NauticalMiles, radius),
                });
            } else if let Some(rest) = line.strip_prefix("DB ") {
                let center = center
                    .ok_or_else(|| LkError::malformed("DB without a previous V X= center"))?;
                let comma = rest
                    .find(',')
                    .ok_or_else(|| LkError::malformed("DB needs two positions"))?;
                // The first position repeats the previous vertex; only
                // the arc's endpoint is new information.
                let _from = parse_position(&rest[..comma])?;
                let end = parse_position(&rest[comma + 1..])?;
                edges.push(Edge::Arc { sign, end, center });
                sign = 1;
            } else {
                return Err(LkError::malformed("invalid command"));
            }
        }

        if edges.is_empty() {
            return Ok(None);
        }

        Ok(Some(Airspace::new(name, class, bottom, top, edges)))
    }
}

impl<R: BufRead> ObjectReader<Airspace> for OpenAirAirspaceReader<R> {
    fn next(&mut self) -> Option<Result<Airspace, LkError>> {
        if self.at_eof {
            return None;
        }
        self.read_airspace().transpose()
    }
}
