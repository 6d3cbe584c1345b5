//! Reader for the multi-line Cenfis turn point text format. A record
//! opens with an `11 N <name>` line and continues on lines that begin
//! with three spaces; anything after a semicolon is a comment.
use crate::LineReader;

use loggerkit_core::errors::*;
use loggerkit_core::geodesy::*;
use loggerkit_core::io::ObjectReader;
use loggerkit_core::turnpoint::*;
use loggerkit_core::Frequency;

use std::io::BufRead;

/// Parse a letter-first angle: `N 50 12 345` with the third number in
/// units of `1/factor` minutes (1000 for `K` lines, 60 for `C` lines).
/// Consumes the parsed words from the iterator.
fn parse_angle<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    minus_letter: &str,
    plus_letter: &str,
    factor: i32,
) -> Option<i32> {
    let letter = words.next()?;
    let sign = if letter == minus_letter {
        -1
    } else if letter == plus_letter {
        1
    } else {
        return None;
    };

    let n1: u32 = words.next()?.parse().ok()?;
    let n2: u32 = words.next()?.parse().ok()?;
    let n3: u32 = words.next()?.parse().ok()?;
    if n1 > 180 || n2 >= 60 || n3 >= factor as u32 {
        return None;
    }

    let value = sign * (((n1 * 60 + n2) as i32) * factor + n3 as i32);
    Some(Angle::from_value(value, factor).value())
}

/// Altitude sub-field: a unit letter (`M`, `F` or `U` for unknown)
/// followed by the value.
fn parse_altitude<'a>(words: &mut impl Iterator<Item = &'a str>) -> Option<Altitude> {
    let unit = match words.next()? {
        "M" => AltitudeUnit::Meters,
        "F" => AltitudeUnit::Feet,
        _ => return None,
    };
    let value: i32 = words.next()?.parse().ok()?;

    Some(Altitude::new(value, unit, AltitudeRef::Msl))
}

fn parse_frequency(field: &str) -> Option<Frequency> {
    let field = field.trim();
    let (mhz, rest) = match field.find(|c| c == ' ' || c == '.') {
        Some(i) => (&field[..i], field[i + 1..].trim()),
        None => (field, ""),
    };
    let mhz: u32 = mhz.parse().ok()?;
    let khz: u32 = if rest.is_empty() {
        0
    } else {
        rest.parse().ok()?
    };

    Frequency::from_mhz_khz(mhz, khz)
}

/// The `R` continuation carries direction, length and surface in free
/// word order: numbers below 100 are a direction, larger ones a
/// length, and `GR`/`AS`/`SO` words the surface.
fn parse_runway(field: &str) -> Runway {
    let mut runway = Runway::default();

    for word in field.split_whitespace() {
        if let Ok(value) = word.parse::<u32>() {
            if value >= 100 {
                runway.length = Some(value);
            } else if (1..=36).contains(&value) && runway.direction.is_none() {
                runway.direction = Some(value as u8);
            }
        } else if word.len() >= 2 {
            let prefix = &word[..2];
            if prefix.eq_ignore_ascii_case("GR") {
                runway.surface = Some(RunwaySurface::Grass);
            } else if prefix.eq_ignore_ascii_case("AS") || prefix.eq_ignore_ascii_case("SO") {
                runway.surface = Some(RunwaySurface::Asphalt);
            }
        }
    }

    runway
}

pub struct CenfisTurnPointReader<R> {
    lines: LineReader<R>,
    current: Option<TurnPoint>,
}

impl<R: BufRead> CenfisTurnPointReader<R> {
    pub fn new(stream: R) -> Self {
        CenfisTurnPointReader {
            lines: LineReader::new(stream),
            current: None,
        }
    }

    /// Apply one line; returns a finished turn point when the line
    /// closed the record that was being accumulated.
    fn handle_line(&mut self, line: &str) -> Option<TurnPoint> {
        // Remove comments after the semicolon, then right-trim.
        let line = match line.find(';') {
            Some(i) => &line[..i],
            None => line,
        };
        let line = line.trim_end();

        let (finished, rest) = if let Some(rest) = line.strip_prefix("11 ") {
            (self.current.replace(TurnPoint::default()), rest)
        } else if let Some(rest) = line.strip_prefix("   ") {
            (None, rest)
        } else {
            // A terminator: `0 …`, a blank line, anything else.
            return self.current.take();
        };

        let mut chars = rest.chars();
        let field = chars.next();
        let value = chars.as_str();
        if field.is_none() || !value.starts_with(' ') {
            return finished;
        }
        let value = &value[1..];

        let tp = match self.current.as_mut() {
            Some(tp) => tp,
            None => return finished,
        };

        match field.unwrap() {
            'N' => {
                if !value.is_empty() {
                    tp.full_name = value.to_string();
                }
            }
            'T' => {
                // A three-character type token, then the description.
                let token: String = value.chars().take(3).collect();
                tp.kind = match token.as_str() {
                    " # " => TurnPointType::Airfield,
                    " #M" => TurnPointType::MilitaryAirfield,
                    " #S" => TurnPointType::GliderSite,
                    "LW " => TurnPointType::Outlanding,
                    "TQ " => TurnPointType::Thermals,
                    _ => TurnPointType::Unknown,
                };
                let description: String = value.chars().skip(4).collect();
                if !description.is_empty() && description != "Waypoint" {
                    tp.description = description;
                }
            }
            'C' | 'K' => {
                let factor = if field == Some('C') { 60 } else { 1000 };
                let mut words = value.split_whitespace();
                let latitude = parse_angle(&mut words, "S", "N", factor);
                let longitude = parse_angle(&mut words, "W", "E", factor);
                if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
                    let altitude = parse_altitude(&mut words);
                    tp.position = Some(Position::new(
                        Latitude::from_milliminutes(latitude),
                        Longitude::from_milliminutes(longitude),
                        altitude,
                    ));
                }
            }
            'F' => tp.frequency = parse_frequency(value),
            'R' => tp.runway = parse_runway(value),
            _ => {}
        }

        finished
    }
}

impl<R: BufRead> ObjectReader<TurnPoint> for CenfisTurnPointReader<R> {
    fn next(&mut self) -> Option<Result<TurnPoint, LkError>> {
        loop {
            let line = match self.lines.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => return self.current.take().map(Ok),
                Err(e) => return Some(Err(e)),
            };

            if let Some(tp) = self.handle_line(&line) {
                return Some(Ok(tp));
            }
        }
    }
}
