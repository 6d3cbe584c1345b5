//! Reader for the Zander turn point format: one fixed-column line per
//! point, terminated by a 0x1a byte.
use crate::LineReader;

use loggerkit_core::errors::*;
use loggerkit_core::geodesy::*;
use loggerkit_core::io::ObjectReader;
use loggerkit_core::turnpoint::*;
use loggerkit_core::Frequency;

use std::io::BufRead;

/// Slice the next fixed-width column off the line, trimming the
/// surrounding whitespace. The width is in characters, so Latin-1
/// names do not shift the columns. Returns `None` for an all-blank
/// column.
fn next_column<'a>(line: &mut &'a str, width: usize) -> Option<&'a str> {
    let split = line
        .char_indices()
        .nth(width)
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    let (column, rest) = line.split_at(split);
    *line = rest;

    let column = column.trim();
    if column.is_empty() {
        None
    } else {
        Some(column)
    }
}

/// `DDMMSS` + hemisphere letter angles, e.g. `501230N`.
fn parse_angle(column: Option<&str>, minus_letter: char, plus_letter: char) -> Option<i32> {
    let column = column?;
    let (digits, letter) = column.split_at(column.len().checked_sub(1)?);
    let letter = letter.chars().next()?;
    let sign = if letter == minus_letter {
        -1
    } else if letter == plus_letter {
        1
    } else {
        return None;
    };

    let n: u32 = digits.parse().ok()?;
    let seconds = n % 100;
    let minutes = (n / 100) % 100;
    let degrees = n / 10000;
    if degrees > 180 || minutes >= 60 || seconds >= 60 {
        return None;
    }

    Some(
        Angle::from_value(
            sign * ((degrees * 60 + minutes) * 60 + seconds) as i32,
            60,
        )
        .value(),
    )
}

/// The frequency column is `MMMKKK` without a separator; a lone `1`
/// marks an undefined frequency.
fn parse_frequency(column: &str) -> Option<Frequency> {
    if column.len() <= 3 {
        return None;
    }
    let (mhz, khz) = column.split_at(column.len() - 3);
    Frequency::from_mhz_khz(mhz.trim().parse().ok()?, khz.parse().ok()?)
}

pub struct ZanderTurnPointReader<R> {
    lines: LineReader<R>,
    is_eof: bool,
}

impl<R: BufRead> ZanderTurnPointReader<R> {
    pub fn new(stream: R) -> Self {
        ZanderTurnPointReader {
            lines: LineReader::new(stream),
            is_eof: false,
        }
    }
}

impl<R: BufRead> ObjectReader<TurnPoint> for ZanderTurnPointReader<R> {
    fn next(&mut self) -> Option<Result<TurnPoint, LkError>> {
        if self.is_eof {
            return None;
        }

        let line = match self.lines.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };

        if line.starts_with('\u{1a}') {
            self.is_eof = true;
            return None;
        }

        let mut p = line.as_str();
        let mut tp = TurnPoint::default();

        if let Some(name) = next_column(&mut p, 13) {
            tp.full_name = name.to_string();
        }

        let latitude = parse_angle(next_column(&mut p, 8), 'S', 'N');
        let longitude = parse_angle(next_column(&mut p, 9), 'W', 'E');
        let altitude = next_column(&mut p, 5)
            .and_then(|q| q.parse().ok())
            .map(|v| Altitude::new(v, AltitudeUnit::Meters, AltitudeRef::Msl));
        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            tp.position = Some(Position::new(
                Latitude::from_milliminutes(latitude),
                Longitude::from_milliminutes(longitude),
                altitude,
            ));
        }

        tp.frequency = next_column(&mut p, 8).and_then(parse_frequency);

        let mut surface = None;
        if let Some(q) = next_column(&mut p, 2) {
            match q.chars().next() {
                Some('G') => {
                    surface = Some(RunwaySurface::Grass);
                    tp.kind = TurnPointType::Airfield;
                }
                Some('A') | Some('C') => {
                    surface = Some(RunwaySurface::Asphalt);
                    tp.kind = TurnPointType::Airfield;
                }
                Some('V') => tp.kind = TurnPointType::Airfield,
                Some('S') => tp.kind = TurnPointType::Outlanding,
                _ => {}
            }
        }
        tp.runway = Runway::new(surface, None, None);

        if let Some(country) = next_column(&mut p, 2) {
            tp.country = country.to_string();
        }

        Some(Ok(tp))
    }
}
