//! Reader for the SeeYou turn point format: a CSV-like file whose
//! header line decides which column carries which field.
use crate::LineReader;

use loggerkit_core::errors::*;
use loggerkit_core::geodesy::*;
use loggerkit_core::io::ObjectReader;
use loggerkit_core::turnpoint::*;
use loggerkit_core::Frequency;

use std::io::BufRead;

/// The recognized header column names. Unrecognized columns are
/// carried as `Ignore` so the indices keep lining up.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Title,
    Code,
    Country,
    Latitude,
    Longitude,
    Elevation,
    Style,
    Direction,
    Length,
    Frequency,
    Description,
    Ignore,
}

fn recognize_column(name: &str) -> Column {
    if name.eq_ignore_ascii_case("title") || name.eq_ignore_ascii_case("name") {
        Column::Title
    } else if name.eq_ignore_ascii_case("code") {
        Column::Code
    } else if name.eq_ignore_ascii_case("country") {
        Column::Country
    } else if name.eq_ignore_ascii_case("latitude") || name.eq_ignore_ascii_case("lat") {
        Column::Latitude
    } else if name.eq_ignore_ascii_case("longitude") || name.eq_ignore_ascii_case("lon") {
        Column::Longitude
    } else if name.eq_ignore_ascii_case("elevation") || name.eq_ignore_ascii_case("elev") {
        Column::Elevation
    } else if name.eq_ignore_ascii_case("style") {
        Column::Style
    } else if name.eq_ignore_ascii_case("direction") || name.eq_ignore_ascii_case("rwdir") {
        Column::Direction
    } else if name.eq_ignore_ascii_case("length") || name.eq_ignore_ascii_case("rwlen") {
        Column::Length
    } else if name.eq_ignore_ascii_case("frequency") || name.eq_ignore_ascii_case("freq") {
        Column::Frequency
    } else if name.eq_ignore_ascii_case("description") || name.eq_ignore_ascii_case("desc") {
        Column::Description
    } else {
        Column::Ignore
    }
}

/// Split one CSV line. Quoting uses `"…"` with no interior escapes;
/// bare values are whitespace-trimmed.
fn split_columns(line: &str) -> Vec<String> {
    let mut columns = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        let mut column = String::new();

        if chars.peek() == Some(&'"') {
            chars.next();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                column.push(c);
            }
            while matches!(chars.peek(), Some(&c) if c != ',' && c <= ' ') {
                chars.next();
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                column.push(c);
                chars.next();
            }
            column = column.trim().to_string();
        }

        columns.push(column);

        match chars.next() {
            Some(',') => continue,
            _ => break,
        }
    }

    columns
}

/// The numeric "style" column and what it means for the type and the
/// runway surface.
pub(crate) fn style_to_type(style: u32) -> (TurnPointType, Option<RunwaySurface>) {
    match style {
        2 => (TurnPointType::Airfield, Some(RunwaySurface::Grass)),
        3 => (TurnPointType::Outlanding, None),
        4 => (TurnPointType::GliderSite, None),
        5 => (TurnPointType::Airfield, Some(RunwaySurface::Asphalt)),
        6 => (TurnPointType::MountainPass, None),
        7 => (TurnPointType::MountainTop, None),
        8 => (TurnPointType::Sender, None),
        9 => (TurnPointType::Vor, None),
        10 => (TurnPointType::Ndb, None),
        11 => (TurnPointType::CoolTower, None),
        12 => (TurnPointType::Dam, None),
        13 => (TurnPointType::Tunnel, None),
        14 => (TurnPointType::Bridge, None),
        15 => (TurnPointType::PowerPlant, None),
        16 => (TurnPointType::Castle, None),
        17 => (TurnPointType::HighwayIntersection, None),
        _ => (TurnPointType::Unknown, None),
    }
}

fn parse_elevation(column: &str) -> Option<Altitude> {
    let column = column.trim();
    if column.is_empty() {
        return None;
    }

    let digits_end = column
        .find(|c: char| !c.is_ascii_digit() && c != '-' && c != '+')
        .unwrap_or(column.len());
    let value: i32 = column[..digits_end].parse().ok()?;
    let unit = match column[digits_end..].trim() {
        "" | "M" | "m" => AltitudeUnit::Meters,
        "F" | "f" => AltitudeUnit::Feet,
        _ => return None,
    };

    Some(Altitude::new(value, unit, AltitudeRef::Msl))
}

pub(crate) fn parse_frequency(column: &str) -> Option<Frequency> {
    let column = column.trim();
    let dot = column.find('.')?;
    let mhz: u32 = column[..dot].parse().ok()?;
    let frac = &column[dot + 1..];
    let mut khz: u32 = if frac.is_empty() { 0 } else { frac.parse().ok()? };
    for _ in frac.len()..3 {
        khz *= 10;
    }

    Frequency::from_mhz_khz(mhz, khz)
}

pub struct SeeYouTurnPointReader<R> {
    lines: LineReader<R>,
    is_eof: bool,
    columns: Vec<Column>,
}

impl<R: BufRead> SeeYouTurnPointReader<R> {
    pub fn new(stream: R) -> Result<Self, LkError> {
        let mut lines = LineReader::new(stream);
        let header = lines
            .read_line()?
            .ok_or_else(|| LkError::malformed("no columns in header"))?;

        let columns = split_columns(&header)
            .iter()
            .map(|name| recognize_column(name))
            .collect();

        Ok(SeeYouTurnPointReader {
            lines,
            is_eof: false,
            columns,
        })
    }

    fn parse_line(&self, line: &str) -> TurnPoint {
        let mut tp = TurnPoint::default();
        let mut latitude = None;
        let mut longitude = None;
        let mut altitude = None;
        let mut surface = None;
        let mut direction = None;
        let mut length = None;

        let values = split_columns(line);
        for (column, value) in self.columns.iter().zip(values.iter()) {
            match column {
                Column::Title => tp.full_name = value.clone(),
                Column::Code => tp.code = value.clone(),
                Column::Country => tp.country = value.clone(),
                Column::Latitude => {
                    latitude = parse_angle_literal(value, 'S', 'N')
                        .ok()
                        .filter(|(_, rest)| rest.is_empty())
                        .map(|(v, _)| Latitude::from_milliminutes(v));
                }
                Column::Longitude => {
                    longitude = parse_angle_literal(value, 'W', 'E')
                        .ok()
                        .filter(|(_, rest)| rest.is_empty())
                        .map(|(v, _)| Longitude::from_milliminutes(v));
                }
                Column::Elevation => altitude = parse_elevation(value),
                Column::Style => {
                    let style = value.trim().parse().unwrap_or(0);
                    let (kind, rwy_surface) = style_to_type(style);
                    tp.kind = kind;
                    if rwy_surface.is_some() {
                        surface = rwy_surface;
                    }
                }
                Column::Direction => {
                    direction = value.trim().parse::<u8>().ok().filter(|d| (1..=36).contains(d));
                }
                Column::Length => length = value.trim().parse().ok(),
                Column::Frequency => tp.frequency = parse_frequency(value),
                Column::Description => tp.description = value.clone(),
                Column::Ignore => {}
            }
        }

        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            tp.position = Some(Position::new(latitude, longitude, altitude));
        }
        tp.runway = Runway::new(surface, direction, length);

        tp
    }
}

impl<R: BufRead> ObjectReader<TurnPoint> for SeeYouTurnPointReader<R> {
    fn next(&mut self) -> Option<Result<TurnPoint, LkError>> {
        if self.is_eof {
            return None;
        }

        let line = match self.lines.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };

        if line.starts_with("-----Related") {
            self.is_eof = true;
            return None;
        }

        Some(Ok(self.parse_line(&line)))
    }
}
