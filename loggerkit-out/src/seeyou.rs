//! Writer for the SeeYou turn point format.
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::{AltitudeUnit, Angle};
use loggerkit_core::io::ObjectWriter;
use loggerkit_core::turnpoint::*;

use std::io::Write;

const HEADER: &str =
    "Title,Code,Country,Latitude,Longitude,Elevation,Style,Direction,Length,Frequency,Description\r\n";

fn format_angle(angle: Angle, degree_width: usize, letters: [char; 2]) -> String {
    let value = angle.value();
    let a = value.unsigned_abs();

    format!(
        "{:0w$}{:02}.{:03}{}",
        a / 60 / 1000,
        (a / 1000) % 60,
        a % 1000,
        if value < 0 { letters[0] } else { letters[1] },
        w = degree_width
    )
}

/// The numeric "style" the format uses for the type column.
pub(crate) fn type_to_style(tp: &TurnPoint) -> u32 {
    match tp.kind {
        TurnPointType::Airfield | TurnPointType::MilitaryAirfield => {
            if tp.runway.surface == Some(RunwaySurface::Asphalt) {
                5
            } else {
                2
            }
        }
        TurnPointType::GliderSite => 4,
        TurnPointType::Outlanding => 3,
        TurnPointType::MountainPass => 6,
        TurnPointType::MountainTop => 7,
        TurnPointType::Sender => 8,
        TurnPointType::Vor => 9,
        TurnPointType::Ndb => 10,
        TurnPointType::CoolTower => 11,
        TurnPointType::Dam => 12,
        TurnPointType::Tunnel => 13,
        TurnPointType::Bridge => 14,
        TurnPointType::PowerPlant => 15,
        TurnPointType::Castle => 16,
        TurnPointType::HighwayIntersection | TurnPointType::RailwayIntersection => 17,
        _ => 1,
    }
}

fn quoted(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("\"{}\"", value)
    }
}

pub struct SeeYouTurnPointWriter<W> {
    stream: W,
    flushed: bool,
}

impl<W: Write> SeeYouTurnPointWriter<W> {
    pub fn new(mut stream: W) -> Result<Self, LkError> {
        stream.write_all(HEADER.as_bytes())?;
        Ok(SeeYouTurnPointWriter {
            stream,
            flushed: false,
        })
    }
}

impl<W: Write> ObjectWriter<TurnPoint> for SeeYouTurnPointWriter<W> {
    fn write(&mut self, tp: &TurnPoint) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }

        let (latitude, longitude) = match &tp.position {
            Some(position) => (
                format_angle(position.latitude().0, 2, ['S', 'N']),
                format_angle(position.longitude().0, 3, ['W', 'E']),
            ),
            None => (String::new(), String::new()),
        };

        let elevation = tp
            .position
            .as_ref()
            .and_then(|p| p.altitude)
            .map(|altitude| {
                let letter = match altitude.unit {
                    AltitudeUnit::Meters => 'M',
                    AltitudeUnit::Feet => 'F',
                };
                format!("{}{}", altitude.value, letter)
            })
            .unwrap_or_default();

        let direction = tp
            .runway
            .direction
            .map(|d| d.to_string())
            .unwrap_or_default();
        let length = tp.runway.length.map(|l| l.to_string()).unwrap_or_default();
        let frequency = tp
            .frequency
            .map(|f| format!("{}.{:03}", f.megahertz(), f.kilohertz_part()))
            .unwrap_or_default();

        write!(
            self.stream,
            "{},{},{},{},{},{},{},{},{},{},{}\r\n",
            quoted(&tp.full_name),
            quoted(&tp.code),
            quoted(&tp.country),
            latitude,
            longitude,
            elevation,
            type_to_style(tp),
            direction,
            length,
            frequency,
            quoted(&tp.description),
        )?;

        Ok(())
    }

    fn flush(&mut self) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }
        self.flushed = true;

        self.stream.write_all(b"-----Related Tasks-----\r\n")?;
        self.stream.flush()?;
        Ok(())
    }
}
