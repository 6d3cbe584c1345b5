//! Writer for the Zander turn point format: fixed columns, one line
//! per point, a 0x1a terminator byte at the end of the file.
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::Angle;
use loggerkit_core::io::ObjectWriter;
use loggerkit_core::turnpoint::*;

use std::io::Write;

fn pad_column(value: &str, width: usize) -> String {
    let mut column: String = value.chars().take(width).collect();
    while column.len() < width {
        column.push(' ');
    }
    column
}

/// `DDMMSS` plus hemisphere letter, in arc seconds.
fn format_angle(angle: Angle, degree_width: usize, letters: [char; 2]) -> String {
    let value = angle.refactor(60);
    let a = value.unsigned_abs();

    format!(
        "{:0w$}{:02}{:02}{}",
        a / 3600,
        (a / 60) % 60,
        a % 60,
        if value < 0 { letters[0] } else { letters[1] },
        w = degree_width
    )
}

fn format_type(tp: &TurnPoint) -> char {
    match tp.kind {
        TurnPointType::Airfield | TurnPointType::MilitaryAirfield | TurnPointType::GliderSite => {
            match tp.runway.surface {
                Some(RunwaySurface::Grass) => 'G',
                Some(RunwaySurface::Asphalt) => 'A',
                None => 'V',
            }
        }
        TurnPointType::Outlanding => 'S',
        _ => ' ',
    }
}

pub struct ZanderTurnPointWriter<W> {
    stream: W,
    flushed: bool,
}

impl<W: Write> ZanderTurnPointWriter<W> {
    pub fn new(stream: W) -> Self {
        ZanderTurnPointWriter {
            stream,
            flushed: false,
        }
    }
}

impl<W: Write> ObjectWriter<TurnPoint> for ZanderTurnPointWriter<W> {
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
        let altitude = tp
            .position
            .as_ref()
            .and_then(|p| p.altitude)
            .map(|a| a.value)
            .unwrap_or(0);
        let frequency = match tp.frequency {
            Some(f) => format!("{:4}{:03}", f.megahertz(), f.kilohertz_part()),
            None => "1      ".to_string(),
        };

        write!(
            self.stream,
            "{} {} {} {:04} {} {} {}\r\n",
            pad_column(&tp.abbreviated_name(12), 12),
            pad_column(&latitude, 7),
            pad_column(&longitude, 8),
            altitude,
            frequency,
            format_type(tp),
            pad_column(&tp.country, 2),
        )?;

        Ok(())
    }

    fn flush(&mut self) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }
        self.flushed = true;

        self.stream.write_all(&[0x1a])?;
        self.stream.flush()?;
        Ok(())
    }
}
