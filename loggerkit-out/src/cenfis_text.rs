//! Writer for the multi-line Cenfis turn point text format.
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::{AltitudeUnit, Angle};
use loggerkit_core::io::ObjectWriter;
use loggerkit_core::turnpoint::*;

use std::io::Write;

fn format_type(kind: TurnPointType) -> &'static str {
    match kind {
        TurnPointType::Airfield => " # ",
        TurnPointType::MilitaryAirfield => " #M",
        TurnPointType::GliderSite => " #S",
        TurnPointType::Outlanding => "LW ",
        TurnPointType::Thermals => "TQ ",
        _ => "   ",
    }
}

fn format_angle(angle: Angle, letters: [char; 2]) -> String {
    let value = angle.value();
    let a = value.unsigned_abs();

    format!(
        "{} {:02} {:02} {:03}",
        if value < 0 { letters[0] } else { letters[1] },
        a / 60 / 1000,
        (a / 1000) % 60,
        a % 1000
    )
}

pub struct CenfisTurnPointWriter<W> {
    stream: W,
    flushed: bool,
}

impl<W: Write> CenfisTurnPointWriter<W> {
    pub fn new(mut stream: W) -> Result<Self, LkError> {
        stream.write_all(b"0 created by loggerkit\n")?;
        Ok(CenfisTurnPointWriter {
            stream,
            flushed: false,
        })
    }
}

impl<W: Write> ObjectWriter<TurnPoint> for CenfisTurnPointWriter<W> {
    fn write(&mut self, tp: &TurnPoint) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }

        let name = if !tp.full_name.is_empty() {
            tp.full_name.as_str()
        } else if !tp.code.is_empty() {
            tp.code.as_str()
        } else {
            "unknown"
        };
        write!(self.stream, "11 N {}\n", name)?;

        write!(self.stream, "   T {}", format_type(tp.kind))?;
        if !tp.description.is_empty() {
            write!(self.stream, " {}", tp.description)?;
        }
        self.stream.write_all(b"\n")?;

        if let Some(position) = &tp.position {
            write!(
                self.stream,
                "   K {} {}",
                format_angle(position.latitude().0, ['S', 'N']),
                format_angle(position.longitude().0, ['W', 'E']),
            )?;

            match &position.altitude {
                Some(altitude) => {
                    let letter = match altitude.unit {
                        AltitudeUnit::Meters => 'M',
                        AltitudeUnit::Feet => 'F',
                    };
                    write!(self.stream, " {} {}\n", letter, altitude.value)?;
                }
                None => self.stream.write_all(b" U 0\n")?,
            }
        }

        if let Some(frequency) = &tp.frequency {
            write!(
                self.stream,
                "   F {}.{:03}\n",
                frequency.megahertz(),
                frequency.kilohertz_part()
            )?;
        }

        if let Some(direction) = tp.runway.direction {
            write!(self.stream, "   R {:02}", direction)?;
            if let Some(length) = tp.runway.length {
                write!(self.stream, " {:04}", length)?;
            }
            match tp.runway.surface {
                Some(RunwaySurface::Grass) => self.stream.write_all(b" GR")?,
                Some(RunwaySurface::Asphalt) => self.stream.write_all(b" AS")?,
                None => {}
            }
            self.stream.write_all(b"\n")?;
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }
        self.flushed = true;

        self.stream
            .write_all(b"0 End of File, created by loggerkit\n")?;
        self.stream.flush()?;
        Ok(())
    }
}
