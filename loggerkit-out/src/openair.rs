//! Writer for the OpenAir airspace format.
use loggerkit_core::airspace::*;
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::*;
use loggerkit_core::io::ObjectWriter;

use std::io::Write;

fn class_to_string(class: AirspaceClass) -> &'static str {
    match class {
        AirspaceClass::Unknown => "UNKNOWN",
        AirspaceClass::Alpha => "A",
        AirspaceClass::Bravo => "B",
        AirspaceClass::Charly => "C",
        AirspaceClass::Delta => "D",
        AirspaceClass::EchoLow => "E",
        AirspaceClass::EchoHigh => "W",
        AirspaceClass::Fox => "F",
        AirspaceClass::Ctr => "CTR",
        AirspaceClass::Tmz => "TMZ",
        AirspaceClass::Restricted => "R",
        AirspaceClass::Danger => "Q",
        AirspaceClass::Glider => "GSEC",
    }
}

fn format_altitude(altitude: &Option<Altitude>) -> String {
    let altitude = match altitude {
        Some(altitude) => altitude,
        None => return "UNKNOWN".to_string(),
    };

    if altitude.value == 0 && altitude.reference == AltitudeRef::Gnd {
        return "GND".to_string();
    }

    // Feet throughout; the historic meter conversion is 10/3.
    let value = match altitude.unit {
        AltitudeUnit::Meters => altitude.value * 10 / 3,
        AltitudeUnit::Feet => altitude.value,
    };

    match altitude.reference {
        AltitudeRef::Standard1013 => format!("FL{}", (value + 499) / 1000),
        AltitudeRef::Msl => format!("{:04}MSL", value),
        AltitudeRef::Gnd | AltitudeRef::Airfield => format!("{:04}GND", value),
    }
}

fn format_position(position: &SurfacePosition) -> String {
    let latitude = position.latitude.refactor(60);
    let longitude = position.longitude.refactor(60);
    let lat = latitude.unsigned_abs();
    let lon = longitude.unsigned_abs();

    format!(
        "{:02}:{:02}:{:02} {} {:03}:{:02}:{:02} {}",
        lat / 3600,
        (lat / 60) % 60,
        lat % 60,
        if latitude < 0 { 'S' } else { 'N' },
        lon / 3600,
        (lon / 60) % 60,
        lon % 60,
        if longitude < 0 { 'W' } else { 'E' },
    )
}

pub struct OpenAirAirspaceWriter<W> {
    stream: W,
    flushed: bool,
}

impl<W: Write> OpenAirAirspaceWriter<W> {
    pub fn new(mut stream: W) -> Result<Self, LkError> {
        stream.write_all(b"* Written by loggerkit\n\n")?;
        Ok(OpenAirAirspaceWriter {
            stream,
            flushed: false,
        })
    }
}

impl<W: Write> ObjectWriter<Airspace> for OpenAirAirspaceWriter<W> {
    fn write(&mut self, airspace: &Airspace) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }

        write!(
            self.stream,
            "AC {}\nAN {}\nAL {}\nAH {}\n",
            class_to_string(airspace.class),
            airspace.name,
            format_altitude(&airspace.bottom),
            format_altitude(&airspace.top),
        )?;

        let mut previous_end: Option<SurfacePosition> = None;
        for edge in &airspace.edges {
            match edge {
                Edge::Vertex { end } => {
                    write!(self.stream, "DP {}\n", format_position(end))?;
                    previous_end = Some(*end);
                }
                Edge::Circle { center, radius } => {
                    write!(
                        self.stream,
                        "V X={}\nDC {}\n",
                        format_position(center),
                        radius.to_unit(DistanceUnit::NauticalMiles).value,
                    )?;
                }
                Edge::Arc { sign, end, center } => {
                    // An arc only makes sense after a vertex; anything
                    // else is silently skipped, like the devices do.
                    let from = match previous_end {
                        Some(from) => from,
                        None => continue,
                    };
                    if *sign < 0 {
                        self.stream.write_all(b"V D=-\n")?;
                    }
                    write!(
                        self.stream,
                        "V X={}\nDB {},{}\n",
                        format_position(center),
                        format_position(&from),
                        format_position(end),
                    )?;
                    previous_end = Some(*end);
                }
            }
        }

        self.stream.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }
        self.flushed = true;
        self.stream.flush()?;
        Ok(())
    }
}
