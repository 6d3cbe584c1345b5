//! Writer for the Zander airspace format. The device shows ten
//! characters of name, so the names go through a transliteration and
//! compression pass first; CTR spaces additionally get a `-CTR`
//! suffix squeezed into the window.
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
        AirspaceClass::Ctr => "C",
        AirspaceClass::Tmz => "TMZ",
        AirspaceClass::Restricted => "R",
        AirspaceClass::Danger => "Q",
        AirspaceClass::Glider => "GSEC",
    }
}

fn format_altitude(altitude: &Option<Altitude>) -> String {
    match altitude {
        Some(altitude) => {
            let reference = match altitude.reference {
                AltitudeRef::Msl => "MSL",
                AltitudeRef::Gnd | AltitudeRef::Airfield => "GND",
                AltitudeRef::Standard1013 => "FL",
            };
            format!("{:05} {}", altitude.value, reference)
        }
        None => "UNKNOWN".to_string(),
    }
}

fn format_position(position: &SurfacePosition) -> String {
    let latitude = position.latitude.refactor(60);
    let longitude = position.longitude.refactor(60);
    let lat = latitude.unsigned_abs();
    let lon = longitude.unsigned_abs();

    format!(
        "{:02}{:02}{:02}{} {:03}{:02}{:02}{}",
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

fn format_radius(distance: &Distance) -> String {
    format!("{:07.3}", distance.to_unit(DistanceUnit::NauticalMiles).value)
}

fn latin1_to_ascii(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii() {
                c
            } else {
                match c {
                    'Ä' => 'A',
                    'Ö' => 'O',
                    'Ü' => 'U',
                    'ß' => 'S',
                    'ä' => 'a',
                    'ö' => 'o',
                    'ü' => 'u',
                    _ => ' ',
                }
            }
        })
        .collect()
}

/// Squeeze a name into the ten-character device window.
fn transform_name(name: &str, class: AirspaceClass) -> String {
    let mut name = latin1_to_ascii(name);

    if let Some(n) = name.find(" (TRA)") {
        name.replace_range(n..n + 6, "TRA");
    }
    if let Some(n) = name.find(" (HX)") {
        name.replace_range(n..n + 5, "");
    }

    // A trailing single letter becomes a hyphen suffix that survives
    // the cut.
    if name.len() >= 3 && name.as_bytes()[name.len() - 2] == b' ' {
        let cut = name.len() - 2;
        name.replace_range(cut..cut + 1, "-");
        if name.len() > 10 {
            let tail = name.split_off(name.len() - 2);
            name.truncate(8);
            name.push_str(&tail);
        }
    }

    if class == AirspaceClass::Ctr {
        match name.rfind('-') {
            None => {
                name.truncate(6);
                name.push_str("-CTR");
            }
            Some(mut n) => {
                if name.len() > 7 && n > 6 {
                    name.replace_range(6..n, "");
                    n = 6;
                }
                name.truncate(7);
                let insert_at = (n + 1).min(name.len());
                name.insert_str(insert_at, "CTR");
            }
        }
    }

    name.truncate(10);
    name
}

pub struct ZanderAirspaceWriter<W> {
    stream: W,
    flushed: bool,
}

impl<W: Write> ZanderAirspaceWriter<W> {
    pub fn new(mut stream: W) -> Result<Self, LkError> {
        stream.write_all(b"* Written by loggerkit\n\n")?;
        Ok(ZanderAirspaceWriter {
            stream,
            flushed: false,
        })
    }
}

impl<W: Write> ObjectWriter<Airspace> for ZanderAirspaceWriter<W> {
    fn write(&mut self, airspace: &Airspace) -> Result<(), LkError> {
        if self.flushed {
            return Err(LkError::AlreadyFlushed);
        }

        write!(
            self.stream,
            "N {:<10} {}\n  {}\n  {}\n",
            transform_name(&airspace.name, airspace.class),
            class_to_string(airspace.class),
            format_altitude(&airspace.top),
            format_altitude(&airspace.bottom),
        )?;

        let mut vertex_symbol = 'S';
        let mut previous_end: Option<SurfacePosition> = None;
        for edge in &airspace.edges {
            match edge {
                Edge::Vertex { end } => {
                    write!(self.stream, "{} {}\n", vertex_symbol, format_position(end))?;
                    vertex_symbol = 'L';
                    previous_end = Some(*end);
                }
                Edge::Circle { center, radius } => {
                    write!(
                        self.stream,
                        "C {}\n  +{}\n",
                        format_position(center),
                        format_radius(radius),
                    )?;
                }
                Edge::Arc { sign, end, center } => {
                    let from = match previous_end {
                        Some(from) => from,
                        None => continue,
                    };
                    let radius = end.distance_to(center);
                    write!(
                        self.stream,
                        "L {}\nA {}\n  {}\n  {}{} NM\n",
                        format_position(&from),
                        format_position(end),
                        format_position(center),
                        if *sign < 0 { '-' } else { '+' },
                        format_radius(&radius),
                    )?;
                    vertex_symbol = 'L';
                    previous_end = Some(*end);
                }
            }
        }

        // Close the polygon by repeating the first vertex.
        if let Some(Edge::Vertex { end }) = airspace.edges.first() {
            write!(self.stream, "{} {}\n", vertex_symbol, format_position(end))?;
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
