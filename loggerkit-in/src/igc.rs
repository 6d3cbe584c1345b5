//! The LXN to IGC renderer: feeds the tagged-record stream through
//! [`LxnReader`](crate::lxn::LxnReader) and writes the flight log as
//! IGC text lines.
//!
//! Information about the LXN record layout was taken from the KFlog
//! sources; the GNSS flight recorder specification defines the output
//! side.
use crate::lxn::*;

use loggerkit_core::errors::*;

use std::io::Write;

/// The GPS datum names, by the datum code of the flight info record.
/// Codes of 103 and above render as an empty string.
static GPS_DATUM_TAB: [&str; 103] = [
    "ADINDAN        ",
    "AFGOOYE        ",
    "AIN EL ABD 1970",
    "COCOS ISLAND   ",
    "ARC 1950       ",
    "ARC 1960       ",
    "ASCENSION 1958 ",
    "ASTRO BEACON E ",
    "AUSTRALIAN 1966",
    "AUSTRALIAN 1984",
    "ASTRO DOS 7/14 ",
    "MARCUS ISLAND  ",
    "TERN ISLAND    ",
    "BELLEVUE (IGN) ",
    "BERMUDA 1957   ",
    "COLOMBIA       ",
    "CAMPO INCHAUSPE",
    "CANTON ASTRO   ",
    "CAPE CANAVERAL ",
    "CAPE (AFRICA)  ",
    "CARTHAGE       ",
    "CHATHAM 1971   ",
    "CHUA ASTRO     ",
    "CORREGO ALEGRE ",
    "DJAKARTA       ",
    "DOS 1968       ",
    "EASTER ISLAND  ",
    "EUROPEAN 1950  ",
    "EUROPEAN 1979  ",
    "FINLAND 1910   ",
    "GANDAJIKA BASE ",
    "NEW ZEALAND '49",
    "OSGB 1936      ",
    "GUAM 1963      ",
    "GUX 1 ASTRO    ",
    "HJOESEY 1955   ",
    "HONG KONG 1962 ",
    "INDIAN/NEPAL   ",
    "INDIAN/VIETNAM ",
    "IRELAND 1965   ",
    "DIEGO GARCIA   ",
    "JOHNSTON 1961  ",
    "KANDAWALA      ",
    "KERGUELEN ISL. ",
    "KERTAU 1948    ",
    "CAYMAN BRAC    ",
    "LIBERIA 1964   ",
    "LUZON/MINDANAO ",
    "LUZON PHILIPPI.",
    "MAHE 1971      ",
    "MARCO ASTRO    ",
    "MASSAWA        ",
    "MERCHICH       ",
    "MIDWAY ASTRO'61",
    "MINNA (NIGERIA)",
    "NAD-1927 ALASKA",
    "NAD-1927 BAHAM.",
    "NAD-1927 CENTR.",
    "NAD-1927 CANAL ",
    "NAD-1927 CANADA",
    "NAD-1927 CARIB.",
    "NAD-1927 CONUS ",
    "NAD-1927 CUBA  ",
    "NAD-1927 GREEN.",
    "NAD-1927 MEXICO",
    "NAD-1927 SALVA.",
    "NAD-1983       ",
    "NAPARIMA       ",
    "MASIRAH ISLAND ",
    "SAUDI ARABIA   ",
    "ARAB EMIRATES  ",
    "OBSERVATORIO'66",
    "OLD EGYIPTIAN  ",
    "OLD HAWAIIAN   ",
    "OMAN           ",
    "CANARY ISLAND  ",
    "PICAIRN 1967   ",
    "PUERTO RICO    ",
    "QATAR NATIONAL ",
    "QORNOQ         ",
    "REUNION        ",
    "ROME 1940      ",
    "RT-90 SWEDEN   ",
    "S.AMERICA  1956",
    "S.AMERICA  1956",
    "SOUTH ASIA     ",
    "CHILEAN 1963   ",
    "SANTO(DOS)     ",
    "SAO BRAZ       ",
    "SAPPER HILL    ",
    "SCHWARZECK     ",
    "SOUTHEAST BASE ",
    "FAIAL          ",
    "TIMBALI 1948   ",
    "TOKYO          ",
    "TRISTAN ASTRO  ",
    "RESERVED       ",
    "VITI LEVU 1916 ",
    "WAKE-ENIWETOK  ",
    "WGS-1972       ",
    "WGS-1984       ",
    "ZANDERIJ       ",
    "CH-1903        ",
];

fn format_gps_datum(gps_date: u8) -> &'static str {
    GPS_DATUM_TAB.get(gps_date as usize).copied().unwrap_or("")
}

fn format_competition_class(class_id: u8) -> &'static str {
    const NAMES: [&str; 7] = [
        "STANDARD", "15-METER", "OPEN", "18-METER", "WORLD", "DOUBLE", "MOTOR_GL",
    ];
    NAMES[class_id as usize]
}

/// A NUL-terminated byte field rendered as text, cut at the NUL.
fn c_string(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    field[..end].iter().map(|&b| b as char).collect()
}

fn hms(seconds: u32) -> (u32, u32, u32) {
    (seconds / 3600, seconds % 3600 / 60, seconds % 60)
}

/// `%02d%05d[NS]` / `%03d%05d[EW]` of a milli-arcminute coordinate.
fn format_angle(value: i32, degree_width: usize, minus: char, plus: char) -> String {
    let a = value.unsigned_abs();
    format!(
        "{:0w$}{:05}{}",
        a / 60000,
        a % 60000,
        if value < 0 { minus } else { plus },
        w = degree_width
    )
}

/// The streaming converter. Owns the output sink; the input arrives in
/// caller-sized chunks through [`LxnToIgc::feed`].
pub struct LxnToIgc<W> {
    igc: W,
    reader: LxnReader,
    flight_no: u8,
    date: String,
    flight_info: Option<FlightInfo>,
    time: u32,
    origin_time: u32,
    origin_latitude: i32,
    origin_longitude: i32,
    pending_event: Option<String>,
}

impl<W: Write> LxnToIgc<W> {
    pub fn new(igc: W) -> Self {
        LxnToIgc {
            igc,
            reader: LxnReader::new(),
            flight_no: 0,
            date: String::new(),
            flight_info: None,
            time: 0,
            origin_time: 0,
            origin_latitude: 0,
            origin_longitude: 0,
            pending_event: None,
        }
    }

    /// Whether the END record has been seen.
    pub fn is_end(&self) -> bool {
        self.reader.is_end
    }

    pub fn into_inner(self) -> W {
        self.igc
    }

    /// Process as much of `input` as possible. Returns the number of
    /// bytes consumed; a partial record at the end of the buffer
    /// surfaces as [`LkError::NeedMoreInput`] carrying that count, and
    /// the caller re-presents the unconsumed tail together with more
    /// data.
    pub fn feed(&mut self, input: &[u8]) -> Result<usize, LkError> {
        let mut consumed = 0;

        while consumed < input.len() {
            match self.reader.read(&input[consumed..]) {
                Ok((packet, length)) => {
                    self.handle_packet(packet)?;
                    consumed += length;
                }
                Err(LkError::NeedMoreInput { .. }) => {
                    return Err(LkError::NeedMoreInput { consumed });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(consumed)
    }

    fn emit_flight_info(&mut self, info: &FlightInfo, class: &str) -> Result<(), LkError> {
        write!(
            self.igc,
            "HFFXA{:03}\r\n\
             HFPLTPILOT:{}\r\n\
             HFGTYGLIDERTYPE:{}\r\n\
             HFGIDGLIDERID:{}\r\n\
             HFDTM{:03}GPSDATUM:{}\r\n\
             HFCIDCOMPETITIONID:{}\r\n\
             HFCCLCOMPETITIONCLASS:{}\r\n\
             HFGPSGPS:{}\r\n",
            info.fix_accuracy,
            info.pilot,
            info.glider,
            info.registration,
            info.gps_date,
            format_gps_datum(info.gps_date),
            info.competition_class,
            class,
            info.gps,
        )?;
        Ok(())
    }

    fn emit_ext_config(&mut self, letter: char, mask: u16, mut column: usize) -> Result<(), LkError> {
        let count = (0..16).filter(|bit| mask & (1 << bit) != 0).count();
        if count == 0 {
            return Ok(());
        }

        write!(self.igc, "{}{:02}", letter, count)?;
        for (bit, def) in EXTENSION_DEFS.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                write!(
                    self.igc,
                    "{:02}{:02}{}",
                    column,
                    column + def.width - 1,
                    def.code
                )?;
                column += def.width;
            }
        }
        write!(self.igc, "\r\n")?;
        Ok(())
    }

    fn handle_position(
        &mut self,
        ok: bool,
        dt: i16,
        dlat: i16,
        dlon: i16,
        aalt: u16,
        galt: u16,
    ) -> Result<(), LkError> {
        self.time = self.origin_time.wrapping_add(dt as i32 as u32);
        let latitude = self.origin_latitude + dlat as i32;
        let longitude = self.origin_longitude + dlon as i32;

        if let Some(event) = self.pending_event.take() {
            let (h, m, s) = hms(self.time);
            write!(self.igc, "E{:02}{:02}{:02}{}\r\n", h, m, s, event)?;
        }

        let (h, m, s) = hms(self.time);
        write!(
            self.igc,
            "B{:02}{:02}{:02}{}{}{}{:05}{:05}",
            h,
            m,
            s,
            format_angle(latitude, 2, 'S', 'N'),
            format_angle(longitude, 3, 'W', 'E'),
            if ok { 'A' } else { 'V' },
            aalt,
            galt,
        )?;

        // With extensions configured, the B line stays open; the
        // B-EXT record that follows appends and terminates it.
        if self.reader.b_ext.is_empty() {
            write!(self.igc, "\r\n")?;
        }

        Ok(())
    }

    fn handle_packet(&mut self, packet: LxnPacket<'_>) -> Result<(), LkError> {
        match packet {
            LxnPacket::ZeroRun(length) => {
                write!(self.igc, "LFILEMPTY{}\r\n", length)?;
            }
            LxnPacket::End => {}
            LxnPacket::Version { hardware, software } => {
                write!(
                    self.igc,
                    "HFRFWFIRMWAREVERSION:{:3.1}\r\nHFRHWHARDWAREVERSION:{:3.1}\r\n",
                    software as f64 / 10.0,
                    hardware as f64 / 10.0,
                )?;
            }
            LxnPacket::Start { flight_no } => {
                self.flight_no = flight_no;
            }
            LxnPacket::Origin {
                time,
                latitude,
                longitude,
            } => {
                self.origin_time = time;
                self.origin_latitude = latitude;
                self.origin_longitude = longitude;

                let (h, m, s) = hms(time);
                write!(
                    self.igc,
                    "LLXNORIGIN{:02}{:02}{:02}{}{}\r\n",
                    h,
                    m,
                    s,
                    format_angle(latitude, 2, 'S', 'N'),
                    format_angle(longitude, 3, 'W', 'E'),
                )?;
            }
            LxnPacket::SecurityOld { data } => {
                write!(self.igc, "G{:<22}\r\n", c_string(data))?;
            }
            LxnPacket::Serial { serial } => {
                write!(
                    self.igc,
                    "A{}FLIGHT:{}\r\nHFDTE{}\r\n",
                    serial, self.flight_no, self.date
                )?;
            }
            LxnPacket::Position {
                ok,
                time,
                latitude,
                longitude,
                aalt,
                galt,
            } => {
                self.handle_position(ok, time, latitude, longitude, aalt, galt)?;
            }
            LxnPacket::Security { level, data } => {
                let ch = match level {
                    SECURITY_HIGH => '2',
                    SECURITY_MED => '1',
                    SECURITY_LOW => '0',
                    _ => return Err(LkError::malformed("invalid security type")),
                };
                write!(self.igc, "G{}", ch)?;
                for b in data {
                    write!(self.igc, "{:02X}", b)?;
                }
                write!(self.igc, "\r\n")?;
            }
            LxnPacket::CompetitionClass { class_id } => {
                if let Some(info) = self.flight_info.take() {
                    if info.competition_class_id == 7 {
                        self.emit_flight_info(&info, &class_id)?;
                    }
                    self.flight_info = Some(info);
                }
            }
            LxnPacket::Task(task) => {
                self.time = task.time;
                let (h, m, s) = hms(task.time);
                write!(
                    self.igc,
                    "C{:02}{:02}{:02}{:02}{:02}{:02}{:02}{:02}{:02}{:04}{:02}\r\n",
                    task.day,
                    task.month,
                    task.year,
                    h,
                    m,
                    s,
                    task.day2,
                    task.month2,
                    task.year2,
                    task.task_id,
                    task.num_tps,
                )?;

                for tp in &task.turnpoints {
                    write!(
                        self.igc,
                        "C{}{}{}\r\n",
                        format_angle(tp.latitude, 2, 'S', 'N'),
                        format_angle(tp.longitude, 3, 'W', 'E'),
                        tp.name,
                    )?;
                }
            }
            LxnPacket::Event { data } => {
                self.pending_event = Some(c_string(data));
            }
            LxnPacket::BExt { values } => {
                let widths: Vec<usize> =
                    self.reader.b_ext.fields.iter().map(|f| f.width).collect();
                for (value, width) in values.iter().zip(widths) {
                    write!(self.igc, "{:0w$}", value, w = width)?;
                }
                write!(self.igc, "\r\n")?;
            }
            LxnPacket::KExt {
                time_offset,
                values,
            } => {
                let time = self.time.wrapping_add(time_offset as u32);
                let (h, m, s) = hms(time);
                write!(self.igc, "K{:02}{:02}{:02}", h, m, s)?;

                let widths: Vec<usize> =
                    self.reader.k_ext.fields.iter().map(|f| f.width).collect();
                for (value, width) in values.iter().zip(widths) {
                    write!(self.igc, "{:0w$}", value, w = width)?;
                }
                write!(self.igc, "\r\n")?;
            }
            LxnPacket::Date { day, month, year } => {
                if day > 31 || month > 12 {
                    return Err(LkError::malformed("invalid date"));
                }
                let full = format!("{:02}{:02}{:04}", day % 100, month % 100, year);
                self.date = full[..6].to_string();
            }
            LxnPacket::FlightInfo(info) => {
                if info.competition_class_id > 7 {
                    return Err(LkError::malformed("invalid competition class id"));
                }
                if info.competition_class_id < 7 {
                    let class = format_competition_class(info.competition_class_id);
                    self.emit_flight_info(&info, class)?;
                }
                self.flight_info = Some(info);
            }
            LxnPacket::KExtConfig { mask } => {
                self.emit_ext_config('J', mask, 8)?;
            }
            LxnPacket::BExtConfig { mask } => {
                self.emit_ext_config('I', mask, 36)?;
            }
            LxnPacket::String { text } => {
                let text: String = text.iter().map(|&b| b as char).collect();
                write!(self.igc, "{}\r\n", text)?;
            }
        }

        Ok(())
    }
}
