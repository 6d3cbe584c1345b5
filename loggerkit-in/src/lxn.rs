//! Framing for the LXN flight-recorder byte stream: a sequence of
//! variable-length records, each introduced by a single command byte
//! that decides its length and structure.
//!
//! The reader never blocks and never copies: [`LxnReader::read`]
//! either decodes one complete record from the front of the caller's
//! buffer or reports [`LkError::NeedMoreInput`], in which case the
//! caller re-presents the same bytes plus more. Two of the records
//! (the `J`/`I` extension configurations) change how later records are
//! framed, so the reader carries that state between calls.
use loggerkit_core::bitconverter::*;
use loggerkit_core::errors::*;

pub const CMD_END: u8 = 0x40;
pub const CMD_VERSION: u8 = 0x7f;
pub const CMD_START: u8 = 0x80;
pub const CMD_ORIGIN: u8 = 0xa0;
pub const CMD_SECURITY_OLD: u8 = 0xf5;
pub const CMD_SERIAL: u8 = 0xf6;
pub const CMD_POSITION_OK: u8 = 0xbf;
pub const CMD_POSITION_BAD: u8 = 0xc3;
pub const CMD_SECURITY: u8 = 0xf0;
pub const CMD_COMPETITION_CLASS: u8 = 0xf1;
pub const CMD_EVENT: u8 = 0xf4;
pub const CMD_TASK: u8 = 0xf7;
pub const CMD_B_EXT: u8 = 0xf9;
pub const CMD_K_EXT: u8 = 0xfa;
pub const CMD_DATE: u8 = 0xfb;
pub const CMD_FLIGHT_INFO: u8 = 0xfc;
/// 'J': extensions in the 'K' record.
pub const CMD_K_EXT_CONFIG: u8 = 0xfe;
/// 'I': extensions to the 'B' record.
pub const CMD_B_EXT_CONFIG: u8 = 0xff;

pub const SECURITY_LOW: u8 = 0x0d;
pub const SECURITY_MED: u8 = 0x0e;
pub const SECURITY_HIGH: u8 = 0x0f;

/// One optional per-fix extension: its three-letter code and the
/// field width in digits.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionDef {
    pub code: &'static str,
    pub width: usize,
}

/// The sixteen extensions, by bit index in the configuration mask.
pub const EXTENSION_DEFS: [ExtensionDef; 16] = [
    ExtensionDef { code: "FXA", width: 3 },
    ExtensionDef { code: "VXA", width: 3 },
    ExtensionDef { code: "RPM", width: 5 },
    ExtensionDef { code: "GSP", width: 5 },
    ExtensionDef { code: "IAS", width: 5 },
    ExtensionDef { code: "TAS", width: 5 },
    ExtensionDef { code: "HDM", width: 3 },
    ExtensionDef { code: "HDT", width: 3 },
    ExtensionDef { code: "TRM", width: 3 },
    ExtensionDef { code: "TRT", width: 3 },
    ExtensionDef { code: "TEN", width: 5 },
    ExtensionDef { code: "WDI", width: 3 },
    ExtensionDef { code: "WVE", width: 5 },
    ExtensionDef { code: "ENL", width: 3 },
    ExtensionDef { code: "VAR", width: 3 },
    ExtensionDef { code: "XX3", width: 3 },
];

/// One configured extension field of a `B` or `K` record.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionField {
    pub code: &'static str,
    pub width: usize,
    /// Starting column in the emitted text line.
    pub column: usize,
}

/// The active extension vector for one record letter.
#[derive(Debug, Clone, Default)]
pub struct ExtensionConfig {
    pub fields: Vec<ExtensionField>,
}

impl ExtensionConfig {
    fn from_mask(mask: u16, mut column: usize) -> Self {
        let mut fields = Vec::new();
        for (bit, def) in EXTENSION_DEFS.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                fields.push(ExtensionField {
                    code: def.code,
                    width: def.width,
                    column,
                });
                column += def.width;
            }
        }
        ExtensionConfig { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The flight information record, strings already unpacked.
#[derive(Debug, Clone, Default)]
pub struct FlightInfo {
    pub id: u16,
    pub pilot: String,
    pub glider: String,
    pub registration: String,
    pub competition_class: String,
    pub competition_class_id: u8,
    pub observer: String,
    pub gps_date: u8,
    pub fix_accuracy: u8,
    pub gps: String,
}

/// One declared task turn point.
#[derive(Debug, Clone)]
pub struct TaskTurnPoint {
    pub latitude: i32,
    pub longitude: i32,
    pub name: String,
}

/// The task declaration record.
#[derive(Debug, Clone)]
pub struct Task {
    pub time: u32,
    pub day: u8,
    pub month: u8,
    pub year: u8,
    pub day2: u8,
    pub month2: u8,
    pub year2: u8,
    pub task_id: u16,
    pub num_tps: u8,
    /// One entry per used slot, at most twelve.
    pub turnpoints: Vec<TaskTurnPoint>,
}

/// One decoded record. Borrowed payloads point into the caller's
/// buffer.
#[derive(Debug)]
pub enum LxnPacket<'a> {
    /// A run of zero bytes of the given length.
    ZeroRun(usize),
    End,
    Version {
        hardware: u8,
        software: u8,
    },
    Start {
        flight_no: u8,
    },
    Origin {
        time: u32,
        latitude: i32,
        longitude: i32,
    },
    SecurityOld {
        data: &'a [u8],
    },
    Serial {
        serial: String,
    },
    Position {
        ok: bool,
        time: i16,
        latitude: i16,
        longitude: i16,
        aalt: u16,
        galt: u16,
    },
    Security {
        level: u8,
        data: &'a [u8],
    },
    CompetitionClass {
        class_id: String,
    },
    Event {
        data: &'a [u8],
    },
    Task(Task),
    BExt {
        values: Vec<u16>,
    },
    KExt {
        time_offset: u8,
        values: Vec<u16>,
    },
    Date {
        day: u8,
        month: u8,
        year: u16,
    },
    FlightInfo(FlightInfo),
    /// `J` configuration; the reader has already absorbed the mask.
    KExtConfig {
        mask: u16,
    },
    /// `I` configuration; the reader has already absorbed the mask.
    BExtConfig {
        mask: u16,
    },
    /// Any other command below 0x40 is a literal comment string.
    String {
        text: &'a [u8],
    },
}

const ZERO_LEN: usize = 0;

fn fixed_packet_length(cmd: u8) -> usize {
    match cmd {
        CMD_END => 1,
        CMD_VERSION => 3,
        CMD_START => 10,
        CMD_ORIGIN => 13,
        CMD_SECURITY_OLD => 23,
        CMD_SERIAL => 10,
        CMD_POSITION_OK | CMD_POSITION_BAD => 11,
        CMD_SECURITY => 67,
        CMD_COMPETITION_CLASS => 10,
        CMD_EVENT => 10,
        CMD_TASK => 230,
        CMD_DATE => 5,
        CMD_FLIGHT_INFO => 119,
        CMD_K_EXT_CONFIG | CMD_B_EXT_CONFIG => 5,
        _ => ZERO_LEN,
    }
}

/// A fixed-size string field must contain a terminating NUL.
fn unpack_string(field: &[u8]) -> Result<String, LkError> {
    let nul = field
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| LkError::malformed("invalid string"))?;
    Ok(field[..nul].iter().map(|&b| b as char).collect())
}

#[derive(Debug, Default)]
pub struct LxnReader {
    pub is_end: bool,
    pub k_ext: ExtensionConfig,
    pub b_ext: ExtensionConfig,
}

impl LxnReader {
    pub fn new() -> Self {
        Self::default()
    }

    fn packet_length(&self, input: &[u8]) -> Result<usize, LkError> {
        let cmd = input[0];

        let fixed = fixed_packet_length(cmd);
        if fixed != ZERO_LEN {
            return Ok(fixed);
        }

        match cmd {
            0x00 => {
                let mut length = 1;
                while length < input.len() && input[length] == 0 {
                    length += 1;
                }
                Ok(length)
            }
            CMD_B_EXT => Ok(1 + 2 * self.b_ext.len()),
            CMD_K_EXT => Ok(2 + 2 * self.k_ext.len()),
            _ if cmd < 0x40 => Ok(1 + cmd as usize),
            _ => Err(LkError::malformed("unknown command")),
        }
    }

    /// Decode one record from the front of `input`. Returns the packet
    /// and the number of bytes it occupied.
    pub fn read<'a>(&mut self, input: &'a [u8]) -> Result<(LxnPacket<'a>, usize), LkError> {
        if input.is_empty() {
            return Err(LkError::NeedMoreInput { consumed: 0 });
        }
        if self.is_end {
            return Err(LkError::malformed("read past end"));
        }

        let length = self.packet_length(input)?;
        if length > input.len() {
            return Err(LkError::NeedMoreInput { consumed: 0 });
        }

        let p = &input[..length];
        let cmd = p[0];

        let packet = match cmd {
            0x00 => LxnPacket::ZeroRun(length),
            CMD_END => {
                self.is_end = true;
                LxnPacket::End
            }
            CMD_VERSION => LxnPacket::Version {
                hardware: p[1],
                software: p[2],
            },
            CMD_START => {
                if &p[1..9] != b"STReRAZ\0" {
                    return Err(LkError::malformed("invalid start signature"));
                }
                LxnPacket::Start { flight_no: p[9] }
            }
            CMD_ORIGIN => LxnPacket::Origin {
                time: read_u32_be(&p[1..5])?,
                latitude: read_i32_be(&p[5..9])?,
                longitude: read_i32_be(&p[9..13])?,
            },
            CMD_SECURITY_OLD => LxnPacket::SecurityOld { data: &p[1..23] },
            CMD_SERIAL => LxnPacket::Serial {
                serial: unpack_string(&p[1..10])
                    .map_err(|_| LkError::malformed("invalid serial number"))?,
            },
            CMD_POSITION_OK | CMD_POSITION_BAD => LxnPacket::Position {
                ok: cmd == CMD_POSITION_OK,
                time: read_i16_be(&p[1..3])?,
                latitude: read_i16_be(&p[3..5])?,
                longitude: read_i16_be(&p[5..7])?,
                aalt: read_u16_be(&p[7..9])?,
                galt: read_u16_be(&p[9..11])?,
            },
            CMD_SECURITY => {
                let length = (p[1] as usize).min(64);
                LxnPacket::Security {
                    level: p[2],
                    data: &p[3..3 + length],
                }
            }
            CMD_COMPETITION_CLASS => LxnPacket::CompetitionClass {
                class_id: unpack_string(&p[1..10])
                    .map_err(|_| LkError::malformed("invalid competition class"))?,
            },
            CMD_EVENT => {
                if !p[1..10].contains(&0) {
                    return Err(LkError::malformed("invalid event name"));
                }
                LxnPacket::Event { data: &p[1..10] }
            }
            CMD_TASK => LxnPacket::Task(parse_task(p)?),
            CMD_B_EXT => {
                let mut values = Vec::with_capacity(self.b_ext.len());
                for i in 0..self.b_ext.len() {
                    values.push(read_u16_be(&p[1 + 2 * i..])?);
                }
                LxnPacket::BExt { values }
            }
            CMD_K_EXT => {
                let mut values = Vec::with_capacity(self.k_ext.len());
                for i in 0..self.k_ext.len() {
                    values.push(read_u16_be(&p[2 + 2 * i..])?);
                }
                LxnPacket::KExt {
                    time_offset: p[1],
                    values,
                }
            }
            CMD_DATE => LxnPacket::Date {
                day: p[1],
                month: p[2],
                year: read_u16_be(&p[3..5])?,
            },
            CMD_FLIGHT_INFO => LxnPacket::FlightInfo(parse_flight_info(p)?),
            CMD_K_EXT_CONFIG => {
                let mask = read_u16_be(&p[3..5])?;
                self.k_ext = ExtensionConfig::from_mask(mask, 8);
                LxnPacket::KExtConfig { mask }
            }
            CMD_B_EXT_CONFIG => {
                let mask = read_u16_be(&p[3..5])?;
                self.b_ext = ExtensionConfig::from_mask(mask, 36);
                LxnPacket::BExtConfig { mask }
            }
            _ if cmd < 0x40 => LxnPacket::String { text: &p[1..] },
            _ => return Err(LkError::malformed("unknown command")),
        };

        Ok((packet, length))
    }
}

fn parse_task(p: &[u8]) -> Result<Task, LkError> {
    let mut turnpoints = Vec::new();
    for i in 0..12 {
        if p[14 + i] == 0 {
            continue;
        }
        let longitude = read_i32_be(&p[26 + 4 * i..])?;
        let latitude = read_i32_be(&p[74 + 4 * i..])?;
        let name = unpack_string(&p[122 + 9 * i..122 + 9 * (i + 1)])
            .map_err(|_| LkError::malformed("invalid task name"))?;
        turnpoints.push(TaskTurnPoint {
            latitude,
            longitude,
            name,
        });
    }

    Ok(Task {
        time: read_u32_be(&p[1..5])?,
        day: p[5],
        month: p[6],
        year: p[7],
        day2: p[8],
        month2: p[9],
        year2: p[10],
        task_id: read_u16_be(&p[11..13])?,
        num_tps: p[13],
        turnpoints,
    })
}

fn parse_flight_info(p: &[u8]) -> Result<FlightInfo, LkError> {
    let invalid = |_| LkError::malformed("invalid flight info string");

    Ok(FlightInfo {
        id: read_u16_be(&p[1..3])?,
        pilot: unpack_string(&p[3..22]).map_err(invalid)?,
        glider: unpack_string(&p[22..34]).map_err(invalid)?,
        registration: unpack_string(&p[34..42]).map_err(invalid)?,
        competition_class: unpack_string(&p[42..46]).map_err(invalid)?,
        competition_class_id: p[46],
        observer: unpack_string(&p[47..57]).unwrap_or_default(),
        gps_date: p[57],
        fix_accuracy: p[58],
        gps: unpack_string(&p[59..119]).map_err(invalid)?,
    })
}
