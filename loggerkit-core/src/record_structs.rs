//! This file contains the definitions of the packed binary records of
//! the Cenfis and Filser database formats. The layouts here are shared
//! by the parser and the writer crates; interpreting and emitting the
//! raw bytes lives over there.
//!
//! Byte order: every multi-byte field in the Cenfis family is
//! big-endian, with one exception carried over from the real devices:
//! the two magic words of the turnpoint database header are stored
//! little-endian. The Filser database stores its coordinates and its
//! frequency as little-endian IEEE-754 floats and everything else
//! big-endian.
use crate::errors::*;
use crate::turnpoint::TurnPointType;

use num::FromPrimitive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `0x8000` byte region. The bank-paged formats forbid records from
/// straddling a bank boundary.
pub const BANK_SIZE: usize = 0x8000;

pub const DAB_HEADER_LEN: usize = 512;
pub const DAB_RECORD_LEN: usize = 48;
/// The `0xff` filler block between the records and the index tables.
pub const DAB_FILLER_LEN: usize = 0x150;
pub const DAB_TABLE_ENTRY_LEN: usize = 3;
/// Offset of the four table pointers within the header.
pub const DAB_TABLES_OFFSET: usize = 64;
/// Offset of the header-size/count block within the header.
pub const DAB_COUNTS_OFFSET: usize = 320;
pub const DAB_MAGIC_1: u16 = 0x1046;
pub const DAB_MAGIC_2: u16 = 0x3141;
pub const DAB_TITLE_LEN: usize = 14;
pub const DAB_DESCRIPTION_LEN: usize = 14;

pub const DA4_RECORD_LEN: usize = 28;
pub const DA4_RECORD_COUNT: usize = 600;
/// The task area after the 600 turn point records, all zero.
pub const DA4_TRAILER_LEN: usize = 6900;
pub const DA4_CODE_LEN: usize = 8;

pub const CENFIS_FILE_HEADER_LEN: usize = 0x200;
pub const CENFIS_RECORD_HEADER_LEN: usize = 30;
/// The airspace region of a Cenfis airspace file is addressed from
/// this device base (bank 0xc).
pub const CENFIS_AIRSPACE_BASE: u32 = 0x60000;
/// Length of the config block at the end of a Cenfis airspace file;
/// its trailing bytes go through the byte mixer.
pub const CENFIS_CONFIG_LEN: usize = 0xe2;

/// The point class stored in a Cenfis database record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DabPointKind {
    Airfield = 1,
    GliderSite = 2,
    MilitaryAirfield = 3,
    Outlanding = 4,
    Thermals = 5,
}

impl DabPointKind {
    /// NB: We give a result here to make life simpler for ourselves down the line.
    pub fn new(source: u8) -> Result<Self, LkError> {
        DabPointKind::from_u8(source).ok_or_else(|| LkError::ParseEnum {
            f: "DabPointKind".to_string(),
            code: source as u16,
        })
    }

    pub fn from_turn_point_type(kind: TurnPointType) -> Option<Self> {
        match kind {
            TurnPointType::Airfield => Some(DabPointKind::Airfield),
            TurnPointType::MilitaryAirfield => Some(DabPointKind::MilitaryAirfield),
            TurnPointType::GliderSite => Some(DabPointKind::GliderSite),
            TurnPointType::Outlanding => Some(DabPointKind::Outlanding),
            TurnPointType::Thermals => Some(DabPointKind::Thermals),
            _ => None,
        }
    }

    pub fn to_turn_point_type(self) -> TurnPointType {
        match self {
            DabPointKind::Airfield => TurnPointType::Airfield,
            DabPointKind::GliderSite => TurnPointType::GliderSite,
            DabPointKind::MilitaryAirfield => TurnPointType::MilitaryAirfield,
            DabPointKind::Outlanding => TurnPointType::Outlanding,
            DabPointKind::Thermals => TurnPointType::Thermals,
        }
    }
}

/// Which of the four index tables a point class belongs to:
/// 0 = other, 1 = airfield, 2 = glider site, 3 = outlanding.
/// Thermals points are not indexed at all.
pub fn dab_table_index(kind: u8) -> Option<usize> {
    match kind {
        0 => Some(0),
        1 | 3 => Some(1),
        2 => Some(2),
        4 => Some(3),
        _ => None,
    }
}

/// A parsed 48-byte Cenfis database record.
///
/// Latitude and longitude are in units of 1/600 of an arc minute, and
/// the longitude sign is inverted relative to convention
/// (east-negative).
#[derive(Debug, Clone, PartialEq)]
pub struct DabRecord {
    pub latitude: i32,
    pub longitude: i32,
    /// Meters above sea level.
    pub altitude: u16,
    pub kind: u8,
    /// 24-bit field on disk, in kilohertz.
    pub frequency_khz: u32,
    pub title: [u8; DAB_TITLE_LEN],
    pub description: [u8; DAB_DESCRIPTION_LEN],
    pub rwy1: u8,
    pub rwy2: u8,
}

impl Default for DabRecord {
    fn default() -> Self {
        DabRecord {
            latitude: 0,
            longitude: 0,
            altitude: 0,
            kind: 0,
            frequency_khz: 0,
            title: [b' '; DAB_TITLE_LEN],
            description: [b' '; DAB_DESCRIPTION_LEN],
            rwy1: 0,
            rwy2: 0,
        }
    }
}

/// One of the four table pointers in a Cenfis database header.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DabTablePointer {
    pub offset: u32,
    pub count: u16,
}

/// The interesting fields of a parsed Cenfis database header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DabHeader {
    pub tables: [DabTablePointer; 4],
    pub overall_count: u16,
    pub after_tp_offset: u32,
}

/// A parsed 28-byte Filser turn point record.
#[derive(Debug, Clone, PartialEq)]
pub struct Da4Record {
    pub valid: u8,
    pub code: [u8; DA4_CODE_LEN],
    /// Degrees, IEEE-754 on disk.
    pub latitude: f32,
    pub longitude: f32,
    pub altitude_ft: u16,
    /// MHz, IEEE-754 on disk.
    pub frequency_mhz: f32,
    /// `G` grass, `C` asphalt, `V` unknown, `S` outlanding.
    pub surface: u8,
    pub direction: u8,
    pub length_ft: u16,
}

impl Default for Da4Record {
    fn default() -> Self {
        Da4Record {
            valid: 0,
            code: [b' '; DA4_CODE_LEN],
            latitude: 0.0,
            longitude: 0.0,
            altitude_ft: 0,
            frequency_mhz: 0.0,
            surface: b' ',
            direction: 0,
            length_ft: 0,
        }
    }
}

/// A region descriptor in the Cenfis airspace file header.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CenfisRegionPointer {
    pub offset: u32,
    pub total_size: u16,
    pub num_elements: u16,
}

/// The little header in front of every Cenfis airspace record: the
/// record length followed by per-field indices relative to the record
/// start. A zero index means the field is not present.
///
/// The on-disk field order is the device's, not alphabetical; note the
/// AN4 index sitting between FIS and the file info.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CenfisRecordHeader {
    pub rec_length: u16,
    pub ac: u16,
    pub s: u16,
    pub ap: u16,
    pub c: u16,
    pub an: u16,
    pub an2: u16,
    pub an3: u16,
    pub al: u16,
    pub ah: u16,
    pub l: u16,
    pub fis: u16,
    pub an4: u16,
    pub file_info: u16,
    pub voice: u16,
}

impl CenfisRecordHeader {
    /// The header fields in on-disk order.
    pub fn fields(&self) -> [u16; 15] {
        [
            self.rec_length,
            self.ac,
            self.s,
            self.ap,
            self.c,
            self.an,
            self.an2,
            self.an3,
            self.al,
            self.ah,
            self.l,
            self.fis,
            self.an4,
            self.file_info,
            self.voice,
        ]
    }
}
