//! Aviation-specific primitives.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A VHF radio frequency, stored as a whole number of hertz.
///
/// Undefined frequencies are expressed as `Option<Frequency>` at the
/// use sites; a `Frequency` itself is always a real value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frequency {
    hertz: u32,
}

impl Frequency {
    pub fn from_hertz(hertz: u32) -> Option<Self> {
        if hertz == 0 {
            None
        } else {
            Some(Frequency { hertz })
        }
    }

    /// Construct from the usual "123.456" MHz/kHz split. Values that
    /// do not fit a hertz count are undefined rather than wrapped.
    pub fn from_mhz_khz(mhz: u32, khz: u32) -> Option<Self> {
        let hertz = (mhz as u64 * 1000 + khz as u64) * 1000;
        if hertz > u32::MAX as u64 {
            return None;
        }
        Self::from_hertz(hertz as u32)
    }

    pub fn hertz(self) -> u32 {
        self.hertz
    }

    pub fn megahertz(self) -> u32 {
        self.hertz / 1_000_000
    }

    pub fn kilohertz(self) -> u32 {
        self.hertz / 1000
    }

    /// The kHz digits behind the decimal point, e.g. 456 for 123.456 MHz.
    pub fn kilohertz_part(self) -> u32 {
        self.kilohertz() % 1000
    }
}
