//! The turn point record and its sub-structures.
use crate::aviation::Frequency;
use crate::geodesy::Position;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The semantic role of a turn point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TurnPointType {
    Unknown,
    Airfield,
    MilitaryAirfield,
    GliderSite,
    UltralightField,
    Outlanding,
    MountainPass,
    MountainTop,
    Ropeway,
    Sender,
    Vor,
    Ndb,
    CoolTower,
    Chimney,
    Lake,
    Dam,
    Tunnel,
    Bridge,
    PowerPlant,
    Castle,
    Church,
    Ruin,
    Building,
    HighwayIntersection,
    HighwayExit,
    Garage,
    RailwayIntersection,
    RailwayStation,
    MountainWave,
    Thermals,
}

impl Default for TurnPointType {
    fn default() -> Self {
        TurnPointType::Unknown
    }
}

impl TurnPointType {
    /// Whether a glider could land here: the subset the `airfield`
    /// filter admits.
    pub fn is_airfield(self) -> bool {
        matches!(
            self,
            TurnPointType::Airfield
                | TurnPointType::MilitaryAirfield
                | TurnPointType::GliderSite
                | TurnPointType::UltralightField
                | TurnPointType::Outlanding
        )
    }
}

/// What an airfield's runway is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunwaySurface {
    Grass,
    Asphalt,
}

/// Description of an airfield's runway. The direction, when present,
/// is in the range 1..=36.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Runway {
    pub surface: Option<RunwaySurface>,
    pub direction: Option<u8>,
    /// Length in meters.
    pub length: Option<u32>,
}

impl Runway {
    pub fn new(surface: Option<RunwaySurface>, direction: Option<u8>, length: Option<u32>) -> Self {
        Runway {
            surface,
            direction,
            length,
        }
    }
}

/// A turn point used for navigation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TurnPoint {
    pub full_name: String,
    pub short_name: String,
    pub code: String,
    pub country: String,
    pub position: Option<Position>,
    pub kind: TurnPointType,
    pub runway: Runway,
    pub frequency: Option<Frequency>,
    pub description: String,
}

impl TurnPoint {
    /// The most specific name that is present: code, else short name,
    /// else full name.
    pub fn any_name(&self) -> &str {
        if !self.code.is_empty() {
            &self.code
        } else if !self.short_name.is_empty() {
            &self.short_name
        } else {
            &self.full_name
        }
    }

    /// A name that fits a fixed-width field of `max_length` bytes.
    /// The shortest present name that already fits is preferred;
    /// otherwise the most specific name is cut down.
    pub fn abbreviated_name(&self, max_length: usize) -> String {
        for name in [&self.code, &self.short_name, &self.full_name] {
            if !name.is_empty() && name.len() <= max_length {
                return name.clone();
            }
        }

        let name = self.any_name();
        name.chars().take(max_length).collect()
    }
}
