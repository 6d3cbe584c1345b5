//! Angles, distances, altitudes and positions.
//!
//! All angles are kept as signed integers in units of a thousandth of
//! an arc minute; every file format rescales from or to that
//! representation. The rescaling rounds to the nearest representable
//! value so that a value survives a round trip through a coarser
//! factor wherever the coarser factor can represent it at all.
use crate::errors::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of sub-degree units per degree in the canonical
/// representation: milli-arcminutes.
pub const ANGLE_FACTOR: i32 = 1000;

fn rescale(v: i32, old_factor: i32, new_factor: i32) -> i32 {
    let sign: i64 = if v < 0 { -1 } else { 1 };
    let a = v as i64 * sign;

    (sign * ((a * new_factor as i64 + (old_factor as i64 + 1) / 2 - 1) / old_factor as i64)) as i32
}

/// An angle which describes the position of an object on the earth,
/// in milli-arcminutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Angle {
    value: i32,
}

impl Angle {
    /// Construct from a raw milli-arcminute value.
    pub fn from_milliminutes(value: i32) -> Self {
        Angle { value }
    }

    /// Construct from a value whose sub-degree denominator is `factor`
    /// (e.g. 60 for arc seconds, 600 for the Cenfis database).
    /// ```
    /// # use loggerkit_core::geodesy::Angle;
    /// // 50 degrees, 30 arc minutes, expressed in arc seconds:
    /// let a = Angle::from_value((50 * 60 + 30) * 60, 60);
    /// assert_eq!(a.value(), (50 * 60 + 30) * 1000);
    /// ```
    pub fn from_value(value: i32, factor: i32) -> Self {
        Angle {
            value: rescale(value, factor, ANGLE_FACTOR),
        }
    }

    /// Construct from a sign and a degree/minute/second triple.
    pub fn from_dms(sign: i32, degrees: u32, minutes: u32, seconds: u32) -> Self {
        let seconds_total = ((degrees * 60 + minutes) * 60 + seconds) as i32;
        Angle::from_value(sign.signum() * seconds_total, 60)
    }

    /// Construct from a floating-point radian value.
    pub fn from_radians(radians: f64) -> Self {
        Angle {
            value: (radians * 180.0 * 60.0 * 1000.0 / std::f64::consts::PI) as i32,
        }
    }

    /// The raw milli-arcminute value.
    pub fn value(self) -> i32 {
        self.value
    }

    /// Rescale to another sub-degree denominator, rounding to the
    /// nearest representable value.
    pub fn refactor(self, factor: i32) -> i32 {
        rescale(self.value, ANGLE_FACTOR, factor)
    }

    pub fn to_radians(self) -> f64 {
        self.value as f64 * std::f64::consts::PI / (180.0 * 60.0 * 1000.0)
    }
}

macro_rules! angle_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(pub Angle);

        impl $name {
            pub fn from_milliminutes(value: i32) -> Self {
                $name(Angle::from_milliminutes(value))
            }
            pub fn from_value(value: i32, factor: i32) -> Self {
                $name(Angle::from_value(value, factor))
            }
            pub fn from_dms(sign: i32, degrees: u32, minutes: u32, seconds: u32) -> Self {
                $name(Angle::from_dms(sign, degrees, minutes, seconds))
            }
            pub fn value(self) -> i32 {
                self.0.value()
            }
            pub fn refactor(self, factor: i32) -> i32 {
                self.0.refactor(factor)
            }
            pub fn to_radians(self) -> f64 {
                self.0.to_radians()
            }
        }
    };
}

angle_newtype!(Latitude);
angle_newtype!(Longitude);

/// Units a [`Distance`] can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceUnit {
    Meters,
    Feet,
    NauticalMiles,
}

/// The great circle distance between two points on earth's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Distance {
    pub unit: DistanceUnit,
    pub value: f64,
}

impl Distance {
    pub fn new(unit: DistanceUnit, value: f64) -> Self {
        Distance { unit, value }
    }

    /// The canonical meter value.
    pub fn meters(&self) -> f64 {
        match self.unit {
            DistanceUnit::Meters => self.value,
            DistanceUnit::Feet => self.value / 3.2808399,
            DistanceUnit::NauticalMiles => self.value * 1852.0,
        }
    }

    pub fn to_unit(&self, unit: DistanceUnit) -> Distance {
        if unit == self.unit {
            return *self;
        }
        let meters = self.meters();
        let value = match unit {
            DistanceUnit::Meters => meters,
            DistanceUnit::Feet => meters * 3.2808399,
            DistanceUnit::NauticalMiles => meters / 1852.0,
        };
        Distance { unit, value }
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.meters().partial_cmp(&other.meters())
    }
}

/// Units an [`Altitude`] can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AltitudeUnit {
    Meters,
    Feet,
}

/// What an [`Altitude`] is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AltitudeRef {
    /// Mean sea level.
    Msl,
    /// Ground level.
    Gnd,
    /// The 1013.25 hPa standard pressure surface (flight levels).
    Standard1013,
    /// Relative to the airfield elevation.
    Airfield,
}

/// Vertical altitude of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Altitude {
    pub value: i32,
    pub unit: AltitudeUnit,
    pub reference: AltitudeRef,
}

impl Altitude {
    pub fn new(value: i32, unit: AltitudeUnit, reference: AltitudeRef) -> Self {
        Altitude {
            value,
            unit,
            reference,
        }
    }

    /// Convert to another unit. The conversion factor is the
    /// traditional 3.28 and the result is truncated; the reference is
    /// never touched by a unit conversion.
    pub fn to_unit(self, unit: AltitudeUnit) -> Altitude {
        if unit == self.unit {
            return self;
        }
        let value = match (self.unit, unit) {
            (AltitudeUnit::Meters, AltitudeUnit::Feet) => (self.value as f64 * 3.28) as i32,
            (AltitudeUnit::Feet, AltitudeUnit::Meters) => (self.value as f64 / 3.28) as i32,
            _ => self.value,
        };
        Altitude {
            value,
            unit,
            reference: self.reference,
        }
    }
}

/// The 2D position of an object on the earth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfacePosition {
    pub latitude: Latitude,
    pub longitude: Longitude,
}

impl SurfacePosition {
    pub fn new(latitude: Latitude, longitude: Longitude) -> Self {
        SurfacePosition {
            latitude,
            longitude,
        }
    }

    /// The great circle distance to another surface position
    /// (haversine formula, mean earth radius), in meters.
    pub fn distance_to(&self, other: &SurfacePosition) -> Distance {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = other.longitude.to_radians() - self.longitude.to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        Distance::new(DistanceUnit::Meters, EARTH_RADIUS_M * c)
    }
}

/// The 3D position of an object on the earth. The object is regarded
/// as positioned even if there is no altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub surface: SurfacePosition,
    pub altitude: Option<Altitude>,
}

impl Position {
    pub fn new(latitude: Latitude, longitude: Longitude, altitude: Option<Altitude>) -> Self {
        Position {
            surface: SurfacePosition::new(latitude, longitude),
            altitude,
        }
    }

    pub fn latitude(&self) -> Latitude {
        self.surface.latitude
    }

    pub fn longitude(&self) -> Longitude {
        self.surface.longitude
    }
}

/// Parse a distance literal as used in the filter arguments:
/// a float followed by `km`, `m`, `ft` or `NM`.
/// ```
/// # use loggerkit_core::geodesy::{parse_distance, DistanceUnit};
/// let d = parse_distance("1.5km").unwrap();
/// assert_eq!(d.unit, DistanceUnit::Meters);
/// assert_eq!(d.value, 1500.0);
/// ```
pub fn parse_distance(input: &str) -> Result<Distance, LkError> {
    let split = input
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| LkError::malformed("no distance unit was provided"))?;
    let (number, suffix) = input.split_at(split);
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| LkError::malformed("failed to parse distance value"))?;

    match suffix {
        "km" => Ok(Distance::new(DistanceUnit::Meters, value * 1000.0)),
        "m" => Ok(Distance::new(DistanceUnit::Meters, value)),
        "ft" => Ok(Distance::new(DistanceUnit::Feet, value)),
        "NM" => Ok(Distance::new(DistanceUnit::NauticalMiles, value)),
        _ => Err(LkError::malformed("unknown distance unit")),
    }
}

/// Parse a `DDMM.mmm` + hemisphere-letter angle literal, the grammar
/// the SeeYou format and the position filter argument share. Returns
/// the milli-arcminute value and the unparsed remainder.
pub fn parse_angle_literal(
    input: &str,
    minus_letter: char,
    plus_letter: char,
) -> Result<(i32, &str), LkError> {
    let dot = input
        .find('.')
        .ok_or_else(|| LkError::malformed("expected DDMM.mmm angle"))?;
    let whole: u32 = input[..dot]
        .parse()
        .map_err(|_| LkError::malformed("expected DDMM.mmm angle"))?;
    let rest = &input[dot + 1..];
    let frac_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| LkError::malformed("missing hemisphere letter"))?;
    if frac_len == 0 || frac_len > 3 {
        return Err(LkError::malformed("expected three fractional digits"));
    }
    let mut fraction: u32 = rest[..frac_len].parse().unwrap_or(0);
    for _ in frac_len..3 {
        fraction *= 10;
    }

    let mut chars = rest[frac_len..].chars();
    let hemisphere = chars.next().unwrap();
    let sign = if hemisphere == minus_letter {
        -1
    } else if hemisphere == plus_letter {
        1
    } else {
        return Err(LkError::malformed("invalid hemisphere letter"));
    };

    let degrees = whole / 100;
    let minutes = whole % 100;
    if degrees > 180 || minutes >= 60 {
        return Err(LkError::malformed("angle out of range"));
    }

    let value = sign * ((degrees * 60 + minutes) * 1000 + fraction) as i32;
    Ok((value, chars.as_str()))
}

/// Parse a position literal: `DDMM.mmm[NS]` `DDDMM.mmm[EW]` with an
/// optional comma or spaces in between.
/// ```
/// # use loggerkit_core::geodesy::parse_position;
/// let p = parse_position("5012.345N00823.456E").unwrap();
/// assert_eq!(p.latitude.value(), 3_012_345);
/// assert_eq!(p.longitude.value(), 503_456);
/// ```
pub fn parse_position(input: &str) -> Result<SurfacePosition, LkError> {
    let (lat, rest) = parse_angle_literal(input.trim(), 'S', 'N')?;
    let rest = rest.trim_start_matches(|c| c == ' ' || c == ',');
    let (lon, rest) = parse_angle_literal(rest, 'W', 'E')?;
    if !rest.trim().is_empty() {
        return Err(LkError::malformed("trailing input after position"));
    }

    Ok(SurfacePosition::new(
        Latitude::from_milliminutes(lat),
        Longitude::from_milliminutes(lon),
    ))
}
