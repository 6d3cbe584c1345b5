// Copyright (C) 2022 by GiGa infosystems.
//! Here we write objects out and read them back in, to test that
//! `loggerkit_in` and `loggerkit_out` are compatible, and pin down the
//! byte-level framing the devices depend on.
use loggerkit_core::aviation::Frequency;
use loggerkit_core::geodesy::*;
use loggerkit_core::turnpoint::*;

mod framing;
mod roundtrip;

pub(crate) fn sample_turnpoint() -> TurnPoint {
    TurnPoint {
        full_name: "Foo".to_string(),
        short_name: String::new(),
        code: "FOO".to_string(),
        country: "DE".to_string(),
        position: Some(Position::new(
            Latitude::from_milliminutes(3_012_345),
            Longitude::from_milliminutes(503_456),
            Some(Altitude::new(123, AltitudeUnit::Meters, AltitudeRef::Msl)),
        )),
        kind: TurnPointType::GliderSite,
        runway: Runway::new(None, None, None),
        frequency: Frequency::from_mhz_khz(123, 456),
        description: "Somewhere".to_string(),
    }
}
