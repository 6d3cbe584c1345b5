mod geodesy {
    use crate::geodesy::*;

    #[test]
    fn angle_from_value_rescales_to_milliminutes() {
        // 50 degrees 30 minutes in arc seconds.
        let a = Angle::from_value((50 * 60 + 30) * 60, 60);
        assert_eq!(a.value(), (50 * 60 + 30) * 1000);
    }

    #[test]
    fn angle_refactor_rounds_to_nearest() {
        // 25 milliminutes is exactly 1.5 arc seconds; the historic
        // rounding rule resolves the tie downwards.
        assert_eq!(Angle::from_milliminutes(25).refactor(60), 1);
        assert_eq!(Angle::from_milliminutes(26).refactor(60), 2);
        assert_eq!(Angle::from_milliminutes(24).refactor(60), 1);
        // The rule is symmetric for negative angles.
        assert_eq!(Angle::from_milliminutes(-26).refactor(60), -2);
        // And a representable value survives the round trip.
        assert_eq!(Angle::from_value(97, 60).refactor(60), 97);
    }

    #[test]
    fn angle_dms() {
        let a = Angle::from_dms(1, 50, 12, 30);
        assert_eq!(a.value(), (50 * 60 + 12) * 1000 + 500);
        let b = Angle::from_dms(-1, 8, 0, 0);
        assert_eq!(b.value(), -(8 * 60 * 1000));
    }

    #[test]
    fn angle_radians_roundtrip() {
        let a = Angle::from_milliminutes(3_012_345);
        let b = Angle::from_radians(a.to_radians());
        assert!((a.value() - b.value()).abs() <= 1);
    }

    #[test]
    fn distance_meters() {
        assert_eq!(Distance::new(DistanceUnit::Meters, 1852.0).meters(), 1852.0);
        assert_eq!(
            Distance::new(DistanceUnit::NauticalMiles, 1.0).meters(),
            1852.0
        );
        let ft = Distance::new(DistanceUnit::Feet, 3.2808399);
        assert!((ft.meters() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn distance_ordering_is_by_meters() {
        let a = Distance::new(DistanceUnit::NauticalMiles, 1.0);
        let b = Distance::new(DistanceUnit::Meters, 1851.0);
        assert!(b < a);
        assert!(a > b);
    }

    #[test]
    fn altitude_to_unit_truncates_and_keeps_reference() {
        let a = Altitude::new(123, AltitudeUnit::Meters, AltitudeRef::Gnd);
        let f = a.to_unit(AltitudeUnit::Feet);
        assert_eq!(f.value, 403); // 123 * 3.28 = 403.44
        assert_eq!(f.reference, AltitudeRef::Gnd);

        let back = f.to_unit(AltitudeUnit::Meters);
        assert_eq!(back.value, 122); // truncation both ways
        assert_eq!(back.reference, AltitudeRef::Gnd);
    }

    #[test]
    fn great_circle_distance() {
        // One arc minute of latitude is one nautical mile, give or take
        // the spherical approximation.
        let a = SurfacePosition::new(
            Latitude::from_milliminutes(0),
            Longitude::from_milliminutes(0),
        );
        let b = SurfacePosition::new(
            Latitude::from_milliminutes(1000),
            Longitude::from_milliminutes(0),
        );
        let d = a.distance_to(&b).meters();
        assert!((d - 1853.0).abs() < 5.0, "got {}", d);
    }

    #[test]
    fn parse_distance_literals() {
        assert_eq!(parse_distance("1km").unwrap().meters(), 1000.0);
        assert_eq!(parse_distance("500m").unwrap().meters(), 500.0);
        assert_eq!(
            parse_distance("2NM").unwrap().unit,
            DistanceUnit::NauticalMiles
        );
        assert_eq!(parse_distance("10ft").unwrap().unit, DistanceUnit::Feet);
        assert!(parse_distance("10").is_err());
        assert!(parse_distance("xyz").is_err());
    }

    #[test]
    fn parse_position_literal() {
        let p = parse_position("5012.345N00823.456E").unwrap();
        assert_eq!(p.latitude.value(), 3_012_345);
        assert_eq!(p.longitude.value(), 503_456);

        let q = parse_position("5012.345S 00823.456W").unwrap();
        assert_eq!(q.latitude.value(), -3_012_345);
        assert_eq!(q.longitude.value(), -503_456);

        assert!(parse_position("REF:1km").is_err());
        assert!(parse_position("5012.345N").is_err());
    }
}

mod aviation {
    use crate::aviation::Frequency;

    #[test]
    fn frequency_split() {
        let f = Frequency::from_mhz_khz(123, 456).unwrap();
        assert_eq!(f.hertz(), 123_456_000);
        assert_eq!(f.megahertz(), 123);
        assert_eq!(f.kilohertz_part(), 456);
    }

    #[test]
    fn zero_frequency_is_undefined() {
        assert!(Frequency::from_hertz(0).is_none());
        assert!(Frequency::from_mhz_khz(0, 0).is_none());
    }
}

mod turnpoint {
    use crate::turnpoint::*;

    #[test]
    fn any_name_prefers_code() {
        let mut tp = TurnPoint::default();
        tp.full_name = "Full Name".to_string();
        assert_eq!(tp.any_name(), "Full Name");
        tp.short_name = "SHORT".to_string();
        assert_eq!(tp.any_name(), "SHORT");
        tp.code = "CD".to_string();
        assert_eq!(tp.any_name(), "CD");
    }

    #[test]
    fn abbreviated_name_fits_field() {
        let mut tp = TurnPoint::default();
        tp.full_name = "Bergneustadt Auf dem Duempel".to_string();
        assert_eq!(tp.abbreviated_name(8), "Bergneus");
        tp.code = "DUEMPEL".to_string();
        assert_eq!(tp.abbreviated_name(8), "DUEMPEL");
    }

    #[test]
    fn airfield_subset() {
        assert!(TurnPointType::Airfield.is_airfield());
        assert!(TurnPointType::Outlanding.is_airfield());
        assert!(TurnPointType::UltralightField.is_airfield());
        assert!(!TurnPointType::Castle.is_airfield());
        assert!(!TurnPointType::Unknown.is_airfield());
    }
}

mod record_structs {
    use crate::record_structs::*;

    #[test]
    fn dab_point_kind_new() {
        assert_eq!(DabPointKind::new(1).unwrap(), DabPointKind::Airfield);
        assert_eq!(DabPointKind::new(2).unwrap(), DabPointKind::GliderSite);
        assert_eq!(
            DabPointKind::new(3).unwrap(),
            DabPointKind::MilitaryAirfield
        );
        assert_eq!(DabPointKind::new(4).unwrap(), DabPointKind::Outlanding);
        assert_eq!(DabPointKind::new(5).unwrap(), DabPointKind::Thermals);
        assert!(DabPointKind::new(6).is_err());
    }

    #[test]
    fn dab_table_assignment() {
        assert_eq!(dab_table_index(0), Some(0));
        assert_eq!(dab_table_index(1), Some(1));
        assert_eq!(dab_table_index(3), Some(1));
        assert_eq!(dab_table_index(2), Some(2));
        assert_eq!(dab_table_index(4), Some(3));
        // Thermals points are not indexed.
        assert_eq!(dab_table_index(5), None);
    }
}

mod bitconverter {
    use crate::bitconverter::*;

    #[test]
    fn u24_roundtrip() {
        let bytes = write_u24_be(123_456);
        assert_eq!(read_u24_be(&bytes).unwrap(), 123_456);
    }

    #[test]
    fn fixed_fields() {
        let mut field = [0u8; 8];
        fill_fixed_field(&mut field, "ABC");
        assert_eq!(&field, b"ABC     ");
        assert_eq!(trim_fixed_field(&field), "ABC");

        fill_fixed_field(&mut field, "ABCDEFGHIJ");
        assert_eq!(&field, b"ABCDEFGH");
    }
}
