mod seeyou {
    use crate::seeyou::SeeYouTurnPointReader;
    use loggerkit_core::io::ObjectReader;
    use loggerkit_core::turnpoint::*;
    use loggerkit_core::{AltitudeRef, AltitudeUnit};

    #[test]
    fn basic_parse() {
        let input = "Title,Code,Latitude,Longitude,Elevation,Style\n\
                     \"Foo\",\"FOO\",5012.345N,00823.456E,123M,4\r\n";
        let mut reader = SeeYouTurnPointReader::new(input.as_bytes()).unwrap();

        let tp = reader.next().unwrap().unwrap();
        assert_eq!(tp.full_name, "Foo");
        assert_eq!(tp.code, "FOO");
        let position = tp.position.expect("position");
        assert_eq!(position.latitude().value(), 3_012_345);
        assert_eq!(position.longitude().value(), 503_456);
        let altitude = position.altitude.expect("altitude");
        assert_eq!(altitude.value, 123);
        assert_eq!(altitude.unit, AltitudeUnit::Meters);
        assert_eq!(altitude.reference, AltitudeRef::Msl);
        assert_eq!(tp.kind, TurnPointType::GliderSite);

        assert!(reader.next().is_none());
    }

    #[test]
    fn related_tasks_trailer_ends_the_stream() {
        let input = "Title,Code\n\"A\",\"A\"\r\n-----Related Tasks-----\r\n\"B\",\"B\"\r\n";
        let mut reader = SeeYouTurnPointReader::new(input.as_bytes()).unwrap();
        assert_eq!(reader.next().unwrap().unwrap().code, "A");
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn unknown_columns_are_ignored_and_bare_values_trimmed() {
        let input = "Title,Bogus,Style\nAlpha , x ,5\r\n";
        let mut reader = SeeYouTurnPointReader::new(input.as_bytes()).unwrap();
        let tp = reader.next().unwrap().unwrap();
        assert_eq!(tp.full_name, "Alpha");
        assert_eq!(tp.kind, TurnPointType::Airfield);
        assert_eq!(tp.runway.surface, Some(RunwaySurface::Asphalt));
    }

    #[test]
    fn style_numbers() {
        for (style, kind) in [
            (2, TurnPointType::Airfield),
            (3, TurnPointType::Outlanding),
            (6, TurnPointType::MountainPass),
            (9, TurnPointType::Vor),
            (17, TurnPointType::HighwayIntersection),
            (99, TurnPointType::Unknown),
        ] {
            let input = format!("Style\n{}\r\n", style);
            let mut reader = SeeYouTurnPointReader::new(input.as_bytes()).unwrap();
            assert_eq!(reader.next().unwrap().unwrap().kind, kind);
        }
    }
}

mod cenfis_text {
    use crate::cenfis_text::CenfisTurnPointReader;
    use loggerkit_core::io::ObjectReader;
    use loggerkit_core::turnpoint::*;

    #[test]
    fn record_with_continuations() {
        let input = "0 created by some tool\n\
                     11 N DUEMPEL\n\
                     \u{20}  T  #S Bergneustadt ; a comment\n\
                     \u{20}  K N 51 03 771 E 007 42 566 M 460\n\
                     \u{20}  F 123.975\n\
                     \u{20}  R 07 0660 GR\n\
                     0 End of File\n";
        let mut reader = CenfisTurnPointReader::new(input.as_bytes());

        let tp = reader.next().unwrap().unwrap();
        assert_eq!(tp.full_name, "DUEMPEL");
        assert_eq!(tp.kind, TurnPointType::GliderSite);
        assert_eq!(tp.description, "Bergneustadt");
        let position = tp.position.expect("position");
        assert_eq!(position.latitude().value(), (51 * 60 + 3) * 1000 + 771);
        assert_eq!(position.longitude().value(), (7 * 60 + 42) * 1000 + 566);
        assert_eq!(position.altitude.unwrap().value, 460);
        assert_eq!(tp.frequency.unwrap().hertz(), 123_975_000);
        assert_eq!(tp.runway.direction, Some(7));
        assert_eq!(tp.runway.length, Some(660));
        assert_eq!(tp.runway.surface, Some(RunwaySurface::Grass));

        assert!(reader.next().is_none());
    }

    #[test]
    fn seconds_position_line() {
        // A `C` line carries degrees/minutes/seconds instead of
        // milli-arcminutes.
        let input = "11 N X\n   C N 50 30 30 W 001 15 00 F 1200\n0\n";
        let mut reader = CenfisTurnPointReader::new(input.as_bytes());
        let tp = reader.next().unwrap().unwrap();
        let position = tp.position.expect("position");
        assert_eq!(position.latitude().value(), 50 * 60000 + 30500);
        assert_eq!(position.longitude().value(), -(60000 + 15000));
        assert_eq!(
            position.altitude.unwrap().unit,
            loggerkit_core::AltitudeUnit::Feet
        );
    }

    #[test]
    fn record_terminated_by_next_leader() {
        let input = "11 N A\n11 N B\n";
        let mut reader = CenfisTurnPointReader::new(input.as_bytes());
        assert_eq!(reader.next().unwrap().unwrap().full_name, "A");
        assert_eq!(reader.next().unwrap().unwrap().full_name, "B");
        assert!(reader.next().is_none());
    }
}

mod zander {
    use crate::zander::ZanderTurnPointReader;
    use loggerkit_core::io::ObjectReader;
    use loggerkit_core::turnpoint::*;

    #[test]
    fn fixed_columns() {
        let line = "AACHEN MERZB 504941N 0061112E 0190  122105 G DE\r\n\u{1a}";
        let mut reader = ZanderTurnPointReader::new(line.as_bytes());

        let tp = reader.next().unwrap().unwrap();
        assert_eq!(tp.full_name, "AACHEN MERZB");
        let position = tp.position.expect("position");
        assert_eq!(
            position.latitude().value(),
            (50 * 60 + 49) * 1000 + (41 * 1000 + 29) / 60
        );
        assert_eq!(position.altitude.unwrap().value, 190);
        assert_eq!(tp.frequency.unwrap().hertz(), 122_105_000);
        assert_eq!(tp.kind, TurnPointType::Airfield);
        assert_eq!(tp.runway.surface, Some(RunwaySurface::Grass));
        assert_eq!(tp.country, "DE");

        // The 0x1a byte terminates the stream.
        assert!(reader.next().is_none());
    }
}

mod openair {
    use crate::openair::OpenAirAirspaceReader;
    use loggerkit_core::airspace::*;
    use loggerkit_core::io::ObjectReader;
    use loggerkit_core::{AltitudeRef, AltitudeUnit, DistanceUnit};

    #[test]
    fn two_vertex_airspace() {
        let input = "AC R\nAN Foo\nAL GND\nAH FL65\n\
                     DP 50:12:30 N 008:23:30 E\nDP 50:13:00 N 008:24:00 E\n\n";
        let mut reader = OpenAirAirspaceReader::new(input.as_bytes());

        let airspace = reader.next().unwrap().unwrap();
        assert_eq!(airspace.class, AirspaceClass::Restricted);
        assert_eq!(airspace.name, "Foo");
        let bottom = airspace.bottom.expect("bottom");
        assert_eq!(bottom.value, 0);
        assert_eq!(bottom.reference, AltitudeRef::Gnd);
        let top = airspace.top.expect("top");
        assert_eq!(top.value, 65_000);
        assert_eq!(top.unit, AltitudeUnit::Feet);
        assert_eq!(top.reference, AltitudeRef::Standard1013);
        assert_eq!(airspace.edges.len(), 2);
        match &airspace.edges[0] {
            Edge::Vertex { end } => {
                assert_eq!(end.latitude.value(), (50 * 60 + 12) * 1000 + 500);
            }
            other => panic!("not a vertex: {:?}", other),
        }

        assert!(reader.next().is_none());
    }

    #[test]
    fn circle_and_arc_commands() {
        let input = "AC Q\nAN Bar\nAL 1000 MSL\nAH 2000 MSL\n\
                     V X=50:00:00 N 008:00:00 E\nDC 5\n\n\
                     AC Q\nAN Baz\nAL GND\nAH FL100\n\
                     DP 50:00:00 N 008:00:00 E\n\
                     V D=-\nV X=50:30:00 N 008:30:00 E\n\
                     DB 50:00:00 N 008:00:00 E,51:00:00 N 009:00:00 E\n\n";
        let mut reader = OpenAirAirspaceReader::new(input.as_bytes());

        let circle = reader.next().unwrap().unwrap();
        assert_eq!(circle.edges.len(), 1);
        match &circle.edges[0] {
            Edge::Circle { radius, .. } => {
                assert_eq!(radius.unit, DistanceUnit::NauticalMiles);
                assert_eq!(radius.value, 5.0);
            }
            other => panic!("not a circle: {:?}", other),
        }

        let arc = reader.next().unwrap().unwrap();
        assert_eq!(arc.edges.len(), 2);
        match &arc.edges[1] {
            Edge::Arc { sign, end, center } => {
                assert_eq!(*sign, -1);
                assert_eq!(end.latitude.value(), 51 * 60000);
                assert_eq!(center.latitude.value(), 50 * 60000 + 30000);
            }
            other => panic!("not an arc: {:?}", other),
        }

        assert!(reader.next().is_none());
    }

    #[test]
    fn invalid_command_is_an_error() {
        let input = "AC R\nXX nonsense\n";
        let mut reader = OpenAirAirspaceReader::new(input.as_bytes());
        assert!(reader.next().unwrap().is_err());
    }
}

mod cenfis_airspace_text {
    use crate::cenfis_airspace_text::CenfisTextAirspaceReader;
    use loggerkit_core::airspace::*;
    use loggerkit_core::io::ObjectReader;

    #[test]
    fn name_packing_and_markers() {
        let input = "AC R\nAN MAIN\nAN4 FOURTH\nAN2 SECOND\n\
                     AH FL45\n\
                     L 50 10 00 8 10 00\nL 50 20 00 8 20 00\n\n";
        let mut reader = CenfisTextAirspaceReader::new(input.as_bytes());

        let airspace = reader.next().unwrap().unwrap();
        // AN4 arrived before AN2 (dash marker), and there was no S
        // line (underscore marker on the raw type string).
        assert_eq!(airspace.name, "MAIN|-SECOND||FOURTH|_R");
        assert_eq!(airspace.class, AirspaceClass::Restricted);
        assert_eq!(airspace.edges.len(), 2);
        // FL is hundreds of feet in this format.
        assert_eq!(airspace.top.unwrap().value, 4500);

        assert!(reader.next().is_none());
    }

    #[test]
    fn circle_arc_voice_and_fis() {
        let input = "AC D\nAN X\nS 50 0 0 8 0 0\n\
                     A + 50 30 0 8 30 0 50 15 0 8 15 0\n\
                     C 51 0 0 9 0 0 5 5\n\
                     V 3 R\nFIS 124 675\n\n";
        let mut reader = CenfisTextAirspaceReader::new(input.as_bytes());

        let airspace = reader.next().unwrap().unwrap();
        assert_eq!(airspace.edges.len(), 3);
        assert!(matches!(airspace.edges[1], Edge::Arc { sign: 1, .. }));
        match &airspace.edges[2] {
            Edge::Circle { radius, .. } => assert_eq!(radius.value, 5.5),
            other => panic!("not a circle: {:?}", other),
        }
        assert_eq!(airspace.voice, 0x8003);
        assert_eq!(airspace.frequency.unwrap().hertz(), 124_675_000);
    }
}

mod hexfile {
    use crate::hexfile::*;

    #[test]
    fn decode_with_checksum() {
        let input = b":0400000001020304F2\r\n:00000001FF\r\n";
        let mut decoder = HexDecoder::new();
        let mut assembler = HexAssembler::new(0);
        decoder
            .feed(input, &mut |t, a, d| assembler.handle(t, a, d))
            .unwrap();
        decoder.close().unwrap();

        assert_eq!(assembler.into_data().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn checksum_mismatch_is_an_error() {
        let input = b":0400000001020304F3\r\n";
        let mut decoder = HexDecoder::new();
        let result = decoder.feed(input, &mut |_, _, _| Ok(()));
        assert!(result.is_err());
    }

    #[test]
    fn bank_select_moves_the_base() {
        let input = b":00000011EF\r\n:0100000055AA\r\n:00000001FF\r\n";
        let mut decoder = HexDecoder::new();
        let mut assembler = HexAssembler::new(0);
        decoder
            .feed(input, &mut |t, a, d| assembler.handle(t, a, d))
            .unwrap();

        let data = assembler.into_data().unwrap();
        // Bank 1 starts at 0x8000; everything before is filler.
        assert_eq!(data.len(), 0x8001);
        assert_eq!(data[0x8000], 0x55);
        assert_eq!(data[0], 0xff);
    }

    #[test]
    fn missing_eof_record_is_an_error() {
        let input = b":0400000001020304F2\r\n";
        let mut decoder = HexDecoder::new();
        let mut assembler = HexAssembler::new(0);
        decoder
            .feed(input, &mut |t, a, d| assembler.handle(t, a, d))
            .unwrap();
        assert!(assembler.into_data().is_err());
    }
}

mod filser_db {
    use crate::filser_db::FilserTurnPointReader;
    use loggerkit_core::io::ObjectReader;
    use loggerkit_core::record_structs::DA4_RECORD_LEN;
    use loggerkit_core::turnpoint::RunwaySurface;

    fn record(valid: u8) -> Vec<u8> {
        let mut buf = vec![0u8; DA4_RECORD_LEN];
        buf[0] = valid;
        buf[1..5].copy_from_slice(b"WPT1");
        for b in &mut buf[5..10] {
            *b = b' ';
        }
        buf[10..14].copy_from_slice(&50.0f32.to_le_bytes());
        buf[14..18].copy_from_slice(&8.5f32.to_le_bytes());
        buf[18..20].copy_from_slice(&1000u16.to_be_bytes());
        buf[20..24].copy_from_slice(&123.456f32.to_le_bytes());
        buf[24] = b'G';
        buf[25] = 9;
        buf[26..28].copy_from_slice(&328u16.to_be_bytes());
        buf
    }

    #[test]
    fn parses_valid_records_and_skips_blanks() {
        let mut input = record(0);
        input.extend(record(1));
        let mut reader = FilserTurnPointReader::new(&input[..]);

        let tp = reader.next().unwrap().unwrap();
        assert_eq!(tp.short_name, "WPT1");
        let position = tp.position.expect("position");
        assert_eq!(position.latitude().value(), 3_000_000);
        assert_eq!(position.longitude().value(), 510_000);
        assert_eq!(position.altitude.unwrap().value, 1000);
        assert_eq!(tp.frequency.unwrap().hertz(), 123_456_000);
        assert_eq!(tp.runway.surface, Some(RunwaySurface::Grass));
        assert_eq!(tp.runway.direction, Some(9));
        assert_eq!(tp.runway.length, Some(100));

        assert!(reader.next().is_none());
    }

    #[test]
    fn truncated_record_is_an_error() {
        let input = record(1);
        let mut reader = FilserTurnPointReader::new(&input[..DA4_RECORD_LEN - 3]);
        assert!(reader.next().unwrap().is_err());
    }
}

mod cenfis_db {
    use crate::cenfis_db::CenfisDatabaseReader;
    use loggerkit_core::io::ObjectReader;
    use loggerkit_core::record_structs::*;
    use loggerkit_core::turnpoint::TurnPointType;

    fn header(count: u16) -> Vec<u8> {
        let mut buf = vec![0xffu8; DAB_HEADER_LEN];
        buf[0..2].copy_from_slice(&DAB_MAGIC_1.to_le_bytes());
        buf[8..10].copy_from_slice(&DAB_MAGIC_2.to_le_bytes());
        buf[DAB_COUNTS_OFFSET..DAB_COUNTS_OFFSET + 4]
            .copy_from_slice(&(DAB_HEADER_LEN as u32).to_be_bytes());
        buf[DAB_COUNTS_OFFSET + 6..DAB_COUNTS_OFFSET + 8].copy_from_slice(&count.to_be_bytes());
        let after = DAB_HEADER_LEN as u32 + DAB_RECORD_LEN as u32 * count as u32;
        buf[DAB_COUNTS_OFFSET + 16..DAB_COUNTS_OFFSET + 20].copy_from_slice(&after.to_be_bytes());
        buf
    }

    fn record() -> Vec<u8> {
        let mut buf = vec![0u8; DAB_RECORD_LEN];
        buf[0..4].copy_from_slice(&(50 * 60 * 600i32).to_be_bytes());
        // Longitude is stored east-negative.
        buf[4..8].copy_from_slice(&(-8 * 60 * 600i32).to_be_bytes());
        buf[8..10].copy_from_slice(&460u16.to_be_bytes());
        buf[10] = 2;
        buf[12..15].copy_from_slice(&[0x01, 0xe1, 0x67]); // 123239 kHz
        buf[15..29].copy_from_slice(b"DUEMPEL       ");
        buf[29..43].copy_from_slice(b"Bergneustadt  ");
        buf[43] = 7;
        buf
    }

    #[test]
    fn header_and_record() {
        let mut input = header(1);
        input.extend(record());
        let mut reader = CenfisDatabaseReader::new(&input[..]).unwrap();

        let tp = reader.next().unwrap().unwrap();
        assert_eq!(tp.full_name, "DUEMPEL");
        assert_eq!(tp.description, "Bergneustadt");
        assert_eq!(tp.kind, TurnPointType::GliderSite);
        let position = tp.position.expect("position");
        assert_eq!(position.latitude().value(), 3_000_000);
        assert_eq!(position.longitude().value(), 480_000);
        assert_eq!(position.altitude.unwrap().value, 460);
        assert_eq!(tp.frequency.unwrap().kilohertz(), 123_239);
        assert_eq!(tp.runway.direction, Some(7));

        assert!(reader.next().is_none());
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut input = header(0);
        input[0] = 0;
        assert!(CenfisDatabaseReader::new(&input[..]).is_err());
    }

    #[test]
    fn wrong_record_area_size_is_rejected() {
        let mut input = header(2);
        input.extend(record());
        // Count says two records but the offset field says one.
        let after = DAB_HEADER_LEN as u32 + DAB_RECORD_LEN as u32;
        input[DAB_COUNTS_OFFSET + 16..DAB_COUNTS_OFFSET + 20]
            .copy_from_slice(&after.to_be_bytes());
        assert!(CenfisDatabaseReader::new(&input[..]).is_err());
    }
}

mod lxn {
    use crate::igc::LxnToIgc;
    use loggerkit_core::errors::LkError;

    fn scenario_bytes() -> Vec<u8> {
        let mut data = vec![0xfb, 0x01, 0x02, 0x07, 0xd0];
        data.push(0xa0);
        data.extend_from_slice(&[0; 12]);
        data.extend_from_slice(&[
            0xbf, 0x00, 0x0a, 0x00, 0x05, 0x00, 0x05, 0x01, 0xf4, 0x01, 0x2c,
        ]);
        data
    }

    fn decode(data: &[u8]) -> String {
        let mut converter = LxnToIgc::new(Vec::new());
        let consumed = converter.feed(data).unwrap();
        assert_eq!(consumed, data.len());
        String::from_utf8(converter.into_inner()).unwrap()
    }

    #[test]
    fn origin_and_position() {
        let output = decode(&scenario_bytes());
        assert_eq!(
            output,
            "LLXNORIGIN0000000000000N00000000E\r\n\
             B0000100000005N00000005EA0050000300\r\n"
        );
    }

    #[test]
    fn split_points_do_not_change_the_output() {
        let data = scenario_bytes();
        let whole = decode(&data);

        for split in 1..data.len() {
            let mut converter = LxnToIgc::new(Vec::new());
            let mut pending: Vec<u8> = Vec::new();
            for chunk in [&data[..split], &data[split..]] {
                pending.extend_from_slice(chunk);
                match converter.feed(&pending) {
                    Ok(n) => pending.drain(..n),
                    Err(LkError::NeedMoreInput { consumed }) => pending.drain(..consumed),
                    Err(e) => panic!("split {}: {}", split, e),
                };
            }
            assert!(pending.is_empty(), "split {}", split);
            let output = String::from_utf8(converter.into_inner()).unwrap();
            assert_eq!(output, whole, "split {}", split);
        }
    }

    #[test]
    fn data_after_end_is_an_error() {
        let mut converter = LxnToIgc::new(Vec::new());
        converter.feed(&[0x40]).unwrap();
        assert!(converter.is_end());
        assert!(matches!(
            converter.feed(&[0x00]),
            Err(LkError::MalformedInput { .. })
        ));
    }

    #[test]
    fn position_without_origin_uses_zero_origin() {
        let data = [
            0xbf, 0x00, 0x0a, 0x00, 0x05, 0x00, 0x05, 0x01, 0xf4, 0x01, 0x2c,
        ];
        let output = decode(&data);
        assert_eq!(output, "B0000100000005N00000005EA0050000300\r\n");
    }

    #[test]
    fn start_signature_is_validated() {
        let mut good = vec![0x80];
        good.extend_from_slice(b"STReRAZ\0");
        good.push(1);
        let mut converter = LxnToIgc::new(Vec::new());
        assert_eq!(converter.feed(&good).unwrap(), good.len());

        let mut bad = vec![0x80];
        bad.extend_from_slice(b"STReXXX\0");
        bad.push(1);
        let mut converter = LxnToIgc::new(Vec::new());
        assert!(matches!(
            converter.feed(&bad),
            Err(LkError::MalformedInput { .. })
        ));
    }

    #[test]
    fn invalid_date_is_rejected() {
        let data = [0xfb, 32, 1, 0x07, 0xd0];
        let mut converter = LxnToIgc::new(Vec::new());
        assert!(converter.feed(&data).is_err());
    }

    #[test]
    fn extension_configs_and_records() {
        // I-config with FXA (bit 0) and ENL (bit 13): mask 0x2001.
        let mut data = vec![0xff, 0x00, 0x00, 0x20, 0x01];
        // A position record; its B line stays open...
        data.extend_from_slice(&[
            0xbf, 0x00, 0x0a, 0x00, 0x05, 0x00, 0x05, 0x01, 0xf4, 0x01, 0x2c,
        ]);
        // ...until the B-EXT record closes it.
        data.extend_from_slice(&[0xf9, 0x00, 0x0a, 0x00, 0x14]);

        let output = decode(&data);
        assert_eq!(
            output,
            "I023638FXA3941ENL\r\n\
             B0000100000005N00000005EA0050000300010020\r\n"
        );
    }

    #[test]
    fn serial_and_date() {
        let mut data = vec![0xfb, 0x01, 0x02, 0x07, 0xd0];
        data.push(0xf6);
        data.extend_from_slice(b"A12345\0\0\0");
        let output = decode(&data);
        assert_eq!(output, "AA12345FLIGHT:0\r\nHFDTE010220\r\n");
    }

    #[test]
    fn version_lines() {
        let output = decode(&[0x7f, 12, 34]);
        assert_eq!(
            output,
            "HFRFWFIRMWAREVERSION:3.4\r\nHFRHWHARDWAREVERSION:1.2\r\n"
        );
    }

    #[test]
    fn comment_string_record() {
        let mut data = vec![0x05];
        data.extend_from_slice(b"HELLO");
        let output = decode(&data);
        assert_eq!(output, "HELLO\r\n");
    }
}

mod filter {
    use crate::filter::*;
    use loggerkit_core::geodesy::*;
    use loggerkit_core::io::{BoxReader, ObjectReader};
    use loggerkit_core::turnpoint::*;
    use loggerkit_core::LkError;

    struct VecReader(Vec<TurnPoint>);

    impl ObjectReader<TurnPoint> for VecReader {
        fn next(&mut self) -> Option<Result<TurnPoint, LkError>> {
            if self.0.is_empty() {
                None
            } else {
                Some(Ok(self.0.remove(0)))
            }
        }
    }

    fn tp(name: &str, kind: TurnPointType, lat_mmin: i32) -> TurnPoint {
        let mut tp = TurnPoint::default();
        tp.full_name = name.to_string();
        tp.kind = kind;
        tp.position = Some(Position::new(
            Latitude::from_milliminutes(lat_mmin),
            Longitude::from_milliminutes(0),
            None,
        ));
        tp
    }

    fn source() -> BoxReader<TurnPoint> {
        // A, B, C, D at increasing latitudes; C is the reference.
        Box::new(VecReader(vec![
            tp("A", TurnPointType::Airfield, 3_000_000),
            tp("B", TurnPointType::Castle, 3_000_010),
            tp("REF", TurnPointType::GliderSite, 3_000_020),
            tp("D", TurnPointType::Outlanding, 3_600_000),
        ]))
    }

    fn names(mut reader: BoxReader<TurnPoint>) -> Vec<String> {
        let mut names = Vec::new();
        while let Some(result) = reader.next() {
            names.push(result.unwrap().full_name);
        }
        names
    }

    #[test]
    fn airfield_filter_admits_the_landable_subset() {
        let filtered = airfield_filter(source(), None).unwrap();
        assert_eq!(names(filtered), ["A", "REF", "D"]);
    }

    #[test]
    fn airfield_filter_rejects_arguments() {
        assert!(airfield_filter(source(), Some("x")).is_err());
    }

    #[test]
    fn name_filter_is_exact() {
        let filtered = name_filter(source(), Some("REF")).unwrap();
        assert_eq!(names(filtered), ["REF"]);
        let filtered = name_filter(source(), Some("RE")).unwrap();
        assert!(names(filtered).is_empty());
    }

    #[test]
    fn distance_filter_around_a_literal_position() {
        // Center at 50 degrees north; 1 km keeps A, B and REF, which sit
        // within a few hundred meters, and drops D a degree away.
        let filtered = distance_filter(source(), Some("5000.000N00000.000E:1km")).unwrap();
        assert_eq!(names(filtered), ["A", "B", "REF"]);
    }

    #[test]
    fn distance_filter_rewinds_for_a_named_reference() {
        // The reference is the third element; A and B are earlier in
        // the stream and must still be evaluated.
        let filtered = distance_filter(source(), Some("REF:1km")).unwrap();
        assert_eq!(names(filtered), ["A", "B", "REF"]);
    }

    #[test]
    fn distance_filter_reports_a_missing_reference() {
        let mut filtered = distance_filter(source(), Some("NOSUCH:1km")).unwrap();
        assert!(filtered.next().unwrap().is_err());
    }
}
