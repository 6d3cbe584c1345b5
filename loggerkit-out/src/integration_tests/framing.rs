//! Byte-level checks of the writers' framing: headers, trailers,
//! padding, index tables and the flush contract.
use super::sample_turnpoint;
use crate::cenfis_airspace::CenfisAirspaceWriter;
use crate::cenfis_db::CenfisDatabaseWriter;
use crate::filser_db::FilserTurnPointWriter;
use crate::hexfile::HexWriter;
use crate::openair::OpenAirAirspaceWriter;
use crate::seeyou::SeeYouTurnPointWriter;
use crate::zander_airspace::ZanderAirspaceWriter;

use loggerkit_core::airspace::*;
use loggerkit_core::geodesy::*;
use loggerkit_core::io::ObjectWriter;
use loggerkit_core::record_structs::*;
use loggerkit_core::turnpoint::*;
use loggerkit_core::LkError;

use std::io::Write;

fn vertex(lat_mmin: i32, lon_mmin: i32) -> Edge {
    Edge::Vertex {
        end: SurfacePosition::new(
            Latitude::from_milliminutes(lat_mmin),
            Longitude::from_milliminutes(lon_mmin),
        ),
    }
}

fn sample_airspace() -> Airspace {
    Airspace::new(
        "Foo".to_string(),
        AirspaceClass::Restricted,
        Some(Altitude::new(0, AltitudeUnit::Feet, AltitudeRef::Gnd)),
        Some(Altitude::new(
            65_000,
            AltitudeUnit::Feet,
            AltitudeRef::Standard1013,
        )),
        vec![
            vertex(3_012_500, 503_500),
            vertex(3_013_000, 504_000),
        ],
    )
}

#[test]
fn seeyou_line_and_trailer() {
    let mut out = Vec::new();
    {
        let mut writer = SeeYouTurnPointWriter::new(&mut out).unwrap();
        writer.write(&sample_turnpoint()).unwrap();
        writer.flush().unwrap();
    }

    let text = String::from_utf8(out).unwrap();
    let mut lines = text.split("\r\n");
    assert_eq!(
        lines.next().unwrap(),
        "Title,Code,Country,Latitude,Longitude,Elevation,Style,Direction,Length,Frequency,Description"
    );
    assert_eq!(
        lines.next().unwrap(),
        "\"Foo\",\"FOO\",\"DE\",5012.345N,00823.456E,123M,4,,,123.456,\"Somewhere\""
    );
    assert_eq!(lines.next().unwrap(), "-----Related Tasks-----");
}

#[test]
fn flush_twice_fails() {
    let mut writer = SeeYouTurnPointWriter::new(Vec::new()).unwrap();
    writer.flush().unwrap();
    assert!(matches!(writer.flush(), Err(LkError::AlreadyFlushed)));
    assert!(matches!(
        writer.write(&sample_turnpoint()),
        Err(LkError::AlreadyFlushed)
    ));

    let mut writer = FilserTurnPointWriter::new(Vec::new());
    writer.flush().unwrap();
    assert!(matches!(writer.flush(), Err(LkError::AlreadyFlushed)));

    let mut writer = CenfisDatabaseWriter::new(Vec::new());
    writer.flush().unwrap();
    assert!(matches!(writer.flush(), Err(LkError::AlreadyFlushed)));

    let mut writer = CenfisAirspaceWriter::new(Vec::new());
    writer.flush().unwrap();
    assert!(matches!(writer.flush(), Err(LkError::AlreadyFlushed)));
}

#[test]
fn filser_db_is_fixed_size() {
    let mut out = Vec::new();
    {
        let mut writer = FilserTurnPointWriter::new(&mut out);
        writer.write(&sample_turnpoint()).unwrap();
        writer.flush().unwrap();
    }

    assert_eq!(
        out.len(),
        DA4_RECORD_COUNT * DA4_RECORD_LEN + DA4_TRAILER_LEN
    );
    // The one real record is valid, the padding is not.
    assert_eq!(out[0], 1);
    assert_eq!(out[DA4_RECORD_LEN], 0);
}

#[test]
fn filser_db_refuses_the_601st_record() {
    let mut out = Vec::new();
    let mut writer = FilserTurnPointWriter::new(&mut out);
    let tp = sample_turnpoint();
    for _ in 0..DA4_RECORD_COUNT {
        writer.write(&tp).unwrap();
    }

    let result = writer.write(&tp);
    assert!(matches!(result, Err(LkError::ContainerFull { .. })));

    // The bytes written so far stay intact.
    writer.flush().unwrap();
    assert_eq!(
        out.len(),
        DA4_RECORD_COUNT * DA4_RECORD_LEN + DA4_TRAILER_LEN
    );
}

#[test]
fn cenfis_db_sorts_and_indexes() {
    // Insertion order is BBBB before AAAA; the file must come out
    // sorted with BBBB (an airfield) in table 1 and AAAA (a glider
    // site) in table 2.
    let mut bbbb = sample_turnpoint();
    bbbb.full_name = "BBBB".to_string();
    bbbb.kind = TurnPointType::Airfield;
    let mut aaaa = sample_turnpoint();
    aaaa.full_name = "AAAA".to_string();
    aaaa.kind = TurnPointType::GliderSite;

    let mut out = Vec::new();
    {
        let mut writer = CenfisDatabaseWriter::new(&mut out);
        writer.write(&bbbb).unwrap();
        writer.write(&aaaa).unwrap();
        writer.flush().unwrap();
    }

    let table_base = DAB_HEADER_LEN + 2 * DAB_RECORD_LEN + DAB_FILLER_LEN;
    assert_eq!(out.len(), table_base + 2 * DAB_TABLE_ENTRY_LEN);

    // Little-endian magic words, everything else big-endian.
    assert_eq!(&out[0..2], &[0x46, 0x10]);
    assert_eq!(&out[8..10], &[0x41, 0x31]);
    assert_eq!(&out[DAB_COUNTS_OFFSET + 6..DAB_COUNTS_OFFSET + 8], &[0, 2]);

    // Records are sorted by title.
    assert_eq!(&out[DAB_HEADER_LEN + 15..DAB_HEADER_LEN + 19], b"AAAA");
    assert_eq!(
        &out[DAB_HEADER_LEN + DAB_RECORD_LEN + 15..DAB_HEADER_LEN + DAB_RECORD_LEN + 19],
        b"BBBB"
    );

    // The filler block is 0xff.
    assert!(out[DAB_HEADER_LEN + 2 * DAB_RECORD_LEN..table_base]
        .iter()
        .all(|&b| b == 0xff));

    // Table 0 empty, table 1 -> BBBB (second record), table 2 -> AAAA
    // (first record), table 3 empty. The table pointers sit at byte 64
    // as {offset u32, 3 u16, count u16}.
    for (table, expected_count) in [(0u16, 0u16), (1, 1), (2, 1), (3, 0)] {
        let at = DAB_TABLES_OFFSET + 8 * table as usize;
        assert_eq!(&out[at + 4..at + 6], &[0, 3]);
        assert_eq!(
            u16::from_be_bytes([out[at + 6], out[at + 7]]),
            expected_count
        );
    }

    // The 23-bit offset split: (>>15, >>8 & 0x7f, & 0xff).
    let bbbb_offset = (DAB_HEADER_LEN + DAB_RECORD_LEN) as u32;
    let aaaa_offset = DAB_HEADER_LEN as u32;
    let entry = |offset: u32| {
        [
            (offset >> 15) as u8,
            ((offset >> 8) & 0x7f) as u8,
            offset as u8,
        ]
    };
    assert_eq!(&out[table_base..table_base + 3], &entry(bbbb_offset));
    assert_eq!(&out[table_base + 3..table_base + 6], &entry(aaaa_offset));
}

#[test]
fn hexfile_records_and_banking() {
    let data: Vec<u8> = (0u8..0x28).collect();
    let mut out = Vec::new();
    {
        let mut writer = HexWriter::new(&mut out);
        writer.write_all(&data).unwrap();
        writer.finish().unwrap();
    }

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        ":10000000000102030405060708090A0B0C0D0E0F78\r\n\
         :10001000101112131415161718191A1B1C1D1E1F68\r\n\
         :080020002021222324252627BC\r\n\
         :00000001FF\r\n"
    );
}

#[test]
fn hexfile_emits_bank_select_records() {
    let mut out = Vec::new();
    {
        let mut writer = HexWriter::new(&mut out);
        writer.write_all(&vec![0u8; BANK_SIZE + 1]).unwrap();
        writer.finish().unwrap();
    }

    let text = String::from_utf8(out).unwrap();
    // 0x800 data records, then the bank-select record for bank 1,
    // then one more data record at offset zero.
    assert!(text.contains(":00000011EF\r\n:01000000"));
}

#[test]
fn openair_output() {
    let mut out = Vec::new();
    {
        let mut writer = OpenAirAirspaceWriter::new(&mut out).unwrap();
        writer.write(&sample_airspace()).unwrap();
        writer.flush().unwrap();
    }

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "* Written by loggerkit\n\n\
         AC R\nAN Foo\nAL GND\nAH FL65\n\
         DP 50:12:30 N 008:23:30 E\n\
         DP 50:13:00 N 008:24:00 E\n\n"
    );
}

#[test]
fn openair_arc_direction() {
    let mut airspace = sample_airspace();
    airspace.edges.push(Edge::Arc {
        sign: -1,
        end: SurfacePosition::new(
            Latitude::from_milliminutes(3_014_000),
            Longitude::from_milliminutes(505_000),
        ),
        center: SurfacePosition::new(
            Latitude::from_milliminutes(3_013_500),
            Longitude::from_milliminutes(504_500),
        ),
    });

    let mut out = Vec::new();
    {
        let mut writer = OpenAirAirspaceWriter::new(&mut out).unwrap();
        writer.write(&airspace).unwrap();
        writer.flush().unwrap();
    }

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("V D=-\nV X=50:13:30 N 008:24:30 E\n"));
    assert!(text.contains("DB 50:13:00 N 008:24:00 E,50:14:00 N 008:25:00 E\n"));
}

#[test]
fn zander_airspace_name_window() {
    let mut airspace = sample_airspace();
    airspace.name = "MUENCHEN".to_string();
    airspace.class = AirspaceClass::Ctr;

    let mut out = Vec::new();
    {
        let mut writer = ZanderAirspaceWriter::new(&mut out).unwrap();
        writer.write(&airspace).unwrap();
        writer.flush().unwrap();
    }

    let text = String::from_utf8(out).unwrap();
    // The CTR suffix is squeezed into the ten-character window and the
    // type letter for a CTR is C; the upper bound comes first.
    assert!(text.contains("N MUENCH-CTR C\n"));
    let top_index = text.find("FL").unwrap();
    let bottom_index = text.find("GND").unwrap();
    assert!(top_index < bottom_index);
}

#[test]
fn zander_airspace_transliterates_and_closes_the_polygon() {
    let mut airspace = sample_airspace();
    airspace.name = "K\u{d6}LN".to_string();

    let mut out = Vec::new();
    {
        let mut writer = ZanderAirspaceWriter::new(&mut out).unwrap();
        writer.write(&airspace).unwrap();
        writer.flush().unwrap();
    }

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("N KOLN"));
    // First vertex repeated at the end with the L symbol.
    assert_eq!(text.matches("501230N 0082330E").count(), 2);
    assert!(text.contains("L 501230N 0082330E\n\n"));
}

#[test]
fn cenfis_airspace_regions_and_bank_padding() {
    let mut out = Vec::new();
    {
        let mut writer = CenfisAirspaceWriter::new(&mut out);
        writer.write(&sample_airspace()).unwrap();
        writer.flush().unwrap();
    }

    // Header, airspace region padded to the bank boundary, one index
    // entry, config block.
    assert_eq!(out.len(), BANK_SIZE + 2 + CENFIS_CONFIG_LEN);

    // The airspace region descriptor: device base + header size.
    assert_eq!(&out[0x40..0x44], &0x60200u32.to_be_bytes());
    // The index region starts on the bank boundary.
    assert_eq!(&out[0x140..0x144], &(BANK_SIZE as u32).to_be_bytes());
    assert_eq!(&out[0x144..0x146], &2u16.to_be_bytes());
    assert_eq!(&out[0x146..0x148], &1u16.to_be_bytes());

    // The one index entry points at the first record.
    assert_eq!(
        &out[BANK_SIZE..BANK_SIZE + 2],
        &(CENFIS_FILE_HEADER_LEN as u16).to_be_bytes()
    );

    // The record header: total length first, then the AC index, which
    // sits right behind the 30-byte header.
    let record = &out[CENFIS_FILE_HEADER_LEN..];
    let rec_length = u16::from_be_bytes([record[0], record[1]]) as usize;
    assert_eq!(&record[2..4], &30u16.to_be_bytes());
    // AC is the class string as a Pascal string: "R".
    assert_eq!(&record[30..32], &[1, b'R']);
    // The record is framed exactly as long as its header says.
    assert!(rec_length > 30);
    let after = &out[CENFIS_FILE_HEADER_LEN + rec_length..BANK_SIZE];
    assert!(after.iter().all(|&b| b == 0xff));
}
