//! Write-then-read round trips through `loggerkit_in`, one per format
//! pair. Dimensions a format cannot represent (name windows, float
//! coordinates, flattened altitude units) are compared through the
//! format's own lens instead of being skipped silently.
use super::sample_turnpoint;
use crate::cenfis_db::CenfisDatabaseWriter;
use crate::cenfis_hex::CenfisHexTurnPointWriter;
use crate::cenfis_text::CenfisTurnPointWriter;
use crate::filser_db::FilserTurnPointWriter;
use crate::seeyou::SeeYouTurnPointWriter;
use crate::zander::ZanderTurnPointWriter;

use loggerkit_core::geodesy::*;
use loggerkit_core::io::{ObjectReader, ObjectWriter};
use loggerkit_core::turnpoint::*;

use loggerkit_in::cenfis_db::CenfisDatabaseReader;
use loggerkit_in::cenfis_hex::CenfisHexTurnPointReader;
use loggerkit_in::cenfis_text::CenfisTurnPointReader;
use loggerkit_in::filser_db::FilserTurnPointReader;
use loggerkit_in::seeyou::SeeYouTurnPointReader;
use loggerkit_in::zander::ZanderTurnPointReader;

fn collect(reader: &mut impl ObjectReader<TurnPoint>) -> Vec<TurnPoint> {
    let mut points = Vec::new();
    while let Some(result) = reader.next() {
        points.push(result.expect("read back"));
    }
    points
}

#[test]
fn seeyou_roundtrip() {
    let mut tp = sample_turnpoint();
    tp.runway = Runway::new(None, Some(7), Some(660));

    let mut out = Vec::new();
    {
        let mut writer = SeeYouTurnPointWriter::new(&mut out).unwrap();
        writer.write(&tp).unwrap();
        writer.flush().unwrap();
    }

    let mut reader = SeeYouTurnPointReader::new(&out[..]).unwrap();
    let points = collect(&mut reader);
    assert_eq!(points.len(), 1);
    let read = &points[0];

    assert_eq!(read.full_name, tp.full_name);
    assert_eq!(read.code, tp.code);
    assert_eq!(read.country, tp.country);
    assert_eq!(read.position, tp.position);
    assert_eq!(read.kind, tp.kind);
    assert_eq!(read.runway, tp.runway);
    assert_eq!(read.frequency, tp.frequency);
    assert_eq!(read.description, tp.description);
}

#[test]
fn cenfis_text_roundtrip() {
    let mut tp = sample_turnpoint();
    tp.runway = Runway::new(Some(RunwaySurface::Grass), Some(7), Some(660));

    let mut out = Vec::new();
    {
        let mut writer = CenfisTurnPointWriter::new(&mut out).unwrap();
        writer.write(&tp).unwrap();
        writer.flush().unwrap();
    }

    let mut reader = CenfisTurnPointReader::new(&out[..]);
    let points = collect(&mut reader);
    assert_eq!(points.len(), 1);
    let read = &points[0];

    assert_eq!(read.full_name, tp.full_name);
    assert_eq!(read.kind, tp.kind);
    assert_eq!(read.description, tp.description);
    assert_eq!(read.position, tp.position);
    assert_eq!(read.frequency, tp.frequency);
    assert_eq!(read.runway, tp.runway);
}

#[test]
fn zander_roundtrip() {
    // Coordinates that are exact in arc seconds survive the coarser
    // unit of this format.
    let mut tp = sample_turnpoint();
    tp.kind = TurnPointType::Airfield;
    tp.runway = Runway::new(Some(RunwaySurface::Grass), None, None);
    tp.position = Some(Position::new(
        Latitude::from_milliminutes(3_030_500),
        Longitude::from_milliminutes(-503_500),
        Some(Altitude::new(190, AltitudeUnit::Meters, AltitudeRef::Msl)),
    ));

    let mut out = Vec::new();
    {
        let mut writer = ZanderTurnPointWriter::new(&mut out);
        writer.write(&tp).unwrap();
        writer.flush().unwrap();
    }

    let mut reader = ZanderTurnPointReader::new(&out[..]);
    let points = collect(&mut reader);
    assert_eq!(points.len(), 1);
    let read = &points[0];

    // The name lands in the twelve-character window.
    assert_eq!(read.full_name, tp.abbreviated_name(12));
    assert_eq!(read.position, tp.position);
    assert_eq!(read.frequency, tp.frequency);
    assert_eq!(read.kind, tp.kind);
    assert_eq!(read.runway.surface, tp.runway.surface);
    assert_eq!(read.country, tp.country);
}

#[test]
fn filser_db_roundtrip() {
    let mut tp = sample_turnpoint();
    tp.short_name = "FOO".to_string();
    // A latitude that is exact in f32 degrees.
    tp.position = Some(Position::new(
        Latitude::from_milliminutes(3_000_000),
        Longitude::from_milliminutes(510_000),
        Some(Altitude::new(1000, AltitudeUnit::Feet, AltitudeRef::Msl)),
    ));
    tp.runway = Runway::new(Some(RunwaySurface::Grass), Some(9), Some(100));

    let mut out = Vec::new();
    {
        let mut writer = FilserTurnPointWriter::new(&mut out);
        writer.write(&tp).unwrap();
        writer.flush().unwrap();
    }

    let mut reader = FilserTurnPointReader::new(&out[..]);
    let points = collect(&mut reader);
    assert_eq!(points.len(), 1);
    let read = &points[0];

    assert_eq!(read.short_name, "FOO");
    assert_eq!(read.position, tp.position);
    assert_eq!(read.frequency, tp.frequency);
    assert_eq!(read.runway, tp.runway);
}

#[test]
fn cenfis_db_roundtrip() {
    let mut tp = sample_turnpoint();
    tp.full_name = "DUEMPEL".to_string();
    tp.description = "Bergneustadt".to_string();
    tp.position = Some(Position::new(
        Latitude::from_milliminutes(3_000_000),
        Longitude::from_milliminutes(480_000),
        Some(Altitude::new(460, AltitudeUnit::Meters, AltitudeRef::Msl)),
    ));
    tp.runway = Runway::new(None, Some(7), None);

    let mut out = Vec::new();
    {
        let mut writer = CenfisDatabaseWriter::new(&mut out);
        writer.write(&tp).unwrap();
        writer.flush().unwrap();
    }

    let mut reader = CenfisDatabaseReader::new(&out[..]).unwrap();
    let points = collect(&mut reader);
    assert_eq!(points.len(), 1);
    let read = &points[0];

    assert_eq!(read.full_name, tp.full_name);
    assert_eq!(read.description, tp.description);
    assert_eq!(read.kind, tp.kind);
    assert_eq!(read.position, tp.position);
    assert_eq!(read.frequency, tp.frequency);
    assert_eq!(read.runway, tp.runway);
}

#[test]
fn cenfis_hex_roundtrip() {
    let tp = sample_turnpoint();

    let mut out = Vec::new();
    {
        let mut writer = CenfisHexTurnPointWriter::new(&mut out);
        writer.write(&tp).unwrap();
        writer.flush().unwrap();
    }

    // The output is ASCII hex records.
    assert_eq!(out[0], b':');

    let mut reader = CenfisHexTurnPointReader::new(&out[..]).unwrap();
    let points = collect(&mut reader);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].full_name, tp.full_name);
    assert_eq!(points[0].kind, tp.kind);
}
