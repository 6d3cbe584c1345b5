//! Reader-to-reader adapters: the generic building blocks and the
//! three concrete turn point filters built from them.
use loggerkit_core::errors::*;
use loggerkit_core::geodesy::{parse_distance, parse_position, Distance, SurfacePosition};
use loggerkit_core::io::{BoxReader, ObjectReader};
use loggerkit_core::turnpoint::TurnPoint;

use std::collections::VecDeque;

/// Admits only the objects the predicate accepts.
pub struct MatchReader<T, F> {
    reader: BoxReader<T>,
    predicate: F,
}

impl<T, F: FnMut(&T) -> bool> MatchReader<T, F> {
    pub fn new(reader: BoxReader<T>, predicate: F) -> Self {
        MatchReader { reader, predicate }
    }
}

impl<T, F: FnMut(&T) -> bool> ObjectReader<T> for MatchReader<T, F> {
    fn next(&mut self) -> Option<Result<T, LkError>> {
        loop {
            match self.reader.next() {
                Some(Ok(obj)) => {
                    if (self.predicate)(&obj) {
                        return Some(Ok(obj));
                    }
                }
                other => return other,
            }
        }
    }
}

/// A reader that remembers everything it has yielded so far and can be
/// rewound once: after a rewind the buffered prefix is replayed from
/// the front, then reading resumes from the underlying source.
pub struct RewindReader<T> {
    reader: BoxReader<T>,
    buffer: VecDeque<T>,
    replaying: bool,
}

impl<T: Clone> RewindReader<T> {
    pub fn new(reader: BoxReader<T>) -> Self {
        RewindReader {
            reader,
            buffer: VecDeque::new(),
            replaying: false,
        }
    }

    pub fn rewind(&mut self) {
        if !self.buffer.is_empty() {
            self.replaying = true;
        }
    }
}

impl<T: Clone> ObjectReader<T> for RewindReader<T> {
    fn next(&mut self) -> Option<Result<T, LkError>> {
        if self.replaying {
            let obj = self.buffer.pop_front().expect("replaying an empty buffer");
            if self.buffer.is_empty() {
                self.replaying = false;
            }
            return Some(Ok(obj));
        }

        match self.reader.next() {
            Some(Ok(obj)) => {
                // Remember it, in case the caller rewinds later.
                self.buffer.push_back(obj.clone());
                Some(Ok(obj))
            }
            other => other,
        }
    }
}

/// Consumes the stream until `find` accepts an object (the reference),
/// rewinds, and from then on yields the objects `compare` accepts when
/// measured against the reference. The whole stream is buffered up to
/// the reference, so objects before it are evaluated too.
pub struct FindCompareReader<T, F, C> {
    reader: RewindReader<T>,
    find: F,
    compare: C,
    reference: Option<T>,
}

impl<T: Clone, F: FnMut(&T) -> bool, C: FnMut(&T, &T) -> bool> FindCompareReader<T, F, C> {
    pub fn new(reader: BoxReader<T>, find: F, compare: C) -> Self {
        FindCompareReader {
            reader: RewindReader::new(reader),
            find,
            compare,
            reference: None,
        }
    }
}

impl<T: Clone, F: FnMut(&T) -> bool, C: FnMut(&T, &T) -> bool> ObjectReader<T>
    for FindCompareReader<T, F, C>
{
    fn next(&mut self) -> Option<Result<T, LkError>> {
        while self.reference.is_none() {
            match self.reader.next() {
                Some(Ok(obj)) => {
                    if (self.find)(&obj) {
                        self.reference = Some(obj);
                        self.reader.rewind();
                    }
                }
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    return Some(Err(LkError::malformed("reference item not found")));
                }
            }
        }

        loop {
            match self.reader.next() {
                Some(Ok(obj)) => {
                    let reference = self.reference.as_ref().expect("reference just set");
                    if (self.compare)(reference, &obj) {
                        return Some(Ok(obj));
                    }
                }
                other => return other,
            }
        }
    }
}

fn name_matches(tp: &TurnPoint, name: &str) -> bool {
    tp.code == name || tp.short_name == name || tp.full_name == name
}

fn within(tp: &TurnPoint, center: &SurfacePosition, radius: &Distance) -> bool {
    match &tp.position {
        Some(position) => position.surface.distance_to(center) <= *radius,
        None => false,
    }
}

/// The `airfield` filter: landable turn points only. It takes no
/// arguments.
pub fn airfield_filter(
    reader: BoxReader<TurnPoint>,
    args: Option<&str>,
) -> Result<BoxReader<TurnPoint>, LkError> {
    if args.map_or(false, |a| !a.is_empty()) {
        return Err(LkError::malformed("No arguments supported"));
    }

    Ok(Box::new(MatchReader::new(reader, |tp: &TurnPoint| {
        tp.kind.is_airfield()
    })))
}

/// The `name` filter: exact match on code, short name or full name.
pub fn name_filter(
    reader: BoxReader<TurnPoint>,
    args: Option<&str>,
) -> Result<BoxReader<TurnPoint>, LkError> {
    let name = match args {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(LkError::malformed("No name provided")),
    };

    Ok(Box::new(MatchReader::new(reader, move |tp: &TurnPoint| {
        name_matches(tp, &name)
    })))
}

/// The `distance` filter. Two argument shapes are accepted:
/// a position literal followed by a radius (`5012.345N00823.456E:10km`
/// style, radius after the position), or `NAME:RADIUS`, which first
/// locates the named object in the stream and then re-runs the stream
/// against its position.
pub fn distance_filter(
    reader: BoxReader<TurnPoint>,
    args: Option<&str>,
) -> Result<BoxReader<TurnPoint>, LkError> {
    let args = match args {
        Some(args) if !args.is_empty() => args,
        _ => return Err(LkError::malformed("No maximum distance provided")),
    };

    let colon = args
        .rfind(':')
        .ok_or_else(|| LkError::malformed("Radius is missing"))?;
    let (head, radius) = (&args[..colon], &args[colon + 1..]);
    let radius = parse_distance(radius)?;

    if let Ok(center) = parse_position(head) {
        return Ok(Box::new(MatchReader::new(reader, move |tp: &TurnPoint| {
            within(tp, &center, &radius)
        })));
    }

    let name = head.to_string();
    Ok(Box::new(FindCompareReader::new(
        reader,
        move |tp: &TurnPoint| name_matches(tp, &name),
        move |reference: &TurnPoint, tp: &TurnPoint| match &reference.position {
            Some(position) => within(tp, &position.surface, &radius),
            None => false,
        },
    )))
}

/// Look a filter up by name and construct it over `reader`.
pub fn create_turnpoint_filter(
    name: &str,
    reader: BoxReader<TurnPoint>,
    args: Option<&str>,
) -> Result<BoxReader<TurnPoint>, LkError> {
    match name {
        "airfield" => airfield_filter(reader, args),
        "name" => name_filter(reader, args),
        "distance" => distance_filter(reader, args),
        _ => Err(LkError::malformed(format!("No such filter: {}", name))),
    }
}
