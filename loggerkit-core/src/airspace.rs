//! The airspace record: a polygon with a lower and an upper bound.
use crate::aviation::Frequency;
use crate::geodesy::{Altitude, Distance, SurfacePosition};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The class of an airspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AirspaceClass {
    Unknown,
    Alpha,
    Bravo,
    Charly,
    Delta,
    EchoLow,
    EchoHigh,
    Fox,
    Ctr,
    Tmz,
    Restricted,
    Danger,
    Glider,
}

impl Default for AirspaceClass {
    fn default() -> Self {
        AirspaceClass::Unknown
    }
}

/// One element of an airspace boundary.
///
/// The first edge establishes the starting point; subsequent vertices
/// are the endpoints of straight segments from the previous endpoint.
/// A circle stands alone; an arc must follow a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Edge {
    Vertex {
        end: SurfacePosition,
    },
    Circle {
        center: SurfacePosition,
        radius: Distance,
    },
    Arc {
        /// +1 for the short way round, -1 for the reverse sense.
        sign: i8,
        end: SurfacePosition,
        center: SurfacePosition,
    },
}

/// An airspace. The name may carry up to four pipe-separated
/// device-specific sub-components plus a trailing raw type string.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Airspace {
    pub name: String,
    pub class: AirspaceClass,
    pub bottom: Option<Altitude>,
    pub top: Option<Altitude>,
    /// A secondary upper bound some Cenfis files carry.
    pub top2: Option<Altitude>,
    pub edges: Vec<Edge>,
    pub frequency: Option<Frequency>,
    /// Opaque device-specific voice tag; 0 when absent.
    pub voice: u16,
}

impl Airspace {
    pub fn new(
        name: String,
        class: AirspaceClass,
        bottom: Option<Altitude>,
        top: Option<Altitude>,
        edges: Vec<Edge>,
    ) -> Self {
        Airspace {
            name,
            class,
            bottom,
            top,
            top2: None,
            edges,
            frequency: None,
            voice: 0,
        }
    }
}
