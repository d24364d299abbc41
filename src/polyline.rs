//! Polyline representation for route geometries.
//!
//! Routing providers ship route geometry in the encoded polyline format.
//! Decoding happens once at the adapter boundary; everything past that works
//! with plain (latitude, longitude) points.

use thiserror::Error;

/// Coordinate precision of the encoded polyline format (five decimal places).
const PRECISION: f64 = 1e5;

/// Widest shift a value may reach; longer chunk runs are rejected.
const MAX_SHIFT: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("polyline ends in the middle of a coordinate at byte {0}")]
    Truncated(usize),

    #[error("invalid polyline character {character:?} at byte {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("polyline value at byte {0} overflows")]
    Overflow(usize),
}

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    ///
    /// Each point is a (latitude, longitude) tuple.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        let bytes = encoded.as_bytes();
        let mut cursor = 0;
        let mut lat: i64 = 0;
        let mut lng: i64 = 0;
        let mut points = Vec::new();

        while cursor < bytes.len() {
            lat = lat
                .checked_add(next_delta(bytes, &mut cursor)?)
                .ok_or(PolylineError::Overflow(cursor))?;
            lng = lng
                .checked_add(next_delta(bytes, &mut cursor)?)
                .ok_or(PolylineError::Overflow(cursor))?;
            points.push((lat as f64 / PRECISION, lng as f64 / PRECISION));
        }

        Ok(Self { points })
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn next_delta(bytes: &[u8], cursor: &mut usize) -> Result<i64, PolylineError> {
    let mut value: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let position = *cursor;
        let byte = *bytes.get(position).ok_or(PolylineError::Truncated(position))?;
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                character: char::from(byte),
                position,
            });
        }
        *cursor += 1;

        let chunk = i64::from(byte - 63);
        value |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow(position));
        }
    }

    // Zig-zag: the low bit carries the sign.
    if value & 1 == 1 {
        Ok(!(value >> 1))
    } else {
        Ok(value >> 1)
    }
}
