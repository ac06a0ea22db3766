//! Board coordinates and terrain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Number of columns on a seat board (`a` through `i`).
pub const COLUMNS: u8 = 9;

/// A space on a seat board: `<row><column>`, for example `30c`.
///
/// ```
/// use oel_engine::board::Coordinate;
///
/// let c: Coordinate = "30c".parse().unwrap();
/// assert_eq!((c.row, c.column), (30, 2));
/// assert_eq!(c.to_string(), "30c");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: i32,
    pub column: u8,
}

impl Coordinate {
    #[must_use]
    pub const fn new(row: i32, column: u8) -> Self {
        Self { row, column }
    }

    /// Orthogonal neighbours that stay inside the board columns.
    pub fn neighbours(self) -> impl Iterator<Item = Coordinate> {
        let Coordinate { row, column } = self;
        let left = column.checked_sub(1).map(|c| Coordinate::new(row, c));
        let right = (column + 1 < COLUMNS).then(|| Coordinate::new(row, column + 1));
        [
            Some(Coordinate::new(row - 1, column)),
            Some(Coordinate::new(row + 1, column)),
            left,
            right,
        ]
        .into_iter()
        .flatten()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, char::from(b'a' + self.column))
    }
}

impl FromStr for Coordinate {
    type Err = EngineError;

    /// Two-digit row without a leading zero, then a column letter `a`-`i`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidCoordinate(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 3 {
            return Err(invalid());
        }
        let (tens, units, letter) = (bytes[0], bytes[1], bytes[2]);
        if !(b'1'..=b'9').contains(&tens) || !units.is_ascii_digit() {
            return Err(invalid());
        }
        if !(b'a'..b'a' + COLUMNS).contains(&letter) {
            return Err(invalid());
        }
        let row = i32::from(tens - b'0') * 10 + i32::from(units - b'0');
        Ok(Coordinate::new(row, letter - b'a'))
    }
}

/// Terrain of a space.
///
/// `ClayMound` is not a terrain of its own: it marks buildings that are placed
/// on top of a clay mound card rather than on bare terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Plains,
    Hillside,
    Coast,
    Water,
    Mountain,
    ClayMound,
}

impl Terrain {
    /// Where a card without explicit terrain may go.
    pub const DEFAULT: &'static [Terrain] = &[Terrain::Coast, Terrain::Plains, Terrain::Hillside];
}
