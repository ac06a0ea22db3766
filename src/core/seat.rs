//! Seat identification.
//!
//! ## SeatId
//!
//! Stable identifier of a seat, assigned at creation and never reused. Seat
//! *order* (who starts, colours) can change when seats are randomized; the
//! id does not.
//!
//! ## Colour
//!
//! Seats are addressed by colour in command text (`pay 1 coin to red ...`).
//! Colours follow seat order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Seat identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatId(pub u8);

impl SeatId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over the ids of a game with `count` seats.
    ///
    /// ```
    /// use oel_engine::core::SeatId;
    ///
    /// let seats: Vec<_> = SeatId::all(3).collect();
    /// assert_eq!(seats, vec![SeatId(0), SeatId(1), SeatId(2)]);
    /// ```
    pub fn all(count: usize) -> impl Iterator<Item = SeatId> {
        (0..count as u8).map(SeatId)
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Seat colour, by position in seat order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    White,
}

impl Color {
    pub const ORDER: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::White];

    /// Colour of the seat at `position` in seat order.
    #[must_use]
    pub fn at(position: usize) -> Option<Color> {
        Self::ORDER.get(position).copied()
    }

    #[must_use]
    pub fn position(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ORDER
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| EngineError::arguments(s))
    }
}
