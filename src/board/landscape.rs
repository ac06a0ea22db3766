//! Landscapes: the heartland every seat starts with, and the districts and
//! plots that can be bought.
//!
//! Spaces are stored column-major: `spaces[column - self.column][row - self.row]`.
//! A `None` entry is a hole in the tile (the corner of a mountain plot).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::coordinate::{Coordinate, Terrain};
use super::space::{Card, PlacedBuilding, Space};
use crate::cards::CardId;
use crate::error::{EngineError, Result};

/// Row of every seat's heartland.
pub const HEARTLAND_ROW: i32 = 30;

/// Purchase prices of districts, in the order they are sold.
pub const DISTRICT_COSTS: [u32; 9] = [2, 3, 4, 4, 5, 5, 6, 7, 8];

/// Purchase prices of plots, in the order they are sold.
pub const PLOT_COSTS: [u32; 9] = [3, 4, 4, 5, 5, 5, 6, 6, 7];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandscapeKind {
    Heartland,
    District,
    Plot,
}

impl LandscapeKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            LandscapeKind::Heartland => "heartland",
            LandscapeKind::District => "district",
            LandscapeKind::Plot => "plot",
        }
    }
}

impl FromStr for LandscapeKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "district" => Ok(LandscapeKind::District),
            "plot" => Ok(LandscapeKind::Plot),
            _ => Err(EngineError::arguments(s)),
        }
    }
}

/// Which face of a bought tile is used.
///
/// Districts: side 1 is moor/forest/forest/hillside/hillside, side 2 is
/// forest/plains/plains/plains/hillside. Plots: side 1 is the coastal plot
/// (west edge), side 2 the mountain plot (east edge).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandscapeSide {
    Side1,
    Side2,
}

impl FromStr for LandscapeSide {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "side1" => Ok(LandscapeSide::Side1),
            "side2" => Ok(LandscapeSide::Side2),
            _ => Err(EngineError::arguments(s)),
        }
    }
}

/// Identity of a landscape tile, for example `district3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LandscapeId {
    pub kind: LandscapeKind,
    pub number: u8,
}

impl fmt::Display for LandscapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LandscapeKind::Heartland => f.write_str("heartland"),
            kind => write!(f, "{}{}", kind.name(), self.number),
        }
    }
}

impl FromStr for LandscapeId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.find(|c: char| c.is_ascii_digit()).ok_or_else(|| EngineError::arguments(s))?;
        let kind: LandscapeKind = s[..digits].parse()?;
        let number = s[digits..].parse().map_err(|_| EngineError::arguments(s))?;
        Ok(LandscapeId { kind, number })
    }
}

/// A landscape tile on (or waiting to join) a seat board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landscape {
    pub id: LandscapeId,
    pub side: Option<LandscapeSide>,
    pub row: i32,
    pub cost: u32,
    spaces: Vec<Vec<Option<Space>>>,
}

fn plains(card: Card) -> Option<Space> {
    Some(Space::with_card(Terrain::Plains, card))
}

fn building(id: &str) -> Card {
    Card::Building(PlacedBuilding::new(CardId::new(id)))
}

impl Landscape {
    /// A seat's starting board at row 30, columns c through g.
    #[must_use]
    pub fn heartland() -> Self {
        let spaces = vec![
            vec![plains(Card::Moor), plains(Card::Moor)],
            vec![plains(Card::Forest), plains(Card::Forest)],
            vec![plains(Card::Forest), plains(building("h02"))],
            vec![Some(Space::new(Terrain::Plains)), Some(Space::new(Terrain::Plains))],
            vec![
                Some(Space::with_card(Terrain::Hillside, building("h01"))),
                plains(building("h03")),
            ],
        ];
        Self {
            id: LandscapeId { kind: LandscapeKind::Heartland, number: 0 },
            side: None,
            row: HEARTLAND_ROW,
            cost: 0,
            spaces,
        }
    }

    /// An unplaced district; its spaces appear once a side is chosen.
    #[must_use]
    pub fn district(number: u8, cost: u32) -> Self {
        Self {
            id: LandscapeId { kind: LandscapeKind::District, number },
            side: None,
            row: 0,
            cost,
            spaces: Vec::new(),
        }
    }

    /// An unplaced plot; its spaces appear once a side is chosen.
    #[must_use]
    pub fn plot(number: u8, cost: u32) -> Self {
        Self {
            id: LandscapeId { kind: LandscapeKind::Plot, number },
            side: None,
            row: 0,
            cost,
            spaces: Vec::new(),
        }
    }

    /// The districts and plots for sale at the start of a game.
    #[must_use]
    pub fn for_sale() -> (Vec<Landscape>, Vec<Landscape>) {
        let districts = DISTRICT_COSTS
            .iter()
            .enumerate()
            .map(|(i, &cost)| Landscape::district(i as u8 + 1, cost))
            .collect();
        let plots = PLOT_COSTS
            .iter()
            .enumerate()
            .map(|(i, &cost)| Landscape::plot(i as u8 + 1, cost))
            .collect();
        (districts, plots)
    }

    #[must_use]
    pub fn kind(&self) -> LandscapeKind {
        self.id.kind
    }

    /// Choose a side and row, laying out the tile's spaces.
    pub fn place(&mut self, side: LandscapeSide, row: i32) {
        self.side = Some(side);
        self.row = row;
        self.spaces = match (self.kind(), side) {
            (LandscapeKind::Heartland, _) => return,
            (LandscapeKind::District, LandscapeSide::Side1) => vec![
                vec![plains(Card::Moor)],
                vec![plains(Card::Forest)],
                vec![plains(Card::Forest)],
                vec![Some(Space::new(Terrain::Hillside))],
                vec![Some(Space::new(Terrain::Hillside))],
            ],
            (LandscapeKind::District, LandscapeSide::Side2) => vec![
                vec![plains(Card::Forest)],
                vec![Some(Space::new(Terrain::Plains))],
                vec![Some(Space::new(Terrain::Plains))],
                vec![Some(Space::new(Terrain::Plains))],
                vec![Some(Space::new(Terrain::Hillside))],
            ],
            (LandscapeKind::Plot, LandscapeSide::Side1) => vec![
                vec![
                    Some(Space::with_card(Terrain::Water, Card::Water)),
                    Some(Space::with_card(Terrain::Water, Card::Water)),
                ],
                vec![Some(Space::new(Terrain::Coast)), Some(Space::new(Terrain::Coast))],
            ],
            (LandscapeKind::Plot, LandscapeSide::Side2) => vec![
                vec![Some(Space::new(Terrain::Hillside)), Some(Space::new(Terrain::Hillside))],
                vec![Some(Space::new(Terrain::Mountain)), None],
            ],
        };
    }

    /// First column covered by the tile.
    #[must_use]
    pub fn column(&self) -> u8 {
        match (self.kind(), self.side) {
            (LandscapeKind::Plot, Some(LandscapeSide::Side2)) => 7,
            (LandscapeKind::Plot, _) => 0,
            _ => 2,
        }
    }

    #[must_use]
    pub fn width(&self) -> u8 {
        match self.kind() {
            LandscapeKind::Plot => 2,
            _ => 5,
        }
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        match self.kind() {
            LandscapeKind::District => 1,
            _ => 2,
        }
    }

    #[must_use]
    pub fn covers(&self, at: Coordinate) -> bool {
        let column = self.column();
        (self.row..self.row + self.height()).contains(&at.row)
            && (column..column + self.width()).contains(&at.column)
    }

    #[must_use]
    pub fn space(&self, at: Coordinate) -> Option<&Space> {
        if !self.covers(at) {
            return None;
        }
        let column = usize::from(at.column - self.column());
        let row = (at.row - self.row) as usize;
        self.spaces.get(column)?.get(row)?.as_ref()
    }

    pub fn space_mut(&mut self, at: Coordinate) -> Option<&mut Space> {
        if !self.covers(at) {
            return None;
        }
        let column = usize::from(at.column - self.column());
        let row = (at.row - self.row) as usize;
        self.spaces.get_mut(column)?.get_mut(row)?.as_mut()
    }

    /// Every existing space with its coordinate.
    pub fn spaces(&self) -> impl Iterator<Item = (Coordinate, &Space)> {
        let (row, column) = (self.row, self.column());
        self.spaces.iter().enumerate().flat_map(move |(c, col)| {
            col.iter().enumerate().filter_map(move |(r, space)| {
                space
                    .as_ref()
                    .map(|s| (Coordinate::new(row + r as i32, column + c as u8), s))
            })
        })
    }
}
