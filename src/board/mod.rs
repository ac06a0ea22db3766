//! Seat boards.
//!
//! A [`Board`] is a seat's heartland plus every district and plot bought so
//! far. It answers the geometric questions the rules need: which space sits
//! at a coordinate, which spaces are adjacent, and where a new tile may go.

mod coordinate;
mod landscape;
mod space;

pub use coordinate::{Coordinate, Terrain, COLUMNS};
pub use landscape::{
    Landscape, LandscapeId, LandscapeKind, LandscapeSide, DISTRICT_COSTS, HEARTLAND_ROW, PLOT_COSTS,
};
pub use space::{Card, Clergy, ClergyKind, PlacedBuilding, Space};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub heartland: Landscape,
    pub landscapes: Vec<Landscape>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heartland: Landscape::heartland(),
            landscapes: Vec::new(),
        }
    }

    fn tiles(&self) -> impl Iterator<Item = &Landscape> {
        std::iter::once(&self.heartland).chain(self.landscapes.iter())
    }

    #[must_use]
    pub fn space(&self, at: Coordinate) -> Option<&Space> {
        self.tiles().find_map(|l| l.space(at))
    }

    pub fn space_mut(&mut self, at: Coordinate) -> Option<&mut Space> {
        if self.heartland.covers(at) {
            return self.heartland.space_mut(at);
        }
        self.landscapes.iter_mut().find(|l| l.covers(at))?.space_mut(at)
    }

    /// Every space on the board with its coordinate.
    pub fn spaces(&self) -> impl Iterator<Item = (Coordinate, &Space)> {
        self.tiles().flat_map(Landscape::spaces)
    }

    /// Existing spaces orthogonally adjacent to `at`.
    pub fn neighbours(&self, at: Coordinate) -> impl Iterator<Item = (Coordinate, &Space)> {
        at.neighbours().filter_map(move |c| self.space(c).map(|s| (c, s)))
    }

    /// Coordinate of the first space whose visible building is `id`.
    #[must_use]
    pub fn find_building(&self, id: crate::cards::CardId) -> Option<Coordinate> {
        self.spaces()
            .find(|(_, s)| s.building().is_some_and(|b| b.id == id))
            .map(|(c, _)| c)
    }

    /// Visible cards matching `predicate`.
    pub fn count_cards(&self, predicate: impl Fn(&Card) -> bool) -> usize {
        self.spaces()
            .filter(|(_, s)| s.card().is_some_and(&predicate))
            .count()
    }

    pub fn add(&mut self, landscape: Landscape) {
        self.landscapes.push(landscape);
    }

    /// `(row, column)` pairs where a tile of `kind` may be placed.
    ///
    /// Districts stack above or below the heartland and other districts.
    /// Plots sit on the west (column 0) or east (column 7) edge next to the
    /// heartland, a district or another plot, without overlapping a plot.
    /// `column` restricts plots to one edge.
    #[must_use]
    pub fn available_positions(&self, kind: LandscapeKind, column: Option<u8>) -> BTreeSet<(i32, u8)> {
        let mut available = BTreeSet::new();
        let home = self.heartland.row;
        let districts: Vec<_> = self.landscapes.iter().filter(|l| l.kind() == LandscapeKind::District).collect();
        let plots: Vec<_> = self.landscapes.iter().filter(|l| l.kind() == LandscapeKind::Plot).collect();

        match kind {
            LandscapeKind::Heartland => {}
            LandscapeKind::District => {
                let column = 2;
                available.insert((home - 1, column));
                available.insert((home + 2, column));
                for d in &districts {
                    available.insert((d.row - 1, column));
                    available.insert((d.row + 1, column));
                }
                available.remove(&(home, column));
                available.remove(&(home + 1, column));
                for d in &districts {
                    available.remove(&(d.row, column));
                }
            }
            LandscapeKind::Plot => {
                let columns: Vec<u8> = column.map_or_else(|| vec![0, 7], |c| vec![c]);
                for &column in &columns {
                    for row in [home - 1, home, home + 1] {
                        available.insert((row, column));
                    }
                    for d in &districts {
                        available.insert((d.row - 1, column));
                        available.insert((d.row, column));
                    }
                    for p in plots.iter().filter(|p| p.column() == column) {
                        available.insert((p.row - 2, column));
                        available.insert((p.row + 2, column));
                    }
                }
                for p in &plots {
                    for row in [p.row - 1, p.row, p.row + 1] {
                        available.remove(&(row, p.column()));
                    }
                }
            }
        }
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_district_positions_grow() {
        let mut board = Board::new();
        let initial = board.available_positions(LandscapeKind::District, None);
        assert_eq!(initial, BTreeSet::from([(29, 2), (32, 2)]));

        let mut district = Landscape::district(1, 2);
        district.place(LandscapeSide::Side1, 29);
        board.add(district);
        let next = board.available_positions(LandscapeKind::District, None);
        assert_eq!(next, BTreeSet::from([(28, 2), (32, 2)]));
    }

    #[test]
    fn test_plot_positions_exclude_overlap() {
        let mut board = Board::new();
        let mut plot = Landscape::plot(1, 3);
        plot.place(LandscapeSide::Side1, 30);
        board.add(plot);
        let west = board.available_positions(LandscapeKind::Plot, Some(0));
        assert!(!west.contains(&(29, 0)));
        assert!(!west.contains(&(31, 0)));
        assert!(west.contains(&(28, 0)));
        assert!(west.contains(&(32, 0)));
        let east = board.available_positions(LandscapeKind::Plot, Some(7));
        assert!(east.contains(&(30, 7)));
    }

    #[test]
    fn test_bought_spaces_are_found() {
        let mut board = Board::new();
        let mut district = Landscape::district(1, 2);
        district.place(LandscapeSide::Side2, 32);
        board.add(district);
        let space = board.space(Coordinate::new(32, 6)).unwrap();
        assert_eq!(space.terrain, Terrain::Hillside);
        assert_eq!(board.count_cards(|c| matches!(c, Card::Forest)), 4);
    }

    #[test]
    fn test_neighbours_only_existing() {
        let board = Board::new();
        let found: Vec<_> = board.neighbours(Coordinate::new(30, 2)).map(|(c, _)| c).collect();
        assert_eq!(found, vec![Coordinate::new(31, 2), Coordinate::new(30, 3)]);
    }
}
