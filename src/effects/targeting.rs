//! Building selection for [`Step::UseBuilding`](super::Step::UseBuilding).
//!
//! A [`Criteria`] names which buildings a step may use, relative to the
//! building whose function is running (the *source*) and the acting seat.

use serde::{Deserialize, Serialize};

use crate::board::{Coordinate, PlacedBuilding};
use crate::cards::CardId;
use crate::core::SeatId;
use crate::rules::Game;

/// A building somewhere in the game: on a seat's board, or still unbuilt
/// when `at` is `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingRef {
    /// Board owner (for unbuilt buildings, the seat using it).
    pub seat: SeatId,
    pub at: Option<Coordinate>,
    pub id: CardId,
}

/// Which buildings a step may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criteria {
    /// Buildings on any board holding a prior, other than the source.
    WithPrior,

    /// Unoccupied buildings orthogonally adjacent to the source.
    AdjacentUnoccupied,

    /// Buildings on any board holding clergy, other than the source.
    Occupied,

    /// Buildings still waiting in the display.
    Unbuilt,

    /// Exactly this building.
    Only(BuildingRef),
}

impl Criteria {
    /// Every building that currently satisfies the criteria.
    #[must_use]
    pub fn candidates(&self, game: &Game, seat: SeatId, source: Option<&BuildingRef>) -> Vec<BuildingRef> {
        match self {
            Criteria::WithPrior => on_boards(game, source, PlacedBuilding::has_prior),
            Criteria::Occupied => on_boards(game, source, PlacedBuilding::is_occupied),
            Criteria::AdjacentUnoccupied => {
                let Some(BuildingRef { seat: owner, at: Some(at), .. }) = source else {
                    return Vec::new();
                };
                let Some(board) = game.seats.get(owner.index()).map(|s| &s.board) else {
                    return Vec::new();
                };
                board
                    .neighbours(*at)
                    .filter_map(|(c, space)| {
                        let building = space.building().filter(|b| !b.is_occupied())?;
                        Some(BuildingRef { seat: *owner, at: Some(c), id: building.id })
                    })
                    .collect()
            }
            Criteria::Unbuilt => game
                .available_buildings
                .iter()
                .map(|&id| BuildingRef { seat, at: None, id })
                .collect(),
            Criteria::Only(building) => vec![*building],
        }
    }
}

fn on_boards(
    game: &Game,
    source: Option<&BuildingRef>,
    keep: impl Fn(&PlacedBuilding) -> bool,
) -> Vec<BuildingRef> {
    game.seats
        .iter()
        .flat_map(|seat| {
            seat.board
                .spaces()
                .filter_map(move |(at, space)| space.building().map(|b| (seat.id, at, b)))
        })
        .filter(|(_, _, building)| keep(building))
        .map(|(seat, at, building)| BuildingRef { seat, at: Some(at), id: building.id })
        .filter(|found| Some(found) != source)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Clergy, ClergyKind};
    use crate::core::GameConfig;

    fn game() -> Game {
        Game::new(GameConfig::new(3))
    }

    fn coordinate(text: &str) -> Coordinate {
        text.parse().unwrap()
    }

    #[test]
    fn test_with_prior_excludes_source() {
        let mut game = game();
        let prior = Clergy { kind: ClergyKind::Prior, owner: SeatId(1) };
        let at = coordinate("31e");
        game.seats[1].board.space_mut(at).and_then(|s| s.building_mut()).unwrap().assign(prior, false).unwrap();

        let found = Criteria::WithPrior.candidates(&game, SeatId(0), None);
        assert_eq!(found, vec![BuildingRef { seat: SeatId(1), at: Some(at), id: CardId::new("h02") }]);

        let source = found[0];
        assert!(Criteria::WithPrior.candidates(&game, SeatId(0), Some(&source)).is_empty());
        assert_eq!(Criteria::Occupied.candidates(&game, SeatId(0), None).len(), 1);
    }

    #[test]
    fn test_adjacent_unoccupied() {
        let game = game();
        let source = BuildingRef { seat: SeatId(0), at: Some(coordinate("31g")), id: CardId::new("h03") };
        let found = Criteria::AdjacentUnoccupied.candidates(&game, SeatId(0), Some(&source));
        assert_eq!(found, vec![BuildingRef { seat: SeatId(0), at: Some(coordinate("30g")), id: CardId::new("h01") }]);
        assert!(Criteria::AdjacentUnoccupied.candidates(&game, SeatId(0), None).is_empty());
    }

    #[test]
    fn test_unbuilt_uses_display() {
        let mut game = game();
        game.available_buildings = vec![CardId::new("g01"), CardId::new("f03")];
        let found = Criteria::Unbuilt.candidates(&game, SeatId(2), None);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|b| b.at.is_none() && b.seat == SeatId(2)));
    }
}
