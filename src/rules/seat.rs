//! Seat state: one player's (or the neutral player's) holdings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Card, ClergyKind};
use crate::cards::{CardId, Catalogue};
use crate::core::{Color, SeatId};
use crate::goods::{Inventory, VirtualGood};

/// Mutable per-seat state.
///
/// Created at setup and never removed. The neutral seat of a solo game is a
/// `Seat` with `neutral` set; it has a board but never takes turns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub color: Color,
    pub neutral: bool,
    pub inventory: Inventory,
    pub board: Board,
    /// Clergy waiting in the pool, not working a building.
    pub clergy: Vec<ClergyKind>,
    /// Settlements not yet built.
    pub settlements: Vec<CardId>,
    pub actions_taken: u32,
    pub landscape_purchased: bool,
}

impl Seat {
    /// A seat with an empty inventory, a bare heartland and a full clergy
    /// pool (one prior, two lay brothers).
    #[must_use]
    pub fn new(id: SeatId, color: Color) -> Self {
        Self {
            id,
            color,
            neutral: false,
            inventory: Inventory::new(),
            board: Board::new(),
            clergy: vec![ClergyKind::Prior, ClergyKind::LayBrother, ClergyKind::LayBrother],
            settlements: Vec::new(),
            actions_taken: 0,
            landscape_purchased: false,
        }
    }

    #[must_use]
    pub fn has_clergy(&self, kind: ClergyKind) -> bool {
        self.clergy.contains(&kind)
    }

    /// Take one clergy of `kind` out of the pool. `false` when none is left.
    pub fn take_clergy(&mut self, kind: ClergyKind) -> bool {
        match self.clergy.iter().position(|&c| c == kind) {
            Some(i) => {
                self.clergy.remove(i);
                true
            }
            None => false,
        }
    }

    /// Distinct clergy kinds in the pool.
    #[must_use]
    pub fn clergy_kinds(&self) -> Vec<ClergyKind> {
        [ClergyKind::Prior, ClergyKind::LayBrother]
            .into_iter()
            .filter(|k| self.clergy.contains(k))
            .collect()
    }

    /// Score the seat against the catalogue's card values.
    #[must_use]
    pub fn score(&self, catalogue: &Catalogue) -> Score {
        let mut score = Score::default();
        for (at, space) in self.board.spaces() {
            match space.card() {
                Some(Card::Building(building)) => {
                    score.economic += catalogue.building(building.id).map_or(0, |d| d.economic);
                }
                Some(Card::Settlement(id)) => {
                    let Some(def) = catalogue.settlement(*id) else {
                        continue;
                    };
                    score.economic += def.economic;
                    let neighbours: i32 = self
                        .board
                        .neighbours(at)
                        .filter_map(|(_, s)| s.card())
                        .map(|card| dwelling_value(catalogue, card))
                        .sum();
                    score.settlements += def.dwelling + neighbours;
                }
                _ => {}
            }
        }
        score.goods = self
            .inventory
            .iter()
            .map(|g| g.virtual_total(VirtualGood::Points).trunc())
            .sum::<Decimal>();
        score
    }
}

fn dwelling_value(catalogue: &Catalogue, card: &Card) -> i32 {
    match card {
        Card::Building(b) => catalogue.building(b.id).map_or(0, |d| d.dwelling),
        Card::Settlement(id) => catalogue.settlement(*id).map_or(0, |d| d.dwelling),
        _ => 0,
    }
}

/// A seat's score, by source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Economic value of buildings and settlements.
    pub economic: i32,
    /// Dwelling value of settlements plus their neighbours.
    pub settlements: i32,
    /// Points value of goods, whole points per kind.
    pub goods: Decimal,
}

impl Score {
    #[must_use]
    pub fn total(&self) -> Decimal {
        Decimal::from(self.economic + self.settlements) + self.goods
    }
}
