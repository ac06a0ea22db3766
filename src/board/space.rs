//! Spaces and the cards placed on them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::coordinate::{Coordinate, Terrain};
use crate::cards::CardId;
use crate::core::SeatId;
use crate::error::{EngineError, Result};

/// Kind of clergy token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClergyKind {
    Prior,
    LayBrother,
}

impl ClergyKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ClergyKind::Prior => "prior",
            ClergyKind::LayBrother => "lay-brother",
        }
    }

    #[must_use]
    pub fn parse(text: &str) -> Option<ClergyKind> {
        match text {
            "prior" => Some(ClergyKind::Prior),
            "lay-brother" => Some(ClergyKind::LayBrother),
            _ => None,
        }
    }
}

impl fmt::Display for ClergyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A clergy token, remembering which seat it returns to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clergy {
    pub kind: ClergyKind,
    pub owner: SeatId,
}

/// A built building and the clergy working it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedBuilding {
    pub id: CardId,
    pub clergy: SmallVec<[Clergy; 1]>,
}

impl PlacedBuilding {
    #[must_use]
    pub fn new(id: CardId) -> Self {
        Self {
            id,
            clergy: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        !self.clergy.is_empty()
    }

    #[must_use]
    pub fn has_prior(&self) -> bool {
        self.clergy.iter().any(|c| c.kind == ClergyKind::Prior)
    }

    /// Put clergy to work. Normally a building holds one clergy; `bonus`
    /// lifts that limit.
    pub fn assign(&mut self, clergy: Clergy, bonus: bool) -> Result<()> {
        if self.is_occupied() && !bonus {
            return Err(EngineError::BuildingOccupied(self.id.to_string()));
        }
        self.clergy.push(clergy);
        Ok(())
    }
}

/// A card lying on a space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Card {
    Forest,
    Moor,
    Water,
    Building(PlacedBuilding),
    Settlement(CardId),
}

impl Card {
    /// Forests and moors can be cleared; everything else stays.
    #[must_use]
    pub fn is_removable(&self) -> bool {
        matches!(self, Card::Forest | Card::Moor)
    }

    #[must_use]
    pub fn building(&self) -> Option<&PlacedBuilding> {
        match self {
            Card::Building(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Card::Forest => "forest".into(),
            Card::Moor => "moor".into(),
            Card::Water => "water".into(),
            Card::Building(b) => b.id.to_string(),
            Card::Settlement(id) => id.to_string(),
        }
    }
}

/// One space of a landscape: its terrain and the stack of cards on it. The
/// top card is the visible one; overbuilding pushes on top.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub terrain: Terrain,
    cards: Vec<Card>,
}

impl Space {
    #[must_use]
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            cards: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_card(terrain: Terrain, card: Card) -> Self {
        Self {
            terrain,
            cards: vec![card],
        }
    }

    /// Visible card.
    #[must_use]
    pub fn card(&self) -> Option<&Card> {
        self.cards.last()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn building(&self) -> Option<&PlacedBuilding> {
        self.card().and_then(Card::building)
    }

    pub fn building_mut(&mut self) -> Option<&mut PlacedBuilding> {
        match self.cards.last_mut() {
            Some(Card::Building(b)) => Some(b),
            _ => None,
        }
    }

    pub fn place(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Take the visible card off, if it can be removed.
    pub fn remove(&mut self, at: Coordinate) -> Result<Card> {
        match self.cards.last() {
            Some(card) if card.is_removable() => self.cards.pop().ok_or(EngineError::CardNotRemovable(at)),
            _ => Err(EngineError::CardNotRemovable(at)),
        }
    }

    /// Remove every card regardless of kind (setup adjustments only).
    pub(crate) fn clear(&mut self) {
        self.cards.clear();
    }

    /// All cards in the stack, bottom first.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
