//! Step definitions.
//!
//! A step is one elementary action of a building's function: spend some
//! goods, gain some goods, clear a forest, use another building. Steps chain
//! through an optional `next` step that receives the text after `to` plus
//! whatever the parent computed (a count, a threshold index, a token).
//!
//! Execution lives in [`resolver`](super::resolver).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::targeting::Criteria;
use crate::board::{Card, LandscapeKind};
use crate::core::{PlayerCountKey, SeatId};
use crate::goods::{Good, GoodKind, Goods};
use crate::rules::{Game, ResourceToken};

/// Goods that depend on the game rather than the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoodsLookup {
    /// 1 point solo, 1.5 points in a long two-player game, 2 points otherwise.
    PointsByPlayerCount,
}

impl GoodsLookup {
    #[must_use]
    pub fn goods(self, game: &Game) -> Goods {
        match self {
            GoodsLookup::PointsByPlayerCount => {
                let points = match game.player_count_key() {
                    PlayerCountKey::One => Decimal::ONE,
                    PlayerCountKey::TwoLong => Decimal::new(15, 1),
                    _ => Decimal::from(2),
                };
                Goods::from(Good::new(GoodKind::Points, points))
            }
        }
    }
}

/// A multiplier counted from the acting seat's board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerLookup {
    MoorsAndForests,
    CloisterBuildings,
}

impl PerLookup {
    #[must_use]
    pub fn count(self, game: &Game, seat: SeatId) -> u32 {
        let Some(seat) = game.seats.get(seat.index()) else {
            return 0;
        };
        let found = match self {
            PerLookup::MoorsAndForests => seat.board.count_cards(|c| matches!(c, Card::Moor | Card::Forest)),
            PerLookup::CloisterBuildings => seat.board.count_cards(|c| {
                c.building()
                    .and_then(|b| game.catalogue().building(b.id))
                    .is_some_and(|def| def.cloister)
            }),
        };
        found as u32
    }
}

/// One elementary action.
///
/// ## Spending
///
/// Spend steps read `spend <goods> [to <next>] [and <after>]`. The child
/// step receives the `to` text; the `and` text is left for whatever follows.
///
/// ## Gaining
///
/// Gain steps either grant fixed goods without reading text, or read
/// `gain <goods>` and check the request against what the parent allowed.
///
/// ## Board
///
/// Structural changes: clearing land, building, placing landscapes, and the
/// production wheel.
///
/// ## Branching
///
/// `AndOr` and `AndConditional` split their text on the first `and` and run
/// one step on each part.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Step {
    // === Spending ===

    /// Spend a multiple of `goods`. The multiple (the count) is passed on.
    SpendExact {
        goods: Goods,
        /// Largest allowed count; `None` is unbounded.
        max: Option<u32>,
        next: Option<Box<Step>>,
    },

    /// Spend goods and pass on the index of the highest threshold covered.
    SpendBreaks {
        breaks: Vec<Goods>,
        next: Option<Box<Step>>,
    },

    /// Spend goods that may satisfy several choices at once.
    SpendChoices {
        choices: Vec<Goods>,
        max: Option<u32>,
        /// Weight of each choice towards `max`.
        scales: Option<Vec<u32>>,
        next: Option<Box<Step>>,
    },

    /// Spend `count` distinct goods, one of each, taken from `allowed`.
    SpendUnique {
        allowed: Vec<Good>,
        count: u32,
        next: Option<Box<Step>>,
    },

    /// Check the inventory against thresholds without spending.
    HaveBreaks {
        breaks: Vec<Goods>,
        next: Option<Box<Step>>,
    },

    // === Gaining ===

    /// Gain `goods` times a count.
    GainExact {
        goods: Goods,
        lookup: Option<GoodsLookup>,
        /// Kinds a player may pick from instead of `goods`.
        pool: Option<Goods>,
        /// Fixed count; the step then reads no text.
        count: Option<u32>,
        per: Option<PerLookup>,
        next: Option<Box<Step>>,
    },

    /// Gain the threshold chosen by the parent.
    GainBreaks {
        breaks: Vec<Goods>,
        next: Option<Box<Step>>,
    },

    /// Gain one of several choices.
    GainChoices {
        choices: Vec<Goods>,
        /// Refuse the choice the parent made.
        distinct: bool,
        next: Option<Box<Step>>,
    },

    // === Board ===

    RemoveForest {
        max: u32,
        next: Option<Box<Step>>,
    },

    RemoveMoor {
        max: u32,
        next: Option<Box<Step>>,
    },

    /// Produce from one of `tokens` on the wheel.
    UseProductionWheel {
        tokens: Vec<ResourceToken>,
        next: Option<Box<Step>>,
    },

    /// Run another building's function.
    UseBuilding {
        criteria: Criteria,
        next: Option<Box<Step>>,
    },

    /// Build a building from the display.
    BuildBuilding {
        /// Bring this seat's prior home first.
        return_prior: bool,
        next: Option<Box<Step>>,
    },

    BuildSettlement {
        next: Option<Box<Step>>,
    },

    /// Exchange two wheel tokens.
    SwapTokens,

    FellTrees,

    CutPeat,

    PlaceLandscape(LandscapeKind),

    // === Branching ===

    /// First part runs the first step and the second part the second. With
    /// one part, the first step is tried and the second is the fallback.
    AndOr(Box<Step>, Box<Step>),

    /// Both steps run; with one part, whichever step accepts it runs with
    /// the other getting no text.
    AndConditional(Box<Step>, Box<Step>),
}

impl Step {
    /// Spend `goods` exactly once.
    #[must_use]
    pub fn spend(goods: impl Into<Goods>) -> Self {
        Self::SpendExact {
            goods: goods.into(),
            max: Some(1),
            next: None,
        }
    }

    #[must_use]
    pub fn spend_breaks(breaks: Vec<Goods>) -> Self {
        Self::SpendBreaks { breaks, next: None }
    }

    #[must_use]
    pub fn spend_choices(choices: Vec<Goods>) -> Self {
        Self::SpendChoices {
            choices,
            max: Some(1),
            scales: None,
            next: None,
        }
    }

    #[must_use]
    pub fn spend_unique(allowed: Vec<Good>, count: u32) -> Self {
        Self::SpendUnique {
            allowed,
            count,
            next: None,
        }
    }

    #[must_use]
    pub fn have_breaks(breaks: Vec<Goods>) -> Self {
        Self::HaveBreaks { breaks, next: None }
    }

    /// Gain `goods` times the parent's count, reading `gain …` when given.
    #[must_use]
    pub fn gain(goods: impl Into<Goods>) -> Self {
        Self::GainExact {
            goods: goods.into(),
            lookup: None,
            pool: None,
            count: None,
            per: None,
            next: None,
        }
    }

    /// Gain `goods` once without reading any text.
    #[must_use]
    pub fn gain_fixed(goods: impl Into<Goods>) -> Self {
        Self::GainExact {
            goods: goods.into(),
            lookup: None,
            pool: None,
            count: Some(1),
            per: None,
            next: None,
        }
    }

    #[must_use]
    pub fn gain_breaks(breaks: Vec<Goods>) -> Self {
        Self::GainBreaks { breaks, next: None }
    }

    #[must_use]
    pub fn gain_choices(choices: Vec<Goods>) -> Self {
        Self::GainChoices {
            choices,
            distinct: false,
            next: None,
        }
    }

    #[must_use]
    pub fn remove_forest() -> Self {
        Self::RemoveForest { max: 1, next: None }
    }

    #[must_use]
    pub fn remove_moor() -> Self {
        Self::RemoveMoor { max: 1, next: None }
    }

    #[must_use]
    pub fn production_wheel(tokens: &[ResourceToken]) -> Self {
        Self::UseProductionWheel {
            tokens: tokens.to_vec(),
            next: None,
        }
    }

    #[must_use]
    pub fn use_building(criteria: Criteria) -> Self {
        Self::UseBuilding { criteria, next: None }
    }

    #[must_use]
    pub fn build_building(return_prior: bool) -> Self {
        Self::BuildBuilding { return_prior, next: None }
    }

    #[must_use]
    pub fn build_settlement() -> Self {
        Self::BuildSettlement { next: None }
    }

    #[must_use]
    pub fn and_or(first: Step, second: Step) -> Self {
        Self::AndOr(Box::new(first), Box::new(second))
    }

    #[must_use]
    pub fn and_conditional(first: Step, second: Step) -> Self {
        Self::AndConditional(Box::new(first), Box::new(second))
    }

    // --- modifiers ---

    /// Chain `step` as this step's child.
    #[must_use]
    pub fn then(mut self, step: Step) -> Self {
        if let Some(slot) = self.next_slot() {
            *slot = Some(Box::new(step));
        }
        self
    }

    /// Set the count bound (spend steps) or target bound (removals).
    #[must_use]
    pub fn max(mut self, limit: u32) -> Self {
        match &mut self {
            Self::SpendExact { max, .. } | Self::SpendChoices { max, .. } => *max = Some(limit),
            Self::RemoveForest { max, .. } | Self::RemoveMoor { max, .. } => *max = limit,
            _ => {}
        }
        self
    }

    /// Remove the count bound.
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        if let Self::SpendExact { max, .. } | Self::SpendChoices { max, .. } = &mut self {
            *max = None;
        }
        self
    }

    #[must_use]
    pub fn scales(mut self, weights: Vec<u32>) -> Self {
        if let Self::SpendChoices { scales, .. } = &mut self {
            *scales = Some(weights);
        }
        self
    }

    #[must_use]
    pub fn distinct(mut self) -> Self {
        if let Self::GainChoices { distinct, .. } = &mut self {
            *distinct = true;
        }
        self
    }

    #[must_use]
    pub fn pool(mut self, goods: Goods) -> Self {
        if let Self::GainExact { pool, .. } = &mut self {
            *pool = Some(goods);
        }
        self
    }

    #[must_use]
    pub fn lookup(mut self, goods: GoodsLookup) -> Self {
        if let Self::GainExact { lookup, .. } = &mut self {
            *lookup = Some(goods);
        }
        self
    }

    #[must_use]
    pub fn per(mut self, multiplier: PerLookup) -> Self {
        if let Self::GainExact { per, .. } = &mut self {
            *per = Some(multiplier);
        }
        self
    }

    fn next_slot(&mut self) -> Option<&mut Option<Box<Step>>> {
        match self {
            Self::SpendExact { next, .. }
            | Self::SpendBreaks { next, .. }
            | Self::SpendChoices { next, .. }
            | Self::SpendUnique { next, .. }
            | Self::HaveBreaks { next, .. }
            | Self::GainExact { next, .. }
            | Self::GainBreaks { next, .. }
            | Self::GainChoices { next, .. }
            | Self::RemoveForest { next, .. }
            | Self::RemoveMoor { next, .. }
            | Self::UseProductionWheel { next, .. }
            | Self::UseBuilding { next, .. }
            | Self::BuildBuilding { next, .. }
            | Self::BuildSettlement { next } => Some(next),
            Self::SwapTokens
            | Self::FellTrees
            | Self::CutPeat
            | Self::PlaceLandscape(_)
            | Self::AndOr(..)
            | Self::AndConditional(..) => None,
        }
    }

    /// The chained child, if any.
    #[must_use]
    pub fn next(&self) -> Option<&Step> {
        match self {
            Self::SpendExact { next, .. }
            | Self::SpendBreaks { next, .. }
            | Self::SpendChoices { next, .. }
            | Self::SpendUnique { next, .. }
            | Self::HaveBreaks { next, .. }
            | Self::GainExact { next, .. }
            | Self::GainBreaks { next, .. }
            | Self::GainChoices { next, .. }
            | Self::RemoveForest { next, .. }
            | Self::RemoveMoor { next, .. }
            | Self::UseProductionWheel { next, .. }
            | Self::UseBuilding { next, .. }
            | Self::BuildBuilding { next, .. }
            | Self::BuildSettlement { next } => next.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_defaults_to_one() {
        let step = Step::spend([(GoodKind::Coin, 1)]);
        assert!(matches!(step, Step::SpendExact { max: Some(1), next: None, .. }));
        assert!(matches!(step.unbounded(), Step::SpendExact { max: None, .. }));
    }

    #[test]
    fn test_then_chains_child() {
        let step = Step::spend([(GoodKind::Coin, 1)]).then(Step::gain([(GoodKind::Grain, 6)]));
        assert!(matches!(step.next(), Some(Step::GainExact { count: None, .. })));
    }

    #[test]
    fn test_then_ignored_without_slot() {
        let step = Step::SwapTokens.then(Step::FellTrees);
        assert_eq!(step, Step::SwapTokens);
        assert!(step.next().is_none());
    }

    #[test]
    fn test_modifiers_target_their_variant() {
        let step = Step::remove_forest().max(4);
        assert!(matches!(step, Step::RemoveForest { max: 4, .. }));

        let step = Step::gain_choices(vec![Goods::from([(GoodKind::Wood, 3)])]).distinct();
        assert!(matches!(step, Step::GainChoices { distinct: true, .. }));
    }
}
