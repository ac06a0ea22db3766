//! Building and settlement definitions - static card data.
//!
//! A definition holds the immutable properties of a card: cost, values,
//! where it may be placed, and (for buildings) its function. Runtime state
//! such as assigned clergy lives on the board in
//! [`PlacedBuilding`](crate::board::PlacedBuilding).

use serde::{Deserialize, Serialize};

use super::id::CardId;
use crate::board::Terrain;
use crate::core::{Age, GameOption, PlayerCountKey, Variant};
use crate::effects::{Criteria, Function, Step};
use crate::goods::Goods;

/// Static building definition.
///
/// ## Example
///
/// ```
/// use oel_engine::board::Terrain;
/// use oel_engine::cards::{BuildingDef, CardId};
/// use oel_engine::core::Age;
/// use oel_engine::goods::{GoodKind, Goods};
///
/// let priory = BuildingDef::new("g01", "Priory", Age::Start)
///     .with_cost(Goods::from([(GoodKind::Wood, 1), (GoodKind::Clay, 1)]))
///     .with_values(4, 3)
///     .cloister();
///
/// assert_eq!(priory.id, CardId::new("g01"));
/// assert!(priory.terrains.contains(&Terrain::Plains));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingDef {
    pub id: CardId,
    pub name: String,
    pub age: Age,
    /// Terrain the building may be placed on.
    pub terrains: Vec<Terrain>,
    pub cost: Goods,
    pub economic: i32,
    pub dwelling: i32,
    /// `None` when the building is used in both variants.
    pub variant: Option<Variant>,
    pub player_counts: Vec<PlayerCountKey>,
    /// Only released when this option was chosen.
    pub option: Option<GameOption>,
    pub cloister: bool,
    /// Another building may be built on top while no clergy works here.
    pub overbuildable: bool,
    pub function: Function,
}

impl BuildingDef {
    /// A building on default terrain, free, worthless, in every game.
    #[must_use]
    pub fn new(id: &str, name: impl Into<String>, age: Age) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            age,
            terrains: Terrain::DEFAULT.to_vec(),
            cost: Goods::new(),
            economic: 0,
            dwelling: 0,
            variant: None,
            player_counts: PlayerCountKey::ALL.to_vec(),
            option: None,
            cloister: false,
            overbuildable: false,
            function: Function::default(),
        }
    }

    #[must_use]
    pub fn with_terrains(mut self, terrains: &[Terrain]) -> Self {
        self.terrains = terrains.to_vec();
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: Goods) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_values(mut self, economic: i32, dwelling: i32) -> Self {
        self.economic = economic;
        self.dwelling = dwelling;
        self
    }

    #[must_use]
    pub fn only_in(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    #[must_use]
    pub fn for_counts(mut self, counts: &[PlayerCountKey]) -> Self {
        self.player_counts = counts.to_vec();
        self
    }

    #[must_use]
    pub fn requires(mut self, option: GameOption) -> Self {
        self.option = Some(option);
        self
    }

    #[must_use]
    pub fn cloister(mut self) -> Self {
        self.cloister = true;
        self
    }

    #[must_use]
    pub fn overbuildable(mut self) -> Self {
        self.overbuildable = true;
        self
    }

    #[must_use]
    pub fn with_function(mut self, function: Function) -> Self {
        self.function = function;
        self
    }

    /// Shorthand for a function of one step.
    #[must_use]
    pub fn with_step(self, step: Step) -> Self {
        self.with_function(Function::new(step))
    }

    /// Shorthand for a function that uses another building.
    #[must_use]
    pub fn using(self, criteria: Criteria) -> Self {
        self.with_step(Step::use_building(criteria))
    }

    /// Whether the building is released in a game of this variant, player
    /// count and options.
    #[must_use]
    pub fn is_available(&self, variant: Variant, key: PlayerCountKey, options: &[GameOption]) -> bool {
        self.variant.map_or(true, |v| v == variant)
            && self.player_counts.contains(&key)
            && self.option.map_or(true, |o| options.contains(&o))
    }
}

/// Static settlement definition.
///
/// The cost is a virtual requirement (energy and food) paid with any goods
/// worth that much.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementDef {
    pub id: CardId,
    pub name: String,
    pub age: Age,
    pub terrains: Vec<Terrain>,
    pub cost: Goods,
    pub economic: i32,
    pub dwelling: i32,
}

impl SettlementDef {
    #[must_use]
    pub fn new(id: &str, name: impl Into<String>, age: Age, cost: Goods, economic: i32, dwelling: i32) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            age,
            terrains: Terrain::DEFAULT.to_vec(),
            cost,
            economic,
            dwelling,
        }
    }

    #[must_use]
    pub fn with_terrains(mut self, terrains: &[Terrain]) -> Self {
        self.terrains = terrains.to_vec();
        self
    }
}
