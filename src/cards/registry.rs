//! The catalogue: lookup for building and settlement definitions.

use rustc_hash::FxHashMap;

use super::definition::{BuildingDef, SettlementDef};
use super::id::CardId;
use crate::core::{Age, GameOption, PlayerCountKey, Variant};

/// Building and settlement definitions by id.
///
/// Definitions keep their registration order, so everything derived from
/// the catalogue (age releases, summaries) is deterministic.
///
/// ## Panics
///
/// Registering an id twice panics; the catalogue is static data.
#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    buildings: Vec<BuildingDef>,
    settlements: Vec<SettlementDef>,
    index: FxHashMap<CardId, usize>,
}

impl Catalogue {
    /// An empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a building definition.
    ///
    /// # Panics
    ///
    /// Panics if a card with the same id is already registered.
    pub fn register(&mut self, def: BuildingDef) {
        if self.index.contains_key(&def.id) {
            panic!("Card with ID {} already registered", def.id);
        }
        self.index.insert(def.id, self.buildings.len());
        self.buildings.push(def);
    }

    /// Register a settlement definition.
    ///
    /// # Panics
    ///
    /// Panics if a card with the same id is already registered.
    pub fn register_settlement(&mut self, def: SettlementDef) {
        if self.index.contains_key(&def.id) {
            panic!("Card with ID {} already registered", def.id);
        }
        self.index.insert(def.id, self.settlements.len());
        self.settlements.push(def);
    }

    #[must_use]
    pub fn building(&self, id: CardId) -> Option<&BuildingDef> {
        if id.is_settlement() {
            return None;
        }
        self.index.get(&id).and_then(|&i| self.buildings.get(i))
    }

    #[must_use]
    pub fn settlement(&self, id: CardId) -> Option<&SettlementDef> {
        if !id.is_settlement() {
            return None;
        }
        self.index.get(&id).and_then(|&i| self.settlements.get(i))
    }

    /// Case-insensitive lookup by card name.
    #[must_use]
    pub fn building_named(&self, name: &str) -> Option<&BuildingDef> {
        self.buildings.iter().find(|b| b.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn buildings(&self) -> impl Iterator<Item = &BuildingDef> {
        self.buildings.iter()
    }

    pub fn settlements(&self) -> impl Iterator<Item = &SettlementDef> {
        self.settlements.iter()
    }

    /// Buildings matching a predicate.
    pub fn find<'a, F>(&'a self, predicate: F) -> impl Iterator<Item = &'a BuildingDef>
    where
        F: Fn(&BuildingDef) -> bool + 'a,
    {
        self.buildings.iter().filter(move |b| predicate(b))
    }

    /// Ids of the buildings entering play at `age` in this kind of game.
    ///
    /// `remove-c-quarry` takes the France age C quarry out of the release.
    #[must_use]
    pub fn release(&self, age: Age, variant: Variant, key: PlayerCountKey, options: &[GameOption]) -> Vec<CardId> {
        let no_quarry = options.contains(&GameOption::RemoveCQuarry);
        self.find(move |b| b.age == age && b.is_available(variant, key, options))
            .filter(|b| !(no_quarry && b.id == CardId::new("f29")))
            .map(|b| b.id)
            .collect()
    }

    /// Ids of the settlements entering play at `age`.
    #[must_use]
    pub fn settlement_release(&self, age: Age) -> Vec<CardId> {
        self.settlements.iter().filter(|s| s.age == age).map(|s| s.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goods::Goods;

    #[test]
    fn test_register_and_get() {
        let mut catalogue = Catalogue::new();
        catalogue.register(BuildingDef::new("g12", "Stone Merchant", Age::Start));

        let found = catalogue.building(CardId::new("g12"));
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "Stone Merchant");

        assert!(catalogue.building(CardId::new("g99")).is_none());
        assert!(catalogue.settlement(CardId::new("g12")).is_none());
    }

    #[test]
    fn test_settlements_are_separate() {
        let mut catalogue = Catalogue::new();
        catalogue.register_settlement(SettlementDef::new("s01", "Shanty Town", Age::Start, Goods::new(), 0, -3));

        assert!(catalogue.settlement(CardId::new("s01")).is_some());
        assert!(catalogue.building(CardId::new("s01")).is_none());
        assert_eq!(catalogue.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut catalogue = Catalogue::new();

        catalogue.register(BuildingDef::new("g12", "Stone Merchant", Age::Start));
        catalogue.register(BuildingDef::new("g12", "Stone Merchant", Age::Start)); // Should panic
    }

    #[test]
    fn test_release_filters_by_game() {
        let mut catalogue = Catalogue::new();
        catalogue.register(BuildingDef::new("g22", "Quarry", Age::B));
        catalogue.register(BuildingDef::new("f29", "Quarry", Age::C).only_in(Variant::France));
        catalogue.register(BuildingDef::new("i29", "Forest Hut", Age::C).only_in(Variant::Ireland));

        let france = catalogue.release(Age::C, Variant::France, PlayerCountKey::Four, &[]);
        assert_eq!(france, vec![CardId::new("f29")]);

        let trimmed = catalogue.release(Age::C, Variant::France, PlayerCountKey::Four, &[GameOption::RemoveCQuarry]);
        assert!(trimmed.is_empty());

        let ireland = catalogue.release(Age::C, Variant::Ireland, PlayerCountKey::Four, &[]);
        assert_eq!(ireland, vec![CardId::new("i29")]);
    }

    #[test]
    fn test_lookup_by_name() {
        let mut catalogue = Catalogue::new();
        catalogue.register(BuildingDef::new("g26", "Shipyard", Age::B));

        assert_eq!(catalogue.building_named("shipyard").map(|b| b.id), Some(CardId::new("g26")));
        assert!(catalogue.building_named("harbour").is_none());
    }
}
