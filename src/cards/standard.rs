//! The standard catalogue: every building and settlement of both variants.

use rust_decimal::Decimal;

use super::definition::{BuildingDef, SettlementDef};
use super::registry::Catalogue;
use crate::board::{LandscapeKind, Terrain};
use crate::core::{Age, GameOption, PlayerCountKey, Variant};
use crate::effects::{Criteria, Function, GoodsLookup, Joiner, PerLookup, Step};
use crate::goods::{Good, GoodKind, Goods};
use crate::rules::ResourceToken;

use GoodKind::*;
use PlayerCountKey::{Four, FourShort, Three, ThreeShort, Two, TwoLong};

const BASICS: [GoodKind; 6] = [Clay, Wood, Peat, Livestock, Grain, Coin];

/// Goods a cloister courtyard accepts.
const UNIQUE_COMMON: [GoodKind; 19] = [
    Wood, Clay, Peat, Livestock, Grain, Coin, PeatCoal, Meat, Grapes, Wine, Flour, Bread, Ceramic, Stone, Ornament,
    Straw, Wonder, Book, Reliquary,
];

const IRISH_DRINKS: [GoodKind; 3] = [Malt, Beer, Whiskey];

fn g<const N: usize>(list: [(GoodKind, u32); N]) -> Goods {
    Goods::from(list)
}

fn one(kind: GoodKind) -> Goods {
    Goods::from(Good::units(kind, 1))
}

/// One single-kind goods set per kind.
fn choices(kinds: &[GoodKind], count: u32) -> Vec<Goods> {
    kinds.iter().map(|&k| Goods::from(Good::units(k, count))).collect()
}

/// Allowed list for unique spends; the five-coin piece counts as its own good.
fn unique(kinds: impl IntoIterator<Item = GoodKind>) -> Vec<Good> {
    let mut allowed: Vec<Good> = kinds.into_iter().map(|k| Good::units(k, 1)).collect();
    allowed.push(Good::units(Coin, 5));
    allowed
}

fn wheel(tokens: &[ResourceToken], good: GoodKind) -> Step {
    Step::production_wheel(tokens).then(Step::gain(one(good)))
}

fn trade(cost: Goods, gain: Goods) -> Step {
    Step::spend(cost).then(Step::gain(gain))
}

impl Catalogue {
    /// The full catalogue of both variants.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalogue = Catalogue::new();
        for def in buildings() {
            catalogue.register(def);
        }
        for def in settlements() {
            catalogue.register_settlement(def);
        }
        catalogue
    }
}

fn buildings() -> Vec<BuildingDef> {
    let mut all = heartland();
    all.extend(start_age());
    all.extend(age_a());
    all.extend(age_b());
    all.extend(age_c());
    all.extend(age_d());
    all
}

fn heartland() -> Vec<BuildingDef> {
    use ResourceToken as T;
    vec![
        BuildingDef::new("h01", "Clay Mound", Age::Basic)
            .with_terrains(&[Terrain::Hillside])
            .with_values(0, 3)
            .overbuildable()
            .with_step(wheel(&[T::Clay, T::Joker], Clay)),
        BuildingDef::new("h02", "Farmyard", Age::Basic)
            .with_terrains(&[Terrain::Plains])
            .with_values(0, 2)
            .with_function(
                Function::new(wheel(&[T::Grain, T::Joker], Grain))
                    .join(Joiner::Or, wheel(&[T::Livestock, T::Joker], Livestock)),
            ),
        BuildingDef::new("h03", "Cloister Office", Age::Basic)
            .with_terrains(&[Terrain::Plains])
            .with_values(0, 2)
            .cloister()
            .with_step(wheel(&[T::Coin, T::Joker], Coin)),
    ]
}

fn start_age() -> Vec<BuildingDef> {
    use Variant::{France, Ireland};
    vec![
        BuildingDef::new("g01", "Priory", Age::Start)
            .with_cost(g([(Wood, 1), (Clay, 1)]))
            .with_values(4, 3)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .cloister()
            .using(Criteria::WithPrior),
        BuildingDef::new("g02", "Cloister Courtyard", Age::Start)
            .with_cost(g([(Wood, 2)]))
            .with_values(4, 4)
            .cloister()
            .with_step(
                Step::spend_unique(unique(UNIQUE_COMMON.into_iter().chain(IRISH_DRINKS)), 3)
                    .then(Step::gain_choices(choices(&BASICS, 6))),
            ),
        BuildingDef::new("f03", "Grain Storage", Age::Start)
            .with_cost(g([(Wood, 1), (Straw, 1)]))
            .with_values(3, 4)
            .only_in(France)
            .for_counts(PlayerCountKey::FOUR)
            .with_step(trade(one(Coin), g([(Grain, 6)]))),
        BuildingDef::new("i03", "Granary", Age::Start)
            .with_cost(g([(Wood, 1)]))
            .with_values(2, 3)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::FOUR)
            .cloister()
            .with_step(trade(one(Coin), g([(Grain, 4), (Book, 1)]))),
        BuildingDef::new("f04", "Windmill", Age::Start)
            .with_terrains(&[Terrain::Coast, Terrain::Hillside])
            .with_cost(g([(Wood, 3), (Clay, 2)]))
            .with_values(10, 6)
            .only_in(France)
            .with_step(trade(one(Grain), g([(Flour, 1), (Straw, 1)])).max(7)),
        BuildingDef::new("i04", "Malthouse", Age::Start)
            .with_cost(g([(Clay, 2)]))
            .with_values(5, 4)
            .only_in(Ireland)
            .with_step(trade(one(Grain), g([(Malt, 1), (Straw, 1)])).unbounded()),
        BuildingDef::new("f05", "Bakery", Age::Start)
            .with_cost(g([(Clay, 2), (Straw, 1)]))
            .with_values(4, 5)
            .only_in(France)
            .with_function(
                Function::new(
                    trade(
                        one(Flour).with(Good::new(Energy, Decimal::new(5, 1))),
                        one(Bread),
                    )
                    .unbounded(),
                )
                .join(Joiner::AndThenOr, trade(one(Bread), g([(Coin, 4)])).max(2)),
            ),
        BuildingDef::new("i05", "Brewery", Age::Start)
            .with_cost(g([(Stone, 2), (Straw, 1)]))
            .with_values(9, 7)
            .only_in(Ireland)
            .with_function(
                Function::new(trade(g([(Malt, 1), (Grain, 1)]), one(Beer)).unbounded())
                    .join(Joiner::AndThenOr, trade(one(Beer), g([(Coin, 7)]))),
            ),
        BuildingDef::new("g06", "Fuel Merchant", Age::Start)
            .with_cost(g([(Clay, 1), (Straw, 1)]))
            .with_values(5, 2)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .with_step(
                Step::spend_breaks(vec![g([(Energy, 3)]), g([(Energy, 6)]), g([(Energy, 9)])])
                    .then(Step::gain_breaks(vec![g([(Coin, 5)]), g([(Coin, 8)]), g([(Coin, 10)])])),
            ),
        BuildingDef::new("g07", "Peat Coal Kiln", Age::Start)
            .with_cost(g([(Clay, 1)]))
            .with_values(4, -2)
            .with_function(
                Function::new(Step::gain_fixed(g([(PeatCoal, 1), (Coin, 1)])))
                    .join(Joiner::Additionally, trade(one(Peat), one(PeatCoal)).unbounded()),
            ),
        BuildingDef::new("f08", "Market", Age::Start)
            .with_cost(g([(Stone, 2)]))
            .with_values(5, 8)
            .only_in(France)
            .with_step(Step::spend_unique(unique(UNIQUE_COMMON), 4).then(Step::gain(g([(Bread, 1), (Coin, 7)])))),
        BuildingDef::new("i08", "False Lighthouse", Age::Start)
            .with_terrains(&[Terrain::Coast])
            .with_cost(g([(Wood, 2), (Clay, 1)]))
            .with_values(5, 5)
            .only_in(Ireland)
            .with_function(
                Function::new(Step::gain_fixed(g([(Coin, 3)])))
                    .join(Joiner::And, Step::gain_choices(choices(&[Beer, Whiskey], 1))),
            ),
        BuildingDef::new("f09", "Cloister Garden", Age::Start)
            .with_cost(g([(Coin, 3)]))
            .with_values(5, 0)
            .only_in(France)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .cloister()
            .with_function(
                Function::new(Step::gain_fixed(one(Grapes)))
                    .join(Joiner::And, Step::use_building(Criteria::AdjacentUnoccupied)),
            ),
        BuildingDef::new("i09", "Spinning Mill", Age::Start)
            .with_cost(g([(Wood, 1), (Straw, 1)]))
            .with_values(3, 3)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .with_step(
                Step::have_breaks(vec![g([(Livestock, 1)]), g([(Livestock, 5)]), g([(Livestock, 9)])])
                    .then(Step::gain_breaks(vec![g([(Coin, 3)]), g([(Coin, 5)]), g([(Coin, 6)])])),
            ),
        BuildingDef::new("f10", "Carpentry", Age::Start)
            .with_cost(g([(Wood, 2), (Clay, 1)]))
            .with_values(7, 0)
            .only_in(France)
            .for_counts(&[Four])
            .with_step(Step::remove_forest().then(Step::build_building(false))),
        BuildingDef::new("i10", "Cottage", Age::Start)
            .with_cost(g([(Stone, 1), (Straw, 1)]))
            .with_values(5, 0)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::FOUR)
            .with_function(
                Function::new(Step::gain_fixed(one(Malt)))
                    .join(Joiner::And, Step::use_building(Criteria::AdjacentUnoccupied)),
            ),
        BuildingDef::new("f11", "Harbor Promenade", Age::Start)
            .with_terrains(&[Terrain::Coast])
            .with_cost(g([(Wood, 1), (Stone, 1)]))
            .with_values(1, 7)
            .only_in(France)
            .with_step(Step::gain_fixed(g([(Wood, 1), (Wine, 1), (Coin, 1), (Ceramic, 1)]))),
        BuildingDef::new("i11", "Houseboat", Age::Start)
            .with_terrains(&[Terrain::Water])
            .with_cost(g([(Wood, 1)]))
            .with_values(4, 6)
            .only_in(Ireland)
            .with_step(Step::gain_fixed(g([(Wood, 1), (Malt, 1), (Coin, 1), (Peat, 1)]))),
        BuildingDef::new("g12", "Stone Merchant", Age::Start)
            .with_cost(g([(Wood, 1)]))
            .with_values(6, 1)
            .with_step(trade(g([(Food, 2), (Energy, 1)]), one(Stone)).max(5)),
        BuildingDef::new("g13", "Builders' Market", Age::Start)
            .with_cost(g([(Clay, 2)]))
            .with_values(6, 1)
            .for_counts(&[TwoLong, Four])
            .with_step(trade(g([(Coin, 2)]), g([(Wood, 2), (Clay, 2), (Stone, 1), (Straw, 1)]))),
    ]
}

fn age_a() -> Vec<BuildingDef> {
    use ResourceToken as T;
    use Variant::{France, Ireland};
    vec![
        BuildingDef::new("f14", "Grapevine", Age::A)
            .with_terrains(&[Terrain::Hillside])
            .with_cost(g([(Wood, 1)]))
            .with_values(3, 6)
            .only_in(France)
            .for_counts(&[Two, TwoLong, Three, ThreeShort, Four, FourShort])
            .with_step(wheel(&[T::Grapes, T::Joker], Grapes)),
        BuildingDef::new("i14", "Sacred Site", Age::A)
            .with_cost(g([(Stone, 1)]))
            .with_values(3, 6)
            .only_in(Ireland)
            .with_function(
                Function::new(Step::gain_fixed(one(Book)))
                    .join(Joiner::And, Step::gain_choices(choices(&[Grain, Malt], 2)))
                    .join(Joiner::And, Step::gain_choices(choices(&[Beer, Whiskey], 1))),
            ),
        BuildingDef::new("f15", "Financed Estate", Age::A)
            .with_cost(g([(Clay, 1), (Stone, 1)]))
            .with_values(4, 6)
            .only_in(France)
            .for_counts(PlayerCountKey::FOUR)
            .with_step(trade(one(Coin), g([(Book, 1), (Bread, 1), (Grapes, 2), (Flour, 2)]))),
        BuildingDef::new("i15", "Druid's House", Age::A)
            .with_terrains(&[Terrain::Hillside])
            .with_cost(g([(Clay, 1), (Stone, 1)]))
            .with_values(6, 6)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::FOUR)
            .with_step(
                Step::spend(one(Book)).then(
                    Step::gain_choices(choices(&BASICS, 5)).then(Step::gain_choices(choices(&BASICS, 3)).distinct()),
                ),
            ),
        BuildingDef::new("g16", "Cloister Chapter House", Age::A)
            .with_cost(g([(Clay, 3), (Straw, 1)]))
            .with_values(2, 5)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .cloister()
            .with_step(Step::gain_fixed(g([
                (Clay, 1),
                (Livestock, 1),
                (Wood, 1),
                (Grain, 1),
                (Peat, 1),
                (Coin, 1),
            ]))),
        BuildingDef::new("f17", "Cloister Library", Age::A)
            .with_cost(g([(Stone, 2), (Straw, 1)]))
            .with_values(7, 7)
            .only_in(France)
            .cloister()
            .with_function(
                Function::new(trade(one(Coin), one(Book)).max(3))
                    .join(Joiner::AndThenOr, trade(one(Book), g([(Meat, 1), (Wine, 1)]))),
            ),
        BuildingDef::new("i17", "Scriptorium", Age::A)
            .with_cost(g([(Wood, 1), (Straw, 1)]))
            .with_values(3, 5)
            .only_in(Ireland)
            .cloister()
            .with_step(trade(one(Coin), g([(Book, 1), (Meat, 1), (Whiskey, 2)]))),
        BuildingDef::new("g18", "Cloister Workshop", Age::A)
            .with_cost(g([(Wood, 3)]))
            .with_values(7, 2)
            .cloister()
            .with_function(
                Function::new(trade(g([(Clay, 1), (Energy, 1)]), one(Ceramic)).max(3))
                    .join(Joiner::AndOr, trade(g([(Stone, 1), (Energy, 1)]), one(Ornament))),
            ),
        BuildingDef::new("g19", "Slaughterhouse", Age::A)
            .with_cost(g([(Wood, 2), (Clay, 2)]))
            .with_values(8, -3)
            .with_step(trade(g([(Livestock, 1), (Straw, 1)]), one(Meat)).unbounded()),
        BuildingDef::new("fl1", "Loamy Landscape", Age::A)
            .with_terrains(&[Terrain::ClayMound])
            .with_cost(g([(Coin, 3)]))
            .with_values(2, 0)
            .only_in(France)
            .requires(GameOption::LoamyLandscape)
            .with_function(Function::new(Step::SwapTokens).join(
                Joiner::AndThen,
                Step::production_wheel(&[T::Clay, T::Livestock, T::Grain, T::Joker])
                    .then(Step::gain_choices(choices(&[Clay, Livestock, Grain], 1))),
            )),
    ]
}

fn age_b() -> Vec<BuildingDef> {
    use ResourceToken as T;
    use Variant::{France, Ireland};
    vec![
        BuildingDef::new("f20", "Inn", Age::B)
            .with_cost(g([(Wood, 2), (Straw, 2)]))
            .with_values(4, 6)
            .only_in(France)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .with_function(
                Function::new(trade(one(Wine), g([(Coin, 6)])))
                    .join(Joiner::AndOr, trade(one(Food), one(Coin)).max(7)),
            ),
        BuildingDef::new("i20", "Alehouse", Age::B)
            .with_cost(g([(Wood, 1), (Stone, 1)]))
            .with_values(3, 6)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .with_function(
                Function::new(trade(one(Beer), g([(Coin, 8)])))
                    .join(Joiner::AndOr, trade(one(Whiskey), g([(Coin, 7)]))),
            ),
        BuildingDef::new("f21", "Winery", Age::B)
            .with_cost(g([(Clay, 2), (Straw, 2)]))
            .with_values(4, 5)
            .only_in(France)
            .with_function(
                Function::new(trade(one(Grapes), one(Wine)).unbounded())
                    .join(Joiner::AndThenOr, trade(one(Wine), g([(Coin, 7)]))),
            ),
        BuildingDef::new("i21", "Whiskey Distillery", Age::B)
            .with_cost(g([(Clay, 2), (Straw, 2)]))
            .with_values(6, 5)
            .only_in(Ireland)
            .with_step(trade(g([(Malt, 1), (Wood, 1), (Peat, 1)]), g([(Whiskey, 2)])).unbounded()),
        BuildingDef::new("g22", "Quarry", Age::B)
            .with_terrains(&[Terrain::Mountain])
            .with_cost(g([(Coin, 5)]))
            .with_values(7, -4)
            .with_step(wheel(&[T::Stone, T::Joker], Stone)),
        BuildingDef::new("f23", "Bathhouse", Age::B)
            .with_cost(g([(Stone, 1), (Straw, 1)]))
            .with_values(2, 6)
            .only_in(France)
            .for_counts(PlayerCountKey::FOUR)
            .cloister()
            .with_step(trade(one(Coin), g([(Book, 1), (Ceramic, 1)]))),
        BuildingDef::new("i23", "Locutory", Age::B)
            .with_cost(g([(Wood, 3), (Clay, 2)]))
            .with_values(7, 1)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::FOUR)
            .cloister()
            .with_step(Step::spend(g([(Coin, 2)])).then(Step::build_building(true))),
        BuildingDef::new("f24", "Cloister Church", Age::B)
            .with_cost(g([(Clay, 5), (Stone, 3)]))
            .with_values(12, 9)
            .only_in(France)
            .cloister()
            .with_step(trade(g([(Bread, 1), (Wine, 1)]), one(Reliquary)).max(2)),
        BuildingDef::new("i24", "Chapel", Age::B)
            .with_cost(g([(Clay, 3), (Stone, 3)]))
            .with_values(10, 8)
            .only_in(Ireland)
            .cloister()
            .with_function(
                Function::new(trade(one(Coin), one(Book)))
                    .join(Joiner::AndOr, trade(g([(Beer, 1), (Whiskey, 1)]), one(Reliquary)).max(3)),
            ),
        BuildingDef::new("f25", "Chamber of Wonders", Age::B)
            .with_cost(g([(Wood, 1), (Clay, 1)]))
            .with_values(0, 6)
            .only_in(France)
            .for_counts(PlayerCountKey::FOUR)
            .with_step(Step::spend_unique(unique(UNIQUE_COMMON), 13).then(Step::gain(one(Wonder)))),
        BuildingDef::new("i25", "Portico", Age::B)
            .with_cost(g([(Clay, 2)]))
            .with_values(2, 6)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::FOUR)
            .cloister()
            .with_step(trade(
                one(Reliquary),
                g([(Clay, 2), (Livestock, 2), (Wood, 2), (Grain, 2), (Peat, 2), (Coin, 2), (Stone, 2)]),
            )),
        BuildingDef::new("g26", "Shipyard", Age::B)
            .with_terrains(&[Terrain::Coast])
            .with_cost(g([(Clay, 4), (Stone, 1)]))
            .with_values(15, -2)
            .with_step(trade(g([(Wood, 2)]), g([(Ornament, 1), (Coin, 5)]))),
    ]
}

fn age_c() -> Vec<BuildingDef> {
    use ResourceToken as T;
    use Variant::{France, Ireland};
    vec![
        BuildingDef::new("f27", "Palace", Age::C)
            .with_terrains(&[Terrain::Hillside])
            .with_cost(g([(Coin, 25)]))
            .with_values(25, 8)
            .only_in(France)
            .with_step(Step::spend(one(Wine)).then(Step::use_building(Criteria::Occupied))),
        BuildingDef::new("i27", "Grand Manor", Age::C)
            .with_cost(g([(Coin, 20)]))
            .with_values(18, 7)
            .only_in(Ireland)
            .with_step(Step::spend(one(Whiskey)).then(Step::use_building(Criteria::Occupied))),
        BuildingDef::new("g28", "Castle", Age::C)
            .with_terrains(&[Terrain::Hillside, Terrain::Mountain])
            .with_cost(g([(Wood, 6), (Stone, 5)]))
            .with_values(15, 7)
            .with_step(Step::build_settlement()),
        BuildingDef::new("f29", "Quarry", Age::C)
            .with_terrains(&[Terrain::Mountain])
            .with_cost(g([(Coin, 5)]))
            .with_values(7, -4)
            .only_in(France)
            .for_counts(&[Three, Four, FourShort])
            .with_step(wheel(&[T::Stone, T::Joker], Stone)),
        BuildingDef::new("i29", "Forest Hut", Age::C)
            .with_cost(g([(Clay, 1), (Straw, 1)]))
            .with_values(1, 5)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .with_step(Step::remove_forest().then(Step::gain(g([(Livestock, 2), (Wood, 2), (Stone, 1)])))),
        BuildingDef::new("f30", "Town Estate", Age::C)
            .with_cost(g([(Stone, 2), (Straw, 2)]))
            .with_values(6, 5)
            .only_in(France)
            .with_step(trade(one(Ceramic), g([(Coin, 12)]))),
        BuildingDef::new("i30", "Refectory", Age::C)
            .with_cost(g([(Wood, 1), (Clay, 2)]))
            .with_values(4, 5)
            .only_in(Ireland)
            .cloister()
            .with_function(
                Function::new(Step::gain_fixed(g([(Beer, 1), (Meat, 1)])))
                    .join(Joiner::Additionally, trade(one(Meat), one(Ceramic)).max(4)),
            ),
        BuildingDef::new("f31", "Grapevine", Age::C)
            .with_terrains(&[Terrain::Hillside])
            .with_cost(g([(Wood, 1)]))
            .with_values(3, 6)
            .only_in(France)
            .for_counts(&[Four])
            .with_step(wheel(&[T::Grapes, T::Joker], Grapes)),
        BuildingDef::new("i31", "Coal Harbor", Age::C)
            .with_terrains(&[Terrain::Coast])
            .with_cost(g([(Clay, 1), (Stone, 2)]))
            .with_values(12, 0)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::FOUR)
            .with_step(trade(one(PeatCoal), g([(Coin, 3), (Whiskey, 1)])).max(3)),
        BuildingDef::new("f32", "Calefactory", Age::C)
            .with_cost(g([(Stone, 1)]))
            .with_values(2, 5)
            .only_in(France)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .cloister()
            .with_step(Step::spend(one(Coin)).then(Step::and_or(Step::FellTrees, Step::CutPeat))),
        BuildingDef::new("i32", "Filial Church", Age::C)
            .with_cost(g([(Wood, 3), (Clay, 4)]))
            .with_values(6, 7)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::FOUR)
            .cloister()
            .with_step(
                Step::spend_unique(
                    unique(
                        UNIQUE_COMMON
                            .into_iter()
                            .filter(|k| !matches!(k, Grapes | Wine | Flour | Bread))
                            .chain(IRISH_DRINKS),
                    ),
                    5,
                )
                .then(Step::gain(one(Reliquary))),
            ),
        BuildingDef::new("f33", "Shipping Company", Age::C)
            .with_terrains(&[Terrain::Coast])
            .with_cost(g([(Wood, 3), (Clay, 3)]))
            .with_values(8, 4)
            .only_in(France)
            .with_step(Step::spend(g([(Energy, 3)])).then(
                Step::production_wheel(&[T::Joker]).then(Step::gain_choices(choices(&[Meat, Bread, Wine], 1))),
            )),
        BuildingDef::new("i33", "Cooperage", Age::C)
            .with_cost(g([(Clay, 3), (Straw, 1)]))
            .with_values(5, 3)
            .only_in(Ireland)
            .with_step(
                Step::spend(g([(Wood, 3)]))
                    .then(Step::production_wheel(&[T::Joker]).then(Step::gain_choices(choices(&[Beer, Whiskey], 1)))),
            ),
    ]
}

fn age_d() -> Vec<BuildingDef> {
    use Variant::{France, Ireland};
    let finished = g([(Book, 1), (Ceramic, 1), (Ornament, 1), (Reliquary, 1)]);
    let pilgrimage = || {
        Step::spend_choices(choices(&[Book, Ceramic, Ornament], 1))
            .then(Step::gain_choices(choices(&[Ceramic, Ornament, Reliquary], 1)))
    };
    vec![
        BuildingDef::new("g34", "Sacristy", Age::D)
            .with_cost(g([(Stone, 3), (Straw, 2)]))
            .with_values(10, 7)
            .cloister()
            .with_step(trade(finished.clone(), one(Wonder))),
        BuildingDef::new("f35", "Forger's Workshop", Age::D)
            .with_cost(g([(Clay, 2), (Straw, 1)]))
            .with_values(4, 2)
            .only_in(France)
            .with_function(
                Function::new(trade(g([(Coin, 5)]), one(Reliquary)))
                    .join(Joiner::Additionally, trade(g([(Coin, 10)]), one(Reliquary)).unbounded()),
            ),
        BuildingDef::new("i35", "Round Tower", Age::D)
            .with_terrains(&[Terrain::Hillside])
            .with_cost(g([(Stone, 4)]))
            .with_values(6, 9)
            .only_in(Ireland)
            .with_step(trade(g([(Coin, 5), (Whiskey, 1), (Points, 14)]), one(Wonder))),
        BuildingDef::new("f36", "Pilgrimage Site", Age::D)
            .with_cost(g([(Coin, 6)]))
            .with_values(2, 6)
            .only_in(France)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .with_function(Function::new(pilgrimage()).join(Joiner::AndThenOr, pilgrimage())),
        BuildingDef::new("i36", "Camera", Age::D)
            .with_cost(g([(Clay, 2)]))
            .with_values(5, 3)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .cloister()
            .with_step(trade(g([(Book, 1), (Ceramic, 1)]), g([(Coin, 1), (Clay, 1), (Reliquary, 1)])).max(2)),
        BuildingDef::new("f37", "Dormitory", Age::D)
            .with_cost(g([(Clay, 3)]))
            .with_values(3, 4)
            .only_in(France)
            .cloister()
            .with_function(
                Function::new(Step::gain_fixed(one(Ceramic)))
                    .join(Joiner::Additionally, trade(g([(Straw, 1), (Wood, 1)]), one(Book)).unbounded()),
            ),
        BuildingDef::new("i37", "Bulwark", Age::D)
            .with_cost(g([(Wood, 2), (Clay, 4)]))
            .with_values(8, 6)
            .only_in(Ireland)
            .with_step(Step::spend(one(Book)).then(Step::and_conditional(
                Step::PlaceLandscape(LandscapeKind::District),
                Step::PlaceLandscape(LandscapeKind::Plot),
            ))),
        BuildingDef::new("f38", "Printing Office", Age::D)
            .with_cost(g([(Wood, 1), (Stone, 2)]))
            .with_values(5, 5)
            .only_in(France)
            .with_step(Step::remove_forest().max(4).then(Step::gain(one(Book)))),
        BuildingDef::new("i38", "Festival Ground", Age::D)
            .with_cost(g([(Coin, 10)]))
            .with_values(3, 7)
            .only_in(Ireland)
            .with_step(
                Step::spend(one(Beer)).then(
                    Step::gain(one(Points))
                        .pool(finished.clone())
                        .per(PerLookup::MoorsAndForests),
                ),
            ),
        BuildingDef::new("g39", "Estate", Age::D)
            .with_cost(g([(Wood, 2), (Stone, 2)]))
            .with_values(5, 6)
            .for_counts(PlayerCountKey::FOUR)
            .with_step(
                Step::spend_choices(vec![g([(Energy, 6)]), g([(Food, 10)])])
                    .max(2)
                    .then(Step::gain(g([(Book, 1), (Ornament, 1)]))),
            ),
        BuildingDef::new("f40", "Hospice", Age::D)
            .with_cost(g([(Wood, 3), (Straw, 1)]))
            .with_values(7, 5)
            .only_in(France)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .cloister()
            .using(Criteria::Unbuilt),
        BuildingDef::new("i40", "Guesthouse", Age::D)
            .with_cost(g([(Wood, 3), (Straw, 1)]))
            .with_values(7, 5)
            .only_in(Ireland)
            .for_counts(PlayerCountKey::THREE_PLUS)
            .using(Criteria::Unbuilt),
        BuildingDef::new("g41", "House of the Brotherhood", Age::D)
            .with_cost(g([(Clay, 1), (Stone, 1)]))
            .with_values(3, 3)
            .cloister()
            .with_step(
                Step::spend(g([(Coin, 5)])).then(
                    Step::gain(Goods::new())
                        .lookup(GoodsLookup::PointsByPlayerCount)
                        .pool(finished)
                        .per(PerLookup::CloisterBuildings),
                ),
            ),
    ]
}

fn settlements() -> Vec<SettlementDef> {
    vec![
        SettlementDef::new("s01", "Shanty Town", Age::Start, g([(Energy, 1), (Food, 1)]), 0, -3),
        SettlementDef::new("s02", "Farming Village", Age::Start, g([(Energy, 3), (Food, 3)]), 1, 1),
        SettlementDef::new("s03", "Market Town", Age::Start, g([(Food, 7)]), 2, 2),
        SettlementDef::new("s04", "Fishing Village", Age::Start, g([(Energy, 3), (Food, 8)]), 4, 6)
            .with_terrains(&[Terrain::Coast]),
        SettlementDef::new("s05", "Artists' Colony", Age::A, g([(Energy, 1), (Food, 5)]), -1, 5),
        SettlementDef::new("s06", "Hamlet", Age::B, g([(Energy, 3), (Food, 3)]), 3, 4),
        SettlementDef::new("s07", "Village", Age::C, g([(Energy, 9), (Food, 15)]), 3, 4),
        SettlementDef::new("s08", "Hilltop Village", Age::D, g([(Energy, 3), (Food, 30)]), 10, 8)
            .with_terrains(&[Terrain::Hillside]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    #[test]
    fn test_standard_catalogue_is_complete() {
        let catalogue = Catalogue::standard();
        assert_eq!(catalogue.buildings().count(), 71);
        assert_eq!(catalogue.settlements().count(), 8);
        assert!(catalogue.buildings().all(|b| !b.function.is_empty()));
    }

    #[test]
    fn test_start_release_ireland_three_players() {
        let catalogue = Catalogue::standard();
        let released = catalogue.release(Age::Start, Variant::Ireland, PlayerCountKey::Three, &[]);
        assert_eq!(released.len(), 10);
        assert!(released.contains(&CardId::new("g01")));
        assert!(!released.contains(&CardId::new("i03")));
        assert!(!released.contains(&CardId::new("f04")));
    }

    #[test]
    fn test_start_release_solo_ireland() {
        let catalogue = Catalogue::standard();
        let released = catalogue.release(Age::Start, Variant::Ireland, PlayerCountKey::One, &[GameOption::OnePlayer]);
        assert_eq!(released.len(), 12);
    }

    #[test]
    fn test_loamy_landscape_needs_option() {
        let catalogue = Catalogue::standard();
        let fl1 = CardId::new("fl1");
        let plain = catalogue.release(Age::A, Variant::France, PlayerCountKey::Three, &[]);
        assert!(!plain.contains(&fl1));
        let loamy = catalogue.release(Age::A, Variant::France, PlayerCountKey::Three, &[GameOption::LoamyLandscape]);
        assert!(loamy.contains(&fl1));
    }

    #[test]
    fn test_settlement_terrain_restrictions() {
        let catalogue = Catalogue::standard();
        let fishing = catalogue.settlement(CardId::new("s04")).unwrap();
        assert_eq!(fishing.terrains, vec![Terrain::Coast]);
        assert_eq!(catalogue.settlement_release(Age::Start).len(), 4);
    }
}
