//! Building scenarios run against a three-player table.
//!
//! Every scenario starts with the production wheel advanced three rounds,
//! so a token left at zero produces 4 goods.

use oel_engine::board::{Card, PlacedBuilding};
use oel_engine::effects::BuildingRef;
use oel_engine::{
    CardId, Coordinate, EngineError, Game, GameConfig, GoodKind, Goods, ResourceToken, SeatId, StepContext, Validation,
};
use rust_decimal::Decimal;

fn table() -> Game {
    let mut game = Game::new(GameConfig::new(3));
    game.gameboard.wheel = 3;
    game
}

fn give<const N: usize>(game: &mut Game, goods: [(GoodKind, u32); N]) {
    game.seats[0].inventory.gain(&Goods::from(goods)).unwrap();
}

fn count(game: &Game, kind: GoodKind) -> Decimal {
    game.seats[0].inventory.count(kind)
}

fn at(text: &str) -> Coordinate {
    text.parse().unwrap()
}

/// Run building `id` for seat 0 as if it stood at `place`.
fn run(game: &mut Game, id: &str, place: Option<&str>, text: Option<&str>) -> Result<Validation, EngineError> {
    let target = BuildingRef { seat: SeatId(0), at: place.map(at), id: CardId::new(id) };
    let mut cx = StepContext::new(game, SeatId(0));
    cx.use_building(target, text)
}

// =============================================================================
// Heartland
// =============================================================================

/// Clay mound produces four clay from a token three segments behind.
#[test]
fn test_clay_mound_choose_clay() {
    let mut game = table();
    run(&mut game, "h01", Some("30g"), Some("choose clay")).unwrap();

    assert_eq!(count(&game, GoodKind::Clay), Decimal::from(4));
    assert_eq!(game.gameboard.position(ResourceToken::Clay), Some(3));
    assert_eq!(game.gameboard.production_value(ResourceToken::Clay).unwrap(), 0);
}

/// Farmyard takes the joker for grain; the livestock branch cannot match.
#[test]
fn test_farmyard_joker_for_grain() {
    let mut game = table();
    run(&mut game, "h02", Some("31e"), Some("choose joker to gain 4 grain")).unwrap();

    assert_eq!(count(&game, GoodKind::Grain), Decimal::from(4));
    assert_eq!(count(&game, GoodKind::Livestock), Decimal::ZERO);
    assert_eq!(game.gameboard.position(ResourceToken::Joker), Some(3));
    assert_eq!(game.gameboard.position(ResourceToken::Grain), Some(0));
}

/// A token the building does not list is refused.
#[test]
fn test_clay_mound_refuses_wood() {
    let mut game = table();
    assert!(run(&mut game, "h01", Some("30g"), Some("choose wood")).is_err());
    assert_eq!(count(&game, GoodKind::Wood), Decimal::ZERO);
}

// =============================================================================
// Start buildings
// =============================================================================

/// Bakery bakes two loaves and sells one.
#[test]
fn test_bakery_both_clauses() {
    let mut game = table();
    give(&mut game, [(GoodKind::Flour, 2), (GoodKind::Wood, 1)]);

    run(&mut game, "f05", None, Some("spend 2 flour 1 wood and spend 1 bread")).unwrap();

    assert_eq!(count(&game, GoodKind::Flour), Decimal::ZERO);
    assert_eq!(count(&game, GoodKind::Wood), Decimal::ZERO);
    assert_eq!(count(&game, GoodKind::Bread), Decimal::ONE);
    assert_eq!(count(&game, GoodKind::Coin), Decimal::from(4));
}

/// Bakery may skip baking and only sell.
#[test]
fn test_bakery_sells_bread_only() {
    let mut game = table();
    give(&mut game, [(GoodKind::Bread, 2)]);

    run(&mut game, "f05", None, Some("spend 2 bread")).unwrap();

    assert_eq!(count(&game, GoodKind::Bread), Decimal::ZERO);
    assert_eq!(count(&game, GoodKind::Coin), Decimal::from(8));
}

/// Bakery sells at most two loaves.
#[test]
fn test_bakery_sale_is_capped() {
    let mut game = table();
    give(&mut game, [(GoodKind::Bread, 3)]);

    assert!(run(&mut game, "f05", None, Some("spend 3 bread")).is_err());
    assert_eq!(count(&game, GoodKind::Bread), Decimal::from(3));
}

/// Fuel merchant pays by the highest energy threshold reached.
#[test]
fn test_fuel_merchant_breaks() {
    for (peat, coin) in [(2, 5), (3, 8), (5, 10)] {
        let mut game = table();
        give(&mut game, [(GoodKind::Peat, peat)]);

        run(&mut game, "g06", None, Some(&format!("spend {peat} peat"))).unwrap();

        assert_eq!(count(&game, GoodKind::Peat), Decimal::ZERO, "{peat} peat");
        assert_eq!(count(&game, GoodKind::Coin), Decimal::from(coin), "{peat} peat");
    }
}

/// Peat coal kiln always pays out, and converts peat on request.
#[test]
fn test_peat_coal_kiln() {
    let mut game = table();
    run(&mut game, "g07", None, None).unwrap();
    assert_eq!(count(&game, GoodKind::PeatCoal), Decimal::ONE);
    assert_eq!(count(&game, GoodKind::Coin), Decimal::ONE);

    let mut game = table();
    give(&mut game, [(GoodKind::Peat, 2)]);
    run(&mut game, "g07", None, Some("spend 2 peat")).unwrap();
    assert_eq!(count(&game, GoodKind::PeatCoal), Decimal::from(3));
    assert_eq!(count(&game, GoodKind::Peat), Decimal::ZERO);
}

/// Market swaps four different goods for bread and seven coin.
#[test]
fn test_market_four_unique_goods() {
    let mut game = table();
    give(&mut game, [(GoodKind::Wood, 1), (GoodKind::Clay, 1), (GoodKind::Peat, 1), (GoodKind::Grain, 1)]);

    run(&mut game, "f08", None, Some("spend 1 wood 1 clay 1 peat 1 grain")).unwrap();

    assert_eq!(count(&game, GoodKind::Bread), Decimal::ONE);
    assert_eq!(count(&game, GoodKind::Coin), Decimal::from(7));
    assert_eq!(count(&game, GoodKind::Wood), Decimal::ZERO);
}

/// Market refuses doubled goods.
#[test]
fn test_market_rejects_duplicates() {
    let mut game = table();
    give(&mut game, [(GoodKind::Wood, 2), (GoodKind::Clay, 1), (GoodKind::Peat, 1)]);

    let err = run(&mut game, "f08", None, Some("spend 2 wood 1 clay 1 peat")).unwrap_err();
    assert!(matches!(err, EngineError::TooManyGoods { count: 2, max: 1 }));
}

/// False lighthouse pays three coin plus the chosen drink.
#[test]
fn test_false_lighthouse() {
    let mut game = Game::new(GameConfig::new(3).with_variant(oel_engine::Variant::Ireland));
    run(&mut game, "i08", None, Some("gain 1 whiskey")).unwrap();

    assert_eq!(count(&game, GoodKind::Coin), Decimal::from(3));
    assert_eq!(count(&game, GoodKind::Whiskey), Decimal::ONE);
    assert_eq!(count(&game, GoodKind::Beer), Decimal::ZERO);
}

/// Cloister garden yields grapes and runs an adjacent building.
#[test]
fn test_cloister_garden_uses_neighbour() {
    let mut game = table();
    let garden = at("31f");
    game.seats[0]
        .board
        .space_mut(garden)
        .unwrap()
        .place(Card::Building(PlacedBuilding::new(CardId::new("f09"))));

    run(&mut game, "f09", Some("31f"), Some("use h02 to choose grain")).unwrap();

    assert_eq!(count(&game, GoodKind::Grapes), Decimal::ONE);
    assert_eq!(count(&game, GoodKind::Grain), Decimal::from(4));
}

/// Cloister garden cannot reach a building that is not next to it.
#[test]
fn test_cloister_garden_needs_adjacency() {
    let mut game = table();
    let garden = at("31f");
    game.seats[0]
        .board
        .space_mut(garden)
        .unwrap()
        .place(Card::Building(PlacedBuilding::new(CardId::new("f09"))));

    let err = run(&mut game, "f09", Some("31f"), Some("use h01 to choose clay")).unwrap_err();
    assert!(matches!(err, EngineError::BuildingNotFound(_)));
    assert_eq!(count(&game, GoodKind::Clay), Decimal::ZERO);
}

/// Windmill mills at most seven grain, and only grain the seat has.
#[test]
fn test_windmill_bounds() {
    let mut game = table();
    give(&mut game, [(GoodKind::Grain, 8)]);
    let err = run(&mut game, "f04", None, Some("spend 8 grain")).unwrap_err();
    assert!(matches!(err, EngineError::TooManyGoods { count: 8, max: 7 }));
    assert_eq!(count(&game, GoodKind::Grain), Decimal::from(8));

    let mut game = table();
    give(&mut game, [(GoodKind::Grain, 2)]);
    let err = run(&mut game, "f04", None, Some("spend 3 grain")).unwrap_err();
    assert!(matches!(err, EngineError::InsufficientGoods { good: GoodKind::Grain, .. }));

    run(&mut game, "f04", None, Some("spend 2 grain")).unwrap();
    assert_eq!(count(&game, GoodKind::Flour), Decimal::from(2));
    assert_eq!(count(&game, GoodKind::Straw), Decimal::from(2));
}
