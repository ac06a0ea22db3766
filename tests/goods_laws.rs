//! Algebraic laws of the goods types.

use oel_engine::{EngineError, Good, GoodKind, Goods, Inventory};
use proptest::prelude::*;
use rust_decimal::Decimal;

const KINDS: [GoodKind; 8] = [
    GoodKind::Wood,
    GoodKind::Clay,
    GoodKind::Peat,
    GoodKind::Grain,
    GoodKind::Coin,
    GoodKind::Straw,
    GoodKind::Bread,
    GoodKind::Wine,
];

fn goods() -> impl Strategy<Value = Goods> {
    prop::collection::vec((0..KINDS.len(), 1u32..20), 0..6)
        .prop_map(|pairs| pairs.into_iter().map(|(i, n)| Good::units(KINDS[i], n)).collect())
}

fn holding(goods: &Goods) -> Inventory {
    let mut inventory = Inventory::new();
    inventory.gain(goods).unwrap();
    inventory
}

proptest! {
    /// Gaining then spending the same goods restores the inventory.
    #[test]
    fn gain_then_spend_is_identity(first in goods(), second in goods()) {
        let mut inventory = holding(&first);
        inventory.gain(&second).unwrap();
        inventory.spend(&second).unwrap();
        prop_assert_eq!(inventory, holding(&first));
    }

    /// Spending more than is held fails and leaves the inventory alone.
    #[test]
    fn overspend_is_rejected(held in goods(), extra in 1u32..10, pick in 0..KINDS.len()) {
        let kind = KINDS[pick];
        let mut inventory = holding(&held);
        let before = inventory.clone();
        let have = held.count(kind);
        let want = Goods::from(Good::new(kind, have + Decimal::from(extra)));

        let err = inventory.spend(&want).unwrap_err();
        let is_insufficient = matches!(err, EngineError::InsufficientGoods { good, .. } if good == kind);
        prop_assert!(is_insufficient);
        prop_assert_eq!(inventory, before);
    }

    /// Multiset subtraction undoes multiset union.
    #[test]
    fn union_then_difference(first in goods(), second in goods()) {
        let union: Goods = first.iter().chain(second.iter()).copied().collect();
        prop_assert!(union.covers(&second));
        prop_assert_eq!(union.checked_sub(&second).unwrap(), first);
    }

    /// Same-kind goods add and subtract like numbers.
    #[test]
    fn good_arithmetic(a in 0u32..100, b in 0u32..100, pick in 0..KINDS.len()) {
        let kind = KINDS[pick];
        let sum = Good::units(kind, a).checked_add(&Good::units(kind, b)).unwrap();
        prop_assert_eq!(sum, Good::units(kind, a + b));
        prop_assert_eq!(sum.checked_sub(&Good::units(kind, b)).unwrap(), Good::units(kind, a));
    }
}

/// Goods of different kinds never combine.
#[test]
fn test_mixed_kinds_do_not_add() {
    let wood = Good::units(GoodKind::Wood, 1);
    let clay = Good::units(GoodKind::Clay, 1);
    assert!(wood.checked_add(&clay).is_err());
    assert!(wood.checked_sub(&clay).is_err());
}
