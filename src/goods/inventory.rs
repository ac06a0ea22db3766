//! A seat's holdings of concrete goods.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::good::Good;
use super::kind::{GoodKind, VirtualGood};
use super::multiset::Goods;
use crate::error::{EngineError, Result};

/// Concrete goods held by one seat.
///
/// [`Inventory::spend`] and [`Inventory::gain`] are atomic over the whole
/// multiset: either every entry applies or none does.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    held: FxHashMap<GoodKind, Decimal>,
}

impl Inventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self, kind: GoodKind) -> Decimal {
        self.held.get(&kind).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn good(&self, kind: GoodKind) -> Good {
        Good::new(kind, self.count(kind))
    }

    /// Whether every entry of `goods` is held in at least that amount.
    #[must_use]
    pub fn has(&self, goods: &Goods) -> bool {
        goods.iter().all(|g| self.count(g.kind) >= g.count)
    }

    fn check(goods: &Goods) -> Result<()> {
        for good in goods.iter() {
            if good.kind.is_virtual() {
                return Err(EngineError::VirtualGoods(good.kind));
            }
            good.ensure_whole()?;
        }
        Ok(())
    }

    pub fn spend(&mut self, goods: &Goods) -> Result<()> {
        Self::check(goods)?;
        for good in goods.iter() {
            let available = self.count(good.kind);
            if good.count > available {
                return Err(EngineError::InsufficientGoods {
                    good: good.kind,
                    needed: good.count,
                    available,
                });
            }
        }
        for good in goods.iter() {
            if let Some(held) = self.held.get_mut(&good.kind) {
                *held -= good.count;
            }
        }
        self.held.retain(|_, count| !count.is_zero());
        Ok(())
    }

    pub fn gain(&mut self, goods: &Goods) -> Result<()> {
        Self::check(goods)?;
        for good in goods.iter().filter(|g| !g.count.is_zero()) {
            *self.held.entry(good.kind).or_insert(Decimal::ZERO) += good.count;
        }
        Ok(())
    }

    /// Non-zero holdings in display order.
    pub fn iter(&self) -> impl Iterator<Item = Good> + '_ {
        GoodKind::CONCRETE
            .into_iter()
            .map(|kind| self.good(kind))
            .filter(|g| !g.count.is_zero())
    }

    /// Holdings as a multiset.
    #[must_use]
    pub fn to_goods(&self) -> Goods {
        self.iter().collect()
    }

    /// Total points value of the holdings.
    #[must_use]
    pub fn points(&self) -> Decimal {
        self.iter().map(|g| g.virtual_total(VirtualGood::Points)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_then_spend() {
        let mut inv = Inventory::new();
        inv.gain(&Goods::from([(GoodKind::Coin, 3), (GoodKind::Wood, 1)])).unwrap();
        inv.spend(&Goods::from([(GoodKind::Coin, 2)])).unwrap();
        assert_eq!(inv.count(GoodKind::Coin), Decimal::ONE);
        assert_eq!(inv.count(GoodKind::Wood), Decimal::ONE);
    }

    #[test]
    fn test_spend_is_atomic() {
        let mut inv = Inventory::new();
        inv.gain(&Goods::from([(GoodKind::Coin, 3)])).unwrap();
        let err = inv
            .spend(&Goods::from([(GoodKind::Coin, 1), (GoodKind::Book, 1)]))
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientGoods { good: GoodKind::Book, .. }));
        assert_eq!(inv.count(GoodKind::Coin), Decimal::from(3));
    }

    #[test]
    fn test_virtual_goods_cannot_be_held() {
        let mut inv = Inventory::new();
        assert!(matches!(
            inv.gain(&Goods::from([(GoodKind::Energy, 1)])),
            Err(EngineError::VirtualGoods(GoodKind::Energy))
        ));
    }

    #[test]
    fn test_points() {
        let mut inv = Inventory::new();
        inv.gain(&Goods::from([(GoodKind::Coin, 11), (GoodKind::Book, 1), (GoodKind::Wine, 1)]))
            .unwrap();
        // 11 coin -> 4, book -> 2, wine -> 1
        assert_eq!(inv.points(), Decimal::from(7));
    }
}
