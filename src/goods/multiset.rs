//! Unordered goods multisets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::good::Good;
use super::kind::{GoodKind, VirtualGood};
use crate::error::Result;

/// A multiset of goods with at most one entry per kind.
///
/// Inserting a kind that is already present adds to the existing entry.
/// Equality ignores insertion order.
///
/// ```
/// use oel_engine::goods::{Goods, GoodKind};
///
/// let a = Goods::from([(GoodKind::Wood, 1), (GoodKind::Clay, 2), (GoodKind::Wood, 1)]);
/// let b = Goods::from([(GoodKind::Clay, 2), (GoodKind::Wood, 2)]);
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 2);
/// ```
#[derive(Clone, Debug, Default, Eq, Serialize, Deserialize)]
pub struct Goods {
    entries: SmallVec<[Good; 4]>,
}

impl Goods {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a good, combining with an existing entry of the same kind.
    pub fn insert(&mut self, good: Good) {
        match self.entries.iter_mut().find(|g| g.kind == good.kind) {
            Some(existing) => existing.count += good.count,
            None => self.entries.push(good),
        }
    }

    /// Builder form of [`Goods::insert`].
    #[must_use]
    pub fn with(mut self, good: Good) -> Self {
        self.insert(good);
        self
    }

    #[must_use]
    pub fn get(&self, kind: GoodKind) -> Option<&Good> {
        self.entries.iter().find(|g| g.kind == kind)
    }

    /// Count of `kind`, zero when absent.
    #[must_use]
    pub fn count(&self, kind: GoodKind) -> Decimal {
        self.get(kind).map_or(Decimal::ZERO, |g| g.count)
    }

    #[must_use]
    pub fn contains(&self, kind: GoodKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn remove(&mut self, kind: GoodKind) -> Option<Good> {
        let position = self.entries.iter().position(|g| g.kind == kind)?;
        Some(self.entries.remove(position))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Good> {
        self.entries.iter()
    }

    /// Entries whose kind is concrete.
    pub fn concrete(&self) -> impl Iterator<Item = &Good> {
        self.entries.iter().filter(|g| !g.kind.is_virtual())
    }

    /// Entries whose kind is virtual, paired with their currency.
    pub fn virtuals(&self) -> impl Iterator<Item = (VirtualGood, &Good)> {
        self.entries
            .iter()
            .filter_map(|g| g.kind.as_virtual().map(|v| (v, g)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Multiply every entry by `factor`.
    #[must_use]
    pub fn scale(&self, factor: Decimal) -> Goods {
        self.entries.iter().map(|g| g.scale(factor)).collect()
    }

    /// Total worth of the whole multiset in a virtual currency.
    #[must_use]
    pub fn virtual_total(&self, currency: VirtualGood) -> Decimal {
        self.entries.iter().map(|g| g.virtual_total(currency)).sum()
    }

    /// Remove `other` from this multiset, all or nothing.
    pub fn checked_sub(&self, other: &Goods) -> Result<Goods> {
        let mut result = self.clone();
        for good in other.iter() {
            let current = result.get(good.kind).copied().unwrap_or(Good::new(good.kind, Decimal::ZERO));
            let remaining = current.checked_sub(good)?;
            result.remove(good.kind);
            if !remaining.count.is_zero() {
                result.insert(remaining);
            }
        }
        Ok(result)
    }

    /// Whether every entry of `other` is covered by this multiset.
    #[must_use]
    pub fn covers(&self, other: &Goods) -> bool {
        other.iter().all(|g| self.count(g.kind) >= g.count)
    }
}

impl PartialEq for Goods {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.entries.iter().all(|g| other.get(g.kind) == Some(g))
    }
}

impl FromIterator<Good> for Goods {
    fn from_iter<I: IntoIterator<Item = Good>>(iter: I) -> Self {
        let mut goods = Goods::new();
        for good in iter {
            goods.insert(good);
        }
        goods
    }
}

impl From<Good> for Goods {
    fn from(good: Good) -> Self {
        Goods::new().with(good)
    }
}

impl<const N: usize> From<[(GoodKind, u32); N]> for Goods {
    fn from(pairs: [(GoodKind, u32); N]) -> Self {
        pairs.into_iter().map(|(kind, n)| Good::units(kind, n)).collect()
    }
}

impl fmt::Display for Goods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, good) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{good}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_equality_ignores_order() {
        let a = Goods::from([(GoodKind::Book, 1), (GoodKind::Meat, 2)]);
        let b = Goods::from([(GoodKind::Meat, 2), (GoodKind::Book, 1)]);
        assert_eq!(a, b);
        assert_ne!(a, Goods::from([(GoodKind::Meat, 2)]));
    }

    #[test]
    fn test_checked_sub_is_all_or_nothing() {
        let have = Goods::from([(GoodKind::Wood, 2), (GoodKind::Clay, 1)]);
        let want = Goods::from([(GoodKind::Wood, 1), (GoodKind::Clay, 2)]);
        assert!(matches!(
            have.checked_sub(&want),
            Err(EngineError::InsufficientGoods { good: GoodKind::Clay, .. })
        ));
        let left = have.checked_sub(&Goods::from([(GoodKind::Wood, 2)])).unwrap();
        assert_eq!(left, Goods::from([(GoodKind::Clay, 1)]));
    }

    #[test]
    fn test_virtual_total() {
        let spent = Goods::from([(GoodKind::Peat, 2), (GoodKind::Straw, 1), (GoodKind::Grain, 3)]);
        assert_eq!(spent.virtual_total(VirtualGood::Energy), Decimal::new(45, 1));
        assert_eq!(spent.virtual_total(VirtualGood::Food), Decimal::from(3));
    }

    #[test]
    fn test_display() {
        let goods = Goods::from([(GoodKind::Wood, 2), (GoodKind::Clay, 1)]);
        assert_eq!(goods.to_string(), "2 wood 1 clay");
    }
}
