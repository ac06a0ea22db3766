//! A typed, non-negative quantity of one kind of good.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::kind::{GoodKind, VirtualGood};
use crate::error::{EngineError, Result};

/// A quantity of a single good kind.
///
/// Arithmetic is only defined between goods of the same kind, or between a
/// good and a scalar. Subtraction never clamps: going below zero is an
/// [`EngineError::InsufficientGoods`].
///
/// ```
/// use oel_engine::goods::{Good, GoodKind};
///
/// let wood = Good::units(GoodKind::Wood, 3);
/// let more = wood.checked_add(&Good::units(GoodKind::Wood, 2)).unwrap();
/// assert_eq!(more, Good::units(GoodKind::Wood, 5));
/// assert!(wood.checked_sub(&more).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Good {
    pub kind: GoodKind,
    pub count: Decimal,
}

impl Good {
    /// Create a good with an exact (possibly fractional) count.
    #[must_use]
    pub fn new(kind: GoodKind, count: Decimal) -> Self {
        debug_assert!(!count.is_sign_negative(), "goods are never negative");
        Self { kind, count }
    }

    /// Create a good with a whole number of units.
    #[must_use]
    pub fn units(kind: GoodKind, count: u32) -> Self {
        Self::new(kind, Decimal::from(count))
    }

    fn same_kind(&self, other: &Good) -> Result<()> {
        if self.kind == other.kind {
            Ok(())
        } else {
            Err(EngineError::GoodsMismatch {
                left: self.kind,
                right: other.kind,
            })
        }
    }

    pub fn checked_add(&self, other: &Good) -> Result<Good> {
        self.same_kind(other)?;
        Ok(Good::new(self.kind, self.count + other.count))
    }

    pub fn checked_sub(&self, other: &Good) -> Result<Good> {
        self.same_kind(other)?;
        self.sub_scalar(other.count)
    }

    #[must_use]
    pub fn add_scalar(&self, amount: Decimal) -> Good {
        Good::new(self.kind, self.count + amount)
    }

    pub fn sub_scalar(&self, amount: Decimal) -> Result<Good> {
        if amount > self.count {
            return Err(EngineError::InsufficientGoods {
                good: self.kind,
                needed: amount,
                available: self.count,
            });
        }
        Ok(Good::new(self.kind, self.count - amount))
    }

    #[must_use]
    pub fn scale(&self, factor: Decimal) -> Good {
        Good::new(self.kind, self.count * factor)
    }

    /// Order two goods of the same kind by count.
    pub fn compare(&self, other: &Good) -> Result<Ordering> {
        self.same_kind(other)?;
        Ok(self.count.cmp(&other.count))
    }

    /// Total worth of this quantity in a virtual currency.
    ///
    /// ```
    /// use oel_engine::goods::{Good, GoodKind, VirtualGood};
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Good::units(GoodKind::Peat, 3).virtual_total(VirtualGood::Energy), Decimal::from(6));
    /// // every five coins are worth two points
    /// assert_eq!(Good::units(GoodKind::Coin, 12).virtual_total(VirtualGood::Points), Decimal::from(4));
    /// ```
    #[must_use]
    pub fn virtual_total(&self, currency: VirtualGood) -> Decimal {
        if self.kind == GoodKind::Coin && currency == VirtualGood::Points {
            return (self.count / Decimal::from(5)).floor() * Decimal::from(2);
        }
        self.count * self.kind.coefficient(currency)
    }

    /// Whether the count is a whole number.
    #[must_use]
    pub fn is_whole(&self) -> bool {
        self.count.fract().is_zero()
    }

    /// Fail if a concrete good holds a fractional amount.
    pub fn ensure_whole(&self) -> Result<()> {
        if self.kind.is_virtual() || self.is_whole() {
            Ok(())
        } else {
            Err(EngineError::FractionalGoods {
                good: self.kind,
                count: self.count,
            })
        }
    }
}

impl fmt::Display for Good {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count.normalize(), self.kind)
    }
}
