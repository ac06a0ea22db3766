//! Good kinds and their virtual-currency coefficients.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// The four virtual currencies goods convert into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VirtualGood {
    Energy,
    Food,
    Money,
    Points,
}

impl VirtualGood {
    pub const ALL: [VirtualGood; 4] = [
        VirtualGood::Energy,
        VirtualGood::Food,
        VirtualGood::Money,
        VirtualGood::Points,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The good kind standing for this currency inside a requirement.
    #[must_use]
    pub const fn kind(self) -> GoodKind {
        match self {
            VirtualGood::Energy => GoodKind::Energy,
            VirtualGood::Food => GoodKind::Food,
            VirtualGood::Money => GoodKind::Money,
            VirtualGood::Points => GoodKind::Points,
        }
    }
}

/// Every kind of good, concrete or virtual.
///
/// Concrete goods are held in a seat's inventory. The four virtual kinds
/// (`Energy`, `Food`, `Money`, `Points`) only ever appear inside requirements
/// and are computed from concrete goods via [`GoodKind::coefficient`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GoodKind {
    Wood,
    Peat,
    Grain,
    Livestock,
    Clay,
    Coin,
    Stone,
    Grapes,
    Malt,
    Flour,
    Whiskey,
    PeatCoal,
    Straw,
    Meat,
    Ceramic,
    Book,
    Reliquary,
    Ornament,
    Wine,
    Beer,
    Bread,
    Wonder,
    Energy,
    Food,
    Money,
    Points,
}

impl GoodKind {
    /// All concrete kinds, in display order.
    pub const CONCRETE: [GoodKind; 22] = [
        GoodKind::Wood,
        GoodKind::Peat,
        GoodKind::Grain,
        GoodKind::Livestock,
        GoodKind::Clay,
        GoodKind::Coin,
        GoodKind::Stone,
        GoodKind::Grapes,
        GoodKind::Malt,
        GoodKind::Flour,
        GoodKind::Whiskey,
        GoodKind::PeatCoal,
        GoodKind::Straw,
        GoodKind::Meat,
        GoodKind::Ceramic,
        GoodKind::Book,
        GoodKind::Reliquary,
        GoodKind::Ornament,
        GoodKind::Wine,
        GoodKind::Beer,
        GoodKind::Bread,
        GoodKind::Wonder,
    ];

    /// Lower-case name used in command text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            GoodKind::Wood => "wood",
            GoodKind::Peat => "peat",
            GoodKind::Grain => "grain",
            GoodKind::Livestock => "livestock",
            GoodKind::Clay => "clay",
            GoodKind::Coin => "coin",
            GoodKind::Stone => "stone",
            GoodKind::Grapes => "grapes",
            GoodKind::Malt => "malt",
            GoodKind::Flour => "flour",
            GoodKind::Whiskey => "whiskey",
            GoodKind::PeatCoal => "peat-coal",
            GoodKind::Straw => "straw",
            GoodKind::Meat => "meat",
            GoodKind::Ceramic => "ceramic",
            GoodKind::Book => "book",
            GoodKind::Reliquary => "reliquary",
            GoodKind::Ornament => "ornament",
            GoodKind::Wine => "wine",
            GoodKind::Beer => "beer",
            GoodKind::Bread => "bread",
            GoodKind::Wonder => "wonder",
            GoodKind::Energy => "energy",
            GoodKind::Food => "food",
            GoodKind::Money => "money",
            GoodKind::Points => "points",
        }
    }

    /// The virtual currency this kind stands for, if it is virtual.
    #[must_use]
    pub const fn as_virtual(self) -> Option<VirtualGood> {
        match self {
            GoodKind::Energy => Some(VirtualGood::Energy),
            GoodKind::Food => Some(VirtualGood::Food),
            GoodKind::Money => Some(VirtualGood::Money),
            GoodKind::Points => Some(VirtualGood::Points),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_virtual(self) -> bool {
        self.as_virtual().is_some()
    }

    /// Value of one unit of this kind in the given virtual currency.
    ///
    /// Coin points are not linear (every 5 coins are worth 2 points) and are
    /// handled by [`Good::virtual_total`](super::Good::virtual_total); the
    /// per-unit coefficient reported here is zero.
    #[must_use]
    pub fn coefficient(self, currency: VirtualGood) -> Decimal {
        use GoodKind::*;
        use VirtualGood as V;

        if let Some(own) = self.as_virtual() {
            return if own == currency { Decimal::ONE } else { Decimal::ZERO };
        }

        let units: i64 = match (self, currency) {
            (Wood, V::Energy) => 1,
            (Peat, V::Energy) => 2,
            (PeatCoal, V::Energy) => 3,
            (Straw, V::Energy) => return Decimal::new(5, 1),
            (Grain | Grapes | Malt | Flour | Coin | Wine, V::Food) => 1,
            (Livestock | Whiskey, V::Food) => 2,
            (Bread, V::Food) => 3,
            (Meat | Beer, V::Food) => 5,
            (Coin | Wine, V::Money) => 1,
            (Whiskey, V::Money) => 2,
            (Whiskey | Wine, V::Points) => 1,
            (Book, V::Points) => 2,
            (Ceramic, V::Points) => 3,
            (Ornament, V::Points) => 4,
            (Reliquary, V::Points) => 8,
            (Wonder, V::Points) => 30,
            _ => 0,
        };
        Decimal::from(units)
    }
}

impl fmt::Display for GoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GoodKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoodKind::CONCRETE
            .into_iter()
            .chain(VirtualGood::ALL.into_iter().map(VirtualGood::kind))
            .find(|kind| kind.name() == s)
            .ok_or_else(|| EngineError::UnknownGood(s.to_string()))
    }
}
