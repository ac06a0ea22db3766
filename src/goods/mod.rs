//! Resource algebra.
//!
//! ## Goods and virtual goods
//!
//! A [`Good`] is a typed quantity (`3 wood`). Every kind declares coefficients
//! into four virtual currencies (energy, food, money, points); requirements may
//! name a virtual good (`2 food`) to accept any combination of concrete goods
//! worth that much.
//!
//! ## Multisets
//!
//! [`Goods`] is an unordered multiset with one entry per kind. [`Inventory`]
//! holds a seat's concrete goods and applies spends atomically.

mod good;
mod inventory;
mod kind;
mod multiset;

pub use good::Good;
pub use inventory::Inventory;
pub use kind::{GoodKind, VirtualGood};
pub use multiset::Goods;

/// Per-currency running totals, indexed by [`VirtualGood::index`].
pub type VirtualTotals = [rust_decimal::Decimal; 4];
