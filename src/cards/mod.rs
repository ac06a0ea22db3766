//! Card catalogue: building and settlement definitions.
//!
//! ## Key Types
//!
//! - `CardId`: three-character identifier (`g01`, `s03`)
//! - `BuildingDef`: static building data plus its pre-built function
//! - `SettlementDef`: static settlement data
//! - `Catalogue`: definition lookup and age releases
//!
//! The standard catalogue (`Catalogue::standard()`) holds every card of
//! both variants; a game shares one catalogue behind an `Arc`.

pub mod definition;
pub mod id;
pub mod registry;
mod standard;

pub use definition::{BuildingDef, SettlementDef};
pub use id::CardId;
pub use registry::Catalogue;
