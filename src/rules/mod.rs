//! Game rules: seats, the production wheel, phases and scoring.
//!
//! ## Key Types
//!
//! - `Game`: complete state plus the phase/turn state machine
//! - `Seat`: one player's inventory, board, clergy and settlements
//! - `Gameboard`: the production wheel and its resource tokens
//! - `LogStore` / `MemoryLog`: the persisted command log games replay from
//! - `GameResult`: final standings

pub mod game;
pub mod gameboard;
pub mod ledger;
pub mod result;
pub mod seat;

pub use game::{Game, GameSummary, SeatSummary};
pub use gameboard::{Caught, Gameboard, ResourceToken};
pub use ledger::{LedgerEntry, LogRecord, LogStore, MemoryLog};
pub use result::GameResult;
pub use seat::{Score, Seat};
