//! # oel-engine
//!
//! Rules engine for Ora et Labora, driven entirely by a text command log.
//!
//! ## Design Principles
//!
//! 1. **The log is the truth**: a game is rebuilt by replaying its ordered
//!    command lines. Replays are deterministic and idempotent past a
//!    watermark.
//!
//! 2. **Atomic commands**: a line either applies completely or leaves the
//!    game exactly as it was. Snapshots are cheap clones.
//!
//! 3. **Cards are data**: every building carries a pre-built effect tree;
//!    card behaviour lives in `Step`s and `Joiner`s, not in per-card code.
//!
//! ## Modules
//!
//! - `core`: seats, phases, ages, configuration, RNG
//! - `goods`: the goods algebra (concrete and virtual goods, inventories)
//! - `board`: seat boards, landscapes, spaces, clergy
//! - `cards`: building and settlement catalogue
//! - `effects`: steps, functions and their execution
//! - `rules`: game state, production wheel, phase machine, scoring, log
//! - `commands`: command grammar, interpreter and replay
//! - `error`: the engine error taxonomy
//!
//! ## Example
//!
//! ```
//! use oel_engine::{Game, GameConfig, LogStore, MemoryLog, Phase, SeatId};
//!
//! let config = GameConfig::new(3);
//! let mut log = MemoryLog::with_setup(&config);
//! log.append(None, "setup finalize");
//! log.append(None, "setup start");
//!
//! let mut game = Game::new(config);
//! game.sync(&log).unwrap();
//! assert_eq!(game.phase, Phase::Action);
//!
//! game.submit(&mut log, Some(SeatId(0)), "place prior to use h01 to choose clay").unwrap();
//! game.submit(&mut log, Some(SeatId(0)), "pass").unwrap();
//! assert_eq!(game.action_seat(), Some(SeatId(1)));
//! ```

pub mod board;
pub mod cards;
pub mod commands;
pub mod core;
pub mod effects;
pub mod error;
pub mod goods;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{Age, Color, GameConfig, GameOption, Phase, ReplayPolicy, SeatId, Variant};

pub use crate::goods::{Good, GoodKind, Goods, Inventory, VirtualGood};

pub use crate::board::{Board, Card, Clergy, ClergyKind, Coordinate, Landscape, LandscapeKind, Terrain};

pub use crate::cards::{BuildingDef, CardId, Catalogue, SettlementDef};

pub use crate::effects::{Function, Joiner, Step, StepContext, Validation};

pub use crate::rules::{
    Game, GameResult, GameSummary, Gameboard, LedgerEntry, LogRecord, LogStore, MemoryLog, ResourceToken, Score,
    Seat,
};

pub use crate::commands::{Command, Pending};

pub use crate::error::{EngineError, ErrorClass, Result};
