//! Command interpreter: the line grammar, per-command rules and the replay
//! loop that rebuilds a game from its command log.
//!
//! ## Key Types
//!
//! - `Command`: one parsed line with its phase and executor rules
//! - `Pending`: a work contract waiting on another seat
//!
//! Applying lines is done through [`Game::apply`](crate::rules::Game::apply),
//! [`Game::sync`](crate::rules::Game::sync) and
//! [`Game::submit`](crate::rules::Game::submit).

mod command;
pub mod grammar;
mod interpreter;
mod pending;

pub use command::{Command, ExecutorRule, SetupStep};
pub use pending::Pending;
