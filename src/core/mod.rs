//! Core types: seats, phases, configuration and deterministic RNG.

pub mod config;
pub mod phase;
pub mod rng;
pub mod seat;

pub use config::{GameConfig, GameOption, PlayerCountKey, ReplayPolicy, Variant};
pub use phase::{Age, Phase};
pub use rng::GameRng;
pub use seat::{Color, SeatId};
