//! Game configuration.
//!
//! A game is configured by a player count, a rule [`Variant`], a set of
//! [`GameOption`]s and an RNG seed. [`GameConfig::setup_lines`] turns the
//! configuration into the opening ledger lines (`setup variant france`,
//! `option short-game`, ...), so that configuration is itself replayed from
//! the ledger like every other command.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, Result};

/// Rule variant. Decides which buildings and goods are in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    France,
    Ireland,
}

impl Variant {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Variant::France => "france",
            Variant::Ireland => "ireland",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "france" => Ok(Variant::France),
            "ireland" => Ok(Variant::Ireland),
            _ => Err(EngineError::arguments(s)),
        }
    }
}

/// Optional rules chosen during setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOption {
    OnePlayer,
    ShortGame,
    LongGame,
    RemoveCQuarry,
    LoamyLandscape,
    RandomizeSeats,
}

impl GameOption {
    pub const ALL: [GameOption; 6] = [
        GameOption::OnePlayer,
        GameOption::ShortGame,
        GameOption::LongGame,
        GameOption::RemoveCQuarry,
        GameOption::LoamyLandscape,
        GameOption::RandomizeSeats,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            GameOption::OnePlayer => "one-player",
            GameOption::ShortGame => "short-game",
            GameOption::LongGame => "long-game",
            GameOption::RemoveCQuarry => "remove-c-quarry",
            GameOption::LoamyLandscape => "loamy-landscape",
            GameOption::RandomizeSeats => "randomize-seats",
        }
    }

    /// Whether the option may be chosen for this player count, variant and
    /// the options already chosen.
    #[must_use]
    pub fn is_available(self, players: usize, variant: Option<Variant>, chosen: &[GameOption]) -> bool {
        match self {
            GameOption::OnePlayer => players == 1,
            GameOption::ShortGame => matches!(players, 3 | 4),
            GameOption::LongGame => players == 2,
            GameOption::RemoveCQuarry => players == 4 || chosen.contains(&GameOption::ShortGame),
            GameOption::LoamyLandscape => variant == Some(Variant::France),
            GameOption::RandomizeSeats => matches!(players, 2..=4),
        }
    }
}

impl fmt::Display for GameOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameOption {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        GameOption::ALL
            .into_iter()
            .find(|o| o.name() == s)
            .ok_or_else(|| EngineError::arguments(s))
    }
}

/// Player-count key used by the catalogue's availability predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerCountKey {
    One,
    Two,
    TwoLong,
    Three,
    ThreeShort,
    Four,
    FourShort,
}

impl PlayerCountKey {
    pub const ALL: &'static [PlayerCountKey] = &[
        PlayerCountKey::One,
        PlayerCountKey::Two,
        PlayerCountKey::TwoLong,
        PlayerCountKey::Three,
        PlayerCountKey::ThreeShort,
        PlayerCountKey::Four,
        PlayerCountKey::FourShort,
    ];

    /// Buildings only used with three or more players (plus solo and the long
    /// two-player game).
    pub const THREE_PLUS: &'static [PlayerCountKey] = &[
        PlayerCountKey::One,
        PlayerCountKey::TwoLong,
        PlayerCountKey::Three,
        PlayerCountKey::Four,
        PlayerCountKey::FourShort,
    ];

    /// Buildings only used in the full four-player game (plus solo and the
    /// long two-player game).
    pub const FOUR: &'static [PlayerCountKey] = &[
        PlayerCountKey::One,
        PlayerCountKey::TwoLong,
        PlayerCountKey::Four,
    ];

    #[must_use]
    pub fn for_game(players: usize, short: bool, long: bool) -> PlayerCountKey {
        match (players, short, long) {
            (1, _, _) => PlayerCountKey::One,
            (2, _, true) => PlayerCountKey::TwoLong,
            (2, _, false) => PlayerCountKey::Two,
            (3, true, _) => PlayerCountKey::ThreeShort,
            (3, false, _) => PlayerCountKey::Three,
            (_, true, _) => PlayerCountKey::FourShort,
            _ => PlayerCountKey::Four,
        }
    }
}

/// What replay does when a persisted record is rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayPolicy {
    /// Stop at the rejected record. The watermark stays on the last good
    /// record and every later sync fails on the same record.
    #[default]
    Halt,
    /// Record the rejection, move the watermark past it and continue.
    SkipRejected,
}

/// Complete configuration for a new game.
///
/// ```
/// use oel_engine::core::{GameConfig, GameOption, Variant};
///
/// let config = GameConfig::new(4)
///     .with_variant(Variant::Ireland)
///     .with_option(GameOption::ShortGame)
///     .with_seed(9);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.setup_lines()[1], "setup variant ireland");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub players: usize,
    pub variant: Variant,
    pub options: Vec<GameOption>,
    pub seed: u64,
    pub replay_policy: ReplayPolicy,
}

impl GameConfig {
    /// A France game for `players` seats, with `one-player` added for solo.
    #[must_use]
    pub fn new(players: usize) -> Self {
        let options = if players == 1 { vec![GameOption::OnePlayer] } else { Vec::new() };
        Self {
            players,
            variant: Variant::France,
            options,
            seed: 0,
            replay_policy: ReplayPolicy::Halt,
        }
    }

    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn with_option(mut self, option: GameOption) -> Self {
        if !self.options.contains(&option) {
            self.options.push(option);
        }
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_replay_policy(mut self, policy: ReplayPolicy) -> Self {
        self.replay_policy = policy;
        self
    }

    /// Check the player count and every option against it.
    pub fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.players) {
            return Err(EngineError::OptionUnavailable(format!("{} players", self.players)));
        }
        for (i, option) in self.options.iter().enumerate() {
            if !option.is_available(self.players, Some(self.variant), &self.options[..i]) {
                return Err(EngineError::OptionUnavailable(option.name().to_string()));
            }
        }
        Ok(())
    }

    /// Opening ledger lines for this configuration.
    #[must_use]
    pub fn setup_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "# game initialization".to_string(),
            format!("setup variant {}", self.variant),
        ];
        lines.extend(self.options.iter().map(|o| format!("option {o}")));
        lines
    }
}
