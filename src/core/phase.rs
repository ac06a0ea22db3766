//! Phases and ages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Game phase.
///
/// `RoundStart`, `ReturnClergy`, `RotateProductionWheel` and
/// `PassStartPlayer` are transient: entering them performs their side effects
/// and immediately moves on. The others wait for commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    Setup,
    RoundStart,
    ReturnClergy,
    RotateProductionWheel,
    Settlement,
    Action,
    PassStartPlayer,
    BonusRound,
    FinalAction,
    Endgame,
    Broken,
}

impl Phase {
    /// Phases in which seats take turns.
    #[must_use]
    pub const fn has_turns(self) -> bool {
        matches!(
            self,
            Phase::Settlement | Phase::Action | Phase::BonusRound | Phase::FinalAction
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Endgame | Phase::Broken)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Age of the game. Buildings and settlements are released per age.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Age {
    /// Heartland cards and terrain, never released from the catalogue.
    Basic,
    Start,
    A,
    B,
    C,
    D,
    E,
}

impl Age {
    #[must_use]
    pub const fn next(self) -> Option<Age> {
        match self {
            Age::Basic => Some(Age::Start),
            Age::Start => Some(Age::A),
            Age::A => Some(Age::B),
            Age::B => Some(Age::C),
            Age::C => Some(Age::D),
            Age::D => Some(Age::E),
            Age::E => None,
        }
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_sequence() {
        assert_eq!(Age::Start.next(), Some(Age::A));
        assert_eq!(Age::D.next(), Some(Age::E));
        assert_eq!(Age::E.next(), None);
        assert!(Age::A < Age::D);
    }

    #[test]
    fn test_turn_phases() {
        assert!(Phase::Action.has_turns());
        assert!(!Phase::RoundStart.has_turns());
        assert!(Phase::Broken.is_terminal());
    }
}
