//! Final standings.

use serde::{Deserialize, Serialize};

use super::seat::Score;
use crate::core::SeatId;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(SeatId),
    /// Every seat finished level.
    Draw,
    /// Several seats share the best total.
    Winners(Vec<SeatId>),
}

impl GameResult {
    /// Rank seats by [`Score::total`].
    #[must_use]
    pub fn from_scores(scores: &[(SeatId, Score)]) -> Self {
        let Some(best) = scores.iter().map(|(_, s)| s.total()).max() else {
            return GameResult::Draw;
        };
        let leaders: Vec<SeatId> = scores
            .iter()
            .filter(|(_, s)| s.total() == best)
            .map(|&(id, _)| id)
            .collect();
        match leaders.as_slice() {
            [only] => GameResult::Winner(*only),
            _ if leaders.len() == scores.len() => GameResult::Draw,
            _ => GameResult::Winners(leaders),
        }
    }

    /// Check if a seat won.
    #[must_use]
    pub fn is_winner(&self, seat: SeatId) -> bool {
        match self {
            GameResult::Winner(s) => *s == seat,
            GameResult::Winners(ss) => ss.contains(&seat),
            GameResult::Draw => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn score(economic: i32) -> Score {
        Score { economic, settlements: 0, goods: Decimal::ZERO }
    }

    #[test]
    fn test_single_winner() {
        let result = GameResult::from_scores(&[(SeatId(0), score(3)), (SeatId(1), score(5))]);
        assert_eq!(result, GameResult::Winner(SeatId(1)));
        assert!(result.is_winner(SeatId(1)));
        assert!(!result.is_winner(SeatId(0)));
    }

    #[test]
    fn test_shared_and_drawn() {
        let shared = GameResult::from_scores(&[(SeatId(0), score(5)), (SeatId(1), score(5)), (SeatId(2), score(1))]);
        assert_eq!(shared, GameResult::Winners(vec![SeatId(0), SeatId(1)]));
        let draw = GameResult::from_scores(&[(SeatId(0), score(2)), (SeatId(1), score(2))]);
        assert_eq!(draw, GameResult::Draw);
        assert!(!draw.is_winner(SeatId(0)));
    }

    #[test]
    fn test_solo_always_wins() {
        assert_eq!(GameResult::from_scores(&[(SeatId(0), score(0))]), GameResult::Winner(SeatId(0)));
    }
}
