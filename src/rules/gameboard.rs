//! The production wheel.
//!
//! Every resource token sits at a position on a 13-segment track. The wheel
//! pointer advances once per round; a token's production value is read from
//! the table by how far the wheel has moved past it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, Result};
use crate::goods::GoodKind;

/// Production values for two-player standard games.
pub const SHORT_TABLE: [u32; 13] = [0, 1, 2, 2, 3, 4, 4, 5, 6, 6, 7, 8, 10];

/// Production values for every other game.
pub const STANDARD_TABLE: [u32; 13] = [0, 2, 3, 4, 5, 6, 6, 7, 7, 8, 8, 9, 10];

const SEGMENTS: i64 = 13;

/// A token on the production wheel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceToken {
    Wood,
    Peat,
    Grain,
    Livestock,
    Clay,
    Coin,
    Grapes,
    Stone,
    Joker,
}

impl ResourceToken {
    pub const ALL: [ResourceToken; 9] = [
        ResourceToken::Wood,
        ResourceToken::Peat,
        ResourceToken::Grain,
        ResourceToken::Livestock,
        ResourceToken::Clay,
        ResourceToken::Coin,
        ResourceToken::Grapes,
        ResourceToken::Stone,
        ResourceToken::Joker,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ResourceToken::Wood => "wood",
            ResourceToken::Peat => "peat",
            ResourceToken::Grain => "grain",
            ResourceToken::Livestock => "livestock",
            ResourceToken::Clay => "clay",
            ResourceToken::Coin => "coin",
            ResourceToken::Grapes => "grapes",
            ResourceToken::Stone => "stone",
            ResourceToken::Joker => "joker",
        }
    }

    /// The good this token produces; the joker produces whatever is asked.
    #[must_use]
    pub const fn good(self) -> Option<GoodKind> {
        match self {
            ResourceToken::Wood => Some(GoodKind::Wood),
            ResourceToken::Peat => Some(GoodKind::Peat),
            ResourceToken::Grain => Some(GoodKind::Grain),
            ResourceToken::Livestock => Some(GoodKind::Livestock),
            ResourceToken::Clay => Some(GoodKind::Clay),
            ResourceToken::Coin => Some(GoodKind::Coin),
            ResourceToken::Grapes => Some(GoodKind::Grapes),
            ResourceToken::Stone => Some(GoodKind::Stone),
            ResourceToken::Joker => None,
        }
    }
}

impl fmt::Display for ResourceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceToken {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        ResourceToken::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| EngineError::UnknownToken(s.to_string()))
    }
}

/// What happened to a token the wheel caught up with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Caught {
    Shifted(ResourceToken),
    Removed(ResourceToken),
}

/// Wheel pointer, token positions and the age marker ("house").
///
/// Positions are absolute round counts; only their difference modulo 13
/// matters for production.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gameboard {
    table: [u32; 13],
    pub wheel: i64,
    pub house: i64,
    tokens: Vec<(ResourceToken, i64)>,
}

impl Gameboard {
    /// A fresh board with the seven starting tokens at zero.
    #[must_use]
    pub fn new(short_table: bool) -> Self {
        let tokens = [
            ResourceToken::Wood,
            ResourceToken::Peat,
            ResourceToken::Grain,
            ResourceToken::Livestock,
            ResourceToken::Clay,
            ResourceToken::Coin,
            ResourceToken::Joker,
        ]
        .into_iter()
        .map(|t| (t, 0))
        .collect();
        Self {
            table: if short_table { SHORT_TABLE } else { STANDARD_TABLE },
            wheel: 0,
            house: 0,
            tokens,
        }
    }

    pub fn set_short_table(&mut self, short: bool) {
        self.table = if short { SHORT_TABLE } else { STANDARD_TABLE };
    }

    #[must_use]
    pub fn position(&self, token: ResourceToken) -> Option<i64> {
        self.tokens.iter().find(|(t, _)| *t == token).map(|&(_, p)| p)
    }

    #[must_use]
    pub fn contains(&self, token: ResourceToken) -> bool {
        self.position(token).is_some()
    }

    fn slot(&mut self, token: ResourceToken) -> Result<&mut i64> {
        self.tokens
            .iter_mut()
            .find(|(t, _)| *t == token)
            .map(|(_, p)| p)
            .ok_or_else(|| EngineError::TokenNotOnBoard(token.to_string()))
    }

    /// Put a token on the board (or move it) at `position`.
    pub fn add_token(&mut self, token: ResourceToken, position: i64) {
        match self.slot(token) {
            Ok(slot) => *slot = position,
            Err(_) => self.tokens.push((token, position)),
        }
    }

    /// How many goods `token` would produce right now.
    pub fn production_value(&self, token: ResourceToken) -> Result<u32> {
        let position = self
            .position(token)
            .ok_or_else(|| EngineError::TokenNotOnBoard(token.to_string()))?;
        let distance = (self.wheel - position).rem_euclid(SEGMENTS);
        Ok(self.table[distance as usize])
    }

    /// Read the production value and snap the token back to the wheel.
    pub fn produce(&mut self, token: ResourceToken) -> Result<u32> {
        let value = self.production_value(token)?;
        let wheel = self.wheel;
        *self.slot(token)? = wheel;
        Ok(value)
    }

    /// Exchange the positions of two tokens.
    pub fn swap(&mut self, first: ResourceToken, second: ResourceToken) -> Result<()> {
        let a = self
            .position(first)
            .ok_or_else(|| EngineError::TokenNotOnBoard(first.to_string()))?;
        let b = self
            .position(second)
            .ok_or_else(|| EngineError::TokenNotOnBoard(second.to_string()))?;
        *self.slot(first)? = b;
        *self.slot(second)? = a;
        Ok(())
    }

    /// Advance the wheel one segment. Tokens the wheel lands on are pushed
    /// one segment ahead, or taken off the board when `remove_caught`.
    pub fn rotate(&mut self, remove_caught: bool) -> Vec<Caught> {
        self.wheel += 1;
        let wheel = self.wheel;
        let mut caught = Vec::new();
        for (token, position) in &mut self.tokens {
            if (wheel - *position).rem_euclid(SEGMENTS) == 0 {
                if remove_caught {
                    caught.push(Caught::Removed(*token));
                } else {
                    *position += 1;
                    caught.push(Caught::Shifted(*token));
                }
            }
        }
        if remove_caught {
            self.tokens.retain(|(_, p)| (wheel - *p).rem_euclid(SEGMENTS) != 0);
        }
        caught
    }

    /// Tokens in board order with their current production values.
    pub fn values(&self) -> impl Iterator<Item = (ResourceToken, u32)> + '_ {
        self.tokens.iter().map(move |&(t, p)| {
            let distance = (self.wheel - p).rem_euclid(SEGMENTS);
            (t, self.table[distance as usize])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_follows_table() {
        let mut board = Gameboard::new(false);
        assert_eq!(board.production_value(ResourceToken::Clay).unwrap(), 0);
        board.wheel = 3;
        assert_eq!(board.production_value(ResourceToken::Clay).unwrap(), 4);
        board.set_short_table(true);
        assert_eq!(board.production_value(ResourceToken::Clay).unwrap(), 2);
    }

    #[test]
    fn test_produce_resets_token() {
        let mut board = Gameboard::new(false);
        board.wheel = 5;
        assert_eq!(board.produce(ResourceToken::Wood).unwrap(), 6);
        assert_eq!(board.production_value(ResourceToken::Wood).unwrap(), 0);
        assert_eq!(board.production_value(ResourceToken::Peat).unwrap(), 6);
    }

    #[test]
    fn test_rotate_shifts_caught_tokens() {
        let mut board = Gameboard::new(false);
        board.add_token(ResourceToken::Grapes, 1);
        let caught = board.rotate(false);
        assert_eq!(caught, vec![Caught::Shifted(ResourceToken::Grapes)]);
        assert_eq!(board.position(ResourceToken::Grapes), Some(2));
        assert_eq!(board.production_value(ResourceToken::Grapes).unwrap(), 10);
    }

    #[test]
    fn test_rotate_removes_in_solo() {
        let mut board = Gameboard::new(false);
        board.add_token(ResourceToken::Stone, 1);
        let caught = board.rotate(true);
        assert_eq!(caught, vec![Caught::Removed(ResourceToken::Stone)]);
        assert!(!board.contains(ResourceToken::Stone));
        assert!(matches!(
            board.production_value(ResourceToken::Stone),
            Err(EngineError::TokenNotOnBoard(_))
        ));
    }

    #[test]
    fn test_swap_and_unknown_token() {
        let mut board = Gameboard::new(false);
        board.wheel = 4;
        board.produce(ResourceToken::Clay).unwrap();
        board.swap(ResourceToken::Clay, ResourceToken::Grain).unwrap();
        assert_eq!(board.production_value(ResourceToken::Clay).unwrap(), 5);
        assert_eq!(board.production_value(ResourceToken::Grain).unwrap(), 0);
        assert!(matches!("house".parse::<ResourceToken>(), Err(EngineError::UnknownToken(_))));
    }
}
