use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-character card identifier (`g01`, `f14`, `s03`, `fl1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId([u8; 3]);

impl CardId {
    /// Build an id from a literal. Panics (at compile time in const context)
    /// if the literal is shorter than three bytes.
    #[must_use]
    pub const fn new(id: &str) -> Self {
        let b = id.as_bytes();
        Self([b[0], b[1], b[2]])
    }

    /// Parse an id from command text: a letter, then a letter or digit, then
    /// a digit.
    ///
    /// ```
    /// use oel_engine::cards::CardId;
    ///
    /// assert_eq!(CardId::parse("g01"), Some(CardId::new("g01")));
    /// assert_eq!(CardId::parse("fl1"), Some(CardId::new("fl1")));
    /// assert_eq!(CardId::parse("01g"), None);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let b = text.as_bytes();
        if b.len() != 3 {
            return None;
        }
        let ok = b[0].is_ascii_lowercase()
            && (b[1].is_ascii_lowercase() || b[1].is_ascii_digit())
            && b[2].is_ascii_digit();
        ok.then(|| Self([b[0], b[1], b[2]]))
    }

    /// Leading letter (`g`, `f`, `i`, `h`, `s`).
    #[must_use]
    pub const fn series(self) -> char {
        self.0[0] as char
    }

    #[must_use]
    pub const fn is_settlement(self) -> bool {
        self.0[0] == b's'
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        // ids are only ever built from ASCII
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
