//! The ledger and the persisted command log.
//!
//! Two records of a game exist side by side:
//!
//! - The **command log** ([`LogStore`]) holds what players submitted, one
//!   [`LogRecord`] per line, with a monotonic id. It is the only persistent
//!   truth; live state is rebuilt by replaying it.
//! - The **ledger** ([`LedgerEntry`]) lives inside the game and records what
//!   happened: every applied command plus the automatic events of phase
//!   changes (`rotate production wheel`, `return all clergy`, ...).
//!
//! A line that got past the turn checks but then failed is kept in both,
//! marked `rejected`, so replay skips it and the ledger shows the attempt.

use serde::{Deserialize, Serialize};

use crate::core::{GameConfig, SeatId};

/// One line of the game's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub text: String,
    /// Seat the entry concerns, if any.
    pub seat: Option<SeatId>,
    /// The line was attempted and failed; nothing of it took effect.
    #[serde(default)]
    pub rejected: bool,
}

impl LedgerEntry {
    #[must_use]
    pub fn new(text: impl Into<String>, seat: Option<SeatId>) -> Self {
        Self { text: text.into(), seat, rejected: false }
    }

    #[must_use]
    pub fn rejected(text: impl Into<String>, seat: Option<SeatId>) -> Self {
        Self { text: text.into(), seat, rejected: true }
    }
}

/// A persisted command line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: u64,
    pub executor: Option<SeatId>,
    pub text: String,
    /// Kept for the history only; replay never applies it.
    #[serde(default)]
    pub rejected: bool,
}

/// Ordered storage of submitted command lines.
///
/// Ids are strictly increasing in append order. Implementations are free to
/// persist however they like; the engine only reads forward from a
/// watermark.
pub trait LogStore {
    /// Records with an id greater than `watermark` (all records for `None`),
    /// in id order.
    fn records_after(&self, watermark: Option<u64>) -> Vec<LogRecord>;

    /// Append a line, returning its id.
    fn append(&mut self, executor: Option<SeatId>, text: &str) -> u64;

    /// Append a line that failed when it was submitted.
    fn append_rejected(&mut self, executor: Option<SeatId>, text: &str) -> u64;

    /// Id of the newest record.
    fn last_id(&self) -> Option<u64>;
}

/// In-memory [`LogStore`].
///
/// ```
/// use oel_engine::core::GameConfig;
/// use oel_engine::rules::{LogStore, MemoryLog};
///
/// let log = MemoryLog::with_setup(&GameConfig::new(3));
/// assert_eq!(log.last_id(), Some(2));
/// assert_eq!(log.records_after(Some(1))[0].text, "setup variant france");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLog {
    records: Vec<LogRecord>,
}

impl MemoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A log holding the configuration's opening lines.
    #[must_use]
    pub fn with_setup(config: &GameConfig) -> Self {
        let mut log = Self::new();
        for line in config.setup_lines() {
            log.append(None, &line);
        }
        log
    }

    #[must_use]
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn push(&mut self, executor: Option<SeatId>, text: &str, rejected: bool) -> u64 {
        let id = self.last_id().map_or(1, |last| last + 1);
        self.records.push(LogRecord { id, executor, text: text.to_string(), rejected });
        id
    }
}

impl LogStore for MemoryLog {
    fn records_after(&self, watermark: Option<u64>) -> Vec<LogRecord> {
        self.records
            .iter()
            .filter(|r| watermark.map_or(true, |w| r.id > w))
            .cloned()
            .collect()
    }

    fn append(&mut self, executor: Option<SeatId>, text: &str) -> u64 {
        self.push(executor, text, false)
    }

    fn append_rejected(&mut self, executor: Option<SeatId>, text: &str) -> u64 {
        self.push(executor, text, true)
    }

    fn last_id(&self) -> Option<u64> {
        self.records.last().map(|r| r.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase() {
        let mut log = MemoryLog::new();
        assert_eq!(log.last_id(), None);
        assert_eq!(log.append(None, "# hello"), 1);
        assert_eq!(log.append(Some(SeatId(0)), "pass"), 2);
        assert_eq!(log.last_id(), Some(2));
        assert_eq!(log.append_rejected(Some(SeatId(0)), "pass"), 3);
        assert!(log.records()[2].rejected);
        assert!(!log.records()[1].rejected);
    }

    #[test]
    fn test_records_after_watermark() {
        let mut log = MemoryLog::new();
        for line in ["a", "b", "c"] {
            log.append(None, line);
        }
        assert_eq!(log.records_after(None).len(), 3);
        let rest: Vec<_> = log.records_after(Some(1)).into_iter().map(|r| r.text).collect();
        assert_eq!(rest, vec!["b", "c"]);
        assert!(log.records_after(Some(3)).is_empty());
    }

    #[test]
    fn test_ledger_entry_serde_round_trip() {
        let entry = LedgerEntry::new("return all clergy", Some(SeatId(2)));
        let json = serde_json::to_string(&entry).unwrap();
        let back: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);

        // entries written before the flag existed read as accepted
        let old: LedgerEntry = serde_json::from_str(r#"{"text":"pass","seat":0}"#).unwrap();
        assert!(!old.rejected);
    }
}
