//! The accumulator threaded through a function execution.

use rust_decimal::Decimal;

use crate::error::{EngineError, Result};
use crate::goods::VirtualTotals;
use crate::rules::ResourceToken;

/// Values a step hands to its child.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepParams {
    pub count: Option<u32>,
    pub index: Option<usize>,
    pub indices: Option<Vec<usize>>,
    pub token: Option<ResourceToken>,
}

impl StepParams {
    #[must_use]
    pub fn count(count: u32) -> Self {
        Self { count: Some(count), ..Self::default() }
    }

    #[must_use]
    pub fn index(index: usize) -> Self {
        Self { index: Some(index), ..Self::default() }
    }
}

/// Outcome of running a step against argument text.
///
/// A step that does not recognise its text, or whose values are refused,
/// reports `success == false` here; `cause` carries the refusal when there
/// is one. Errors returned through `Result` are hard failures that abort the
/// whole command.
#[derive(Clone, Debug, PartialEq)]
pub struct Validation {
    pub success: bool,
    pub remaining: Option<String>,
    pub leftover: VirtualTotals,
    pub cause: Option<EngineError>,
}

impl Validation {
    /// Start a validation over `text`. Blank text counts as none.
    #[must_use]
    pub fn new(text: Option<&str>) -> Self {
        Self {
            success: true,
            remaining: normalize(text),
            leftover: [Decimal::ZERO; 4],
            cause: None,
        }
    }

    /// A validation over `text` that keeps this one's leftover totals.
    #[must_use]
    pub fn carrying(&self, text: Option<String>) -> Self {
        Self {
            success: true,
            remaining: normalize(text.as_deref()),
            leftover: self.leftover,
            cause: None,
        }
    }

    /// Text still to be consumed, or `""`.
    #[must_use]
    pub fn text(&self) -> &str {
        self.remaining.as_deref().unwrap_or("")
    }

    /// Mark the step as failed without a specific cause.
    pub fn reject(&mut self) {
        self.success = false;
    }

    /// Mark the step as failed because of `cause`. The first cause wins.
    pub fn fail(&mut self, cause: EngineError) {
        self.success = false;
        if self.cause.is_none() {
            self.cause = Some(cause);
        }
    }

    /// Take over a child's outcome.
    pub fn merge(&mut self, child: Validation) {
        self.success = child.success;
        self.remaining = child.remaining;
        self.leftover = child.leftover;
        if let Some(cause) = child.cause {
            self.fail(cause);
        }
    }

    /// The error to report for a failed validation.
    #[must_use]
    pub fn error(&self, fallback: &str) -> EngineError {
        self.cause.clone().unwrap_or_else(|| EngineError::arguments(fallback))
    }

    /// `Ok` when the step succeeded and every word was consumed.
    pub fn finish(self, text: &str) -> Result<Validation> {
        if !self.success {
            return Err(self.error(text));
        }
        if let Some(rest) = &self.remaining {
            return Err(self.cause.clone().unwrap_or_else(|| EngineError::arguments(rest.as_str())));
        }
        Ok(self)
    }
}

fn normalize(text: Option<&str>) -> Option<String> {
    text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
}
