//! Functions: ordered steps combined by a joiner.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::resolver::StepContext;
use super::step::Step;
use super::validation::{StepParams, Validation};
use crate::error::{EngineError, Result};

/// How the outcomes of a function's steps combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Joiner {
    /// Every step must succeed.
    #[default]
    And,
    /// Exactly one step succeeds, each trying the full text.
    Or,
    /// Steps that fail are skipped; at least one must succeed.
    AndOr,
    /// The first step may be skipped; if it is, every later step must succeed.
    AndThenOr,
    /// Like `AndOr`, for optional extra conversions.
    Additionally,
    /// Sequencing within one chain; same rule as `And`.
    AndThen,
}

/// A building's ability.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub steps: Vec<Step>,
    pub joiner: Joiner,
}

impl Function {
    /// A function with a single step.
    #[must_use]
    pub fn new(step: Step) -> Self {
        Self {
            steps: vec![step],
            joiner: Joiner::And,
        }
    }

    /// Append a step, joining it with `joiner`.
    #[must_use]
    pub fn join(mut self, joiner: Joiner, step: Step) -> Self {
        self.joiner = joiner;
        self.steps.push(step);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the function against `text`.
    ///
    /// On success every word of the text has been consumed. A failure has
    /// left the game as the failing attempt found it only for `And`-style
    /// joiners; callers that need atomicity snapshot the game themselves.
    pub fn execute(&self, cx: &mut StepContext<'_>, text: Option<&str>) -> Result<Validation> {
        let original = Validation::new(text);
        let fallback = original.text().to_string();
        debug!(seat = %cx.seat, joiner = ?self.joiner, text = %fallback, "executing function");

        let outcome = match self.joiner {
            Joiner::And | Joiner::AndThen => self.all(cx, original, &fallback)?,
            Joiner::Or => self.exactly_one(cx, original, &fallback)?,
            Joiner::AndOr | Joiner::AndThenOr | Joiner::Additionally => {
                self.tolerant(cx, original, &fallback)?
            }
        };
        outcome.finish(&fallback)
    }

    fn all(&self, cx: &mut StepContext<'_>, original: Validation, fallback: &str) -> Result<Validation> {
        let mut v = original;
        for step in &self.steps {
            v = step.execute(cx, v, &StepParams::default())?;
            if !v.success {
                return Err(v.error(fallback));
            }
        }
        Ok(v)
    }

    fn exactly_one(&self, cx: &mut StepContext<'_>, original: Validation, fallback: &str) -> Result<Validation> {
        let mut winner: Option<Validation> = None;
        let mut cause: Option<EngineError> = None;
        for step in &self.steps {
            let snapshot = cx.game.clone();
            let attempt = step.execute(cx, original.clone(), &StepParams::default())?;
            if attempt.success && attempt.remaining.is_none() {
                if winner.is_some() {
                    return Err(EngineError::AmbiguousOption(fallback.to_string()));
                }
                winner = Some(attempt);
            } else {
                *cx.game = snapshot;
                cause = attempt.cause.or(cause);
            }
        }
        winner.ok_or_else(|| cause.unwrap_or_else(|| EngineError::arguments(fallback)))
    }

    fn tolerant(&self, cx: &mut StepContext<'_>, original: Validation, fallback: &str) -> Result<Validation> {
        let mut v = original.clone();
        let mut successes = Vec::with_capacity(self.steps.len());
        let mut last_success: Option<Validation> = None;
        let mut cause: Option<EngineError> = None;

        for step in &self.steps {
            let snapshot = cx.game.clone();
            let attempt = step.execute(cx, v.clone(), &StepParams::default())?;
            successes.push(attempt.success);
            if attempt.success {
                last_success = Some(attempt.clone());
                v = attempt;
            } else {
                *cx.game = snapshot;
                cause = attempt.cause.or(cause);
                v = last_success.clone().unwrap_or_else(|| original.clone());
            }
        }

        let accepted = match self.joiner {
            Joiner::AndThenOr => successes.first().copied().unwrap_or(false) || successes.iter().skip(1).all(|&s| s),
            _ => successes.iter().any(|&s| s),
        };
        if accepted {
            Ok(v)
        } else {
            Err(cause.unwrap_or_else(|| EngineError::arguments(fallback)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, SeatId};
    use crate::goods::{GoodKind, Goods};
    use crate::rules::Game;
    use rust_decimal::Decimal;

    fn game_with(goods: Goods) -> Game {
        let mut game = Game::new(GameConfig::new(3));
        game.seats[0].inventory.gain(&goods).unwrap();
        game
    }

    fn count(game: &Game, kind: GoodKind) -> Decimal {
        game.seats[0].inventory.count(kind)
    }

    fn run(game: &mut Game, function: &Function, text: &str) -> Result<Validation> {
        let mut cx = StepContext::new(game, SeatId(0));
        function.execute(&mut cx, Some(text))
    }

    fn brewery() -> Function {
        Function::new(
            Step::spend([(GoodKind::Malt, 1), (GoodKind::Grain, 1)])
                .unbounded()
                .then(Step::gain([(GoodKind::Beer, 1)])),
        )
        .join(
            Joiner::AndThenOr,
            Step::spend([(GoodKind::Beer, 1)]).then(Step::gain([(GoodKind::Coin, 7)])),
        )
    }

    #[test]
    fn test_and_then_or_second_clause_only() {
        let mut game = game_with(Goods::from([(GoodKind::Beer, 1)]));
        run(&mut game, &brewery(), "spend 1 beer").unwrap();
        assert_eq!(count(&game, GoodKind::Beer), Decimal::ZERO);
        assert_eq!(count(&game, GoodKind::Coin), Decimal::from(7));
    }

    #[test]
    fn test_and_then_or_first_clause_only() {
        let mut game = game_with(Goods::from([(GoodKind::Malt, 2), (GoodKind::Grain, 2)]));
        run(&mut game, &brewery(), "spend 2 malt 2 grain").unwrap();
        assert_eq!(count(&game, GoodKind::Beer), Decimal::from(2));
    }

    #[test]
    fn test_and_then_or_both_clauses() {
        let mut game = game_with(Goods::from([(GoodKind::Malt, 1), (GoodKind::Grain, 1)]));
        run(&mut game, &brewery(), "spend 1 malt 1 grain and spend 1 beer").unwrap();
        assert_eq!(count(&game, GoodKind::Beer), Decimal::ZERO);
        assert_eq!(count(&game, GoodKind::Coin), Decimal::from(7));
    }

    #[test]
    fn test_or_needs_exactly_one() {
        let function = Function::new(Step::spend([(GoodKind::Coin, 1)]).then(Step::gain([(GoodKind::Wood, 1)])))
            .join(Joiner::Or, Step::spend([(GoodKind::Coin, 1)]).then(Step::gain([(GoodKind::Clay, 1)])));

        let mut game = game_with(Goods::from([(GoodKind::Coin, 3)]));
        run(&mut game, &function, "spend 1 coin to gain 1 clay").unwrap();
        assert_eq!(count(&game, GoodKind::Clay), Decimal::ONE);
        assert_eq!(count(&game, GoodKind::Wood), Decimal::ZERO);

        let err = run(&mut game, &function, "spend 1 coin").unwrap_err();
        assert!(matches!(err, EngineError::AmbiguousOption(_)));
    }

    #[test]
    fn test_and_reports_cause() {
        let function = Function::new(Step::spend([(GoodKind::Coin, 1)]).then(Step::gain([(GoodKind::Grain, 6)])));
        let mut game = game_with(Goods::from([(GoodKind::Coin, 2)]));
        let err = run(&mut game, &function, "spend 2 coin").unwrap_err();
        assert_eq!(err, EngineError::TooManyGoods { count: 2, max: 1 });
        assert_eq!(count(&game, GoodKind::Coin), Decimal::from(2));
    }

    #[test]
    fn test_residue_is_rejected() {
        let function = Function::new(Step::gain_fixed([(GoodKind::Wood, 1)]));
        let mut game = game_with(Goods::new());
        let err = run(&mut game, &function, "gain 1 wood").unwrap_err();
        assert_eq!(err, EngineError::arguments("gain 1 wood"));
    }
}
