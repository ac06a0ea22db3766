//! Parsed commands and their static rules.

use crate::board::{ClergyKind, LandscapeKind, LandscapeSide};
use crate::cards::CardId;
use crate::core::{Color, GameOption, Phase, Variant};
use crate::goods::Good;

const ANY: &[Phase] = &[
    Phase::Lobby,
    Phase::Setup,
    Phase::RoundStart,
    Phase::ReturnClergy,
    Phase::RotateProductionWheel,
    Phase::Settlement,
    Phase::Action,
    Phase::PassStartPlayer,
    Phase::BonusRound,
    Phase::FinalAction,
    Phase::Endgame,
    Phase::Broken,
];
const SETUP: &[Phase] = &[Phase::Setup];
const TURNS: &[Phase] = &[Phase::Action, Phase::FinalAction, Phase::BonusRound, Phase::Settlement];
const ACTIONS: &[Phase] = &[Phase::Action, Phase::FinalAction, Phase::BonusRound];
const LAND: &[Phase] = &[Phase::Action, Phase::FinalAction];
/// Work contracts, and the answers to them. The bonus round has none.
const CONTRACTS: &[Phase] = &[Phase::Action, Phase::FinalAction];
const SETTLEMENT: &[Phase] = &[Phase::Settlement];

/// Whether a command must, may or must not name the seat issuing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutorRule {
    Any,
    Required,
    Forbidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupStep {
    Variant(Variant),
    Finalize,
    Start,
}

/// One command line, parsed.
///
/// Commands whose arguments are read by an effect step keep their full text;
/// the step re-parses it.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Comment,
    SetOption(GameOption),
    Setup(SetupStep),
    Convert { from: Good, to: Good },
    Buy { kind: LandscapeKind, side: LandscapeSide, row: i32 },
    BuildBuilding(String),
    BuildSettlement(String),
    Pass,
    FellTrees(String),
    CutPeat(String),
    /// Put own clergy into own building and use it.
    PlaceToUse { clergy: ClergyKind, id: CardId, args: Option<String> },
    /// Hire another seat's building with a work contract.
    PayToUse { payment: Good, owner: Color, id: CardId, args: Option<String> },
    /// The building owner's answer to a work contract.
    PlaceClergy(ClergyKind),
    /// Use a building whose clergy was placed by an earlier command.
    Continue { id: CardId, args: Option<String> },
}

impl Command {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::Comment => "comment",
            Command::SetOption(_) => "option",
            Command::Setup(_) => "setup",
            Command::Convert { .. } => "convert",
            Command::Buy { .. } => "buy",
            Command::BuildBuilding(_) => "build building",
            Command::BuildSettlement(_) => "build settlement",
            Command::Pass => "pass",
            Command::FellTrees(_) => "fell-trees",
            Command::CutPeat(_) => "cut-peat",
            Command::PlaceToUse { .. } | Command::PayToUse { .. } | Command::PlaceClergy(_) => "use building",
            Command::Continue { .. } => "use",
        }
    }

    /// Phases the command is accepted in.
    #[must_use]
    pub fn phases(&self) -> &'static [Phase] {
        match self {
            Command::Comment => ANY,
            Command::SetOption(_) | Command::Setup(_) => SETUP,
            Command::Convert { .. } | Command::Buy { .. } | Command::Pass => TURNS,
            Command::BuildBuilding(_) | Command::PlaceToUse { .. } => ACTIONS,
            Command::PayToUse { .. } | Command::PlaceClergy(_) | Command::Continue { .. } => CONTRACTS,
            Command::BuildSettlement(_) => SETTLEMENT,
            Command::FellTrees(_) | Command::CutPeat(_) => LAND,
        }
    }

    #[must_use]
    pub fn executor(&self) -> ExecutorRule {
        match self {
            Command::Comment => ExecutorRule::Any,
            Command::SetOption(_) | Command::Setup(_) => ExecutorRule::Forbidden,
            _ => ExecutorRule::Required,
        }
    }

    /// Whether the command uses up one of the seat's actions this turn.
    #[must_use]
    pub fn counts_as_action(&self) -> bool {
        matches!(
            self,
            Command::BuildBuilding(_)
                | Command::BuildSettlement(_)
                | Command::FellTrees(_)
                | Command::CutPeat(_)
                | Command::PlaceToUse { .. }
                | Command::PayToUse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_table() {
        let pass = Command::Pass;
        assert!(pass.phases().contains(&Phase::Settlement));
        assert!(!pass.counts_as_action());
        assert_eq!(pass.executor(), ExecutorRule::Required);

        let option = Command::SetOption(GameOption::ShortGame);
        assert_eq!(option.phases(), &[Phase::Setup]);
        assert_eq!(option.executor(), ExecutorRule::Forbidden);

        let fell = Command::FellTrees("fell-trees".into());
        assert!(fell.counts_as_action());
        assert!(!fell.phases().contains(&Phase::BonusRound));

        assert!(!Command::PlaceClergy(ClergyKind::Prior).counts_as_action());
        assert_eq!(Command::Comment.executor(), ExecutorRule::Any);

        // open interactions only arise from work contracts, which the
        // bonus round does not allow
        let answer = Command::Continue { id: CardId::new("h01"), args: None };
        assert!(answer.phases().contains(&Phase::FinalAction));
        assert!(!answer.phases().contains(&Phase::BonusRound));
        assert!(!Command::PlaceClergy(ClergyKind::Prior).phases().contains(&Phase::BonusRound));
        let place = Command::PlaceToUse { clergy: ClergyKind::Prior, id: CardId::new("h01"), args: None };
        assert!(place.phases().contains(&Phase::BonusRound));
    }
}
