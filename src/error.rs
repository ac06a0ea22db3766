//! Engine error taxonomy.
//!
//! Every failure the engine can report is an [`EngineError`]. Errors fall into
//! three classes (see [`ErrorClass`]):
//!
//! - **Syntax**: the text matched no grammar, or a step left text unconsumed.
//! - **Value**: the text parsed but the game state refused it (not enough
//!   goods, a bound exceeded, an invalid placement, ...).
//! - **Structural**: wrong phase, wrong or missing executor. These are raised
//!   before any mutation and are always safe for a caller to recover from.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::board::Coordinate;
use crate::goods::GoodKind;

/// Convenience alias used throughout the crate.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Broad classification of an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Syntax,
    Value,
    Structural,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum EngineError {
    // ---- syntax ----
    #[error("invalid arguments: {0:?}")]
    InvalidArguments(String),

    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("unknown good: {0:?}")]
    UnknownGood(String),

    #[error("unknown token: {0:?}")]
    UnknownToken(String),

    #[error("invalid coordinate: {0:?}")]
    InvalidCoordinate(String),

    // ---- value ----
    #[error("not enough {good}: needed {needed}, have {available}")]
    InsufficientGoods {
        good: GoodKind,
        needed: Decimal,
        available: Decimal,
    },

    #[error("too many goods: {count} exceeds the maximum of {max}")]
    TooManyGoods { count: u32, max: u32 },

    #[error("{good} cannot be used in fractional amounts ({count})")]
    FractionalGoods { good: GoodKind, count: Decimal },

    #[error("cannot combine {left} with {right}")]
    GoodsMismatch { left: GoodKind, right: GoodKind },

    #[error("{0} is a virtual good and cannot be held")]
    VirtualGoods(GoodKind),

    #[error("{0} is not accepted here")]
    GoodsNotAllowed(GoodKind),

    #[error("{0} was named more than once")]
    DuplicateGoods(GoodKind),

    #[error("expected {expected} distinct goods, found {found}")]
    WrongGoodsCount { expected: u32, found: u32 },

    #[error("goods were named that no choice could use")]
    UnspentGoods,

    #[error("requested goods {0:?} do not match any allowed choice")]
    ChoiceMismatch(String),

    #[error("no threshold with index {0:?}")]
    InvalidIndex(Option<usize>),

    #[error("the same choice cannot be made twice")]
    DuplicateChoice,

    #[error("requested {requested} {good} but only {allowed} is allowed")]
    GainExceeded {
        good: GoodKind,
        requested: Decimal,
        allowed: Decimal,
    },

    #[error("expected to gain {expected:?}, found {found:?}")]
    UnexpectedGain { expected: String, found: String },

    #[error("{count} targets named but at most {max} allowed")]
    TooManyTargets { count: u32, max: u32 },

    #[error("building {0} is already in use")]
    RecursiveUse(String),

    #[error("more than one option matched {0:?}")]
    AmbiguousOption(String),

    #[error("building {0} not found")]
    BuildingNotFound(String),

    #[error("settlement {0} not found")]
    SettlementNotFound(String),

    #[error("no space at {0}")]
    SpaceNotFound(Coordinate),

    #[error("space {0} is already occupied")]
    SpaceOccupied(Coordinate),

    #[error("{card} cannot be placed on the terrain at {coordinate}")]
    InvalidTerrain { card: String, coordinate: Coordinate },

    #[error("cloister building {0} must be adjacent to another cloister building")]
    CloisterAdjacency(String),

    #[error("the card at {0} cannot be removed")]
    CardNotRemovable(Coordinate),

    #[error("no {expected} at {coordinate}")]
    WrongCard { expected: String, coordinate: Coordinate },

    #[error("no landscape available")]
    NoLandscapeAvailable,

    #[error("a landscape was already purchased this turn")]
    LandscapeAlreadyPurchased,

    #[error("a landscape cannot be placed at row {0}")]
    InvalidLandscapePosition(i32),

    #[error("a landscape must be chosen")]
    LandscapeRequired,

    #[error("no clergy available")]
    ClergyNotAvailable,

    #[error("building {0} is already occupied")]
    BuildingOccupied(String),

    #[error("invalid payment: {0}")]
    InvalidPayment(String),

    #[error("cannot convert {from} to {to}")]
    InvalidConversion { from: GoodKind, to: GoodKind },

    #[error("token {0} is not on the production wheel")]
    TokenNotOnBoard(String),

    #[error("option {0} is not available for this game")]
    OptionUnavailable(String),

    #[error("action required: {0}")]
    ActionRequired(String),

    // ---- structural ----
    #[error("{command} is not allowed during {phase}")]
    InvalidPhase { command: String, phase: String },

    #[error("invalid actor: expected {expected}, found {found}")]
    InvalidActor { expected: String, found: String },

    #[error("unknown seat: {0}")]
    UnknownSeat(String),

    #[error("{0} requires an executor")]
    ExecutorRequired(String),

    #[error("{0} must not have an executor")]
    ExecutorForbidden(String),

    #[error("nothing is waiting for {0}")]
    NoPendingInteraction(String),

    #[error("{command} cannot interrupt the open {waiting}")]
    InterruptsPending { command: String, waiting: String },

    #[error("there are commands that have not been applied")]
    UnappliedCommands,

    #[error("the game is broken: {0}")]
    GameBroken(String),

    // ---- replay ----
    #[error("record {record} ({line:?}) was rejected: {source}")]
    Rejected {
        record: u64,
        line: String,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// The class this error belongs to.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        use EngineError::*;
        match self {
            InvalidArguments(_) | UnknownCommand(_) | UnknownGood(_) | UnknownToken(_)
            | InvalidCoordinate(_) => ErrorClass::Syntax,
            InvalidPhase { .. }
            | InvalidActor { .. }
            | UnknownSeat(_)
            | ExecutorRequired(_)
            | ExecutorForbidden(_)
            | NoPendingInteraction(_)
            | InterruptsPending { .. }
            | UnappliedCommands
            | GameBroken(_) => ErrorClass::Structural,
            Rejected { source, .. } => source.class(),
            _ => ErrorClass::Value,
        }
    }

    /// Shorthand for [`EngineError::InvalidArguments`].
    pub(crate) fn arguments(text: impl Into<String>) -> Self {
        EngineError::InvalidArguments(text.into())
    }
}
