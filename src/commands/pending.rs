//! Work contracts interrupted between two commands.

use serde::{Deserialize, Serialize};

use crate::core::SeatId;
use crate::effects::BuildingRef;

/// A frame on the game's pending stack.
///
/// A paid work contract whose owner holds both clergy kinds cannot finish in
/// one command: the owner must say which clergy goes to work, then the payer
/// uses the building. Each frame names the seat expected to act next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pending {
    /// The building's owner must choose a clergy with `place <clergy>`.
    ClergyChoice { payer: SeatId, building: BuildingRef },
    /// Clergy is in place; the payer finishes with `use <id>`.
    AwaitingUse { payer: SeatId, building: BuildingRef },
}

impl Pending {
    /// Seat whose command the frame waits for.
    #[must_use]
    pub fn acting_seat(&self) -> SeatId {
        match self {
            Pending::ClergyChoice { building, .. } => building.seat,
            Pending::AwaitingUse { payer, .. } => *payer,
        }
    }

    /// What the frame is waiting for, for messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Pending::ClergyChoice { .. } => "clergy choice",
            Pending::AwaitingUse { .. } => "work contract",
        }
    }

    #[must_use]
    pub fn building(&self) -> &BuildingRef {
        match self {
            Pending::ClergyChoice { building, .. } | Pending::AwaitingUse { building, .. } => building,
        }
    }
}
