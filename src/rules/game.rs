//! The game: seats, the production wheel, the building display and the
//! phase/turn state machine.
//!
//! ## Phase transitions
//!
//! Entering a phase performs its side effects and may name a follow-up phase.
//! [`Game::transition`] loops until a phase waits for commands:
//!
//! ```text
//! RoundStart -> ReturnClergy -> RotateProductionWheel -> Action
//!                                                     \-> Settlement (age advanced)
//!                                                     \-> BonusRound (age E, 3-4 players)
//! Action --pass--> PassStartPlayer -> RoundStart
//! Settlement --pass--> Action | FinalAction | Endgame
//! BonusRound --pass--> Settlement
//! FinalAction --pass--> Endgame
//! ```
//!
//! ## Seats and turn order
//!
//! `seats` is indexed by [`SeatId`]. `order` lists the playing seats in turn
//! order (shuffled by `randomize-seats`); the neutral seat of a solo game is
//! not in it. The seat to act is
//! `order[(round_start + turn - 1) mod players]` unless a pending work
//! contract hands the turn to someone else.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::gameboard::{Caught, Gameboard, ResourceToken};
use super::ledger::LedgerEntry;
use super::result::GameResult;
use super::seat::{Score, Seat};
use crate::board::{Card, Clergy, ClergyKind, Coordinate, Landscape, LandscapeKind, PlacedBuilding, Space};
use crate::cards::{CardId, Catalogue};
use crate::commands::Pending;
use crate::core::{Age, Color, GameConfig, GameOption, GameRng, Phase, PlayerCountKey, SeatId, Variant};
use crate::error::{EngineError, Result};
use crate::goods::{GoodKind, Goods};

/// Buildings that raise the work contract price to 2 coin once built.
const CONTRACT_RAISERS: [CardId; 2] = [CardId::new("f21"), CardId::new("i21")];

/// Spaces emptied on the neutral board of a solo game.
const NEUTRAL_CLEARED: [Coordinate; 5] = [
    Coordinate::new(30, 2),
    Coordinate::new(31, 2),
    Coordinate::new(30, 3),
    Coordinate::new(31, 3),
    Coordinate::new(30, 4),
];

/// Spaces emptied on every board in a short game.
const SHORT_GAME_CLEARED: [Coordinate; 2] = [Coordinate::new(30, 2), Coordinate::new(30, 3)];

/// Complete game state.
///
/// Cloning is the snapshot mechanism: a command that fails restores the
/// clone taken before it ran.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    pub catalogue: Arc<Catalogue>,
    pub variant: Variant,
    pub options: Vec<GameOption>,
    pub seats: Vec<Seat>,
    /// Playing seats in turn order.
    pub order: Vec<SeatId>,
    pub gameboard: Gameboard,
    /// Districts for sale, cheapest first.
    pub districts: Vec<Landscape>,
    /// Plots for sale, cheapest first.
    pub plots: Vec<Landscape>,
    /// Buildings released and not yet built.
    pub available_buildings: Vec<CardId>,
    pub phase: Phase,
    pub age: Age,
    pub round: Option<u32>,
    pub turn: Option<u32>,
    round_start: usize,
    /// Coin price of a work contract.
    pub contract_price: u32,
    /// Interrupted work contracts, innermost last.
    pub pending: Vec<Pending>,
    pub ledger: Vector<LedgerEntry>,
    finalized: bool,
    rng: GameRng,
    pub(crate) watermark: Option<u64>,
    pub(crate) rejected: Vec<u64>,
    pub(crate) message: Option<String>,
}

impl Game {
    /// A game in the Setup phase with the standard catalogue.
    ///
    /// Seats start with a bare heartland and no goods; `setup finalize`
    /// hands out starting goods and the first buildings.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_catalogue(config, Arc::new(Catalogue::standard()))
    }

    #[must_use]
    pub fn with_catalogue(config: GameConfig, catalogue: Arc<Catalogue>) -> Self {
        let seats: Vec<Seat> = Color::ORDER
            .into_iter()
            .zip(SeatId::all(config.players))
            .map(|(color, id)| Seat::new(id, color))
            .collect();
        let order = seats.iter().map(|s| s.id).collect();
        let (districts, plots) = Landscape::for_sale();
        let short_table = config.players == 2 && !config.options.contains(&GameOption::LongGame);
        Self {
            catalogue,
            variant: config.variant,
            options: config.options.clone(),
            seats,
            order,
            gameboard: Gameboard::new(short_table),
            districts,
            plots,
            available_buildings: Vec::new(),
            phase: Phase::Setup,
            age: Age::Start,
            round: None,
            turn: None,
            round_start: 0,
            contract_price: 1,
            pending: Vec::new(),
            ledger: Vector::new(),
            finalized: false,
            rng: GameRng::new(config.seed),
            watermark: None,
            rejected: Vec::new(),
            message: None,
            config,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Number of playing (non-neutral) seats.
    #[must_use]
    pub fn players(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn has_option(&self, option: GameOption) -> bool {
        self.options.contains(&option)
    }

    #[must_use]
    pub fn is_solo(&self) -> bool {
        self.players() == 1
    }

    #[must_use]
    pub fn player_count_key(&self) -> PlayerCountKey {
        PlayerCountKey::for_game(
            self.players(),
            self.has_option(GameOption::ShortGame),
            self.has_option(GameOption::LongGame),
        )
    }

    pub fn seat(&self, id: SeatId) -> Result<&Seat> {
        self.seats.get(id.index()).ok_or_else(|| EngineError::UnknownSeat(id.to_string()))
    }

    pub fn seat_mut(&mut self, id: SeatId) -> Result<&mut Seat> {
        self.seats.get_mut(id.index()).ok_or_else(|| EngineError::UnknownSeat(id.to_string()))
    }

    #[must_use]
    pub fn seat_by_color(&self, color: Color) -> Option<&Seat> {
        self.seats.iter().find(|s| s.color == color)
    }

    /// Seat that starts the current round.
    #[must_use]
    pub fn round_start_seat(&self) -> Option<SeatId> {
        self.round?;
        self.order.get(self.round_start % self.players().max(1)).copied()
    }

    fn turn_index(&self) -> Option<usize> {
        let turn = self.turn? as usize;
        Some((self.round_start + turn - 1) % self.players().max(1))
    }

    /// Seat whose turn it is by the turn counter alone.
    #[must_use]
    pub fn turn_seat(&self) -> Option<SeatId> {
        self.order.get(self.turn_index()?).copied()
    }

    /// Seat expected to submit the next command.
    ///
    /// A pending work contract overrides the turn order: the building's
    /// owner answers a clergy choice, the payer finishes the use.
    #[must_use]
    pub fn action_seat(&self) -> Option<SeatId> {
        match self.pending.last() {
            Some(frame) => Some(frame.acting_seat()),
            None => self.turn_seat(),
        }
    }

    /// Actions `seat` must take before it may pass in the current phase.
    #[must_use]
    pub fn actions_required(&self, seat: SeatId) -> u32 {
        if !matches!(self.phase, Phase::Action | Phase::FinalAction | Phase::BonusRound) {
            return 0;
        }
        match self.players() {
            3 | 4 => 1,
            2 if self.has_option(GameOption::LongGame) => {
                if self.round_start_seat() == Some(seat) {
                    2
                } else {
                    1
                }
            }
            _ => 2,
        }
    }

    /// Landscapes of `kind` still for sale. Heartlands are never sold.
    #[must_use]
    pub fn landscapes(&self, kind: LandscapeKind) -> &[Landscape] {
        match kind {
            LandscapeKind::District => &self.districts,
            LandscapeKind::Plot => &self.plots,
            LandscapeKind::Heartland => &[],
        }
    }

    pub fn landscapes_mut(&mut self, kind: LandscapeKind) -> Result<&mut Vec<Landscape>> {
        match kind {
            LandscapeKind::District => Ok(&mut self.districts),
            LandscapeKind::Plot => Ok(&mut self.plots),
            LandscapeKind::Heartland => Err(EngineError::NoLandscapeAvailable),
        }
    }

    /// Problem reported by the last failed replay, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Id of the last log record the game has applied.
    #[must_use]
    pub fn last_applied(&self) -> Option<u64> {
        self.watermark
    }

    /// Ids of records that were rejected, live or during replay.
    #[must_use]
    pub fn rejected(&self) -> &[u64] {
        &self.rejected
    }

    pub(crate) fn record(&mut self, text: impl Into<String>, seat: Option<SeatId>) {
        let entry = LedgerEntry::new(text, seat);
        info!(seat = ?entry.seat, text = %entry.text, "ledger");
        self.ledger.push_back(entry);
    }

    /// Note a line that was attempted and failed.
    pub(crate) fn record_rejected(&mut self, text: impl Into<String>, seat: Option<SeatId>) {
        let entry = LedgerEntry::rejected(text, seat);
        warn!(seat = ?entry.seat, text = %entry.text, "ledger rejected");
        self.ledger.push_back(entry);
    }

    // === Board operations ===

    /// Put clergy from `seat`'s board back into their owners' pools,
    /// optionally only one kind.
    pub fn return_clergy(&mut self, seat: SeatId, kind: Option<ClergyKind>) {
        let Some(board) = self.seats.get_mut(seat.index()).map(|s| &mut s.board) else {
            return;
        };
        let occupied: Vec<Coordinate> = board
            .spaces()
            .filter(|(_, s)| s.building().is_some_and(PlacedBuilding::is_occupied))
            .map(|(at, _)| at)
            .collect();

        let mut returned: Vec<Clergy> = Vec::new();
        for at in occupied {
            if let Some(building) = board.space_mut(at).and_then(Space::building_mut) {
                building.clergy.retain(|c| {
                    let back = kind.map_or(true, |k| c.kind == k);
                    if back {
                        returned.push(*c);
                    }
                    !back
                });
            }
        }
        for clergy in returned {
            if let Some(owner) = self.seats.get_mut(clergy.owner.index()) {
                owner.clergy.push(clergy.kind);
            }
        }
    }

    /// Pay for and place a building from the display.
    pub fn build_building(&mut self, seat: SeatId, at: Coordinate, id: CardId) -> Result<()> {
        let cost = self
            .catalogue
            .building(id)
            .map(|def| def.cost.clone())
            .ok_or_else(|| EngineError::BuildingNotFound(id.to_string()))?;
        let position = self
            .available_buildings
            .iter()
            .position(|&b| b == id)
            .ok_or_else(|| EngineError::BuildingNotFound(id.to_string()))?;

        let owner = self.seat_mut(seat)?;
        let space = owner.board.space_mut(at).ok_or(EngineError::SpaceNotFound(at))?;
        owner.inventory.spend(&cost)?;
        space.place(Card::Building(PlacedBuilding::new(id)));
        self.available_buildings.remove(position);
        debug!(%seat, building = %id, %at, "built building");

        if CONTRACT_RAISERS.contains(&id) && self.contract_price < 2 {
            self.contract_price = 2;
            info!(building = %id, "work contract price raised to 2 coin");
        }
        Ok(())
    }

    /// Put clergy to work in the building at `at` on `seat`'s board.
    pub fn assign_clergy(&mut self, seat: SeatId, at: Coordinate, clergy: Clergy, bonus: bool) -> Result<()> {
        let building = self
            .seat_mut(seat)?
            .board
            .space_mut(at)
            .ok_or(EngineError::SpaceNotFound(at))?
            .building_mut()
            .ok_or_else(|| EngineError::BuildingNotFound(at.to_string()))?;
        building.assign(clergy, bonus)?;
        debug!(%seat, %at, clergy = %clergy.kind, "assigned clergy");
        Ok(())
    }

    /// Pay `paid` and place one of `seat`'s settlements.
    pub fn build_settlement(&mut self, seat: SeatId, at: Coordinate, id: CardId, paid: &Goods) -> Result<()> {
        let owner = self.seat_mut(seat)?;
        let position = owner
            .settlements
            .iter()
            .position(|&s| s == id)
            .ok_or_else(|| EngineError::SettlementNotFound(id.to_string()))?;
        let space = owner.board.space_mut(at).ok_or(EngineError::SpaceNotFound(at))?;
        owner.inventory.spend(paid)?;
        space.place(Card::Settlement(id));
        owner.settlements.remove(position);
        debug!(%seat, settlement = %id, %at, "built settlement");
        Ok(())
    }

    // === Setup ===

    pub(crate) fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
    }

    /// Choose an option. Choosing it again is a no-op; either way it must be
    /// available given the options chosen before it.
    pub(crate) fn add_option(&mut self, option: GameOption) -> Result<()> {
        let before: Vec<GameOption> = self.options.iter().copied().take_while(|&o| o != option).collect();
        if !option.is_available(self.players(), Some(self.variant), &before) {
            return Err(EngineError::OptionUnavailable(option.name().to_string()));
        }
        if !self.options.contains(&option) {
            self.options.push(option);
        }
        Ok(())
    }

    /// Apply the chosen options, hand out starting goods and release the
    /// start-age buildings and settlements.
    pub(crate) fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Err(EngineError::arguments("setup finalize"));
        }
        self.finalized = true;

        if self.has_option(GameOption::RandomizeSeats) {
            self.rng.shuffle(&mut self.order);
            for (position, id) in self.order.clone().into_iter().enumerate() {
                if let (Some(color), Some(seat)) = (Color::at(position), self.seats.get_mut(id.index())) {
                    seat.color = color;
                }
            }
            debug!(order = ?self.order, "randomized seats");
        }

        if self.is_solo() {
            self.add_neutral_seat()?;
            self.districts.reverse();
            self.plots.reverse();
        }

        if self.has_option(GameOption::ShortGame) {
            for seat in &mut self.seats {
                for at in SHORT_GAME_CLEARED {
                    if let Some(space) = seat.board.space_mut(at) {
                        space.clear();
                    }
                }
                seat.clergy.pop();
            }
        }

        if !self.is_solo() {
            let start = Goods::from([
                (GoodKind::Clay, 1),
                (GoodKind::Wood, 1),
                (GoodKind::Peat, 1),
                (GoodKind::Coin, 1),
                (GoodKind::Grain, 1),
                (GoodKind::Livestock, 1),
            ]);
            for seat in &mut self.seats {
                seat.inventory.gain(&start)?;
            }
        }

        self.gameboard.house = self.house_start();
        self.gameboard
            .set_short_table(self.players() == 2 && !self.has_option(GameOption::LongGame));
        self.age = Age::Start;
        self.available_buildings.clear();
        self.add_new_age_buildings();
        Ok(())
    }

    fn add_neutral_seat(&mut self) -> Result<()> {
        let index = self.seats.len();
        let color = Color::at(index).ok_or_else(|| EngineError::UnknownSeat(format!("neutral seat {index}")))?;
        let mut neutral = Seat::new(SeatId(index as u8), color);
        neutral.neutral = true;
        for at in NEUTRAL_CLEARED {
            if let Some(space) = neutral.board.space_mut(at) {
                space.clear();
            }
        }
        if let Some(space) = neutral.board.space_mut(NEUTRAL_CLEARED[0]) {
            space.place(Card::Building(PlacedBuilding::new(CardId::new("g13"))));
        }
        self.seats.push(neutral);
        Ok(())
    }

    /// Begin the first round.
    pub(crate) fn start(&mut self) -> Result<()> {
        if !self.finalized {
            return Err(EngineError::arguments("setup start"));
        }
        self.round = Some(0);
        self.transition(Phase::RoundStart);
        Ok(())
    }

    fn house_start(&self) -> i64 {
        match self.players() {
            1 => 12,
            2 => 7,
            _ if self.has_option(GameOption::ShortGame) => 3,
            3 => 6,
            _ => 7,
        }
    }

    /// Rounds between the marker for `age` and the next one.
    fn age_length(&self, age: Age) -> i64 {
        let lengths: [i64; 4] = match self.players() {
            3 | 4 if self.has_option(GameOption::ShortGame) => [2, 2, 2, 4],
            1 => [4, 6, 4, 6],
            2 => [7, 7, 7, 0],
            3 => [5, 4, 5, 5],
            4 => [3, 6, 3, 6],
            _ => [0; 4],
        };
        match age {
            Age::A => lengths[0],
            Age::B => lengths[1],
            Age::C => lengths[2],
            Age::D => lengths[3],
            _ => 0,
        }
    }

    fn grapes_round(&self) -> Option<u32> {
        if self.variant != Variant::France {
            return None;
        }
        match self.players() {
            2 => Some(11),
            3 | 4 if self.has_option(GameOption::ShortGame) => Some(4),
            3 | 4 => Some(8),
            _ => None,
        }
    }

    fn stone_round(&self) -> Option<u32> {
        match self.players() {
            2 => Some(18),
            3 | 4 if self.has_option(GameOption::ShortGame) => Some(6),
            3 | 4 => Some(13),
            _ => None,
        }
    }

    /// Release the current age's buildings to the display and its
    /// settlements to every seat.
    pub(crate) fn add_new_age_buildings(&mut self) {
        self.record(format!("distribute age {} buildings and settlements", self.age), None);
        let released = self
            .catalogue
            .release(self.age, self.variant, self.player_count_key(), &self.options);
        self.available_buildings.extend(released);
        let settlements = self.catalogue.settlement_release(self.age);
        for seat in &mut self.seats {
            seat.settlements.extend(settlements.iter().copied());
        }
    }

    // === Phases ===

    /// Enter `phase` and keep following transitions until a phase waits for
    /// input.
    pub fn transition(&mut self, phase: Phase) {
        let mut next = Some(phase);
        while let Some(phase) = next {
            info!(?phase, round = ?self.round, "entering phase");
            self.phase = phase;
            next = self.enter(phase);
        }
    }

    fn enter(&mut self, phase: Phase) -> Option<Phase> {
        match phase {
            Phase::RoundStart => {
                let round = self.round.map_or(1, |r| r + 1);
                self.round = Some(round);
                self.round_start = (round as usize - 1) % self.players().max(1);
                Some(Phase::ReturnClergy)
            }
            Phase::ReturnClergy => {
                self.record(format!("starting round {}", self.round.unwrap_or(0)), None);
                let empty: Vec<SeatId> = self.seats.iter().filter(|s| s.clergy.is_empty()).map(|s| s.id).collect();
                for id in empty {
                    self.return_clergy(id, None);
                    self.record("return all clergy", Some(id));
                }
                Some(Phase::RotateProductionWheel)
            }
            Phase::RotateProductionWheel => Some(self.rotate_wheel()),
            Phase::Settlement => {
                self.turn = Some(1);
                let length = self.age_length(self.age);
                if length > 0 {
                    self.gameboard.house += length;
                    self.record(format!("move building marker to round {}", self.gameboard.house), None);
                }
                None
            }
            Phase::BonusRound => {
                let missing: Vec<SeatId> = self
                    .seats
                    .iter()
                    .filter(|s| !s.has_clergy(ClergyKind::Prior))
                    .map(|s| s.id)
                    .collect();
                for id in missing {
                    self.return_clergy(id, Some(ClergyKind::Prior));
                    self.record("return prior", Some(id));
                }
                self.turn = Some(1);
                None
            }
            Phase::Action | Phase::FinalAction => {
                self.turn = Some(1);
                None
            }
            // the start player moves on when RoundStart derives it from the round
            Phase::PassStartPlayer => Some(Phase::RoundStart),
            Phase::Endgame => {
                self.turn = None;
                info!(result = ?self.result(), "game over");
                None
            }
            Phase::Lobby | Phase::Setup | Phase::Broken => None,
        }
    }

    fn rotate_wheel(&mut self) -> Phase {
        let solo = self.is_solo();
        let caught = self.gameboard.rotate(solo);
        self.record("rotate production wheel", None);
        for event in caught {
            match event {
                Caught::Shifted(token) => self.record(format!("shift {token} ahead of production wheel"), None),
                Caught::Removed(token) => self.record(format!("remove {token} from game board"), None),
            }
        }

        let round = self.round.unwrap_or(0);
        let wheel = self.gameboard.wheel;
        if self.grapes_round() == Some(round) {
            self.gameboard.add_token(ResourceToken::Grapes, wheel);
            self.record("add grapes to game board", None);
        }
        if self.stone_round() == Some(round) {
            self.gameboard.add_token(ResourceToken::Stone, wheel);
            self.record("add stone to game board", None);
        }

        if self.gameboard.house == wheel {
            if let Some(next) = self.age.next() {
                let previous = std::mem::replace(&mut self.age, next);
                info!(age = %next, round, "age advanced");
                if previous == Age::D && self.players() >= 3 {
                    return Phase::BonusRound;
                }
                return Phase::Settlement;
            }
        }
        Phase::Action
    }

    /// End `seat`'s turn and advance the turn counter, moving on when every
    /// seat has had its turns.
    pub(crate) fn pass_turn(&mut self, seat: SeatId) -> Result<()> {
        let passing = self.seat_mut(seat)?;
        passing.actions_taken = 0;
        passing.landscape_purchased = false;

        let turn = self.turn.map_or(1, |t| t + 1);
        self.turn = Some(turn);
        let players = self.players() as u32;
        let next = match self.phase {
            Phase::Action => {
                // with three or four players the start player takes one more
                // turn at the end; a long two-player round ends once the turn
                // comes back to the start player
                let done = match players {
                    3 | 4 => turn - 1 > players,
                    2 if self.has_option(GameOption::LongGame) => turn > players,
                    _ => true,
                };
                done.then_some(Phase::PassStartPlayer)
            }
            Phase::Settlement if turn > players => Some(match (self.age, players) {
                (Age::E, _) => Phase::Endgame,
                (Age::D, 2) => {
                    self.add_new_age_buildings();
                    Phase::FinalAction
                }
                _ => {
                    self.add_new_age_buildings();
                    Phase::Action
                }
            }),
            Phase::BonusRound if turn > players => Some(Phase::Settlement),
            Phase::FinalAction if turn > players => Some(Phase::Endgame),
            _ => None,
        };
        if let Some(phase) = next {
            self.transition(phase);
        }
        Ok(())
    }

    // === Results ===

    /// Scores of the playing seats.
    #[must_use]
    pub fn scores(&self) -> Vec<(SeatId, Score)> {
        self.order
            .iter()
            .filter_map(|&id| self.seats.get(id.index()))
            .map(|seat| (seat.id, seat.score(&self.catalogue)))
            .collect()
    }

    /// The outcome, once the game has ended.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        (self.phase == Phase::Endgame).then(|| GameResult::from_scores(&self.scores()))
    }

    /// Read-only view for presentation.
    #[must_use]
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            phase: self.phase,
            age: self.age,
            round: self.round,
            turn: self.turn,
            action_seat: self.action_seat(),
            contract_price: self.contract_price,
            seats: self
                .seats
                .iter()
                .map(|seat| SeatSummary {
                    id: seat.id,
                    color: seat.color,
                    neutral: seat.neutral,
                    goods: seat.inventory.to_goods(),
                    clergy: seat.clergy.clone(),
                    settlements: seat.settlements.clone(),
                    score: seat.score(&self.catalogue),
                })
                .collect(),
            available_buildings: self.available_buildings.clone(),
            districts: self.districts.iter().map(|l| l.cost).collect(),
            plots: self.plots.iter().map(|l| l.cost).collect(),
            wheel: self.gameboard.values().collect(),
            ledger: self
                .ledger
                .iter()
                .map(|e| if e.rejected { format!("{} (rejected)", e.text) } else { e.text.clone() })
                .collect(),
            message: self.message.clone(),
        }
    }
}

/// Serializable snapshot of what players can see.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub phase: Phase,
    pub age: Age,
    pub round: Option<u32>,
    pub turn: Option<u32>,
    pub action_seat: Option<SeatId>,
    pub contract_price: u32,
    pub seats: Vec<SeatSummary>,
    pub available_buildings: Vec<CardId>,
    /// Prices of the districts for sale, in sale order.
    pub districts: Vec<u32>,
    pub plots: Vec<u32>,
    /// Tokens with their current production values.
    pub wheel: Vec<(ResourceToken, u32)>,
    pub ledger: Vec<String>,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatSummary {
    pub id: SeatId,
    pub color: Color,
    pub neutral: bool,
    pub goods: Goods,
    pub clergy: Vec<ClergyKind>,
    pub settlements: Vec<CardId>,
    pub score: Score,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn started(config: GameConfig) -> Game {
        let mut game = Game::new(config);
        game.finalize().unwrap();
        game.start().unwrap();
        game
    }

    #[test]
    fn test_new_game_is_bare() {
        let game = Game::new(GameConfig::new(3));
        assert_eq!(game.phase, Phase::Setup);
        assert_eq!(game.seats.len(), 3);
        assert!(game.seats.iter().all(|s| s.inventory.iter().next().is_none()));
        assert_eq!(game.districts.len(), 9);
        assert_eq!(game.action_seat(), None);
    }

    #[test]
    fn test_finalize_hands_out_start() {
        let mut game = Game::new(GameConfig::new(4));
        game.finalize().unwrap();
        assert_eq!(game.seats[2].inventory.count(GoodKind::Livestock), Decimal::ONE);
        assert_eq!(game.seats[0].settlements.len(), 4);
        assert!(!game.available_buildings.is_empty());
        assert_eq!(game.gameboard.house, 7);
        assert!(game.finalize().is_err());
    }

    #[test]
    fn test_solo_neutral_board() {
        let mut game = Game::new(GameConfig::new(1));
        game.finalize().unwrap();
        assert_eq!(game.seats.len(), 2);
        assert_eq!(game.players(), 1);
        let neutral = &game.seats[1];
        assert!(neutral.neutral);
        assert_eq!(
            neutral.board.space(Coordinate::new(30, 2)).and_then(Space::building).map(|b| b.id),
            Some(CardId::new("g13"))
        );
        assert!(neutral.board.space(Coordinate::new(31, 3)).is_some_and(Space::is_empty));
        assert_eq!(game.districts[0].cost, 8);
        assert!(game.seats[0].inventory.iter().next().is_none());
    }

    #[test]
    fn test_short_game_trims_boards() {
        let mut game = Game::new(GameConfig::new(3).with_option(GameOption::ShortGame));
        game.finalize().unwrap();
        let seat = &game.seats[0];
        assert_eq!(seat.clergy.len(), 2);
        assert!(seat.board.space(Coordinate::new(30, 2)).is_some_and(Space::is_empty));
        assert_eq!(seat.board.space(Coordinate::new(31, 2)).and_then(Space::card), Some(&Card::Moor));
        assert_eq!(game.gameboard.house, 3);
    }

    #[test]
    fn test_start_enters_first_action() {
        let game = started(GameConfig::new(3));
        assert_eq!(game.phase, Phase::Action);
        assert_eq!(game.round, Some(1));
        assert_eq!(game.turn, Some(1));
        assert_eq!(game.action_seat(), Some(SeatId(0)));
        let texts: Vec<_> = game.ledger.iter().map(|e| e.text.as_str()).collect();
        assert!(texts.contains(&"starting round 1"));
        assert!(texts.contains(&"rotate production wheel"));
    }

    #[test]
    fn test_three_player_turns_wrap() {
        let mut game = started(GameConfig::new(3));
        let mut seen = Vec::new();
        for _ in 0..4 {
            let seat = game.action_seat().unwrap();
            seen.push(seat);
            game.pass_turn(seat).unwrap();
        }
        assert_eq!(seen, vec![SeatId(0), SeatId(1), SeatId(2), SeatId(0)]);
        assert_eq!(game.round, Some(2));
        assert_eq!(game.action_seat(), Some(SeatId(1)));
    }

    #[test]
    fn test_house_caught_enters_settlement() {
        let mut game = started(GameConfig::new(3));
        game.gameboard.house = game.gameboard.wheel + 1;
        for _ in 0..4 {
            let seat = game.action_seat().unwrap();
            game.pass_turn(seat).unwrap();
        }
        assert_eq!(game.phase, Phase::Settlement);
        assert_eq!(game.age, Age::A);
        // A lasts five rounds with three players
        assert_eq!(game.gameboard.house, game.gameboard.wheel + 5);

        for _ in 0..3 {
            let seat = game.action_seat().unwrap();
            game.pass_turn(seat).unwrap();
        }
        assert_eq!(game.phase, Phase::Action);
        assert!(game.seats[0].settlements.contains(&CardId::new("s05")));
    }

    #[test]
    fn test_grapes_enter_in_france() {
        let mut game = started(GameConfig::new(4));
        while game.round < Some(8) {
            let seat = game.action_seat().unwrap();
            game.pass_turn(seat).unwrap();
        }
        assert!(game.gameboard.contains(ResourceToken::Grapes));
        assert!(!game.gameboard.contains(ResourceToken::Stone));
    }

    #[test]
    fn test_return_clergy_goes_to_owner() {
        let mut game = started(GameConfig::new(3));
        let at = Coordinate::new(31, 4);
        assert!(game.seats[1].take_clergy(ClergyKind::Prior));
        let prior = Clergy { kind: ClergyKind::Prior, owner: SeatId(1) };
        game.assign_clergy(SeatId(0), at, prior, false).unwrap();
        game.return_clergy(SeatId(0), Some(ClergyKind::LayBrother));
        assert!(!game.seats[1].has_clergy(ClergyKind::Prior));
        game.return_clergy(SeatId(0), None);
        assert!(game.seats[1].has_clergy(ClergyKind::Prior));
    }

    #[test]
    fn test_contract_price_rises() {
        let mut game = Game::new(GameConfig::new(3));
        game.available_buildings.push(CardId::new("f21"));
        let cost = game.catalogue.building(CardId::new("f21")).unwrap().cost.clone();
        game.seats[0].inventory.gain(&cost).unwrap();
        game.build_building(SeatId(0), Coordinate::new(30, 5), CardId::new("f21")).unwrap();
        assert_eq!(game.contract_price, 2);
        assert!(game.available_buildings.is_empty());
    }

    #[test]
    fn test_summary_serializes() {
        let game = started(GameConfig::new(2));
        let summary = game.summary();
        let json = serde_json::to_string(&summary).unwrap();
        let back: GameSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, back);
        assert_eq!(back.seats.len(), 2);
    }
}
