//! Applying command lines to a game and replaying the command log.
//!
//! A line may chain several commands with `;`. The whole line applies
//! atomically: the game is cloned first and restored if any command in the
//! chain fails. Each command is checked in a fixed order before it mutates
//! anything:
//!
//! 1. grammar (syntax errors)
//! 2. phase, executor, turn and open interactions (structural errors)
//! 3. ledger entry
//! 4. execution (value errors)
//!
//! A line that fails after its ledger entry was written leaves a rejected
//! entry behind, and `submit` keeps it in the log marked as rejected.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::command::{Command, ExecutorRule, SetupStep};
use super::grammar;
use super::pending::Pending;
use crate::board::{Clergy, ClergyKind, LandscapeKind, LandscapeSide};
use crate::cards::CardId;
use crate::core::{Color, Phase, ReplayPolicy, SeatId};
use crate::effects::{BuildingRef, Criteria, Step, StepContext, StepParams, Validation};
use crate::error::{EngineError, Result};
use crate::goods::{Good, GoodKind, Goods};
use crate::rules::{Game, LogStore};

impl Game {
    /// Apply one line as `executor`.
    pub fn apply(&mut self, executor: Option<SeatId>, line: &str) -> Result<()> {
        if self.phase == Phase::Broken {
            return Err(EngineError::GameBroken(self.message.clone().unwrap_or_default()));
        }
        let parts: Vec<String> = line
            .split(';')
            .map(|part| part.trim().to_lowercase())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            return Err(EngineError::UnknownCommand(line.to_string()));
        }

        let snapshot = self.clone();
        for part in &parts {
            if let Err(err) = self.apply_command(executor, part) {
                debug!(line = %part, error = %err, "command failed");
                let attempted = self.ledger.len() > snapshot.ledger.len();
                *self = snapshot;
                if attempted {
                    self.record_rejected(line.trim(), executor);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Apply every record of `store` the game has not seen yet. Returns how
    /// many records applied.
    ///
    /// A record rejected during setup breaks the game for good. Later
    /// rejections follow the configured [`ReplayPolicy`].
    pub fn sync(&mut self, store: &impl LogStore) -> Result<usize> {
        let mut applied = 0;
        for record in store.records_after(self.watermark) {
            if record.rejected {
                self.record_rejected(record.text.trim(), record.executor);
                self.rejected.push(record.id);
                self.watermark = Some(record.id);
                continue;
            }
            let before = self.ledger.len();
            if let Err(err) = self.apply(record.executor, &record.text) {
                let rejected = EngineError::Rejected {
                    record: record.id,
                    line: record.text.clone(),
                    source: Box::new(err),
                };
                warn!(record = record.id, line = %record.text, error = %rejected, "record rejected");
                if self.phase == Phase::Setup {
                    self.phase = Phase::Broken;
                    self.message = Some(rejected.to_string());
                    return Err(rejected);
                }
                match self.config().replay_policy {
                    ReplayPolicy::Halt => {
                        // the record is retried on the next sync
                        self.ledger.truncate(before);
                        self.message = Some(rejected.to_string());
                        return Err(rejected);
                    }
                    ReplayPolicy::SkipRejected => self.rejected.push(record.id),
                }
            } else {
                applied += 1;
            }
            self.watermark = Some(record.id);
        }
        if applied > 0 {
            info!(applied, watermark = ?self.watermark, "replayed log");
        }
        Ok(applied)
    }

    /// Apply a new line and append it to `store`. Returns the new record's
    /// id.
    ///
    /// A line that fails before its ledger entry (bad grammar, wrong phase,
    /// not the executor's turn) is not stored. One that fails later is
    /// stored marked as rejected, and the error is still returned.
    pub fn submit(&mut self, store: &mut impl LogStore, executor: Option<SeatId>, line: &str) -> Result<u64> {
        if store.last_id() > self.watermark {
            return Err(EngineError::UnappliedCommands);
        }
        let before = self.ledger.len();
        if let Err(err) = self.apply(executor, line) {
            if self.ledger.len() > before {
                let id = store.append_rejected(executor, line);
                self.rejected.push(id);
                self.watermark = Some(id);
            }
            return Err(err);
        }
        let id = store.append(executor, line);
        self.watermark = Some(id);
        Ok(id)
    }

    fn apply_command(&mut self, executor: Option<SeatId>, text: &str) -> Result<()> {
        let command = grammar::parse(text)?;
        if command == Command::Comment {
            return Ok(());
        }
        self.check(&command, executor)?;
        self.record(text, executor);

        let name = command.name();
        let actor = || executor.ok_or_else(|| EngineError::ExecutorRequired(name.to_string()));
        let counts = command.counts_as_action();
        match command {
            Command::Comment => {}
            Command::SetOption(option) => self.add_option(option)?,
            Command::Setup(SetupStep::Variant(variant)) => self.set_variant(variant),
            Command::Setup(SetupStep::Finalize) => self.finalize()?,
            Command::Setup(SetupStep::Start) => self.start()?,
            Command::Convert { from, to } => self.convert(actor()?, from, to)?,
            Command::Buy { kind, side, row } => self.buy_landscape(actor()?, kind, side, row)?,
            Command::BuildBuilding(text) => self.run_step(actor()?, &Step::build_building(false), &text)?,
            Command::BuildSettlement(text) => self.run_step(actor()?, &Step::build_settlement(), &text)?,
            Command::Pass => self.pass(actor()?)?,
            Command::FellTrees(text) => self.run_step(actor()?, &Step::FellTrees, &text)?,
            Command::CutPeat(text) => self.run_step(actor()?, &Step::CutPeat, &text)?,
            Command::PlaceToUse { clergy, id, args } => self.place_to_use(actor()?, clergy, id, args.as_deref())?,
            Command::PayToUse { payment, owner, id, args } => {
                self.pay_to_use(actor()?, payment, owner, id, args.as_deref())?;
            }
            Command::PlaceClergy(clergy) => self.place_clergy(actor()?, clergy)?,
            Command::Continue { id, args } => self.continue_use(id, args.as_deref())?,
        }
        if counts {
            self.seat_mut(actor()?)?.actions_taken += 1;
        }
        Ok(())
    }

    fn check(&self, command: &Command, executor: Option<SeatId>) -> Result<()> {
        let name = command.name();
        if !command.phases().contains(&self.phase) {
            return Err(EngineError::InvalidPhase { command: name.to_string(), phase: self.phase.to_string() });
        }
        match (command.executor(), executor) {
            (ExecutorRule::Required, None) => return Err(EngineError::ExecutorRequired(name.to_string())),
            (ExecutorRule::Forbidden, Some(_)) => return Err(EngineError::ExecutorForbidden(name.to_string())),
            _ => {}
        }
        if let Some(seat) = executor {
            self.seat(seat)?;
        }
        if let Some(expected) = self.action_seat() {
            if executor != Some(expected) {
                return Err(EngineError::InvalidActor {
                    expected: expected.to_string(),
                    found: executor.map_or_else(|| "no executor".to_string(), |s| s.to_string()),
                });
            }
        }
        if let Some(frame) = self.pending.last() {
            let answers = matches!(
                (frame, command),
                (Pending::ClergyChoice { .. }, Command::PlaceClergy(_))
                    | (Pending::AwaitingUse { .. }, Command::Continue { .. })
            );
            if !answers {
                return Err(EngineError::InterruptsPending {
                    command: name.to_string(),
                    waiting: frame.name().to_string(),
                });
            }
        }
        Ok(())
    }

    fn run_step(&mut self, seat: SeatId, step: &Step, text: &str) -> Result<()> {
        let mut cx = StepContext::new(self, seat);
        step.execute(&mut cx, Validation::new(Some(text)), &StepParams::default())?
            .finish(text)?;
        Ok(())
    }

    fn pass(&mut self, seat: SeatId) -> Result<()> {
        let required = self.actions_required(seat);
        if self.seat(seat)?.actions_taken < required {
            return Err(EngineError::ActionRequired(format!("{required} action(s) before passing")));
        }
        self.pass_turn(seat)
    }

    fn convert(&mut self, seat: SeatId, from: Good, to: Good) -> Result<()> {
        let (give, take) = match (from.kind, to.kind) {
            (GoodKind::Grain, GoodKind::Straw) | (GoodKind::Wine, GoodKind::Coin) => (1, 1),
            (GoodKind::Whiskey, GoodKind::Coin) => (1, 2),
            _ => return Err(EngineError::InvalidConversion { from: from.kind, to: to.kind }),
        };
        if from.count.is_zero() || from.count * Decimal::from(take) != to.count * Decimal::from(give) {
            return Err(EngineError::arguments(format!("{} {} to {} {}", from.count, from.kind, to.count, to.kind)));
        }
        let inventory = &mut self.seat_mut(seat)?.inventory;
        inventory.spend(&Goods::from(from))?;
        inventory.gain(&Goods::from(to))?;
        debug!(%seat, from = %from.kind, to = %to.kind, count = %from.count, "converted goods");
        Ok(())
    }

    fn buy_landscape(&mut self, seat: SeatId, kind: LandscapeKind, side: LandscapeSide, row: i32) -> Result<()> {
        if self.seat(seat)?.landscape_purchased {
            return Err(EngineError::LandscapeAlreadyPurchased);
        }
        let mut tile = self.landscapes(kind).first().cloned().ok_or(EngineError::NoLandscapeAvailable)?;
        tile.place(side, row);
        let cost = Goods::from([(GoodKind::Coin, tile.cost)]);

        let buyer = self.seat_mut(seat)?;
        let column = tile.column();
        if !buyer.board.available_positions(kind, Some(column)).contains(&(row, column)) {
            return Err(EngineError::InvalidLandscapePosition(row));
        }
        buyer.inventory.spend(&cost)?;
        buyer.board.add(tile);
        buyer.landscape_purchased = true;
        self.landscapes_mut(kind)?.remove(0);
        debug!(%seat, kind = kind.name(), row, "bought landscape");
        Ok(())
    }

    /// Where `id` stands on `owner`'s board.
    fn locate(&self, owner: SeatId, id: CardId) -> Option<BuildingRef> {
        let at = self.seat(owner).ok()?.board.find_building(id)?;
        Some(BuildingRef { seat: owner, at: Some(at), id })
    }

    fn put_to_work(&mut self, target: BuildingRef, clergy: Clergy, bonus: bool) -> Result<()> {
        let at = target.at.ok_or_else(|| EngineError::BuildingNotFound(target.id.to_string()))?;
        self.assign_clergy(target.seat, at, clergy, bonus)
    }

    /// Run `target`'s function for `user`.
    fn use_target(&mut self, user: SeatId, target: BuildingRef, args: Option<&str>) -> Result<()> {
        let text = match args {
            Some(args) => format!("use {} to {args}", target.id),
            None => format!("use {}", target.id),
        };
        self.run_step(user, &Step::use_building(Criteria::Only(target)), &text)
    }

    /// Own clergy into a building of one's own. In the bonus round any
    /// board will do and occupied buildings are allowed.
    fn place_to_use(&mut self, seat: SeatId, clergy: ClergyKind, id: CardId, args: Option<&str>) -> Result<()> {
        let bonus = self.phase == Phase::BonusRound;
        let target = match self.locate(seat, id) {
            Some(target) => Some(target),
            None if bonus => self.seats.iter().find_map(|s| self.locate(s.id, id)),
            None => None,
        }
        .ok_or_else(|| EngineError::BuildingNotFound(id.to_string()))?;

        if !self.seat_mut(seat)?.take_clergy(clergy) {
            return Err(EngineError::ClergyNotAvailable);
        }
        self.put_to_work(target, Clergy { kind: clergy, owner: seat }, bonus)?;
        self.use_target(seat, target, args)
    }

    /// Work contract: pay another seat to have its clergy work its building.
    fn pay_to_use(&mut self, payer: SeatId, payment: Good, owner: Color, id: CardId, args: Option<&str>) -> Result<()> {
        let owner = self
            .seat_by_color(owner)
            .map(|s| s.id)
            .ok_or_else(|| EngineError::arguments(format!("no seat color {owner}")))?;
        if owner == payer {
            return Err(EngineError::InvalidPayment("you can't pay yourself".into()));
        }
        let target = self.locate(owner, id).ok_or_else(|| EngineError::BuildingNotFound(id.to_string()))?;
        let kinds = self.seat(owner)?.clergy_kinds();
        if kinds.is_empty() {
            return Err(EngineError::ClergyNotAvailable);
        }
        let accepted = match payment.kind {
            GoodKind::Coin => payment.count == Decimal::from(self.contract_price),
            GoodKind::Wine | GoodKind::Whiskey => payment.count == Decimal::ONE,
            _ => false,
        };
        if !accepted {
            return Err(EngineError::InvalidPayment(format!("{} {}", payment.count, payment.kind)));
        }
        if kinds.len() > 1 && args.is_some() {
            return Err(EngineError::arguments("the owner has to choose a clergy first"));
        }

        let paid = Goods::from(payment);
        self.seat_mut(payer)?.inventory.spend(&paid)?;
        if payment.kind == GoodKind::Coin {
            self.seat_mut(owner)?.inventory.gain(&paid)?;
        }
        info!(%payer, %owner, building = %id, "work contract");

        match kinds.as_slice() {
            [kind] => {
                self.seat_mut(owner)?.take_clergy(*kind);
                self.put_to_work(target, Clergy { kind: *kind, owner }, false)?;
                self.use_target(payer, target, args)
            }
            _ => {
                self.pending.push(Pending::ClergyChoice { payer, building: target });
                Ok(())
            }
        }
    }

    /// The building owner's clergy choice for an open work contract.
    fn place_clergy(&mut self, seat: SeatId, kind: ClergyKind) -> Result<()> {
        let Some(&Pending::ClergyChoice { payer, building }) = self.pending.last() else {
            return Err(EngineError::NoPendingInteraction(format!("place {kind}")));
        };
        if !self.seat_mut(seat)?.take_clergy(kind) {
            return Err(EngineError::ClergyNotAvailable);
        }
        self.put_to_work(building, Clergy { kind, owner: seat }, false)?;
        self.pending.pop();
        self.pending.push(Pending::AwaitingUse { payer, building });
        Ok(())
    }

    /// The payer's use of a building whose clergy has been placed.
    fn continue_use(&mut self, id: CardId, args: Option<&str>) -> Result<()> {
        let Some(&Pending::AwaitingUse { payer, building }) = self.pending.last() else {
            return Err(EngineError::NoPendingInteraction(format!("use {id}")));
        };
        if building.id != id {
            return Err(EngineError::BuildingNotFound(id.to_string()));
        }
        self.pending.pop();
        self.use_target(payer, building, args)
    }
}
