//! Step execution.
//!
//! [`Step::execute`] reads its clause from the front of the validation's
//! remaining text, checks it against the game, mutates the acting seat, and
//! hands the rest to its child. Text a step does not recognise is a soft
//! failure (`success == false`) so that joiners can try something else;
//! inventory and board errors after validation are hard errors.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

use super::grammar;
use super::step::Step;
use super::targeting::{BuildingRef, Criteria};
use super::validation::{StepParams, Validation};
use crate::board::{Card, ClergyKind, Clergy, Coordinate, LandscapeKind, Terrain};
use crate::cards::CardId;
use crate::core::SeatId;
use crate::error::{EngineError, Result};
use crate::goods::{Good, GoodKind, Goods};
use crate::rules::{Game, ResourceToken, Seat};

/// The game and acting seat a function runs against.
pub struct StepContext<'a> {
    pub game: &'a mut Game,
    pub seat: SeatId,
    /// The building whose function is running.
    pub source: Option<BuildingRef>,
    active: SmallVec<[CardId; 4]>,
}

impl<'a> StepContext<'a> {
    pub fn new(game: &'a mut Game, seat: SeatId) -> Self {
        Self {
            game,
            seat,
            source: None,
            active: SmallVec::new(),
        }
    }

    pub fn seat(&self) -> Result<&Seat> {
        self.game.seat(self.seat)
    }

    pub fn seat_mut(&mut self) -> Result<&mut Seat> {
        self.game.seat_mut(self.seat)
    }

    /// Whether `id` is already running somewhere up the chain.
    #[must_use]
    pub fn is_active(&self, id: CardId) -> bool {
        self.active.contains(&id)
    }

    /// Run `target`'s function with `text`, making it the source for the
    /// duration of the call.
    pub fn use_building(&mut self, target: BuildingRef, text: Option<&str>) -> Result<Validation> {
        let catalogue = Arc::clone(&self.game.catalogue);
        let def = catalogue
            .building(target.id)
            .ok_or_else(|| EngineError::BuildingNotFound(target.id.to_string()))?;
        debug!(seat = %self.seat, building = %target.id, "using building");

        self.active.push(target.id);
        let previous = self.source.replace(target);
        let result = def.function.execute(self, text);
        self.source = previous;
        self.active.pop();
        result
    }
}

/// Run `next` on `text`, or leave `text` as the remainder when there is no
/// child.
fn descend(
    next: Option<&Step>,
    cx: &mut StepContext<'_>,
    v: &mut Validation,
    text: Option<String>,
    params: StepParams,
) -> Result<()> {
    match next {
        Some(step) => {
            let child = step.execute(cx, v.carrying(text), &params)?;
            v.merge(child);
        }
        None => v.remaining = text,
    }
    Ok(())
}

/// After a spend step's child ran: a residue of `and …` belongs to whatever
/// follows the spend; any other residue is an error.
fn close_spend(v: &mut Validation, after: Option<String>) {
    let residue = v.remaining.take();
    let after = match (residue, after) {
        (None, after) => after,
        (Some(rest), None) => match rest.strip_prefix("and ") {
            Some(tail) => Some(tail.trim().to_string()),
            None => {
                v.reject();
                Some(rest)
            }
        },
        (Some(rest), Some(after)) => {
            v.reject();
            Some(format!("{rest} and {after}"))
        }
    };
    v.remaining = after;
}

fn collect(goods: Vec<Good>) -> Goods {
    goods.into_iter().collect()
}

fn whole(count: Decimal) -> u32 {
    count.trunc().to_u32().unwrap_or(u32::MAX)
}

fn first_missing(seat: &Seat, goods: &Goods) -> Option<EngineError> {
    goods.iter().find_map(|g| {
        let available = seat.inventory.count(g.kind);
        (available < g.count).then_some(EngineError::InsufficientGoods {
            good: g.kind,
            needed: g.count,
            available,
        })
    })
}

/// Goods of `pool` left after meeting the concrete part of `required`, or
/// `None` when it cannot be met.
fn meet_concrete(pool: &Goods, required: &Goods) -> Option<Goods> {
    let concrete: Goods = required.concrete().copied().collect();
    pool.checked_sub(&concrete).ok()
}

impl Step {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Step::SpendExact { .. } => "spend",
            Step::SpendBreaks { .. } => "spend-breaks",
            Step::SpendChoices { .. } => "spend-choices",
            Step::SpendUnique { .. } => "spend-unique",
            Step::HaveBreaks { .. } => "have-breaks",
            Step::GainExact { .. } => "gain",
            Step::GainBreaks { .. } => "gain-breaks",
            Step::GainChoices { .. } => "gain-choices",
            Step::RemoveForest { .. } => "remove-forest",
            Step::RemoveMoor { .. } => "remove-moor",
            Step::UseProductionWheel { .. } => "production-wheel",
            Step::UseBuilding { .. } => "use-building",
            Step::BuildBuilding { .. } => "build-building",
            Step::BuildSettlement { .. } => "build-settlement",
            Step::SwapTokens => "swap-tokens",
            Step::FellTrees => "fell-trees",
            Step::CutPeat => "cut-peat",
            Step::PlaceLandscape(_) => "place-landscape",
            Step::AndOr(..) => "and-or",
            Step::AndConditional(..) => "and-conditional",
        }
    }

    /// Run this step against `input`.
    pub fn execute(&self, cx: &mut StepContext<'_>, input: Validation, params: &StepParams) -> Result<Validation> {
        trace!(step = self.name(), seat = %cx.seat, text = input.text(), "step");
        let mut v = input;
        match self {
            Step::SpendExact { goods, max, next } => spend_exact(cx, &mut v, goods, *max, next.as_deref())?,
            Step::SpendBreaks { breaks, next } => spend_breaks(cx, &mut v, breaks, next.as_deref())?,
            Step::SpendChoices { choices, max, scales, next } => {
                spend_choices(cx, &mut v, choices, *max, scales.as_deref(), next.as_deref())?
            }
            Step::SpendUnique { allowed, count, next } => spend_unique(cx, &mut v, allowed, *count, next.as_deref())?,
            Step::HaveBreaks { breaks, next } => {
                let seat = cx.seat()?;
                let index = breaks.iter().rposition(|b| seat.inventory.has(b));
                if let Some(step) = next {
                    let child = step.execute(cx, v.clone(), &StepParams { index, ..StepParams::default() })?;
                    v.merge(child);
                }
            }
            Step::GainExact { .. } => gain_exact(cx, &mut v, self, params)?,
            Step::GainBreaks { breaks, next } => {
                if let Some(index) = params.index {
                    let Some(goods) = breaks.get(index) else {
                        v.fail(EngineError::InvalidIndex(Some(index)));
                        return Ok(v);
                    };
                    cx.seat_mut()?.inventory.gain(goods)?;
                    if let Some(step) = next {
                        let child = step.execute(cx, v.clone(), &StepParams::index(index))?;
                        v.merge(child);
                    }
                }
            }
            Step::GainChoices { choices, distinct, next } => {
                gain_choices(cx, &mut v, choices, *distinct, next.as_deref(), params)?
            }
            Step::RemoveForest { max, next } => remove(cx, &mut v, Card::Forest, *max, next.as_deref())?,
            Step::RemoveMoor { max, next } => remove(cx, &mut v, Card::Moor, *max, next.as_deref())?,
            Step::UseProductionWheel { tokens, next } => production_wheel(cx, &mut v, tokens, next.as_deref())?,
            Step::UseBuilding { criteria, next } => use_building(cx, &mut v, criteria, next.as_deref())?,
            Step::BuildBuilding { return_prior, next } => build_building(cx, &mut v, *return_prior, next.as_deref())?,
            Step::BuildSettlement { next } => build_settlement(cx, &mut v, next.as_deref())?,
            Step::SwapTokens => swap_tokens(cx, &mut v)?,
            Step::FellTrees => strip(cx, &mut v, "fell-trees", Card::Forest, ResourceToken::Wood)?,
            Step::CutPeat => strip(cx, &mut v, "cut-peat", Card::Moor, ResourceToken::Peat)?,
            Step::PlaceLandscape(kind) => place_landscape(cx, &mut v, *kind)?,
            Step::AndOr(first, second) => and_or(cx, &mut v, first, second, params)?,
            Step::AndConditional(first, second) => and_conditional(cx, &mut v, first, second, params)?,
        }
        Ok(v)
    }
}

// === Spending ===

fn spend_exact(
    cx: &mut StepContext<'_>,
    v: &mut Validation,
    required: &Goods,
    max: Option<u32>,
    next: Option<&Step>,
) -> Result<()> {
    let Some(text) = v.remaining.clone() else {
        return descend(next, cx, v, None, StepParams::count(0));
    };
    let Some(clause) = grammar::parse_spend(&text)? else {
        v.reject();
        return Ok(());
    };
    let spent = collect(clause.goods);

    for good in spent.iter() {
        let counts = required.contains(good.kind)
            || required.virtuals().any(|(currency, _)| !good.virtual_total(currency).is_zero());
        if !counts {
            v.fail(EngineError::GoodsNotAllowed(good.kind));
            return Ok(());
        }
    }

    let mut count: Option<Decimal> = None;
    for req in required.concrete() {
        let Some(paid) = spent.get(req.kind) else {
            v.reject();
            return Ok(());
        };
        let ratio = paid.count / req.count;
        if let Some(max) = max {
            if ratio > Decimal::from(max) {
                v.fail(EngineError::TooManyGoods { count: whole(ratio.ceil()), max });
                return Ok(());
            }
        }
        if !ratio.fract().is_zero() {
            v.fail(EngineError::FractionalGoods { good: req.kind, count: ratio });
            return Ok(());
        }
        match count {
            Some(c) if c != ratio => {
                v.reject();
                return Ok(());
            }
            _ => count = Some(ratio),
        }
    }

    let mut leftover = v.leftover;
    for (currency, req) in required.virtuals() {
        let total = v.leftover[currency.index()] + spent.virtual_total(currency);
        let mut available = (total / req.count).floor();
        if let Some(max) = max {
            available = available.min(Decimal::from(max));
        }
        let used = match count {
            Some(c) if available < c => {
                v.fail(EngineError::InsufficientGoods { good: currency.kind(), needed: req.count * c, available: total });
                return Ok(());
            }
            Some(c) => c,
            None if available.is_zero() => {
                v.fail(EngineError::InsufficientGoods { good: currency.kind(), needed: req.count, available: total });
                return Ok(());
            }
            None => available,
        };
        count = Some(used);
        leftover[currency.index()] = total - used * req.count;
    }

    let count = count.unwrap_or(Decimal::ZERO);
    if let Some(max) = max {
        if count > Decimal::from(max) {
            v.fail(EngineError::TooManyGoods { count: whole(count), max });
            return Ok(());
        }
    }

    cx.seat_mut()?.inventory.spend(&spent)?;
    v.leftover = leftover;
    debug!(seat = %cx.seat, goods = %spent, count = %count, "spent");

    descend(next, cx, v, clause.next, StepParams::count(whole(count)))?;
    close_spend(v, clause.after);
    Ok(())
}

/// Index of the highest threshold `pool` covers.
fn highest_break(pool: &Goods, breaks: &[Goods]) -> Option<usize> {
    breaks.iter().rposition(|threshold| {
        let Some(rest) = meet_concrete(pool, threshold) else {
            return false;
        };
        threshold
            .virtuals()
            .all(|(currency, req)| rest.virtual_total(currency) >= req.count)
    })
}

fn spend_breaks(cx: &mut StepContext<'_>, v: &mut Validation, breaks: &[Goods], next: Option<&Step>) -> Result<()> {
    let Some(text) = v.remaining.clone() else {
        return Ok(());
    };
    let Some(clause) = grammar::parse_spend(&text)? else {
        v.reject();
        return Ok(());
    };
    let spent = collect(clause.goods);
    let index = highest_break(&spent, breaks);
    cx.seat_mut()?.inventory.spend(&spent)?;
    debug!(seat = %cx.seat, goods = %spent, ?index, "spent towards threshold");

    match index {
        Some(index) => descend(next, cx, v, clause.next, StepParams::index(index))?,
        None => v.remaining = clause.next,
    }
    close_spend(v, clause.after);
    Ok(())
}

fn spend_choices(
    cx: &mut StepContext<'_>,
    v: &mut Validation,
    choices: &[Goods],
    max: Option<u32>,
    scales: Option<&[u32]>,
    next: Option<&Step>,
) -> Result<()> {
    let Some(clause) = grammar::parse_spend(v.text())? else {
        v.reject();
        return Ok(());
    };
    let spent = collect(clause.goods);
    let mut pool = spent.clone();
    let mut indices = Vec::new();

    for (index, choice) in choices.iter().enumerate() {
        if choice.concrete().next().is_some() {
            match meet_concrete(&pool, choice) {
                Some(rest) => {
                    pool = rest;
                    indices.push(index);
                }
                None => continue,
            }
        }
        let mut times: Option<Decimal> = None;
        for (currency, req) in choice.virtuals() {
            let worth = pool.virtual_total(currency);
            pool = pool.iter().filter(|g| g.virtual_total(currency).is_zero()).copied().collect();
            let n = (worth / req.count).floor();
            times = Some(times.map_or(n, |t| t.min(n)));
        }
        for _ in 0..times.map_or(0, whole) {
            indices.push(index);
        }
    }

    if pool.iter().any(|g| !g.count.is_zero()) {
        v.fail(EngineError::UnspentGoods);
        return Ok(());
    }

    let count = match scales {
        Some(scales) => indices.iter().map(|&i| scales.get(i).copied().unwrap_or(1)).sum(),
        None => indices.len() as u32,
    };
    if let Some(max) = max {
        if count > max {
            v.fail(EngineError::TooManyGoods { count, max });
            return Ok(());
        }
    }

    cx.seat_mut()?.inventory.spend(&spent)?;
    debug!(seat = %cx.seat, goods = %spent, ?indices, "spent on choices");

    let params = StepParams {
        count: Some(indices.len() as u32),
        indices: Some(indices),
        ..StepParams::default()
    };
    descend(next, cx, v, clause.next, params)?;
    close_spend(v, clause.after);
    Ok(())
}

fn spend_unique(
    cx: &mut StepContext<'_>,
    v: &mut Validation,
    allowed: &[Good],
    count: u32,
    next: Option<&Step>,
) -> Result<()> {
    let Some(clause) = grammar::parse_spend(v.text())? else {
        v.reject();
        return Ok(());
    };
    let five_coin = Good::units(GoodKind::Coin, 5);
    let mut spent = Goods::new();
    for good in clause.goods {
        if good.count != Decimal::ONE && good != five_coin {
            return Err(EngineError::TooManyGoods { count: whole(good.count), max: 1 });
        }
        if spent.contains(good.kind) {
            return Err(EngineError::DuplicateGoods(good.kind));
        }
        spent.insert(good);
    }
    if spent.len() != count as usize {
        v.fail(EngineError::WrongGoodsCount { expected: count, found: spent.len() as u32 });
        return Ok(());
    }
    if let Some(good) = spent.iter().find(|g| !allowed.contains(g)) {
        return Err(EngineError::GoodsNotAllowed(good.kind));
    }

    cx.seat_mut()?.inventory.spend(&spent)?;
    debug!(seat = %cx.seat, goods = %spent, "spent distinct goods");

    descend(next, cx, v, clause.next, StepParams::count(1))?;
    close_spend(v, clause.after);
    Ok(())
}

// === Gaining ===

fn gain_exact(cx: &mut StepContext<'_>, v: &mut Validation, step: &Step, params: &StepParams) -> Result<()> {
    let Step::GainExact { goods, lookup, pool, count: fixed, per, next } = step else {
        return Ok(());
    };
    let declared = match lookup {
        Some(lookup) => lookup.goods(cx.game),
        None => goods.clone(),
    };
    let count = match (per, fixed) {
        (Some(per), _) => per.count(cx.game, cx.seat),
        (None, Some(fixed)) => *fixed,
        (None, None) => params.count.unwrap_or(1),
    };

    if fixed.is_some() {
        cx.seat_mut()?.inventory.gain(&declared.scale(Decimal::from(count)))?;
        if let Some(step) = next {
            let child = step.execute(cx, v.clone(), &StepParams::default())?;
            v.merge(child);
        }
        return Ok(());
    }

    let (requested, rest) = match (&v.remaining, params.count) {
        (None, Some(_)) => (None, None),
        (remaining, _) => match grammar::parse_gain(remaining.as_deref().unwrap_or(""))? {
            Some((goods, rest)) => (Some(collect(goods)), rest),
            None => {
                v.reject();
                return Ok(());
            }
        },
    };

    let gained = match (pool, requested) {
        (Some(_), None) => Goods::new(),
        (Some(pool), Some(requested)) => {
            if let Some(good) = requested.iter().find(|g| !pool.contains(g.kind)) {
                v.fail(EngineError::GoodsNotAllowed(good.kind));
                return Ok(());
            }
            for (currency, bound) in declared.virtuals() {
                let allowed = bound.count * Decimal::from(count);
                let total = requested.virtual_total(currency);
                if total > allowed {
                    v.fail(EngineError::GainExceeded { good: currency.kind(), requested: total, allowed });
                    return Ok(());
                }
            }
            requested
        }
        (None, None) => declared.scale(Decimal::from(count)),
        (None, Some(requested)) => {
            let expected = declared.scale(Decimal::from(count));
            if let Some(good) = requested.iter().find(|g| !declared.contains(g.kind)) {
                v.fail(EngineError::GoodsNotAllowed(good.kind));
                return Ok(());
            }
            if requested != expected {
                v.fail(EngineError::UnexpectedGain { expected: expected.to_string(), found: requested.to_string() });
                return Ok(());
            }
            requested
        }
    };

    cx.seat_mut()?.inventory.gain(&gained)?;
    debug!(seat = %cx.seat, goods = %gained, "gained");
    v.remaining = rest;
    if let Some(step) = next {
        let child = step.execute(cx, v.clone(), &StepParams::default())?;
        v.merge(child);
    }
    Ok(())
}

fn gain_choices(
    cx: &mut StepContext<'_>,
    v: &mut Validation,
    choices: &[Goods],
    distinct: bool,
    next: Option<&Step>,
    params: &StepParams,
) -> Result<()> {
    let (picked, multiplier, rest) = match &params.indices {
        Some(indices) => (indices.clone(), Decimal::ONE, None),
        None => {
            let Some((goods, rest)) = grammar::parse_gain(v.text())? else {
                v.reject();
                return Ok(());
            };
            let requested = collect(goods);
            let multiplier = Decimal::from(params.count.unwrap_or(1));
            let allowed_by_token = |choice: &Goods| match params.token {
                None | Some(ResourceToken::Joker) => true,
                Some(token) => token.good().is_some_and(|kind| choice.contains(kind)),
            };
            let found = choices
                .iter()
                .position(|c| c.scale(multiplier) == requested && allowed_by_token(c));
            match found {
                Some(index) => (vec![index], multiplier, rest),
                None => {
                    v.fail(EngineError::ChoiceMismatch(requested.to_string()));
                    return Ok(());
                }
            }
        }
    };

    v.remaining = rest;
    for index in picked {
        if distinct && params.index == Some(index) {
            v.fail(EngineError::DuplicateChoice);
            return Ok(());
        }
        let Some(choice) = choices.get(index) else {
            v.fail(EngineError::InvalidIndex(Some(index)));
            return Ok(());
        };
        cx.seat_mut()?.inventory.gain(&choice.scale(multiplier))?;
        debug!(seat = %cx.seat, goods = %choice.scale(multiplier), "gained choice");
        if let Some(step) = next {
            let child = step.execute(cx, v.clone(), &StepParams::index(index))?;
            v.merge(child);
            if !v.success {
                return Ok(());
            }
        }
    }
    Ok(())
}

// === Board ===

fn remove(cx: &mut StepContext<'_>, v: &mut Validation, card: Card, max: u32, next: Option<&Step>) -> Result<()> {
    let noun = card.name();
    let Some((mut coordinates, rest)) = grammar::parse_remove(v.text(), &noun) else {
        v.reject();
        return Ok(());
    };
    coordinates.sort();
    coordinates.dedup();

    let seat = cx.seat()?;
    if let Some(&at) = coordinates.iter().find(|&&at| seat.board.space(at).and_then(|s| s.card()) != Some(&card)) {
        v.fail(EngineError::WrongCard { expected: noun, coordinate: at });
        return Ok(());
    }
    let found = coordinates.len() as u32;
    if found > max {
        v.fail(EngineError::TooManyTargets { count: found, max });
        return Ok(());
    }

    let seat = cx.seat_mut()?;
    for &at in &coordinates {
        if let Some(space) = seat.board.space_mut(at) {
            space.remove(at)?;
        }
    }
    debug!(seat = %cx.seat, cleared = found, what = %noun, "cleared land");
    descend(next, cx, v, rest, StepParams::count(found))
}

fn production_wheel(
    cx: &mut StepContext<'_>,
    v: &mut Validation,
    tokens: &[ResourceToken],
    next: Option<&Step>,
) -> Result<()> {
    let Some((name, rest)) = grammar::parse_choose(v.text()) else {
        v.reject();
        return Ok(());
    };
    let Some(token) = name.parse::<ResourceToken>().ok().filter(|t| tokens.contains(t)) else {
        v.reject();
        return Ok(());
    };
    let count = match cx.game.gameboard.production_value(token) {
        Ok(count) => count,
        Err(cause) => {
            v.fail(cause);
            return Ok(());
        }
    };
    let params = StepParams {
        count: Some(count),
        token: Some(token),
        ..StepParams::default()
    };
    descend(next, cx, v, rest, params)?;
    if v.success {
        cx.game.gameboard.produce(token)?;
        debug!(seat = %cx.seat, %token, count, "produced from wheel");
    }
    Ok(())
}

fn use_building(cx: &mut StepContext<'_>, v: &mut Validation, criteria: &Criteria, next: Option<&Step>) -> Result<()> {
    let Some((id, rest)) = grammar::parse_use(v.text()) else {
        v.reject();
        return Ok(());
    };
    let candidates = criteria.candidates(cx.game, cx.seat, cx.source.as_ref());
    let Some(target) = candidates.into_iter().find(|b| b.id == id) else {
        v.fail(EngineError::BuildingNotFound(id.to_string()));
        return Ok(());
    };
    if cx.is_active(id) {
        v.fail(EngineError::RecursiveUse(id.to_string()));
        return Ok(());
    }
    cx.use_building(target, rest.as_deref())?;
    v.remaining = None;
    if let Some(step) = next {
        let child = step.execute(cx, v.clone(), &StepParams::default())?;
        v.merge(child);
    }
    Ok(())
}

/// Whether `id` may be built at `at` on `seat`'s board.
fn check_site(game: &Game, seat: &Seat, id: CardId, at: Coordinate) -> Result<()> {
    let catalogue = game.catalogue();
    let def = catalogue
        .building(id)
        .ok_or_else(|| EngineError::BuildingNotFound(id.to_string()))?;
    let space = seat.board.space(at).ok_or(EngineError::SpaceNotFound(at))?;

    match space.card() {
        None => {
            if !def.terrains.contains(&space.terrain) {
                return Err(EngineError::InvalidTerrain { card: id.to_string(), coordinate: at });
            }
        }
        Some(Card::Building(existing)) => {
            let overbuildable = catalogue.building(existing.id).is_some_and(|d| d.overbuildable);
            if !overbuildable || existing.is_occupied() {
                return Err(EngineError::SpaceOccupied(at));
            }
            if !def.terrains.contains(&Terrain::ClayMound) {
                return Err(EngineError::InvalidTerrain { card: id.to_string(), coordinate: at });
            }
        }
        Some(_) => return Err(EngineError::SpaceOccupied(at)),
    }

    if def.cloister {
        let adjacent = seat.board.neighbours(at).any(|(_, s)| {
            s.building()
                .and_then(|b| catalogue.building(b.id))
                .is_some_and(|d| d.cloister)
        });
        if !adjacent {
            return Err(EngineError::CloisterAdjacency(id.to_string()));
        }
    }

    if let Some(missing) = first_missing(seat, &def.cost) {
        return Err(missing);
    }
    Ok(())
}

fn build_building(cx: &mut StepContext<'_>, v: &mut Validation, return_prior: bool, next: Option<&Step>) -> Result<()> {
    let Some(clause) = grammar::parse_build(v.text()) else {
        v.reject();
        return Ok(());
    };
    if return_prior {
        cx.game.return_clergy(cx.seat, Some(ClergyKind::Prior));
    }
    if !cx.game.available_buildings.contains(&clause.id) {
        v.fail(EngineError::BuildingNotFound(clause.id.to_string()));
        return Ok(());
    }
    if let Err(cause) = check_site(cx.game, cx.seat()?, clause.id, clause.at) {
        v.fail(cause);
        return Ok(());
    }

    cx.game.build_building(cx.seat, clause.at, clause.id)?;
    v.remaining = clause.rest.clone();

    if clause.place_prior {
        let seat = cx.seat;
        if !cx.seat_mut()?.take_clergy(ClergyKind::Prior) {
            v.fail(EngineError::ClergyNotAvailable);
            return Ok(());
        }
        let prior = Clergy { kind: ClergyKind::Prior, owner: seat };
        cx.game.assign_clergy(seat, clause.at, prior, false)?;
        let target = BuildingRef { seat, at: Some(clause.at), id: clause.id };
        cx.use_building(target, clause.rest.as_deref())?;
        v.remaining = None;
    }

    if let Some(step) = next {
        let child = step.execute(cx, v.clone(), &StepParams::default())?;
        v.merge(child);
    }
    Ok(())
}

fn build_settlement(cx: &mut StepContext<'_>, v: &mut Validation, next: Option<&Step>) -> Result<()> {
    let Some(clause) = grammar::parse_settle(v.text())? else {
        v.reject();
        return Ok(());
    };
    let seat = cx.seat()?;
    if !seat.settlements.contains(&clause.id) {
        v.fail(EngineError::SettlementNotFound(clause.id.to_string()));
        return Ok(());
    }
    let Some(space) = seat.board.space(clause.at) else {
        v.fail(EngineError::SpaceNotFound(clause.at));
        return Ok(());
    };
    if !space.is_empty() {
        v.fail(EngineError::SpaceOccupied(clause.at));
        return Ok(());
    }
    let terrain = space.terrain;

    let catalogue = Arc::clone(&cx.game.catalogue);
    let Some(def) = catalogue.settlement(clause.id) else {
        v.fail(EngineError::SettlementNotFound(clause.id.to_string()));
        return Ok(());
    };
    if !def.terrains.contains(&terrain) {
        v.fail(EngineError::InvalidTerrain { card: clause.id.to_string(), coordinate: clause.at });
        return Ok(());
    }

    let paid = collect(clause.goods);
    for req in def.cost.iter() {
        let covered = match req.kind.as_virtual() {
            Some(currency) => paid.virtual_total(currency),
            None => paid.count(req.kind),
        };
        if covered < req.count {
            v.fail(EngineError::InsufficientGoods { good: req.kind, needed: req.count, available: covered });
            return Ok(());
        }
    }

    cx.game.build_settlement(cx.seat, clause.at, clause.id, &paid)?;
    v.remaining = clause.rest;
    if let Some(step) = next {
        let child = step.execute(cx, v.clone(), &StepParams::default())?;
        v.merge(child);
    }
    Ok(())
}

fn swap_tokens(cx: &mut StepContext<'_>, v: &mut Validation) -> Result<()> {
    let Some((first, second, rest)) = grammar::parse_swap(v.text()) else {
        v.reject();
        return Ok(());
    };
    let parsed = first
        .parse::<ResourceToken>()
        .and_then(|a| second.parse::<ResourceToken>().map(|b| (a, b)));
    let (a, b) = match parsed {
        Ok(pair) => pair,
        Err(cause) => {
            v.fail(cause);
            return Ok(());
        }
    };
    if let Err(cause) = cx.game.gameboard.swap(a, b) {
        v.fail(cause);
        return Ok(());
    }
    debug!(first = %a, second = %b, "swapped tokens");
    v.remaining = rest;
    Ok(())
}

/// Fell trees / cut peat: clear the card and produce from the wheel.
fn strip(cx: &mut StepContext<'_>, v: &mut Validation, name: &str, card: Card, token: ResourceToken) -> Result<()> {
    let Some(Some((at, chosen))) = grammar::parse_strip(v.text(), name) else {
        v.reject();
        return Ok(());
    };
    if cx.seat()?.board.space(at).and_then(|s| s.card()) != Some(&card) {
        v.fail(EngineError::WrongCard { expected: card.name(), coordinate: at });
        return Ok(());
    }
    let Some(chosen) = chosen.parse::<ResourceToken>().ok().filter(|t| *t == token || *t == ResourceToken::Joker)
    else {
        v.reject();
        return Ok(());
    };
    if let Err(cause) = cx.game.gameboard.production_value(chosen) {
        v.fail(cause);
        return Ok(());
    }

    if let Some(space) = cx.seat_mut()?.board.space_mut(at) {
        space.remove(at)?;
    }
    let count = cx.game.gameboard.produce(chosen)?;
    let good = token.good().unwrap_or(GoodKind::Wood);
    cx.seat_mut()?.inventory.gain(&Goods::from(Good::units(good, count)))?;
    debug!(seat = %cx.seat, %at, %chosen, count, "stripped land");
    v.remaining = None;
    Ok(())
}

fn place_landscape(cx: &mut StepContext<'_>, v: &mut Validation, kind: LandscapeKind) -> Result<()> {
    let Some((id, side, row)) = grammar::parse_place_landscape(v.text()) else {
        if cx.game.landscapes(kind).is_empty() {
            return Ok(());
        }
        v.fail(EngineError::LandscapeRequired);
        return Ok(());
    };
    let Some(position) = cx.game.landscapes(kind).iter().position(|l| l.id == id) else {
        v.fail(EngineError::NoLandscapeAvailable);
        return Ok(());
    };
    let mut tile = cx.game.landscapes(kind)[position].clone();
    tile.place(side, row);
    let legal = cx.seat()?.board.available_positions(kind, Some(tile.column()));
    if !legal.contains(&(row, tile.column())) {
        v.fail(EngineError::InvalidLandscapePosition(row));
        return Ok(());
    }

    cx.game.landscapes_mut(kind)?.remove(position);
    cx.seat_mut()?.board.add(tile);
    debug!(seat = %cx.seat, landscape = %id, row, "placed landscape");
    v.remaining = None;
    Ok(())
}

// === Branching ===

fn run(cx: &mut StepContext<'_>, step: &Step, base: &Validation, text: Option<String>, params: &StepParams) -> Result<Validation> {
    step.execute(cx, base.carrying(text), params)
}

fn and_or(cx: &mut StepContext<'_>, v: &mut Validation, first: &Step, second: &Step, params: &StepParams) -> Result<()> {
    let Some((left, right)) = grammar::split_and(v.text()) else {
        v.reject();
        return Ok(());
    };
    match right {
        Some(right) => {
            let a = run(cx, first, v, Some(left), params)?;
            v.merge(a);
            if v.success {
                let b = run(cx, second, v, Some(right), params)?;
                v.merge(b);
            }
        }
        None => {
            let snapshot = cx.game.clone();
            let a = run(cx, first, v, Some(left.clone()), params)?;
            if a.success && a.remaining.is_none() {
                v.merge(a);
            } else {
                *cx.game = snapshot;
                let b = run(cx, second, v, Some(left), params)?;
                v.merge(b);
            }
        }
    }
    Ok(())
}

fn and_conditional(
    cx: &mut StepContext<'_>,
    v: &mut Validation,
    first: &Step,
    second: &Step,
    params: &StepParams,
) -> Result<()> {
    let Some((left, right)) = grammar::split_and(v.text()) else {
        v.reject();
        return Ok(());
    };
    if let Some(right) = right {
        let a = run(cx, first, v, Some(left), params)?;
        v.merge(a);
        if v.success {
            let b = run(cx, second, v, Some(right), params)?;
            v.merge(b);
        }
        return Ok(());
    }

    let snapshot = cx.game.clone();
    let mut cause = None;
    for text_first in [true, false] {
        let (one, two) = if text_first { (Some(left.clone()), None) } else { (None, Some(left.clone())) };
        let a = run(cx, first, v, one, params)?;
        if a.success && a.remaining.is_none() {
            let b = run(cx, second, &a, two, params)?;
            if b.success && b.remaining.is_none() {
                v.merge(b);
                return Ok(());
            }
            cause = cause.or(b.cause);
        } else {
            cause = cause.or(a.cause);
        }
        *cx.game = snapshot.clone();
    }
    match cause {
        Some(cause) => v.fail(cause),
        None => v.reject(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::goods::VirtualGood;

    fn game() -> Game {
        Game::new(GameConfig::new(3))
    }

    fn give(game: &mut Game, goods: Goods) {
        game.seats[0].inventory.gain(&goods).unwrap();
    }

    fn count(game: &Game, kind: GoodKind) -> Decimal {
        game.seats[0].inventory.count(kind)
    }

    fn exec(game: &mut Game, step: &Step, text: &str) -> Result<Validation> {
        let mut cx = StepContext::new(game, SeatId(0));
        step.execute(&mut cx, Validation::new(Some(text)), &StepParams::default())
    }

    #[test]
    fn test_spend_exact_scales_child() {
        let mut game = game();
        give(&mut game, Goods::from([(GoodKind::Coin, 3)]));
        let step = Step::spend([(GoodKind::Coin, 1)]).max(3).then(Step::gain([(GoodKind::Grain, 6)]));
        let v = exec(&mut game, &step, "spend 2 coin to gain 12 grain").unwrap();
        assert!(v.success);
        assert_eq!(v.remaining, None);
        assert_eq!(count(&game, GoodKind::Grain), Decimal::from(12));
        assert_eq!(count(&game, GoodKind::Coin), Decimal::ONE);
    }

    #[test]
    fn test_spend_virtual_carries_leftover() {
        let mut game = game();
        give(&mut game, Goods::from([(GoodKind::Peat, 1)]));
        let step = Step::spend(Good::units(GoodKind::Energy, 1)).unbounded();
        let v = exec(&mut game, &step, "spend 1 peat").unwrap();
        assert!(v.success);
        // 1 peat is 2 energy; both units count
        assert_eq!(v.leftover[VirtualGood::Energy.index()], Decimal::ZERO);

        give(&mut game, Goods::from([(GoodKind::Straw, 3)]));
        let v = exec(&mut game, &step, "spend 3 straw").unwrap();
        assert_eq!(v.leftover[VirtualGood::Energy.index()], Decimal::new(5, 1));
    }

    #[test]
    fn test_spend_rejects_stray_goods() {
        let mut game = game();
        give(&mut game, Goods::from([(GoodKind::Coin, 1), (GoodKind::Clay, 1)]));
        let step = Step::spend([(GoodKind::Coin, 1)]);
        let v = exec(&mut game, &step, "spend 1 coin 1 clay").unwrap();
        assert_eq!(v.cause, Some(EngineError::GoodsNotAllowed(GoodKind::Clay)));
        assert_eq!(count(&game, GoodKind::Coin), Decimal::ONE);
    }

    #[test]
    fn test_spend_child_and_residue_becomes_after() {
        let mut game = game();
        give(&mut game, Goods::from([(GoodKind::Coin, 1)]));
        let step = Step::spend([(GoodKind::Coin, 1)]).then(Step::gain([(GoodKind::Wood, 2)]));
        let v = exec(&mut game, &step, "spend 1 coin to gain 2 wood and spend 1 wood").unwrap();
        assert!(v.success);
        assert_eq!(v.remaining.as_deref(), Some("spend 1 wood"));
    }

    #[test]
    fn test_spend_breaks_picks_highest() {
        let mut game = game();
        give(&mut game, Goods::from([(GoodKind::Wood, 5)]));
        let step = Step::spend_breaks(vec![
            Goods::from(Good::units(GoodKind::Energy, 1)),
            Goods::from(Good::units(GoodKind::Energy, 3)),
            Goods::from(Good::units(GoodKind::Energy, 6)),
        ])
        .then(Step::gain_breaks(vec![
            Goods::from([(GoodKind::Coin, 1)]),
            Goods::from([(GoodKind::Coin, 2)]),
            Goods::from([(GoodKind::Coin, 4)]),
        ]));
        let v = exec(&mut game, &step, "spend 4 wood").unwrap();
        assert!(v.success);
        assert_eq!(count(&game, GoodKind::Coin), Decimal::from(2));
        assert_eq!(count(&game, GoodKind::Wood), Decimal::ONE);
    }

    #[test]
    fn test_spend_choices_counts_each_choice() {
        let mut game = game();
        give(&mut game, Goods::from([(GoodKind::Wood, 6), (GoodKind::Meat, 2)]));
        let step = Step::spend_choices(vec![
            Goods::from(Good::units(GoodKind::Energy, 6)),
            Goods::from(Good::units(GoodKind::Food, 10)),
        ])
        .max(2)
        .then(Step::gain([(GoodKind::Book, 1), (GoodKind::Ornament, 1)]));
        let v = exec(&mut game, &step, "spend 6 wood 2 meat").unwrap();
        assert!(v.success, "{v:?}");
        assert_eq!(count(&game, GoodKind::Book), Decimal::from(2));
        assert_eq!(count(&game, GoodKind::Ornament), Decimal::from(2));
    }

    #[test]
    fn test_spend_choices_unspent() {
        let mut game = game();
        give(&mut game, Goods::from([(GoodKind::Book, 1), (GoodKind::Clay, 1)]));
        let step = Step::spend_choices(vec![Goods::from([(GoodKind::Book, 1)])]);
        let v = exec(&mut game, &step, "spend 1 book 1 clay").unwrap();
        assert_eq!(v.cause, Some(EngineError::UnspentGoods));
    }

    #[test]
    fn test_spend_unique_rules() {
        let allowed = vec![
            Good::units(GoodKind::Wood, 1),
            Good::units(GoodKind::Clay, 1),
            Good::units(GoodKind::Coin, 1),
            Good::units(GoodKind::Coin, 5),
        ];
        let step = Step::spend_unique(allowed, 2).then(Step::gain_choices(vec![Goods::from([(GoodKind::Grain, 6)])]));
        let mut game = game();
        give(&mut game, Goods::from([(GoodKind::Wood, 2), (GoodKind::Coin, 5)]));

        let err = exec(&mut game, &step, "spend 2 wood 1 coin to gain 6 grain").unwrap_err();
        assert_eq!(err, EngineError::TooManyGoods { count: 2, max: 1 });

        let v = exec(&mut game, &step, "spend 1 wood 5 coin to gain 6 grain").unwrap();
        assert!(v.success);
        assert_eq!(count(&game, GoodKind::Grain), Decimal::from(6));
    }

    #[test]
    fn test_gain_exact_checks_amount() {
        let mut game = game();
        give(&mut game, Goods::from([(GoodKind::Coin, 1)]));
        let step = Step::spend([(GoodKind::Coin, 1)]).then(Step::gain([(GoodKind::Grain, 6)]));
        let v = exec(&mut game, &step, "spend 1 coin to gain 7 grain").unwrap();
        assert!(matches!(v.cause, Some(EngineError::UnexpectedGain { .. })));
    }

    #[test]
    fn test_gain_choices_distinct() {
        let mut game = game();
        give(&mut game, Goods::from([(GoodKind::Book, 2)]));
        let options = |n| {
            vec![
                Goods::from([(GoodKind::Clay, n)]),
                Goods::from([(GoodKind::Wood, n)]),
            ]
        };
        let step = Step::spend([(GoodKind::Book, 1)])
            .then(Step::gain_choices(options(5)).then(Step::gain_choices(options(3)).distinct()));

        let v = exec(&mut game, &step, "spend 1 book to gain 5 clay gain 3 wood").unwrap();
        assert!(v.success);
        assert_eq!(count(&game, GoodKind::Clay), Decimal::from(5));
        assert_eq!(count(&game, GoodKind::Wood), Decimal::from(3));

        let v = exec(&mut game, &step, "spend 1 book to gain 5 clay gain 3 clay").unwrap();
        assert_eq!(v.cause, Some(EngineError::DuplicateChoice));
    }

    #[test]
    fn test_production_wheel_resets_token() {
        let mut game = game();
        game.gameboard.wheel = 2;
        let step = Step::production_wheel(&[ResourceToken::Clay, ResourceToken::Joker]).then(Step::gain([(GoodKind::Clay, 1)]));
        let v = exec(&mut game, &step, "choose clay to gain 3 clay").unwrap();
        assert!(v.success);
        assert_eq!(count(&game, GoodKind::Clay), Decimal::from(3));
        assert_eq!(game.gameboard.production_value(ResourceToken::Clay).unwrap(), 0);

        let v = exec(&mut game, &step, "choose wood to gain 3 wood").unwrap();
        assert!(!v.success);
    }

    #[test]
    fn test_remove_forest_bounds() {
        let mut game = game();
        let step = Step::remove_forest();
        let v = exec(&mut game, &step, "remove forest at 30d 31d").unwrap();
        assert_eq!(v.cause, Some(EngineError::TooManyTargets { count: 2, max: 1 }));

        let v = exec(&mut game, &step, "remove forest at 30c").unwrap();
        assert!(matches!(v.cause, Some(EngineError::WrongCard { .. })));

        let v = exec(&mut game, &step, "remove forest at 30d").unwrap();
        assert!(v.success);
        assert!(game.seats[0].board.space(Coordinate::new(30, 3)).unwrap().is_empty());
    }

    #[test]
    fn test_fell_trees_gains_wood() {
        let mut game = game();
        game.gameboard.wheel = 1;
        let v = exec(&mut game, &Step::FellTrees, "fell-trees at 31d to choose wood").unwrap();
        assert!(v.success);
        assert_eq!(count(&game, GoodKind::Wood), Decimal::from(2));
        let v = exec(&mut game, &Step::FellTrees, "fell-trees at 31d to choose wood").unwrap();
        assert!(matches!(v.cause, Some(EngineError::WrongCard { .. })));
    }

    #[test]
    fn test_swap_tokens() {
        let mut game = game();
        game.gameboard.wheel = 3;
        game.gameboard.produce(ResourceToken::Clay).unwrap();
        let v = exec(&mut game, &Step::SwapTokens, "swap clay grain").unwrap();
        assert!(v.success);
        assert_eq!(game.gameboard.production_value(ResourceToken::Clay).unwrap(), 4);
        let v = exec(&mut game, &Step::SwapTokens, "swap clay gold").unwrap();
        assert!(matches!(v.cause, Some(EngineError::UnknownToken(_))));
    }

    #[test]
    fn test_and_or_falls_back() {
        let mut game = game();
        give(&mut game, Goods::from([(GoodKind::Wood, 1)]));
        let step = Step::and_or(
            Step::spend([(GoodKind::Coin, 1)]).then(Step::gain([(GoodKind::Grain, 1)])),
            Step::spend([(GoodKind::Wood, 1)]).then(Step::gain([(GoodKind::Clay, 1)])),
        );
        let v = exec(&mut game, &step, "spend 1 wood").unwrap();
        assert!(v.success);
        assert_eq!(count(&game, GoodKind::Clay), Decimal::ONE);
    }

    #[test]
    fn test_and_conditional_either_order() {
        let step = Step::and_conditional(
            Step::PlaceLandscape(LandscapeKind::District),
            Step::PlaceLandscape(LandscapeKind::Plot),
        );
        let mut game = game();
        let v = exec(&mut game, &step, "place district1 as side1 at 29").unwrap();
        assert_eq!(v.cause, Some(EngineError::LandscapeRequired));

        game.plots.clear();
        let v = exec(&mut game, &step, "place district1 as side1 at 29").unwrap();
        assert!(v.success);
        assert_eq!(game.seats[0].board.landscapes.len(), 1);
    }
}
