//! Token grammars for step arguments.
//!
//! Text is split on whitespace. Each parser either recognises its clause and
//! returns the parsed pieces plus any trailing text, or returns `None` when
//! the text is not that clause at all. Unknown good names are errors rather
//! than non-matches, since a misspelt good can never succeed elsewhere.
//!
//! ```text
//! goods      := (amount name)+          amount := "0" | [1-9][0-9]*
//! coordinate := [1-9][0-9][a-i]
//! spend      := "spend" goods ("to" rest | "and" rest)?
//! gain       := "gain" goods rest?
//! remove     := "remove" ("forest"|"moor") "at" coordinate+ ("to" rest)?
//! choose     := "choose" token ("to" rest)?
//! use        := "use" card-id ("to" rest)?
//! build      := "build" [gfi]-id "at" coordinate ("and" "place" "prior" ("to" rest)?)?
//! settle     := "build" s-id "at" coordinate "with" goods rest?
//! swap       := "swap" token token ("and" rest)?
//! strip      := name ("at" coordinate "to" "choose" token)?
//! place      := "place" landscape-id "as" side "at" row
//! branches   := option1 ("and" option2)?
//! ```

use crate::board::{Coordinate, LandscapeId, LandscapeSide};
use crate::cards::CardId;
use crate::error::Result;
use crate::goods::{Good, GoodKind};

/// Split text into tokens.
#[must_use]
pub fn tokens(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Join tokens back into text; `None` when there are none.
#[must_use]
pub fn join(tokens: &[&str]) -> Option<String> {
    (!tokens.is_empty()).then(|| tokens.join(" "))
}

fn is_amount(token: &str) -> bool {
    token == "0"
        || (!token.starts_with('0') && !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()))
}

fn is_word(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_lowercase() || b == b'-')
}

/// Read `amount name` pairs from the front of `tokens`.
///
/// Returns the goods (in text order, duplicates kept) and how many tokens
/// were consumed.
pub fn take_goods(tokens: &[&str]) -> Result<(Vec<Good>, usize)> {
    let mut goods = Vec::new();
    let mut i = 0;
    while i + 1 < tokens.len() && is_amount(tokens[i]) && is_word(tokens[i + 1]) {
        let count: u32 = tokens[i].parse().map_err(|_| crate::error::EngineError::arguments(tokens[i]))?;
        let kind: GoodKind = tokens[i + 1].parse()?;
        goods.push(Good::units(kind, count));
        i += 2;
    }
    Ok((goods, i))
}

/// `[]` or `[keyword, rest..]` with a non-empty rest.
pub(crate) fn tail(tokens: &[&str], keyword: &str) -> Option<Option<String>> {
    match tokens {
        [] => Some(None),
        [kw, rest @ ..] if *kw == keyword && !rest.is_empty() => Some(join(rest)),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendClause {
    pub goods: Vec<Good>,
    /// Text after `to`, handed to the child step.
    pub next: Option<String>,
    /// Text after `and`, left for the following step.
    pub after: Option<String>,
}

pub fn parse_spend(text: &str) -> Result<Option<SpendClause>> {
    let toks = tokens(text);
    let Some((&"spend", rest)) = toks.split_first() else {
        return Ok(None);
    };
    let (goods, used) = take_goods(rest)?;
    if goods.is_empty() {
        return Ok(None);
    }
    let clause = match &rest[used..] {
        [] => SpendClause { goods, next: None, after: None },
        [kw, more @ ..] if *kw == "to" && !more.is_empty() => SpendClause { goods, next: join(more), after: None },
        [kw, more @ ..] if *kw == "and" && !more.is_empty() => SpendClause { goods, next: None, after: join(more) },
        _ => return Ok(None),
    };
    Ok(Some(clause))
}

/// `gain <goods> [rest]`.
pub fn parse_gain(text: &str) -> Result<Option<(Vec<Good>, Option<String>)>> {
    let toks = tokens(text);
    let Some((&"gain", rest)) = toks.split_first() else {
        return Ok(None);
    };
    let (goods, used) = take_goods(rest)?;
    if goods.is_empty() {
        return Ok(None);
    }
    Ok(Some((goods, join(&rest[used..]))))
}

/// `remove <what> at <coord>+ [to rest]`.
#[must_use]
pub fn parse_remove(text: &str, what: &str) -> Option<(Vec<Coordinate>, Option<String>)> {
    let toks = tokens(text);
    let [remove, noun, at, rest @ ..] = toks.as_slice() else {
        return None;
    };
    if *remove != "remove" || *noun != what || *at != "at" {
        return None;
    }
    let coordinates: Vec<Coordinate> = rest.iter().map_while(|t| t.parse().ok()).collect();
    if coordinates.is_empty() {
        return None;
    }
    let trailing = tail(&rest[coordinates.len()..], "to")?;
    Some((coordinates, trailing))
}

/// `choose <token> [to rest]`.
#[must_use]
pub fn parse_choose(text: &str) -> Option<(String, Option<String>)> {
    let toks = tokens(text);
    let [choose, token, rest @ ..] = toks.as_slice() else {
        return None;
    };
    if *choose != "choose" || !is_word(token) {
        return None;
    }
    Some((token.to_string(), tail(rest, "to")?))
}

/// `use <card-id> [to rest]`.
#[must_use]
pub fn parse_use(text: &str) -> Option<(CardId, Option<String>)> {
    let toks = tokens(text);
    let [word, id, rest @ ..] = toks.as_slice() else {
        return None;
    };
    if *word != "use" {
        return None;
    }
    Some((CardId::parse(id)?, tail(rest, "to")?))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildClause {
    pub id: CardId,
    pub at: Coordinate,
    pub place_prior: bool,
    pub rest: Option<String>,
}

/// `build <[gfi]id> at <coord> [and place prior [to rest]]`.
#[must_use]
pub fn parse_build(text: &str) -> Option<BuildClause> {
    let toks = tokens(text);
    let [build, id, at, coordinate, rest @ ..] = toks.as_slice() else {
        return None;
    };
    if *build != "build" || *at != "at" {
        return None;
    }
    let id = CardId::parse(id).filter(|id| matches!(id.series(), 'g' | 'f' | 'i'))?;
    let at: Coordinate = coordinate.parse().ok()?;
    let (place_prior, rest) = match rest {
        [] => (false, None),
        ["and", "place", "prior", more @ ..] => (true, tail(more, "to")?),
        _ => return None,
    };
    Some(BuildClause { id, at, place_prior, rest })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettleClause {
    pub id: CardId,
    pub at: Coordinate,
    pub goods: Vec<Good>,
    pub rest: Option<String>,
}

/// `build <sNN> at <coord> with <goods> [rest]`.
pub fn parse_settle(text: &str) -> Result<Option<SettleClause>> {
    let toks = tokens(text);
    let [build, id, at, coordinate, with, rest @ ..] = toks.as_slice() else {
        return Ok(None);
    };
    if *build != "build" || *at != "at" || *with != "with" {
        return Ok(None);
    }
    let Some(id) = CardId::parse(id).filter(|id| id.series() == 's') else {
        return Ok(None);
    };
    let Ok(at) = coordinate.parse::<Coordinate>() else {
        return Ok(None);
    };
    let (goods, used) = take_goods(rest)?;
    if goods.is_empty() {
        return Ok(None);
    }
    Ok(Some(SettleClause { id, at, goods, rest: join(&rest[used..]) }))
}

/// `swap <token> <token> [and rest]`.
#[must_use]
pub fn parse_swap(text: &str) -> Option<(String, String, Option<String>)> {
    let toks = tokens(text);
    let [swap, first, second, rest @ ..] = toks.as_slice() else {
        return None;
    };
    if *swap != "swap" || !is_word(first) || !is_word(second) {
        return None;
    }
    Some((first.to_string(), second.to_string(), tail(rest, "and")?))
}

/// `<name> [at <coord> to choose <token>]`.
///
/// The outer `Option` says whether the clause matched; the inner one carries
/// the location and token when given.
#[must_use]
pub fn parse_strip(text: &str, name: &str) -> Option<Option<(Coordinate, String)>> {
    let toks = tokens(text);
    match toks.as_slice() {
        [word] if *word == name => Some(None),
        [word, "at", coordinate, "to", "choose", token] if *word == name && is_word(token) => {
            let at = coordinate.parse().ok()?;
            Some(Some((at, token.to_string())))
        }
        _ => None,
    }
}

/// `place <district|plot><n> as <side1|side2> at <row>`.
#[must_use]
pub fn parse_place_landscape(text: &str) -> Option<(LandscapeId, LandscapeSide, i32)> {
    let toks = tokens(text);
    let ["place", id, "as", side, "at", row] = toks.as_slice() else {
        return None;
    };
    let id: LandscapeId = id.parse().ok()?;
    let side: LandscapeSide = side.parse().ok()?;
    if row.len() > 2 || !row.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((id, side, row.parse().ok()?))
}

/// Split on the first standalone `and`.
#[must_use]
pub fn split_and(text: &str) -> Option<(String, Option<String>)> {
    let toks = tokens(text);
    if toks.is_empty() {
        return None;
    }
    match toks.iter().skip(1).position(|t| *t == "and") {
        Some(i) if i + 2 < toks.len() => Some((toks[..=i].join(" "), join(&toks[i + 2..]))),
        _ => Some((toks.join(" "), None)),
    }
}
