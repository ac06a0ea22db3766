//! Command grammar.
//!
//! Lines are matched first-match-wins against this table. Text reaching the
//! parser is already lower-cased and trimmed.
//!
//! ```text
//! comment   := ("#" | "//") any
//! option    := "option" option-name
//! setup     := "setup" ("variant" variant | "finalize" | "start")
//! convert   := "convert" amount good "to" amount good
//! buy       := "buy" ("district" | "plot") "as" side "at" row
//! build     := "build" [gfi]-id "at" coordinate ("and" "place" "prior" ("to" rest)?)?
//! settle    := "build" s-id "at" coordinate "with" goods
//! pass      := "pass"
//! strip     := ("fell-trees" | "cut-peat") ("at" coordinate "to" "choose" token)?
//! place-use := "place" clergy "to" "use" card-id ("to" rest)?
//! pay-use   := "pay" amount good "to" colour "to" "use" card-id ("to" rest)?
//! place     := "place" clergy
//! use       := "use" card-id ("to" rest)?
//! ```
//!
//! A line starting with a known keyword that fails its grammar is
//! *InvalidArguments*; anything else is *UnknownCommand*.

use super::command::{Command, SetupStep};
use crate::board::ClergyKind;
use crate::cards::CardId;
use crate::effects::grammar::{parse_build, parse_settle, parse_strip, parse_use, tail, tokens};
use crate::error::{EngineError, Result};
use crate::goods::Good;

const KEYWORDS: [&str; 10] = [
    "option", "setup", "convert", "buy", "build", "pass", "fell-trees", "cut-peat", "place", "pay",
];

/// Parse one command.
pub fn parse(text: &str) -> Result<Command> {
    let text = text.trim();
    if text.starts_with('#') || text.starts_with("//") {
        return Ok(Command::Comment);
    }
    let invalid = || EngineError::arguments(text);

    let toks = tokens(text);
    let command = match toks.as_slice() {
        ["option", name] => Command::SetOption(name.parse()?),
        ["setup", "variant", variant] => Command::Setup(SetupStep::Variant(variant.parse()?)),
        ["setup", "finalize"] => Command::Setup(SetupStep::Finalize),
        ["setup", "start"] => Command::Setup(SetupStep::Start),
        ["convert", n, from, "to", m, to] => Command::Convert {
            from: good(n, from).ok_or_else(invalid)??,
            to: good(m, to).ok_or_else(invalid)??,
        },
        ["buy", kind, "as", side, "at", row] => Command::Buy {
            kind: kind.parse()?,
            side: side.parse()?,
            row: row_number(row).ok_or_else(invalid)?,
        },
        ["build", ..] => {
            if parse_build(text).is_some() {
                Command::BuildBuilding(text.to_string())
            } else if parse_settle(text)?.is_some() {
                Command::BuildSettlement(text.to_string())
            } else {
                return Err(invalid());
            }
        }
        ["pass"] => Command::Pass,
        ["fell-trees", ..] if parse_strip(text, "fell-trees").is_some() => Command::FellTrees(text.to_string()),
        ["cut-peat", ..] if parse_strip(text, "cut-peat").is_some() => Command::CutPeat(text.to_string()),
        ["place", clergy] => Command::PlaceClergy(clergy_kind(clergy)?),
        ["place", clergy, "to", "use", id, rest @ ..] => Command::PlaceToUse {
            clergy: clergy_kind(clergy)?,
            id: CardId::parse(id).ok_or_else(invalid)?,
            args: tail(rest, "to").ok_or_else(invalid)?,
        },
        ["pay", n, kind, "to", owner, "to", "use", id, rest @ ..] => Command::PayToUse {
            payment: good(n, kind).ok_or_else(invalid)??,
            owner: owner.parse()?,
            id: CardId::parse(id).ok_or_else(invalid)?,
            args: tail(rest, "to").ok_or_else(invalid)?,
        },
        ["use", ..] => {
            let (id, args) = parse_use(text).ok_or_else(invalid)?;
            Command::Continue { id, args }
        }
        [first, ..] if KEYWORDS.contains(first) => return Err(invalid()),
        _ => return Err(EngineError::UnknownCommand(text.to_string())),
    };
    Ok(command)
}

/// `amount name`; `None` when the amount is not a number.
fn good(amount: &str, name: &str) -> Option<Result<Good>> {
    let count: u32 = amount.parse().ok()?;
    Some(name.parse().map(|kind| Good::units(kind, count)))
}

fn row_number(text: &str) -> Option<i32> {
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn clergy_kind(text: &str) -> Result<ClergyKind> {
    ClergyKind::parse(text).ok_or_else(|| EngineError::arguments(text))
}
