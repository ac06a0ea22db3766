//! Whole-game flow driven through the command log.
//!
//! These tests only talk to the engine the way a host would: append lines
//! to a log, submit them, and replay the log into fresh games.

use oel_engine::{
    ClergyKind, EngineError, Game, GameConfig, GameOption, GoodKind, LogStore, MemoryLog, Phase, ReplayPolicy,
    SeatId,
};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, EnvFilter};

/// Route engine logs to the test output; `RUST_LOG=oel_engine=debug` shows
/// every step.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

fn started(config: &GameConfig) -> (Game, MemoryLog) {
    init_logging();
    let mut log = MemoryLog::with_setup(config);
    log.append(None, "setup finalize");
    log.append(None, "setup start");
    let mut game = Game::new(config.clone());
    game.sync(&log).unwrap();
    (game, log)
}

/// Submit `line` for whoever holds the turn, returning that seat.
fn play(game: &mut Game, log: &mut MemoryLog, line: &str) -> SeatId {
    let seat = game.action_seat().unwrap();
    game.submit(log, Some(seat), line).unwrap();
    seat
}

/// Two rounds of a three-player game, one action per turn.
const THREE_PLAYER_OPENING: [&str; 8] = [
    "place prior to use h01 to choose clay",
    "place prior to use h01 to choose joker",
    "place prior to use h02 to choose grain",
    "place lay-brother to use h03 to choose coin",
    "place lay-brother to use h02 to choose livestock",
    "place lay-brother to use h03 to choose coin",
    "place lay-brother to use h02 to choose grain",
    "place lay-brother to use h01 to choose clay",
];

fn three_player_opening() -> (Game, MemoryLog, Vec<SeatId>) {
    let (mut game, mut log) = started(&GameConfig::new(3));
    let mut seats = Vec::new();
    for line in THREE_PLAYER_OPENING {
        seats.push(play(&mut game, &mut log, line));
        play(&mut game, &mut log, "pass");
    }
    (game, log, seats)
}

// =============================================================================
// Turn Order
// =============================================================================

/// With three players the start seat acts first and last, then the start
/// passes on.
#[test]
fn test_three_player_seat_sequence() {
    let (game, _, seats) = three_player_opening();

    let expected: Vec<SeatId> = [0, 1, 2, 0, 1, 2, 0, 1].into_iter().map(SeatId).collect();
    assert_eq!(seats, expected);
    assert_eq!(game.round, Some(3));
    assert_eq!(game.phase, Phase::Action);
    assert_eq!(game.action_seat(), Some(SeatId(2)));
}

/// A seat whose pool ran dry gets its clergy back at the next round start.
#[test]
fn test_empty_pool_returns_at_round_start() {
    let (game, _, _) = three_player_opening();

    // seat 1 placed all three clergy over the first two rounds
    assert!(game.seats[1].has_clergy(ClergyKind::Prior));
    assert_eq!(game.seats[1].clergy.len(), 3);
    // seat 2 still holds a lay brother, so nothing came back
    assert!(!game.seats[2].has_clergy(ClergyKind::Prior));
}

/// With four players the start seat also gets a fifth turn before the
/// round ends.
#[test]
fn test_four_player_round() {
    let (mut game, mut log) = started(&GameConfig::new(4));
    let lines = [
        "place prior to use h01 to choose clay",
        "place prior to use h01 to choose joker",
        "place prior to use h02 to choose grain",
        "place prior to use h02 to choose livestock",
        "place lay-brother to use h03 to choose coin",
    ];

    let mut turns = Vec::new();
    for line in lines {
        turns.push((game.round.unwrap(), play(&mut game, &mut log, line)));
        play(&mut game, &mut log, "pass");
    }

    let expected: Vec<(u32, SeatId)> = [0, 1, 2, 3, 0].into_iter().map(|s| (1, SeatId(s))).collect();
    assert_eq!(turns, expected);
    assert_eq!(game.round, Some(2));
    assert_eq!(game.phase, Phase::Action);
    assert_eq!(game.action_seat(), Some(SeatId(1)));
}

/// In the long two-player game the start seat takes two actions, the other
/// seat one, and the round ends there.
#[test]
fn test_long_two_player_round() {
    let (mut game, mut log) = started(&GameConfig::new(2).with_option(GameOption::LongGame));
    assert_eq!(game.actions_required(SeatId(0)), 2);
    assert_eq!(game.actions_required(SeatId(1)), 1);

    play(&mut game, &mut log, "place prior to use h01 to choose clay");
    assert!(matches!(
        game.apply(Some(SeatId(0)), "pass"),
        Err(EngineError::ActionRequired(_))
    ));
    play(&mut game, &mut log, "place lay-brother to use h03 to choose coin");
    assert_eq!(play(&mut game, &mut log, "pass"), SeatId(0));

    play(&mut game, &mut log, "place prior to use h01 to choose joker");
    assert_eq!(play(&mut game, &mut log, "pass"), SeatId(1));

    assert_eq!(game.round, Some(2));
    assert_eq!(game.phase, Phase::Action);
    assert_eq!(game.action_seat(), Some(SeatId(1)));
    assert_eq!(game.actions_required(SeatId(1)), 2);
}

/// Two players each take a double turn per round.
#[test]
fn test_two_player_rounds() {
    let (mut game, mut log) = started(&GameConfig::new(2));
    assert_eq!(game.action_seat(), Some(SeatId(0)));

    play(&mut game, &mut log, "place prior to use h01 to choose clay");
    assert!(matches!(
        game.apply(Some(SeatId(0)), "pass"),
        Err(EngineError::ActionRequired(_))
    ));
    play(&mut game, &mut log, "place lay-brother to use h03 to choose coin");
    play(&mut game, &mut log, "pass");

    assert_eq!(game.round, Some(2));
    assert_eq!(game.action_seat(), Some(SeatId(1)));
}

/// A solo player keeps the start seat every round.
#[test]
fn test_solo_rounds() {
    let (mut game, mut log) = started(&GameConfig::new(1));
    assert_eq!(game.seats.len(), 2);

    play(&mut game, &mut log, "place prior to use h01 to choose clay");
    play(&mut game, &mut log, "place lay-brother to use h03 to choose coin");
    play(&mut game, &mut log, "pass");

    assert_eq!(game.round, Some(2));
    assert_eq!(game.action_seat(), Some(SeatId(0)));
}

// =============================================================================
// Replay
// =============================================================================

/// Replaying the same log into fresh games gives identical games.
#[test]
fn test_replay_is_deterministic() {
    let (live, log, _) = three_player_opening();

    let mut first = Game::new(GameConfig::new(3));
    first.sync(&log).unwrap();
    let mut second = Game::new(GameConfig::new(3));
    second.sync(&log).unwrap();

    assert_eq!(first.summary(), second.summary());
    assert_eq!(first.ledger, second.ledger);
    assert_eq!(first.summary(), live.summary());
    assert_eq!(first.last_applied(), log.last_id());
}

/// Syncing twice applies nothing the second time.
#[test]
fn test_sync_is_idempotent() {
    let (mut game, log, _) = three_player_opening();
    let before = game.summary();

    assert_eq!(game.sync(&log).unwrap(), 0);
    assert_eq!(game.summary(), before);
}

/// A bad record halts replay by default, and can be skipped on request.
#[test]
fn test_replay_policies() {
    let config = GameConfig::new(3);
    let mut log = MemoryLog::with_setup(&config);
    log.append(None, "setup finalize");
    log.append(None, "setup start");
    log.append(Some(SeatId(0)), "place prior to use h01 to choose wood");
    log.append(Some(SeatId(0)), "place prior to use h01 to choose clay");

    let mut halting = Game::new(config.clone());
    assert!(matches!(halting.sync(&log), Err(EngineError::Rejected { record: 5, .. })));
    assert_eq!(halting.last_applied(), Some(4));
    assert!(halting.message().is_some());

    let mut skipping = Game::new(config.with_replay_policy(ReplayPolicy::SkipRejected));
    skipping.sync(&log).unwrap();
    assert_eq!(skipping.rejected(), &[5]);
    assert_eq!(skipping.last_applied(), Some(6));
    assert_eq!(skipping.seats[0].inventory.count(GoodKind::Clay), Decimal::from(3));
}

/// A line that fails at the table stays in the log, and a fresh replay
/// ends up exactly where the live game is.
#[test]
fn test_rejected_line_replays_consistently() {
    let (mut live, mut log) = started(&GameConfig::new(3));
    play(&mut live, &mut log, "place prior to use h01 to choose clay");

    let err = live.submit(&mut log, Some(SeatId(0)), "place lay-brother to use h01 to choose clay");
    assert!(err.is_err());
    assert!(log.records().last().unwrap().rejected);
    assert_eq!(live.last_applied(), log.last_id());
    play(&mut live, &mut log, "pass");

    for policy in [ReplayPolicy::Halt, ReplayPolicy::SkipRejected] {
        let mut replayed = Game::new(GameConfig::new(3).with_replay_policy(policy));
        replayed.sync(&log).unwrap();
        assert_eq!(replayed.rejected(), live.rejected());
        assert_eq!(replayed.ledger, live.ledger);
        assert_eq!(replayed.summary(), live.summary());
    }
}
