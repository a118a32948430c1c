//! Threaded controller tests: recording, persistence, playback and pause.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tetris_replay::core::{Board, Match, MatchSnapshot, Piece, Player, ReplaySession};
use tetris_replay::engine::{
    simulate, ControllerHandle, GameController, GameEvent, LoopConfig, MatchSummary, Observer,
};
use tetris_replay::store::{MatchStore, MemoryMatchStore, MemoryReplayStore, ReplayStore};
use tetris_replay::types::{Color, PieceKind, Position};

const DEADLINE: Duration = Duration::from_secs(20);

fn fast_config() -> LoopConfig {
    LoopConfig {
        base_drop_ms: 2,
        min_drop_ms: 1,
        flash_ms: 1,
        pause_poll_ms: 1,
        ..LoopConfig::default()
    }
}

fn player() -> Player {
    Player::new("replayer")
}

/// Hard-drop until the match ends, then collect the summary.
fn drop_until_over(handle: ControllerHandle) -> MatchSummary {
    let input = handle.input();
    let started = Instant::now();
    while !handle.is_finished() {
        assert!(started.elapsed() < DEADLINE, "match did not finish in time");
        input.hard_drop();
        if started.elapsed().as_millis() % 3 == 0 {
            input.move_left();
        }
        thread::sleep(Duration::from_millis(1));
    }
    handle.join().expect("game loop panicked")
}

fn wait_until(mut done: impl FnMut() -> bool) {
    let started = Instant::now();
    while !done() {
        assert!(started.elapsed() < DEADLINE, "condition not reached in time");
        thread::sleep(Duration::from_millis(1));
    }
}

fn recorded_match(seed: u64) -> MatchSummary {
    let game = Match::new("recorded", player(), seed);
    let handle = GameController::new(game, fast_config()).spawn().unwrap();
    drop_until_over(handle)
}

#[test]
fn test_recorded_session_simulates_to_the_same_final_state() {
    let summary = recorded_match(31337);
    assert!(summary.game_over());

    let session = summary.session.clone().expect("recording ends with a session");
    assert_eq!(session.seed, 31337);
    assert_eq!(session.total_steps, Some(summary.steps));
    assert_eq!(session.check_well_formed(), None);

    let sim = simulate(&session, player(), &fast_config());
    assert!(sim.complete);
    assert_eq!(sim.game.snapshot(), summary.snapshot);
}

#[test]
fn test_finished_match_is_persisted_once() {
    let replays = Arc::new(MemoryReplayStore::new());
    let results = Arc::new(MemoryMatchStore::new());
    let game = Match::new("persisted", player(), 5);
    let handle = GameController::new(game, fast_config())
        .with_replay_store(replays.clone())
        .with_match_store(results.clone())
        .spawn()
        .unwrap();

    let summary = drop_until_over(handle);
    assert!(summary.replay_saved);
    assert!(summary.result_saved);

    let saved: ReplaySession = replays.load().unwrap();
    assert_eq!(Some(saved), summary.session);

    let records = results.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].match_id, "persisted");
    assert_eq!(records[0].score, summary.score());
    assert_eq!(records[0].player_id, player().id);
}

#[test]
fn test_playback_reaches_the_recorded_state_and_ignores_live_input() {
    let recorded = recorded_match(2718);
    let session = recorded.session.clone().unwrap();

    let replays = Arc::new(MemoryReplayStore::new());
    let results = Arc::new(MemoryMatchStore::new());
    let game = Match::new("playback", player(), 0);
    let handle = GameController::new(game, fast_config())
        .with_replay_store(replays.clone())
        .with_match_store(results.clone())
        .playback(session)
        .spawn()
        .unwrap();

    assert!(!handle.input().move_right());
    wait_until(|| handle.is_finished());
    let summary = handle.join().unwrap();

    assert_eq!(summary.snapshot, recorded.snapshot);
    assert!(summary.session.is_none());
    assert!(!summary.replay_saved);
    assert!(!summary.result_saved);
    assert!(!replays.has_saved_session());
    assert!(results.records().unwrap().is_empty());
}

#[test]
fn test_pause_freezes_the_loop_and_rejects_piece_commands() {
    let config = LoopConfig {
        base_drop_ms: 5,
        ..fast_config()
    };
    let handle = GameController::new(Match::new("paused", player(), 9), config)
        .spawn()
        .unwrap();
    let input = handle.input();

    wait_until(|| handle.steps() >= 2);
    assert!(input.toggle_pause());
    assert!(handle.snapshot().paused);

    // Let an in-flight step settle before sampling.
    thread::sleep(Duration::from_millis(20));
    let frozen = handle.steps();
    let snapshot = handle.snapshot();
    thread::sleep(Duration::from_millis(40));
    assert_eq!(handle.steps(), frozen);
    assert!(!input.move_left());
    assert!(!input.hard_drop());
    assert_eq!(handle.snapshot(), snapshot);

    assert!(input.toggle_pause());
    wait_until(|| handle.steps() > frozen);

    handle.stop();
    let summary = handle.join().unwrap();
    assert!(!summary.game_over());
    assert!(summary.session.is_none());
    assert!(!input.move_left(), "stopped controllers reject input");
}

#[test]
fn test_observers_see_one_game_over() {
    let events: Arc<Mutex<Vec<GameEvent>>> = Arc::default();
    let sink = Arc::clone(&events);
    let game = Match::new("observed", player(), 404);
    let handle = GameController::new(game, fast_config())
        .with_observer(Arc::new(move |event: &GameEvent, _snapshot: &MatchSnapshot| {
            sink.lock().unwrap().push(*event);
        }))
        .spawn()
        .unwrap();

    let summary = drop_until_over(handle);
    let events = events.lock().unwrap();
    let game_overs: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .collect();
    assert_eq!(game_overs, vec![&GameEvent::GameOver { score: summary.score() }]);
    assert!(events.contains(&GameEvent::StateChanged));
}

#[test]
fn test_set_player_mid_match_is_reflected_in_the_summary() {
    let handle = GameController::new(Match::new("renamed", player(), 3), fast_config())
        .spawn()
        .unwrap();
    let renamed = Player::new("someone-else");
    handle.input().set_player(renamed.clone());
    assert_eq!(handle.snapshot().player_id, renamed.id);

    handle.stop();
    let summary = handle.join().unwrap();
    assert_eq!(summary.player, renamed);
}

type EventLog = Arc<Mutex<Vec<(GameEvent, MatchSnapshot)>>>;

fn logging_observer(log: &EventLog) -> Arc<dyn Observer> {
    let sink = Arc::clone(log);
    Arc::new(move |event: &GameEvent, snapshot: &MatchSnapshot| {
        sink.lock().unwrap().push((*event, *snapshot));
    })
}

#[test]
fn test_observer_frames_arrive_in_mutation_order() {
    let log: EventLog = Arc::default();
    let handle = GameController::new(Match::new("ordered", player(), 1234), fast_config())
        .with_observer(logging_observer(&log))
        .spawn()
        .unwrap();

    // A second input thread competes with the loop and the driver below.
    let rotator = handle.input();
    let spinner = thread::spawn(move || {
        for _ in 0..2000 {
            if !rotator.rotate() && !rotator.move_right() {
                thread::sleep(Duration::from_micros(200));
            }
        }
    });
    let summary = drop_until_over(handle);
    spinner.join().unwrap();

    let log = log.lock().unwrap();
    let scores: Vec<u32> = log.iter().map(|(_, s)| s.score).collect();
    assert!(scores.windows(2).all(|w| w[0] <= w[1]), "score went backwards");

    let (last_event, last_frame) = log.last().copied().unwrap();
    assert_eq!(last_event, GameEvent::GameOver { score: summary.score() });
    let before_game_over = log[log.len() - 2].1;
    assert_eq!(before_game_over, summary.snapshot);
    assert_eq!(last_frame, summary.snapshot);
}

#[test]
fn test_stop_during_flash_drops_the_pending_level_up() {
    // Four rows full except the right column; a vertical I completes them all.
    let mut board = Board::new();
    for y in 16..20 {
        for x in 0..9 {
            board.set(x, y, Some(Color::Gray));
        }
    }
    let mut game = Match::new("stopped", player(), 17).with_board(board);
    assert!(game.place_active(Piece::at(PieceKind::I, Position::new(9, 12), 1)));

    let config = LoopConfig {
        base_drop_ms: 1,
        min_drop_ms: 1,
        flash_ms: 500,
        pause_poll_ms: 1,
        ..LoopConfig::default()
    };
    let log: EventLog = Arc::default();
    let handle = GameController::new(game, config)
        .with_observer(logging_observer(&log))
        .spawn()
        .unwrap();
    let input = handle.input();

    let saw_clear = || {
        log.lock()
            .unwrap()
            .iter()
            .any(|(e, _)| *e == GameEvent::LineClearStarted { rows: 4 })
    };
    wait_until(saw_clear);
    handle.stop();
    let summary = handle.join().unwrap();

    assert_eq!(summary.snapshot.level, 2);
    let published = log.lock().unwrap().len();
    assert!(log
        .lock()
        .unwrap()
        .iter()
        .all(|(e, _)| !matches!(e, GameEvent::LevelUp { .. })));

    assert!(!input.move_left());
    assert!(!input.toggle_pause());
    assert_eq!(log.lock().unwrap().len(), published);
}
