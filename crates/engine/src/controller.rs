//! Game controller - runs a match on its own thread
//!
//! The loop and any number of input threads share one mutex around the
//! match, the step machine and the replay bookkeeping. Every check-then-commit
//! (move, rotate, tick, lock, compaction) happens inside a single critical
//! section. Observers are notified while the lock is still held, so frames
//! reach them in mutation order. An observer must not call back into the
//! controller.
//!
//! Per iteration the loop:
//!
//! 1. idles for the pause poll interval while paused,
//! 2. applies due playback events (playback only),
//! 3. runs one [`StepMachine`] step and publishes the result,
//! 4. sleeps for the flash interval or the level's fall interval,
//! 5. publishes a level-up reached by that step.
//!
//! On game over it finalizes: the replay session and the match result are
//! handed to their stores, and `GameOver` is published.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::Utc;
use tetris_replay_core::{Match, MatchSnapshot, Player, ReplaySession};
use tetris_replay_store::{MatchRecord, MatchStore, ReplayStore};
use tetris_replay_types::Command;
use tracing::{debug, info, warn};

use crate::config::LoopConfig;
use crate::events::{GameEvent, Observer, Observers};
use crate::playback::PlaybackCursor;
use crate::recorder::ReplayRecorder;
use crate::step::StepMachine;

struct LoopState {
    game: Match,
    machine: StepMachine,
    recorder: Option<ReplayRecorder>,
    playback: Option<PlaybackCursor>,
    paused: bool,
}

impl LoopState {
    fn snapshot(&self) -> MatchSnapshot {
        let mut snapshot = self.game.snapshot();
        snapshot.paused = self.paused;
        snapshot
    }
}

struct Shared {
    state: Mutex<LoopState>,
    running: AtomicBool,
    observers: Observers,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, LoopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Notify observers of `events` with the state they produced. Called
    /// with the lock held.
    fn publish(&self, state: &LoopState, events: &[GameEvent]) {
        if !events.is_empty() {
            self.observers.notify_all(events, &state.snapshot());
        }
    }
}

/// How a controller run ended
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub match_id: String,
    pub player: Player,
    pub snapshot: MatchSnapshot,
    pub steps: u64,
    pub duration: Duration,
    /// The recorded session, when this run was recording and reached game over
    pub session: Option<ReplaySession>,
    pub replay_saved: bool,
    pub result_saved: bool,
}

impl MatchSummary {
    pub fn game_over(&self) -> bool {
        self.snapshot.game_over
    }

    pub fn score(&self) -> u32 {
        self.snapshot.score
    }
}

/// Builder for one game-loop thread
pub struct GameController {
    game: Match,
    config: LoopConfig,
    observers: Observers,
    match_store: Option<Arc<dyn MatchStore>>,
    replay_store: Option<Arc<dyn ReplayStore>>,
    playback: Option<ReplaySession>,
}

impl GameController {
    pub fn new(game: Match, config: LoopConfig) -> Self {
        Self {
            game,
            config,
            observers: Observers::default(),
            match_store: None,
            replay_store: None,
            playback: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn with_match_store(mut self, store: Arc<dyn MatchStore>) -> Self {
        self.match_store = Some(store);
        self
    }

    pub fn with_replay_store(mut self, store: Arc<dyn ReplayStore>) -> Self {
        self.replay_store = Some(store);
        self
    }

    /// Drive the match from a recorded session instead of live input.
    ///
    /// The match is re-created from the session seed, keeping its id and
    /// player. Playback never records.
    pub fn playback(mut self, session: ReplaySession) -> Self {
        self.game = Match::new(
            self.game.id().to_string(),
            self.game.player().clone(),
            session.seed,
        );
        self.playback = Some(session);
        self
    }

    /// Start the `game-loop` thread
    pub fn spawn(self) -> io::Result<ControllerHandle> {
        let started = Instant::now();
        let recording = self.playback.is_none();
        let recorder = recording.then(|| ReplayRecorder::starting_at(self.game.seed(), started));

        info!(
            match_id = %self.game.id(),
            player = %self.game.player().name,
            seed = self.game.seed(),
            playback = !recording,
            observers = self.observers.len(),
            "match starting"
        );

        let shared = Arc::new(Shared {
            state: Mutex::new(LoopState {
                machine: StepMachine::new(self.config.flash_steps),
                game: self.game,
                recorder,
                playback: self.playback.map(PlaybackCursor::new),
                paused: false,
            }),
            running: AtomicBool::new(true),
            observers: self.observers,
        });

        let runner = Runner {
            shared: Arc::clone(&shared),
            config: self.config,
            match_store: self.match_store,
            replay_store: self.replay_store,
            started,
        };
        let thread = thread::Builder::new()
            .name("game-loop".to_string())
            .spawn(move || runner.run())?;

        Ok(ControllerHandle { shared, thread })
    }
}

/// Cloneable command entry point for input sources
#[derive(Clone)]
pub struct InputPort {
    shared: Arc<Shared>,
}

impl InputPort {
    /// Apply one command. Returns whether it changed the match or pause state.
    ///
    /// Rejected when paused (except `TogglePause`), during playback, after
    /// stop, or once the match is over. Accepted piece commands are recorded.
    pub fn apply(&self, command: Command) -> bool {
        if !self.shared.is_running() {
            return false;
        }

        let mut state = self.shared.lock();
        // `finish` clears the flag before it takes the final snapshot.
        if !self.shared.is_running() || state.game.is_game_over() {
            return false;
        }

        let mut events = Vec::with_capacity(2);
        if command == Command::TogglePause {
            state.paused = !state.paused;
            debug!(paused = state.paused, "pause toggled");
            events.push(GameEvent::Paused(state.paused));
        } else {
            if state.paused || state.playback.is_some() {
                return false;
            }
            let outcome = state.game.apply(command);
            if !outcome.accepted {
                return false;
            }
            let steps = state.machine.steps();
            if let Some(recorder) = state.recorder.as_mut() {
                recorder.record(command, steps);
            }
            events.push(GameEvent::StateChanged);
            if let Some(report) = outcome.lock.filter(|r| r.leveled_up) {
                events.push(GameEvent::LevelUp {
                    level: report.level,
                });
            }
        }

        self.shared.publish(&state, &events);
        true
    }

    pub fn move_left(&self) -> bool {
        self.apply(Command::MoveLeft)
    }

    pub fn move_right(&self) -> bool {
        self.apply(Command::MoveRight)
    }

    pub fn soft_drop(&self) -> bool {
        self.apply(Command::SoftDrop)
    }

    pub fn rotate(&self) -> bool {
        self.apply(Command::Rotate)
    }

    pub fn hard_drop(&self) -> bool {
        self.apply(Command::HardDrop)
    }

    pub fn toggle_pause(&self) -> bool {
        self.apply(Command::TogglePause)
    }

    /// Reassign the match's player
    pub fn set_player(&self, player: Player) {
        self.shared.lock().game.set_player(player);
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        self.shared.lock().snapshot()
    }
}

pub struct ControllerHandle {
    shared: Arc<Shared>,
    thread: JoinHandle<MatchSummary>,
}

impl ControllerHandle {
    pub fn input(&self) -> InputPort {
        InputPort {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Ask the loop to exit; observed within one sleep or pause poll.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running() && !self.thread.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        self.shared.lock().snapshot()
    }

    pub fn player(&self) -> Player {
        self.shared.lock().game.player().clone()
    }

    /// Loop steps completed so far
    pub fn steps(&self) -> u64 {
        self.shared.lock().machine.steps()
    }

    /// Playback is still feeding recorded events
    pub fn in_playback(&self) -> bool {
        self.shared.lock().playback.is_some()
    }

    pub fn join(self) -> thread::Result<MatchSummary> {
        self.thread.join()
    }
}

struct Runner {
    shared: Arc<Shared>,
    config: LoopConfig,
    match_store: Option<Arc<dyn MatchStore>>,
    replay_store: Option<Arc<dyn ReplayStore>>,
    started: Instant,
}

impl Runner {
    fn run(self) -> MatchSummary {
        {
            let state = self.shared.lock();
            self.shared.publish(&state, &[GameEvent::StateChanged]);
        }

        while self.shared.is_running() {
            let mut events = Vec::with_capacity(2);
            let mut level_up = None;

            let (game_over, delay) = {
                let mut state = self.shared.lock();
                if !self.shared.is_running() || state.game.is_game_over() {
                    break;
                }
                if state.paused {
                    drop(state);
                    thread::sleep(self.config.pause_poll());
                    continue;
                }

                if self.feed_playback(&mut state, &mut events, &mut level_up) {
                    self.shared.publish(&state, &events);
                    continue;
                }
                if state.game.is_game_over() {
                    self.shared.publish(&state, &events);
                    break;
                }

                let LoopState { game, machine, .. } = &mut *state;
                let step = machine.step(game);
                events.push(GameEvent::StateChanged);
                if let Some(rows) = step.flash_rows() {
                    events.push(GameEvent::LineClearStarted { rows });
                }
                if let Some(report) = step.lock().filter(|r| r.leveled_up) {
                    level_up = Some(report.level);
                }

                let delay = self
                    .config
                    .step_delay(state.machine.is_flashing(), state.game.level());
                self.shared.publish(&state, &events);
                (state.game.is_game_over(), delay)
            };

            if game_over {
                break;
            }

            thread::sleep(delay);

            if let Some(level) = level_up {
                let state = self.shared.lock();
                // A stop issued during the sleep drops the notification.
                if self.shared.is_running() {
                    self.shared.publish(&state, &[GameEvent::LevelUp { level }]);
                }
            }
        }

        self.finish()
    }

    /// Apply due recorded events. Returns true when playback just ended and
    /// the loop paused on the final state.
    fn feed_playback(
        &self,
        state: &mut LoopState,
        events: &mut Vec<GameEvent>,
        level_up: &mut Option<u32>,
    ) -> bool {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        let steps = state.machine.steps();
        let LoopState { game, playback, .. } = state;
        let Some(cursor) = playback.as_mut() else {
            return false;
        };

        let before = cursor.applied();
        while let Some(command) = cursor.next_due(steps, elapsed_ms) {
            let outcome = game.apply(command);
            if let Some(report) = outcome.lock.filter(|r| r.leveled_up) {
                *level_up = Some(report.level);
            }
        }
        if cursor.applied() > before {
            events.push(GameEvent::StateChanged);
        }
        if let Some(level) = level_up.take() {
            events.push(GameEvent::LevelUp { level });
        }

        if !cursor.is_finished(steps) || game.is_game_over() {
            return false;
        }

        info!(applied = cursor.applied(), steps, "playback finished");
        state.playback = None;
        state.paused = true;
        events.push(GameEvent::Paused(true));
        true
    }

    fn finish(self) -> MatchSummary {
        self.shared.running.store(false, Ordering::Release);
        let duration = self.started.elapsed();

        let (game, snapshot, steps, recorder) = {
            let mut state = self.shared.lock();
            (
                state.game.clone(),
                state.snapshot(),
                state.machine.steps(),
                state.recorder.take(),
            )
        };

        let mut summary = MatchSummary {
            match_id: game.id().to_string(),
            player: game.player().clone(),
            snapshot,
            steps,
            duration,
            session: None,
            replay_saved: false,
            result_saved: false,
        };

        if !game.is_game_over() {
            info!(match_id = %summary.match_id, steps, "match stopped");
            return summary;
        }

        info!(
            match_id = %summary.match_id,
            score = game.score(),
            level = game.level(),
            lines = game.lines(),
            steps,
            "match over"
        );

        if let Some(recorder) = recorder {
            let session = recorder.finish(steps);
            if let Some(store) = &self.replay_store {
                match store.save(&session) {
                    Ok(()) => summary.replay_saved = true,
                    Err(e) => warn!(error = %e, "replay save failed"),
                }
            }
            summary.session = Some(session);

            // Playback runs are not new results.
            if let Some(store) = &self.match_store {
                let record = MatchRecord::from_match(&game, duration, Utc::now());
                match store.save_result(&record) {
                    Ok(()) => summary.result_saved = true,
                    Err(e) => warn!(error = %e, "match result save failed"),
                }
            }
        }

        self.shared.observers.notify(
            &GameEvent::GameOver {
                score: game.score(),
            },
            &snapshot,
        );
        summary
    }
}
