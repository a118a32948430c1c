//! Terminal front-end for a running controller.
//!
//! Observers fire on the game-loop thread, so [`ChannelObserver`] only
//! forwards snapshots and sound cues over an `mpsc` channel. The main thread
//! owns the terminal: it drains the channel, draws the latest frame, rings
//! the bell for cues and feeds key presses into the controller's input port.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::debug;

use crate::core::MatchSnapshot;
use crate::engine::{ControllerHandle, GameEvent, Observer};
use crate::input::{handle_key_event, is_actionable, should_quit};
use crate::term::{FrameBuffer, GameView, HudInfo, TerminalRenderer, Viewport};

const FRAME_MS: u64 = 33;
/// Half period of the line-clear flash blink
const BLINK_MS: u128 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMessage {
    Frame(MatchSnapshot),
    /// Level-up, line-clear start or game over
    Cue(GameEvent),
}

/// Render and audio adapter: forwards everything to the UI thread.
pub struct ChannelObserver {
    tx: Sender<UiMessage>,
}

impl ChannelObserver {
    pub fn channel() -> (Arc<Self>, Receiver<UiMessage>) {
        let (tx, rx) = mpsc::channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl Observer for ChannelObserver {
    fn on_event(&self, event: &GameEvent, snapshot: &MatchSnapshot) {
        // A closed receiver means the UI is gone; the loop is about to stop.
        if event.is_cue() {
            let _ = self.tx.send(UiMessage::Cue(*event));
        }
        let _ = self.tx.send(UiMessage::Frame(*snapshot));
    }
}

/// What drained messages amount to for one frame
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Drained {
    pub latest: Option<MatchSnapshot>,
    pub cues: usize,
    pub disconnected: bool,
}

/// Take everything queued, keeping only the newest snapshot.
pub fn drain(rx: &Receiver<UiMessage>) -> Drained {
    let mut drained = Drained::default();
    loop {
        match rx.try_recv() {
            Ok(UiMessage::Frame(snapshot)) => drained.latest = Some(snapshot),
            Ok(UiMessage::Cue(_)) => drained.cues += 1,
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                drained.disconnected = true;
                break;
            }
        }
    }
    drained
}

/// Run the draw/input loop until the player quits.
///
/// The loop keeps showing the final board after game over so the player can
/// read it; `q` leaves in every state.
pub fn run_terminal(
    term: &mut TerminalRenderer,
    handle: &ControllerHandle,
    rx: &Receiver<UiMessage>,
    player: &str,
    mode: &str,
) -> Result<()> {
    let view = GameView::default();
    let input = handle.input();
    let started = Instant::now();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snapshot = handle.snapshot();

    loop {
        let drained = drain(rx);
        if let Some(latest) = drained.latest {
            snapshot = latest;
        }
        if drained.cues > 0 {
            term.bell().context("ring bell")?;
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let hud = HudInfo {
            player,
            mode,
            flash_on: (started.elapsed().as_millis() / BLINK_MS) % 2 == 0,
        };
        view.render_into(&snapshot, &hud, Viewport::new(w, h), &mut fb);
        term.draw(&fb).context("draw frame")?;

        if !event::poll(Duration::from_millis(FRAME_MS)).context("poll terminal events")? {
            continue;
        }
        match event::read().context("read terminal event")? {
            Event::Key(key) if should_quit(key) => {
                debug!("quit requested");
                return Ok(());
            }
            Event::Key(key) if is_actionable(&key) => {
                if let Some(command) = handle_key_event(key) {
                    input.apply(command);
                }
            }
            Event::Resize(..) => term.invalidate(),
            _ => {}
        }
    }
}
