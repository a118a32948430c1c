//! Replay storage - one named artifact holding the last recorded session.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tetris_replay_core::ReplaySession;
use tracing::{debug, info};

use crate::error::StoreError;

pub trait ReplayStore: Send + Sync {
    fn save(&self, session: &ReplaySession) -> Result<(), StoreError>;

    /// Load and validate the saved session
    fn load(&self) -> Result<ReplaySession, StoreError>;

    /// Whether a session is available, without loading it
    fn has_saved_session(&self) -> bool;
}

/// Session stored as pretty JSON, replaced atomically on save
#[derive(Debug, Clone)]
pub struct JsonFileReplayStore {
    path: PathBuf,
}

impl JsonFileReplayStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn validate(session: ReplaySession) -> Result<ReplaySession, StoreError> {
    match session.check_well_formed() {
        Some(reason) => Err(StoreError::corrupt(reason)),
        None => Ok(session),
    }
}

impl ReplayStore for JsonFileReplayStore {
    fn save(&self, session: &ReplaySession) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(session)?;
        fs::write(&tmp, data)?;
        // Replaces the target in one step.
        fs::rename(&tmp, &self.path)?;
        info!(
            path = %self.path.display(),
            seed = session.seed,
            events = session.len(),
            "replay saved"
        );
        Ok(())
    }

    fn load(&self) -> Result<ReplaySession, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::Missing {
                path: self.path.clone(),
            });
        }
        let text = fs::read_to_string(&self.path)?;
        let session: ReplaySession =
            serde_json::from_str(&text).map_err(|e| StoreError::corrupt(e.to_string()))?;
        let session = validate(session)?;
        debug!(path = %self.path.display(), events = session.len(), "replay loaded");
        Ok(session)
    }

    fn has_saved_session(&self) -> bool {
        self.path.is_file()
    }
}

/// In-process store, mostly for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryReplayStore {
    slot: Mutex<Option<ReplaySession>>,
}

impl MemoryReplayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: ReplaySession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl ReplayStore for MemoryReplayStore {
    fn save(&self, session: &ReplaySession) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn load(&self) -> Result<ReplaySession, StoreError> {
        let stored = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match stored {
            Some(session) => validate(session),
            None => Err(StoreError::Missing {
                path: PathBuf::from("<memory>"),
            }),
        }
    }

    fn has_saved_session(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
