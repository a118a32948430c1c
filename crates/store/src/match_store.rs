//! Match results - one record per finished match, plus ranking queries.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tetris_replay_core::Match;
use tracing::{info, warn};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub player_id: u64,
    pub player_name: String,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub duration_secs: u64,
    pub finished_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn from_match(game: &Match, duration: Duration, finished_at: DateTime<Utc>) -> Self {
        Self {
            match_id: game.id().to_string(),
            player_id: game.player().id,
            player_name: game.player().name.clone(),
            score: game.score(),
            lines: game.lines(),
            level: game.level(),
            duration_secs: duration.as_secs(),
            finished_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerStats {
    pub player_id: u64,
    pub matches: u32,
    pub best_score: u32,
    pub total_lines: u64,
    pub total_secs: u64,
}

/// Best score first; ties go to the earlier finish.
fn rank(records: &mut [MatchRecord]) {
    records.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.finished_at.cmp(&b.finished_at))
    });
}

pub trait MatchStore: Send + Sync {
    fn save_result(&self, record: &MatchRecord) -> Result<(), StoreError>;

    /// Every stored record, in insertion order
    fn records(&self) -> Result<Vec<MatchRecord>, StoreError>;

    fn top_scores(&self, limit: usize) -> Result<Vec<MatchRecord>, StoreError> {
        let mut records = self.records()?;
        rank(&mut records);
        records.truncate(limit);
        Ok(records)
    }

    fn player_scores(&self, player_id: u64, limit: usize) -> Result<Vec<MatchRecord>, StoreError> {
        let mut records: Vec<_> = self
            .records()?
            .into_iter()
            .filter(|r| r.player_id == player_id)
            .collect();
        rank(&mut records);
        records.truncate(limit);
        Ok(records)
    }

    fn player_stats(&self, player_id: u64) -> Result<PlayerStats, StoreError> {
        let stats = self
            .records()?
            .iter()
            .filter(|r| r.player_id == player_id)
            .fold(
                PlayerStats {
                    player_id,
                    ..PlayerStats::default()
                },
                |mut acc, r| {
                    acc.matches += 1;
                    acc.best_score = acc.best_score.max(r.score);
                    acc.total_lines += u64::from(r.lines);
                    acc.total_secs += r.duration_secs;
                    acc
                },
            );
        Ok(stats)
    }
}

/// Append-only JSON-lines file
#[derive(Debug, Clone)]
pub struct JsonlMatchStore {
    path: PathBuf,
}

impl JsonlMatchStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatchStore for JsonlMatchStore {
    fn save_result(&self, record: &MatchRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        info!(
            match_id = %record.match_id,
            player = %record.player_name,
            score = record.score,
            "match result saved"
        );
        Ok(())
    }

    fn records(&self) -> Result<Vec<MatchRecord>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut out = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<MatchRecord>(line) {
                Ok(record) => out.push(record),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %e,
                    "skipping unreadable match record"
                ),
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Default)]
pub struct MemoryMatchStore {
    records: Mutex<Vec<MatchRecord>>,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for MemoryMatchStore {
    fn save_result(&self, record: &MatchRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn records(&self) -> Result<Vec<MatchRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(player: &str, score: u32, minute: u32) -> MatchRecord {
        MatchRecord {
            match_id: format!("{}-{}", player, minute),
            player_id: tetris_replay_core::player::player_id_for(player),
            player_name: player.to_string(),
            score,
            lines: score / 100,
            level: 1,
            duration_secs: 60,
            finished_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn top_scores_rank_by_score_then_time() {
        let store = MemoryMatchStore::new();
        store.save_result(&record("ada", 500, 3)).unwrap();
        store.save_result(&record("bob", 900, 1)).unwrap();
        store.save_result(&record("cy", 500, 2)).unwrap();

        let top = store.top_scores(2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].player_name, "bob");
        assert_eq!(top[1].player_name, "cy");
    }

    #[test]
    fn player_stats_aggregate() {
        let store = MemoryMatchStore::new();
        store.save_result(&record("ada", 300, 1)).unwrap();
        store.save_result(&record("ada", 700, 2)).unwrap();
        store.save_result(&record("bob", 900, 3)).unwrap();

        let id = tetris_replay_core::player::player_id_for("ada");
        let stats = store.player_stats(id).unwrap();
        assert_eq!(stats.matches, 2);
        assert_eq!(stats.best_score, 700);
        assert_eq!(stats.total_lines, 10);
        assert_eq!(stats.total_secs, 120);

        let scores = store.player_scores(id, 10).unwrap();
        assert_eq!(scores.iter().map(|r| r.score).collect::<Vec<_>>(), vec![700, 300]);
    }

    #[test]
    fn jsonl_store_appends_and_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");
        let store = JsonlMatchStore::new(&path);
        assert!(store.records().unwrap().is_empty());

        store.save_result(&record("ada", 100, 1)).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"not a record\n").unwrap();
        store.save_result(&record("bob", 200, 2)).unwrap();

        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], record("bob", 200, 2));
    }
}
