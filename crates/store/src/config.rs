use std::path::PathBuf;

pub const DEFAULT_REPLAY_PATH: &str = "last_replay.json";
pub const DEFAULT_RESULTS_PATH: &str = "match_results.jsonl";

/// Where replays and match results live on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub replay_path: PathBuf,
    pub results_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            replay_path: PathBuf::from(DEFAULT_REPLAY_PATH),
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
        }
    }
}

impl StorageConfig {
    /// Create from environment variables; blank values keep the defaults
    pub fn from_env() -> Self {
        use std::env;

        let path_var = |key: &str, default: &str| {
            env::var(key)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            replay_path: path_var("TETRIS_REPLAY_PATH", DEFAULT_REPLAY_PATH),
            results_path: path_var("TETRIS_RESULTS_PATH", DEFAULT_RESULTS_PATH),
        }
    }
}
