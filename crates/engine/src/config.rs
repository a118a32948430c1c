use std::time::Duration;

use tetris_replay_core::scoring::drop_interval_ms_with;
use tetris_replay_types::{
    BASE_DROP_MS, DROP_FACTOR, LINE_CLEAR_FLASH_MS, LINE_CLEAR_FLASH_STEPS, MIN_DROP_MS,
    PAUSE_POLL_MS,
};

/// Game loop cadence
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    pub base_drop_ms: u64,
    pub drop_factor: f64,
    pub min_drop_ms: u64,
    /// Steps a cleared row flashes before compaction (at least 1)
    pub flash_steps: u8,
    pub flash_ms: u64,
    pub pause_poll_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            base_drop_ms: BASE_DROP_MS,
            drop_factor: DROP_FACTOR,
            min_drop_ms: MIN_DROP_MS,
            flash_steps: LINE_CLEAR_FLASH_STEPS,
            flash_ms: LINE_CLEAR_FLASH_MS,
            pause_poll_ms: PAUSE_POLL_MS,
        }
    }
}

impl LoopConfig {
    /// Create from environment variables; unparseable values keep the defaults
    pub fn from_env() -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
            env::var(key)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();
        let drop_factor = parsed("TETRIS_DROP_FACTOR", defaults.drop_factor);
        Self {
            base_drop_ms: parsed("TETRIS_BASE_DROP_MS", defaults.base_drop_ms),
            drop_factor: if drop_factor > 0.0 && drop_factor < 1.0 {
                drop_factor
            } else {
                defaults.drop_factor
            },
            min_drop_ms: parsed("TETRIS_MIN_DROP_MS", defaults.min_drop_ms),
            flash_steps: parsed("TETRIS_FLASH_TICKS", defaults.flash_steps).max(1),
            flash_ms: parsed("TETRIS_FLASH_MS", defaults.flash_ms),
            pause_poll_ms: parsed("TETRIS_PAUSE_POLL_MS", defaults.pause_poll_ms).max(1),
        }
    }

    /// Fall interval for a level
    pub fn fall_interval(&self, level: u32) -> Duration {
        Duration::from_millis(drop_interval_ms_with(
            level,
            self.base_drop_ms,
            self.drop_factor,
            self.min_drop_ms,
        ))
    }

    /// Sleep after a step: the flash interval while rows flash, else the fall interval
    pub fn step_delay(&self, flashing: bool, level: u32) -> Duration {
        if flashing {
            self.flash_interval()
        } else {
            self.fall_interval(level)
        }
    }

    pub fn flash_interval(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }

    pub fn pause_poll(&self) -> Duration {
        Duration::from_millis(self.pause_poll_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cadence() {
        let config = LoopConfig::default();
        assert_eq!(config.fall_interval(1), Duration::from_millis(800));
        assert_eq!(config.fall_interval(2), Duration::from_millis(600));
        assert_eq!(config.fall_interval(40), Duration::from_millis(30));
        assert_eq!(config.flash_interval(), Duration::from_millis(150));
        assert_eq!(config.pause_poll(), Duration::from_millis(100));
    }

    #[test]
    fn custom_cadence_keeps_floor() {
        let config = LoopConfig {
            base_drop_ms: 10,
            min_drop_ms: 4,
            ..LoopConfig::default()
        };
        assert_eq!(config.fall_interval(1), Duration::from_millis(10));
        assert_eq!(config.fall_interval(9), Duration::from_millis(4));
    }
}
