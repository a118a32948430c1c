//! Scoring module - line-clear points, leveling and fall cadence
//!
//! Pure functions only. Points use the classic table scaled by
//! `1 + 0.25 * (level - 1)`, computed in integers with half-up rounding:
//! `(base * (level + 3) + 2) / 4`.

use crate::types::{
    BASE_DROP_MS, DROP_FACTOR, GARBAGE_FIRST_LEVEL, GARBAGE_LEVEL_STRIDE, LINES_PER_LEVEL,
    LINE_SCORES, MIN_DROP_MS,
};

/// Calculate line clear score
/// lines: number of lines cleared (0-4, anything else scores 0)
/// level: current level (1-based; 0 is treated as 1)
pub fn points(lines: u32, level: u32) -> u32 {
    let Some(&base) = LINE_SCORES.get(lines as usize) else {
        return 0;
    };
    let level = level.max(1);
    base.saturating_mul(level.saturating_add(3)).saturating_add(2) / 4
}

/// Level reached after `total_lines` cleared lines
pub fn next_level(total_lines: u32) -> u32 {
    1 + total_lines / LINES_PER_LEVEL
}

/// Garbage rows earned when the level becomes `level`
pub fn garbage_rows_for_level(level: u32) -> u32 {
    if level >= GARBAGE_FIRST_LEVEL && (level - GARBAGE_FIRST_LEVEL) % GARBAGE_LEVEL_STRIDE == 0 {
        1
    } else {
        0
    }
}

/// Fall interval in milliseconds with the default cadence constants
pub fn drop_interval_ms(level: u32) -> u64 {
    drop_interval_ms_with(level, BASE_DROP_MS, DROP_FACTOR, MIN_DROP_MS)
}

/// `max(min, round(base * factor^(level - 1)))`; levels at or below 1 use `base`.
pub fn drop_interval_ms_with(level: u32, base_ms: u64, factor: f64, min_ms: u64) -> u64 {
    if level <= 1 {
        return base_ms.max(min_ms);
    }
    let exponent = i32::try_from(level - 1).unwrap_or(i32::MAX);
    let scaled = (base_ms as f64 * factor.powi(exponent)).round();
    let scaled = if scaled.is_finite() && scaled > 0.0 {
        scaled as u64
    } else {
        0
    };
    scaled.max(min_ms)
}
