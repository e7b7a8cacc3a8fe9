//! Scoring module - line clear points, combo bonus, level and gravity curves

use crate::types::{
    BASE_DROP_MS, COMBO_BASE, DROP_STEP_MS, LINES_PER_LEVEL, LINE_SCORES, MIN_DROP_MS,
};

/// Base points for clearing `lines` rows at `level`.
///
/// Counts above four cannot come from a single lock and score nothing.
pub fn line_clear_score(lines: usize, level: u32) -> u32 {
    LINE_SCORES
        .get(lines)
        .copied()
        .unwrap_or(0)
        .saturating_mul(level.saturating_add(1))
}

/// Combo bonus for the running combo counter (already updated for this lock).
pub fn combo_bonus(combo: u32) -> u32 {
    COMBO_BASE.saturating_mul(combo)
}

/// Points awarded for one lock.
pub fn calculate_score(level: u32, lines: usize, combo: u32) -> u32 {
    line_clear_score(lines, level).saturating_add(combo_bonus(combo))
}

/// Level reached after `total_lines` cleared lines.
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL
}

/// Gravity interval in milliseconds for `level`, floored at [`MIN_DROP_MS`].
pub fn calculate_drop_time(level: u32) -> u32 {
    BASE_DROP_MS
        .saturating_sub(level.saturating_mul(DROP_STEP_MS))
        .max(MIN_DROP_MS)
}
