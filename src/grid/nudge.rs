//! Baseline nudge calculation
//!
//! Computes the `padding-top` that moves a text block's first baseline
//! down onto the next baseline-grid line.
//!
//! ```text
//!  line box top ─┬──────────────────────────
//!                │ leading / 2
//!                │ line gap / 2
//!                │ ascender
//!  baseline ─────┼────────────  ← baseline offset
//!                │ nudge
//!  grid line ────┴──────────────────────────
//! ```

use crate::constants::ONE_PIXEL_IN_REM;
use crate::error::{GridError, Result};
use crate::font::FontMetrics;
use crate::utils::round_rem;

/// Compute the nudge (rem) for one element.
///
/// `line_height_units` is expressed in baseline units and multiplied by
/// `baseline_unit_rem` here. Returns `MetricsUnavailable` when no font has
/// been loaded for the element's family.
pub fn calculate_nudge(
    font_size_rem: f64,
    line_height_units: f64,
    baseline_unit_rem: f64,
    metrics: Option<&FontMetrics>,
) -> Result<f64> {
    let metrics = metrics.ok_or(GridError::MetricsUnavailable { family: None })?;
    check_positive("font size", font_size_rem)?;
    check_positive("line height", line_height_units)?;
    check_positive("baseline unit", baseline_unit_rem)?;

    let offset = baseline_offset(font_size_rem, line_height_units, baseline_unit_rem, metrics);
    let mut nudge = snap_to_grid(offset, baseline_unit_rem);

    if nudge > 0.0 {
        nudge -= drift_compensation(font_size_rem);
    }
    // Compensation pushed us above the grid line: move to the next one
    if nudge < 0.0 {
        nudge += baseline_unit_rem;
    }

    Ok(round_rem(nudge))
}

/// Distance from the top of the line box to the natural baseline (rem).
///
/// The line gap is split evenly above and below the glyph box.
pub fn baseline_offset(
    font_size_rem: f64,
    line_height_units: f64,
    baseline_unit_rem: f64,
    metrics: &FontMetrics,
) -> f64 {
    let ascender = metrics.to_rem(metrics.ascent, font_size_rem);
    let descender = metrics.to_rem(metrics.descent.abs(), font_size_rem);
    let line_gap = metrics.to_rem(metrics.line_gap, font_size_rem);

    let content_area = ascender + line_gap + descender;
    // Negative when the line height is tighter than the font's metrics
    let leading = line_height_units * baseline_unit_rem - content_area;

    leading / 2.0 + ascender + line_gap / 2.0
}

/// Distance from `offset` down to the next grid line, in `[0, unit)`
pub fn snap_to_grid(offset: f64, baseline_unit_rem: f64) -> f64 {
    (offset / baseline_unit_rem).ceil() * baseline_unit_rem - offset
}

/// Empirical correction for the ~1px rounding drift visible on large type.
///
/// Zero at 1rem and below, grows with the font size. Assumes a 16px root.
// TODO: recalibrate the curve against rendered output at 1x and 2x DPR
pub fn drift_compensation(font_size_rem: f64) -> f64 {
    let scale = (font_size_rem - 1.0).max(0.0);
    ONE_PIXEL_IN_REM / font_size_rem * scale
}

fn check_positive(what: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidDimension { what, value })
    }
}
