//! rem value helpers
//!
//! Every length the grid emits is rounded to a fixed number of decimals
//! and rendered with a `rem` suffix.

use crate::constants::REM_DECIMAL_PLACES;

/// Round half-up to `REM_DECIMAL_PLACES` decimals.
///
/// Negative zero is folded to `0.0` so it never prints as `-0rem`.
pub fn round_rem(value: f64) -> f64 {
    let factor = 10f64.powi(REM_DECIMAL_PLACES);
    let rounded = (value * factor + 0.5).floor() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Format a value as a CSS rem length (e.g. `0.2876rem`)
pub fn format_rem(value: f64) -> String {
    format!("{}rem", round_rem(value))
}
