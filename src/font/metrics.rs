//! Vertical font metrics
//!
//! Raw design-unit values as read from `hhea`/`OS/2`. Nothing here is
//! scaled; the nudge calculator scales to rem per element.

/// Vertical metrics of one font file, in font design units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Distance from baseline to the top of the line box
    pub ascent: f64,
    /// Distance below the baseline (conventionally negative)
    pub descent: f64,
    /// Extra spacing between lines (>= 0)
    pub line_gap: f64,
    /// Design units per em (> 0)
    units_per_em: f64,
}

impl FontMetrics {
    /// Build metrics, refusing a non-positive or non-finite units-per-em.
    ///
    /// A negative line gap is clamped to zero.
    pub fn new(ascent: f64, descent: f64, line_gap: f64, units_per_em: f64) -> Option<Self> {
        if !(units_per_em.is_finite() && units_per_em > 0.0) {
            return None;
        }
        if !(ascent.is_finite() && descent.is_finite() && line_gap.is_finite()) {
            return None;
        }
        Some(Self {
            ascent,
            descent,
            line_gap: line_gap.max(0.0),
            units_per_em,
        })
    }

    pub fn units_per_em(&self) -> f64 {
        self.units_per_em
    }

    /// True when both vertical extents are zero, which some parsers
    /// report instead of failing when the tables are missing
    pub fn is_degenerate(&self) -> bool {
        self.ascent == 0.0 && self.descent == 0.0
    }

    /// Scale a design-unit value to rem at the given font size
    #[inline]
    pub fn to_rem(&self, design_units: f64, font_size_rem: f64) -> f64 {
        design_units * font_size_rem / self.units_per_em
    }
}
