//! Element token assembly
//!
//! Joins each configured typography element with its family's resolved
//! name and metrics, runs the nudge calculator, and produces the record
//! downstream serializers consume.

use crate::constants::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_WEIGHT, DEFAULT_SPACE_AFTER_UNITS};
use crate::error::{GridError, Result};
use crate::font::FontMetrics;
use crate::grid::nudge::calculate_nudge;
use crate::utils::{format_rem, round_rem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CSS `font-style`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn as_css(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

/// One typography element as configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypographyElement {
    /// Token key (`h1`, `body`, `caption`)
    pub identifier: String,
    /// Font size in rem
    #[serde(rename = "font_size")]
    pub font_size_rem: f64,
    /// Line height in baseline units (multiple of 0.5)
    #[serde(rename = "line_height")]
    pub line_height_units: f64,
    /// Space after the block in baseline units
    #[serde(rename = "space_after", default)]
    pub space_after_units: Option<f64>,
    /// Key into `[fonts.*]`
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_weight: Option<u16>,
    #[serde(default)]
    pub font_style: Option<FontStyle>,
}

/// Values substituted for fields an element leaves out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementDefaults {
    /// Family key (default: "sans")
    pub font_family: String,
    /// Weight (default: 400)
    pub font_weight: u16,
    /// Style (default: normal)
    pub font_style: FontStyle,
    /// Space after, in baseline units (default: 4)
    #[serde(rename = "space_after")]
    pub space_after_units: f64,
}

impl Default for ElementDefaults {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_weight: DEFAULT_FONT_WEIGHT,
            font_style: FontStyle::Normal,
            space_after_units: DEFAULT_SPACE_AFTER_UNITS,
        }
    }
}

/// A configured family after its font was loaded and named
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFamily {
    /// Display name used as `font-family`
    pub name: String,
    /// `None` when the file could not be measured
    pub metrics: Option<FontMetrics>,
}

/// Final per-element values, all lengths in rem
#[derive(Debug, Clone, PartialEq)]
pub struct ElementToken {
    pub identifier: String,
    pub font_size_rem: f64,
    pub line_height_rem: f64,
    pub font_family: String,
    pub font_weight: u16,
    pub font_style: FontStyle,
    pub space_after_rem: f64,
    pub nudge_top_rem: f64,
}

impl ElementToken {
    /// `margin-bottom` that keeps the following block on the grid once
    /// the nudge has been added as `padding-top`
    pub fn margin_bottom_rem(&self) -> f64 {
        round_rem(self.space_after_rem - self.nudge_top_rem)
    }
}

/// Serialized shape: rem strings except weight/style/family
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRecord<'a> {
    font_size: String,
    line_height: String,
    font_family: &'a str,
    font_weight: u16,
    font_style: &'static str,
    space_after: String,
    nudge_top: String,
    margin_bottom: String,
}

impl Serialize for ElementToken {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        TokenRecord {
            font_size: format_rem(self.font_size_rem),
            line_height: format_rem(self.line_height_rem),
            font_family: &self.font_family,
            font_weight: self.font_weight,
            font_style: self.font_style.as_css(),
            space_after: format_rem(self.space_after_rem),
            nudge_top: format_rem(self.nudge_top_rem),
            margin_bottom: format_rem(self.margin_bottom_rem()),
        }
        .serialize(serializer)
    }
}

/// Builds tokens against a fixed set of resolved families
pub struct TokenAssembler<'a> {
    baseline_unit_rem: f64,
    defaults: &'a ElementDefaults,
    families: &'a BTreeMap<String, ResolvedFamily>,
}

impl<'a> TokenAssembler<'a> {
    pub fn new(
        baseline_unit_rem: f64,
        defaults: &'a ElementDefaults,
        families: &'a BTreeMap<String, ResolvedFamily>,
    ) -> Self {
        Self {
            baseline_unit_rem,
            defaults,
            families,
        }
    }

    /// Build one element's token
    pub fn assemble(&self, element: &TypographyElement) -> Result<ElementToken> {
        let family_key = element
            .font_family
            .as_deref()
            .unwrap_or(self.defaults.font_family.as_str());

        let family = self
            .families
            .get(family_key)
            .ok_or_else(|| GridError::UnknownFontFamily {
                family: family_key.to_string(),
                available: self.families.keys().cloned().collect(),
            })?;
        let metrics = family
            .metrics
            .as_ref()
            .ok_or_else(|| GridError::MetricsUnavailable {
                family: Some(family_key.to_string()),
            })?;

        let nudge = calculate_nudge(
            element.font_size_rem,
            element.line_height_units,
            self.baseline_unit_rem,
            Some(metrics),
        )?;

        let space_after_units = element
            .space_after_units
            .unwrap_or(self.defaults.space_after_units);

        Ok(ElementToken {
            identifier: element.identifier.clone(),
            font_size_rem: round_rem(element.font_size_rem),
            line_height_rem: round_rem(element.line_height_units * self.baseline_unit_rem),
            font_family: family.name.clone(),
            font_weight: element.font_weight.unwrap_or(self.defaults.font_weight),
            font_style: element.font_style.unwrap_or(self.defaults.font_style),
            space_after_rem: round_rem(space_after_units * self.baseline_unit_rem),
            nudge_top_rem: nudge,
        })
    }

    /// Build every token, stopping at the first failing element
    pub fn assemble_all(&self, elements: &[TypographyElement]) -> Result<Vec<ElementToken>> {
        elements.iter().map(|e| self.assemble(e)).collect()
    }
}

/// All tokens for one configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSet {
    pub baseline_unit_rem: f64,
    pub elements: Vec<ElementToken>,
}

impl TokenSet {
    /// JSON document: `{"baselineUnit": "...", "elements": {"<id>": {...}}}`,
    /// elements in configured order
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        let mut elements = serde_json::Map::new();
        for token in &self.elements {
            elements.insert(token.identifier.clone(), serde_json::to_value(token)?);
        }
        let doc = serde_json::json!({
            "baselineUnit": format_rem(self.baseline_unit_rem),
            "elements": elements,
        });
        if pretty {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        }
    }
}
