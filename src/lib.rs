//! typegrid - baseline grid typography tokens
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │          Config (typegrid.toml)          │
//! ├──────────────────────────────────────────┤
//! │  [fonts.*]  →  Font loader / resolver    │
//! │                      ↓                   │
//! │  [[elements]] →  Nudge + token assembly  │
//! │                      ↓                   │
//! │              JSON design tokens          │
//! └──────────────────────────────────────────┘
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod font;
pub mod grid;
pub mod utils;

use anyhow::{Context, Result};
use grid::{ResolvedFamily, TokenAssembler, TokenSet};
use std::collections::BTreeMap;

/// Assemble every element of a validated config against resolved families
pub fn build_tokens(
    config: &config::Config,
    families: &BTreeMap<String, ResolvedFamily>,
) -> Result<TokenSet> {
    let unit = config.grid.baseline_unit;
    let assembler = TokenAssembler::new(unit, &config.defaults, families);
    let elements = config
        .elements
        .iter()
        .map(|el| {
            assembler
                .assemble(el)
                .with_context(|| format!("element \"{}\"", el.identifier))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(TokenSet {
        baseline_unit_rem: unit,
        elements,
    })
}
