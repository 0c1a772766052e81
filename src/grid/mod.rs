//! Baseline grid calculations
//!
//! - Nudge (`padding-top`) per element from font metrics
//! - Token assembly: element config + resolved family → output record

pub mod nudge;
pub mod tokens;

pub use nudge::calculate_nudge;
pub use tokens::{
    ElementDefaults, ElementToken, FontStyle, ResolvedFamily, TokenAssembler, TokenSet,
    TypographyElement,
};
