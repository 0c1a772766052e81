//! Font metrics and name resolution
//!
//! Handles:
//! - Vertical metrics (ascent/descent/line gap/units per em)
//! - Canonical name tables from two parsers
//! - Display name cleanup, validation and fallback chain
//! - WOFF 1.0 unwrapping and metadata
//! - System font lookup (fontconfig)
//! - Per-config family registry

pub mod cleanup;
pub mod fontconfig;
pub mod loader;
pub mod metrics;
pub mod names;
pub mod registry;
pub mod resolver;
pub mod woff;

pub use self::fontconfig::{resolve_font_path, FontFinder};
pub use loader::{load_font, LoadedFont};
pub use metrics::FontMetrics;
pub use names::{FlattenedNames, LocalizedString, NameRecord, NameTable, Platform};
pub use registry::{load_families, FamilyRegistry};
pub use resolver::{resolve, resolve_font_name, NameCandidate, NameSource, NameSources, ResolvedName};
