//! Display name resolution
//!
//! Picks one clean family name out of every place a font file might
//! carry one. Sources are tried strongest first and the first candidate
//! that survives cleanup and validation wins:
//!
//! 1. primary name table (typographic family → family → full → PostScript)
//! 2. secondary name table (same order)
//! 3. WOFF metadata `<description>`
//! 4. OS/2 vendor ID
//! 5. file name, then parent directory name
//! 6. file name as-is, or "Unknown Font"
//!
//! Resolution never fails.

use crate::constants::{NAME_ID_PRIORITY, UNKNOWN_FONT_NAME};
use crate::font::cleanup::{
    clean_name, clean_path_name, is_placeholder_vendor, is_valid_name, looks_like_noise,
    strip_fonts_dir_suffix,
};
use crate::font::names::{NameTable, Platform};
use crate::font::woff::description_text;
use log::debug;
use std::path::{Path, PathBuf};

/// Everything known about a font's name, gathered at load time
#[derive(Debug, Clone, Default)]
pub struct NameSources {
    /// Font file path (fallback naming only)
    pub path: PathBuf,
    /// Names from the primary parser
    pub primary: Option<NameTable>,
    /// Names from the secondary parser
    pub secondary: Option<NameTable>,
    /// Raw WOFF extended metadata XML
    pub woff_metadata: Option<String>,
    /// OS/2 `achVendID`
    pub vendor_id: Option<String>,
}

impl NameSources {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Where the resolved name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    PrimaryTable,
    SecondaryTable,
    WoffMetadata,
    VendorId,
    FileName,
    ParentDirectory,
    Fallback,
}

/// One string offered to the resolver
#[derive(Debug, Clone, PartialEq)]
pub enum NameCandidate<'a> {
    TableEntry {
        name_id: u16,
        platform: Option<Platform>,
        value: &'a str,
    },
    MetadataXml(String),
    VendorId(String),
    PathDerived(String),
}

impl NameCandidate<'_> {
    pub fn value(&self) -> &str {
        match self {
            NameCandidate::TableEntry { value, .. } => value,
            NameCandidate::MetadataXml(v)
            | NameCandidate::VendorId(v)
            | NameCandidate::PathDerived(v) => v,
        }
    }

    /// Cleaned value if the candidate is usable
    pub fn accept(&self) -> Option<String> {
        let raw = self.value();
        if looks_like_noise(raw) {
            return None;
        }
        if let NameCandidate::VendorId(v) = self {
            if is_placeholder_vendor(v) {
                return None;
            }
        }
        let cleaned = clean_name(raw);
        is_valid_name(&cleaned).then_some(cleaned)
    }
}

/// Name plus provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub name: String,
    pub source: NameSource,
}

/// Resolve a display name from a path and up to two name tables
pub fn resolve_font_name(
    font_path: impl AsRef<Path>,
    primary: Option<&NameTable>,
    secondary: Option<&NameTable>,
) -> String {
    let sources = NameSources {
        path: font_path.as_ref().to_path_buf(),
        primary: primary.cloned(),
        secondary: secondary.cloned(),
        ..Default::default()
    };
    resolve(&sources).name
}

/// Run the full fallback chain
pub fn resolve(sources: &NameSources) -> ResolvedName {
    let table_sources = [
        (NameSource::PrimaryTable, sources.primary.as_ref()),
        (NameSource::SecondaryTable, sources.secondary.as_ref()),
    ];
    for (source, table) in table_sources {
        let Some(table) = table else { continue };
        let candidates = table.entries(&NAME_ID_PRIORITY).into_iter().map(|e| {
            NameCandidate::TableEntry {
                name_id: e.name_id,
                platform: e.platform,
                value: e.value,
            }
        });
        if let Some(found) = first_accepted(source, candidates) {
            return found;
        }
    }

    if let Some(text) = sources.woff_metadata.as_deref().and_then(description_text) {
        let candidate = NameCandidate::MetadataXml(text);
        if let Some(found) = first_accepted(NameSource::WoffMetadata, [candidate]) {
            return found;
        }
    }

    if let Some(vendor) = &sources.vendor_id {
        let candidate = NameCandidate::VendorId(vendor.clone());
        if let Some(found) = first_accepted(NameSource::VendorId, [candidate]) {
            return found;
        }
    }

    let path = sources.path.as_path();
    if let Some(found) = from_file_name(path) {
        return found;
    }
    if let Some(found) = from_parent_dir(path) {
        return found;
    }

    fallback(path)
}

fn first_accepted<'a>(
    source: NameSource,
    candidates: impl IntoIterator<Item = NameCandidate<'a>>,
) -> Option<ResolvedName> {
    for candidate in candidates {
        match candidate.accept() {
            Some(name) => {
                debug!("Font name \"{}\" accepted from {:?}", name, source);
                return Some(ResolvedName { name, source });
            }
            None => debug!("Font name candidate rejected: {:?}", candidate),
        }
    }
    None
}

fn from_file_name(path: &Path) -> Option<ResolvedName> {
    let stem = path.file_stem()?.to_str()?;
    let candidate = NameCandidate::PathDerived(clean_path_name(stem));
    first_accepted(NameSource::FileName, [candidate])
}

fn from_parent_dir(path: &Path) -> Option<ResolvedName> {
    let dir = path.parent()?.file_name()?.to_str()?;
    let dir = strip_fonts_dir_suffix(dir);
    if dir.is_empty() {
        return None;
    }
    let candidate = NameCandidate::PathDerived(clean_path_name(&dir));
    first_accepted(NameSource::ParentDirectory, [candidate])
}

fn fallback(path: &Path) -> ResolvedName {
    let raw = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.replace(['-', '_'], " "))
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    let name = if is_valid_name(&raw) {
        raw
    } else {
        UNKNOWN_FONT_NAME.to_string()
    };
    debug!("Font name fell back to \"{}\" for {}", name, path.display());
    ResolvedName {
        name,
        source: NameSource::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::names::{FlattenedNames, LocalizedString, NameRecord};

    fn en(value: &str) -> Option<LocalizedString> {
        let mut map = LocalizedString::new();
        map.insert("en".to_string(), value.to_string());
        Some(map)
    }

    #[test]
    fn test_preferred_family_from_flattened_table() {
        let table = NameTable::Flattened(FlattenedNames {
            preferred_family: en("Inter"),
            ..Default::default()
        });
        assert_eq!(resolve_font_name("fonts/Inter-Regular.woff2", Some(&table), None), "Inter");
    }

    #[test]
    fn test_path_numeric_prefix_and_webfont() {
        assert_eq!(resolve_font_name("fonts/2-MyFont-webfont.ttf", None, None), "MyFont");
    }

    #[test]
    fn test_licensing_name_falls_through_to_path() {
        let table = NameTable::Flattened(FlattenedNames {
            full_name: en("For Use Only v2"),
            ..Default::default()
        });
        let name = resolve_font_name("fonts/licensed-for-use-only-v2.ttf", Some(&table), None);
        assert_eq!(name, "Licensed");
    }

    #[test]
    fn test_windows_typographic_family_beats_mac_family() {
        let table = NameTable::Records(vec![
            NameRecord::new(1, Platform::Macintosh, 0, "Mac Family"),
            NameRecord::new(16, Platform::Windows, 0x0409, "Typographic Family"),
        ]);
        let resolved = resolve(&NameSources {
            primary: Some(table),
            ..NameSources::from_path("a.ttf")
        });
        assert_eq!(resolved.name, "Typographic Family");
        assert_eq!(resolved.source, NameSource::PrimaryTable);
    }

    #[test]
    fn test_invalid_entry_skips_to_next_id() {
        let table = NameTable::Records(vec![
            NameRecord::new(16, Platform::Windows, 0x0409, "Version 1.000"),
            NameRecord::new(1, Platform::Windows, 0x0409, "Lora Bold Italic"),
        ]);
        assert_eq!(resolve_font_name("x.ttf", Some(&table), None), "Lora Bold Italic");
    }

    #[test]
    fn test_secondary_table_used_when_primary_rejected() {
        let primary = NameTable::Records(vec![NameRecord::new(
            1,
            Platform::Windows,
            0x0409,
            "Untitled1",
        )]);
        let secondary = NameTable::Flattened(FlattenedNames {
            full_name: en("Space Grotesk Regular"),
            ..Default::default()
        });
        let resolved = resolve(&NameSources {
            primary: Some(primary),
            secondary: Some(secondary),
            ..NameSources::from_path("x.ttf")
        });
        assert_eq!(resolved.name, "Space Grotesk");
        assert_eq!(resolved.source, NameSource::SecondaryTable);
    }

    #[test]
    fn test_woff_metadata_then_vendor() {
        let mut sources = NameSources {
            woff_metadata: Some(
                "<metadata><description><text lang=\"en\">Atkinson Hyperlegible</text></description></metadata>"
                    .to_string(),
            ),
            vendor_id: Some("BRLF".to_string()),
            ..NameSources::from_path("fonts/f.woff")
        };
        let resolved = resolve(&sources);
        assert_eq!(resolved.name, "Atkinson Hyperlegible");
        assert_eq!(resolved.source, NameSource::WoffMetadata);

        sources.woff_metadata = None;
        let resolved = resolve(&sources);
        assert_eq!(resolved.name, "BRLF");
        assert_eq!(resolved.source, NameSource::VendorId);

        sources.vendor_id = Some("PfEd".to_string());
        let resolved = resolve(&sources);
        assert_ne!(resolved.source, NameSource::VendorId);
    }

    #[test]
    fn test_parent_directory() {
        let resolved = resolve(&NameSources::from_path("assets/lora-fonts/1.ttf"));
        assert_eq!(resolved.name, "Lora");
        assert_eq!(resolved.source, NameSource::ParentDirectory);
    }

    #[test]
    fn test_unknown_font() {
        let resolved = resolve(&NameSources::from_path("fonts/1.ttf"));
        assert_eq!(resolved.name, UNKNOWN_FONT_NAME);
        assert_eq!(resolved.source, NameSource::Fallback);
        assert_eq!(resolve_font_name("", None, None), UNKNOWN_FONT_NAME);
    }

    #[test]
    fn test_never_invalid() {
        let junk = NameTable::Records(vec![
            NameRecord::new(16, Platform::Windows, 0x0409, "..."),
            NameRecord::new(1, Platform::Windows, 0x0409, "Regular"),
            NameRecord::new(4, Platform::Unicode, 0, "2020-01-01"),
            NameRecord::new(6, Platform::Macintosh, 0, "ilovetypography.com"),
        ]);
        for path in ["", "fonts/.ttf", "fonts/___.otf", "demo/sample.ttf", "x/-.woff"] {
            let name = resolve_font_name(path, Some(&junk), Some(&junk));
            assert!(!name.is_empty());
            assert!(name == UNKNOWN_FONT_NAME || is_valid_name(&name), "{:?} -> {:?}", path, name);
        }
    }
}
