//! fontconfig integration
//!
//! Locate installed font files by family name, for `[fonts.*]` entries
//! that name a system family instead of a file

use anyhow::{anyhow, Result};
use fontconfig::Fontconfig;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Font search result
#[derive(Debug, Clone)]
pub struct FontMatch {
    /// Font file path
    pub path: PathBuf,
    /// Font name as fontconfig reports it
    pub family: String,
}

/// Search fonts using fontconfig
pub struct FontFinder {
    fc: Fontconfig,
}

impl FontFinder {
    /// Initialize FontFinder
    pub fn new() -> Result<Self> {
        let fc = Fontconfig::new().ok_or_else(|| anyhow!("fontconfig initialization failed"))?;
        info!("fontconfig initialized");
        Ok(Self { fc })
    }

    /// Search by family name and optional style ("Bold", "Italic")
    ///
    /// fontconfig always returns the closest match, even a completely
    /// unrelated one, so the result must contain the requested name.
    pub fn find_font(&self, family: &str, style: Option<&str>) -> Option<FontMatch> {
        let font = self.fc.find(family, style)?;
        if family_matches(family, &font.name) {
            return Some(FontMatch {
                path: font.path,
                family: font.name,
            });
        }
        warn!(
            "fontconfig: rejected false match for \"{}\": got \"{}\"",
            family, font.name
        );
        None
    }
}

fn family_matches(requested: &str, found: &str) -> bool {
    let req = requested.to_ascii_lowercase();
    let got = found.to_ascii_lowercase();
    got.contains(&req) || req.contains(&got)
}

/// Resolve a font specifier to a file.
///
/// An existing path (relative to `base_dir` when not absolute) is used
/// as-is; anything else is looked up as a family name.
pub fn resolve_font_path(specifier: &str, style: Option<&str>, base_dir: &Path) -> Result<PathBuf> {
    let path = Path::new(specifier);
    let candidate = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    if candidate.exists() {
        return Ok(candidate);
    }

    let finder = FontFinder::new()?;
    if let Some(font_match) = finder.find_font(specifier, style) {
        info!(
            "Font resolved by name: \"{}\" → {} ({})",
            specifier,
            font_match.family,
            font_match.path.display()
        );
        return Ok(font_match.path);
    }

    Err(anyhow!(
        "Font not found: \"{}\" (not a valid path or font name)",
        specifier
    ))
}
