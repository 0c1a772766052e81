//! Configured font families
//!
//! Turns `[fonts.*]` entries into [`ResolvedFamily`] values. Each font
//! file is read and named once, however many families point at it.

use crate::config::{Config, FontSource};
use crate::font::fontconfig::resolve_font_path;
use crate::font::loader::{load_font, LoadedFont};
use crate::font::resolver::{resolve, NameSources};
use crate::grid::ResolvedFamily;
use log::{info, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Loads families, caching per font file
pub struct FamilyRegistry {
    base_dir: PathBuf,
    cache: HashMap<PathBuf, Option<LoadedFont>>,
}

impl FamilyRegistry {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache: HashMap::new(),
        }
    }

    /// Resolve one family. Failures never abort: the family keeps a name
    /// and simply has no metrics.
    pub fn resolve_family(&mut self, key: &str, source: &FontSource) -> ResolvedFamily {
        let Some(specifier) = source.specifier() else {
            warn!("fonts.{}: neither path nor family given", key);
            return ResolvedFamily {
                name: source.name.clone().unwrap_or_else(|| key.to_string()),
                metrics: None,
            };
        };

        let path = match resolve_font_path(specifier, source.style.as_deref(), &self.base_dir) {
            Ok(path) => path,
            Err(e) => {
                warn!("fonts.{}: {:#}", key, e);
                let name = source
                    .name
                    .clone()
                    .or_else(|| source.family.clone())
                    .unwrap_or_else(|| resolve(&NameSources::from_path(specifier)).name);
                return ResolvedFamily {
                    name,
                    metrics: None,
                };
            }
        };

        let font = self.load_cached(&path);
        let metrics = font.and_then(|f| f.metrics);
        if metrics.is_none() {
            warn!("fonts.{}: no usable metrics in {}", key, path.display());
        }

        let name = match &source.name {
            Some(name) => name.clone(),
            None => {
                let sources = match font {
                    Some(f) => f.names.clone(),
                    None => NameSources::from_path(&path),
                };
                let resolved = resolve(&sources);
                info!(
                    "fonts.{}: \"{}\" (from {:?})",
                    key, resolved.name, resolved.source
                );
                resolved.name
            }
        };

        ResolvedFamily { name, metrics }
    }

    fn load_cached(&mut self, path: &Path) -> Option<&LoadedFont> {
        self.cache
            .entry(path.to_path_buf())
            .or_insert_with(|| match load_font(path) {
                Ok(font) => Some(font),
                Err(e) => {
                    warn!("{:#}", e);
                    None
                }
            })
            .as_ref()
    }
}

/// Resolve every `[fonts.*]` entry of a config
pub fn load_families(config: &Config) -> BTreeMap<String, ResolvedFamily> {
    let mut registry = FamilyRegistry::new(config.base_dir());
    config
        .fonts
        .iter()
        .map(|(key, source)| (key.clone(), registry.resolve_family(key, source)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_source(path: &str) -> FontSource {
        FontSource {
            path: Some(path.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_unreadable_file_keeps_path_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Merriweather-Regular.ttf"), b"garbage").unwrap();
        let mut registry = FamilyRegistry::new(dir.path());
        let family = registry.resolve_family("serif", &path_source("Merriweather-Regular.ttf"));
        assert_eq!(family.name, "Merriweather");
        assert!(family.metrics.is_none());
    }

    #[test]
    fn test_name_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.ttf"), b"garbage").unwrap();
        let mut registry = FamilyRegistry::new(dir.path());
        let source = FontSource {
            name: Some("Brand Sans".to_string()),
            ..path_source("x.ttf")
        };
        assert_eq!(registry.resolve_family("sans", &source).name, "Brand Sans");
    }

    #[test]
    fn test_file_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Lora.ttf"), b"garbage").unwrap();
        let mut registry = FamilyRegistry::new(dir.path());
        registry.resolve_family("a", &path_source("Lora.ttf"));
        registry.resolve_family("b", &path_source("Lora.ttf"));
        assert_eq!(registry.cache.len(), 1);
    }

    #[test]
    fn test_missing_source() {
        let mut registry = FamilyRegistry::new(".");
        let family = registry.resolve_family("mono", &FontSource::default());
        assert_eq!(family.name, "mono");
        assert!(family.metrics.is_none());
    }
}
