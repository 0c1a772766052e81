//! Configuration file management
//!
//! Loads the TOML typography configuration: baseline grid, element
//! defaults, font families and the element scale.
//! Default config path: ~/.config/typegrid/config.toml

use crate::constants::{
    DEFAULT_BASELINE_UNIT_REM, LINE_HEIGHT_STEP_UNITS, MAX_FONT_WEIGHT, MIN_FONT_WEIGHT,
};
use crate::grid::{ElementDefaults, TypographyElement};
use anyhow::{anyhow, bail, Context, Result};
use log::info;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Baseline grid settings
    pub grid: GridConfig,
    /// Values used when an element leaves a field out
    pub defaults: ElementDefaults,
    /// Font families by key (`[fonts.sans]`)
    pub fonts: BTreeMap<String, FontSource>,
    /// Typography scale (`[[elements]]`)
    pub elements: Vec<TypographyElement>,
    /// Output settings
    pub output: OutputConfig,
    /// File this config was read from (relative font paths resolve here)
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Baseline grid settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Baseline unit in rem (default: 0.5)
    pub baseline_unit: f64,
}

/// Where a family's font comes from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSource {
    /// Font file (TTF/OTF/WOFF/WOFF2), relative to the config file
    pub path: Option<String>,
    /// Installed family name, looked up through fontconfig
    pub family: Option<String>,
    /// fontconfig style for `family` ("Bold", "Italic")
    pub style: Option<String>,
    /// Display name override; skips name resolution
    pub name: Option<String>,
}

impl FontSource {
    /// Path if given, else the family name
    pub fn specifier(&self) -> Option<&str> {
        self.path
            .as_deref()
            .or(self.family.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Token JSON file (empty = stdout)
    pub tokens: String,
    /// Pretty-print JSON
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        let mut fonts = BTreeMap::new();
        fonts.insert(
            "sans".to_string(),
            FontSource {
                family: Some("DejaVu Sans".to_string()),
                ..Default::default()
            },
        );

        let element = |identifier: &str, font_size: f64, line_height: f64, weight: Option<u16>| {
            TypographyElement {
                identifier: identifier.to_string(),
                font_size_rem: font_size,
                line_height_units: line_height,
                space_after_units: None,
                font_family: None,
                font_weight: weight,
                font_style: None,
            }
        };

        Self {
            grid: GridConfig::default(),
            defaults: ElementDefaults::default(),
            fonts,
            elements: vec![
                element("h1", 2.5, 6.0, Some(700)),
                element("h2", 2.0, 5.0, Some(700)),
                element("h3", 1.5, 4.0, Some(600)),
                element("body", 1.0, 3.0, None),
                element("caption", 0.875, 2.5, None),
            ],
            output: OutputConfig::default(),
            source: None,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            baseline_unit: DEFAULT_BASELINE_UNIT_REM,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tokens: String::new(),
            pretty: true,
        }
    }
}

impl Config {
    /// Environment variable naming a config file
    const ENV_VAR: &'static str = "TYPEGRID_CONFIG";

    /// Config file looked for in the working directory
    const LOCAL_CONFIG: &'static str = "typegrid.toml";

    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        // 1. --config argument
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        // 2. TYPEGRID_CONFIG environment variable
        if let Ok(path) = std::env::var(Self::ENV_VAR) {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 3. ./typegrid.toml
        let local = Path::new(Self::LOCAL_CONFIG);
        if local.exists() {
            return Some(local.to_path_buf());
        }

        // 4. User config: ~/.config/typegrid/config.toml
        default_config_path().filter(|p| p.exists())
    }

    /// Load configuration with priority:
    /// 1. explicit path
    /// 2. TYPEGRID_CONFIG environment variable
    /// 3. ./typegrid.toml
    /// 4. ~/.config/typegrid/config.toml (user config)
    /// 5. Built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::config_path(explicit) {
            Some(path) => {
                let config = Self::load_from_file(&path)?;
                info!("Loaded config: {}", path.display());
                Ok(config)
            }
            None => {
                info!("Using built-in default config");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse settings from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Directory that relative font paths are resolved against
    pub fn base_dir(&self) -> PathBuf {
        self.source
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Check every value; all problems are reported together
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        let unit = self.grid.baseline_unit;
        if !(unit.is_finite() && unit > 0.0) {
            problems.push(format!("grid.baseline_unit must be > 0 (got {})", unit));
        }

        if self.fonts.is_empty() {
            problems.push("at least one [fonts.<family>] entry is required".to_string());
        }
        for (key, source) in &self.fonts {
            if source.specifier().is_none() {
                problems.push(format!("fonts.{}: set either `path` or `family`", key));
            }
        }
        if !self.fonts.contains_key(&self.defaults.font_family) {
            problems.push(format!(
                "defaults.font_family \"{}\" is not defined in [fonts]",
                self.defaults.font_family
            ));
        }
        check_weight(&mut problems, "defaults", self.defaults.font_weight);
        if !(self.defaults.space_after_units >= 0.0) {
            problems.push(format!(
                "defaults.space_after must be >= 0 (got {})",
                self.defaults.space_after_units
            ));
        }

        if self.elements.is_empty() {
            problems.push("at least one [[elements]] entry is required".to_string());
        }
        let mut seen = HashSet::new();
        for (i, el) in self.elements.iter().enumerate() {
            let label = if el.identifier.trim().is_empty() {
                problems.push(format!("elements[{}]: identifier is empty", i));
                format!("elements[{}]", i)
            } else {
                format!("element \"{}\"", el.identifier)
            };
            if !el.identifier.trim().is_empty() && !seen.insert(el.identifier.as_str()) {
                problems.push(format!("{}: duplicate identifier", label));
            }
            if !(el.font_size_rem.is_finite() && el.font_size_rem > 0.0) {
                problems.push(format!("{}: font_size must be > 0 (got {})", label, el.font_size_rem));
            }
            let lh = el.line_height_units;
            if !(lh.is_finite() && lh > 0.0) {
                problems.push(format!("{}: line_height must be > 0 (got {})", label, lh));
            } else if (lh / LINE_HEIGHT_STEP_UNITS).fract() != 0.0 {
                problems.push(format!(
                    "{}: line_height must be a multiple of {} (got {})",
                    label, LINE_HEIGHT_STEP_UNITS, lh
                ));
            }
            if let Some(space) = el.space_after_units {
                if !(space >= 0.0) {
                    problems.push(format!("{}: space_after must be >= 0 (got {})", label, space));
                }
            }
            if let Some(weight) = el.font_weight {
                check_weight(&mut problems, &label, weight);
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            bail!("invalid configuration:\n  - {}", problems.join("\n  - "))
        }
    }

    /// Write a commented template config, refusing to overwrite unless
    /// `force` is set
    pub fn write_default_config(path: &Path, force: bool) -> Result<PathBuf> {
        if path.exists() && !force {
            bail!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let body = toml::to_string_pretty(&Self::default())?;
        let template = format!(
            r#"# typegrid configuration file
#
# Font sizes are in rem. Line heights and spacing are in baseline units
# (multiples of grid.baseline_unit); line heights must be multiples of 0.5.
#
# Fonts can be given by file path (relative to this file) or by installed
# family name, resolved via fontconfig:
#   [fonts.sans]
#   path = "fonts/Inter-Regular.woff"
#   [fonts.serif]
#   family = "Lora"
#   style = "Regular"
#   name = "Lora"             # optional display name override

{body}"#
        );

        std::fs::write(path, template)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}

fn check_weight(problems: &mut Vec<String>, label: &str, weight: u16) {
    if !(MIN_FONT_WEIGHT..=MAX_FONT_WEIGHT).contains(&weight) {
        problems.push(format!(
            "{}: font_weight must be within {}..={} (got {})",
            label, MIN_FONT_WEIGHT, MAX_FONT_WEIGHT, weight
        ));
    }
}

/// Config file change watcher
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<()>,
}

impl ConfigWatcher {
    /// Start watching config file
    pub fn new(config_path: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let file_name = config_path
            .file_name()
            .map(OsStr::to_os_string)
            .ok_or_else(|| anyhow!("Not a file path: {}", config_path.display()))?;

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                if is_config_event(&event, &file_name) {
                    let _ = tx.send(());
                }
            }
        })?;

        // Watch the parent directory to catch rename operations
        let watch_path = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        watcher.watch(watch_path, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Check if config file was modified (non-blocking)
    /// Drains queued events so one save triggers one reload
    pub fn check_reload(&self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

/// Modify/Create on the config file itself. The whole directory is
/// watched, so writes to sibling files (token output) must not count.
/// Editors often save by writing a temp file and renaming it over the
/// config; the rename shows up with the config's name among the paths.
fn is_config_event(event: &Event, file_name: &OsStr) -> bool {
    use notify::EventKind;
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p.file_name() == Some(file_name))
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("typegrid").join("config.toml"))
}
