//! Font file loading
//!
//! The boundary between font parsers and the grid: reads a file,
//! unwraps WOFF, and normalizes what two independent parsers report
//! into [`FontMetrics`] and [`NameSources`].
//!
//! - primary: ttf-parser (re-exported by rustybuzz) for hhea/OS/2 metrics,
//!   `name` records and the OS/2 vendor ID
//! - secondary: fontdue for units-per-em and unscaled line metrics, plus
//!   the raw `name` table decoded without the face-level checks
//!
//! The parsers disagree on missing data (zero metrics vs. errors), so the
//! primary result is used unless it is absent or degenerate.

use crate::constants::{NAME_ID_PRIORITY, OS2_VENDOR_ID_OFFSET};
use crate::font::metrics::FontMetrics;
use crate::font::names::{FlattenedNames, NameRecord, NameTable, Platform};
use crate::font::resolver::NameSources;
use crate::font::woff::{self, Container};
use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use rustybuzz::ttf_parser;
use std::path::{Path, PathBuf};

/// A font file reduced to what the grid needs
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub path: PathBuf,
    pub container: Container,
    /// `None` when neither parser produced usable metrics
    pub metrics: Option<FontMetrics>,
    pub names: NameSources,
}

/// What one parser managed to read
#[derive(Debug, Default)]
struct ParsedFace {
    metrics: Option<FontMetrics>,
    names: Option<NameTable>,
    vendor_id: Option<String>,
}

/// Load font file
pub fn load_font_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| anyhow!("Failed to read font file: {} ({})", path.display(), e))
}

/// Read and inspect a font file
pub fn load_font(path: &Path) -> Result<LoadedFont> {
    let data = load_font_file(path)?;
    let font = inspect_font(path, &data);
    info!(
        "Font loaded: {} ({:?}, metrics: {})",
        path.display(),
        font.container,
        if font.metrics.is_some() { "ok" } else { "unavailable" }
    );
    Ok(font)
}

/// Inspect in-memory font bytes. Never fails: anything unreadable simply
/// leaves the corresponding field empty.
pub fn inspect_font(path: &Path, data: &[u8]) -> LoadedFont {
    let container = Container::sniff(data);

    let woff_metadata = match woff::metadata_xml(data) {
        Ok(meta) => meta,
        Err(e) => {
            warn!("Ignoring WOFF metadata in {}: {:#}", path.display(), e);
            None
        }
    };

    let unwrapped;
    let sfnt: &[u8] = match container {
        Container::Woff => match woff::woff_to_sfnt(data) {
            Ok(bytes) => {
                unwrapped = bytes;
                &unwrapped
            }
            Err(e) => {
                warn!("Failed to unwrap WOFF {}: {:#}", path.display(), e);
                &[]
            }
        },
        Container::Woff2 => {
            debug!("WOFF2 tables are not unwrapped: {}", path.display());
            data
        }
        Container::Sfnt | Container::Unknown => data,
    };

    let primary = parse_primary(sfnt).unwrap_or_default();
    let secondary = parse_secondary(sfnt).unwrap_or_default();
    let metrics = reconcile_metrics(primary.metrics, secondary.metrics);

    LoadedFont {
        path: path.to_path_buf(),
        container,
        metrics,
        names: NameSources {
            path: path.to_path_buf(),
            primary: primary.names,
            secondary: secondary.names,
            woff_metadata,
            vendor_id: primary.vendor_id,
        },
    }
}

/// Primary metrics win unless missing or all-zero
fn reconcile_metrics(
    primary: Option<FontMetrics>,
    secondary: Option<FontMetrics>,
) -> Option<FontMetrics> {
    match (primary, secondary) {
        (Some(p), Some(s)) if p.is_degenerate() && !s.is_degenerate() => {
            debug!("Primary metrics are zero, using secondary parser");
            Some(s)
        }
        (Some(p), _) => Some(p),
        (None, s) => s,
    }
}

fn parse_primary(data: &[u8]) -> Option<ParsedFace> {
    let face = match ttf_parser::Face::parse(data, 0) {
        Ok(face) => face,
        Err(e) => {
            debug!("ttf-parser rejected font: {}", e);
            return None;
        }
    };

    let metrics = FontMetrics::new(
        face.ascender() as f64,
        face.descender() as f64,
        face.line_gap() as f64,
        face.units_per_em() as f64,
    );

    let records: Vec<NameRecord> = face
        .names()
        .into_iter()
        .filter(|n| NAME_ID_PRIORITY.contains(&n.name_id))
        .filter_map(|n| {
            let (platform, value) = decode_name(&n)?;
            Some(NameRecord::new(n.name_id, platform, n.language_id, value))
        })
        .collect();

    let vendor_id = face
        .raw_face()
        .table(ttf_parser::Tag::from_bytes(b"OS/2"))
        .and_then(|os2| os2.get(OS2_VENDOR_ID_OFFSET..OS2_VENDOR_ID_OFFSET + 4))
        .filter(|id| id.is_ascii())
        .map(|id| String::from_utf8_lossy(id).trim().to_string())
        .filter(|id| !id.is_empty());

    Some(ParsedFace {
        metrics,
        names: (!records.is_empty()).then_some(NameTable::Records(records)),
        vendor_id,
    })
}

/// fontdue for metrics; names straight from the raw `name` table, which
/// only needs a readable table directory (no head/hhea/maxp checks)
fn parse_secondary(data: &[u8]) -> Option<ParsedFace> {
    let metrics = match fontdue::Font::from_bytes(data, fontdue::FontSettings::default()) {
        Ok(font) => {
            // Scaling to units_per_em px leaves the values in design units
            let upm = font.units_per_em();
            font.horizontal_line_metrics(upm).and_then(|m| {
                FontMetrics::new(m.ascent as f64, m.descent as f64, m.line_gap as f64, upm as f64)
            })
        }
        Err(e) => {
            debug!("fontdue rejected font: {}", e);
            None
        }
    };

    let names = raw_name_table(data);
    if metrics.is_none() && names.is_none() {
        return None;
    }
    Some(ParsedFace {
        metrics,
        names,
        vendor_id: None,
    })
}

/// Flattened names read from the raw `name` table
fn raw_name_table(data: &[u8]) -> Option<NameTable> {
    let raw = ttf_parser::RawFace::parse(data, 0).ok()?;
    let table = ttf_parser::name::Table::parse(raw.table(ttf_parser::Tag::from_bytes(b"name"))?)?;

    let mut decoded: Vec<NameRecord> = table
        .names
        .into_iter()
        .filter(|n| NAME_ID_PRIORITY.contains(&n.name_id))
        .filter_map(|n| {
            let (platform, value) = decode_name(&n)?;
            Some(NameRecord::new(n.name_id, platform, n.language_id, value))
        })
        .collect();
    // First record per language wins, so visit platforms in priority order
    decoded.sort_by_key(|r| Platform::PRIORITY.iter().position(|p| *p == r.platform));

    let mut names = FlattenedNames::default();
    for record in decoded {
        let language = record.platform.language_key(record.language_id);
        names.insert(record.name_id, language, record.value);
    }
    (!names.is_empty()).then_some(NameTable::Flattened(names))
}

/// Decode one `name` record: UTF-16BE for Unicode encodings, the ASCII
/// subset of Mac Roman otherwise
fn decode_name(n: &ttf_parser::name::Name) -> Option<(Platform, String)> {
    let platform = match n.platform_id {
        ttf_parser::PlatformId::Unicode => Platform::Unicode,
        ttf_parser::PlatformId::Macintosh => Platform::Macintosh,
        ttf_parser::PlatformId::Windows => Platform::Windows,
        _ => return None,
    };
    let value = if n.is_unicode() {
        if n.name.len() % 2 != 0 {
            return None;
        }
        let units: Vec<u16> = n
            .name
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).ok()?
    } else if platform == Platform::Macintosh && n.name.is_ascii() {
        String::from_utf8_lossy(n.name).into_owned()
    } else {
        return None;
    };
    Some((platform, value))
}
