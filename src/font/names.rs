//! Canonical name-table representation
//!
//! Font parsers expose names in different shapes. Everything is
//! normalized into [`NameTable`] at the loading boundary so the resolver
//! only ever sees one of two well-defined forms:
//! - `Records`: raw `name` table rows (name ID, platform, language, value)
//! - `Flattened`: language-keyed strings per well-known field

use crate::constants::{MAC_LANG_ENGLISH, WINDOWS_LANG_EN_US};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OpenType name IDs the resolver understands
pub mod name_id {
    pub const FAMILY: u16 = 1;
    pub const FULL_NAME: u16 = 4;
    pub const POSTSCRIPT_NAME: u16 = 6;
    pub const TYPOGRAPHIC_FAMILY: u16 = 16;
}

/// `name` table platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Unicode,
    Macintosh,
    Windows,
}

impl Platform {
    /// Resolution order when several platforms carry the same name ID
    pub const PRIORITY: [Platform; 3] = [Platform::Windows, Platform::Unicode, Platform::Macintosh];

    /// Map an OpenType platform ID (0 = Unicode, 1 = Macintosh, 3 = Windows)
    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            0 => Some(Platform::Unicode),
            1 => Some(Platform::Macintosh),
            3 => Some(Platform::Windows),
            _ => None,
        }
    }

    /// Key used in flattened tables: `en`, else platform plus hex ID
    pub fn language_key(self, language_id: u16) -> String {
        if self.is_english(language_id) {
            "en".to_string()
        } else {
            format!("{:?}-{:04x}", self, language_id).to_ascii_lowercase()
        }
    }

    /// Whether a language ID means English on this platform
    fn is_english(self, language_id: u16) -> bool {
        match self {
            Platform::Windows => language_id & 0x00ff == WINDOWS_LANG_EN_US & 0x00ff,
            Platform::Macintosh => language_id == MAC_LANG_ENGLISH,
            // Unicode platform names carry no language
            Platform::Unicode => true,
        }
    }
}

/// One decoded row of a `name` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name_id: u16,
    pub platform: Platform,
    #[serde(default)]
    pub language_id: u16,
    pub value: String,
}

impl NameRecord {
    pub fn new(name_id: u16, platform: Platform, language_id: u16, value: impl Into<String>) -> Self {
        Self {
            name_id,
            platform,
            language_id,
            value: value.into(),
        }
    }
}

/// Language code → string (`{"en": "Inter"}`)
pub type LocalizedString = BTreeMap<String, String>;

/// Name fields keyed by meaning instead of ID, each localized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlattenedNames {
    /// Name ID 16
    pub preferred_family: Option<LocalizedString>,
    /// Name ID 1
    pub font_family: Option<LocalizedString>,
    /// Name ID 4
    pub full_name: Option<LocalizedString>,
    /// Name ID 6
    pub postscript_name: Option<LocalizedString>,
}

impl FlattenedNames {
    /// Store a value unless that field already has the language.
    /// Returns false for name IDs with no flattened field.
    pub fn insert(&mut self, name_id: u16, language: String, value: String) -> bool {
        let field = match name_id {
            name_id::TYPOGRAPHIC_FAMILY => &mut self.preferred_family,
            name_id::FAMILY => &mut self.font_family,
            name_id::FULL_NAME => &mut self.full_name,
            name_id::POSTSCRIPT_NAME => &mut self.postscript_name,
            _ => return false,
        };
        field.get_or_insert_with(LocalizedString::new).entry(language).or_insert(value);
        true
    }

    /// No field is set
    pub fn is_empty(&self) -> bool {
        self.preferred_family.is_none()
            && self.font_family.is_none()
            && self.full_name.is_none()
            && self.postscript_name.is_none()
    }

    fn field(&self, name_id: u16) -> Option<&LocalizedString> {
        match name_id {
            name_id::TYPOGRAPHIC_FAMILY => self.preferred_family.as_ref(),
            name_id::FAMILY => self.font_family.as_ref(),
            name_id::FULL_NAME => self.full_name.as_ref(),
            name_id::POSTSCRIPT_NAME => self.postscript_name.as_ref(),
            _ => None,
        }
    }
}

/// A font's names in one of the supported shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameTable {
    Records(Vec<NameRecord>),
    Flattened(FlattenedNames),
}

/// A single string pulled out of a table, with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry<'a> {
    pub name_id: u16,
    /// `None` for flattened tables, which carry no platform
    pub platform: Option<Platform>,
    pub value: &'a str,
}

impl NameTable {
    /// Values in resolution order: for each name ID in `id_priority`, every
    /// platform in [`Platform::PRIORITY`], English before other languages.
    ///
    /// Flattened tables yield at most one value per name ID (`en`, else the
    /// first language present).
    pub fn entries(&self, id_priority: &[u16]) -> Vec<TableEntry<'_>> {
        let mut out = Vec::new();
        match self {
            NameTable::Records(records) => {
                for &id in id_priority {
                    for platform in Platform::PRIORITY {
                        let matching = records
                            .iter()
                            .filter(|r| r.name_id == id && r.platform == platform);
                        let (english, other): (Vec<_>, Vec<_>) =
                            matching.partition(|r| platform.is_english(r.language_id));
                        for r in english.into_iter().chain(other) {
                            out.push(TableEntry {
                                name_id: id,
                                platform: Some(platform),
                                value: &r.value,
                            });
                        }
                    }
                }
            }
            NameTable::Flattened(names) => {
                for &id in id_priority {
                    if let Some(value) = names.field(id).and_then(pick_language) {
                        out.push(TableEntry {
                            name_id: id,
                            platform: None,
                            value,
                        });
                    }
                }
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        match self {
            NameTable::Records(records) => records.is_empty(),
            NameTable::Flattened(names) => names == &FlattenedNames::default(),
        }
    }
}

/// `en` if present, otherwise the first language (sorted order)
fn pick_language(localized: &LocalizedString) -> Option<&str> {
    localized
        .get("en")
        .or_else(|| localized.values().next())
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn localized(lang: &str, value: &str) -> LocalizedString {
        let mut map = LocalizedString::new();
        map.insert(lang.to_string(), value.to_string());
        map
    }

    #[test]
    fn test_records_priority() {
        let table = NameTable::Records(vec![
            NameRecord::new(1, Platform::Macintosh, 0, "Mac Family"),
            NameRecord::new(4, Platform::Windows, 0x0409, "Full Name"),
            NameRecord::new(16, Platform::Windows, 0x0409, "Typo Family"),
            NameRecord::new(1, Platform::Windows, 0x0409, "Win Family"),
        ]);
        let values: Vec<&str> = table
            .entries(&[16, 1, 4, 6])
            .iter()
            .map(|e| e.value)
            .collect();
        assert_eq!(values, vec!["Typo Family", "Win Family", "Mac Family", "Full Name"]);
    }

    #[test]
    fn test_records_english_first() {
        let table = NameTable::Records(vec![
            NameRecord::new(1, Platform::Windows, 0x0411, "日本語"),
            NameRecord::new(1, Platform::Windows, 0x0809, "British"),
        ]);
        let entries = table.entries(&[1]);
        assert_eq!(entries[0].value, "British");
        assert_eq!(entries[1].value, "日本語");
    }

    #[test]
    fn test_flattened_language_fallback() {
        let table = NameTable::Flattened(FlattenedNames {
            full_name: Some(localized("de", "Schrift")),
            preferred_family: Some(localized("en", "Inter")),
            ..Default::default()
        });
        let entries = table.entries(&[16, 1, 4, 6]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, "Inter");
        assert_eq!(entries[0].name_id, 16);
        assert_eq!(entries[1].value, "Schrift");
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let flat: NameTable = serde_json::from_str(r#"{"preferredFamily":{"en":"Inter"}}"#).unwrap();
        assert!(matches!(flat, NameTable::Flattened(_)));

        let records: NameTable = serde_json::from_str(
            r#"[{"name_id":1,"platform":"windows","language_id":1033,"value":"Inter"}]"#,
        )
        .unwrap();
        assert_eq!(records.entries(&[1])[0].value, "Inter");
    }

    #[test]
    fn test_platform_from_id() {
        assert_eq!(Platform::from_id(3), Some(Platform::Windows));
        assert_eq!(Platform::from_id(0), Some(Platform::Unicode));
        assert_eq!(Platform::from_id(1), Some(Platform::Macintosh));
        assert_eq!(Platform::from_id(2), None);
    }

    #[test]
    fn test_flattened_insert_keeps_first() {
        let mut names = FlattenedNames::default();
        assert!(names.is_empty());
        assert!(names.insert(1, "en".to_string(), "Lora".to_string()));
        assert!(names.insert(1, "en".to_string(), "Lora Mac".to_string()));
        assert!(!names.insert(2, "en".to_string(), "Regular".to_string()));
        assert_eq!(names.font_family, Some(localized("en", "Lora")));
        assert!(!names.is_empty());
    }

    #[test]
    fn test_language_key() {
        assert_eq!(Platform::Windows.language_key(0x0409), "en");
        assert_eq!(Platform::Macintosh.language_key(0), "en");
        assert_eq!(Platform::Windows.language_key(0x0411), "windows-0411");
    }
}
