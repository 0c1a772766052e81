//! Font name cleanup and validation
//!
//! Names pulled from font files are noisy: licensing text in the family
//! field, `-webfont` suffixes from web font generators, version strings,
//! build hashes, `(Trial)` annotations. Cleanup strips that noise in a
//! fixed order, validation decides whether what is left is a name.

use regex::Regex;
use std::sync::LazyLock;

/// Longest string still accepted as a display name
const MAX_NAME_LEN: usize = 64;

/// Per-family suffixes removed before the generic rules run
struct FamilyOverride {
    /// Case-insensitive substring identifying the family
    needle: &'static str,
    /// Trailing tokens dropped when present
    strip_suffixes: &'static [&'static str],
}

const FAMILY_OVERRIDES: &[FamilyOverride] = &[
    FamilyOverride {
        needle: "inter",
        strip_suffixes: &["Variable", "VF", "Var"],
    },
    FamilyOverride {
        needle: "roboto flex",
        strip_suffixes: &["Variable", "VF"],
    },
    FamilyOverride {
        needle: "source sans",
        strip_suffixes: &["VF", "Variable"],
    },
    FamilyOverride {
        needle: "source serif",
        strip_suffixes: &["VF", "Variable"],
    },
    FamilyOverride {
        needle: "recursive",
        strip_suffixes: &["Variable", "VF"],
    },
];

/// Words that only ever appear alone as placeholders
const BARE_WORDS: &[&str] = &[
    "font", "fonts", "regular", "bold", "italic", "normal", "webfont", "untitled", "undefined",
    "null", "none", "default", ".notdef",
];

/// Registered placeholder vendor IDs (FontForge, "unknown", blank)
const PLACEHOLDER_VENDORS: &[&str] = &["none", "ukwn", "pfed", "xxxx", "null"];

static TECH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[\s_-]+(?:web\s*font|variable|vf|var)\s*$").unwrap());
static TECH_SUFFIX_CAMEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])(?:WebFont|Webfont|webfont|Variable|VF|Var)$").unwrap());
static VERSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[\s_-]+v?\d+(?:\.\d+)+|[\s_-]*\bv\d+(?:\.\d+)*)\s*$").unwrap()
});
static HASH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[\s_-]+g?([0-9a-f]{7,40})\s*$").unwrap());
static BRACKETED_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[\(\[\{][^\)\]\}]*[\)\]\}]\s*$").unwrap());
static REGULAR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[\s_-]+(?:regular|normal)\s*$").unwrap());
static REGULAR_SUFFIX_CAMEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])(?:Regular|Normal)$").unwrap());
static STYLE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    // Whole words only, so "Lightning" or "Blackadder" don't count;
    // compounds like "ExtraBold" and "BoldItalic" still do
    Regex::new(concat!(
        r"(?i)\b(?:semi|demi|extra|ultra)?\s*(?:thin|light|medium|bold|heavy|black|italic|oblique)",
        r"(?:italic|oblique)?\b|\b(?:ultra|extra)\b"
    ))
    .unwrap()
});
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)for use only|ilovetypography|version\s*\d|copyright|all rights reserved|",
        r"personal use|test\s*font|sample|demo|untitled|",
        r"\b\d{4}[-/.]\d{1,2}[-/.]\d{1,2}\b|\b\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4}\b|",
        r"\.(?:ttf|otf|woff2?|eot|svg|ttc|dfont)\s*$"
    ))
    .unwrap()
});

// Path-only rules
static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[\s_.-]*").unwrap());
static WEBFONT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bweb\s*font\b").unwrap());
static PATH_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:(?:for\s+)?personal\s+use(?:\s+only)?|for\s+use\s+only|demo|trial|sample)\b")
        .unwrap()
});
static FONTS_DIR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[\s_-]*fonts?$").unwrap());

/// Remove technical noise from a candidate name.
///
/// Order: family overrides, technical suffixes, versions and hashes,
/// bracketed annotations, `Regular`/`Normal` (only when no other
/// weight or style keyword is present), whitespace.
pub fn clean_name(raw: &str) -> String {
    let mut name = collapse_whitespace(raw);

    name = apply_family_overrides(&name);
    name = strip_repeatedly(&name, |s| {
        let s = TECH_SUFFIX.replace(s, "");
        TECH_SUFFIX_CAMEL.replace(&s, "$1").into_owned()
    });
    name = strip_repeatedly(&name, |s| {
        let s = VERSION_SUFFIX.replace(s, "").into_owned();
        strip_hash(&s)
    });
    name = strip_repeatedly(&name, |s| BRACKETED_SUFFIX.replace(s, "").into_owned());

    let without_regular = REGULAR_SUFFIX.replace(&name, "").into_owned();
    if !has_style_keyword(&without_regular) {
        name = REGULAR_SUFFIX_CAMEL.replace(&without_regular, "$1").into_owned();
    }

    collapse_whitespace(&name)
        .trim_matches(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .to_string()
}

/// Cleanup for names recovered from a file stem: numeric ordering
/// prefixes, separators, `webfont` tokens and licensing words are removed
/// before [`clean_name`]. All-lowercase words are capitalized.
pub fn clean_path_name(stem: &str) -> String {
    let stem = stem.trim();
    let without_prefix = NUMERIC_PREFIX.replace(stem, "");
    let stem = if without_prefix.trim().is_empty() {
        stem
    } else {
        without_prefix.as_ref()
    };

    let spaced = stem.replace(['-', '_'], " ");
    let spaced = WEBFONT_TOKEN.replace_all(&spaced, " ");
    let spaced = PATH_NOISE.replace_all(&spaced, " ");

    capitalize_lowercase_words(&clean_name(&spaced))
}

/// Directory names often end in "font"/"fonts" (`inter-fonts/`)
pub fn strip_fonts_dir_suffix(dir_name: &str) -> String {
    FONTS_DIR_SUFFIX.replace(dir_name.trim(), "").into_owned()
}

/// Whether the string carries licensing, version, date, extension, or
/// test/sample wording that disqualifies it as a family name
pub fn looks_like_noise(raw: &str) -> bool {
    NOISE.is_match(raw)
}

/// Whether a weight or style word is present
pub fn has_style_keyword(name: &str) -> bool {
    STYLE_KEYWORD.is_match(name)
}

/// Whether a (cleaned) string is acceptable as a display name
pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();

    if name.len() < 2 || name.len() > MAX_NAME_LEN || !name.is_ascii() {
        return false;
    }
    if name.chars().all(|c| c == '.' || c.is_whitespace()) {
        return false;
    }
    if name.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
        return false;
    }
    if !name.chars().any(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    if BARE_WORDS.contains(&lower.as_str()) {
        return false;
    }
    !looks_like_noise(name)
}

/// Vendor IDs that are registered placeholders rather than a foundry
pub fn is_placeholder_vendor(vendor: &str) -> bool {
    let lower = vendor.trim().to_ascii_lowercase();
    lower.is_empty() || PLACEHOLDER_VENDORS.contains(&lower.as_str())
}

fn apply_family_overrides(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    let mut out = name.to_string();
    for rule in FAMILY_OVERRIDES.iter().filter(|r| lower.contains(r.needle)) {
        for suffix in rule.strip_suffixes {
            if let Some(stripped) = strip_suffix_token(&out, suffix) {
                out = stripped;
            }
        }
    }
    out
}

/// Strip `suffix` from the end when it is its own token
/// (preceded by a separator or a lowercase→uppercase boundary)
fn strip_suffix_token(name: &str, suffix: &str) -> Option<String> {
    let head = name.strip_suffix(suffix)?;
    let last = head.chars().last()?;
    let is_boundary = matches!(last, ' ' | '-' | '_')
        || (last.is_ascii_lowercase() && suffix.starts_with(|c: char| c.is_ascii_uppercase()));
    if is_boundary {
        Some(head.trim_end_matches([' ', '-', '_']).to_string())
    } else {
        None
    }
}

/// Drop a trailing token that looks like a git hash (hex with a digit)
fn strip_hash(name: &str) -> String {
    if let Some(caps) = HASH_SUFFIX.captures(name) {
        let hash = &caps[1];
        if hash.chars().any(|c| c.is_ascii_digit()) {
            if let Some(m) = caps.get(0) {
                return name[..m.start()].to_string();
            }
        }
    }
    name.to_string()
}

fn strip_repeatedly(name: &str, step: impl Fn(&str) -> String) -> String {
    let mut current = name.to_string();
    // Bounded: every productive step shortens the string
    for _ in 0..4 {
        let next = step(&current);
        if next == current || next.trim().is_empty() {
            break;
        }
        current = next;
    }
    current
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

fn capitalize_lowercase_words(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            if word.chars().all(|c| !c.is_ascii_uppercase()) {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
