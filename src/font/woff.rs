//! WOFF container handling
//!
//! Only what the name and metrics pipeline needs:
//! - sniffing the container format from the first four bytes
//! - rebuilding a plain sfnt from a WOFF 1.0 file (zlib tables)
//! - inflating the WOFF 1.0 extended metadata XML
//! - pulling the `<description><text>` fragment out of that XML
//!
//! WOFF2 uses Brotli and transformed glyf/loca tables; it is recognized
//! but not unwrapped.

use anyhow::{anyhow, bail, Context, Result};
use flate2::read::ZlibDecoder;
use regex::Regex;
use std::io::Read;
use std::sync::LazyLock;

const WOFF_HEADER_LEN: usize = 44;
const WOFF_TABLE_ENTRY_LEN: usize = 20;
const SFNT_TABLE_RECORD_LEN: usize = 16;

/// Upper bound for any inflated block (guards against zip bombs)
const MAX_INFLATED_LEN: usize = 64 * 1024 * 1024;

static DESCRIPTION_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<description\b[^>]*>\s*<text\b[^>]*>(.*?)</text>").unwrap()
});

/// Container format of a font file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// TrueType/OpenType outlines or a collection
    Sfnt,
    Woff,
    Woff2,
    Unknown,
}

impl Container {
    pub fn sniff(data: &[u8]) -> Self {
        match data.get(0..4) {
            Some(b"wOFF") => Container::Woff,
            Some(b"wOF2") => Container::Woff2,
            Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf") => {
                Container::Sfnt
            }
            _ => Container::Unknown,
        }
    }
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

fn inflate(compressed: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    if expected_len > MAX_INFLATED_LEN {
        bail!("inflated size {} exceeds limit", expected_len);
    }
    let mut out = Vec::with_capacity(expected_len);
    ZlibDecoder::new(compressed)
        .take(expected_len as u64)
        .read_to_end(&mut out)
        .context("zlib inflate failed")?;
    if out.len() != expected_len {
        bail!("inflated {} bytes, expected {}", out.len(), expected_len);
    }
    Ok(out)
}

/// Extended metadata XML of a WOFF file, if present.
///
/// Returns `Ok(None)` for files without a metadata block and for WOFF2
/// (Brotli-compressed metadata).
pub fn metadata_xml(data: &[u8]) -> Result<Option<String>> {
    match Container::sniff(data) {
        Container::Woff => {}
        _ => return Ok(None),
    }
    let header = |off| read_u32(data, off).ok_or_else(|| anyhow!("truncated WOFF header"));
    let meta_offset = header(24)? as usize;
    let meta_length = header(28)? as usize;
    let meta_orig_length = header(32)? as usize;
    if meta_offset == 0 || meta_length == 0 {
        return Ok(None);
    }

    let block = data
        .get(meta_offset..meta_offset + meta_length)
        .ok_or_else(|| anyhow!("WOFF metadata block out of range"))?;
    let xml = inflate(block, meta_orig_length).context("WOFF metadata")?;
    Ok(Some(String::from_utf8_lossy(&xml).into_owned()))
}

/// Text of the first `<description><text>` element, entity-decoded
pub fn description_text(xml: &str) -> Option<String> {
    let caps = DESCRIPTION_TEXT.captures(xml)?;
    let text = decode_entities(caps.get(1)?.as_str().trim());
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Rebuild a plain sfnt from a WOFF 1.0 file.
///
/// Tables are inflated when `compLength < origLength` and laid out
/// 4-byte aligned after a fresh table directory.
pub fn woff_to_sfnt(data: &[u8]) -> Result<Vec<u8>> {
    if Container::sniff(data) != Container::Woff {
        bail!("not a WOFF file");
    }
    if data.len() < WOFF_HEADER_LEN {
        bail!("truncated WOFF header");
    }
    let flavor = read_u32(data, 4).ok_or_else(|| anyhow!("truncated WOFF header"))?;
    let num_tables = read_u16(data, 12).ok_or_else(|| anyhow!("truncated WOFF header"))? as usize;

    // Read directory entries first so the output directory can be sized
    struct Entry {
        tag: u32,
        checksum: u32,
        body: Vec<u8>,
    }
    let mut entries = Vec::with_capacity(num_tables);
    for i in 0..num_tables {
        let base = WOFF_HEADER_LEN + i * WOFF_TABLE_ENTRY_LEN;
        let field = |off| {
            read_u32(data, base + off).ok_or_else(|| anyhow!("truncated WOFF table directory"))
        };
        let tag = field(0)?;
        let offset = field(4)? as usize;
        let comp_length = field(8)? as usize;
        let orig_length = field(12)? as usize;
        let checksum = field(16)?;

        let raw = data
            .get(offset..offset + comp_length)
            .ok_or_else(|| anyhow!("WOFF table {:08x} out of range", tag))?;
        let body = if comp_length < orig_length {
            inflate(raw, orig_length).with_context(|| format!("WOFF table {:08x}", tag))?
        } else {
            raw.to_vec()
        };
        entries.push(Entry { tag, checksum, body });
    }

    // sfnt tables must be sorted by tag
    entries.sort_by_key(|e| e.tag);

    let mut entry_selector = 0u16;
    while (1usize << (entry_selector + 1)) <= num_tables {
        entry_selector += 1;
    }
    let search_range = (1u16 << entry_selector).saturating_mul(16);
    let range_shift = (num_tables as u16).saturating_mul(16).saturating_sub(search_range);

    let mut out = Vec::new();
    out.extend_from_slice(&flavor.to_be_bytes());
    out.extend_from_slice(&(num_tables as u16).to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());

    let mut offset = 12 + num_tables * SFNT_TABLE_RECORD_LEN;
    for entry in &entries {
        out.extend_from_slice(&entry.tag.to_be_bytes());
        out.extend_from_slice(&entry.checksum.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(entry.body.len() as u32).to_be_bytes());
        offset += (entry.body.len() + 3) & !3;
    }
    for entry in &entries {
        out.extend_from_slice(&entry.body);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    /// WOFF with one stored table and one compressed table, plus metadata
    fn build_woff(meta: Option<&str>) -> Vec<u8> {
        let head = vec![0xAAu8; 6];
        let name = vec![0x42u8; 200];
        let name_z = zlib(&name);

        let mut data = vec![0u8; WOFF_HEADER_LEN + 2 * WOFF_TABLE_ENTRY_LEN];
        data[0..4].copy_from_slice(b"wOFF");
        data[4..8].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        data[12..14].copy_from_slice(&2u16.to_be_bytes());

        // Directory order deliberately unsorted: "name" before "head"
        let tables: [(&[u8; 4], &[u8], usize); 2] =
            [(b"name", name_z.as_slice(), name.len()), (b"head", head.as_slice(), head.len())];
        for (i, (tag, body, orig_len)) in tables.iter().enumerate() {
            let offset = data.len();
            data.extend_from_slice(body);
            let base = WOFF_HEADER_LEN + i * WOFF_TABLE_ENTRY_LEN;
            data[base..base + 4].copy_from_slice(*tag);
            data[base + 4..base + 8].copy_from_slice(&(offset as u32).to_be_bytes());
            data[base + 8..base + 12].copy_from_slice(&(body.len() as u32).to_be_bytes());
            data[base + 12..base + 16].copy_from_slice(&(*orig_len as u32).to_be_bytes());
        }

        if let Some(xml) = meta {
            let z = zlib(xml.as_bytes());
            let offset = data.len();
            data.extend_from_slice(&z);
            data[24..28].copy_from_slice(&(offset as u32).to_be_bytes());
            data[28..32].copy_from_slice(&(z.len() as u32).to_be_bytes());
            data[32..36].copy_from_slice(&(xml.len() as u32).to_be_bytes());
        }
        data
    }

    #[test]
    fn test_sniff() {
        assert_eq!(Container::sniff(b"wOFF...."), Container::Woff);
        assert_eq!(Container::sniff(b"wOF2...."), Container::Woff2);
        assert_eq!(Container::sniff(&[0, 1, 0, 0, 9]), Container::Sfnt);
        assert_eq!(Container::sniff(b"OTTO"), Container::Sfnt);
        assert_eq!(Container::sniff(b"PK"), Container::Unknown);
    }

    #[test]
    fn test_woff_to_sfnt() {
        let sfnt = woff_to_sfnt(&build_woff(None)).unwrap();
        assert_eq!(&sfnt[0..4], &[0, 1, 0, 0]);
        assert_eq!(read_u16(&sfnt, 4), Some(2));
        // Sorted: "head" first
        assert_eq!(&sfnt[12..16], b"head");
        assert_eq!(&sfnt[28..32], b"name");
        let head_offset = read_u32(&sfnt, 20).unwrap() as usize;
        let head_len = read_u32(&sfnt, 24).unwrap() as usize;
        assert_eq!(head_len, 6);
        assert_eq!(&sfnt[head_offset..head_offset + 6], &[0xAA; 6]);
        let name_offset = read_u32(&sfnt, 36).unwrap() as usize;
        assert_eq!(name_offset % 4, 0);
        assert_eq!(&sfnt[name_offset..name_offset + 200], &[0x42; 200][..]);
    }

    #[test]
    fn test_metadata_description() {
        let xml = r#"<?xml version="1.0"?>
<metadata version="1.0">
  <description url="https://example.com">
    <text lang="en">Atkinson Hyperlegible</text>
  </description>
</metadata>"#;
        let data = build_woff(Some(xml));
        let meta = metadata_xml(&data).unwrap().unwrap();
        assert_eq!(description_text(&meta).as_deref(), Some("Atkinson Hyperlegible"));
    }

    #[test]
    fn test_metadata_absent() {
        assert_eq!(metadata_xml(&build_woff(None)).unwrap(), None);
        assert_eq!(metadata_xml(b"OTTO").unwrap(), None);
    }

    #[test]
    fn test_description_entities() {
        let xml = "<description><text>Foo &amp; Bar</text></description>";
        assert_eq!(description_text(xml).as_deref(), Some("Foo & Bar"));
        assert_eq!(description_text("<metadata/>"), None);
    }

    #[test]
    fn test_truncated() {
        assert!(woff_to_sfnt(b"wOFF").is_err());
    }
}
