//! Minimal font builders for integration tests

#![allow(dead_code)]

/// Vertical metrics and names for a synthetic font
pub struct TestFont<'a> {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    /// (name ID, value), written as Windows/Unicode BMP/en-US records
    pub names: &'a [(u16, &'a str)],
    pub vendor_id: &'a [u8; 4],
}

impl<'a> TestFont<'a> {
    /// Inter's hhea values
    pub fn inter() -> Self {
        Self {
            units_per_em: 2048,
            ascender: 1825,
            descender: -443,
            line_gap: 0,
            names: &[(1, "Inter"), (4, "Inter Regular"), (6, "Inter-Regular")],
            vendor_id: b"RSMS",
        }
    }

    /// Build an sfnt with head, hhea, maxp, name and OS/2 tables
    pub fn to_sfnt(&self) -> Vec<u8> {
        sfnt(self.tables())
    }

    /// Same sfnt with one table left out
    pub fn to_sfnt_without(&self, tag: &[u8; 4]) -> Vec<u8> {
        let tables = self.tables().into_iter().filter(|(t, _)| *t != tag).collect();
        sfnt(tables)
    }

    /// Wrap the same tables in an uncompressed WOFF 1.0 container
    pub fn to_woff(&self) -> Vec<u8> {
        let tables = self.tables();
        let header_len = 44 + 20 * tables.len();
        let mut out = vec![0u8; header_len];
        out[0..4].copy_from_slice(b"wOFF");
        out[4..8].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        out[12..14].copy_from_slice(&(tables.len() as u16).to_be_bytes());

        for (i, (tag, data)) in tables.iter().enumerate() {
            let offset = out.len();
            out.extend_from_slice(data);
            while out.len() % 4 != 0 {
                out.push(0);
            }
            let base = 44 + i * 20;
            out[base..base + 4].copy_from_slice(*tag);
            out[base + 4..base + 8].copy_from_slice(&(offset as u32).to_be_bytes());
            out[base + 8..base + 12].copy_from_slice(&(data.len() as u32).to_be_bytes());
            out[base + 12..base + 16].copy_from_slice(&(data.len() as u32).to_be_bytes());
        }
        let total = out.len() as u32;
        out[8..12].copy_from_slice(&total.to_be_bytes());
        out
    }

    fn tables(&self) -> Vec<(&'static [u8; 4], Vec<u8>)> {
        vec![
            (b"OS/2", self.os2()),
            (b"head", self.head()),
            (b"hhea", self.hhea()),
            (b"maxp", maxp()),
            (b"name", self.name()),
        ]
    }

    fn head(&self) -> Vec<u8> {
        let mut t = vec![0u8; 54];
        t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        t[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
        t[18..20].copy_from_slice(&self.units_per_em.to_be_bytes());
        t
    }

    fn hhea(&self) -> Vec<u8> {
        let mut t = vec![0u8; 36];
        t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        t[4..6].copy_from_slice(&self.ascender.to_be_bytes());
        t[6..8].copy_from_slice(&self.descender.to_be_bytes());
        t[8..10].copy_from_slice(&self.line_gap.to_be_bytes());
        t[34..36].copy_from_slice(&1u16.to_be_bytes());
        t
    }

    fn os2(&self) -> Vec<u8> {
        let mut t = vec![0u8; 78];
        t[58..62].copy_from_slice(self.vendor_id);
        t
    }

    fn name(&self) -> Vec<u8> {
        let count = self.names.len();
        let storage_offset = 6 + 12 * count;
        let mut records = Vec::new();
        let mut storage = Vec::new();
        for (name_id, value) in self.names {
            let encoded: Vec<u8> = value.encode_utf16().flat_map(|u| u.to_be_bytes()).collect();
            for field in [3u16, 1, 0x0409, *name_id, encoded.len() as u16, storage.len() as u16] {
                records.extend_from_slice(&field.to_be_bytes());
            }
            storage.extend_from_slice(&encoded);
        }
        let mut t = Vec::new();
        t.extend_from_slice(&0u16.to_be_bytes());
        t.extend_from_slice(&(count as u16).to_be_bytes());
        t.extend_from_slice(&(storage_offset as u16).to_be_bytes());
        t.extend_from_slice(&records);
        t.extend_from_slice(&storage);
        t
    }
}

fn maxp() -> Vec<u8> {
    let mut t = vec![0u8; 6];
    t[0..4].copy_from_slice(&0x0000_5000u32.to_be_bytes());
    t[4..6].copy_from_slice(&1u16.to_be_bytes());
    t
}

fn sfnt(tables: Vec<(&'static [u8; 4], Vec<u8>)>) -> Vec<u8> {
    let header_len = 12 + 16 * tables.len();
    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    out.extend_from_slice(&[0u8; 6]);

    let mut offset = header_len;
    let mut body = Vec::new();
    for (tag, data) in &tables {
        out.extend_from_slice(*tag);
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = header_len + body.len();
    }
    out.extend_from_slice(&body);
    out
}
