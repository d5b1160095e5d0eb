//! ScrollRecord persistence on top of a `SessionStore`
//!
//! Records are stored one per path under `prefix + path`, with the offset
//! written as a decimal string. Reads are lenient: anything that does not
//! decode to a finite, non-negative offset is treated as "no record".

use log::warn;

use crate::platform::SessionStore;
use crate::{Result, ScrollRecord};

/// View of the scroll records kept in a session store
pub struct ScrollRecords<'a> {
    store: &'a dyn SessionStore,
    prefix: &'a str,
}

impl<'a> ScrollRecords<'a> {
    pub fn new(store: &'a dyn SessionStore, prefix: &'a str) -> Self {
        Self { store, prefix }
    }

    pub fn key_for(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }

    pub fn load(&self, path: &str) -> Option<ScrollRecord> {
        let key = self.key_for(path);
        let raw = self.store.get_item(&key)?;
        match parse_offset(&raw) {
            Some(offset) => Some(ScrollRecord {
                path: path.to_string(),
                offset,
            }),
            None => {
                warn!("ignoring unparseable scroll record {}={:?}", key, raw);
                None
            }
        }
    }

    pub fn save(&self, path: &str, offset: u32) -> Result<()> {
        self.store.set_item(&self.key_for(path), &offset.to_string())
    }
}

/// Decode a stored offset.
///
/// Whole numbers are taken as-is; fractional pixel values (some hosts report
/// sub-pixel offsets) are rounded. Negative, non-finite and non-numeric values
/// yield `None`.
pub fn parse_offset(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u32>() {
        return Some(v);
    }
    let v = raw.parse::<f64>().ok()?;
    if !v.is_finite() || v < 0.0 || v > u32::MAX as f64 {
        return None;
    }
    Some(v.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemorySessionStore;

    #[test]
    fn parse_offset_variants() {
        assert_eq!(parse_offset("1200"), Some(1200));
        assert_eq!(parse_offset(" 0 "), Some(0));
        assert_eq!(parse_offset("1199.6"), Some(1200));
        assert_eq!(parse_offset("-5"), None);
        assert_eq!(parse_offset("NaN"), None);
        assert_eq!(parse_offset("Infinity"), None);
        assert_eq!(parse_offset("inf"), None);
        assert_eq!(parse_offset(""), None);
        assert_eq!(parse_offset("twelve"), None);
        assert_eq!(parse_offset("1e12"), None);
    }

    #[test]
    fn save_and_load_use_prefixed_keys() {
        let store = MemorySessionStore::new();
        let records = ScrollRecords::new(&store, "scroll-pos:");
        records.save("/portfolio", 1200).unwrap();

        assert_eq!(store.get_item("scroll-pos:/portfolio").as_deref(), Some("1200"));
        let rec = records.load("/portfolio").expect("record present");
        assert_eq!(rec.offset, 1200);
        assert_eq!(rec.path, "/portfolio");
        assert!(records.load("/blog").is_none());
    }

    #[test]
    fn corrupt_record_reads_as_missing() {
        let store = MemorySessionStore::new();
        store.set_item("scroll-pos:/", "undefined").unwrap();
        let records = ScrollRecords::new(&store, "scroll-pos:");
        assert!(records.load("/").is_none());
    }
}
