//! Group names decoded from the engine's name table
//!
//! The name table is a run of fixed-size records. Each record holds the
//! 1-based capture index as a big-endian `u16` followed by the NUL-terminated
//! group name:
//!
//! ```text
//! | idx hi | idx lo | n | a | m | e | \0 | padding ... |
//! |<-------------- name_entry_size bytes ------------->|
//! ```
//!
//! Records are sorted by name, not by capture index.

use std::ffi::{CStr, CString};

use hashbrown::HashMap;
use serde::{Serialize, Serializer};

/// A named capture group: owned name plus its capture index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupName {
    name: CString,
    capture_index: u32,
}

impl GroupName {
    /// Create a group name for capture group `capture_index`
    pub fn new(name: CString, capture_index: u32) -> Self {
        Self {
            name,
            capture_index,
        }
    }

    /// Name bytes without the trailing NUL
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.name.as_bytes()
    }

    /// Name with its trailing NUL, for handing across a C boundary
    #[inline]
    pub fn as_c_str(&self) -> &CStr {
        &self.name
    }

    /// Name as UTF-8, if it is valid UTF-8
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        self.name.to_str().ok()
    }

    /// Length of the name in bytes, excluding the NUL
    #[inline]
    pub fn name_len(&self) -> usize {
        self.name.as_bytes().len()
    }

    /// 1-based capture index of the group
    #[inline]
    pub fn capture_index(&self) -> u32 {
        self.capture_index
    }
}

impl Serialize for GroupName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name.to_string_lossy())
    }
}

/// The group-name table of one compiled pattern
///
/// Entries keep the engine's name-table order. Lookup by capture index goes
/// through a hash index; the result is the same as scanning the entries.
#[derive(Debug, Clone, Default)]
pub struct GroupNames {
    entries: Vec<GroupName>,
    by_index: HashMap<u32, usize>,
}

impl GroupNames {
    /// Decode `count` records of `entry_size` bytes from a raw name table
    ///
    /// Allocation failure while copying names aborts the process: a context
    /// with a partial name table has no meaningful recovery path.
    pub fn decode(table: &[u8], entry_size: usize, count: usize) -> Self {
        // two index bytes plus at least the terminator
        if count == 0 || entry_size < 3 {
            return Self::default();
        }

        let mut entries = Vec::new();
        if entries.try_reserve_exact(count).is_err() {
            fatal_alloc("group names", count);
        }

        for record in table.chunks_exact(entry_size).take(count) {
            let capture_index = u32::from(u16::from_be_bytes([record[0], record[1]]));
            let raw = &record[2..];
            let name_len = memchr::memchr(0, raw).unwrap_or(raw.len());

            let mut owned = Vec::new();
            if owned.try_reserve_exact(name_len + 1).is_err() {
                fatal_alloc("group name", name_len + 1);
            }
            owned.extend_from_slice(&raw[..name_len]);
            // SAFETY: `owned` holds the bytes before the first NUL, so it has
            // no interior NUL; the reserved slot takes the terminator.
            let name = unsafe { CString::from_vec_unchecked(owned) };

            entries.push(GroupName::new(name, capture_index));
        }

        Self::from_entries(entries)
    }

    /// Build the table from already-decoded entries
    pub fn from_entries(entries: Vec<GroupName>) -> Self {
        let mut by_index = HashMap::with_capacity(entries.len());
        for (slot, entry) in entries.iter().enumerate() {
            by_index.entry(entry.capture_index).or_insert(slot);
        }
        Self { entries, by_index }
    }

    /// Number of named groups
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pattern has no named groups
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `slot` (name-table order)
    #[inline]
    pub fn get(&self, slot: usize) -> Option<&GroupName> {
        self.entries.get(slot)
    }

    /// Slot of the entry naming capture group `capture_index`
    #[inline]
    pub fn slot_for(&self, capture_index: u32) -> Option<usize> {
        self.by_index.get(&capture_index).copied()
    }

    /// Entry naming capture group `capture_index`
    pub fn for_capture(&self, capture_index: u32) -> Option<&GroupName> {
        self.slot_for(capture_index).map(|slot| &self.entries[slot])
    }

    /// All entries carrying `name` (several when duplicate names are allowed)
    pub fn named<'a>(&'a self, name: &'a [u8]) -> impl Iterator<Item = &'a GroupName> + 'a {
        self.entries.iter().filter(move |entry| entry.as_bytes() == name)
    }

    /// Iterate entries in name-table order
    pub fn iter(&self) -> std::slice::Iter<'_, GroupName> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a GroupNames {
    type Item = &'a GroupName;
    type IntoIter = std::slice::Iter<'a, GroupName>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cold]
fn fatal_alloc(what: &str, size: usize) -> ! {
    eprintln!("memory allocation for {}({}) failed! Abort!", what, size);
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a raw name table the way the engine lays it out
    fn table(entries: &[(u16, &str)]) -> (Vec<u8>, usize) {
        let entry_size = 2 + entries.iter().map(|(_, n)| n.len()).max().unwrap_or(0) + 1;
        let mut raw = Vec::new();
        for (index, name) in entries {
            let start = raw.len();
            raw.extend_from_slice(&index.to_be_bytes());
            raw.extend_from_slice(name.as_bytes());
            raw.resize(start + entry_size, 0);
        }
        (raw, entry_size)
    }

    #[test]
    fn test_decode_big_endian_index() {
        let (raw, size) = table(&[(0x0102, "wide"), (3, "x")]);
        let names = GroupNames::decode(&raw, size, 2);

        assert_eq!(names.len(), 2);
        assert_eq!(names.get(0).unwrap().capture_index(), 258);
        assert_eq!(names.get(0).unwrap().as_bytes(), b"wide");
        assert_eq!(names.get(1).unwrap().capture_index(), 3);
        assert_eq!(names.get(1).unwrap().as_bytes(), b"x");
    }

    #[test]
    fn test_name_len_excludes_nul() {
        let (raw, size) = table(&[(1, "year")]);
        let names = GroupNames::decode(&raw, size, 1);
        let entry = names.get(0).unwrap();

        assert_eq!(entry.name_len(), 4);
        assert_eq!(entry.as_c_str().to_bytes_with_nul(), b"year\0");
        assert_eq!(entry.as_str(), Some("year"));
    }

    #[test]
    fn test_lookup_by_capture_index() {
        // name-table order is alphabetical, capture order is not
        let (raw, size) = table(&[(2, "mon"), (1, "year")]);
        let names = GroupNames::decode(&raw, size, 2);

        assert_eq!(names.for_capture(1).unwrap().as_str(), Some("year"));
        assert_eq!(names.for_capture(2).unwrap().as_str(), Some("mon"));
        assert!(names.for_capture(3).is_none());
        assert_eq!(names.slot_for(1), Some(1));
    }

    #[test]
    fn test_duplicate_names() {
        let (raw, size) = table(&[(1, "n"), (2, "n")]);
        let names = GroupNames::decode(&raw, size, 2);

        let indices: Vec<u32> = names.named(b"n").map(|g| g.capture_index()).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_empty_and_degenerate_tables() {
        assert!(GroupNames::decode(&[], 0, 0).is_empty());
        assert!(GroupNames::decode(&[0, 1], 2, 1).is_empty());

        // count larger than the table: only whole records are read
        let (raw, size) = table(&[(1, "a")]);
        assert_eq!(GroupNames::decode(&raw, size, 5).len(), 1);
    }

    #[test]
    fn test_serialize_as_string() {
        let (raw, size) = table(&[(1, "year")]);
        let names = GroupNames::decode(&raw, size, 1);
        let json = serde_json::to_string(names.get(0).unwrap()).unwrap();
        assert_eq!(json, "\"year\"");
    }
}
