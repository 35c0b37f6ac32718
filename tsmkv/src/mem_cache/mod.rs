use std::collections::BTreeMap;

use models::{FieldVal, Timestamp};
use parking_lot::RwLock;

use crate::error::Result;

/// One series-field column of the write cache. Samples are appended in
/// arrival order; readers sort a copy of the timestamps when they need
/// order.
#[derive(Debug, Default)]
pub struct CacheEntry {
    timestamps: Vec<Timestamp>,
    values: Vec<FieldVal>,
}

impl CacheEntry {
    fn push(&mut self, timestamp: Timestamp, value: FieldVal) {
        self.timestamps.push(timestamp);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Appends this entry's timestamps (unsorted) to `out`.
    pub fn append_timestamps(&self, out: &mut Vec<Timestamp>) {
        out.extend_from_slice(&self.timestamps);
    }

    pub fn values(&self) -> &[FieldVal] {
        &self.values
    }
}

/// In-memory write cache: composite key to timestamp/value columns.
///
/// `apply_entry_fn` walks entries in composite-key order under the map's
/// read guard, so entries cannot be mutated for the duration of the
/// callback.
#[derive(Debug, Default)]
pub struct MemCache {
    entries: RwLock<BTreeMap<Vec<u8>, CacheEntry>>,
}

impl MemCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, key: &[u8], timestamp: Timestamp, value: FieldVal) {
        let mut entries = self.entries.write();
        entries.entry(key.to_vec()).or_default().push(timestamp, value);
    }

    pub fn entry_count(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Appends the timestamps of `key`'s entry (unsorted) to `out`; absent
    /// keys append nothing.
    pub fn append_timestamps(&self, key: &[u8], out: &mut Vec<Timestamp>) {
        if let Some(entry) = self.entries.read().get(key) {
            entry.append_timestamps(out);
        }
    }

    /// Calls `f` for every entry in composite-key order. The first error
    /// stops the walk and is returned.
    pub fn apply_entry_fn(
        &self,
        mut f: impl FnMut(&[u8], &CacheEntry) -> Result<()>,
    ) -> Result<()> {
        let entries = self.entries.read();
        for (key, entry) in entries.iter() {
            f(key, entry)?;
        }
        Ok(())
    }
}
