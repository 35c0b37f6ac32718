use std::sync::Arc;

use models::TimeRange;
use parking_lot::RwLock;
use tracing::info;

use crate::error::Error;
use crate::reader::CursorStats;
use crate::ColumnFileId;

pub mod mem;

pub use mem::MemTsmFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekResult {
    /// The iterator landed exactly on the requested key.
    pub exact: bool,
    /// The iterator landed on some key (the first at or after the request).
    pub found: bool,
}

/// Iterator over the composite keys of one TSM file whose data overlaps a
/// time range.
///
/// `next` advances to the next such key; `has_data` confirms at least one
/// timestamp inside the range and accounts the scan in `stats`. I/O
/// failures do not interrupt iteration: `next` returns `false` and the
/// failure is observed through `err`.
pub trait TimeRangeIterator {
    fn next(&mut self) -> bool;

    /// The current composite key; empty when exhausted.
    fn key(&self) -> &[u8];

    fn has_data(&mut self) -> bool;

    /// Repositions onto the first key at or after `key`.
    fn seek(&mut self, key: &[u8]) -> SeekResult;

    fn stats(&self) -> CursorStats;

    fn err(&self) -> Option<&Error>;
}

/// An immutable leaf of the log-structured merge tree.
///
/// A pin is an `Arc` clone of the file held for the duration of a scan;
/// `FileStore::remove_file` only flags the file, and removal completes when
/// the last pin drops.
pub trait TsmFile: Send + Sync {
    fn file_id(&self) -> ColumnFileId;

    fn time_range(&self) -> TimeRange;

    fn overlaps_time_range(&self, range: &TimeRange) -> bool {
        self.time_range().overlaps(range)
    }

    /// True if any key of the file falls in the prefix range
    /// `[min_prefix, max_prefix]`.
    fn overlaps_key_prefix_range(&self, min_prefix: &[u8], max_prefix: &[u8]) -> bool;

    fn time_range_iterator(&self, prefix: &[u8], range: TimeRange) -> Box<dyn TimeRangeIterator>;

    /// Flags the file for removal once the last pin drops.
    fn mark_removed(&self);
}

/// The live set of TSM files.
#[derive(Default)]
pub struct FileStore {
    files: RwLock<Vec<Arc<dyn TsmFile>>>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, file: Arc<dyn TsmFile>) {
        info!(file_id = file.file_id(), "adding tsm file");
        self.files.write().push(file);
    }

    /// Unlinks the file from the store and flags it for removal. Scans that
    /// pinned it keep reading until their pins drop.
    pub fn remove_file(&self, file_id: ColumnFileId) -> bool {
        let mut files = self.files.write();
        let Some(idx) = files.iter().position(|f| f.file_id() == file_id) else {
            return false;
        };
        let file = files.swap_remove(idx);
        drop(files);
        info!(file_id, "removing tsm file");
        file.mark_removed();
        true
    }

    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }

    /// Calls `f` for every live file; `f` returns `false` to stop. The set
    /// of files is a snapshot taken when the walk starts.
    pub fn for_each_file(&self, mut f: impl FnMut(&Arc<dyn TsmFile>) -> bool) {
        let snapshot: Vec<Arc<dyn TsmFile>> = self.files.read().clone();
        for file in &snapshot {
            if !f(file) {
                break;
            }
        }
    }
}
