use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use models::TimeRange;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::Error;
use crate::reader::CursorStats;
use crate::tsm::{SeekResult, TimeRangeIterator, TsmFile};
use crate::ColumnFileId;

/// Immutable in-memory TSM file: a sorted composite-key index mapping each
/// key to its timestamp column.
///
/// The on-disk block codec lives outside this crate; every consumer of the
/// [`TsmFile`] contract in-tree (engine tests included) reads through this
/// implementation.
pub struct MemTsmFile {
    inner: Arc<FileData>,
}

struct FileData {
    file_id: ColumnFileId,
    /// Sorted by key; each timestamp column is sorted ascending.
    entries: Vec<(Vec<u8>, Vec<i64>)>,
    time_range: TimeRange,
    removed: AtomicBool,
    read_error: Mutex<Option<String>>,
}

impl Drop for FileData {
    fn drop(&mut self) {
        if self.removed.load(Ordering::SeqCst) {
            debug!(file_id = self.file_id, "last pin dropped, tsm file removed");
        }
    }
}

impl MemTsmFile {
    pub fn new(file_id: ColumnFileId, mut entries: Vec<(Vec<u8>, Vec<i64>)>) -> Arc<Self> {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let mut time_range = TimeRange::none();
        for (_, timestamps) in entries.iter_mut() {
            timestamps.sort_unstable();
            if let (Some(min), Some(max)) = (timestamps.first(), timestamps.last()) {
                time_range.merge(&TimeRange::new(*min, *max));
            }
        }
        Arc::new(Self {
            inner: Arc::new(FileData {
                file_id,
                entries,
                time_range,
                removed: AtomicBool::new(false),
                read_error: Mutex::new(None),
            }),
        })
    }

    /// Makes every subsequently created iterator fail its first `next`,
    /// surfacing the reason through `err`.
    pub fn inject_read_error(&self, reason: &str) {
        *self.inner.read_error.lock() = Some(reason.to_string());
    }

    fn min_key(&self) -> Option<&[u8]> {
        self.inner.entries.first().map(|(k, _)| k.as_slice())
    }

    fn max_key(&self) -> Option<&[u8]> {
        self.inner.entries.last().map(|(k, _)| k.as_slice())
    }
}

impl TsmFile for MemTsmFile {
    fn file_id(&self) -> ColumnFileId {
        self.inner.file_id
    }

    fn time_range(&self) -> TimeRange {
        self.inner.time_range
    }

    fn overlaps_key_prefix_range(&self, min_prefix: &[u8], max_prefix: &[u8]) -> bool {
        let (Some(min_key), Some(max_key)) = (self.min_key(), self.max_key()) else {
            return false;
        };
        max_key >= min_prefix && (min_key <= max_prefix || min_key.starts_with(max_prefix))
    }

    fn time_range_iterator(&self, prefix: &[u8], range: TimeRange) -> Box<dyn TimeRangeIterator> {
        let pending_error = self.inner.read_error.lock().clone();
        Box::new(MemTimeRangeIterator {
            pos: lower_bound(&self.inner.entries, prefix),
            inner: Arc::clone(&self.inner),
            range,
            started: false,
            stats: CursorStats::default(),
            err: None,
            pending_error,
        })
    }

    fn mark_removed(&self) {
        self.inner.removed.store(true, Ordering::SeqCst);
    }
}

fn lower_bound(entries: &[(Vec<u8>, Vec<i64>)], key: &[u8]) -> usize {
    entries.partition_point(|(k, _)| k.as_slice() < key)
}

struct MemTimeRangeIterator {
    inner: Arc<FileData>,
    range: TimeRange,
    pos: usize,
    started: bool,
    stats: CursorStats,
    err: Option<Error>,
    pending_error: Option<String>,
}

impl MemTimeRangeIterator {
    fn entry(&self) -> Option<&(Vec<u8>, Vec<i64>)> {
        self.inner.entries.get(self.pos)
    }

    fn entry_overlaps(&self, timestamps: &[i64]) -> bool {
        match (timestamps.first(), timestamps.last()) {
            (Some(&min), Some(&max)) => TimeRange::new(min, max).overlaps(&self.range),
            _ => false,
        }
    }
}

impl TimeRangeIterator for MemTimeRangeIterator {
    fn next(&mut self) -> bool {
        if self.err.is_some() {
            return false;
        }
        if let Some(reason) = self.pending_error.take() {
            self.err = Some(Error::ReadTsm { reason });
            return false;
        }
        if self.started {
            self.pos += 1;
        } else {
            self.started = true;
        }
        while let Some((_, timestamps)) = self.inner.entries.get(self.pos) {
            if self.entry_overlaps(timestamps) {
                return true;
            }
            self.pos += 1;
        }
        false
    }

    fn key(&self) -> &[u8] {
        self.entry().map(|(k, _)| k.as_slice()).unwrap_or(b"")
    }

    fn has_data(&mut self) -> bool {
        let Some((_, timestamps)) = self.inner.entries.get(self.pos) else {
            return false;
        };
        self.stats.scanned_values += timestamps.len();
        self.stats.scanned_bytes += timestamps.len() * 8;
        let i = timestamps.partition_point(|&t| t < self.range.min_ts);
        i < timestamps.len() && timestamps[i] <= self.range.max_ts
    }

    fn seek(&mut self, key: &[u8]) -> SeekResult {
        self.started = true;
        self.pos = lower_bound(&self.inner.entries, key);
        let exact = self
            .entry()
            .map(|(k, _)| k.as_slice() == key)
            .unwrap_or(false);
        SeekResult {
            exact,
            found: self.pos < self.inner.entries.len(),
        }
    }

    fn stats(&self) -> CursorStats {
        self.stats
    }

    fn err(&self) -> Option<&Error> {
        self.err.as_ref()
    }
}
