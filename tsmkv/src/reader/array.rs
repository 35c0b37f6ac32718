use models::Timestamp;

/// Columnar block of `(timestamp, value)` pairs with strictly increasing
/// timestamps. An empty array is the end-of-stream marker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IntegerArray {
    pub timestamps: Vec<i64>,
    pub values: Vec<i64>,
}

impl IntegerArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn clear(&mut self) {
        self.timestamps.clear();
        self.values.clear();
    }

    pub fn push(&mut self, timestamp: i64, value: i64) {
        self.timestamps.push(timestamp);
        self.values.push(value);
    }

    /// Replaces the content with a copy of `other`.
    pub fn copy_from(&mut self, other: &IntegerArray) {
        self.timestamps.clear();
        self.timestamps.extend_from_slice(&other.timestamps);
        self.values.clear();
        self.values.extend_from_slice(&other.values);
    }

    /// Removes the first `n` rows.
    pub fn drain_front(&mut self, n: usize) {
        self.timestamps.drain(..n);
        self.values.drain(..n);
    }
}

/// Growable timestamp column with a sorted range test.
///
/// Filled unsorted from a cache entry, sorted in place, then probed with
/// `contains`.
#[derive(Debug, Default)]
pub struct TimestampArray {
    pub timestamps: Vec<Timestamp>,
}

impl TimestampArray {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn clear(&mut self) {
        self.timestamps.clear();
    }

    pub fn sort(&mut self) {
        self.timestamps.sort_unstable();
    }

    /// True iff any timestamp lies in `[min_ts, max_ts]`. Requires the
    /// array to be sorted.
    pub fn contains(&self, min_ts: Timestamp, max_ts: Timestamp) -> bool {
        if min_ts > max_ts {
            return false;
        }
        let i = self.timestamps.partition_point(|&t| t < min_ts);
        i < self.timestamps.len() && self.timestamps[i] <= max_ts
    }
}
