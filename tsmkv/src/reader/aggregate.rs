//! Per-window aggregate cursors.
//!
//! All four cursors share the same traversal: points arrive in time order,
//! a point at or past the current window end opens a new window, and output
//! blocks are split at `MAX_POINTS_PER_BLOCK`. `every == 0` is the
//! whole-series mode: a single sentinel window spanning the entire axis.
//!
//! First and last stamp records with the contributing point's actual
//! timestamp; count and sum stamp records with the window end (`i64::MAX`
//! in whole-series mode).

use crate::error::Error;
use crate::reader::window::window_stop;
use crate::reader::{CursorStats, IntegerArray, IntegerArrayCursor, MAX_POINTS_PER_BLOCK};

fn window_end_of(every: i64, t: i64) -> i64 {
    if every == 0 {
        i64::MAX
    } else {
        window_stop(t, every, 0)
    }
}

/// Emits the earliest `(t, v)` of each non-empty window.
pub struct IntegerWindowFirstArrayCursor {
    cursor: Box<dyn IntegerArrayCursor>,
    every: i64,
    window_end: i64,
    res: IntegerArray,
    tmp: IntegerArray,
}

impl IntegerWindowFirstArrayCursor {
    pub fn new(cursor: Box<dyn IntegerArrayCursor>, every: i64) -> Self {
        Self {
            cursor,
            every,
            window_end: i64::MIN,
            res: IntegerArray::with_capacity(MAX_POINTS_PER_BLOCK),
            tmp: IntegerArray::new(),
        }
    }
}

impl IntegerArrayCursor for IntegerWindowFirstArrayCursor {
    fn next(&mut self) -> &IntegerArray {
        self.res.clear();
        loop {
            if self.tmp.is_empty() {
                let a = self.cursor.next();
                if a.is_empty() {
                    break;
                }
                self.tmp.copy_from(a);
            }

            let mut consumed = self.tmp.len();
            for i in 0..self.tmp.len() {
                let t = self.tmp.timestamps[i];
                if t >= self.window_end {
                    self.res.push(t, self.tmp.values[i]);
                    self.window_end = window_end_of(self.every, t);
                    if self.res.len() == MAX_POINTS_PER_BLOCK {
                        consumed = i + 1;
                        break;
                    }
                }
            }
            self.tmp.drain_front(consumed);

            if self.res.len() == MAX_POINTS_PER_BLOCK {
                break;
            }
        }
        &self.res
    }

    fn stats(&self) -> CursorStats {
        self.cursor.stats()
    }

    fn err(&self) -> Option<&Error> {
        self.cursor.err()
    }
}

/// Emits the latest `(t, v)` of each non-empty window.
///
/// The open window's row lives at the tail of the output block and is
/// overwritten until a point from the next window arrives, so records carry
/// the point's actual timestamp rather than a window boundary.
pub struct IntegerWindowLastArrayCursor {
    cursor: Box<dyn IntegerArrayCursor>,
    every: i64,
    window_end: i64,
    res: IntegerArray,
    tmp: IntegerArray,
}

impl IntegerWindowLastArrayCursor {
    pub fn new(cursor: Box<dyn IntegerArrayCursor>, every: i64) -> Self {
        Self {
            cursor,
            every,
            window_end: i64::MIN,
            res: IntegerArray::with_capacity(MAX_POINTS_PER_BLOCK),
            tmp: IntegerArray::new(),
        }
    }
}

impl IntegerArrayCursor for IntegerWindowLastArrayCursor {
    fn next(&mut self) -> &IntegerArray {
        self.res.clear();
        loop {
            if self.tmp.is_empty() {
                let a = self.cursor.next();
                if a.is_empty() {
                    break;
                }
                self.tmp.copy_from(a);
            }

            let mut consumed = self.tmp.len();
            let mut full = false;
            for i in 0..self.tmp.len() {
                let (t, v) = (self.tmp.timestamps[i], self.tmp.values[i]);
                if t >= self.window_end {
                    if self.res.len() == MAX_POINTS_PER_BLOCK {
                        consumed = i;
                        full = true;
                        break;
                    }
                    self.res.push(t, v);
                    self.window_end = window_end_of(self.every, t);
                } else {
                    let last = self.res.len() - 1;
                    self.res.timestamps[last] = t;
                    self.res.values[last] = v;
                }
            }
            self.tmp.drain_front(consumed);

            if full {
                break;
            }
        }
        &self.res
    }

    fn stats(&self) -> CursorStats {
        self.cursor.stats()
    }

    fn err(&self) -> Option<&Error> {
        self.cursor.err()
    }
}

/// Emits `(window_end, count)` per non-empty window; empty windows produce
/// no record.
pub struct IntegerWindowCountArrayCursor {
    cursor: Box<dyn IntegerArrayCursor>,
    every: i64,
    window_end: i64,
    window_open: bool,
    acc: i64,
    res: IntegerArray,
    tmp: IntegerArray,
}

impl IntegerWindowCountArrayCursor {
    pub fn new(cursor: Box<dyn IntegerArrayCursor>, every: i64) -> Self {
        Self {
            cursor,
            every,
            window_end: i64::MIN,
            window_open: false,
            acc: 0,
            res: IntegerArray::with_capacity(MAX_POINTS_PER_BLOCK),
            tmp: IntegerArray::new(),
        }
    }
}

impl IntegerArrayCursor for IntegerWindowCountArrayCursor {
    fn next(&mut self) -> &IntegerArray {
        self.res.clear();
        loop {
            if self.tmp.is_empty() {
                let a = self.cursor.next();
                if a.is_empty() {
                    if self.window_open {
                        self.res.push(self.window_end, self.acc);
                        self.window_open = false;
                    }
                    break;
                }
                self.tmp.copy_from(a);
            }

            let mut consumed = self.tmp.len();
            let mut full = false;
            for i in 0..self.tmp.len() {
                let t = self.tmp.timestamps[i];
                if self.window_open && t < self.window_end {
                    self.acc += 1;
                    continue;
                }
                if self.window_open {
                    self.res.push(self.window_end, self.acc);
                    self.window_open = false;
                    if self.res.len() == MAX_POINTS_PER_BLOCK {
                        consumed = i;
                        full = true;
                        break;
                    }
                }
                self.window_open = true;
                self.window_end = window_end_of(self.every, t);
                self.acc = 1;
            }
            self.tmp.drain_front(consumed);

            if full {
                break;
            }
        }
        &self.res
    }

    fn stats(&self) -> CursorStats {
        self.cursor.stats()
    }

    fn err(&self) -> Option<&Error> {
        self.cursor.err()
    }
}

/// Emits `(window_end, sum)` per non-empty window. The sum wraps in two's
/// complement; guarding against overflow is the caller's concern.
pub struct IntegerWindowSumArrayCursor {
    cursor: Box<dyn IntegerArrayCursor>,
    every: i64,
    window_end: i64,
    window_open: bool,
    acc: i64,
    res: IntegerArray,
    tmp: IntegerArray,
}

impl IntegerWindowSumArrayCursor {
    pub fn new(cursor: Box<dyn IntegerArrayCursor>, every: i64) -> Self {
        Self {
            cursor,
            every,
            window_end: i64::MIN,
            window_open: false,
            acc: 0,
            res: IntegerArray::with_capacity(MAX_POINTS_PER_BLOCK),
            tmp: IntegerArray::new(),
        }
    }
}

impl IntegerArrayCursor for IntegerWindowSumArrayCursor {
    fn next(&mut self) -> &IntegerArray {
        self.res.clear();
        loop {
            if self.tmp.is_empty() {
                let a = self.cursor.next();
                if a.is_empty() {
                    if self.window_open {
                        self.res.push(self.window_end, self.acc);
                        self.window_open = false;
                    }
                    break;
                }
                self.tmp.copy_from(a);
            }

            let mut consumed = self.tmp.len();
            let mut full = false;
            for i in 0..self.tmp.len() {
                let (t, v) = (self.tmp.timestamps[i], self.tmp.values[i]);
                if self.window_open && t < self.window_end {
                    self.acc = self.acc.wrapping_add(v);
                    continue;
                }
                if self.window_open {
                    self.res.push(self.window_end, self.acc);
                    self.window_open = false;
                    if self.res.len() == MAX_POINTS_PER_BLOCK {
                        consumed = i;
                        full = true;
                        break;
                    }
                }
                self.window_open = true;
                self.window_end = window_end_of(self.every, t);
                self.acc = v;
            }
            self.tmp.drain_front(consumed);

            if full {
                break;
            }
        }
        &self.res
    }

    fn stats(&self) -> CursorStats {
        self.cursor.stats()
    }

    fn err(&self) -> Option<&Error> {
        self.cursor.err()
    }
}
