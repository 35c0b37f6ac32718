use crate::error::Error;
use crate::reader::{CursorStats, IntegerArray, IntegerArrayCursor, MAX_POINTS_PER_BLOCK};

/// Row condition evaluated against each `(timestamp, value)` pair.
pub trait RowPredicate {
    fn eval(&self, timestamp: i64, value: i64) -> bool;
}

impl<F: Fn(i64, i64) -> bool> RowPredicate for F {
    fn eval(&self, timestamp: i64, value: i64) -> bool {
        self(timestamp, value)
    }
}

/// Keeps the rows matching `cond`, re-packing them into full blocks: a call
/// to `next` pulls from the lower cursor until the output block holds
/// `MAX_POINTS_PER_BLOCK` rows or the input is drained.
pub struct IntegerFilterArrayCursor {
    cursor: Box<dyn IntegerArrayCursor>,
    cond: Box<dyn RowPredicate>,
    res: IntegerArray,
    tmp: IntegerArray,
}

impl IntegerFilterArrayCursor {
    pub fn new(cursor: Box<dyn IntegerArrayCursor>, cond: Box<dyn RowPredicate>) -> Self {
        Self {
            cursor,
            cond,
            res: IntegerArray::with_capacity(MAX_POINTS_PER_BLOCK),
            tmp: IntegerArray::new(),
        }
    }
}

impl IntegerArrayCursor for IntegerFilterArrayCursor {
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
                let (t, v) = (self.tmp.timestamps[i], self.tmp.values[i]);
                if self.cond.eval(t, v) {
                    self.res.push(t, v);
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
