use crate::error::Error;
use crate::reader::{CursorStats, IntegerArray, IntegerArrayCursor};

/// Emits only the very first point of the stream, then ends it. The first
/// returned block always has exactly one row.
pub struct IntegerLimitArrayCursor {
    cursor: Box<dyn IntegerArrayCursor>,
    res: IntegerArray,
    done: bool,
}

impl IntegerLimitArrayCursor {
    pub fn new(cursor: Box<dyn IntegerArrayCursor>) -> Self {
        Self {
            cursor,
            res: IntegerArray::with_capacity(1),
            done: false,
        }
    }
}

impl IntegerArrayCursor for IntegerLimitArrayCursor {
    fn next(&mut self) -> &IntegerArray {
        self.res.clear();
        if self.done {
            return &self.res;
        }
        self.done = true;
        let a = self.cursor.next();
        if !a.is_empty() {
            let (t, v) = (a.timestamps[0], a.values[0]);
            self.res.push(t, v);
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
