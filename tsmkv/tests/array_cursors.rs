use std::cell::Cell;

use chrono::DateTime;
use tsmkv::error::Error;
use tsmkv::reader::{
    CursorStats, IntegerArray, IntegerArrayCursor, IntegerFilterArrayCursor,
    IntegerLimitArrayCursor, IntegerWindowCountArrayCursor, IntegerWindowFirstArrayCursor,
    IntegerWindowLastArrayCursor, IntegerWindowSumArrayCursor,
};

const MILLISECOND: i64 = 1_000_000;
const SECOND: i64 = 1000 * MILLISECOND;
const MINUTE: i64 = 60 * SECOND;

fn ts(s: &str) -> i64 {
    DateTime::parse_from_rfc3339(s)
        .unwrap()
        .timestamp_nanos_opt()
        .unwrap()
}

fn make_integer_array(n: usize, start: i64, step: i64, value_fn: impl Fn(i64) -> i64) -> IntegerArray {
    let mut a = IntegerArray::with_capacity(n);
    for i in 0..n as i64 {
        a.push(start + i * step, value_fn(i));
    }
    a
}

fn single(timestamp: i64, value: i64) -> IntegerArray {
    let mut a = IntegerArray::new();
    a.push(timestamp, value);
    a
}

struct ArraysCursor {
    arrays: Vec<IntegerArray>,
    idx: usize,
    empty: IntegerArray,
}

impl ArraysCursor {
    fn new(arrays: Vec<IntegerArray>) -> Box<dyn IntegerArrayCursor> {
        Box::new(Self {
            arrays,
            idx: 0,
            empty: IntegerArray::new(),
        })
    }
}

impl IntegerArrayCursor for ArraysCursor {
    fn next(&mut self) -> &IntegerArray {
        if self.idx < self.arrays.len() {
            self.idx += 1;
            &self.arrays[self.idx - 1]
        } else {
            &self.empty
        }
    }

    fn stats(&self) -> CursorStats {
        CursorStats::default()
    }

    fn err(&self) -> Option<&Error> {
        None
    }
}

struct AggCursorTest {
    name: &'static str,
    every: i64,
    input: Vec<IntegerArray>,
    want: Vec<IntegerArray>,
}

fn run_agg_tests(
    tests: Vec<AggCursorTest>,
    create: impl Fn(Box<dyn IntegerArrayCursor>, i64) -> Box<dyn IntegerArrayCursor>,
) {
    for tc in tests {
        let mut cursor = create(ArraysCursor::new(tc.input), tc.every);
        let mut got = Vec::new();
        loop {
            let a = cursor.next();
            if a.is_empty() {
                break;
            }
            got.push(a.clone());
        }
        assert_eq!(got, tc.want, "unexpected result for case {:?}", tc.name);
    }
}

#[test]
fn test_window_first_array_cursor() {
    let t0 = ts("2010-01-01T00:00:00Z");
    let tests = vec![
        AggCursorTest {
            name: "window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(60, t0, MINUTE, |i| i)],
            want: vec![make_integer_array(4, t0, 15 * MINUTE, |i| 15 * i)],
        },
        AggCursorTest {
            name: "empty windows",
            every: MINUTE,
            input: vec![make_integer_array(4, t0, 15 * MINUTE, |i| i)],
            want: vec![make_integer_array(4, t0, 15 * MINUTE, |i| i)],
        },
        AggCursorTest {
            name: "unaligned window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(
                60,
                ts("2010-01-01T00:00:30Z"),
                MINUTE,
                |i| i,
            )],
            want: vec![make_integer_array(
                4,
                ts("2010-01-01T00:00:30Z"),
                15 * MINUTE,
                |i| 15 * i,
            )],
        },
        AggCursorTest {
            name: "more unaligned window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(
                60,
                ts("2010-01-01T00:01:30Z"),
                MINUTE,
                |i| i,
            )],
            want: vec![IntegerArray {
                timestamps: vec![
                    ts("2010-01-01T00:01:30Z"),
                    ts("2010-01-01T00:15:30Z"),
                    ts("2010-01-01T00:30:30Z"),
                    ts("2010-01-01T00:45:30Z"),
                    ts("2010-01-01T01:00:30Z"),
                ],
                values: vec![0, 14, 29, 44, 59],
            }],
        },
        AggCursorTest {
            name: "window two input arrays",
            every: 15 * MINUTE,
            input: vec![
                make_integer_array(60, t0, MINUTE, |i| i),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |i| 60 + i),
            ],
            want: vec![make_integer_array(8, t0, 15 * MINUTE, |i| 15 * i)],
        },
        AggCursorTest {
            name: "window spans input arrays",
            every: 40 * MINUTE,
            input: vec![
                make_integer_array(60, t0, MINUTE, |i| i),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |i| 60 + i),
            ],
            want: vec![make_integer_array(3, t0, 40 * MINUTE, |i| 40 * i)],
        },
        AggCursorTest {
            name: "more windows than MAX_POINTS_PER_BLOCK",
            every: 2 * MILLISECOND,
            input: vec![
                make_integer_array(1000, t0, MILLISECOND, |i| i),
                make_integer_array(1000, ts("2010-01-01T00:00:01Z"), MILLISECOND, |i| 1000 + i),
                make_integer_array(1000, ts("2010-01-01T00:00:02Z"), MILLISECOND, |i| 2000 + i),
            ],
            want: vec![
                make_integer_array(1000, t0, 2 * MILLISECOND, |i| 2 * i),
                make_integer_array(500, ts("2010-01-01T00:00:02Z"), 2 * MILLISECOND, |i| {
                    2000 + 2 * i
                }),
            ],
        },
        AggCursorTest {
            name: "whole series",
            every: 0,
            input: vec![make_integer_array(60, t0, MINUTE, |i| 100 + i)],
            want: vec![single(t0, 100)],
        },
        AggCursorTest {
            name: "whole series no points",
            every: 0,
            input: vec![IntegerArray::new()],
            want: vec![],
        },
        AggCursorTest {
            name: "whole series two arrays",
            every: 0,
            input: vec![
                make_integer_array(60, t0, MINUTE, |i| 10 + i),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |i| 70 + i),
            ],
            want: vec![single(t0, 10)],
        },
        AggCursorTest {
            name: "whole series span epoch",
            every: 0,
            input: vec![make_integer_array(
                120,
                ts("1969-12-31T23:00:00Z"),
                MINUTE,
                |i| 100 + i,
            )],
            want: vec![single(ts("1969-12-31T23:00:00Z"), 100)],
        },
        AggCursorTest {
            name: "whole series span epoch two arrays",
            every: 0,
            input: vec![
                make_integer_array(60, ts("1969-12-31T23:00:00Z"), MINUTE, |i| 100 + i),
                make_integer_array(60, ts("1970-01-01T00:00:00Z"), MINUTE, |i| 160 + i),
            ],
            want: vec![single(ts("1969-12-31T23:00:00Z"), 100)],
        },
        AggCursorTest {
            name: "whole series, with max int64 timestamp",
            every: 0,
            input: vec![single(i64::MAX, 12)],
            want: vec![single(i64::MAX, 12)],
        },
    ];
    run_agg_tests(tests, |cur, every| {
        Box::new(IntegerWindowFirstArrayCursor::new(cur, every))
    });
}

#[test]
fn test_window_last_array_cursor() {
    let t0 = ts("2010-01-01T00:00:00Z");
    let tests = vec![
        AggCursorTest {
            name: "window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(60, t0, MINUTE, |i| i)],
            want: vec![make_integer_array(
                4,
                ts("2010-01-01T00:14:00Z"),
                15 * MINUTE,
                |i| 14 + 15 * i,
            )],
        },
        AggCursorTest {
            name: "empty windows",
            every: MINUTE,
            input: vec![make_integer_array(4, t0, 15 * MINUTE, |i| i)],
            want: vec![make_integer_array(4, t0, 15 * MINUTE, |i| i)],
        },
        AggCursorTest {
            name: "unaligned window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(
                60,
                ts("2010-01-01T00:00:30Z"),
                MINUTE,
                |i| i,
            )],
            want: vec![make_integer_array(
                4,
                ts("2010-01-01T00:14:30Z"),
                15 * MINUTE,
                |i| 14 + 15 * i,
            )],
        },
        AggCursorTest {
            name: "more unaligned window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(
                60,
                ts("2010-01-01T00:01:30Z"),
                MINUTE,
                |i| i,
            )],
            want: vec![IntegerArray {
                timestamps: vec![
                    ts("2010-01-01T00:14:30Z"),
                    ts("2010-01-01T00:29:30Z"),
                    ts("2010-01-01T00:44:30Z"),
                    ts("2010-01-01T00:59:30Z"),
                    ts("2010-01-01T01:00:30Z"),
                ],
                values: vec![13, 28, 43, 58, 59],
            }],
        },
        AggCursorTest {
            name: "window two input arrays",
            every: 15 * MINUTE,
            input: vec![
                make_integer_array(60, t0, MINUTE, |i| i),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |i| 60 + i),
            ],
            want: vec![make_integer_array(
                8,
                ts("2010-01-01T00:14:00Z"),
                15 * MINUTE,
                |i| 14 + 15 * i,
            )],
        },
        AggCursorTest {
            name: "window spans input arrays",
            every: 40 * MINUTE,
            input: vec![
                make_integer_array(60, t0, MINUTE, |i| i),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |i| 60 + i),
            ],
            want: vec![make_integer_array(
                3,
                ts("2010-01-01T00:39:00Z"),
                40 * MINUTE,
                |i| 39 + 40 * i,
            )],
        },
        AggCursorTest {
            name: "more windows than MAX_POINTS_PER_BLOCK",
            every: 2 * MILLISECOND,
            input: vec![
                make_integer_array(1000, t0, MILLISECOND, |i| i),
                make_integer_array(1000, ts("2010-01-01T00:00:01Z"), MILLISECOND, |i| 1000 + i),
                make_integer_array(1000, ts("2010-01-01T00:00:02Z"), MILLISECOND, |i| 2000 + i),
            ],
            want: vec![
                make_integer_array(1000, t0 + MILLISECOND, 2 * MILLISECOND, |i| 1 + 2 * i),
                make_integer_array(
                    500,
                    ts("2010-01-01T00:00:02Z") + MILLISECOND,
                    2 * MILLISECOND,
                    |i| 2001 + 2 * i,
                ),
            ],
        },
        AggCursorTest {
            name: "MAX_POINTS_PER_BLOCK",
            every: MILLISECOND,
            input: vec![
                make_integer_array(1000, t0, MILLISECOND, |i| i),
                make_integer_array(1000, ts("2010-01-01T00:00:01Z"), MILLISECOND, |i| 1000 + i),
            ],
            want: vec![
                make_integer_array(1000, t0, MILLISECOND, |i| i),
                make_integer_array(1000, ts("2010-01-01T00:00:01Z"), MILLISECOND, |i| 1000 + i),
            ],
        },
        AggCursorTest {
            name: "whole series",
            every: 0,
            input: vec![make_integer_array(60, t0, MINUTE, |i| 100 + i)],
            want: vec![single(ts("2010-01-01T00:59:00Z"), 159)],
        },
        AggCursorTest {
            name: "whole series no points",
            every: 0,
            input: vec![IntegerArray::new()],
            want: vec![],
        },
        AggCursorTest {
            name: "whole series two arrays",
            every: 0,
            input: vec![
                make_integer_array(60, t0, MINUTE, |i| 10 + i),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |i| 70 + i),
            ],
            want: vec![single(ts("2010-01-01T01:59:00Z"), 129)],
        },
        AggCursorTest {
            name: "whole series span epoch",
            every: 0,
            input: vec![make_integer_array(
                120,
                ts("1969-12-31T23:00:00Z"),
                MINUTE,
                |i| 100 + i,
            )],
            want: vec![single(ts("1970-01-01T00:59:00Z"), 219)],
        },
        AggCursorTest {
            name: "whole series span epoch two arrays",
            every: 0,
            input: vec![
                make_integer_array(60, ts("1969-12-31T23:00:00Z"), MINUTE, |i| 100 + i),
                make_integer_array(60, ts("1970-01-01T00:00:00Z"), MINUTE, |i| 160 + i),
            ],
            want: vec![single(ts("1970-01-01T00:59:00Z"), 219)],
        },
        AggCursorTest {
            name: "whole series, with max int64 timestamp",
            every: 0,
            input: vec![single(i64::MAX, 12)],
            want: vec![single(i64::MAX, 12)],
        },
        AggCursorTest {
            name: "whole series, with min int64 timestamp",
            every: 0,
            input: vec![single(i64::MIN, 12)],
            want: vec![single(i64::MIN, 12)],
        },
    ];
    run_agg_tests(tests, |cur, every| {
        Box::new(IntegerWindowLastArrayCursor::new(cur, every))
    });
}

#[test]
fn test_window_count_array_cursor() {
    let t0 = ts("2010-01-01T00:00:00Z");
    let tests = vec![
        AggCursorTest {
            name: "window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(60, t0, MINUTE, |i| 100 + i)],
            want: vec![make_integer_array(
                4,
                ts("2010-01-01T00:15:00Z"),
                15 * MINUTE,
                |_| 15,
            )],
        },
        AggCursorTest {
            name: "empty windows",
            every: MINUTE,
            input: vec![make_integer_array(4, t0, 15 * MINUTE, |i| 100 + i)],
            want: vec![make_integer_array(
                4,
                ts("2010-01-01T00:01:00Z"),
                15 * MINUTE,
                |_| 1,
            )],
        },
        AggCursorTest {
            name: "unaligned window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(
                60,
                ts("2010-01-01T00:00:30Z"),
                MINUTE,
                |i| 100 + i,
            )],
            want: vec![make_integer_array(
                4,
                ts("2010-01-01T00:15:00Z"),
                15 * MINUTE,
                |_| 15,
            )],
        },
        AggCursorTest {
            name: "more unaligned window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(
                60,
                ts("2010-01-01T00:01:30Z"),
                MINUTE,
                |i| 100 + i,
            )],
            want: vec![make_integer_array(
                5,
                ts("2010-01-01T00:15:00Z"),
                15 * MINUTE,
                |i| match i {
                    0 => 14,
                    4 => 1,
                    _ => 15,
                },
            )],
        },
        AggCursorTest {
            name: "window two input arrays",
            every: 15 * MINUTE,
            input: vec![
                make_integer_array(60, t0, MINUTE, |i| 100 + i),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |i| 200 + i),
            ],
            want: vec![make_integer_array(
                8,
                ts("2010-01-01T00:15:00Z"),
                15 * MINUTE,
                |_| 15,
            )],
        },
        AggCursorTest {
            name: "window spans input arrays",
            every: 40 * MINUTE,
            input: vec![
                make_integer_array(60, t0, MINUTE, |i| 100 + i),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |i| 200 + i),
            ],
            want: vec![make_integer_array(
                3,
                ts("2010-01-01T00:40:00Z"),
                40 * MINUTE,
                |_| 40,
            )],
        },
        AggCursorTest {
            name: "more windows than MAX_POINTS_PER_BLOCK",
            every: 2 * MILLISECOND,
            input: vec![
                make_integer_array(1000, t0, MILLISECOND, |i| i),
                make_integer_array(1000, ts("2010-01-01T00:00:01Z"), MILLISECOND, |i| i),
                make_integer_array(1000, ts("2010-01-01T00:00:02Z"), MILLISECOND, |i| i),
            ],
            want: vec![
                make_integer_array(1000, t0 + 2 * MILLISECOND, 2 * MILLISECOND, |_| 2),
                make_integer_array(
                    500,
                    ts("2010-01-01T00:00:02Z") + 2 * MILLISECOND,
                    2 * MILLISECOND,
                    |_| 2,
                ),
            ],
        },
        AggCursorTest {
            name: "whole series",
            every: 0,
            input: vec![make_integer_array(60, t0, MINUTE, |i| 100 + i)],
            want: vec![single(i64::MAX, 60)],
        },
        AggCursorTest {
            name: "whole series no points",
            every: 0,
            input: vec![IntegerArray::new()],
            want: vec![],
        },
        AggCursorTest {
            name: "whole series two arrays",
            every: 0,
            input: vec![
                make_integer_array(60, t0, MINUTE, |i| 100 + i),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |i| 100 + i),
            ],
            want: vec![single(i64::MAX, 120)],
        },
        AggCursorTest {
            name: "whole series span epoch",
            every: 0,
            input: vec![make_integer_array(
                120,
                ts("1969-12-31T23:00:00Z"),
                MINUTE,
                |i| 100 + i,
            )],
            want: vec![single(i64::MAX, 120)],
        },
        AggCursorTest {
            name: "whole series span epoch two arrays",
            every: 0,
            input: vec![
                make_integer_array(60, ts("1969-12-31T23:00:00Z"), MINUTE, |i| 100 + i),
                make_integer_array(60, ts("1970-01-01T00:00:00Z"), MINUTE, |i| 100 + i),
            ],
            want: vec![single(i64::MAX, 120)],
        },
        AggCursorTest {
            name: "whole series, with max int64 timestamp",
            every: 0,
            input: vec![single(i64::MAX, 0)],
            want: vec![single(i64::MAX, 1)],
        },
    ];
    run_agg_tests(tests, |cur, every| {
        Box::new(IntegerWindowCountArrayCursor::new(cur, every))
    });
}

#[test]
fn test_window_sum_array_cursor() {
    let t0 = ts("2010-01-01T00:00:00Z");
    let tests = vec![
        AggCursorTest {
            name: "window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(60, t0, MINUTE, |_| 2)],
            want: vec![make_integer_array(
                4,
                ts("2010-01-01T00:15:00Z"),
                15 * MINUTE,
                |_| 30,
            )],
        },
        AggCursorTest {
            name: "empty windows",
            every: MINUTE,
            input: vec![make_integer_array(4, t0, 15 * MINUTE, |i| 100 + i)],
            want: vec![make_integer_array(
                4,
                ts("2010-01-01T00:01:00Z"),
                15 * MINUTE,
                |i| 100 + i,
            )],
        },
        AggCursorTest {
            name: "unaligned window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(
                60,
                ts("2010-01-01T00:00:30Z"),
                MINUTE,
                |_| 2,
            )],
            want: vec![make_integer_array(
                4,
                ts("2010-01-01T00:15:00Z"),
                15 * MINUTE,
                |_| 30,
            )],
        },
        AggCursorTest {
            name: "more unaligned window",
            every: 15 * MINUTE,
            input: vec![make_integer_array(
                60,
                ts("2010-01-01T00:01:30Z"),
                MINUTE,
                |_| 2,
            )],
            want: vec![make_integer_array(
                5,
                ts("2010-01-01T00:15:00Z"),
                15 * MINUTE,
                |i| match i {
                    0 => 28,
                    4 => 2,
                    _ => 30,
                },
            )],
        },
        AggCursorTest {
            name: "window two input arrays",
            every: 15 * MINUTE,
            input: vec![
                make_integer_array(60, t0, MINUTE, |_| 2),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |_| 3),
            ],
            want: vec![make_integer_array(
                8,
                ts("2010-01-01T00:15:00Z"),
                15 * MINUTE,
                |i| if i < 4 { 30 } else { 45 },
            )],
        },
        AggCursorTest {
            name: "window spans input arrays",
            every: 40 * MINUTE,
            input: vec![
                make_integer_array(60, t0, MINUTE, |_| 2),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |_| 3),
            ],
            want: vec![make_integer_array(
                3,
                ts("2010-01-01T00:40:00Z"),
                40 * MINUTE,
                |i| match i {
                    0 => 80,
                    1 => 100,
                    _ => 120,
                },
            )],
        },
        AggCursorTest {
            name: "more windows than MAX_POINTS_PER_BLOCK",
            every: 2 * MILLISECOND,
            input: vec![
                make_integer_array(1000, t0, MILLISECOND, |_| 2),
                make_integer_array(1000, ts("2010-01-01T00:00:01Z"), MILLISECOND, |_| 3),
                make_integer_array(1000, ts("2010-01-01T00:00:02Z"), MILLISECOND, |_| 4),
            ],
            want: vec![
                make_integer_array(1000, t0 + 2 * MILLISECOND, 2 * MILLISECOND, |i| {
                    if i < 500 {
                        4
                    } else {
                        6
                    }
                }),
                make_integer_array(
                    500,
                    ts("2010-01-01T00:00:02Z") + 2 * MILLISECOND,
                    2 * MILLISECOND,
                    |_| 8,
                ),
            ],
        },
        AggCursorTest {
            name: "whole series",
            every: 0,
            input: vec![make_integer_array(60, t0, MINUTE, |_| 2)],
            want: vec![single(i64::MAX, 120)],
        },
        AggCursorTest {
            name: "whole series no points",
            every: 0,
            input: vec![IntegerArray::new()],
            want: vec![],
        },
        AggCursorTest {
            name: "whole series two arrays",
            every: 0,
            input: vec![
                make_integer_array(60, t0, MINUTE, |_| 2),
                make_integer_array(60, ts("2010-01-01T01:00:00Z"), MINUTE, |_| 3),
            ],
            want: vec![single(i64::MAX, 300)],
        },
        AggCursorTest {
            name: "whole series span epoch",
            every: 0,
            input: vec![make_integer_array(
                120,
                ts("1969-12-31T23:00:00Z"),
                MINUTE,
                |_| 2,
            )],
            want: vec![single(i64::MAX, 240)],
        },
        AggCursorTest {
            name: "whole series span epoch two arrays",
            every: 0,
            input: vec![
                make_integer_array(60, ts("1969-12-31T23:00:00Z"), MINUTE, |_| 2),
                make_integer_array(60, ts("1970-01-01T00:00:00Z"), MINUTE, |_| 3),
            ],
            want: vec![single(i64::MAX, 300)],
        },
        AggCursorTest {
            name: "whole series, with max int64 timestamp",
            every: 0,
            input: vec![single(i64::MAX, 100)],
            want: vec![single(i64::MAX, 100)],
        },
    ];
    run_agg_tests(tests, |cur, every| {
        Box::new(IntegerWindowSumArrayCursor::new(cur, every))
    });
}

#[test]
fn test_integer_filter_array_cursor() {
    let input = vec![
        make_integer_array(900, 0, MILLISECOND, |i| i),
        make_integer_array(900, SECOND, MILLISECOND, |i| 900 + i),
        make_integer_array(900, 2 * SECOND, MILLISECOND, |i| 1800 + i),
    ];
    let calls = Cell::new(0i64);
    let cond = move |_t: i64, _v: i64| {
        calls.set(calls.get() + 1);
        calls.get() % 2 == 0
    };
    let mut cursor = IntegerFilterArrayCursor::new(ArraysCursor::new(input), Box::new(cond));

    assert_eq!(cursor.next().len(), 1000);
    assert_eq!(cursor.next().len(), 350);
    assert!(cursor.next().is_empty());
}

#[test]
fn test_integer_limit_array_cursor() {
    let input = vec![
        make_integer_array(1000, ts("1970-01-01T00:00:01Z"), MILLISECOND, |i| 3 + i),
        make_integer_array(1000, ts("1970-01-01T00:00:02Z"), MILLISECOND, |i| 1003 + i),
    ];
    let mut cursor = IntegerLimitArrayCursor::new(ArraysCursor::new(input));

    let first = cursor.next().clone();
    assert_eq!(first, single(ts("1970-01-01T00:00:01Z"), 3));
    assert!(cursor.next().is_empty());
    assert!(cursor.next().is_empty());
    assert!(cursor.err().is_none());
}

#[test]
fn test_limit_cursor_empty_stream() {
    let mut cursor = IntegerLimitArrayCursor::new(ArraysCursor::new(vec![]));
    assert!(cursor.next().is_empty());
}
