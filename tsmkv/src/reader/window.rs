//! Window arithmetic over the full i64 nanosecond domain.
//!
//! A window is the half-open interval `[window_start, window_start + every)`
//! aligned to `every` with an optional `offset`; every timestamp belongs to
//! exactly one window, including timestamps before the Unix epoch. The
//! arithmetic wraps in two's complement at the extremes of the domain, like
//! the rest of the cursor pipeline.

/// Euclidean remainder: `0 <= modulo(x, m) < m` even for negative `x`.
pub fn modulo(dividend: i64, modulus: i64) -> i64 {
    let r = dividend.wrapping_rem(modulus);
    if r < 0 {
        r.wrapping_add(modulus)
    } else {
        r
    }
}

/// Start of the window containing `t`. `every` must be positive; `offset`
/// is normalized into `[0, every)` first.
pub fn window_start(t: i64, every: i64, offset: i64) -> i64 {
    let m = modulo(t, every);
    let o = modulo(offset, every);
    let mut start = t.wrapping_sub(m).wrapping_add(o);
    if m < o {
        start = start.wrapping_sub(every);
    }
    start
}

/// End of the window containing `t`: `window_start(t) + every`.
pub fn window_stop(t: i64, every: i64, offset: i64) -> i64 {
    window_start(t, every, offset).wrapping_add(every)
}
