//! Fixed-point curve kernel.
//!
//! All curve math runs in a 1024-step fractional domain (shift 10) so that
//! evaluation is deterministic and float-free. Intermediates widen to i64;
//! the domain itself stays in i32.

/// Fixed-point resolution of the curve parameter domain.
pub const BEZIER_VAL_MAX: i32 = 1024;
/// log2 of [`BEZIER_VAL_MAX`].
pub const BEZIER_VAL_SHIFT: u32 = 10;

const NEWTON_ITERATIONS: u32 = 8;

/// Map `x` from `[min_in, max_in]` onto `[min_out, max_out]`, clamping to
/// the output endpoints outside the input range. The clamp rule resolves
/// degenerate (zero-width) input ranges before any division.
pub fn map(x: i32, min_in: i32, max_in: i32, min_out: i32, max_out: i32) -> i32 {
    if max_in >= min_in && x >= max_in {
        return max_out;
    }
    if max_in >= min_in && x <= min_in {
        return min_out;
    }
    if max_in <= min_in && x <= max_in {
        return max_out;
    }
    if max_in <= min_in && x >= min_in {
        return min_out;
    }

    let delta_in = i64::from(max_in) - i64::from(min_in);
    let delta_out = i64::from(max_out) - i64::from(min_out);
    ((i64::from(x) - i64::from(min_in)) * delta_out / delta_in + i64::from(min_out)) as i32
}

/// Evaluate a cubic bezier with explicit control values `u0..u3` at
/// parameter `t`; everything lives in the 1024 domain.
pub fn bezier3(t: i32, u0: i32, u1: i32, u2: i32, u3: i32) -> i32 {
    let t = i64::from(t.clamp(0, BEZIER_VAL_MAX));
    let t_rem = i64::from(BEZIER_VAL_MAX) - t;
    let t_rem2 = (t_rem * t_rem) >> BEZIER_VAL_SHIFT;
    let t_rem3 = (t_rem2 * t_rem) >> BEZIER_VAL_SHIFT;
    let t2 = (t * t) >> BEZIER_VAL_SHIFT;
    let t3 = (t2 * t) >> BEZIER_VAL_SHIFT;

    let v1 = (t_rem3 * i64::from(u0)) >> BEZIER_VAL_SHIFT;
    let v2 = (3 * t_rem2 * t * i64::from(u1)) >> (2 * BEZIER_VAL_SHIFT);
    let v3 = (3 * t_rem * t2 * i64::from(u2)) >> (2 * BEZIER_VAL_SHIFT);
    let v4 = (t3 * i64::from(u3)) >> BEZIER_VAL_SHIFT;

    (v1 + v2 + v3 + v4) as i32
}

// a*t^3 + b*t^2 + c*t in the shift-10 domain.
fn poly3(t: i64, a: i64, b: i64, c: i64) -> i64 {
    let t2 = (t * t) >> BEZIER_VAL_SHIFT;
    let t3 = (t2 * t) >> BEZIER_VAL_SHIFT;
    ((a * t3) >> BEZIER_VAL_SHIFT) + ((b * t2) >> BEZIER_VAL_SHIFT) + ((c * t) >> BEZIER_VAL_SHIFT)
}

/// y for a given x on the cubic bezier through (0,0), (x1,y1), (x2,y2),
/// (1024,1024). Inverts the x polynomial — Newton fast path with a bisection
/// fallback — then evaluates y at the found parameter.
pub fn cubic_bezier(x: i32, x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    if x <= 0 {
        return 0;
    }
    if x >= BEZIER_VAL_MAX {
        return BEZIER_VAL_MAX;
    }

    let x = i64::from(x);
    let max = i64::from(BEZIER_VAL_MAX);

    // Polynomial coefficients with the implicit (0,0) / (1024,1024) anchors.
    let cx = 3 * i64::from(x1);
    let bx = 3 * (i64::from(x2) - i64::from(x1)) - cx;
    let ax = max - cx - bx;
    let cy = 3 * i64::from(y1);
    let by = 3 * (i64::from(y2) - i64::from(y1)) - cy;
    let ay = max - cy - by;

    let mut t = x;
    for _ in 0..NEWTON_ITERATIONS {
        let err = poly3(t, ax, bx, cx) - x;
        if err.abs() <= 1 {
            return poly3(t, ay, by, cy) as i32;
        }
        // dx/dt in the same fixed-point scale.
        let slope = ((((3 * ax * t) >> BEZIER_VAL_SHIFT) * t) >> BEZIER_VAL_SHIFT)
            + ((2 * bx * t) >> BEZIER_VAL_SHIFT)
            + cx;
        if slope.abs() <= 1 {
            break;
        }
        let step = (err << BEZIER_VAL_SHIFT) / slope;
        if step == 0 {
            break;
        }
        t = (t - step).clamp(0, max);
    }

    // Bisection fallback for flat-slope regions.
    let (mut lo, mut hi) = (0i64, max);
    t = x;
    loop {
        let xs = poly3(t, ax, bx, cx);
        if (xs - x).abs() <= 1 {
            break;
        }
        if xs < x {
            lo = t;
        } else {
            hi = t;
        }
        let next = (lo + hi) / 2;
        if next == t {
            break;
        }
        t = next;
    }
    poly3(t, ay, by, cy) as i32
}
