//! Statistics for rdFC connectivity
//!
//! This module provides:
//! - Whole-series Pearson correlation (single-pass Welford accumulation)
//! - Sliding-window Pearson correlation with an add/remove online
//!   co-moment accumulator
//! - Small vector helpers used by the match scorer
//!
//! Both correlation routines return exactly `0.0` when either series (or
//! window) has zero variance, so callers never see `NaN`. Identical inputs
//! take identical update paths, which makes the correlation of a series
//! with itself exactly `1.0`.

/// True if every value equals the first one (or the slice is empty).
#[must_use]
pub fn is_constant(values: &[f64]) -> bool {
    match values.split_first() {
        Some((first, rest)) => rest.iter().all(|v| v == first),
        None => true,
    }
}

/// Pearson correlation of two equally long series.
///
/// Returns `0.0` if either series has zero variance or fewer than two
/// samples. Extra samples of the longer series are ignored.
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());

    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut ssqd_x = 0.0;
    let mut ssqd_y = 0.0;
    let mut cov_xy = 0.0;

    for (&vx, &vy) in x.iter().zip(y) {
        n += 1.0;
        let dx = vx - mean_x;
        let dy = vy - mean_y;
        mean_x += dx / n;
        mean_y += dy / n;
        ssqd_x += (vx - mean_x) * dx;
        ssqd_y += (vy - mean_y) * dy;
        cov_xy += (vx - mean_x) * dy;
    }

    if n < 2.0 {
        return 0.0;
    }
    correlation_or_zero(cov_xy, ssqd_x, ssqd_y)
}

/// `cov / sqrt(var_x * var_y)`, or `0.0` when the divisor vanishes.
#[inline]
fn correlation_or_zero(cov: f64, ssqd_x: f64, ssqd_y: f64) -> f64 {
    if ssqd_x <= 0.0 || ssqd_y <= 0.0 {
        return 0.0;
    }
    let divisor = (ssqd_x * ssqd_y).sqrt();
    if divisor > 0.0 && divisor.is_finite() {
        cov / divisor
    } else {
        0.0
    }
}

// ============================================================================
// Sliding-Window Correlation
// ============================================================================

/// Running mean with Kahan compensation, separately for additions and
/// removals.
#[derive(Clone, Copy, Debug, Default)]
struct CompensatedMean {
    value: f64,
    add_comp: f64,
    remove_comp: f64,
}

impl CompensatedMean {
    /// Include `x`; `count` is the number of samples after inclusion.
    /// Returns the compensated mean before the update.
    #[inline]
    fn push(&mut self, x: f64, count: f64) -> f64 {
        let prev = self.value - self.add_comp;
        let y = x - self.add_comp;
        let t = y - self.value;
        self.add_comp = t + self.value - y;
        self.value += t / count;
        prev
    }

    /// Exclude `x`; `count` is the number of samples after exclusion (> 0).
    /// Returns the compensated mean before the update.
    #[inline]
    fn pop(&mut self, x: f64, count: f64) -> f64 {
        let prev = self.value - self.remove_comp;
        let y = x - self.remove_comp;
        let t = y - self.value;
        self.remove_comp = t + self.value - y;
        self.value -= t / count;
        prev
    }
}

/// Length of the run of equal values ending at the newest sample.
#[derive(Clone, Copy, Debug, Default)]
struct Run {
    last: f64,
    len: usize,
}

impl Run {
    #[inline]
    fn push(&mut self, x: f64) {
        if self.len > 0 && x == self.last {
            self.len += 1;
        } else {
            self.last = x;
            self.len = 1;
        }
    }
}

/// Online second moments of a pair of series over a sliding window.
#[derive(Clone, Debug, Default)]
pub struct WindowMoments {
    count: usize,
    mean_x: CompensatedMean,
    mean_y: CompensatedMean,
    ssqd_x: f64,
    ssqd_y: f64,
    co_xy: f64,
    run_x: Run,
    run_y: Run,
}

impl WindowMoments {
    /// Empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the newest sample pair.
    pub fn push(&mut self, x: f64, y: f64) {
        self.count += 1;
        let n = self.count as f64;
        let prev_x = self.mean_x.push(x, n);
        let prev_y = self.mean_y.push(y, n);
        let rx = x - self.mean_x.value;
        let ry = y - self.mean_y.value;
        self.ssqd_x += (x - prev_x) * rx;
        self.ssqd_y += (y - prev_y) * ry;
        self.co_xy += (x - prev_x) * ry;
        self.run_x.push(x);
        self.run_y.push(y);
    }

    /// Remove the oldest sample pair (which must have been pushed).
    pub fn pop(&mut self, x: f64, y: f64) {
        debug_assert!(self.count > 0);
        self.count -= 1;
        if self.count == 0 {
            *self = Self::default();
            return;
        }
        let n = self.count as f64;
        let prev_x = self.mean_x.pop(x, n);
        let prev_y = self.mean_y.pop(y, n);
        let rx = x - self.mean_x.value;
        let ry = y - self.mean_y.value;
        self.ssqd_x -= (x - prev_x) * rx;
        self.ssqd_y -= (y - prev_y) * ry;
        self.co_xy -= (x - prev_x) * ry;
    }

    /// Pearson correlation of the current window, `0.0` if degenerate.
    #[must_use]
    pub fn correlation(&self) -> f64 {
        if self.count < 2 || self.run_x.len >= self.count || self.run_y.len >= self.count {
            return 0.0;
        }
        correlation_or_zero(self.co_xy, self.ssqd_x, self.ssqd_y)
    }
}

/// Pearson correlation over every complete window of `window` samples.
///
/// Returns `len - window + 1` values; value `i` covers samples
/// `i..i + window`. Empty if the series are shorter than the window.
#[must_use]
pub fn rolling_pearson(x: &[f64], y: &[f64], window: usize) -> Vec<f64> {
    debug_assert_eq!(x.len(), y.len());
    let len = x.len().min(y.len());
    if window == 0 || len < window {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(len - window + 1);
    let mut moments = WindowMoments::new();

    for i in 0..len {
        moments.push(x[i], y[i]);
        if i >= window {
            moments.pop(x[i - window], y[i - window]);
        }
        if i + 1 >= window {
            out.push(moments.correlation());
        }
    }

    out
}

// ============================================================================
// Vector Helpers
// ============================================================================

/// Scale a vector to unit Euclidean norm; a zero vector stays zero.
#[must_use]
pub fn unit_vector<const N: usize>(v: [f64; N]) -> [f64; N] {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        v.map(|x| x / norm)
    } else {
        [0.0; N]
    }
}

/// Dot product of two equally sized vectors.
#[inline]
#[must_use]
pub fn dot<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
