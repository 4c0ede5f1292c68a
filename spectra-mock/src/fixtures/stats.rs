use rustfft::{FftPlanner, num_complex::Complex};

/// Series shorter than this are never reported stationary.
pub const MIN_STATIONARY_LEN: usize = 3;
/// Lag-1 autocorrelation below which a series counts as mean-reverting.
pub const STATIONARY_AUTOCORR: f64 = 0.5;

#[allow(clippy::cast_precision_loss)]
fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        0.0
    } else {
        x.iter().sum::<f64>() / x.len() as f64
    }
}

/// Truncate two value sequences to their common length.
pub fn truncate_pair<'a>(a: &'a [f64], b: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let n = a.len().min(b.len());
    (&a[..n], &b[..n])
}

/// Lag-1 sample autocorrelation; `1.0` for constant series.
pub fn lag1_autocorrelation(x: &[f64]) -> f64 {
    let m = mean(x);
    let denom: f64 = x.iter().map(|v| (v - m).powi(2)).sum();
    if denom == 0.0 {
        return 1.0;
    }
    let num: f64 = x.windows(2).map(|w| (w[0] - m) * (w[1] - m)).sum();
    num / denom
}

/// Crude mean-reversion test used in place of a unit-root test.
pub fn looks_stationary(x: &[f64]) -> bool {
    x.len() >= MIN_STATIONARY_LEN && lag1_autocorrelation(x) < STATIONARY_AUTOCORR
}

/// Sample covariance over the common prefix.
#[allow(clippy::cast_precision_loss)]
pub fn covariance(a: &[f64], b: &[f64]) -> f64 {
    let (a, b) = truncate_pair(a, b);
    if a.len() < 2 {
        return 0.0;
    }
    let (ma, mb) = (mean(a), mean(b));
    let s: f64 = a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum();
    s / (a.len() - 1) as f64
}

/// OLS slope of `a` on `b`; `0.0` when `b` is constant.
pub fn hedge_ratio(a: &[f64], b: &[f64]) -> f64 {
    let var_b = covariance(b, b);
    if var_b == 0.0 {
        0.0
    } else {
        covariance(a, b) / var_b
    }
}

/// `a - beta * b` over the common prefix.
pub fn spread(a: &[f64], b: &[f64]) -> Vec<f64> {
    let beta = hedge_ratio(a, b);
    let (a, b) = truncate_pair(a, b);
    a.iter().zip(b).map(|(x, y)| x - beta * y).collect()
}

/// Raw periodogram `|X_k|^2 / n` of the demeaned series for `k = 1..=n/2`.
#[allow(clippy::cast_precision_loss)]
pub fn periodogram(x: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n < 2 {
        return Vec::new();
    }
    let m = mean(x);
    let mut buf: Vec<Complex<f64>> = x.iter().map(|v| Complex::new(v - m, 0.0)).collect();
    FftPlanner::new().plan_fft_forward(n).process(&mut buf);
    let nf = n as f64;
    buf[1..=n / 2].iter().map(|c| c.norm_sqr() / nf).collect()
}
