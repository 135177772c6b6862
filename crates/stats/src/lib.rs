//! Sample moment helpers shared by the drought index fitters.
//!
//! All functions take already-filtered samples: callers drop missing (NaN)
//! values before calling in.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Adjusted Fisher–Pearson sample skewness (G1).
///
/// `G1 = n / ((n-1)(n-2)) * Σ((x - mean) / s)³` with `s` the N-1 standard
/// deviation. Returns `None` for fewer than 3 elements or zero spread.
pub fn skewness(data: &[f64]) -> Option<f64> {
    let n = data.len();
    if n < 3 {
        return None;
    }
    let s = sd(data);
    if s <= 0.0 || !s.is_finite() {
        return None;
    }
    let m = mean(data);
    let nf = n as f64;
    let sum_cubed: f64 = data.iter().map(|&x| ((x - m) / s).powi(3)).sum();
    Some(nf / ((nf - 1.0) * (nf - 2.0)) * sum_cubed)
}

/// Mean of natural logarithms. Returns `None` if empty or any value is not
/// strictly positive.
pub fn mean_ln(data: &[f64]) -> Option<f64> {
    if data.is_empty() || data.iter().any(|&x| x <= 0.0 || x.is_nan()) {
        return None;
    }
    Some(data.iter().map(|&x| x.ln()).sum::<f64>() / data.len() as f64)
}
