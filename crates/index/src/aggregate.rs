//! Rolling accumulation of a series over a fixed number of periods.

use crate::error::IndexError;

/// Sums each value with the `scale - 1` values before it.
///
/// The output has the same length as `values`. The first `scale - 1`
/// entries are missing (NaN), and any window containing a missing value is
/// missing; no partial sums are imputed.
///
/// # Errors
///
/// Returns [`IndexError::InvalidScale`] if `scale` is zero.
pub fn aggregate(values: &[f64], scale: usize) -> Result<Vec<f64>, IndexError> {
    if scale < 1 {
        return Err(IndexError::InvalidScale { scale });
    }
    if scale == 1 {
        return Ok(values.to_vec());
    }

    // Summing every window directly keeps dry windows at exactly 0.0, which
    // the zero-mass handling relies on.
    let mut out = vec![f64::NAN; values.len()];
    for (i, slot) in out.iter_mut().enumerate().skip(scale - 1) {
        *slot = values[i + 1 - scale..=i].iter().sum();
    }
    Ok(out)
}

/// Number of non-missing entries in `values`.
pub fn count_valid(values: &[f64]) -> usize {
    values.iter().filter(|v| !v.is_nan()).count()
}
