//! Plain and weighted Pearson correlation.
//!
//! Both functions require equal-length, finite inputs of at least two values
//! and return `r` in `[-1, 1]`. Constant inputs have no defined correlation
//! and are reported as [`CorrelationError::ZeroVariance`] so callers can
//! apply their own rule.
#![expect(
    clippy::float_arithmetic,
    reason = "correlation is inherently floating-point arithmetic"
)]

use thiserror::Error;

/// Errors returned by [`pearson`] and [`weighted_pearson`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CorrelationError {
    /// Input sequences differ in length.
    #[error("sequence lengths differ: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first sequence.
        left: usize,
        /// Length of the second sequence or the weights.
        right: usize,
    },
    /// Fewer than two paired values were supplied.
    #[error("correlation needs at least two values, got {0}")]
    TooShort(usize),
    /// A value or weight was NaN or infinite.
    #[error("inputs contain a non-finite value")]
    NonFinite,
    /// The weights were negative or summed to zero.
    #[error("weights must be non-negative with a positive sum")]
    InvalidWeights,
    /// At least one sequence is constant.
    #[error("a sequence has zero variance")]
    ZeroVariance,
}

/// Pearson correlation of `xs` and `ys`.
///
/// # Errors
/// See [`CorrelationError`].
///
/// # Examples
/// ```
/// use talus_scorer::pearson;
///
/// let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.5]).expect("correlated");
/// assert!(r > 0.99);
/// ```
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64, CorrelationError> {
    let weights = vec![1.0; xs.len()];
    weighted_pearson(xs, ys, &weights)
}

/// Pearson correlation of `xs` and `ys` with per-sample `weights`.
///
/// Weights need not sum to one; they are normalised internally.
///
/// # Errors
/// See [`CorrelationError`].
pub fn weighted_pearson(xs: &[f64], ys: &[f64], weights: &[f64]) -> Result<f64, CorrelationError> {
    if xs.len() != ys.len() {
        return Err(CorrelationError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    if xs.len() != weights.len() {
        return Err(CorrelationError::LengthMismatch {
            left: xs.len(),
            right: weights.len(),
        });
    }
    if xs.len() < 2 {
        return Err(CorrelationError::TooShort(xs.len()));
    }
    let all_finite = xs
        .iter()
        .chain(ys)
        .chain(weights)
        .all(|value| value.is_finite());
    if !all_finite {
        return Err(CorrelationError::NonFinite);
    }
    let total: f64 = weights.iter().sum();
    if weights.iter().any(|w| *w < 0.0) || total <= 0.0 {
        return Err(CorrelationError::InvalidWeights);
    }

    let samples = || xs.iter().zip(ys).zip(weights).map(|((x, y), w)| (*x, *y, *w / total));
    let (mean_x, mean_y) = samples().fold((0.0, 0.0), |(mx, my), (x, y, w)| {
        (w.mul_add(x, mx), w.mul_add(y, my))
    });
    let (cov, var_x, var_y) = samples().fold((0.0, 0.0, 0.0), |(c, vx, vy), (x, y, w)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (
            (w * dx).mul_add(dy, c),
            (w * dx).mul_add(dx, vx),
            (w * dy).mul_add(dy, vy),
        )
    });
    if negligible(var_x, mean_x) || negligible(var_y, mean_y) {
        return Err(CorrelationError::ZeroVariance);
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_finite() {
        Ok(r.clamp(-1.0, 1.0))
    } else {
        Err(CorrelationError::NonFinite)
    }
}

/// Rounding leaves constant sequences with a tiny residual variance.
fn negligible(variance: f64, mean: f64) -> bool {
    variance <= 1e-12 * mean.mul_add(mean, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn perfectly_correlated_sequences() {
        let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[10.0, 20.0, 30.0, 40.0]).expect("r");
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[rstest]
    fn anti_correlated_sequences() {
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).expect("r");
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[rstest]
    fn constant_sequences_have_no_correlation() {
        assert_eq!(
            pearson(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(CorrelationError::ZeroVariance)
        );
    }

    #[rstest]
    #[case(&[1.0, 2.0], &[1.0], CorrelationError::LengthMismatch { left: 2, right: 1 })]
    #[case(&[1.0], &[1.0], CorrelationError::TooShort(1))]
    #[case(&[1.0, f64::NAN], &[1.0, 2.0], CorrelationError::NonFinite)]
    fn rejects_malformed_input(
        #[case] xs: &[f64],
        #[case] ys: &[f64],
        #[case] expected: CorrelationError,
    ) {
        assert_eq!(pearson(xs, ys), Err(expected));
    }

    #[rstest]
    fn weights_emphasise_agreeing_samples() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [1.0, 2.0, 3.0, -10.0];
        let even = pearson(&xs, &ys).expect("r");
        let skewed = weighted_pearson(&xs, &ys, &[1.0, 1.0, 1.0, 0.01]).expect("r");
        assert!(skewed > even);
    }

    #[rstest]
    fn rejects_zero_weights() {
        assert_eq!(
            weighted_pearson(&[1.0, 2.0], &[2.0, 1.0], &[0.0, 0.0]),
            Err(CorrelationError::InvalidWeights)
        );
    }
}
