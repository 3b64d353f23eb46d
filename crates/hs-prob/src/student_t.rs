//! Student-t significance of a correlation coefficient.

use hs_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-sided p-value of a t statistic with `dof` degrees of freedom:
/// `2 * (1 - CDF_t(|t|, dof))`.
pub fn two_sided_p_value(t: f64, dof: f64) -> Result<f64> {
    if !dof.is_finite() || dof <= 0.0 {
        return Err(Error::Validation(format!("dof must be finite and > 0, got {}", dof)));
    }
    if t.is_nan() {
        return Err(Error::Validation("t statistic is NaN".to_string()));
    }
    let dist = StudentsT::new(0.0, 1.0, dof)
        .map_err(|e| Error::Computation(format!("Student-t construction failed: {e}")))?;
    Ok((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

/// t statistic and two-sided p-value for a Pearson `r` computed from `n` pairs.
///
/// `t = r * sqrt(n - 2) / sqrt(1 - r^2)`. Returns `None` when `n <= 2`;
/// `|r| = 1` gives an infinite statistic and `p = 0`.
pub fn correlation_significance(r: f64, n: usize) -> Option<(f64, f64)> {
    if n <= 2 || !r.is_finite() {
        return None;
    }
    let dof = (n - 2) as f64;
    let denom = (1.0 - r * r).max(0.0).sqrt();
    if denom == 0.0 {
        return Some((f64::INFINITY.copysign(r), 0.0));
    }
    let t = r * dof.sqrt() / denom;
    two_sided_p_value(t, dof).ok().map(|p| (t, p))
}
