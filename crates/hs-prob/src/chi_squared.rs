//! Chi-square test of independence on an `r x c` contingency table.
//!
//! Follows the usual `chi2_contingency` conventions: all-zero rows and columns
//! are dropped first (as a cross-tabulation would never produce them), Yates'
//! continuity correction is applied when `dof == 1`, and a table that collapses
//! to `dof == 0` reports `statistic = 0, p = 1`.

use hs_core::{Error, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Outcome of a contingency test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareTest {
    /// Pearson chi-square statistic (Yates-corrected when `dof == 1`).
    pub statistic: f64,
    /// Upper-tail probability.
    pub p_value: f64,
    /// Degrees of freedom, `(r-1)(c-1)` after dropping empty margins.
    pub dof: usize,
}

/// Run the test on observed counts, one inner `Vec` per row.
pub fn contingency_test(observed: &[Vec<u64>]) -> Result<ChiSquareTest> {
    let n_cols = observed.first().map_or(0, Vec::len);
    if observed.iter().any(|row| row.len() != n_cols) {
        return Err(Error::Validation("contingency table rows have different lengths".into()));
    }

    let col_sum = |j: usize| observed.iter().map(|row| row[j]).sum::<u64>();
    let keep_cols: Vec<usize> = (0..n_cols).filter(|&j| col_sum(j) > 0).collect();
    let table: Vec<Vec<f64>> = observed
        .iter()
        .filter(|row| row.iter().sum::<u64>() > 0)
        .map(|row| keep_cols.iter().map(|&j| row[j] as f64).collect())
        .collect();

    let total: f64 = table.iter().flatten().sum();
    if total <= 0.0 {
        return Err(Error::Validation("contingency table is empty".into()));
    }

    let r = table.len();
    let c = keep_cols.len();
    let dof = (r - 1) * (c - 1);
    if dof == 0 {
        return Ok(ChiSquareTest { statistic: 0.0, p_value: 1.0, dof });
    }

    let row_totals: Vec<f64> = table.iter().map(|row| row.iter().sum()).collect();
    let col_totals: Vec<f64> = (0..c).map(|j| table.iter().map(|row| row[j]).sum()).collect();

    let mut statistic = 0.0;
    for (i, row) in table.iter().enumerate() {
        for (j, &obs) in row.iter().enumerate() {
            let expected = row_totals[i] * col_totals[j] / total;
            let mut o = obs;
            let diff = expected - obs;
            if dof == 1 && diff != 0.0 {
                // Yates: move each cell up to 0.5 towards its expectation.
                o += diff.abs().min(0.5) * diff.signum();
            }
            statistic += (o - expected) * (o - expected) / expected;
        }
    }

    let dist = ChiSquared::new(dof as f64)
        .map_err(|e| Error::Computation(format!("chi-square construction failed: {e}")))?;
    let p_value = dist.sf(statistic).clamp(0.0, 1.0);
    Ok(ChiSquareTest { statistic, p_value, dof })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_by_two_uses_yates() {
        let t = contingency_test(&[vec![10, 20], vec![30, 5]]).unwrap();
        assert_eq!(t.dof, 1);
        assert_relative_eq!(t.statistic, 16.578_482_142_857_14, epsilon = 1e-9);
        assert_relative_eq!(t.p_value, 4.667_763_281_513_945_6e-5, max_relative = 1e-6);
    }

    #[test]
    fn test_three_by_two() {
        let t = contingency_test(&[vec![10, 20], vec![30, 5], vec![8, 8]]).unwrap();
        assert_eq!(t.dof, 2);
        assert_relative_eq!(t.statistic, 19.066_558_441_558_44, epsilon = 1e-9);
        // chi2(2) survival is exp(-x/2)
        assert_relative_eq!(t.p_value, (-t.statistic / 2.0).exp(), max_relative = 1e-9);
    }

    #[test]
    fn test_single_outcome_column_collapses() {
        // Every household purchased: the "0" column is empty and is dropped.
        let t = contingency_test(&[vec![0, 12], vec![0, 7], vec![0, 3]]).unwrap();
        assert_eq!(t.dof, 0);
        assert_eq!(t.statistic, 0.0);
        assert_eq!(t.p_value, 1.0);
    }

    #[test]
    fn test_empty_rows_dropped() {
        let a = contingency_test(&[vec![10, 20], vec![0, 0], vec![30, 5]]).unwrap();
        let b = contingency_test(&[vec![10, 20], vec![30, 5]]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_tables() {
        assert!(contingency_test(&[]).is_err());
        assert!(contingency_test(&[vec![0, 0]]).is_err());
        assert!(contingency_test(&[vec![1, 2], vec![3]]).is_err());
    }
}
