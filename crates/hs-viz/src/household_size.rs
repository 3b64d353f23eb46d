//! Adoption by household-size bucket, plus the per-size scatter with an OLS trend line.

use hs_core::{KeyValue, Result};
use hs_inference::AnalysisResults;
use serde::{Deserialize, Serialize};

use crate::meta::{ArtifactMeta, observed_rows};
use crate::pct;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdSizeArtifact {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    pub buckets: Vec<BucketPoint>,
    pub sizes: Vec<SizePoint>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trend: Option<TrendLine>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub correlation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub p_value: Option<f64>,
    pub conclusion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketPoint {
    pub bucket: String,
    pub penetration_pct: f64,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizePoint {
    pub household_size: u64,
    pub penetration_pct: f64,
    pub sample_size: usize,
}

/// `penetration_pct = intercept + slope * household_size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

/// Unweighted least squares over the aggregated points; `None` with fewer than
/// two distinct sizes.
pub fn ols_trend(points: &[SizePoint]) -> Option<TrendLine> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.household_size as f64).sum::<f64>() / n;
    let my = points.iter().map(|p| p.penetration_pct).sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for p in points {
        let dx = p.household_size as f64 - mx;
        sxx += dx * dx;
        sxy += dx * (p.penetration_pct - my);
    }
    if sxx <= 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some(TrendLine { slope, intercept: my - slope * mx })
}

pub fn household_size_artifact(results: &AnalysisResults) -> Result<HouseholdSizeArtifact> {
    let buckets = observed_rows(&results.household_size_penetration.rows)
        .filter(|(v, _)| matches!(v, KeyValue::Bucket(_)))
        .map(|(v, r)| BucketPoint {
            bucket: v.to_string(),
            penetration_pct: pct(r.rate),
            sample_size: r.sample_size,
        })
        .collect();

    let sizes: Vec<SizePoint> = observed_rows(&results.penetration_by_household_size.rows)
        .filter_map(|(v, r)| match v {
            KeyValue::Int(n) => Some(SizePoint {
                household_size: *n,
                penetration_pct: pct(r.rate),
                sample_size: r.sample_size,
            }),
            _ => None,
        })
        .collect();

    Ok(HouseholdSizeArtifact {
        schema_version: "housestat_household_size_v0".to_string(),
        meta: ArtifactMeta::for_results(results)?,
        buckets,
        trend: ols_trend(&sizes),
        sizes,
        correlation: results.h1.correlation,
        p_value: results.h1.correlation_p_value,
        conclusion: results.h1.conclusion.label().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn point(size: u64, pct: f64) -> SizePoint {
        SizePoint { household_size: size, penetration_pct: pct, sample_size: 10 }
    }

    #[test]
    fn trend_recovers_exact_line() {
        let pts: Vec<SizePoint> = (1..=6).map(|s| point(s, 90.0 - 10.0 * s as f64)).collect();
        let t = ols_trend(&pts).unwrap();
        assert_relative_eq!(t.slope, -10.0, epsilon = 1e-12);
        assert_relative_eq!(t.intercept, 90.0, epsilon = 1e-12);
    }

    #[test]
    fn trend_needs_two_sizes() {
        assert!(ols_trend(&[point(3, 50.0)]).is_none());
        assert!(ols_trend(&[]).is_none());
    }
}
