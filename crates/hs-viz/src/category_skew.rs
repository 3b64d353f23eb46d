//! Category skew heatmap: household types × categories.

use hs_core::types::ONLINE_PREFIX;
use hs_core::{HouseholdType, Result};
use hs_inference::AnalysisResults;
use hs_inference::hypotest::SKEW_THRESHOLD;
use serde::{Deserialize, Serialize};

use crate::meta::ArtifactMeta;
use crate::pct;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySkewArtifact {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    /// Category display names (`Online_` prefix stripped).
    pub categories: Vec<String>,
    pub household_types: Vec<String>,
    /// `skew[type][category]`, 1.0 = national average.
    pub skew: Vec<Vec<f64>>,
    /// `penetration_pct[type][category]`; `None` when no household of the type has the flag.
    pub penetration_pct: Vec<Vec<Option<f64>>>,
    pub threshold: f64,
    pub conclusion: String,
}

pub fn category_skew_artifact(results: &AnalysisResults) -> Result<CategorySkewArtifact> {
    let h2 = &results.h2;
    let categories = h2
        .categories
        .iter()
        .map(|c| c.category.strip_prefix(ONLINE_PREFIX).unwrap_or(&c.category).to_string())
        .collect();

    let mut skew = Vec::with_capacity(HouseholdType::ALL.len());
    let mut penetration_pct = Vec::with_capacity(HouseholdType::ALL.len());
    for t in HouseholdType::ALL {
        skew.push(h2.categories.iter().map(|c| c.skew(t)).collect());
        penetration_pct.push(
            h2.categories
                .iter()
                .map(|c| match t {
                    HouseholdType::SingleSmall => c.single_small_rate,
                    HouseholdType::Family => c.family_rate,
                })
                .map(|r| r.map(pct))
                .collect(),
        );
    }

    Ok(CategorySkewArtifact {
        schema_version: "housestat_category_skew_v0".to_string(),
        meta: ArtifactMeta::for_results(results)?,
        categories,
        household_types: HouseholdType::ALL.iter().map(|t| t.label().to_string()).collect(),
        skew,
        penetration_pct,
        threshold: SKEW_THRESHOLD,
        conclusion: h2.conclusion.label().to_string(),
    })
}
