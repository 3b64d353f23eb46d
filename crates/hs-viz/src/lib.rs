//! # hs-viz
//!
//! Chart data artifacts for housestat.
//!
//! This crate is intentionally dependency-light and focuses on emitting
//! plot-friendly JSON structures (arrays instead of nested objects) derived
//! from [`hs_inference::AnalysisResults`]. Rendering lives in `hs-viz-render`.

#![warn(clippy::all)]

/// Category skew heatmap artifact.
pub mod category_skew;
/// Household size vs adoption artifact.
pub mod household_size;
/// Internet access impact artifact.
pub mod internet_impact;
/// Shared artifact metadata.
pub mod meta;
/// State penetration ranking artifact.
pub mod state_penetration;

use hs_core::Result;
use hs_inference::AnalysisResults;
use serde::Serialize;

pub use category_skew::{CategorySkewArtifact, category_skew_artifact};
pub use household_size::{HouseholdSizeArtifact, household_size_artifact};
pub use internet_impact::{InternetImpactArtifact, internet_impact_artifact};
pub use meta::ArtifactMeta;
pub use state_penetration::{StatePenetrationArtifact, state_penetration_artifact};

/// Chart kinds in output order. Also the artifact file stems.
pub const CHART_KINDS: [&str; 4] =
    ["household-size-vs-adoption", "category-skew", "state-penetration", "internet-impact"];

/// Any of the chart artifacts.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ChartArtifact {
    /// Adoption by household size.
    HouseholdSize(HouseholdSizeArtifact),
    /// Category skew by household type.
    CategorySkew(CategorySkewArtifact),
    /// Penetration ranking by state.
    StatePenetration(StatePenetrationArtifact),
    /// Adoption with vs without internet.
    InternetImpact(InternetImpactArtifact),
}

impl ChartArtifact {
    /// Kind name, one of [`CHART_KINDS`].
    pub fn kind(&self) -> &'static str {
        match self {
            ChartArtifact::HouseholdSize(_) => CHART_KINDS[0],
            ChartArtifact::CategorySkew(_) => CHART_KINDS[1],
            ChartArtifact::StatePenetration(_) => CHART_KINDS[2],
            ChartArtifact::InternetImpact(_) => CHART_KINDS[3],
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build every chart artifact, in [`CHART_KINDS`] order.
pub fn chart_artifacts(results: &AnalysisResults) -> Result<Vec<ChartArtifact>> {
    Ok(vec![
        ChartArtifact::HouseholdSize(household_size_artifact(results)?),
        ChartArtifact::CategorySkew(category_skew_artifact(results)?),
        ChartArtifact::StatePenetration(state_penetration_artifact(results)?),
        ChartArtifact::InternetImpact(internet_impact_artifact(results)?),
    ])
}

/// Kind of the artifact carrying `schema_version`, if it is one of ours.
pub fn kind_for_schema(schema_version: &str) -> Option<&'static str> {
    match schema_version {
        "housestat_household_size_v0" => Some(CHART_KINDS[0]),
        "housestat_category_skew_v0" => Some(CHART_KINDS[1]),
        "housestat_state_penetration_v0" => Some(CHART_KINDS[2]),
        "housestat_internet_impact_v0" => Some(CHART_KINDS[3]),
        _ => None,
    }
}

/// Rate in `[0, 1]` to a percentage.
pub(crate) fn pct(rate: f64) -> f64 {
    rate * 100.0
}
