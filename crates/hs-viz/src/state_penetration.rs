//! State ranking by penetration (bar chart standing in for a choropleth).

use hs_core::{KeyValue, Result};
use hs_inference::AnalysisResults;
use serde::{Deserialize, Serialize};

use crate::meta::{ArtifactMeta, observed_rows};
use crate::pct;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatePenetrationArtifact {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub national_pct: Option<f64>,
    /// Sorted by penetration, highest first; ties by state name.
    pub states: Vec<StateEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateEntry {
    /// 1-based.
    pub rank: usize,
    pub state: String,
    pub penetration_pct: f64,
    pub sample_size: usize,
}

pub fn state_penetration_artifact(results: &AnalysisResults) -> Result<StatePenetrationArtifact> {
    let mut states: Vec<StateEntry> = observed_rows(&results.state_penetration.rows)
        .filter_map(|(v, r)| match v {
            KeyValue::Text(s) => Some(StateEntry {
                rank: 0,
                state: s.clone(),
                penetration_pct: pct(r.rate),
                sample_size: r.sample_size,
            }),
            _ => None,
        })
        .collect();
    states.sort_by(|a, b| {
        b.penetration_pct.total_cmp(&a.penetration_pct).then_with(|| a.state.cmp(&b.state))
    });
    for (i, s) in states.iter_mut().enumerate() {
        s.rank = i + 1;
    }

    Ok(StatePenetrationArtifact {
        schema_version: "housestat_state_penetration_v0".to_string(),
        meta: ArtifactMeta::for_results(results)?,
        national_pct: results.overall_rate().map(pct),
        states,
    })
}
