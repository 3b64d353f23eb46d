use std::time::{SystemTime, UNIX_EPOCH};

use hs_core::Result;
use hs_inference::{AnalysisResults, GroupKey, KeyPart, PenetrationRow};
use serde::{Deserialize, Serialize};

/// Provenance block carried by every artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Producing tool.
    pub tool: String,
    /// Producing tool version.
    pub tool_version: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_unix_ms: u128,
    /// Survey the table is modelled on.
    pub survey: String,
    /// Rows in the analysed table.
    pub n_households: usize,
}

impl ArtifactMeta {
    pub(crate) fn for_results(results: &AnalysisResults) -> Result<Self> {
        Ok(Self {
            tool: "housestat".to_string(),
            tool_version: hs_core::VERSION.to_string(),
            created_unix_ms: now_unix_ms()?,
            survey: results.data_quality.survey.clone(),
            n_households: results.data_quality.total_records,
        })
    }
}

fn now_unix_ms() -> Result<u128> {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| hs_core::Error::Computation(format!("system time error: {}", e)))?;
    Ok(d.as_millis())
}

/// Rows keyed by one observed value; `Missing` groups are not plotted.
pub(crate) fn observed_rows<'a>(
    rows: &'a [PenetrationRow],
) -> impl Iterator<Item = (&'a hs_core::KeyValue, &'a PenetrationRow)> + 'a {
    rows.iter().filter_map(|r| match &r.key {
        GroupKey::Values(parts) => match parts.as_slice() {
            [KeyPart::Value(v)] => Some((v, r)),
            _ => None,
        },
        GroupKey::Overall => None,
    })
}
