//! Adoption with vs without internet access, overall and per size bucket.

use hs_core::{KeyValue, Result, SizeBucket};
use hs_inference::AnalysisResults;
use serde::{Deserialize, Serialize};

use crate::meta::{ArtifactMeta, observed_rows};
use crate::pct;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternetImpactArtifact {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    pub groups: Vec<AccessGroup>,
    pub buckets: Vec<BucketSplit>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub correlation_with_internet: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub correlation_without_internet: Option<f64>,
    pub conclusion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessGroup {
    pub internet_access: bool,
    pub label: String,
    pub penetration_pct: f64,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSplit {
    pub bucket: String,
    #[serde(default)]
    pub with_internet_pct: Option<f64>,
    #[serde(default)]
    pub without_internet_pct: Option<f64>,
}

fn access_label(access: bool) -> &'static str {
    if access { "With internet" } else { "Without internet" }
}

pub fn internet_impact_artifact(results: &AnalysisResults) -> Result<InternetImpactArtifact> {
    // Internet users first.
    let mut groups: Vec<AccessGroup> = observed_rows(&results.internet_penetration.rows)
        .filter_map(|(v, r)| match v {
            KeyValue::Flag(b) => Some(AccessGroup {
                internet_access: *b,
                label: access_label(*b).to_string(),
                penetration_pct: pct(r.rate),
                sample_size: r.sample_size,
            }),
            _ => None,
        })
        .collect();
    groups.sort_by_key(|g| !g.internet_access);

    let h3 = &results.h3;
    let buckets = SizeBucket::ALL
        .into_iter()
        .map(|b| BucketSplit {
            bucket: b.label().to_string(),
            with_internet_pct: h3.penetration_with_internet.rate_of(KeyValue::Bucket(b)).map(pct),
            without_internet_pct: h3
                .penetration_without_internet
                .rate_of(KeyValue::Bucket(b))
                .map(pct),
        })
        .filter(|s| s.with_internet_pct.is_some() || s.without_internet_pct.is_some())
        .collect();

    Ok(InternetImpactArtifact {
        schema_version: "housestat_internet_impact_v0".to_string(),
        meta: ArtifactMeta::for_results(results)?,
        groups,
        buckets,
        correlation_with_internet: h3.correlation_with_internet,
        correlation_without_internet: h3.correlation_without_internet,
        conclusion: h3.conclusion.label().to_string(),
    })
}
