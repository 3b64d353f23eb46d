//! End-to-end analysis of one household table.

use hs_core::HouseholdTable;
use hs_data::{DataQualityReport, quality_report};
use serde::{Deserialize, Serialize};

use crate::hypotest::{H1Result, H2Result, H3Result, HypothesisTester};
use crate::modeler::{ModelResult, StatisticalModeler};
use crate::penetration::{self, PenetrationTable};

/// Everything downstream reporting needs, addressed by field name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResults {
    /// Table completeness.
    pub data_quality: DataQualityReport,
    /// Whole-table penetration (one `Overall` row).
    pub overall_penetration: PenetrationTable,
    /// Penetration by state.
    pub state_penetration: PenetrationTable,
    /// Penetration by size bucket.
    pub household_size_penetration: PenetrationTable,
    /// Penetration by raw household size.
    pub penetration_by_household_size: PenetrationTable,
    /// Penetration for urban vs rural.
    pub urban_rural_penetration: PenetrationTable,
    /// Penetration with vs without internet.
    pub internet_penetration: PenetrationTable,
    /// Household size vs adoption.
    pub h1: H1Result,
    /// Category skew.
    pub h2: H2Result,
    /// Internet mediation.
    pub h3: H3Result,
    /// Logistic sensitivity model.
    pub model: ModelResult,
}

impl AnalysisResults {
    /// Overall penetration rate, if the table had any rows.
    pub fn overall_rate(&self) -> Option<f64> {
        self.overall_penetration.rows.first().filter(|r| r.sample_size > 0).map(|r| r.rate)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> hs_core::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run penetration analysis, H1-H3 and the logistic model.
pub fn run_full_analysis(table: &HouseholdTable) -> AnalysisResults {
    tracing::info!(rows = table.len(), "running analysis");

    let data_quality = quality_report(table);
    let overall_penetration = penetration::overall(table);
    let state_penetration = penetration::by_state(table);
    let household_size_penetration = penetration::by_size_bucket(table);
    let penetration_by_household_size = penetration::by_household_size(table);
    let urban_rural_penetration = penetration::by_urban(table);
    let internet_penetration = penetration::by_internet_access(table);
    let overall_rate = overall_penetration.rows.first().map(|r| r.rate);
    tracing::info!(
        overall = ?overall_rate,
        states = state_penetration.len(),
        "penetration metrics computed"
    );

    let tester = HypothesisTester::new(table);
    let h1 = tester.test_h1();
    tracing::info!(conclusion = h1.conclusion.label(), "{}", h1.summary);
    let h2 = tester.test_h2();
    tracing::info!(conclusion = h2.conclusion.label(), findings = h2.findings.len(), "H2 tested");
    let h3 = tester.test_h3();
    tracing::info!(conclusion = h3.conclusion.label(), "{}", h3.summary);

    let model = StatisticalModeler::new(table).fit();
    tracing::info!(status = ?model.status, accuracy = ?model.accuracy, "logistic model");
    for line in &model.interpretation {
        tracing::info!("{line}");
    }

    AnalysisResults {
        data_quality,
        overall_penetration,
        state_penetration,
        household_size_penetration,
        penetration_by_household_size,
        urban_rural_penetration,
        internet_penetration,
        h1,
        h2,
        h3,
        model,
    }
}
