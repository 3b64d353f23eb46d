//! Hypothesis tests on household structure and e-commerce adoption.
//!
//! - **H1**: smaller households adopt online purchasing more often.
//! - **H2**: family households over-index on consumables, single/small
//!   households on (non ready-to-eat) food.
//! - **H3**: the household-size effect is mediated by internet access.
//!
//! Every test returns its fixed-shape record. A missing column or a
//! degenerate statistic leaves the corresponding field `None` and selects the
//! "insufficient data" conclusion; nothing here returns an error.

use std::collections::BTreeMap;

use hs_core::{Column, HouseholdTable, HouseholdType};
use hs_prob::chi_squared::contingency_test;
use hs_prob::descriptive::pearson;
use hs_prob::student_t::correlation_significance;
use serde::{Deserialize, Serialize};

use crate::penetration::{PenetrationTable, by_size_bucket};

/// Significance level used by H1.
pub const ALPHA: f64 = 0.05;
/// |r| below this is a weak effect.
pub const MIN_EFFECT: f64 = 0.1;
/// Skew index above which a household type over-indexes (H2).
pub const SKEW_THRESHOLD: f64 = 1.1;
/// H3 requires the with-internet effect to be this many times stronger.
pub const MEDIATION_RATIO: f64 = 1.5;

/// Which hypothesis a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HypothesisId {
    /// Household size vs adoption.
    H1,
    /// Category skew by household type.
    H2,
    /// Internet mediation.
    H3,
}

/// H1 conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum H1Conclusion {
    /// Correlation undefined.
    InsufficientData,
    /// p undefined or p >= 0.05.
    NotSupported,
    /// Significant and r < -0.1.
    Supported,
    /// Significant and r > 0.1.
    Rejected,
    /// Significant but |r| <= 0.1.
    WeakEffect,
}

impl H1Conclusion {
    /// Short label.
    pub fn label(self) -> &'static str {
        match self {
            H1Conclusion::InsufficientData => "insufficient data",
            H1Conclusion::NotSupported => "not supported",
            H1Conclusion::Supported => "supported (negative association)",
            H1Conclusion::Rejected => "rejected (positive association)",
            H1Conclusion::WeakEffect => "weak effect, significant but small",
        }
    }
}

/// Apply the H1 threshold policy, in order.
pub fn h1_conclusion(r: Option<f64>, p: Option<f64>) -> H1Conclusion {
    let Some(r) = r.filter(|r| r.is_finite()) else {
        return H1Conclusion::InsufficientData;
    };
    match p {
        Some(p) if p < ALPHA => {
            if r < -MIN_EFFECT {
                H1Conclusion::Supported
            } else if r > MIN_EFFECT {
                H1Conclusion::Rejected
            } else {
                H1Conclusion::WeakEffect
            }
        }
        _ => H1Conclusion::NotSupported,
    }
}

/// Result of H1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct H1Result {
    /// Always [`HypothesisId::H1`].
    pub id: HypothesisId,
    /// Pearson r between household size and purchase.
    pub correlation: Option<f64>,
    /// Two-sided t-test p-value of `correlation`.
    pub correlation_p_value: Option<f64>,
    /// Complete (size, purchase) pairs used.
    pub n_pairs: usize,
    /// Chi-square statistic of size x purchase independence.
    pub chi_square: Option<f64>,
    /// Chi-square p-value.
    pub chi_square_p_value: Option<f64>,
    /// Chi-square degrees of freedom.
    pub chi_square_dof: Option<usize>,
    /// Penetration per size bucket.
    pub penetration_by_size: PenetrationTable,
    /// Threshold-policy outcome.
    pub conclusion: H1Conclusion,
    /// One-line explanation.
    pub summary: String,
}

/// H2 conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum H2Conclusion {
    /// No category columns or no size column.
    InsufficientData,
    /// At least one category over-indexes as hypothesised.
    Supported,
    /// No category triggered.
    MixedResults,
}

impl H2Conclusion {
    /// Short label.
    pub fn label(self) -> &'static str {
        match self {
            H2Conclusion::InsufficientData => "insufficient data",
            H2Conclusion::Supported => "supported",
            H2Conclusion::MixedResults => "mixed results",
        }
    }
}

/// Category rates and skew indices by household type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySkew {
    /// Category column, e.g. `Online_Food`.
    pub category: String,
    /// Share of single/small households with the flag set; `None` if none has it.
    pub single_small_rate: Option<f64>,
    /// Share of family households with the flag set; `None` if none has it.
    pub family_rate: Option<f64>,
    /// Single/small rate over the two-type mean (1.0 when undefined).
    pub single_small_skew: f64,
    /// Family rate over the two-type mean (1.0 when undefined).
    pub family_skew: f64,
}

impl CategorySkew {
    /// Skew for one household type.
    pub fn skew(&self, t: HouseholdType) -> f64 {
        match t {
            HouseholdType::SingleSmall => self.single_small_skew,
            HouseholdType::Family => self.family_skew,
        }
    }
}

/// A category whose skew supports H2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct H2Finding {
    /// Category column.
    pub category: String,
    /// Over-indexing household type.
    pub household_type: HouseholdType,
    /// Its skew index.
    pub skew: f64,
}

/// Result of H2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct H2Result {
    /// Always [`HypothesisId::H2`].
    pub id: HypothesisId,
    /// One entry per category column, in schema order.
    pub categories: Vec<CategorySkew>,
    /// Categories that triggered.
    pub findings: Vec<H2Finding>,
    /// Aggregate outcome.
    pub conclusion: H2Conclusion,
    /// Explanation, one line per finding.
    pub summary: String,
}

/// H3 conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum H3Conclusion {
    /// Either correlation undefined.
    InsufficientData,
    /// |r_with| > 1.5 |r_without|.
    Supported,
    /// |r_without| > |r_with|.
    NotSupported,
    /// Anything in between.
    Inconclusive,
}

impl H3Conclusion {
    /// Short label.
    pub fn label(self) -> &'static str {
        match self {
            H3Conclusion::InsufficientData => "insufficient data",
            H3Conclusion::Supported => "supported",
            H3Conclusion::NotSupported => "not supported",
            H3Conclusion::Inconclusive => "inconclusive",
        }
    }
}

/// Apply the H3 comparison.
pub fn h3_conclusion(r_with: Option<f64>, r_without: Option<f64>) -> H3Conclusion {
    match (r_with, r_without) {
        (Some(w), Some(wo)) if w.is_finite() && wo.is_finite() => {
            if w.abs() > wo.abs() * MEDIATION_RATIO {
                H3Conclusion::Supported
            } else if wo.abs() > w.abs() {
                H3Conclusion::NotSupported
            } else {
                H3Conclusion::Inconclusive
            }
        }
        _ => H3Conclusion::InsufficientData,
    }
}

/// Result of H3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct H3Result {
    /// Always [`HypothesisId::H3`].
    pub id: HypothesisId,
    /// Size/purchase Pearson r among connected households.
    pub correlation_with_internet: Option<f64>,
    /// Size/purchase Pearson r among unconnected households.
    pub correlation_without_internet: Option<f64>,
    /// Rows with internet access.
    pub n_with_internet: usize,
    /// Rows without internet access.
    pub n_without_internet: usize,
    /// Size-bucket penetration among connected households.
    pub penetration_with_internet: PenetrationTable,
    /// Size-bucket penetration among unconnected households.
    pub penetration_without_internet: PenetrationTable,
    /// Comparison outcome.
    pub conclusion: H3Conclusion,
    /// One-line explanation.
    pub summary: String,
}

/// Complete (household_size, purchase) pairs as floats.
fn size_purchase_pairs(table: &HouseholdTable) -> (Vec<f64>, Vec<f64>) {
    table
        .iter()
        .filter_map(|r| {
            let size = r.household_size?;
            let purchase = table.flag(r, &Column::OnlinePurchase)?;
            Some((f64::from(size), if purchase { 1.0 } else { 0.0 }))
        })
        .unzip()
}

fn size_purchase_correlation(table: &HouseholdTable) -> Option<f64> {
    if !table.has_column(&Column::HouseholdSize) || !table.has_column(&Column::OnlinePurchase) {
        return None;
    }
    let (x, y) = size_purchase_pairs(table);
    pearson(&x, &y)
}

/// Runs H1, H2 and H3 over a borrowed table.
#[derive(Debug, Clone, Copy)]
pub struct HypothesisTester<'a> {
    table: &'a HouseholdTable,
}

impl<'a> HypothesisTester<'a> {
    /// Wrap a table.
    pub fn new(table: &'a HouseholdTable) -> Self {
        Self { table }
    }

    /// H1: household size vs adoption.
    pub fn test_h1(&self) -> H1Result {
        let t = self.table;
        let penetration_by_size = by_size_bucket(t);
        let has_cols =
            t.has_column(&Column::HouseholdSize) && t.has_column(&Column::OnlinePurchase);
        let (x, y) = if has_cols { size_purchase_pairs(t) } else { (Vec::new(), Vec::new()) };
        let n_pairs = x.len();

        let correlation = if has_cols { pearson(&x, &y) } else { None };
        let correlation_p_value =
            correlation.and_then(|r| correlation_significance(r, n_pairs)).map(|(_, p)| p);

        // household_size x purchase cross-tabulation
        let mut counts: BTreeMap<u64, [u64; 2]> = BTreeMap::new();
        for (&s, &p) in x.iter().zip(&y) {
            counts.entry(s as u64).or_default()[usize::from(p > 0.5)] += 1;
        }
        let observed: Vec<Vec<u64>> = counts.values().map(|c| c.to_vec()).collect();
        let chi = if observed.is_empty() {
            None
        } else {
            contingency_test(&observed)
                .inspect_err(|e| tracing::warn!(error = %e, "H1 chi-square test skipped"))
                .ok()
        };

        let conclusion = h1_conclusion(correlation, correlation_p_value);
        let fmt_stats = || {
            format!(
                "r={:.3}, p={}",
                correlation.unwrap_or(f64::NAN),
                correlation_p_value.map_or("n/a".to_string(), |p| format!("{p:.4}"))
            )
        };
        let summary = match conclusion {
            H1Conclusion::InsufficientData => "Insufficient data to test H1".to_string(),
            H1Conclusion::Supported => format!(
                "H1 SUPPORTED: Negative correlation ({}). Smaller households show higher online purchase adoption.",
                fmt_stats()
            ),
            H1Conclusion::Rejected => format!(
                "H1 REJECTED: Positive correlation ({}). Larger households show higher adoption.",
                fmt_stats()
            ),
            H1Conclusion::WeakEffect => format!(
                "H1 WEAK: Correlation exists ({}) but effect size is small.",
                fmt_stats()
            ),
            H1Conclusion::NotSupported => {
                format!("H1 NOT SUPPORTED: No significant correlation ({}).", fmt_stats())
            }
        };
        tracing::debug!(
            r = ?correlation,
            p = ?correlation_p_value,
            chi2 = ?chi.map(|c| c.statistic),
            n_pairs,
            "H1 statistics"
        );

        H1Result {
            id: HypothesisId::H1,
            correlation,
            correlation_p_value,
            n_pairs,
            chi_square: chi.map(|c| c.statistic),
            chi_square_p_value: chi.map(|c| c.p_value),
            chi_square_dof: chi.map(|c| c.dof),
            penetration_by_size,
            conclusion,
            summary,
        }
    }

    /// H2: category skew between single/small and family households.
    pub fn test_h2(&self) -> H2Result {
        let t = self.table;
        let schema = t.schema();
        let category_names: Vec<String> =
            schema.categories().iter().map(|s| s.to_string()).collect();

        if category_names.is_empty() || !t.has_column(&Column::HouseholdSize) {
            return H2Result {
                id: HypothesisId::H2,
                categories: Vec::new(),
                findings: Vec::new(),
                conclusion: H2Conclusion::InsufficientData,
                summary: "Insufficient category data to test H2".to_string(),
            };
        }

        let mut n_type = [0usize; 2];
        let mut n_flag = vec![[0usize; 2]; category_names.len()];
        for rec in t {
            let Some(ht) = rec.household_type() else { continue };
            let k = type_index(ht);
            n_type[k] += 1;
            for (c, flag) in rec.categories.iter().enumerate() {
                if *flag == Some(true) {
                    n_flag[c][k] += 1;
                }
            }
        }

        let mut categories = Vec::with_capacity(category_names.len());
        let mut findings = Vec::new();
        for (name, flags) in category_names.iter().zip(&n_flag) {
            // A type with no flagged household is absent from the category.
            let rate = |k: usize| (flags[k] > 0).then(|| flags[k] as f64 / n_type[k] as f64);
            let rates = [rate(0), rate(1)];
            let present: Vec<f64> = rates.iter().flatten().copied().collect();
            // Mean of the household-type rates, not a population-weighted average.
            let mean = if present.is_empty() {
                0.0
            } else {
                present.iter().sum::<f64>() / present.len() as f64
            };
            let skew = |r: Option<f64>| match r {
                Some(r) if mean > 0.0 => r / mean,
                _ => 1.0,
            };
            let cs = CategorySkew {
                category: name.clone(),
                single_small_rate: rates[0],
                family_rate: rates[1],
                single_small_skew: skew(rates[0]),
                family_skew: skew(rates[1]),
            };

            if name.contains("Consumables") || name.contains("Grocery") {
                if cs.family_skew > SKEW_THRESHOLD {
                    findings.push(H2Finding {
                        category: name.clone(),
                        household_type: HouseholdType::Family,
                        skew: cs.family_skew,
                    });
                }
            } else if name.contains("Food")
                && !name.contains("Ready")
                && cs.single_small_skew > SKEW_THRESHOLD
            {
                findings.push(H2Finding {
                    category: name.clone(),
                    household_type: HouseholdType::SingleSmall,
                    skew: cs.single_small_skew,
                });
            }
            categories.push(cs);
        }

        let (conclusion, summary) = if findings.is_empty() {
            (H2Conclusion::MixedResults, "H2: Mixed results".to_string())
        } else {
            let lines: Vec<String> = findings
                .iter()
                .map(|f| format!("{}: {} over-indexes ({:.2}x)", f.category, f.household_type, f.skew))
                .collect();
            (H2Conclusion::Supported, lines.join("\n"))
        };
        tracing::debug!(categories = categories.len(), findings = findings.len(), "H2 skew indices");

        H2Result { id: HypothesisId::H2, categories, findings, conclusion, summary }
    }

    /// H3: household-size effect with vs without internet access.
    pub fn test_h3(&self) -> H3Result {
        let t = self.table;
        if !t.has_column(&Column::InternetAccess) {
            return H3Result {
                id: HypothesisId::H3,
                correlation_with_internet: None,
                correlation_without_internet: None,
                n_with_internet: 0,
                n_without_internet: 0,
                penetration_with_internet: PenetrationTable::default(),
                penetration_without_internet: PenetrationTable::default(),
                conclusion: H3Conclusion::InsufficientData,
                summary: "Insufficient data to test H3: no Internet_Access column".to_string(),
            };
        }

        let with = t.filter(|r| r.internet_access == Some(true));
        let without = t.filter(|r| r.internet_access == Some(false));
        let r_with = size_purchase_correlation(&with);
        let r_without = size_purchase_correlation(&without);
        let conclusion = h3_conclusion(r_with, r_without);

        let summary = match (conclusion, r_with, r_without) {
            (H3Conclusion::Supported, Some(w), Some(wo)) => format!(
                "H3 SUPPORTED: Household size effect stronger with internet (r={w:.3}) vs without (r={wo:.3})"
            ),
            (H3Conclusion::NotSupported, _, _) => {
                "H3 NOT SUPPORTED: Effect not mediated by internet access".to_string()
            }
            (H3Conclusion::Inconclusive, Some(w), Some(wo)) => format!(
                "H3 INCONCLUSIVE: Similar effects with (r={w:.3}) and without (r={wo:.3}) internet"
            ),
            _ => "Insufficient data to test H3".to_string(),
        };
        tracing::debug!(r_with = ?r_with, r_without = ?r_without, "H3 correlations");

        H3Result {
            id: HypothesisId::H3,
            correlation_with_internet: r_with,
            correlation_without_internet: r_without,
            n_with_internet: with.len(),
            n_without_internet: without.len(),
            penetration_with_internet: by_size_bucket(&with),
            penetration_without_internet: by_size_bucket(&without),
            conclusion,
            summary,
        }
    }
}

fn type_index(t: HouseholdType) -> usize {
    match t {
        HouseholdType::SingleSmall => 0,
        HouseholdType::Family => 1,
    }
}
