//! Product insights derived from analysis results.

use std::cmp::Ordering;

use hs_core::KeyValue;
use hs_core::types::ONLINE_PREFIX;
use hs_inference::{AnalysisResults, GroupKey, KeyPart};
use serde::Serialize;

/// At most this many insights are reported.
pub const MAX_INSIGHTS: usize = 5;
/// Skew above which a household type over-indexes on a category.
pub const OVER_INDEX: f64 = 1.2;
/// Single/small skew below which family areas get the premium stock.
pub const UNDER_INDEX: f64 = 0.8;
/// Urban/rural penetration ratio that triggers the urban-first insight.
pub const URBAN_RATIO: f64 = 1.5;

const TIER_1_SIZE: usize = 8;
const TIER_2_SIZE: usize = 10;

/// Insight priority; sorts High first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    /// Act now.
    High,
    /// Plan for next cycle.
    Medium,
    /// Watch.
    Low,
}

impl Priority {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// One finding and what the product should do about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    /// The finding.
    pub insight: String,
    /// Product decision it implies.
    pub implication: String,
    /// Expected business impact.
    pub metric_impact: String,
    /// Priority.
    pub priority: Priority,
    /// Concrete next action.
    pub product_action: String,
}

/// Opportunity score of one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateOpportunity {
    /// State name.
    pub state: String,
    /// Penetration in `[0, 1]`.
    pub rate: f64,
    /// Households sampled.
    pub sample_size: usize,
    /// Rank by penetration, 1 = highest; ties share the average rank.
    pub penetration_rank: f64,
    /// Rank by sample size, 1 = largest; ties share the average rank.
    pub sample_size_rank: f64,
    /// `0.6 * (100 - penetration_rank) + 0.4 * (100 - sample_size_rank)`.
    pub score: f64,
}

/// Why each tier is treated the way it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierRationale {
    /// Tier 1.
    pub tier_1: String,
    /// Tier 2.
    pub tier_2: String,
    /// Tier 3.
    pub tier_3: String,
}

impl Default for TierRationale {
    fn default() -> Self {
        Self {
            tier_1: "Expand aggressively - proven demand + scale".into(),
            tier_2: "Selective pilots in tier-2 cities - growing market".into(),
            tier_3: "Monitor only - await infrastructure development".into(),
        }
    }
}

/// States split into expansion tiers by opportunity score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpansionStrategy {
    /// Top eight states.
    pub tier_1_states: Vec<String>,
    /// Next ten states.
    pub tier_2_states: Vec<String>,
    /// Everything else.
    pub tier_3_states: Vec<String>,
    /// All states, highest score first.
    pub scores: Vec<StateOpportunity>,
    /// Tier rationale.
    pub rationale: TierRationale,
}

/// Stocking recommendation for one area type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockLevel {
    /// Premium placement.
    High,
    /// Default assortment.
    Standard,
    /// Limited SKUs.
    Low,
}

impl StockLevel {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            StockLevel::High => "HIGH STOCK - Premium placement",
            StockLevel::Standard => "STANDARD STOCK",
            StockLevel::Low => "LOW STOCK - Limited SKUs",
        }
    }
}

/// Stocking recommendation for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchandisingRow {
    /// Category without the `Online_` prefix.
    pub category: String,
    /// Areas dominated by single/small households.
    pub single_hh_areas: StockLevel,
    /// Areas dominated by family households.
    pub family_hh_areas: StockLevel,
    /// Single/small skew index.
    pub single_skew: f64,
    /// Family skew index.
    pub family_skew: f64,
}

/// Implementation effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effort {
    /// Weeks.
    Medium,
    /// Quarters.
    High,
}

impl Effort {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Effort::Medium => "Medium",
            Effort::High => "High",
        }
    }
}

/// A product feature on the backlog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturePriority {
    /// Feature name.
    pub feature: String,
    /// What it is.
    pub description: String,
    /// Who it is for.
    pub target_segment: String,
    /// Expected impact.
    pub expected_impact: String,
    /// Effort.
    pub effort: Effort,
    /// Out of 10.
    pub priority_score: f64,
}

/// Headline numbers quoted in the memo's executive summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    /// Households analysed.
    pub n_households: usize,
    /// States with at least one household.
    pub n_states: usize,
    /// Overall penetration in percent.
    pub overall_pct: Option<f64>,
    /// H1 correlation.
    pub size_correlation: Option<f64>,
    /// H1 one-line summary.
    pub h1_summary: String,
    /// Penetration gap with vs without internet, percentage points.
    pub internet_gap_pp: Option<f64>,
    /// H3 one-line summary.
    pub h3_summary: String,
}

/// Everything the memo needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInsights {
    /// Headline numbers.
    pub headline: Headline,
    /// Up to [`MAX_INSIGHTS`] insights, High first.
    pub insights: Vec<Insight>,
    /// `None` when no state penetration is available.
    pub expansion: Option<ExpansionStrategy>,
    /// One row per category.
    pub merchandising: Vec<MerchandisingRow>,
    /// Backlog sorted by priority score.
    pub features: Vec<FeaturePriority>,
}

/// Generates [`ProductInsights`] from one analysis run.
#[derive(Debug, Clone, Copy)]
pub struct InsightsGenerator<'a> {
    results: &'a AnalysisResults,
}

impl<'a> InsightsGenerator<'a> {
    /// Wrap analysis results.
    pub fn new(results: &'a AnalysisResults) -> Self {
        Self { results }
    }

    /// Run every generator.
    pub fn generate(&self) -> ProductInsights {
        let out = ProductInsights {
            headline: self.headline(),
            insights: self.generate_all_insights(),
            expansion: self.expansion_strategy(),
            merchandising: self.merchandising_matrix(),
            features: feature_prioritization(),
        };
        tracing::info!(
            insights = out.insights.len(),
            categories = out.merchandising.len(),
            "product insights generated"
        );
        out
    }

    fn headline(&self) -> Headline {
        let r = self.results;
        Headline {
            n_households: r.data_quality.total_records,
            n_states: self.states().len(),
            overall_pct: r.overall_rate().map(|v| v * 100.0),
            size_correlation: r.h1.correlation,
            h1_summary: r.h1.summary.clone(),
            internet_gap_pp: self.internet_gap_pp(),
            h3_summary: r.h3.summary.clone(),
        }
    }

    /// Observed states with their rate and sample size, in table order.
    fn states(&self) -> Vec<(String, f64, usize)> {
        self.results
            .state_penetration
            .iter()
            .filter_map(|row| match &row.key {
                GroupKey::Values(parts) => match parts.as_slice() {
                    [KeyPart::Value(KeyValue::Text(s))] => {
                        Some((s.clone(), row.rate, row.sample_size))
                    }
                    _ => None,
                },
                GroupKey::Overall => None,
            })
            .collect()
    }

    fn internet_gap_pp(&self) -> Option<f64> {
        let t = &self.results.internet_penetration;
        let with = t.rate_of(KeyValue::Flag(true))?;
        let without = t.rate_of(KeyValue::Flag(false))?;
        Some((with - without) * 100.0)
    }

    /// Up to five insights, High priority first, in discovery order within a priority.
    pub fn generate_all_insights(&self) -> Vec<Insight> {
        let r = self.results;
        let mut out = Vec::new();

        if let Some(corr) = r.h1.correlation.filter(|c| *c < -0.1) {
            out.push(Insight {
                insight: format!(
                    "Smaller households show {:.0}% higher propensity for online purchases",
                    corr.abs() * 100.0
                ),
                implication: "Prioritize expansion in cities with high concentration of 1-2 person households (metros, tech hubs, student cities)".into(),
                metric_impact: "Estimated 20-30% higher conversion rates in single/small HH neighborhoods".into(),
                priority: Priority::High,
                product_action: "Launch targeted campaigns in PGs, bachelor apartments, and co-living spaces".into(),
            });
        }

        if let Some(gap) = self.internet_gap_pp() {
            out.push(Insight {
                insight: format!(
                    "Internet access creates {gap:.0} percentage point difference in adoption"
                ),
                implication: "Partner with ISPs and telcos for bundled offers; focus on 4G/5G-enabled areas".into(),
                metric_impact: format!(
                    "Addressable market expands by ~{gap:.0}% in internet-enabled regions"
                ),
                priority: Priority::High,
                product_action: "Build offline-to-online onboarding flows; optimize for low-bandwidth".into(),
            });
        }

        let mut single_favored = Vec::new();
        let mut family_favored = Vec::new();
        for c in &r.h2.categories {
            if c.single_small_skew > OVER_INDEX {
                single_favored.push(display_category(&c.category));
            }
            if c.family_skew > OVER_INDEX {
                family_favored.push(display_category(&c.category));
            }
        }
        if !single_favored.is_empty() {
            out.push(Insight {
                insight: format!(
                    "Single/small households over-index on: {}",
                    single_favored.join(", ")
                ),
                implication: "Stock ready-to-eat meals, single-serve packs, and quick-prep options in bachelor-heavy areas".into(),
                metric_impact: "Increase basket size by 15-25% through targeted assortment".into(),
                priority: Priority::High,
                product_action: "Create \"Single Living Essentials\" category; promote meal kits and convenience foods".into(),
            });
        }
        if !family_favored.is_empty() {
            out.push(Insight {
                insight: format!("Family households over-index on: {}", family_favored.join(", ")),
                implication: "Emphasize bulk packs, family meal deals, and subscription models in family neighborhoods".into(),
                metric_impact: "Increase order frequency by 20-30% through subscription penetration".into(),
                priority: Priority::Medium,
                product_action: "Launch family subscription plans with bulk discounts".into(),
            });
        }

        let ur = &r.urban_rural_penetration;
        if let (Some(urban), Some(rural)) =
            (ur.rate_of(KeyValue::Flag(true)), ur.rate_of(KeyValue::Flag(false)))
        {
            let ratio = if rural > 0.0 { urban / rural } else { f64::INFINITY };
            if ratio > URBAN_RATIO {
                out.push(Insight {
                    insight: format!("Urban areas show {ratio:.1}x higher adoption than rural"),
                    implication: "Maintain urban-first strategy; explore tier-2/3 cities before rural expansion".into(),
                    metric_impact: format!("Urban-focused strategy = {ratio:.0}x ROI vs rural"),
                    priority: Priority::Medium,
                    product_action: "Pilot hub-and-spoke model in tier-2 cities with urban characteristics".into(),
                });
            }
        }

        let mut states = self.states();
        if !states.is_empty() {
            // Stable sort keeps table (alphabetical) order among equal rates.
            states.sort_by(|a, b| b.1.total_cmp(&a.1));
            let names: Vec<&str> = states.iter().map(|s| s.0.as_str()).collect();
            let top3 = names.iter().take(3).copied().collect::<Vec<_>>().join(", ");
            let top2 = names.iter().take(2).copied().collect::<Vec<_>>().join(", ");
            out.push(Insight {
                insight: format!("Top states ({top3}) show 2-3x adoption vs bottom states"),
                implication: "Sequence expansion: Consolidate leadership in top states → tier-2 cities in mid-tier states → selective bottom state pilots".into(),
                metric_impact: "Phased expansion reduces burn rate by 40-50% vs uniform rollout".into(),
                priority: Priority::High,
                product_action: format!(
                    "Double down on {top2} while piloting in emerging markets"
                ),
            });
        }

        out.sort_by_key(|i| i.priority);
        out.truncate(MAX_INSIGHTS);
        out
    }

    /// Rank states by opportunity score and split them into tiers of 8, 10 and the rest.
    pub fn expansion_strategy(&self) -> Option<ExpansionStrategy> {
        let states = self.states();
        if states.is_empty() {
            return None;
        }
        let rates: Vec<f64> = states.iter().map(|s| s.1).collect();
        let sizes: Vec<f64> = states.iter().map(|s| s.2 as f64).collect();
        let pen_rank = average_ranks_desc(&rates);
        let size_rank = average_ranks_desc(&sizes);

        let mut scores: Vec<StateOpportunity> = states
            .into_iter()
            .enumerate()
            .map(|(i, (state, rate, sample_size))| StateOpportunity {
                state,
                rate,
                sample_size,
                penetration_rank: pen_rank[i],
                sample_size_rank: size_rank[i],
                score: 0.6 * (100.0 - pen_rank[i]) + 0.4 * (100.0 - size_rank[i]),
            })
            .collect();
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));

        let names: Vec<String> = scores.iter().map(|s| s.state.clone()).collect();
        let t1 = names.len().min(TIER_1_SIZE);
        let t2 = names.len().min(TIER_1_SIZE + TIER_2_SIZE);
        Some(ExpansionStrategy {
            tier_1_states: names[..t1].to_vec(),
            tier_2_states: names[t1..t2].to_vec(),
            tier_3_states: names[t2..].to_vec(),
            scores,
            rationale: TierRationale::default(),
        })
    }

    /// Stocking recommendation per category from the single/small skew.
    pub fn merchandising_matrix(&self) -> Vec<MerchandisingRow> {
        self.results
            .h2
            .categories
            .iter()
            .map(|c| {
                let (single, family) = if c.single_small_skew > OVER_INDEX {
                    (StockLevel::High, StockLevel::Standard)
                } else if c.single_small_skew < UNDER_INDEX {
                    (StockLevel::Low, StockLevel::High)
                } else {
                    (StockLevel::Standard, StockLevel::Standard)
                };
                MerchandisingRow {
                    category: display_category(&c.category),
                    single_hh_areas: single,
                    family_hh_areas: family,
                    single_skew: c.single_small_skew,
                    family_skew: c.family_skew,
                }
            })
            .collect()
    }
}

/// The fixed feature backlog, highest priority score first.
pub fn feature_prioritization() -> Vec<FeaturePriority> {
    let mut features = vec![
        FeaturePriority {
            feature: "Quick Singles Category".into(),
            description: "Curated section for 1-2 person households with single-serve items, meal kits, ready-to-eat".into(),
            target_segment: "Single/Small Households".into(),
            expected_impact: "Increase conversion by 20-30% in target segment".into(),
            effort: Effort::Medium,
            priority_score: 9.0,
        },
        FeaturePriority {
            feature: "Family Essentials Subscription".into(),
            description: "Monthly subscription for household staples with bulk discounts and predictive reordering".into(),
            target_segment: "Family Households (4+ members)".into(),
            expected_impact: "Increase LTV by 40-50% through subscription lock-in".into(),
            effort: Effort::High,
            priority_score: 8.5,
        },
        FeaturePriority {
            feature: "Assisted First-Order Flow".into(),
            description: "Simplified, low-bandwidth onboarding for first-time internet users with phone/WhatsApp support".into(),
            target_segment: "New internet users, lower digital literacy".into(),
            expected_impact: "Expand TAM by 15-20% in tier-2/3 cities".into(),
            effort: Effort::Medium,
            priority_score: 8.0,
        },
        FeaturePriority {
            feature: "Micro-Market Assortment Optimization".into(),
            description: "Dynamically adjust inventory based on neighborhood household composition (bachelor vs family)".into(),
            target_segment: "All segments".into(),
            expected_impact: "Reduce stockouts by 30%, increase basket size by 15%".into(),
            effort: Effort::High,
            priority_score: 7.5,
        },
    ];
    features.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    features
}

fn display_category(name: &str) -> String {
    name.strip_prefix(ONLINE_PREFIX).unwrap_or(name).to_string()
}

/// 1-based ranks with the largest value first; ties get the mean of the ranks they span.
pub fn average_ranks_desc(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].partial_cmp(&values[a]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j (0-based) share ranks i+1..=j.
        let avg = (i + 1 + j) as f64 / 2.0;
        for &k in &order[i..j] {
            ranks[k] = avg;
        }
        i = j;
    }
    ranks
}
