//! Markdown product memo.

use std::path::Path;

use chrono::NaiveDate;

use crate::insights::{ExpansionStrategy, MerchandisingRow, ProductInsights};

/// States listed per tier in the memo.
const TIER_1_SHOWN: usize = 5;
const TIER_2_SHOWN: usize = 5;
const TIER_3_SHOWN: usize = 3;

/// Writes the product memo for one set of insights.
#[derive(Debug, Clone)]
pub struct MemoWriter<'a> {
    insights: &'a ProductInsights,
    date: NaiveDate,
}

impl<'a> MemoWriter<'a> {
    /// Memo dated today (local time).
    pub fn new(insights: &'a ProductInsights) -> Self {
        Self { insights, date: chrono::Local::now().date_naive() }
    }

    /// Override the memo date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Markdown text.
    pub fn render(&self) -> String {
        render_memo(self.insights, self.date)
    }

    /// Render and write to `path`, creating parent directories. Returns the text.
    pub fn write(&self, path: &Path) -> hs_core::Result<String> {
        let memo = self.render();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, &memo)?;
        tracing::info!(path = %path.display(), bytes = memo.len(), "product memo written");
        Ok(memo)
    }
}

/// Render the memo for `insights` dated `date`.
pub fn render_memo(insights: &ProductInsights, date: NaiveDate) -> String {
    let mut m = String::with_capacity(16 * 1024);
    header(&mut m, date);
    executive_summary(&mut m, insights);
    problem_framing(&mut m, insights);
    key_insights(&mut m, insights);

    m.push_str("## Strategic Recommendations\n\n### 1. Market Expansion Strategy\n\n");
    match &insights.expansion {
        Some(e) => expansion(&mut m, e),
        None => m.push_str("No state-level penetration was available for tiering.\n\n"),
    }
    m.push_str("---\n\n### 2. Merchandising Strategy\n\n");
    m.push_str("#### Category Prioritization by Neighborhood Type\n\n");
    merchandising(&mut m, &insights.merchandising);
    m.push_str(
        "**Operational Guidance:**\n\
         - Use pin code-level household composition data to customize dark store inventory\n\
         - A/B test \"Singles Essentials\" shelf in bachelor-heavy neighborhoods\n\
         - Push bulk subscription offers in family-dominant areas\n\n---\n\n",
    );

    m.push_str("### 3. Product Feature Prioritization\n\n");
    for f in &insights.features {
        m.push_str(&format!(
            "**{}**  \n- *Description:* {}  \n- *Target:* {}  \n- *Impact:* {}  \n- *Effort:* {} | *Priority Score:* {}/10\n\n",
            f.feature,
            f.description,
            f.target_segment,
            f.expected_impact,
            f.effort.label(),
            f.priority_score
        ));
    }

    m.push_str(LIMITATIONS);
    m.push_str(NEXT_STEPS);
    m.push_str(APPENDIX);
    m
}

fn header(m: &mut String, date: NaiveDate) {
    m.push_str("# Product Discovery: Household Structure & E-commerce Adoption in India\n\n");
    m.push_str(&format!("**Date:** {}  \n", date.format("%B %d, %Y")));
    m.push_str("**Author:** Product Analytics Team  \n");
    m.push_str("**Audience:** Product Leadership, Strategy Team\n\n---\n\n");
}

fn executive_summary(m: &mut String, insights: &ProductInsights) {
    let h = &insights.headline;
    m.push_str("## Executive Summary\n\n");
    m.push_str(
        "This analysis investigates whether household composition correlates with online \
         purchasing behavior across Indian states/UTs. The objective is to inform quick-commerce \
         expansion strategy, merchandising decisions, and feature prioritization.\n\n",
    );
    if let Some(pct) = h.overall_pct {
        m.push_str(&format!(
            "Overall online purchase penetration is **{pct:.1}%** across {} households in {} states.\n\n",
            h.n_households, h.n_states
        ));
    }
    m.push_str(&format!("**Key Finding:** {}", h.h1_summary));
    match h.internet_gap_pp {
        Some(gap) => m.push_str(&format!(
            " Internet access remains the primary gatekeeper, creating a {gap:.0} percentage point adoption gap.\n\n"
        )),
        None => m.push_str(" Internet access could not be assessed from this table.\n\n"),
    }
    m.push_str(&format!("**Internet Mediation:** {}\n\n", h.h3_summary));
    m.push_str(
        "**Strategic Implication:** Pursue a **dual-track strategy**:\n\
         1. **Short-term:** Dominate bachelor-heavy neighborhoods in tier-1 cities with internet access\n\
         2. **Mid-term:** Expand family-focused offerings in tier-2 cities as internet penetration grows\n\n---\n\n",
    );
}

fn problem_framing(m: &mut String, insights: &ProductInsights) {
    let h = &insights.headline;
    m.push_str(
        "## Problem Framing\n\n### Context\n\
         - Household structures vary significantly across India (urban singles vs. joint families)\n\
         - Quick-commerce success depends on understanding micro-market demand patterns\n\
         - Need to sequence expansion and merchandising decisions based on household composition\n\n\
         ### Research Questions\n\
         1. Do smaller household sizes correlate with higher online purchase adoption?\n\
         2. How do category preferences differ between single and family households?\n\
         3. Does internet availability mediate the household structure effect?\n\n\
         ### Data Source\n\
         - MoSPI Household Consumption Expenditure Survey 2022-23 (simulated for this analysis)\n",
    );
    m.push_str(&format!(
        "- Sample dataset with {} household records across {} states\n\n",
        h.n_households, h.n_states
    ));
    m.push_str(
        "### Key Assumption\n\
         **\"Bachelor vs Family\"** is approximated using **household size proxies** (1-2 members = \
         single/small; 3+ = family). This is not a direct demographic measurement but a reasonable \
         proxy based on available data.\n\n---\n\n",
    );
}

fn key_insights(m: &mut String, insights: &ProductInsights) {
    m.push_str("## Key Insights\n\n");
    if insights.insights.is_empty() {
        m.push_str("No actionable insights cleared the reporting thresholds.\n\n---\n\n");
        return;
    }
    for (i, ins) in insights.insights.iter().enumerate() {
        m.push_str(&format!(
            "### Insight #{}: {}\n\n**Product Implication:** {}\n\n**Metric Impact:** {}\n\n**Product Action:** {}\n\n**Priority:** {}\n\n---\n\n",
            i + 1,
            ins.insight,
            ins.implication,
            ins.metric_impact,
            ins.product_action,
            ins.priority.label()
        ));
    }
}

fn expansion(m: &mut String, e: &ExpansionStrategy) {
    let tiers = [
        ("Tier 1 (Expand Aggressively)", &e.tier_1_states, TIER_1_SHOWN, &e.rationale.tier_1),
        ("Tier 2 (Selective Pilots)", &e.tier_2_states, TIER_2_SHOWN, &e.rationale.tier_2),
        ("Tier 3 (Monitor Only)", &e.tier_3_states, TIER_3_SHOWN, &e.rationale.tier_3),
    ];
    for (title, states, shown, rationale) in tiers {
        let listed: Vec<&str> = states.iter().take(shown).map(String::as_str).collect();
        let listed = if listed.is_empty() { "None".to_string() } else { listed.join(", ") };
        m.push_str(&format!("**{title}:**  \n{listed}\n\n*Rationale:* {rationale}\n\n"));
    }
}

fn merchandising(m: &mut String, rows: &[MerchandisingRow]) {
    if rows.is_empty() {
        m.push_str("No category columns were present; see analysis for details.\n\n");
        return;
    }
    m.push_str(
        "| Category | Single_HH_Areas | Family_HH_Areas | Single_Skew_Index | Family_Skew_Index |\n\
         |:---|:---|:---|:---|:---|\n",
    );
    for r in rows {
        m.push_str(&format!(
            "| {} | {} | {} | {:.2}x | {:.2}x |\n",
            r.category,
            r.single_hh_areas.label(),
            r.family_hh_areas.label(),
            r.single_skew,
            r.family_skew
        ));
    }
    m.push('\n');
}

const LIMITATIONS: &str = "---

## Limitations & Caveats

1. **Proxy Measurement:** Household size is an imperfect proxy for bachelor/family status. Actual behavioral differences may be stronger or weaker.

2. **Correlation ≠ Causation:** We observe correlations but cannot definitively establish causal relationships. Confounding factors (income, education, urbanization) may drive observed patterns.

3. **Data Constraints:** Analysis uses simulated data mimicking HCES structure. Real HCES 2022-23 unit-level data may show different patterns.

4. **Regional Heterogeneity:** State-level analysis masks intra-state variation. City-level and pin code-level analysis would provide more actionable insights.

5. **Dynamic Market:** Household composition and internet penetration are changing rapidly. Insights require quarterly updates.

---

";

const NEXT_STEPS: &str = "## Next Steps

### Immediate (0-3 months)
1. **Validate with Real Data:** Obtain actual HCES 2022-23 data and proprietary customer data
2. **Pilot \"Singles Category\":** Test in 2-3 bachelor-heavy neighborhoods in Bangalore/Delhi
3. **Analyze Own Customer Data:** Segment existing customers by estimated household type

### Short-term (3-6 months)
1. **Pin Code-Level Analysis:** Map household composition at granular level using Census + internal data
2. **A/B Test Assortment:** Compare bachelor-optimized vs. family-optimized dark stores
3. **Build Prediction Model:** Create ML model to predict household type from purchase behavior

### Long-term (6-12 months)
1. **Launch Micro-Market Optimization:** Dynamically adjust inventory by neighborhood household mix
2. **Expand Tier-2 Pilot:** Enter 3-5 tier-2 cities with clear household segmentation strategy
3. **Build Subscription Product:** Launch differentiated subscription for singles vs. families

---

";

const APPENDIX: &str = "## Appendix: Metrics Definitions

- **Online Purchase Penetration:** % of households making ≥1 online purchase in survey period
- **Category Skew Index:** (Category's share in segment) / (National average). >1.0 = over-indexing
- **Opportunity Score:** Composite metric combining current penetration and market size potential

---

**Confidential:** For internal use only
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::{
        Effort, FeaturePriority, Headline, Insight, Priority, StockLevel, TierRationale,
    };

    fn sample() -> ProductInsights {
        ProductInsights {
            headline: Headline {
                n_households: 1200,
                n_states: 3,
                overall_pct: Some(41.27),
                size_correlation: Some(-0.31),
                h1_summary: "H1 SUPPORTED: Negative correlation.".into(),
                internet_gap_pp: Some(48.6),
                h3_summary: "H3 inconclusive.".into(),
            },
            insights: vec![Insight {
                insight: "Top states (Goa) show 2-3x adoption vs bottom states".into(),
                implication: "Sequence expansion".into(),
                metric_impact: "Lower burn".into(),
                priority: Priority::High,
                product_action: "Double down on Goa while piloting in emerging markets".into(),
            }],
            expansion: Some(ExpansionStrategy {
                tier_1_states: vec!["Goa".into(), "Kerala".into()],
                tier_2_states: vec![],
                tier_3_states: vec![],
                scores: vec![],
                rationale: TierRationale::default(),
            }),
            merchandising: vec![MerchandisingRow {
                category: "Food".into(),
                single_hh_areas: StockLevel::High,
                family_hh_areas: StockLevel::Standard,
                single_skew: 1.3333,
                family_skew: 0.6667,
            }],
            features: vec![FeaturePriority {
                feature: "Quick Singles Category".into(),
                description: "d".into(),
                target_segment: "t".into(),
                expected_impact: "i".into(),
                effort: Effort::Medium,
                priority_score: 9.0,
            }],
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn memo_has_every_section() {
        let memo = render_memo(&sample(), date());
        for section in [
            "## Executive Summary",
            "## Problem Framing",
            "## Key Insights",
            "## Strategic Recommendations",
            "### 2. Merchandising Strategy",
            "### 3. Product Feature Prioritization",
            "## Limitations & Caveats",
            "## Next Steps",
            "## Appendix: Metrics Definitions",
        ] {
            assert!(memo.contains(section), "missing {section}");
        }
    }

    #[test]
    fn date_is_long_form() {
        let memo = render_memo(&sample(), date());
        assert!(memo.contains("**Date:** March 05, 2024"));
    }

    #[test]
    fn numbers_come_from_the_headline() {
        let memo = render_memo(&sample(), date());
        assert!(memo.contains("**41.3%** across 1200 households in 3 states"));
        assert!(memo.contains("49 percentage point adoption gap"));
        assert!(memo.contains("**Key Finding:** H1 SUPPORTED"));
    }

    #[test]
    fn merchandising_table_formats_skews() {
        let memo = render_memo(&sample(), date());
        let row = "| Food | HIGH STOCK - Premium placement | STANDARD STOCK | 1.33x | 0.67x |";
        assert!(memo.contains(row));
    }

    #[test]
    fn empty_tiers_say_none() {
        let memo = render_memo(&sample(), date());
        assert!(memo.contains("**Tier 1 (Expand Aggressively):**  \nGoa, Kerala"));
        assert!(memo.contains("**Tier 3 (Monitor Only):**  \nNone"));
    }

    #[test]
    fn missing_expansion_and_categories_degrade_gracefully() {
        let mut s = sample();
        s.expansion = None;
        s.merchandising.clear();
        s.headline.internet_gap_pp = None;
        let memo = render_memo(&s, date());
        assert!(memo.contains("No state-level penetration"));
        assert!(memo.contains("No category columns were present"));
        assert!(memo.contains("could not be assessed"));
    }
}
