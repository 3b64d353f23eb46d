use approx::assert_relative_eq;
use chrono::NaiveDate;
use hs_data::{SynthConfig, generate_sample_dataset};
use hs_inference::{AnalysisResults, run_full_analysis};
use hs_insights::{InsightsGenerator, MemoWriter, render_memo};

fn results_for(states: usize) -> AnalysisResults {
    let cfg = SynthConfig {
        states: SynthConfig::default().states.into_iter().take(states).collect(),
        households_per_state: (60, 120),
        ..SynthConfig::default()
    };
    let table = generate_sample_dataset(&cfg).expect("synthesize");
    run_full_analysis(&table)
}

#[test]
fn insights_are_capped_and_sorted_by_priority() {
    let results = results_for(28);
    let insights = InsightsGenerator::new(&results).generate_all_insights();
    assert!(insights.len() <= 5);
    assert!(insights.windows(2).all(|w| w[0].priority <= w[1].priority));
}

#[test]
fn expansion_tiers_split_8_10_rest() {
    let results = results_for(28);
    let plan = InsightsGenerator::new(&results).expansion_strategy().expect("states present");
    assert_eq!(plan.tier_1_states.len(), 8);
    assert_eq!(plan.tier_2_states.len(), 10);
    assert_eq!(plan.tier_3_states.len(), 10);
    assert_eq!(plan.scores.len(), 28);
    assert!(plan.scores.windows(2).all(|w| w[0].score >= w[1].score));
    for s in &plan.scores {
        assert_relative_eq!(
            s.score,
            0.6 * (100.0 - s.penetration_rank) + 0.4 * (100.0 - s.sample_size_rank),
            epsilon = 1e-12
        );
    }
}

#[test]
fn few_states_fill_tier_one_only() {
    let results = results_for(5);
    let plan = InsightsGenerator::new(&results).expansion_strategy().expect("states present");
    assert_eq!(plan.tier_1_states.len(), 5);
    assert!(plan.tier_2_states.is_empty());
    assert!(plan.tier_3_states.is_empty());
}

#[test]
fn merchandising_has_one_row_per_category() {
    let results = results_for(6);
    let rows = InsightsGenerator::new(&results).merchandising_matrix();
    let names: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(names, vec!["Food", "Medicine", "Consumables", "Electronics"]);
}

#[test]
fn memo_quotes_generated_insights() {
    let results = results_for(10);
    let insights = InsightsGenerator::new(&results).generate();
    let date = NaiveDate::from_ymd_opt(2025, 1, 15).expect("date");
    let memo = render_memo(&insights, date);
    assert!(memo.starts_with("# Product Discovery: Household Structure & E-commerce Adoption"));
    assert!(memo.contains("January 15, 2025"));
    for (i, ins) in insights.insights.iter().enumerate() {
        assert!(memo.contains(&format!("### Insight #{}: {}", i + 1, ins.insight)));
    }
    for f in &insights.features {
        assert!(memo.contains(&f.feature));
    }
}

#[test]
fn memo_writer_creates_parent_dirs() {
    let results = results_for(4);
    let insights = InsightsGenerator::new(&results).generate();
    let dir = std::env::temp_dir().join(format!("hs_insights_memo_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("product_memo.md");
    let date = NaiveDate::from_ymd_opt(2025, 1, 15).expect("date");
    let text = MemoWriter::new(&insights).with_date(date).write(&path).expect("write");
    assert_eq!(std::fs::read_to_string(&path).expect("read"), text);
    let _ = std::fs::remove_dir_all(&dir);
}
