use hs_core::{Column, HouseholdRecord, HouseholdTable, Schema, TableBuilder};
use hs_data::{SynthConfig, generate_sample_dataset};
use hs_inference::{
    H1Conclusion, H3Conclusion, HypothesisTester, ModelStatus, StatisticalModeler,
    run_full_analysis,
};
use hs_prob::descriptive::pearson;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn size_only_table(seed: u64, n: usize) -> HouseholdTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let schema = Schema::new([Column::Id, Column::HouseholdSize, Column::OnlinePurchase]);
    let mut b = TableBuilder::new(schema);
    for i in 0..n {
        let size: u32 = rng.random_range(1..=6);
        let purchase = size <= 2 && rng.random::<f64>() < 0.8;
        b.push(HouseholdRecord {
            household_size: Some(size),
            online_purchase: Some(purchase),
            ..HouseholdRecord::new(i as u64 + 1)
        })
        .unwrap();
    }
    b.finish()
}

#[test]
fn small_households_buying_online_supports_h1() {
    let t = size_only_table(20240601, 1000);
    let h1 = HypothesisTester::new(&t).test_h1();

    let r = h1.correlation.expect("correlation defined");
    let p = h1.correlation_p_value.expect("p-value defined");
    assert!(r < -0.5, "r = {r}");
    assert!(p < 0.01, "p = {p}");
    assert_eq!(h1.conclusion, H1Conclusion::Supported);
    assert_eq!(h1.conclusion.label(), "supported (negative association)");
    assert!(h1.summary.starts_with("H1 SUPPORTED"));

    // Same number as a direct Pearson computation.
    let (x, y): (Vec<f64>, Vec<f64>) = t
        .iter()
        .map(|r| {
            (f64::from(r.household_size.unwrap()), if r.online_purchase.unwrap() { 1.0 } else { 0.0 })
        })
        .unzip();
    assert!((pearson(&x, &y).unwrap() - r).abs() < 1e-12);

    let chi_p = h1.chi_square_p_value.unwrap();
    assert!(chi_p < 0.01);
    assert_eq!(h1.chi_square_dof, Some(5));
    assert_eq!(h1.penetration_by_size.total_sample_size(), 1000);
}

#[test]
fn model_with_only_household_size_reports_one_feature() {
    let t = size_only_table(7, 400);
    let m = StatisticalModeler::new(&t).fit();
    assert_eq!(m.status, ModelStatus::Fitted);
    assert_eq!(m.features.len(), 1);
    let size = m.feature("Household_Size").unwrap();
    assert!(size.odds_ratio < 1.0, "odds ratio {}", size.odds_ratio);
    assert!((size.odds_ratio - size.coefficient.exp()).abs() < 1e-12);
    assert_eq!(m.n_samples, 400);
    assert_eq!(m.interpretation.len(), 1);
    assert!(m.interpretation[0].contains("lower odds"));
    let acc = m.accuracy.unwrap();
    assert!((0.5..=1.0).contains(&acc));
}

#[test]
fn no_connected_households_leaves_h3_insufficient() {
    let schema = Schema::new([
        Column::Id,
        Column::HouseholdSize,
        Column::InternetAccess,
        Column::OnlinePurchase,
    ]);
    let mut b = TableBuilder::new(schema);
    for i in 0..50u32 {
        b.push(HouseholdRecord {
            household_size: Some(1 + i % 6),
            internet_access: Some(false),
            online_purchase: Some(i % 3 == 0),
            ..HouseholdRecord::new(u64::from(i))
        })
        .unwrap();
    }
    let t = b.finish();
    let h3 = HypothesisTester::new(&t).test_h3();
    assert_eq!(h3.correlation_with_internet, None);
    assert!(h3.correlation_without_internet.is_some());
    assert_eq!(h3.conclusion, H3Conclusion::InsufficientData);
    assert_eq!(h3.n_with_internet, 0);
    assert!(h3.penetration_with_internet.is_empty());
    assert_eq!(h3.penetration_without_internet.total_sample_size(), 50);
}

#[test]
fn full_analysis_on_synthetic_survey() {
    let table = generate_sample_dataset(&SynthConfig::default()).unwrap();
    let results = run_full_analysis(&table);

    assert_eq!(results.data_quality.total_records, table.len());
    assert_eq!(results.state_penetration.len(), 28);
    assert_eq!(results.state_penetration.total_sample_size(), table.len());
    assert_eq!(results.household_size_penetration.len(), 4);
    assert_eq!(results.urban_rural_penetration.len(), 2);
    assert_eq!(results.internet_penetration.len(), 2);
    let overall = results.overall_rate().unwrap();
    assert!((0.0..=1.0).contains(&overall));

    // The generator makes small connected households buy more.
    assert!(results.h1.correlation.unwrap() < 0.0);
    assert_eq!(results.h2.categories.len(), 4);
    assert!(results.h3.correlation_with_internet.is_some());
    assert_eq!(results.model.status, ModelStatus::Fitted);
    assert_eq!(results.model.features.len(), 3);
    let internet = results.model.feature("Internet_Access").unwrap();
    assert!(internet.odds_ratio > 1.0);

    let json = results.to_json_pretty().unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["h1"]["id"], "H1");
    assert_eq!(v["model"]["status"], "fitted");
    assert_eq!(v["overall_penetration"]["rows"][0]["key"], "Overall");
}
