//! Synthetic household survey generator.
//!
//! Reproduces the broad structure of a consumption survey: urbanisation and
//! internet access rise with a state's development index, urban households are
//! smaller, and small connected households buy online more often. Category
//! flags are only drawn for households that made an online purchase.

use hs_core::{Column, Error, HouseholdRecord, HouseholdTable, Result, Schema, TableBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Major states used by default, in survey order.
pub const DEFAULT_STATES: [&str; 28] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
];

/// Category columns produced by the generator.
pub const CATEGORY_COLUMNS: [&str; 4] =
    ["Online_Food", "Online_Medicine", "Online_Consumables", "Online_Electronics"];

/// Household size probabilities for sizes 1..=8.
const URBAN_SIZE_P: [f64; 8] = [0.15, 0.20, 0.25, 0.20, 0.12, 0.05, 0.02, 0.01];
const RURAL_SIZE_P: [f64; 8] = [0.05, 0.10, 0.20, 0.25, 0.20, 0.12, 0.05, 0.03];

/// Regional development index in `[0, 1]`; unknown states get 0.5.
pub fn development_index(state: &str) -> f64 {
    match state {
        "Kerala" | "NCT of Delhi" => 0.9,
        "Goa" | "Chandigarh" => 0.85,
        "Tamil Nadu" | "Karnataka" | "Maharashtra" => 0.8,
        "Telangana" | "Gujarat" | "Haryana" | "Puducherry" => 0.75,
        "Punjab" | "Himachal Pradesh" => 0.7,
        "Uttarakhand" | "Andhra Pradesh" | "Sikkim" | "Andaman and Nicobar Islands" => 0.65,
        "West Bengal" | "Mizoram" | "Dadra and Nagar Haveli and Daman and Diu" => 0.6,
        "Rajasthan" | "Manipur" | "Jammu and Kashmir" => 0.55,
        "Bihar" | "Jharkhand" | "Arunachal Pradesh" => 0.45,
        _ => 0.5,
    }
}

/// Configuration for [`SampleDataSynthesizer`].
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// States to generate households for.
    pub states: Vec<String>,
    /// Households per state are drawn uniformly from `[min, max)`.
    pub households_per_state: (usize, usize),
    /// Survey weights are drawn uniformly from `[min, max)`.
    pub weight_range: (f64, f64),
    /// Seed used by [`generate_sample_dataset`].
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            states: DEFAULT_STATES.iter().map(|s| s.to_string()).collect(),
            households_per_state: (200, 500),
            weight_range: (50.0, 200.0),
            seed: 42,
        }
    }
}

impl SynthConfig {
    fn validate(&self) -> Result<()> {
        if self.states.is_empty() {
            return Err(Error::Validation("states must not be empty".into()));
        }
        let (lo, hi) = self.households_per_state;
        if lo == 0 || lo >= hi {
            return Err(Error::Validation(format!(
                "households_per_state must satisfy 0 < min < max, got ({lo}, {hi})"
            )));
        }
        let (wlo, whi) = self.weight_range;
        if !(wlo.is_finite() && whi.is_finite() && 0.0 < wlo && wlo < whi) {
            return Err(Error::Validation(format!(
                "weight_range must satisfy 0 < min < max, got ({wlo}, {whi})"
            )));
        }
        Ok(())
    }
}

/// Seeded synthetic survey generator.
#[derive(Debug, Clone, Default)]
pub struct SampleDataSynthesizer {
    config: SynthConfig,
}

impl SampleDataSynthesizer {
    /// Create a generator after validating `config`.
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Schema of every generated table.
    pub fn schema() -> Schema {
        let mut cols = vec![
            Column::Id,
            Column::State,
            Column::Urban,
            Column::HouseholdSize,
            Column::InternetAccess,
            Column::OnlinePurchase,
        ];
        cols.extend(CATEGORY_COLUMNS.iter().map(|c| Column::Category(c.to_string())));
        cols.push(Column::SampleWeight);
        Schema::new(cols)
    }

    /// Generate a table drawing every random number from `rng`.
    ///
    /// The same generator state always produces the same table.
    pub fn generate(&self, rng: &mut impl Rng) -> Result<HouseholdTable> {
        let (lo, hi) = self.config.households_per_state;
        let (wlo, whi) = self.config.weight_range;
        let mut builder = TableBuilder::new(Self::schema());
        let mut next_id = 1u64;

        for state in &self.config.states {
            let dev = development_index(state);
            let n_households = rng.random_range(lo..hi);

            for _ in 0..n_households {
                // Urbanisation grows with development.
                let urban = rng.random::<f64>() < 0.3 + dev * 0.3;

                // Urban households skew smaller.
                let probs = if urban { &URBAN_SIZE_P } else { &RURAL_SIZE_P };
                let size = draw_size(rng.random::<f64>(), probs);

                let internet_p = 0.3 + (if urban { 0.4 } else { 0.0 }) + dev * 0.2;
                let internet = rng.random::<f64>() < internet_p;

                // Online purchase depends on connectivity first, then household size.
                let purchase_p = if internet {
                    0.4 + (if size <= 2 { 0.3 } else { 0.0 }) + dev * 0.2
                } else {
                    0.05
                };
                let purchase = rng.random::<f64>() < purchase_p;

                let categories = if purchase {
                    let food = rng.random::<f64>() < if size <= 2 { 0.7 } else { 0.5 };
                    let medicine = rng.random::<f64>() < 0.4;
                    let consumables = rng.random::<f64>() < if size >= 4 { 0.5 } else { 0.3 };
                    let electronics = rng.random::<f64>() < 0.3;
                    vec![Some(food), Some(medicine), Some(consumables), Some(electronics)]
                } else {
                    vec![Some(false); CATEGORY_COLUMNS.len()]
                };

                let weight = rng.random_range(wlo..whi);

                builder.push(HouseholdRecord {
                    id: next_id,
                    state: Some(state.clone()),
                    urban: Some(urban),
                    household_size: Some(size),
                    internet_access: Some(internet),
                    online_purchase: Some(purchase),
                    categories,
                    sample_weight: Some(weight),
                })?;
                next_id += 1;
            }
        }

        let table = builder.finish();
        tracing::info!(
            households = table.len(),
            states = self.config.states.len(),
            "synthesized sample dataset"
        );
        Ok(table)
    }
}

/// Inverse-CDF draw of a household size in `1..=probs.len()`.
fn draw_size(u: f64, probs: &[f64]) -> u32 {
    let mut acc = 0.0;
    for (i, p) in probs.iter().enumerate() {
        acc += p;
        if u < acc {
            return i as u32 + 1;
        }
    }
    probs.len() as u32
}

/// Generate a table with a fresh `StdRng` seeded from `config.seed`.
pub fn generate_sample_dataset(config: &SynthConfig) -> Result<HouseholdTable> {
    let synth = SampleDataSynthesizer::new(config.clone())?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    synth.generate(&mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> SynthConfig {
        SynthConfig {
            states: vec!["Kerala".into(), "Bihar".into(), "Goa".into()],
            households_per_state: (200, 300),
            seed,
            ..SynthConfig::default()
        }
    }

    #[test]
    fn test_draw_size_inverse_cdf() {
        assert_eq!(draw_size(0.0, &URBAN_SIZE_P), 1);
        assert_eq!(draw_size(0.149, &URBAN_SIZE_P), 1);
        assert_eq!(draw_size(0.15, &URBAN_SIZE_P), 2);
        assert_eq!(draw_size(0.999_999, &URBAN_SIZE_P), 8);
        assert_eq!(draw_size(1.0, &RURAL_SIZE_P), 8);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        assert!((URBAN_SIZE_P.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((RURAL_SIZE_P.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_table() {
        let a = generate_sample_dataset(&small_config(7)).unwrap();
        let b = generate_sample_dataset(&small_config(7)).unwrap();
        assert_eq!(a, b);
        let c = generate_sample_dataset(&small_config(8)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_generated_rows_are_consistent() {
        let t = generate_sample_dataset(&small_config(42)).unwrap();
        assert!(t.len() >= 600 && t.len() < 900);
        for (i, r) in t.iter().enumerate() {
            assert_eq!(r.id, i as u64 + 1);
            let size = r.household_size.unwrap();
            assert!((1..=8).contains(&size));
            let w = r.sample_weight.unwrap();
            assert!((50.0..200.0).contains(&w));
            if r.online_purchase == Some(false) {
                assert!(r.categories.iter().all(|c| *c == Some(false)));
            }
        }
        assert_eq!(t.schema().categories(), CATEGORY_COLUMNS.to_vec());
    }

    #[test]
    fn test_internet_drives_purchase() {
        let t = generate_sample_dataset(&small_config(3)).unwrap();
        let rate = |internet: bool| {
            let rows: Vec<_> = t.iter().filter(|r| r.internet_access == Some(internet)).collect();
            rows.iter().filter(|r| r.online_purchase == Some(true)).count() as f64
                / rows.len() as f64
        };
        assert!(rate(true) > 0.4);
        assert!(rate(false) < 0.15);
    }

    #[test]
    fn test_invalid_config() {
        let cfg = SynthConfig { states: vec![], ..SynthConfig::default() };
        assert!(SampleDataSynthesizer::new(cfg).is_err());
        let cfg = SynthConfig { households_per_state: (10, 10), ..SynthConfig::default() };
        assert!(SampleDataSynthesizer::new(cfg).is_err());
    }
}
