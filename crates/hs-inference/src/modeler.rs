//! Interpretable logistic model of online purchase.
//!
//! `P(Online_Purchase) ~ Household_Size + Internet_Access + Urban`, using
//! whichever of the three features the table carries. Features are
//! standardized so coefficients are comparable across features.

use hs_core::{Column, HouseholdRecord, HouseholdTable};
use hs_prob::descriptive::{mean, population_std};
use serde::{Deserialize, Serialize};

use crate::optimizer::OptimizerConfig;
use crate::regression::PenalizedLogisticRegression;

/// Candidate features in model order.
pub const FEATURES: [Column; 3] = [Column::HouseholdSize, Column::InternetAccess, Column::Urban];

/// Inverse L2 regularization strength.
pub const INVERSE_REGULARIZATION: f64 = 1.0;

/// Fit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    /// Model fitted.
    Fitted,
    /// Target absent or none of the features present.
    InsufficientFeatures,
    /// No complete rows, or only one outcome class.
    InsufficientData,
}

/// Effect of one standardized feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEffect {
    /// Column name, e.g. `Household_Size`.
    pub feature: String,
    /// Coefficient per standard deviation of the feature.
    pub coefficient: f64,
    /// `exp(coefficient)`.
    pub odds_ratio: f64,
    /// Standard error of `coefficient`, when the Hessian is invertible.
    pub std_error: Option<f64>,
    /// Feature mean used for standardization.
    pub mean: f64,
    /// Feature scale used for standardization.
    pub scale: f64,
}

/// Result of [`StatisticalModeler::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    /// Fit outcome.
    pub status: ModelStatus,
    /// Per-feature effects, in [`FEATURES`] order.
    pub features: Vec<FeatureEffect>,
    /// Intercept on the log-odds scale.
    pub intercept: Option<f64>,
    /// In-sample accuracy (predict 1 when p >= 0.5).
    pub accuracy: Option<f64>,
    /// Complete rows used.
    pub n_samples: usize,
    /// Optimizer convergence flag.
    pub converged: bool,
    /// Plain-language reading of the odds ratios.
    pub interpretation: Vec<String>,
}

impl ModelResult {
    fn unavailable(status: ModelStatus, n_samples: usize) -> Self {
        Self {
            status,
            features: Vec::new(),
            intercept: None,
            accuracy: None,
            n_samples,
            converged: false,
            interpretation: Vec::new(),
        }
    }

    /// Effect for a feature by column name.
    pub fn feature(&self, name: &str) -> Option<&FeatureEffect> {
        self.features.iter().find(|f| f.feature == name)
    }
}

/// Fits the logistic sensitivity model over a borrowed table.
#[derive(Debug, Clone)]
pub struct StatisticalModeler<'a> {
    table: &'a HouseholdTable,
    config: OptimizerConfig,
}

fn feature_value(rec: &HouseholdRecord, col: &Column) -> Option<f64> {
    let flag = |b: Option<bool>| b.map(|v| if v { 1.0 } else { 0.0 });
    match col {
        Column::HouseholdSize => rec.household_size.map(f64::from),
        Column::InternetAccess => flag(rec.internet_access),
        Column::Urban => flag(rec.urban),
        _ => None,
    }
}

impl<'a> StatisticalModeler<'a> {
    /// Wrap a table with default optimizer settings.
    pub fn new(table: &'a HouseholdTable) -> Self {
        Self { table, config: OptimizerConfig::default() }
    }

    /// Override optimizer settings.
    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Fit the model.
    pub fn fit(&self) -> ModelResult {
        let t = self.table;
        let selected: Vec<&Column> = FEATURES.iter().filter(|c| t.has_column(c)).collect();
        if selected.is_empty() || !t.has_column(&Column::OnlinePurchase) {
            tracing::warn!("model skipped: insufficient features");
            return ModelResult::unavailable(ModelStatus::InsufficientFeatures, 0);
        }

        // Listwise deletion over selected features and target.
        let mut raw: Vec<Vec<f64>> = Vec::new();
        let mut y: Vec<u8> = Vec::new();
        for rec in t {
            let Some(target) = rec.online_purchase else { continue };
            let row: Option<Vec<f64>> = selected.iter().map(|c| feature_value(rec, c)).collect();
            if let Some(row) = row {
                raw.push(row);
                y.push(u8::from(target));
            }
        }
        let n = raw.len();
        let positives = y.iter().filter(|&&v| v == 1).count();
        if n == 0 || positives == 0 || positives == n {
            tracing::warn!(n, positives, "model skipped: insufficient data");
            return ModelResult::unavailable(ModelStatus::InsufficientData, n);
        }

        // Standardize: population std, zero spread left unscaled.
        let p = selected.len();
        let mut means = Vec::with_capacity(p);
        let mut scales = Vec::with_capacity(p);
        for j in 0..p {
            let col: Vec<f64> = raw.iter().map(|r| r[j]).collect();
            let m = mean(&col).unwrap_or(0.0);
            let s = population_std(&col).filter(|s| *s > 0.0).unwrap_or(1.0);
            means.push(m);
            scales.push(s);
        }
        let x: Vec<Vec<f64>> = raw
            .iter()
            .map(|r| r.iter().enumerate().map(|(j, v)| (v - means[j]) / scales[j]).collect())
            .collect();

        let fit = match PenalizedLogisticRegression::new(&x, y.clone(), INVERSE_REGULARIZATION)
            .and_then(|m| m.fit(self.config.clone()))
        {
            Ok(fit) => fit,
            Err(e) => {
                tracing::warn!(error = %e, "logistic fit failed");
                return ModelResult::unavailable(ModelStatus::InsufficientData, n);
            }
        };

        let mut params = Vec::with_capacity(p + 1);
        params.push(fit.intercept);
        params.extend_from_slice(&fit.coefficients);
        let correct = x
            .iter()
            .zip(&y)
            .filter(|(row, t)| {
                let pred = PenalizedLogisticRegression::predict_proba(&params, row) >= 0.5;
                pred == (**t == 1)
            })
            .count();

        let features: Vec<FeatureEffect> = selected
            .iter()
            .enumerate()
            .map(|(j, c)| FeatureEffect {
                feature: c.name().to_string(),
                coefficient: fit.coefficients[j],
                odds_ratio: fit.coefficients[j].exp(),
                std_error: fit.std_errors.as_ref().map(|se| se[j + 1]),
                mean: means[j],
                scale: scales[j],
            })
            .collect();
        let interpretation = interpret(&features);
        let accuracy = correct as f64 / n as f64;
        tracing::debug!(n, accuracy, converged = fit.converged, "logistic model fitted");

        ModelResult {
            status: ModelStatus::Fitted,
            features,
            intercept: Some(fit.intercept),
            accuracy: Some(accuracy),
            n_samples: n,
            converged: fit.converged,
            interpretation,
        }
    }
}

/// Plain-language lines for the odds ratios.
pub fn interpret(features: &[FeatureEffect]) -> Vec<String> {
    let mut out = Vec::new();
    for f in features {
        let or = f.odds_ratio;
        match f.feature.as_str() {
            "Household_Size" if or < 1.0 => out.push(format!(
                "Each additional household member → {:.1}% lower odds of online purchase",
                (1.0 - or) * 100.0
            )),
            "Household_Size" => out.push(format!(
                "Each additional household member → {:.1}% higher odds of online purchase",
                (or - 1.0) * 100.0
            )),
            "Internet_Access" if or > 1.0 => out.push(format!(
                "Internet access → {:.1}% higher odds of online purchase",
                (or - 1.0) * 100.0
            )),
            "Urban" if or > 1.0 => out.push(format!(
                "Urban location → {:.1}% higher odds of online purchase",
                (or - 1.0) * 100.0
            )),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(name: &str, or: f64) -> FeatureEffect {
        FeatureEffect {
            feature: name.to_string(),
            coefficient: or.ln(),
            odds_ratio: or,
            std_error: None,
            mean: 0.0,
            scale: 1.0,
        }
    }

    #[test]
    fn test_interpretation_rules() {
        let lines = interpret(&[
            effect("Household_Size", 0.75),
            effect("Internet_Access", 2.5),
            effect("Urban", 0.9),
        ]);
        assert_eq!(
            lines,
            vec![
                "Each additional household member → 25.0% lower odds of online purchase",
                "Internet access → 150.0% higher odds of online purchase",
            ]
        );
        let lines = interpret(&[effect("Household_Size", 1.2), effect("Urban", 1.1)]);
        assert_eq!(lines[0], "Each additional household member → 20.0% higher odds of online purchase");
        assert_eq!(lines[1], "Urban location → 10.0% higher odds of online purchase");
    }

    #[test]
    fn test_missing_target_is_insufficient_features() {
        let schema = hs_core::Schema::new([Column::Id, Column::HouseholdSize]);
        let t = hs_core::TableBuilder::new(schema).finish();
        let r = StatisticalModeler::new(&t).fit();
        assert_eq!(r.status, ModelStatus::InsufficientFeatures);
        assert!(r.features.is_empty());
    }

    #[test]
    fn test_single_class_is_insufficient_data() {
        let schema = hs_core::Schema::new([Column::Id, Column::Urban, Column::OnlinePurchase]);
        let mut b = hs_core::TableBuilder::new(schema);
        for i in 0..5 {
            b.push(HouseholdRecord {
                urban: Some(i % 2 == 0),
                online_purchase: Some(true),
                ..HouseholdRecord::new(i)
            })
            .unwrap();
        }
        let t = b.finish();
        let r = StatisticalModeler::new(&t).fit();
        assert_eq!(r.status, ModelStatus::InsufficientData);
        assert_eq!(r.n_samples, 5);
    }
}
