//! # hs-inference
//!
//! Statistical core of housestat. Every entry point takes the household table
//! by shared reference and returns a fixed-shape result record; missing
//! columns and degenerate statistics are reported inside the result rather
//! than as errors.
//!
//! - [`penetration`]: weighted / unweighted purchase penetration by group
//! - [`hypotest`]: H1 (size vs adoption), H2 (category skew), H3 (internet mediation)
//! - [`modeler`]: standardized L2 logistic regression with odds ratios
//! - [`analysis`]: runs everything and bundles it into [`AnalysisResults`]

#![warn(missing_docs)]

pub mod analysis;
pub mod hypotest;
pub mod modeler;
pub mod optimizer;
pub mod penetration;
pub mod regression;

pub use analysis::{AnalysisResults, run_full_analysis};
pub use hypotest::{
    CategorySkew, H1Conclusion, H1Result, H2Conclusion, H2Finding, H2Result, H3Conclusion,
    H3Result, HypothesisId, HypothesisTester,
};
pub use modeler::{FeatureEffect, ModelResult, ModelStatus, StatisticalModeler};
pub use optimizer::{LbfgsOptimizer, ObjectiveFunction, OptimizationResult, OptimizerConfig};
pub use penetration::{GroupKey, KeyPart, PenetrationRow, PenetrationTable, penetration};
pub use regression::{LogisticFit, PenalizedLogisticRegression};
