//! # hs-insights
//!
//! Turns [`hs_inference::AnalysisResults`] into product-facing output:
//! prioritized insights, a state expansion plan, a category merchandising
//! matrix, a feature backlog, and the markdown product memo.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod insights;
pub mod memo;

pub use insights::{
    Effort, ExpansionStrategy, FeaturePriority, Headline, Insight, InsightsGenerator,
    MerchandisingRow, Priority, ProductInsights, StateOpportunity, StockLevel, TierRationale,
};
pub use memo::{MemoWriter, render_memo};
