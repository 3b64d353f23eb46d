//! Statistics building blocks for housestat.
//!
//! - descriptive statistics and Pearson correlation
//! - Student-t significance of a correlation coefficient
//! - chi-square test of independence on contingency tables
//! - small numerically-stable math helpers for the logistic model

pub mod chi_squared;
pub mod descriptive;
pub mod math;
pub mod student_t;
