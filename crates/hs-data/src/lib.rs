//! Household survey data for housestat.
//!
//! - [`io`]: read CSV/TSV into a [`hs_core::HouseholdTable`] and write it back
//! - [`clean`]: state-name standardization, lenient binary parsing, row
//!   validation and the data-quality report
//! - [`synth`]: seeded synthetic survey generator

pub mod clean;
pub mod io;
pub mod synth;

pub use clean::{CleanOptions, CleanOutcome, DataQualityReport, clean_table, quality_report};
pub use io::{delimiter_for, read_table, write_csv, write_table};
pub use synth::{SampleDataSynthesizer, SynthConfig, generate_sample_dataset};
