//! Cleaning and validation of loaded survey tables.

use std::collections::{BTreeMap, BTreeSet};

use hs_core::{Column, HouseholdRecord, HouseholdTable, Result, TableBuilder};
use serde::{Deserialize, Serialize};

/// Known spelling variants of state / union territory names.
const STATE_ALIASES: &[(&str, &str)] = &[
    ("Andaman & Nicobar Islands", "Andaman and Nicobar Islands"),
    ("Andaman and Nicobar", "Andaman and Nicobar Islands"),
    ("A & N Islands", "Andaman and Nicobar Islands"),
    ("Dadra & Nagar Haveli and Daman & Diu", "Dadra and Nagar Haveli and Daman and Diu"),
    ("D & N Haveli and Daman & Diu", "Dadra and Nagar Haveli and Daman and Diu"),
    ("Jammu & Kashmir", "Jammu and Kashmir"),
    ("Delhi", "NCT of Delhi"),
    ("Orissa", "Odisha"),
    ("Pondicherry", "Puducherry"),
];

/// Columns whose absence makes the remaining analysis much weaker.
const KEY_COLUMNS: [Column; 4] =
    [Column::State, Column::HouseholdSize, Column::InternetAccess, Column::OnlinePurchase];

/// Trim and map a state name onto its canonical spelling.
pub fn standardize_state_name(raw: &str) -> String {
    let s = raw.trim();
    STATE_ALIASES.iter().find(|(alias, _)| *alias == s).map_or(s, |(_, canon)| *canon).to_string()
}

/// Parse a binary survey answer.
///
/// Accepts `Yes/No`, `Y/N`, `TRUE/FALSE`, `True/False` and numeric `1/0`
/// (including `1.0`/`0.0`). Anything else, and the empty cell, is missing.
pub fn parse_binary(raw: &str) -> Option<bool> {
    match raw.trim() {
        "Yes" | "Y" | "TRUE" | "True" | "true" | "1" => Some(true),
        "No" | "N" | "FALSE" | "False" | "false" | "0" => Some(false),
        other => match other.parse::<f64>() {
            Ok(v) if v == 1.0 => Some(true),
            Ok(v) if v == 0.0 => Some(false),
            _ => None,
        },
    }
}

/// Options for [`clean_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// Rewrite state names through the alias table.
    pub standardize_states: bool,
    /// Drop rows missing `State` or `Household_Size` (when those columns exist).
    pub drop_invalid: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self { standardize_states: true, drop_invalid: true }
    }
}

/// Result of [`clean_table`].
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    /// The cleaned table.
    pub table: HouseholdTable,
    /// Rows removed as invalid.
    pub removed: usize,
    /// Rows whose state name was rewritten.
    pub renamed_states: usize,
}

/// Produce a cleaned copy of `table`. The input is not modified.
pub fn clean_table(table: &HouseholdTable, opts: &CleanOptions) -> Result<CleanOutcome> {
    let schema = table.schema();
    let check_state = opts.drop_invalid && schema.has(&Column::State);
    let check_size = opts.drop_invalid && schema.has(&Column::HouseholdSize);

    let mut builder = TableBuilder::with_capacity(schema.clone(), table.len());
    let mut removed = 0usize;
    let mut renamed_states = 0usize;

    for rec in table {
        if (check_state && rec.state.is_none()) || (check_size && rec.household_size.is_none()) {
            removed += 1;
            continue;
        }
        let mut out: HouseholdRecord = rec.clone();
        if let Some(state) = rec.state.as_deref().filter(|_| opts.standardize_states) {
            let canon = standardize_state_name(state);
            if canon != state {
                renamed_states += 1;
            }
            out.state = Some(canon);
        }
        builder.push(out)?;
    }

    tracing::info!(removed, renamed_states, kept = builder.len(), "cleaned household table");
    Ok(CleanOutcome { table: builder.finish(), removed, renamed_states })
}

/// Summary of table completeness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityReport {
    /// Row count.
    pub total_records: usize,
    /// Missing cells per stored column (only columns present in the table).
    pub missing_values: BTreeMap<String, usize>,
    /// Distinct non-missing state names.
    pub unique_states: usize,
    /// Survey round the data describes.
    pub survey: String,
    /// Which of State, Household_Size, Internet_Access, Online_Purchase exist.
    pub key_columns_present: Vec<String>,
}

/// Build a [`DataQualityReport`] for `table`.
pub fn quality_report(table: &HouseholdTable) -> DataQualityReport {
    let schema = table.schema();
    let mut missing_values = BTreeMap::new();
    for col in schema.columns() {
        let n = match col {
            Column::Id => 0,
            _ => table.iter().filter(|r| schema.value(r, col).is_none()).count(),
        };
        missing_values.insert(col.name().to_string(), n);
    }
    let unique_states: BTreeSet<&str> = table.iter().filter_map(|r| r.state.as_deref()).collect();
    DataQualityReport {
        total_records: table.len(),
        missing_values,
        unique_states: unique_states.len(),
        survey: "HCES 2022-23".to_string(),
        key_columns_present: KEY_COLUMNS
            .iter()
            .filter(|c| schema.has(c))
            .map(|c| c.name().to_string())
            .collect(),
    }
}
