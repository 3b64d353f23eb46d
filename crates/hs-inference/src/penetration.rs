//! Online-purchase penetration by group.
//!
//! Penetration is the (optionally weighted) share of households in a group
//! with `Online_Purchase = 1`. Groups follow the sort order of their keys and
//! rows with a missing grouping value are collected under [`KeyPart::Missing`],
//! so grouped sample sizes always add up to the table's row count.

use std::collections::BTreeMap;
use std::fmt;

use hs_core::{Column, HouseholdRecord, HouseholdTable, KeyValue};
use serde::{Deserialize, Serialize};

/// One component of a group key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPart {
    /// Observed value.
    Value(KeyValue),
    /// Missing cell; sorts after every observed value.
    Missing,
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Value(v) => write!(f, "{v}"),
            KeyPart::Missing => f.write_str("Missing"),
        }
    }
}

/// Key of a penetration row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroupKey {
    /// Whole-table aggregate.
    Overall,
    /// One part per grouping column, in `group_by` order.
    Values(Vec<KeyPart>),
}

impl GroupKey {
    /// Key for a single observed value.
    pub fn single(value: KeyValue) -> Self {
        GroupKey::Values(vec![KeyPart::Value(value)])
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Overall => f.write_str("Overall"),
            GroupKey::Values(parts) => {
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{p}")?;
                }
                Ok(())
            }
        }
    }
}

/// Penetration of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenetrationRow {
    /// Group key.
    pub key: GroupKey,
    /// Display label of the key.
    pub label: String,
    /// Penetration in `[0, 1]`.
    pub rate: f64,
    /// Rows in the group, irrespective of weights.
    pub sample_size: usize,
}

/// Ordered penetration rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PenetrationTable {
    /// Rows sorted by key.
    pub rows: Vec<PenetrationRow>,
}

impl PenetrationTable {
    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Iterate rows.
    pub fn iter(&self) -> std::slice::Iter<'_, PenetrationRow> {
        self.rows.iter()
    }

    /// Row for `key`, if present.
    pub fn get(&self, key: &GroupKey) -> Option<&PenetrationRow> {
        self.rows.iter().find(|r| &r.key == key)
    }

    /// Rate of a single-column group with an observed value.
    pub fn rate_of(&self, value: KeyValue) -> Option<f64> {
        self.get(&GroupKey::single(value)).map(|r| r.rate)
    }

    /// Sum of sample sizes over all groups.
    pub fn total_sample_size(&self) -> usize {
        self.rows.iter().map(|r| r.sample_size).sum()
    }
}

#[derive(Debug, Default)]
struct Acc {
    n: usize,
    n_known: usize,
    n_purchase: usize,
    w_total: f64,
    w_purchase: f64,
    n_weighted: usize,
}

impl Acc {
    fn add(&mut self, purchase: Option<bool>, weight: Option<f64>) {
        self.n += 1;
        if let Some(p) = purchase {
            self.n_known += 1;
            self.n_purchase += usize::from(p);
        }
        if let Some(w) = weight {
            self.n_weighted += 1;
            self.w_total += w;
            if purchase == Some(true) {
                self.w_purchase += w;
            }
        }
    }

    fn rate(&self, weighted: bool) -> f64 {
        let r = if weighted && self.n_weighted > 0 {
            if self.w_total > 0.0 { self.w_purchase / self.w_total } else { 0.0 }
        } else if self.n_known > 0 {
            self.n_purchase as f64 / self.n_known as f64
        } else {
            0.0
        };
        r.clamp(0.0, 1.0)
    }
}

/// Numeric value of a weight column.
fn weight_of(rec: &HouseholdRecord, col: &Column) -> Option<f64> {
    match col {
        Column::SampleWeight => rec.sample_weight,
        Column::HouseholdSize => rec.household_size.map(f64::from),
        _ => None,
    }
}

/// Penetration of `table`, optionally grouped and weighted.
///
/// - `group_by = None` (or empty) gives one [`GroupKey::Overall`] row.
/// - Grouping by a column the table lacks gives an empty result.
/// - `weight_col` must name a present numeric column (`Sample_Weight`,
///   `Household_Size`); otherwise rates are unweighted.
/// - A group is weighted when it has at least one non-missing weight; a zero
///   weight sum then yields a rate of 0.
pub fn penetration(
    table: &HouseholdTable,
    group_by: Option<&[Column]>,
    weight_col: Option<&Column>,
) -> PenetrationTable {
    let group_by = group_by.unwrap_or(&[]);
    if group_by.iter().any(|c| !table.has_column(c)) {
        return PenetrationTable::default();
    }
    let weight_col = weight_col
        .filter(|c| table.has_column(c))
        .filter(|c| matches!(c, Column::SampleWeight | Column::HouseholdSize));
    let weighted = weight_col.is_some();

    let mut groups: BTreeMap<GroupKey, Acc> = BTreeMap::new();
    if group_by.is_empty() {
        groups.insert(GroupKey::Overall, Acc::default());
    }

    for rec in table {
        let key = if group_by.is_empty() {
            GroupKey::Overall
        } else {
            GroupKey::Values(
                group_by
                    .iter()
                    .map(|c| table.value(rec, c).map_or(KeyPart::Missing, KeyPart::Value))
                    .collect(),
            )
        };
        let purchase = table.flag(rec, &Column::OnlinePurchase);
        let weight = weight_col.and_then(|c| weight_of(rec, c));
        groups.entry(key).or_default().add(purchase, weight);
    }

    let rows = groups
        .into_iter()
        .map(|(key, acc)| PenetrationRow {
            label: key.to_string(),
            rate: acc.rate(weighted),
            sample_size: acc.n,
            key,
        })
        .collect();
    PenetrationTable { rows }
}

fn by_column(table: &HouseholdTable, col: Column) -> PenetrationTable {
    penetration(table, Some(std::slice::from_ref(&col)), Some(&Column::SampleWeight))
}

/// Penetration by state (weighted by `Sample_Weight` when present).
pub fn by_state(table: &HouseholdTable) -> PenetrationTable {
    by_column(table, Column::State)
}

/// Penetration by household-size bucket.
pub fn by_size_bucket(table: &HouseholdTable) -> PenetrationTable {
    by_column(table, Column::SizeBucket)
}

/// Penetration by raw household size.
pub fn by_household_size(table: &HouseholdTable) -> PenetrationTable {
    by_column(table, Column::HouseholdSize)
}

/// Penetration for urban vs rural households.
pub fn by_urban(table: &HouseholdTable) -> PenetrationTable {
    by_column(table, Column::Urban)
}

/// Penetration with vs without internet access.
pub fn by_internet_access(table: &HouseholdTable) -> PenetrationTable {
    by_column(table, Column::InternetAccess)
}

/// Whole-table penetration.
pub fn overall(table: &HouseholdTable) -> PenetrationTable {
    penetration(table, None, Some(&Column::SampleWeight))
}
