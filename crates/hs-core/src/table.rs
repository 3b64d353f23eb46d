//! The household table: an ordered, append-only collection of records.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Column, HouseholdType, KeyValue, SizeBucket};

/// One surveyed household. Every field except `id` may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdRecord {
    /// Household identifier.
    pub id: u64,
    /// State / union territory name.
    pub state: Option<String>,
    /// Urban (`true`) or rural.
    pub urban: Option<bool>,
    /// Number of members.
    pub household_size: Option<u32>,
    /// Internet available at home.
    pub internet_access: Option<bool>,
    /// At least one online purchase in the reference period.
    pub online_purchase: Option<bool>,
    /// Category flags, aligned with [`Schema::categories`].
    pub categories: Vec<Option<bool>>,
    /// Survey weight.
    pub sample_weight: Option<f64>,
}

impl HouseholdRecord {
    /// A record with only an id; all other cells missing.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            state: None,
            urban: None,
            household_size: None,
            internet_access: None,
            online_purchase: None,
            categories: Vec::new(),
            sample_weight: None,
        }
    }

    /// Derived size bucket.
    pub fn size_bucket(&self) -> Option<SizeBucket> {
        self.household_size.map(SizeBucket::from_size)
    }

    /// Derived household type.
    pub fn household_type(&self) -> Option<HouseholdType> {
        self.household_size.map(HouseholdType::from_size)
    }
}

/// Which columns a table carries, and the order of its category flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Build from stored columns. Derived columns and duplicates are dropped.
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        let mut out: Vec<Column> = Vec::new();
        for c in columns {
            if !c.is_derived() && !out.contains(&c) {
                out.push(c);
            }
        }
        Self { columns: out }
    }

    /// Stored columns in file order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Whether `col` is available, counting derived columns.
    pub fn has(&self, col: &Column) -> bool {
        if col.is_derived() {
            return self.columns.contains(&Column::HouseholdSize);
        }
        self.columns.contains(col)
    }

    /// Category column names, in the order records store their flags.
    pub fn categories(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter_map(|c| match c {
                Column::Category(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Position of a category within [`HouseholdRecord::categories`].
    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.categories().iter().position(|c| *c == name)
    }

    /// Value of `col` in `rec`, or `None` when the cell (or column) is missing.
    pub fn value(&self, rec: &HouseholdRecord, col: &Column) -> Option<KeyValue> {
        if !self.has(col) {
            return None;
        }
        match col {
            Column::Id => Some(KeyValue::Int(rec.id)),
            Column::State => rec.state.clone().map(KeyValue::Text),
            Column::Urban => rec.urban.map(KeyValue::Flag),
            Column::HouseholdSize => rec.household_size.map(|s| KeyValue::Int(u64::from(s))),
            Column::SizeBucket => rec.size_bucket().map(KeyValue::Bucket),
            Column::HouseholdType => rec.household_type().map(KeyValue::Type),
            Column::InternetAccess => rec.internet_access.map(KeyValue::Flag),
            Column::OnlinePurchase => rec.online_purchase.map(KeyValue::Flag),
            Column::Category(name) => {
                let idx = self.category_index(name)?;
                rec.categories.get(idx).copied().flatten().map(KeyValue::Flag)
            }
            Column::SampleWeight => rec.sample_weight.map(|w| KeyValue::Text(format!("{w}"))),
        }
    }

    /// Binary value of a flag column (`Urban`, `Internet_Access`,
    /// `Online_Purchase`, categories); `None` for non-binary columns.
    pub fn flag(&self, rec: &HouseholdRecord, col: &Column) -> Option<bool> {
        match self.value(rec, col)? {
            KeyValue::Flag(b) => Some(b),
            _ => None,
        }
    }
}

/// Incrementally builds a [`HouseholdTable`], validating each row.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    schema: Schema,
    rows: Vec<HouseholdRecord>,
}

impl TableBuilder {
    /// Start an empty table with the given schema.
    pub fn new(schema: Schema) -> Self {
        Self { schema, rows: Vec::new() }
    }

    /// Pre-size the row buffer.
    pub fn with_capacity(schema: Schema, capacity: usize) -> Self {
        Self { schema, rows: Vec::with_capacity(capacity) }
    }

    /// Append a row.
    ///
    /// Rejects rows whose category vector does not match the schema, whose
    /// household size is zero, or whose sample weight is negative or non-finite.
    pub fn push(&mut self, rec: HouseholdRecord) -> Result<()> {
        let n_cat = self.schema.categories().len();
        if rec.categories.len() != n_cat {
            return Err(Error::Validation(format!(
                "household {}: {} category flags, schema has {}",
                rec.id,
                rec.categories.len(),
                n_cat
            )));
        }
        if rec.household_size == Some(0) {
            return Err(Error::Validation(format!(
                "household {}: Household_Size must be positive",
                rec.id
            )));
        }
        if let Some(w) = rec.sample_weight.filter(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::Validation(format!(
                "household {}: Sample_Weight must be finite and >= 0, got {w}",
                rec.id
            )));
        }
        self.rows.push(rec);
        Ok(())
    }

    /// Number of rows pushed so far.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows have been pushed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Freeze into an immutable table.
    pub fn finish(self) -> HouseholdTable {
        HouseholdTable { schema: self.schema, rows: self.rows }
    }
}

/// Immutable household table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdTable {
    schema: Schema,
    rows: Vec<HouseholdRecord>,
}

impl HouseholdTable {
    /// Table with a schema and no rows.
    pub fn empty(schema: Schema) -> Self {
        Self { schema, rows: Vec::new() }
    }

    /// Schema of this table.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether `col` is available (derived columns included).
    pub fn has_column(&self, col: &Column) -> bool {
        self.schema.has(col)
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[HouseholdRecord] {
        &self.rows
    }

    /// Iterate rows.
    pub fn iter(&self) -> std::slice::Iter<'_, HouseholdRecord> {
        self.rows.iter()
    }

    /// Row count.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// New table with the same schema, keeping rows where `pred` holds.
    pub fn filter<F>(&self, mut pred: F) -> HouseholdTable
    where
        F: FnMut(&HouseholdRecord) -> bool,
    {
        let rows = self.rows.iter().filter(|r| pred(r)).cloned().collect();
        HouseholdTable { schema: self.schema.clone(), rows }
    }

    /// Value of `col` in row `rec` (see [`Schema::value`]).
    pub fn value(&self, rec: &HouseholdRecord, col: &Column) -> Option<KeyValue> {
        self.schema.value(rec, col)
    }

    /// Binary value of `col` in row `rec` (see [`Schema::flag`]).
    pub fn flag(&self, rec: &HouseholdRecord, col: &Column) -> Option<bool> {
        self.schema.flag(rec, col)
    }
}

impl<'a> IntoIterator for &'a HouseholdTable {
    type Item = &'a HouseholdRecord;
    type IntoIter = std::slice::Iter<'a, HouseholdRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new([
            Column::Id,
            Column::State,
            Column::HouseholdSize,
            Column::OnlinePurchase,
            Column::Category("Online_Food".into()),
        ])
    }

    fn rec(id: u64, size: Option<u32>, food: Option<bool>) -> HouseholdRecord {
        HouseholdRecord {
            household_size: size,
            online_purchase: Some(true),
            categories: vec![food],
            ..HouseholdRecord::new(id)
        }
    }

    #[test]
    fn test_schema_derived_columns() {
        let s = schema();
        assert!(s.has(&Column::SizeBucket));
        assert!(s.has(&Column::HouseholdType));
        assert!(!s.has(&Column::Urban));
        assert_eq!(s.categories(), vec!["Online_Food"]);

        let no_size = Schema::new([Column::Id, Column::OnlinePurchase, Column::SizeBucket]);
        assert!(!no_size.has(&Column::SizeBucket));
        assert_eq!(no_size.columns().len(), 2);
    }

    #[test]
    fn test_push_validates_rows() {
        let mut b = TableBuilder::new(schema());
        b.push(rec(1, Some(3), Some(true))).unwrap();
        assert!(b.push(rec(2, Some(0), None)).is_err());
        let mut short = rec(3, Some(2), None);
        short.categories.clear();
        assert!(b.push(short).is_err());
        let mut neg = rec(4, Some(2), None);
        neg.sample_weight = Some(-1.0);
        assert!(b.push(neg).is_err());
        assert_eq!(b.finish().len(), 1);
    }

    #[test]
    fn test_value_and_filter() {
        let mut b = TableBuilder::new(schema());
        b.push(rec(1, Some(1), Some(true))).unwrap();
        b.push(rec(2, Some(5), None)).unwrap();
        b.push(rec(3, None, Some(false))).unwrap();
        let t = b.finish();

        let r = &t.rows()[1];
        assert_eq!(t.value(r, &Column::SizeBucket), Some(KeyValue::Bucket(SizeBucket::Medium)));
        assert_eq!(t.flag(r, &Column::Category("Online_Food".into())), None);
        assert_eq!(t.flag(&t.rows()[0], &Column::Category("Online_Food".into())), Some(true));
        assert_eq!(t.value(r, &Column::Urban), None);

        let small = t.filter(|r| r.household_size.is_some_and(|s| s <= 2));
        assert_eq!(small.len(), 1);
        assert_eq!(small.schema(), t.schema());
        assert_eq!(t.len(), 3);
    }
}
