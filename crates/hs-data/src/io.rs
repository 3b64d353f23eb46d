//! CSV / TSV ingest and export of household tables.

use std::path::Path;

use hs_core::{Column, Error, HouseholdRecord, HouseholdTable, Result, Schema, TableBuilder};

use crate::clean::parse_binary;

const ACCEPTED: &str = ".csv or .tsv";

fn malformed(path: &Path, reason: impl Into<String>) -> Error {
    Error::MalformedInput { path: path.display().to_string(), reason: reason.into() }
}

/// Delimiter implied by the extension of `path`: `,` for `.csv`, tab for `.tsv`.
///
/// Any other extension (spreadsheets included) is rejected with
/// [`Error::UnsupportedFormat`].
pub fn delimiter_for(path: &Path) -> Result<u8> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
    match ext.as_str() {
        "csv" => Ok(b','),
        "tsv" => Ok(b'\t'),
        _ => Err(Error::UnsupportedFormat {
            path: path.display().to_string(),
            expected: ACCEPTED.to_string(),
        }),
    }
}

/// Read a household table, choosing the delimiter from the file extension.
pub fn read_table(path: &Path) -> Result<HouseholdTable> {
    read_delimited(path, delimiter_for(path)?)
}

/// Read a delimited text file with a header row.
///
/// Headers are matched by name (see [`Column::from_header`]); unrecognized
/// columns are skipped. Empty cells are missing values. A missing
/// `Household_ID` falls back to the 1-based row number.
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<HouseholdTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|e| malformed(path, format!("failed to open: {e}")))?;

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| malformed(path, format!("failed to read header row: {e}")))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(malformed(path, "file has no columns"));
    }

    // (field index, column) for every recognized header, first occurrence wins.
    let mut mapping: Vec<(usize, Column)> = Vec::new();
    for (j, h) in headers.iter().enumerate() {
        let Some(col) = Column::from_header(h) else { continue };
        if !mapping.iter().any(|(_, c)| *c == col) {
            mapping.push((j, col));
        }
    }
    if mapping.is_empty() {
        return Err(malformed(
            path,
            format!("none of the {} header fields is a known column", headers.len()),
        ));
    }
    let skipped = headers.len() - mapping.len();
    if skipped > 0 {
        tracing::debug!(skipped, "ignoring unrecognized columns");
    }

    let schema = Schema::new(mapping.iter().map(|(_, c)| c.clone()));
    let categories: Vec<String> = schema.categories().iter().map(|s| s.to_string()).collect();
    let mut builder = TableBuilder::new(schema);
    let mut unparsed_flags = 0usize;

    for (i, result) in rdr.records().enumerate() {
        let row_no = i + 1;
        let record = result.map_err(|e| malformed(path, format!("row {row_no}: {e}")))?;
        let mut rec = HouseholdRecord::new(row_no as u64);
        rec.categories = vec![None; categories.len()];

        for (j, col) in &mapping {
            let raw = record.get(*j).unwrap_or("").trim();
            if raw.is_empty() {
                continue;
            }
            let bad = |what: &str| malformed(path, format!("row {row_no}, column {col}: '{raw}' {what}"));
            let mut flag = || {
                let v = parse_binary(raw);
                if v.is_none() {
                    unparsed_flags += 1;
                }
                v
            };
            match col {
                Column::Id => rec.id = parse_count(raw).ok_or_else(|| bad("is not an id"))?,
                Column::State => rec.state = Some(raw.to_string()),
                Column::Urban => rec.urban = flag(),
                Column::HouseholdSize => {
                    let size = parse_count(raw)
                        .and_then(|v| u32::try_from(v).ok())
                        .filter(|&v| v > 0)
                        .ok_or_else(|| bad("is not a positive integer"))?;
                    rec.household_size = Some(size);
                }
                Column::InternetAccess => rec.internet_access = flag(),
                Column::OnlinePurchase => rec.online_purchase = flag(),
                Column::Category(name) => {
                    if let Some(k) = categories.iter().position(|c| c == name) {
                        rec.categories[k] = flag();
                    }
                }
                Column::SampleWeight => {
                    let w = raw
                        .parse::<f64>()
                        .ok()
                        .filter(|w| w.is_finite() && *w >= 0.0)
                        .ok_or_else(|| bad("is not a non-negative number"))?;
                    rec.sample_weight = Some(w);
                }
                Column::SizeBucket | Column::HouseholdType => {}
            }
        }
        builder.push(rec).map_err(|e| malformed(path, format!("row {row_no}: {e}")))?;
    }

    if unparsed_flags > 0 {
        tracing::warn!(cells = unparsed_flags, "unrecognized binary values treated as missing");
    }
    let table = builder.finish();
    tracing::info!(rows = table.len(), path = %path.display(), "loaded household table");
    Ok(table)
}

/// Integer cell, accepting a float spelling with no fractional part (`"3.0"`).
fn parse_count(raw: &str) -> Option<u64> {
    if let Ok(v) = raw.parse::<u64>() {
        return Some(v);
    }
    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn flag_cell(v: Option<bool>) -> String {
    v.map(|b| u8::from(b).to_string()).unwrap_or_default()
}

/// Write `table` with the delimiter implied by the extension of `path`.
pub fn write_table(table: &HouseholdTable, path: &Path) -> Result<()> {
    write_delimited(table, path, delimiter_for(path)?)
}

/// Write `table` as comma-separated text with canonical headers.
pub fn write_csv(table: &HouseholdTable, path: &Path) -> Result<()> {
    write_delimited(table, path, b',')
}

/// Write `table` with canonical headers, creating parent directories.
pub fn write_delimited(table: &HouseholdTable, path: &Path, delimiter: u8) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let io_err = |e: csv::Error| Error::Io(std::io::Error::other(e));
    let mut wtr =
        csv::WriterBuilder::new().delimiter(delimiter).from_path(path).map_err(io_err)?;
    let schema = table.schema();
    wtr.write_record(schema.columns().iter().map(Column::name)).map_err(io_err)?;

    for rec in table {
        let mut cat = rec.categories.iter();
        let row: Vec<String> = schema
            .columns()
            .iter()
            .map(|col| match col {
                Column::Id => rec.id.to_string(),
                Column::State => rec.state.clone().unwrap_or_default(),
                Column::Urban => flag_cell(rec.urban),
                Column::HouseholdSize => {
                    rec.household_size.map(|s| s.to_string()).unwrap_or_default()
                }
                Column::InternetAccess => flag_cell(rec.internet_access),
                Column::OnlinePurchase => flag_cell(rec.online_purchase),
                Column::Category(_) => flag_cell(cat.next().copied().flatten()),
                Column::SampleWeight => {
                    rec.sample_weight.map(|w| w.to_string()).unwrap_or_default()
                }
                Column::SizeBucket | Column::HouseholdType => String::new(),
            })
            .collect();
        wtr.write_record(&row).map_err(io_err)?;
    }
    wtr.flush()?;
    tracing::info!(rows = table.len(), path = %path.display(), "wrote household table");
    Ok(())
}
