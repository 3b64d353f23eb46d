use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use hs_core::{Column, Error};
use hs_data::{SynthConfig, generate_sample_dataset, read_table, write_csv, write_table};

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("housestat_data_{}_{}_{}", std::process::id(), nanos, name));
    std::fs::create_dir_all(&p).unwrap();
    p
}

#[test]
fn reads_partial_schema_with_lenient_flags() {
    let dir = tmp_dir("partial");
    let path = dir.join("survey.csv");
    std::fs::write(
        &path,
        "Household_ID,State,Household_Size,Online_Purchase,Online_Food,Notes\n\
         10,Orissa,3,Yes,1,x\n\
         11,Kerala,1,N,,\n\
         12,,2.0,maybe,0,y\n",
    )
    .unwrap();

    let t = read_table(&path).unwrap();
    assert_eq!(t.len(), 3);
    assert!(t.has_column(&Column::HouseholdSize));
    assert!(t.has_column(&Column::SizeBucket));
    assert!(!t.has_column(&Column::InternetAccess));
    assert!(!t.has_column(&Column::SampleWeight));
    assert_eq!(t.schema().categories(), vec!["Online_Food"]);

    let rows = t.rows();
    assert_eq!(rows[0].id, 10);
    assert_eq!(rows[0].state.as_deref(), Some("Orissa"));
    assert_eq!(rows[0].online_purchase, Some(true));
    assert_eq!(rows[0].categories, vec![Some(true)]);
    assert_eq!(rows[1].online_purchase, Some(false));
    assert_eq!(rows[1].categories, vec![None]);
    assert_eq!(rows[2].state, None);
    assert_eq!(rows[2].household_size, Some(2));
    assert_eq!(rows[2].online_purchase, None);
}

#[test]
fn reads_tsv_by_extension() {
    let dir = tmp_dir("tsv");
    let path = dir.join("survey.tsv");
    std::fs::write(&path, "Household_Size\tOnline_Purchase\tSample_Weight\n4\t0\t120.5\n1\t1\t80\n")
        .unwrap();
    let t = read_table(&path).unwrap();
    assert_eq!(t.len(), 2);
    // ids fall back to row numbers
    assert_eq!(t.rows()[1].id, 2);
    assert_eq!(t.rows()[0].sample_weight, Some(120.5));
}

#[test]
fn malformed_size_names_file_row_and_column() {
    let dir = tmp_dir("malformed");
    let path = dir.join("bad.csv");
    std::fs::write(&path, "Household_Size,Online_Purchase\n3,1\nabc,0\n").unwrap();
    match read_table(&path).unwrap_err() {
        Error::MalformedInput { path: p, reason } => {
            assert!(p.ends_with("bad.csv"));
            assert!(reason.contains("row 2"), "{reason}");
            assert!(reason.contains("Household_Size"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn zero_household_size_is_malformed() {
    let dir = tmp_dir("zero");
    let path = dir.join("zero.csv");
    std::fs::write(&path, "Household_Size,Online_Purchase\n0,1\n").unwrap();
    assert!(matches!(read_table(&path), Err(Error::MalformedInput { .. })));
}

#[test]
fn missing_file_is_malformed_input() {
    let dir = tmp_dir("missing");
    let err = read_table(&dir.join("nope.csv")).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }));
}

#[test]
fn synthesized_table_persists_and_reloads() {
    let dir = tmp_dir("persist");
    let path = dir.join("data").join("sample_hces_data.csv");
    let cfg = SynthConfig {
        states: vec!["Kerala".into(), "Punjab".into()],
        households_per_state: (200, 210),
        ..SynthConfig::default()
    };
    let table = generate_sample_dataset(&cfg).unwrap();
    write_csv(&table, &path).unwrap();

    let header = std::fs::read_to_string(&path).unwrap();
    assert!(header.starts_with(
        "Household_ID,State,Urban,Household_Size,Internet_Access,Online_Purchase,\
         Online_Food,Online_Medicine,Online_Consumables,Online_Electronics,Sample_Weight"
    ));

    let back = read_table(&path).unwrap();
    assert_eq!(back, table);
}

#[test]
fn tsv_table_round_trips_through_write_table() {
    let dir = tmp_dir("tsv_round_trip");
    let path = dir.join("sample.tsv");
    let cfg = SynthConfig {
        states: vec!["Goa".into(), "Bihar".into()],
        households_per_state: (10, 12),
        ..SynthConfig::default()
    };
    let table = generate_sample_dataset(&cfg).unwrap();
    write_table(&table, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Household_ID\tState\t"));
    let back = read_table(&path).unwrap();
    assert_eq!(back.schema(), table.schema());
    assert_eq!(back, table);
}

#[test]
fn comma_text_in_tsv_file_is_malformed() {
    let dir = tmp_dir("wrong_delim");
    let path = dir.join("sample.tsv");
    std::fs::write(&path, "Household_ID,State,Household_Size\n1,Goa,3\n").unwrap();
    match read_table(&path).unwrap_err() {
        Error::MalformedInput { path: p, reason } => {
            assert!(p.ends_with("sample.tsv"));
            assert!(reason.contains("known column"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn write_table_rejects_spreadsheet_path() {
    let dir = tmp_dir("xlsx_write");
    let path = dir.join("sample.xlsx");
    let cfg = SynthConfig {
        states: vec!["Goa".into()],
        households_per_state: (5, 6),
        ..SynthConfig::default()
    };
    let table = generate_sample_dataset(&cfg).unwrap();
    assert!(matches!(write_table(&table, &path), Err(Error::UnsupportedFormat { .. })));
    assert!(!path.exists());
}
