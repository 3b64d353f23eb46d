use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_housestat"))
}

fn tmp_dir_path(suffix: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("housestat_cmd_{}_{}_{}", std::process::id(), nanos, suffix));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn synthesize(path: &std::path::Path) -> serde_json::Value {
    let out = run(&[
        "synthesize",
        "--output",
        path.to_str().unwrap(),
        "--states",
        "Kerala,Bihar,Goa,Punjab",
        "--min-households",
        "50",
        "--max-households",
        "80",
        "--seed",
        "3",
    ]);
    assert!(out.status.success(), "synthesize failed: {}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).expect("stdout should be JSON")
}

#[test]
fn version_prints_crate_version() {
    let out = run(&["version"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim(), format!("housestat {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn synthesize_reports_rows_and_writes_csv() {
    let dir = tmp_dir_path("synth");
    let data = dir.join("nested").join("table.csv");
    let summary = synthesize(&data);
    let rows = summary["rows"].as_u64().unwrap();
    assert!((200..320).contains(&rows), "rows = {rows}");

    let text = std::fs::read_to_string(&data).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Household_ID,State,"));
    assert!(header.contains("Online_Food"));
    assert_eq!(lines.count() as u64, rows);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn synthesize_rejects_bad_household_range() {
    let dir = tmp_dir_path("badrange");
    let data = dir.join("t.csv");
    let out = run(&[
        "synthesize",
        "--output",
        data.to_str().unwrap(),
        "--min-households",
        "10",
        "--max-households",
        "10",
    ]);
    assert!(!out.status.success());
    assert!(!data.exists());
}

#[test]
fn analyze_prints_results_json() {
    let dir = tmp_dir_path("analyze");
    let data = dir.join("table.csv");
    let summary = synthesize(&data);

    let out = run(&["analyze", "--input", data.to_str().unwrap()]);
    assert!(out.status.success(), "analyze failed: {}", String::from_utf8_lossy(&out.stderr));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout should be JSON");
    assert_eq!(v["data_quality"]["total_records"], summary["rows"]);
    assert!(v["h1"]["summary"].is_string());
    assert_eq!(v["state_penetration"]["rows"].as_array().unwrap().len(), 4);

    let out_file = dir.join("analysis.json");
    let out = run(&[
        "analyze",
        "--input",
        data.to_str().unwrap(),
        "--output",
        out_file.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    let from_file: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_file).unwrap()).unwrap();
    assert_eq!(from_file["h1"], v["h1"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn analyze_missing_file_fails_with_path() {
    let out = run(&["analyze", "--input", "/nonexistent/housestat/table.csv"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("/nonexistent/housestat/table.csv"));
}

#[test]
fn render_infers_kind_from_schema_version() {
    let dir = tmp_dir_path("render");
    let data = dir.join("table.csv");
    synthesize(&data);
    let out_dir = dir.join("out");
    let out = run(&[
        "run",
        "--data",
        data.to_str().unwrap(),
        "--out-dir",
        out_dir.to_str().unwrap(),
        "--no-memo",
    ]);
    assert!(out.status.success(), "run failed: {}", String::from_utf8_lossy(&out.stderr));

    let artifact = out_dir.join("charts/state-penetration.json");
    let out = run(&["render", "--input", artifact.to_str().unwrap()]);
    assert!(out.status.success(), "render failed: {}", String::from_utf8_lossy(&out.stderr));
    let svg = String::from_utf8(out.stdout).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Kerala"));

    let theme = dir.join("viz.yaml");
    std::fs::write(&theme, "theme: minimal\n").unwrap();
    let svg_path = dir.join("rendered").join("state.svg");
    let out = run(&[
        "render",
        "--input",
        artifact.to_str().unwrap(),
        "--kind",
        "state-penetration",
        "--viz-config",
        theme.to_str().unwrap(),
        "--output",
        svg_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "render failed: {}", String::from_utf8_lossy(&out.stderr));
    assert!(std::fs::read_to_string(&svg_path).unwrap().starts_with("<svg"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn render_rejects_unknown_schema_without_kind() {
    let dir = tmp_dir_path("unknown");
    std::fs::create_dir_all(&dir).unwrap();
    let artifact = dir.join("pie.json");
    std::fs::write(&artifact, r#"{"schema_version": "pie_v1"}"#).unwrap();

    let out = run(&["render", "--input", artifact.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--kind"));

    let _ = std::fs::remove_dir_all(&dir);
}
