use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_housestat"))
}

fn tmp_dir_path(suffix: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("housestat_bundle_{}_{}_{}", std::process::id(), nanos, suffix));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    let out = h.finalize();
    let mut s = String::with_capacity(64);
    for b in out {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

fn synthesize(path: &std::path::Path) {
    let out = run(&[
        "synthesize",
        "--output",
        path.to_str().unwrap(),
        "--states",
        "Kerala,Bihar,Goa",
        "--min-households",
        "60",
        "--max-households",
        "90",
    ]);
    assert!(out.status.success(), "synthesize failed: {}", String::from_utf8_lossy(&out.stderr));
}

#[test]
fn run_writes_repro_bundle_with_hashes() {
    let dir = tmp_dir_path("run");
    let data = dir.join("households.csv");
    synthesize(&data);
    let bundle = dir.join("bundle");

    let out = run(&[
        "run",
        "--data",
        data.to_str().unwrap(),
        "--out-dir",
        dir.join("out").to_str().unwrap(),
        "--bundle",
        bundle.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "run failed: {}", String::from_utf8_lossy(&out.stderr));
    let _v: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be JSON");

    let meta_path = bundle.join("meta.json");
    let manifest_path = bundle.join("manifest.json");
    let input_copy = bundle.join("inputs/households.csv");
    for p in [
        &meta_path,
        &manifest_path,
        &input_copy,
        &bundle.join("outputs/analysis.json"),
        &bundle.join("outputs/product_memo.md"),
        &bundle.join("outputs/charts/category-skew.svg"),
    ] {
        assert!(p.exists(), "expected bundle file: {}", p.display());
    }

    let meta: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&meta_path).unwrap()).unwrap();
    assert_eq!(meta["tool"], "housestat");
    assert_eq!(meta["command"], "run");
    assert_eq!(meta["synthesized_input"], false);
    let input_bytes = std::fs::read(&data).unwrap();
    assert_eq!(meta["input"]["input_sha256"].as_str().unwrap(), sha256_hex(&input_bytes));

    let manifest: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&manifest_path).unwrap()).unwrap();
    assert_eq!(manifest["bundle_version"], 1);
    let files = manifest["files"].as_array().unwrap();
    // 1 input + analysis + 8 chart files + memo + meta
    assert_eq!(files.len(), 12);
    for f in files {
        let rel = f["path"].as_str().unwrap();
        let bytes = std::fs::read(bundle.join(rel)).unwrap();
        assert_eq!(f["bytes"].as_u64().unwrap(), bytes.len() as u64, "size of {rel}");
        assert_eq!(f["sha256"].as_str().unwrap(), sha256_hex(&bytes), "hash of {rel}");
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn bundle_copies_run_config() {
    let dir = tmp_dir_path("cfg");
    let data = dir.join("households.csv");
    synthesize(&data);
    let cfg_path = dir.join("run.json");
    let cfg = serde_json::json!({
        "data": data,
        "out_dir": dir.join("out"),
        "charts": false,
    });
    std::fs::write(&cfg_path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();
    let bundle = dir.join("bundle");

    let out = run(&[
        "run",
        "--config",
        cfg_path.to_str().unwrap(),
        "--bundle",
        bundle.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "run failed: {}", String::from_utf8_lossy(&out.stderr));

    let copied = std::fs::read(bundle.join("inputs/run_config.json")).unwrap();
    assert_eq!(copied, std::fs::read(&cfg_path).unwrap());
    let meta: serde_json::Value =
        serde_json::from_slice(&std::fs::read(bundle.join("meta.json")).unwrap()).unwrap();
    assert_eq!(meta["input"]["config_sha256"].as_str().unwrap(), sha256_hex(&copied));
    assert_eq!(meta["args"]["charts"], false);
    assert!(!bundle.join("outputs/charts").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn bundle_dir_must_be_empty() {
    let dir = tmp_dir_path("nonempty");
    let data = dir.join("households.csv");
    synthesize(&data);
    let bundle = dir.join("bundle");
    std::fs::create_dir_all(&bundle).unwrap();
    std::fs::write(bundle.join("stale.txt"), b"x").unwrap();

    let out = run(&[
        "run",
        "--data",
        data.to_str().unwrap(),
        "--out-dir",
        dir.join("out").to_str().unwrap(),
        "--no-charts",
        "--bundle",
        bundle.to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("bundle directory must be empty"));

    let _ = std::fs::remove_dir_all(&dir);
}
