//! Reproducibility bundle: inputs, outputs, `meta.json` and a sha256 manifest.

use anyhow::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::run::RunSummary;

#[derive(Debug, Clone, Serialize)]
pub struct BundleMeta {
    pub tool: String,
    pub tool_version: String,
    pub created_unix_ms: u128,
    pub command: String,
    pub args: serde_json::Value,
    pub input: BundleInputMeta,
    pub synthesized_input: bool,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BundleInputMeta {
    pub original_path: String,
    pub input_sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct Manifest {
    bundle_version: u32,
    files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize)]
struct ManifestFile {
    path: String,
    bytes: u64,
    sha256: String,
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

fn ensure_empty_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            anyhow::bail!("bundle path exists but is not a directory: {}", dir.display());
        }
        if dir.read_dir()?.next().is_some() {
            anyhow::bail!("bundle directory must be empty: {}", dir.display());
        }
    } else {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn copy_into(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(src, dst)?;
    Ok(())
}

fn rel_string(p: &Path) -> String {
    p.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Copy the run's input (and config, if any) and outputs into `bundle_dir`.
pub fn write_bundle(
    bundle_dir: &Path,
    command: &str,
    args: serde_json::Value,
    config_path: Option<&Path>,
    summary: &RunSummary,
) -> Result<()> {
    ensure_empty_dir(bundle_dir)?;

    let inputs_dir = bundle_dir.join("inputs");
    let outputs_dir = bundle_dir.join("outputs");
    std::fs::create_dir_all(&inputs_dir)?;
    std::fs::create_dir_all(&outputs_dir)?;

    let mut rel_files: Vec<PathBuf> = Vec::new();

    let input_bytes = std::fs::read(&summary.data)?;
    let input_name = summary
        .data
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("input.csv"));
    std::fs::write(inputs_dir.join(&input_name), &input_bytes)?;
    rel_files.push(Path::new("inputs").join(&input_name));

    let config_sha256 = match config_path {
        Some(cfg) => {
            let bytes = std::fs::read(cfg)?;
            let ext = cfg.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
            let name = PathBuf::from(format!("run_config.{ext}"));
            std::fs::write(inputs_dir.join(&name), &bytes)?;
            rel_files.push(Path::new("inputs").join(name));
            Some(sha256_hex(&bytes))
        }
        None => None,
    };

    for rel in summary.outputs() {
        copy_into(&summary.out_dir.join(&rel), &outputs_dir.join(&rel))?;
        rel_files.push(Path::new("outputs").join(rel));
    }

    let created_unix_ms = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let meta = BundleMeta {
        tool: "housestat".to_string(),
        tool_version: hs_core::VERSION.to_string(),
        created_unix_ms,
        command: command.to_string(),
        args,
        input: BundleInputMeta {
            original_path: summary.data.display().to_string(),
            input_sha256: sha256_hex(&input_bytes),
            config_sha256,
        },
        synthesized_input: summary.synthesized,
        rows: summary.rows,
    };
    std::fs::write(bundle_dir.join("meta.json"), serde_json::to_string_pretty(&meta)?)?;
    rel_files.push(PathBuf::from("meta.json"));

    let mut files = Vec::with_capacity(rel_files.len());
    for rel in &rel_files {
        let bytes = std::fs::read(bundle_dir.join(rel))?;
        files.push(ManifestFile {
            path: rel_string(rel),
            bytes: bytes.len() as u64,
            sha256: sha256_hex(&bytes),
        });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let manifest = Manifest { bundle_version: 1, files };
    std::fs::write(bundle_dir.join("manifest.json"), serde_json::to_string_pretty(&manifest)?)?;
    tracing::info!(bundle = %bundle_dir.display(), files = rel_files.len(), "bundle written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn manifest_paths_use_forward_slashes() {
        let p = Path::new("outputs").join("charts").join("a.svg");
        assert_eq!(rel_string(&p), "outputs/charts/a.svg");
    }
}
