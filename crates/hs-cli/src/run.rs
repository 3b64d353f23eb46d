//! `housestat run` orchestration.

use anyhow::{Context, Result};
use hs_core::HouseholdTable;
use hs_data::{CleanOptions, SampleDataSynthesizer, SynthConfig};
use hs_inference::AnalysisResults;
use hs_insights::{InsightsGenerator, MemoWriter};
use hs_viz_render::config::VizConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pipeline configuration. Every field has a default; CLI flags override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Household table (CSV/TSV). Synthesized and written here when missing.
    pub data: PathBuf,
    /// Output directory for analysis.json, charts/ and the memo.
    pub out_dir: PathBuf,
    /// Seed for synthesis.
    pub seed: u64,
    /// Write chart artifacts and SVGs.
    pub charts: bool,
    /// Write product_memo.md.
    pub memo: bool,
    /// Optional chart styling (YAML).
    pub viz_config: Option<PathBuf>,
    /// Cleaning applied before analysis.
    pub clean: CleanOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data/sample_hces_data.csv"),
            out_dir: PathBuf::from("output"),
            seed: 42,
            charts: true,
            memo: true,
            viz_config: None,
            clean: CleanOptions::default(),
        }
    }
}

/// CLI flags layered over a [`RunConfig`].
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub data: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub viz_config: Option<PathBuf>,
    pub no_charts: bool,
    pub no_memo: bool,
}

impl RunConfig {
    pub fn apply(mut self, o: RunOverrides) -> Self {
        if let Some(data) = o.data {
            self.data = data;
        }
        if let Some(out_dir) = o.out_dir {
            self.out_dir = out_dir;
        }
        if let Some(seed) = o.seed {
            self.seed = seed;
        }
        if let Some(viz) = o.viz_config {
            self.viz_config = Some(viz);
        }
        self.charts &= !o.no_charts;
        self.memo &= !o.no_memo;
        self
    }
}

pub fn read_run_config(path: &Path) -> Result<RunConfig> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read run config {}", path.display()))?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let cfg: RunConfig = if ext == "json" {
        serde_json::from_slice(&bytes)
            .with_context(|| format!("invalid run config {}", path.display()))?
    } else {
        // Default: YAML (serde_yaml_ng).
        serde_yaml_ng::from_slice(&bytes)
            .with_context(|| format!("invalid run config {}", path.display()))?
    };
    Ok(cfg)
}

/// What a run wrote.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub data: PathBuf,
    pub synthesized: bool,
    pub rows: usize,
    pub rows_removed: usize,
    pub out_dir: PathBuf,
    pub analysis_json: PathBuf,
    pub charts: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_penetration: Option<f64>,
}

impl RunSummary {
    /// Every output file, relative to `out_dir`.
    pub fn outputs(&self) -> Vec<PathBuf> {
        let mut out = vec![self.analysis_json.clone()];
        out.extend(self.charts.iter().cloned());
        out.extend(self.memo.iter().cloned());
        out.into_iter()
            .map(|p| p.strip_prefix(&self.out_dir).map(Path::to_path_buf).unwrap_or(p))
            .collect()
    }
}

/// Synthesize a table with `seed` and persist it at `path` (`.csv` or `.tsv`).
pub fn synthesize(config: SynthConfig, path: &Path) -> Result<HouseholdTable> {
    hs_data::delimiter_for(path)
        .with_context(|| format!("cannot persist a synthetic table at {}", path.display()))?;
    let seed = config.seed;
    let synth = SampleDataSynthesizer::new(config)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let table = synth.generate(&mut rng)?;
    hs_data::write_table(&table, path)
        .with_context(|| format!("failed to write synthetic table {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = table.len(), seed, "synthetic table written");
    Ok(table)
}

/// Read `path`, or synthesize and persist a table there if it does not exist.
pub fn load_or_synthesize(path: &Path, seed: u64) -> Result<(HouseholdTable, bool)> {
    if path.exists() {
        tracing::info!(path = %path.display(), "loading household table");
        let table = hs_data::read_table(path)
            .with_context(|| format!("failed to load household table {}", path.display()))?;
        return Ok((table, false));
    }
    tracing::warn!(path = %path.display(), "data file not found, synthesizing a sample table");
    let table = synthesize(SynthConfig { seed, ..SynthConfig::default() }, path)?;
    Ok((table, true))
}

/// Clean and analyze a table.
pub fn analyze(table: &HouseholdTable, opts: &CleanOptions) -> Result<(AnalysisResults, usize)> {
    let cleaned = hs_data::clean_table(table, opts)?;
    let results = hs_inference::run_full_analysis(&cleaned.table);
    Ok((results, cleaned.removed))
}

pub fn load_viz_config(path: Option<&Path>) -> Result<VizConfig> {
    let yaml = match path {
        Some(p) => Some(
            std::fs::read_to_string(p)
                .with_context(|| format!("failed to read viz config {}", p.display()))?,
        ),
        None => None,
    };
    Ok(hs_viz_render::config::resolve_config(yaml.as_deref())?)
}

/// Write `charts/<kind>.json` and `charts/<kind>.svg` for every chart kind.
pub fn write_charts(
    results: &AnalysisResults,
    charts_dir: &Path,
    viz: &VizConfig,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(charts_dir)?;
    let mut written = Vec::new();
    for art in hs_viz::chart_artifacts(results)? {
        let json = art.to_json_pretty()?;
        let json_path = charts_dir.join(format!("{}.json", art.kind()));
        std::fs::write(&json_path, &json)?;
        let svg_path = charts_dir.join(format!("{}.svg", art.kind()));
        hs_viz_render::render_to_file(&json, art.kind(), &svg_path, viz)
            .with_context(|| format!("failed to render {}", art.kind()))?;
        tracing::debug!(kind = art.kind(), "chart written");
        written.push(json_path);
        written.push(svg_path);
    }
    Ok(written)
}

pub fn run_pipeline(cfg: &RunConfig) -> Result<RunSummary> {
    let (table, synthesized) = load_or_synthesize(&cfg.data, cfg.seed)?;
    let (results, rows_removed) = analyze(&table, &cfg.clean)?;

    std::fs::create_dir_all(&cfg.out_dir)
        .with_context(|| format!("failed to create {}", cfg.out_dir.display()))?;
    let analysis_json = cfg.out_dir.join("analysis.json");
    std::fs::write(&analysis_json, results.to_json_pretty()?)?;

    let charts = if cfg.charts {
        let viz = load_viz_config(cfg.viz_config.as_deref())?;
        write_charts(&results, &cfg.out_dir.join("charts"), &viz)?
    } else {
        Vec::new()
    };

    let memo = if cfg.memo {
        let insights = InsightsGenerator::new(&results).generate();
        let path = cfg.out_dir.join("product_memo.md");
        MemoWriter::new(&insights).write(&path)?;
        Some(path)
    } else {
        None
    };

    tracing::info!(out_dir = %cfg.out_dir.display(), charts = charts.len(), "run complete");
    Ok(RunSummary {
        data: cfg.data.clone(),
        synthesized,
        rows: results.data_quality.total_records,
        rows_removed,
        out_dir: cfg.out_dir.clone(),
        analysis_json,
        charts,
        memo,
        overall_penetration: results.overall_rate(),
    })
}
