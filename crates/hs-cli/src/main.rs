//! housestat CLI

mod bundle;
mod run;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hs_data::{CleanOptions, SynthConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "housestat")]
#[command(about = "housestat - household structure vs. e-commerce adoption")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load (or synthesize) data, analyze, and write results, charts and the memo
    Run {
        /// Run config (YAML, or JSON by extension). Flags below override it.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Household table (CSV/TSV). Synthesized here if it does not exist.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Output directory.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Seed for synthesis.
        #[arg(long)]
        seed: Option<u64>,

        /// Chart styling (YAML).
        #[arg(long)]
        viz_config: Option<PathBuf>,

        /// Skip chart artifacts and SVGs.
        #[arg(long)]
        no_charts: bool,

        /// Skip the product memo.
        #[arg(long)]
        no_memo: bool,

        /// Also write a reproducibility bundle (must be empty or absent).
        #[arg(long)]
        bundle: Option<PathBuf>,
    },

    /// Write a seeded synthetic household table (CSV or TSV by extension)
    Synthesize {
        /// Output path (`.csv` or `.tsv`).
        #[arg(short, long)]
        output: PathBuf,

        /// Seed.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// States to generate (comma-separated). Defaults to the built-in list.
        #[arg(long, value_delimiter = ',')]
        states: Vec<String>,

        /// Minimum households per state.
        #[arg(long, default_value = "200")]
        min_households: usize,

        /// Maximum households per state (exclusive).
        #[arg(long, default_value = "500")]
        max_households: usize,
    },

    /// Analyze a table and print the analysis results as JSON
    Analyze {
        /// Household table (CSV/TSV).
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Analyze the table as read, without cleaning.
        #[arg(long)]
        no_clean: bool,
    },

    /// Render a chart artifact JSON to SVG
    Render {
        /// Artifact JSON.
        #[arg(short, long)]
        input: PathBuf,

        /// Artifact kind. Inferred from `schema_version` when omitted.
        #[arg(long)]
        kind: Option<String>,

        /// Output SVG path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chart styling (YAML).
        #[arg(long)]
        viz_config: Option<PathBuf>,
    },

    /// Print version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            data,
            out_dir,
            seed,
            viz_config,
            no_charts,
            no_memo,
            bundle,
        } => {
            let overrides =
                run::RunOverrides { data, out_dir, seed, viz_config, no_charts, no_memo };
            cmd_run(config.as_ref(), overrides, bundle.as_ref())
        }
        Commands::Synthesize { output, seed, states, min_households, max_households } => {
            cmd_synthesize(&output, seed, states, min_households, max_households)
        }
        Commands::Analyze { input, output, no_clean } => {
            cmd_analyze(&input, output.as_ref(), no_clean)
        }
        Commands::Render { input, kind, output, viz_config } => {
            cmd_render(&input, kind.as_deref(), output.as_ref(), viz_config.as_ref())
        }
        Commands::Version => {
            println!("housestat {}", hs_core::VERSION);
            Ok(())
        }
    }
}

fn cmd_run(
    config: Option<&PathBuf>,
    overrides: run::RunOverrides,
    bundle: Option<&PathBuf>,
) -> Result<()> {
    let base = match config {
        Some(path) => run::read_run_config(path)?,
        None => run::RunConfig::default(),
    };
    let cfg = base.apply(overrides);
    tracing::info!(data = %cfg.data.display(), out_dir = %cfg.out_dir.display(), "starting run");

    let summary = run::run_pipeline(&cfg)?;

    if let Some(dir) = bundle {
        let args = serde_json::to_value(&cfg)?;
        bundle::write_bundle(dir, "run", args, config.map(PathBuf::as_path), &summary)?;
    }

    write_json(None, serde_json::to_value(&summary)?)
}

fn cmd_synthesize(
    output: &PathBuf,
    seed: u64,
    states: Vec<String>,
    min_households: usize,
    max_households: usize,
) -> Result<()> {
    let defaults = SynthConfig::default();
    let config = SynthConfig {
        states: if states.is_empty() { defaults.states } else { states },
        households_per_state: (min_households, max_households),
        seed,
        ..defaults
    };
    let table = run::synthesize(config, output)?;
    write_json(
        None,
        serde_json::json!({
            "path": output,
            "rows": table.len(),
            "seed": seed,
        }),
    )
}

fn cmd_analyze(input: &PathBuf, output: Option<&PathBuf>, no_clean: bool) -> Result<()> {
    tracing::info!(path = %input.display(), "loading household table");
    let table = hs_data::read_table(input)
        .with_context(|| format!("failed to load household table {}", input.display()))?;
    let opts = if no_clean {
        CleanOptions { standardize_states: false, drop_invalid: false }
    } else {
        CleanOptions::default()
    };
    let (results, _) = run::analyze(&table, &opts)?;
    write_json(output, serde_json::to_value(&results)?)
}

fn cmd_render(
    input: &PathBuf,
    kind: Option<&str>,
    output: Option<&PathBuf>,
    viz_config: Option<&PathBuf>,
) -> Result<()> {
    let json = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read artifact {}", input.display()))?;
    let kind = match kind {
        Some(k) => k.to_string(),
        None => {
            let v: serde_json::Value = serde_json::from_str(&json)
                .with_context(|| format!("artifact is not JSON: {}", input.display()))?;
            let schema = v.get("schema_version").and_then(|s| s.as_str()).unwrap_or("");
            hs_viz::kind_for_schema(schema)
                .with_context(|| {
                    format!("cannot infer chart kind from schema_version {schema:?}; pass --kind")
                })?
                .to_string()
        }
    };
    let viz = run::load_viz_config(viz_config.map(PathBuf::as_path))?;

    match output {
        Some(path) => {
            hs_viz_render::render_to_file(&json, &kind, path, &viz)?;
            tracing::info!(path = %path.display(), kind = %kind, "chart rendered");
        }
        None => print!("{}", hs_viz_render::render_svg(&json, &kind, &viz)?),
    }
    Ok(())
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
