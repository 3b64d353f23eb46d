pub mod canvas;
pub mod color;
pub mod config;
pub mod header;
pub mod layout;
pub mod output;
pub mod paint;
pub mod plots;
pub mod text;
pub mod theme;

use config::VizConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown artifact kind: {0}")]
    UnknownKind(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render an artifact JSON to SVG string.
pub fn render_svg(artifact_json: &str, kind: &str, config: &VizConfig) -> Result<String> {
    let svg = match kind {
        "household-size-vs-adoption" | "household_size" => {
            let art: hs_viz::HouseholdSizeArtifact = serde_json::from_str(artifact_json)?;
            plots::household_size::render(&art, config)?
        }
        "category-skew" | "category_skew" => {
            let art: hs_viz::CategorySkewArtifact = serde_json::from_str(artifact_json)?;
            plots::category_skew::render(&art, config)?
        }
        "state-penetration" | "state_penetration" => {
            let art: hs_viz::StatePenetrationArtifact = serde_json::from_str(artifact_json)?;
            plots::state_penetration::render(&art, config)?
        }
        "internet-impact" | "internet_impact" => {
            let art: hs_viz::InternetImpactArtifact = serde_json::from_str(artifact_json)?;
            plots::internet_impact::render(&art, config)?
        }
        other => return Err(RenderError::UnknownKind(other.to_string())),
    };
    Ok(svg)
}

/// Render an artifact JSON to bytes in the specified format. Only `svg` is supported.
pub fn render_to_bytes(
    artifact_json: &str,
    kind: &str,
    format: &str,
    config: &VizConfig,
) -> Result<Vec<u8>> {
    match format {
        "svg" => Ok(render_svg(artifact_json, kind, config)?.into_bytes()),
        other => Err(RenderError::UnknownKind(format!("format: {other}"))),
    }
}

/// Render an artifact JSON to a file (format inferred from extension).
pub fn render_to_file(
    artifact_json: &str,
    kind: &str,
    path: &std::path::Path,
    config: &VizConfig,
) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("svg");
    let bytes = render_to_bytes(artifact_json, kind, ext, config)?;
    output::svg::save_bytes(&bytes, path)
}
