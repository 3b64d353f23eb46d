use serde::Deserialize;

use crate::color::Color;
use crate::theme::BuiltinTheme;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub header: HeaderConfig,
    pub colors: ColorsConfig,
    pub palette: String,
    pub states: StatesConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Housestat.base_config()
    }
}

impl VizConfig {
    pub fn palette_colors(&self) -> Vec<Color> {
        crate::color::palette_colors(&self.palette)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 648.0,  // 9" * 72
            height: 360.0, // 5" * 72
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: 10.0, label_size: 11.0, tick_size: 8.5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "out".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 4.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: true, color: Color::hex("#CBD5E1"), alpha: 0.55 }
    }
}

/// Title block drawn above every chart.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub show_title: bool,
    /// Right-aligned source note; `{survey}` and `{n}` are substituted.
    pub source: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self { show_title: true, source: "Source: {survey}, n = {n}".into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub bar: Color,
    pub with_internet: Color,
    pub without_internet: Color,
    pub trend: Color,
    pub reference: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            bar: Color::hex("#2E6F95"),
            with_internet: Color::hex("#2E6F95"),
            without_internet: Color::hex("#E07A1F"),
            trend: Color::hex("#C8553D"),
            reference: Color::hex("#475569"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatesConfig {
    /// Show only the top-N states; all when unset.
    pub top_n: Option<usize>,
}

/// Resolve a VizConfig from optional YAML string.
/// A `theme:` key selects the base preset; other keys override it.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    let Some(yaml) = user_yaml else {
        return Ok(VizConfig::default());
    };
    let value: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(yaml).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    let theme = value.get("theme").and_then(|t| t.as_str()).unwrap_or("housestat");
    let base = BuiltinTheme::parse(theme).base_config();
    merge_onto(base, &value)
}

fn merge_onto(base: VizConfig, overrides: &serde_yaml_ng::Value) -> crate::Result<VizConfig> {
    let serde_yaml_ng::Value::Mapping(map) = overrides else {
        return Err(crate::RenderError::Config("viz config must be a mapping".into()));
    };
    let mut cfg = base;
    for (k, v) in map {
        let key = k.as_str().unwrap_or_default();
        let parse = |what: &str| crate::RenderError::Config(format!("{what}: invalid value"));
        match key {
            "theme" => {
                if let Some(s) = v.as_str() {
                    cfg.theme = s.to_string();
                }
            }
            "palette" => {
                cfg.palette = v.as_str().ok_or_else(|| parse("palette"))?.to_string();
            }
            "figure" => cfg.figure = from_value(v, "figure")?,
            "font" => cfg.font = from_value(v, "font")?,
            "axes" => cfg.axes = from_value(v, "axes")?,
            "grid" => cfg.grid = from_value(v, "grid")?,
            "header" => cfg.header = from_value(v, "header")?,
            "colors" => cfg.colors = from_value(v, "colors")?,
            "states" => cfg.states = from_value(v, "states")?,
            other => return Err(crate::RenderError::Config(format!("unknown key '{other}'"))),
        }
    }
    Ok(cfg)
}

fn from_value<T: serde::de::DeserializeOwned>(
    v: &serde_yaml_ng::Value,
    section: &str,
) -> crate::Result<T> {
    serde_yaml_ng::from_value(v.clone())
        .map_err(|e| crate::RenderError::Config(format!("{section}: {e}")))
}
