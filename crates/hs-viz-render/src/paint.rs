//! Paint settings for the shapes and labels a chart emits.

use crate::color::Color;

/// Solid fill for rects and circles, with an optional outline.
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    pub color: Color,
    /// Outline color and width.
    pub outline: Option<(Color, f64)>,
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Self { color, outline: None }
    }

    pub fn outlined(self, color: Color, width: f64) -> Self {
        Self { outline: Some((color, width)), ..self }
    }
}

/// Stroke for lines and polylines.
#[derive(Debug, Clone, Copy)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// SVG `stroke-dasharray`.
    pub dash: Option<&'static str>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        Self { color, width, dash: Some("6 3") }
    }

    pub fn with_dash(self, dash: &'static str) -> Self {
        Self { dash: Some(dash), ..self }
    }
}

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// Vertical alignment of the text origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Auto,
    Central,
    Hanging,
}

/// Text settings. Built from a point size; other fields default to
/// black, regular, start-anchored on the alphabetic baseline.
#[derive(Debug, Clone, Copy)]
pub struct Label {
    pub size: f64,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub anchor: Anchor,
    pub baseline: Baseline,
}

impl Label {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            color: Color::rgb(0, 0, 0),
            bold: false,
            italic: false,
            anchor: Anchor::Start,
            baseline: Baseline::Auto,
        }
    }

    pub fn color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn bold(self, bold: bool) -> Self {
        Self { bold, ..self }
    }

    pub fn italic(self) -> Self {
        Self { italic: true, ..self }
    }

    pub fn anchor(self, anchor: Anchor) -> Self {
        Self { anchor, ..self }
    }

    pub fn baseline(self, baseline: Baseline) -> Self {
        Self { baseline, ..self }
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::new(10.0)
    }
}
