use std::fmt::{self, Write as FmtWrite};

use crate::RenderError;
use crate::paint::{Anchor, Baseline, Fill, Label, Stroke};

/// An SVG element stored for deferred rendering.
#[derive(Debug, Clone)]
enum SvgElement {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Fill,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        stroke: Stroke,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        label: Label,
        rotate: Option<f64>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Fill,
    },
}

/// Immediate-mode SVG canvas. Coordinates in points (1pt = 1/72").
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    elements: Vec<SvgElement>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> crate::Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RenderError::Layout(format!("invalid canvas size {width}x{height}")));
        }
        Ok(Self { width, height, elements: Vec::new() })
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Fill) {
        self.push(SvgElement::Rect { x, y, w, h, fill });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) {
        self.push(SvgElement::Line { x1, y1, x2, y2, stroke });
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: Stroke) {
        self.push(SvgElement::Polyline { points: points.to_vec(), stroke });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, label: Label) {
        let content = content.to_string();
        self.push(SvgElement::Text { x, y, content, label, rotate: None });
    }

    /// Text rotated by `angle` degrees about its origin.
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, label: Label, angle: f64) {
        let content = content.to_string();
        self.push(SvgElement::Text { x, y, content, label, rotate: Some(angle) });
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: Fill) {
        self.push(SvgElement::Circle { cx, cy, r, fill });
    }

    fn push(&mut self, elem: SvgElement) {
        self.elements.push(elem);
    }

    pub fn finish_svg(&self) -> crate::Result<String> {
        self.write_svg().map_err(|e| RenderError::Layout(format!("svg write failed: {e}")))
    }

    fn write_svg(&self) -> Result<String, fmt::Error> {
        let mut out = String::with_capacity(32 * 1024);
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        )?;
        writeln!(out, r#"<rect width="{}" height="{}" fill="white" />"#, self.width, self.height)?;
        for elem in &self.elements {
            render_element(&mut out, elem)?;
        }
        out.push_str("</svg>\n");
        Ok(out)
    }
}

fn render_element(out: &mut String, elem: &SvgElement) -> fmt::Result {
    match elem {
        SvgElement::Rect { x, y, w, h, fill } => {
            write!(out, r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#)?;
            write_fill_attrs(out, fill)?;
            out.push_str(" />\n");
        }
        SvgElement::Line { x1, y1, x2, y2, stroke } => {
            write!(out, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#)?;
            write_stroke_attrs(out, stroke)?;
            out.push_str(" />\n");
        }
        SvgElement::Polyline { points, stroke } => {
            out.push_str(r#"<polyline points=""#);
            for (i, (x, y)) in points.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write!(out, "{x:.2},{y:.2}")?;
            }
            out.push_str(r#"" fill="none""#);
            write_stroke_attrs(out, stroke)?;
            out.push_str(" />\n");
        }
        SvgElement::Text { x, y, content, label, rotate } => {
            let anchor = match label.anchor {
                Anchor::Start => "start",
                Anchor::Middle => "middle",
                Anchor::End => "end",
            };
            let baseline = match label.baseline {
                Baseline::Auto => "auto",
                Baseline::Central => "central",
                Baseline::Hanging => "hanging",
            };
            write!(out, r#"<text x="{x:.2}" y="{y:.2}""#)?;
            write!(out, r#" font-family="Inter, sans-serif" font-size="{:.1}""#, label.size)?;
            write!(out, r#" fill="{}""#, label.color.to_svg_fill())?;
            write!(out, r#" text-anchor="{anchor}" dominant-baseline="{baseline}""#)?;
            if label.bold {
                out.push_str(r#" font-weight="bold""#);
            }
            if label.italic {
                out.push_str(r#" font-style="italic""#);
            }
            if let Some(angle) = rotate {
                write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#)?;
            }
            out.push('>');
            push_escaped(out, content);
            out.push_str("</text>\n");
        }
        SvgElement::Circle { cx, cy, r, fill } => {
            write!(out, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}""#)?;
            write_fill_attrs(out, fill)?;
            out.push_str(" />\n");
        }
    }
    Ok(())
}

fn push_escaped(out: &mut String, content: &str) {
    for ch in content.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn write_fill_attrs(out: &mut String, fill: &Fill) -> fmt::Result {
    write!(out, r#" fill="{}""#, fill.color.to_svg_fill())?;
    if let Some((color, width)) = fill.outline {
        write!(out, r#" stroke="{}" stroke-width="{width:.2}""#, color.to_svg_fill())?;
    }
    Ok(())
}

fn write_stroke_attrs(out: &mut String, stroke: &Stroke) -> fmt::Result {
    write!(out, r#" stroke="{}""#, stroke.color.to_svg_fill())?;
    write!(out, r#" stroke-width="{:.2}""#, stroke.width)?;
    if let Some(dash) = stroke.dash {
        write!(out, r#" stroke-dasharray="{dash}""#)?;
    }
    Ok(())
}
