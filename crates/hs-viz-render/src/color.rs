use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` (leading `#` optional). Malformed channels read as 0.
    pub fn hex(s: &str) -> Self {
        let s = s.strip_prefix('#').unwrap_or(s);
        let channel = |range: std::ops::Range<usize>| {
            s.get(range).and_then(|c| u8::from_str_radix(c, 16).ok()).unwrap_or(0)
        };
        Self { r: channel(0..2), g: channel(2..4), b: channel(4..6), a: 1.0 }
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    /// Relative luminance in `[0, 1]`, used to pick readable label colors.
    pub fn luminance(&self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }

    /// Linear interpolation between two colors (for colormaps).
    pub fn lerp(a: Color, b: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: (a.r as f64 * (1.0 - t) + b.r as f64 * t).round() as u8,
            g: (a.g as f64 * (1.0 - t) + b.g as f64 * t).round() as u8,
            b: (a.b as f64 * (1.0 - t) + b.b as f64 * t).round() as u8,
            a: a.a * (1.0 - t) + b.a * t,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Color::hex(&s))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

// --- Palettes ---

pub const HOUSESTAT: &[&str] = &[
    "#2E6F95", "#E07A1F", "#4F9D69", "#C8553D", "#7A6FB0", "#D4A72C", "#3FA7A3", "#9C6644",
];

pub const OKABE_ITO: &[&str] =
    &["#0072b2", "#d55e00", "#56b4e9", "#e69f00", "#f0e442", "#009e73", "#cc79a7"];

pub const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

pub fn palette_colors(name: &str) -> Vec<Color> {
    let strs = match name {
        "okabe_ito" => OKABE_ITO,
        "tableau10" => TABLEAU10,
        _ => HOUSESTAT,
    };
    strs.iter().map(|s| Color::hex(s)).collect()
}

// --- Colormaps ---

/// Sequential yellow → orange → red for `t` in `[0, 1]` (state penetration).
pub fn ylorrd(t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let (lo, mid, hi) = (Color::hex("#ffffb2"), Color::hex("#fd8d3c"), Color::hex("#bd0026"));
    if t < 0.5 { Color::lerp(lo, mid, t * 2.0) } else { Color::lerp(mid, hi, (t - 0.5) * 2.0) }
}

/// Diverging red → yellow → green centered on `mid`, saturating at `mid ± span`
/// (skew indices around 1.0).
pub fn rdylgn(val: f64, mid: f64, span: f64) -> Color {
    let span = if span > 0.0 { span } else { 1.0 };
    let v = ((val - mid) / span).clamp(-1.0, 1.0);
    let center = Color::hex("#ffffbf");
    if v < 0.0 {
        Color::lerp(center, Color::hex("#d73027"), -v)
    } else {
        Color::lerp(center, Color::hex("#1a9850"), v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::hex("#2E6F95");
        assert_eq!(c.r, 0x2E);
        assert_eq!(c.g, 0x6F);
        assert_eq!(c.b, 0x95);
        assert!((c.a - 1.0).abs() < 1e-9);
    }

    #[test]
    fn short_hex_does_not_panic() {
        assert_eq!(Color::hex("#12"), Color::rgb(0x12, 0, 0));
    }

    #[test]
    fn svg_fill_alpha() {
        let c = Color::rgb(29, 78, 216).with_alpha(0.5);
        assert_eq!(c.to_svg_fill(), "rgba(29,78,216,0.500)");
    }

    #[test]
    fn palette_lookup() {
        assert_eq!(palette_colors("housestat").len(), 8);
        assert_eq!(palette_colors("okabe_ito").len(), 7);
        assert_eq!(palette_colors("unknown").len(), 8);
    }

    #[test]
    fn diverging_center_and_extremes() {
        assert_eq!(rdylgn(1.0, 1.0, 0.5), Color::hex("#ffffbf"));
        let low = rdylgn(0.2, 1.0, 0.5);
        let high = rdylgn(2.0, 1.0, 0.5);
        assert!(low.r > low.g);
        assert!(high.g > high.r);
    }

    #[test]
    fn sequential_darkens() {
        assert!(ylorrd(1.0).luminance() < ylorrd(0.0).luminance());
    }
}
