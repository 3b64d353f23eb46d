use crate::paint::Label;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Advance width of `ch` in ems for a generic proportional sans-serif.
fn advance_em(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '!' | '|' | '.' | ',' | ':' | ';' | '\'' => 0.28,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '/' | '-' | ' ' => 0.36,
        'm' | 'w' | 'M' | 'W' | '%' | '@' => 0.86,
        c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.64,
        c if c.is_ascii() => 0.54,
        _ => 0.62,
    }
}

/// Estimate text extent in points. Layout only needs margins and legend
/// boxes, so a per-glyph width table replaces font shaping.
pub fn measure_text(text: &str, label: &Label) -> TextMetrics {
    let bold = if label.bold { 1.06 } else { 1.0 };
    let width = text.chars().map(advance_em).sum::<f64>() * label.size * bold;
    TextMetrics { width, height: label.size, ascent: label.size * 0.78 }
}

/// Width of the widest of `texts`.
pub fn widest<S: AsRef<str>>(texts: &[S], label: &Label) -> f64 {
    texts.iter().map(|t| measure_text(t.as_ref(), label).width).fold(0.0_f64, f64::max)
}
