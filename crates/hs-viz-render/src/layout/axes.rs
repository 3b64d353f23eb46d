/// Axis configuration with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    /// Draw grid lines at the ticks.
    pub grid: bool,
}

impl Axis {
    /// Auto-scale linear axis with "nice number" ticks.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (nice_min, nice_max, step) = nice_range(data_min, data_max, target_ticks);
        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut v = nice_min;
        while v <= nice_max + step * 0.01 {
            ticks.push(v);
            labels.push(format_tick(v, step));
            v += step;
        }

        Self {
            min: nice_min,
            max: nice_max,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            grid: true,
        }
    }

    /// Percentage axis starting at zero, capped at 100.
    pub fn percent(data_max: f64) -> Self {
        let top = (data_max * 1.12).clamp(1.0, 100.0);
        Self::auto_linear(0.0, top, 6)
    }

    /// Categorical axis: one tick per label at the band centers, data
    /// coordinates `0..n`.
    pub fn categorical<S: AsRef<str>>(labels: &[S]) -> Self {
        let n = labels.len().max(1) as f64;
        Self {
            min: 0.0,
            max: n,
            label: String::new(),
            tick_positions: (0..labels.len()).map(|i| i as f64 + 0.5).collect(),
            tick_labels: labels.iter().map(|s| s.as_ref().to_string()).collect(),
            grid: false,
        }
    }

    /// Fixed axis with explicit limits (no tick auto-generation).
    pub fn fixed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            label: String::new(),
            tick_positions: Vec::new(),
            tick_labels: Vec::new(),
            grid: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < 1e-15 {
            return px_min;
        }
        let frac = (value - self.min) / span;
        px_min + frac * (px_max - px_min)
    }
}

/// Band of category `i` along a categorical axis: `(start, width)` in pixels,
/// with `padding` (fraction of the band) left empty on each side.
pub fn band(axis: &Axis, i: usize, px_min: f64, px_max: f64, padding: f64) -> (f64, f64) {
    let a = axis.data_to_pixel(i as f64, px_min, px_max);
    let b = axis.data_to_pixel(i as f64 + 1.0, px_min, px_max);
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let pad = (hi - lo) * padding.clamp(0.0, 0.45);
    (lo + pad, hi - lo - 2.0 * pad)
}

/// "Nice numbers" algorithm for pleasant tick spacing.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if (data_max - data_min).abs() < 1e-15 {
        return (data_min - 1.0, data_max + 1.0, 1.0);
    }
    let range = data_max - data_min;
    let rough_step = range / (target_ticks.max(2) - 1) as f64;
    let step = nice_step(rough_step);
    let nice_min = (data_min / step).floor() * step;
    let nice_max = (data_max / step).ceil() * step;
    (nice_min, nice_max, step)
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    if decimals == 0 {
        // Avoid "-0"
        let v = if value.abs() < step * 0.01 { 0.0 } else { value };
        format!("{}", v.round() as i64)
    } else {
        format!("{:.prec$}", value, prec = decimals)
    }
}
