use hs_viz::InternetImpactArtifact;

use super::{draw_axes, empty_svg, value_axis_margin};
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::header::{draw_chart_header, header_height};
use crate::layout::PlotArea;
use crate::layout::axes::{Axis, band};
use crate::paint::{Anchor, Baseline, Fill, Label};
use crate::text::widest;

/// Grouped bars per size bucket: with vs without internet.
pub fn render(artifact: &InternetImpactArtifact, config: &VizConfig) -> crate::Result<String> {
    if artifact.buckets.is_empty() && artifact.groups.is_empty() {
        return empty_svg("No internet access data");
    }

    let (fig_w, fig_h) = (config.figure.width, config.figure.height);
    let mut canvas = Canvas::new(fig_w, fig_h)?;

    // Overall groups form a leading "All households" category.
    let mut labels: Vec<String> = vec!["All households".to_string()];
    labels.extend(artifact.buckets.iter().map(|b| b.bucket.clone()));
    let overall = |access: bool| {
        artifact.groups.iter().find(|g| g.internet_access == access).map(|g| g.penetration_pct)
    };
    let mut pairs = vec![(overall(true), overall(false))];
    pairs.extend(artifact.buckets.iter().map(|b| (b.with_internet_pct, b.without_internet_pct)));

    let max_pct = pairs
        .iter()
        .flat_map(|(a, b)| [*a, *b])
        .flatten()
        .fold(0.0_f64, f64::max);
    let y_axis = Axis::percent(max_pct).with_label("Penetration (%)");
    let x_axis = Axis::categorical(&labels).with_label("Household Size");
    let bottom = 15.0 + config.font.tick_size + 6.0 + config.font.label_size + 6.0;
    let margins = [value_axis_margin(&y_axis, config), header_height(config), 15.0, bottom];
    let area = PlotArea::inset(fig_w, fig_h, margins);

    draw_chart_header(
        &mut canvas,
        &area,
        "Online Purchase Penetration by Internet Access",
        &artifact.meta,
        config,
    );
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);

    let value_label = Label::new(config.font.tick_size * 0.85).anchor(Anchor::Middle);
    let colors = [config.colors.with_internet, config.colors.without_internet];
    for (i, (with, without)) in pairs.iter().enumerate() {
        let (x, w) = band(&x_axis, i, area.left, area.right(), 0.12);
        let half = w / 2.0;
        for (j, value) in [with, without].into_iter().enumerate() {
            let Some(pct) = value else { continue };
            let bx = x + j as f64 * half;
            let y = y_axis.data_to_pixel(*pct, area.bottom(), area.top);
            canvas.rect(bx, y, half * 0.94, area.bottom() - y, Fill::solid(colors[j]));
            canvas.text(bx + half * 0.47, y - 3.0, &format!("{pct:.1}%"), value_label);
        }
    }

    let entries = [("With internet", colors[0]), ("Without internet", colors[1])];
    draw_legend(&mut canvas, &area, &entries, config.font.size);

    canvas.finish_svg()
}

/// Framed key of colored swatches in the top-right corner of `area`.
fn draw_legend(canvas: &mut Canvas, area: &PlotArea, entries: &[(&str, Color)], font_size: f64) {
    const PAD: f64 = 6.0;
    const SWATCH_W: f64 = 14.0;

    let label = Label::new(font_size * 0.85).baseline(Baseline::Central);
    let names: Vec<&str> = entries.iter().map(|(name, _)| *name).collect();
    let row_h = font_size + 4.0;
    let w = PAD + SWATCH_W + PAD + widest(&names, &label) + PAD;
    let h = 2.0 * PAD + entries.len() as f64 * row_h;
    let (x0, y0) = (area.right() - w - 5.0, area.top + 5.0);

    let backdrop =
        Fill::solid(Color::rgba(255, 255, 255, 0.9)).outlined(Color::rgb(200, 200, 200), 0.5);
    canvas.rect(x0, y0, w, h, backdrop);
    for (i, (name, color)) in entries.iter().enumerate() {
        let cy = y0 + PAD + (i as f64 + 0.5) * row_h;
        let swatch_h = font_size - 2.0;
        canvas.rect(x0 + PAD, cy - swatch_h / 2.0, SWATCH_W, swatch_h, Fill::solid(*color));
        canvas.text(x0 + PAD + SWATCH_W + PAD, cy, name, label);
    }
}
