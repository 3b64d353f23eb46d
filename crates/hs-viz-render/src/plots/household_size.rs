use hs_viz::HouseholdSizeArtifact;

use super::{category_axis_margin, draw_axes, empty_svg, value_axis_margin};
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::header::{draw_chart_header, header_height};
use crate::layout::PlotArea;
use crate::layout::axes::{Axis, band};
use crate::paint::{Anchor, Baseline, Fill, Label, Stroke};

pub fn render(artifact: &HouseholdSizeArtifact, config: &VizConfig) -> crate::Result<String> {
    if artifact.buckets.is_empty() && artifact.sizes.is_empty() {
        return empty_svg("No household size data");
    }

    let fig_w = config.figure.width;
    let fig_h = config.figure.height;
    let mut canvas = Canvas::new(fig_w, fig_h)?;

    let max_pct = artifact
        .buckets
        .iter()
        .map(|b| b.penetration_pct)
        .chain(artifact.sizes.iter().map(|s| s.penetration_pct))
        .fold(0.0_f64, f64::max);
    let y_axis = Axis::percent(max_pct).with_label("Penetration (%)");

    let left = value_axis_margin(&y_axis, config);
    let margins = [left, header_height(config), 15.0, category_axis_margin(config)];
    let (bars, scatter) = PlotArea::inset(fig_w, fig_h, margins).split(0.5, left * 0.8);

    draw_chart_header(
        &mut canvas,
        &bars,
        "Online Purchase Penetration by Household Size",
        &artifact.meta,
        config,
    );

    let area = bars;
    let labels: Vec<&str> = artifact.buckets.iter().map(|b| b.bucket.as_str()).collect();
    let x_axis = Axis::categorical(&labels).with_label("Household Size");
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);

    let value_label = Label::new(config.font.tick_size).anchor(Anchor::Middle);
    for (i, b) in artifact.buckets.iter().enumerate() {
        let (x, w) = band(&x_axis, i, area.left, area.right(), 0.18);
        let y = y_axis.data_to_pixel(b.penetration_pct, area.bottom(), area.top);
        canvas.rect(x, y, w, area.bottom() - y, Fill::solid(config.colors.bar));
        canvas.text(x + w / 2.0, y - 3.0, &format!("{:.1}%", b.penetration_pct), value_label);
    }

    // Per-size scatter, point area by sample size.
    let area = scatter;
    let max_size = artifact.sizes.iter().map(|s| s.household_size).max().unwrap_or(1);
    let x_axis = Axis::auto_linear(0.0, max_size as f64 + 0.5, 6).with_label("Household members");
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);

    let max_n = artifact.sizes.iter().map(|s| s.sample_size).max().unwrap_or(1).max(1) as f64;
    for s in &artifact.sizes {
        let px = x_axis.data_to_pixel(s.household_size as f64, area.left, area.right());
        let py = y_axis.data_to_pixel(s.penetration_pct, area.bottom(), area.top);
        let radius = 2.0 + 5.0 * (s.sample_size as f64 / max_n).sqrt();
        let color = config.colors.bar.with_alpha(0.75);
        canvas.circle(px, py, radius, Fill::solid(color).outlined(color, 0.5));
    }

    if let Some(trend) = artifact.trend {
        let to_px = |x: f64| {
            let y = (trend.intercept + trend.slope * x).clamp(y_axis.min, y_axis.max);
            (
                x_axis.data_to_pixel(x, area.left, area.right()),
                y_axis.data_to_pixel(y, area.bottom(), area.top),
            )
        };
        let points = [to_px(x_axis.min.max(0.5)), to_px(x_axis.max)];
        canvas.polyline(&points, Stroke::dashed(config.colors.trend, 1.2));
    }

    if let Some(r) = artifact.correlation {
        let p = match artifact.p_value {
            Some(p) if p < 0.001 => "p < 0.001".to_string(),
            Some(p) => format!("p = {p:.3}"),
            None => "p n/a".to_string(),
        };
        let note = Label::new(config.font.tick_size)
            .color(Color::rgb(55, 65, 81))
            .anchor(Anchor::End)
            .baseline(Baseline::Hanging);
        canvas.text(area.right() - 6.0, area.top + 6.0, &format!("r = {r:.3}, {p}"), note);
    }

    canvas.finish_svg()
}
