use hs_viz::StatePenetrationArtifact;

use super::{category_axis_margin, draw_axes, empty_svg};
use crate::canvas::Canvas;
use crate::color::{self, Color};
use crate::config::VizConfig;
use crate::header::{draw_chart_header, header_height};
use crate::layout::PlotArea;
use crate::layout::axes::Axis;
use crate::paint::{Anchor, Baseline, Fill, Label, Stroke};
use crate::text::widest;

pub fn render(artifact: &StatePenetrationArtifact, config: &VizConfig) -> crate::Result<String> {
    if artifact.states.is_empty() {
        return empty_svg("No state data");
    }

    let n = config.states.top_n.unwrap_or(artifact.states.len()).clamp(1, artifact.states.len());
    let states = &artifact.states[..n];

    let row_h = 16.0;
    let top = header_height(config);
    let bottom = category_axis_margin(config);
    let fig_w = config.figure.width;
    let fig_h = (top + row_h * n as f64 + bottom).max(config.figure.height);
    let mut canvas = Canvas::new(fig_w, fig_h)?;

    let name_label =
        Label::new(config.font.tick_size).anchor(Anchor::End).baseline(Baseline::Central);
    let names: Vec<&str> = states.iter().map(|s| s.state.as_str()).collect();
    let left = widest(&names, &name_label) + 20.0;
    let area = PlotArea::new(left, top, fig_w - left - 20.0, fig_h - top - bottom);

    draw_chart_header(
        &mut canvas,
        &area,
        "Online Purchase Penetration by State",
        &artifact.meta,
        config,
    );

    let max_pct = states.iter().map(|s| s.penetration_pct).fold(0.0_f64, f64::max);
    let max_pct = artifact.national_pct.map_or(max_pct, |nat| max_pct.max(nat));
    let x_axis = Axis::percent(max_pct).with_label("Penetration (%)");
    // Rows are laid out by rank below; the y axis only carries the frame.
    let y_axis = Axis::fixed(0.0, n as f64);
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);

    let lo = states.iter().map(|s| s.penetration_pct).fold(f64::INFINITY, f64::min);
    let hi = states.iter().map(|s| s.penetration_pct).fold(f64::NEG_INFINITY, f64::max);
    let spread = (hi - lo).max(1e-9);

    let value_label = Label::new(config.font.tick_size * 0.85)
        .color(Color::rgb(55, 65, 81))
        .baseline(Baseline::Central);
    let bar_h = area.height / n as f64;
    for (i, s) in states.iter().enumerate() {
        let y = area.top + i as f64 * bar_h;
        let x1 = x_axis.data_to_pixel(s.penetration_pct, area.left, area.right());
        let fill = color::ylorrd((s.penetration_pct - lo) / spread);
        canvas.rect(area.left, y + bar_h * 0.15, x1 - area.left, bar_h * 0.7, Fill::solid(fill));
        canvas.text(area.left - 6.0, y + bar_h / 2.0, &s.state, name_label);
        let value = format!("{:.1}%", s.penetration_pct);
        canvas.text(x1 + 3.0, y + bar_h / 2.0, &value, value_label);
    }

    if let Some(nat) = artifact.national_pct {
        let px = x_axis.data_to_pixel(nat, area.left, area.right());
        canvas.line(px, area.top, px, area.bottom(), Stroke::dashed(config.colors.reference, 1.0));
        let note = Label::new(config.font.tick_size * 0.85)
            .color(config.colors.reference)
            .baseline(Baseline::Hanging);
        canvas.text(px + 3.0, area.top + 3.0, &format!("National {nat:.1}%"), note);
    }

    canvas.finish_svg()
}
