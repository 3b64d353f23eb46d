use hs_viz::CategorySkewArtifact;

use super::{draw_frame, empty_svg};
use crate::canvas::Canvas;
use crate::color::{self, Color};
use crate::config::VizConfig;
use crate::header::{draw_chart_header, header_height};
use crate::layout::PlotArea;
use crate::paint::{Anchor, Baseline, Fill, Label};
use crate::text::widest;

/// Skew values at `1 ± SPAN` saturate the colormap.
const SPAN: f64 = 0.5;

pub fn render(artifact: &CategorySkewArtifact, config: &VizConfig) -> crate::Result<String> {
    let n_cols = artifact.categories.len();
    let n_rows = artifact.household_types.len();
    if n_cols == 0 || n_rows == 0 || artifact.skew.len() != n_rows {
        return empty_svg("No category data");
    }

    let cell_w = 90.0;
    let cell_h = 42.0;
    let colorbar_w = 16.0;
    let colorbar_gap = 14.0;

    let row_label =
        Label::new(config.font.tick_size).anchor(Anchor::End).baseline(Baseline::Central);
    let label_margin = widest(&artifact.household_types, &row_label) + 20.0;

    let matrix_w = cell_w * n_cols as f64;
    let matrix_h = cell_h * n_rows as f64;
    let top = header_height(config);
    let fig_w = (label_margin + matrix_w + colorbar_gap + colorbar_w + 50.0).max(360.0);
    let fig_h = top + matrix_h + config.font.tick_size + config.font.label_size + 40.0;

    let mut canvas = Canvas::new(fig_w, fig_h)?;
    let area = PlotArea::new(label_margin, top, matrix_w, matrix_h);
    draw_chart_header(
        &mut canvas,
        &area,
        "Category Skew Index by Household Type",
        &artifact.meta,
        config,
    );

    for (row, values) in artifact.skew.iter().enumerate() {
        for (col, &val) in values.iter().enumerate().take(n_cols) {
            let cell_color = color::rdylgn(val, 1.0, SPAN);
            let x = area.left + col as f64 * cell_w;
            let y = area.top + row as f64 * cell_h;
            canvas.rect(x, y, cell_w, cell_h, Fill::solid(cell_color));

            let ink = if cell_color.luminance() < 0.45 {
                Color::rgb(255, 255, 255)
            } else {
                Color::rgb(0, 0, 0)
            };
            // Values over the flag threshold are set in bold.
            let value = Label::new(config.font.size)
                .color(ink)
                .bold(val > artifact.threshold)
                .anchor(Anchor::Middle)
                .baseline(Baseline::Central);
            canvas.text(x + cell_w / 2.0, y + cell_h / 2.0, &format!("{val:.2}x"), value);
        }
    }

    for (i, name) in artifact.household_types.iter().enumerate() {
        let y = area.top + (i as f64 + 0.5) * cell_h;
        canvas.text(area.left - 6.0, y, name, row_label);
    }

    let col_label =
        Label::new(config.font.tick_size).anchor(Anchor::Middle).baseline(Baseline::Hanging);
    for (i, name) in artifact.categories.iter().enumerate() {
        let x = area.left + (i as f64 + 0.5) * cell_w;
        canvas.text(x, area.bottom() + 5.0, name, col_label);
    }
    let title = Label::new(config.font.label_size).anchor(Anchor::Middle);
    let title_y = area.bottom() + config.font.tick_size + 20.0;
    canvas.text(area.left + matrix_w / 2.0, title_y, "Category", title);

    // Colorbar
    let cb_x = area.right() + colorbar_gap;
    let cb_steps = 40;
    let cb_h = matrix_h / cb_steps as f64;
    for i in 0..cb_steps {
        let val = 1.0 + SPAN - 2.0 * SPAN * i as f64 / (cb_steps - 1) as f64;
        let y = area.top + i as f64 * cb_h;
        let c = color::rdylgn(val, 1.0, SPAN);
        canvas.rect(cb_x, y, colorbar_w, cb_h + 0.5, Fill::solid(c));
    }
    let cb_label = Label::new(config.font.tick_size * 0.85).baseline(Baseline::Central);
    let lx = cb_x + colorbar_w + 3.0;
    canvas.text(lx, area.top, &format!("{:.1}x", 1.0 + SPAN), cb_label);
    canvas.text(lx, area.top + matrix_h / 2.0, "1.0x", cb_label);
    canvas.text(lx, area.bottom(), &format!("{:.1}x", 1.0 - SPAN), cb_label);

    draw_frame(&mut canvas, &area);

    canvas.finish_svg()
}
