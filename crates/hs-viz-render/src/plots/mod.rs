pub mod category_skew;
pub mod household_size;
pub mod internet_impact;
pub mod state_penetration;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::PlotArea;
use crate::layout::axes::Axis;
use crate::paint::{Anchor, Baseline, Label, Stroke};
use crate::text::widest;

const INK: Color = Color::rgb(0, 0, 0);

/// Left margin for a value axis: tick labels plus the rotated axis title.
fn value_axis_margin(y_axis: &Axis, config: &VizConfig) -> f64 {
    let ticks = widest(&y_axis.tick_labels, &Label::new(config.font.tick_size));
    15.0 + ticks + 8.0 + config.font.label_size + 6.0
}

/// Bottom margin for a labelled x axis.
fn category_axis_margin(config: &VizConfig) -> f64 {
    config.font.tick_size + config.font.label_size + 34.0
}

/// Frame, ticks, labels and (per [`Axis::grid`]) grid lines around `area`.
fn draw_axes(canvas: &mut Canvas, area: &PlotArea, x: &Axis, y: &Axis, config: &VizConfig) {
    let len = config.axes.tick_length;
    // Signed tick reach away from the data, and the room it takes outside the frame.
    let reach = if config.axes.tick_direction == "in" { -len } else { len };
    let clear = reach.max(0.0);
    let tick = Stroke::solid(INK, 0.6);
    let grid_color = config.grid.color.with_alpha(config.grid.alpha);
    let grid = Stroke::solid(grid_color, 0.5).with_dash("3 3");

    draw_frame(canvas, area);

    let x_tick_label =
        Label::new(config.font.tick_size).anchor(Anchor::Middle).baseline(Baseline::Hanging);
    for (px, text) in ticks_within(x, area.left, area.right()) {
        if config.grid.show && x.grid {
            canvas.line(px, area.top, px, area.bottom(), grid);
        }
        canvas.line(px, area.bottom(), px, area.bottom() + reach, tick);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top - reach, tick);
        }
        if let Some(text) = text {
            canvas.text(px, area.bottom() + clear + 3.0, text, x_tick_label);
        }
    }

    let y_tick_label =
        Label::new(config.font.tick_size).anchor(Anchor::End).baseline(Baseline::Central);
    for (py, text) in ticks_within(y, area.bottom(), area.top) {
        if config.grid.show && y.grid {
            canvas.line(area.left, py, area.right(), py, grid);
        }
        canvas.line(area.left, py, area.left - reach, py, tick);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() + reach, py, tick);
        }
        if let Some(text) = text {
            canvas.text(area.left - clear - 4.0, py, text, y_tick_label);
        }
    }

    let title = Label::new(config.font.label_size).anchor(Anchor::Middle);
    if !x.label.is_empty() {
        let ty = area.bottom() + clear + config.font.tick_size + 16.0;
        canvas.text(area.left + area.width / 2.0, ty, &x.label, title);
    }
    if !y.label.is_empty() {
        let tx = area.left - len - widest(&y.tick_labels, &y_tick_label) - 12.0;
        canvas.text_rotated(tx, area.top + area.height / 2.0, &y.label, title, -90.0);
    }
}

/// Pixel position and label of every tick that lands on `[from, to]`.
fn ticks_within<'a>(
    axis: &'a Axis,
    from: f64,
    to: f64,
) -> impl Iterator<Item = (f64, Option<&'a str>)> + 'a {
    let (lo, hi) = (from.min(to) - 0.5, from.max(to) + 0.5);
    axis.tick_positions.iter().enumerate().filter_map(move |(i, &value)| {
        let px = axis.data_to_pixel(value, from, to);
        (lo..=hi).contains(&px).then(|| (px, axis.tick_labels.get(i).map(String::as_str)))
    })
}

fn draw_frame(canvas: &mut Canvas, area: &PlotArea) {
    let edge = Stroke::solid(INK, 0.8);
    let (l, t, r, b) = (area.left, area.top, area.right(), area.bottom());
    for (x1, y1, x2, y2) in [(l, t, r, t), (l, b, r, b), (l, t, l, b), (r, t, r, b)] {
        canvas.line(x1, y1, x2, y2, edge);
    }
}

/// Small SVG carrying only `message`, for artifacts with nothing to plot.
fn empty_svg(message: &str) -> crate::Result<String> {
    let mut canvas = Canvas::new(240.0, 50.0)?;
    canvas.text(10.0, 30.0, message, Label::default());
    canvas.finish_svg()
}
