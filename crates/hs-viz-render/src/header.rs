use hs_viz::ArtifactMeta;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::PlotArea;
use crate::paint::{Anchor, Label};

/// Vertical space reserved above the plot area for the title line.
pub fn header_height(config: &VizConfig) -> f64 {
    if config.header.show_title { config.font.label_size * 1.3 + 24.0 } else { 12.0 }
}

/// Draw the chart title (bold, left) and the source note (right).
pub fn draw_chart_header(
    canvas: &mut Canvas,
    area: &PlotArea,
    title: &str,
    meta: &ArtifactMeta,
    config: &VizConfig,
) {
    if !config.header.show_title {
        return;
    }

    let y = area.top - 10.0;
    let title_label = Label::new(config.font.label_size * 1.2)
        .color(Color::rgb(17, 24, 39))
        .bold(true);
    canvas.text(area.left, y, title, title_label);

    let source = source_note(&config.header.source, meta);
    if !source.is_empty() {
        let note = Label::new(config.font.tick_size)
            .color(Color::rgb(100, 116, 139))
            .italic()
            .anchor(Anchor::End);
        canvas.text(area.right(), y, &source, note);
    }
}

fn source_note(template: &str, meta: &ArtifactMeta) -> String {
    template.replace("{survey}", &meta.survey).replace("{n}", &meta.n_households.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_placeholders_are_filled() {
        let meta = ArtifactMeta {
            tool: "housestat".into(),
            tool_version: "0.0.0".into(),
            created_unix_ms: 0,
            survey: "HCES 2022-23".into(),
            n_households: 1234,
        };
        assert_eq!(
            source_note("Source: {survey}, n = {n}", &meta),
            "Source: HCES 2022-23, n = 1234"
        );
    }

    #[test]
    fn hidden_title_reserves_only_a_gap() {
        let mut config = VizConfig::default();
        assert!(header_height(&config) > config.font.label_size);
        config.header.show_title = false;
        assert_eq!(header_height(&config), 12.0);
    }
}
