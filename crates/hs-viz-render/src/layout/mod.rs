pub mod axes;

/// Rectangle the data is drawn into, in canvas points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// What a `fig_w` x `fig_h` canvas leaves after `[left, top, right, bottom]`
    /// margins. Never narrower or shorter than 50pt.
    pub fn inset(fig_w: f64, fig_h: f64, margins: [f64; 4]) -> Self {
        let [left, top, right, bottom] = margins;
        let width = (fig_w - left - right).max(50.0);
        let height = (fig_h - top - bottom).max(50.0);
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Side-by-side panels `gap` apart; the first takes `frac` of the width.
    pub fn split(self, frac: f64, gap: f64) -> (Self, Self) {
        let first_w = self.width * frac;
        let first = Self { width: first_w, ..self };
        let second =
            Self { left: self.left + first_w + gap, width: self.width - first_w - gap, ..self };
        (first, second)
    }
}
