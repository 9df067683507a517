use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Compute margins inside `outer` from the y tick labels and axis titles.
    pub fn auto_within(
        canvas: &Canvas,
        outer: PlotArea,
        y_axis: &Axis,
        x_axis: &Axis,
        config: &VizConfig,
        top: f64,
    ) -> Self {
        let tick_style = TextStyle::sized(config.font.tick_size);

        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &tick_style).width)
            .fold(0.0_f64, f64::max);
        let mut left = 10.0 + max_tick_w + 6.0;
        if !y_axis.label.is_empty() {
            left += config.font.label_size + 8.0;
        }

        let mut bottom = config.font.tick_size + 10.0;
        if !x_axis.label.is_empty() {
            bottom += config.font.label_size + 6.0;
        }
        let right = 15.0;

        Self {
            left: outer.left + left,
            top: outer.top + top,
            width: (outer.width - left - right).max(20.0),
            height: (outer.height - top - bottom).max(20.0),
        }
    }

    /// Full-figure plot area with room for the experiment header.
    pub fn auto(canvas: &Canvas, y_axis: &Axis, x_axis: &Axis, config: &VizConfig) -> Self {
        let top = if config.experiment.name.is_empty() {
            18.0
        } else {
            config.font.label_size * 1.3 + 20.0
        };
        let outer = Self::manual(0.0, 0.0, canvas.width, canvas.height);
        Self::auto_within(canvas, outer, y_axis, x_axis, config, top)
    }

    /// Manual placement (for multi-panel layouts).
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}
