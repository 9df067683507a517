use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw the experiment label above the plot (e.g. **TEPX** *Simulation*, info on the right).
pub fn draw_experiment_header(canvas: &mut Canvas, area: &PlotArea, config: &VizConfig) {
    if config.experiment.name.is_empty() {
        return;
    }

    let header_size = config.font.label_size * 1.3;
    let x = area.left + area.width * 0.02;
    let y = area.top - 6.0;

    let bold_style = TextStyle::sized(header_size).bold();
    canvas.text(x, y, &config.experiment.name, &bold_style);
    let name_w = canvas.measure_text(&config.experiment.name, &bold_style).width;

    if !config.experiment.status.is_empty() {
        let italic_style = TextStyle::sized(header_size * 0.85).italic();
        canvas.text(x + name_w + 5.0, y, &config.experiment.status, &italic_style);
    }

    if !config.experiment.info.is_empty() {
        let info_style = TextStyle::sized(config.font.tick_size)
            .colored(Color::rgb(80, 80, 80))
            .anchored(TextAnchor::End, TextBaseline::Alphabetic);
        canvas.text(area.right(), y, &config.experiment.info, &info_style);
    }
}

/// Draw a centred plot title above the area (used instead of the header in grid panels).
pub fn draw_title(canvas: &mut Canvas, area: &PlotArea, title: &str, size: f64) {
    if title.is_empty() {
        return;
    }
    let style = TextStyle::sized(size).anchored(TextAnchor::Middle, TextBaseline::Alphabetic);
    canvas.text(area.left + area.width / 2.0, area.top - 5.0, title, &style);
}
