use tepx_viz::Hist1dArtifact;

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::draw_axes;
use crate::plots::{Frame, empty_svg, place};
use crate::primitives::*;

pub fn render(artifact: &Hist1dArtifact, config: &VizConfig) -> crate::Result<String> {
    if artifact.contents.is_empty() {
        return Ok(empty_svg("histogram"));
    }
    let mut canvas = Canvas::new(config.figure.width, config.figure.height)?;
    let outer = PlotArea::manual(0.0, 0.0, canvas.width, canvas.height);
    draw(&mut canvas, outer, artifact, config, Frame::Figure);
    Ok(canvas.finish_svg())
}

/// Step outline of the histogram, filled underneath.
pub fn draw(
    canvas: &mut Canvas,
    outer: PlotArea,
    artifact: &Hist1dArtifact,
    config: &VizConfig,
    frame: Frame,
) {
    let n = artifact.contents.len().min(artifact.edges.len().saturating_sub(1));
    let (x_lo, x_hi) = match (artifact.edges.first(), artifact.edges.get(n)) {
        (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
        _ => (0.0, 1.0),
    };
    let x_axis = Axis::exact(x_lo, x_hi, 5).with_label(&artifact.x_label);
    let y_max = (artifact.max_content() * 1.1).max(1.0);
    let y_axis = Axis::auto_linear(0.0, y_max, 5).with_label(&artifact.y_label);

    let area = place(canvas, outer, frame, &artifact.title, &x_axis, &y_axis, config);
    draw_axes(canvas, &area, &x_axis, &y_axis, config);

    let base = y_axis.data_to_pixel(0.0, area.bottom(), area.top);
    let mut outline = Vec::with_capacity(2 * n + 2);
    outline.push((x_axis.data_to_pixel(x_lo, area.left, area.right()), base));
    for i in 0..n {
        let y = y_axis.data_to_pixel(artifact.contents[i], area.bottom(), area.top);
        outline.push((x_axis.data_to_pixel(artifact.edges[i], area.left, area.right()), y));
        outline.push((x_axis.data_to_pixel(artifact.edges[i + 1], area.left, area.right()), y));
    }
    outline.push((x_axis.data_to_pixel(x_hi, area.left, area.right()), base));

    canvas.push_clip(area.left, area.top, area.width, area.height);
    canvas.polygon(&outline, &Style::filled(config.series_color(1).with_alpha(0.25)));
    canvas.polyline(&outline, &LineStyle::solid(config.series_color(1), 1.0));
    canvas.pop_clip();

    if frame == Frame::Figure {
        let style = TextStyle::sized(config.font.tick_size)
            .anchored(TextAnchor::End, TextBaseline::Hanging);
        let entries = format!("Entries {}", artifact.entries);
        canvas.text(area.right() - 6.0, area.top + 6.0, &entries, &style);
    }
}
