use tepx_viz::{GraphArtifact, SeriesArtifact};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::legend::{LegendEntry, LegendKind, draw_legend};
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::{draw_axes, draw_reference_line};
use crate::plots::{Frame, empty_svg, place};
use crate::primitives::*;

pub fn render(artifact: &GraphArtifact, config: &VizConfig) -> crate::Result<String> {
    if artifact.series.iter().all(|s| s.x.is_empty()) {
        return Ok(empty_svg("graph"));
    }
    let mut canvas = Canvas::new(config.figure.width, config.figure.height)?;
    let outer = PlotArea::manual(0.0, 0.0, canvas.width, canvas.height);
    draw(&mut canvas, outer, artifact, config, Frame::Figure);
    Ok(canvas.finish_svg())
}

/// Draw the graph inside `outer`.
pub fn draw(
    canvas: &mut Canvas,
    outer: PlotArea,
    artifact: &GraphArtifact,
    config: &VizConfig,
    frame: Frame,
) {
    let (x_lo, x_hi) = artifact.x_range().unwrap_or((0.0, 1.0));
    let (mut y_lo, mut y_hi) = artifact.y_range().unwrap_or((0.0, 1.0));
    if artifact.zero_line {
        y_lo = y_lo.min(0.0);
        y_hi = y_hi.max(0.0);
    }
    let x_axis = Axis::padded(x_lo, x_hi, 0.04, 6).with_label(&artifact.x_label);
    let y_axis = Axis::padded(y_lo, y_hi, 0.08, 5).with_label(&artifact.y_label);

    let area = place(canvas, outer, frame, &artifact.title, &x_axis, &y_axis, config);
    draw_axes(canvas, &area, &x_axis, &y_axis, config);
    if artifact.zero_line {
        draw_reference_line(canvas, &area, &y_axis, 0.0, config.colors.reference);
    }

    canvas.push_clip(area.left, area.top, area.width, area.height);
    for (i, s) in artifact.series.iter().enumerate() {
        let color = config.series_color(i);
        draw_series(canvas, &area, &x_axis, &y_axis, s, color, frame, MarkerShape::Circle);
    }
    canvas.pop_clip();

    if frame == Frame::Figure && artifact.series.len() > 1 {
        let entries: Vec<LegendEntry> = artifact
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| LegendEntry {
                label: s.label.clone(),
                color: config.series_color(i),
                kind: LegendKind::Marker,
            })
            .collect();
        draw_legend(canvas, &area, &entries, config.font.size);
    }
}

/// Markers with vertical error bars, data coordinates mapped through the axes.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_series(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    series: &SeriesArtifact,
    color: Color,
    frame: Frame,
    shape: MarkerShape,
) {
    let size = if frame == Frame::Panel { 1.8 } else { 2.8 };
    let bar = LineStyle::solid(color, 0.8);
    let marker = match shape {
        MarkerShape::Circle => MarkerStyle::solid(shape, color, size),
        MarkerShape::Square => MarkerStyle::hollow(shape, color, size),
    };
    for ((&x, &y), &ey) in series.x.iter().zip(&series.y).zip(&series.ey) {
        let px = x_axis.data_to_pixel(x, area.left, area.right());
        let py = y_axis.data_to_pixel(y, area.bottom(), area.top);
        if ey > 0.0 {
            let lo = y_axis.data_to_pixel(y - ey, area.bottom(), area.top);
            let hi = y_axis.data_to_pixel(y + ey, area.bottom(), area.top);
            canvas.error_bar(px, lo, hi, size * 1.5, &bar);
        }
        canvas.marker(px, py, &marker);
    }
}
