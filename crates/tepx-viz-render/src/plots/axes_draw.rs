use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw a box frame with ticks, grid, tick labels and axis titles.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) {
    draw_axes_with(canvas, area, x_axis, y_axis, config, true);
}

/// [`draw_axes`], optionally without x tick labels and title (upper panel of a stack).
pub fn draw_axes_with(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
    x_labels: bool,
) {
    let frame_color = Color::rgb(0, 0, 0);
    let tick_line = LineStyle::solid(frame_color, 0.6);
    let minor_tick_line = LineStyle::solid(frame_color, 0.4);
    let grid_line = LineStyle::dotted(config.grid.color.with_alpha(config.grid.alpha), 0.5);

    // Inward ticks point into the frame, outward ones away from it.
    let dir = if config.axes.tick_direction == "in" { 1.0 } else { -1.0 };
    let tl = config.axes.tick_length * dir;
    let mtl = config.axes.minor_tick_length * dir;
    let outside = if dir > 0.0 { 0.0 } else { config.axes.tick_length };

    draw_frame(canvas, area);

    // --- X axis ---
    let x_label_style = TextStyle::sized(config.font.tick_size)
        .anchored(TextAnchor::Middle, TextBaseline::Hanging);
    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        if config.grid.show {
            canvas.line(px, area.top, px, area.bottom(), &grid_line);
        }
        canvas.line(px, area.bottom(), px, area.bottom() - tl, &tick_line);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top + tl, &tick_line);
        }
        if x_labels && let Some(label) = x_axis.tick_labels.get(i) {
            canvas.text(px, area.bottom() + outside + 3.0, label, &x_label_style);
        }
    }
    for &val in &x_axis.minor_ticks {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px >= area.left - 0.5 && px <= area.right() + 0.5 {
            canvas.line(px, area.bottom(), px, area.bottom() - mtl, &minor_tick_line);
        }
    }

    // --- Y axis ---
    let y_label_style = TextStyle::sized(config.font.tick_size)
        .anchored(TextAnchor::End, TextBaseline::Central);
    let mut widest = 0.0_f64;
    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        if config.grid.show {
            canvas.line(area.left, py, area.right(), py, &grid_line);
        }
        canvas.line(area.left, py, area.left + tl, py, &tick_line);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() - tl, py, &tick_line);
        }
        if let Some(label) = y_axis.tick_labels.get(i) {
            widest = widest.max(canvas.measure_text(label, &y_label_style).width);
            canvas.text(area.left - outside - 4.0, py, label, &y_label_style);
        }
    }
    for &val in &y_axis.minor_ticks {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py >= area.top - 0.5 && py <= area.bottom() + 0.5 {
            canvas.line(area.left, py, area.left + mtl, py, &minor_tick_line);
        }
    }

    // --- Axis titles ---
    let title_style = TextStyle::sized(config.font.label_size)
        .anchored(TextAnchor::Middle, TextBaseline::Alphabetic);
    if x_labels && !x_axis.label.is_empty() {
        let y = area.bottom() + outside + config.font.tick_size + config.font.label_size + 6.0;
        canvas.text(area.left + area.width / 2.0, y, &x_axis.label, &title_style);
    }
    if !y_axis.label.is_empty() {
        let x = area.left - outside - widest - 10.0;
        canvas.text_rotated(x, area.top + area.height / 2.0, &y_axis.label, &title_style, -90.0);
    }
}

/// Draw the frame only.
pub fn draw_frame(canvas: &mut Canvas, area: &PlotArea) {
    let style = LineStyle::solid(Color::rgb(0, 0, 0), 0.8);
    canvas.line(area.left, area.top, area.right(), area.top, &style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), &style);
}

/// Horizontal reference line at `y` across the area (skipped when off-scale).
pub fn draw_reference_line(
    canvas: &mut Canvas,
    area: &PlotArea,
    y_axis: &Axis,
    y: f64,
    color: Color,
) {
    if y < y_axis.min || y > y_axis.max {
        return;
    }
    let py = y_axis.data_to_pixel(y, area.bottom(), area.top);
    canvas.line(area.left, py, area.right(), py, &LineStyle::dashed(color, 0.8));
}
