use tepx_viz::Hist2dArtifact;

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::draw_axes;
use crate::plots::{Frame, empty_svg, place};
use crate::primitives::*;

const COLORBAR_STEPS: usize = 64;

pub fn render(artifact: &Hist2dArtifact, config: &VizConfig) -> crate::Result<String> {
    let nx = artifact.x_edges.len().saturating_sub(1);
    let ny = artifact.y_edges.len().saturating_sub(1);
    if nx == 0 || ny == 0 {
        return Ok(empty_svg("density"));
    }
    if artifact.contents.len() != ny || artifact.contents.iter().any(|row| row.len() != nx) {
        return Err(crate::RenderError::Layout(format!(
            "{}: contents do not match {nx}x{ny} bins",
            artifact.name
        )));
    }

    let colorbar_w = 60.0;
    let mut canvas = Canvas::new(config.figure.width + colorbar_w, config.figure.height)?;
    let x_axis =
        Axis::exact(artifact.x_edges[0], artifact.x_edges[nx], 7).with_label(&artifact.x_label);
    let y_axis =
        Axis::exact(artifact.y_edges[0], artifact.y_edges[ny], 5).with_label(&artifact.y_label);
    let outer = PlotArea::manual(0.0, 0.0, config.figure.width, config.figure.height);
    let area = place(&mut canvas, outer, Frame::Figure, &artifact.title, &x_axis, &y_axis, config);

    let cmap = config.colormap();
    let z_max = if artifact.z_max > 0.0 { artifact.z_max } else { 1.0 };
    for (iy, row) in artifact.contents.iter().enumerate() {
        let y0 = y_axis.data_to_pixel(artifact.y_edges[iy], area.bottom(), area.top);
        let y1 = y_axis.data_to_pixel(artifact.y_edges[iy + 1], area.bottom(), area.top);
        for (ix, &v) in row.iter().enumerate() {
            // Empty bins stay white.
            if v <= 0.0 {
                continue;
            }
            let x0 = x_axis.data_to_pixel(artifact.x_edges[ix], area.left, area.right());
            let x1 = x_axis.data_to_pixel(artifact.x_edges[ix + 1], area.left, area.right());
            // Overlap by a hair so anti-aliasing leaves no seams between cells.
            let cell = Style::filled(cmap.sample(v / z_max));
            canvas.rect(x0, y1, x1 - x0 + 0.3, y0 - y1 + 0.3, &cell);
        }
    }
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);

    // Colorbar
    let cb_x = area.right() + 12.0;
    let cb_w = 12.0;
    let step_h = area.height / COLORBAR_STEPS as f64;
    for i in 0..COLORBAR_STEPS {
        let t = 1.0 - i as f64 / (COLORBAR_STEPS - 1) as f64;
        let y = area.top + i as f64 * step_h;
        canvas.rect(cb_x, y, cb_w, step_h + 0.5, &Style::filled(cmap.sample(t)));
    }
    let frame_style = Style::stroked(crate::color::Color::rgb(0, 0, 0), 0.5);
    canvas.rect(cb_x, area.top, cb_w, area.height, &frame_style);
    let label_style = TextStyle::sized(config.font.tick_size)
        .anchored(TextAnchor::Start, TextBaseline::Central);
    canvas.text(cb_x + cb_w + 3.0, area.top, &format!("{z_max}"), &label_style);
    canvas.text(cb_x + cb_w + 3.0, area.bottom(), "0", &label_style);

    Ok(canvas.finish_svg())
}
