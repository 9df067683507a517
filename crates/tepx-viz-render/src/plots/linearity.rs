use tepx_viz::{LinearityArtifact, SeriesArtifact};

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::legend::{LegendEntry, LegendKind, draw_legend};
use crate::layout::margins::PlotArea;
use crate::layout::multi_panel::MainRatioLayout;
use crate::plots::axes_draw::{draw_axes, draw_axes_with, draw_reference_line};
use crate::plots::graph::draw_series;
use crate::plots::{Frame, empty_svg, place};
use crate::primitives::*;

pub fn render(artifact: &LinearityArtifact, config: &VizConfig) -> crate::Result<String> {
    if artifact.series.iter().all(|s| s.x.is_empty()) {
        return Ok(empty_svg("linearity"));
    }
    let mut canvas = Canvas::new(config.figure.width, config.figure.height * 1.25)?;
    let outer = PlotArea::manual(0.0, 0.0, canvas.width, canvas.height);
    draw(&mut canvas, outer, artifact, config, Frame::Figure);
    Ok(canvas.finish_svg())
}

/// Draw the linearity plot inside `outer`. Full figures get a deviation panel underneath.
pub fn draw(
    canvas: &mut Canvas,
    outer: PlotArea,
    artifact: &LinearityArtifact,
    config: &VizConfig,
    frame: Frame,
) {
    let (x_lo, x_hi) = artifact.x_range().unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = artifact.y_range().unwrap_or((0.0, 1.0));
    let x_axis = Axis::padded(x_lo.min(0.0), x_hi, 0.02, 6).with_label(&artifact.x_label);
    let y_axis = Axis::padded(y_lo, y_hi, 0.06, 5).with_label(&artifact.y_label);

    let area = place(canvas, outer, frame, &artifact.title, &x_axis, &y_axis, config);
    let deviation = artifact.deviation.as_ref().filter(|d| !d.x.is_empty());
    let (main, ratio) = match (frame, deviation) {
        (Frame::Figure, Some(dev)) => {
            let layout = MainRatioLayout::split(area, 6.0, 0.28);
            (layout.main, Some((layout.ratio, dev)))
        }
        _ => (area, None),
    };

    draw_axes_with(canvas, &main, &x_axis, &y_axis, config, ratio.is_none());

    canvas.push_clip(main.left, main.top, main.width, main.height);
    if let Some(band) = &artifact.band {
        let to_px = |x: f64| x_axis.data_to_pixel(x, main.left, main.right());
        let to_py = |y: f64| y_axis.data_to_pixel(y, main.bottom(), main.top);
        let px: Vec<f64> = band.x.iter().map(|&x| to_px(x)).collect();
        let lo: Vec<f64> = band.lo.iter().map(|&y| to_py(y)).collect();
        let hi: Vec<f64> = band.hi.iter().map(|&y| to_py(y)).collect();
        canvas.fill_between(&px, &lo, &hi, &Style::filled(config.colors.band.with_alpha(0.3)));
    }
    if let Some(line) = &artifact.line {
        let points: Vec<(f64, f64)> = line
            .x
            .iter()
            .zip(&line.y)
            .map(|(&x, &y)| {
                (
                    x_axis.data_to_pixel(x, main.left, main.right()),
                    y_axis.data_to_pixel(y, main.bottom(), main.top),
                )
            })
            .collect();
        canvas.polyline(&points, &LineStyle::solid(config.colors.fit_line, 1.2));
    }
    for (i, s) in artifact.series.iter().enumerate() {
        let color = config.series_color(i);
        draw_series(canvas, &main, &x_axis, &y_axis, s, color, frame, MarkerShape::Circle);
    }
    canvas.pop_clip();

    if frame == Frame::Figure {
        draw_legend(canvas, &main, &legend_entries(artifact, config), config.font.size);
        draw_fit_annotation(canvas, &main, artifact, config);
    }

    if let Some((ratio_area, dev)) = ratio {
        draw_deviation_panel(canvas, &ratio_area, &x_axis, dev, config);
    }
}

fn legend_entries(artifact: &LinearityArtifact, config: &VizConfig) -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = artifact
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| LegendEntry {
            label: s.label.clone(),
            color: config.series_color(i),
            kind: LegendKind::Marker,
        })
        .collect();
    if let Some(fit) = &artifact.fit {
        entries.push(LegendEntry {
            label: format!("Linear fit [{}, {}]", fit.range_lo, fit.range_hi),
            color: config.colors.fit_line,
            kind: LegendKind::Line,
        });
    }
    if let Some(band) = &artifact.band {
        entries.push(LegendEntry {
            label: format!("{:.0}% CL", band.level * 100.0),
            color: config.colors.band.with_alpha(0.3),
            kind: LegendKind::FilledRect,
        });
    }
    entries
}

fn draw_fit_annotation(
    canvas: &mut Canvas,
    area: &PlotArea,
    artifact: &LinearityArtifact,
    config: &VizConfig,
) {
    let style = TextStyle::sized(config.font.tick_size)
        .anchored(TextAnchor::End, TextBaseline::Alphabetic);
    let x = area.right() - 6.0;
    let mut y = area.bottom() - 6.0;
    let lines = match (&artifact.fit, &artifact.fit_error) {
        (Some(f), _) => vec![
            format!("intercept = {} \u{00B1} {}", short(f.intercept), short(f.intercept_error)),
            format!("slope = {} \u{00B1} {}", short(f.slope), short(f.slope_error)),
            format!("\u{03C7}\u{00B2}/ndf = {}/{}", short(f.chi2), f.ndf),
        ],
        (None, Some(err)) => vec![format!("no fit: {err}")],
        (None, None) => Vec::new(),
    };
    for line in &lines {
        canvas.text(x, y, line, &style);
        y -= config.font.tick_size + 3.0;
    }
}

/// Four significant digits, switching to exponent notation for very large or small values.
fn short(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-3..1e5).contains(&a) { format!("{v:.3e}") } else { format!("{v:.4}") }
}

fn draw_deviation_panel(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    dev: &SeriesArtifact,
    config: &VizConfig,
) {
    let (lo, hi) = dev
        .y
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let y_axis = Axis::padded(lo, hi, 0.1, 3).with_label("Diff [%]");
    draw_axes(canvas, area, x_axis, &y_axis, config);
    draw_reference_line(canvas, area, &y_axis, 0.0, config.colors.reference);
    canvas.push_clip(area.left, area.top, area.width, area.height);
    // Open squares keep the residuals apart from the measured points.
    let color = config.colors.deviation;
    draw_series(canvas, area, x_axis, &y_axis, dev, color, Frame::Figure, MarkerShape::Square);
    canvas.pop_clip();
}

#[cfg(test)]
mod tests {
    use super::short;

    #[test]
    fn short_numbers() {
        assert_eq!(short(0.2), "0.2000");
        assert_eq!(short(0.0), "0.0000");
        assert_eq!(short(2.5e-5), "2.500e-5");
        assert_eq!(short(123456.0), "1.235e5");
    }
}
