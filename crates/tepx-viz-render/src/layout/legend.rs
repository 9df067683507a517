use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub kind: LegendKind,
}

pub enum LegendKind {
    FilledRect,
    Line,
    Marker,
}

/// Draw a legend in the top-left corner of the plot area.
pub fn draw_legend(canvas: &mut Canvas, area: &PlotArea, entries: &[LegendEntry], font_size: f64) {
    if entries.is_empty() {
        return;
    }

    let row_height = font_size + 4.0;
    let swatch_w = 14.0;
    let swatch_h = font_size - 2.0;
    let gap = 6.0;
    let padding = 5.0;

    let text_style =
        TextStyle::sized(font_size * 0.85).anchored(TextAnchor::Start, TextBaseline::Central);

    let max_w = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, &text_style).width)
        .fold(0.0_f64, f64::max);

    let legend_w = padding + swatch_w + gap + max_w + padding;
    let legend_h = padding + entries.len() as f64 * row_height + padding;

    // Data grows with pileup, so the top-left corner is usually empty.
    let lx = area.left + 6.0;
    let ly = area.top + 6.0;

    let bg_style =
        Style::filled(Color::rgba(255, 255, 255, 0.85)).outlined(Color::rgb(200, 200, 200), 0.5);
    canvas.rect(lx, ly, legend_w, legend_h, &bg_style);

    for (i, entry) in entries.iter().enumerate() {
        let ey = ly + padding + i as f64 * row_height + row_height / 2.0;
        let sx = lx + padding;

        match entry.kind {
            LegendKind::FilledRect => {
                let swatch = Style::filled(entry.color);
                canvas.rect(sx, ey - swatch_h / 2.0, swatch_w, swatch_h, &swatch);
            }
            LegendKind::Line => {
                canvas.line(sx, ey, sx + swatch_w, ey, &LineStyle::solid(entry.color, 1.5));
            }
            LegendKind::Marker => {
                canvas.marker(
                    sx + swatch_w / 2.0,
                    ey,
                    &MarkerStyle::solid(MarkerShape::Circle, entry.color, 2.5),
                );
            }
        }

        canvas.text(sx + swatch_w + gap, ey, &entry.label, &text_style);
    }
}
