pub mod graph;
pub mod grid;
pub mod hist1d;
pub mod hist2d;
pub mod linearity;

mod axes_draw;

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::header::{draw_experiment_header, draw_title};
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;

/// Where a plot is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Whole figure, with the experiment header.
    Figure,
    /// One grid cell, with the plot title only.
    Panel,
}

/// Inner plot area for `outer`, with the header or title drawn above it.
pub(crate) fn place(
    canvas: &mut Canvas,
    outer: PlotArea,
    frame: Frame,
    title: &str,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) -> PlotArea {
    match frame {
        Frame::Figure => {
            let mut area = PlotArea::auto(canvas, y_axis, x_axis, config);
            if !title.is_empty() {
                let title_h = config.font.label_size + 8.0;
                area.top += title_h;
                area.height = (area.height - title_h).max(20.0);
                let title_area = PlotArea::manual(area.left, title_h, area.width, 0.0);
                draw_title(canvas, &title_area, title, config.font.label_size);
            }
            draw_experiment_header(canvas, &area, config);
            area
        }
        Frame::Panel => {
            let top = config.font.size + 8.0;
            let area = PlotArea::auto_within(canvas, outer, y_axis, x_axis, config, top);
            draw_title(canvas, &area, title, config.font.size);
            area
        }
    }
}

pub(crate) fn empty_svg(what: &str) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="160" height="50">"#,
            r#"<text x="10" y="30">No {} data</text></svg>"#
        ),
        what
    )
}
