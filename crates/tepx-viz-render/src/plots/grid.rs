use tepx_viz::{GridArtifact, Panel};

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::header::draw_title;
use crate::layout::margins::PlotArea;
use crate::layout::multi_panel::GridLayout;
use crate::plots::{Frame, empty_svg, graph, hist1d, linearity};

pub fn render(artifact: &GridArtifact, config: &VizConfig) -> crate::Result<String> {
    if artifact.panels.is_empty() {
        return Ok(empty_svg("grid"));
    }
    if artifact.panels.len() > artifact.rows * artifact.cols {
        return Err(crate::RenderError::Layout(format!(
            "{}: {} panels do not fit a {}x{} grid",
            artifact.name,
            artifact.panels.len(),
            artifact.rows,
            artifact.cols
        )));
    }

    let title_h = config.font.label_size + 14.0;
    let layout = GridLayout::new(
        artifact.rows,
        artifact.cols,
        config.panel.width,
        config.panel.height,
        title_h,
    );
    let mut canvas = Canvas::new(layout.width(), layout.height())?;
    let strip = PlotArea::manual(0.0, title_h - 2.0, layout.width(), 0.0);
    draw_title(&mut canvas, &strip, &artifact.title, config.font.label_size);

    for (i, panel) in artifact.panels.iter().enumerate() {
        let Some(cell) = layout.cell(i) else { break };
        match panel {
            Panel::Graph(a) => graph::draw(&mut canvas, cell, a, config, Frame::Panel),
            Panel::Linearity(a) => linearity::draw(&mut canvas, cell, a, config, Frame::Panel),
            Panel::Hist1d(a) => hist1d::draw(&mut canvas, cell, a, config, Frame::Panel),
        }
    }

    tracing::debug!(name = %artifact.name, panels = artifact.panels.len(), "grid rendered");
    Ok(canvas.finish_svg())
}
