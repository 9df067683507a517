use crate::layout::margins::PlotArea;

/// Main + ratio panel layout (linearity plot with its deviation panel).
#[derive(Debug, Clone)]
pub struct MainRatioLayout {
    pub main: PlotArea,
    pub ratio: PlotArea,
}

impl MainRatioLayout {
    /// Split `area` vertically; the ratio panel gets `ratio_frac` of the height.
    pub fn split(area: PlotArea, gap: f64, ratio_frac: f64) -> Self {
        let ratio_h = area.height * ratio_frac;
        let main_h = area.height - ratio_h - gap;
        Self {
            main: PlotArea::manual(area.left, area.top, area.width, main_h),
            ratio: PlotArea::manual(area.left, area.top + main_h + gap, area.width, ratio_h),
        }
    }
}

/// Uniform `rows × cols` cell layout below a title strip.
#[derive(Debug, Clone)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub top: f64,
}

impl GridLayout {
    pub fn new(rows: usize, cols: usize, cell_width: f64, cell_height: f64, top: f64) -> Self {
        Self { rows: rows.max(1), cols: cols.max(1), cell_width, cell_height, top }
    }

    pub fn width(&self) -> f64 {
        self.cols as f64 * self.cell_width
    }

    pub fn height(&self) -> f64 {
        self.top + self.rows as f64 * self.cell_height
    }

    /// Outer rectangle of cell `index` (row-major), or `None` past the last cell.
    pub fn cell(&self, index: usize) -> Option<PlotArea> {
        if index >= self.rows * self.cols {
            return None;
        }
        let (row, col) = (index / self.cols, index % self.cols);
        Some(PlotArea::manual(
            col as f64 * self.cell_width,
            self.top + row as f64 * self.cell_height,
            self.cell_width,
            self.cell_height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_cells_are_row_major() {
        let g = GridLayout::new(4, 5, 100.0, 80.0, 20.0);
        assert_eq!(g.width(), 500.0);
        assert_eq!(g.height(), 340.0);
        let c = g.cell(7).unwrap();
        assert_eq!((c.left, c.top), (200.0, 100.0));
        assert!(g.cell(20).is_none());
    }

    #[test]
    fn ratio_split() {
        let l = MainRatioLayout::split(PlotArea::manual(10.0, 10.0, 100.0, 200.0), 5.0, 0.25);
        assert_eq!(l.ratio.height, 50.0);
        assert_eq!(l.main.height, 145.0);
        assert_eq!(l.ratio.top, 160.0);
    }
}
