//! Point series accumulated across pileup scenarios.

use serde::{Deserialize, Serialize};

/// One `(x, y ± ey)` point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    /// Abscissa (pileup).
    pub x: f64,
    /// Ordinate.
    pub y: f64,
    /// Symmetric y uncertainty (0 when unknown).
    #[serde(default)]
    pub ey: f64,
}

/// Named series of points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Object name.
    pub name: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Points, in insertion order until [`Graph::sort`] is called.
    pub points: Vec<GraphPoint>,
}

impl Graph {
    /// Empty graph.
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self { name: name.into(), title: title.into(), points: Vec::new() }
    }

    /// Build from `(x, y)` pairs with zero errors.
    pub fn from_xy(name: impl Into<String>, xy: &[(f64, f64)]) -> Self {
        let mut g = Self::new(name, "");
        for &(x, y) in xy {
            g.push(x, y, 0.0);
        }
        g
    }

    /// Append a point.
    pub fn push(&mut self, x: f64, y: f64, ey: f64) {
        self.points.push(GraphPoint { x, y, ey });
    }

    /// Stable sort by ascending x.
    pub fn sort(&mut self) {
        self.points.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    /// Copy sorted by ascending x.
    pub fn sorted(&self) -> Self {
        let mut g = self.clone();
        g.sort();
        g
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` without points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Abscissae.
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    /// Ordinates.
    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_orders_by_pileup() {
        let mut g = Graph::new("g", "");
        g.push(200.0, 3.0, 0.1);
        g.push(0.0, 0.0, 0.0);
        g.push(50.0, 1.0, 0.2);
        g.sort();
        assert_eq!(g.xs(), vec![0.0, 50.0, 200.0]);
        assert_eq!(g.points[2].ey, 0.1);
    }
}
