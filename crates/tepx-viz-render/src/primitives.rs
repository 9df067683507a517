//! Drawing styles handed to [`crate::canvas::Canvas`].

use crate::color::Color;

const BLACK: Color = Color::rgb(0, 0, 0);

/// Area style: optional fill, optional outline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<(Color, f64)>,
}

impl Style {
    pub fn filled(color: Color) -> Self {
        Self { fill: Some(color), stroke: None }
    }

    pub fn stroked(color: Color, width: f64) -> Self {
        Self { fill: None, stroke: Some((color, width)) }
    }

    /// Add an outline to this style.
    pub fn outlined(self, color: Color, width: f64) -> Self {
        Self { stroke: Some((color, width)), ..self }
    }
}

/// Stroke style for lines and polylines.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    /// Dash and gap length; solid when `None`.
    pub dash: Option<(f64, f64)>,
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        Self { color, width, dash: Some((6.0, 3.0)) }
    }

    pub fn dotted(color: Color, width: f64) -> Self {
        Self { color, width, dash: Some((3.0, 3.0)) }
    }
}

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Vertical anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Central,
    Hanging,
}

impl TextBaseline {
    pub fn svg(self) -> &'static str {
        match self {
            TextBaseline::Alphabetic => "auto",
            TextBaseline::Central => "central",
            TextBaseline::Hanging => "hanging",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

impl TextStyle {
    /// Black regular text of the given size, anchored at its start on the baseline.
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            color: BLACK,
            bold: false,
            italic: false,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }

    pub fn anchored(self, anchor: TextAnchor, baseline: TextBaseline) -> Self {
        Self { anchor, baseline, ..self }
    }

    pub fn colored(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub fn italic(self) -> Self {
        Self { italic: true, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
}

/// Data-point marker; hollow markers are white inside.
#[derive(Debug, Clone, Copy)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub size: f64,
    pub color: Color,
    pub hollow: bool,
}

impl MarkerStyle {
    pub fn solid(shape: MarkerShape, color: Color, size: f64) -> Self {
        Self { shape, size, color, hollow: false }
    }

    pub fn hollow(shape: MarkerShape, color: Color, size: f64) -> Self {
        Self { shape, size, color, hollow: true }
    }

    /// Area style used to draw the marker.
    pub fn area_style(&self) -> Style {
        if self.hollow {
            Style::filled(Color::rgb(255, 255, 255)).outlined(self.color, 1.0)
        } else {
            Style::filled(self.color).outlined(self.color, 0.5)
        }
    }
}
