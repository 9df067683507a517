//! Approximate text metrics.
//!
//! Fonts are resolved by the SVG consumer, so widths are estimated from per-glyph advance
//! classes of a typical sans-serif face. Layout only needs margins, not exact extents.

use crate::primitives::TextStyle;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

fn advance(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' | 'I' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | ' ' | '-' => 0.36,
        'm' | 'w' | 'M' | 'W' | '%' | '@' => 0.86,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii_digit() => 0.56,
        _ => 0.54,
    }
}

/// Estimated extent of `text` in points.
pub fn measure_text(text: &str, style: &TextStyle) -> TextMetrics {
    let em: f64 = text.chars().map(advance).sum();
    let weight = if style.bold { 1.07 } else { 1.0 };
    TextMetrics {
        width: em * style.size * weight,
        height: style.size * 1.2,
        ascent: style.size * 0.93,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_hello() {
        let m = measure_text("Hello", &TextStyle::sized(12.0));
        assert!(m.width > 20.0 && m.width < 50.0);
        assert!(m.height > 8.0);
        assert!(m.ascent > 0.0);
    }

    #[test]
    fn bold_wider_than_regular() {
        let r = measure_text("Test", &TextStyle::sized(12.0));
        let b = measure_text("Test", &TextStyle::sized(12.0).bold());
        assert!(b.width > r.width);
    }
}
