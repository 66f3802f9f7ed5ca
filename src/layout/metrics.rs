//! Vertical extents and widths derived from shaped glyphs.

use crate::layout::oracle::GlyphRecord;

/// `(ascent, descent)` of a glyph run from its ink boxes. Both are >= 0.
pub fn ascent_descent(glyphs: &[GlyphRecord]) -> (f64, f64) {
    let (top, bottom) = glyphs
        .iter()
        .fold((0.0f64, 0.0f64), |(top, bottom), g| {
            (top.min(g.y_min), bottom.max(g.y_max))
        });
    (top.abs(), bottom.abs())
}

/// Position after the last glyph, i.e. where a following glyph would start.
pub fn trailing_x(glyphs: &[GlyphRecord]) -> f64 {
    glyphs.last().map_or(0.0, |g| g.x + g.advance)
}

/// `(width, height)` of a run: advance span and tallest ink box.
pub fn text_extents(glyphs: &[GlyphRecord]) -> (f64, f64) {
    let Some(first) = glyphs.first() else {
        return (0.0, 0.0);
    };
    let width = trailing_x(glyphs) - first.x;
    let height = glyphs
        .iter()
        .map(|g| (g.y_max - g.y_min).abs())
        .fold(0.0, f64::max);
    (width, height)
}

/// Pen positions of a run, relative to its first glyph, with one extra entry
/// for the trailing position.
pub(crate) fn pen_positions(glyphs: &[GlyphRecord]) -> Vec<f64> {
    let origin = glyphs.first().map_or(0.0, |g| g.x);
    glyphs
        .iter()
        .map(|g| g.x - origin)
        .chain(std::iter::once(trailing_x(glyphs) - origin))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/metrics.rs"]
mod tests;
