use crate::foundation::core::{BezPath, Frame, Point};
use crate::foundation::error::{KfxError, KfxResult};
use crate::script::style::Style;

/// Shaped glyph as reported by a [`GlyphOracle`].
///
/// Coordinates are in script pixels with y growing downwards; `y_min`/`y_max`
/// and the outline are relative to the glyph origin on the baseline.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct GlyphRecord {
    /// Pen position of the glyph.
    pub x: f64,
    /// Horizontal advance, including style spacing.
    pub advance: f64,
    /// Top of the ink box (negative above the baseline).
    pub y_min: f64,
    /// Bottom of the ink box.
    pub y_max: f64,
    /// Font-level ascender.
    pub ascender: f64,
    /// Font-level descender (positive, below the baseline).
    pub descender: f64,
    /// Glyph outline.
    pub outline: GlyphOutline,
}

/// Turns `(style, text)` into one [`GlyphRecord`] per character of `text`.
///
/// Implementations typically wrap a non-reentrant shaping context; callers hold
/// one oracle per thread and pass it explicitly by `&mut`.
pub trait GlyphOracle {
    /// Shape `text` in `style`. Requires the document frame, which cannot be
    /// constructed without a positive resolution.
    fn shape(&mut self, style: &Style, text: &str, frame: Frame) -> KfxResult<Vec<GlyphRecord>>;
}

/// Outline as point/segment arrays grouped into contours.
///
/// Each contour starts with one point (the pen-down position) followed by the
/// points consumed by its segments. Segment codes are [`GlyphOutline::LINE`],
/// [`GlyphOutline::QUAD`] or [`GlyphOutline::CUBIC`] (masked by
/// [`GlyphOutline::KIND_MASK`]); the last segment of a contour carries
/// [`GlyphOutline::CONTOUR_END`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlyphOutline {
    /// Point coordinates.
    pub points: Vec<Point>,
    /// Segment codes.
    pub segments: Vec<u8>,
}

impl GlyphOutline {
    /// Straight segment, one point.
    pub const LINE: u8 = 1;
    /// Quadratic segment, two points.
    pub const QUAD: u8 = 2;
    /// Cubic segment, three points.
    pub const CUBIC: u8 = 3;
    /// Mask extracting the segment kind.
    pub const KIND_MASK: u8 = 3;
    /// Flag closing the current contour.
    pub const CONTOUR_END: u8 = 4;

    /// Whether the outline has no contours.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.segments.is_empty()
    }

    /// Pen appending contours to this outline.
    pub fn builder(&mut self) -> OutlineBuilder<'_> {
        OutlineBuilder {
            outline: self,
            open: false,
        }
    }

    /// Convert to a path, validating that point and segment counts agree.
    pub fn to_path(&self) -> KfxResult<BezPath> {
        let mut path = BezPath::new();
        let mut pts = self.points.iter().copied();
        let mut need_start = true;

        for (i, &code) in self.segments.iter().enumerate() {
            if need_start {
                let start = pts.next().ok_or_else(|| {
                    KfxError::rasterization(format!("contour at segment {i} has no start point"))
                })?;
                path.move_to(start);
                need_start = false;
            }

            let mut take = |n: usize| -> KfxResult<Vec<Point>> {
                let got: Vec<Point> = pts.by_ref().take(n).collect();
                if got.len() != n {
                    return Err(KfxError::rasterization(format!(
                        "segment {i} needs {n} points, {} left",
                        got.len()
                    )));
                }
                Ok(got)
            };

            match code & Self::KIND_MASK {
                Self::LINE => {
                    let p = take(1)?;
                    path.line_to(p[0]);
                }
                Self::QUAD => {
                    let p = take(2)?;
                    path.quad_to(p[0], p[1]);
                }
                Self::CUBIC => {
                    let p = take(3)?;
                    path.curve_to(p[0], p[1], p[2]);
                }
                _ => {
                    return Err(KfxError::rasterization(format!(
                        "segment {i} has invalid kind {code}"
                    )));
                }
            }

            if code & Self::CONTOUR_END != 0 {
                path.close_path();
                need_start = true;
            }
        }

        if !need_start {
            return Err(KfxError::rasterization("last contour is not terminated"));
        }
        let leftover = pts.count();
        if leftover != 0 {
            return Err(KfxError::rasterization(format!(
                "{leftover} points not consumed by any segment"
            )));
        }
        Ok(path)
    }
}

/// Pen that appends contours to a [`GlyphOutline`].
pub struct OutlineBuilder<'a> {
    outline: &'a mut GlyphOutline,
    open: bool,
}

impl OutlineBuilder<'_> {
    /// Start a new contour, closing the previous one.
    pub fn move_to(&mut self, p: Point) {
        self.close();
        self.outline.points.push(p);
        self.open = true;
    }

    /// Straight segment.
    pub fn line_to(&mut self, p: Point) {
        self.push(GlyphOutline::LINE, &[p]);
    }

    /// Quadratic segment.
    pub fn quad_to(&mut self, c: Point, p: Point) {
        self.push(GlyphOutline::QUAD, &[c, p]);
    }

    /// Cubic segment.
    pub fn curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.push(GlyphOutline::CUBIC, &[c1, c2, p]);
    }

    /// Close the current contour. A contour without segments is dropped.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        match self.outline.segments.last_mut() {
            Some(last) if *last & GlyphOutline::CONTOUR_END == 0 => {
                *last |= GlyphOutline::CONTOUR_END;
            }
            _ => {
                self.outline.points.pop();
            }
        }
    }

    fn push(&mut self, kind: u8, pts: &[Point]) {
        if !self.open {
            return;
        }
        self.outline.points.extend_from_slice(pts);
        self.outline.segments.push(kind);
    }
}

impl Drop for OutlineBuilder<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Font-free oracle with fixed-pitch box glyphs.
///
/// Every non-whitespace character is a rectangle `advance_ratio * font_size`
/// wide and `ink_ratio * font_size` tall sitting on the baseline; whitespace
/// has the same advance and no ink. Deterministic across platforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceOracle {
    /// Advance width as a fraction of the font size.
    pub advance_ratio: f64,
    /// Ink height as a fraction of the font size.
    pub ink_ratio: f64,
    /// Ascender as a fraction of the font size.
    pub ascender_ratio: f64,
    /// Descender as a fraction of the font size.
    pub descender_ratio: f64,
}

impl Default for MonospaceOracle {
    fn default() -> Self {
        Self {
            advance_ratio: 0.5,
            ink_ratio: 0.7,
            ascender_ratio: 0.8,
            descender_ratio: 0.2,
        }
    }
}

impl GlyphOracle for MonospaceOracle {
    fn shape(&mut self, style: &Style, text: &str, _frame: Frame) -> KfxResult<Vec<GlyphRecord>> {
        let sx = style.scale_x / 100.0;
        let sy = style.scale_y / 100.0;
        let ink_w = style.font_size * self.advance_ratio * sx;
        let advance = ink_w + style.spacing * sx;
        let ink_h = style.font_size * self.ink_ratio * sy;

        let mut x = 0.0;
        let mut out = Vec::with_capacity(text.chars().count());
        for ch in text.chars() {
            let mut outline = GlyphOutline::default();
            let (y_min, y_max) = if ch.is_whitespace() {
                (0.0, 0.0)
            } else {
                let mut pen = outline.builder();
                pen.move_to(Point::new(0.0, 0.0));
                pen.line_to(Point::new(ink_w, 0.0));
                pen.line_to(Point::new(ink_w, -ink_h));
                pen.line_to(Point::new(0.0, -ink_h));
                pen.close();
                (-ink_h, 0.0)
            };
            out.push(GlyphRecord {
                x,
                advance,
                y_min,
                y_max,
                ascender: style.font_size * self.ascender_ratio * sy,
                descender: style.font_size * self.descender_ratio * sy,
                outline,
            });
            x += advance;
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/oracle.rs"]
mod tests;
