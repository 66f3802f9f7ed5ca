use std::borrow::Cow;

use kurbo::Shape;
use skrifa::instance::Size;
use skrifa::outline::OutlinePen;
use skrifa::{FontRef, GlyphId, MetadataProvider};

use crate::foundation::core::{Frame, Point};
use crate::foundation::error::{KfxError, KfxResult};
use crate::layout::oracle::{GlyphOracle, GlyphOutline, GlyphRecord, OutlineBuilder};
use crate::script::style::Style;

/// [`GlyphOracle`] backed by Parley shaping and Skrifa outlines.
///
/// Holds one font and layout context; not reentrant. Use one instance per thread.
pub struct ParleyOracle {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
}

impl Default for ParleyOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyOracle {
    /// Construct an oracle with fresh Parley contexts (system fonts included).
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register a font file; returns the family names it provides.
    pub fn register_font_bytes(&mut self, font_bytes: Vec<u8>) -> KfxResult<Vec<String>> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        if families.is_empty() {
            return Err(KfxError::validation(
                "no font families registered from font bytes",
            ));
        }
        let mut names = Vec::with_capacity(families.len());
        for (id, _) in &families {
            if let Some(name) = self.font_ctx.collection.family_name(*id) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn layout(&mut self, style: &Style, text: &str) -> KfxResult<parley::Layout<()>> {
        let size_px = style.font_size as f32;
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(KfxError::validation("font_size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(style.font_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(if style.bold {
            parley::style::FontWeight::BOLD
        } else {
            parley::style::FontWeight::NORMAL
        }));
        builder.push_default(parley::style::StyleProperty::FontStyle(if style.italic {
            parley::style::FontStyle::Italic
        } else {
            parley::style::FontStyle::Normal
        }));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl GlyphOracle for ParleyOracle {
    fn shape(&mut self, style: &Style, text: &str, _frame: Frame) -> KfxResult<Vec<GlyphRecord>> {
        let layout = self.layout(style, text)?;
        let sx = style.scale_x / 100.0;
        let sy = style.scale_y / 100.0;

        // Byte offset of each char, to map cluster ranges back to char indices.
        let offsets: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        let mut slots: Vec<Option<GlyphRecord>> = vec![None; offsets.len()];

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let run = glyph_run.run();
                let font = run.font();
                let font_ref = FontRef::from_index(font.data.as_ref(), font.index)
                    .map_err(|e| KfxError::shaping(format!("unreadable font data: {e}")))?;
                let outlines = font_ref.outline_glyphs();
                let size = Size::new(run.font_size());
                let metrics = run.metrics();
                let ascender = f64::from(metrics.ascent) * sy;
                let descender = f64::from(metrics.descent).abs() * sy;

                let mut pen_x = f64::from(glyph_run.offset());
                for cluster in run.clusters() {
                    let range = cluster.text_range();
                    let Ok(first) = offsets.binary_search(&range.start) else {
                        return Err(KfxError::shaping(format!(
                            "cluster starts inside a character at byte {}",
                            range.start
                        )));
                    };
                    let count = offsets[first..]
                        .iter()
                        .take_while(|&&b| b < range.end)
                        .count()
                        .max(1);
                    let advance = f64::from(cluster.advance());

                    let mut outline = GlyphOutline::default();
                    let mut glyph_dx = 0.0f64;
                    for glyph in cluster.glyphs() {
                        if let Some(g) = outlines.get(GlyphId::new(glyph.id)) {
                            let mut pen = SkrifaPen {
                                builder: outline.builder(),
                                dx: glyph_dx + f64::from(glyph.x),
                                dy: f64::from(glyph.y),
                                sx,
                                sy,
                            };
                            g.draw(size, &mut pen).map_err(|e| {
                                KfxError::shaping(format!("draw glyph {}: {e}", glyph.id))
                            })?;
                        }
                        glyph_dx += f64::from(glyph.advance);
                    }
                    let (y_min, y_max) = ink_box(&outline)?;

                    slots[first] = Some(GlyphRecord {
                        x: pen_x,
                        advance,
                        y_min,
                        y_max,
                        ascender,
                        descender,
                        outline,
                    });
                    // Remaining chars of a ligature cluster sit at its end with no width.
                    for slot in slots.iter_mut().skip(first + 1).take(count - 1) {
                        *slot = Some(GlyphRecord {
                            x: pen_x + advance,
                            ascender,
                            descender,
                            ..GlyphRecord::default()
                        });
                    }
                    pen_x += advance;
                }
            }
        }

        let mut out = Vec::with_capacity(slots.len());
        for (i, slot) in slots.into_iter().enumerate() {
            let Some(mut g) = slot else {
                return Err(KfxError::shaping(format!(
                    "no glyph for char {i} of {text:?} in font '{}'",
                    style.font_name
                )));
            };
            let spacing = style.spacing * sx;
            g.x = g.x * sx + spacing * i as f64;
            g.advance = g.advance * sx + spacing;
            out.push(g);
        }
        Ok(out)
    }
}

fn ink_box(outline: &GlyphOutline) -> KfxResult<(f64, f64)> {
    if outline.is_empty() {
        return Ok((0.0, 0.0));
    }
    let bbox = outline.to_path()?.bounding_box();
    Ok((bbox.y0, bbox.y1))
}

/// Writes Skrifa outlines (y up, font origin) into a [`GlyphOutline`] (y down, scaled).
struct SkrifaPen<'a> {
    builder: OutlineBuilder<'a>,
    dx: f64,
    dy: f64,
    sx: f64,
    sy: f64,
}

impl SkrifaPen<'_> {
    fn map(&self, x: f32, y: f32) -> Point {
        Point::new(
            (self.dx + f64::from(x)) * self.sx,
            (self.dy - f64::from(y)) * self.sy,
        )
    }
}

impl OutlinePen for SkrifaPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.builder.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.builder.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let (c, p) = (self.map(cx0, cy0), self.map(x, y));
        self.builder.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (c0, c1, p) = (self.map(cx0, cy0), self.map(cx1, cy1), self.map(x, y));
        self.builder.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/parley_oracle.rs"]
mod tests;
