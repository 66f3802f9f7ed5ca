use crate::foundation::core::{Alignment, Column, Frame, Geometry, Placement, Row};
use crate::foundation::error::{KfxError, KfxResult};
use crate::layout::metrics::{ascent_descent, pen_positions};
use crate::layout::oracle::{GlyphOracle, GlyphRecord};
use crate::layout::vertical;
use crate::script::document::ProcessOptions;
use crate::script::model::{Line, LineMetrics, TextUnit};
use crate::script::style::Style;

/// Per-line constants shared by the horizontal and stacked placement rules.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LineContext {
    pub(crate) alignment: Alignment,
    pub(crate) frame: Frame,
    pub(crate) margin_l: f64,
    pub(crate) margin_r: f64,
    pub(crate) margin_v: f64,
    pub(crate) font_size: f64,
    pub(crate) spacing: f64,
    pub(crate) outline: f64,
}

impl LineContext {
    pub(crate) fn new(line: &Line, style: &Style, frame: Frame) -> KfxResult<Self> {
        let (margin_l, margin_r, margin_v) = line.effective_margins(style);
        Ok(Self {
            alignment: style.alignment()?,
            frame,
            margin_l,
            margin_r,
            margin_v,
            font_size: style.font_size,
            spacing: style.spacing,
            outline: style.outline,
        })
    }

    /// Top/middle/bottom from the alignment row, using the nominal font size as height.
    pub(crate) fn apply_row(&self, g: &mut Geometry) {
        let fs = self.font_size;
        match self.alignment.row {
            Row::Bottom => {
                g.bottom = self.frame.height() - self.margin_v;
                g.middle = g.bottom - fs / 2.0;
                g.top = g.bottom - fs;
            }
            Row::Middle => {
                g.middle = self.frame.center_y();
                g.top = g.middle - fs / 2.0;
                g.bottom = g.middle + fs / 2.0;
            }
            Row::Top => {
                g.top = self.margin_v;
                g.middle = g.top + fs / 2.0;
                g.bottom = g.top + fs;
            }
        }
    }

    /// Left edge of a run `width` wide placed by the column rule.
    pub(crate) fn column_left(&self, width: f64) -> f64 {
        match self.alignment.column {
            Column::Left => self.margin_l,
            Column::Center => self.frame.center_x() - width / 2.0,
            Column::Right => self.frame.width() - self.margin_r - width,
        }
    }

    /// Horizontal-mode geometry for a unit.
    pub(crate) fn place(&self, extent: Extent) -> Geometry {
        let mut g = Geometry {
            width: extent.width,
            height: extent.height,
            ..Geometry::default()
        };
        g.set_horizontal(extent.left);
        self.apply_row(&mut g);
        g.apply_anchor(self.alignment);
        g
    }
}

/// Size and left edge of one unit, before vertical placement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Extent {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) left: f64,
}

/// Compute geometry for `line` and, when `options.extended`, for every word,
/// syllable and char it owns.
///
/// The oracle is queried once, for the whole plain text. Blank lines never
/// reach the oracle.
#[tracing::instrument(level = "debug", skip_all, fields(line = line.index))]
pub fn resolve_line(
    line: &mut Line,
    style: &Style,
    frame: Frame,
    options: &ProcessOptions,
    oracle: &mut dyn GlyphOracle,
) -> KfxResult<()> {
    let ctx = LineContext::new(line, style, frame)?;

    if line.text.trim().is_empty() {
        resolve_blank(line, &ctx, options.extended);
        return Ok(());
    }

    let glyphs = oracle.shape(style, &line.text, frame)?;
    let n = line.text.chars().count();
    if glyphs.is_empty() {
        return Err(KfxError::shaping(format!(
            "no glyphs for line {} ({:?}) in font '{}'",
            line.index, line.text, style.font_name
        )));
    }
    if glyphs.len() != n {
        return Err(KfxError::shaping(format!(
            "line {}: oracle returned {} glyphs for {n} chars",
            line.index,
            glyphs.len()
        )));
    }

    let (ascent, descent) = ascent_descent(&glyphs);
    line.metrics = Some(LineMetrics {
        ascent,
        descent,
        max_ascent: glyphs[0].ascender,
        max_descent: glyphs[0].descender,
    });

    let pos = pen_positions(&glyphs);
    let width = pos[n];
    let line_left = ctx.column_left(width);
    let line_geom = ctx.place(Extent {
        width,
        height: ascent + descent,
        left: line_left,
    });
    line.placement = Placement::Laid(line_geom);

    if !options.extended {
        return Ok(());
    }

    if line.chars.len() != n {
        return Err(KfxError::validation(format!(
            "line {} has {} chars for {n} characters of text; tokenize it first",
            line.index,
            line.chars.len()
        )));
    }

    let char_extents: Vec<Extent> = glyphs
        .iter()
        .enumerate()
        .map(|(i, g)| Extent {
            width: pos[i + 1] - pos[i],
            height: (g.y_max - g.y_min).abs(),
            left: line_left + pos[i],
        })
        .collect();
    let syl_extents = span_extents(line.karaoke.syllables(), &glyphs, &pos, line_left)?;
    let word_extents = span_extents(&line.words, &glyphs, &pos, line_left)?;

    if options.vertical_kanji && ctx.alignment.row == Row::Middle {
        vertical::apply_vertical(&mut line.chars, &char_extents, &ctx, &line_geom);
        let syl_block = vertical::apply_vertical(
            line.karaoke.syllables_mut(),
            &syl_extents,
            &ctx,
            &line_geom,
        );
        let line_geom = match syl_block {
            Some(block) => {
                let g = vertical::fit_line_to_block(&ctx, &line_geom, block);
                line.placement = Placement::Laid(g);
                g
            }
            None => line_geom,
        };
        vertical::apply_vertical(&mut line.words, &word_extents, &ctx, &line_geom);
    } else {
        place_all(&mut line.chars, &char_extents, &ctx);
        place_all(line.karaoke.syllables_mut(), &syl_extents, &ctx);
        place_all(&mut line.words, &word_extents, &ctx);
    }

    Ok(())
}

fn resolve_blank(line: &mut Line, ctx: &LineContext, extended: bool) {
    line.metrics = Some(LineMetrics::default());
    let anchor = ctx.column_left(0.0);
    let g = ctx.place(Extent {
        width: 0.0,
        height: 0.0,
        left: anchor,
    });
    line.placement = Placement::Laid(g);

    if extended {
        let laid = Placement::Laid(g);
        for c in &mut line.chars {
            c.placement = laid;
        }
        for s in line.karaoke.syllables_mut() {
            s.placement = laid;
        }
        for w in &mut line.words {
            w.placement = laid;
        }
    }
}

/// Extents of consecutive units that each cover `prespace + text + postspace` chars.
fn span_extents<U: TextUnit>(
    units: &[U],
    glyphs: &[GlyphRecord],
    pos: &[f64],
    line_left: f64,
) -> KfxResult<Vec<Extent>> {
    let n = glyphs.len();
    let mut cursor = 0usize;
    let mut out = Vec::with_capacity(units.len());

    for unit in units {
        let start = cursor + unit.prespace();
        let end = start + unit.text().chars().count();
        if end > n {
            return Err(KfxError::validation(format!(
                "{} {:?} extends past the end of the line",
                unit.kind(),
                unit.text()
            )));
        }
        let (ascent, descent) = ascent_descent(&glyphs[start..end]);
        out.push(Extent {
            width: pos[end] - pos[start],
            height: ascent + descent,
            left: line_left + pos[start],
        });
        cursor = (end + unit.postspace()).min(n);
    }
    Ok(out)
}

fn place_all<U: TextUnit>(units: &mut [U], extents: &[Extent], ctx: &LineContext) {
    for (unit, extent) in units.iter_mut().zip(extents) {
        *unit.placement_mut() = Placement::Laid(ctx.place(*extent));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolver.rs"]
mod tests;
