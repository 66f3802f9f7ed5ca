//! Text units as outlines, clips and pixel clusters.

use crate::foundation::core::{Affine, Alignment, BezPath, Column, Frame, Row};
use crate::foundation::error::KfxResult;
use crate::layout::oracle::GlyphOracle;
use crate::raster::scanline::{Pixel, shape_to_pixels};
use crate::script::document::RasterOptions;
use crate::script::model::TextUnit;
use crate::script::style::Style;

/// Outline of a unit's text with its origin at the unit's top-left corner.
///
/// Scale overrides apply to a copy of `style`; the shared style is untouched.
pub fn text_to_shape<U: TextUnit + ?Sized>(
    unit: &U,
    style: &Style,
    frame: Frame,
    scale_x: Option<f64>,
    scale_y: Option<f64>,
    oracle: &mut dyn GlyphOracle,
) -> KfxResult<BezPath> {
    let text = unit.text();
    let mut out = BezPath::new();
    if text.is_empty() {
        return Ok(out);
    }

    let scaled = style.with_scale(scale_x, scale_y);
    let glyphs = oracle.shape(&scaled, text, frame)?;
    let Some(first) = glyphs.first() else {
        return Ok(out);
    };
    let (origin, baseline) = (first.x, first.ascender);

    for g in &glyphs {
        if g.outline.is_empty() {
            continue;
        }
        let mut glyph_path = g.outline.to_path()?;
        glyph_path.apply_affine(Affine::translate((g.x - origin, baseline)));
        out.extend(glyph_path.elements().iter().copied());
    }
    Ok(out)
}

/// Text shape placed at the unit's position, for use as a clip.
///
/// `an` is the anchor the caller will scale around: when `scale_x`/`scale_y`
/// differ from the style, the shape is shifted so that anchor stays put.
pub fn text_to_clip<U: TextUnit + ?Sized>(
    unit: &U,
    style: &Style,
    frame: Frame,
    an: u8,
    scale_x: Option<f64>,
    scale_y: Option<f64>,
    oracle: &mut dyn GlyphOracle,
) -> KfxResult<BezPath> {
    let alignment = Alignment::from_code(an)?;
    let geom = *unit.geometry()?;
    let fscx = scale_x.unwrap_or(style.scale_x);
    let fscy = scale_y.unwrap_or(style.scale_y);

    let mut shape = text_to_shape(unit, style, frame, Some(fscx), Some(fscy), oracle)?;

    let mult_x = match alignment.column {
        Column::Left => 0.0,
        Column::Center => 0.5,
        Column::Right => 1.0,
    };
    let mult_y = match alignment.row {
        Row::Bottom => 1.0,
        Row::Middle => 0.5,
        Row::Top => 0.0,
    };
    let cx = geom.left - geom.width * mult_x * (fscx - style.scale_x) / style.scale_x;
    let cy = geom.top - geom.height * mult_y * (fscy - style.scale_y) / style.scale_y;
    shape.apply_affine(Affine::translate((cx, cy)));
    Ok(shape)
}

/// Pixel cluster of a laid-out unit.
///
/// Pixel coordinates are relative to `(floor(left), floor(top))` of the unit;
/// the fractional part of its position is kept in the coverage.
pub fn text_to_pixels<U: TextUnit + ?Sized>(
    unit: &U,
    style: &Style,
    frame: Frame,
    options: RasterOptions,
    oracle: &mut dyn GlyphOracle,
) -> KfxResult<Vec<Pixel>> {
    options.validate()?;
    let geom = *unit.geometry()?;
    let mut shape = text_to_shape(unit, style, frame, None, None, oracle)?;
    shape.apply_affine(Affine::translate((
        geom.left.rem_euclid(1.0),
        geom.top.rem_euclid(1.0),
    )));
    shape_to_pixels(&shape, options.supersampling)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/text.rs"]
mod tests;
