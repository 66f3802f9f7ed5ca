//! Stacked placement for middle-row lines: units are laid top to bottom,
//! centered on the frame's vertical midpoint.

use crate::foundation::core::{Column, Geometry, Placement};
use crate::layout::resolver::{Extent, LineContext};
use crate::script::model::TextUnit;

/// Extent of a stacked block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Block {
    pub(crate) max_width: f64,
    pub(crate) total_height: f64,
    /// Height of the first unit in the block.
    pub(crate) first_height: f64,
}

fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Stack `units` vertically. Returns `None` when there is nothing to stack.
pub(crate) fn apply_vertical<U: TextUnit>(
    units: &mut [U],
    extents: &[Extent],
    ctx: &LineContext,
    line: &Geometry,
) -> Option<Block> {
    let first = extents.first()?;
    let max_width = extents.iter().map(|e| e.width).fold(f64::MIN, f64::max);

    let mut count_chars = 0usize;
    let mut count_borders = 0usize;
    let mut edges: Option<(usize, usize)> = None;
    let mut text_height = 0.0;
    for (i, (unit, extent)) in units.iter().zip(extents).enumerate() {
        if unit.text().is_empty() {
            continue;
        }
        count_chars += 1;
        if !is_blank(unit.text()) {
            count_borders += 1;
        }
        text_height += extent.height;
        edges = Some(edges.map_or((i, i), |(f, _)| (f, i)));
    }

    let mut inner = count_borders.saturating_sub(1) as f64 * 2.0 * ctx.outline;
    inner += count_chars.saturating_sub(1) as f64 * ctx.spacing;
    if count_borders > 0
        && let Some((f, l)) = edges
    {
        for idx in [f, l] {
            if is_blank(units[idx].text()) {
                inner += ctx.outline;
            }
        }
    }
    let total_height = text_height + inner;

    let frame = ctx.frame;
    let mut cur_y = frame.center_y() - total_height / 2.0;
    for (unit, extent) in units.iter_mut().zip(extents) {
        let x_fix = (max_width - extent.width) / 2.0;
        let left = match ctx.alignment.column {
            Column::Left => line.left + x_fix,
            Column::Center => frame.center_x() - extent.width / 2.0,
            Column::Right => line.right - extent.width - x_fix,
        };

        let mut g = Geometry {
            width: extent.width,
            height: extent.height,
            ..Geometry::default()
        };
        g.set_horizontal(left);
        g.top = cur_y - (ctx.font_size - extent.height) / 2.0;
        g.middle = g.top + ctx.font_size / 2.0;
        g.bottom = g.top + ctx.font_size;
        g.apply_anchor(ctx.alignment);
        *unit.placement_mut() = Placement::Laid(g);

        let text = unit.text();
        if !text.is_empty() {
            cur_y += extent.height + ctx.spacing;
            if !is_blank(text) {
                cur_y += 2.0 * ctx.outline;
            }
        }
    }

    Some(Block {
        max_width,
        total_height,
        first_height: first.height,
    })
}

/// Line geometry replaced by the extent of its stacked syllables.
pub(crate) fn fit_line_to_block(ctx: &LineContext, line: &Geometry, block: Block) -> Geometry {
    let frame = ctx.frame;
    let mut g = *line;
    g.width = block.max_width;
    g.height = block.total_height;

    let half = block.total_height / 2.0 + (ctx.font_size - block.first_height) / 2.0;
    g.middle = frame.center_y();
    g.top = g.middle - half;
    g.bottom = g.middle + half;

    let left = match ctx.alignment.column {
        Column::Left => line.left,
        Column::Center => frame.center_x() - block.max_width / 2.0,
        Column::Right => line.right - block.max_width,
    };
    g.set_horizontal(left);
    g.apply_anchor(ctx.alignment);
    g
}

#[cfg(test)]
#[path = "../../tests/unit/layout/vertical.rs"]
mod tests;
