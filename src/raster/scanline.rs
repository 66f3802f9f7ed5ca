use kurbo::{PathEl, Shape};

use crate::foundation::core::{Affine, BezPath};
use crate::foundation::error::{KfxError, KfxResult};

/// Curve flattening tolerance, in supersampled units.
pub const FLATTEN_TOLERANCE: f64 = 0.25;

/// Upper bound on supersampled image area.
const MAX_SAMPLES: u64 = 1 << 28;

/// One covered output pixel.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Pixel {
    /// Column in source coordinates.
    pub x: i32,
    /// Row in source coordinates.
    pub y: i32,
    /// Coverage in `(0, 255]`.
    pub alpha: f64,
}

/// Edge with integer start point and direction vector.
#[derive(Clone, Copy, Debug)]
struct Edge {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

impl Edge {
    /// Intercept with the horizontal line at `sample_y`, if the edge crosses it.
    fn intercept(&self, sample_y: f64) -> Option<f64> {
        if self.vy == 0.0 {
            return None;
        }
        let s = (sample_y - self.y) / self.vy;
        (0.0..=1.0).contains(&s).then(|| self.x + s * self.vx)
    }

    fn winding(&self) -> i32 {
        if self.vy > 0.0 { 1 } else { -1 }
    }
}

/// Collects non-horizontal edges that touch the image's vertical range.
struct EdgeCollector {
    height: f64,
    edges: Vec<Edge>,
    last_point: Option<(f64, f64)>,
    last_move: Option<(f64, f64)>,
}

impl EdgeCollector {
    fn new(height: f64) -> Self {
        Self {
            height,
            edges: Vec::new(),
            last_point: None,
            last_move: None,
        }
    }

    fn visible(&self, ya: f64, yb: f64) -> bool {
        ya != yb && !(ya < 0.0 && yb < 0.0) && !(ya > self.height && yb > self.height)
    }

    fn push_edge(&mut self, from: (f64, f64), to: (f64, f64)) {
        if self.visible(from.1, to.1) {
            self.edges.push(Edge {
                x: from.0,
                y: from.1,
                vx: to.0 - from.0,
                vy: to.1 - from.1,
            });
        }
    }

    fn close_figure(&mut self) {
        if let (Some(start), Some(last)) = (self.last_move, self.last_point) {
            self.push_edge(last, start);
        }
    }

    fn move_to(&mut self, p: (f64, f64)) {
        self.close_figure();
        self.last_move = Some(p);
        self.last_point = Some(p);
    }

    fn line_to(&mut self, p: (f64, f64)) {
        if let Some(last) = self.last_point {
            self.push_edge(last, p);
        }
        self.last_point = Some(p);
    }

    fn close_path(&mut self) {
        if let Some(start) = self.last_move {
            self.line_to(start);
        }
    }

    fn finish(mut self) -> Vec<Edge> {
        self.close_figure();
        self.edges
    }
}

/// Rasterize `path` into sparse anti-aliased coverage.
///
/// The path is scaled by `supersampling`, shifted so its minimum corner sits on
/// a multiple of the factor, filled with the non-zero winding rule at sample
/// rows `y + 0.5`, then downsampled in `supersampling`-sized blocks. Output
/// coordinates are in the path's own units; empty blocks are omitted.
pub fn shape_to_pixels(path: &BezPath, supersampling: u32) -> KfxResult<Vec<Pixel>> {
    if supersampling == 0 {
        return Err(KfxError::validation("supersampling must be >= 1"));
    }
    if path.elements().is_empty() {
        return Ok(Vec::new());
    }

    let s = f64::from(supersampling);
    let mut shape = path.clone();
    shape.apply_affine(Affine::scale(s));

    let bbox = shape.bounding_box();
    if ![bbox.x0, bbox.y0, bbox.x1, bbox.y1].iter().all(|v| v.is_finite()) {
        return Err(KfxError::rasterization("path has non-finite coordinates"));
    }
    let shift_x = -(bbox.x0 / s).floor() * s;
    let shift_y = -(bbox.y0 / s).floor() * s;
    shape.apply_affine(Affine::translate((shift_x, shift_y)));

    let width = ((bbox.x1 + shift_x) / s).ceil() * s;
    let height = ((bbox.y1 + shift_y) / s).ceil() * s;
    if width <= 0.0 || height <= 0.0 {
        return Ok(Vec::new());
    }
    if (width * height) as u64 > MAX_SAMPLES {
        return Err(KfxError::validation(format!(
            "shape too large to rasterize: {width}x{height} supersampled pixels"
        )));
    }
    let (w, h) = (width as usize, height as usize);

    let mut collector = EdgeCollector::new(height);
    kurbo::flatten(shape.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => collector.move_to((p.x.round(), p.y.round())),
        PathEl::LineTo(p) => collector.line_to((p.x.round(), p.y.round())),
        PathEl::ClosePath => collector.close_path(),
        // flatten only emits moves, lines and closes
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    let edges = collector.finish();

    let mut image = vec![false; w * h];
    let row_start = (bbox.y0 + shift_y).floor().max(0.0) as usize;
    let row_end = ((bbox.y1 + shift_y).ceil() as usize).min(h);
    let mut stops: Vec<(f64, i32)> = Vec::new();

    for y in row_start..row_end {
        let sample_y = y as f64 + 0.5;
        stops.clear();
        stops.extend(edges.iter().filter_map(|e| {
            e.intercept(sample_y)
                .map(|x| (x.clamp(0.0, width), e.winding()))
        }));
        if stops.len() < 2 {
            continue;
        }
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        let row = &mut image[y * w..(y + 1) * w];
        let mut status = 0i32;
        for pair in stops.windows(2) {
            status += pair[0].1;
            if status == 0 {
                continue;
            }
            let from = ((pair[0].0 - 0.5).ceil().max(0.0) as usize).min(w);
            let to = ((pair[1].0 + 0.5).floor().max(0.0) as usize).min(w);
            if from < to {
                row[from..to].fill(true);
            }
        }
    }

    let step = supersampling as usize;
    let full = s * s;
    let mut pixels = Vec::new();
    for by in (0..h).step_by(step) {
        for bx in (0..w).step_by(step) {
            let covered = (by..by + step)
                .map(|yy| image[yy * w + bx..yy * w + bx + step].iter().filter(|&&c| c).count())
                .sum::<usize>();
            if covered > 0 {
                pixels.push(Pixel {
                    x: ((bx as f64 - shift_x) / s) as i32,
                    y: ((by as f64 - shift_y) / s) as i32,
                    alpha: 255.0 * covered as f64 / full,
                });
            }
        }
    }

    tracing::trace!(
        edges = edges.len(),
        pixels = pixels.len(),
        "rasterized shape"
    );
    Ok(pixels)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/scanline.rs"]
mod tests;
