//! kfx decomposes timed karaoke subtitle lines into words, syllables and
//! characters, lays every unit out with glyph-accurate geometry, and
//! rasterizes outlines into sparse anti-aliased pixel coverage.
//!
//! # Pipeline overview
//!
//! 1. **Prepare**: [`Document::prepare`] strips override tags, tokenizes karaoke
//!    timing (`\k`, `\kf`, `\ko`) and computes per-style leadin/leadout.
//! 2. **Layout**: [`Document::layout`] (or [`layout_lines_parallel`]) resolves
//!    positions through a [`GlyphOracle`] handle, horizontally or stacked.
//! 3. **Rasterize**: [`shape_to_pixels`] and [`text_to_pixels`] turn outlines
//!    into [`Pixel`] coverage on demand.
//!
//! Lines whose tagging is absent or malformed degrade to [`Karaoke::WordOnly`]
//! instead of failing; only unbalanced braces are a tokenize error.
//!
//! Oracles wrap shaping contexts that are not reentrant. Keep one per thread
//! and pass it explicitly.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod karaoke;
mod layout;
mod raster;
mod script;

pub use foundation::core::{
    Affine, Alignment, BezPath, Column, Frame, Geometry, Placement, Point, Rect, Row, Vec2,
};
pub use foundation::error::{KfxError, KfxResult};
pub use karaoke::tags::strip_tags;
pub use karaoke::tokenizer::{Hierarchy, tokenize};
pub use layout::batch::layout_lines_parallel;
pub use layout::metrics::{ascent_descent, text_extents, trailing_x};
pub use layout::oracle::{GlyphOracle, GlyphOutline, GlyphRecord, MonospaceOracle, OutlineBuilder};
pub use layout::parley_oracle::ParleyOracle;
pub use layout::resolver::resolve_line;
pub use raster::scanline::{FLATTEN_TOLERANCE, Pixel, shape_to_pixels};
pub use raster::text::{text_to_clip, text_to_pixels, text_to_shape};
pub use script::document::{Document, EDGE_LEAD_MS, ProcessOptions, RasterOptions, ScriptMeta};
pub use script::model::{Char, Karaoke, Line, LineMetrics, Syllable, TextUnit, Word};
pub use script::style::{Style, StyleId, StyleTable};
