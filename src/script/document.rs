use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::Frame;
use crate::foundation::error::{KfxError, KfxResult};
use crate::karaoke::{tags, tokenizer};
use crate::layout::oracle::GlyphOracle;
use crate::layout::resolver::resolve_line;
use crate::script::model::Line;
use crate::script::style::StyleTable;

/// Gap reported for the first/last line of a style, in ms.
pub const EDGE_LEAD_MS: f64 = 1000.1;

/// `[Script Info]` values the layout depends on.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScriptMeta {
    /// Script width (`PlayResX`).
    pub play_res_x: Option<i32>,
    /// Script height (`PlayResY`).
    pub play_res_y: Option<i32>,
}

impl ScriptMeta {
    /// Normalization frame, or a resolution error when the size is unset or non-positive.
    pub fn frame(&self) -> KfxResult<Frame> {
        match (self.play_res_x, self.play_res_y) {
            (Some(w), Some(h)) => Frame::new(f64::from(w), f64::from(h)),
            _ => Err(KfxError::resolution(
                "unknown resolution: PlayResX/PlayResY are not set",
            )),
        }
    }
}

/// Switches for tokenizing and layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProcessOptions {
    /// Build words/syllables/chars and lay them out, not just the line.
    pub extended: bool,
    /// Stack middle-row lines vertically.
    pub vertical_kanji: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            extended: true,
            vertical_kanji: true,
        }
    }
}

/// Rasterizer settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Sub-pixel samples per axis.
    pub supersampling: u32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { supersampling: 8 }
    }
}

impl RasterOptions {
    /// Reject a zero supersampling factor.
    pub fn validate(&self) -> KfxResult<()> {
        if self.supersampling == 0 {
            return Err(KfxError::validation("supersampling must be >= 1"));
        }
        Ok(())
    }
}

/// Script metadata, styles and dialogue lines.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Document {
    /// Script info.
    #[serde(default)]
    pub meta: ScriptMeta,
    /// Style table.
    #[serde(default)]
    pub styles: StyleTable,
    /// Dialogue lines in script order.
    #[serde(default)]
    pub lines: Vec<Line>,
    /// Processing switches.
    #[serde(default)]
    pub options: ProcessOptions,
    /// Rasterizer settings for pixel output of laid-out units.
    #[serde(default)]
    pub raster: RasterOptions,
    #[serde(skip)]
    prepared: bool,
}

impl Document {
    /// Assemble a document from already-parsed parts.
    pub fn new(
        meta: ScriptMeta,
        styles: StyleTable,
        lines: Vec<Line>,
        options: ProcessOptions,
    ) -> Self {
        Self {
            meta,
            styles,
            lines,
            options,
            raster: RasterOptions::default(),
            prepared: false,
        }
    }

    /// Parse a document from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> KfxResult<Self> {
        serde_json::from_reader(r).map_err(|e| KfxError::serde(format!("parse document JSON: {e}")))
    }

    /// Parse a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> KfxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            KfxError::validation(format!("open document JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check styles, raster settings and line timing.
    pub fn validate(&self) -> KfxResult<()> {
        self.raster.validate()?;
        for (_, style) in self.styles.iter() {
            style.validate()?;
        }
        for line in &self.lines {
            if line.end_time < line.start_time {
                return Err(KfxError::validation(format!(
                    "line {} ends ({}) before it starts ({})",
                    line.index, line.end_time, line.start_time
                )));
            }
        }
        Ok(())
    }

    /// Whether [`Document::prepare`] has run.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Derive plain text and resolve styles. When `extended`, also tokenize
    /// and compute leadin/leadout per style.
    #[tracing::instrument(skip_all, fields(lines = self.lines.len()))]
    pub fn prepare(&mut self) -> KfxResult<()> {
        for line in &mut self.lines {
            line.duration = line.end_time - line.start_time;
            line.style_id = self.styles.id_for(&line.style);

            if line.style_id.is_none() {
                tracing::warn!(
                    line = line.index,
                    style = %line.style,
                    "unknown style, line will not be laid out"
                );
            }

            if self.options.extended && line.style_id.is_some() {
                let h = tokenizer::tokenize(&line.raw_text, line.start_time, line.end_time)?;
                if let Some(last) = h.karaoke.syllables().last()
                    && last.end_time != line.duration
                {
                    tracing::debug!(
                        line = line.index,
                        karaoke_ms = last.end_time,
                        duration = line.duration,
                        "karaoke timing does not match line duration"
                    );
                }
                line.text = h.text;
                line.words = h.words;
                line.karaoke = h.karaoke;
                line.chars = h.chars;
            } else {
                line.text = tags::strip_tags(&line.raw_text)?;
            }
        }

        if self.options.extended {
            assign_leads(&mut self.lines);
        }
        self.prepared = true;
        Ok(())
    }

    /// Resolve geometry for every line with a known style.
    ///
    /// Fails fast on a missing resolution; a shaping failure aborts at the
    /// offending line.
    #[tracing::instrument(skip_all, fields(lines = self.lines.len()))]
    pub fn layout(&mut self, oracle: &mut dyn GlyphOracle) -> KfxResult<()> {
        if !self.prepared {
            return Err(KfxError::validation(
                "document must be prepared before layout",
            ));
        }
        let frame = self.meta.frame()?;
        let styles = &self.styles;
        let options = &self.options;

        for line in &mut self.lines {
            let Some(id) = line.style_id else {
                tracing::warn!(
                    line = line.index,
                    style = %line.style,
                    "skipping line with unknown style"
                );
                continue;
            };
            resolve_line(line, styles.get(id)?, frame, options, oracle)?;
        }
        Ok(())
    }
}

/// Leadin/leadout against the neighbours sharing a style, in start-time order.
fn assign_leads(lines: &mut [Line]) {
    let mut by_style: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, line) in lines.iter().enumerate() {
        by_style.entry(line.style.as_str()).or_default().push(i);
    }
    let groups: Vec<Vec<usize>> = by_style
        .into_values()
        .map(|mut idx| {
            idx.sort_by_key(|&i| lines[i].start_time);
            idx
        })
        .collect();

    for idx in groups {
        for (k, &i) in idx.iter().enumerate() {
            let leadin = match k.checked_sub(1) {
                Some(prev) => (lines[i].start_time - lines[idx[prev]].end_time) as f64,
                None => EDGE_LEAD_MS,
            };
            let leadout = match idx.get(k + 1) {
                Some(&next) => (lines[next].start_time - lines[i].end_time) as f64,
                None => EDGE_LEAD_MS,
            };
            lines[i].leadin = Some(leadin);
            lines[i].leadout = Some(leadout);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/document.rs"]
mod tests;
