use crate::foundation::{
    core::{Geometry, Placement},
    error::KfxResult,
};
use crate::script::style::StyleId;

/// Contiguous non-whitespace run of a line's plain text.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Word {
    /// 0-based position in the line.
    pub index: usize,
    /// Start time in ms, equal to the line's.
    pub start_time: i64,
    /// End time in ms, equal to the line's.
    pub end_time: i64,
    /// `end_time - start_time`.
    pub duration: i64,
    /// Word text without surrounding whitespace.
    pub text: String,
    /// Whitespace characters before the word.
    pub prespace: usize,
    /// Whitespace characters after the word.
    pub postspace: usize,
    /// Resolved geometry.
    pub placement: Placement,
}

/// Unit bounded by karaoke timing tags.
///
/// Times are relative to the owning line's start.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Syllable {
    /// 0-based position in the line.
    pub index: usize,
    /// Index of the word this syllable falls in.
    pub word_index: usize,
    /// Start time in ms.
    pub start_time: i64,
    /// End time in ms.
    pub end_time: i64,
    /// `end_time - start_time`.
    pub duration: i64,
    /// Syllable text without surrounding whitespace. Empty for hidden syllables.
    pub text: String,
    /// Non-karaoke override tags attached to the syllable.
    pub tags: String,
    /// Inline effect name (`\-NAME`), empty when none is active.
    pub inline_fx: String,
    /// Whitespace characters before the text.
    pub prespace: usize,
    /// Whitespace characters after the text.
    pub postspace: usize,
    /// Resolved geometry.
    pub placement: Placement,
}

/// One rendered character.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Char {
    /// 0-based position in the line.
    pub index: usize,
    /// Owning word.
    pub word_index: usize,
    /// Owning syllable, when the line is syllable-split.
    pub syl_index: Option<usize>,
    /// Offset inside the owning syllable, when the line is syllable-split.
    pub syl_char_index: Option<usize>,
    /// Start time in ms (syllable-relative timing when syllables exist, line timing otherwise).
    pub start_time: i64,
    /// End time in ms.
    pub end_time: i64,
    /// `end_time - start_time`.
    pub duration: i64,
    /// Exactly one character. Whitespace around a word or syllable is
    /// normalized to `' '`, so chars only spell `Line::text` back exactly when
    /// its spaces are ASCII.
    pub text: String,
    /// Inline effect inherited from the owning syllable.
    pub inline_fx: String,
    /// Resolved geometry.
    pub placement: Placement,
}

/// Result of syllable decomposition for one line.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(tag = "mode", content = "syllables", rename_all = "snake_case")]
pub enum Karaoke {
    /// Tagging was absent or malformed; downstream code works on words.
    #[default]
    WordOnly,
    /// Every chunk carried a karaoke duration.
    WithSyllables(Vec<Syllable>),
}

impl Karaoke {
    /// Syllables, empty for [`Karaoke::WordOnly`].
    pub fn syllables(&self) -> &[Syllable] {
        match self {
            Self::WordOnly => &[],
            Self::WithSyllables(syls) => syls,
        }
    }

    /// Mutable syllables, empty for [`Karaoke::WordOnly`].
    pub fn syllables_mut(&mut self) -> &mut [Syllable] {
        match self {
            Self::WordOnly => &mut [],
            Self::WithSyllables(syls) => syls,
        }
    }

    /// Whether the line was split into syllables.
    pub fn has_syllables(&self) -> bool {
        matches!(self, Self::WithSyllables(_))
    }
}

/// Vertical font metrics of a laid-out line.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct LineMetrics {
    /// Ink extent above the baseline.
    pub ascent: f64,
    /// Ink extent below the baseline.
    pub descent: f64,
    /// Font-level ascender of the first glyph.
    pub max_ascent: f64,
    /// Font-level descender of the first glyph.
    pub max_descent: f64,
}

/// One timed dialogue event.
///
/// `Clone` is the deep copy: words, syllables and chars are duplicated, the
/// style is shared through its [`StyleId`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Line {
    /// Ordinal of the event in the document.
    pub index: usize,
    /// Render layer.
    pub layer: i32,
    /// Commented-out event.
    pub comment: bool,
    /// Start time in ms.
    pub start_time: i64,
    /// End time in ms.
    pub end_time: i64,
    /// `end_time - start_time`.
    #[serde(skip_deserializing)]
    pub duration: i64,
    /// Style name as written in the script.
    pub style: String,
    /// Resolved style handle.
    #[serde(skip)]
    pub style_id: Option<StyleId>,
    /// Actor field.
    pub actor: String,
    /// Effect field.
    pub effect: String,
    /// Left margin override (0 = use style).
    pub margin_l: i32,
    /// Right margin override (0 = use style).
    pub margin_r: i32,
    /// Vertical margin override (0 = use style).
    pub margin_v: i32,
    /// Text with override tags.
    pub raw_text: String,
    /// Text with override tags removed.
    #[serde(skip_deserializing)]
    pub text: String,
    /// Gap in ms to the previous line of the same style.
    #[serde(skip_deserializing)]
    pub leadin: Option<f64>,
    /// Gap in ms to the next line of the same style.
    #[serde(skip_deserializing)]
    pub leadout: Option<f64>,
    /// Resolved geometry.
    #[serde(skip_deserializing)]
    pub placement: Placement,
    /// Resolved font metrics.
    #[serde(skip_deserializing)]
    pub metrics: Option<LineMetrics>,
    /// Words in reading order.
    #[serde(skip_deserializing)]
    pub words: Vec<Word>,
    /// Syllable decomposition.
    #[serde(skip_deserializing)]
    pub karaoke: Karaoke,
    /// Characters in reading order.
    #[serde(skip_deserializing)]
    pub chars: Vec<Char>,
}

impl Line {
    /// Syllables, empty when the line degraded to words.
    pub fn syllables(&self) -> &[Syllable] {
        self.karaoke.syllables()
    }

    /// Effective margins `(l, r, v)`: the line's value when non-zero, else the style's.
    pub fn effective_margins(&self, style: &crate::script::style::Style) -> (f64, f64, f64) {
        let pick = |own: i32, fallback: i32| f64::from(if own != 0 { own } else { fallback });
        (
            pick(self.margin_l, style.margin_l),
            pick(self.margin_r, style.margin_r),
            pick(self.margin_v, style.margin_v),
        )
    }
}

/// Common read access to anything that carries text and geometry.
pub trait TextUnit {
    /// Short name used in error messages.
    fn kind(&self) -> &'static str;

    /// Unit text, without surrounding whitespace for words and syllables.
    fn text(&self) -> &str;

    /// Layout state.
    fn placement(&self) -> &Placement;

    /// Mutable layout state.
    fn placement_mut(&mut self) -> &mut Placement;

    /// Leading whitespace counted in front of [`TextUnit::text`].
    fn prespace(&self) -> usize {
        0
    }

    /// Trailing whitespace counted after [`TextUnit::text`].
    fn postspace(&self) -> usize {
        0
    }

    /// Geometry, or a validation error when the resolver has not run.
    fn geometry(&self) -> KfxResult<&Geometry> {
        self.placement().require(self.kind())
    }
}

impl TextUnit for Line {
    fn kind(&self) -> &'static str {
        "line"
    }
    fn text(&self) -> &str {
        &self.text
    }
    fn placement(&self) -> &Placement {
        &self.placement
    }
    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }
}

impl TextUnit for Word {
    fn kind(&self) -> &'static str {
        "word"
    }
    fn text(&self) -> &str {
        &self.text
    }
    fn placement(&self) -> &Placement {
        &self.placement
    }
    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }
    fn prespace(&self) -> usize {
        self.prespace
    }
    fn postspace(&self) -> usize {
        self.postspace
    }
}

impl TextUnit for Syllable {
    fn kind(&self) -> &'static str {
        "syllable"
    }
    fn text(&self) -> &str {
        &self.text
    }
    fn placement(&self) -> &Placement {
        &self.placement
    }
    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }
    fn prespace(&self) -> usize {
        self.prespace
    }
    fn postspace(&self) -> usize {
        self.postspace
    }
}

impl TextUnit for Char {
    fn kind(&self) -> &'static str {
        "char"
    }
    fn text(&self) -> &str {
        &self.text
    }
    fn placement(&self) -> &Placement {
        &self.placement
    }
    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
