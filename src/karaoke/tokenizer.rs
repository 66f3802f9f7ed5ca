use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::error::KfxResult;
use crate::karaoke::tags::{self, Chunk};
use crate::script::model::{Char, Karaoke, Syllable, Word};

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s*)(\S+)(\s*)").expect("invalid word regex"));

/// `(pretags)\k|\kf|\ko(duration)(posttags)`, anchored at the start.
static KARAOKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\\[kK][of]?(\d+)(.*)").expect("invalid karaoke regex"));

static INLINE_FX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\-([^\\]+)").expect("invalid inline fx regex"));

static SURROUNDING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(.*?)(\s*)$").expect("invalid spacing regex"));

/// Everything the tokenizer derives from one line's raw text.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Hierarchy {
    /// Tag-stripped text.
    pub text: String,
    /// Words in reading order.
    pub words: Vec<Word>,
    /// Syllable decomposition, or the word-only fallback.
    pub karaoke: Karaoke,
    /// Characters in reading order.
    pub chars: Vec<Char>,
}

/// Decompose a line's raw text into words, syllables and characters.
///
/// `start_time`/`end_time` are the line's times in ms; word timing copies them
/// while syllable timing starts at 0. Malformed karaoke tagging degrades to
/// [`Karaoke::WordOnly`]; only unbalanced braces are an error.
pub fn tokenize(raw: &str, start_time: i64, end_time: i64) -> KfxResult<Hierarchy> {
    let text = tags::strip_tags(raw)?;
    let words = split_words(&text, start_time, end_time);

    let karaoke = match extract_syllables(&tags::split_chunks(raw)) {
        Some(syls) => Karaoke::WithSyllables(syls),
        None => {
            tracing::debug!(raw, "no usable karaoke tagging, falling back to words");
            Karaoke::WordOnly
        }
    };

    let chars = build_chars(&words, &karaoke);
    Ok(Hierarchy {
        text,
        words,
        karaoke,
        chars,
    })
}

fn split_words(text: &str, start_time: i64, end_time: i64) -> Vec<Word> {
    WORD.captures_iter(text)
        .enumerate()
        .map(|(index, caps)| Word {
            index,
            start_time,
            end_time,
            duration: end_time - start_time,
            text: caps[2].to_string(),
            prespace: caps[1].chars().count(),
            postspace: caps[3].chars().count(),
            ..Word::default()
        })
        .collect()
}

/// `None` as soon as one chunk lacks a karaoke duration.
fn extract_syllables(chunks: &[Chunk]) -> Option<Vec<Syllable>> {
    let mut out = Vec::new();
    let mut clock = 0i64;
    let mut inline_fx = String::new();

    for chunk in chunks {
        let chunk_tags = chunk.tags.as_deref()?;
        if !KARAOKE.is_match(chunk_tags) {
            return None;
        }

        let mut pending: Vec<Syllable> = Vec::new();
        let mut rest = chunk_tags.to_string();
        while let Some(caps) = KARAOKE.captures(&rest) {
            // Durations that overflow i64 ms degrade the line like any other bad tag.
            let centis: i64 = caps[2].parse().ok()?;
            let duration = centis.checked_mul(10)?;
            let end_time = clock.checked_add(duration)?;
            pending.push(Syllable {
                index: out.len() + pending.len(),
                word_index: chunk.word_index,
                start_time: clock,
                end_time,
                duration,
                tags: caps[1].to_string(),
                ..Syllable::default()
            });
            clock = end_time;
            rest = caps[3].to_string();
        }

        let mut last = pending.pop()?;
        for mut hidden in pending {
            update_inline_fx(&hidden.tags, &mut inline_fx);
            hidden.inline_fx = inline_fx.clone();
            hidden.text.clear();
            hidden.prespace = 0;
            hidden.postspace = 0;
            out.push(hidden);
        }

        last.tags.push_str(&rest);
        update_inline_fx(&last.tags, &mut inline_fx);
        last.inline_fx = inline_fx.clone();
        assign_text(&mut last, &chunk.text);
        out.push(last);
    }

    Some(out)
}

fn update_inline_fx(tags: &str, current: &mut String) {
    if let Some(caps) = INLINE_FX.captures(tags) {
        *current = caps[1].to_string();
    }
}

fn assign_text(syl: &mut Syllable, text: &str) {
    if !text.is_empty() && text.chars().all(char::is_whitespace) {
        syl.text = text.to_string();
        syl.prespace = 0;
        syl.postspace = 0;
        return;
    }
    match SURROUNDING_SPACE.captures(text) {
        Some(caps) => {
            syl.prespace = caps[1].chars().count();
            syl.text = caps[2].to_string();
            syl.postspace = caps[3].chars().count();
        }
        None => {
            syl.text = text.to_string();
            syl.prespace = 0;
            syl.postspace = 0;
        }
    }
}

fn build_chars(words: &[Word], karaoke: &Karaoke) -> Vec<Char> {
    let mut out = Vec::new();
    match karaoke {
        Karaoke::WithSyllables(syls) => {
            for syl in syls {
                for (ci, ch) in padded(syl.prespace, &syl.text, syl.postspace).enumerate() {
                    out.push(Char {
                        index: out.len(),
                        word_index: syl.word_index,
                        syl_index: Some(syl.index),
                        syl_char_index: Some(ci),
                        start_time: syl.start_time,
                        end_time: syl.end_time,
                        duration: syl.duration,
                        text: ch.to_string(),
                        inline_fx: syl.inline_fx.clone(),
                        ..Char::default()
                    });
                }
            }
        }
        Karaoke::WordOnly => {
            for word in words {
                for ch in padded(word.prespace, &word.text, word.postspace) {
                    out.push(Char {
                        index: out.len(),
                        word_index: word.index,
                        start_time: word.start_time,
                        end_time: word.end_time,
                        duration: word.duration,
                        text: ch.to_string(),
                        ..Char::default()
                    });
                }
            }
        }
    }
    out
}

fn padded(pre: usize, text: &str, post: usize) -> impl Iterator<Item = char> + '_ {
    std::iter::repeat_n(' ', pre)
        .chain(text.chars())
        .chain(std::iter::repeat_n(' ', post))
}

#[cfg(test)]
#[path = "../../tests/unit/karaoke/tokenizer.rs"]
mod tests;
