use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::error::{KfxError, KfxResult};

/// Maximal run of consecutive `{...}` groups.
static TAG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\{.*?\})+").expect("invalid tag run regex"));

/// Text ending in whitespace closes the current word.
static TRAILING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)(\s+)$").expect("invalid trailing space regex"));

/// Byte range of one `{...}` group in raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Tag text followed by the plain run up to the next tag group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Chunk {
    /// Override tags with braces removed and `}{` collapsed. `None` for leading untagged text.
    pub(crate) tags: Option<String>,
    pub(crate) text: String,
    pub(crate) word_index: usize,
}

/// Locate every `{...}` group, rejecting unbalanced braces.
pub(crate) fn scan_groups(raw: &str) -> KfxResult<Vec<Span>> {
    let mut out = Vec::new();
    let mut open: Option<usize> = None;

    for (i, b) in raw.bytes().enumerate() {
        match (b, open) {
            (b'{', None) => open = Some(i),
            (b'{', Some(start)) => {
                return Err(KfxError::tokenize(
                    i,
                    format!("nested '{{' inside tag group opened at byte {start}"),
                ));
            }
            (b'}', Some(start)) => {
                out.push(Span { start, end: i + 1 });
                open = None;
            }
            (b'}', None) => {
                return Err(KfxError::tokenize(i, "'}' without a matching '{'"));
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        return Err(KfxError::tokenize(start, "unterminated tag group"));
    }
    Ok(out)
}

/// Remove every override tag group from `raw`.
pub fn strip_tags(raw: &str) -> KfxResult<String> {
    let groups = scan_groups(raw)?;
    let mut out = String::with_capacity(raw.len());
    let mut cursor = 0usize;
    for g in groups {
        out.push_str(&raw[cursor..g.start]);
        cursor = g.end;
    }
    out.push_str(&raw[cursor..]);
    Ok(out)
}

/// Split already-validated raw text into tag/text chunks.
pub(crate) fn split_chunks(raw: &str) -> Vec<Chunk> {
    let runs: Vec<_> = TAG_RUN.find_iter(raw).collect();
    let Some(first) = runs.first() else {
        return vec![Chunk {
            tags: None,
            text: raw.to_string(),
            word_index: 0,
        }];
    };

    let mut out = Vec::with_capacity(runs.len() + 1);
    if first.start() != 0 {
        out.push(Chunk {
            tags: None,
            text: raw[..first.start()].to_string(),
            word_index: 0,
        });
    }

    let mut word_index = 0usize;
    for (i, run) in runs.iter().enumerate() {
        let text_end = runs.get(i + 1).map_or(raw.len(), |next| next.start());
        let inner = &raw[run.start() + 1..run.end() - 1];
        let chunk = Chunk {
            tags: Some(inner.replace("}{", "")),
            text: raw[run.end()..text_end].to_string(),
            word_index,
        };
        if TRAILING_SPACE.is_match(&chunk.text) {
            word_index += 1;
        }
        out.push(chunk);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/karaoke/tags.rs"]
mod tests;
