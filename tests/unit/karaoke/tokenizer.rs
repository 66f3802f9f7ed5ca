use super::*;
use crate::foundation::error::KfxError;

fn concat_chars(h: &Hierarchy) -> String {
    h.chars.iter().map(|c| c.text.as_str()).collect()
}

#[test]
fn two_karaoke_tags_yield_two_syllables() {
    let h = tokenize(r"{\k56}su{\k13}re", 0, 690).unwrap();
    let syls = h.karaoke.syllables();
    assert_eq!(syls.len(), 2);
    assert_eq!(syls[0].text, "su");
    assert_eq!(syls[0].start_time, 0);
    assert_eq!(syls[0].duration, 560);
    assert_eq!(syls[1].text, "re");
    assert_eq!(syls[1].start_time, 560);
    assert_eq!(syls[1].duration, 130);
    assert_eq!(syls[1].end_time, 690);
}

#[test]
fn syllable_timings_are_contiguous() {
    let h = tokenize(r"{\k20}ko{\kf30}no {\ko15}mi{\K35}chi", 5000, 6000).unwrap();
    let syls = h.karaoke.syllables();
    assert_eq!(syls[0].start_time, 0);
    for pair in syls.windows(2) {
        assert_eq!(pair[0].end_time, pair[1].start_time);
    }
    assert_eq!(syls.last().unwrap().end_time, 1000);
}

#[test]
fn no_karaoke_tag_falls_back_to_words() {
    let h = tokenize(r"{\an8}hello big world", 1000, 2000).unwrap();
    assert_eq!(h.karaoke, Karaoke::WordOnly);
    assert_eq!(h.words.len(), 3);
    assert_eq!(h.chars.len(), "hello big world".chars().count());
    assert!(h.chars.iter().all(|c| c.syl_index.is_none()));
    assert_eq!(h.chars[6].word_index, 1);
    assert_eq!(h.chars[6].start_time, 1000);
}

#[test]
fn one_untagged_chunk_rejects_the_whole_line() {
    let h = tokenize(r"{\k10}ka{\b1}ra", 0, 200).unwrap();
    assert!(!h.karaoke.has_syllables());

    let h = tokenize(r"lead{\k10}ka", 0, 200).unwrap();
    assert!(!h.karaoke.has_syllables());
}

#[test]
fn chars_round_trip_plain_text() {
    for raw in [
        r"{\k10} ka {\k20}ra{\k5}  ",
        r"{\k10}{\k20}a b",
        " two  spaced words ",
        r"{\k15}夢{\k15}の",
    ] {
        let h = tokenize(raw, 0, 1000).unwrap();
        assert_eq!(concat_chars(&h), h.text, "raw = {raw:?}");
    }
}

#[test]
fn words_count_surrounding_whitespace() {
    let h = tokenize("  ab cd  ", 0, 10).unwrap();
    assert_eq!(h.words[0].prespace, 2);
    assert_eq!(h.words[0].text, "ab");
    assert_eq!(h.words[0].postspace, 1);
    assert_eq!(h.words[1].prespace, 0);
    assert_eq!(h.words[1].postspace, 2);
}

#[test]
fn tag_only_peels_become_hidden_syllables() {
    let h = tokenize(r"{\k10\k20}ab", 0, 300).unwrap();
    let syls = h.karaoke.syllables();
    assert_eq!(syls.len(), 2);
    assert_eq!(syls[0].text, "");
    assert_eq!(syls[0].duration, 100);
    assert_eq!(syls[1].text, "ab");
    assert_eq!(syls[1].start_time, 100);
    assert_eq!(h.chars.len(), 2);
    assert_eq!(h.chars[0].syl_index, Some(1));
}

#[test]
fn syllables_split_surrounding_space_and_keep_tags() {
    let h = tokenize(r"{\k10\bord2} ka {\k20}ra", 0, 300).unwrap();
    let syls = h.karaoke.syllables();
    assert_eq!(syls[0].prespace, 1);
    assert_eq!(syls[0].text, "ka");
    assert_eq!(syls[0].postspace, 1);
    assert_eq!(syls[0].tags, r"\bord2");
    assert_eq!(syls[1].word_index, 1);
    assert_eq!(h.chars[1].syl_char_index, Some(1));
}

#[test]
fn whitespace_only_chunk_is_kept_as_text() {
    let h = tokenize(r"{\k10}a{\k5}  {\k10}b", 0, 250).unwrap();
    let syls = h.karaoke.syllables();
    assert_eq!(syls[1].text, "  ");
    assert_eq!(syls[1].prespace, 0);
    assert_eq!(syls[1].postspace, 0);
}

#[test]
fn inline_effect_propagates_forward() {
    let h = tokenize(r"{\k10\-glow}a{\k10}b{\k10\-fade}c{\k10}d", 0, 400).unwrap();
    let fx: Vec<_> = h
        .karaoke
        .syllables()
        .iter()
        .map(|s| s.inline_fx.as_str())
        .collect();
    assert_eq!(fx, ["glow", "glow", "fade", "fade"]);
    assert_eq!(h.chars[1].inline_fx, "glow");
}

#[test]
fn unbalanced_braces_are_an_error() {
    assert!(matches!(
        tokenize(r"{\k10}su{\k13re", 0, 100),
        Err(KfxError::Tokenize { .. })
    ));
}

#[test]
fn overflowing_durations_degrade_to_words() {
    let h = tokenize(r"{\k1000000000000000000}a", 0, 10).unwrap();
    assert_eq!(h.karaoke, Karaoke::WordOnly);
    assert_eq!(concat_chars(&h), "a");

    let h = tokenize(r"{\k900000000000000000}a{\k900000000000000000}b", 0, 10).unwrap();
    assert_eq!(h.karaoke, Karaoke::WordOnly);
    assert_eq!(h.words.len(), 1);
    assert_eq!(h.chars.len(), 2);
}

#[test]
fn unicode_whitespace_becomes_ascii_space_in_chars() {
    let h = tokenize("{\\k10}a\u{3000}{\\k10}b", 0, 200).unwrap();
    assert_eq!(h.text, "a\u{3000}b");
    assert_eq!(h.chars.len(), h.text.chars().count());
    assert_eq!(h.chars[1].text, " ");
    assert_eq!(concat_chars(&h), "a b");
}
