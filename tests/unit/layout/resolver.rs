use super::*;
use crate::karaoke::tokenizer::tokenize;
use crate::layout::oracle::MonospaceOracle;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn frame() -> Frame {
    Frame::new(1280.0, 720.0).unwrap()
}

fn tokenized(raw: &str, duration: i64) -> Line {
    let h = tokenize(raw, 0, duration).unwrap();
    Line {
        end_time: duration,
        duration,
        raw_text: raw.to_string(),
        text: h.text,
        words: h.words,
        karaoke: h.karaoke,
        chars: h.chars,
        ..Line::default()
    }
}

fn style(alignment: u8) -> Style {
    Style {
        alignment,
        ..Style::default()
    }
}

struct EmptyOracle;

impl GlyphOracle for EmptyOracle {
    fn shape(&mut self, _: &Style, _: &str, _: Frame) -> KfxResult<Vec<GlyphRecord>> {
        Ok(Vec::new())
    }
}

struct HalfOracle;

impl GlyphOracle for HalfOracle {
    fn shape(&mut self, style: &Style, text: &str, frame: Frame) -> KfxResult<Vec<GlyphRecord>> {
        let mut all = MonospaceOracle::default().shape(style, text, frame)?;
        all.truncate(all.len() / 2);
        Ok(all)
    }
}

#[test]
fn blank_middle_center_line_anchors_at_frame_center() {
    let mut line = tokenized("   ", 1000);
    resolve_line(
        &mut line,
        &style(5),
        frame(),
        &ProcessOptions::default(),
        &mut EmptyOracle,
    )
    .unwrap();
    let g = line.geometry().unwrap();
    assert_eq!(g.left, 640.0);
    assert_eq!(g.center, 640.0);
    assert_eq!(g.right, 640.0);
    assert_eq!(g.width, 0.0);
    assert_eq!(g.middle, 360.0);
    assert_eq!(g.top, 336.0);
    assert_eq!(line.metrics, Some(LineMetrics::default()));
    assert!(line.words.iter().all(|w| w.placement.is_laid()));
}

#[test]
fn blank_left_and_right_lines_use_margins() {
    let mut line = tokenized("", 1000);
    let s = Style {
        margin_l: 25,
        margin_r: 35,
        ..style(1)
    };
    resolve_line(&mut line, &s, frame(), &ProcessOptions::default(), &mut EmptyOracle).unwrap();
    assert_eq!(line.geometry().unwrap().x, 25.0);

    let mut line = tokenized("", 1000);
    let s = Style {
        alignment: 3,
        ..s
    };
    resolve_line(&mut line, &s, frame(), &ProcessOptions::default(), &mut EmptyOracle).unwrap();
    assert_eq!(line.geometry().unwrap().x, 1245.0);
}

#[test]
fn horizontal_syllables_follow_glyph_positions() {
    let mut line = tokenized(r"{\k56}su{\k13}re", 690);
    resolve_line(
        &mut line,
        &style(2),
        frame(),
        &ProcessOptions::default(),
        &mut MonospaceOracle::default(),
    )
    .unwrap();

    let g = line.geometry().unwrap();
    assert_eq!(g.width, 96.0);
    assert_eq!(g.left, 592.0);
    assert_eq!(g.bottom, 710.0);
    assert_eq!(g.top, 662.0);
    assert_eq!((g.x, g.y), (640.0, 710.0));

    let syls = line.syllables();
    let s0 = syls[0].geometry().unwrap();
    let s1 = syls[1].geometry().unwrap();
    assert_eq!((s0.left, s0.width), (592.0, 48.0));
    assert_eq!((s1.left, s1.width), (640.0, 48.0));
    assert_eq!(s1.center, 664.0);
    assert_eq!(s1.bottom, 710.0);
}

#[test]
fn char_widths_sum_to_line_width() {
    for raw in [r"{\k10}ka {\k20}ra{\k30}oke", "hello  world ", r"{\k10\k10}a{\k5} "] {
        let mut line = tokenized(raw, 1000);
        resolve_line(
            &mut line,
            &Style {
                spacing: 1.5,
                ..style(1)
            },
            frame(),
            &ProcessOptions::default(),
            &mut MonospaceOracle::default(),
        )
        .unwrap();
        let total: f64 = line
            .chars
            .iter()
            .map(|c| c.geometry().unwrap().width)
            .sum();
        assert!(approx(total, line.geometry().unwrap().width), "raw = {raw:?}");
    }
}

#[test]
fn words_skip_their_leading_space() {
    let mut line = tokenized(" ab cd", 1000);
    resolve_line(
        &mut line,
        &style(7),
        frame(),
        &ProcessOptions::default(),
        &mut MonospaceOracle::default(),
    )
    .unwrap();
    let line_left = line.geometry().unwrap().left;
    let w0 = line.words[0].geometry().unwrap();
    let w1 = line.words[1].geometry().unwrap();
    assert_eq!(line_left, 10.0);
    assert_eq!(w0.left, 34.0);
    assert_eq!(w0.width, 48.0);
    assert_eq!(w1.left, 106.0);
    assert_eq!(w1.top, 10.0);
    assert_eq!(w1.y, 10.0);
}

#[test]
fn unit_heights_come_from_ink_but_rows_from_font_size() {
    let mut line = tokenized("a b", 1000);
    resolve_line(
        &mut line,
        &style(8),
        frame(),
        &ProcessOptions::default(),
        &mut MonospaceOracle::default(),
    )
    .unwrap();
    let space = line.chars[1].geometry().unwrap();
    let a = line.chars[0].geometry().unwrap();
    assert_eq!(space.height, 0.0);
    assert!(approx(a.height, 33.6));
    assert_eq!(a.bottom, 58.0);
    assert_eq!(space.bottom, 58.0);
    let m = line.metrics.unwrap();
    assert!(approx(m.ascent, 33.6));
    assert_eq!(m.descent, 0.0);
    assert!(approx(m.max_ascent, 38.4));
}

#[test]
fn line_margin_overrides_style() {
    let mut line = tokenized("a", 1000);
    line.margin_v = 30;
    resolve_line(
        &mut line,
        &style(9),
        frame(),
        &ProcessOptions::default(),
        &mut MonospaceOracle::default(),
    )
    .unwrap();
    let g = line.geometry().unwrap();
    assert_eq!(g.top, 30.0);
    assert_eq!(g.right, 1270.0);
}

#[test]
fn non_extended_layout_only_places_the_line() {
    let mut line = tokenized(r"{\k10}a{\k10}b", 200);
    let options = ProcessOptions {
        extended: false,
        ..ProcessOptions::default()
    };
    resolve_line(
        &mut line,
        &style(2),
        frame(),
        &options,
        &mut MonospaceOracle::default(),
    )
    .unwrap();
    assert!(line.placement.is_laid());
    assert!(line.chars.iter().all(|c| !c.placement.is_laid()));
}

#[test]
fn empty_oracle_output_is_a_shaping_error() {
    let mut line = tokenized("abc", 1000);
    let err = resolve_line(
        &mut line,
        &style(2),
        frame(),
        &ProcessOptions::default(),
        &mut EmptyOracle,
    )
    .unwrap_err();
    assert!(matches!(err, KfxError::Shaping(_)));

    let err = resolve_line(
        &mut line,
        &style(2),
        frame(),
        &ProcessOptions::default(),
        &mut HalfOracle,
    )
    .unwrap_err();
    assert!(matches!(err, KfxError::Shaping(_)));
}

#[test]
fn invalid_alignment_is_rejected() {
    let mut line = tokenized("a", 1000);
    let err = resolve_line(
        &mut line,
        &style(10),
        frame(),
        &ProcessOptions::default(),
        &mut MonospaceOracle::default(),
    )
    .unwrap_err();
    assert!(matches!(err, KfxError::Validation(_)));
}
