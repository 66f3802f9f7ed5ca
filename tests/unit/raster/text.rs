use kurbo::Shape;

use super::*;
use crate::foundation::core::{Geometry, Placement};
use crate::foundation::error::KfxError;
use crate::layout::oracle::MonospaceOracle;
use crate::script::model::{Char, Word};

fn frame() -> Frame {
    Frame::new(1280.0, 720.0).unwrap()
}

fn style() -> Style {
    Style {
        font_size: 40.0,
        ..Style::default()
    }
}

fn laid_word(text: &str, left: f64, top: f64) -> Word {
    let mut g = Geometry {
        width: 20.0 * text.chars().count() as f64,
        height: 28.0,
        ..Geometry::default()
    };
    g.set_horizontal(left);
    g.top = top;
    Word {
        text: text.to_string(),
        placement: Placement::Laid(g),
        ..Word::default()
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn shape_origin_is_unit_top_left() {
    let word = laid_word("ab", 0.0, 0.0);
    let shape = text_to_shape(&word, &style(), frame(), None, None, &mut MonospaceOracle::default())
        .unwrap();
    let bbox = shape.bounding_box();
    assert!(approx(bbox.x0, 0.0));
    assert!(approx(bbox.x1, 40.0));
    assert!(approx(bbox.y0, 4.0));
    assert!(approx(bbox.y1, 32.0));
}

#[test]
fn scale_override_does_not_touch_the_style() {
    let s = style();
    let word = laid_word("a", 0.0, 0.0);
    let shape = text_to_shape(&word, &s, frame(), Some(200.0), None, &mut MonospaceOracle::default())
        .unwrap();
    assert!(approx(shape.bounding_box().width(), 40.0));
    assert_eq!(s.scale_x, 100.0);
}

#[test]
fn whitespace_has_no_outline() {
    let space = Char {
        text: " ".to_string(),
        ..Char::default()
    };
    let shape = text_to_shape(&space, &style(), frame(), None, None, &mut MonospaceOracle::default())
        .unwrap();
    assert!(shape.elements().is_empty());
}

#[test]
fn clip_is_placed_at_unit_position() {
    let word = laid_word("ab", 600.0, 300.0);
    let clip = text_to_clip(&word, &style(), frame(), 7, None, None, &mut MonospaceOracle::default())
        .unwrap();
    let bbox = clip.bounding_box();
    assert!(approx(bbox.x0, 600.0));
    assert!(approx(bbox.y0, 304.0));
}

#[test]
fn clip_compensates_scale_around_anchor() {
    let word = laid_word("ab", 600.0, 300.0);
    let clip = text_to_clip(
        &word,
        &style(),
        frame(),
        5,
        Some(200.0),
        Some(100.0),
        &mut MonospaceOracle::default(),
    )
    .unwrap();
    let bbox = clip.bounding_box();
    // Twice as wide, still centered on the word's center (620).
    assert!(approx(bbox.x0, 580.0));
    assert!(approx(bbox.x1, 660.0));
}

#[test]
fn clip_rejects_bad_alignment_and_unlaid_units() {
    let word = laid_word("ab", 0.0, 0.0);
    let err = text_to_clip(&word, &style(), frame(), 0, None, None, &mut MonospaceOracle::default())
        .unwrap_err();
    assert!(matches!(err, KfxError::Validation(_)));

    let unlaid = Word {
        text: "ab".to_string(),
        ..Word::default()
    };
    let err = text_to_clip(&unlaid, &style(), frame(), 5, None, None, &mut MonospaceOracle::default())
        .unwrap_err();
    assert!(matches!(err, KfxError::Validation(_)));
}

#[test]
fn pixels_keep_fractional_offset() {
    let whole = laid_word("a", 10.0, 20.0);
    let pixels = text_to_pixels(&whole, &style(), frame(), RasterOptions::default(), &mut MonospaceOracle::default())
            .unwrap();
    assert_eq!(pixels.len(), 20 * 28);
    assert!(pixels.iter().all(|p| p.alpha == 255.0));

    let shifted = laid_word("a", 10.5, 20.0);
    let pixels = text_to_pixels(
        &shifted,
        &style(),
        frame(),
        RasterOptions::default(),
        &mut MonospaceOracle::default(),
    )
    .unwrap();
    assert_eq!(pixels.len(), 21 * 28);
    let edge = pixels.iter().find(|p| p.x == 0 && p.y == 4).unwrap();
    assert_eq!(edge.alpha, 127.5);
}

#[test]
fn pixels_honor_raster_options() {
    let word = laid_word("a", 0.0, 0.0);
    let coarse = RasterOptions { supersampling: 1 };
    let pixels = text_to_pixels(&word, &style(), frame(), coarse, &mut MonospaceOracle::default())
        .unwrap();
    assert_eq!(pixels.len(), 20 * 28);

    let err = text_to_pixels(
        &word,
        &style(),
        frame(),
        RasterOptions { supersampling: 0 },
        &mut MonospaceOracle::default(),
    )
    .unwrap_err();
    assert!(matches!(err, KfxError::Validation(_)));
}
