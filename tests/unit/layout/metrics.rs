use super::*;

fn glyph(x: f64, advance: f64, y_min: f64, y_max: f64) -> GlyphRecord {
    GlyphRecord {
        x,
        advance,
        y_min,
        y_max,
        ..GlyphRecord::default()
    }
}

#[test]
fn ascent_descent_clamps_at_baseline() {
    let run = [glyph(0.0, 10.0, -30.0, 5.0), glyph(10.0, 10.0, -20.0, 8.0)];
    assert_eq!(ascent_descent(&run), (30.0, 8.0));

    let floating = [glyph(0.0, 10.0, 2.0, 6.0)];
    assert_eq!(ascent_descent(&floating), (0.0, 6.0));
    assert_eq!(ascent_descent(&[]), (0.0, 0.0));
}

#[test]
fn extents_span_first_pen_to_trailing_advance() {
    let run = [glyph(5.0, 10.0, -30.0, 0.0), glyph(15.0, 12.0, -20.0, 4.0)];
    assert_eq!(text_extents(&run), (22.0, 30.0));
    assert_eq!(text_extents(&[]), (0.0, 0.0));
}

#[test]
fn pen_positions_include_trailing_entry() {
    let run = [glyph(5.0, 10.0, 0.0, 0.0), glyph(15.0, 12.0, 0.0, 0.0)];
    assert_eq!(pen_positions(&run), vec![0.0, 10.0, 22.0]);
}
