use super::*;

#[test]
fn frame_rejects_unset_and_negative_sizes() {
    assert!(matches!(Frame::new(0.0, 720.0), Err(KfxError::Resolution(_))));
    assert!(matches!(Frame::new(1280.0, -1.0), Err(KfxError::Resolution(_))));
    assert!(matches!(Frame::new(f64::NAN, 720.0), Err(KfxError::Resolution(_))));

    let f = Frame::new(1280.0, 720.0).unwrap();
    assert_eq!(f.center_x(), 640.0);
    assert_eq!(f.center_y(), 360.0);
}

#[test]
fn frame_deserialization_is_validated() {
    let ok: Frame = serde_json::from_str(r#"{"width": 640, "height": 480}"#).unwrap();
    assert_eq!(ok.width(), 640.0);
    assert!(serde_json::from_str::<Frame>(r#"{"width": 0, "height": 480}"#).is_err());
}

#[test]
fn alignment_codes_map_to_numpad_grid() {
    let a = Alignment::from_code(1).unwrap();
    assert_eq!((a.row, a.column), (Row::Bottom, Column::Left));
    let a = Alignment::from_code(5).unwrap();
    assert_eq!((a.row, a.column), (Row::Middle, Column::Center));
    let a = Alignment::from_code(9).unwrap();
    assert_eq!((a.row, a.column), (Row::Top, Column::Right));
    assert!(Alignment::from_code(0).is_err());
    assert!(Alignment::from_code(10).is_err());
}

#[test]
fn anchor_follows_alignment() {
    let mut g = Geometry {
        width: 10.0,
        top: 1.0,
        middle: 2.0,
        bottom: 3.0,
        ..Geometry::default()
    };
    g.set_horizontal(100.0);
    assert_eq!((g.left, g.center, g.right), (100.0, 105.0, 110.0));

    g.apply_anchor(Alignment::from_code(7).unwrap());
    assert_eq!((g.x, g.y), (100.0, 1.0));
    g.apply_anchor(Alignment::from_code(3).unwrap());
    assert_eq!((g.x, g.y), (110.0, 3.0));
}

#[test]
fn placement_require_reports_unlaid_units() {
    let p = Placement::Unlaid;
    assert!(!p.is_laid());
    assert!(matches!(p.require("word 0"), Err(KfxError::Validation(_))));
    let p = Placement::Laid(Geometry::default());
    assert!(p.require("word 0").is_ok());
}
