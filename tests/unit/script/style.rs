use super::*;

#[test]
fn later_definition_replaces_earlier_one() {
    let mut table = StyleTable::new();
    let a = table.insert(Style {
        name: "Romaji".to_string(),
        font_size: 30.0,
        ..Style::default()
    });
    let b = table.insert(Style {
        name: "Romaji".to_string(),
        font_size: 42.0,
        ..Style::default()
    });
    assert_eq!(a, b);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(a).unwrap().font_size, 42.0);
}

#[test]
fn json_list_round_trips_through_table() {
    let json = r#"[{"name": "Default"}, {"name": "Kanji", "alignment": 5, "bold": true}]"#;
    let table: StyleTable = serde_json::from_str(json).unwrap();
    let kanji = table.id_for("Kanji").unwrap();
    assert_eq!(kanji.index(), 1);
    let style = table.get(kanji).unwrap();
    assert!(style.bold);
    assert_eq!(style.font_name, "Arial");
    assert!(table.id_for("Missing").is_none());
}

#[test]
fn with_scale_leaves_the_source_style_untouched() {
    let base = Style::default();
    let scaled = base.with_scale(Some(150.0), None);
    assert_eq!(scaled.scale_x, 150.0);
    assert_eq!(scaled.scale_y, 100.0);
    assert_eq!(base.scale_x, 100.0);
}

#[test]
fn validate_rejects_unusable_numbers() {
    let bad_alignment = Style {
        alignment: 0,
        ..Style::default()
    };
    assert!(bad_alignment.validate().is_err());

    let bad_size = Style {
        font_size: 0.0,
        ..Style::default()
    };
    assert!(bad_size.validate().is_err());

    assert!(Style::default().validate().is_ok());
}
