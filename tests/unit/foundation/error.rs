use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KfxError::tokenize(3, "x")
            .to_string()
            .contains("tokenize error at byte 3:")
    );
    assert!(
        KfxError::resolution("x")
            .to_string()
            .contains("resolution error:")
    );
    assert!(KfxError::shaping("x").to_string().contains("shaping error:"));
    assert!(
        KfxError::rasterization("x")
            .to_string()
            .contains("rasterization error:")
    );
    assert!(
        KfxError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        KfxError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KfxError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
