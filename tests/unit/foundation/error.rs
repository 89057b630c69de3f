use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StageError::collaborator("x")
            .to_string()
            .contains("collaborator error:")
    );
    assert!(
        StageError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        StageError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        StageError::MissingTarget(ElementRole::PillWrapper)
            .to_string()
            .contains("PillWrapper")
    );
}

#[test]
fn missing_target_is_classified() {
    assert!(StageError::MissingTarget(ElementRole::Spacer).is_missing_target());
    assert!(!StageError::collaborator("boom").is_missing_target());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StageError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: StageError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, StageError::Serde(_)));
}
