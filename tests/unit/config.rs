use super::*;

#[test]
fn empty_json_is_default() {
    let cfg = StudioConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, StudioConfig::default());
    assert_eq!(cfg.navigation.min_zoom, 0.1);
    assert_eq!(cfg.navigation.max_zoom, 5.0);
    assert_eq!(cfg.extraction.max_preview_px, 400);
    assert_eq!(cfg.physics.damping, 0.95);
}

#[test]
fn partial_json_keeps_other_defaults() {
    let cfg = StudioConfig::from_json_str(r#"{"navigation":{"max_zoom":8.0}}"#).unwrap();
    assert_eq!(cfg.navigation.max_zoom, 8.0);
    assert_eq!(cfg.navigation.zoom_step, 1.2);
    assert_eq!(cfg.analysis, AnalysisConfig::default());
}

#[test]
fn invalid_zoom_range_is_rejected() {
    let err = StudioConfig::from_json_str(r#"{"navigation":{"min_zoom":2.0,"max_zoom":1.0}}"#)
        .unwrap_err();
    assert!(matches!(err, HolocardError::Validation(_)));

    let err = StudioConfig::from_json_str(r#"{"physics":{"damping":1.5}}"#).unwrap_err();
    assert!(matches!(err, HolocardError::Validation(_)));
}

#[test]
fn malformed_json_is_serde_error() {
    let err = StudioConfig::from_json_str("{").unwrap_err();
    assert!(matches!(err, HolocardError::Serde(_)));
}

#[test]
fn overrides_apply_and_ignore_garbage() {
    let cfg = StudioConfig::default()
        .with_overrides_from(|k| match k {
            "HOLOCARD_MAX_ZOOM" => Some("3.5".to_string()),
            "HOLOCARD_PAN_MARGIN" => Some("not-a-number".to_string()),
            _ => None,
        })
        .unwrap();
    assert_eq!(cfg.navigation.max_zoom, 3.5);
    assert_eq!(cfg.navigation.pan_margin, 200.0);
}

#[test]
fn override_that_breaks_invariants_is_rejected() {
    let res = StudioConfig::default().with_overrides_from(|k| {
        (k == "HOLOCARD_MIN_ZOOM").then(|| "0".to_string())
    });
    assert!(res.is_err());
}
