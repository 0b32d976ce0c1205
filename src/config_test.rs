use super::*;

#[test]
fn mode_defaults_to_max() {
    assert_eq!(Mode::default(), Mode::Max);
}

#[test]
fn mode_from_str() {
    assert_eq!("min".parse::<Mode>().unwrap(), Mode::Min);
    assert_eq!(" MAX ".parse::<Mode>().unwrap(), Mode::Max);
}

#[test]
fn mode_from_str_rejects_unknown() {
    let err = "width".parse::<Mode>().unwrap_err();
    assert_eq!(err, AdaptError::InvalidMode("width".into()));
}

#[test]
fn mode_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Mode::Min).unwrap(), "\"min\"");
    let mode: Mode = serde_json::from_str("\"max\"").unwrap();
    assert_eq!(mode, Mode::Max);
}

#[test]
fn mode_feature_names() {
    assert_eq!(Mode::Min.feature(), "min-width");
    assert_eq!(Mode::Max.feature(), "max-width");
}

#[test]
fn config_defaults() {
    let config = AdaptConfig::default();
    assert_eq!(config.mode, Mode::Max);
    assert_eq!(config.attribute, "data-da");
    assert_eq!(config.marker_class, "_dynamic_adapt_");
    assert_eq!(config.default_breakpoint, 767);
}

#[test]
fn config_with_mode_keeps_other_defaults() {
    let config = AdaptConfig::with_mode(Mode::Min);
    assert_eq!(config.mode, Mode::Min);
    assert_eq!(config.attribute, "data-da");
}

#[test]
fn config_partial_json_fills_defaults() {
    let config: AdaptConfig = serde_json::from_str(r#"{ "mode": "min", "default_breakpoint": 991 }"#).unwrap();
    assert_eq!(config.mode, Mode::Min);
    assert_eq!(config.default_breakpoint, 991);
    assert_eq!(config.marker_class, "_dynamic_adapt_");
}
