use std::collections::HashMap;

use super::*;

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |k| map.get(k).cloned()
}

#[test]
fn defaults_are_valid() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.base_width, 1000);
    assert_eq!(cfg.placement.max_base_edge, 600.0);
    assert_eq!(cfg.speckles.count, 6);
    cfg.validate().unwrap();
}

#[test]
fn env_overrides_apply() {
    let cfg = EngineConfig::default().with_overrides(vars(&[
        ("WISHLY_DATA_DIR", "/tmp/w"),
        ("WISHLY_BODY_FONT", "/fonts/body.ttf"),
        ("WISHLY_SPECKLE_SEED", "42"),
        ("WISHLY_TITLE_FONT", "  "),
    ]));
    assert_eq!(cfg.data_dir, Some(PathBuf::from("/tmp/w")));
    assert_eq!(cfg.body_font, Some(PathBuf::from("/fonts/body.ttf")));
    assert_eq!(cfg.title_font, None);
    assert_eq!(cfg.speckle_seed, Some(42));
    assert_eq!(cfg.storage_dir(), PathBuf::from("/tmp/w"));
}

#[test]
fn bad_seed_is_ignored() {
    let cfg = EngineConfig::default().with_overrides(vars(&[("WISHLY_SPECKLE_SEED", "abc")]));
    assert_eq!(cfg.speckle_seed, None);
}

#[test]
fn partial_json_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wishly.json");
    std::fs::write(
        &path,
        r#"{"base_width": 800, "placement": {"max_scale": 3.0}, "speckle_seed": 7}"#,
    )
    .unwrap();
    let cfg: EngineConfig = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(cfg.base_width, 800);
    assert_eq!(cfg.placement.max_scale, 3.0);
    assert_eq!(cfg.placement.min_scale, 0.5);
    assert_eq!(cfg.speckle_seed, Some(7));
    assert!(EngineConfig::from_path(&dir.path().join("missing.json")).is_err());
}

#[test]
fn validate_rejects_inverted_ranges() {
    let mut cfg = EngineConfig::default();
    cfg.placement.min_scale = 3.0;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.base_width = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn missing_font_file_is_an_error() {
    let cfg = EngineConfig {
        body_font: Some(PathBuf::from("/definitely/not/here.ttf")),
        ..EngineConfig::default()
    };
    assert!(cfg.load_fonts().is_err());
    assert!(EngineConfig::default().load_fonts().unwrap().body.is_none());
}
