mod common;

use common::fixtures::{cert_v1, title_record};
use common::{TestResult, validated};
use std::fs;
use tempfile::TempDir;
use titlepress::{EngineBuilder, EngineConfig, RenderFailure, RenderOptions, Warning};

fn workspace() -> Result<TempDir, Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    fs::create_dir(dir.path().join("fonts"))?;
    fs::write(
        dir.path().join("fonts/fontmap.json"),
        r#"{ "Body": { "builtin": "Helvetica" }, "BodyBold": { "builtin": "Helvetica-Bold" } }"#,
    )?;
    fs::create_dir(dir.path().join("templates"))?;
    fs::write(
        dir.path().join("templates/cert_v1.json"),
        serde_json::to_string_pretty(&cert_v1())?,
    )?;
    Ok(dir)
}

#[test]
fn test_engine_from_config_file() -> TestResult {
    let dir = workspace()?;
    let config_path = dir.path().join("titlepress.json");
    fs::write(
        &config_path,
        r#"{ "fonts_dir": "fonts", "templates_dir": "templates", "icc_profile": "missing.icc" }"#,
    )?;

    let config = EngineConfig::from_file(&config_path)?;
    let engine = EngineBuilder::from_config(&config)?.build();
    assert_eq!(engine.fonts().len(), 2);
    assert_eq!(engine.templates().len(), 1);

    let output = engine.render(&validated(&title_record(3)), "cert_v1", &RenderOptions::default())?;
    assert_eq!(output.page_count, 2);
    assert!(matches!(
        output.warnings.as_slice(),
        [Warning::ResourceUnavailable { resource, .. }] if resource == "ICC profile"
    ));
    Ok(())
}

#[test]
fn test_broken_template_file_fails_start_up() -> TestResult {
    let dir = workspace()?;
    fs::write(dir.path().join("templates/broken.json"), r#"{ "id": "broken" }"#)?;
    let config = EngineConfig::from_json_str(r#"{ "fonts_dir": "fonts", "templates_dir": "templates" }"#)?
        .relative_to(dir.path());
    let err = EngineBuilder::from_config(&config).unwrap_err();
    assert!(matches!(err, RenderFailure::Resource(_)));
    assert!(err.to_string().contains("broken.json"));
    Ok(())
}

#[test]
fn test_missing_font_directory() -> TestResult {
    let dir = workspace()?;
    let config = EngineConfig::from_json_str(r#"{ "fonts_dir": "nope", "templates_dir": "templates" }"#)?
        .relative_to(dir.path());
    assert!(EngineBuilder::from_config(&config).is_err());
    Ok(())
}
