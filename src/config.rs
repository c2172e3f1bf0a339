use crate::error::RenderFailure;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use titlepress_layout::LayoutConfig;
use titlepress_record::AcceptancePolicy;
use titlepress_resource::ResourceError;

/// Where the engine finds its resources, read from a JSON file.
///
/// ```json
/// {
///   "fonts_dir": "fonts",
///   "templates_dir": "templates",
///   "icc_profile": "profiles/sRGB.icc",
///   "assets_dir": "assets",
///   "acceptance": { "min_auto_confidence": 0.9 }
/// }
/// ```
///
/// Relative paths are resolved against the directory holding the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub fonts_dir: PathBuf,
    /// Alias map; defaults to `fontmap.json` inside `fonts_dir` when present.
    #[serde(default)]
    pub font_map: Option<PathBuf>,
    pub templates_dir: PathBuf,
    #[serde(default)]
    pub icc_profile: Option<PathBuf>,
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub acceptance: AcceptancePolicy,
}

impl EngineConfig {
    pub fn from_json_str(input: &str) -> Result<Self, RenderFailure> {
        serde_json::from_str(input)
            .map_err(|e| ResourceError::InvalidFormat(format!("engine config: {}", e)).into())
    }

    /// Reads a config file and makes its relative paths absolute.
    pub fn from_file(path: &Path) -> Result<Self, RenderFailure> {
        let text = std::fs::read_to_string(path).map_err(|e| ResourceError::LoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_json_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    pub fn relative_to(mut self, base: &Path) -> Self {
        let join = |p: &PathBuf| if p.is_absolute() { p.clone() } else { base.join(p) };
        self.fonts_dir = join(&self.fonts_dir);
        self.templates_dir = join(&self.templates_dir);
        self.font_map = self.font_map.as_ref().map(join);
        self.icc_profile = self.icc_profile.as_ref().map(join);
        self.assets_dir = self.assets_dir.as_ref().map(join);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply() {
        let config =
            EngineConfig::from_json_str(r#"{ "fonts_dir": "fonts", "templates_dir": "t" }"#)
                .unwrap();
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.acceptance.min_auto_confidence, 0.85);
        assert!(config.icc_profile.is_none());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = EngineConfig::from_json_str(
            r#"{ "fonts_dir": "f", "templates_dir": "t", "threads": 4 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RenderFailure::Resource(ResourceError::InvalidFormat(_))));
    }

    #[test]
    fn test_paths_resolve_against_config_dir() {
        let config = EngineConfig::from_json_str(
            r#"{ "fonts_dir": "fonts", "templates_dir": "/srv/templates", "icc_profile": "sRGB.icc",
                 "layout": { "default_min_rows": 3 } }"#,
        )
        .unwrap()
        .relative_to(Path::new("/etc/titlepress"));
        assert_eq!(config.fonts_dir, PathBuf::from("/etc/titlepress/fonts"));
        assert_eq!(config.templates_dir, PathBuf::from("/srv/templates"));
        assert_eq!(config.icc_profile, Some(PathBuf::from("/etc/titlepress/sRGB.icc")));
        assert_eq!(config.layout.default_min_rows, 3);
        assert_eq!(config.layout.ellipsis, "...");
    }
}
