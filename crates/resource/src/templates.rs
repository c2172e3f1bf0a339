use crate::error::ResourceError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use titlepress_template::{Template, TemplateRegistry};

/// Parses every `*.json` file in `dir`, in file name order.
///
/// Unlike fonts, a template that fails to parse fails the whole load.
pub fn load_template_directory(dir: &Path) -> Result<TemplateRegistry, ResourceError> {
    if !dir.is_dir() {
        return Err(ResourceError::NotFound(dir.display().to_string()));
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|e| e == "json"))
        .collect();
    files.sort();

    let mut registry = TemplateRegistry::new();
    for path in files {
        registry.insert(load_template(&path)?);
    }
    log::debug!(
        "Loaded {} templates from {}",
        registry.len(),
        dir.display()
    );
    Ok(registry)
}

pub fn load_template(path: &Path) -> Result<Template, ResourceError> {
    let text = std::fs::read_to_string(path).map_err(|e| ResourceError::LoadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Template::from_json_str(&text).map_err(|source| ResourceError::Template {
        path: path.display().to_string(),
        source,
    })
}

/// Reads an ICC profile. A missing file is `Ok(None)` so callers can fall
/// back to non-archival output.
pub fn load_icc_profile(path: &Path) -> Result<Option<Arc<Vec<u8>>>, ResourceError> {
    match std::fs::read(path) {
        Ok(data) if data.is_empty() => Err(ResourceError::InvalidFormat(format!(
            "ICC profile {} is empty",
            path.display()
        ))),
        Ok(data) => Ok(Some(Arc::new(data))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("ICC profile not found: {}", path.display());
            Ok(None)
        }
        Err(e) => Err(ResourceError::LoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}
