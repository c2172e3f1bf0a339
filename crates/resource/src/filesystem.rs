//! Assets loaded from a directory on disk.
//!
//! An asset name is a path relative to the base directory. A name without an
//! extension also matches `<name>.png`, `<name>.jpg` and `<name>.jpeg`.
//! Resolved paths must stay inside the base directory.

use crate::error::ResourceError;
use crate::provider::{ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Returns `None` for absolute names and names that escape the base.
    fn resolve_path_safe(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return None;
        }

        let full_path = self.base_path.join(relative);
        if let Ok(canonical) = full_path.canonicalize()
            && let Some(base) = &self.canonical_base
        {
            return canonical.starts_with(base).then_some(canonical);
        }
        Some(full_path)
    }

    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let Some(path) = self.resolve_path_safe(name) else {
            return Vec::new();
        };
        if path.extension().is_some() {
            return vec![path];
        }
        let mut candidates = vec![path.clone()];
        candidates.extend(IMAGE_EXTENSIONS.iter().map(|ext| path.with_extension(ext)));
        candidates
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, name: &str) -> Result<SharedResourceData, ResourceError> {
        let candidates = self.candidates(name);
        if candidates.is_empty() {
            return Err(ResourceError::NotFound(format!(
                "{} (outside the asset directory)",
                name
            )));
        }
        let path = candidates
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| ResourceError::NotFound(name.to_string()))?;

        std::fs::read(&path)
            .map(Arc::new)
            .map_err(|e| ResourceError::LoadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }

    fn exists(&self, name: &str) -> bool {
        self.candidates(name).iter().any(|p| p.is_file())
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
