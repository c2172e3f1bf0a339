//! Builds a [`FontRegistry`] from a font directory.
//!
//! Every `.ttf` / `.otf` file in the directory is registered under its file
//! stem. A `fontmap.json` (in the directory, or at an explicit path) adds
//! aliases on top:
//!
//! ```json
//! {
//!   "BodySerif": { "file": "CrimsonText-Regular.ttf" },
//!   "BodySans": { "builtin": "Helvetica" }
//! }
//! ```
//!
//! Unreadable or invalid font files are skipped with a warning; templates
//! that need them then fail on the unresolved alias.

use crate::error::ResourceError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use titlepress_layout::{FontRegistry, FontRegistryBuilder, TrueTypeProgram};

pub const FONT_MAP_FILE: &str = "fontmap.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontMapEntry {
    File(String),
    Builtin(String),
}

/// Alias definitions from a font map, in alias order.
pub type FontMap = BTreeMap<String, FontMapEntry>;

pub fn parse_font_map(input: &str) -> Result<FontMap, ResourceError> {
    serde_json::from_str(input)
        .map_err(|e| ResourceError::InvalidFormat(format!("font map: {}", e)))
}

/// Loads the fonts in `dir`, then the aliases of `map_path` (default
/// `dir/fontmap.json`, optional).
pub fn load_font_directory(dir: &Path, map_path: Option<&Path>) -> Result<FontRegistry, ResourceError> {
    if !dir.is_dir() {
        return Err(ResourceError::NotFound(dir.display().to_string()));
    }

    let mut builder = FontRegistry::builder();
    for path in font_files(dir)? {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(program) = read_program(stem, &path) {
            builder = builder.truetype_program(stem, program);
        }
    }

    let map_path = map_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.join(FONT_MAP_FILE));
    if map_path.is_file() {
        let text = std::fs::read_to_string(&map_path).map_err(|e| ResourceError::LoadFailed {
            path: map_path.display().to_string(),
            message: e.to_string(),
        })?;
        builder = apply_font_map(builder, dir, &parse_font_map(&text)?)?;
    } else {
        log::debug!("No font map at {}", map_path.display());
    }

    let registry = builder.build();
    log::debug!(
        "Loaded {} font aliases from {}",
        registry.len(),
        dir.display()
    );
    Ok(registry)
}

fn apply_font_map(
    mut builder: FontRegistryBuilder,
    dir: &Path,
    map: &FontMap,
) -> Result<FontRegistryBuilder, ResourceError> {
    for (alias, entry) in map {
        builder = match entry {
            FontMapEntry::File(file) => {
                let path = dir.join(file);
                match read_program(alias, &path) {
                    Some(program) => builder.truetype_program(alias, program),
                    None => builder,
                }
            }
            FontMapEntry::Builtin(name) => {
                builder
                    .standard_named(alias, name)
                    .map_err(|source| ResourceError::Font {
                        path: FONT_MAP_FILE.to_string(),
                        source,
                    })?
            }
        };
    }
    Ok(builder)
}

fn font_files(dir: &Path) -> Result<Vec<PathBuf>, ResourceError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn read_program(alias: &str, path: &Path) -> Option<TrueTypeProgram> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!(
                "Font file for alias '{}' not readable: {} ({})",
                alias,
                path.display(),
                e
            );
            return None;
        }
    };
    match TrueTypeProgram::parse(alias, data) {
        Ok(program) => Some(program),
        Err(e) => {
            log::warn!("Skipping font {}: {}", path.display(), e);
            None
        }
    }
}
