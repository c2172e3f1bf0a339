//! Named asset lookup for the renderer.
//!
//! Templates refer to images by asset name; a [`ResourceProvider`] turns a
//! name into bytes. Providers are populated before rendering starts and are
//! only read afterwards, so one provider can serve any number of renders.

use crate::error::ResourceError;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Reference-counted asset bytes.
pub type SharedResourceData = Arc<Vec<u8>>;

pub trait ResourceProvider: Send + Sync + Debug {
    /// Loads the asset registered under `name`.
    fn load(&self, name: &str) -> Result<SharedResourceData, ResourceError>;

    fn exists(&self, name: &str) -> bool;

    /// A human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Assets held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceProvider {
    assets: BTreeMap<String, SharedResourceData>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an asset, replacing any asset with the same name.
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.assets.insert(name.into(), Arc::new(data));
    }

    pub fn with(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, name: &str) -> Result<SharedResourceData, ResourceError> {
        self.assets
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(name.to_string()))
    }

    fn exists(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}
