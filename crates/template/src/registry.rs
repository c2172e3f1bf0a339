use crate::error::TemplateError;
use crate::model::Template;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Parsed templates keyed by id, each id holding one or more versions.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, BTreeMap<u32, Arc<Template>>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template. A template with the same id and version is replaced.
    pub fn insert(&mut self, template: Template) {
        let versions = self.templates.entry(template.id().to_string()).or_default();
        if versions.contains_key(&template.version()) {
            log::warn!(
                "Replacing template '{}' version {}",
                template.id(),
                template.version()
            );
        }
        versions.insert(template.version(), Arc::new(template));
    }

    /// The highest registered version of `id`.
    pub fn get(&self, id: &str) -> Result<Arc<Template>, TemplateError> {
        self.templates
            .get(id)
            .and_then(|versions| versions.values().next_back())
            .cloned()
            .ok_or_else(|| TemplateError::NotFound {
                id: id.to_string(),
                version: None,
            })
    }

    pub fn get_version(&self, id: &str, version: u32) -> Result<Arc<Template>, TemplateError> {
        self.templates
            .get(id)
            .and_then(|versions| versions.get(&version))
            .cloned()
            .ok_or_else(|| TemplateError::NotFound {
                id: id.to_string(),
                version: Some(version),
            })
    }

    pub fn resolve(&self, id: &str, version: Option<u32>) -> Result<Arc<Template>, TemplateError> {
        match version {
            Some(v) => self.get_version(id, v),
            None => self.get(id),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
