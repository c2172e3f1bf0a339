use std::fmt;
use thiserror::Error;
use titlepress_types::ElementRef;

/// Points at the part of a template definition an error refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locator {
    pub page: Option<usize>,
    pub element: Option<usize>,
    pub field: Option<String>,
}

impl Locator {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn page(page: usize) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn element(page: usize, element: usize) -> Self {
        Self {
            page: Some(page),
            element: Some(element),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl From<ElementRef> for Locator {
    fn from(r: ElementRef) -> Self {
        Locator::element(r.page, r.element)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        if let Some(page) = self.page {
            write!(f, "pages[{}]", page)?;
            wrote = true;
        }
        if let Some(element) = self.element {
            write!(f, ".elements[{}]", element)?;
        }
        match (&self.field, wrote) {
            (Some(field), true) => write!(f, ".{}", field),
            (Some(field), false) => f.write_str(field),
            (None, true) => Ok(()),
            (None, false) => f.write_str("template"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Template parse error at {locator}: {message}")]
    Parse { locator: Locator, message: String },

    #[error("Template '{id}' not found{}", .version.map(|v| format!(" (version {})", v)).unwrap_or_default())]
    NotFound { id: String, version: Option<u32> },
}

impl TemplateError {
    pub fn parse(locator: Locator, message: impl Into<String>) -> Self {
        TemplateError::Parse {
            locator,
            message: message.into(),
        }
    }
}

fn element_suffix(element: &Option<ElementRef>) -> String {
    element
        .map(|e| format!(" (referenced by {})", e))
        .unwrap_or_default()
}

/// Failures while attaching record values to a template.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("Binding path '{path}' not found{}", element_suffix(.element))]
    BindingNotFound {
        path: String,
        element: Option<ElementRef>,
    },

    #[error("Binding path '{path}' expected {expected}, found {found}{}", element_suffix(.element))]
    TypeMismatch {
        path: String,
        element: Option<ElementRef>,
        expected: String,
        found: String,
    },
}
