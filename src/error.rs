use serde::Serialize;
use thiserror::Error;
use titlepress_layout::{LayoutError, LayoutWarning};
use titlepress_record::RecordError;
use titlepress_render::{RenderError, RenderWarning};
use titlepress_resource::ResourceError;
use titlepress_template::{BindError, Locator, TemplateError};
use titlepress_types::ElementRef;

/// Why a render produced no document.
///
/// Every variant carries enough context (a locator, element or binding path)
/// to find the template defect without looking inside the engine. None of
/// them is worth retrying with the same inputs.
#[derive(Error, Debug)]
pub enum RenderFailure {
    #[error("Template parse error at {locator}: {message}")]
    TemplateParse { locator: Locator, message: String },

    #[error("Template '{id}' not found{}", .version.map(|v| format!(" (version {})", v)).unwrap_or_default())]
    TemplateNotFound { id: String, version: Option<u32> },

    #[error("Binding path '{path}' not found in record{}", element_suffix(.element))]
    BindingNotFound {
        path: String,
        element: Option<ElementRef>,
    },

    #[error("Binding path '{path}' expected {expected}, found {found}{}", element_suffix(.element))]
    BindingTypeMismatch {
        path: String,
        element: Option<ElementRef>,
        expected: String,
        found: String,
    },

    #[error("Text in {element} overflows its box by {overflow:.2}pt")]
    TextOverflow { element: ElementRef, overflow: f32 },

    #[error("Font alias '{alias}' used by {element} is not registered")]
    FontAliasUnresolved { alias: String, element: ElementRef },

    #[error("{element} needs {height:.2}pt but a page only has {available:.2}pt")]
    ElementTooLarge {
        element: ElementRef,
        height: f32,
        available: f32,
    },

    #[error("Record rejected: {0}")]
    Record(#[from] RecordError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Rendering failed: {0}")]
    Render(RenderError),
}

fn element_suffix(element: &Option<ElementRef>) -> String {
    element
        .map(|e| format!(" (referenced by {})", e))
        .unwrap_or_default()
}

impl RenderFailure {
    /// The template element the failure points at, when there is one.
    pub fn element(&self) -> Option<ElementRef> {
        match self {
            RenderFailure::BindingNotFound { element, .. }
            | RenderFailure::BindingTypeMismatch { element, .. } => *element,
            RenderFailure::TextOverflow { element, .. }
            | RenderFailure::FontAliasUnresolved { element, .. }
            | RenderFailure::ElementTooLarge { element, .. } => Some(*element),
            _ => None,
        }
    }
}

impl From<TemplateError> for RenderFailure {
    fn from(e: TemplateError) -> Self {
        match e {
            TemplateError::Parse { locator, message } => {
                RenderFailure::TemplateParse { locator, message }
            }
            TemplateError::NotFound { id, version } => {
                RenderFailure::TemplateNotFound { id, version }
            }
        }
    }
}

impl From<BindError> for RenderFailure {
    fn from(e: BindError) -> Self {
        match e {
            BindError::BindingNotFound { path, element } => {
                RenderFailure::BindingNotFound { path, element }
            }
            BindError::TypeMismatch {
                path,
                element,
                expected,
                found,
            } => RenderFailure::BindingTypeMismatch {
                path,
                element,
                expected,
                found,
            },
        }
    }
}

impl From<LayoutError> for RenderFailure {
    fn from(e: LayoutError) -> Self {
        match e {
            LayoutError::FontAliasUnresolved { alias, element } => {
                RenderFailure::FontAliasUnresolved { alias, element }
            }
            LayoutError::TextOverflow { element, overflow } => {
                RenderFailure::TextOverflow { element, overflow }
            }
            LayoutError::ElementTooLarge {
                element,
                height,
                available,
            } => RenderFailure::ElementTooLarge {
                element,
                height,
                available,
            },
            LayoutError::MissingContent(element) => RenderFailure::TemplateParse {
                locator: element.into(),
                message: "element has no bound content".to_string(),
            },
        }
    }
}

impl From<RenderError> for RenderFailure {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::FontAliasUnresolved { alias, element } => {
                RenderFailure::FontAliasUnresolved { alias, element }
            }
            other => RenderFailure::Render(other),
        }
    }
}

/// A condition that changed the document without failing the render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Part of an absolute element lies outside the page and is not drawn.
    Clipped { element: ElementRef },
    /// An absolute element lies entirely outside the page and was dropped.
    OutsidePage { element: ElementRef },
    /// The font has no glyph for `ch`, so a substitute glyph is drawn.
    GlyphSubstituted {
        element: ElementRef,
        ch: char,
        font: String,
    },
    /// Archival output was requested but a prerequisite is missing.
    ResourceUnavailable { resource: String, reason: String },
    /// An image asset could not be loaded or decoded and was skipped.
    ImageUnavailable {
        asset: String,
        element: ElementRef,
        reason: String,
    },
}

impl From<LayoutWarning> for Warning {
    fn from(w: LayoutWarning) -> Self {
        match w {
            LayoutWarning::Clipped { element } => Warning::Clipped { element },
            LayoutWarning::OutsidePage { element } => Warning::OutsidePage { element },
            LayoutWarning::GlyphSubstituted { element, ch, font } => {
                Warning::GlyphSubstituted { element, ch, font }
            }
        }
    }
}

impl From<RenderWarning> for Warning {
    fn from(w: RenderWarning) -> Self {
        match w {
            RenderWarning::ResourceUnavailable { resource, reason } => {
                Warning::ResourceUnavailable { resource, reason }
            }
            RenderWarning::ImageUnavailable {
                asset,
                element,
                reason,
            } => Warning::ImageUnavailable {
                asset,
                element,
                reason,
            },
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::Clipped { element } => write!(f, "{} clipped to the page", element),
            Warning::OutsidePage { element } => write!(f, "{} lies outside the page", element),
            Warning::GlyphSubstituted { element, ch, font } => write!(
                f,
                "{} draws a substitute for {:?} (U+{:04X}), missing from font '{}'",
                element, ch, *ch as u32, font
            ),
            Warning::ResourceUnavailable { resource, reason } => {
                write!(f, "{} unavailable: {}", resource, reason)
            }
            Warning::ImageUnavailable {
                asset,
                element,
                reason,
            } => write!(f, "image '{}' for {} not drawn: {}", asset, element, reason),
        }
    }
}
