use thiserror::Error;
use titlepress_types::ElementRef;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Font alias '{alias}' used by {element} is not registered")]
    FontAliasUnresolved { alias: String, element: ElementRef },

    #[error("Text in {element} overflows its box by {overflow:.2}pt")]
    TextOverflow { element: ElementRef, overflow: f32 },

    #[error("{element} needs {height:.2}pt but a page only has {available:.2}pt")]
    ElementTooLarge {
        element: ElementRef,
        height: f32,
        available: f32,
    },

    #[error("No bound content for {0}")]
    MissingContent(ElementRef),
}

impl LayoutError {
    pub fn element(&self) -> ElementRef {
        match self {
            LayoutError::FontAliasUnresolved { element, .. }
            | LayoutError::TextOverflow { element, .. }
            | LayoutError::ElementTooLarge { element, .. } => *element,
            LayoutError::MissingContent(element) => *element,
        }
    }
}
