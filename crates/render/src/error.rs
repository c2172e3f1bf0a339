use serde::Serialize;
use thiserror::Error;
use titlepress_types::ElementRef;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Font alias '{alias}' used by {element} is not registered")]
    FontAliasUnresolved { alias: String, element: ElementRef },

    #[error("Font '{alias}' could not be embedded: {reason}")]
    FontEmbedding { alias: String, reason: String },

    #[error("Verification code could not be encoded: {0}")]
    VerificationCode(String),
}

/// A condition that changed the output without failing the render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderWarning {
    /// Archival output was requested but could not be produced.
    ResourceUnavailable { resource: String, reason: String },
    /// The image was not drawn.
    ImageUnavailable {
        asset: String,
        element: ElementRef,
        reason: String,
    },
}

impl std::fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderWarning::ResourceUnavailable { resource, reason } => {
                write!(f, "{} unavailable: {}", resource, reason)
            }
            RenderWarning::ImageUnavailable {
                asset,
                element,
                reason,
            } => write!(f, "image '{}' for {} not drawn: {}", asset, element, reason),
        }
    }
}
