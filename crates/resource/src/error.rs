use thiserror::Error;
use titlepress_layout::FontError;
use titlepress_template::TemplateError;

#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid resource format: {0}")]
    InvalidFormat(String),

    #[error("Font error in '{path}': {source}")]
    Font {
        path: String,
        #[source]
        source: FontError,
    },

    #[error("Template error in '{path}': {source}")]
    Template {
        path: String,
        #[source]
        source: TemplateError,
    },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}
