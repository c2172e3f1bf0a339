use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Binding path parse error in '{path}': {message}")]
    Parse { path: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("Binding path '{path}' not found in record")]
    NotFound { path: String },

    #[error("Binding path '{path}' expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },
}

impl BindingError {
    pub fn path(&self) -> &str {
        match self {
            BindingError::NotFound { path } | BindingError::TypeMismatch { path, .. } => path,
        }
    }
}
