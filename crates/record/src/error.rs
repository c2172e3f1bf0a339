use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Record JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record XML is invalid: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Record root must be an object, found {0}")]
    RootNotObject(&'static str),

    #[error("Record failed schema validation: {}", errors.join("; "))]
    Rejected { errors: Vec<String> },
}
