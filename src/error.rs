use thiserror::Error;

pub type MailframeResult<T> = Result<T, MailframeError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MailframeError {
    #[error("JSON error: {0}")]
    Json(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("Template html does not contain the '<!-- Email Structure -->' marker followed by a JSON object")]
    MissingStructureMarker,

    #[error("Unknown layout type '{layout_type}'")]
    UnknownLayout { layout_type: String },

    #[error("Layout '{layout_type}' groups {expected} slots into rows but declares {actual}")]
    SlotCountMismatch {
        layout_type: String,
        expected: usize,
        actual: usize,
    },

    #[error("Layout '{layout_type}' declares slot '{slot_id}' more than once")]
    DuplicateSlotId { layout_type: String, slot_id: String },

    #[error("Failed to read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for MailframeError {
    fn from(err: serde_json::Error) -> Self {
        MailframeError::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for MailframeError {
    fn from(err: serde_yaml::Error) -> Self {
        MailframeError::Yaml(err.to_string())
    }
}
