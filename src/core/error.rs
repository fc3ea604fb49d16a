use crate::auth::AuthError;
use crate::store::StoreError;
use crate::validation::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Malformed sequence id '{value}' (expected prefix '{prefix}' followed by digits)")]
    MalformedSequence { prefix: String, value: String },

    #[error("Duplicate value: {0}")]
    Duplicate(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Date out of range: {0} has no end date {1} days later")]
    DateOutOfRange(chrono::NaiveDate, i64),

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Identity provider error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

/// How a failure is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Per-field, shown inline next to the offending input. The store is not touched.
    Validation,
    /// The save cannot continue; shown as a blocking notification.
    Sequence,
    /// Identity provider or document store rejected the call; shown as a toast.
    Remote,
    /// The save control is still busy with a previous submit.
    Busy,
}

impl DeskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeskError::Validation(_)
            | DeskError::Duplicate(_)
            | DeskError::Unavailable(_)
            | DeskError::DateOutOfRange(..) => ErrorKind::Validation,
            DeskError::MalformedSequence { .. } => ErrorKind::Sequence,
            DeskError::SaveInProgress => ErrorKind::Busy,
            DeskError::NotFound(_)
            | DeskError::Store(_)
            | DeskError::Auth(_)
            | DeskError::Config(_)
            | DeskError::IoError(_) => ErrorKind::Remote,
        }
    }

    /// Field-level errors, when this is a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            DeskError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;

impl From<std::io::Error> for DeskError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
