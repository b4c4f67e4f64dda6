//! Error types for the Monastery360 content core

use thiserror::Error;

/// Errors raised while validating monastery records
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("coordinates ({latitude}, {longitude}) fall outside the Sikkim region")]
    CoordinatesOutOfRange { latitude: f64, longitude: f64 },

    #[error("monastery '{monastery}' has no English audio narration")]
    MissingEnglishNarration { monastery: String },

    #[error("festival entry of '{monastery}' is missing its {field}")]
    IncompleteFestival {
        monastery: String,
        field: &'static str,
    },

    #[error("monastery '{monastery}' has an empty {field}")]
    EmptyField {
        monastery: String,
        field: &'static str,
    },

    #[error("duplicate monastery id {0}")]
    DuplicateId(u32),
}

/// Errors raised by the in-memory stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("monastery not found: {0}")]
    MonasteryNotFound(String),

    #[error("record not found: {0}")]
    RecordNotFound(String),

    #[error("duplicate id {0}")]
    DuplicateId(u32),

    #[error("duplicate slug '{0}'")]
    DuplicateSlug(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
