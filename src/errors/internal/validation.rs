use thiserror::Error;

/// Input rejected before any state was touched
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Field {field} is too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Score must be an integer between 0 and 100, got {score}")]
    ScoreOutOfRange { score: i64 },

    #[error("File type .{extension} is not allowed (allowed: {allowed})")]
    DisallowedExtension { extension: String, allowed: String },

    #[error("File is too large: {size} bytes (max {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Password validation failed: {0}")]
    PasswordPolicy(String),
}
