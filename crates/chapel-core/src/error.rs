use thiserror::Error;

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A stored recurrence rule carries a frequency tag outside the closed vocabulary.
    #[error("Invalid recurrence rule: unknown frequency tag {tag:?}")]
    InvalidRule { tag: String },

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
