use thiserror::Error;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    CoreError(#[from] chapel_core::error::CoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Seed file I/O error: {0}")]
    SeedIo(#[from] std::io::Error),

    #[error("Seed file parse error: {0}")]
    SeedParse(#[from] serde_json::Error),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
