use crate::model::ShiftError;
use crate::time::TimeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("unexpected response shape: {0}")]
    Schema(String),
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl From<ShiftError> for ApiError {
    fn from(err: ShiftError) -> Self {
        match err {
            ShiftError::Invalid(errors) => ApiError::Validation(errors),
        }
    }
}

impl From<TimeError> for ApiError {
    fn from(err: TimeError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
