use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::core::{CostProfileError, ParseCategoryError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("unknown city '{0}'")]
    UnknownCity(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownCity(_) => StatusCode::NOT_FOUND,
            ApiError::Dataset(_) | ApiError::Serialization(_) | ApiError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ParseCategoryError> for ApiError {
    fn from(err: ParseCategoryError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<CostProfileError> for ApiError {
    fn from(err: CostProfileError) -> Self {
        ApiError::Dataset(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        super::error_response(self.status(), &self.to_string())
    }
}
