use std::io;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("bad request path")]
    BadPath,
    #[error(transparent)]
    Io(io::Error),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl From<io::Error> for ApiError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ApiError::NotFound,
            _ => ApiError::Io(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadPath => StatusCode::BAD_REQUEST,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Any(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        warn!("{status_code}: {self}");
        (status_code, self.to_string()).into_response()
    }
}
