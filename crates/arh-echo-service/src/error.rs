// ----- standard library imports
// ----- extra library imports
use axum::http::StatusCode;
use thiserror::Error;
// ----- local imports

pub type Result<T> = std::result::Result<T, Error>;
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid status code {0}")]
    InvalidStatus(#[from] axum::http::status::InvalidStatusCode),
    #[error("invalid content type {0}")]
    InvalidContentType(#[from] axum::http::header::InvalidHeaderValue),
    #[error("compression error {0}")]
    Compression(#[from] std::io::Error),
}

impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("Error: {self}");
        let resp = match self {
            Error::InvalidStatus(_) | Error::InvalidContentType(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::Compression(_) => (StatusCode::INTERNAL_SERVER_ERROR, String::new()),
        };
        resp.into_response()
    }
}
