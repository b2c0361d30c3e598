use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum Error {
    // Auth Errors
    #[error("invalid username or password")]
    LoginFail,
    #[error("token missing or invalid")]
    AuthFailNoToken,
    #[error("auth token wrong format")]
    AuthFailTokenWrongFormat,
    #[error("auth context missing")]
    AuthFailCtxNotInRequestExt,
    #[error("invalid or expired session")]
    SessionInvalid,
    #[error("User not owner of blog")]
    NotOwner,

    // Model Errors
    #[error("not found")]
    NotFound,
    #[error("malformatted id")]
    MalformattedId,
    #[error("{0}")]
    Validation(String),
    #[error("expected `username` to be unique. Value: `{0}`")]
    UsernameTaken(String),

    // Generic
    #[error("{0}")]
    BadRequest(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::LoginFail
            | Error::AuthFailNoToken
            | Error::AuthFailTokenWrongFormat
            | Error::SessionInvalid
            | Error::NotOwner => StatusCode::UNAUTHORIZED,
            Error::AuthFailCtxNotInRequestExt => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MalformattedId
            | Error::Validation(_)
            | Error::UsernameTaken(_)
            | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage failures are logged in full but not echoed to clients.
        let message = match &self {
            Error::Database(_) | Error::Internal(_) => {
                error!("{}", self);
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::Internal(format!("password hashing failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(err.to_string())
    }
}
