use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::TemplateError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

impl From<AppError> for std::io::Error {
    fn from(err: AppError) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    }
}

/// The remote call a [`ClientError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Failure of a single call against the remote API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{op} {resource}: request failed: {source}")]
    Transport {
        op: Operation,
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{op} {resource}: server answered {status}")]
    Status {
        op: Operation,
        resource: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{op} {resource}: unreadable response body: {source}")]
    Decode {
        op: Operation,
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    pub fn operation(&self) -> Operation {
        match self {
            ClientError::Transport { op, .. }
            | ClientError::Status { op, .. }
            | ClientError::Decode { op, .. } => *op,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClientError::Status { status, .. } if *status == reqwest::StatusCode::NOT_FOUND
        )
    }
}
