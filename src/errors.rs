use crate::models::MembershipStatus;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Why a check-in attempt was refused. The attempt is not recorded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdmissionError {
    #[error("membership is {status}")]
    InactiveStatus { status: MembershipStatus },

    #[error("membership expired on {}", .expired_on.format("%Y-%m-%d"))]
    Expired { expired_on: DateTime<Utc> },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write collection {key}: {source}")]
    Write {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode collection {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured for the routine generator")]
    MissingCredentials,

    #[error("request to routine generator failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("routine generator answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("routine generator returned no text")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum CheckInError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!("storage failure: {err}");
        Self::internal(err)
    }
}

impl From<AdmissionError> for AppError {
    fn from(err: AdmissionError) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: err.to_string(),
        }
    }
}

impl From<CheckInError> for AppError {
    fn from(err: CheckInError) -> Self {
        match err {
            CheckInError::Admission(err) => err.into(),
            CheckInError::Storage(err) => err.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
