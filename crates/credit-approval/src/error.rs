use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::ingestion::IngestionError;
use crate::workflows::lending::LendingServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Failures that can stop the process or an operator command.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Ingestion(IngestionError),
    Lending(LendingServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Ingestion(err) => write!(f, "ingestion error: {}", err),
            AppError::Lending(err) => write!(f, "lending error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Ingestion(err) => Some(err),
            AppError::Lending(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Ingestion(IngestionError::Csv(_))
            | AppError::Ingestion(IngestionError::MissingColumn { .. })
            | AppError::Lending(LendingServiceError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Lending(LendingServiceError::Computation(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Ingestion(_)
            | AppError::Lending(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<IngestionError> for AppError {
    fn from(value: IngestionError) -> Self {
        Self::Ingestion(value)
    }
}

impl From<LendingServiceError> for AppError {
    fn from(value: LendingServiceError) -> Self {
        Self::Lending(value)
    }
}
