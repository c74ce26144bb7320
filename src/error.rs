//! Error handling.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::header,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use thiserror::Error;
use tracing::{event, Level};

/// Scan report server error type
///
/// This type encapsulates the various errors that may occur.
/// Each variant may result in a different API error response.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Error encoding prometheus metrics
    #[error("failed to encode metrics")]
    Metrics(#[from] prometheus::Error),

    /// Error deserialising a request path parameter
    #[error("request path is not valid")]
    RequestPathRejection(#[from] PathRejection),

    /// Error deserialising a request query string
    #[error("request query is not valid")]
    RequestQueryRejection(#[from] QueryRejection),

    /// Error deserialising request data
    #[error("request data is not valid")]
    RequestDataJsonRejection(#[from] JsonRejection),

    /// Error validating request data (single error)
    #[error("request data is not valid")]
    RequestDataValidationSingle(#[from] validator::ValidationError),

    /// Error validating request data (multiple errors)
    #[error("request data is not valid")]
    RequestDataValidation(#[from] validator::ValidationErrors),

    /// Error parsing the bootstrap file
    #[error("failed to parse bootstrap file")]
    SeedParse(#[from] serde_json::Error),

    /// Error reading the bootstrap file
    #[error("failed to read bootstrap file {path}")]
    SeedRead {
        path: String,
        source: std::io::Error,
    },

    /// No scan identifier is left to assign
    #[error("scan identifiers are exhausted")]
    ScanIdsExhausted,

    /// Missing or incorrect API key
    #[error("invalid API key")]
    Unauthorised,
}

impl IntoResponse for ReportError {
    /// Convert from a `ReportError` into an [axum::response::Response].
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// Body of error response
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorBody {
    /// Main error message
    message: String,

    /// Optional list of causes
    #[serde(skip_serializing_if = "Option::is_none")]
    caused_by: Option<Vec<String>>,
}

impl ErrorBody {
    /// Return a new ErrorBody
    ///
    /// # Arguments
    ///
    /// * `error`: The error that occurred
    fn new<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        let message = error.to_string();
        let mut causes = Vec::new();
        let mut current = error.source();
        while let Some(source) = current {
            causes.push(source.to_string());
            current = source.source();
        }
        // Remove duplicate entries.
        causes.dedup();
        let caused_by = (!causes.is_empty()).then_some(causes);
        ErrorBody { message, caused_by }
    }
}

/// A response to send in error cases
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorResponse {
    /// HTTP status of the response
    #[serde(skip)]
    status: StatusCode,

    /// Response body
    error: ErrorBody,
}

impl ErrorResponse {
    /// Return a new ErrorResponse
    ///
    /// # Arguments
    ///
    /// * `status`: HTTP status of the response
    /// * `error`: The error that occurred. This will be formatted into a suitable `ErrorBody`
    fn new<E>(status: StatusCode, error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        ErrorResponse {
            status,
            error: ErrorBody::new(error),
        }
    }
}

impl From<ReportError> for ErrorResponse {
    /// Convert from a `ReportError` into an `ErrorResponse`.
    fn from(error: ReportError) -> Self {
        let status = match &error {
            ReportError::RequestPathRejection(_)
            | ReportError::RequestQueryRejection(_)
            | ReportError::RequestDataJsonRejection(_)
            | ReportError::RequestDataValidationSingle(_)
            | ReportError::RequestDataValidation(_) => StatusCode::BAD_REQUEST,

            ReportError::Unauthorised => StatusCode::UNAUTHORIZED,

            ReportError::Metrics(_)
            | ReportError::ScanIdsExhausted
            | ReportError::SeedParse(_)
            | ReportError::SeedRead { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let response = Self::new(status, &error);

        // Log server errors.
        if response.status.is_server_error() {
            event!(Level::ERROR, "{}", error.to_string());
            let mut current = error.source();
            while let Some(source) = current {
                event!(Level::ERROR, "Caused by: {}", source.to_string());
                current = source.source();
            }
        }

        response
    }
}

impl IntoResponse for ErrorResponse {
    /// Convert from an `ErrorResponse` into an `axum::response::Response`.
    ///
    /// Renders the response as JSON.
    fn into_response(self) -> Response {
        let json_body = serde_json::to_string_pretty(&self);
        match json_body {
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialise error response: {}", err),
            )
                .into_response(),
            Ok(json_body) => (
                self.status,
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                json_body,
            )
                .into_response(),
        }
    }
}
