//! Render [`HttpError`] values as axum responses

mod config;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use httperr_core::HttpError;
use serde::Serialize;

pub use config::ResponseConfig;

/// Error response wrapper that implements `IntoResponse`
///
/// Handlers can return `Result<T, ErrorResponse>` and use `?` on anything
/// producing an [`HttpError`].
#[derive(Debug)]
pub struct ErrorResponse {
    error: HttpError,
    config: ResponseConfig,
}

impl ErrorResponse {
    /// Render `error` with a specific configuration
    #[must_use]
    pub const fn new(error: HttpError, config: ResponseConfig) -> Self {
        Self { error, config }
    }

    /// The error being rendered
    #[must_use]
    pub const fn error(&self) -> &HttpError {
        &self.error
    }
}

impl From<HttpError> for ErrorResponse {
    fn from(error: HttpError) -> Self {
        Self::new(error, ResponseConfig::default())
    }
}

#[derive(Serialize)]
struct Body<'a> {
    error: BodyError<'a>,
}

#[derive(Serialize)]
struct BodyError<'a> {
    code: &'a str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<&'a [httperr_core::Param]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a str>,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let error = &self.error;

        let status = error.http_status().unwrap_or_else(|| {
            tracing::warn!(
                status = error.status_code(),
                code = %error.code(),
                "error status is not a valid HTTP status, responding with 500"
            );
            StatusCode::INTERNAL_SERVER_ERROR
        });

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), code = %error.code(), trace = %error.trace(), "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), code = %error.code(), "request rejected");
        }

        let redact = self.config.redacted_header_names().unwrap_or_else(|e| {
            tracing::warn!("ignoring header redactions: {e}");
            Vec::new()
        });
        let headers = error.headers().to_header_map(&redact);

        let body = Body {
            error: BodyError {
                code: error.code(),
                status: status.as_u16(),
                params: self.config.expose_params.then(|| error.params()),
                trace: self.config.expose_trace.then(|| error.trace()),
            },
        };

        (status, headers, Json(body)).into_response()
    }
}
