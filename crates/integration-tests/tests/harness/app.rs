//! A small layered application whose failures travel through `HttpError`

use std::borrow::Cow;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use httperr_axum::{ErrorResponse, ResponseConfig};
use httperr_core::{Cause, Headers, HttpError, HttpErrorLike, Overrides, Param, ResultExt};

/// Error type of an older, independently built copy of the error library
#[derive(Debug, thiserror::Error)]
#[error("{code}")]
pub struct LegacyHttpError {
    pub code: String,
    pub status: u16,
    pub params: Vec<Param>,
    pub headers: Arc<Headers>,
}

impl HttpErrorLike for LegacyHttpError {
    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn status_code(&self) -> Option<u16> {
        Some(self.status)
    }

    fn params(&self) -> Option<&[Param]> {
        Some(&self.params)
    }

    fn headers(&self) -> Option<&Arc<Headers>> {
        Some(&self.headers)
    }

    fn trace(&self) -> Cow<'_, str> {
        Cow::Owned(format!("LegacyHttpError[{}]: {}", self.status, self.code))
    }
}

// -- storage layer --

fn load_user(id: u32) -> Result<&'static str, HttpError> {
    match id {
        1 => Ok("alice"),
        2 => Err(std::io::Error::other("connection reset"))
            .wrap_http(Overrides::new().status(503).code("E_STORE_UNAVAILABLE")),
        _ => Err(HttpError::new(404, Some("E_USER_NOT_FOUND"), [id])),
    }
}

fn check_quota(tenant: &str) -> Result<(), Cause> {
    Err(Cause::foreign(LegacyHttpError {
        code: "E_QUOTA_EXCEEDED".to_owned(),
        status: 429,
        params: vec![Param::from(tenant)],
        headers: Arc::new([("Retry-After", "60")].into_iter().collect()),
    }))
}

// -- service layer --

fn user_profile(raw_id: &str) -> Result<String, HttpError> {
    let id = raw_id
        .parse::<u32>()
        .map_err(Cause::native)
        .wrap_http(Overrides::new().status(400).code("E_BAD_USER_ID"))?;

    let name = load_user(id).bump_http(Overrides::new().status(500).code("E_PROFILE_UNAVAILABLE"))?;

    Ok(format!("profile of {name}"))
}

// -- handlers --

type AppState = Arc<ResponseConfig>;

fn respond(config: &ResponseConfig, err: HttpError) -> ErrorResponse {
    ErrorResponse::new(err, config.clone())
}

async fn profile(State(config): State<AppState>, Path(id): Path<String>) -> Result<String, ErrorResponse> {
    user_profile(&id).map_err(|e| respond(&config, e))
}

async fn quota(State(config): State<AppState>, Path(tenant): Path<String>) -> Result<String, ErrorResponse> {
    check_quota(&tenant).cast_http(Overrides::new()).map_err(|e| respond(&config, e))?;
    Ok("ok".to_owned())
}

async fn import(State(config): State<AppState>, body: String) -> Result<Json<serde_json::Value>, ErrorResponse> {
    let value: serde_json::Value = serde_json::from_str(&body)
        .cast_http(Overrides::new())
        .map_err(|e| respond(&config, e))?;
    Ok(Json(value))
}

/// Build the application router
pub fn router(config: ResponseConfig) -> Router {
    Router::new()
        .route("/users/{id}", get(profile))
        .route("/tenants/{tenant}/quota", get(quota))
        .route("/import", post(import))
        .with_state(Arc::new(config))
}
