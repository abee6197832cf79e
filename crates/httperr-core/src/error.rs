use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::param;
use crate::shape::{Cause, HttpErrorLike, looks_like_code};
use crate::status::{DEFAULT_STATUS, StatusArg};
use crate::{Headers, Param};

/// Error code used when none is supplied or none can be inferred
pub const DEFAULT_CODE: &str = "E_UNEXPECTED";

/// Errors raised while constructing an [`HttpError`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructError {
    /// The status code argument was present but not an integer
    #[error("E_BAD_HTTP_CODE: expected an integer status code, got {kind} {value}")]
    BadStatusCode {
        /// JSON type of the received value
        kind: &'static str,
        /// The received value, rendered as JSON
        value: String,
    },
}

/// An error carrying a status code, an error code and debug params
///
/// Once built, an `HttpError` is immutable: composition through
/// [`wrap`](Self::wrap), [`cast`](Self::cast) and [`bump`](Self::bump)
/// always produces a new value and keeps the previous errors in
/// [`wrapped_errors`](Self::wrapped_errors).
#[derive(Debug, Clone)]
pub struct HttpError {
    status_code: u16,
    code: String,
    params: Vec<Param>,
    headers: Arc<Headers>,
    wrapped_errors: Vec<Cause>,
    name: String,
    trace: String,
}

impl HttpError {
    /// Type name used in display names
    pub const TYPE_NAME: &'static str = "HttpError";

    /// Create an error from a status code, an optional error code and params
    ///
    /// A missing or empty `code` becomes [`DEFAULT_CODE`]. A `code` that
    /// does not match `^[A-Z0-9_]+$` also becomes [`DEFAULT_CODE`] and its
    /// text is kept as the last param.
    #[must_use]
    #[track_caller]
    pub fn new<P>(status_code: u16, code: Option<&str>, params: impl IntoIterator<Item = P>) -> Self
    where
        P: Into<Param>,
    {
        Self::build(
            status_code,
            code,
            params.into_iter().map(Into::into).collect(),
            Location::caller(),
        )
    }

    /// Create an error from a loosely-typed status code
    ///
    /// An absent status defaults to 500.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::BadStatusCode`] if the status is present but
    /// is not an integer status code
    #[track_caller]
    pub fn try_new<P>(
        status_code: impl Into<StatusArg>,
        code: Option<&str>,
        params: impl IntoIterator<Item = P>,
    ) -> Result<Self, ConstructError>
    where
        P: Into<Param>,
    {
        let status_code = status_code.into().try_resolve()?;
        Ok(Self::build(
            status_code,
            code,
            params.into_iter().map(Into::into).collect(),
            Location::caller(),
        ))
    }

    pub(crate) fn build(
        status_code: u16,
        code: Option<&str>,
        mut params: Vec<Param>,
        location: &'static Location<'static>,
    ) -> Self {
        let code = match code.filter(|c| !c.is_empty()) {
            Some(code) if looks_like_code(code) => code.to_owned(),
            Some(text) => {
                tracing::debug!(code = %text, "error code is not an identifier, keeping it as a param");
                params.push(Param::from(text));
                DEFAULT_CODE.to_owned()
            }
            None => DEFAULT_CODE.to_owned(),
        };
        let name = display_name(status_code, &code, &params);
        let trace = format!(
            "{name}{}    at {}:{}:{}",
            crate::LINE_ENDING,
            location.file(),
            location.line(),
            location.column()
        );

        Self {
            status_code,
            code,
            params,
            headers: Arc::default(),
            wrapped_errors: Vec::new(),
            name,
            trace,
        }
    }

    /// Take over an already-conformant foreign error without wrapping it
    pub(crate) fn adopt(shape: &dyn HttpErrorLike) -> Self {
        let status_code = shape.status_code().unwrap_or(DEFAULT_STATUS);
        let code = shape.code().unwrap_or(DEFAULT_CODE).to_owned();
        let params = shape.params().map(<[Param]>::to_vec).unwrap_or_default();
        let name = display_name(status_code, &code, &params);

        Self {
            status_code,
            code,
            params,
            headers: shape.headers().cloned().unwrap_or_default(),
            wrapped_errors: shape.wrapped_errors().map(<[Cause]>::to_vec).unwrap_or_default(),
            name,
            trace: shape.trace().into_owned(),
        }
    }

    pub(crate) fn set_history(&mut self, wrapped_errors: Vec<Cause>, headers: Arc<Headers>) {
        if let Some(last) = wrapped_errors.last() {
            self.trace = format!("{}{}{}", last.shape().trace(), crate::LINE_ENDING, self.trace);
        }
        self.wrapped_errors = wrapped_errors;
        self.headers = headers;
    }

    /// Replace the headers
    #[must_use]
    pub fn with_headers(mut self, headers: impl Into<Arc<Headers>>) -> Self {
        self.headers = headers.into();
        self
    }

    /// Set a single header
    ///
    /// Headers shared with a wrapped error are copied first, so the wrapped
    /// error is left untouched.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.headers).insert(name, value);
        self
    }

    /// Status code
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Status code as an HTTP status, if it is a valid one
    #[must_use]
    pub fn http_status(&self) -> Option<http::StatusCode> {
        http::StatusCode::from_u16(self.status_code).ok()
    }

    /// Error code, e.g. `E_UNEXPECTED`
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Debug params in the order they were attached
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Auxiliary headers
    #[must_use]
    pub fn headers(&self) -> &Arc<Headers> {
        &self.headers
    }

    /// Errors superseded by this one, oldest first
    #[must_use]
    pub fn wrapped_errors(&self) -> &[Cause] {
        &self.wrapped_errors
    }

    /// Display name, e.g. `HttpError[400]: E_ERROR (arg1, arg2)`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Diagnostic trace including every wrapped error's trace
    #[must_use]
    pub fn trace(&self) -> &str {
        &self.trace
    }
}

fn display_name(status_code: u16, code: &str, params: &[Param]) -> String {
    format!(
        "{}[{status_code}]: {code} ({})",
        HttpError::TYPE_NAME,
        param::join(params)
    )
}

impl Default for HttpError {
    #[track_caller]
    fn default() -> Self {
        Self::build(DEFAULT_STATUS, None, Vec::new(), Location::caller())
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.wrapped_errors.last().map(Cause::as_error)
    }
}

impl HttpErrorLike for HttpError {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::TYPE_NAME)
    }

    /// The message of an `HttpError` is its code
    fn message(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.code)
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn status_code(&self) -> Option<u16> {
        Some(self.status_code)
    }

    fn params(&self) -> Option<&[Param]> {
        Some(&self.params)
    }

    fn headers(&self) -> Option<&Arc<Headers>> {
        Some(&self.headers)
    }

    fn wrapped_errors(&self) -> Option<&[Cause]> {
        Some(&self.wrapped_errors)
    }

    fn trace(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.trace)
    }
}
