use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::{Headers, HttpError, Param};

/// Structural view of an error
///
/// Anything that can be wrapped exposes itself through this trait. Every
/// accessor except [`type_name`](Self::type_name), [`message`](Self::message)
/// and [`trace`](Self::trace) defaults to "absent", so plain errors only
/// need an empty impl.
///
/// Independently built copies of [`HttpError`] (another major version of
/// this crate, a vendored fork) are recognised by shape through
/// [`is_conformant`], not by their concrete type.
pub trait HttpErrorLike: StdError + Send + Sync + 'static {
    /// Short type name, e.g. `HttpError`
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(short_type_name(std::any::type_name::<Self>()))
    }

    /// Human readable message
    fn message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    /// Machine-readable error code
    fn code(&self) -> Option<&str> {
        None
    }

    /// Status code classification
    fn status_code(&self) -> Option<u16> {
        None
    }

    /// Debug values attached to the error
    fn params(&self) -> Option<&[Param]> {
        None
    }

    /// Auxiliary headers
    fn headers(&self) -> Option<&Arc<Headers>> {
        None
    }

    /// Errors this one superseded, oldest first
    fn wrapped_errors(&self) -> Option<&[Cause]> {
        None
    }

    /// Diagnostic trace
    fn trace(&self) -> Cow<'_, str> {
        let mut trace = format!("{}: {}", self.type_name(), self.message());
        let mut source = self.source();
        while let Some(err) = source {
            trace.push_str(crate::LINE_ENDING);
            trace.push_str("    caused by: ");
            trace.push_str(&err.to_string());
            source = err.source();
        }
        Cow::Owned(trace)
    }
}

/// Strip the module path and generic arguments from a type name
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Whether `s` looks like an error code (`^[A-Z0-9_]+$`)
#[must_use]
pub fn looks_like_code(s: &str) -> bool {
    fn re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^[A-Z0-9_]+$").expect("must be valid regex"))
    }

    re().is_match(s)
}

/// Whether an error has the shape of an [`HttpError`]
///
/// Its type name ends with `Error`, it carries a well-formed code, a
/// status code and a (possibly empty) params list.
#[must_use]
pub fn is_conformant(err: &dyn HttpErrorLike) -> bool {
    err.type_name().ends_with("Error")
        && err.code().is_some_and(looks_like_code)
        && err.status_code().is_some()
        && err.params().is_some()
}

/// Whether a cause can stand in for an [`HttpError`] as is
#[must_use]
pub fn looks_compatible(cause: &Cause) -> bool {
    match cause {
        Cause::Http(_) => true,
        Cause::Foreign(err) => is_conformant(err.as_ref()),
    }
}

/// An error that was, or is about to be, wrapped
#[derive(Debug, Clone)]
pub enum Cause {
    /// An error of this crate's own type
    Http(Arc<HttpError>),
    /// Anything else, seen through its structure
    Foreign(Arc<dyn HttpErrorLike>),
}

impl Cause {
    /// Wrap any error exposing an [`HttpErrorLike`] shape
    #[must_use]
    pub fn foreign(err: impl HttpErrorLike) -> Self {
        Self::Foreign(Arc::new(err))
    }

    /// Wrap a plain error carrying nothing beyond its message and sources
    #[must_use]
    pub fn native<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::foreign(Native(err))
    }

    /// A bare message error, reported as `Error`
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::foreign(Message(message.into()))
    }

    /// Structural view of the cause
    #[must_use]
    pub fn shape(&self) -> &dyn HttpErrorLike {
        match self {
            Self::Http(err) => err.as_ref(),
            Self::Foreign(err) => err.as_ref(),
        }
    }

    /// The cause as a standard error
    #[must_use]
    pub fn as_error(&self) -> &(dyn StdError + 'static) {
        match self {
            Self::Http(err) => err.as_ref(),
            Self::Foreign(err) => err.as_ref(),
        }
    }

    /// Downcast to this crate's error type
    #[must_use]
    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            Self::Http(err) => Some(err.as_ref()),
            Self::Foreign(_) => None,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.shape(), f)
    }
}

impl From<HttpError> for Cause {
    fn from(err: HttpError) -> Self {
        Self::Http(Arc::new(err))
    }
}

impl From<Arc<HttpError>> for Cause {
    fn from(err: Arc<HttpError>) -> Self {
        Self::Http(err)
    }
}

impl From<std::io::Error> for Cause {
    fn from(err: std::io::Error) -> Self {
        Self::native(err)
    }
}

impl From<serde_json::Error> for Cause {
    fn from(err: serde_json::Error) -> Self {
        Self::native(err)
    }
}

impl From<anyhow::Error> for Cause {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<HttpError>() {
            Ok(err) => return Self::from(err),
            Err(err) => err,
        };

        match err.downcast::<Arc<HttpError>>() {
            Ok(err) => Self::Http(err),
            Err(err) => Self::foreign(AnyhowError(err)),
        }
    }
}

impl From<Box<dyn StdError + Send + Sync>> for Cause {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        match err.downcast::<HttpError>() {
            Ok(err) => Self::Http(Arc::from(err)),
            Err(err) => Self::foreign(BoxedError(err)),
        }
    }
}

/// Any standard error, reported under its own type name
struct Native<E>(E);

impl<E: fmt::Debug> fmt::Debug for Native<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<E: fmt::Display> fmt::Display for Native<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<E: StdError> StdError for Native<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl<E> HttpErrorLike for Native<E>
where
    E: StdError + Send + Sync + 'static,
{
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(short_type_name(std::any::type_name::<E>()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Message(String);

impl HttpErrorLike for Message {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Error")
    }
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct AnyhowError(anyhow::Error);

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct BoxedError(Box<dyn StdError + Send + Sync>);

impl HttpErrorLike for AnyhowError {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Error")
    }
}

impl HttpErrorLike for BoxedError {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Error")
    }
}
