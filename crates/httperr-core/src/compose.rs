use std::panic::Location;
use std::sync::Arc;

use crate::error::DEFAULT_CODE;
use crate::shape::{Cause, HttpErrorLike, looks_compatible, looks_like_code};
use crate::{HttpError, Param, StatusArg};

/// Optional arguments to [`HttpError::wrap`], [`HttpError::cast`] and
/// [`HttpError::bump`]
///
/// The default value means "nothing supplied".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    status_code: StatusArg,
    code: Option<String>,
    params: Vec<Param>,
}

impl Overrides {
    /// Nothing supplied
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status code for the new error
    #[must_use]
    pub fn status(mut self, status_code: impl Into<StatusArg>) -> Self {
        self.status_code = status_code.into();
        self
    }

    /// Error code for the new error
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Append one debug param
    #[must_use]
    pub fn param(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Append debug params
    #[must_use]
    pub fn params<P: Into<Param>>(mut self, params: impl IntoIterator<Item = P>) -> Self {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }
}

impl HttpError {
    /// Wrap any error into a new `HttpError`
    ///
    /// The wrapped error's params come first, followed by the supplied
    /// ones. Without a supplied code, a message that looks like a code is
    /// used as the code, then the wrapped error's own code, then
    /// `E_UNEXPECTED`. Any other non-empty message becomes the last param.
    /// The wrapped error is appended to its own history, its trace
    /// prefixes the new one, and its headers are shared.
    #[must_use]
    #[track_caller]
    pub fn wrap(err: impl Into<Cause>, overrides: Overrides) -> Self {
        wrap_cause(err.into(), overrides, Location::caller())
    }

    /// Return `err` as is if it already looks like an `HttpError`,
    /// otherwise [`wrap`](Self::wrap) it
    ///
    /// A conformant error of another type is taken over field by field
    /// without growing its history.
    #[must_use]
    #[track_caller]
    pub fn cast(err: impl Into<Cause>, overrides: Overrides) -> Self {
        let cause = err.into();

        if !looks_compatible(&cause) {
            return wrap_cause(cause, overrides, Location::caller());
        }

        match cause {
            Cause::Http(err) => {
                tracing::debug!(code = %err.code(), status = err.status_code(), "cast passed error through");
                Arc::unwrap_or_clone(err)
            }
            Cause::Foreign(err) => {
                tracing::debug!(
                    type_name = %err.type_name(),
                    code = err.code().unwrap_or_default(),
                    "cast adopted conformant error"
                );
                Self::adopt(err.as_ref())
            }
        }
    }

    /// Like [`wrap`](Self::wrap), but keeps the status code of an error
    /// that already looks like an `HttpError`
    #[must_use]
    #[track_caller]
    pub fn bump(err: impl Into<Cause>, overrides: Overrides) -> Self {
        let cause = err.into();

        let overrides = if looks_compatible(&cause) {
            let status_code = cause.shape().status_code();
            overrides.status(status_code)
        } else {
            overrides
        };

        wrap_cause(cause, overrides, Location::caller())
    }
}

fn wrap_cause(cause: Cause, overrides: Overrides, location: &'static Location<'static>) -> HttpError {
    let shape = cause.shape();
    let message = shape.message();
    let message_is_code = looks_like_code(&message);

    let mut params = shape.params().map(<[Param]>::to_vec).unwrap_or_default();
    params.extend(overrides.params);

    let code = match overrides.code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => code.to_owned(),
        None if message_is_code => message.clone().into_owned(),
        None => shape
            .code()
            .filter(|c| looks_like_code(c))
            .unwrap_or(DEFAULT_CODE)
            .to_owned(),
    };

    if !message.is_empty() && !message_is_code {
        params.push(Param::from(message.into_owned()));
    }

    let headers = shape.headers().cloned().unwrap_or_default();
    let mut wrapped_errors = shape.wrapped_errors().map(<[Cause]>::to_vec).unwrap_or_default();
    wrapped_errors.push(cause);

    let mut err = HttpError::build(overrides.status_code.resolve(), Some(&code), params, location);
    err.set_history(wrapped_errors, headers);

    tracing::trace!(
        code = %err.code(),
        status = err.status_code(),
        wrapped = err.wrapped_errors().len(),
        "wrapped error"
    );

    err
}

/// Compose errors straight from a `Result`
pub trait ResultExt<T> {
    /// [`HttpError::wrap`] the error
    ///
    /// # Errors
    ///
    /// Returns the wrapped error if `self` is an error
    fn wrap_http(self, overrides: Overrides) -> Result<T, HttpError>;

    /// [`HttpError::cast`] the error
    ///
    /// # Errors
    ///
    /// Returns the cast error if `self` is an error
    fn cast_http(self, overrides: Overrides) -> Result<T, HttpError>;

    /// [`HttpError::bump`] the error
    ///
    /// # Errors
    ///
    /// Returns the bumped error if `self` is an error
    fn bump_http(self, overrides: Overrides) -> Result<T, HttpError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<Cause>,
{
    #[track_caller]
    fn wrap_http(self, overrides: Overrides) -> Result<T, HttpError> {
        let location = Location::caller();
        self.map_err(|e| wrap_cause(e.into(), overrides, location))
    }

    #[track_caller]
    fn cast_http(self, overrides: Overrides) -> Result<T, HttpError> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(HttpError::cast(e, overrides)),
        }
    }

    #[track_caller]
    fn bump_http(self, overrides: Overrides) -> Result<T, HttpError> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(HttpError::bump(e, overrides)),
        }
    }
}
