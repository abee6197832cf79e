//! Status-coded errors with composable history
//!
//! [`HttpError`] carries a status code, a machine-readable error code,
//! debug params, auxiliary headers and the chain of errors it superseded.
//! [`HttpError::wrap`], [`HttpError::cast`] and [`HttpError::bump`] turn any
//! error into one without losing what came before.

mod compose;
mod error;
mod headers;
mod param;
mod shape;
mod status;

pub use compose::{Overrides, ResultExt};
pub use error::{ConstructError, DEFAULT_CODE, HttpError};
pub use headers::{Headers, get_deny_list, is_header_denied};
pub use param::Param;
pub use shape::{Cause, HttpErrorLike, is_conformant, looks_compatible, looks_like_code};
pub use status::{DEFAULT_STATUS, StatusArg};

/// Line separator used when chaining traces
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";

/// Line separator used when chaining traces
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";
