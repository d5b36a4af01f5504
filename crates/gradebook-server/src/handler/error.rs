//! HTTP error handling for query routes.
//!
//! Query paths (find-all, find-by-id) propagate failures as status-coded
//! JSON errors instead of the mutation outcome envelope; this asymmetry is
//! part of the preserved API surface.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gradebook_postgres::PgError;

use crate::handler::response::ErrorResponse;

/// The error type for HTTP handlers in the server.
#[derive(Debug, Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error {
    kind: ErrorKind,
    message: Option<Cow<'static, str>>,
    context: Option<Cow<'static, str>>,
}

impl Error {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            context: None,
        }
    }

    /// Sets a custom user-friendly message for the error.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Attaches context information to the error.
    ///
    /// Context provides additional information about what went wrong, which
    /// will be included in the error response for debugging.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self
            .message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message());

        write!(f, "{} ({}): {}", self.kind.name(), self.kind.status(), message)?;

        if let Some(ref context) = self.context {
            write!(f, " - {}", context)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = self
            .message
            .unwrap_or_else(|| Cow::Borrowed(self.kind.default_message()));

        let response = ErrorResponse {
            name: Cow::Borrowed(self.kind.name()),
            message,
            context: self.context,
        };

        (self.kind.status(), axum::Json(response)).into_response()
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<PgError> for Error {
    fn from(error: PgError) -> Self {
        ErrorKind::InternalServerError.with_context(error.to_string())
    }
}

/// A specialized [`Result`] type for HTTP operations.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Enumeration of the HTTP error kinds used by query routes.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400 Bad Request - Invalid request data
    BadRequest,
    /// 404 Not Found - Resource not found
    NotFound,
    /// 500 Internal Server Error - Unexpected server error
    #[default]
    InternalServerError,
}

impl ErrorKind {
    /// Converts this error kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error {
        Error::new(self)
    }

    /// Creates an [`Error`] with the specified message.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_message(message)
    }

    /// Creates an [`Error`] with the specified context.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_context(context)
    }

    /// Returns the HTTP status code for this error kind.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable name for this error kind.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InternalServerError => "internal_server_error",
        }
    }

    /// Returns the default user-facing message for this error kind.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "The request could not be processed due to invalid data",
            ErrorKind::NotFound => "The requested resource was not found",
            ErrorKind::InternalServerError => {
                "An internal server error occurred. Please try again later"
            }
        }
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        self.into_error().into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(ErrorKind::BadRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorKind::InternalServerError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn display_includes_context() {
        let error = ErrorKind::NotFound.with_context("user 7");
        let rendered = error.to_string();
        assert!(rendered.contains("not_found"));
        assert!(rendered.contains("user 7"));
    }
}
