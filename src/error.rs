//! Defines the app level error type and its conversion to plain text HTTP responses.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The errors that may occur in the application.
///
/// Clients never see the error details. Every error is reported as the same
/// generic failure for the endpoint, see [Error::into_failure_response].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The month in the request is not a month name, abbreviation or number.
    #[error("\"{0}\" is not a valid month")]
    InvalidMonth(String),

    /// A required query parameter was not provided.
    #[error("the query parameter \"{0}\" is required")]
    MissingParameter(&'static str),

    /// A query parameter could not be parsed or is out of range.
    #[error("invalid query parameter: {0}")]
    InvalidQuery(String),

    /// The seed data could not be fetched from the seed source.
    #[error("could not fetch seed data: {0}")]
    SeedRequest(String),

    /// The seed source responded with something other than a list of transactions.
    #[error("could not decode seed data: {0}")]
    SeedDecode(String),

    /// A background task running a store operation panicked or was cancelled.
    #[error("a store task failed: {0}")]
    TaskFailed(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Error::TaskFailed(value.to_string())
    }
}

impl From<QueryRejection> for Error {
    fn from(value: QueryRejection) -> Self {
        Error::InvalidQuery(value.body_text())
    }
}

impl Error {
    /// Log the error and convert it into a 500 response with the plain text `message`.
    ///
    /// Errors caused by the request itself are logged as warnings, everything
    /// else as errors.
    pub fn into_failure_response(self, message: &'static str) -> Response {
        match &self {
            Error::InvalidMonth(_) | Error::MissingParameter(_) | Error::InvalidQuery(_) => {
                tracing::warn!("Rejected request: {self}");
            }
            _ => tracing::error!("An unexpected error occurred: {self}"),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
