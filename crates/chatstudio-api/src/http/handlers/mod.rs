//! HTTP request handlers for the REST API.

pub mod message;
pub mod project;
pub mod session;
pub mod turn;

use crate::http::error::AppError;

/// Parse an integer id from a path parameter, returning a 400 error on
/// invalid format.
pub(crate) fn parse_id(s: &str) -> Result<i64, AppError> {
    s.parse::<i64>()
        .map_err(|_| AppError::Validation(format!("Invalid id: {s}")))
}
