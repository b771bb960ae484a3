//! HTTP handlers: extract, call the entity service, wrap the result in the
//! response envelope.

pub mod author;
pub mod book;
pub mod category;
pub mod hello;
pub mod publisher;

use crate::error::AppError;

/// Parse a path id. Non-numeric or non-positive ids are a bad request.
pub(crate) fn parse_id(id_str: &str) -> Result<i64, AppError> {
    match id_str.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(format!("invalid id: {}", id_str))),
    }
}
