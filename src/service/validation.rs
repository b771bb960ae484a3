//! Field checks shared by the entity services.

use crate::error::AppError;

/// Trim and check a required text field: non-empty and at most `max` characters.
pub fn require_text(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    check_max(field, value, max)?;
    Ok(value.to_string())
}

/// Check an optional text field; empty is allowed.
pub fn optional_text(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    let value = value.trim();
    check_max(field, value, max)?;
    Ok(value.to_string())
}

fn check_max(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub fn require_positive<T>(field: &str, value: T) -> Result<T, AppError>
where
    T: PartialOrd + Default + Copy,
{
    if value <= T::default() {
        return Err(AppError::Validation(format!("{} must be greater than 0", field)));
    }
    Ok(value)
}

/// Reject non-positive ids, then sort and drop duplicates.
pub fn normalize_ids(field: &str, ids: &[i64]) -> Result<Vec<i64>, AppError> {
    if let Some(bad) = ids.iter().find(|id| **id <= 0) {
        return Err(AppError::Validation(format!(
            "{} contains invalid id {}",
            field, bad
        )));
    }
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}
