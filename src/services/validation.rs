use thiserror::Error;

use crate::config::NoteLimits;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is {length} characters long, maximum is {max}")]
    TooLong {
        field: &'static str,
        length: usize,
        max: usize,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::Empty { field }
            | ValidationError::TooLong { field, .. } => field,
        }
    }
}

/// Lengths are counted in characters, not bytes.
fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let length = value.chars().count();
    if length == 0 {
        return Err(ValidationError::Empty { field });
    }
    if length > max {
        return Err(ValidationError::TooLong { field, length, max });
    }
    Ok(())
}

pub fn validate_note(
    title: &str,
    content: &str,
    owner: &str,
    limits: &NoteLimits,
) -> Result<(), ValidationError> {
    check_length("title", title, limits.max_title_length)?;
    check_length("content", content, limits.max_content_length)?;
    check_length("owner", owner, limits.max_owner_length)?;
    Ok(())
}
