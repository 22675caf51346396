//! Write-time validation
//!
//! Every create and update passes through here first. A failing check means
//! the write is never attempted.

use crate::error::ValidationError;
use crate::types::{Difficulty, Problem};

/// Check the field-presence and enumerated-value rules for a problem.
///
/// Rules are checked in a fixed order (name, platform, difficulty presence,
/// difficulty value) and the first failure is reported.
pub fn validate_problem(problem: &Problem) -> Result<(), ValidationError> {
    if problem.name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if problem.platform.is_empty() {
        return Err(ValidationError::EmptyPlatform);
    }
    if problem.difficulty.is_empty() {
        return Err(ValidationError::EmptyDifficulty);
    }
    if problem.difficulty.parse::<Difficulty>().is_err() {
        return Err(ValidationError::UnknownDifficulty(problem.difficulty.clone()));
    }
    Ok(())
}

/// Check a standalone tag name.
pub fn validate_tag_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyTagName);
    }
    Ok(())
}
