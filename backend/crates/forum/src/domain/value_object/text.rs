//! Free-text field checks shared by posts, comments and categories

use crate::error::{ForumError, ForumResult};

/// Trimmed, non-blank, at most `max_chars` characters when a limit is given.
pub fn required_text(field: &str, value: &str, max_chars: Option<usize>) -> ForumResult<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ForumError::validation(format!("{field} cannot be empty")));
    }

    if let Some(max) = max_chars {
        if trimmed.chars().count() > max {
            return Err(ForumError::validation(format!(
                "{field} must be at most {max} characters"
            )));
        }
    }

    Ok(trimmed.to_string())
}
