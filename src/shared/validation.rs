//! Validation Utilities

use validator::ValidationErrors;

use super::error::AppError;

/// Maximum message content length in characters
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Convert validation errors to AppError, keeping the first field error
/// as the user-facing message.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                format!(
                    "{}: {}",
                    field,
                    e.message.clone().map(|m| m.to_string()).unwrap_or_default()
                )
            })
        })
        .next()
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation(message)
}

/// Check message content for the realtime send path. The realtime channel
/// never surfaces errors, so callers log and drop on `false`.
pub fn is_valid_message_content(content: &str) -> bool {
    let trimmed = content.trim();
    !trimmed.is_empty() && content.chars().count() <= MAX_MESSAGE_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("hi" => true; "plain text")]
    #[test_case("" => false; "empty")]
    #[test_case("   " => false; "whitespace only")]
    fn message_content_validation(content: &str) -> bool {
        is_valid_message_content(content)
    }

    #[test]
    fn over_long_content_is_rejected() {
        let content = "x".repeat(MAX_MESSAGE_LENGTH + 1);
        assert!(!is_valid_message_content(&content));
    }
}
