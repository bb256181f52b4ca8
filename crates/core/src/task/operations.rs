use super::error::ValidationError;

/// Largest accepted `content`, in bytes. DynamoDB caps a whole item at 400 KB,
/// so anything longer can never be stored.
pub const MAX_CONTENT_BYTES: usize = 400 * 1024;

/// Validates task content before creation or update.
///
/// Content must be present and non-empty. Whitespace counts as content.
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    if content.len() > MAX_CONTENT_BYTES {
        return Err(ValidationError::ContentTooLong {
            max: MAX_CONTENT_BYTES,
        });
    }
    Ok(())
}
