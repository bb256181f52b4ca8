use super::SecretError;

/// Rejects missing or empty secret values.
pub fn require_secret_value(name: &str, value: Option<String>) -> Result<String, SecretError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(SecretError::Empty(name.to_string())),
    }
}

/// Compares a presented API key against the expected one.
///
/// Runs in time independent of where the first mismatching byte is.
pub fn api_key_matches(expected: &str, presented: &str) -> bool {
    let expected = expected.as_bytes();
    let presented = presented.as_bytes();
    if expected.len() != presented.len() {
        return false;
    }
    expected
        .iter()
        .zip(presented)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
