use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    MissingSeparator(String),

    #[error("Key cannot be empty in '{0}'.")]
    EmptyKey(String),
}

/// Splits a `KEY=VALUE` override on its first `=`, trimming both sides.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(pair.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(pair.to_string()));
    }
    Ok((key, value.trim()))
}
