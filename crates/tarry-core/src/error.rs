use thiserror::Error;

/// Rejected timing configuration. Values are never clamped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be non-negative, got {value}ms")]
    NegativeDuration { field: &'static str, value: i64 },
}

/// Converts a signed millisecond count into a `Duration`.
pub fn millis(field: &'static str, value: i64) -> Result<web_time::Duration, ConfigError> {
    u64::try_from(value)
        .map(web_time::Duration::from_millis)
        .map_err(|_| ConfigError::NegativeDuration { field, value })
}
