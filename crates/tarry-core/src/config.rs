use web_time::Duration;

use crate::error::{ConfigError, millis};

/// Default timings used by hooks that don't take an explicit duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    /// How long a loading indicator waits before it shows.
    pub reveal_delay: Duration,
    /// Settle window for debounced color pickers.
    pub color_settle: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(200),
            color_settle: Duration::from_millis(100),
        }
    }
}

/// Millisecond form as it arrives from JSON/TOML or component props.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawTimingConfig {
    pub reveal_delay_ms: i64,
    pub color_settle_ms: i64,
}

impl Default for RawTimingConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 200,
            color_settle_ms: 100,
        }
    }
}

impl TryFrom<RawTimingConfig> for TimingConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTimingConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            reveal_delay: millis("reveal_delay_ms", raw.reveal_delay_ms)?,
            color_settle: millis("color_settle_ms", raw.color_settle_ms)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_raw_defaults() {
        let cfg = TimingConfig::try_from(RawTimingConfig::default()).unwrap();
        assert_eq!(cfg, TimingConfig::default());
    }

    #[test]
    fn test_negative_rejected_not_clamped() {
        let raw = RawTimingConfig {
            color_settle_ms: -5,
            ..RawTimingConfig::default()
        };
        assert_eq!(
            TimingConfig::try_from(raw),
            Err(ConfigError::NegativeDuration {
                field: "color_settle_ms",
                value: -5
            })
        );
    }

    #[test]
    fn test_zero_is_allowed() {
        let raw = RawTimingConfig {
            reveal_delay_ms: 0,
            color_settle_ms: 0,
        };
        let cfg = TimingConfig::try_from(raw).unwrap();
        assert_eq!(cfg.reveal_delay, Duration::ZERO);
    }
}
