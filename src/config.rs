//! Monitor configuration.
//!
//! Thresholds and intervals are plain values with defaults matching a
//! one-second query period driven by a 100 ms scheduler tick.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL_TICKS: u16 = 10;
pub const DEFAULT_COOLANT_LIMIT: u16 = 100;

/// How the coolant threshold stops the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopPolicy {
    /// The dispatcher keeps an over-threshold flag that follows every coolant
    /// reading. The poller stops while the engine runs and the flag is set,
    /// emitting the diagnostic on every tick at the threshold, and resumes if
    /// either flag clears.
    #[default]
    Latched,
    /// The first reading at or above the limit latches a stop flag and emits
    /// the diagnostic right away. The flag is never cleared.
    OneShot,
}

/// Content of the outbound query frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QueryMode {
    /// A zeroed frame
    #[default]
    Blank,
    /// An OBD-II service 01 functional request on 0x7DF, rotating through the
    /// known parameters
    ServiceOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorConfig {
    /// Ticks counted before the stop condition is checked and a query sent
    pub poll_interval_ticks: u16,
    /// Coolant reading (raw °C) at or above which querying stops
    pub coolant_limit: u16,
    pub stop_policy: StopPolicy,
    pub query_mode: QueryMode,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ticks: DEFAULT_POLL_INTERVAL_TICKS,
            coolant_limit: DEFAULT_COOLANT_LIMIT,
            stop_policy: StopPolicy::default(),
            query_mode: QueryMode::default(),
        }
    }
}

impl MonitorConfig {
    pub fn with_poll_interval_ticks(mut self, ticks: u16) -> Self {
        self.poll_interval_ticks = ticks;
        self
    }

    pub fn with_coolant_limit(mut self, limit: u16) -> Self {
        self.coolant_limit = limit;
        self
    }

    pub fn with_stop_policy(mut self, stop_policy: StopPolicy) -> Self {
        self.stop_policy = stop_policy;
        self
    }

    pub fn with_query_mode(mut self, query_mode: QueryMode) -> Self {
        self.query_mode = query_mode;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ticks == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("Poll interval must be at least one tick")]
    ZeroPollInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MonitorConfig::default();

        assert_eq!(config.poll_interval_ticks, 10);
        assert_eq!(config.coolant_limit, 100);
        assert_eq!(config.stop_policy, StopPolicy::Latched);
        assert_eq!(config.query_mode, QueryMode::Blank);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builder() {
        let config = MonitorConfig::default()
            .with_poll_interval_ticks(1000)
            .with_coolant_limit(140)
            .with_stop_policy(StopPolicy::OneShot)
            .with_query_mode(QueryMode::ServiceOne);

        assert_eq!(config.poll_interval_ticks, 1000);
        assert_eq!(config.coolant_limit, 140);
        assert_eq!(config.stop_policy, StopPolicy::OneShot);
        assert_eq!(config.query_mode, QueryMode::ServiceOne);
    }

    #[test]
    fn rejects_zero_interval() {
        assert_eq!(
            MonitorConfig::default()
                .with_poll_interval_ticks(0)
                .validate(),
            Err(ConfigError::ZeroPollInterval)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_document() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{ "coolant_limit": 110, "stop_policy": "OneShot" }"#).unwrap();

        assert_eq!(config.coolant_limit, 110);
        assert_eq!(config.stop_policy, StopPolicy::OneShot);
        assert_eq!(config.poll_interval_ticks, DEFAULT_POLL_INTERVAL_TICKS);
    }
}
