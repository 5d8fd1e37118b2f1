use std::str::FromStr;

use crate::error::CoordinatorError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoordinatorConfig {
    // =========================
    // Delivery limits
    // =========================
    /// Maximum number of notifications delivered within the trailing
    /// `rate_window_ms`.
    ///
    /// Checked when a monitor enqueues and again when the scheduler
    /// dequeues the head; anything over the cap is dropped, never deferred.
    pub max_per_hour: usize,

    /// Length of the sliding rate-limit window in milliseconds.
    pub rate_window_ms: u64,

    /// Smallest gap between two consecutive deliveries, regardless of
    /// priority.
    pub min_spacing_ms: u64,

    /// Scheduler loop period.
    pub tick_interval_ms: u64,

    // =========================
    // Presentation
    // =========================
    /// Vertical position of the first visible notification.
    pub stack_base_px: u32,

    /// Vertical offset added per already-visible notification.
    pub stack_step_px: u32,

    /// Pause length used when the caller does not pick one.
    pub default_pause_minutes: u64,

    // =========================
    // Monitors
    // =========================
    pub uv_check_interval_ms: u64,
    pub air_check_interval_ms: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_per_hour: 8,
            rate_window_ms: 60 * 60 * 1000,
            min_spacing_ms: 3_000,
            tick_interval_ms: 1_000,

            stack_base_px: 20,
            stack_step_px: 80,
            default_pause_minutes: 30,

            uv_check_interval_ms: 30_000,
            air_check_interval_ms: 30 * 60 * 1000,
        }
    }
}

impl CoordinatorConfig {
    /// Reads overrides from the environment, falling back to defaults for
    /// anything missing or malformed.
    pub fn from_env() -> Self {
        match Self::try_from_env() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "invalid coordinator config; using defaults");
                Self::default()
            }
        }
    }

    pub fn try_from_env() -> Result<Self, CoordinatorError> {
        Self::try_from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, CoordinatorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();

        let cfg = Self {
            max_per_hour: parse_or(&lookup, "NEXAFLOW_MAX_PER_HOUR", d.max_per_hour)?,
            min_spacing_ms: parse_or(&lookup, "NEXAFLOW_MIN_SPACING_MS", d.min_spacing_ms)?,
            tick_interval_ms: parse_or(&lookup, "NEXAFLOW_TICK_MS", d.tick_interval_ms)?,
            default_pause_minutes: parse_or(
                &lookup,
                "NEXAFLOW_PAUSE_MINUTES",
                d.default_pause_minutes,
            )?,
            uv_check_interval_ms: parse_or(
                &lookup,
                "NEXAFLOW_UV_INTERVAL_MS",
                d.uv_check_interval_ms,
            )?,
            air_check_interval_ms: parse_or(
                &lookup,
                "NEXAFLOW_AIR_INTERVAL_MS",
                d.air_check_interval_ms,
            )?,
            ..d
        };

        if cfg.tick_interval_ms == 0 {
            return Err(CoordinatorError::InvalidConfig {
                key: "NEXAFLOW_TICK_MS",
                value: "0".into(),
            });
        }

        Ok(cfg)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, CoordinatorError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CoordinatorError::InvalidConfig { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let cfg = CoordinatorConfig::try_from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, CoordinatorConfig::default());
        assert_eq!(cfg.max_per_hour, 8);
        assert_eq!(cfg.min_spacing_ms, 3_000);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = CoordinatorConfig::try_from_lookup(lookup(&[
            ("NEXAFLOW_MAX_PER_HOUR", "3"),
            ("NEXAFLOW_MIN_SPACING_MS", " 500 "),
        ]))
        .unwrap();
        assert_eq!(cfg.max_per_hour, 3);
        assert_eq!(cfg.min_spacing_ms, 500);
        assert_eq!(cfg.tick_interval_ms, 1_000);
    }

    #[test]
    fn malformed_value_is_rejected() {
        let err = CoordinatorConfig::try_from_lookup(lookup(&[("NEXAFLOW_MAX_PER_HOUR", "lots")]))
            .unwrap_err();
        assert_eq!(
            err,
            CoordinatorError::InvalidConfig {
                key: "NEXAFLOW_MAX_PER_HOUR",
                value: "lots".into()
            }
        );
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(CoordinatorConfig::try_from_lookup(lookup(&[("NEXAFLOW_TICK_MS", "0")])).is_err());
    }
}
