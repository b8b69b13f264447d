//! Widget configuration
//!
//! Everything is read from environment variables once at startup into a
//! typed `WidgetConfig`. Invalid values are configuration errors; a missing
//! credential is tolerated here and reported by `validate()` or on first use.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::services::quota::{
    interval_from_minutes, DisplayPreference, QuotaError, DEFAULT_API_BASE,
    DEFAULT_INTERVAL_MINUTES,
};

/// Credential variables, in priority order
pub const API_KEY_VARS: [&str; 2] = ["ZAI_PROJECT_KEY", "ZAI_API_KEY"];
pub const API_BASE_VAR: &str = "ZAI_API_BASE";
pub const DEBUG_VAR: &str = "ZAI_WIDGET_DEBUG";
pub const REFRESH_MINUTES_VAR: &str = "ZAI_REFRESH_MINUTES";
pub const MINI_ENABLED_VAR: &str = "ZAI_MINI_WIDGET";
pub const MINI_POSITION_VAR: &str = "ZAI_MINI_POSITION";
pub const MINI_QUOTA_VAR: &str = "ZAI_MINI_QUOTA";
pub const NOTIFY_VAR: &str = "ZAI_WIDGET_NOTIFY";

// ============================================================================
// Mini Position
// ============================================================================

/// Where the mini overlay sits on the primary monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MiniPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
    /// Explicit physical coordinates
    At { x: i32, y: i32 },
}

impl std::str::FromStr for MiniPosition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "top-left" => Ok(MiniPosition::TopLeft),
            "top-right" => Ok(MiniPosition::TopRight),
            "bottom-left" => Ok(MiniPosition::BottomLeft),
            "bottom-right" => Ok(MiniPosition::BottomRight),
            other => {
                let (x, y) = other
                    .split_once(',')
                    .ok_or_else(|| format!("Invalid mini position: {}", s))?;
                let x = x.trim().parse::<i32>();
                let y = y.trim().parse::<i32>();
                match (x, y) {
                    (Ok(x), Ok(y)) => Ok(MiniPosition::At { x, y }),
                    _ => Err(format!("Invalid mini position coordinates: {}", s)),
                }
            }
        }
    }
}

impl std::fmt::Display for MiniPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MiniPosition::TopLeft => write!(f, "top-left"),
            MiniPosition::TopRight => write!(f, "top-right"),
            MiniPosition::BottomLeft => write!(f, "bottom-left"),
            MiniPosition::BottomRight => write!(f, "bottom-right"),
            MiniPosition::At { x, y } => write!(f, "{},{}", x, y),
        }
    }
}

// ============================================================================
// Config
// ============================================================================

/// Typed widget configuration
#[derive(Clone, PartialEq)]
pub struct WidgetConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub debug: bool,
    pub refresh_minutes: u32,
    pub mini_enabled: bool,
    pub mini_position: MiniPosition,
    pub mini_quota: DisplayPreference,
    pub notify: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            debug: false,
            refresh_minutes: DEFAULT_INTERVAL_MINUTES,
            mini_enabled: false,
            mini_position: MiniPosition::default(),
            mini_quota: DisplayPreference::default(),
            notify: true,
        }
    }
}

// Keep the credential out of logs
impl std::fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("debug", &self.debug)
            .field("refresh_minutes", &self.refresh_minutes)
            .field("mini_enabled", &self.mini_enabled)
            .field("mini_position", &self.mini_position)
            .field("mini_quota", &self.mini_quota)
            .field("notify", &self.notify)
            .finish()
    }
}

impl WidgetConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let api_key = API_KEY_VARS.iter().find_map(|key| get(key));

        let refresh_minutes = match get(REFRESH_MINUTES_VAR) {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                Error::config(format!(
                    "{} must be a whole number, got {:?}",
                    REFRESH_MINUTES_VAR, raw
                ))
            })?,
            None => defaults.refresh_minutes,
        };

        let mini_position = match get(MINI_POSITION_VAR) {
            Some(raw) => raw.parse().map_err(Error::config)?,
            None => defaults.mini_position,
        };

        let mini_quota = match get(MINI_QUOTA_VAR) {
            Some(raw) => raw.parse().map_err(Error::config)?,
            None => defaults.mini_quota,
        };

        Ok(Self {
            api_key,
            api_base: get(API_BASE_VAR).unwrap_or(defaults.api_base),
            debug: parse_flag(DEBUG_VAR, get(DEBUG_VAR), defaults.debug)?,
            refresh_minutes,
            mini_enabled: parse_flag(
                MINI_ENABLED_VAR,
                get(MINI_ENABLED_VAR),
                defaults.mini_enabled,
            )?,
            mini_position,
            mini_quota,
            notify: parse_flag(NOTIFY_VAR, get(NOTIFY_VAR), defaults.notify)?,
        })
    }

    /// Startup check: the credential must be present
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_none() {
            return Err(QuotaError::MissingCredential.into());
        }
        if self.refresh_minutes == 0 {
            log::warn!(
                "[config] {} is 0, using the 1 minute minimum",
                REFRESH_MINUTES_VAR
            );
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        interval_from_minutes(self.refresh_minutes)
    }
}

fn parse_flag(key: &str, raw: Option<String>, default: bool) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!(
            "{} must be a boolean (true/false), got {:?}",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<WidgetConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WidgetConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.api_base, "https://api.z.ai/api");
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
        assert!(config.notify);
        assert!(!config.mini_enabled);
    }

    #[test]
    fn test_project_key_preferred_over_api_key() {
        let config =
            config_from(&[("ZAI_API_KEY", "api"), ("ZAI_PROJECT_KEY", "project")]).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("project"));

        let config = config_from(&[("ZAI_API_KEY", "api"), ("ZAI_PROJECT_KEY", "  ")]).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("api"));
    }

    #[test]
    fn test_validate_requires_credential() {
        let err = config_from(&[]).unwrap().validate().unwrap_err();
        assert!(matches!(err, Error::Quota(QuotaError::MissingCredential)));
        assert!(config_from(&[("ZAI_API_KEY", "k")]).unwrap().validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let config = config_from(&[
            ("ZAI_API_KEY", "k"),
            ("ZAI_API_BASE", "http://localhost:9000/api"),
            ("ZAI_WIDGET_DEBUG", "YES"),
            ("ZAI_REFRESH_MINUTES", "10"),
            ("ZAI_MINI_WIDGET", "1"),
            ("ZAI_MINI_POSITION", "bottom_left"),
            ("ZAI_MINI_QUOTA", "weekly"),
            ("ZAI_WIDGET_NOTIFY", "off"),
        ])
        .unwrap();

        assert_eq!(config.api_base, "http://localhost:9000/api");
        assert!(config.debug);
        assert_eq!(config.refresh_minutes, 10);
        assert!(config.mini_enabled);
        assert_eq!(config.mini_position, MiniPosition::BottomLeft);
        assert_eq!(config.mini_quota, DisplayPreference::Weekly);
        assert!(!config.notify);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for (key, value) in [
            ("ZAI_REFRESH_MINUTES", "five"),
            ("ZAI_WIDGET_DEBUG", "maybe"),
            ("ZAI_MINI_POSITION", "middle"),
            ("ZAI_MINI_QUOTA", "daily"),
        ] {
            let err = config_from(&[(key, value)]).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{} = {}", key, value);
        }
    }

    #[test]
    fn test_mini_position_parsing() {
        assert_eq!("TOP-LEFT".parse::<MiniPosition>().unwrap(), MiniPosition::TopLeft);
        assert_eq!(
            "100, -20".parse::<MiniPosition>().unwrap(),
            MiniPosition::At { x: 100, y: -20 }
        );
        assert!("1,b".parse::<MiniPosition>().is_err());
        assert_eq!(MiniPosition::At { x: 3, y: 4 }.to_string(), "3,4");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = config_from(&[("ZAI_API_KEY", "super-secret")]).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
