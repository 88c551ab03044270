use crate::error::{Result, WeatherDashError};
use crate::models::TemperatureUnit;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const BASE_URL_ENV: &str = "WEATHER_BASE_URL";

const PLACEHOLDER_PATTERN: &str = r"\$\{([A-Z_][A-Z0-9_]*)\}";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub weatherapi: WeatherApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct WeatherApiConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for WeatherApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default)]
    pub unit: TemperatureUnit,
    #[serde(default = "default_hourly_limit")]
    pub hourly_limit: usize,
    #[serde(default = "default_suggestion_min_chars")]
    pub suggestion_min_chars: usize,
    #[serde(default = "default_suggestion_debounce_ms")]
    pub suggestion_debounce_ms: u64,
}

fn default_city() -> String {
    "London".to_string()
}

fn default_hourly_limit() -> usize {
    crate::models::DEFAULT_HOURLY_LIMIT
}

fn default_suggestion_min_chars() -> usize {
    2
}

fn default_suggestion_debounce_ms() -> u64 {
    250
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            unit: TemperatureUnit::default(),
            hourly_limit: default_hourly_limit(),
            suggestion_min_chars: default_suggestion_min_chars(),
            suggestion_debounce_ms: default_suggestion_debounce_ms(),
        }
    }
}

impl Config {
    /// Load from the first config file found, falling back to
    /// `WEATHER_API_KEY` / `WEATHER_BASE_URL` when there is none.
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config = match config_override {
            Some(path) => {
                if !path.exists() {
                    return Err(WeatherDashError::Config(format!(
                        "Config file not found at {:?}",
                        path
                    )));
                }
                Self::from_file(path)?
            }
            None => match Self::find_config_path() {
                Some(path) => Self::from_file(&path)?,
                None => {
                    tracing::debug!("No config file found, using environment");
                    Self::from_lookup(|name| std::env::var(name).ok())
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &PathBuf) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| WeatherDashError::Config(format!("Failed to read config: {}", e)))?;
        tracing::debug!("Loading config from {}", path.display());
        Self::from_yaml_str(&raw, |name| std::env::var(name).ok())
    }

    /// Parse YAML after substituting `${VAR}` placeholders through `lookup`.
    pub fn from_yaml_str<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = Self::substitute_env_vars(content, lookup)?;
        serde_yaml::from_str(&content)
            .map_err(|e| WeatherDashError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Environment-only configuration.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(key) = lookup(API_KEY_ENV) {
            config.weatherapi.api_key = key;
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.weatherapi.base_url = url;
        }
        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.weatherapi.api_key.trim().is_empty() {
            return Err(WeatherDashError::Config(format!(
                "WeatherAPI key missing - set {} or weatherapi.api_key in config.yaml",
                API_KEY_ENV
            )));
        }
        if self.weatherapi.base_url.trim().is_empty() {
            return Err(WeatherDashError::Config("weatherapi.base_url is empty".into()));
        }

        let placeholder = placeholder_regex()?;
        for (field, value) in [
            ("weatherapi.api_key", &self.weatherapi.api_key),
            ("weatherapi.base_url", &self.weatherapi.base_url),
        ] {
            if let Some(cap) = placeholder.captures(value) {
                return Err(WeatherDashError::Config(format!(
                    "{} refers to ${{{}}}, which is not set",
                    field, &cap[1]
                )));
            }
        }

        if self.dashboard.default_city.trim().is_empty() {
            return Err(WeatherDashError::Config(
                "dashboard.default_city is empty".into(),
            ));
        }
        Ok(())
    }

    /// Search for config.yaml in the working directory, then the XDG config dir.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("weatherdash").join("config.yaml"))
            .filter(|p| p.exists())
    }

    fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut result = content.to_string();

        let re = placeholder_regex()?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Some(value) = lookup(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}

fn placeholder_regex() -> Result<regex_lite::Regex> {
    regex_lite::Regex::new(PLACEHOLDER_PATTERN)
        .map_err(|e| WeatherDashError::Config(format!("Bad placeholder pattern: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn yaml_with_placeholders() {
        let env = vars(&[("WEATHER_API_KEY", "abc123"), ("WEATHER_BASE_URL", "http://mock")]);
        let yaml = r#"
weatherapi:
  api_key: ${WEATHER_API_KEY}
  base_url: ${WEATHER_BASE_URL}
dashboard:
  default_city: Paris
  unit: fahrenheit
"#;
        let config = Config::from_yaml_str(yaml, |k| env.get(k).cloned()).unwrap();
        assert_eq!(config.weatherapi.api_key, "abc123");
        assert_eq!(config.weatherapi.base_url, "http://mock");
        assert_eq!(config.weatherapi.timeout_secs, 10);
        assert_eq!(config.dashboard.default_city, "Paris");
        assert_eq!(config.dashboard.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(config.dashboard.hourly_limit, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn dashboard_section_is_optional() {
        let yaml = "weatherapi:\n  api_key: k\n";
        let config = Config::from_yaml_str(yaml, |_| None).unwrap();
        assert_eq!(config.dashboard.default_city, "London");
        assert_eq!(config.dashboard.suggestion_min_chars, 2);
        assert_eq!(config.weatherapi.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn unknown_placeholder_left_in_place() {
        let yaml = "weatherapi:\n  api_key: ${NOT_SET_ANYWHERE}\n";
        let config = Config::from_yaml_str(yaml, |_| None).unwrap();
        assert_eq!(config.weatherapi.api_key, "${NOT_SET_ANYWHERE}");
    }

    #[test]
    fn unresolved_placeholder_fails_validation() {
        let yaml = "weatherapi:\n  api_key: ${WEATHER_API_KEY}\n";
        let config = Config::from_yaml_str(yaml, |_| None).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, WeatherDashError::Config(_)));
        assert!(err.to_string().contains("WEATHER_API_KEY"));

        let yaml = "weatherapi:\n  api_key: k\n  base_url: ${WEATHER_BASE_URL}\n";
        let config = Config::from_yaml_str(yaml, |_| None).unwrap();
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("weatherapi.base_url"));
    }

    #[test]
    fn read_and_parse_failures_are_config_errors() {
        let dir = std::env::temp_dir();
        assert!(matches!(
            Config::load(Some(&dir)),
            Err(WeatherDashError::Config(_))
        ));

        assert!(matches!(
            Config::from_yaml_str("weatherapi: [not, a, map]", |_| None),
            Err(WeatherDashError::Config(_))
        ));
    }

    #[test]
    fn environment_fallback() {
        let env = vars(&[("WEATHER_API_KEY", "from-env")]);
        let config = Config::from_lookup(|k| env.get(k).cloned());
        assert_eq!(config.weatherapi.api_key, "from-env");
        assert_eq!(config.weatherapi.base_url, DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let config = Config::from_lookup(|_| None);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("WEATHER_API_KEY"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut config = Config::default();
        config.weatherapi.api_key = "super-secret".into();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
