use h2h_api::client::DEFAULT_BASE_URL;
use log::LevelFilter;
use std::str::FromStr;
use std::time::Duration;

pub const API_BASE_VAR: &str = "H2H_API_BASE";
pub const TIMEOUT_VAR: &str = "H2H_TIMEOUT_SECS";
pub const LOG_LEVEL_VAR: &str = "H2H_LOG_LEVEL";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api_base: String,
    /// Per-request deadline. Unset means requests may wait forever.
    pub timeout: Option<Duration>,
    pub log_level: Option<LevelFilter>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self { api_base: DEFAULT_BASE_URL.to_string(), timeout: None, log_level: None }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            api_base: value(API_BASE_VAR).unwrap_or(defaults.api_base),
            timeout: value(TIMEOUT_VAR)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            log_level: value(LOG_LEVEL_VAR).and_then(|v| LevelFilter::from_str(&v).ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> AppSettings {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]);
        assert_eq!(s.api_base, DEFAULT_BASE_URL);
        assert_eq!(s.timeout, None);
        assert_eq!(s.log_level, None);
    }

    #[test]
    fn reads_all_variables() {
        let s = settings(&[
            (API_BASE_VAR, "https://stats.example.com"),
            (TIMEOUT_VAR, "15"),
            (LOG_LEVEL_VAR, "debug"),
        ]);
        assert_eq!(s.api_base, "https://stats.example.com");
        assert_eq!(s.timeout, Some(Duration::from_secs(15)));
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn bad_values_fall_back() {
        let s = settings(&[(API_BASE_VAR, "  "), (TIMEOUT_VAR, "soon"), (LOG_LEVEL_VAR, "loud")]);
        assert_eq!(s.api_base, DEFAULT_BASE_URL);
        assert_eq!(s.timeout, None);
        assert_eq!(s.log_level, None);
    }
}
