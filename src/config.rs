use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TasteDive API key, sent as the `k` query parameter
    pub tastedive_api_key: String,

    /// TasteDive similarity endpoint
    #[serde(default = "default_tastedive_api_url")]
    pub tastedive_api_url: String,

    /// JSON file holding every user's preferences
    #[serde(default = "default_preferences_file")]
    pub preferences_file: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port (hosting platforms inject `PORT`)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on a single similarity request
    #[serde(default = "default_recommendation_timeout_secs")]
    pub recommendation_timeout_secs: u64,
}

fn default_tastedive_api_url() -> String {
    "https://tastedive.com/api/similar".to_string()
}

fn default_preferences_file() -> PathBuf {
    PathBuf::from("user_preferences.json")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

fn default_recommendation_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn recommendation_timeout(&self) -> Duration {
        Duration::from_secs(self.recommendation_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_only_api_key_is_set() {
        let vars = vec![("TASTEDIVE_API_KEY".to_string(), "secret".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tastedive_api_key, "secret");
        assert_eq!(config.tastedive_api_url, "https://tastedive.com/api/similar");
        assert_eq!(config.preferences_file, PathBuf::from("user_preferences.json"));
        assert_eq!(config.bind_address(), "0.0.0.0:10000");
        assert_eq!(config.recommendation_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_overrides_are_read() {
        let vars = vec![
            ("TASTEDIVE_API_KEY".to_string(), "secret".to_string()),
            ("PORT".to_string(), "8080".to_string()),
            ("PREFERENCES_FILE".to_string(), "/data/prefs.json".to_string()),
            ("RECOMMENDATION_TIMEOUT_SECS".to_string(), "3".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.preferences_file, PathBuf::from("/data/prefs.json"));
        assert_eq!(config.recommendation_timeout_secs, 3);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let vars: Vec<(String, String)> = vec![];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }
}
