//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calbridge/config.toml` by default. Command-line flags
//! override file values; the fallback zone ships as `America/New_York`
//! (a deployment choice, not an engine constant).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use calbridge_engine::{DEFAULT_FOLD_WIDTH, IanaResolver, OutputPolicy, ZoneResolver};
use calbridge_fetch::FetchConfig;

/// Configuration for the calbridge CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Zone used when a floating time has no TZID and the feed carries no
    /// calendar default (IANA identifier).
    pub fallback_zone: String,

    /// Display zone for the local-with-zone policy (IANA identifier).
    pub display_zone: Option<String>,

    /// Normalization policy.
    pub policy: OutputPolicy,

    /// Source identifier used for the description tag.
    pub source_id: Option<String>,

    /// Width at which output ICS lines are folded.
    pub fold_width: usize,

    /// Fetch settings.
    #[serde(default)]
    pub fetch: FetchSettings,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            fallback_zone: "America/New_York".to_string(),
            display_zone: None,
            policy: OutputPolicy::default(),
            source_id: None,
            fold_width: DEFAULT_FOLD_WIDTH,
            fetch: FetchSettings::default(),
        }
    }
}

/// Fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// HTTP timeout in seconds.
    pub timeout: u64,

    /// User-Agent header; defaults to `calbridge/<version>`.
    pub user_agent: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: None,
        }
    }
}

impl CliConfig {
    /// Loads configuration from the default path, falling back to defaults
    /// when no file exists.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("failed to read config: {}", e))?;
            toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calbridge")
            .join("config.toml")
    }

    /// Checks the configuration for problems.
    pub fn validate(&self) -> Result<(), String> {
        let resolver = IanaResolver;
        if resolver.resolve(&self.fallback_zone).is_none() {
            return Err(format!("unknown fallback zone {:?}", self.fallback_zone));
        }
        if let Some(ref zone) = self.display_zone
            && resolver.resolve(zone).is_none()
        {
            return Err(format!("unknown display zone {:?}", zone));
        }
        if self.policy == OutputPolicy::LocalWithZone && self.display_zone.is_none() {
            return Err("the local-with-zone policy requires a display zone".to_string());
        }
        if self.fold_width < 16 {
            return Err(format!("fold width {} is unusably small", self.fold_width));
        }
        Ok(())
    }

    /// Builds the fetcher configuration.
    pub fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig {
            timeout: Duration::from_secs(self.fetch.timeout),
            ..FetchConfig::default()
        };
        if let Some(ref user_agent) = self.fetch.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = CliConfig::default();
        assert_eq!(config.fallback_zone, "America/New_York");
        assert_eq!(config.policy, OutputPolicy::Utc);
        assert_eq!(config.fold_width, DEFAULT_FOLD_WIDTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "fallback_zone = \"Europe/Paris\"\n\n[fetch]\ntimeout = 10\n"
        )
        .unwrap();

        let config = CliConfig::load_from(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.fallback_zone, "Europe/Paris");
        assert_eq!(config.fetch.timeout, 10);
        // Unset fields keep their defaults.
        assert_eq!(config.fold_width, DEFAULT_FOLD_WIDTH);
    }

    #[test]
    fn rejects_unknown_zones() {
        let config = CliConfig {
            fallback_zone: "Not/A-Zone".to_string(),
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn local_policy_requires_display_zone() {
        let config = CliConfig {
            policy: OutputPolicy::LocalWithZone,
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CliConfig {
            policy: OutputPolicy::LocalWithZone,
            display_zone: Some("Europe/Paris".to_string()),
            ..CliConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn fetch_config_carries_timeout() {
        let config = CliConfig {
            fetch: FetchSettings {
                timeout: 5,
                user_agent: Some("test-agent".to_string()),
            },
            ..CliConfig::default()
        };
        let fetch = config.fetch_config();
        assert_eq!(fetch.timeout, Duration::from_secs(5));
        assert_eq!(fetch.user_agent, "test-agent");
    }
}
