use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{OncallError, Result};

/// Top-level configuration for the Oncall application.
///
/// Loaded from `~/.oncall/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OncallConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub resources: ResourceConfig,
}

impl OncallConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: OncallConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| OncallError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// API server port.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

/// Conversation and routing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum messages retained per conversation (oldest evicted first).
    pub history_cap: usize,
    /// Hours of monitoring data gathered per request.
    pub window_hours: u32,
    /// Conversation turns forwarded to the LLM provider.
    pub history_turns: usize,
    /// Maximum live sessions before least-recently-used eviction kicks in.
    pub max_sessions: usize,
    /// Minutes of inactivity after which a session is evicted.
    pub session_ttl_minutes: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_cap: 50,
            window_hours: 2,
            history_turns: 10,
            max_sessions: 1000,
            session_ttl_minutes: 720,
        }
    }
}

/// Connection settings for one monitoring backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSystemConfig {
    pub url: String,
    pub token: String,
    pub username: String,
    pub password: String,
    pub enabled: bool,
    pub timeout_secs: u64,
}

impl Default for MonitorSystemConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            username: String::new(),
            password: String::new(),
            enabled: true,
            timeout_secs: 30,
        }
    }
}

/// Monitoring backends the assistant fronts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub grafana: MonitorSystemConfig,
    pub prometheus: MonitorSystemConfig,
    pub elasticsearch: MonitorSystemConfig,
    pub nagios: MonitorSystemConfig,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            grafana: MonitorSystemConfig {
                url: "http://localhost:3000".to_string(),
                ..MonitorSystemConfig::default()
            },
            prometheus: MonitorSystemConfig {
                url: "http://localhost:9090".to_string(),
                ..MonitorSystemConfig::default()
            },
            elasticsearch: MonitorSystemConfig {
                url: "http://localhost:9200".to_string(),
                ..MonitorSystemConfig::default()
            },
            nagios: MonitorSystemConfig {
                url: "http://localhost/nagios".to_string(),
                ..MonitorSystemConfig::default()
            },
        }
    }
}

/// LLM provider settings.
///
/// An empty `provider` disables AI-powered analysis entirely; the chat
/// surface then runs on the scripted flow and rule-based responses alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider selector: "" (disabled) or "mock".
    pub provider: String,
    /// Chat-completions endpoint of the upstream provider.
    pub endpoint: String,
    /// API key; empty means ambient credentials.
    pub api_key: String,
    /// Model deployment name.
    pub deployment: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token budget.
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: String::new(),
            endpoint: String::new(),
            api_key: String::new(),
            deployment: "gpt-4".to_string(),
            temperature: 0.3,
            max_tokens: 2000,
        }
    }
}

/// Text resources and URL templates used by the dialogue engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Directory holding `exclamation.txt` and `joke*.txt`.
    pub dir: String,
    /// Base URL of the customer-locations dashboard.
    pub locations_url: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            dir: "etc".to_string(),
            locations_url: "http://10.10.4.6/dashboards/food/main.html".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = OncallConfig::default();
        assert_eq!(config.general.port, 8000);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.chat.history_cap, 50);
        assert_eq!(config.chat.window_hours, 2);
        assert_eq!(config.chat.history_turns, 10);
        assert_eq!(config.monitoring.grafana.url, "http://localhost:3000");
        assert_eq!(config.monitoring.prometheus.url, "http://localhost:9090");
        assert_eq!(config.llm.deployment, "gpt-4");
        assert!(config.llm.provider.is_empty());
        assert_eq!(config.resources.dir, "etc");
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
port = 9000
log_level = "debug"

[chat]
history_cap = 25
window_hours = 4

[monitoring.grafana]
url = "http://grafana.internal:3000"
token = "secret"
enabled = false

[llm]
provider = "mock"
deployment = "gpt-4o"
"#;
        let file = create_temp_config(content);
        let config = OncallConfig::load(file.path()).unwrap();
        assert_eq!(config.general.port, 9000);
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.chat.history_cap, 25);
        assert_eq!(config.chat.window_hours, 4);
        assert_eq!(config.monitoring.grafana.url, "http://grafana.internal:3000");
        assert_eq!(config.monitoring.grafana.token, "secret");
        assert!(!config.monitoring.grafana.enabled);
        assert_eq!(config.llm.provider, "mock");
        assert_eq!(config.llm.deployment, "gpt-4o");
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[general]
log_level = "warn"
"#;
        let file = create_temp_config(content);
        let config = OncallConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        // Remaining fields use defaults
        assert_eq!(config.general.port, 8000);
        assert_eq!(config.chat.history_cap, 50);
        assert_eq!(config.monitoring.nagios.url, "http://localhost/nagios");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = OncallConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.port, 8000);
        assert_eq!(config.chat.session_ttl_minutes, 720);
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "this is {{ not valid TOML";
        let file = create_temp_config(content);
        assert!(OncallConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = OncallConfig::load(file.path()).unwrap();
        assert_eq!(config.chat.max_sessions, 1000);
        assert_eq!(config.monitoring.elasticsearch.timeout_secs, 30);
        assert_eq!(
            config.resources.locations_url,
            "http://10.10.4.6/dashboards/food/main.html"
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let config = OncallConfig::default();
        config.save(&path).unwrap();
        assert!(path.exists());

        let reloaded = OncallConfig::load(&path).unwrap();
        assert_eq!(reloaded.general.port, config.general.port);
        assert_eq!(reloaded.chat.history_cap, config.chat.history_cap);
        assert_eq!(reloaded.llm.deployment, config.llm.deployment);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = OncallConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let deserialized: OncallConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.general.log_level, config.general.log_level);
        assert_eq!(
            deserialized.monitoring.grafana.url,
            config.monitoring.grafana.url
        );
        assert!((deserialized.llm.temperature - config.llm.temperature).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sub_config_defaults() {
        let general = GeneralConfig::default();
        assert_eq!(general.port, 8000);

        let chat = ChatConfig::default();
        assert_eq!(chat.history_cap, 50);
        assert_eq!(chat.max_sessions, 1000);

        let system = MonitorSystemConfig::default();
        assert!(system.enabled);
        assert_eq!(system.timeout_secs, 30);

        let llm = LlmConfig::default();
        assert_eq!(llm.max_tokens, 2000);
        assert!((llm.temperature - 0.3).abs() < f64::EPSILON);

        let resources = ResourceConfig::default();
        assert_eq!(resources.dir, "etc");
    }
}
