use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the chat backend
    pub server_url: String,

    /// Path of the chat endpoint, joined onto `server_url`
    pub chat_path: String,

    /// Client-side request timeout. Unset means the HTTP client default.
    pub request_timeout_secs: Option<u64>,

    /// Address shown in the contact modal
    pub contact_email: String,

    /// UI preferences
    pub ui: UiConfig,

    /// Chatline home directory
    #[serde(skip)]
    pub chatline_home: PathBuf,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub show_sidebar: bool,
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            title: "Chatline".to_string(),
            show_sidebar: true,
            tick_ms: 300,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));

        Config {
            server_url: "http://127.0.0.1:5000".to_string(),
            chat_path: "/chat".to_string(),
            request_timeout_secs: None,
            contact_email: "contact@example.com".to_string(),
            ui: UiConfig::default(),
            chatline_home: home.join(".chatline"),
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".chatline").join("config.toml"))
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Config::default()
        };

        if let Some(parent) = path.parent() {
            config.chatline_home = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// Override the server URL (CLI flag / environment)
    pub fn with_server_url(mut self, server_url: Option<String>) -> Self {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms.max(50))
    }
}
