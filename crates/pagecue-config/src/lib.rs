//! Configuration for pagecue.
//!
//! Sources are layered in this order, later ones winning:
//! 1. built-in defaults
//! 2. a TOML file (explicit path, else `~/.config/pagecue/config.toml` if present)
//! 3. `PAGECUE__SECTION__KEY` environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PAGECUE";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0} must be greater than zero")]
    ZeroInterval(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
    #[serde(default)]
    pub toast: ToastConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    /// JSON prompt table replacing the built-in one.
    #[serde(default)]
    pub prompts_file: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Background coordinator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Delay between a navigation commit (or startup) and injection.
    #[serde(default = "default_navigation_delay_ms")]
    pub navigation_delay_ms: u64,
    /// Content script bundle injected into pages.
    #[serde(default = "default_script_file")]
    pub script_file: String,
}

fn default_navigation_delay_ms() -> u64 { 500 }
fn default_script_file() -> String { "prompt-toast.js".to_string() }

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            navigation_delay_ms: default_navigation_delay_ms(),
            script_file: default_script_file(),
        }
    }
}

impl CoordinatorConfig {
    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }
}

/// Content script settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToastConfig {
    #[serde(default = "default_initial_settle_ms")]
    pub initial_settle_ms: u64,
    /// Interval of the single-page-app URL poll.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_auto_dismiss_ms")]
    pub auto_dismiss_ms: u64,
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    /// Only show buttons when the stored app mode is `agent`.
    #[serde(default)]
    pub gate_on_agent_mode: bool,
    /// Storage key of the settings blob read by the mode gate.
    #[serde(default = "default_settings_key")]
    pub settings_key: String,
}

fn default_initial_settle_ms() -> u64 { 500 }
fn default_poll_interval_ms() -> u64 { 1000 }
fn default_auto_dismiss_ms() -> u64 { 5000 }
fn default_fade_out_ms() -> u64 { 300 }
fn default_settings_key() -> String { "nxtscape-settings".to_string() }

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            initial_settle_ms: default_initial_settle_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            auto_dismiss_ms: default_auto_dismiss_ms(),
            fade_out_ms: default_fade_out_ms(),
            gate_on_agent_mode: false,
            settings_key: default_settings_key(),
        }
    }
}

impl ToastConfig {
    pub fn initial_settle(&self) -> Duration {
        Duration::from_millis(self.initial_settle_ms)
    }

    /// Never zero, since `tokio::time::interval` rejects a zero period.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn auto_dismiss(&self) -> Duration {
        Duration::from_millis(self.auto_dismiss_ms)
    }

    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }
}

/// Side panel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Wait for the input control to mount before filling it.
    #[serde(default = "default_fill_settle_ms")]
    pub fill_settle_ms: u64,
    #[serde(default = "default_highlight_delay_ms")]
    pub highlight_delay_ms: u64,
    #[serde(default = "default_highlight_duration_ms")]
    pub highlight_duration_ms: u64,
}

fn default_fill_settle_ms() -> u64 { 300 }
fn default_highlight_delay_ms() -> u64 { 100 }
fn default_highlight_duration_ms() -> u64 { 3000 }

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            fill_settle_ms: default_fill_settle_ms(),
            highlight_delay_ms: default_highlight_delay_ms(),
            highlight_duration_ms: default_highlight_duration_ms(),
        }
    }
}

impl PanelConfig {
    pub fn fill_settle(&self) -> Duration {
        Duration::from_millis(self.fill_settle_ms)
    }

    pub fn highlight_delay(&self) -> Duration {
        Duration::from_millis(self.highlight_delay_ms)
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_duration_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "pagecue=info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}

impl Config {
    /// Load configuration from an explicit file, or the default location.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        match config_path {
            Some(path) => {
                let expanded = PathBuf::from(shellexpand::tilde(path).as_ref());
                if !expanded.exists() {
                    return Err(ConfigError::NotFound(expanded));
                }
                builder = builder.add_source(config::File::from(expanded).required(true));
            }
            None => {
                if let Some(default_path) = Self::default_path() {
                    builder = builder.add_source(config::File::from(default_path).required(false));
                }
            }
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toast.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("toast.poll_interval_ms"));
        }
        Ok(())
    }

    /// `~/.config/pagecue/config.toml`, when a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pagecue").join("config.toml"))
    }

    /// The prompt table path with `~` expanded.
    pub fn prompts_path(&self) -> Option<PathBuf> {
        self.prompts_file
            .as_deref()
            .map(|p| Path::new(shellexpand::tilde(p).as_ref()).to_path_buf())
    }
}
