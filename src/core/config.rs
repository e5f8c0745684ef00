//! Configuration management for uishots
//!
//! Supports environment variables, config files, and CLI overrides.
//!
//! Config file location: ~/.config/uishots/config.toml

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::core::error::{Result, ShotError};
use crate::core::types::Theme;

/// Main configuration for uishots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Browser configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Inputs and outputs of a run
    #[serde(default)]
    pub capture: CaptureConfig,
    /// How to reach into the UI under test
    #[serde(default)]
    pub ui: UiConfig,
    /// Shape of the stubbed backend data
    #[serde(default)]
    pub fixtures: FixtureConfig,
}

/// Browser process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Whether to run with a visible window
    pub headed: bool,
    /// Chrome/Chromium binary; auto-detected when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
    /// Pass --no-sandbox (needed in most containers)
    pub no_sandbox: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Ceiling for every element wait in ms
    pub wait_timeout_ms: u64,
    /// Element poll interval in ms
    pub poll_interval_ms: u64,
}

/// Capture inputs and outputs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// HTML entry point of the built UI
    pub bundle: PathBuf,
    /// Directory receiving the PNG files and the listing
    pub output_dir: PathBuf,
    /// Listing document file name, written inside `output_dir`
    pub listing_file: String,
    /// Link target for each image; `{file}` is replaced by the file name
    pub link_template: String,
    /// Remove existing PNG files from `output_dir` before capturing
    pub clean: bool,
}

/// Integration points of the UI under test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Page expression evaluating to the global state store
    pub store_expression: String,
    /// Store mutation taking a single `dark: bool` argument
    pub theme_mutation: String,
    /// Store mutation taking a playing entry
    pub playing_mutation: String,
    /// Theme the UI starts in
    pub start_theme: Theme,
    /// Key that dismisses an open panel
    pub dismiss_key: String,
    /// Pause after disabling animations, in ms
    pub settle_ms: u64,
}

/// Stub catalog fixture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    pub tab_count: u64,
    pub sounds_per_tab: u64,
    /// Name of the single simulated output application
    pub output_name: String,
    /// Answer of the `isLinux` check
    pub linux: bool,
    /// Answer of the `isYoutubeDLAvailable` check
    pub youtube_dl: bool,
    /// Fields merged over the settings snapshot (added or replaced)
    pub settings_overrides: serde_json::Map<String, serde_json::Value>,
    /// Extra constant stubs, or replacements for built-in ones
    pub constants: BTreeMap<String, serde_json::Value>,
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headed: env_flag("UISHOTS_HEADED", false),
            executable: env::var("UISHOTS_CHROME").ok().map(PathBuf::from),
            no_sandbox: env_flag("UISHOTS_NO_SANDBOX", false),
            viewport_width: 1360,
            viewport_height: 795,
            wait_timeout_ms: 30000,
            poll_interval_ms: 100,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            bundle: env::var("UISHOTS_BUNDLE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("dist/index.html")),
            output_dir: env::var("UISHOTS_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("screenshots")),
            listing_file: "README.md".to_string(),
            link_template: env::var("UISHOTS_LINK_TEMPLATE").unwrap_or_else(|_| {
                "https://raw.githubusercontent.com/Soundux/Soundux-UI/master/screenshots/{file}"
                    .to_string()
            }),
            clean: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            store_expression: "document.getElementById('app').__vue__.$store".to_string(),
            theme_mutation: "setDarkTheme".to_string(),
            playing_mutation: "addToCurrentlyPlaying".to_string(),
            start_theme: Theme::Dark,
            dismiss_key: "Escape".to_string(),
            settle_ms: 500,
        }
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            tab_count: 5,
            sounds_per_tab: 19,
            output_name: "Discord".to_string(),
            linux: true,
            youtube_dl: true,
            settings_overrides: serde_json::Map::new(),
            constants: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("uishots")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::load_or_default(Self::config_file())
    }

    /// Load `path` if it exists; a file that is present but rejected is
    /// reported and the defaults (which respect env vars) are used instead
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ShotError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ShotError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text; missing sections take defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ShotError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot produce a run
    pub fn validate(&self) -> Result<()> {
        if self.browser.viewport_width == 0 || self.browser.viewport_height == 0 {
            return Err(ShotError::config("Viewport dimensions must be non-zero"));
        }
        if self.browser.poll_interval_ms == 0 {
            return Err(ShotError::config("poll_interval_ms must be non-zero"));
        }
        if !self.capture.link_template.contains("{file}") {
            return Err(ShotError::config(
                "link_template must contain a {file} placeholder",
            ));
        }
        if self.capture.listing_file.trim().is_empty() {
            return Err(ShotError::config("listing_file must not be empty"));
        }
        Ok(())
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.browser.wait_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.browser.poll_interval_ms)
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}
