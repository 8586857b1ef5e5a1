//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every key has a default, so an empty file (or no file at all) is a valid
//! configuration. User-adjustable settings (speeds, bindings, autostart) are
//! not configured here; they live in the settings store.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{GamepadMouseError, Result};
use crate::store::json::default_store_path;
use crate::store::XdgAutostart;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Accepted values for `logging.level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub analog: AnalogConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub autostart: AutostartConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Polling loop timing
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_dispatch_cooldown_ticks")]
    pub dispatch_cooldown_ticks: u32,

    #[serde(default = "default_assignment_cooldown_ticks")]
    pub assignment_cooldown_ticks: u32,
}

/// Analog stick handling
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalogConfig {
    #[serde(default = "default_deadzone")]
    pub deadzone: f32,
}

/// Controller discovery
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InputConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
}

/// Settings store location
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct StoreConfig {
    /// Empty means `<config dir>/GamePadToMouse/config.json`
    #[serde(default)]
    pub path: String,
}

/// Start-at-login registration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AutostartConfig {
    /// Empty means `<config dir>/autostart`
    #[serde(default)]
    pub dir: String,

    #[serde(default = "default_app_name")]
    pub app_name: String,
}

/// Log output
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Empty means stdout only
    #[serde(default)]
    pub log_dir: String,
}

// Default value functions
fn default_tick_interval_ms() -> u64 { 8 }
fn default_dispatch_cooldown_ticks() -> u32 { 15 }
fn default_assignment_cooldown_ticks() -> u32 { 50 }

fn default_deadzone() -> f32 { 0.1 }

fn default_input_dir() -> String { "/dev/input".to_string() }

fn default_app_name() -> String { "GamePadToMouse".to_string() }

fn default_log_level() -> String { "info".to_string() }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            dispatch_cooldown_ticks: default_dispatch_cooldown_ticks(),
            assignment_cooldown_ticks: default_assignment_cooldown_ticks(),
        }
    }
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
        }
    }
}

impl Default for AutostartConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            app_name: default_app_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

fn invalid(message: impl std::fmt::Display) -> GamepadMouseError {
    GamepadMouseError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gamepad_mouse::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration text
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(&path) {
            Err(GamepadMouseError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!(
                    "No config file at {}, using built-in defaults",
                    path.as_ref().display()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.engine.tick_interval_ms == 0 || self.engine.tick_interval_ms > 1000 {
            return Err(invalid("tick_interval_ms must be between 1 and 1000"));
        }

        if self.engine.dispatch_cooldown_ticks > 1000 {
            return Err(invalid("dispatch_cooldown_ticks must be between 0 and 1000"));
        }

        if self.engine.assignment_cooldown_ticks > 1000 {
            return Err(invalid("assignment_cooldown_ticks must be between 0 and 1000"));
        }

        // Also rejects NaN
        if !(0.0..=0.9).contains(&self.analog.deadzone) {
            return Err(invalid("deadzone must be between 0.0 and 0.9"));
        }

        if self.input.input_dir.is_empty() {
            return Err(invalid("input_dir cannot be empty"));
        }

        if self.autostart.app_name.is_empty() {
            return Err(invalid("autostart app_name cannot be empty"));
        }

        if self.autostart.app_name.contains('/') {
            return Err(invalid("autostart app_name cannot contain '/'"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid(format!(
                "log level must be one of: {}",
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Settings file path, resolving the empty default.
    #[must_use]
    pub fn store_path(&self) -> Option<PathBuf> {
        if self.store.path.is_empty() {
            default_store_path()
        } else {
            Some(PathBuf::from(&self.store.path))
        }
    }

    /// Autostart directory, resolving the empty default.
    #[must_use]
    pub fn autostart_dir(&self) -> Option<PathBuf> {
        if self.autostart.dir.is_empty() {
            XdgAutostart::default_dir()
        } else {
            Some(PathBuf::from(&self.autostart.dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config {
            engine: EngineConfig {
                tick_interval_ms: default_tick_interval_ms(),
                dispatch_cooldown_ticks: default_dispatch_cooldown_ticks(),
                assignment_cooldown_ticks: default_assignment_cooldown_ticks(),
            },
            analog: AnalogConfig {
                deadzone: default_deadzone(),
            },
            input: InputConfig {
                input_dir: default_input_dir(),
            },
            store: StoreConfig {
                path: String::new(),
            },
            autostart: AutostartConfig {
                dir: String::new(),
                app_name: default_app_name(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                log_dir: String::new(),
            },
        }
    }

    #[test]
    fn test_default_config() {
        let config = create_valid_config();
        assert!(config.validate().is_ok());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_tick_interval_ms(), 8);
        assert_eq!(default_dispatch_cooldown_ticks(), 15);
        assert_eq!(default_assignment_cooldown_ticks(), 50);
        assert_eq!(default_deadzone(), 0.1);
        assert_eq!(default_input_dir(), "/dev/input");
        assert_eq!(default_app_name(), "GamePadToMouse");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[engine]
tick_interval_ms = 10

[analog]
deadzone = 0.2

[store]
path = "/tmp/gamepad-mouse.json"

[logging]
level = "debug"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.engine.tick_interval_ms, 10);
        assert_eq!(config.engine.dispatch_cooldown_ticks, 15);
        assert_eq!(config.analog.deadzone, 0.2);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.store_path(), Some(PathBuf::from("/tmp/gamepad-mouse.json")));
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_is_error() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[engine]\ntick_interval_ms = \"fast\"\n").unwrap();
        temp_file.flush().unwrap();

        assert!(Config::load_or_default(temp_file.path()).is_err());
    }

    #[test]
    fn test_tick_interval_zero() {
        let mut config = create_valid_config();
        config.engine.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_interval_too_high() {
        let mut config = create_valid_config();
        config.engine.tick_interval_ms = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_interval_bounds() {
        let mut config = create_valid_config();
        config.engine.tick_interval_ms = 1;
        assert!(config.validate().is_ok());
        config.engine.tick_interval_ms = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cooldowns_may_be_zero() {
        let mut config = create_valid_config();
        config.engine.dispatch_cooldown_ticks = 0;
        config.engine.assignment_cooldown_ticks = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dispatch_cooldown_too_high() {
        let mut config = create_valid_config();
        config.engine.dispatch_cooldown_ticks = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_assignment_cooldown_too_high() {
        let mut config = create_valid_config();
        config.engine.assignment_cooldown_ticks = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_negative() {
        let mut config = create_valid_config();
        config.analog.deadzone = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_too_high() {
        let mut config = create_valid_config();
        config.analog.deadzone = 0.95;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_nan() {
        let mut config = create_valid_config();
        config.analog.deadzone = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_input_dir() {
        let mut config = create_valid_config();
        config.input.input_dir = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_app_name() {
        let mut config = create_valid_config();
        config.autostart.app_name = String::new();
        assert!(config.validate().is_err());

        config.autostart.app_name = "../evil".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = create_valid_config();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_log_levels() {
        let mut config = create_valid_config();
        for level in LOG_LEVELS {
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "level {} rejected", level);
        }
    }

    #[test]
    fn test_explicit_autostart_dir() {
        let mut config = create_valid_config();
        config.autostart.dir = "/tmp/autostart".to_string();
        assert_eq!(config.autostart_dir(), Some(PathBuf::from("/tmp/autostart")));
    }
}
