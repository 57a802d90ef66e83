//! TOML configuration for the device daemon.
//!
//! Every field has a serde default so the daemon runs correctly with a
//! partial file or no file at all, and so old config files keep working
//! when newer fields are added.
//!
//! ```toml
//! log_level = "info"
//!
//! [serial]
//! path = "/dev/ttyGS0"
//! baud = 115200
//!
//! [dispatch]
//! arg_timeout_ms = 250
//!
//! [hid]
//! keyboard_dev = "/dev/hidg0"
//! mouse_dev = "/dev/hidg1"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level device daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub hid: HidConfig,
}

/// Serial link settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialConfig {
    /// Path of the serial device carrying the command stream.
    #[serde(default = "default_serial_path")]
    pub path: String,
    /// Baud rate, agreed out of band with the host.
    #[serde(default = "default_baud")]
    pub baud: u32,
}

/// Dispatch loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchConfig {
    /// Bound on waiting for a command's argument bytes, in milliseconds.
    #[serde(default = "default_arg_timeout_ms")]
    pub arg_timeout_ms: u64,
}

/// HID gadget device paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HidConfig {
    /// Keyboard gadget function character device.
    #[serde(default = "default_keyboard_dev")]
    pub keyboard_dev: PathBuf,
    /// Mouse gadget function character device.
    #[serde(default = "default_mouse_dev")]
    pub mouse_dev: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            serial: SerialConfig::default(),
            dispatch: DispatchConfig::default(),
            hid: HidConfig::default(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: default_serial_path(),
            baud: default_baud(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            arg_timeout_ms: default_arg_timeout_ms(),
        }
    }
}

impl Default for HidConfig {
    fn default() -> Self {
        Self {
            keyboard_dev: default_keyboard_dev(),
            mouse_dev: default_mouse_dev(),
        }
    }
}

impl DeviceConfig {
    /// Loads the configuration from `path`, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on unreadable or malformed files; a missing
    /// file is not an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: err,
            }),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_serial_path() -> String {
    "/dev/ttyGS0".to_string()
}

fn default_baud() -> u32 {
    115_200
}

fn default_arg_timeout_ms() -> u64 {
    250
}

fn default_keyboard_dev() -> PathBuf {
    PathBuf::from("/dev/hidg0")
}

fn default_mouse_dev() -> PathBuf {
    PathBuf::from("/dev/hidg1")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_full_defaults() {
        let config: DeviceConfig = toml::from_str("").unwrap();
        assert_eq!(config.serial.baud, 115_200);
        assert_eq!(config.serial.path, "/dev/ttyGS0");
        assert_eq!(config.dispatch.arg_timeout_ms, 250);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_toml_keeps_defaults_for_absent_fields() {
        let config: DeviceConfig = toml::from_str(
            r#"
            [serial]
            path = "/dev/ttyACM0"
            "#,
        )
        .unwrap();
        assert_eq!(config.serial.path, "/dev/ttyACM0");
        assert_eq!(config.serial.baud, 115_200);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = DeviceConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(toml::from_str::<DeviceConfig>(&text).unwrap(), config);
    }
}
