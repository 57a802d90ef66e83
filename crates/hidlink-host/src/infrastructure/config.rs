//! Host configuration, loaded from a TOML file.
//!
//! Every field has a default so a missing file or an empty file yields a
//! working configuration for the common setup (USB CDC serial adapter,
//! gRPC on localhost, screen coordinates).

use std::path::Path;
use std::time::Duration;

use hidlink_core::CoordinateMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::RelayConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub grpc: GrpcConfig,
    #[serde(default)]
    pub relay: RelaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial device the relay writes to.
    #[serde(default = "default_serial_path")]
    pub path: String,
    #[serde(default = "default_baud")]
    pub baud: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrpcConfig {
    /// Socket address the gRPC server listens on.
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySection {
    /// Coordinate convention reported to clients at Init.
    #[serde(default = "default_coordinate_mode")]
    pub coordinate_mode: CoordinateMode,
    /// Pause between positioning and clicking/scrolling, in milliseconds.
    #[serde(default = "default_click_settle_ms")]
    pub click_settle_ms: u64,
    /// Wire delta for a ScrollDown action.
    #[serde(default = "default_scroll_delta")]
    pub scroll_delta: i16,
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_serial_path() -> String {
    "/dev/ttyUSB0".to_owned()
}

fn default_baud() -> u32 {
    115_200
}

fn default_listen() -> String {
    "127.0.0.1:50051".to_owned()
}

fn default_coordinate_mode() -> CoordinateMode {
    CoordinateMode::Screen
}

fn default_click_settle_ms() -> u64 {
    80
}

fn default_scroll_delta() -> i16 {
    1000
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            serial: SerialConfig::default(),
            grpc: GrpcConfig::default(),
            relay: RelaySection::default(),
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

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            coordinate_mode: default_coordinate_mode(),
            click_settle_ms: default_click_settle_ms(),
            scroll_delta: default_scroll_delta(),
        }
    }
}

impl HostConfig {
    /// Loads the configuration from `path`.  A missing file yields the
    /// defaults; a present but malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

impl RelaySection {
    pub fn to_relay_config(&self) -> RelayConfig {
        RelayConfig {
            coordinate_mode: self.coordinate_mode,
            click_settle: Duration::from_millis(self.click_settle_ms),
            scroll_delta: self.scroll_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = HostConfig::default();
        assert_eq!(config.serial.path, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud, 115_200);
        assert_eq!(config.grpc.listen, "127.0.0.1:50051");
        assert_eq!(config.relay.coordinate_mode, CoordinateMode::Screen);
        assert_eq!(config.relay.click_settle_ms, 80);
        assert_eq!(config.relay.scroll_delta, 1000);
    }

    #[test]
    fn empty_toml_equals_defaults() {
        let config: HostConfig = toml::from_str("").unwrap();
        assert_eq!(config.serial.path, HostConfig::default().serial.path);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_toml_keeps_unmentioned_defaults() {
        let config: HostConfig = toml::from_str(
            r#"
            log_level = "debug"

            [serial]
            path = "/dev/ttyACM0"

            [relay]
            coordinate_mode = "relative"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.serial.path, "/dev/ttyACM0");
        assert_eq!(config.serial.baud, 115_200);
        assert_eq!(config.relay.coordinate_mode, CoordinateMode::Relative);
        assert_eq!(config.relay.click_settle_ms, 80);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = HostConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: HostConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.serial.path, config.serial.path);
        assert_eq!(back.relay.scroll_delta, config.relay.scroll_delta);
    }
}
