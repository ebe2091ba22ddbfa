use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::DotnoteError;

pub const CONFIG_PATH: &str = "/etc/dotnote/config.toml";

/// A list of the implemented display backends.
#[derive(PartialEq, Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    Max7219,
    Headless,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayKind,
    pub spi_path: String,
    pub gpio_chip: String,
    /// Number of 8x8 LED matrices connected in series.
    pub cascaded_devices: usize,
    /// Rotation of individual blocks: -90, 0, 90 or 180.
    pub block_orientation: i16,
    /// Overall display rotation: 0 or 2 (half turns only, the chain is not
    /// square).
    pub rotate: u8,
    /// LED brightness level, 0-15.
    pub brightness: u8,
    /// Delay between scroll steps; lower is faster.
    pub scroll_delay_ms: u64,
    pub default_message: String,
    /// Spaces appended to messages for separation when the scroll wraps.
    pub message_spacing: String,
    pub buzzer_enabled: bool,
    pub buzzer_pin: u32,
    pub beep_duration_ms: u64,
    pub beep_count: u32,
    pub host: String,
    pub port: u16,
    pub log_file: String,
    pub log_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            display: DisplayKind::Max7219,
            spi_path: "/dev/spidev0.0".into(),
            gpio_chip: "/dev/gpiochip0".into(),
            cascaded_devices: 4,
            block_orientation: -90,
            rotate: 0,
            brightness: 5,
            scroll_delay_ms: 50,
            default_message: "Welcome to DotNote!   ".into(),
            message_spacing: "   ".into(),
            buzzer_enabled: true,
            buzzer_pin: 23,
            beep_duration_ms: 200,
            beep_count: 2,
            host: "0.0.0.0".into(),
            port: 5000,
            log_file: "messages.log".into(),
            log_enabled: true,
        }
    }
}

pub fn parse_config<P: AsRef<Path>>(path: P) -> Result<Config, DotnoteError> {
    let config = if path.as_ref().exists() {
        let config_file = std::fs::read_to_string(&path).map_err(DotnoteError::ConfigFile)?;
        toml::from_str(&config_file)?
    } else {
        info!(
            "no config file found at {}, using defaults",
            path.as_ref().display()
        );
        Config::default()
    };
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), DotnoteError> {
    if config.cascaded_devices == 0 {
        return Err(DotnoteError::InvalidConfig(
            "cascaded_devices must be at least 1".into(),
        ));
    }
    if config.brightness > 15 {
        return Err(DotnoteError::InvalidConfig(format!(
            "brightness must be 0-15, got {}",
            config.brightness
        )));
    }
    if ![-90, 0, 90, 180].contains(&config.block_orientation) {
        return Err(DotnoteError::InvalidConfig(format!(
            "block_orientation must be -90, 0, 90 or 180, got {}",
            config.block_orientation
        )));
    }
    if ![0, 2].contains(&config.rotate) {
        return Err(DotnoteError::InvalidConfig(format!(
            "rotate must be 0 or 2, got {}",
            config.rotate
        )));
    }
    Ok(())
}
