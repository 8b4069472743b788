use config::{Config, ConfigError};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    device: Device,
    sensors: Sensors,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppConfigError> {
        let config = Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("BRIDGE").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn sensors(&self) -> &Sensors {
        &self.sensors
    }
}

#[derive(Error, Debug)]
pub enum AppConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct Core {
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_message_buffer_size")]
    message_buffer_size: usize,
}

impl Core {
    // Unknown levels fall back to INFO rather than refusing to start.
    pub fn log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }

    pub fn message_buffer_size(&self) -> usize {
        self.message_buffer_size
    }
}

#[derive(Debug, Deserialize)]
pub struct Device {
    #[serde(default = "default_name_filter")]
    name_filter: String,
    address: Option<String>,
    #[serde(with = "humantime_serde", default = "default_scan_timeout")]
    scan_timeout: Duration,
}

impl Device {
    pub fn name_filter(&self) -> &str {
        &self.name_filter
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn scan_timeout(&self) -> Duration {
        self.scan_timeout
    }
}

#[derive(Debug, Deserialize)]
pub struct Sensors {
    #[serde(with = "humantime_serde", default = "default_interval")]
    interval: Duration,
    #[serde(default = "default_gas_mode")]
    gas_mode: u8,
}

impl Sensors {
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn gas_mode(&self) -> u8 {
        self.gas_mode
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_message_buffer_size() -> usize {
    64
}

fn default_name_filter() -> String {
    "Thingy".to_string()
}

fn default_scan_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_gas_mode() -> u8 {
    1
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core {
                    log_level: default_log_level(),
                    message_buffer_size: 16,
                },
                device: Device {
                    name_filter: default_name_filter(),
                    address: None,
                    scan_timeout: Duration::from_secs(5),
                },
                sensors: Sensors {
                    interval: default_interval(),
                    gas_mode: default_gas_mode(),
                },
            },
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.sensors.interval = interval;
        self
    }

    pub fn gas_mode(mut self, mode: u8) -> Self {
        self.config.sensors.gas_mode = mode;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
