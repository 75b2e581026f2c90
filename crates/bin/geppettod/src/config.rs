//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `geppetto.toml` in the working directory, or at the path in
//! `GEPPETTO_CONFIG`. Every field has a default so the file is optional,
//! although without events or schedule windows nothing will ever fire.
//! Environment variables take precedence over file values.

use serde::Deserialize;

use geppetto_domain::config::ScheduleConfig;

const DEFAULT_PATH: &str = "geppetto.toml";

/// Top-level configuration.
///
/// The schedule keys (`events`, `schedule`, `location`) live at the top
/// level of the file next to the daemon sections.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Device service locations.
    pub services: ServicesConfig,
    /// Names handled by the lights service.
    pub lights: Vec<String>,
    /// Names handled by the switches service.
    pub switches: Vec<String>,
    #[serde(flatten)]
    pub schedule: ScheduleConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Base URLs of the device services.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub light: String,
    pub switch: String,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("GEPPETTO_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("GEPPETTO_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("GEPPETTO_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("GEPPETTO_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("GEPPETTO_LIGHT_URL") {
            self.services.light = val;
        }
        if let Ok(val) = std::env::var("GEPPETTO_SWITCH_URL") {
            self.services.switch = val;
        }
        if let Ok(val) = std::env::var("GEPPETTO_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        let location = self.schedule.location;
        if !(-90.0..=90.0).contains(&location.latitude) {
            return Err(ConfigError::Validation(format!(
                "latitude {} is outside -90..=90",
                location.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&location.longitude) {
            return Err(ConfigError::Validation(format!(
                "longitude {} is outside -180..=180",
                location.longitude
            )));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "geppettod=info,geppetto_app=info,geppetto_adapter_devices_http=info,tower_http=debug"
                .to_string(),
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            light: "http://localhost:4200/".to_string(),
            switch: "http://localhost:4201/".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
