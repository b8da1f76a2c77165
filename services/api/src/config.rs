//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub allowed_origin: String,
    /// How long the mock call shows "connecting" before it starts counting.
    pub call_connect_delay: Duration,
    pub call_tick_interval: Duration,
    /// How long clients display the booking success acknowledgment.
    pub booking_ack_duration: Duration,
    pub upload_ack_duration: Duration,
    pub seed_demo_appointment: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: Level::INFO,
            allowed_origin: "http://localhost:5173".to_string(),
            call_connect_delay: Duration::from_millis(2000),
            call_tick_interval: Duration::from_millis(1000),
            booking_ack_duration: Duration::from_millis(2500),
            upload_ack_duration: Duration::from_millis(2000),
            seed_demo_appointment: true,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Server Settings ---
        let bind_address = match lookup("BIND_ADDRESS") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
            })?,
            None => defaults.bind_address,
        };

        let log_level = match lookup("RUST_LOG") {
            Some(raw) => raw.parse::<Level>().map_err(|_| {
                ConfigError::InvalidValue(
                    "RUST_LOG".to_string(),
                    format!("'{}' is not a valid log level", raw),
                )
            })?,
            None => defaults.log_level,
        };

        let allowed_origin = lookup("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin);

        // --- Simulation Timers ---
        let millis = |key: &str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(key) {
                Some(raw) => raw
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
                None => Ok(default),
            }
        };
        let call_connect_delay = millis("CALL_CONNECT_DELAY_MS", defaults.call_connect_delay)?;
        let call_tick_interval = millis("CALL_TICK_MS", defaults.call_tick_interval)?;
        if call_tick_interval.is_zero() {
            return Err(ConfigError::InvalidValue(
                "CALL_TICK_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let booking_ack_duration = millis("BOOKING_ACK_MS", defaults.booking_ack_duration)?;
        let upload_ack_duration = millis("UPLOAD_ACK_MS", defaults.upload_ack_duration)?;

        // --- Demo Data ---
        let seed_demo_appointment = match lookup("SEED_DEMO_APPOINTMENT") {
            Some(raw) => raw.parse::<bool>().map_err(|e| {
                ConfigError::InvalidValue("SEED_DEMO_APPOINTMENT".to_string(), e.to_string())
            })?,
            None => defaults.seed_demo_appointment,
        };

        Ok(Self {
            bind_address,
            log_level,
            allowed_origin,
            call_connect_delay,
            call_tick_interval,
            booking_ack_duration,
            upload_ack_duration,
            seed_demo_appointment,
        })
    }
}
