use std::env;
use std::fmt;

use crate::transfer::ResponseMode;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub return_application: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("MAGI_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("MAGI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let return_application = parse_flag(
            &env::var("MAGI_RETURN_APPLICATION").unwrap_or_else(|_| "false".to_string()),
        )?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            return_application,
        })
    }

    /// Response mode the loaded configuration asks for.
    pub fn response_mode(&self) -> ResponseMode {
        if self.return_application {
            ResponseMode::FullApplication
        } else {
            ResponseMode::DeterminationOnly
        }
    }
}

fn parse_flag(value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidReturnFlag {
            value: value.to_string(),
        }),
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidReturnFlag { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidReturnFlag { value } => {
                write!(
                    f,
                    "MAGI_RETURN_APPLICATION must be a boolean flag, got {value:?}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
