use crate::config::ConfigError;
use crate::document::{DocumentError, EmitError};
use crate::telemetry::TelemetryError;
use crate::transfer::ReadError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Document(DocumentError),
    Read(ReadError),
    Emit(EmitError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Document(err) => write!(f, "document error: {}", err),
            AppError::Read(err) => write!(f, "transfer error: {}", err),
            AppError::Emit(err) => write!(f, "response error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Document(err) => Some(err),
            AppError::Read(err) => Some(err),
            AppError::Emit(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DocumentError> for AppError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<ReadError> for AppError {
    fn from(value: ReadError) -> Self {
        Self::Read(value)
    }
}

impl From<EmitError> for AppError {
    fn from(value: EmitError) -> Self {
        Self::Emit(value)
    }
}
