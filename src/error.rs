// src/error.rs

//! Error types for controller configuration

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or converging controller state
#[derive(Debug, Error)]
pub enum Error {
    /// The vendor tool exited non-zero
    #[error("command '{command}' failed with exit code {exit_code:?}: {stderr}")]
    ShellExecution {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The vendor tool could not be started at all
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The vendor tool exceeded the caller-imposed timeout
    #[error("command '{command}' timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    /// The controller firmware rejected a command it does not implement
    #[error("controller does not support '{command}': {message}")]
    UnsupportedFeature { command: String, message: String },

    /// The text-protocol tool cannot address remote controllers
    #[error("{tool} cannot manage remote host '{host}'")]
    UnsupportedTarget { tool: String, host: String },

    #[error("invalid network mode: {0}")]
    InvalidMode(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Password write failed even after the factory reset retry
    #[error("failed to set password for user id {user_id} after factory reset")]
    PasswordResetExhausted { user_id: String },

    #[error("license activation rejected by controller (status {status:#04x})")]
    LicenseActivation { status: u8 },

    #[error("administrator account '{0}' not found on controller")]
    AdminUserNotFound(String),

    /// Tool output could not be interpreted
    #[error("unexpected response from {command}: {message}")]
    InvalidResponse { command: String, message: String },

    #[error("resource '{resource}' is not available for vendor '{vendor}'")]
    UnknownResource { vendor: String, resource: String },

    #[error("unknown vendor type: {0}")]
    UnknownVendor(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this is the firmware "not supported" signal that optional
    /// resources are allowed to skip over
    pub fn is_unsupported_feature(&self) -> bool {
        matches!(self, Self::UnsupportedFeature { .. })
    }

    pub(crate) fn invalid_response(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            command: command.into(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
