use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Cannot {action} while in step '{from}'")]
    InvalidTransition { from: String, action: String },

    #[error("Operation timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Server returned {status} for {endpoint}")]
    ServerError { endpoint: String, status: u16 },

    #[error("Request to {endpoint} timed out")]
    RequestTimeout { endpoint: String },

    #[error("Invalid response from {endpoint}: {details}")]
    InvalidResponse { endpoint: String, details: String },

    #[error("API endpoint unavailable: {endpoint}")]
    EndpointUnavailable { endpoint: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("{capability} is not available on this platform")]
    Unavailable { capability: String },

    #[error("{capability} failed: {reason}")]
    Failed { capability: String, reason: String },

    #[error("{capability} was cancelled by the user")]
    UserCancelled { capability: String },
}

impl CapabilityError {
    pub fn unavailable(capability: impl Into<String>) -> Self {
        Self::Unavailable {
            capability: capability.into(),
        }
    }

    pub fn failed(capability: impl Into<String>, reason: impl ToString) -> Self {
        Self::Failed {
            capability: capability.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration format: {details}")]
    InvalidFormat { details: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
