use crate::error::*;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info, warn};

/// Coarse failure taxonomy used by the controllers to pick a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NetworkFailure,
    CapabilityUnavailable,
    UserCancelled,
    Other,
}

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_retryable(&self) -> bool;
    fn retry_after(&self) -> Option<Duration>;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
    fn failure_kind(&self) -> FailureKind;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Gateway(e) => {
                error!("Gateway error details: {:?}", e);
            }
            CoreError::Capability(e) => {
                error!("Capability error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            CoreError::Gateway(e) => e.is_retryable(),
            CoreError::Capability(e) => e.is_retryable(),
            CoreError::Network(e) => e.is_timeout() || e.is_connect(),
            CoreError::Timeout { .. } => true,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            CoreError::Gateway(e) => e.retry_after(),
            CoreError::Timeout { seconds } => Some(Duration::from_secs(*seconds)),
            _ if self.is_retryable() => Some(Duration::from_secs(5)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Gateway(e) => e.user_friendly_message(),
            CoreError::Capability(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { .. } => {
                "Invalid input provided. Please check your input and try again.".to_string()
            }
            CoreError::InvalidTransition { action, .. } => {
                format!("You can't {} right now.", action)
            }
            CoreError::Timeout { .. } => {
                "The operation took too long to complete. Please try again.".to_string()
            }
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Gateway(e) => e.error_code(),
            CoreError::Capability(e) => e.error_code(),
            CoreError::Config(e) => e.error_code(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::InvalidTransition { .. } => "INVALID_TRANSITION".to_string(),
            CoreError::Timeout { .. } => "TIMEOUT".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }

    fn failure_kind(&self) -> FailureKind {
        match self {
            CoreError::Gateway(_)
            | CoreError::Network(_)
            | CoreError::Timeout { .. }
            | CoreError::Serialization(_) => FailureKind::NetworkFailure,
            CoreError::Capability(e) => e.failure_kind(),
            _ => FailureKind::Other,
        }
    }
}

impl ErrorExt for GatewayError {
    fn log_error(&self) -> &Self {
        error!("GatewayError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("GatewayError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            GatewayError::ServerError { status, .. } => *status >= 500,
            GatewayError::RequestTimeout { .. } => true,
            GatewayError::EndpointUnavailable { .. } => true,
            GatewayError::InvalidResponse { .. } => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        if self.is_retryable() {
            Some(Duration::from_secs(1))
        } else {
            None
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            GatewayError::ServerError { status, .. } if *status >= 500 => {
                "The server is having trouble right now. Please try again later.".to_string()
            }
            GatewayError::ServerError { status, .. } => {
                format!("The server rejected the request ({}).", status)
            }
            GatewayError::RequestTimeout { .. } => {
                "The server took too long to respond. Please try again.".to_string()
            }
            GatewayError::InvalidResponse { .. } => {
                "The server sent data we could not understand.".to_string()
            }
            GatewayError::EndpointUnavailable { endpoint } => {
                format!("{} is currently unavailable.", endpoint)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            GatewayError::ServerError { .. } => "GATEWAY_SERVER_ERROR".to_string(),
            GatewayError::RequestTimeout { .. } => "GATEWAY_TIMEOUT".to_string(),
            GatewayError::InvalidResponse { .. } => "GATEWAY_INVALID_RESPONSE".to_string(),
            GatewayError::EndpointUnavailable { .. } => "GATEWAY_UNAVAILABLE".to_string(),
        }
    }

    fn failure_kind(&self) -> FailureKind {
        FailureKind::NetworkFailure
    }
}

impl ErrorExt for CapabilityError {
    fn log_error(&self) -> &Self {
        error!("CapabilityError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CapabilityError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CapabilityError::Unavailable { capability } => {
                format!("{} isn't supported here.", capability)
            }
            CapabilityError::Failed { capability, .. } => {
                format!("{} didn't work. Trying another way.", capability)
            }
            CapabilityError::UserCancelled { .. } => "Share cancelled.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CapabilityError::Unavailable { .. } => "CAPABILITY_UNAVAILABLE".to_string(),
            CapabilityError::Failed { .. } => "CAPABILITY_FAILED".to_string(),
            CapabilityError::UserCancelled { .. } => "CAPABILITY_CANCELLED".to_string(),
        }
    }

    fn failure_kind(&self) -> FailureKind {
        match self {
            CapabilityError::UserCancelled { .. } => FailureKind::UserCancelled,
            _ => FailureKind::CapabilityUnavailable,
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false // Config errors need user intervention
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => {
                "Configuration file not found. Please check the path.".to_string()
            }
            ConfigError::InvalidFormat { .. } => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            _ => "Configuration error occurred. Please check your settings.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidFormat { .. } => "CONFIG_INVALID_FORMAT".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }

    fn failure_kind(&self) -> FailureKind {
        FailureKind::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A structured record of one reported failure.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub operation: String,
    pub code: String,
    pub kind: FailureKind,
    pub severity: Severity,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Diagnostics kept per reporter; older entries are dropped first.
pub const MAX_DIAGNOSTICS: usize = 256;

/// Diagnostic channel shared by the controllers.
///
/// Every reported failure is logged through `tracing` (subject to the
/// reporting flags) and appended to a bounded history that clones share.
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    report_errors: bool,
    report_warnings: bool,
    history: Arc<Mutex<VecDeque<Diagnostic>>>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            report_errors: true,
            report_warnings: true,
            history: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn with_error_reporting(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn with_warning_reporting(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn report_error(&self, operation: &str, error: &CoreError) {
        if self.report_errors {
            error!("{} failed", operation);
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
            if error.is_retryable() {
                if let Some(retry_after) = error.retry_after() {
                    info!("Error is retryable. Retry after: {:?}", retry_after);
                }
            }
        }
        self.record(operation, error, Severity::Error);
    }

    pub fn report_warning(&self, operation: &str, error: &CoreError) {
        if self.report_warnings {
            warn!("{} degraded", operation);
            error.log_warn();
        }
        self.record(operation, error, Severity::Warning);
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.history.lock() {
            Ok(history) => history.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn diagnostics_for(&self, operation: &str) -> Vec<Diagnostic> {
        self.diagnostics()
            .into_iter()
            .filter(|d| d.operation == operation)
            .collect()
    }

    pub fn clear(&self) {
        match self.history.lock() {
            Ok(mut history) => history.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    fn record(&self, operation: &str, error: &CoreError, severity: Severity) {
        let diagnostic = Diagnostic {
            operation: operation.to_string(),
            code: error.error_code(),
            kind: error.failure_kind(),
            severity,
            message: error.to_string(),
            at: Utc::now(),
        };
        let mut history = self
            .history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if history.len() == MAX_DIAGNOSTICS {
            history.pop_front();
        }
        history.push_back(diagnostic);
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_history() {
        let reporter = ErrorReporter::new();
        let clone = reporter.clone();

        clone.report_error(
            "load_data",
            &CoreError::Gateway(GatewayError::ServerError {
                endpoint: "/api/posts".to_string(),
                status: 500,
            }),
        );

        let diagnostics = reporter.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].operation, "load_data");
        assert_eq!(diagnostics[0].code, "GATEWAY_SERVER_ERROR");
        assert_eq!(diagnostics[0].kind, FailureKind::NetworkFailure);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn test_history_drops_oldest_beyond_capacity() {
        let reporter = ErrorReporter::new()
            .with_error_reporting(false)
            .with_warning_reporting(false);

        for i in 0..MAX_DIAGNOSTICS + 10 {
            reporter.report_warning(
                &format!("op_{}", i),
                &CoreError::InvalidInput {
                    message: "bad".to_string(),
                },
            );
        }

        let diagnostics = reporter.diagnostics();
        assert_eq!(diagnostics.len(), MAX_DIAGNOSTICS);
        assert_eq!(diagnostics[0].operation, "op_10");
        assert_eq!(
            diagnostics[MAX_DIAGNOSTICS - 1].operation,
            format!("op_{}", MAX_DIAGNOSTICS + 9)
        );
    }

    #[test]
    fn test_history_recorded_even_when_logging_disabled() {
        let reporter = ErrorReporter::new()
            .with_error_reporting(false)
            .with_warning_reporting(false);

        reporter.report_warning(
            "copy_text",
            &CoreError::Capability(CapabilityError::unavailable("clipboard")),
        );

        let diagnostics = reporter.diagnostics_for("copy_text");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, FailureKind::CapabilityUnavailable);
        assert_eq!(diagnostics[0].severity, Severity::Warning);

        reporter.clear();
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_user_cancelled_kind() {
        let error = CoreError::Capability(CapabilityError::UserCancelled {
            capability: "native share".to_string(),
        });
        assert_eq!(error.failure_kind(), FailureKind::UserCancelled);
        assert!(!error.is_retryable());
    }
}
