//! Error recovery strategies for different types of errors.
//!
//! Controllers never hand an error back to their caller. Every failure is
//! routed through an [`ErrorReporter`] and turned into one of the recovery
//! results below, so the experience keeps moving even when the network or a
//! platform capability does not.

use crate::{CoreError, ErrorExt, ErrorReporter};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::info;

/// Recovery strategy for handling errors
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryStrategy {
    /// Retry the operation with exponential backoff
    RetryWithBackoff {
        max_attempts: usize,
        initial_delay: Duration,
        max_delay: Duration,
    },
    /// Substitute a fallback value
    Fallback,
    /// Skip the operation and continue
    Skip,
    /// Continue with reduced functionality
    Degrade,
    /// Fail immediately
    Fail,
}

/// Result of an error recovery attempt
#[derive(Debug)]
pub enum RecoveryResult<T> {
    /// The operation succeeded, possibly after retries
    Recovered(T),
    /// The operation failed and a fallback value was substituted
    Degraded(T),
    /// The operation failed and was skipped
    Skipped,
    /// The operation failed
    Failed(CoreError),
}

impl<T> RecoveryResult<T> {
    pub fn is_recovered(&self) -> bool {
        matches!(self, RecoveryResult::Recovered(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, RecoveryResult::Degraded(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RecoveryResult::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RecoveryResult::Failed(_))
    }

    /// The value if recovered or degraded.
    pub fn value(self) -> Option<T> {
        match self {
            RecoveryResult::Recovered(value) | RecoveryResult::Degraded(value) => Some(value),
            _ => None,
        }
    }

    pub fn err(self) -> Option<CoreError> {
        match self {
            RecoveryResult::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            RecoveryResult::Recovered(_) => Outcome::Completed,
            RecoveryResult::Degraded(_) => Outcome::Degraded,
            RecoveryResult::Skipped => Outcome::Skipped,
            RecoveryResult::Failed(_) => Outcome::Failed,
        }
    }
}

/// What a controller operation ended up doing. Failure details live in the
/// diagnostic history, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    Degraded,
    Skipped,
    Failed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Completed | Outcome::Degraded)
    }
}

/// Error recovery handler that provides strategies for different error types
pub struct ErrorRecovery;

impl ErrorRecovery {
    /// Determine the appropriate recovery strategy for a given error
    pub fn determine_strategy(error: &CoreError) -> RecoveryStrategy {
        match error {
            CoreError::Gateway(gateway) if !gateway.is_retryable() => RecoveryStrategy::Fallback,
            CoreError::Gateway(_) => RecoveryStrategy::RetryWithBackoff {
                max_attempts: 3,
                initial_delay: Duration::from_secs(1),
                max_delay: Duration::from_secs(30),
            },

            CoreError::Network(_) if error.is_retryable() => RecoveryStrategy::RetryWithBackoff {
                max_attempts: 3,
                initial_delay: Duration::from_secs(1),
                max_delay: Duration::from_secs(30),
            },
            CoreError::Network(_) => RecoveryStrategy::Fallback,

            // A missing or failing capability always has an alternate path
            CoreError::Capability(_) => RecoveryStrategy::Fallback,

            // Configuration errors need user intervention
            CoreError::Config(_) => RecoveryStrategy::Fail,

            CoreError::Timeout { .. } => RecoveryStrategy::RetryWithBackoff {
                max_attempts: 1,
                initial_delay: Duration::from_secs(5),
                max_delay: Duration::from_secs(10),
            },

            CoreError::InvalidInput { .. } | CoreError::InvalidTransition { .. } => {
                RecoveryStrategy::Skip
            }

            CoreError::Internal { .. } => RecoveryStrategy::Degrade,

            CoreError::Io(_) => RecoveryStrategy::RetryWithBackoff {
                max_attempts: 3,
                initial_delay: Duration::from_secs(1),
                max_delay: Duration::from_secs(30),
            },

            CoreError::Serialization(_) => RecoveryStrategy::Fallback,
        }
    }

    /// Apply a strategy that needs no substitute value. `Fallback` and
    /// `Degrade` fail here because there is nothing to fall back to.
    pub async fn apply_strategy<F, T, Fut>(
        strategy: RecoveryStrategy,
        reporter: &ErrorReporter,
        operation_name: &str,
        operation: F,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        Self::run(strategy, reporter, operation_name, operation, None::<fn() -> T>).await
    }

    /// Apply a strategy, substituting `fallback()` when the strategy is
    /// `Fallback` or `Degrade` and the operation fails.
    pub async fn apply_with_fallback<F, T, Fut, D>(
        strategy: RecoveryStrategy,
        reporter: &ErrorReporter,
        operation_name: &str,
        operation: F,
        fallback: D,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
        D: FnOnce() -> T,
    {
        Self::run(strategy, reporter, operation_name, operation, Some(fallback)).await
    }

    async fn run<F, T, Fut, D>(
        strategy: RecoveryStrategy,
        reporter: &ErrorReporter,
        operation_name: &str,
        mut operation: F,
        fallback: Option<D>,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
        D: FnOnce() -> T,
    {
        match strategy {
            RecoveryStrategy::RetryWithBackoff {
                max_attempts,
                initial_delay,
                max_delay,
            } => {
                match Self::retry_with_backoff(operation, max_attempts, initial_delay, max_delay)
                    .await
                {
                    Ok(value) => RecoveryResult::Recovered(value),
                    Err(error) => {
                        reporter.report_error(operation_name, &error);
                        RecoveryResult::Failed(error)
                    }
                }
            }
            RecoveryStrategy::Fallback | RecoveryStrategy::Degrade => match operation().await {
                Ok(value) => RecoveryResult::Recovered(value),
                Err(error) => match fallback {
                    Some(fallback) => {
                        reporter.report_warning(operation_name, &error);
                        RecoveryResult::Degraded(fallback())
                    }
                    None => {
                        reporter.report_error(operation_name, &error);
                        RecoveryResult::Failed(error)
                    }
                },
            },
            RecoveryStrategy::Skip => match operation().await {
                Ok(value) => RecoveryResult::Recovered(value),
                Err(error) => {
                    reporter.report_warning(operation_name, &error);
                    RecoveryResult::Skipped
                }
            },
            RecoveryStrategy::Fail => match operation().await {
                Ok(value) => RecoveryResult::Recovered(value),
                Err(error) => {
                    reporter.report_error(operation_name, &error);
                    RecoveryResult::Failed(error)
                }
            },
        }
    }

    /// Retry an operation with exponential backoff
    async fn retry_with_backoff<F, T, Fut>(
        mut operation: F,
        max_attempts: usize,
        initial_delay: Duration,
        max_delay: Duration,
    ) -> Result<T, CoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut attempt = 0;
        let mut delay = initial_delay;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    attempt += 1;

                    if attempt >= max_attempts || !error.is_retryable() {
                        return Err(error);
                    }

                    if let Some(retry_delay) = error.retry_after() {
                        delay = retry_delay;
                    }
                    if delay > max_delay {
                        delay = max_delay;
                    }

                    info!(
                        "Recovery attempt {}/{} failed. Retrying after {:?}: {}",
                        attempt,
                        max_attempts,
                        delay,
                        error.user_friendly_message()
                    );

                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, max_delay);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CapabilityError, ConfigError, FailureKind, GatewayError, Severity};
    use std::cell::Cell;
    use std::io;

    fn server_error() -> CoreError {
        CoreError::Gateway(GatewayError::ServerError {
            endpoint: "/api/sync".to_string(),
            status: 500,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_with_backoff_failure() {
        let reporter = ErrorReporter::new();
        let strategy = RecoveryStrategy::RetryWithBackoff {
            max_attempts: 2,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(100),
        };
        let attempts = Cell::new(0);

        let result: RecoveryResult<&str> =
            ErrorRecovery::apply_strategy(strategy, &reporter, "sync", || {
                attempts.set(attempts.get() + 1);
                async { Err(server_error()) }
            })
            .await;

        assert!(result.is_failed());
        assert_eq!(attempts.get(), 2);
        assert_eq!(reporter.diagnostics_for("sync").len(), 1);
    }

    #[tokio::test]
    async fn test_skip_strategy_reports_warning() {
        let reporter = ErrorReporter::new();
        let result: RecoveryResult<&str> =
            ErrorRecovery::apply_strategy(RecoveryStrategy::Skip, &reporter, "sync", || async {
                Err(server_error())
            })
            .await;

        assert!(result.is_skipped());
        assert_eq!(result.outcome(), Outcome::Skipped);
        let diagnostics = reporter.diagnostics();
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].kind, FailureKind::NetworkFailure);
    }

    #[tokio::test]
    async fn test_fallback_substitutes_value() {
        let reporter = ErrorReporter::new();
        let result = ErrorRecovery::apply_with_fallback(
            RecoveryStrategy::Fallback,
            &reporter,
            "generate_portrait",
            || async { Err::<&str, _>(server_error()) },
            || "demo",
        )
        .await;

        assert!(result.is_degraded());
        assert_eq!(result.value(), Some("demo"));
        assert_eq!(reporter.diagnostics_for("generate_portrait").len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_not_used_on_success() {
        let reporter = ErrorReporter::new();
        let result = ErrorRecovery::apply_with_fallback(
            RecoveryStrategy::Fallback,
            &reporter,
            "generate_portrait",
            || async { Ok("generated") },
            || "demo",
        )
        .await;

        assert_eq!(result.outcome(), Outcome::Completed);
        assert_eq!(result.value(), Some("generated"));
        assert!(reporter.diagnostics().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_without_value_fails() {
        let reporter = ErrorReporter::new();
        let result: RecoveryResult<()> = ErrorRecovery::apply_strategy(
            RecoveryStrategy::Fallback,
            &reporter,
            "load_data",
            || async { Err(server_error()) },
        )
        .await;

        assert!(result.is_failed());
        assert_eq!(reporter.diagnostics()[0].severity, Severity::Error);
    }

    #[test]
    fn test_determine_strategy() {
        let io_error = CoreError::Io(io::Error::new(io::ErrorKind::Other, "test"));
        assert!(matches!(
            ErrorRecovery::determine_strategy(&io_error),
            RecoveryStrategy::RetryWithBackoff { .. }
        ));

        let config_error = CoreError::Config(ConfigError::ValidationFailed {
            reason: "test".to_string(),
        });
        assert_eq!(
            ErrorRecovery::determine_strategy(&config_error),
            RecoveryStrategy::Fail
        );

        assert!(matches!(
            ErrorRecovery::determine_strategy(&server_error()),
            RecoveryStrategy::RetryWithBackoff {
                max_attempts: 3,
                ..
            }
        ));

        let bad_request = CoreError::Gateway(GatewayError::ServerError {
            endpoint: "/api/analyze".to_string(),
            status: 400,
        });
        assert_eq!(
            ErrorRecovery::determine_strategy(&bad_request),
            RecoveryStrategy::Fallback
        );

        let missing_clipboard = CoreError::Capability(CapabilityError::unavailable("clipboard"));
        assert_eq!(
            ErrorRecovery::determine_strategy(&missing_clipboard),
            RecoveryStrategy::Fallback
        );
    }
}
