use crate::foundation::error::{LuminaError, LuminaResult};
use crate::transport::command::BridgeCommand;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why a single send attempt failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// The controller or bridge could not be reached.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// No response within the transport's timeout.
    #[error("timed out")]
    Timeout,

    /// The controller answered with a non-success HTTP status.
    #[error("http status {0}")]
    Status(u16),

    /// The command itself is unusable; retrying cannot help.
    #[error("invalid command: {0}")]
    Invalid(String),
}

impl TransportFailure {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::Timeout => true,
            Self::Status(code) => *code >= 500 || *code == 408 || *code == 429,
            Self::Invalid(_) => false,
        }
    }
}

/// Something that can carry a [`BridgeCommand`] to a controller.
pub trait DeviceTransport {
    /// Make one attempt, returning the controller's JSON response.
    fn send(&mut self, command: &BridgeCommand) -> Result<serde_json::Value, TransportFailure>;
}

/// Bounded exponential backoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Total attempts including the first; zero behaves like one.
    pub max_attempts: u32,
    /// Wait before the second attempt.
    pub initial_backoff_ms: u64,
    /// Growth factor between consecutive waits.
    pub multiplier: f64,
    /// Upper bound on any single wait.
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 250,
            multiplier: 2.0,
            max_backoff_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Wait after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let ms = self.initial_backoff_ms as f64 * self.multiplier.max(1.0).powi(exp);
        let capped = ms.min(self.max_backoff_ms as f64);
        Duration::from_millis(capped as u64)
    }
}

/// Outcome of [`deliver`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    /// Attempts actually made.
    pub attempts: u32,
    pub succeeded: bool,
    /// Controller response of the successful attempt.
    pub response: Option<serde_json::Value>,
    /// Failure of the last attempt, when none succeeded.
    pub last_error: Option<TransportFailure>,
}

impl DeliveryReport {
    /// Response on success, [`LuminaError::Transport`] otherwise.
    pub fn into_result(self) -> LuminaResult<serde_json::Value> {
        match (self.succeeded, self.last_error) {
            (true, _) => Ok(self.response.unwrap_or(serde_json::Value::Null)),
            (false, Some(e)) => Err(LuminaError::transport(format!(
                "delivery failed after {} attempt(s): {e}",
                self.attempts
            ))),
            (false, None) => Err(LuminaError::transport("delivery failed")),
        }
    }
}

/// Send `command` through `transport`, retrying retryable failures per `policy`.
///
/// A command without a controller address fails before any attempt is made.
#[tracing::instrument(
    skip_all,
    fields(action = command.kind.action(), ip = command.controller_ip.as_str())
)]
pub fn deliver<T: DeviceTransport + ?Sized>(
    transport: &mut T,
    command: &BridgeCommand,
    policy: &RetryPolicy,
) -> DeliveryReport {
    deliver_with(transport, command, policy, std::thread::sleep)
}

pub(crate) fn deliver_with<T, S>(
    transport: &mut T,
    command: &BridgeCommand,
    policy: &RetryPolicy,
    mut sleep: S,
) -> DeliveryReport
where
    T: DeviceTransport + ?Sized,
    S: FnMut(Duration),
{
    if command.controller_ip.trim().is_empty() {
        return DeliveryReport {
            attempts: 0,
            succeeded: false,
            response: None,
            last_error: Some(TransportFailure::Invalid("no controller address".to_string())),
        };
    }

    let max = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match transport.send(command) {
            Ok(response) => {
                tracing::debug!(attempt, "delivered");
                return DeliveryReport {
                    attempts: attempt,
                    succeeded: true,
                    response: Some(response),
                    last_error: None,
                };
            }
            Err(e) if attempt >= max || !e.is_retryable() => {
                tracing::warn!(attempt, error = %e, "send failed, giving up");
                return DeliveryReport {
                    attempts: attempt,
                    succeeded: false,
                    response: None,
                    last_error: Some(e),
                };
            }
            Err(e) => {
                let wait = policy.backoff(attempt);
                tracing::warn!(
                    attempt,
                    error = %e,
                    wait_ms = wait.as_millis() as u64,
                    "send failed, retrying"
                );
                sleep(wait);
            }
        }
    }
}

/// In-memory transport for tests and dry runs.
///
/// Fails the first `failures` sends with [`TransportFailure::Unreachable`], then answers
/// `{"success": true}`.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    failures: u32,
    sent: Vec<BridgeCommand>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose first `failures` sends fail.
    pub fn failing(failures: u32) -> Self {
        Self {
            failures,
            sent: Vec::new(),
        }
    }

    /// Every command passed to `send`, failed attempts included.
    pub fn sent(&self) -> &[BridgeCommand] {
        &self.sent
    }
}

impl DeviceTransport for InMemoryTransport {
    fn send(&mut self, command: &BridgeCommand) -> Result<serde_json::Value, TransportFailure> {
        self.sent.push(command.clone());
        if self.failures > 0 {
            self.failures -= 1;
            return Err(TransportFailure::Unreachable(command.url()));
        }
        Ok(serde_json::json!({ "success": true }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transport/retry.rs"]
mod tests;
