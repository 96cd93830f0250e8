use super::*;
use crate::transport::command::CommandKind;
use serde_json::json;

fn command() -> BridgeCommand {
    BridgeCommand::new(CommandKind::SetState, "192.168.1.50", json!({ "on": true }))
}

fn fast(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff_ms: 0,
        ..RetryPolicy::default()
    }
}

struct Always(TransportFailure);

impl DeviceTransport for Always {
    fn send(&mut self, _: &BridgeCommand) -> Result<serde_json::Value, TransportFailure> {
        Err(self.0.clone())
    }
}

#[test]
fn first_attempt_success() {
    let mut t = InMemoryTransport::new();
    let report = deliver(&mut t, &command(), &fast(3));
    assert!(report.succeeded);
    assert_eq!(report.attempts, 1);
    assert_eq!(report.response, Some(json!({ "success": true })));
    assert_eq!(t.sent().len(), 1);
}

#[test]
fn transient_failures_are_retried() {
    let mut t = InMemoryTransport::failing(2);
    let mut waits = Vec::new();
    let report = deliver_with(&mut t, &command(), &RetryPolicy::default(), |d| {
        waits.push(d)
    });
    assert!(report.succeeded);
    assert_eq!(report.attempts, 3);
    assert_eq!(
        waits,
        vec![Duration::from_millis(250), Duration::from_millis(500)]
    );
}

#[test]
fn gives_up_after_max_attempts() {
    let mut t = InMemoryTransport::failing(10);
    let report = deliver(&mut t, &command(), &fast(3));
    assert!(!report.succeeded);
    assert_eq!(report.attempts, 3);
    assert!(matches!(
        report.last_error,
        Some(TransportFailure::Unreachable(_))
    ));
    assert!(report.into_result().is_err());
}

#[test]
fn client_errors_are_not_retried() {
    let mut t = Always(TransportFailure::Status(400));
    let report = deliver(&mut t, &command(), &fast(5));
    assert_eq!(report.attempts, 1);
    assert_eq!(report.last_error, Some(TransportFailure::Status(400)));
}

#[test]
fn server_errors_and_timeouts_are_retryable() {
    assert!(TransportFailure::Status(503).is_retryable());
    assert!(TransportFailure::Status(429).is_retryable());
    assert!(TransportFailure::Timeout.is_retryable());
    assert!(!TransportFailure::Status(404).is_retryable());
}

#[test]
fn missing_controller_address_fails_without_attempting() {
    let mut t = InMemoryTransport::new();
    let cmd = BridgeCommand::new(CommandKind::SetState, "  ", json!({}));
    let report = deliver(&mut t, &cmd, &fast(3));
    assert_eq!(report.attempts, 0);
    assert!(!report.succeeded);
    assert!(t.sent().is_empty());
}

#[test]
fn zero_max_attempts_still_tries_once() {
    let mut t = InMemoryTransport::new();
    let report = deliver(&mut t, &command(), &fast(0));
    assert_eq!(report.attempts, 1);
    assert!(report.succeeded);
}

#[test]
fn backoff_grows_and_is_capped() {
    let p = RetryPolicy::default();
    assert_eq!(p.backoff(1), Duration::from_millis(250));
    assert_eq!(p.backoff(3), Duration::from_millis(1_000));
    assert_eq!(p.backoff(10), Duration::from_millis(2_000));
}

#[test]
fn policy_fills_missing_fields_from_defaults() {
    let p: RetryPolicy = serde_json::from_value(json!({ "maxAttempts": 5 })).unwrap();
    assert_eq!(p.max_attempts, 5);
    assert_eq!(p.initial_backoff_ms, 250);
    assert_eq!(RetryPolicy::no_retry().max_attempts, 1);
}
