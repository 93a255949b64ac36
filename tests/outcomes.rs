//! Outcome classification through the public client API.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use relcheck::testing::MockTransport;
use relcheck::transport::{CallbackAdapter, CallbackTransport, CheckCallback};
use relcheck::{
    CheckOutcome, CheckRequest, Client, DenialReason, Error, ErrorKind, ObjectReference,
    OutcomeKind, Permissionship,
};
use test_case::test_case;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("relcheck=debug")
        .with_test_writer()
        .try_init();
}

fn task_view_request() -> CheckRequest {
    CheckRequest::new(
        ObjectReference::new("task", "task-001"),
        "view",
        ObjectReference::new("user", "user-001"),
    )
}

async fn check_against(reply: Permissionship) -> CheckOutcome {
    let mock = MockTransport::new().on(task_view_request(), reply);
    Client::from_transport(Arc::new(mock))
        .check(
            ObjectReference::new("task", "task-001"),
            "view",
            ObjectReference::new("user", "user-001"),
        )
        .await
}

#[test_case(Permissionship::HasPermission => OutcomeKind::Granted ; "has permission")]
#[test_case(Permissionship::NoPermission => OutcomeKind::Denied ; "no permission")]
#[test_case(Permissionship::Unspecified => OutcomeKind::Indeterminate ; "unspecified")]
#[test_case(Permissionship::from(3) => OutcomeKind::Unrecognized ; "code three")]
#[tokio::test]
async fn test_reply_classification(reply: Permissionship) -> OutcomeKind {
    check_against(reply).await.kind()
}

#[tokio::test]
async fn test_unrecognized_carries_code() {
    init_tracing();
    match check_against(Permissionship::from(3)).await {
        CheckOutcome::Unrecognized(code) => assert_eq!(code, 3),
        other => panic!("expected Unrecognized(3), got {other}"),
    }
}

#[tokio::test]
async fn test_transport_error_is_failed_not_denied() {
    init_tracing();
    let mock = MockTransport::new();
    mock.fail_next(Error::connection("connection refused"));
    let client = Client::from_transport(Arc::new(mock));

    let outcome = client.check_request(task_view_request()).await;

    assert!(outcome.is_failed());
    assert!(!outcome.is_denied());
    assert!(outcome.to_string().starts_with("failed: "));
    let error = outcome.error().unwrap();
    assert_eq!(error.kind(), ErrorKind::Connection);
    assert!(error.message().contains("connection refused"));
}

#[tokio::test]
async fn test_identical_requests_get_identical_outcomes() {
    let mock = MockTransport::new().on(task_view_request(), Permissionship::NoPermission);
    let client = Client::from_transport(Arc::new(mock.clone()));

    let first = client.check_request(task_view_request()).await.kind();
    let second = client.check_request(task_view_request()).await.kind();

    assert_eq!(first, second);
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn test_concurrent_checks_share_one_transport() {
    let mock = MockTransport::grant_all().with_delay(Duration::from_millis(20));
    let client = Client::from_transport(Arc::new(mock.clone()));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .check(
                        ObjectReference::new("task", format!("task-{i:03}")),
                        "view",
                        ObjectReference::new("user", "user-001"),
                    )
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_granted());
    }
    assert_eq!(mock.stats().requests_sent, 16);
}

#[tokio::test]
async fn test_require_reports_reason() {
    let request = task_view_request();

    let indeterminate = check_against(Permissionship::Unspecified)
        .await
        .require(&request)
        .unwrap_err();
    assert_eq!(indeterminate.reason(), DenialReason::Indeterminate);
    assert!(!indeterminate.is_explicit_denial());

    let denied = check_against(Permissionship::NoPermission)
        .await
        .require(&request)
        .unwrap_err();
    assert!(denied.is_explicit_denial());
    assert_eq!(denied.resource(), "task:task-001");
}

/// Replies twice, the second time with a different answer.
struct ChattyTransport;

impl CallbackTransport for ChattyTransport {
    fn start_check(&self, _request: CheckRequest, callback: CheckCallback) {
        tokio::spawn(async move {
            callback.complete(None, Some(Permissionship::HasPermission));
            callback.complete(None, Some(Permissionship::NoPermission));
        });
    }
}

/// Signals an error and a value in the same completion.
struct ConflictedTransport;

impl CallbackTransport for ConflictedTransport {
    fn start_check(&self, _request: CheckRequest, callback: CheckCallback) {
        callback.complete(
            Some(Error::unavailable("backend went away")),
            Some(Permissionship::HasPermission),
        );
    }
}

#[tokio::test]
async fn test_callback_transport_first_reply_wins() {
    let client = Client::from_transport(Arc::new(CallbackAdapter::new(ChattyTransport)));
    assert!(client.check_request(task_view_request()).await.is_granted());
}

#[tokio::test]
async fn test_callback_transport_error_wins_over_value() {
    let client = Client::from_transport(Arc::new(CallbackAdapter::new(ConflictedTransport)));
    let outcome = client.check_request(task_view_request()).await;
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::Unavailable);
}

proptest! {
    #[test]
    fn prop_every_reply_maps_to_exactly_one_outcome(code in any::<i32>()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let outcome = runtime.block_on(check_against(Permissionship::from(code)));

        let expected = match code {
            0 => OutcomeKind::Indeterminate,
            1 => OutcomeKind::Denied,
            2 => OutcomeKind::Granted,
            _ => OutcomeKind::Unrecognized,
        };
        prop_assert_eq!(outcome.kind(), expected);
        prop_assert_eq!(outcome.is_granted(), code == 2);
    }
}
