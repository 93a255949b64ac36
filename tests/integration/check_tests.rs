//! Permission checks against a live service over both transports.

use relcheck::{CheckOutcome, CheckRequest, ErrorKind, ObjectReference, OutcomeKind, Transport};
use test_case::test_case;

use crate::common::{client_with_token, token, TestFixture};

fn transports() -> Vec<Transport> {
    let mut transports = vec![Transport::Http];
    if cfg!(feature = "grpc") {
        transports.push(Transport::Grpc);
    }
    transports
}

#[tokio::test]
async fn test_viewer_is_granted() {
    let fixture = TestFixture::create().await.expect("seed data");

    for transport in transports() {
        let outcome = fixture
            .client(transport)
            .expect("client")
            .check(
                ObjectReference::new("task", fixture.task_id.as_str()),
                "view",
                ObjectReference::new("user", fixture.viewer_id.as_str()),
            )
            .await;
        assert!(outcome.is_granted(), "{transport}: {outcome}");
    }
}

#[tokio::test]
async fn test_outsider_is_denied() {
    let fixture = TestFixture::create().await.expect("seed data");

    for transport in transports() {
        let outcome = fixture
            .client(transport)
            .expect("client")
            .check(
                ObjectReference::new("task", fixture.task_id.as_str()),
                "view",
                ObjectReference::new("user", fixture.outsider_id.as_str()),
            )
            .await;
        assert!(outcome.is_denied(), "{transport}: {outcome}");
    }
}

#[tokio::test]
async fn test_repeated_check_is_stable() {
    let fixture = TestFixture::create().await.expect("seed data");
    let request = CheckRequest::new(
        ObjectReference::new("task", fixture.task_id.as_str()),
        "view",
        ObjectReference::new("user", fixture.viewer_id.as_str()),
    );

    for transport in transports() {
        let client = fixture.client(transport).expect("client");
        let first = client.check_request(request.clone()).await.kind();
        let second = client.check_request(request.clone()).await.kind();
        assert_eq!(first, second, "{transport}");
    }
}

#[test_case(Transport::Http ; "http")]
#[test_case(Transport::Grpc ; "grpc")]
#[tokio::test]
async fn test_wrong_key_fails_rather_than_denies(transport: Transport) {
    if transport.is_grpc() && !cfg!(feature = "grpc") {
        return;
    }
    let fixture = TestFixture::create().await.expect("seed data");
    let client = client_with_token(transport, "not-the-key").expect("client");

    let outcome = client
        .check(
            ObjectReference::new("task", fixture.task_id.as_str()),
            "view",
            ObjectReference::new("user", fixture.viewer_id.as_str()),
        )
        .await;

    match outcome {
        CheckOutcome::Failed(error) => assert_eq!(error.kind(), ErrorKind::Unauthorized),
        other => assert_eq!(other.kind(), OutcomeKind::Failed, "{transport}: {other}"),
    }
}

#[tokio::test]
async fn test_unknown_definition_fails() {
    TestFixture::create().await.expect("seed data");

    for transport in transports() {
        let outcome = client_with_token(transport, &token())
            .expect("client")
            .check(
                ObjectReference::new("tusk", "task-001"),
                "view",
                ObjectReference::new("user", "user-001"),
            )
            .await;
        assert!(outcome.is_failed(), "{transport}: {outcome}");
        assert!(!outcome.is_denied());
    }
}
