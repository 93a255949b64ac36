//! Common test harness for relcheck integration tests.
//!
//! Seeds a schema and relationships through the HTTP gateway, then hands out
//! clients for either transport.

use std::time::Duration;

use anyhow::{Context, Result};
use relcheck::{Client, Transport};
use reqwest::Client as HttpClient;
use serde_json::json;
use uuid::Uuid;

pub const SCHEMA: &str = r#"
definition user {}

definition task {
    relation viewer: user
    permission view = viewer
}
"#;

pub fn grpc_endpoint() -> String {
    std::env::var("SPICEDB_ENDPOINT").unwrap_or_else(|_| "http://localhost:50051".to_string())
}

pub fn http_endpoint() -> String {
    std::env::var("SPICEDB_HTTP_ENDPOINT").unwrap_or_else(|_| "http://localhost:8443".to_string())
}

pub fn token() -> String {
    std::env::var("SPICEDB_TOKEN").unwrap_or_else(|_| "somerandomkeyhere".to_string())
}

/// A task with one viewer and one outsider, unique per fixture.
pub struct TestFixture {
    pub task_id: String,
    pub viewer_id: String,
    pub outsider_id: String,
}

impl TestFixture {
    pub async fn create() -> Result<Self> {
        let suffix = Uuid::new_v4().simple().to_string();
        let fixture = Self {
            task_id: format!("task-{suffix}"),
            viewer_id: format!("viewer-{suffix}"),
            outsider_id: format!("outsider-{suffix}"),
        };

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        post(&http, "v1/schema/write", json!({ "schema": SCHEMA })).await?;
        post(
            &http,
            "v1/relationships/write",
            json!({
                "updates": [{
                    "operation": "OPERATION_TOUCH",
                    "relationship": {
                        "resource": {"objectType": "task", "objectId": fixture.task_id},
                        "relation": "viewer",
                        "subject": {"object": {"objectType": "user", "objectId": fixture.viewer_id}}
                    }
                }]
            }),
        )
        .await?;

        Ok(fixture)
    }

    pub fn client(&self, transport: Transport) -> Result<Client> {
        client_with_token(transport, &token())
    }
}

pub fn client_with_token(transport: Transport, token: &str) -> Result<Client> {
    let endpoint = match transport {
        Transport::Grpc => grpc_endpoint(),
        Transport::Http => http_endpoint(),
    };
    Client::builder()
        .endpoint(endpoint)
        .credentials(token)
        .transport(transport)
        .insecure()
        .timeout(Duration::from_secs(5))
        .build()
        .context("failed to build client")
}

async fn post(http: &HttpClient, path: &str, body: serde_json::Value) -> Result<()> {
    let url = format!("{}/{}", http_endpoint().trim_end_matches('/'), path);
    let response = http
        .post(&url)
        .bearer_auth(token())
        .json(&body)
        .send()
        .await
        .with_context(|| format!("failed to reach {url}. Is SpiceDB running with --http-enabled?"))?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        anyhow::bail!("{url} returned {status}: {text}");
    }
    Ok(())
}
