//! Single permission check against a running SpiceDB.
//!
//! Asks whether `user:user-001` may `view` `task:task-001` and prints the
//! outcome. Exits with status 1 when no answer could be obtained.
//!
//! # Running
//!
//! ```bash
//! export SPICEDB_ENDPOINT="http://localhost:50051"   # or the HTTP gateway URL
//! export SPICEDB_TOKEN="somerandomkeyhere"
//! export SPICEDB_TRANSPORT="grpc"                     # or "http"
//!
//! RUST_LOG=relcheck=debug cargo run -p relcheck-demos --bin check_permission
//! ```

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use relcheck::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let client = match build_client() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::from(2);
        },
    };

    let outcome = client
        .check(
            ObjectReference::new("task", "task-001"),
            "view",
            ObjectReference::new("user", "user-001"),
        )
        .await;

    match outcome {
        CheckOutcome::Granted => println!("Granted: user-001 may view task-001"),
        CheckOutcome::Denied => println!("Denied: user-001 may not view task-001"),
        CheckOutcome::Indeterminate => {
            println!("Indeterminate: the service could not determine the permission")
        },
        CheckOutcome::Unrecognized(code) => {
            println!("Unrecognized: the service answered with permissionship {code}")
        },
        CheckOutcome::Failed(err) => {
            println!("Failed: {err}");
            return ExitCode::FAILURE;
        },
    }

    ExitCode::SUCCESS
}

fn build_client() -> Result<Client, Error> {
    let endpoint =
        env::var("SPICEDB_ENDPOINT").unwrap_or_else(|_| "http://localhost:50051".to_string());
    let transport = match env::var("SPICEDB_TRANSPORT").as_deref() {
        Ok("http") | Ok("rest") => Transport::Http,
        Ok("grpc") | Err(_) => Transport::Grpc,
        Ok(other) => {
            return Err(Error::configuration(format!(
                "SPICEDB_TRANSPORT must be \"grpc\" or \"http\", not {other:?}"
            )));
        },
    };

    let builder = Client::builder()
        .endpoint(endpoint.as_str())
        .credentials(PresharedKey::from_env("SPICEDB_TOKEN")?)
        .transport(transport)
        .timeout(Duration::from_secs(5));

    if endpoint.starts_with("http://") {
        builder.insecure().build()
    } else {
        builder.build()
    }
}
