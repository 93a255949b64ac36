//! Testing utilities.
//!
//! - [`MockTransport`]: scripted replies and failures without a network
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use relcheck::testing::MockTransport;
//! use relcheck::{CheckOutcome, CheckRequest, Client, Permissionship};
//!
//! # tokio_test::block_on(async {
//! let request = CheckRequest::parse("task:task-001", "view", "user:user-001").unwrap();
//! let mock = MockTransport::new().on(request.clone(), Permissionship::HasPermission);
//!
//! let client = Client::from_transport(Arc::new(mock.clone()));
//! assert!(client.check_request(request).await.is_granted());
//! assert_eq!(mock.request_count(), 1);
//! # });
//! ```

mod mock_transport;

pub use mock_transport::MockTransport;
