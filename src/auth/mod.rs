//! Authentication with the authorization service.
//!
//! The service authenticates callers with a single preshared key, carried as
//! a bearer token:
//!
//! ```rust,no_run
//! use relcheck::{Client, PresharedKey};
//!
//! # fn main() -> Result<(), relcheck::Error> {
//! let client = Client::builder()
//!     .endpoint("http://localhost:50051")
//!     .credentials(PresharedKey::from_env("SPICEDB_TOKEN")?)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod credentials;

pub use credentials::PresharedKey;
