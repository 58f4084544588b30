//! TutorHub Network Library
//!
//! Typed access to the tutoring backend's HTTP/JSON API.
//!
//! # Architecture
//!
//! - **TutoringApi**: one async method per endpoint; the seam view models talk to
//! - **HttpClient**: `reqwest` implementation with a cookie-based session
//! - **Protocol**: endpoint paths, response envelopes, error body parsing
//!
//! # Usage
//!
//! ```ignore
//! let client = HttpClient::new(&ClientConfig::load()?)?;
//!
//! match client.current_user().await {
//!     Ok(user) => { /* show the shell */ }
//!     Err(e) if e.kind() == FailureKind::Authentication => { /* show login */ }
//!     Err(e) => { /* connection error */ }
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod protocol;

pub use api::TutoringApi;
pub use client::HttpClient;
pub use error::{Error, FailureKind, Result};
