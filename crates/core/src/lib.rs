//! # Postbox Core
//!
//! Session and request logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for HTTP dispatch and credential persistence
//! - The session manager (login, renewal, logout)
//! - The request pipeline with its authorization-retry protocol
//! - The callback-style [`ApiService`] facade with [`MessagingService`] and [`ScheduleService`]
//!
//! ## Architecture Principles
//! - Only depends on `postbox-domain`
//! - No network, filesystem, or keychain code
//! - All external effects via traits

pub mod api;
pub mod credentials;
pub mod http;
pub mod messaging;
pub mod pipeline;
pub mod schedule;
pub mod session;

#[cfg(test)]
pub mod testing;

pub use api::{report, ApiService};
pub use credentials::{CredentialStore, InMemoryCredentialStore};
pub use http::{HttpRequest, HttpResponse, HttpTransport};
pub use messaging::MessagingService;
pub use pipeline::{AuthRetry, RequestPipeline, ResponseDecoder, RetryDecision, RetryState};
pub use schedule::ScheduleService;
pub use session::{BearerToken, LoginOutcome, SessionManager};
