//! # Postbox Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest HTTP transport
//! - File, keychain and in-memory credential stores
//! - Configuration loading from environment and files
//! - Error conversions from third-party crates
//!
//! ## Architecture
//! - Implements traits defined in `postbox-core`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod config;
pub mod context;
pub mod credentials;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use context::PostboxContext;
pub use credentials::{
    open_store, FileCredentialStore, InMemoryCredentialStore, KeychainCredentialStore,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
