//! # Postbox Domain
//!
//! Types shared by every Postbox crate.
//!
//! This crate contains:
//! - Wire records for the auth, user, message and schedule endpoints
//! - The client error type and the normalized [`ErrorRecord`]
//! - Configuration structures
//! - Endpoint paths and fixed messages
//!
//! ## Architecture
//! - No dependencies on other Postbox crates
//! - No I/O; pure data and conversions

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
