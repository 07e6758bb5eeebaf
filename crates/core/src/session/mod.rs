//! Session ownership and renewal

pub mod manager;

pub use manager::{BearerToken, LoginOutcome, SessionManager};
