//! Callback-style client facade

pub mod service;

pub use service::{report, ApiService};
