//! Shared domain utilities

pub mod serde;
