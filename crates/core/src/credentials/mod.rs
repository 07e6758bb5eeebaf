//! Saved credential persistence

pub mod memory;
pub mod ports;

pub use memory::InMemoryCredentialStore;
pub use ports::CredentialStore;
