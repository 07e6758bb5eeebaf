//! Messaging endpoints

pub mod service;

pub use service::MessagingService;
