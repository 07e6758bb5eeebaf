//! HTTP boundary

pub mod ports;

pub use ports::{HttpRequest, HttpResponse, HttpTransport};
