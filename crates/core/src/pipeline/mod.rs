//! Request dispatch, authorization retry and response decoding

pub mod decoder;
pub mod request;
pub mod retry;
pub mod service;

pub use decoder::ResponseDecoder;
pub use request::build_request;
pub use retry::{AuthRetry, RetryDecision, RetryState};
pub use service::RequestPipeline;
