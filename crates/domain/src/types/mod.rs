//! Domain types

pub mod auth;
pub mod message;
pub mod request;
pub mod schedule;
pub mod user;

pub use auth::{AuthResponse, Login, SavedCredential, Session};
pub use message::{CreateMessage, ReceivedMessage, ReceivedMessageStub, SentMessage, SentMessageStub};
pub use request::{HttpMethod, RequestDescriptor};
pub use schedule::{Block, FreeBlock, FreeBlockCollection};
pub use user::UserRecord;
