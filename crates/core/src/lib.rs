//! Gallery session core: the signed-in user, its persisted copy, and the
//! login call that produces it.

pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod types;

pub use client::UserServiceClient;
pub use client::error::ClientError;
pub use config::SessionConfig;
pub use error::{Result, SessionError, StorageError};
pub use session::{AuthSession, LoginOutcome, SubscriptionId};
pub use storage::{KeyValueStore, MemoryStorage};
pub use types::{Credentials, InvalidUser, Registration, Session, User, UserId};
