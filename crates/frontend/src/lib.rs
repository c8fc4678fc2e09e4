//! Yew integration for the gallery session: an [`AuthProvider`] that
//! restores the signed-in user from `localStorage`, and hooks to read it.

pub mod app;
pub mod auth;
pub mod components;
pub mod logging;
pub mod storage;

pub use app::App;
pub use auth::{
    AuthContext, AuthProvider, RequireAuth, SessionHandle, use_auth, use_current_user,
    use_is_authenticated,
};
pub use components::{LoginForm, UserPanel};
pub use storage::{BrowserStorage, StorageArea};
