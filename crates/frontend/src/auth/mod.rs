//! Authentication module

pub mod context;
pub mod error_messages;
pub mod guard;

// Re-export commonly used items
pub use context::{
    AuthContext, AuthProvider, AuthProviderProps, SessionHandle, use_auth, use_current_user,
    use_is_authenticated,
};
pub use error_messages::login_error_message;
pub use guard::RequireAuth;
