//! Session store: bootstrap from storage, login, logout, change notification

use crate::client::UserServiceClient;
use crate::client::error::ClientError;
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::storage::KeyValueStore;
use crate::types::{Credentials, Registration, Session, User};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio::sync::Mutex;
use tracing::{Level, debug, error, info, warn};

/// Result of a login attempt, with the failure cause kept
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(User),
    InvalidCredentials,
    Rejected { status: u16, message: String },
    MalformedResponse(String),
    NetworkError(String),
}

impl LoginOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Success(user) => Some(user),
            _ => None,
        }
    }

    /// How loudly a failed attempt is logged. A wrong password is routine;
    /// transport and response failures are not.
    pub(crate) const fn failure_level(&self) -> Level {
        match self {
            Self::Success(_) | Self::InvalidCredentials => Level::INFO,
            Self::Rejected { .. } => Level::WARN,
            Self::MalformedResponse(_) | Self::NetworkError(_) => Level::ERROR,
        }
    }
}

impl From<ClientError> for LoginOutcome {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::AuthenticationFailed(_) => Self::InvalidCredentials,
            ClientError::BadRequest(message) => Self::Rejected {
                status: 400,
                message,
            },
            ClientError::UnexpectedStatus { status, message } => {
                Self::Rejected { status, message }
            }
            ClientError::InvalidResponse(reason) => Self::MalformedResponse(reason.to_string()),
            ClientError::Request(e) => Self::NetworkError(e.to_string()),
            ClientError::Configuration(message) => Self::NetworkError(message),
        }
    }
}

/// Handle returned by [`AuthSession::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&Session)>;

/// Owner of the current user and of its persisted copy.
///
/// Single-threaded by construction: the state lives in `RefCell`s and
/// listeners are `Rc`s, matching the UI event loop it serves.
pub struct AuthSession<S> {
    config: SessionConfig,
    client: UserServiceClient,
    storage: S,
    state: RefCell<Session>,
    login_lock: Mutex<()>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
}

impl<S: KeyValueStore> AuthSession<S> {
    /// Create a session using the user service described by `config`
    pub fn new(config: SessionConfig, storage: S) -> std::result::Result<Self, ClientError> {
        let client = UserServiceClient::new(&config)?;
        Ok(Self::with_client(config, client, storage))
    }

    /// Create a session around an existing client
    pub fn with_client(config: SessionConfig, client: UserServiceClient, storage: S) -> Self {
        Self {
            config,
            client,
            storage,
            state: RefCell::new(Session::default()),
            login_lock: Mutex::new(()),
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
        }
    }

    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current snapshot
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_initializing(&self) -> bool {
        self.state.borrow().initializing
    }

    /// Load the persisted user, if any, and end initialization.
    ///
    /// Runs once; later calls return the current snapshot untouched. A corrupt
    /// record is dropped from storage and the session starts signed out.
    pub fn bootstrap(&self) -> Session {
        if !self.is_initializing() {
            return self.session();
        }

        let user = self.restore_user();
        debug!(restored = user.is_some(), "Session bootstrap complete");

        {
            let mut state = self.state.borrow_mut();
            state.user = user;
            state.initializing = false;
        }
        self.notify();
        self.session()
    }

    /// Log in and report only whether it worked
    pub async fn login(&self, credentials: &Credentials) -> bool {
        self.try_login(credentials).await.is_success()
    }

    /// Log in, keeping the failure cause.
    ///
    /// Attempts are serialized: a second call waits for the first to finish
    /// before its request goes out. Nothing is written unless the server
    /// accepted the credentials.
    pub async fn try_login(&self, credentials: &Credentials) -> LoginOutcome {
        let _guard = self.login_lock.lock().await;
        debug!(email = %credentials.email, url = %self.client.login_url(), "Logging in");

        match self.client.login(credentials).await {
            Ok(user) => {
                info!(user_id = %user.user_id, "Login succeeded");
                self.install_user(user.clone());
                LoginOutcome::Success(user)
            }
            Err(e) => {
                let outcome = LoginOutcome::from(e);
                let level = outcome.failure_level();
                if level == Level::INFO {
                    info!("Login rejected: invalid credentials");
                } else if level == Level::WARN {
                    warn!(?outcome, "Login rejected by server");
                } else {
                    error!(email = %credentials.email, ?outcome, "Login error");
                }
                outcome
            }
        }
    }

    /// Forget the user in memory and in storage
    pub fn logout(&self) {
        if let Err(e) = self.storage.remove(&self.config.storage_key) {
            warn!(error = %e, "Failed to clear persisted session");
        }
        self.state.borrow_mut().user = None;
        info!("Logged out");
        self.notify();
    }

    /// Create an account on the user service. Does not sign in.
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> std::result::Result<(), ClientError> {
        self.client.register(registration).await
    }

    /// Call `listener` with the new snapshot after every state change
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }

    fn notify(&self) {
        let snapshot = self.session();
        // Listeners may (un)subscribe while being called
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn install_user(&self, user: User) {
        if let Err(e) = self.persist_user(&user) {
            warn!(error = %e, "Signed in but failed to persist session");
        }
        self.state.borrow_mut().user = Some(user);
        self.notify();
    }

    fn persist_user(&self, user: &User) -> Result<()> {
        let serialized = serde_json::to_string(user)?;
        self.storage.set(&self.config.storage_key, &serialized)?;
        Ok(())
    }

    fn read_persisted_user(&self) -> Result<Option<User>> {
        let Some(raw) = self.storage.get(&self.config.storage_key)? else {
            return Ok(None);
        };
        Ok(Some(User::from_json(&raw)?))
    }

    fn restore_user(&self) -> Option<User> {
        match self.read_persisted_user() {
            Ok(user) => user,
            Err(SessionError::InvalidRecord(e)) => {
                warn!(
                    error = %e,
                    key = %self.config.storage_key,
                    "Discarding corrupt persisted session"
                );
                if let Err(e) = self.storage.remove(&self.config.storage_key) {
                    warn!(error = %e, "Failed to remove corrupt persisted session");
                }
                None
            }
            Err(e) => {
                warn!(error = %e, "Could not read persisted session");
                None
            }
        }
    }
}
