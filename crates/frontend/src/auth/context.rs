//! Global authentication context and provider

use crate::storage::BrowserStorage;
use gallery_core::{
    AuthSession, ClientError, Credentials, LoginOutcome, Session, SessionConfig, User,
};
use std::ops::Deref;
use std::rc::Rc;
use yew::prelude::*;

/// Shared handle to the session owned by an [`AuthProvider`].
///
/// Two handles are equal when they point at the same session.
#[derive(Clone)]
pub struct SessionHandle(Rc<AuthSession<BrowserStorage>>);

impl SessionHandle {
    /// Create a session persisted in `localStorage`
    pub fn new(config: SessionConfig) -> Result<Self, ClientError> {
        Self::with_storage(config, BrowserStorage::local())
    }

    pub fn with_storage(
        config: SessionConfig,
        storage: BrowserStorage,
    ) -> Result<Self, ClientError> {
        Ok(Self(Rc::new(AuthSession::new(config, storage)?)))
    }
}

impl From<AuthSession<BrowserStorage>> for SessionHandle {
    fn from(session: AuthSession<BrowserStorage>) -> Self {
        Self(Rc::new(session))
    }
}

impl Deref for SessionHandle {
    type Target = AuthSession<BrowserStorage>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// What descendants of [`AuthProvider`] see: the current snapshot plus the
/// login and logout operations
#[derive(Clone, PartialEq)]
pub struct AuthContext {
    session: SessionHandle,
    snapshot: Session,
}

impl AuthContext {
    pub const fn new(session: SessionHandle, snapshot: Session) -> Self {
        Self { session, snapshot }
    }

    pub const fn user(&self) -> Option<&User> {
        self.snapshot.user.as_ref()
    }

    pub const fn initializing(&self) -> bool {
        self.snapshot.initializing
    }

    pub const fn is_authenticated(&self) -> bool {
        self.snapshot.user.is_some()
    }

    pub const fn snapshot(&self) -> &Session {
        &self.snapshot
    }

    /// Log in; the provider re-renders with the new user on success
    pub async fn login(&self, credentials: &Credentials) -> bool {
        self.session.login(credentials).await
    }

    /// Log in, keeping the failure cause for display
    pub async fn try_login(&self, credentials: &Credentials) -> LoginOutcome {
        self.session.try_login(credentials).await
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    pub const fn session(&self) -> &SessionHandle {
        &self.session
    }
}

/// Auth provider props.
///
/// `config` and `session` are read on the first render only; the provider
/// keeps that session for its whole lifetime and ignores later changes.
#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    pub children: Children,
    /// Endpoints and storage key; ignored when `session` is given
    #[prop_or_default]
    pub config: SessionConfig,
    /// Use an existing session instead of creating one
    #[prop_or_default]
    pub session: Option<SessionHandle>,
}

/// Children are withheld until the persisted session has been checked
fn gated_children(session: &Session, children: Html) -> Html {
    if session.initializing {
        Html::default()
    } else {
        children
    }
}

/// Auth provider component.
///
/// Children are not rendered until the persisted session has been checked.
#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let session = {
        let injected = props.session.clone();
        let config = props.config.clone();
        use_memo((), move |_| match injected {
            Some(session) => Ok(session),
            None => SessionHandle::new(config).inspect_err(|e| {
                tracing::error!(error = %e, "Failed to create auth session");
            }),
        })
    };
    let snapshot = use_state_eq(Session::default);

    // Follow session changes and load the persisted user on mount
    {
        let session = session.clone();
        let snapshot = snapshot.clone();
        use_effect_with((), move |_| {
            let subscription = if let Ok(session) = &*session {
                let setter = snapshot.setter();
                let id = session.subscribe(move |current| setter.set(current.clone()));
                snapshot.set(session.bootstrap());
                Some((session.clone(), id))
            } else {
                None
            };

            move || {
                if let Some((session, id)) = subscription {
                    session.unsubscribe(id);
                }
            }
        });
    }

    match &*session {
        Ok(session) => {
            let context = AuthContext::new(session.clone(), (*snapshot).clone());
            let children = html! { <>{ props.children.clone() }</> };
            html! {
                <ContextProvider<AuthContext> context={context}>
                    { gated_children(&snapshot, children) }
                </ContextProvider<AuthContext>>
            }
        }
        Err(e) => {
            html! {
                <div class="auth-error">{ format!("Authentication unavailable: {e}") }</div>
            }
        }
    }
}

fn expect_provider<T>(context: Option<T>) -> T {
    context.expect("use_auth must be used within an AuthProvider")
}

/// Hook to use auth context. Panics outside an [`AuthProvider`].
#[hook]
pub fn use_auth() -> AuthContext {
    expect_provider(use_context::<AuthContext>())
}

/// Hook to get the signed-in user
#[hook]
pub fn use_current_user() -> Option<User> {
    let auth = use_auth();
    auth.user().cloned()
}

/// Hook to check if authenticated
#[hook]
pub fn use_is_authenticated() -> bool {
    let auth = use_auth();
    auth.is_authenticated()
}
