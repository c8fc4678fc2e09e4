//! Session data model

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use serde_with::{DefaultOnNull, serde_as};
use std::fmt;
use thiserror::Error;

/// Opaque user identifier as issued by the login server.
///
/// The server emits numeric ids, older persisted records may carry strings;
/// either form is kept exactly as received so the stored record round-trips.
/// Numbers are not narrowed to an integer type: `1.5` and ids past `i64::MAX`
/// are accepted like any other non-zero value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(Number),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Authenticated user record, as returned by login and as persisted locally
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userid")]
    pub user_id: UserId,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub email: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub first_name: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub last_name: String,
    /// Display name exactly as the server sent it; never recomputed locally
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub full_name: String,
}

/// Why a JSON document could not be accepted as a [`User`]
#[derive(Debug, Error)]
pub enum InvalidUser {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("missing or empty userid")]
    MissingId,

    #[error("malformed user record: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl User {
    /// Build a user from an arbitrary JSON document.
    ///
    /// Unknown fields (passwords, addresses, ...) are dropped; only the five
    /// session fields are kept. A record without a present `userid` is rejected.
    pub fn from_value(value: Value) -> Result<Self, InvalidUser> {
        let Value::Object(fields) = &value else {
            return Err(InvalidUser::NotAnObject);
        };

        match fields.get("userid") {
            None | Some(Value::Null | Value::Bool(false)) => return Err(InvalidUser::MissingId),
            Some(Value::String(s)) if s.is_empty() => return Err(InvalidUser::MissingId),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {
                return Err(InvalidUser::MissingId);
            }
            Some(_) => {}
        }

        let user: Self = serde_json::from_value(value)?;
        Ok(user)
    }

    /// Parse a serialized user record
    pub fn from_json(raw: &str) -> Result<Self, InvalidUser> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }
}

/// Login credentials, sent verbatim as the JSON request body
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account creation payload accepted by the user service
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Snapshot of the session store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    /// True until the one-time storage check has run
    pub initializing: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            initializing: true,
        }
    }
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
