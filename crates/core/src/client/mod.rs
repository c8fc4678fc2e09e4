//! HTTP client for the user service

pub mod error;

use crate::config::SessionConfig;
use crate::types::{Credentials, Registration, User};
use error::ClientError;
use reqwest::{Client, ClientBuilder, StatusCode};

#[cfg(not(target_arch = "wasm32"))]
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for the public login and registration endpoints
#[derive(Clone, Debug)]
pub struct UserServiceClient {
    client: Client,
    login_url: String,
    register_url: String,
}

impl UserServiceClient {
    /// Create a client for the endpoints described by `config`
    pub fn new(config: &SessionConfig) -> Result<Self, ClientError> {
        if config.base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is required".into()));
        }

        #[cfg(not(target_arch = "wasm32"))]
        let client = {
            let mut builder = ClientBuilder::new().user_agent(USER_AGENT);
            if let Some(timeout) = config.timeout() {
                builder = builder.timeout(timeout);
            }
            builder.build()?
        };

        // The browser owns the user agent and request timeouts
        #[cfg(target_arch = "wasm32")]
        let client = ClientBuilder::new().build()?;

        Ok(Self {
            client,
            login_url: config.login_url(),
            register_url: config.register_url(),
        })
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Exchange credentials for a user record.
    ///
    /// Only a `200 OK` whose body carries a present `userid` counts as success;
    /// every other status, including other 2xx codes, is an error.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        let response = self
            .client
            .post(&self.login_url)
            .json(credentials)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(ClientError::from_status(status, body));
        }

        Ok(User::from_json(&body)?)
    }

    /// Create an account. The service answers with a plain-text acknowledgement.
    pub async fn register(&self, registration: &Registration) -> Result<(), ClientError> {
        let response = self
            .client
            .post(&self.register_url)
            .json(registration)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, body))
        }
    }
}
