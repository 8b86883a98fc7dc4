//! Authenticated session over the JSON endpoint.
//!
//! Every request is a `POST` to the endpoint with the method name as the bare
//! query string (`…/remote/json.php?sites_web_domain_get`) and the parameters
//! as a JSON object body. After [`SessionClient::login`] the session token is
//! added to every call as `session_id`.
//!
//! The token lives behind an async `RwLock`: calls share the read lock, login
//! and logout take the write lock. The token is never persisted or logged.

use async_trait::async_trait;
use panel::{Params, PanelError, PanelResult, RemoteApi};
use reqwest::{Client, Url};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::envelope::Envelope;

const LOGIN: &str = "login";
const LOGOUT: &str = "logout";
const SESSION_PARAM: &str = "session_id";

/// HTTPS client holding one remote session.
pub struct SessionClient {
    config: ClientConfig,
    endpoint: Url,
    http: Client,
    session: RwLock<Option<String>>,
}

impl SessionClient {
    /// Builds the HTTP client. No request is made until [`Self::login`].
    pub fn new(config: ClientConfig) -> PanelResult<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| PanelError::Configuration {
            field: "endpoint".to_string(),
            message: format!("invalid endpoint URL {:?}: {e}", config.endpoint),
        })?;
        let http = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| PanelError::Configuration {
                field: "insecure".to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        if config.insecure {
            warn!(endpoint = %endpoint, "TLS certificate verification is disabled");
        }

        Ok(Self {
            config,
            endpoint,
            http,
            session: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether a session token is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Opens a session and stores its token, replacing any previous one.
    ///
    /// A refused login, or a response that is not a string token, is a
    /// [`PanelError::Authentication`] error carrying the remote message.
    pub async fn login(&self) -> PanelResult<()> {
        let mut session = self.session.write().await;

        let mut params = Params::new();
        params.insert("username".into(), Value::String(self.config.username.clone()));
        params.insert("password".into(), Value::String(self.config.password.clone()));

        let response = self.post(LOGIN, params).await.map_err(|e| match e {
            PanelError::Protocol { message, .. } => PanelError::Authentication { message },
            other => other,
        })?;

        match response {
            Value::String(token) if !token.is_empty() => {
                *session = Some(token);
                info!(user = %self.config.username, "Logged in");
                Ok(())
            }
            other => Err(PanelError::Authentication {
                message: format!("expected a session token, got {other}"),
            }),
        }
    }

    /// Closes the session.
    ///
    /// A no-op without a session. The local token is always cleared; a failure
    /// of the remote call is logged, not returned.
    pub async fn logout(&self) {
        let mut session = self.session.write().await;
        let Some(token) = session.take() else {
            return;
        };

        let mut params = Params::new();
        params.insert(SESSION_PARAM.into(), Value::String(token));
        match self.post(LOGOUT, params).await {
            Ok(_) => info!("Logged out"),
            Err(e) => warn!(error = %e, "Remote logout failed; local session discarded"),
        }
    }

    async fn post(&self, method: &str, params: Params) -> PanelResult<Value> {
        let mut url = self.endpoint.clone();
        url.set_query(Some(method));

        debug!(method, "Calling remote API");
        let response = self
            .http
            .post(url)
            .json(&Value::Object(params))
            .send()
            .await
            .map_err(|e| transport(method, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PanelError::Transport {
                method: method.to_string(),
                message: format!("HTTP {status}: {}", body.trim()),
            });
        }

        let envelope: Envelope = response.json().await.map_err(|e| transport(method, e))?;
        envelope.into_response(method)
    }
}

fn transport(method: &str, error: reqwest::Error) -> PanelError {
    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    };
    PanelError::Transport {
        method: method.to_string(),
        message,
    }
}

#[async_trait]
impl RemoteApi for SessionClient {
    async fn call(&self, method: &str, mut params: Params) -> PanelResult<Value> {
        let token = self.session.read().await.clone();
        let Some(token) = token else {
            return Err(PanelError::Authentication {
                message: format!("no active session for '{method}'; log in first"),
            });
        };
        params.insert(SESSION_PARAM.into(), Value::String(token));
        self.post(method, params).await
    }
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
