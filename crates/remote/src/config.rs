//! Connection settings for the session client.

use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the JSON endpoint below the panel host.
pub const ENDPOINT_PATH: &str = "/remote/json.php";

/// Everything [`crate::SessionClient`] needs to reach and log in to a panel.
#[derive(Clone)]
pub struct ClientConfig {
    /// Full endpoint URL, e.g. `https://panel.example.com:8080/remote/json.php`.
    pub endpoint: String,
    /// Remote user name.
    pub username: String,
    /// Remote user password. Never printed.
    pub password: String,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
    /// Upper bound for one request/response round trip.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for an explicit endpoint URL.
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            password: password.into(),
            insecure: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Settings for `https://{host}/remote/json.php`. `host` may carry a port.
    pub fn for_host(
        host: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let host = host.trim().trim_end_matches('/');
        Self::new(format!("https://{host}{ENDPOINT_PATH}"), username, password)
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("insecure", &self.insecure)
            .field("timeout", &self.timeout)
            .finish()
    }
}
