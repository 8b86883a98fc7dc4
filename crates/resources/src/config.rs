//! Provider-level configuration.
//!
//! Settings come from two places: explicit values (typically a configuration
//! file or command-line flags) and `ISPCONFIG_*` environment variables.
//! Explicit values win.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `ISPCONFIG_HOST` | `host` (`name[:port]`) |
//! | `ISPCONFIG_USERNAME` | `username` |
//! | `ISPCONFIG_PASSWORD` | `password` |
//! | `ISPCONFIG_INSECURE` | `insecure` (only `"true"` enables it) |
//! | `ISPCONFIG_CLIENT_ID` | default client id |
//! | `ISPCONFIG_SERVER_ID` | default server id |
//!
//! Numeric variables that do not parse are ignored.

use std::time::Duration;

use panel::{ClientId, PanelError, PanelResult, ProviderDefaults, ServerId};
use remote::ClientConfig;

pub const ENV_HOST: &str = "ISPCONFIG_HOST";
pub const ENV_USERNAME: &str = "ISPCONFIG_USERNAME";
pub const ENV_PASSWORD: &str = "ISPCONFIG_PASSWORD";
pub const ENV_INSECURE: &str = "ISPCONFIG_INSECURE";
pub const ENV_CLIENT_ID: &str = "ISPCONFIG_CLIENT_ID";
pub const ENV_SERVER_ID: &str = "ISPCONFIG_SERVER_ID";

/// Partially specified provider settings.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: Option<bool>,
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub timeout: Option<Duration>,
}

impl ProviderConfig {
    /// Reads the `ISPCONFIG_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let id = |name: &str| {
            get(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|id| *id > 0)
        };
        Self {
            host: get(ENV_HOST),
            username: get(ENV_USERNAME),
            password: get(ENV_PASSWORD),
            insecure: get(ENV_INSECURE).map(|v| v == "true"),
            client_id: id(ENV_CLIENT_ID).map(ClientId::new),
            server_id: id(ENV_SERVER_ID).map(ServerId::new),
            timeout: None,
        }
    }

    /// Layers `explicit` over `self`: every field set in `explicit` wins.
    pub fn merge(self, explicit: ProviderConfig) -> Self {
        Self {
            host: explicit.host.or(self.host),
            username: explicit.username.or(self.username),
            password: explicit.password.or(self.password),
            insecure: explicit.insecure.or(self.insecure),
            client_id: explicit.client_id.or(self.client_id),
            server_id: explicit.server_id.or(self.server_id),
            timeout: explicit.timeout.or(self.timeout),
        }
    }

    /// Connection settings. Host, username and password are required.
    pub fn client_config(&self) -> PanelResult<ClientConfig> {
        let host = required(&self.host, "host", ENV_HOST)?;
        let username = required(&self.username, "username", ENV_USERNAME)?;
        let password = required(&self.password, "password", ENV_PASSWORD)?;

        let mut config = ClientConfig::for_host(host, username, password)
            .with_insecure(self.insecure.unwrap_or(false));
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        Ok(config)
    }

    /// Provider-wide fallbacks for the scope chains.
    pub fn defaults(&self) -> ProviderDefaults {
        ProviderDefaults {
            client_id: self.client_id,
            server_id: self.server_id,
        }
    }
}

fn required<'a>(value: &'a Option<String>, field: &str, env: &str) -> PanelResult<&'a str> {
    value.as_deref().ok_or_else(|| PanelError::Configuration {
        field: field.to_string(),
        message: format!("{field} must be set in the provider configuration or via {env}"),
    })
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("insecure", &self.insecure)
            .field("client_id", &self.client_id)
            .field("server_id", &self.server_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}
