//! `ispctl` entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Wire observability**: configure `tracing-subscriber` with an
//!    `EnvFilter` (default `info`) and either a human-readable or a JSON
//!    formatter (`ISPCONFIG_LOG_FORMAT=json`). Every span and event emitted by
//!    the `remote` and `resources` crates flows through this subscriber.
//! 2. **Load configuration**: read the `ISPCONFIG_*` environment variables
//!    into a [`resources::ProviderConfig`].
//! 3. **Construct infrastructure**: build the [`remote::SessionClient`] and
//!    inject it into a [`resources::ResourceContext`].
//! 4. **Check connectivity**: log in, list the visible customers, discover
//!    the PHP versions of the default server when one is configured, and log
//!    out again.

use std::sync::Arc;

use anyhow::Context;
use panel::{PhpHandler, RemoteApi};
use remote::{discover_php_versions, SessionClient};
use resources::{Customers, ProviderConfig, ResourceContext};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const ENV_LOG_FORMAT: &str = "ISPCONFIG_LOG_FORMAT";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = ProviderConfig::from_env();
    let client_config = config
        .client_config()
        .context("incomplete provider configuration")?;
    info!(endpoint = %client_config.endpoint, "Connecting to control panel");

    let client = Arc::new(SessionClient::new(client_config)?);
    client.login().await.context("login failed")?;

    let outcome = check(client.clone(), &config).await;
    client.logout().await;
    outcome
}

async fn check(client: Arc<SessionClient>, config: &ProviderConfig) -> anyhow::Result<()> {
    let api: Arc<dyn RemoteApi> = client;
    let ctx = ResourceContext::new(api, config.defaults());

    let customers = Customers::new(ctx.clone())
        .list()
        .await
        .context("listing customers")?;
    info!(count = customers.len(), "Customers visible to this session");
    for customer in &customers {
        info!(
            id = ?customer.id,
            company = customer.company_name.as_deref().unwrap_or_default(),
            contact = customer.contact_name.as_deref().unwrap_or_default(),
            "Customer"
        );
    }

    match config.server_id {
        Some(server) => {
            let handler = PhpHandler::default();
            let catalog = discover_php_versions(ctx.api(), server, &handler)
                .await
                .with_context(|| format!("discovering PHP versions on server {server}"))?;
            info!(%server, %handler, versions = ?catalog.labels(), "PHP versions");
        }
        None => warn!("ISPCONFIG_SERVER_ID not set; skipping PHP version discovery"),
    }

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()?;
    }
    Ok(())
}
