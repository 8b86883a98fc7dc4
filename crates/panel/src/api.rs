//! Port trait for the remote RPC endpoint.
//!
//! The infrastructure crate implements [`RemoteApi`] over HTTPS; everything
//! above it (operation set, capability discovery, reconcilers) receives an
//! `Arc<dyn RemoteApi>` by injection, so tests can substitute a fake that
//! returns canned payloads.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::PanelResult;

/// Call parameters: the JSON object sent as the request body.
pub type Params = Map<String, Value>;

/// One authenticated RPC endpoint.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Performs one request/response round trip.
    ///
    /// Implementations inject the current session token into `params`, unwrap
    /// the `{code, message, response}` envelope and return the raw `response`
    /// payload. Failures are returned on first occurrence; there is no retry.
    async fn call(&self, method: &str, params: Params) -> PanelResult<Value>;
}
