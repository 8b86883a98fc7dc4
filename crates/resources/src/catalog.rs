//! Per-reconciler PHP catalog cache.

use std::sync::Arc;

use panel::{PanelResult, PhpCatalog, PhpHandler, RemoteApi, ServerId};
use remote::discover_php_versions;
use tokio::sync::Mutex;
use tracing::debug;

/// Holds the catalog of the most recently used (server, handler) pair.
///
/// Populated lazily on first use. A request for another pair replaces it.
#[derive(Debug, Default)]
pub struct CatalogCache {
    current: Mutex<Option<Arc<PhpCatalog>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the catalog for `(server, handler)`, discovering it if needed.
    pub async fn get(
        &self,
        api: &dyn RemoteApi,
        server: ServerId,
        handler: &PhpHandler,
    ) -> PanelResult<Arc<PhpCatalog>> {
        let mut current = self.current.lock().await;
        if let Some(catalog) = current.as_ref().filter(|c| c.matches(server, handler)) {
            return Ok(Arc::clone(catalog));
        }
        debug!(%server, %handler, "PHP catalog not cached; discovering");
        let catalog = Arc::new(discover_php_versions(api, server, handler).await?);
        *current = Some(Arc::clone(&catalog));
        Ok(catalog)
    }
}
