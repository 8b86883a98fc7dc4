//! Dependencies shared by every reconciler.

use std::sync::Arc;

use panel::{ClientId, Entity, PanelResult, ProviderDefaults, RemoteApi, ScopeChain, ScopeField, ServerId};
use remote::Operations;

/// The injected remote API plus provider-wide defaults.
#[derive(Clone)]
pub struct ResourceContext {
    api: Arc<dyn RemoteApi>,
    defaults: ProviderDefaults,
}

impl ResourceContext {
    pub fn new(api: Arc<dyn RemoteApi>, defaults: ProviderDefaults) -> Self {
        Self { api, defaults }
    }

    pub fn api(&self) -> &dyn RemoteApi {
        self.api.as_ref()
    }

    pub fn defaults(&self) -> ProviderDefaults {
        self.defaults
    }

    /// Operation set for entity kind `E`.
    pub fn operations<E: Entity>(&self) -> Operations<E> {
        Operations::new(self.api.clone())
    }

    /// Owning client: the record's own value, else the provider default.
    pub fn require_client(&self, resource: Option<ClientId>) -> PanelResult<ClientId> {
        ScopeChain::new(ScopeField::ClientId)
            .resource(resource)
            .global(self.defaults.client_id)
            .require()
    }

    /// Server chain with the resource and global levels filled in; callers add
    /// the parent level when the record kind has one.
    pub fn server_chain(&self, resource: Option<ServerId>) -> ScopeChain<ServerId> {
        ScopeChain::new(ScopeField::ServerId)
            .resource(resource)
            .global(self.defaults.server_id)
    }
}

impl std::fmt::Debug for ResourceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceContext")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
