//! Read-only customer lookups.

use panel::{ClientId, Customer, PanelResult};
use tracing::{debug, instrument};

use crate::context::ResourceContext;

/// Looks up customer accounts.
#[derive(Debug, Clone)]
pub struct Customers {
    ctx: ResourceContext,
}

impl Customers {
    pub fn new(ctx: ResourceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ClientId) -> PanelResult<Customer> {
        self.ctx.operations::<Customer>().get(id).await
    }

    /// Every customer visible to the session.
    #[instrument(skip(self))]
    pub async fn list(&self) -> PanelResult<Vec<Customer>> {
        let customers = self.ctx.operations::<Customer>().list().await?;
        debug!(count = customers.len(), "Listed customers");
        Ok(customers)
    }
}
