//! Mail domain reconciler.

use panel::{ClientId, MailDomain as MailDomainRecord, MailDomainId, PanelResult, ServerId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::context::ResourceContext;
use crate::import::import_id;

/// Desired configuration of a mail domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailDomainSpec {
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub domain: String,
    pub active: bool,
    /// Deliver mail for this domain to local mailboxes.
    pub local_delivery: bool,
}

impl MailDomainSpec {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            client_id: None,
            server_id: None,
            domain: domain.into(),
            active: true,
            local_delivery: true,
        }
    }
}

/// Observed state of a mail domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailDomainState {
    pub id: MailDomainId,
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub domain: String,
    pub active: bool,
    pub local_delivery: bool,
}

/// Create, read, update, delete and import for mail domains.
#[derive(Debug, Clone)]
pub struct MailDomain {
    ctx: ResourceContext,
}

impl MailDomain {
    pub fn new(ctx: ResourceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, spec), fields(domain = %spec.domain))]
    pub async fn create(&self, spec: &MailDomainSpec) -> PanelResult<MailDomainState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let ops = self.ctx.operations::<MailDomainRecord>();
        let id = ops.add(&self.to_record(spec), client).await?;
        info!(%id, "Created mail domain");
        let created = ops.get(id).await?;
        Ok(observe(created, Some(client)))
    }

    #[instrument(skip(self, state), fields(id = %state.id))]
    pub async fn read(&self, state: &MailDomainState) -> PanelResult<MailDomainState> {
        let record = self.ctx.operations::<MailDomainRecord>().get(state.id).await?;
        Ok(observe(record, state.client_id))
    }

    #[instrument(skip(self, spec, state), fields(id = %state.id))]
    pub async fn update(&self, spec: &MailDomainSpec, state: &MailDomainState) -> PanelResult<MailDomainState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let ops = self.ctx.operations::<MailDomainRecord>();
        ops.update(state.id, client, &self.to_record(spec)).await?;
        info!("Updated mail domain");
        let updated = ops.get(state.id).await?;
        Ok(observe(updated, Some(client)))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: MailDomainId) -> PanelResult<()> {
        self.ctx.operations::<MailDomainRecord>().delete(id).await?;
        info!("Deleted mail domain");
        Ok(())
    }

    pub async fn import(&self, raw_id: &str) -> PanelResult<MailDomainState> {
        let id = import_id::<MailDomainId>(raw_id)?;
        let state = MailDomainState {
            id,
            client_id: self.ctx.defaults().client_id,
            ..Default::default()
        };
        self.read(&state).await
    }

    fn to_record(&self, spec: &MailDomainSpec) -> MailDomainRecord {
        MailDomainRecord {
            id: None,
            server_id: self.ctx.server_chain(spec.server_id).resolve(),
            domain: spec.domain.clone(),
            active: spec.active,
            local_delivery: spec.local_delivery,
        }
    }
}

fn observe(record: MailDomainRecord, client_id: Option<ClientId>) -> MailDomainState {
    MailDomainState {
        id: record.id.unwrap_or_default(),
        client_id,
        server_id: record.server_id,
        domain: record.domain,
        active: record.active,
        local_delivery: record.local_delivery,
    }
}
