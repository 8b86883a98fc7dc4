//! Mailbox reconciler.
//!
//! The login name is always the email address. Forwarding maps onto the
//! remote's `cc` (incoming) and `sender_cc` (outgoing) columns.

use panel::{
    ClientId, MailDomain, MailDomainId, MailUser, MailUserId, PanelResult, ServerId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::context::ResourceContext;
use crate::import::import_id;

/// Desired configuration of a mailbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailInboxSpec {
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub mail_domain_id: MailDomainId,
    pub email: String,
    /// Write-only.
    pub password: String,
    /// Quota in bytes; `-1` is unlimited.
    pub quota: Option<i64>,
    pub forward_incoming_to: Option<String>,
    pub forward_outgoing_to: Option<String>,
    pub move_junk: bool,
    pub purge_trash_days: i64,
    pub purge_junk_days: i64,
}

impl MailInboxSpec {
    pub fn new(
        mail_domain_id: MailDomainId,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: None,
            server_id: None,
            mail_domain_id,
            email: email.into(),
            password: password.into(),
            quota: None,
            forward_incoming_to: None,
            forward_outgoing_to: None,
            move_junk: false,
            purge_trash_days: 0,
            purge_junk_days: 0,
        }
    }
}

/// Observed state of a mailbox.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailInboxState {
    pub id: MailUserId,
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub mail_domain_id: Option<MailDomainId>,
    pub email: String,
    pub password: String,
    pub quota: Option<i64>,
    pub forward_incoming_to: Option<String>,
    pub forward_outgoing_to: Option<String>,
    pub maildir: Option<String>,
    pub move_junk: bool,
    pub purge_trash_days: i64,
    pub purge_junk_days: i64,
}

/// Create, read, update, delete and import for mailboxes.
#[derive(Debug, Clone)]
pub struct MailInbox {
    ctx: ResourceContext,
}

impl MailInbox {
    pub fn new(ctx: ResourceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, spec), fields(email = %spec.email))]
    pub async fn create(&self, spec: &MailInboxSpec) -> PanelResult<MailInboxState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let record = self.to_record(spec).await?;
        let ops = self.ctx.operations::<MailUser>();
        let id = ops.add(&record, client).await?;
        info!(%id, "Created mailbox");
        let created = ops.get(id).await?;
        Ok(observe(created, Some(client), spec.password.clone()))
    }

    #[instrument(skip(self, state), fields(id = %state.id))]
    pub async fn read(&self, state: &MailInboxState) -> PanelResult<MailInboxState> {
        let record = self.ctx.operations::<MailUser>().get(state.id).await?;
        Ok(observe(record, state.client_id, state.password.clone()))
    }

    #[instrument(skip(self, spec, state), fields(id = %state.id))]
    pub async fn update(&self, spec: &MailInboxSpec, state: &MailInboxState) -> PanelResult<MailInboxState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let record = self.to_record(spec).await?;
        let ops = self.ctx.operations::<MailUser>();
        ops.update(state.id, client, &record).await?;
        info!("Updated mailbox");
        let updated = ops.get(state.id).await?;
        Ok(observe(updated, Some(client), spec.password.clone()))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: MailUserId) -> PanelResult<()> {
        self.ctx.operations::<MailUser>().delete(id).await?;
        info!("Deleted mailbox");
        Ok(())
    }

    pub async fn import(&self, raw_id: &str) -> PanelResult<MailInboxState> {
        let id = import_id::<MailUserId>(raw_id)?;
        let state = MailInboxState {
            id,
            client_id: self.ctx.defaults().client_id,
            ..Default::default()
        };
        self.read(&state).await
    }

    async fn to_record(&self, spec: &MailInboxSpec) -> PanelResult<MailUser> {
        let mut chain = self.ctx.server_chain(spec.server_id);
        if chain.needs_parent() {
            debug!(parent = %spec.mail_domain_id, "Inheriting server from mail domain");
            let parent = self
                .ctx
                .operations::<MailDomain>()
                .get(spec.mail_domain_id)
                .await?;
            chain = chain.parent(parent.server_id);
        }

        Ok(MailUser {
            id: None,
            server_id: chain.resolve(),
            mail_domain_id: Some(spec.mail_domain_id),
            email: spec.email.clone(),
            login: Some(spec.email.clone()),
            password: Some(spec.password.clone()).filter(|p| !p.is_empty()),
            maildir: None,
            quota: spec.quota,
            cc: spec.forward_incoming_to.clone(),
            sender_cc: spec.forward_outgoing_to.clone(),
            move_junk: spec.move_junk,
            purge_trash_days: spec.purge_trash_days,
            purge_junk_days: spec.purge_junk_days,
        })
    }
}

fn observe(record: MailUser, client_id: Option<ClientId>, password: String) -> MailInboxState {
    MailInboxState {
        id: record.id.unwrap_or_default(),
        client_id,
        server_id: record.server_id,
        mail_domain_id: record.mail_domain_id,
        email: record.email,
        password,
        quota: record.quota,
        forward_incoming_to: record.cc.filter(|c| !c.is_empty()),
        forward_outgoing_to: record.sender_cc.filter(|c| !c.is_empty()),
        maildir: record.maildir.filter(|m| !m.is_empty()),
        move_junk: record.move_junk,
        purge_trash_days: record.purge_trash_days,
        purge_junk_days: record.purge_junk_days,
    }
}
