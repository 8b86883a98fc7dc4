//! Shell user reconciler.
//!
//! A shell user runs as the system user of its hosting domain, so every
//! create and update fetches the parent domain for `puser`/`pgroup`. The
//! parent also supplies the server when the user does not name one.

use panel::upgrade::{self, BoolFieldUpgrade, StateUpgrade};
use panel::{ClientId, PanelResult, ServerId, ShellUser, ShellUserId, WebDomain, WebDomainId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::context::ResourceContext;
use crate::import::import_id;

/// Current schema version of [`WebUserState`].
pub const SCHEMA_VERSION: u32 = 1;

/// v0 stored `active` as `"y"`/`"n"`.
pub const STATE_UPGRADES: &[StateUpgrade] = &[StateUpgrade {
    from_version: 0,
    bool_fields: &[BoolFieldUpgrade {
        field: "active",
        default: true,
    }],
}];

const DEFAULT_SHELL: &str = "/bin/bash";

/// Desired configuration of a shell user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebUserSpec {
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub parent_domain_id: WebDomainId,
    pub username: String,
    /// Write-only; the remote never returns it.
    pub password: Option<String>,
    pub dir: Option<String>,
    pub shell: Option<String>,
    pub quota_size: Option<i64>,
    pub active: bool,
}

impl WebUserSpec {
    pub fn new(parent_domain_id: WebDomainId, username: impl Into<String>) -> Self {
        Self {
            client_id: None,
            server_id: None,
            parent_domain_id,
            username: username.into(),
            password: None,
            dir: None,
            shell: Some(DEFAULT_SHELL.into()),
            quota_size: None,
            active: true,
        }
    }
}

/// Observed state of a shell user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebUserState {
    pub id: ShellUserId,
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub parent_domain_id: WebDomainId,
    pub username: String,
    pub password: Option<String>,
    pub dir: Option<String>,
    pub shell: Option<String>,
    pub quota_size: Option<i64>,
    pub active: bool,
    pub uid: Option<String>,
    pub gid: Option<String>,
}

/// Create, read, update, delete and import for shell users.
#[derive(Debug, Clone)]
pub struct WebUser {
    ctx: ResourceContext,
}

impl WebUser {
    pub fn new(ctx: ResourceContext) -> Self {
        Self { ctx }
    }

    /// Migrates stored state from `version` to [`SCHEMA_VERSION`].
    pub fn upgrade_state(version: u32, state: &mut Map<String, Value>) -> PanelResult<u32> {
        upgrade::upgrade_state(STATE_UPGRADES, version, state)
    }

    #[instrument(skip(self, spec), fields(username = %spec.username, parent = %spec.parent_domain_id))]
    pub async fn create(&self, spec: &WebUserSpec) -> PanelResult<WebUserState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let record = self.to_record(spec).await?;
        let ops = self.ctx.operations::<ShellUser>();
        let id = ops.add(&record, client).await?;
        info!(%id, "Created shell user");
        let created = ops.get(id).await?;
        Ok(observe(created, Some(client), spec.password.clone()))
    }

    #[instrument(skip(self, state), fields(id = %state.id))]
    pub async fn read(&self, state: &WebUserState) -> PanelResult<WebUserState> {
        let record = self.ctx.operations::<ShellUser>().get(state.id).await?;
        Ok(observe(record, state.client_id, state.password.clone()))
    }

    #[instrument(skip(self, spec, state), fields(id = %state.id))]
    pub async fn update(&self, spec: &WebUserSpec, state: &WebUserState) -> PanelResult<WebUserState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let record = self.to_record(spec).await?;
        let ops = self.ctx.operations::<ShellUser>();
        ops.update(state.id, client, &record).await?;
        info!("Updated shell user");
        let updated = ops.get(state.id).await?;
        Ok(observe(updated, Some(client), spec.password.clone()))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ShellUserId) -> PanelResult<()> {
        self.ctx.operations::<ShellUser>().delete(id).await?;
        info!("Deleted shell user");
        Ok(())
    }

    pub async fn import(&self, raw_id: &str) -> PanelResult<WebUserState> {
        let id = import_id::<ShellUserId>(raw_id)?;
        let state = WebUserState {
            id,
            client_id: self.ctx.defaults().client_id,
            ..Default::default()
        };
        self.read(&state).await
    }

    async fn to_record(&self, spec: &WebUserSpec) -> PanelResult<ShellUser> {
        let parent = self
            .ctx
            .operations::<WebDomain>()
            .get(spec.parent_domain_id)
            .await?;
        let server = self
            .ctx
            .server_chain(spec.server_id)
            .parent(parent.server_id)
            .require()?;

        Ok(ShellUser {
            id: None,
            server_id: Some(server),
            parent_domain_id: spec.parent_domain_id,
            username: spec.username.clone(),
            password: spec.password.clone().filter(|p| !p.is_empty()),
            shell: spec.shell.clone(),
            active: Some(spec.active),
            dir: spec.dir.clone(),
            quota_size: spec.quota_size,
            uid: None,
            gid: None,
            puser: parent.system_user,
            pgroup: parent.system_group,
        })
    }
}

fn observe(record: ShellUser, client_id: Option<ClientId>, password: Option<String>) -> WebUserState {
    WebUserState {
        id: record.id.unwrap_or_default(),
        client_id,
        server_id: record.server_id,
        parent_domain_id: record.parent_domain_id,
        username: record.username,
        password,
        dir: record.dir.filter(|d| !d.is_empty()),
        shell: record.shell.filter(|s| !s.is_empty()),
        quota_size: record.quota_size,
        active: record.active.unwrap_or(false),
        uid: record.uid.filter(|u| !u.is_empty()),
        gid: record.gid.filter(|g| !g.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_spec_uses_bash_and_is_active() {
        let spec = WebUserSpec::new(WebDomainId::new(10), "deploy");
        assert_eq!(spec.shell.as_deref(), Some("/bin/bash"));
        assert!(spec.active);
    }

    #[test]
    fn upgrades_v0_active_flag() {
        let mut state = match json!({"username": "deploy", "active": "n"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let version = WebUser::upgrade_state(0, &mut state).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
        assert_eq!(state["active"], json!(false));
    }

    #[test]
    fn observe_keeps_write_only_password() {
        let record = ShellUser {
            id: Some(ShellUserId::new(5)),
            username: "deploy".into(),
            password: None,
            active: Some(true),
            uid: Some(String::new()),
            ..Default::default()
        };
        let state = observe(record, None, Some("s3cret".into()));
        assert_eq!(state.password.as_deref(), Some("s3cret"));
        assert_eq!(state.uid, None);
        assert!(state.active);
    }
}
