//! Database reconciler.

use panel::upgrade::{self, BoolFieldUpgrade, StateUpgrade};
use panel::{
    ClientId, Database, DatabaseId, DatabaseUserId, PanelResult, ServerId, WebDomain, WebDomainId,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::context::ResourceContext;
use crate::import::import_id;

/// Current schema version of [`WebDatabaseState`].
pub const SCHEMA_VERSION: u32 = 1;

/// v0 stored `active` and `remote_access` as `"y"`/`"n"`.
pub const STATE_UPGRADES: &[StateUpgrade] = &[StateUpgrade {
    from_version: 0,
    bool_fields: &[
        BoolFieldUpgrade {
            field: "active",
            default: true,
        },
        BoolFieldUpgrade {
            field: "remote_access",
            default: false,
        },
    ],
}];

/// Desired configuration of a database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebDatabaseSpec {
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub parent_domain_id: WebDomainId,
    pub database_name: String,
    /// `mysql` or `pgsql`.
    pub engine: String,
    pub database_user_id: Option<DatabaseUserId>,
    pub database_charset: Option<String>,
    pub remote_access: bool,
    /// Comma-separated addresses allowed when `remote_access` is on.
    pub remote_ips: Option<String>,
    pub backup_interval: Option<String>,
    pub backup_copies: Option<i64>,
    pub active: bool,
    pub database_quota: Option<i64>,
}

impl WebDatabaseSpec {
    pub fn new(parent_domain_id: WebDomainId, database_name: impl Into<String>) -> Self {
        Self {
            client_id: None,
            server_id: None,
            parent_domain_id,
            database_name: database_name.into(),
            engine: "mysql".into(),
            database_user_id: None,
            database_charset: None,
            remote_access: false,
            remote_ips: None,
            backup_interval: None,
            backup_copies: None,
            active: true,
            database_quota: None,
        }
    }
}

/// Observed state of a database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebDatabaseState {
    pub id: DatabaseId,
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub parent_domain_id: WebDomainId,
    pub database_name: String,
    pub engine: Option<String>,
    pub database_user_id: Option<DatabaseUserId>,
    pub database_charset: Option<String>,
    pub remote_access: bool,
    pub remote_ips: Option<String>,
    pub backup_interval: Option<String>,
    pub backup_copies: Option<i64>,
    pub active: bool,
    pub database_quota: Option<i64>,
}

/// Create, read, update, delete and import for databases.
#[derive(Debug, Clone)]
pub struct WebDatabase {
    ctx: ResourceContext,
}

impl WebDatabase {
    pub fn new(ctx: ResourceContext) -> Self {
        Self { ctx }
    }

    /// Migrates stored state from `version` to [`SCHEMA_VERSION`].
    pub fn upgrade_state(version: u32, state: &mut Map<String, Value>) -> PanelResult<u32> {
        upgrade::upgrade_state(STATE_UPGRADES, version, state)
    }

    #[instrument(skip(self, spec), fields(name = %spec.database_name))]
    pub async fn create(&self, spec: &WebDatabaseSpec) -> PanelResult<WebDatabaseState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let record = self.to_record(spec).await?;
        let ops = self.ctx.operations::<Database>();
        let id = ops.add(&record, client).await?;
        info!(%id, "Created database");
        let created = ops.get(id).await?;
        Ok(observe(created, Some(client)))
    }

    #[instrument(skip(self, state), fields(id = %state.id))]
    pub async fn read(&self, state: &WebDatabaseState) -> PanelResult<WebDatabaseState> {
        let record = self.ctx.operations::<Database>().get(state.id).await?;
        Ok(observe(record, state.client_id))
    }

    #[instrument(skip(self, spec, state), fields(id = %state.id))]
    pub async fn update(
        &self,
        spec: &WebDatabaseSpec,
        state: &WebDatabaseState,
    ) -> PanelResult<WebDatabaseState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let record = self.to_record(spec).await?;
        let ops = self.ctx.operations::<Database>();
        ops.update(state.id, client, &record).await?;
        info!("Updated database");
        let updated = ops.get(state.id).await?;
        Ok(observe(updated, Some(client)))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: DatabaseId) -> PanelResult<()> {
        self.ctx.operations::<Database>().delete(id).await?;
        info!("Deleted database");
        Ok(())
    }

    pub async fn import(&self, raw_id: &str) -> PanelResult<WebDatabaseState> {
        let id = import_id::<DatabaseId>(raw_id)?;
        let state = WebDatabaseState {
            id,
            client_id: self.ctx.defaults().client_id,
            ..Default::default()
        };
        self.read(&state).await
    }

    async fn to_record(&self, spec: &WebDatabaseSpec) -> PanelResult<Database> {
        let mut chain = self.ctx.server_chain(spec.server_id);
        if chain.needs_parent() {
            debug!(parent = %spec.parent_domain_id, "Inheriting server from parent domain");
            let parent = self
                .ctx
                .operations::<WebDomain>()
                .get(spec.parent_domain_id)
                .await?;
            chain = chain.parent(parent.server_id);
        }
        let server = chain.require()?;

        Ok(Database {
            id: None,
            server_id: Some(server),
            parent_domain_id: spec.parent_domain_id,
            engine: Some(spec.engine.clone()),
            database_name: spec.database_name.clone(),
            database_user_id: spec.database_user_id,
            database_charset: spec.database_charset.clone(),
            remote_access: Some(spec.remote_access),
            remote_ips: spec.remote_ips.clone(),
            backup_interval: spec.backup_interval.clone(),
            backup_copies: spec.backup_copies,
            active: Some(spec.active),
            database_quota: spec.database_quota,
        })
    }
}

fn observe(record: Database, client_id: Option<ClientId>) -> WebDatabaseState {
    WebDatabaseState {
        id: record.id.unwrap_or_default(),
        client_id,
        server_id: record.server_id,
        parent_domain_id: record.parent_domain_id,
        database_name: record.database_name,
        engine: record.engine,
        database_user_id: record.database_user_id,
        database_charset: record.database_charset.filter(|c| !c.is_empty()),
        remote_access: record.remote_access.unwrap_or(false),
        remote_ips: record.remote_ips.filter(|r| !r.is_empty()),
        backup_interval: record.backup_interval,
        backup_copies: record.backup_copies,
        active: record.active.unwrap_or(false),
        database_quota: record.database_quota,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_spec_defaults() {
        let spec = WebDatabaseSpec::new(WebDomainId::new(1), "c1shop");
        assert_eq!(spec.engine, "mysql");
        assert!(spec.active);
        assert!(!spec.remote_access);
    }

    #[test]
    fn upgrades_v0_flags_with_defaults() {
        let mut state = match json!({"database_name": "c1shop", "active": "", "remote_access": "Y"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert_eq!(WebDatabase::upgrade_state(0, &mut state).unwrap(), SCHEMA_VERSION);
        assert_eq!(state["active"], json!(true));
        assert_eq!(state["remote_access"], json!(true));
    }
}
