//! Database login reconciler.

use panel::{ClientId, DatabaseUser, DatabaseUserId, PanelResult, ServerId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::context::ResourceContext;
use crate::import::import_id;

/// Desired configuration of a database login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebDatabaseUserSpec {
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub database_user: String,
    /// Write-only; the remote returns a hash.
    pub database_password: String,
}

/// Observed state of a database login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebDatabaseUserState {
    pub id: DatabaseUserId,
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub database_user: String,
    pub database_password: String,
}

/// Create, read, update, delete and import for database logins.
#[derive(Debug, Clone)]
pub struct WebDatabaseUser {
    ctx: ResourceContext,
}

impl WebDatabaseUser {
    pub fn new(ctx: ResourceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, spec), fields(user = %spec.database_user))]
    pub async fn create(&self, spec: &WebDatabaseUserSpec) -> PanelResult<WebDatabaseUserState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let ops = self.ctx.operations::<DatabaseUser>();
        let id = ops.add(&self.to_record(spec), client).await?;
        info!(%id, "Created database user");
        let created = ops.get(id).await?;
        Ok(observe(created, Some(client), spec.database_password.clone()))
    }

    #[instrument(skip(self, state), fields(id = %state.id))]
    pub async fn read(&self, state: &WebDatabaseUserState) -> PanelResult<WebDatabaseUserState> {
        let record = self.ctx.operations::<DatabaseUser>().get(state.id).await?;
        Ok(observe(record, state.client_id, state.database_password.clone()))
    }

    #[instrument(skip(self, spec, state), fields(id = %state.id))]
    pub async fn update(
        &self,
        spec: &WebDatabaseUserSpec,
        state: &WebDatabaseUserState,
    ) -> PanelResult<WebDatabaseUserState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let ops = self.ctx.operations::<DatabaseUser>();
        ops.update(state.id, client, &self.to_record(spec)).await?;
        info!("Updated database user");
        let updated = ops.get(state.id).await?;
        Ok(observe(updated, Some(client), spec.database_password.clone()))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: DatabaseUserId) -> PanelResult<()> {
        self.ctx.operations::<DatabaseUser>().delete(id).await?;
        info!("Deleted database user");
        Ok(())
    }

    pub async fn import(&self, raw_id: &str) -> PanelResult<WebDatabaseUserState> {
        let id = import_id::<DatabaseUserId>(raw_id)?;
        let state = WebDatabaseUserState {
            id,
            client_id: self.ctx.defaults().client_id,
            ..Default::default()
        };
        self.read(&state).await
    }

    /// The server is optional for logins and omitted when unresolved.
    fn to_record(&self, spec: &WebDatabaseUserSpec) -> DatabaseUser {
        DatabaseUser {
            id: None,
            server_id: self.ctx.server_chain(spec.server_id).resolve(),
            database_user: spec.database_user.clone(),
            database_password: spec.database_password.clone(),
        }
    }
}

fn observe(record: DatabaseUser, client_id: Option<ClientId>, password: String) -> WebDatabaseUserState {
    WebDatabaseUserState {
        id: record.id.unwrap_or_default(),
        client_id,
        server_id: record.server_id,
        database_user: record.database_user,
        database_password: password,
    }
}
